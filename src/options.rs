//! Solver configuration.

use serde::{Deserialize, Serialize};

use crate::errors::AnalysisError;

/// Tunable parameters for one analysis.
///
/// The defaults require every member to carry an axial rigidity. Enabling
/// [`unit_stiffness`](Self::unit_stiffness) gives members without one a
/// normalised stiffness of `1.0`, which is handy for checking topology and
/// force distributions but has no physical units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    /// Use `k = 1.0` for members with no axial rigidity.
    pub unit_stiffness: bool,
    /// Members shorter than this are rejected as degenerate.
    pub length_tolerance: f64,
    /// Relative pivot threshold below which the reduced system is singular.
    pub singularity_tolerance: f64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            unit_stiffness: false,
            length_tolerance: 1.0e-10,
            singularity_tolerance: 1.0e-12,
        }
    }
}

impl SolverOptions {
    /// Options with unit stiffness enabled and default tolerances.
    ///
    /// # Examples
    /// ```
    /// use trussx2d::SolverOptions;
    ///
    /// let options = SolverOptions::unit();
    /// assert!(options.unit_stiffness);
    /// ```
    #[must_use]
    pub fn unit() -> Self {
        Self::default().with_unit_stiffness(true)
    }

    /// Toggle the unit stiffness fallback.
    #[must_use]
    pub fn with_unit_stiffness(mut self, enabled: bool) -> Self {
        self.unit_stiffness = enabled;
        self
    }

    /// Set the minimum member length.
    #[must_use]
    pub fn with_length_tolerance(mut self, tolerance: f64) -> Self {
        self.length_tolerance = tolerance;
        self
    }

    /// Set the relative pivot threshold used to detect singular systems.
    #[must_use]
    pub fn with_singularity_tolerance(mut self, tolerance: f64) -> Self {
        self.singularity_tolerance = tolerance;
        self
    }

    /// Check that both tolerances are finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::MalformedInput`] naming the first bad tolerance.
    ///
    /// # Examples
    /// ```
    /// use trussx2d::SolverOptions;
    ///
    /// assert!(SolverOptions::default().validate().is_ok());
    /// assert!(SolverOptions::default().with_length_tolerance(-1.0).validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), AnalysisError> {
        for (name, value) in [
            ("length_tolerance", self.length_tolerance),
            ("singularity_tolerance", self.singularity_tolerance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(AnalysisError::MalformedInput(format!(
                    "{name} must be a finite non-negative number (received {value})"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let options: SolverOptions =
            serde_json::from_str(r#"{"unit_stiffness": true}"#).expect("valid options");
        assert!(options.unit_stiffness);
        assert_eq!(options.length_tolerance, SolverOptions::default().length_tolerance);
    }

    #[test]
    fn negative_or_nan_tolerances_are_rejected() {
        for options in [
            SolverOptions::default().with_length_tolerance(-1.0),
            SolverOptions::default().with_length_tolerance(f64::NAN),
            SolverOptions::default().with_singularity_tolerance(f64::INFINITY),
        ] {
            assert!(matches!(
                options.validate(),
                Err(AnalysisError::MalformedInput(_))
            ));
        }
        SolverOptions::default()
            .with_length_tolerance(0.0)
            .validate()
            .expect("zero tolerance is allowed");
    }
}
