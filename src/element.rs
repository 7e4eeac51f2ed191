//! Two-node axial bar element.
//!
//! In member coordinates the bar only resists stretching along its own axis:
//!
//! ```text
//! k_local = k * [ 1  -1 ]
//!               [-1   1 ]
//! ```
//!
//! The transformation `T` projects the four global end translations
//! `(uxi, uyi, uxj, uyj)` onto the two axial ones, and the global block is
//! `T^T * k_local * T`. See <https://en.wikipedia.org/wiki/Direct_stiffness_method>.

use nalgebra::{Matrix2, Matrix4, SMatrix, Vector4};
use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::errors::AnalysisError;
use crate::geometry::Point;
use crate::options::SolverOptions;

/// Geometry and stiffness of one member, computed once per solve.
///
/// Force recovery reuses exactly these values, so the element seen by the
/// assembler and by the recovery step can never drift apart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementStiffness {
    /// Member this element was built for.
    pub member: EdgeIndex,
    /// Joint at the start of the member.
    pub start: NodeIndex,
    /// Joint at the end of the member.
    pub end: NodeIndex,
    /// Undeformed length.
    pub length: f64,
    /// Direction cosine with the global X axis.
    pub cos: f64,
    /// Direction cosine with the global Y axis.
    pub sin: f64,
    /// Axial stiffness coefficient `EA / L` (or `1.0` in unit mode).
    pub stiffness: f64,
}

impl ElementStiffness {
    /// Build the element for a member running from `start` to `end`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::DegenerateMember`] when the member is shorter
    /// than the configured length tolerance,
    /// [`AnalysisError::MalformedInput`] when its length overflows, and
    /// [`AnalysisError::MissingRigidity`] when `ea` is absent and unit stiffness
    /// is disabled.
    pub fn build(
        member: EdgeIndex,
        (start, from): (NodeIndex, Point),
        (end, to): (NodeIndex, Point),
        ea: Option<f64>,
        options: &SolverOptions,
    ) -> Result<Self, AnalysisError> {
        let delta = to.to_vector() - from.to_vector();
        let length = delta.norm();
        if !length.is_finite() {
            return Err(AnalysisError::MalformedInput(format!(
                "member {member:?} is too long to analyse (length {length})"
            )));
        }
        if length <= options.length_tolerance {
            return Err(AnalysisError::DegenerateMember { member, length });
        }
        let stiffness = match ea {
            Some(ea) => ea / length,
            None if options.unit_stiffness => 1.0,
            None => return Err(AnalysisError::MissingRigidity(member)),
        };
        Ok(Self {
            member,
            start,
            end,
            length,
            cos: delta.x / length,
            sin: delta.y / length,
            stiffness,
        })
    }

    /// Stiffness in member-axial coordinates.
    #[must_use]
    pub fn local_matrix(&self) -> Matrix2<f64> {
        let k = self.stiffness;
        Matrix2::new(k, -k, -k, k)
    }

    /// Map from global end translations to axial end translations.
    #[must_use]
    pub fn transformation(&self) -> SMatrix<f64, 2, 4> {
        let (c, s) = (self.cos, self.sin);
        SMatrix::<f64, 2, 4>::from_row_slice(&[c, s, 0.0, 0.0, 0.0, 0.0, c, s])
    }

    /// Element stiffness in global coordinates.
    ///
    /// The product is averaged with its transpose so the block is symmetric
    /// bit for bit, not just up to round-off.
    #[must_use]
    pub fn global_matrix(&self) -> Matrix4<f64> {
        let t = self.transformation();
        let block = t.transpose() * self.local_matrix() * t;
        block * 0.5 + block.transpose() * 0.5
    }

    /// Change in length for the given global end translations.
    #[must_use]
    pub fn elongation(&self, end_displacements: &Vector4<f64>) -> f64 {
        let u = end_displacements;
        self.cos * (u[2] - u[0]) + self.sin * (u[3] - u[1])
    }

    /// Axial force for the given global end translations, tension positive.
    #[must_use]
    pub fn axial_force(&self, end_displacements: &Vector4<f64>) -> f64 {
        self.stiffness * self.elongation(end_displacements)
    }
}
