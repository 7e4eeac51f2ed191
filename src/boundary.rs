//! Split of the degrees of freedom into free and restrained sets.

use petgraph::graph::NodeIndex;

use crate::dof::DofMap;
use crate::errors::AnalysisError;

/// Disjoint, exhaustive partition of `0..dof_count`.
///
/// Both sets are sorted ascending; the position of a DOF in
/// [`free`](Self::free) is its row in the reduced system.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DofPartition {
    /// Unrestrained degrees of freedom.
    pub free: Vec<usize>,
    /// Restrained degrees of freedom, held at zero displacement.
    pub fixed: Vec<usize>,
}

impl DofPartition {
    /// Partition the DOFs of `dofs` using per-joint `(x_fixed, y_fixed)` flags.
    ///
    /// Joints missing from `supports` are free in both directions.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::MalformedInput`] when a support refers to a
    /// joint that has no degrees of freedom.
    pub fn new(
        dofs: &DofMap,
        supports: impl IntoIterator<Item = (NodeIndex, [bool; 2])>,
    ) -> Result<Self, AnalysisError> {
        let mut restrained = vec![false; dofs.dof_count()];
        for (node, flags) in supports {
            let indices = dofs.dofs(node).ok_or_else(|| {
                AnalysisError::MalformedInput(format!("support applied to unknown joint {node:?}"))
            })?;
            for (dof, fixed) in indices.into_iter().zip(flags) {
                restrained[dof] = fixed;
            }
        }
        let (fixed, free): (Vec<usize>, Vec<usize>) =
            (0..restrained.len()).partition(|&dof| restrained[dof]);
        Ok(Self { free, fixed })
    }

    /// Whether a DOF is restrained.
    #[must_use]
    pub fn is_fixed(&self, dof: usize) -> bool {
        self.fixed.binary_search(&dof).is_ok()
    }
}
