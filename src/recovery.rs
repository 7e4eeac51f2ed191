//! Back-substitution from displacements to member forces and reactions.

use nalgebra::{DVector, Vector4};

use crate::assembly::{element_dofs, GlobalSystem};
use crate::boundary::DofPartition;
use crate::dof::DofMap;
use crate::element::ElementStiffness;
use crate::errors::AnalysisError;

/// Axial force in every element, in element order. Tension is positive.
///
/// Each force comes from the same direction cosines and stiffness that were
/// assembled, applied to the end translations gathered from `displacements`.
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidTopology`] when an element refers to a joint
/// without degrees of freedom.
pub fn member_forces(
    dofs: &DofMap,
    elements: &[ElementStiffness],
    displacements: &DVector<f64>,
) -> Result<Vec<f64>, AnalysisError> {
    elements
        .iter()
        .map(|element| {
            let [a, b, c, d] = element_dofs(dofs, element)?;
            let ends = Vector4::new(
                displacements[a],
                displacements[b],
                displacements[c],
                displacements[d],
            );
            Ok(element.axial_force(&ends))
        })
        .collect()
}

/// Support reactions `K u - F` at the restrained DOFs; zero at free ones.
#[must_use]
pub fn reactions(
    system: &GlobalSystem,
    partition: &DofPartition,
    displacements: &DVector<f64>,
) -> DVector<f64> {
    let mut reactions = DVector::zeros(system.dof_count());
    for &dof in &partition.fixed {
        let internal: f64 = system
            .stiffness
            .row(dof)
            .iter()
            .zip(displacements.iter())
            .map(|(k, u)| k * u)
            .sum();
        reactions[dof] = internal - system.load[dof];
    }
    reactions
}
