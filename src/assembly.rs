//! Global stiffness matrix and load vector assembly.

use nalgebra::{DMatrix, DVector, Matrix4};
use petgraph::graph::NodeIndex;

use crate::dof::DofMap;
use crate::element::ElementStiffness;
use crate::errors::AnalysisError;
use crate::geometry::Force;

/// The assembled system `K u = F` for one solve.
///
/// Both arrays start at zero and only ever grow by addition, so members
/// sharing a joint superpose their stiffness.
#[derive(Clone, Debug, PartialEq)]
pub struct GlobalSystem {
    /// Global stiffness matrix.
    pub stiffness: DMatrix<f64>,
    /// Global nodal load vector.
    pub load: DVector<f64>,
}

impl GlobalSystem {
    /// Create an all-zero system with `dof_count` unknowns.
    #[must_use]
    pub fn zeros(dof_count: usize) -> Self {
        Self {
            stiffness: DMatrix::zeros(dof_count, dof_count),
            load: DVector::zeros(dof_count),
        }
    }

    /// Number of unknowns.
    #[must_use]
    pub fn dof_count(&self) -> usize {
        self.load.len()
    }

    /// Add a 4x4 element block at the given global indices.
    pub fn add_element(&mut self, dofs: [usize; 4], block: &Matrix4<f64>) {
        for (row_local, &row) in dofs.iter().enumerate() {
            for (col_local, &col) in dofs.iter().enumerate() {
                self.stiffness[(row, col)] += block[(row_local, col_local)];
            }
        }
    }

    /// Add a nodal force at the given `(x, y)` indices.
    pub fn add_load(&mut self, [x, y]: [usize; 2], force: Force) {
        self.load[x] += force.x;
        self.load[y] += force.y;
    }
}

/// Assemble the global system from prepared elements and joint loads.
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidTopology`] when an element refers to a joint
/// that has no degrees of freedom, and [`AnalysisError::MalformedInput`] when a
/// load is attached to such a joint.
pub fn assemble(
    dofs: &DofMap,
    elements: &[ElementStiffness],
    loads: impl IntoIterator<Item = (NodeIndex, Force)>,
) -> Result<GlobalSystem, AnalysisError> {
    let mut system = GlobalSystem::zeros(dofs.dof_count());
    for element in elements {
        let placement = element_dofs(dofs, element)?;
        system.add_element(placement, &element.global_matrix());
    }
    for (node, force) in loads {
        let placement = dofs.dofs(node).ok_or_else(|| {
            AnalysisError::MalformedInput(format!("load applied to unknown joint {node:?}"))
        })?;
        system.add_load(placement, force);
    }
    Ok(system)
}

/// Global indices of an element's end translations.
pub(crate) fn element_dofs(
    dofs: &DofMap,
    element: &ElementStiffness,
) -> Result<[usize; 4], AnalysisError> {
    let locate = |node: NodeIndex| {
        dofs.dofs(node).ok_or_else(|| AnalysisError::InvalidTopology {
            member: element.member,
            node: node.index().to_string(),
        })
    };
    let [a, b] = locate(element.start)?;
    let [c, d] = locate(element.end)?;
    Ok([a, b, c, d])
}
