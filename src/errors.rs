//! Error types produced while building or analysing planar trusses.

use petgraph::graph::{EdgeIndex, NodeIndex};
use thiserror::Error;

/// Error returned when a truss analysis fails.
///
/// Every variant is a distinct, identifiable failure. None of them is
/// recovered inside the solver, and no result is produced alongside them.
#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    /// Returned when a member references a node id that is not in the node table.
    #[error("member {member:?} references unknown node `{node}`")]
    InvalidTopology {
        /// Identifier of the offending member (its position in the member list).
        member: EdgeIndex,
        /// The unresolved node id.
        node: String,
    },
    /// Returned when a member spans zero (or numerically negligible) distance.
    #[error("member {member:?} is degenerate (length {length:e})")]
    DegenerateMember {
        /// Identifier of the offending member.
        member: EdgeIndex,
        /// Length that fell below the tolerance.
        length: f64,
    },
    /// Returned when a member carries no axial rigidity and unit stiffness is off.
    #[error("member {0:?} has no axial rigidity; supply `ea` or enable unit stiffness")]
    MissingRigidity(EdgeIndex),
    /// Returned when the reduced stiffness matrix cannot be factorised.
    #[error("stiffness matrix is singular; the structure is a mechanism or under-supported")]
    SingularSystem,
    /// Returned when the truss description is ill-shaped.
    #[error("malformed input: {0}")]
    MalformedInput(String),
}

impl From<serde_json::Error> for AnalysisError {
    fn from(error: serde_json::Error) -> Self {
        Self::MalformedInput(error.to_string())
    }
}

impl From<TrussEditError> for AnalysisError {
    fn from(error: TrussEditError) -> Self {
        Self::MalformedInput(error.to_string())
    }
}

/// Error returned when editing a [`Truss`](crate::Truss) with invalid data.
///
/// # Examples
///
/// ```
/// use petgraph::graph::NodeIndex;
/// use trussx2d::{Truss, TrussEditError};
///
/// let mut truss = Truss::new();
/// let missing = NodeIndex::new(7);
/// let error = truss
///     .set_support(missing, [true, true])
///     .expect_err("unknown joint is rejected");
/// assert_eq!(error, TrussEditError::UnknownJoint(missing));
/// ```
#[derive(Debug, Error, PartialEq)]
pub enum TrussEditError {
    /// Returned when a joint cannot be found in the truss.
    #[error("joint {0:?} does not exist in this truss")]
    UnknownJoint(NodeIndex),
    /// Returned when a member cannot be found in the truss.
    #[error("member {0:?} does not exist in this truss")]
    UnknownMember(EdgeIndex),
    /// Returned when a joint id cannot be used as a result key.
    #[error("joint id `{0}` must not contain `,`")]
    InvalidJointId(String),
    /// Returned when a joint id is already taken.
    #[error("joint `{0}` is defined more than once")]
    DuplicateJoint(String),
    /// Returned when two joints are already connected by a member.
    #[error("joints `{start}` and `{end}` are already connected")]
    DuplicateMember {
        /// Id of the first joint.
        start: String,
        /// Id of the second joint.
        end: String,
    },
    /// Returned when the axial rigidity is zero, negative or not finite.
    #[error("axial rigidity must be positive (received {ea})")]
    NonPositiveRigidity {
        /// Identifier of the affected member.
        member: EdgeIndex,
        /// Rejected axial rigidity.
        ea: f64,
    },
}
