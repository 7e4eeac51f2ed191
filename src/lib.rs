#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
#![doc = include_str!("../README.md")]

pub mod assembly;
pub mod boundary;
pub mod dof;
pub mod element;
mod errors;
mod geometry;
pub mod input;
mod options;
pub mod recovery;
mod results;
pub mod solver;
mod truss;

pub use errors::{AnalysisError, TrussEditError};
pub use geometry::{force, point, Displacement, Force, Point};
pub use input::{MemberSpec, NodeId, TrussDescription};
pub use options::SolverOptions;
pub use results::{JointResult, MemberResult, TrussResults};
pub use truss::Truss;

/// Parse a JSON truss description and analyse it in one step.
///
/// # Errors
///
/// Returns any [`AnalysisError`] raised while parsing, building or solving.
///
/// # Examples
/// ```
/// use trussx2d::{analyse_json, SolverOptions};
///
/// let json = r#"{
///     "nodes": {"A": [0, 0], "B": [1, 0], "C": [0, 1]},
///     "members": [["A", "B"], ["A", "C"]],
///     "supports": {"B": [true, true], "C": [true, true]},
///     "loads": {"A": [10, 0]}
/// }"#;
/// let results = analyse_json(json, &SolverOptions::unit())?;
/// assert!((results.force_between("A", "B").unwrap() + 10.0).abs() < 1e-9);
/// # Ok::<(), trussx2d::AnalysisError>(())
/// ```
pub fn analyse_json(json: &str, options: &SolverOptions) -> Result<TrussResults, AnalysisError> {
    TrussDescription::from_json_str(json)?
        .to_truss()?
        .analyse(options)
}
