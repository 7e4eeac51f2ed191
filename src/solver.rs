//! Solution of the reduced stiffness system.

use nalgebra::{DMatrix, DVector};

use crate::assembly::GlobalSystem;
use crate::boundary::DofPartition;
use crate::errors::AnalysisError;

/// Extract `K[free, free]` and `F[free]`.
#[must_use]
pub fn reduce(system: &GlobalSystem, free: &[usize]) -> (DMatrix<f64>, DVector<f64>) {
    let n = free.len();
    let stiffness = DMatrix::from_fn(n, n, |row, col| system.stiffness[(free[row], free[col])]);
    let load = DVector::from_fn(n, |row, _| system.load[free[row]]);
    (stiffness, load)
}

/// Solve `K_ff u_f = F_f` and scatter the result into a full-length vector.
///
/// Restrained entries of the returned vector are exactly zero. A system with
/// no free DOFs has nothing to solve and yields all zeros.
///
/// # Errors
///
/// Returns [`AnalysisError::SingularSystem`] when the LU factorisation fails,
/// when any pivot falls below `tolerance` times the largest diagonal entry of
/// the reduced matrix, or when the solution is not finite.
pub fn solve_displacements(
    system: &GlobalSystem,
    partition: &DofPartition,
    tolerance: f64,
) -> Result<DVector<f64>, AnalysisError> {
    let mut displacements = DVector::zeros(system.dof_count());
    if partition.free.is_empty() {
        return Ok(displacements);
    }

    let (k_ff, f_f) = reduce(system, &partition.free);
    let scale = k_ff.diagonal().amax();
    if scale <= 0.0 || !scale.is_finite() {
        return Err(AnalysisError::SingularSystem);
    }

    let lu = k_ff.lu();
    let smallest_pivot = lu.u().diagonal().amin();
    if smallest_pivot <= tolerance * scale {
        return Err(AnalysisError::SingularSystem);
    }
    let solution = lu.solve(&f_f).ok_or(AnalysisError::SingularSystem)?;
    if solution.iter().any(|value| !value.is_finite()) {
        return Err(AnalysisError::SingularSystem);
    }

    for (row, &dof) in partition.free.iter().enumerate() {
        displacements[dof] = solution[row];
    }
    Ok(displacements)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn system(stiffness: &[f64], load: &[f64]) -> GlobalSystem {
        let n = load.len();
        GlobalSystem {
            stiffness: DMatrix::from_row_slice(n, n, stiffness),
            load: DVector::from_column_slice(load),
        }
    }

    #[test]
    fn reduce_picks_free_rows_and_columns() {
        let system = system(
            &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0],
            &[10.0, 11.0, 12.0],
        );
        let (k, f) = reduce(&system, &[0, 2]);
        assert_eq!(k, DMatrix::from_row_slice(2, 2, &[1.0, 3.0, 7.0, 9.0]));
        assert_eq!(f.as_slice(), &[10.0, 12.0]);
    }

    #[test]
    fn fixed_entries_stay_zero() {
        let system = system(
            &[2.0, -1.0, 0.0, -1.0, 2.0, -1.0, 0.0, -1.0, 1.0],
            &[0.0, 0.0, 1.0],
        );
        let partition = DofPartition {
            free: vec![1, 2],
            fixed: vec![0],
        };
        let u = solve_displacements(&system, &partition, 1.0e-12).expect("solvable");
        assert_eq!(u[0], 0.0);
        assert_relative_eq!(u[1], 1.0, epsilon = 1.0e-12);
        assert_relative_eq!(u[2], 2.0, epsilon = 1.0e-12);
    }

    #[test]
    fn no_free_dofs_is_trivially_solved() {
        let system = system(&[1.0, 0.0, 0.0, 1.0], &[5.0, 5.0]);
        let partition = DofPartition {
            free: vec![],
            fixed: vec![0, 1],
        };
        let u = solve_displacements(&system, &partition, 1.0e-12).expect("nothing to solve");
        assert_eq!(u.as_slice(), &[0.0, 0.0]);
    }

    #[test]
    fn rank_deficient_matrix_is_singular() {
        let system = system(&[1.0, -1.0, -1.0, 1.0], &[1.0, 0.0]);
        let partition = DofPartition {
            free: vec![0, 1],
            fixed: vec![],
        };
        let error = solve_displacements(&system, &partition, 1.0e-12).expect_err("mechanism");
        assert_eq!(error, AnalysisError::SingularSystem);
    }

    #[test]
    fn zero_matrix_is_singular() {
        let system = system(&[0.0], &[1.0]);
        let partition = DofPartition {
            free: vec![0],
            fixed: vec![],
        };
        let error = solve_displacements(&system, &partition, 1.0e-12).expect_err("no stiffness");
        assert_eq!(error, AnalysisError::SingularSystem);
    }
}
