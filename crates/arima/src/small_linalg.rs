//! Dense solver for the small linear systems of the likelihood setup.
//!
//! The autocovariance equations have at most `p + P*m + 1` unknowns, so
//! plain Gaussian elimination with partial pivoting is enough.
//!
//! **Not part of the public API.**

use ndarray::{Array1, Array2};

/// Pivots smaller than this are treated as singular.
const PIVOT_EPS: f64 = 1e-12;

/// Solves `a * x = b`. Returns `None` for a singular (or non-square) system.
pub(crate) fn solve(mut a: Array2<f64>, mut b: Array1<f64>) -> Option<Array1<f64>> {
    let n = b.len();
    if a.shape() != [n, n] {
        return None;
    }

    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| a[[i, col]].abs().total_cmp(&a[[j, col]].abs()))?;
        if !(a[[pivot, col]].abs() > PIVOT_EPS) {
            return None;
        }
        if pivot != col {
            for k in 0..n {
                a.swap([pivot, k], [col, k]);
            }
            b.swap(pivot, col);
        }
        for row in col + 1..n {
            let factor = a[[row, col]] / a[[col, col]];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[[row, k]] -= factor * a[[col, k]];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = Array1::zeros(n);
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[[row, k]] * x[k]).sum();
        x[row] = (b[row] - tail) / a[[row, row]];
    }
    Some(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn solves_2x2() {
        let a = array![[2.0, 1.0], [1.0, 3.0]];
        let b = array![3.0, 5.0];
        let x = solve(a, b).unwrap();
        assert_abs_diff_eq!(x[0], 0.8, epsilon = 1e-12);
        assert_abs_diff_eq!(x[1], 1.4, epsilon = 1e-12);
    }

    #[test]
    fn needs_pivoting() {
        let a = array![[0.0, 1.0], [1.0, 0.0]];
        let b = array![2.0, 3.0];
        let x = solve(a, b).unwrap();
        assert_abs_diff_eq!(x[0], 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(x[1], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn singular_system() {
        let a = array![[1.0, 2.0], [2.0, 4.0]];
        assert!(solve(a, array![1.0, 2.0]).is_none());
    }

    #[test]
    fn shape_mismatch() {
        let a = Array2::zeros((2, 3));
        assert!(solve(a, array![1.0, 2.0]).is_none());
    }

    #[test]
    fn empty_system() {
        let x = solve(Array2::zeros((0, 0)), Array1::zeros(0)).unwrap();
        assert!(x.is_empty());
    }
}
