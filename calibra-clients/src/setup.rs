//! Operand preparation for triangular and banded routines.
//!
//! Solve-type operations need well-conditioned inputs: a freshly randomized
//! dense matrix is restricted to its band/triangle, made diagonally
//! dominant, and re-laid-out into the routine's wire format (banded or
//! packed storage). All dense matrices here are `n` x `n` column-major with
//! leading dimension `n`.

use calibra_core::{banded_index, Diag, Real, Uplo};

/// Zero every element of a dense triangular matrix outside the band of `k`
/// off-diagonals.
pub fn banded_matrix_setup<T: Real>(uplo: Uplo, a: &mut [T], n: usize, k: usize) {
    for j in 0..n {
        for i in 0..n {
            let inside = match uplo {
                Uplo::Upper => i <= j && j <= i + k,
                Uplo::Lower => j <= i && i <= j + k,
            };
            if !inside {
                a[i + j * n] = T::zero();
            }
        }
    }
}

/// Make the `uplo` triangle of a dense matrix diagonally dominant: each
/// diagonal entry becomes the absolute row sum of the stored triangle plus
/// one, so triangular solves on it are well-conditioned.
pub fn prepare_triangular_solve<T: Real>(a: &mut [T], n: usize, uplo: Uplo) {
    for i in 0..n {
        let (lo, hi) = match uplo {
            Uplo::Upper => (i, n - 1),
            Uplo::Lower => (0, i),
        };
        let mut row_sum = T::one();
        for j in lo..=hi {
            row_sum += a[i + j * n].abs();
        }
        a[i + i * n] = row_sum;
    }
}

/// Force a unit diagonal on a dense matrix (the stored diagonal of a
/// unit-diagonal operand is ignored by the routine but must be consistent
/// for reference computations on the dense form).
pub fn make_unit_diagonal<T: Real>(a: &mut [T], n: usize, lda: usize) {
    for i in 0..n {
        a[i + i * lda] = T::one();
    }
}

/// Re-lay a dense triangular band matrix into column-major banded storage
/// with leading dimension `lda >= k + 1`.
pub fn regular_to_banded<T: Real>(uplo: Uplo, a: &[T], n: usize, ab: &mut [T], lda: usize, k: usize) {
    for j in 0..n {
        let (lo, hi) = match uplo {
            Uplo::Upper => (j.saturating_sub(k), j),
            Uplo::Lower => (j, (j + k).min(n - 1)),
        };
        for i in lo..=hi {
            ab[banded_index(uplo, k, lda, i, j)] = a[i + j * n];
        }
    }
}

/// Re-lay a dense triangle into column-major packed storage of length
/// `n(n+1)/2`.
pub fn regular_to_packed<T: Real>(uplo: Uplo, a: &[T], n: usize, ap: &mut [T]) {
    let mut at = 0;
    for j in 0..n {
        let (lo, hi) = match uplo {
            Uplo::Upper => (0, j),
            Uplo::Lower => (j, n - 1),
        };
        for i in lo..=hi {
            ap[at] = a[i + j * n];
            at += 1;
        }
    }
}

/// Full solve-input pipeline: restrict to the band, make diagonally
/// dominant, optionally force the unit diagonal, and emit banded storage.
pub fn banded_solve_setup<T: Real>(
    uplo: Uplo,
    diag: Diag,
    a: &mut [T],
    n: usize,
    k: usize,
    ab: &mut [T],
    lda: usize,
) {
    banded_matrix_setup(uplo, a, n, k);
    prepare_triangular_solve(a, n, uplo);
    if diag == Diag::Unit {
        make_unit_diagonal(a, n, n);
    }
    regular_to_banded(uplo, a, n, ab, lda, k);
}
