//! Level 2 reference kernels: matrix-vector operations on triangular
//! (packed / banded) and symmetric matrices.
//!
//! Transposed operations are expressed through a storage accessor plus an
//! effective-triangle flip rather than separate loop nests, keeping the
//! oracle small enough to audit by eye.

use crate::vec_index;
use calibra_core::{Diag, Real, Transpose, Uplo};

/// Element `(i, j)` of a packed column-major triangle.
///
/// Caller guarantees `(i, j)` lies in the stored triangle.
#[inline]
fn packed_get<T: Real>(uplo: Uplo, n: usize, ap: &[T], i: usize, j: usize) -> T {
    match uplo {
        Uplo::Upper => ap[i + j * (j + 1) / 2],
        Uplo::Lower => ap[(i - j) + j * (2 * n - j + 1) / 2],
    }
}

/// Element `(i, j)` of a banded column-major triangle with `k` off-diagonals.
#[inline]
fn banded_get<T: Real>(uplo: Uplo, k: usize, lda: usize, ab: &[T], i: usize, j: usize) -> T {
    ab[calibra_core::banded_index(uplo, k, lda, i, j)]
}

/// Element `(i, j)` of `op(A)` for a stored triangle, `None` outside the
/// effective triangle/band.
struct TriAccess<'a, T, F>
where
    F: Fn(&'a [T], usize, usize) -> T,
{
    store: &'a [T],
    get: F,
    trans: bool,
    unit: bool,
}

impl<'a, T: Real, F> TriAccess<'a, T, F>
where
    F: Fn(&'a [T], usize, usize) -> T,
{
    #[inline]
    fn at(&self, i: usize, j: usize) -> T {
        if self.unit && i == j {
            return T::one();
        }
        if self.trans {
            (self.get)(self.store, j, i)
        } else {
            (self.get)(self.store, i, j)
        }
    }
}

/// Packed triangular matrix-vector multiply: `x := op(A) * x`.
///
/// `ap` holds the `n(n+1)/2` stored elements of the triangle in column-major
/// packed order.
pub fn tpmv<T: Real>(
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    n: usize,
    ap: &[T],
    x: &mut [T],
    incx: isize,
) {
    if n == 0 {
        return;
    }
    let acc = TriAccess {
        store: ap,
        get: move |s: &[T], i, j| packed_get(uplo, n, s, i, j),
        trans: trans.is_trans(),
        unit: diag == Diag::Unit,
    };
    let eff_uplo = if trans.is_trans() { uplo.flip() } else { uplo };

    let mut result = vec![T::zero(); n];
    for (i, r) in result.iter_mut().enumerate() {
        let (lo, hi) = match eff_uplo {
            Uplo::Upper => (i, n - 1),
            Uplo::Lower => (0, i),
        };
        let mut sum = T::zero();
        for j in lo..=hi {
            sum += acc.at(i, j) * x[vec_index(n, incx, j)];
        }
        *r = sum;
    }
    for (i, r) in result.into_iter().enumerate() {
        x[vec_index(n, incx, i)] = r;
    }
}

/// Banded triangular matrix-vector multiply: `x := op(A) * x`.
///
/// `ab` holds the band in column-major banded storage with leading
/// dimension `lda >= k + 1`.
pub fn tbmv<T: Real>(
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    n: usize,
    k: usize,
    ab: &[T],
    lda: usize,
    x: &mut [T],
    incx: isize,
) {
    if n == 0 {
        return;
    }
    let acc = TriAccess {
        store: ab,
        get: move |s: &[T], i, j| banded_get(uplo, k, lda, s, i, j),
        trans: trans.is_trans(),
        unit: diag == Diag::Unit,
    };
    let eff_uplo = if trans.is_trans() { uplo.flip() } else { uplo };

    let mut result = vec![T::zero(); n];
    for (i, r) in result.iter_mut().enumerate() {
        let (lo, hi) = match eff_uplo {
            Uplo::Upper => (i, (i + k).min(n - 1)),
            Uplo::Lower => (i.saturating_sub(k), i),
        };
        let mut sum = T::zero();
        for j in lo..=hi {
            sum += acc.at(i, j) * x[vec_index(n, incx, j)];
        }
        *r = sum;
    }
    for (i, r) in result.into_iter().enumerate() {
        x[vec_index(n, incx, i)] = r;
    }
}

/// Banded triangular solve: `x := op(A)^{-1} * x`.
///
/// Forward/back substitution over logical indices; the band limits each
/// inner reduction to at most `k` terms.
pub fn tbsv<T: Real>(
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    n: usize,
    k: usize,
    ab: &[T],
    lda: usize,
    x: &mut [T],
    incx: isize,
) {
    if n == 0 {
        return;
    }
    let acc = TriAccess {
        store: ab,
        get: move |s: &[T], i, j| banded_get(uplo, k, lda, s, i, j),
        trans: trans.is_trans(),
        unit: diag == Diag::Unit,
    };
    let eff_uplo = if trans.is_trans() { uplo.flip() } else { uplo };

    // Gather, substitute, scatter: keeps the substitution loops readable
    // for either sign of incx.
    let mut b: Vec<T> = (0..n).map(|i| x[vec_index(n, incx, i)]).collect();

    match eff_uplo {
        Uplo::Upper => {
            // Back substitution.
            for i in (0..n).rev() {
                let hi = (i + k).min(n - 1);
                let mut sum = b[i];
                for j in (i + 1)..=hi {
                    sum -= acc.at(i, j) * b[j];
                }
                b[i] = sum / acc.at(i, i);
            }
        }
        Uplo::Lower => {
            // Forward substitution.
            for i in 0..n {
                let lo = i.saturating_sub(k);
                let mut sum = b[i];
                for j in lo..i {
                    sum -= acc.at(i, j) * b[j];
                }
                b[i] = sum / acc.at(i, i);
            }
        }
    }

    for (i, v) in b.into_iter().enumerate() {
        x[vec_index(n, incx, i)] = v;
    }
}

/// Symmetric rank-1 update: `A := A + alpha * x * x^T`.
///
/// Only the `uplo` triangle of the dense column-major `a` is referenced
/// and updated.
pub fn syr<T: Real>(uplo: Uplo, n: usize, alpha: T, x: &[T], incx: isize, a: &mut [T], lda: usize) {
    for j in 0..n {
        let xj = x[vec_index(n, incx, j)];
        let (lo, hi) = match uplo {
            Uplo::Upper => (0, j),
            Uplo::Lower => (j, n - 1),
        };
        for i in lo..=hi {
            let xi = x[vec_index(n, incx, i)];
            a[i + j * lda] += alpha * xi * xj;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tpmv_upper_all_ones() {
        // 4x4 upper triangle of ones, x = [1,2,3,4]: each output element is
        // the suffix sum of x.
        let n = 4;
        let ap = vec![1.0f64; 10];
        let mut x = vec![1.0, 2.0, 3.0, 4.0];
        tpmv(Uplo::Upper, Transpose::NoTrans, Diag::NonUnit, n, &ap, &mut x, 1);
        assert_eq!(x, vec![10.0, 9.0, 7.0, 4.0]);
    }

    #[test]
    fn test_tpmv_lower_all_ones() {
        let n = 4;
        let ap = vec![1.0f64; 10];
        let mut x = vec![1.0, 2.0, 3.0, 4.0];
        tpmv(Uplo::Lower, Transpose::NoTrans, Diag::NonUnit, n, &ap, &mut x, 1);
        // Prefix sums.
        assert_eq!(x, vec![1.0, 3.0, 6.0, 10.0]);
    }

    #[test]
    fn test_tpmv_trans_matches_flipped_triangle_of_ones() {
        // For an all-ones triangle, op(A)^T over Upper equals NoTrans over
        // Lower.
        let n = 3;
        let ap = vec![1.0f32; 6];
        let mut xt = vec![1.0, 2.0, 3.0];
        let mut xl = xt.clone();
        tpmv(Uplo::Upper, Transpose::Trans, Diag::NonUnit, n, &ap, &mut xt, 1);
        tpmv(Uplo::Lower, Transpose::NoTrans, Diag::NonUnit, n, &ap, &mut xl, 1);
        assert_eq!(xt, xl);
    }

    #[test]
    fn test_tpmv_unit_diag_ignores_stored_diagonal() {
        // Upper 2x2 packed: [d0, a01, d1] with poisoned diagonal entries.
        let ap = vec![99.0f64, 2.0, 99.0];
        let mut x = vec![1.0, 1.0];
        tpmv(Uplo::Upper, Transpose::NoTrans, Diag::Unit, 2, &ap, &mut x, 1);
        // Row 0: 1*1 + 2*1 = 3; row 1: 1*1.
        assert_eq!(x, vec![3.0, 1.0]);
    }

    #[test]
    fn test_tpmv_strided() {
        let n = 3;
        let ap = vec![1.0f64; 6];
        // Logical x = [1, 2, 3] at stride 2.
        let mut x = vec![1.0, -1.0, 2.0, -1.0, 3.0];
        tpmv(Uplo::Upper, Transpose::NoTrans, Diag::NonUnit, n, &ap, &mut x, 2);
        assert_eq!(x, vec![6.0, -1.0, 5.0, -1.0, 3.0]);
    }

    #[test]
    fn test_tbmv_diagonal_only_band() {
        // k = 0: pure diagonal scaling.
        let ab = vec![2.0f64, 3.0, 4.0];
        let mut x = vec![1.0, 1.0, 1.0];
        tbmv(Uplo::Upper, Transpose::NoTrans, Diag::NonUnit, 3, 0, &ab, 1, &mut x, 1);
        assert_eq!(x, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_tbmv_upper_bidiagonal() {
        // n=3, k=1 upper: diagonal [1,2,3], superdiagonal [4,5].
        // Banded col-major (lda=2): col j holds [super(j), diag(j)].
        let ab = vec![0.0f64, 1.0, 4.0, 2.0, 5.0, 3.0];
        let mut x = vec![1.0, 1.0, 1.0];
        tbmv(Uplo::Upper, Transpose::NoTrans, Diag::NonUnit, 3, 1, &ab, 2, &mut x, 1);
        // [1+4, 2+5, 3]
        assert_eq!(x, vec![5.0, 7.0, 3.0]);
    }

    #[test]
    fn test_tbsv_inverts_tbmv() {
        // Diagonally dominant lower bidiagonal, solve must recover input.
        // n=3, k=1 lower, lda=2: col j holds [diag(j), sub(j)].
        let ab = vec![4.0f64, 1.0, 5.0, 2.0, 6.0, 0.0];
        let x_known = vec![1.0, 2.0, 3.0];
        let mut b = x_known.clone();
        tbmv(Uplo::Lower, Transpose::NoTrans, Diag::NonUnit, 3, 1, &ab, 2, &mut b, 1);
        tbsv(Uplo::Lower, Transpose::NoTrans, Diag::NonUnit, 3, 1, &ab, 2, &mut b, 1);
        for (got, want) in b.iter().zip(&x_known) {
            assert!((got - want).abs() < 1e-12, "got {got}, want {want}");
        }
    }

    #[test]
    fn test_tbsv_trans_inverts_tbmv_trans() {
        let ab = vec![4.0f64, 1.0, 5.0, 2.0, 6.0, 0.0];
        let x_known = vec![-1.0, 0.5, 2.0];
        let mut b = x_known.clone();
        tbmv(Uplo::Lower, Transpose::Trans, Diag::NonUnit, 3, 1, &ab, 2, &mut b, 1);
        tbsv(Uplo::Lower, Transpose::Trans, Diag::NonUnit, 3, 1, &ab, 2, &mut b, 1);
        for (got, want) in b.iter().zip(&x_known) {
            assert!((got - want).abs() < 1e-12);
        }
    }

    #[test]
    fn test_syr_upper() {
        let n = 2;
        let mut a = vec![0.0f64; 4];
        let x = vec![1.0, 2.0];
        syr(Uplo::Upper, n, 2.0, &x, 1, &mut a, 2);
        // A += 2 * x x^T, upper triangle only (col-major).
        assert_eq!(a, vec![2.0, 0.0, 4.0, 8.0]);
    }

    #[test]
    fn test_syr_lower_leaves_upper_untouched() {
        let n = 3;
        let mut a = vec![7.0f32; 9];
        let x = vec![1.0, 1.0, 1.0];
        syr(Uplo::Lower, n, 1.0, &x, 1, &mut a, 3);
        // Strictly-upper entries (0,1), (0,2), (1,2) keep their sentinel.
        assert_eq!(a[3], 7.0);
        assert_eq!(a[6], 7.0);
        assert_eq!(a[7], 7.0);
        // Diagonal and lower got the update.
        assert_eq!(a[0], 8.0);
        assert_eq!(a[1], 8.0);
    }
}
