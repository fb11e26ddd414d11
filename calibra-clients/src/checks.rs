//! Result comparison: element-wise unit checks and aggregate norm checks.
//!
//! Unit checks are exact (bit-for-bit; NaN never matches) — test data is
//! drawn from small integer ranges so multiply-accumulate routines produce
//! exactly representable results. Solve-type routines instead compare
//! against a known solution through [`vector_norm_rel_1`] with an
//! epsilon-scaled tolerance via [`unit_check_error`].
//!
//! Unit and norm checks are independent: neither mutates the buffers the
//! other reads, so they may run in either order.

use calibra_core::Real;

use crate::report::CheckFailure;

/// Element-wise exact comparison of an `m` x `n` column-major block with
/// leading dimension `ld`. Padding outside the block is not compared.
pub fn unit_check<T: Real>(
    check: &'static str,
    batch: usize,
    m: usize,
    n: usize,
    ld: usize,
    gold: &[T],
    got: &[T],
) -> Result<(), CheckFailure> {
    for j in 0..n {
        for i in 0..m {
            let idx = i + j * ld;
            let (g, a) = (gold[idx], got[idx]);
            if g != a || g.is_nan() || a.is_nan() {
                return Err(CheckFailure {
                    check,
                    batch,
                    index: Some(idx),
                    expected: g.to_f64(),
                    actual: a.to_f64(),
                });
            }
        }
    }
    Ok(())
}

/// Element-wise exact comparison of one logical vector of `n` elements at
/// increment magnitude `inc_abs`, offset `base` into the buffers.
pub fn unit_check_vector<T: Real>(
    check: &'static str,
    batch: usize,
    n: usize,
    inc_abs: usize,
    base: usize,
    gold: &[T],
    got: &[T],
) -> Result<(), CheckFailure> {
    for i in 0..n {
        let idx = base + i * inc_abs;
        let (g, a) = (gold[idx], got[idx]);
        if g != a || g.is_nan() || a.is_nan() {
            return Err(CheckFailure {
                check,
                batch,
                index: Some(idx),
                expected: g.to_f64(),
                actual: a.to_f64(),
            });
        }
    }
    Ok(())
}

/// Assert an already-computed error magnitude is within tolerance.
pub fn unit_check_error(
    check: &'static str,
    batch: usize,
    error: f64,
    tolerance: f64,
) -> Result<(), CheckFailure> {
    if error.is_nan() || error > tolerance {
        Err(CheckFailure {
            check,
            batch,
            index: None,
            expected: tolerance,
            actual: error,
        })
    } else {
        Ok(())
    }
}

/// Relative Frobenius-norm error of an `m` x `n` column-major block:
/// `||gold - got||_F / ||gold||_F` (absolute norm when gold is zero).
pub fn norm_check<T: Real>(m: usize, n: usize, ld: usize, gold: &[T], got: &[T]) -> f64 {
    let mut diff = 0.0f64;
    let mut reference = 0.0f64;
    for j in 0..n {
        for i in 0..m {
            let idx = i + j * ld;
            let d = gold[idx].to_f64() - got[idx].to_f64();
            diff += d * d;
            let g = gold[idx].to_f64();
            reference += g * g;
        }
    }
    if reference > 0.0 {
        (diff / reference).sqrt()
    } else {
        diff.sqrt()
    }
}

/// Relative 1-norm error of one logical vector: `sum|gold - got| /
/// sum|gold|` (absolute when gold is zero). Used for solve verification.
pub fn vector_norm_rel_1<T: Real>(
    n: usize,
    inc_abs: usize,
    base: usize,
    gold: &[T],
    got: &[T],
) -> f64 {
    let mut diff = 0.0f64;
    let mut reference = 0.0f64;
    for i in 0..n {
        let idx = base + i * inc_abs;
        diff += (gold[idx].to_f64() - got[idx].to_f64()).abs();
        reference += gold[idx].to_f64().abs();
    }
    if reference > 0.0 {
        diff / reference
    } else {
        diff
    }
}

/// Tolerance for solve-type comparisons: `40 * epsilon(T) * n`.
pub fn solve_tolerance<T: Real>(n: usize) -> f64 {
    40.0 * T::EPSILON * n as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_check_exact_match() {
        let gold = vec![1.0f64, 2.0, 3.0, 4.0];
        assert!(unit_check("unit", 0, 2, 2, 2, &gold, &gold.clone()).is_ok());
    }

    #[test]
    fn test_unit_check_reports_first_mismatch() {
        let gold = vec![1.0f64, 2.0, 3.0, 4.0];
        let mut got = gold.clone();
        got[2] = 9.0;
        let f = unit_check("unit", 0, 2, 2, 2, &gold, &got).unwrap_err();
        assert_eq!(f.index, Some(2));
        assert_eq!(f.expected, 3.0);
        assert_eq!(f.actual, 9.0);
    }

    #[test]
    fn test_unit_check_skips_padding() {
        // ld = 3 with a poisoned padding row.
        let gold = vec![1.0f32, 2.0, 777.0, 3.0, 4.0, 777.0];
        let mut got = gold.clone();
        got[2] = -777.0;
        got[5] = -777.0;
        assert!(unit_check("unit", 0, 2, 2, 3, &gold, &got).is_ok());
    }

    #[test]
    fn test_unit_check_nan_never_matches() {
        let gold = vec![f64::NAN];
        let got = vec![f64::NAN];
        assert!(unit_check("unit", 0, 1, 1, 1, &gold, &got).is_err());
    }

    #[test]
    fn test_norm_check_zero_for_identical() {
        let a = vec![3.0f64, -4.0, 5.0, 1.0];
        assert_eq!(norm_check(2, 2, 2, &a, &a.clone()), 0.0);
    }

    #[test]
    fn test_norm_check_relative_magnitude() {
        let gold = vec![3.0f64, 4.0];
        let got = vec![3.0f64, 4.0 + 5.0 * 0.01]; // ||diff|| = 0.05, ||gold|| = 5
        let err = norm_check(2, 1, 2, &gold, &got);
        assert!((err - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_vector_norm_rel_1_strided() {
        let gold = vec![2.0f64, 0.0, 2.0];
        let got = vec![2.0f64, 99.0, 3.0]; // padding at 1 ignored
        let err = vector_norm_rel_1(2, 2, 0, &gold, &got);
        assert!((err - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_unit_check_error_tolerance() {
        assert!(unit_check_error("solve", 0, 1e-12, 1e-10).is_ok());
        assert!(unit_check_error("solve", 0, 1e-8, 1e-10).is_err());
        assert!(unit_check_error("solve", 0, f64::NAN, 1e-10).is_err());
    }

    #[test]
    fn test_solve_tolerance_scales_with_n() {
        assert!(solve_tolerance::<f64>(100) > solve_tolerance::<f64>(10));
        assert!(solve_tolerance::<f32>(10) > solve_tolerance::<f64>(10));
    }
}
