//! Level 3 reference kernels: matrix-matrix operations.

use crate::vec_index;
use calibra_core::{Real, Side};

/// Diagonal matrix multiply:
///
/// ```text
/// side = Right:  C := A * diag(x)      (x has n entries)
/// side = Left:   C := diag(x) * A      (x has m entries)
/// ```
///
/// `a` and `c` are dense column-major with leading dimensions `lda`/`ldc`.
pub fn dgmm<T: Real>(
    side: Side,
    m: usize,
    n: usize,
    a: &[T],
    lda: usize,
    x: &[T],
    incx: isize,
    c: &mut [T],
    ldc: usize,
) {
    let k = match side {
        Side::Right => n,
        Side::Left => m,
    };
    for j in 0..n {
        for i in 0..m {
            let scale = match side {
                Side::Right => x[vec_index(k, incx, j)],
                Side::Left => x[vec_index(k, incx, i)],
            };
            c[i + j * ldc] = a[i + j * lda] * scale;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dgmm_right() {
        // A = [[1,2],[3,4]] col-major, x = [2,3]: scales columns.
        let a = vec![1.0f64, 3.0, 2.0, 4.0];
        let x = vec![2.0, 3.0];
        let mut c = vec![0.0; 4];
        dgmm(Side::Right, 2, 2, &a, 2, &x, 1, &mut c, 2);
        // C = [[2,6],[6,12]] col-major.
        assert_eq!(c, vec![2.0, 6.0, 6.0, 12.0]);
    }

    #[test]
    fn test_dgmm_left() {
        // diag(x) * A scales rows.
        let a = vec![1.0f64, 3.0, 2.0, 4.0];
        let x = vec![2.0, 3.0];
        let mut c = vec![0.0; 4];
        dgmm(Side::Left, 2, 2, &a, 2, &x, 1, &mut c, 2);
        assert_eq!(c, vec![2.0, 9.0, 4.0, 12.0]);
    }

    #[test]
    fn test_dgmm_negative_incx() {
        // incx = -1 reads the diagonal reversed.
        let a = vec![1.0f32, 1.0, 1.0, 1.0];
        let x = vec![5.0, 7.0];
        let mut c = vec![0.0; 4];
        dgmm(Side::Right, 2, 2, &a, 2, &x, -1, &mut c, 2);
        // Logical diagonal is [7, 5].
        assert_eq!(c, vec![7.0, 7.0, 5.0, 5.0]);
    }

    #[test]
    fn test_dgmm_respects_leading_dimensions() {
        // lda = 3 with one padding row; ldc = 4 with two.
        let a = vec![1.0f64, 2.0, -9.0, 3.0, 4.0, -9.0];
        let x = vec![10.0, 100.0];
        let mut c = vec![0.0; 8];
        dgmm(Side::Right, 2, 2, &a, 3, &x, 1, &mut c, 4);
        assert_eq!(c[0], 10.0);
        assert_eq!(c[1], 20.0);
        assert_eq!(c[4], 300.0);
        assert_eq!(c[5], 400.0);
        // Padding untouched.
        assert_eq!(c[2], 0.0);
        assert_eq!(c[3], 0.0);
    }
}
