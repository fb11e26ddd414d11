//! Level 1 reference kernels: vector-vector operations.

use crate::vec_index;
use calibra_core::Real;

/// Givens plane rotation:
///
/// ```text
/// x[i] :=  c*x[i] + s*y[i]
/// y[i] := -s*x[i] + c*y[i]
/// ```
///
/// Applied element-wise over logical indices; negative increments walk the
/// storage backwards.
pub fn rot<T: Real>(n: usize, x: &mut [T], incx: isize, y: &mut [T], incy: isize, c: T, s: T) {
    for i in 0..n {
        let ix = vec_index(n, incx, i);
        let iy = vec_index(n, incy, i);
        let xi = x[ix];
        let yi = y[iy];
        x[ix] = c * xi + s * yi;
        y[iy] = c * yi - s * xi;
    }
}
