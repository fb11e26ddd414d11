//! Device BLAS Level 1: vector-vector kernels.

use calibra_core::{Real, Status};

use crate::handle::{Handle, Scalar};
use crate::memory::DeviceVec;

// Storage index of logical element i of a strided vector starting at
// `base`; negative increments walk backwards per the CBLAS convention.
#[inline]
fn at(base: usize, n: usize, inc: i64, i: usize) -> usize {
    if inc >= 0 {
        base + i * inc as usize
    } else {
        base + (n - 1 - i) * (-inc) as usize
    }
}

/// Strided-batched Givens rotation:
///
/// ```text
/// x[i] :=  c*x[i] + s*y[i]
/// y[i] := -s*x[i] + c*y[i]
/// ```
///
/// applied independently to `batch_count` vector pairs at strides
/// `stride_x`/`stride_y`. Degenerate `n <= 0` or `batch_count <= 0` is a
/// success/no-op; the coefficient location must match the handle's pointer
/// mode.
pub fn rot_strided_batched<T: Real>(
    handle: &Handle,
    n: i64,
    x: Option<&mut DeviceVec<T>>,
    incx: i64,
    stride_x: i64,
    y: Option<&mut DeviceVec<T>>,
    incy: i64,
    stride_y: i64,
    c: Scalar<'_, T>,
    s: Scalar<'_, T>,
    batch_count: i64,
) -> Status {
    if n <= 0 || batch_count <= 0 {
        return Status::Success;
    }
    if stride_x < 0 || stride_y < 0 {
        return Status::InvalidValue;
    }
    let (Some(c), Some(s)) = (handle.read_scalar(c), handle.read_scalar(s)) else {
        return Status::InvalidValue;
    };
    let (Some(x), Some(y)) = (x, y) else {
        return Status::InvalidValue;
    };

    let n_u = n as usize;
    let (sx, sy) = (stride_x as usize, stride_y as usize);
    let span_x = (batch_count as usize - 1) * sx + n_u * incx.unsigned_abs() as usize;
    let span_y = (batch_count as usize - 1) * sy + n_u * incy.unsigned_abs() as usize;
    if x.data.len() < span_x.max(1) || y.data.len() < span_y.max(1) {
        return Status::InvalidValue;
    }

    for b in 0..batch_count as usize {
        let (bx, by) = (b * sx, b * sy);
        for i in 0..n_u {
            let ix = at(bx, n_u, incx, i);
            let iy = at(by, n_u, incy, i);
            let xi = x.data[ix];
            let yi = y.data[iy];
            x.data[ix] = c * xi + s * yi;
            y.data[iy] = c * yi - s * xi;
        }
    }
    Status::Success
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Device;

    #[test]
    fn test_rot_quick_return() {
        let dev = Device::new();
        let handle = Handle::new(&dev);
        let st = rot_strided_batched::<f32>(
            &handle,
            0,
            None,
            1,
            0,
            None,
            1,
            0,
            Scalar::Host(1.0),
            Scalar::Host(0.0),
            5,
        );
        assert_eq!(st, Status::Success);
    }

    #[test]
    fn test_rot_missing_buffer_is_invalid() {
        let dev = Device::new();
        let handle = Handle::new(&dev);
        let st = rot_strided_batched::<f32>(
            &handle,
            4,
            None,
            1,
            4,
            None,
            1,
            4,
            Scalar::Host(1.0),
            Scalar::Host(0.0),
            1,
        );
        assert_eq!(st, Status::InvalidValue);
    }

    #[test]
    fn test_rot_swaps_with_quarter_turn() {
        let dev = Device::new();
        let handle = Handle::new(&dev);
        let mut dx = dev.alloc::<f64>(2).unwrap();
        let mut dy = dev.alloc::<f64>(2).unwrap();
        dx.transfer_from(&[1.0, 2.0]).unwrap();
        dy.transfer_from(&[3.0, 4.0]).unwrap();
        let st = rot_strided_batched(
            &handle,
            2,
            Some(&mut dx),
            1,
            2,
            Some(&mut dy),
            1,
            2,
            Scalar::Host(0.0),
            Scalar::Host(1.0),
            1,
        );
        assert_eq!(st, Status::Success);
        let mut hx = vec![0.0; 2];
        let mut hy = vec![0.0; 2];
        dx.transfer_to(&mut hx).unwrap();
        dy.transfer_to(&mut hy).unwrap();
        assert_eq!(hx, vec![3.0, 4.0]);
        assert_eq!(hy, vec![-1.0, -2.0]);
    }

    #[test]
    fn test_rot_pointer_mode_mismatch() {
        let dev = Device::new();
        let handle = Handle::new(&dev); // host mode
        let d_c = dev.alloc_scalar::<f64>().unwrap();
        let mut dx = dev.alloc::<f64>(2).unwrap();
        let mut dy = dev.alloc::<f64>(2).unwrap();
        let st = rot_strided_batched(
            &handle,
            2,
            Some(&mut dx),
            1,
            2,
            Some(&mut dy),
            1,
            2,
            Scalar::Device(&d_c),
            Scalar::Host(0.0),
            1,
        );
        assert_eq!(st, Status::InvalidValue);
    }
}
