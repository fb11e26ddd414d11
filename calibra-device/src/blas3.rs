//! Device BLAS Level 3: matrix-matrix kernels.

use calibra_core::{Real, Side, Status};

use crate::handle::Handle;
use crate::memory::DeviceBatch;

#[inline]
fn at(n: usize, inc: i64, i: usize) -> usize {
    if inc >= 0 {
        i * inc as usize
    } else {
        (n - 1 - i) * (-inc) as usize
    }
}

/// Diagonal matrix multiply on one batch: column sweeps for the right side
/// (one scale per column), element-wise row scaling for the left.
fn dgmm_kernel<T: Real>(
    side: Side,
    m: usize,
    n: usize,
    a: &[T],
    lda: usize,
    x: &[T],
    incx: i64,
    c: &mut [T],
    ldc: usize,
) {
    match side {
        Side::Right => {
            for j in 0..n {
                let scale = x[at(n, incx, j)];
                for i in 0..m {
                    c[i + j * ldc] = a[i + j * lda] * scale;
                }
            }
        }
        Side::Left => {
            for j in 0..n {
                for i in 0..m {
                    c[i + j * ldc] = a[i + j * lda] * x[at(m, incx, i)];
                }
            }
        }
    }
}

/// Batched diagonal matrix multiply:
///
/// ```text
/// side = Right:  C[b] := A[b] * diag(x[b])
/// side = Left:   C[b] := diag(x[b]) * A[b]
/// ```
pub fn dgmm_batched<T: Real>(
    handle: &Handle,
    side: Side,
    m: i64,
    n: i64,
    a: Option<&DeviceBatch<T>>,
    lda: i64,
    x: Option<&DeviceBatch<T>>,
    incx: i64,
    c: Option<&mut DeviceBatch<T>>,
    ldc: i64,
    batch_count: i64,
) -> Status {
    let _ = handle;
    if m < 0 || n < 0 || ldc < m || lda < m || batch_count < 0 {
        return Status::InvalidValue;
    }
    if m == 0 || n == 0 || batch_count == 0 {
        return Status::Success;
    }
    let (Some(a), Some(x), Some(c)) = (a, x, c) else {
        return Status::InvalidValue;
    };
    let (m_u, n_u) = (m as usize, n as usize);
    let (lda_u, ldc_u) = (lda as usize, ldc as usize);
    let batches = batch_count as usize;
    let k = match side {
        Side::Right => n_u,
        Side::Left => m_u,
    };
    if a.batches.len() < batches || x.batches.len() < batches || c.batches.len() < batches {
        return Status::InvalidValue;
    }
    let span_x = if incx == 0 {
        1
    } else {
        (k - 1) * incx.unsigned_abs() as usize + 1
    };
    for b in 0..batches {
        if a.batches[b].len() < lda_u * n_u
            || x.batches[b].len() < span_x
            || c.batches[b].len() < ldc_u * n_u
        {
            return Status::InvalidValue;
        }
    }
    for b in 0..batches {
        dgmm_kernel(
            side,
            m_u,
            n_u,
            &a.batches[b],
            lda_u,
            &x.batches[b],
            incx,
            &mut c.batches[b],
            ldc_u,
        );
    }
    Status::Success
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Device;

    #[test]
    fn test_dgmm_right_known_answer() {
        let dev = Device::new();
        let handle = Handle::new(&dev);
        let mut d_a = dev.alloc_batch::<f64>(4, 1).unwrap();
        let mut d_x = dev.alloc_batch::<f64>(2, 1).unwrap();
        let mut d_c = dev.alloc_batch::<f64>(4, 1).unwrap();
        // A = [[1,2],[3,4]] col-major, x = [2,3].
        d_a.transfer_from(&[vec![1.0, 3.0, 2.0, 4.0]]).unwrap();
        d_x.transfer_from(&[vec![2.0, 3.0]]).unwrap();
        let st = dgmm_batched(
            &handle,
            Side::Right,
            2,
            2,
            Some(&d_a),
            2,
            Some(&d_x),
            1,
            Some(&mut d_c),
            2,
            1,
        );
        assert_eq!(st, Status::Success);
        let mut out = vec![vec![0.0; 4]];
        d_c.transfer_to(&mut out).unwrap();
        assert_eq!(out[0], vec![2.0, 6.0, 6.0, 12.0]);
    }

    #[test]
    fn test_dgmm_invalid_ld() {
        let dev = Device::new();
        let handle = Handle::new(&dev);
        let st = dgmm_batched::<f32>(
            &handle,
            Side::Left,
            4,
            2,
            None,
            2, // lda < m
            None,
            1,
            None,
            4,
            1,
        );
        assert_eq!(st, Status::InvalidValue);
    }

    #[test]
    fn test_dgmm_quick_return_zero_batch() {
        let dev = Device::new();
        let handle = Handle::new(&dev);
        let st = dgmm_batched::<f32>(
            &handle,
            Side::Left,
            2,
            2,
            None,
            2,
            None,
            1,
            None,
            2,
            0,
        );
        assert_eq!(st, Status::Success);
    }
}
