//! Device BLAS Level 2: matrix-vector kernels on packed triangular, banded
//! triangular, and symmetric matrices.
//!
//! Kernels run in place with loop direction chosen so each element is read
//! before it is overwritten, the classic triangular update order. Entry
//! points perform the defensive argument checking the harness validates:
//! malformed arguments return `InvalidValue` without touching any buffer,
//! degenerate shapes quick-return `Success`.

use calibra_core::{banded_index, packed_length, Diag, Real, Status, Transpose, Uplo};

use crate::handle::{Handle, Scalar};
use crate::memory::{DeviceBatch, DeviceVec};

#[inline]
fn at(base: usize, n: usize, inc: i64, i: usize) -> usize {
    if inc >= 0 {
        base + i * inc as usize
    } else {
        base + (n - 1 - i) * (-inc) as usize
    }
}

// Packed column-major triangle indexing.
#[inline]
fn pk_upper(i: usize, j: usize) -> usize {
    i + j * (j + 1) / 2
}

#[inline]
fn pk_lower(n: usize, i: usize, j: usize) -> usize {
    // Column j starts after j stored columns of lengths n, n-1, ...
    (i - j) + j * (2 * n + 1 - j) / 2
}

/// In-place packed triangular matrix-vector multiply on one batch.
fn tpmv_kernel<T: Real>(
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    n: usize,
    ap: &[T],
    x: &mut [T],
    base: usize,
    incx: i64,
) {
    let unit = diag == Diag::Unit;
    match (uplo, trans.is_trans()) {
        (Uplo::Upper, false) => {
            // Ascending: row i only reads x[j] for j >= i.
            for i in 0..n {
                let xi = x[at(base, n, incx, i)];
                let mut sum = if unit { xi } else { ap[pk_upper(i, i)] * xi };
                for j in (i + 1)..n {
                    sum += ap[pk_upper(i, j)] * x[at(base, n, incx, j)];
                }
                x[at(base, n, incx, i)] = sum;
            }
        }
        (Uplo::Lower, false) => {
            // Descending: row i only reads x[j] for j <= i.
            for i in (0..n).rev() {
                let xi = x[at(base, n, incx, i)];
                let mut sum = if unit { xi } else { ap[pk_lower(n, i, i)] * xi };
                for j in 0..i {
                    sum += ap[pk_lower(n, i, j)] * x[at(base, n, incx, j)];
                }
                x[at(base, n, incx, i)] = sum;
            }
        }
        (Uplo::Upper, true) => {
            // op(A) is lower triangular; stored element is A(j, i).
            for i in (0..n).rev() {
                let xi = x[at(base, n, incx, i)];
                let mut sum = if unit { xi } else { ap[pk_upper(i, i)] * xi };
                for j in 0..i {
                    sum += ap[pk_upper(j, i)] * x[at(base, n, incx, j)];
                }
                x[at(base, n, incx, i)] = sum;
            }
        }
        (Uplo::Lower, true) => {
            // op(A) is upper triangular; stored element is A(j, i).
            for i in 0..n {
                let xi = x[at(base, n, incx, i)];
                let mut sum = if unit { xi } else { ap[pk_lower(n, i, i)] * xi };
                for j in (i + 1)..n {
                    sum += ap[pk_lower(n, j, i)] * x[at(base, n, incx, j)];
                }
                x[at(base, n, incx, i)] = sum;
            }
        }
    }
}

/// In-place banded triangular solve on one batch.
fn tbsv_kernel<T: Real>(
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    n: usize,
    k: usize,
    ab: &[T],
    lda: usize,
    x: &mut [T],
    base: usize,
    incx: i64,
) {
    let unit = diag == Diag::Unit;
    let op = |i: usize, j: usize| -> T {
        if trans.is_trans() {
            ab[banded_index(uplo, k, lda, j, i)]
        } else {
            ab[banded_index(uplo, k, lda, i, j)]
        }
    };
    let eff_uplo = if trans.is_trans() { uplo.flip() } else { uplo };

    match eff_uplo {
        Uplo::Upper => {
            // Back substitution.
            for i in (0..n).rev() {
                let mut sum = x[at(base, n, incx, i)];
                for j in (i + 1)..=(i + k).min(n - 1) {
                    sum -= op(i, j) * x[at(base, n, incx, j)];
                }
                x[at(base, n, incx, i)] = if unit { sum } else { sum / op(i, i) };
            }
        }
        Uplo::Lower => {
            // Forward substitution.
            for i in 0..n {
                let mut sum = x[at(base, n, incx, i)];
                for j in i.saturating_sub(k)..i {
                    sum -= op(i, j) * x[at(base, n, incx, j)];
                }
                x[at(base, n, incx, i)] = if unit { sum } else { sum / op(i, i) };
            }
        }
    }
}

/// Symmetric rank-1 update on one batch: `A := A + alpha * x * x^T`.
fn syr_kernel<T: Real>(uplo: Uplo, n: usize, alpha: T, x: &[T], incx: i64, a: &mut [T], lda: usize) {
    for i in 0..n {
        let xi = x[at(0, n, incx, i)];
        let (lo, hi) = match uplo {
            Uplo::Upper => (i, n - 1),
            Uplo::Lower => (0, i),
        };
        for j in lo..=hi {
            let xj = x[at(0, n, incx, j)];
            a[i + j * lda] += alpha * xi * xj;
        }
    }
}

/// Packed triangular matrix-vector multiply: `x := op(A) * x`.
pub fn tpmv<T: Real>(
    handle: &Handle,
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    n: i64,
    ap: Option<&DeviceVec<T>>,
    x: Option<&mut DeviceVec<T>>,
    incx: i64,
) -> Status {
    let _ = handle;
    if n < 0 || incx == 0 {
        return Status::InvalidValue;
    }
    if n == 0 {
        return Status::Success;
    }
    let (Some(ap), Some(x)) = (ap, x) else {
        return Status::InvalidValue;
    };
    let n_u = n as usize;
    let span_x = (n_u - 1) * incx.unsigned_abs() as usize + 1;
    if ap.data.len() < packed_length(n_u) || x.data.len() < span_x {
        return Status::InvalidValue;
    }
    tpmv_kernel(uplo, trans, diag, n_u, &ap.data, &mut x.data, 0, incx);
    Status::Success
}

/// Strided-batched packed triangular matrix-vector multiply.
pub fn tpmv_strided_batched<T: Real>(
    handle: &Handle,
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    n: i64,
    ap: Option<&DeviceVec<T>>,
    stride_a: i64,
    x: Option<&mut DeviceVec<T>>,
    incx: i64,
    stride_x: i64,
    batch_count: i64,
) -> Status {
    let _ = handle;
    if n < 0 || incx == 0 || batch_count < 0 {
        return Status::InvalidValue;
    }
    if n == 0 || batch_count == 0 {
        return Status::Success;
    }
    if stride_a < 0 || stride_x < 0 {
        return Status::InvalidValue;
    }
    let (Some(ap), Some(x)) = (ap, x) else {
        return Status::InvalidValue;
    };
    let n_u = n as usize;
    let batches = batch_count as usize;
    let (sa, sx) = (stride_a as usize, stride_x as usize);
    let span_a = (batches - 1) * sa + packed_length(n_u);
    let span_x = (batches - 1) * sx + (n_u - 1) * incx.unsigned_abs() as usize + 1;
    if ap.data.len() < span_a || x.data.len() < span_x {
        return Status::InvalidValue;
    }
    for b in 0..batches {
        let ap_b = &ap.data[b * sa..b * sa + packed_length(n_u)];
        tpmv_kernel(uplo, trans, diag, n_u, ap_b, &mut x.data, b * sx, incx);
    }
    Status::Success
}

/// Strided-batched banded triangular solve: `x := op(A)^{-1} * x`.
pub fn tbsv_strided_batched<T: Real>(
    handle: &Handle,
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    n: i64,
    k: i64,
    ab: Option<&DeviceVec<T>>,
    lda: i64,
    stride_a: i64,
    x: Option<&mut DeviceVec<T>>,
    incx: i64,
    stride_x: i64,
    batch_count: i64,
) -> Status {
    let _ = handle;
    if n < 0 || k < 0 || lda < k + 1 || incx == 0 || batch_count < 0 {
        return Status::InvalidValue;
    }
    if n == 0 || batch_count == 0 {
        return Status::Success;
    }
    if stride_a < 0 || stride_x < 0 {
        return Status::InvalidValue;
    }
    let (Some(ab), Some(x)) = (ab, x) else {
        return Status::InvalidValue;
    };
    let (n_u, k_u, lda_u) = (n as usize, k as usize, lda as usize);
    let batches = batch_count as usize;
    let (sa, sx) = (stride_a as usize, stride_x as usize);
    let span_a = (batches - 1) * sa + lda_u * n_u;
    let span_x = (batches - 1) * sx + (n_u - 1) * incx.unsigned_abs() as usize + 1;
    if ab.data.len() < span_a || x.data.len() < span_x {
        return Status::InvalidValue;
    }
    for b in 0..batches {
        let ab_b = &ab.data[b * sa..b * sa + lda_u * n_u];
        tbsv_kernel(uplo, trans, diag, n_u, k_u, ab_b, lda_u, &mut x.data, b * sx, incx);
    }
    Status::Success
}

/// Batched symmetric rank-1 update: `A[b] := A[b] + alpha * x[b] * x[b]^T`.
///
/// `alpha` is read according to the handle's pointer mode.
pub fn syr_batched<T: Real>(
    handle: &Handle,
    uplo: Uplo,
    n: i64,
    alpha: Scalar<'_, T>,
    x: Option<&DeviceBatch<T>>,
    incx: i64,
    a: Option<&mut DeviceBatch<T>>,
    lda: i64,
    batch_count: i64,
) -> Status {
    if n < 0 || incx == 0 || lda < n || lda < 1 || batch_count < 0 {
        return Status::InvalidValue;
    }
    if n == 0 || batch_count == 0 {
        return Status::Success;
    }
    let Some(alpha) = handle.read_scalar(alpha) else {
        return Status::InvalidValue;
    };
    let (Some(x), Some(a)) = (x, a) else {
        return Status::InvalidValue;
    };
    let (n_u, lda_u) = (n as usize, lda as usize);
    let batches = batch_count as usize;
    if x.batches.len() < batches || a.batches.len() < batches {
        return Status::InvalidValue;
    }
    let span_x = (n_u - 1) * incx.unsigned_abs() as usize + 1;
    for b in 0..batches {
        if x.batches[b].len() < span_x || a.batches[b].len() < lda_u * n_u {
            return Status::InvalidValue;
        }
    }
    for b in 0..batches {
        syr_kernel(uplo, n_u, alpha, &x.batches[b], incx, &mut a.batches[b], lda_u);
    }
    Status::Success
}
