//! Interop calling convention: entry points taking single-character flag
//! codes instead of typed enums, otherwise identical to the native API.
//!
//! Mirrors the Fortran-heritage entry points of the wrapped library: flags
//! arrive as characters (`'U'`/`'L'`, `'N'`/`'T'`/`'C'`, ...), an unknown
//! code is an invalid-value condition. Every function decodes and delegates
//! to the native entry point so both conventions share one kernel path.

use calibra_core::{Diag, Real, Side, Status, Transpose, Uplo};

use crate::handle::{Handle, Scalar};
use crate::memory::{DeviceBatch, DeviceVec};
use crate::{blas1, blas2, blas3};

/// See [`blas2::tpmv`].
pub fn tpmv<T: Real>(
    handle: &Handle,
    uplo: u8,
    trans: u8,
    diag: u8,
    n: i64,
    ap: Option<&DeviceVec<T>>,
    x: Option<&mut DeviceVec<T>>,
    incx: i64,
) -> Status {
    let (Some(uplo), Some(trans), Some(diag)) = (
        Uplo::from_code(uplo),
        Transpose::from_code(trans),
        Diag::from_code(diag),
    ) else {
        return Status::InvalidValue;
    };
    blas2::tpmv(handle, uplo, trans, diag, n, ap, x, incx)
}

/// See [`blas2::tpmv_strided_batched`].
pub fn tpmv_strided_batched<T: Real>(
    handle: &Handle,
    uplo: u8,
    trans: u8,
    diag: u8,
    n: i64,
    ap: Option<&DeviceVec<T>>,
    stride_a: i64,
    x: Option<&mut DeviceVec<T>>,
    incx: i64,
    stride_x: i64,
    batch_count: i64,
) -> Status {
    let (Some(uplo), Some(trans), Some(diag)) = (
        Uplo::from_code(uplo),
        Transpose::from_code(trans),
        Diag::from_code(diag),
    ) else {
        return Status::InvalidValue;
    };
    blas2::tpmv_strided_batched(
        handle, uplo, trans, diag, n, ap, stride_a, x, incx, stride_x, batch_count,
    )
}

/// See [`blas2::tbsv_strided_batched`].
pub fn tbsv_strided_batched<T: Real>(
    handle: &Handle,
    uplo: u8,
    trans: u8,
    diag: u8,
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
    let (Some(uplo), Some(trans), Some(diag)) = (
        Uplo::from_code(uplo),
        Transpose::from_code(trans),
        Diag::from_code(diag),
    ) else {
        return Status::InvalidValue;
    };
    blas2::tbsv_strided_batched(
        handle, uplo, trans, diag, n, k, ab, lda, stride_a, x, incx, stride_x, batch_count,
    )
}

/// See [`blas2::syr_batched`].
pub fn syr_batched<T: Real>(
    handle: &Handle,
    uplo: u8,
    n: i64,
    alpha: Scalar<'_, T>,
    x: Option<&DeviceBatch<T>>,
    incx: i64,
    a: Option<&mut DeviceBatch<T>>,
    lda: i64,
    batch_count: i64,
) -> Status {
    let Some(uplo) = Uplo::from_code(uplo) else {
        return Status::InvalidValue;
    };
    blas2::syr_batched(handle, uplo, n, alpha, x, incx, a, lda, batch_count)
}

/// See [`blas1::rot_strided_batched`].
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
    blas1::rot_strided_batched(
        handle, n, x, incx, stride_x, y, incy, stride_y, c, s, batch_count,
    )
}

/// See [`blas3::dgmm_batched`].
pub fn dgmm_batched<T: Real>(
    handle: &Handle,
    side: u8,
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
    let Some(side) = Side::from_code(side) else {
        return Status::InvalidValue;
    };
    blas3::dgmm_batched(handle, side, m, n, a, lda, x, incx, c, ldc, batch_count)
}
