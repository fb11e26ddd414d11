//! Status contract of the device library and the transport fault type.

use thiserror::Error;

/// Status returned by every device BLAS entry point.
///
/// Mirrors the wrapped-library contract: degenerate shapes quick-return
/// `Success`, malformed arguments return `InvalidValue` without touching any
/// buffer, and `AllocFailed` signals device-side workspace exhaustion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "device status must be checked"]
pub enum Status {
    Success,
    InvalidValue,
    AllocFailed,
    /// Handle or stream used after teardown.
    NotInitialized,
}

impl Status {
    #[inline]
    pub fn is_success(self) -> bool {
        self == Status::Success
    }
}

/// Host↔device transport fault.
///
/// Always fatal to the current test case: the harness propagates these
/// immediately and never retries.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("device allocation of {bytes} bytes failed (arena exhausted)")]
    AllocFailed { bytes: usize },

    #[error("host-to-device copy length mismatch: host {host} elements, device {device}")]
    HostToDevice { host: usize, device: usize },

    #[error("device-to-host copy length mismatch: device {device} elements, host {host}")]
    DeviceToHost { device: usize, host: usize },

    #[error("submatrix copy out of bounds: {rows}x{cols} block, ld {ld}, buffer {len} elements")]
    OutOfBounds {
        rows: usize,
        cols: usize,
        ld: usize,
        len: usize,
    },

    #[error("batch index {index} out of range for batch count {count}")]
    BadBatchIndex { index: usize, count: usize },
}
