// BLAS entry points match the wrapped-library signatures — many parameters
// are inherent to the API.
#![allow(clippy::too_many_arguments)]

//! # Calibra Device
//!
//! The Device Under Test: a simulated device with an explicit memory arena,
//! streams with issue-order semantics, and a BLAS entry-point layer that
//! performs the full defensive argument checking the harness validates
//! (invalid-value status for malformed arguments, quick-return for
//! degenerate shapes) before dispatching kernels.
//!
//! Device memory is opaque to the host: contents are only observable
//! through explicit synchronizing copies (`transfer_to` / `get_matrix`),
//! mirroring the real host/device coherence contract. Kernel results are
//! only trustworthy after such a copy.
//!
//! Two calling conventions are exposed:
//! - the **native** typed API in [`blas1`]/[`blas2`]/[`blas3`], taking the
//!   flag enums from `calibra-core`;
//! - the **compat** API in [`compat`], taking single-character flag codes
//!   and otherwise identical raw arguments, for interop-path coverage.
//!
//! Both route to the same kernels; the harness exercises both.

pub mod blas1;
pub mod blas2;
pub mod blas3;
pub mod compat;
pub mod handle;
pub mod memory;

pub use handle::{Handle, PointerMode, Scalar};
pub use memory::{
    get_matrix, get_matrix_async, set_matrix, set_matrix_async, Device, DeviceBatch, DeviceScalar,
    DeviceVec, Stream,
};
