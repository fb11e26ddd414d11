//! # Calibra Clients
//!
//! The validation engine: everything needed to drive one configured BLAS
//! operation end-to-end against the device under test and the CPU reference
//! oracle, and report a verdict.
//!
//! Each routine family has a `testing_*` shim in [`testing`] following one
//! canonical sequence:
//!
//! 1. pre-check: malformed descriptors are probed against the device with
//!    placeholder buffers and must come back `InvalidValue`; degenerate
//!    shapes must come back `Success` (quick return);
//! 2. initialize host operands (deterministic, seeded, NaN-free by default);
//! 3. transfer to device, invoke the device routine (under each applicable
//!    pointer mode), copy results back;
//! 4. run the reference oracle on the host copies (per batch when batched);
//! 5. compare element-wise (unit check) and/or by Frobenius norm
//!    (norm check);
//! 6. optionally run the cold + hot timing loop and attach a perf record.
//!
//! Transport faults abort the case via `Err`; numeric mismatches are
//! recorded in the returned [`report::CaseReport`] without aborting sibling
//! cases.

pub mod arguments;
pub mod batch;
pub mod checks;
pub mod init;
pub mod perf;
pub mod report;
pub mod setup;
pub mod testing;

pub use arguments::{Api, Arguments, InitKind};
pub use batch::HostBatch;
pub use report::{CaseReport, CheckFailure, HarnessError};
pub use testing::{
    testing_dgmm_batched, testing_rot_strided_batched, testing_set_get_matrix,
    testing_syr_batched, testing_tbsv_strided_batched, testing_tpmv,
    testing_tpmv_strided_batched,
};
