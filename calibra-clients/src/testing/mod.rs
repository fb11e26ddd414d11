//! Per-routine test shims.
//!
//! One module per routine family, each following the canonical validation
//! sequence described in the crate docs. Shims return a [`CaseReport`]
//! (numeric mismatches recorded, never panicking) and propagate transport
//! faults and unexpected device statuses as [`HarnessError`].
//!
//! [`CaseReport`]: crate::report::CaseReport
//! [`HarnessError`]: crate::report::HarnessError

mod dgmm_batched;
mod rot_strided_batched;
mod set_get_matrix;
mod syr_batched;
mod tbsv_strided_batched;
mod tpmv;
mod tpmv_strided_batched;

pub use dgmm_batched::testing_dgmm_batched;
pub use rot_strided_batched::testing_rot_strided_batched;
pub use set_get_matrix::testing_set_get_matrix;
pub use syr_batched::testing_syr_batched;
pub use tbsv_strided_batched::testing_tbsv_strided_batched;
pub use tpmv::testing_tpmv;
pub use tpmv_strided_batched::testing_tpmv_strided_batched;
