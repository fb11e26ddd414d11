//! # Calibra Core
//!
//! Shared foundation for the calibra BLAS validation harness.
//!
//! This crate provides:
//! - **Flag enums**: BLAS fill/transpose/diagonal/side specifiers with the
//!   single-character wire codes used by the interop calling convention.
//! - **Status codes**: the status contract every device entry point returns
//!   (success / invalid value / allocation failure), plus the transport
//!   fault type for host↔device copies.
//! - **Real**: the element-type trait over `f32`/`f64` (epsilon, exact
//!   small-integer conversion, NaN handling) used by kernels and checks.
//! - **SplitMix64**: deterministic PRNG for reproducible test data.
//!
//! All matrix storage throughout the workspace is column-major, matching
//! the Fortran-heritage BLAS contract. Packed and banded index helpers live
//! in [`layout`].

pub mod layout;
pub mod real;
pub mod rng;
pub mod status;

pub use layout::{banded_index, packed_length, Diag, Side, Transpose, Uplo};
pub use real::Real;
pub use rng::SplitMix64;
pub use status::{Status, TransportError};
