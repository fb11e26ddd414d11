//! # Calibra Reference Oracle
//!
//! Host-memory-only CPU implementations of every routine the harness
//! exercises. These are the ground truth the device results are compared
//! against, so they are written as straightforward scalar loops with no
//! shared code with the device kernels: an error in one implementation
//! should not be able to hide in the other.
//!
//! Contract: pure, synchronous, no status returns.
//! Callers pass validated shapes; degenerate shapes (`n == 0`) are no-ops.
//!
//! ## Modules
//!
//! - **Level 1** (vector-vector): `rot`
//! - **Level 2** (matrix-vector): `tpmv`, `tbmv`, `tbsv`, `syr`
//! - **Level 3** (matrix-matrix): `dgmm`

pub mod level1;
pub mod level2;
pub mod level3;

pub use level1::rot;
pub use level2::{syr, tbmv, tbsv, tpmv};
pub use level3::dgmm;

/// BLAS-order index of logical element `i` of a strided vector.
///
/// Negative increments walk the storage backwards: element 0 lives at
/// `(n-1)*|inc|` and element `n-1` at offset 0, per the CBLAS convention.
#[inline(always)]
pub(crate) fn vec_index(n: usize, inc: isize, i: usize) -> usize {
    if inc >= 0 {
        i * inc as usize
    } else {
        (n - 1 - i) * (-inc) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::vec_index;

    #[test]
    fn test_vec_index_forward() {
        assert_eq!(vec_index(4, 2, 0), 0);
        assert_eq!(vec_index(4, 2, 3), 6);
    }

    #[test]
    fn test_vec_index_backward() {
        assert_eq!(vec_index(4, -2, 0), 6);
        assert_eq!(vec_index(4, -2, 3), 0);
    }
}
