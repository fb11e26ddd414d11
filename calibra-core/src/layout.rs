//! BLAS flag enumerations and storage index helpers.
//!
//! All storage in the workspace is column-major. Each enum carries the
//! single-character code used by the interop (Fortran-style) calling
//! convention; `from_code` is the inverse and rejects unknown characters.

use serde::{Deserialize, Serialize};

/// Triangle specifier (upper/lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Uplo {
    #[default]
    Upper,
    Lower,
}

/// Transpose operation for matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Transpose {
    /// No transpose.
    #[default]
    NoTrans,
    /// Transpose.
    Trans,
    /// Conjugate transpose (same as `Trans` for real types).
    ConjTrans,
}

/// Diagonal specifier (unit/non-unit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Diag {
    #[default]
    NonUnit,
    Unit,
}

/// Side specifier (left/right multiplication).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Side {
    #[default]
    Left,
    Right,
}

impl Uplo {
    /// Interop character code.
    #[inline]
    pub fn code(self) -> u8 {
        match self {
            Uplo::Upper => b'U',
            Uplo::Lower => b'L',
        }
    }

    /// Parse an interop character code.
    pub fn from_code(c: u8) -> Option<Self> {
        match c.to_ascii_uppercase() {
            b'U' => Some(Uplo::Upper),
            b'L' => Some(Uplo::Lower),
            _ => None,
        }
    }

    /// The opposite triangle.
    #[inline]
    pub fn flip(self) -> Self {
        match self {
            Uplo::Upper => Uplo::Lower,
            Uplo::Lower => Uplo::Upper,
        }
    }
}

impl Transpose {
    #[inline]
    pub fn code(self) -> u8 {
        match self {
            Transpose::NoTrans => b'N',
            Transpose::Trans => b'T',
            Transpose::ConjTrans => b'C',
        }
    }

    pub fn from_code(c: u8) -> Option<Self> {
        match c.to_ascii_uppercase() {
            b'N' => Some(Transpose::NoTrans),
            b'T' => Some(Transpose::Trans),
            b'C' => Some(Transpose::ConjTrans),
            _ => None,
        }
    }

    /// Whether the operation transposes its matrix operand.
    #[inline]
    pub fn is_trans(self) -> bool {
        !matches!(self, Transpose::NoTrans)
    }
}

impl Diag {
    #[inline]
    pub fn code(self) -> u8 {
        match self {
            Diag::NonUnit => b'N',
            Diag::Unit => b'U',
        }
    }

    pub fn from_code(c: u8) -> Option<Self> {
        match c.to_ascii_uppercase() {
            b'N' => Some(Diag::NonUnit),
            b'U' => Some(Diag::Unit),
            _ => None,
        }
    }
}

impl Side {
    #[inline]
    pub fn code(self) -> u8 {
        match self {
            Side::Left => b'L',
            Side::Right => b'R',
        }
    }

    pub fn from_code(c: u8) -> Option<Self> {
        match c.to_ascii_uppercase() {
            b'L' => Some(Side::Left),
            b'R' => Some(Side::Right),
            _ => None,
        }
    }
}

/// Length of the packed storage of an `n` x `n` triangle.
#[inline(always)]
pub fn packed_length(n: usize) -> usize {
    n * (n + 1) / 2
}

/// Column-major banded storage index for dense element `(i, j)` of a
/// triangular band matrix with `k` off-diagonals and leading dimension
/// `lda >= k + 1`.
///
/// Upper storage puts the main diagonal in row `k` of the band array,
/// lower storage in row 0. Caller guarantees `(i, j)` lies inside the band.
#[inline(always)]
pub fn banded_index(uplo: Uplo, k: usize, lda: usize, i: usize, j: usize) -> usize {
    match uplo {
        Uplo::Upper => (k + i - j) + j * lda,
        Uplo::Lower => (i - j) + j * lda,
    }
}
