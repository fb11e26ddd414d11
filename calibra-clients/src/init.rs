//! Host-data initialization.
//!
//! Fills only the logical elements a routine will read (respecting
//! increments, leading dimensions, strides, and batch count); padding is
//! left as allocated. Data is NaN-free unless [`InitKind::NanFill`] is
//! explicitly requested.

use calibra_core::{Real, SplitMix64};

use crate::arguments::InitKind;
use crate::batch::HostBatch;

fn draw<T: Real>(rng: &mut SplitMix64, init: InitKind, index: usize) -> T {
    match init {
        InitKind::SmallInt => rng.gen_element(),
        InitKind::AlternatingSign => {
            let v: T = rng.gen_element();
            if index % 2 == 0 {
                v
            } else {
                -v
            }
        }
        InitKind::NanFill => T::nan(),
    }
}

/// Initialize a (possibly strided-batched) vector of `n` logical elements
/// with increment magnitude `inc_abs`.
pub fn init_vector<T: Real>(
    data: &mut [T],
    rng: &mut SplitMix64,
    n: usize,
    inc_abs: usize,
    stride: usize,
    batch_count: usize,
    init: InitKind,
) {
    for b in 0..batch_count {
        for i in 0..n {
            data[b * stride + i * inc_abs] = draw(rng, init, i);
        }
    }
}

/// Initialize a (possibly strided-batched) `m` x `n` column-major matrix
/// with leading dimension `ld`.
pub fn init_matrix<T: Real>(
    data: &mut [T],
    rng: &mut SplitMix64,
    m: usize,
    n: usize,
    ld: usize,
    stride: usize,
    batch_count: usize,
    init: InitKind,
) {
    for b in 0..batch_count {
        for j in 0..n {
            for i in 0..m {
                data[b * stride + i + j * ld] = draw(rng, init, i + j * m);
            }
        }
    }
}

/// Initialize every block of a host batch as a vector of `n` logical
/// elements.
pub fn init_batch_vector<T: Real>(
    hb: &mut HostBatch<T>,
    rng: &mut SplitMix64,
    n: usize,
    inc_abs: usize,
    init: InitKind,
) {
    for b in 0..hb.batch_count() {
        init_vector(&mut hb[b], rng, n, inc_abs, 0, 1, init);
    }
}

/// Initialize every block of a host batch as an `m` x `n` matrix.
pub fn init_batch_matrix<T: Real>(
    hb: &mut HostBatch<T>,
    rng: &mut SplitMix64,
    m: usize,
    n: usize,
    ld: usize,
    init: InitKind,
) {
    for b in 0..hb.batch_count() {
        init_matrix(&mut hb[b], rng, m, n, ld, 0, 1, init);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_vector_respects_increment() {
        let mut data = vec![0.0f64; 8];
        let mut rng = SplitMix64::new(1);
        init_vector(&mut data, &mut rng, 4, 2, 0, 1, InitKind::SmallInt);
        for i in 0..4 {
            assert!(data[2 * i] >= 1.0);
            assert_eq!(data[2 * i + 1], 0.0, "padding touched at {}", 2 * i + 1);
        }
    }

    #[test]
    fn test_init_matrix_leaves_ld_padding() {
        let mut data = vec![-1.0f32; 3 * 2];
        let mut rng = SplitMix64::new(2);
        init_matrix(&mut data, &mut rng, 2, 2, 3, 0, 1, InitKind::SmallInt);
        assert_eq!(data[2], -1.0);
        assert_eq!(data[5], -1.0);
    }

    #[test]
    fn test_init_is_deterministic() {
        let mut a = vec![0.0f64; 16];
        let mut b = vec![0.0f64; 16];
        init_vector(&mut a, &mut SplitMix64::new(9), 16, 1, 0, 1, InitKind::SmallInt);
        init_vector(&mut b, &mut SplitMix64::new(9), 16, 1, 0, 1, InitKind::SmallInt);
        assert_eq!(a, b);
    }

    #[test]
    fn test_alternating_sign_alternates() {
        let mut data = vec![0.0f64; 6];
        let mut rng = SplitMix64::new(3);
        init_vector(&mut data, &mut rng, 6, 1, 0, 1, InitKind::AlternatingSign);
        for (i, v) in data.iter().enumerate() {
            if i % 2 == 0 {
                assert!(*v > 0.0);
            } else {
                assert!(*v < 0.0);
            }
        }
    }

    #[test]
    fn test_nan_fill_is_explicit_only() {
        let mut data = vec![0.0f32; 4];
        let mut rng = SplitMix64::new(4);
        init_vector(&mut data, &mut rng, 4, 1, 0, 1, InitKind::NanFill);
        assert!(data.iter().all(|v| v.is_nan()));
    }
}
