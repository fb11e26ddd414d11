//! Host-side batched buffer: the array-of-pointers counterpart to a
//! device batch, one independently owned block per batch index.

use std::ops::{Deref, DerefMut, Index, IndexMut};

/// `batch_count` host blocks of `len` elements each.
#[derive(Debug, Clone, PartialEq)]
pub struct HostBatch<T> {
    batches: Vec<Vec<T>>,
}

impl<T: Copy + Default> HostBatch<T> {
    pub fn new(len: usize, batch_count: usize) -> Self {
        Self {
            batches: vec![vec![T::default(); len]; batch_count],
        }
    }

    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    /// Copy all batches from another host batch of identical geometry.
    ///
    /// Panics on geometry mismatch; host batches in one test case are
    /// always allocated with the same shape.
    pub fn copy_from(&mut self, other: &Self) {
        assert_eq!(self.batches.len(), other.batches.len());
        for (dst, src) in self.batches.iter_mut().zip(&other.batches) {
            dst.copy_from_slice(src);
        }
    }
}

impl<T> Deref for HostBatch<T> {
    type Target = [Vec<T>];

    fn deref(&self) -> &Self::Target {
        &self.batches
    }
}

impl<T> DerefMut for HostBatch<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.batches
    }
}

impl<T> Index<usize> for HostBatch<T> {
    type Output = Vec<T>;

    fn index(&self, b: usize) -> &Vec<T> {
        &self.batches[b]
    }
}

impl<T> IndexMut<usize> for HostBatch<T> {
    fn index_mut(&mut self, b: usize) -> &mut Vec<T> {
        &mut self.batches[b]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry() {
        let hb = HostBatch::<f32>::new(3, 4);
        assert_eq!(hb.batch_count(), 4);
        assert_eq!(hb[2].len(), 3);
    }

    #[test]
    fn test_copy_from() {
        let mut a = HostBatch::<f64>::new(2, 2);
        let mut b = HostBatch::<f64>::new(2, 2);
        b[0][0] = 5.0;
        b[1][1] = 7.0;
        a.copy_from(&b);
        assert_eq!(a, b);
    }
}
