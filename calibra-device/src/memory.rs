//! Simulated device memory: arena-tracked buffers, streams, and explicit
//! host↔device transfers.
//!
//! The harness runs single-threaded per test case (the only concurrency in
//! the modeled system is the device running ahead of the host), so the
//! arena uses `Rc`/`Cell` bookkeeping rather than atomics.

use std::cell::Cell;
use std::mem::size_of;
use std::rc::Rc;

use calibra_core::TransportError;

#[derive(Debug)]
struct Arena {
    capacity: Option<usize>,
    used: Cell<usize>,
}

impl Arena {
    fn reserve(&self, bytes: usize) -> Result<(), TransportError> {
        if let Some(cap) = self.capacity {
            if self.used.get() + bytes > cap {
                return Err(TransportError::AllocFailed { bytes });
            }
        }
        self.used.set(self.used.get() + bytes);
        Ok(())
    }

    fn release(&self, bytes: usize) {
        self.used.set(self.used.get().saturating_sub(bytes));
    }
}

/// A simulated device. Cheap to clone; clones share one arena.
#[derive(Debug, Clone)]
pub struct Device {
    arena: Rc<Arena>,
    default_stream: Stream,
}

impl Device {
    /// Device with unbounded memory.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Device whose arena holds at most `bytes`; allocations beyond that
    /// fail with [`TransportError::AllocFailed`]. Used to exercise the
    /// fatal-fault path.
    pub fn with_capacity(bytes: usize) -> Self {
        Self::build(Some(bytes))
    }

    fn build(capacity: Option<usize>) -> Self {
        Self {
            arena: Rc::new(Arena {
                capacity,
                used: Cell::new(0),
            }),
            default_stream: Stream::new(),
        }
    }

    /// Bytes currently allocated on the device.
    pub fn bytes_in_use(&self) -> usize {
        self.arena.used.get()
    }

    /// The device's default stream.
    pub fn stream(&self) -> Stream {
        self.default_stream.clone()
    }

    /// Allocate an uninitialized (zeroed) device buffer of `len` elements.
    pub fn alloc<T: Copy + Default>(&self, len: usize) -> Result<DeviceVec<T>, TransportError> {
        let bytes = len * size_of::<T>();
        self.arena.reserve(bytes)?;
        Ok(DeviceVec {
            arena: Rc::clone(&self.arena),
            bytes,
            data: vec![T::default(); len],
        })
    }

    /// Allocate `batch_count` independent device blocks of `len` elements
    /// each (the array-of-pointers batched layout).
    pub fn alloc_batch<T: Copy + Default>(
        &self,
        len: usize,
        batch_count: usize,
    ) -> Result<DeviceBatch<T>, TransportError> {
        let bytes = len * batch_count * size_of::<T>();
        self.arena.reserve(bytes)?;
        Ok(DeviceBatch {
            arena: Rc::clone(&self.arena),
            bytes,
            batches: vec![vec![T::default(); len]; batch_count],
        })
    }

    /// Allocate a single device-resident scalar (for device pointer mode).
    pub fn alloc_scalar<T: Copy + Default>(&self) -> Result<DeviceScalar<T>, TransportError> {
        let bytes = size_of::<T>();
        self.arena.reserve(bytes)?;
        Ok(DeviceScalar {
            arena: Rc::clone(&self.arena),
            bytes,
            value: T::default(),
        })
    }
}

impl Default for Device {
    fn default() -> Self {
        Self::new()
    }
}

/// An execution stream. Operations issued on one stream complete in issue
/// order; async transfers are only observable after [`Stream::synchronize`].
#[derive(Debug, Clone)]
pub struct Stream {
    pending: Rc<Cell<usize>>,
}

impl Stream {
    fn new() -> Self {
        Self {
            pending: Rc::new(Cell::new(0)),
        }
    }

    pub(crate) fn record(&self) {
        self.pending.set(self.pending.get() + 1);
    }

    /// Number of issued-but-not-synchronized operations.
    pub fn pending(&self) -> usize {
        self.pending.get()
    }

    /// Block until every operation issued on this stream has completed.
    pub fn synchronize(&self) {
        self.pending.set(0);
    }
}

/// Device-resident buffer of `len` elements. Contents are only observable
/// through explicit transfers.
#[derive(Debug)]
pub struct DeviceVec<T> {
    arena: Rc<Arena>,
    bytes: usize,
    pub(crate) data: Vec<T>,
}

impl<T: Copy> DeviceVec<T> {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Blocking host-to-device copy of the full buffer.
    pub fn transfer_from(&mut self, host: &[T]) -> Result<(), TransportError> {
        if host.len() != self.data.len() {
            return Err(TransportError::HostToDevice {
                host: host.len(),
                device: self.data.len(),
            });
        }
        self.data.copy_from_slice(host);
        Ok(())
    }

    /// Blocking device-to-host copy of the full buffer. Synchronizing: the
    /// host slice is valid immediately on return.
    pub fn transfer_to(&self, host: &mut [T]) -> Result<(), TransportError> {
        if host.len() != self.data.len() {
            return Err(TransportError::DeviceToHost {
                device: self.data.len(),
                host: host.len(),
            });
        }
        host.copy_from_slice(&self.data);
        Ok(())
    }
}

impl<T> Drop for DeviceVec<T> {
    fn drop(&mut self) {
        self.arena.release(self.bytes);
    }
}

/// Array-of-pointers batched device buffer: `batch_count` independently
/// allocated per-batch blocks.
#[derive(Debug)]
pub struct DeviceBatch<T> {
    arena: Rc<Arena>,
    bytes: usize,
    pub(crate) batches: Vec<Vec<T>>,
}

impl<T: Copy> DeviceBatch<T> {
    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    pub fn batch_len(&self) -> usize {
        self.batches.first().map_or(0, Vec::len)
    }

    /// Blocking host-to-device copy of every batch.
    pub fn transfer_from(&mut self, host: &[Vec<T>]) -> Result<(), TransportError> {
        if host.len() != self.batches.len() {
            return Err(TransportError::BadBatchIndex {
                index: host.len(),
                count: self.batches.len(),
            });
        }
        for (dst, src) in self.batches.iter_mut().zip(host) {
            if src.len() != dst.len() {
                return Err(TransportError::HostToDevice {
                    host: src.len(),
                    device: dst.len(),
                });
            }
            dst.copy_from_slice(src);
        }
        Ok(())
    }

    /// Blocking device-to-host copy of every batch.
    pub fn transfer_to(&self, host: &mut [Vec<T>]) -> Result<(), TransportError> {
        if host.len() != self.batches.len() {
            return Err(TransportError::BadBatchIndex {
                index: host.len(),
                count: self.batches.len(),
            });
        }
        for (src, dst) in self.batches.iter().zip(host) {
            if dst.len() != src.len() {
                return Err(TransportError::DeviceToHost {
                    device: src.len(),
                    host: dst.len(),
                });
            }
            dst.copy_from_slice(src);
        }
        Ok(())
    }
}

impl<T> Drop for DeviceBatch<T> {
    fn drop(&mut self) {
        self.arena.release(self.bytes);
    }
}

/// Device-resident scalar, used when a routine's coefficient is supplied in
/// device pointer mode.
#[derive(Debug)]
pub struct DeviceScalar<T> {
    arena: Rc<Arena>,
    bytes: usize,
    pub(crate) value: T,
}

impl<T: Copy> DeviceScalar<T> {
    pub fn transfer_from(&mut self, host: T) -> Result<(), TransportError> {
        self.value = host;
        Ok(())
    }

    pub fn transfer_to(&self) -> T {
        self.value
    }
}

impl<T> Drop for DeviceScalar<T> {
    fn drop(&mut self) {
        self.arena.release(self.bytes);
    }
}

/// Blocking host-to-device submatrix copy: `rows` x `cols` block from a
/// host buffer with leading dimension `lda` into a device buffer with
/// leading dimension `ldd` (both column-major).
pub fn set_matrix<T: Copy>(
    rows: usize,
    cols: usize,
    host: &[T],
    lda: usize,
    dst: &mut DeviceVec<T>,
    ldd: usize,
) -> Result<(), TransportError> {
    check_block(rows, cols, lda, host.len())?;
    check_block(rows, cols, ldd, dst.data.len())?;
    for j in 0..cols {
        for i in 0..rows {
            dst.data[i + j * ldd] = host[i + j * lda];
        }
    }
    Ok(())
}

/// Blocking device-to-host submatrix copy; inverse of [`set_matrix`].
pub fn get_matrix<T: Copy>(
    rows: usize,
    cols: usize,
    src: &DeviceVec<T>,
    ldd: usize,
    host: &mut [T],
    ldb: usize,
) -> Result<(), TransportError> {
    check_block(rows, cols, ldd, src.data.len())?;
    check_block(rows, cols, ldb, host.len())?;
    for j in 0..cols {
        for i in 0..rows {
            host[i + j * ldb] = src.data[i + j * ldd];
        }
    }
    Ok(())
}

/// Stream-ordered host-to-device submatrix copy. The device buffer is only
/// guaranteed current after [`Stream::synchronize`].
pub fn set_matrix_async<T: Copy>(
    rows: usize,
    cols: usize,
    host: &[T],
    lda: usize,
    dst: &mut DeviceVec<T>,
    ldd: usize,
    stream: &Stream,
) -> Result<(), TransportError> {
    stream.record();
    set_matrix(rows, cols, host, lda, dst, ldd)
}

/// Stream-ordered device-to-host submatrix copy. The host buffer is only
/// guaranteed current after [`Stream::synchronize`].
pub fn get_matrix_async<T: Copy>(
    rows: usize,
    cols: usize,
    src: &DeviceVec<T>,
    ldd: usize,
    host: &mut [T],
    ldb: usize,
    stream: &Stream,
) -> Result<(), TransportError> {
    stream.record();
    get_matrix(rows, cols, src, ldd, host, ldb)
}

fn check_block(rows: usize, cols: usize, ld: usize, len: usize) -> Result<(), TransportError> {
    let ok = ld >= rows.max(1) && (cols == 0 || rows == 0 || (cols - 1) * ld + rows <= len);
    if ok {
        Ok(())
    } else {
        Err(TransportError::OutOfBounds {
            rows,
            cols,
            ld,
            len,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_and_transfer_round_trip() {
        let dev = Device::new();
        let mut d = dev.alloc::<f32>(4).unwrap();
        d.transfer_from(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        let mut back = vec![0.0f32; 4];
        d.transfer_to(&mut back).unwrap();
        assert_eq!(back, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_transfer_length_mismatch_is_fault() {
        let dev = Device::new();
        let mut d = dev.alloc::<f64>(4).unwrap();
        let err = d.transfer_from(&[1.0; 3]).unwrap_err();
        assert_eq!(err, TransportError::HostToDevice { host: 3, device: 4 });
    }

    #[test]
    fn test_capacity_exhaustion() {
        let dev = Device::with_capacity(16);
        let _a = dev.alloc::<f64>(2).unwrap();
        assert!(dev.alloc::<f64>(1).is_err());
    }

    #[test]
    fn test_drop_releases_arena() {
        let dev = Device::with_capacity(16);
        {
            let _a = dev.alloc::<f64>(2).unwrap();
            assert_eq!(dev.bytes_in_use(), 16);
        }
        assert_eq!(dev.bytes_in_use(), 0);
        assert!(dev.alloc::<f64>(2).is_ok());
    }

    #[test]
    fn test_batch_round_trip() {
        let dev = Device::new();
        let mut d = dev.alloc_batch::<f32>(2, 3).unwrap();
        let host = vec![vec![1.0f32, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]];
        d.transfer_from(&host).unwrap();
        let mut back = vec![vec![0.0f32; 2]; 3];
        d.transfer_to(&mut back).unwrap();
        assert_eq!(back, host);
    }

    #[test]
    fn test_set_get_matrix_respects_leading_dimensions() {
        let dev = Device::new();
        let (rows, cols, lda, ldd, ldb) = (2, 2, 3, 4, 2);
        let host = vec![1.0f64, 2.0, -9.0, 3.0, 4.0, -9.0];
        let mut d = dev.alloc::<f64>(ldd * cols).unwrap();
        set_matrix(rows, cols, &host, lda, &mut d, ldd).unwrap();
        let mut out = vec![0.0f64; ldb * cols];
        get_matrix(rows, cols, &d, ldd, &mut out, ldb).unwrap();
        assert_eq!(out, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_set_matrix_out_of_bounds() {
        let dev = Device::new();
        let mut d = dev.alloc::<f64>(2).unwrap();
        let host = vec![0.0f64; 9];
        assert!(set_matrix(3, 3, &host, 3, &mut d, 3).is_err());
    }

    #[test]
    fn test_async_requires_synchronize() {
        let dev = Device::new();
        let stream = dev.stream();
        let mut d = dev.alloc::<f32>(4).unwrap();
        let host = vec![1.0f32; 4];
        set_matrix_async(2, 2, &host, 2, &mut d, 2, &stream).unwrap();
        assert_eq!(stream.pending(), 1);
        stream.synchronize();
        assert_eq!(stream.pending(), 0);
    }
}
