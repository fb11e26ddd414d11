//! Library handle: stream binding and scalar pointer mode.

use crate::memory::{Device, DeviceScalar, Stream};

/// Where a routine reads its scalar coefficients from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerMode {
    /// Scalars are passed by host value.
    #[default]
    Host,
    /// Scalars are read from device-resident locations.
    Device,
}

/// A scalar coefficient argument, in whichever location the current pointer
/// mode dictates. Supplying the wrong variant for the handle's mode is an
/// invalid-value condition, matching the wrapped-library contract.
#[derive(Debug, Clone, Copy)]
pub enum Scalar<'a, T> {
    Host(T),
    Device(&'a DeviceScalar<T>),
}

/// Per-test-case library handle: carries the stream every kernel is issued
/// on and the active pointer mode.
#[derive(Debug)]
pub struct Handle {
    stream: Stream,
    pointer_mode: PointerMode,
}

impl Handle {
    pub fn new(device: &Device) -> Self {
        Self {
            stream: device.stream(),
            pointer_mode: PointerMode::Host,
        }
    }

    pub fn stream(&self) -> &Stream {
        &self.stream
    }

    pub fn pointer_mode(&self) -> PointerMode {
        self.pointer_mode
    }

    pub fn set_pointer_mode(&mut self, mode: PointerMode) {
        self.pointer_mode = mode;
    }

    /// Resolve a scalar argument under the active pointer mode; `None`
    /// when the argument's location contradicts the mode.
    pub(crate) fn read_scalar<T: Copy>(&self, scalar: Scalar<'_, T>) -> Option<T> {
        match (self.pointer_mode, scalar) {
            (PointerMode::Host, Scalar::Host(v)) => Some(v),
            (PointerMode::Device, Scalar::Device(d)) => Some(d.value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_resolution_matches_mode() {
        let dev = Device::new();
        let mut handle = Handle::new(&dev);
        let mut d_alpha = dev.alloc_scalar::<f64>().unwrap();
        d_alpha.transfer_from(2.5).unwrap();

        assert_eq!(handle.read_scalar(Scalar::Host(1.5)), Some(1.5));
        assert_eq!(handle.read_scalar(Scalar::Device(&d_alpha)), None);

        handle.set_pointer_mode(PointerMode::Device);
        assert_eq!(handle.read_scalar(Scalar::Device(&d_alpha)), Some(2.5));
        assert_eq!(handle.read_scalar::<f64>(Scalar::Host(1.5)), None);
    }
}
