//! Timing harness and per-routine performance models.
//!
//! Timing runs discard outputs: `cold_iters` warm-up launches, then `iters`
//! measured launches bracketed by stream-synchronized monotonic clock
//! reads. Operation and byte counts are closed-form functions of the shape
//! parameters, reported per call (multiplied by batch count for batched
//! variants by the caller).

use std::mem::size_of;
use std::sync::OnceLock;
use std::time::Instant;

use calibra_core::Real;
use calibra_device::Stream;

/// Derived performance numbers attached to a case report.
#[derive(Debug, Clone, PartialEq)]
pub struct PerfRecord {
    pub time_us: f64,
    pub gflops: f64,
    pub gbytes: f64,
    pub error_host: f64,
    pub error_device: f64,
}

impl PerfRecord {
    /// Build a record from total elapsed microseconds over `iters` calls,
    /// with per-call `flops`/`bytes`. NaN counts (transport-only routines)
    /// propagate as NaN throughput, rendered as `NA` in the log.
    pub fn from_timing(time_us: f64, iters: u32, flops: f64, bytes: f64) -> Self {
        let per_call_us = time_us / iters as f64;
        Self {
            // gflops = (flops / 1e9) / (us / 1e6)
            time_us: per_call_us,
            gflops: flops / (per_call_us * 1000.0),
            gbytes: bytes / (per_call_us * 1000.0),
            error_host: 0.0,
            error_device: 0.0,
        }
    }

    /// Record for a case that did not run the timing loop.
    pub fn na() -> Self {
        Self {
            time_us: f64::NAN,
            gflops: f64::NAN,
            gbytes: f64::NAN,
            error_host: 0.0,
            error_device: 0.0,
        }
    }

    pub fn with_errors(mut self, host: f64, device: f64) -> Self {
        self.error_host = host;
        self.error_device = device;
        self
    }
}

/// Monotonic microseconds since process start, after synchronizing the
/// stream. Mirrors the `get_time_us_sync` contract: the returned instant
/// is not reached until every issued operation has completed.
pub fn time_us_sync(stream: &Stream) -> f64 {
    static EPOCH: OnceLock<Instant> = OnceLock::new();
    stream.synchronize();
    let epoch = EPOCH.get_or_init(Instant::now);
    epoch.elapsed().as_secs_f64() * 1e6
}

/// Run `cold + iters` launches of `launch`, timing only the final `iters`.
/// Returns total measured microseconds.
pub fn run_timed<F: FnMut()>(stream: &Stream, cold: u32, iters: u32, mut launch: F) -> f64 {
    let mut start = 0.0;
    for iter in 0..(cold + iters) {
        if iter == cold {
            start = time_us_sync(stream);
        }
        launch();
    }
    time_us_sync(stream) - start
}

/// Closed-form operation/byte models per routine family. Flop counts are
/// per call for one batch; byte counts assume every operand element moves
/// once (reads plus writes).
pub mod model {
    use super::*;

    pub fn tpmv_flops(n: usize) -> f64 {
        (n * n) as f64
    }

    pub fn tpmv_bytes<T: Real>(n: usize) -> f64 {
        ((n * (n + 1) / 2 + 2 * n) * size_of::<T>()) as f64
    }

    pub fn tbsv_flops(n: usize, k: usize) -> f64 {
        (n * (2 * k + 1)) as f64
    }

    pub fn tbsv_bytes<T: Real>(n: usize, k: usize) -> f64 {
        ((n * (k + 1) + 2 * n) * size_of::<T>()) as f64
    }

    pub fn syr_flops(n: usize) -> f64 {
        (n * (n + 1)) as f64
    }

    pub fn syr_bytes<T: Real>(n: usize) -> f64 {
        ((n * (n + 1) + n) * size_of::<T>()) as f64
    }

    pub fn rot_flops(n: usize) -> f64 {
        (6 * n) as f64
    }

    pub fn rot_bytes<T: Real>(n: usize) -> f64 {
        (4 * n * size_of::<T>()) as f64
    }

    pub fn dgmm_flops(m: usize, n: usize) -> f64 {
        (m * n) as f64
    }

    pub fn dgmm_bytes<T: Real>(m: usize, n: usize, k: usize) -> f64 {
        ((2 * m * n + k) * size_of::<T>()) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calibra_device::Device;

    #[test]
    fn test_time_us_sync_monotonic() {
        let dev = Device::new();
        let stream = dev.stream();
        let a = time_us_sync(&stream);
        let b = time_us_sync(&stream);
        assert!(b >= a);
    }

    #[test]
    fn test_run_timed_counts_hot_iterations_only() {
        let dev = Device::new();
        let stream = dev.stream();
        let mut calls = 0;
        let elapsed = run_timed(&stream, 2, 5, || calls += 1);
        assert_eq!(calls, 7);
        assert!(elapsed >= 0.0);
    }

    #[test]
    fn test_perf_record_throughput() {
        // 1000 us over 10 calls, 1e6 flops per call => 100 us/call,
        // 1e6 / (100 * 1000) = 10 gflops.
        let p = PerfRecord::from_timing(1000.0, 10, 1e6, 2e6);
        assert!((p.time_us - 100.0).abs() < 1e-9);
        assert!((p.gflops - 10.0).abs() < 1e-9);
        assert!((p.gbytes - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_model_scaling() {
        assert!(model::tpmv_flops(64) > model::tpmv_flops(32));
        assert_eq!(model::rot_flops(10), 60.0);
        assert_eq!(model::dgmm_flops(3, 5), 15.0);
        assert_eq!(
            model::tpmv_bytes::<f64>(4),
            ((10 + 8) * 8) as f64
        );
    }
}
