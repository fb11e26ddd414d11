//! Auxiliary transfer path: submatrix set/get through three distinct
//! leading dimensions (host source, device staging, host destination).
//!
//! Exercises the stream-ordered async variants; the destination is only
//! compared after an explicit synchronize. There is no status contract to
//! probe here: malformed geometry is a transport fault, and non-positive
//! shapes quick-return without touching the device.

use std::mem::size_of;

use calibra_core::{Real, SplitMix64};
use calibra_device::{get_matrix_async, set_matrix_async, Device};

use crate::arguments::{ArgumentModel, Arguments, Param};
use crate::checks::{norm_check, unit_check};
use crate::init::init_matrix;
use crate::perf::{run_timed, PerfRecord};
use crate::report::{CaseReport, HarnessError};

const MODEL: ArgumentModel = ArgumentModel {
    routine: "set_get_matrix",
    params: &[Param::M, Param::N, Param::Lda, Param::Ldb, Param::Ldc],
};

/// Validate a host -> device -> host submatrix round trip: `lda` is the
/// host source leading dimension, `ldc` the device staging one, `ldb` the
/// host destination one.
pub fn testing_set_get_matrix<T: Real>(arg: &Arguments) -> Result<CaseReport, HarnessError> {
    let mut report = CaseReport::new(MODEL.test_name::<T>(arg));
    let (m, n) = (arg.m, arg.n);
    let (lda, ldb, ldc) = (arg.lda, arg.ldb, arg.ldc);

    if m <= 0 || n <= 0 || lda <= 0 || ldb <= 0 || ldc <= 0 {
        report.log = MODEL.log_record::<T>(arg, &PerfRecord::na());
        return Ok(report);
    }

    let (rows, cols) = (m as usize, n as usize);
    let (lda_u, ldb_u, ldc_u) = (lda as usize, ldb as usize, ldc as usize);

    let device = Device::new();
    let stream = device.stream();

    let mut rng = SplitMix64::new(arg.seed);
    let mut h_a = vec![T::zero(); lda_u * cols];
    let mut h_b = vec![T::zero(); ldb_u * cols];
    init_matrix(&mut h_a, &mut rng, rows, cols, lda_u, 0, 1, arg.init);
    init_matrix(&mut h_b, &mut rng, rows, cols, ldb_u, 0, 1, arg.init);
    let mut h_gold = h_b.clone();

    let mut d_c = device.alloc::<T>(ldc_u * cols)?;

    set_matrix_async(rows, cols, &h_a, lda_u, &mut d_c, ldc_u, &stream)?;
    get_matrix_async(rows, cols, &d_c, ldc_u, &mut h_b, ldb_u, &stream)?;
    stream.synchronize();

    // Reference: a straight re-lay of the logical block between the two
    // host leading dimensions.
    for j in 0..cols {
        for i in 0..rows {
            h_gold[i + j * ldb_u] = h_a[i + j * lda_u];
        }
    }

    if arg.unit_check {
        report.record(unit_check(
            "set_get_matrix",
            0,
            rows,
            cols,
            ldb_u,
            &h_gold,
            &h_b,
        ));
    }
    if arg.norm_check {
        report.error_host = norm_check(rows, cols, ldb_u, &h_gold, &h_b);
    }

    let mut perf = PerfRecord::na();
    if arg.timing {
        let elapsed = run_timed(&stream, arg.cold_iters, arg.iters, || {
            // Geometry was validated by the checked round trip above.
            let _ = set_matrix_async(rows, cols, &h_a, lda_u, &mut d_c, ldc_u, &stream);
            let _ = get_matrix_async(rows, cols, &d_c, ldc_u, &mut h_b, ldb_u, &stream);
        });
        // No arithmetic in this family; only bandwidth is meaningful.
        perf = PerfRecord::from_timing(
            elapsed,
            arg.iters,
            f64::NAN,
            (2 * rows * cols * size_of::<T>()) as f64,
        );
    }
    perf = perf.with_errors(report.error_host, report.error_device);
    report.log = MODEL.log_record::<T>(arg, &perf);
    if arg.timing {
        report.perf = Some(perf);
    }
    Ok(report)
}
