//! Diagonal matrix multiply, batched (array-of-pointers layout).
//!
//! `C` is a pure output: its logical block is overwritten and its leading
//! dimension padding must be left exactly as initialized. The gold buffer
//! starts as a copy of the same randomized `C`, so the unit check also
//! catches a kernel writing outside the block.

use calibra_core::{Real, Side, SplitMix64, Status};
use calibra_device::{blas3, compat, Device, DeviceBatch, Handle};

use crate::arguments::{Api, ArgumentModel, Arguments, Param};
use crate::batch::HostBatch;
use crate::checks::{norm_check, unit_check};
use crate::init::{init_batch_matrix, init_batch_vector};
use crate::perf::{model, run_timed, PerfRecord};
use crate::report::{expect_status, CaseReport, HarnessError};

const MODEL: ArgumentModel = ArgumentModel {
    routine: "dgmm_batched",
    params: &[
        Param::Side,
        Param::M,
        Param::N,
        Param::Lda,
        Param::Incx,
        Param::Ldc,
        Param::BatchCount,
    ],
};

#[allow(clippy::too_many_arguments)]
fn dispatch<T: Real>(
    api: Api,
    h: &Handle,
    side: Side,
    m: i64,
    n: i64,
    a: Option<&DeviceBatch<T>>,
    lda: i64,
    x: Option<&DeviceBatch<T>>,
    incx: i64,
    c: Option<&mut DeviceBatch<T>>,
    ldc: i64,
    batch_count: i64,
) -> Status {
    match api {
        Api::Native => blas3::dgmm_batched(h, side, m, n, a, lda, x, incx, c, ldc, batch_count),
        Api::Compat => {
            compat::dgmm_batched(h, side.code(), m, n, a, lda, x, incx, c, ldc, batch_count)
        }
    }
}

/// Validate `C[b] := A[b] * diag(x[b])` (right) or `diag(x[b]) * A[b]`
/// (left) over pointer-array batches.
pub fn testing_dgmm_batched<T: Real>(arg: &Arguments) -> Result<CaseReport, HarnessError> {
    let mut report = CaseReport::new(MODEL.test_name::<T>(arg));
    let side = arg.side;
    let (m, n, lda, ldc, incx, batch_count) =
        (arg.m, arg.n, arg.lda, arg.ldc, arg.incx, arg.batch_count);

    let device = Device::new();
    let handle = Handle::new(&device);

    let invalid = m < 0 || n < 0 || lda < m || ldc < m || batch_count < 0;
    if invalid || m == 0 || n == 0 || batch_count == 0 {
        let expected = if invalid {
            Status::InvalidValue
        } else {
            Status::Success
        };
        let actual = dispatch::<T>(
            arg.api,
            &handle,
            side,
            m,
            n,
            None,
            lda,
            None,
            incx,
            None,
            ldc,
            batch_count,
        );
        expect_status("dgmm_batched", expected, actual)?;
        report.log = MODEL.log_record::<T>(arg, &PerfRecord::na());
        return Ok(report);
    }

    let (m_u, n_u) = (m as usize, n as usize);
    let (lda_u, ldc_u) = (lda as usize, ldc as usize);
    let inc_abs = incx.unsigned_abs() as usize;
    let batches = batch_count as usize;
    // The scaling vector spans rows or columns depending on the side; a
    // zero increment broadcasts a single element.
    let k_dim = match side {
        Side::Right => n_u,
        Side::Left => m_u,
    };
    let x_span = if incx == 0 {
        1
    } else {
        (k_dim - 1) * inc_abs + 1
    };
    let x_count = if incx == 0 { 1 } else { k_dim };

    let mut rng = SplitMix64::new(arg.seed);
    let mut h_a = HostBatch::<T>::new(lda_u * n_u, batches);
    let mut h_x = HostBatch::<T>::new(x_span, batches);
    let mut h_c = HostBatch::<T>::new(ldc_u * n_u, batches);
    init_batch_matrix(&mut h_a, &mut rng, m_u, n_u, lda_u, arg.init);
    init_batch_vector(&mut h_x, &mut rng, x_count, inc_abs, arg.init);
    init_batch_matrix(&mut h_c, &mut rng, m_u, n_u, ldc_u, arg.init);
    let mut h_gold = h_c.clone();
    let mut h_got = HostBatch::<T>::new(ldc_u * n_u, batches);

    let mut d_a = device.alloc_batch::<T>(lda_u * n_u, batches)?;
    let mut d_x = device.alloc_batch::<T>(x_span, batches)?;
    let mut d_c = device.alloc_batch::<T>(ldc_u * n_u, batches)?;
    d_a.transfer_from(&h_a)?;
    d_x.transfer_from(&h_x)?;
    d_c.transfer_from(&h_c)?;

    if arg.unit_check || arg.norm_check {
        let st = dispatch(
            arg.api,
            &handle,
            side,
            m,
            n,
            Some(&d_a),
            lda,
            Some(&d_x),
            incx,
            Some(&mut d_c),
            ldc,
            batch_count,
        );
        expect_status("dgmm_batched", Status::Success, st)?;
        d_c.transfer_to(&mut h_got)?;

        for b in 0..batches {
            calibra_ref::dgmm(
                side,
                m_u,
                n_u,
                &h_a[b],
                lda_u,
                &h_x[b],
                incx as isize,
                &mut h_gold[b],
                ldc_u,
            );
        }

        for b in 0..batches {
            if arg.unit_check {
                report.record(unit_check(
                    "dgmm_batched",
                    b,
                    m_u,
                    n_u,
                    ldc_u,
                    &h_gold[b],
                    &h_got[b],
                ));
            }
            if arg.norm_check {
                report.error_host += norm_check(m_u, n_u, ldc_u, &h_gold[b], &h_got[b]);
            }
        }
    }

    let mut perf = PerfRecord::na();
    if arg.timing {
        let elapsed = run_timed(handle.stream(), arg.cold_iters, arg.iters, || {
            let st = dispatch(
                arg.api,
                &handle,
                side,
                m,
                n,
                Some(&d_a),
                lda,
                Some(&d_x),
                incx,
                Some(&mut d_c),
                ldc,
                batch_count,
            );
            debug_assert!(st.is_success());
        });
        perf = PerfRecord::from_timing(
            elapsed,
            arg.iters,
            model::dgmm_flops(m_u, n_u) * batches as f64,
            model::dgmm_bytes::<T>(m_u, n_u, k_dim) * batches as f64,
        );
    }
    perf = perf.with_errors(report.error_host, report.error_device);
    report.log = MODEL.log_record::<T>(arg, &perf);
    if arg.timing {
        report.perf = Some(perf);
    }
    Ok(report)
}
