//! Symmetric rank-1 update, batched (array-of-pointers layout).
//!
//! `syr` takes a scalar coefficient, so this family runs the device call
//! twice, once under each pointer mode: alpha by host value, then alpha
//! read from a device-resident location, with operands restored in between.
//! Both results are checked against one reference computation.

use calibra_core::{Real, SplitMix64, Status, Uplo};
use calibra_device::{blas2, compat, Device, DeviceBatch, Handle, PointerMode, Scalar};

use crate::arguments::{Api, ArgumentModel, Arguments, Param};
use crate::batch::HostBatch;
use crate::checks::{norm_check, unit_check};
use crate::init::{init_batch_matrix, init_batch_vector};
use crate::perf::{model, run_timed, PerfRecord};
use crate::report::{expect_status, CaseReport, HarnessError};

const MODEL: ArgumentModel = ArgumentModel {
    routine: "syr_batched",
    params: &[
        Param::Uplo,
        Param::N,
        Param::Lda,
        Param::Incx,
        Param::Alpha,
        Param::BatchCount,
    ],
};

#[allow(clippy::too_many_arguments)]
fn dispatch<T: Real>(
    api: Api,
    h: &Handle,
    uplo: Uplo,
    n: i64,
    alpha: Scalar<'_, T>,
    x: Option<&DeviceBatch<T>>,
    incx: i64,
    a: Option<&mut DeviceBatch<T>>,
    lda: i64,
    batch_count: i64,
) -> Status {
    match api {
        Api::Native => blas2::syr_batched(h, uplo, n, alpha, x, incx, a, lda, batch_count),
        Api::Compat => compat::syr_batched(h, uplo.code(), n, alpha, x, incx, a, lda, batch_count),
    }
}

/// Validate `A[b] := A[b] + alpha * x[b] * x[b]^T` over pointer-array
/// batches, under both pointer modes.
pub fn testing_syr_batched<T: Real>(arg: &Arguments) -> Result<CaseReport, HarnessError> {
    let mut report = CaseReport::new(MODEL.test_name::<T>(arg));
    let uplo = arg.uplo;
    let (n, lda, incx, batch_count) = (arg.n, arg.lda, arg.incx, arg.batch_count);
    let alpha: T = arg.get_alpha();

    let device = Device::new();
    let mut handle = Handle::new(&device);

    let invalid = n < 0 || incx == 0 || lda < n || lda < 1 || batch_count < 0;
    if invalid || n == 0 || batch_count == 0 {
        let expected = if invalid {
            Status::InvalidValue
        } else {
            Status::Success
        };
        let actual = dispatch::<T>(
            arg.api,
            &handle,
            uplo,
            n,
            Scalar::Host(alpha),
            None,
            incx,
            None,
            lda,
            batch_count,
        );
        expect_status("syr_batched", expected, actual)?;
        report.log = MODEL.log_record::<T>(arg, &PerfRecord::na());
        return Ok(report);
    }

    let (n_u, lda_u) = (n as usize, lda as usize);
    let inc_abs = incx.unsigned_abs() as usize;
    let batches = batch_count as usize;
    let a_len = lda_u * n_u;
    let x_span = (n_u - 1) * inc_abs + 1;

    let mut rng = SplitMix64::new(arg.seed);
    let mut h_a = HostBatch::<T>::new(a_len, batches);
    let mut h_x = HostBatch::<T>::new(x_span, batches);
    init_batch_matrix(&mut h_a, &mut rng, n_u, n_u, lda_u, arg.init);
    init_batch_vector(&mut h_x, &mut rng, n_u, inc_abs, arg.init);
    let mut h_gold = h_a.clone();
    let mut h_host_mode = HostBatch::<T>::new(a_len, batches);
    let mut h_device_mode = HostBatch::<T>::new(a_len, batches);

    let mut d_a = device.alloc_batch::<T>(a_len, batches)?;
    let mut d_x = device.alloc_batch::<T>(x_span, batches)?;
    d_x.transfer_from(&h_x)?;
    let mut d_alpha = device.alloc_scalar::<T>()?;
    d_alpha.transfer_from(alpha)?;

    if arg.unit_check || arg.norm_check {
        d_a.transfer_from(&h_a)?;
        let st = dispatch(
            arg.api,
            &handle,
            uplo,
            n,
            Scalar::Host(alpha),
            Some(&d_x),
            incx,
            Some(&mut d_a),
            lda,
            batch_count,
        );
        expect_status("syr_batched", Status::Success, st)?;
        d_a.transfer_to(&mut h_host_mode)?;

        // Second run with alpha device-resident, on restored operands.
        handle.set_pointer_mode(PointerMode::Device);
        d_a.transfer_from(&h_a)?;
        let st = dispatch(
            arg.api,
            &handle,
            uplo,
            n,
            Scalar::Device(&d_alpha),
            Some(&d_x),
            incx,
            Some(&mut d_a),
            lda,
            batch_count,
        );
        expect_status("syr_batched", Status::Success, st)?;
        d_a.transfer_to(&mut h_device_mode)?;
        handle.set_pointer_mode(PointerMode::Host);

        for b in 0..batches {
            calibra_ref::syr(uplo, n_u, alpha, &h_x[b], incx as isize, &mut h_gold[b], lda_u);
        }

        for b in 0..batches {
            if arg.unit_check {
                report.record(unit_check(
                    "syr_batched host mode",
                    b,
                    n_u,
                    n_u,
                    lda_u,
                    &h_gold[b],
                    &h_host_mode[b],
                ));
                report.record(unit_check(
                    "syr_batched device mode",
                    b,
                    n_u,
                    n_u,
                    lda_u,
                    &h_gold[b],
                    &h_device_mode[b],
                ));
            }
            if arg.norm_check {
                report.error_host += norm_check(n_u, n_u, lda_u, &h_gold[b], &h_host_mode[b]);
                report.error_device += norm_check(n_u, n_u, lda_u, &h_gold[b], &h_device_mode[b]);
            }
        }
    }

    let mut perf = PerfRecord::na();
    if arg.timing {
        let elapsed = run_timed(handle.stream(), arg.cold_iters, arg.iters, || {
            let st = dispatch(
                arg.api,
                &handle,
                uplo,
                n,
                Scalar::Host(alpha),
                Some(&d_x),
                incx,
                Some(&mut d_a),
                lda,
                batch_count,
            );
            debug_assert!(st.is_success());
        });
        perf = PerfRecord::from_timing(
            elapsed,
            arg.iters,
            model::syr_flops(n_u) * batches as f64,
            model::syr_bytes::<T>(n_u) * batches as f64,
        );
    }
    perf = perf.with_errors(report.error_host, report.error_device);
    report.log = MODEL.log_record::<T>(arg, &perf);
    if arg.timing {
        report.perf = Some(perf);
    }
    Ok(report)
}
