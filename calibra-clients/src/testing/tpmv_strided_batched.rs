//! Packed triangular matrix-vector multiply, strided-batched.

use calibra_core::{packed_length, Real, SplitMix64, Status};
use calibra_device::{blas2, compat, Device, DeviceVec, Handle};

use crate::arguments::{Api, ArgumentModel, Arguments, Param};
use crate::checks::{norm_check, unit_check_vector};
use crate::init::init_vector;
use crate::perf::{model, run_timed, PerfRecord};
use crate::report::{expect_status, CaseReport, HarnessError};

const MODEL: ArgumentModel = ArgumentModel {
    routine: "tpmv_strided_batched",
    params: &[
        Param::Uplo,
        Param::TransA,
        Param::Diag,
        Param::N,
        Param::Incx,
        Param::StrideScale,
        Param::BatchCount,
    ],
};

/// Validate `x[b] := op(A[b]) * x[b]` over strided batches of packed
/// triangular matrices.
pub fn testing_tpmv_strided_batched<T: Real>(arg: &Arguments) -> Result<CaseReport, HarnessError> {
    let mut report = CaseReport::new(MODEL.test_name::<T>(arg));
    let (uplo, trans, diag) = (arg.uplo, arg.trans_a, arg.diag);
    let (n, incx, batch_count) = (arg.n, arg.incx, arg.batch_count);

    let device = Device::new();
    let handle = Handle::new(&device);

    if n < 0 || incx == 0 || batch_count < 0 || n == 0 || batch_count == 0 {
        let expected = if n < 0 || incx == 0 || batch_count < 0 {
            Status::InvalidValue
        } else {
            Status::Success
        };
        let actual = match arg.api {
            Api::Native => blas2::tpmv_strided_batched::<T>(
                &handle,
                uplo,
                trans,
                diag,
                n,
                None,
                0,
                None,
                incx,
                0,
                batch_count,
            ),
            Api::Compat => compat::tpmv_strided_batched::<T>(
                &handle,
                uplo.code(),
                trans.code(),
                diag.code(),
                n,
                None,
                0,
                None,
                incx,
                0,
                batch_count,
            ),
        };
        expect_status("tpmv_strided_batched", expected, actual)?;
        report.log = MODEL.log_record::<T>(arg, &PerfRecord::na());
        return Ok(report);
    }

    let n_u = n as usize;
    let inc_abs = incx.unsigned_abs() as usize;
    let batches = batch_count as usize;
    let ap_len = packed_length(n_u);
    let x_span = (n_u - 1) * inc_abs + 1;
    let stride_a = arg.stride_for(ap_len);
    let stride_x = arg.stride_for(n_u * inc_abs);
    let (sa, sx) = (stride_a as usize, stride_x as usize);

    let mut rng = SplitMix64::new(arg.seed);
    let mut h_ap = vec![T::zero(); sa * batches];
    let mut h_gold = vec![T::zero(); sx * batches];
    init_vector(&mut h_ap, &mut rng, ap_len, 1, sa, batches, arg.init);
    init_vector(&mut h_gold, &mut rng, n_u, inc_abs, sx, batches, arg.init);
    let mut h_got = h_gold.clone();

    let mut d_ap = device.alloc::<T>(h_ap.len())?;
    let mut d_x = device.alloc::<T>(h_gold.len())?;
    d_ap.transfer_from(&h_ap)?;
    d_x.transfer_from(&h_gold)?;

    let call = |h: &Handle, ap: Option<&DeviceVec<T>>, x: Option<&mut DeviceVec<T>>| match arg.api {
        Api::Native => blas2::tpmv_strided_batched(
            h, uplo, trans, diag, n, ap, stride_a, x, incx, stride_x, batch_count,
        ),
        Api::Compat => compat::tpmv_strided_batched(
            h,
            uplo.code(),
            trans.code(),
            diag.code(),
            n,
            ap,
            stride_a,
            x,
            incx,
            stride_x,
            batch_count,
        ),
    };

    if arg.unit_check || arg.norm_check {
        expect_status(
            "tpmv_strided_batched",
            Status::Success,
            call(&handle, Some(&d_ap), Some(&mut d_x)),
        )?;
        d_x.transfer_to(&mut h_got)?;

        for b in 0..batches {
            let ap_b = &h_ap[b * sa..][..ap_len];
            let x_b = &mut h_gold[b * sx..][..x_span];
            calibra_ref::tpmv(uplo, trans, diag, n_u, ap_b, x_b, incx as isize);
        }

        for b in 0..batches {
            if arg.unit_check {
                report.record(unit_check_vector(
                    "tpmv_strided_batched",
                    b,
                    n_u,
                    inc_abs,
                    b * sx,
                    &h_gold,
                    &h_got,
                ));
            }
            if arg.norm_check {
                // Batch errors accumulate so one bad batch is never masked
                // by its siblings.
                report.error_host +=
                    norm_check(1, n_u, inc_abs, &h_gold[b * sx..], &h_got[b * sx..]);
            }
        }
    }

    let mut perf = PerfRecord::na();
    if arg.timing {
        let elapsed = run_timed(handle.stream(), arg.cold_iters, arg.iters, || {
            let st = call(&handle, Some(&d_ap), Some(&mut d_x));
            debug_assert!(st.is_success());
        });
        perf = PerfRecord::from_timing(
            elapsed,
            arg.iters,
            model::tpmv_flops(n_u) * batches as f64,
            model::tpmv_bytes::<T>(n_u) * batches as f64,
        );
    }
    perf = perf.with_errors(report.error_host, report.error_device);
    report.log = MODEL.log_record::<T>(arg, &perf);
    if arg.timing {
        report.perf = Some(perf);
    }
    Ok(report)
}
