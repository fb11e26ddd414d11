//! Banded triangular solve, strided-batched.
//!
//! Solves are verified against a manufactured solution: a known `x` is
//! drawn, the right-hand side `b = op(A) * x` is built with the reference
//! banded multiply, and the device solve of `b` must recover `x` within an
//! epsilon-scaled tolerance. Division makes bit-exact comparison meaningless
//! here, so this family never uses element-wise equality.

use calibra_core::{Real, SplitMix64, Status};
use calibra_device::{blas2, compat, Device, DeviceVec, Handle};

use crate::arguments::{Api, ArgumentModel, Arguments, Param};
use crate::checks::{solve_tolerance, unit_check_error, vector_norm_rel_1};
use crate::init::{init_matrix, init_vector};
use crate::perf::{model, run_timed, PerfRecord};
use crate::report::{expect_status, CaseReport, HarnessError};
use crate::setup::banded_solve_setup;

const MODEL: ArgumentModel = ArgumentModel {
    routine: "tbsv_strided_batched",
    params: &[
        Param::Uplo,
        Param::TransA,
        Param::Diag,
        Param::N,
        Param::K,
        Param::Lda,
        Param::Incx,
        Param::StrideScale,
        Param::BatchCount,
    ],
};

/// Validate `x[b] := op(A[b])^{-1} * x[b]` over strided batches of banded
/// triangular matrices.
pub fn testing_tbsv_strided_batched<T: Real>(arg: &Arguments) -> Result<CaseReport, HarnessError> {
    let mut report = CaseReport::new(MODEL.test_name::<T>(arg));
    let (uplo, trans, diag) = (arg.uplo, arg.trans_a, arg.diag);
    let (n, k, lda, incx, batch_count) = (arg.n, arg.k, arg.lda, arg.incx, arg.batch_count);

    let device = Device::new();
    let handle = Handle::new(&device);

    let invalid = n < 0 || k < 0 || lda < k + 1 || incx == 0 || batch_count < 0;
    if invalid || n == 0 || batch_count == 0 {
        let expected = if invalid {
            Status::InvalidValue
        } else {
            Status::Success
        };
        let actual = match arg.api {
            Api::Native => blas2::tbsv_strided_batched::<T>(
                &handle,
                uplo,
                trans,
                diag,
                n,
                k,
                None,
                lda,
                0,
                None,
                incx,
                0,
                batch_count,
            ),
            Api::Compat => compat::tbsv_strided_batched::<T>(
                &handle,
                uplo.code(),
                trans.code(),
                diag.code(),
                n,
                k,
                None,
                lda,
                0,
                None,
                incx,
                0,
                batch_count,
            ),
        };
        expect_status("tbsv_strided_batched", expected, actual)?;
        report.log = MODEL.log_record::<T>(arg, &PerfRecord::na());
        return Ok(report);
    }

    let (n_u, k_u, lda_u) = (n as usize, k as usize, lda as usize);
    let inc_abs = incx.unsigned_abs() as usize;
    let batches = batch_count as usize;
    let ab_len = lda_u * n_u;
    let x_span = (n_u - 1) * inc_abs + 1;
    let stride_a = arg.stride_for(ab_len);
    let stride_x = arg.stride_for(n_u * inc_abs);
    let (sa, sx) = (stride_a as usize, stride_x as usize);

    let mut rng = SplitMix64::new(arg.seed);
    let mut h_ab = vec![T::zero(); sa * batches];
    // The known solution, and the manufactured right-hand side the device
    // will solve in place.
    let mut h_x = vec![T::zero(); sx * batches];
    init_vector(&mut h_x, &mut rng, n_u, inc_abs, sx, batches, arg.init);
    let mut h_b = h_x.clone();

    let mut a_dense = vec![T::zero(); n_u * n_u];
    for b in 0..batches {
        init_matrix(&mut a_dense, &mut rng, n_u, n_u, n_u, 0, 1, arg.init);
        let ab_b = &mut h_ab[b * sa..][..ab_len];
        banded_solve_setup(uplo, diag, &mut a_dense, n_u, k_u, ab_b, lda_u);
        let b_b = &mut h_b[b * sx..][..x_span];
        calibra_ref::tbmv(uplo, trans, diag, n_u, k_u, ab_b, lda_u, b_b, incx as isize);
    }

    let mut d_ab = device.alloc::<T>(h_ab.len())?;
    let mut d_x = device.alloc::<T>(h_b.len())?;
    d_ab.transfer_from(&h_ab)?;
    d_x.transfer_from(&h_b)?;

    let call = |h: &Handle, ab: Option<&DeviceVec<T>>, x: Option<&mut DeviceVec<T>>| match arg.api {
        Api::Native => blas2::tbsv_strided_batched(
            h, uplo, trans, diag, n, k, ab, lda, stride_a, x, incx, stride_x, batch_count,
        ),
        Api::Compat => compat::tbsv_strided_batched(
            h,
            uplo.code(),
            trans.code(),
            diag.code(),
            n,
            k,
            ab,
            lda,
            stride_a,
            x,
            incx,
            stride_x,
            batch_count,
        ),
    };

    if arg.unit_check || arg.norm_check {
        expect_status(
            "tbsv_strided_batched",
            Status::Success,
            call(&handle, Some(&d_ab), Some(&mut d_x)),
        )?;
        let mut h_got = vec![T::zero(); h_b.len()];
        d_x.transfer_to(&mut h_got)?;

        let tolerance = solve_tolerance::<T>(n_u);
        for b in 0..batches {
            let err = vector_norm_rel_1(n_u, inc_abs, b * sx, &h_x, &h_got);
            if arg.unit_check {
                report.record(unit_check_error("tbsv_strided_batched", b, err, tolerance));
            }
            report.error_host += err;
        }
    }

    let mut perf = PerfRecord::na();
    if arg.timing {
        let elapsed = run_timed(handle.stream(), arg.cold_iters, arg.iters, || {
            let st = call(&handle, Some(&d_ab), Some(&mut d_x));
            debug_assert!(st.is_success());
        });
        perf = PerfRecord::from_timing(
            elapsed,
            arg.iters,
            model::tbsv_flops(n_u, k_u) * batches as f64,
            model::tbsv_bytes::<T>(n_u, k_u) * batches as f64,
        );
    }
    perf = perf.with_errors(report.error_host, report.error_device);
    report.log = MODEL.log_record::<T>(arg, &perf);
    if arg.timing {
        report.perf = Some(perf);
    }
    Ok(report)
}
