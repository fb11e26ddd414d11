//! Packed triangular matrix-vector multiply, single operation.

use calibra_core::{packed_length, Real, SplitMix64, Status};
use calibra_device::{blas2, compat, Device, DeviceVec, Handle};

use crate::arguments::{Api, ArgumentModel, Arguments, Param};
use crate::checks::{norm_check, unit_check_vector};
use crate::init::init_vector;
use crate::perf::{model, run_timed, PerfRecord};
use crate::report::{expect_status, CaseReport, HarnessError};

const MODEL: ArgumentModel = ArgumentModel {
    routine: "tpmv",
    params: &[Param::Uplo, Param::TransA, Param::Diag, Param::N, Param::Incx],
};

/// Validate `x := op(A) * x` with `A` in packed triangular storage.
pub fn testing_tpmv<T: Real>(arg: &Arguments) -> Result<CaseReport, HarnessError> {
    let mut report = CaseReport::new(MODEL.test_name::<T>(arg));
    let (uplo, trans, diag) = (arg.uplo, arg.trans_a, arg.diag);
    let (n, incx) = (arg.n, arg.incx);

    let device = Device::new();
    let handle = Handle::new(&device);

    let call = |h: &Handle, ap: Option<&DeviceVec<T>>, x: Option<&mut DeviceVec<T>>| match arg.api {
        Api::Native => blas2::tpmv(h, uplo, trans, diag, n, ap, x, incx),
        Api::Compat => compat::tpmv(h, uplo.code(), trans.code(), diag.code(), n, ap, x, incx),
    };

    // Malformed and degenerate descriptors are probed without buffers: the
    // device must report the status without touching memory.
    if n < 0 || incx == 0 || n == 0 {
        let expected = if n < 0 || incx == 0 {
            Status::InvalidValue
        } else {
            Status::Success
        };
        expect_status("tpmv", expected, call(&handle, None, None))?;
        report.log = MODEL.log_record::<T>(arg, &PerfRecord::na());
        return Ok(report);
    }

    let n_u = n as usize;
    let inc_abs = incx.unsigned_abs() as usize;
    let ap_len = packed_length(n_u);
    let x_len = (n_u - 1) * inc_abs + 1;

    let mut rng = SplitMix64::new(arg.seed);
    let mut h_ap = vec![T::zero(); ap_len];
    let mut h_gold = vec![T::zero(); x_len];
    init_vector(&mut h_ap, &mut rng, ap_len, 1, 0, 1, arg.init);
    init_vector(&mut h_gold, &mut rng, n_u, inc_abs, 0, 1, arg.init);
    let mut h_got = h_gold.clone();

    let mut d_ap = device.alloc::<T>(ap_len)?;
    let mut d_x = device.alloc::<T>(x_len)?;
    d_ap.transfer_from(&h_ap)?;
    d_x.transfer_from(&h_gold)?;

    if arg.unit_check || arg.norm_check {
        expect_status(
            "tpmv",
            Status::Success,
            call(&handle, Some(&d_ap), Some(&mut d_x)),
        )?;
        d_x.transfer_to(&mut h_got)?;

        calibra_ref::tpmv(uplo, trans, diag, n_u, &h_ap, &mut h_gold, incx as isize);

        if arg.unit_check {
            report.record(unit_check_vector("tpmv", 0, n_u, inc_abs, 0, &h_gold, &h_got));
        }
        if arg.norm_check {
            report.error_host = norm_check(1, n_u, inc_abs, &h_gold, &h_got);
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
            model::tpmv_flops(n_u),
            model::tpmv_bytes::<T>(n_u),
        );
    }
    perf = perf.with_errors(report.error_host, report.error_device);
    report.log = MODEL.log_record::<T>(arg, &perf);
    if arg.timing {
        report.perf = Some(perf);
    }
    Ok(report)
}
