//! Givens rotation, strided-batched.
//!
//! Every shape is legal for this family: non-positive `n` or `batch_count`
//! quick-return success, so the pre-check only ever expects `Success`. The
//! `c`/`s` pair is drawn from a random angle; the device and reference
//! implementations evaluate the same elementwise expression, so results
//! remain bit-identical even for irrational coefficients.

use calibra_core::{Real, SplitMix64, Status};
use calibra_device::{blas1, compat, Device, DeviceVec, Handle, PointerMode, Scalar};

use crate::arguments::{Api, ArgumentModel, Arguments, Param};
use crate::checks::{norm_check, unit_check_vector};
use crate::init::init_vector;
use crate::perf::{model, run_timed, PerfRecord};
use crate::report::{expect_status, CaseReport, HarnessError};

const MODEL: ArgumentModel = ArgumentModel {
    routine: "rot_strided_batched",
    params: &[
        Param::N,
        Param::Incx,
        Param::Incy,
        Param::StrideScale,
        Param::BatchCount,
    ],
};

#[allow(clippy::too_many_arguments)]
fn dispatch<T: Real>(
    api: Api,
    h: &Handle,
    n: i64,
    x: Option<&mut DeviceVec<T>>,
    incx: i64,
    stride_x: i64,
    y: Option<&mut DeviceVec<T>>,
    incy: i64,
    stride_y: i64,
    c: Scalar<'_, T>,
    s: Scalar<'_, T>,
    batch_count: i64,
) -> Status {
    match api {
        Api::Native => {
            blas1::rot_strided_batched(h, n, x, incx, stride_x, y, incy, stride_y, c, s, batch_count)
        }
        Api::Compat => {
            compat::rot_strided_batched(h, n, x, incx, stride_x, y, incy, stride_y, c, s, batch_count)
        }
    }
}

/// Validate the plane rotation `(x[b], y[b]) := (c*x[b] + s*y[b],
/// c*y[b] - s*x[b])` over strided batches, under both pointer modes.
pub fn testing_rot_strided_batched<T: Real>(arg: &Arguments) -> Result<CaseReport, HarnessError> {
    let mut report = CaseReport::new(MODEL.test_name::<T>(arg));
    let (n, incx, incy, batch_count) = (arg.n, arg.incx, arg.incy, arg.batch_count);

    let device = Device::new();
    let mut handle = Handle::new(&device);

    let mut rng = SplitMix64::new(arg.seed);
    let theta = rng.next_f64() * 2.0 * std::f64::consts::PI;
    let c = T::from_f64(theta.cos());
    let s = T::from_f64(theta.sin());

    if n <= 0 || batch_count <= 0 {
        let actual = dispatch::<T>(
            arg.api,
            &handle,
            n,
            None,
            incx,
            0,
            None,
            incy,
            0,
            Scalar::Host(c),
            Scalar::Host(s),
            batch_count,
        );
        expect_status("rot_strided_batched", Status::Success, actual)?;
        report.log = MODEL.log_record::<T>(arg, &PerfRecord::na());
        return Ok(report);
    }

    let n_u = n as usize;
    let incx_abs = incx.unsigned_abs() as usize;
    let incy_abs = incy.unsigned_abs() as usize;
    let batches = batch_count as usize;
    let stride_x = arg.stride_for(n_u * incx_abs.max(1));
    let stride_y = arg.stride_for(n_u * incy_abs.max(1));
    let (sx, sy) = (stride_x as usize, stride_y as usize);

    let mut h_x = vec![T::zero(); (sx * batches).max(1)];
    let mut h_y = vec![T::zero(); (sy * batches).max(1)];
    init_vector(&mut h_x, &mut rng, n_u, incx_abs, sx, batches, arg.init);
    init_vector(&mut h_y, &mut rng, n_u, incy_abs, sy, batches, arg.init);
    let mut gold_x = h_x.clone();
    let mut gold_y = h_y.clone();
    let mut host_x = vec![T::zero(); h_x.len()];
    let mut host_y = vec![T::zero(); h_y.len()];
    let mut device_x = vec![T::zero(); h_x.len()];
    let mut device_y = vec![T::zero(); h_y.len()];

    let mut d_x = device.alloc::<T>(h_x.len())?;
    let mut d_y = device.alloc::<T>(h_y.len())?;
    let mut d_c = device.alloc_scalar::<T>()?;
    let mut d_s = device.alloc_scalar::<T>()?;
    d_c.transfer_from(c)?;
    d_s.transfer_from(s)?;

    if arg.unit_check || arg.norm_check {
        d_x.transfer_from(&h_x)?;
        d_y.transfer_from(&h_y)?;
        let st = dispatch(
            arg.api,
            &handle,
            n,
            Some(&mut d_x),
            incx,
            stride_x,
            Some(&mut d_y),
            incy,
            stride_y,
            Scalar::Host(c),
            Scalar::Host(s),
            batch_count,
        );
        expect_status("rot_strided_batched", Status::Success, st)?;
        d_x.transfer_to(&mut host_x)?;
        d_y.transfer_to(&mut host_y)?;

        // Second run with c/s device-resident, on restored operands.
        handle.set_pointer_mode(PointerMode::Device);
        d_x.transfer_from(&h_x)?;
        d_y.transfer_from(&h_y)?;
        let st = dispatch(
            arg.api,
            &handle,
            n,
            Some(&mut d_x),
            incx,
            stride_x,
            Some(&mut d_y),
            incy,
            stride_y,
            Scalar::Device(&d_c),
            Scalar::Device(&d_s),
            batch_count,
        );
        expect_status("rot_strided_batched", Status::Success, st)?;
        d_x.transfer_to(&mut device_x)?;
        d_y.transfer_to(&mut device_y)?;
        handle.set_pointer_mode(PointerMode::Host);

        let x_span = (n_u - 1) * incx_abs + 1;
        let y_span = (n_u - 1) * incy_abs + 1;
        for b in 0..batches {
            let gx = &mut gold_x[b * sx..][..x_span];
            let gy = &mut gold_y[b * sy..][..y_span];
            calibra_ref::rot(n_u, gx, incx as isize, gy, incy as isize, c, s);
        }

        for b in 0..batches {
            if arg.unit_check {
                report.record(unit_check_vector(
                    "rot host mode x",
                    b,
                    n_u,
                    incx_abs,
                    b * sx,
                    &gold_x,
                    &host_x,
                ));
                report.record(unit_check_vector(
                    "rot host mode y",
                    b,
                    n_u,
                    incy_abs,
                    b * sy,
                    &gold_y,
                    &host_y,
                ));
                report.record(unit_check_vector(
                    "rot device mode x",
                    b,
                    n_u,
                    incx_abs,
                    b * sx,
                    &gold_x,
                    &device_x,
                ));
                report.record(unit_check_vector(
                    "rot device mode y",
                    b,
                    n_u,
                    incy_abs,
                    b * sy,
                    &gold_y,
                    &device_y,
                ));
            }
            if arg.norm_check {
                report.error_host += norm_check(1, n_u, incx_abs, &gold_x[b * sx..], &host_x[b * sx..])
                    + norm_check(1, n_u, incy_abs, &gold_y[b * sy..], &host_y[b * sy..]);
                report.error_device +=
                    norm_check(1, n_u, incx_abs, &gold_x[b * sx..], &device_x[b * sx..])
                        + norm_check(1, n_u, incy_abs, &gold_y[b * sy..], &device_y[b * sy..]);
            }
        }
    }

    let mut perf = PerfRecord::na();
    if arg.timing {
        let elapsed = run_timed(handle.stream(), arg.cold_iters, arg.iters, || {
            let st = dispatch(
                arg.api,
                &handle,
                n,
                Some(&mut d_x),
                incx,
                stride_x,
                Some(&mut d_y),
                incy,
                stride_y,
                Scalar::Host(c),
                Scalar::Host(s),
                batch_count,
            );
            debug_assert!(st.is_success());
        });
        perf = PerfRecord::from_timing(
            elapsed,
            arg.iters,
            model::rot_flops(n_u) * batches as f64,
            model::rot_bytes::<T>(n_u) * batches as f64,
        );
    }
    perf = perf.with_errors(report.error_host, report.error_device);
    report.log = MODEL.log_record::<T>(arg, &perf);
    if arg.timing {
        report.perf = Some(perf);
    }
    Ok(report)
}
