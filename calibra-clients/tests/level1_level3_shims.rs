//! End-to-end harness runs for the Level 1 rotation, Level 3 diagonal
//! multiply, and the auxiliary transfer path.

use calibra_clients::arguments::{Api, Arguments};
use calibra_clients::testing::{
    testing_dgmm_batched, testing_rot_strided_batched, testing_set_get_matrix,
};
use calibra_core::Side;

const APIS: [Api; 2] = [Api::Native, Api::Compat];

#[test]
fn rot_strided_batched_grid() {
    for n in [1, 7, 33] {
        for (incx, incy) in [(1, 1), (2, 1), (1, -1), (-2, -3)] {
            for (batch_count, stride_scale) in [(1, 1.0), (3, 1.0), (2, 1.5)] {
                for api in APIS {
                    let arg = Arguments {
                        n,
                        incx,
                        incy,
                        batch_count,
                        stride_scale,
                        api,
                        norm_check: true,
                        ..Default::default()
                    };
                    let report = testing_rot_strided_batched::<f64>(&arg).unwrap();
                    assert!(report.passed(), "{}: {:?}", report.name, report.failures);
                    // Same elementwise expression on both sides: exact even
                    // with irrational c/s.
                    assert_eq!(report.error_host, 0.0);
                    assert_eq!(report.error_device, 0.0);
                }
            }
        }
    }
}

#[test]
fn rot_f32_exact_agreement() {
    let arg = Arguments {
        n: 16,
        incx: -1,
        incy: 2,
        batch_count: 2,
        ..Default::default()
    };
    let report = testing_rot_strided_batched::<f32>(&arg).unwrap();
    assert!(report.passed(), "{:?}", report.failures);
}

#[test]
fn rot_degenerate_shapes_succeed() {
    // This family has no invalid-value cases: everything degenerate is a
    // quick-return success.
    for (n, batch_count) in [(0, 4), (-3, 4), (4, 0), (4, -2)] {
        let arg = Arguments {
            n,
            batch_count,
            ..Default::default()
        };
        let report = testing_rot_strided_batched::<f64>(&arg).unwrap();
        assert!(report.passed());
    }
}

#[test]
fn dgmm_batched_grid() {
    for side in [Side::Left, Side::Right] {
        for (m, n) in [(1, 1), (3, 5), (5, 3)] {
            for lda_extra in [0, 2] {
                for incx in [1, -1, 0] {
                    for batch_count in [1, 2] {
                        for api in APIS {
                            let arg = Arguments {
                                m,
                                n,
                                lda: m + lda_extra,
                                ldc: m + 1,
                                incx,
                                side,
                                batch_count,
                                api,
                                norm_check: true,
                                ..Default::default()
                            };
                            let report = testing_dgmm_batched::<f64>(&arg).unwrap();
                            assert!(report.passed(), "{}: {:?}", report.name, report.failures);
                            assert_eq!(report.error_host, 0.0);
                        }
                    }
                }
            }
        }
    }
}

#[test]
fn dgmm_batched_invalid_arguments_probe() {
    for (m, n, lda, ldc, batch_count) in [
        (-1, 2, 2, 2, 1),
        (2, -1, 2, 2, 1),
        (4, 2, 2, 4, 1), // lda < m
        (4, 2, 4, 2, 1), // ldc < m
        (2, 2, 2, 2, -1),
    ] {
        for api in APIS {
            let arg = Arguments {
                m,
                n,
                lda,
                ldc,
                batch_count,
                api,
                ..Default::default()
            };
            assert!(testing_dgmm_batched::<f32>(&arg).unwrap().passed());
        }
    }
}

#[test]
fn dgmm_batched_quick_return() {
    for (m, n, batch_count) in [(0, 3, 1), (3, 0, 1), (3, 3, 0)] {
        let arg = Arguments {
            m,
            n,
            lda: 3,
            ldc: 3,
            batch_count,
            ..Default::default()
        };
        assert!(testing_dgmm_batched::<f64>(&arg).unwrap().passed());
    }
}

#[test]
fn set_get_matrix_three_leading_dimensions() {
    for (m, n) in [(1, 1), (3, 5), (8, 2)] {
        let arg = Arguments {
            m,
            n,
            lda: m + 1,
            ldb: m,
            ldc: m + 2,
            norm_check: true,
            ..Default::default()
        };
        let report = testing_set_get_matrix::<f64>(&arg).unwrap();
        assert!(report.passed(), "{}: {:?}", report.name, report.failures);
        assert_eq!(report.error_host, 0.0);
    }
}

#[test]
fn set_get_matrix_degenerate_shapes() {
    for (m, n, lda) in [(0, 3, 1), (3, 0, 3), (-2, 3, 1), (3, 3, 0)] {
        let arg = Arguments {
            m,
            n,
            lda,
            ldb: 3,
            ldc: 3,
            ..Default::default()
        };
        let report = testing_set_get_matrix::<f32>(&arg).unwrap();
        assert!(report.passed());
        assert!(report.log.contains("time_us=NA"));
    }
}

#[test]
fn set_get_matrix_timing_reports_bandwidth_only() {
    let arg = Arguments {
        m: 16,
        n: 16,
        lda: 16,
        ldb: 16,
        ldc: 16,
        timing: true,
        cold_iters: 1,
        iters: 2,
        ..Default::default()
    };
    let report = testing_set_get_matrix::<f64>(&arg).unwrap();
    assert!(report.passed(), "{:?}", report.failures);
    assert!(report.log.contains("gflops=NA"));
}

#[test]
fn shim_configurable_from_json() {
    let arg: Arguments = serde_json::from_str(
        r#"{"side": "Right", "m": 2, "n": 2, "lda": 2, "ldc": 2, "api": "Compat"}"#,
    )
    .unwrap();
    let report = testing_dgmm_batched::<f64>(&arg).unwrap();
    assert!(report.passed(), "{:?}", report.failures);
}
