//! The operation descriptor and the per-routine argument model.
//!
//! `Arguments` carries every configuration field any routine family can
//! consume; each family declares which fields are relevant to it through an
//! [`ArgumentModel`], which produces the canonical test name and the
//! one-line log record. Shape and increment fields are signed so invalid
//! (negative) configurations are representable.

use serde::{Deserialize, Serialize};

use calibra_core::{Diag, Real, Side, Transpose, Uplo};

use crate::perf::PerfRecord;

/// Which device calling convention a test case exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Api {
    /// Typed native entry points.
    #[default]
    Native,
    /// Character-coded interop entry points.
    Compat,
}

/// Host-data initialization pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InitKind {
    /// Uniform integers in [1, 10]: products and short sums stay exactly
    /// representable, so bit-exact checks are meaningful.
    #[default]
    SmallInt,
    /// Small integers with alternating sign, exercising cancellation.
    AlternatingSign,
    /// Every element NaN. Only for tests that verify buffers are left
    /// untouched; never the default.
    NanFill,
}

/// One test case's full configuration. Immutable for the duration of the
/// case; constructed externally (literals or JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Arguments {
    pub m: i64,
    pub n: i64,
    pub k: i64,
    pub lda: i64,
    pub ldb: i64,
    pub ldc: i64,
    pub incx: i64,
    pub incy: i64,
    pub alpha: f64,
    pub beta: f64,
    pub uplo: Uplo,
    pub trans_a: Transpose,
    pub diag: Diag,
    pub side: Side,
    pub batch_count: i64,
    pub stride_scale: f64,
    pub cold_iters: u32,
    pub iters: u32,
    pub unit_check: bool,
    pub norm_check: bool,
    pub timing: bool,
    pub api: Api,
    pub init: InitKind,
    pub seed: u64,
}

impl Default for Arguments {
    fn default() -> Self {
        Self {
            m: 0,
            n: 0,
            k: 0,
            lda: 1,
            ldb: 1,
            ldc: 1,
            incx: 1,
            incy: 1,
            alpha: 2.0,
            beta: 0.0,
            uplo: Uplo::Upper,
            trans_a: Transpose::NoTrans,
            diag: Diag::NonUnit,
            side: Side::Left,
            batch_count: 1,
            stride_scale: 1.0,
            cold_iters: 2,
            iters: 10,
            unit_check: true,
            norm_check: false,
            timing: false,
            api: Api::Native,
            init: InitKind::SmallInt,
            seed: 0x1D,
        }
    }
}

impl Arguments {
    pub fn get_alpha<T: Real>(&self) -> T {
        T::from_f64(self.alpha)
    }

    /// Strided-batch stride for a per-batch block of `per_batch` elements,
    /// scaled by `stride_scale` (>= 1.0 pads between batches).
    pub fn stride_for(&self, per_batch: usize) -> i64 {
        (per_batch as f64 * self.stride_scale) as i64
    }
}

/// Fields a routine's argument model reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    Uplo,
    TransA,
    Diag,
    Side,
    M,
    N,
    K,
    Lda,
    Ldb,
    Ldc,
    Incx,
    Incy,
    Alpha,
    StrideScale,
    BatchCount,
}

impl Param {
    fn key(self) -> &'static str {
        match self {
            Param::Uplo => "uplo",
            Param::TransA => "transA",
            Param::Diag => "diag",
            Param::Side => "side",
            Param::M => "M",
            Param::N => "N",
            Param::K => "K",
            Param::Lda => "lda",
            Param::Ldb => "ldb",
            Param::Ldc => "ldc",
            Param::Incx => "incx",
            Param::Incy => "incy",
            Param::Alpha => "alpha",
            Param::StrideScale => "stride_scale",
            Param::BatchCount => "batch_count",
        }
    }

    fn value(self, arg: &Arguments) -> String {
        match self {
            Param::Uplo => (arg.uplo.code() as char).to_string(),
            Param::TransA => (arg.trans_a.code() as char).to_string(),
            Param::Diag => (arg.diag.code() as char).to_string(),
            Param::Side => (arg.side.code() as char).to_string(),
            Param::M => arg.m.to_string(),
            Param::N => arg.n.to_string(),
            Param::K => arg.k.to_string(),
            Param::Lda => arg.lda.to_string(),
            Param::Ldb => arg.ldb.to_string(),
            Param::Ldc => arg.ldc.to_string(),
            Param::Incx => arg.incx.to_string(),
            Param::Incy => arg.incy.to_string(),
            Param::Alpha => arg.alpha.to_string(),
            Param::StrideScale => arg.stride_scale.to_string(),
            Param::BatchCount => arg.batch_count.to_string(),
        }
    }
}

/// Declares which descriptor fields a routine consumes; produces its
/// canonical test name and per-case log record.
pub struct ArgumentModel {
    pub routine: &'static str,
    pub params: &'static [Param],
}

impl ArgumentModel {
    /// Canonical test name, e.g. `tpmv_f64_U_N_N_N4_incx1`.
    pub fn test_name<T: Real>(&self, arg: &Arguments) -> String {
        let mut name = format!("{}_{}", self.routine, T::TAG);
        for p in self.params {
            name.push('_');
            // Flag params contribute just their code; numeric params are
            // key-prefixed so names stay unambiguous.
            match p {
                Param::Uplo | Param::TransA | Param::Diag | Param::Side => {
                    name.push_str(&p.value(arg));
                }
                _ => {
                    name.push_str(p.key());
                    name.push_str(&p.value(arg));
                }
            }
        }
        name
    }

    /// One-line log record: descriptor fields, elapsed time, derived
    /// throughput, and error magnitudes. NaN throughput renders as `NA`.
    pub fn log_record<T: Real>(&self, arg: &Arguments, perf: &PerfRecord) -> String {
        let mut line = format!("routine={},type={}", self.routine, T::TAG);
        for p in self.params {
            line.push(',');
            line.push_str(p.key());
            line.push('=');
            line.push_str(&p.value(arg));
        }
        let fmt = |v: f64| {
            if v.is_nan() {
                "NA".to_string()
            } else {
                format!("{v:.6}")
            }
        };
        line.push_str(&format!(
            ",time_us={},gflops={},gbytes={},norm_error_host={},norm_error_device={}",
            fmt(perf.time_us),
            fmt(perf.gflops),
            fmt(perf.gbytes),
            fmt(perf.error_host),
            fmt(perf.error_device),
        ));
        line
    }

    /// Write the log record as one line to a sink (stdout in the runner,
    /// a buffer in tests).
    pub fn write_record<T: Real>(
        &self,
        arg: &Arguments,
        perf: &PerfRecord,
        out: &mut dyn std::io::Write,
    ) -> std::io::Result<()> {
        writeln!(out, "{}", self.log_record::<T>(arg, perf))
    }
}
