//! Case verdicts and harness faults.
//!
//! Two failure kinds with different propagation: transport/allocation
//! faults and unexpected device statuses are fatal to
//! the case and surface as [`HarnessError`]; numeric mismatches accumulate
//! in the [`CaseReport`] and never abort sibling cases.

use thiserror::Error;

use calibra_core::{Status, TransportError};

use crate::perf::PerfRecord;

/// Fatal fault: aborts the current test case immediately, never retried.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("{routine}: device returned {actual:?}, expected {expected:?}")]
    Status {
        routine: &'static str,
        expected: Status,
        actual: Status,
    },
}

/// One failed comparison: which check, where, and by how much.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckFailure {
    pub check: &'static str,
    pub batch: usize,
    /// Flat index of the first mismatching element, when element-wise.
    pub index: Option<usize>,
    pub expected: f64,
    pub actual: f64,
}

impl std::fmt::Display for CheckFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} failed (batch {}, index {:?}): expected {}, got {}",
            self.check, self.batch, self.index, self.expected, self.actual
        )
    }
}

/// Verdict of one test case.
#[derive(Debug)]
pub struct CaseReport {
    /// Canonical test name from the routine's argument model.
    pub name: String,
    /// Accumulated comparison failures; empty means the case passed.
    pub failures: Vec<CheckFailure>,
    /// Norm-check error magnitudes (0.0 when the check did not run).
    pub error_host: f64,
    pub error_device: f64,
    /// Present when the timing loop ran.
    pub perf: Option<PerfRecord>,
    /// The emitted log record for this case.
    pub log: String,
}

impl CaseReport {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            failures: Vec::new(),
            error_host: 0.0,
            error_device: 0.0,
            perf: None,
            log: String::new(),
        }
    }

    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    pub(crate) fn record(&mut self, result: Result<(), CheckFailure>) {
        if let Err(f) = result {
            self.failures.push(f);
        }
    }
}

/// Shorthand for asserting a device status inside a shim.
pub(crate) fn expect_status(
    routine: &'static str,
    expected: Status,
    actual: Status,
) -> Result<(), HarnessError> {
    if actual == expected {
        Ok(())
    } else {
        Err(HarnessError::Status {
            routine,
            expected,
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_pass_fail() {
        let mut r = CaseReport::new("x".into());
        assert!(r.passed());
        r.record(Err(CheckFailure {
            check: "unit",
            batch: 0,
            index: Some(3),
            expected: 1.0,
            actual: 2.0,
        }));
        assert!(!r.passed());
        assert_eq!(r.failures.len(), 1);
    }

    #[test]
    fn test_expect_status() {
        assert!(expect_status("tpmv", Status::Success, Status::Success).is_ok());
        let err = expect_status("tpmv", Status::InvalidValue, Status::Success).unwrap_err();
        assert!(err.to_string().contains("tpmv"));
    }
}
