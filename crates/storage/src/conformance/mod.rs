//! Conformance test suite for `SelectionStore` implementations.
//!
//! Any backend can run the suite to check it honours the trait contract:
//!
//! - **Membership**: add / contains / remove round trips, idempotent add,
//!   remove of an unknown element
//! - **Snapshot**: snapshots and records reflect the store at call time
//!
//! # Usage
//!
//! ```ignore
//! use maturity_storage::conformance::run_conformance_suite;
//! use maturity_storage::MemorySelectionStore;
//!
//! #[test]
//! fn memory_conformance() {
//!     let report = run_conformance_suite(MemorySelectionStore::new);
//!     assert!(report.failed == 0, "{report}");
//! }
//! ```

mod membership;
mod snapshot;

use std::fmt;

use crate::SelectionStore;

/// Result of a single conformance test.
#[derive(Debug, Clone)]
pub struct TestResult {
    /// Test category (e.g. "membership", "snapshot").
    pub category: String,
    pub name: String,
    pub passed: bool,
    /// Error message if the test failed.
    pub message: Option<String>,
}

impl TestResult {
    fn from_result(category: &str, name: &str, result: Result<(), String>) -> Self {
        let (passed, message) = match result {
            Ok(()) => (true, None),
            Err(msg) => (false, Some(msg)),
        };
        Self {
            category: category.to_string(),
            name: name.to_string(),
            passed,
            message,
        }
    }
}

/// Aggregated report from a full conformance suite run.
#[derive(Debug, Clone)]
pub struct ConformanceReport {
    pub results: Vec<TestResult>,
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
}

impl fmt::Display for ConformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Conformance: {}/{} passed ({} failed)",
            self.passed, self.total, self.failed
        )?;
        for r in self.results.iter().filter(|r| !r.passed) {
            writeln!(
                f,
                "  FAIL [{}/{}]: {}",
                r.category,
                r.name,
                r.message.as_deref().unwrap_or("(no message)")
            )?;
        }
        Ok(())
    }
}

/// Run the full suite. `factory` is called once per test and must return a
/// fresh, empty store.
pub fn run_conformance_suite<S, F>(factory: F) -> ConformanceReport
where
    S: SelectionStore,
    F: Fn() -> S,
{
    let mut results = Vec::new();
    results.extend(membership::run_membership_tests(&factory));
    results.extend(snapshot::run_snapshot_tests(&factory));

    let passed = results.iter().filter(|r| r.passed).count();
    let total = results.len();
    ConformanceReport {
        results,
        passed,
        failed: total - passed,
        total,
    }
}

/// Turn a store error into a test failure message.
fn step<T>(what: &str, result: Result<T, crate::StoreError>) -> Result<T, String> {
    result.map_err(|e| format!("{} failed: {}", what, e))
}

fn expect_eq<T: PartialEq + fmt::Debug>(what: &str, got: T, want: T) -> Result<(), String> {
    if got == want {
        Ok(())
    } else {
        Err(format!("{}: expected {:?}, got {:?}", what, want, got))
    }
}
