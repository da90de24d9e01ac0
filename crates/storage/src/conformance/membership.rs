use super::{expect_eq, step, TestResult};
use crate::SelectionStore;

pub(super) fn run_membership_tests<S, F>(factory: &F) -> Vec<TestResult>
where
    S: SelectionStore,
    F: Fn() -> S,
{
    vec![
        TestResult::from_result(
            "membership",
            "new_store_is_empty",
            new_store_is_empty(factory()),
        ),
        TestResult::from_result(
            "membership",
            "add_then_contains",
            add_then_contains(factory()),
        ),
        TestResult::from_result(
            "membership",
            "add_is_idempotent",
            add_is_idempotent(factory()),
        ),
        TestResult::from_result(
            "membership",
            "remove_then_not_contains",
            remove_then_not_contains(factory()),
        ),
        TestResult::from_result(
            "membership",
            "remove_unknown_is_noop",
            remove_unknown_is_noop(factory()),
        ),
        TestResult::from_result(
            "membership",
            "names_are_exact",
            names_are_exact(factory()),
        ),
    ]
}

fn new_store_is_empty<S: SelectionStore>(store: S) -> Result<(), String> {
    expect_eq("contains", step("contains", store.contains("SAST"))?, false)?;
    expect_eq("snapshot size", step("snapshot", store.snapshot())?.len(), 0)
}

fn add_then_contains<S: SelectionStore>(mut store: S) -> Result<(), String> {
    expect_eq("add result", step("add", store.add("SAST"))?, true)?;
    expect_eq("contains", step("contains", store.contains("SAST"))?, true)
}

fn add_is_idempotent<S: SelectionStore>(mut store: S) -> Result<(), String> {
    step("add", store.add("SAST"))?;
    expect_eq("second add result", step("add", store.add("SAST"))?, false)?;
    expect_eq("record count", step("records", store.records())?.len(), 1)
}

fn remove_then_not_contains<S: SelectionStore>(mut store: S) -> Result<(), String> {
    step("add", store.add("SAST"))?;
    step("add", store.add("DAST"))?;
    expect_eq("removed rows", step("remove", store.remove("SAST"))?, 1)?;
    expect_eq("contains removed", step("contains", store.contains("SAST"))?, false)?;
    expect_eq("contains kept", step("contains", store.contains("DAST"))?, true)
}

fn remove_unknown_is_noop<S: SelectionStore>(mut store: S) -> Result<(), String> {
    step("add", store.add("SAST"))?;
    expect_eq("removed rows", step("remove", store.remove("DAST"))?, 0)?;
    expect_eq("record count", step("records", store.records())?.len(), 1)
}

fn names_are_exact<S: SelectionStore>(mut store: S) -> Result<(), String> {
    step("add", store.add("Defined build process"))?;
    expect_eq("prefix", step("contains", store.contains("Defined build"))?, false)?;
    expect_eq(
        "case",
        step("contains", store.contains("defined build process"))?,
        false,
    )
}
