use std::collections::BTreeSet;

use super::{expect_eq, step, TestResult};
use crate::SelectionStore;

pub(super) fn run_snapshot_tests<S, F>(factory: &F) -> Vec<TestResult>
where
    S: SelectionStore,
    F: Fn() -> S,
{
    vec![
        TestResult::from_result(
            "snapshot",
            "snapshot_lists_selected",
            snapshot_lists_selected(factory()),
        ),
        TestResult::from_result(
            "snapshot",
            "snapshot_is_detached",
            snapshot_is_detached(factory()),
        ),
        TestResult::from_result(
            "snapshot",
            "records_keep_insertion_order",
            records_keep_insertion_order(factory()),
        ),
        TestResult::from_result(
            "snapshot",
            "names_with_separators_round_trip",
            names_with_separators_round_trip(factory()),
        ),
    ]
}

fn set(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn snapshot_lists_selected<S: SelectionStore>(mut store: S) -> Result<(), String> {
    step("add", store.add("SAST"))?;
    step("add", store.add("DAST"))?;
    expect_eq("snapshot", step("snapshot", store.snapshot())?, set(&["DAST", "SAST"]))
}

fn snapshot_is_detached<S: SelectionStore>(mut store: S) -> Result<(), String> {
    step("add", store.add("SAST"))?;
    let before = step("snapshot", store.snapshot())?;
    step("remove", store.remove("SAST"))?;
    step("add", store.add("DAST"))?;
    expect_eq("earlier snapshot", before, set(&["SAST"]))
}

fn records_keep_insertion_order<S: SelectionStore>(mut store: S) -> Result<(), String> {
    for name in ["Zeta", "Alpha", "Mu"] {
        step("add", store.add(name))?;
    }
    let order: Vec<String> = step("records", store.records())?
        .into_iter()
        .map(|r| r.element)
        .collect();
    expect_eq("record order", order, vec!["Zeta".into(), "Alpha".into(), "Mu".into()])
}

fn names_with_separators_round_trip<S: SelectionStore>(mut store: S) -> Result<(), String> {
    let name = "Review, then \"sign off\"";
    step("add", store.add(name))?;
    expect_eq("contains", step("contains", store.contains(name))?, true)?;
    expect_eq("snapshot", step("snapshot", store.snapshot())?, set(&[name]))
}
