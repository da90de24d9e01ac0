//! Difficulty scoring and dependency aggregation.
//!
//! The base score of an activity is
//! `(knowledge + 2 * time + resources) / 4`. With aggregation enabled the
//! score of every resolvable `dependsOn` entry is added on top, recursively,
//! and each node's total is capped at [`MAX_SCORE`] before it is added to
//! its parent.
//!
//! The walk uses an explicit stack over the [`ActivityIndex`] arena and
//! tracks the activities on the current path. Reaching one of them again is
//! a [`CyclicDependencyError`]. An activity reached twice through different
//! branches (a diamond) is not a cycle and contributes twice.

use crate::error::CyclicDependencyError;
use crate::index::{ActivityIndex, ActivityRef};
use crate::knowledge::normalize_knowledge;
use crate::model::Activity;
use std::collections::HashSet;

/// Upper bound of every score.
pub const MAX_SCORE: f64 = 5.0;

/// Score of a single activity, dependencies ignored.
pub fn base_score(activity: &Activity) -> f64 {
    let d = &activity.difficulty;
    (normalize_knowledge(activity) + f64::from(d.time) * 2.0 + f64::from(d.resources)) / 4.0
}

/// The four raw components behind [`base_score`]: knowledge, time, time
/// again (it carries double weight), resources.
pub fn difficulty_elements(activity: &Activity) -> [f64; 4] {
    let d = &activity.difficulty;
    let time = f64::from(d.time);
    [normalize_knowledge(activity), time, time, f64::from(d.resources)]
}

/// Difficulty score of `activity`, optionally aggregated over its
/// dependencies.
///
/// Returns `Ok(None)` when `activity` is `None`, so an unresolved lookup can
/// be passed straight through. Dependencies that do not resolve contribute
/// nothing.
pub fn compute_difficulty(
    index: &ActivityIndex<'_>,
    activity: Option<&ActivityRef<'_>>,
    aggregated: bool,
) -> Result<Option<f64>, CyclicDependencyError> {
    let Some(root) = activity else {
        return Ok(None);
    };
    let value = walk(index, root.position, aggregated, |node| base_score(node.activity))?;
    Ok(Some(value))
}

/// Same walk as [`compute_difficulty`], but appends the
/// [`difficulty_elements`] of every visited activity to `elements`
/// (the activity itself first, then its dependencies depth-first).
///
/// On a cycle `elements` is left as it was.
pub fn collect_difficulty_elements(
    index: &ActivityIndex<'_>,
    activity: Option<&ActivityRef<'_>>,
    aggregated: bool,
    elements: &mut Vec<f64>,
) -> Result<(), CyclicDependencyError> {
    let Some(root) = activity else {
        return Ok(());
    };
    let mut visited = Vec::new();
    walk(index, root.position, aggregated, |node| {
        visited.extend_from_slice(&difficulty_elements(node.activity));
        0.0
    })?;
    elements.append(&mut visited);
    Ok(())
}

/// Every distinct dependency cycle in the catalogue, in catalogue order of
/// the first activity that reaches it.
pub fn find_cycles(index: &ActivityIndex<'_>) -> Vec<CyclicDependencyError> {
    let mut seen = HashSet::new();
    let mut cycles = Vec::new();
    for entry in index.entries() {
        if let Err(err) = compute_difficulty(index, Some(entry), true) {
            if seen.insert(err.cycle_key()) {
                cycles.push(err);
            }
        }
    }
    cycles
}

struct Frame {
    position: usize,
    next_dependency: usize,
    value: f64,
}

/// Depth-first walk from `root`. `enter` yields a node's own value when it
/// is first reached; a node's final value is its own value plus the final
/// values of its dependencies, capped at [`MAX_SCORE`].
fn walk<'a, F>(
    index: &ActivityIndex<'a>,
    root: usize,
    aggregated: bool,
    mut enter: F,
) -> Result<f64, CyclicDependencyError>
where
    F: FnMut(&ActivityRef<'a>) -> f64,
{
    let mut on_path: HashSet<usize> = HashSet::new();
    let mut stack: Vec<Frame> = Vec::new();

    if let Some(node) = index.get(root) {
        on_path.insert(root);
        stack.push(Frame {
            position: root,
            next_dependency: 0,
            value: enter(node),
        });
    }

    let mut result = 0.0;
    while let Some(frame) = stack.last_mut() {
        let dependencies: &[String] = match index.get(frame.position) {
            Some(node) if aggregated => node.activity.depends_on.as_slice(),
            _ => &[],
        };

        if let Some(dependency) = dependencies.get(frame.next_dependency) {
            frame.next_dependency += 1;
            let Some(next) = index.get_element_by_name(dependency) else {
                continue;
            };
            if on_path.contains(&next.position) {
                return Err(cycle_error(index, &stack, next));
            }
            on_path.insert(next.position);
            stack.push(Frame {
                position: next.position,
                next_dependency: 0,
                value: enter(next),
            });
            continue;
        }

        let Some(done) = stack.pop() else { break };
        on_path.remove(&done.position);
        let value = done.value.min(MAX_SCORE);
        match stack.last_mut() {
            Some(parent) => parent.value += value,
            None => result = value,
        }
    }

    Ok(result)
}

fn cycle_error(
    index: &ActivityIndex<'_>,
    stack: &[Frame],
    repeated: &ActivityRef<'_>,
) -> CyclicDependencyError {
    let start = stack
        .iter()
        .position(|f| f.position == repeated.position)
        .unwrap_or(0);
    let mut path: Vec<String> = stack[start..]
        .iter()
        .filter_map(|f| index.get(f.position))
        .map(|node| node.name.to_string())
        .collect();
    path.push(repeated.name.to_string());
    CyclicDependencyError { path }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Catalogue;
    use serde_json::json;

    fn activity(knowledge: serde_json::Value, time: u8, resources: u8, deps: &[&str]) -> serde_json::Value {
        json!({
            "level": 1,
            "usefulness": 3,
            "difficultyOfImplementation": {"knowledge": knowledge, "time": time, "resources": resources},
            "dependsOn": deps,
        })
    }

    fn score(catalogue: &Catalogue, name: &str, aggregated: bool) -> Option<f64> {
        let index = ActivityIndex::new(catalogue);
        compute_difficulty(&index, index.get_element_by_name(name), aggregated).unwrap()
    }

    #[test]
    fn base_score_weights_time_twice() {
        let catalogue = Catalogue::from_value(&json!({
            "D": {"S": {"A": activity(json!(3), 4, 2, &[])}}
        }))
        .unwrap();
        assert_eq!(score(&catalogue, "A", false), Some(3.25));
        assert_eq!(score(&catalogue, "A", true), Some(3.25));
    }

    #[test]
    fn aggregated_score_adds_dependencies() {
        let catalogue = Catalogue::from_value(&json!({
            "D": {"S": {
                "A": activity(json!(3), 4, 2, &[]),
                "B": activity(json!([1, 2, 1, 2]), 1, 1, &["A"])
            }}
        }))
        .unwrap();
        assert_eq!(score(&catalogue, "B", false), Some(1.125));
        assert_eq!(score(&catalogue, "B", true), Some(4.375));
    }

    #[test]
    fn aggregated_score_is_capped() {
        let catalogue = Catalogue::from_value(&json!({
            "D": {"S": {
                "A": activity(json!(5), 5, 4, &[]),
                "B": activity(json!(5), 4, 5, &[]),
                "C": activity(json!(1), 1, 1, &["A", "B"])
            }}
        }))
        .unwrap();
        assert_eq!(score(&catalogue, "C", true), Some(5.0));
        assert_eq!(score(&catalogue, "C", false), Some(1.0));
    }

    #[test]
    fn deep_chain_is_capped() {
        // B aggregates to 4.75 + 4.75 = 9.5 and is capped before reaching C.
        let catalogue = Catalogue::from_value(&json!({
            "D": {"S": {
                "A": activity(json!(5), 5, 4, &[]),
                "B": activity(json!(5), 5, 4, &["A"]),
                "C": activity(json!(1), 1, 1, &["B"])
            }}
        }))
        .unwrap();
        let index = ActivityIndex::new(&catalogue);
        let mut elements = Vec::new();
        collect_difficulty_elements(&index, index.get_element_by_name("C"), true, &mut elements)
            .unwrap();
        assert_eq!(elements.len(), 12);
        assert_eq!(score(&catalogue, "C", true), Some(5.0));
    }

    #[test]
    fn missing_dependency_contributes_nothing() {
        let catalogue = Catalogue::from_value(&json!({
            "D": {"S": {"A": activity(json!(2), 2, 2, &["Does not exist"])}}
        }))
        .unwrap();
        assert_eq!(score(&catalogue, "A", true), Some(2.0));
    }

    #[test]
    fn missing_activity_is_none() {
        let catalogue = Catalogue::default();
        let index = ActivityIndex::new(&catalogue);
        assert_eq!(compute_difficulty(&index, None, true), Ok(None));
        assert_eq!(score(&catalogue, "Anything", true), None);
    }

    #[test]
    fn diamond_is_counted_twice() {
        let catalogue = Catalogue::from_value(&json!({
            "D": {"S": {
                "Base": activity(json!(1), 1, 1, &[]),
                "Left": activity(json!(1), 1, 1, &["Base"]),
                "Right": activity(json!(1), 1, 1, &["Base"]),
                "Top": activity(json!(1), 1, 1, &["Left", "Right"])
            }}
        }))
        .unwrap();
        // Top 1 + Left (1 + 1) + Right (1 + 1)
        assert_eq!(score(&catalogue, "Top", true), Some(5.0));
        let index = ActivityIndex::new(&catalogue);
        let mut elements = Vec::new();
        collect_difficulty_elements(&index, index.get_element_by_name("Top"), true, &mut elements)
            .unwrap();
        assert_eq!(elements.len(), 5 * 4);
    }

    #[test]
    fn cycle_is_reported_with_path() {
        let catalogue = Catalogue::from_value(&json!({
            "D": {"S": {
                "A": activity(json!(1), 1, 1, &["B"]),
                "B": activity(json!(1), 1, 1, &["C"]),
                "C": activity(json!(1), 1, 1, &["A"])
            }}
        }))
        .unwrap();
        let index = ActivityIndex::new(&catalogue);
        let err = compute_difficulty(&index, index.get_element_by_name("A"), true).unwrap_err();
        assert_eq!(err.path, vec!["A", "B", "C", "A"]);
    }

    #[test]
    fn cycle_is_ignored_without_aggregation() {
        let catalogue = Catalogue::from_value(&json!({
            "D": {"S": {"A": activity(json!(2), 2, 2, &["A"])}}
        }))
        .unwrap();
        assert_eq!(score(&catalogue, "A", false), Some(2.0));
        let index = ActivityIndex::new(&catalogue);
        let err = compute_difficulty(&index, index.get_element_by_name("A"), true).unwrap_err();
        assert_eq!(err.path, vec!["A", "A"]);
    }

    #[test]
    fn collect_pushes_time_twice() {
        let catalogue = Catalogue::from_value(&json!({
            "D": {"S": {
                "A": activity(json!(3), 4, 2, &[]),
                "B": activity(json!([1, 2, 1, 2]), 1, 1, &["A"])
            }}
        }))
        .unwrap();
        let index = ActivityIndex::new(&catalogue);
        let mut elements = Vec::new();
        collect_difficulty_elements(&index, index.get_element_by_name("B"), true, &mut elements)
            .unwrap();
        assert_eq!(elements, vec![1.5, 1.0, 1.0, 1.0, 3.0, 4.0, 4.0, 2.0]);

        let mut own = Vec::new();
        collect_difficulty_elements(&index, index.get_element_by_name("B"), false, &mut own)
            .unwrap();
        assert_eq!(own, vec![1.5, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn collect_leaves_elements_untouched_on_cycle() {
        let catalogue = Catalogue::from_value(&json!({
            "D": {"S": {
                "A": activity(json!(1), 1, 1, &["B"]),
                "B": activity(json!(2), 2, 2, &["A"])
            }}
        }))
        .unwrap();
        let index = ActivityIndex::new(&catalogue);
        let mut elements = vec![9.0];
        let err = collect_difficulty_elements(&index, index.get_element_by_name("A"), true, &mut elements)
            .unwrap_err();
        assert_eq!(err.path, vec!["A", "B", "A"]);
        assert_eq!(elements, vec![9.0]);
    }

    #[test]
    fn find_cycles_deduplicates() {
        let catalogue = Catalogue::from_value(&json!({
            "D": {"S": {
                "A": activity(json!(1), 1, 1, &["B"]),
                "B": activity(json!(1), 1, 1, &["A"]),
                "C": activity(json!(1), 1, 1, &["A"]),
                "E": activity(json!(1), 1, 1, &[])
            }}
        }))
        .unwrap();
        let index = ActivityIndex::new(&catalogue);
        let cycles = find_cycles(&index);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].cycle_key(), vec!["A", "B"]);
    }

    #[test]
    fn aggregation_never_lowers_score() {
        let catalogue = Catalogue::from_value(&json!({
            "D": {"S": {
                "A": activity(json!(2), 1, 3, &[]),
                "B": activity(json!(1), 2, 1, &["A", "missing"]),
                "C": activity(json!([2, 2, 3, 3]), 3, 2, &["B"])
            }}
        }))
        .unwrap();
        for name in ["A", "B", "C"] {
            let plain = score(&catalogue, name, false).unwrap();
            let aggregated = score(&catalogue, name, true).unwrap();
            assert!(aggregated >= plain, "{}: {} < {}", name, aggregated, plain);
            assert!((1.0..=MAX_SCORE).contains(&aggregated));
        }
    }
}
