//! One-time migration pass applied right after a catalogue is loaded.
//!
//! After [`prepare`] every activity carries its reference mappings in
//! `references`, its `dependsOn` entries are activity names, and all
//! ratings are within range. Later stages rely on this without re-checking.

use crate::error::CatalogueError;
use crate::index::ActivityIndex;
use crate::model::{Activity, Catalogue, Knowledge};
use crate::report::{Finding, FindingSeverity};
use std::collections::BTreeMap;

pub const SAMM2: &str = "samm2";
pub const ISO27001_2017: &str = "iso27001-2017";

/// A migrated, validated catalogue plus the data-quality findings raised
/// while preparing it.
#[derive(Debug, Clone)]
pub struct LoadedCatalogue {
    pub catalogue: Catalogue,
    pub findings: Vec<Finding>,
}

/// Fold the legacy top-level `samm2` / `iso27001-2017` fields into
/// `references`.
///
/// An activity whose `references` is already non-empty is returned as is.
pub fn normalize_references(activity: &Activity) -> Activity {
    if !activity.references.is_empty() {
        return activity.clone();
    }
    let mut migrated = activity.clone();
    let mut references = BTreeMap::new();
    references.insert(SAMM2.to_string(), migrated.samm2.take().unwrap_or_default());
    references.insert(
        ISO27001_2017.to_string(),
        migrated.iso27001_2017.take().unwrap_or_default(),
    );
    migrated.references = references;
    migrated
}

/// Check the rating ranges and the knowledge shape of one activity.
pub fn validate_activity(name: &str, activity: &Activity) -> Result<(), CatalogueError> {
    check_range(name, "level", f64::from(activity.level), 1, 4)?;
    check_range(name, "usefulness", f64::from(activity.usefulness), 1, 5)?;

    let d = &activity.difficulty;
    match &d.knowledge {
        Knowledge::Scalar(value) => check_range(name, "knowledge", f64::from(*value), 1, 5)?,
        Knowledge::Areas(areas) => {
            if areas.len() != crate::knowledge::KNOWLEDGE_AREAS {
                return Err(CatalogueError::MalformedKnowledge {
                    activity: name.to_string(),
                    found: areas.len(),
                });
            }
            for value in areas {
                check_range(name, "knowledge", f64::from(*value), 1, 5)?;
            }
        }
    }
    check_range(name, "time", f64::from(d.time), 1, 5)?;
    check_range(name, "resources", f64::from(d.resources), 1, 5)?;
    Ok(())
}

fn check_range(
    activity: &str,
    field: &'static str,
    value: f64,
    min: u8,
    max: u8,
) -> Result<(), CatalogueError> {
    if value < f64::from(min) || value > f64::from(max) {
        return Err(CatalogueError::OutOfRange {
            activity: activity.to_string(),
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Rewrite `dependsOn` entries naming another activity's `uuid` to that
/// activity's name. A uuid shared by several activities resolves to the
/// first in catalogue order. Returns the number of entries rewritten.
pub fn resolve_uuid_dependencies(catalogue: &mut Catalogue) -> usize {
    let mut rewrites: Vec<(usize, usize, String)> = Vec::new();
    {
        let index = ActivityIndex::new(catalogue);
        for entry in index.entries() {
            for (slot, dependency) in entry.activity.depends_on.iter().enumerate() {
                if let Some(target) = index.find_by_uuid(dependency) {
                    rewrites.push((entry.position, slot, target.name.to_string()));
                }
            }
        }
    }
    if rewrites.is_empty() {
        return 0;
    }

    let rewritten = rewrites.len();
    let mut pending = rewrites.into_iter().peekable();
    for (position, (_, activity)) in catalogue.activities_mut().enumerate() {
        while let Some((_, slot, name)) = pending.next_if(|(p, _, _)| *p == position) {
            activity.depends_on[slot] = name;
        }
    }
    rewritten
}

/// Run the migration pass: normalize references, resolve uuid
/// dependencies, validate every activity, then collect findings for
/// duplicate names and dangling dependencies.
pub fn prepare(mut catalogue: Catalogue) -> Result<LoadedCatalogue, CatalogueError> {
    for (_, activity) in catalogue.activities_mut() {
        *activity = normalize_references(activity);
    }

    let rewritten = resolve_uuid_dependencies(&mut catalogue);
    if rewritten > 0 {
        tracing::debug!(rewritten, "resolved uuid dependencies to activity names");
    }

    for entry in catalogue.activities() {
        validate_activity(entry.name, entry.activity)?;
    }

    let findings = collect_findings(&catalogue);
    Ok(LoadedCatalogue {
        catalogue,
        findings,
    })
}

fn collect_findings(catalogue: &Catalogue) -> Vec<Finding> {
    let index = ActivityIndex::new(catalogue);
    let mut findings = Vec::new();

    for (name, locations) in index.duplicates() {
        let places: Vec<String> = locations
            .iter()
            .map(|l| format!("{} / {}", l.dimension, l.sub_dimension))
            .collect();
        tracing::warn!(
            activity = name,
            locations = %places.join("; "),
            "duplicate activity name, lookups use the first location"
        );
        findings.push(Finding {
            check: "duplicate_name".to_string(),
            severity: FindingSeverity::Warning,
            message: format!(
                "Activity '{}' is defined {} times ({}); dependencies resolve to the first",
                name,
                places.len(),
                places.join(", ")
            ),
            activity: Some(name.to_string()),
            details: Some(serde_json::json!({ "locations": places })),
        });
    }

    for (uuid, owners) in index.duplicate_uuids() {
        let names: Vec<&str> = owners.iter().map(|o| o.name).collect();
        tracing::warn!(
            uuid,
            activities = %names.join(", "),
            "duplicate activity uuid, uuid dependencies use the first owner"
        );
        findings.push(Finding {
            check: "duplicate_uuid".to_string(),
            severity: FindingSeverity::Warning,
            message: format!(
                "Activity uuid '{}' is shared by '{}'; dependencies on it resolve to '{}'",
                uuid,
                names.join("', '"),
                names[0]
            ),
            activity: Some(names[0].to_string()),
            details: Some(serde_json::json!({ "uuid": uuid, "activities": names })),
        });
    }

    for entry in index.entries() {
        for dependency in &entry.activity.depends_on {
            if index.contains(dependency) {
                continue;
            }
            tracing::warn!(
                activity = entry.name,
                dependency = dependency.as_str(),
                "dependency does not resolve to any activity"
            );
            findings.push(Finding {
                check: "dangling_dependency".to_string(),
                severity: FindingSeverity::Info,
                message: format!(
                    "Activity '{}' depends on unknown activity '{}'; it contributes nothing to aggregated scores",
                    entry.name, dependency
                ),
                activity: Some(entry.name.to_string()),
                details: Some(serde_json::json!({ "dependency": dependency })),
            });
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> Catalogue {
        Catalogue::from_value(&value).unwrap()
    }

    fn legacy_activity() -> Activity {
        serde_json::from_value(json!({
            "level": 2,
            "usefulness": 3,
            "difficultyOfImplementation": {"knowledge": 2, "time": 3, "resources": 1},
            "samm2": ["I-SB-A-2"],
            "iso27001-2017": ["12.1.2", "14.2.2"]
        }))
        .unwrap()
    }

    #[test]
    fn legacy_fields_move_into_references() {
        let migrated = normalize_references(&legacy_activity());
        assert_eq!(migrated.references[SAMM2], vec!["I-SB-A-2"]);
        assert_eq!(migrated.references[ISO27001_2017], vec!["12.1.2", "14.2.2"]);
        assert!(migrated.samm2.is_none());
        assert!(migrated.iso27001_2017.is_none());
    }

    #[test]
    fn missing_legacy_fields_become_empty_lists() {
        let mut activity = legacy_activity();
        activity.samm2 = None;
        activity.iso27001_2017 = None;
        let migrated = normalize_references(&activity);
        assert!(migrated.references[SAMM2].is_empty());
        assert!(migrated.references[ISO27001_2017].is_empty());
    }

    #[test]
    fn existing_references_are_kept() {
        let mut activity = legacy_activity();
        activity
            .references
            .insert("openCRE".to_string(), vec!["227-045".to_string()]);
        let migrated = normalize_references(&activity);
        assert_eq!(migrated, activity);
    }

    #[test]
    fn normalize_references_is_idempotent() {
        let once = normalize_references(&legacy_activity());
        let twice = normalize_references(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn normalize_references_leaves_input_untouched() {
        let original = legacy_activity();
        let _ = normalize_references(&original);
        assert_eq!(original.samm2, Some(vec!["I-SB-A-2".to_string()]));
    }

    #[test]
    fn three_area_knowledge_is_rejected() {
        let catalogue = parse(json!({"D": {"S": {"a": {
            "level": 1, "usefulness": 1,
            "difficultyOfImplementation": {"knowledge": [1, 2, 3], "time": 1, "resources": 1}
        }}}}));
        match prepare(catalogue) {
            Err(CatalogueError::MalformedKnowledge { activity, found }) => {
                assert_eq!(activity, "a");
                assert_eq!(found, 3);
            }
            other => panic!("expected malformed knowledge, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn level_out_of_range_is_rejected() {
        let catalogue = parse(json!({"D": {"S": {"a": {
            "level": 5, "usefulness": 1,
            "difficultyOfImplementation": {"knowledge": 1, "time": 1, "resources": 1}
        }}}}));
        assert!(matches!(
            prepare(catalogue),
            Err(CatalogueError::OutOfRange { field: "level", .. })
        ));
    }

    #[test]
    fn zero_time_is_rejected() {
        let catalogue = parse(json!({"D": {"S": {"a": {
            "level": 1, "usefulness": 1,
            "difficultyOfImplementation": {"knowledge": 1, "time": 0, "resources": 1}
        }}}}));
        assert!(matches!(
            prepare(catalogue),
            Err(CatalogueError::OutOfRange { field: "time", .. })
        ));
    }

    #[test]
    fn uuid_dependencies_become_names() {
        let catalogue = parse(json!({"D": {"S": {
            "Base": {
                "uuid": "0e0b2d3e-9d5a-4b6c-8f1e-2a7d6c5b4a39",
                "level": 1, "usefulness": 1,
                "difficultyOfImplementation": {"knowledge": 1, "time": 1, "resources": 1}
            },
            "Top": {
                "level": 2, "usefulness": 2,
                "difficultyOfImplementation": {"knowledge": 1, "time": 1, "resources": 1},
                "dependsOn": ["0e0b2d3e-9d5a-4b6c-8f1e-2a7d6c5b4a39", "Base"]
            }
        }}}));
        let loaded = prepare(catalogue).unwrap();
        let top = &loaded.catalogue.dimensions["D"].sub_dimensions["S"]["Top"];
        assert_eq!(top.depends_on, vec!["Base", "Base"]);
        assert!(loaded.findings.is_empty());
    }

    #[test]
    fn shared_uuid_resolves_to_first_owner_with_warning() {
        let owned = |deps: &[&str]| {
            json!({
                "uuid": "11111111-1111-4111-8111-111111111111",
                "level": 1, "usefulness": 1,
                "difficultyOfImplementation": {"knowledge": 1, "time": 1, "resources": 1},
                "dependsOn": deps
            })
        };
        let catalogue = parse(json!({"D": {"S": {
            "Base": owned(&[]),
            "Other": owned(&[]),
            "Top": {
                "level": 2, "usefulness": 2,
                "difficultyOfImplementation": {"knowledge": 1, "time": 1, "resources": 1},
                "dependsOn": ["11111111-1111-4111-8111-111111111111"]
            }
        }}}));
        let loaded = prepare(catalogue).unwrap();
        let top = &loaded.catalogue.dimensions["D"].sub_dimensions["S"]["Top"];
        assert_eq!(top.depends_on, vec!["Base"]);

        assert_eq!(loaded.findings.len(), 1);
        let finding = &loaded.findings[0];
        assert_eq!(finding.check, "duplicate_uuid");
        assert_eq!(finding.severity, FindingSeverity::Warning);
        assert!(finding.message.contains("'Base', 'Other'"));
    }

    #[test]
    fn findings_report_duplicates_and_dangling_dependencies() {
        let record = |deps: &[&str]| {
            json!({
                "level": 1, "usefulness": 1,
                "difficultyOfImplementation": {"knowledge": 1, "time": 1, "resources": 1},
                "dependsOn": deps
            })
        };
        let catalogue = parse(json!({
            "D1": {"S": {"Twin": record(&[]), "Lonely": record(&["Ghost"])}},
            "D2": {"S": {"Twin": record(&[])}}
        }));
        let loaded = prepare(catalogue).unwrap();
        let checks: Vec<&str> = loaded.findings.iter().map(|f| f.check.as_str()).collect();
        assert_eq!(checks, vec!["duplicate_name", "dangling_dependency"]);
        assert_eq!(loaded.findings[0].severity, FindingSeverity::Warning);
        assert_eq!(loaded.findings[1].activity.as_deref(), Some("Lonely"));
    }

    #[test]
    fn prepare_migrates_every_activity() {
        let catalogue = parse(json!({"D": {"S": {"a": {
            "level": 1, "usefulness": 1,
            "difficultyOfImplementation": {"knowledge": 1, "time": 1, "resources": 1},
            "samm2": ["D-MS-B-1"]
        }}}}));
        let loaded = prepare(catalogue).unwrap();
        let a = &loaded.catalogue.dimensions["D"].sub_dimensions["S"]["a"];
        assert_eq!(a.references[SAMM2], vec!["D-MS-B-1"]);
        assert!(a.samm2.is_none());
    }
}
