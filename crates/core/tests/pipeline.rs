//! End-to-end checks: YAML text in, filtered and scored report out.

use maturity_core::{
    build_report, collect_difficulty_elements, compute_difficulty, find_cycles, load_catalogue,
    summarize, ActivityIndex, CatalogueError, FindingSeverity, InMemoryProvider, ReportOptions,
};
use std::collections::BTreeSet;
use std::path::PathBuf;

const CATALOGUE: &str = r#"
meta:
  version: 4
---
Build and Deployment:
  _meta:
    description: How artifacts are built and shipped
  Build:
    Defined build process:
      uuid: f6f7737f-25a9-4317-8de2-09bf59f29b5b
      level: 1
      usefulness: 4
      difficultyOfImplementation:
        knowledge: 3
        time: 4
        resources: 2
      samm2: [I-SB-A-1]
    Building and testing of artifacts in virtual environments:
      level: 2
      usefulness: 3
      difficultyOfImplementation:
        knowledge: [1, 2, 1, 2]
        time: 1
        resources: 1
      dependsOn:
        - f6f7737f-25a9-4317-8de2-09bf59f29b5b
Test and Verification:
  Static depth:
    Test of the configuration of cloud environments:
      level: 2
      usefulness: 2
      difficultyOfImplementation: {knowledge: 5, time: 5, resources: 5}
      dependsOn: [Building and testing of artifacts in virtual environments, Missing activity]
      references:
        openCRE: ["227-045"]
"#;

fn load() -> maturity_core::LoadedCatalogue {
    let provider = InMemoryProvider::default().with_file("/data/activities.yaml", CATALOGUE);
    load_catalogue(&provider, &[PathBuf::from("/data/activities.yaml")]).unwrap()
}

fn selection(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

// ──────────────────────────────────────────────
// Loading
// ──────────────────────────────────────────────

#[test]
fn load_reports_dangling_dependency_only() {
    let loaded = load();
    assert_eq!(loaded.catalogue.activity_count(), 3);
    assert_eq!(loaded.findings.len(), 1);
    assert_eq!(loaded.findings[0].check, "dangling_dependency");
    assert_eq!(loaded.findings[0].severity, FindingSeverity::Info);
}

#[test]
fn uuid_dependency_is_rewritten_to_name() {
    let loaded = load();
    let activity = &loaded.catalogue.dimensions["Build and Deployment"].sub_dimensions["Build"]
        ["Building and testing of artifacts in virtual environments"];
    assert_eq!(activity.depends_on, vec!["Defined build process"]);
}

#[test]
fn out_of_range_rating_fails_the_load() {
    let text = "D:\n  S:\n    a:\n      level: 1\n      usefulness: 9\n      difficultyOfImplementation: {knowledge: 1, time: 1, resources: 1}\n";
    let provider = InMemoryProvider::default().with_file("/x.yaml", text);
    let err = load_catalogue(&provider, &[PathBuf::from("/x.yaml")]).unwrap_err();
    assert!(matches!(err, CatalogueError::OutOfRange { field: "usefulness", .. }));
}

// ──────────────────────────────────────────────
// Scoring
// ──────────────────────────────────────────────

#[test]
fn aggregated_scores_follow_the_chain() {
    let loaded = load();
    let index = ActivityIndex::new(&loaded.catalogue);

    let build = index.get_element_by_name("Defined build process");
    assert_eq!(compute_difficulty(&index, build, false).unwrap(), Some(3.25));

    let virt = index.get_element_by_name("Building and testing of artifacts in virtual environments");
    assert_eq!(compute_difficulty(&index, virt, false).unwrap(), Some(1.125));
    assert_eq!(compute_difficulty(&index, virt, true).unwrap(), Some(4.375));

    let cloud = index.get_element_by_name("Test of the configuration of cloud environments");
    assert_eq!(compute_difficulty(&index, cloud, true).unwrap(), Some(5.0));

    let mut elements = Vec::new();
    collect_difficulty_elements(&index, virt, true, &mut elements).unwrap();
    assert_eq!(elements, vec![1.5, 1.0, 1.0, 1.0, 3.0, 4.0, 4.0, 2.0]);

    assert!(find_cycles(&index).is_empty());
}

#[test]
fn unknown_activity_scores_none() {
    let loaded = load();
    let index = ActivityIndex::new(&loaded.catalogue);
    let missing = index.get_element_by_name("Nope");
    assert_eq!(compute_difficulty(&index, missing, true).unwrap(), None);
}

// ──────────────────────────────────────────────
// Views
// ──────────────────────────────────────────────

#[test]
fn planned_report_hides_selected_but_keeps_their_weight() {
    let loaded = load();
    let options = ReportOptions::from_query([("planned", "true"), ("aggregated", "true")]);
    let report = build_report(
        &loaded.catalogue,
        &selection(&["Defined build process"]),
        options,
    )
    .unwrap();

    let names: Vec<&str> = report.rows.iter().map(|r| r.activity.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Building and testing of artifacts in virtual environments",
            "Test of the configuration of cloud environments",
        ]
    );
    assert_eq!(report.rows[0].difficulty_display, "4.38");
    assert_eq!(report.rows[1].difficulty_display, "5.00");
    assert_eq!(report.rows[1].references["openCRE"], vec!["227-045"]);
}

#[test]
fn summary_covers_every_sub_dimension() {
    let loaded = load();
    let summaries = summarize(&loaded.catalogue, false).unwrap();
    let keys: Vec<(&str, &str)> = summaries
        .iter()
        .map(|s| (s.dimension.as_str(), s.sub_dimension.as_str()))
        .collect();
    assert_eq!(
        keys,
        vec![("Build and Deployment", "Build"), ("Test and Verification", "Static depth")]
    );
    assert_eq!(summaries[0].levels.len(), 2);
}
