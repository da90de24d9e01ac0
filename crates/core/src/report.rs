//! Report rows and data-quality findings.
//!
//! A report is the selection-filtered catalogue with a difficulty score
//! attached to every remaining activity. Findings collect the non-fatal
//! issues noticed while loading or checking a catalogue.

use crate::error::CyclicDependencyError;
use crate::filter::filter_by_state;
use crate::index::ActivityIndex;
use crate::model::Catalogue;
use crate::options::ReportOptions;
use crate::resolve::compute_difficulty;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Severity level for a finding.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum FindingSeverity {
    Info,
    Warning,
}

/// A notable, non-fatal issue in the catalogue.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    /// Short identifier of the check that produced the finding.
    pub check: String,
    pub severity: FindingSeverity,
    pub message: String,
    pub activity: Option<String>,
    pub details: Option<serde_json::Value>,
}

/// One activity row of a report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    pub dimension: String,
    pub sub_dimension: String,
    pub activity: String,
    pub level: u8,
    pub usefulness: u8,
    pub selected: bool,
    pub difficulty: f64,
    /// `difficulty` with two decimals.
    pub difficulty_display: String,
    pub depends_on: Vec<String>,
    pub references: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityReport {
    pub options: ReportOptions,
    pub activity_count: usize,
    pub rows: Vec<ReportRow>,
}

/// Render a score with two decimals, rounding halves away from zero.
pub fn format_score(value: f64) -> String {
    format!("{:.2}", (value * 100.0).round() / 100.0)
}

/// Filter `catalogue` by selection state and score every remaining activity.
///
/// Dependencies are resolved against the full catalogue, so a dependency
/// hidden by the filter still counts towards an aggregated score.
pub fn build_report(
    catalogue: &Catalogue,
    selection: &BTreeSet<String>,
    options: ReportOptions,
) -> Result<ActivityReport, CyclicDependencyError> {
    let index = ActivityIndex::new(catalogue);
    let filtered = filter_by_state(catalogue, selection, options);

    let mut rows = Vec::new();
    for entry in filtered.activities() {
        let located = index
            .find_all_by_name(entry.name)
            .into_iter()
            .find(|r| r.dimension == entry.dimension && r.sub_dimension == entry.sub_dimension);
        let Some(difficulty) = compute_difficulty(&index, located, options.aggregated)? else {
            continue;
        };

        rows.push(ReportRow {
            dimension: entry.dimension.to_string(),
            sub_dimension: entry.sub_dimension.to_string(),
            activity: entry.name.to_string(),
            level: entry.activity.level,
            usefulness: entry.activity.usefulness,
            selected: selection.contains(entry.name),
            difficulty,
            difficulty_display: format_score(difficulty),
            depends_on: entry.activity.depends_on.clone(),
            references: entry.activity.references.clone(),
        });
    }

    Ok(ActivityReport {
        options,
        activity_count: index.len(),
        rows,
    })
}
