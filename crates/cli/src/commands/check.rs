use std::process;

use maturity_core::{find_cycles, ActivityIndex, Finding, FindingSeverity};
use serde::Serialize;

use super::load_or_exit;
use crate::config::Settings;
use crate::{print_json, OutputFormat};

#[derive(Serialize)]
struct CheckReport<'a> {
    activities: usize,
    dimensions: usize,
    findings: &'a [Finding],
    cycles: Vec<Vec<String>>,
}

pub(crate) fn cmd_check(settings: &Settings, output: OutputFormat, quiet: bool) {
    // Step 1: Load and validate (fatal errors exit here)
    let loaded = load_or_exit(settings, output, quiet);
    let catalogue = &loaded.catalogue;

    // Step 2: Look for dependency cycles
    let index = ActivityIndex::new(catalogue);
    let cycles: Vec<Vec<String>> = find_cycles(&index).into_iter().map(|c| c.path).collect();

    // Step 3: Format output
    let report = CheckReport {
        activities: index.len(),
        dimensions: catalogue.dimensions.len(),
        findings: &loaded.findings,
        cycles,
    };
    if !quiet {
        match output {
            OutputFormat::Json => print_json(&report),
            OutputFormat::Text => {
                println!(
                    "Catalogue: {} activities in {} dimensions",
                    report.activities, report.dimensions
                );
                for finding in report.findings {
                    let severity = match finding.severity {
                        FindingSeverity::Info => "info",
                        FindingSeverity::Warning => "warning",
                    };
                    println!("  {} [{}]: {}", severity, finding.check, finding.message);
                }
                for cycle in &report.cycles {
                    println!(
                        "  error [dependency_cycle]: {}",
                        cycle.join(" \u{2192} ")
                    );
                }
                if report.cycles.is_empty() {
                    println!("OK");
                } else {
                    println!("{} dependency cycle(s) found", report.cycles.len());
                }
            }
        }
    }

    if !report.cycles.is_empty() {
        process::exit(1);
    }
}
