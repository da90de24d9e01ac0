use std::process;

use maturity_core::{build_report, ReportOptions};

use super::{load_or_exit, selection_or_exit};
use crate::config::Settings;
use crate::{print_json, report_error, OutputFormat};

/// `report` flags as given on the command line.
pub(crate) struct ReportFlags {
    pub performed: bool,
    pub planned: bool,
    pub aggregated: bool,
}

impl ReportFlags {
    /// Combine with the configured options. Giving either state flag replaces
    /// both configured state flags; `--aggregated` only switches aggregation on.
    fn options(&self, configured: ReportOptions) -> ReportOptions {
        let (performed, planned) = if self.performed || self.planned {
            (self.performed, self.planned)
        } else {
            (configured.performed, configured.planned)
        };
        ReportOptions {
            performed,
            planned,
            aggregated: self.aggregated || configured.aggregated,
        }
    }
}

pub(crate) fn cmd_report(settings: &Settings, flags: ReportFlags, output: OutputFormat, quiet: bool) {
    let loaded = load_or_exit(settings, output, quiet);
    let selection = selection_or_exit(settings, output, quiet);
    let options = flags.options(settings.report);

    let report = match build_report(&loaded.catalogue, &selection, options) {
        Ok(r) => r,
        Err(e) => {
            report_error(&e.to_string(), output, quiet);
            process::exit(1);
        }
    };

    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Text => {
            let mut group: Option<(&str, &str)> = None;
            for row in &report.rows {
                let current = (row.dimension.as_str(), row.sub_dimension.as_str());
                if group != Some(current) {
                    println!("{} / {}", current.0, current.1);
                    group = Some(current);
                }
                println!(
                    "  [{}] {} (level {}, usefulness {}): {}",
                    if row.selected { "x" } else { " " },
                    row.activity,
                    row.level,
                    row.usefulness,
                    row.difficulty_display
                );
            }
            println!(
                "{} of {} activities shown{}",
                report.rows.len(),
                report.activity_count,
                if options.aggregated { " (aggregated)" } else { "" }
            );
        }
    }
}
