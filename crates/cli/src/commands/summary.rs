use std::process;

use maturity_core::summarize;

use super::load_or_exit;
use crate::config::Settings;
use crate::{print_json, report_error, OutputFormat};

pub(crate) fn cmd_summary(settings: &Settings, aggregated: bool, output: OutputFormat, quiet: bool) {
    let loaded = load_or_exit(settings, output, quiet);
    let summaries = match summarize(&loaded.catalogue, aggregated) {
        Ok(s) => s,
        Err(e) => {
            report_error(&e.to_string(), output, quiet);
            process::exit(1);
        }
    };

    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => print_json(&summaries),
        OutputFormat::Text => {
            for summary in &summaries {
                println!("{} / {}", summary.dimension, summary.sub_dimension);
                for (level, stats) in &summary.levels {
                    println!(
                        "  level {}: {} activities, usefulness {:.2} \u{b1}{:.2} ({}), difficulty {:.2} \u{b1}{:.2} ({})",
                        level,
                        stats.activity_count,
                        stats.usefulness.mean,
                        stats.usefulness.std_dev,
                        stats.usefulness_band.label(),
                        stats.difficulty.mean,
                        stats.difficulty.std_dev,
                        stats.difficulty_band.label()
                    );
                }
            }
        }
    }
}
