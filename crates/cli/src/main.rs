mod commands;
mod config;
mod logging;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::{Overrides, Settings};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Security maturity model report tool.
#[derive(Parser)]
#[command(name = "maturity", version, about = "Security maturity model report tool")]
struct Cli {
    /// Config file (default: ./maturity.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Catalogue YAML file; repeat to merge several files in order
    #[arg(long = "catalogue", global = true, value_name = "FILE")]
    catalogue: Vec<PathBuf>,

    /// Selection CSV file holding the performed activities
    #[arg(long, global = true, value_name = "FILE")]
    selection: Option<PathBuf>,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Log debug details to stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate the catalogue, report findings and dependency cycles
    Check,

    /// List activities with their difficulty scores
    Report {
        /// Show activities that are selected (performed)
        #[arg(long)]
        performed: bool,
        /// Show activities that are not selected yet (planned)
        #[arg(long)]
        planned: bool,
        /// Include dependency scores in each difficulty
        #[arg(long)]
        aggregated: bool,
    },

    /// Difficulty score of a single activity
    Score {
        /// Activity name
        activity: String,
        /// Include dependency scores
        #[arg(long)]
        aggregated: bool,
        /// Print the raw difficulty elements instead of the score
        #[arg(long)]
        elements: bool,
    },

    /// Mark an activity as performed
    Select {
        /// Activity name
        activity: String,
    },

    /// Remove an activity from the selection
    Deselect {
        /// Activity name
        activity: String,
    },

    /// List the selected activities
    Selected,

    /// Usefulness and difficulty per sub-dimension and level
    Summary {
        /// Include dependency elements in the difficulty statistics
        #[arg(long)]
        aggregated: bool,
    },

    /// List declared dependencies between activities
    Graph,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.quiet, cli.verbose);

    let settings = match Settings::resolve(Overrides {
        config: cli.config,
        catalogue: cli.catalogue,
        selection: cli.selection,
    }) {
        Ok(s) => s,
        Err(e) => {
            report_error(&e.to_string(), cli.output, cli.quiet);
            process::exit(1);
        }
    };

    match cli.command {
        Commands::Check => commands::check::cmd_check(&settings, cli.output, cli.quiet),
        Commands::Report {
            performed,
            planned,
            aggregated,
        } => commands::report::cmd_report(
            &settings,
            commands::report::ReportFlags {
                performed,
                planned,
                aggregated,
            },
            cli.output,
            cli.quiet,
        ),
        Commands::Score {
            activity,
            aggregated,
            elements,
        } => commands::score::cmd_score(
            &settings,
            &activity,
            aggregated || settings.report.aggregated,
            elements,
            cli.output,
            cli.quiet,
        ),
        Commands::Select { activity } => {
            commands::selection::cmd_select(&settings, &activity, cli.output, cli.quiet)
        }
        Commands::Deselect { activity } => {
            commands::selection::cmd_deselect(&settings, &activity, cli.output, cli.quiet)
        }
        Commands::Selected => commands::selection::cmd_selected(&settings, cli.output, cli.quiet),
        Commands::Summary { aggregated } => commands::summary::cmd_summary(
            &settings,
            aggregated || settings.report.aggregated,
            cli.output,
            cli.quiet,
        ),
        Commands::Graph => commands::graph::cmd_graph(&settings, cli.output, cli.quiet),
    }
}

/// Print an error message to stderr in the requested format.
pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("error: {}", msg),
        OutputFormat::Json => eprintln!("{}", serde_json::json!({ "error": msg })),
    }
}

/// Print `value` as pretty JSON on stdout.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) {
    let json = serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e));
    println!("{}", json);
}
