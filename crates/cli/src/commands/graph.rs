use maturity_core::dependency_edges;

use super::load_or_exit;
use crate::config::Settings;
use crate::{print_json, OutputFormat};

pub(crate) fn cmd_graph(settings: &Settings, output: OutputFormat, quiet: bool) {
    let loaded = load_or_exit(settings, output, quiet);
    let edges = dependency_edges(&loaded.catalogue);

    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => print_json(&edges),
        OutputFormat::Text => {
            let mut group: Option<(&str, &str)> = None;
            for edge in &edges {
                let current = (edge.dimension.as_str(), edge.sub_dimension.as_str());
                if group != Some(current) {
                    println!("{} / {}", current.0, current.1);
                    group = Some(current);
                }
                println!(
                    "  {} -> {}{}",
                    edge.from,
                    edge.to,
                    if edge.resolved { "" } else { " (unresolved)" }
                );
            }
        }
    }
}
