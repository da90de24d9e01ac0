//! Report flags shared by the filter, the resolver and the CLI.

use serde::{Deserialize, Serialize};

/// Flags controlling which activities a report shows and how they are scored.
///
/// Built once per report (from configuration, command-line flags or query
/// parameters) and passed by value to the filter and resolver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    /// Include activities that are selected (already performed).
    pub performed: bool,
    /// Include activities that are not selected yet.
    pub planned: bool,
    /// Add dependency scores into each activity's difficulty.
    pub aggregated: bool,
}

impl ReportOptions {
    /// Parse query-style `(key, value)` pairs. A flag is set only by the
    /// literal value `"true"`; absent keys and any other value leave it unset.
    pub fn from_query<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut options = ReportOptions::default();
        for (key, value) in pairs {
            let flag = value == "true";
            match key {
                "performed" => options.performed = flag,
                "planned" => options.planned = flag,
                "aggregated" => options.aggregated = flag,
                _ => {}
            }
        }
        options
    }

    /// Whether an activity with the given selection state is shown.
    pub fn includes(&self, selected: bool) -> bool {
        (selected && self.performed) || (!selected && self.planned)
    }
}
