use std::process;

use maturity_core::ActivityIndex;
use maturity_storage::{CsvSelectionStore, SelectionStore, StoreError};
use serde_json::json;

use super::load_or_exit;
use crate::config::Settings;
use crate::{print_json, report_error, OutputFormat};

fn exit_on_store_error<T>(result: Result<T, StoreError>, output: OutputFormat, quiet: bool) -> T {
    match result {
        Ok(v) => v,
        Err(e) => {
            report_error(&e.to_string(), output, quiet);
            process::exit(1);
        }
    }
}

pub(crate) fn cmd_select(settings: &Settings, activity: &str, output: OutputFormat, quiet: bool) {
    let loaded = load_or_exit(settings, output, quiet);
    if !ActivityIndex::new(&loaded.catalogue).contains(activity) {
        report_error(&format!("unknown activity '{}'", activity), output, quiet);
        process::exit(1);
    }

    let mut store = CsvSelectionStore::new(&settings.selection);
    let added = exit_on_store_error(store.add(activity), output, quiet);

    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => print_json(&json!({ "activity": activity, "changed": added })),
        OutputFormat::Text if added => println!("selected '{}'", activity),
        OutputFormat::Text => println!("'{}' is already selected", activity),
    }
}

/// Deselecting a name the catalogue no longer knows is allowed as long as
/// the store still holds it, so stale rows can be cleaned up.
pub(crate) fn cmd_deselect(settings: &Settings, activity: &str, output: OutputFormat, quiet: bool) {
    let loaded = load_or_exit(settings, output, quiet);
    let mut store = CsvSelectionStore::new(&settings.selection);
    let known = ActivityIndex::new(&loaded.catalogue).contains(activity)
        || exit_on_store_error(store.contains(activity), output, quiet);
    if !known {
        report_error(&format!("unknown activity '{}'", activity), output, quiet);
        process::exit(1);
    }

    let removed = exit_on_store_error(store.remove(activity), output, quiet);
    let changed = removed > 0;

    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => print_json(&json!({ "activity": activity, "changed": changed })),
        OutputFormat::Text if changed => println!("deselected '{}'", activity),
        OutputFormat::Text => println!("'{}' is not selected", activity),
    }
}

pub(crate) fn cmd_selected(settings: &Settings, output: OutputFormat, quiet: bool) {
    let store = CsvSelectionStore::new(&settings.selection);
    let records = exit_on_store_error(store.records(), output, quiet);

    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => print_json(&records),
        OutputFormat::Text => {
            for record in &records {
                println!("{}", record.element);
            }
        }
    }
}
