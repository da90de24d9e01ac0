pub(crate) mod check;
pub(crate) mod graph;
pub(crate) mod report;
pub(crate) mod score;
pub(crate) mod selection;
pub(crate) mod summary;

use std::collections::BTreeSet;
use std::process;

use maturity_core::{load_catalogue_files, LoadedCatalogue};
use maturity_storage::{CsvSelectionStore, SelectionStore};

use crate::config::Settings;
use crate::{report_error, OutputFormat};

/// Load the configured catalogue, or report the error and exit.
pub(crate) fn load_or_exit(settings: &Settings, output: OutputFormat, quiet: bool) -> LoadedCatalogue {
    let files = match settings.catalogue_files() {
        Ok(files) => files,
        Err(e) => {
            report_error(&e.to_string(), output, quiet);
            process::exit(1);
        }
    };
    match load_catalogue_files(files) {
        Ok(loaded) => loaded,
        Err(e) => {
            report_error(&e.to_string(), output, quiet);
            process::exit(1);
        }
    }
}

/// Names of the selected activities, or report the error and exit.
pub(crate) fn selection_or_exit(
    settings: &Settings,
    output: OutputFormat,
    quiet: bool,
) -> BTreeSet<String> {
    match CsvSelectionStore::new(&settings.selection).snapshot() {
        Ok(snapshot) => snapshot,
        Err(e) => {
            report_error(&e.to_string(), output, quiet);
            process::exit(1);
        }
    }
}
