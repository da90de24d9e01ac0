//! maturity-core: activity catalogue model and difficulty scoring.
//!
//! Loads a maturity-model catalogue (dimension → sub-dimension → activity),
//! migrates legacy fields, and answers the questions a report needs:
//! how hard an activity is to implement, optionally including everything it
//! depends on, and which activities to show given a selection.
//!
//! # Public API
//!
//! - [`load_catalogue()`] -- read, merge and migrate YAML catalogue files
//! - [`ActivityIndex`] -- name lookup (first match wins on duplicates)
//! - [`compute_difficulty()`] / [`collect_difficulty_elements()`] -- scoring
//! - [`filter_by_state()`] -- performed / planned selection filter
//! - [`build_report()`], [`summarize()`], [`dependency_edges()`] -- report views

pub mod error;
pub mod filter;
pub mod graph;
pub mod index;
pub mod knowledge;
pub mod load;
pub mod migrate;
pub mod model;
pub mod options;
pub mod report;
pub mod resolve;
pub mod source;
pub mod summary;

// ── Convenience re-exports: key types ────────────────────────────────

pub use error::{CatalogueError, CyclicDependencyError};
pub use index::{ActivityIndex, ActivityRef};
pub use migrate::LoadedCatalogue;
pub use model::{Activity, ActivityEntry, Catalogue, DifficultyOfImplementation, Dimension, Knowledge};
pub use options::ReportOptions;
pub use report::{ActivityReport, Finding, FindingSeverity, ReportRow};
pub use source::{FileSystemProvider, InMemoryProvider, SourceProvider};
pub use summary::{Band, Stats, SubDimensionSummary};

// ── Convenience re-exports: operations ───────────────────────────────

pub use filter::filter_by_state;
pub use graph::{dependency_edges, DependencyEdge};
pub use knowledge::normalize_knowledge;
pub use load::{load_catalogue, load_catalogue_files};
pub use migrate::normalize_references;
pub use report::{build_report, format_score};
pub use resolve::{collect_difficulty_elements, compute_difficulty, find_cycles};
pub use summary::summarize;
