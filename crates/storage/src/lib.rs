//! maturity-storage: where the set of selected (performed) activities lives.

pub mod conformance;
mod csv;
mod error;
mod file;
mod memory;
mod record;
mod traits;

pub use csv::{parse_table, write_table};
pub use error::StoreError;
pub use file::CsvSelectionStore;
pub use memory::MemorySelectionStore;
pub use record::{SelectionRecord, SelectionTable, ELEMENT_COLUMN};
pub use traits::SelectionStore;
