use crate::error::StoreError;
use crate::record::{SelectionRecord, SelectionTable};
use crate::traits::SelectionStore;

/// A selection store held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySelectionStore {
    table: SelectionTable,
}

impl MemorySelectionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SelectionStore for MemorySelectionStore {
    fn contains(&self, element: &str) -> Result<bool, StoreError> {
        Ok(self.table.contains(element))
    }

    fn add(&mut self, element: &str) -> Result<bool, StoreError> {
        Ok(self.table.add(element))
    }

    fn remove(&mut self, element: &str) -> Result<usize, StoreError> {
        Ok(self.table.remove(element))
    }

    fn records(&self) -> Result<Vec<SelectionRecord>, StoreError> {
        Ok(self.table.rows.clone())
    }
}
