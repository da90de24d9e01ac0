use std::collections::BTreeSet;

use crate::error::StoreError;
use crate::record::SelectionRecord;

/// The set of activities a team has marked as performed.
///
/// ## Semantics
///
/// - `add` is idempotent: selecting an already selected activity leaves the
///   store unchanged and returns `false`.
/// - `remove` deletes every row for the activity and returns how many were
///   removed (0 when it was not selected).
/// - `snapshot` is a point-in-time copy; later mutations do not affect it.
///
/// ## Persistence
///
/// File-backed implementations apply each mutation as one
/// read-modify-write under an exclusive lock and replace the file
/// atomically, so concurrent writers never lose an update.
pub trait SelectionStore {
    /// Whether `element` is selected.
    fn contains(&self, element: &str) -> Result<bool, StoreError>;

    /// Select `element`. Returns whether it was newly added.
    fn add(&mut self, element: &str) -> Result<bool, StoreError>;

    /// Deselect `element`. Returns the number of rows removed.
    fn remove(&mut self, element: &str) -> Result<usize, StoreError>;

    /// All selected activity names.
    fn snapshot(&self) -> Result<BTreeSet<String>, StoreError> {
        Ok(self.records()?.into_iter().map(|r| r.element).collect())
    }

    /// Every stored row, in store order.
    fn records(&self) -> Result<Vec<SelectionRecord>, StoreError>;
}
