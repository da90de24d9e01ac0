use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of the required column holding the activity name.
pub const ELEMENT_COLUMN: &str = "element";

/// One row of the selection store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRecord {
    /// Selected activity name.
    pub element: String,
    /// Any other columns of the row, by header name. Kept verbatim on rewrite.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, String>,
}

impl SelectionRecord {
    pub fn new(element: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            fields: BTreeMap::new(),
        }
    }
}

/// Header plus rows, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionTable {
    pub header: Vec<String>,
    pub rows: Vec<SelectionRecord>,
}

impl Default for SelectionTable {
    fn default() -> Self {
        Self {
            header: vec![ELEMENT_COLUMN.to_string()],
            rows: Vec::new(),
        }
    }
}

impl SelectionTable {
    pub fn contains(&self, element: &str) -> bool {
        self.rows.iter().any(|r| r.element == element)
    }

    /// Append a row for `element` unless one exists. Returns whether a row
    /// was added.
    pub fn add(&mut self, element: &str) -> bool {
        if self.contains(element) {
            return false;
        }
        self.rows.push(SelectionRecord::new(element));
        true
    }

    /// Drop every row for `element`. Returns the number of rows removed.
    pub fn remove(&mut self, element: &str) -> usize {
        let before = self.rows.len();
        self.rows.retain(|r| r.element != element);
        before - self.rows.len()
    }
}
