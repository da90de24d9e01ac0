//! CSV-file selection store.
//!
//! Each mutation takes an exclusive advisory lock on `<file>.lock`, reads
//! the whole file, applies the change and writes the result to a temporary
//! file in the same directory, which is then renamed over the original.
//! Readers never see a half-written file.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tempfile::NamedTempFile;

use crate::csv::{parse_table, write_table};
use crate::error::StoreError;
use crate::record::{SelectionRecord, SelectionTable};
use crate::traits::SelectionStore;

/// Selection store backed by a CSV file with an `element` column.
#[derive(Debug, Clone)]
pub struct CsvSelectionStore {
    path: PathBuf,
}

impl CsvSelectionStore {
    /// A store at `path`. The file need not exist yet; a missing file is an
    /// empty store and is created on the first mutation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    fn read_table(&self) -> Result<SelectionTable, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => parse_table(&self.path, &text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(SelectionTable::default()),
            Err(e) => Err(StoreError::io(&self.path, e)),
        }
    }

    fn write_table(&self, table: &SelectionTable) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StoreError::io(dir, e))?;
        tmp.write_all(write_table(table).as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| StoreError::io(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| StoreError::io(&self.path, e.error))?;
        tracing::debug!(
            path = %self.path.display(),
            rows = table.rows.len(),
            "rewrote selection file"
        );
        Ok(())
    }

    /// Run `change` on the current table under the lock, and rewrite the
    /// file when it reports a modification.
    fn mutate<T>(
        &self,
        change: impl FnOnce(&mut SelectionTable) -> (T, bool),
    ) -> Result<T, StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;
        }
        let lock_path = self.lock_path();
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|e| StoreError::io(&lock_path, e))?;
        lock.lock_exclusive()
            .map_err(|e| StoreError::io(&lock_path, e))?;

        let result = self.read_table().and_then(|mut table| {
            let (value, modified) = change(&mut table);
            if modified {
                self.write_table(&table)?;
            }
            Ok(value)
        });

        if let Err(e) = FileExt::unlock(&lock) {
            // the lock still goes away when `lock` is closed below
            tracing::debug!(
                path = %lock_path.display(),
                error = %e,
                "explicit unlock of selection lock failed"
            );
        }
        result
    }
}

impl SelectionStore for CsvSelectionStore {
    fn contains(&self, element: &str) -> Result<bool, StoreError> {
        Ok(self.read_table()?.contains(element))
    }

    fn add(&mut self, element: &str) -> Result<bool, StoreError> {
        self.mutate(|table| {
            let added = table.add(element);
            (added, added)
        })
    }

    fn remove(&mut self, element: &str) -> Result<usize, StoreError> {
        self.mutate(|table| {
            let removed = table.remove(element);
            (removed, removed > 0)
        })
    }

    fn records(&self) -> Result<Vec<SelectionRecord>, StoreError> {
        Ok(self.read_table()?.rows)
    }
}
