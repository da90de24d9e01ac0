use std::path::PathBuf;

/// All errors that can be returned by a `SelectionStore` implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The selection file (or its lock file) could not be read or written.
    #[error("selection store I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The header row has no `element` column.
    #[error("selection file '{}' has no 'element' column", .path.display())]
    MissingElementColumn { path: PathBuf },

    /// A row that cannot be parsed, or that has more fields than the header.
    #[error("malformed selection file '{}' at line {line}: {message}", .path.display())]
    Malformed {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}
