//! Where catalogue files come from.
//!
//! The loader reads YAML text through a [`SourceProvider`], so tests and
//! embedders can hand it files without touching the disk.

use std::collections::HashMap;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Read access to catalogue files.
pub trait SourceProvider {
    fn read_source(&self, path: &Path) -> io::Result<String>;
}

/// Catalogue files on the local disk.
pub struct FileSystemProvider;

impl SourceProvider for FileSystemProvider {
    fn read_source(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// Catalogue files held as text, keyed by lexically normalized path.
#[derive(Debug, Default)]
pub struct InMemoryProvider {
    files: HashMap<PathBuf, String>,
}

impl InMemoryProvider {
    pub fn new<P, T>(files: impl IntoIterator<Item = (P, T)>) -> Self
    where
        P: AsRef<Path>,
        T: Into<String>,
    {
        files
            .into_iter()
            .fold(Self::default(), |provider, (path, text)| provider.with_file(path, text))
    }

    /// Add or replace one file.
    pub fn with_file(mut self, path: impl AsRef<Path>, text: impl Into<String>) -> Self {
        self.files.insert(lexical(path.as_ref()), text.into());
        self
    }
}

impl SourceProvider for InMemoryProvider {
    fn read_source(&self, path: &Path) -> io::Result<String> {
        let key = lexical(path);
        match self.files.get(&key) {
            Some(text) => Ok(text.clone()),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no in-memory catalogue at {}", key.display()),
            )),
        }
    }
}

/// Drop `.` and fold `..` into its parent, never climbing above the root.
fn lexical(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                }
            }
            other => out.push(other),
        }
    }
    out
}
