//! Backing store for text editor files.
//!
//! The editor never touches the filesystem directly; it goes through a
//! [`BackingStore`] so the terminal can run against a real data directory
//! ([`FsStore`]) or an in-memory map ([`MemoryStore`]) in tests.
//!
//! # Atomicity
//!
//! [`FsStore::write`] writes to a temporary file in the target's directory
//! and renames it over the target. A failed write leaves the previous
//! content in place.

use std::collections::HashMap;
use std::fmt;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use tempfile::NamedTempFile;

/// Error from a backing store operation.
#[derive(Debug)]
pub enum StoreError {
    /// Nothing stored at the path.
    NotFound,
    /// Underlying I/O failure.
    Io(io::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "File not found"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::NotFound => None,
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::NotFound {
            Self::NotFound
        } else {
            Self::Io(e)
        }
    }
}

/// Error loading or saving an editor file.
#[derive(Debug)]
pub enum PersistenceError {
    /// Reading the file failed.
    Load {
        /// Configured file path.
        path: String,
        /// Store failure.
        source: StoreError,
    },
    /// Writing the file failed.
    Save {
        /// Configured file path.
        path: String,
        /// Store failure.
        source: StoreError,
    },
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load { path, source } => write!(f, "Failed to load {path}: {source}"),
            Self::Save { path, source } => write!(f, "Failed to save {path}: {source}"),
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Load { source, .. } | Self::Save { source, .. } => Some(source),
        }
    }
}

/// Byte storage addressed by the `file_path` strings of editor items.
pub trait BackingStore {
    /// Read the whole file.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` when nothing is stored at `path`.
    fn read(&self, path: &str) -> Result<Vec<u8>, StoreError>;

    /// Replace the whole file. Either the new content is fully visible
    /// afterwards or the old content is untouched.
    fn write(&mut self, path: &str, bytes: &[u8]) -> Result<(), StoreError>;
}

/// Store rooted at a data directory.
///
/// Item paths are resolved below the root. A leading `/` is dropped so the
/// device-style `/logs.txt` lands at `{root}/logs.txt`. Paths escaping the
/// root with `..` are refused.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Create a store rooted at `root`. The directory is created lazily.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve an item path to a location under the root.
    pub fn resolve(&self, path: &str) -> Result<PathBuf, StoreError> {
        let mut resolved = self.root.clone();
        for component in Path::new(path).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::RootDir | Component::CurDir => {}
                Component::ParentDir | Component::Prefix(_) => {
                    return Err(StoreError::Io(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("path escapes data directory: {path}"),
                    )));
                }
            }
        }
        if resolved == self.root {
            return Err(StoreError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a file path: {path:?}"),
            )));
        }
        Ok(resolved)
    }
}

impl BackingStore for FsStore {
    fn read(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        let full = self.resolve(path)?;
        Ok(std::fs::read(full)?)
    }

    fn write(&mut self, path: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let full = self.resolve(path)?;
        let parent = full.parent().unwrap_or(&self.root);
        std::fs::create_dir_all(parent).map_err(StoreError::Io)?;

        let mut tmp = NamedTempFile::new_in(parent).map_err(StoreError::Io)?;
        tmp.write_all(bytes).map_err(StoreError::Io)?;
        tmp.as_file().sync_all().map_err(StoreError::Io)?;
        tmp.persist(&full).map_err(|e| StoreError::Io(e.error))?;

        log::debug!("Wrote {} bytes to {}", bytes.len(), full.display());
        Ok(())
    }
}

/// In-memory store. Writes can be made to fail to exercise error paths.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    files: HashMap<String, Vec<u8>>,
    fail_writes: bool,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file.
    pub fn with_file(mut self, path: &str, content: impl Into<Vec<u8>>) -> Self {
        self.files.insert(path.to_string(), content.into());
        self
    }

    /// Make every subsequent write fail (or succeed again).
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Stored bytes at `path`.
    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }
}

impl BackingStore for MemoryStore {
    fn read(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        self.files.get(path).cloned().ok_or(StoreError::NotFound)
    }

    fn write(&mut self, path: &str, bytes: &[u8]) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Io(io::Error::other("simulated write failure")));
        }
        self.files.insert(path.to_string(), bytes.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_fs_store_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = FsStore::new(dir.path());
        assert!(matches!(store.read("/nothing.txt"), Err(StoreError::NotFound)));
    }

    #[test]
    fn test_fs_store_write_creates_dirs_and_replaces() {
        let dir = TempDir::new().unwrap();
        let mut store = FsStore::new(dir.path());

        store.write("/logs/today.txt", b"first\n").unwrap();
        store.write("/logs/today.txt", b"second\n").unwrap();

        assert_eq!(store.read("/logs/today.txt").unwrap(), b"second\n");
        assert!(dir.path().join("logs/today.txt").exists());

        // No temp files left behind
        let entries = std::fs::read_dir(dir.path().join("logs")).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_fs_store_refuses_escape() {
        let dir = TempDir::new().unwrap();
        let store = FsStore::new(dir.path());
        assert!(matches!(store.resolve("../etc/passwd"), Err(StoreError::Io(_))));
        assert!(matches!(store.resolve("/"), Err(StoreError::Io(_))));
        assert_eq!(
            store.resolve("./notes.txt").unwrap(),
            dir.path().join("notes.txt")
        );
    }

    #[test]
    fn test_fs_store_failed_write_keeps_old_content() {
        let dir = TempDir::new().unwrap();
        let mut store = FsStore::new(dir.path());
        store.write("notes.txt", b"keep\n").unwrap();

        // A directory in place of the target makes the rename fail
        std::fs::create_dir(dir.path().join("blocked")).unwrap();
        std::fs::write(dir.path().join("blocked/inner"), b"x").unwrap();
        assert!(store.write("blocked", b"new").is_err());

        assert_eq!(store.read("notes.txt").unwrap(), b"keep\n");
    }

    #[test]
    fn test_memory_store_failure_toggle() {
        let mut store = MemoryStore::new().with_file("a", "old");
        store.set_fail_writes(true);
        assert!(store.write("a", b"new").is_err());
        assert_eq!(store.get("a"), Some(&b"old"[..]));

        store.set_fail_writes(false);
        store.write("a", b"new").unwrap();
        assert_eq!(store.read("a").unwrap(), b"new");
    }

    #[test]
    fn test_persistence_error_display() {
        let err = PersistenceError::Save {
            path: "/logs.txt".to_string(),
            source: StoreError::NotFound,
        };
        assert_eq!(err.to_string(), "Failed to save /logs.txt: File not found");
    }
}
