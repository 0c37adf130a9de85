use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::provider::StorageProvider;
use crate::{VfsError, VfsResult};

/// In-memory storage.
///
/// Cloning shares the same files, so a test can keep a handle to inspect
/// what was written through a [`Vfs`](crate::Vfs).
#[derive(Clone, Default)]
pub struct MemoryStorage {
    files: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a file directly, bypassing path normalization.
    pub fn insert(&self, path: impl Into<String>, data: Vec<u8>) {
        self.files.write().insert(path.into(), data);
    }

    /// Number of stored files.
    pub fn len(&self) -> usize {
        self.files.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.read().is_empty()
    }
}

impl StorageProvider for MemoryStorage {
    fn read(&self, path: &str) -> VfsResult<Vec<u8>> {
        self.files
            .read()
            .get(path)
            .cloned()
            .ok_or_else(|| VfsError::NotFound(path.to_owned()))
    }

    fn exists(&self, path: &str) -> VfsResult<bool> {
        Ok(self.files.read().contains_key(path))
    }

    fn list_dir(&self, path: &str) -> VfsResult<Vec<String>> {
        let prefix = if path.is_empty() {
            String::new()
        } else {
            format!("{path}/")
        };

        let files = self.files.read();
        let mut entries: Vec<String> = files
            .keys()
            .filter_map(|key| key.strip_prefix(prefix.as_str()))
            .map(|rest| rest.split('/').next().unwrap_or(rest).to_owned())
            .collect();
        entries.sort();
        entries.dedup();
        Ok(entries)
    }

    fn is_read_only(&self) -> bool {
        false
    }

    fn write(&self, path: &str, data: &[u8]) -> VfsResult<()> {
        self.files.write().insert(path.to_owned(), data.to_vec());
        Ok(())
    }

    fn delete(&self, path: &str) -> VfsResult<()> {
        self.files
            .write()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| VfsError::NotFound(path.to_owned()))
    }
}
