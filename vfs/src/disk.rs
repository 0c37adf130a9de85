use std::path::PathBuf;

use crate::VfsResult;
use crate::provider::StorageProvider;

/// Filesystem storage rooted at a directory.
///
/// The root does not need to exist until the first write, which creates it
/// along with any parent directories of the file. Writes go to a sibling
/// `.tmp` file first and are renamed into place, so a crash mid-write leaves
/// the previous save intact.
pub struct DiskStorage {
    root: PathBuf,
}

impl DiskStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

impl StorageProvider for DiskStorage {
    fn read(&self, path: &str) -> VfsResult<Vec<u8>> {
        Ok(std::fs::read(self.resolve(path))?)
    }

    fn exists(&self, path: &str) -> VfsResult<bool> {
        Ok(self.resolve(path).is_file())
    }

    fn list_dir(&self, path: &str) -> VfsResult<Vec<String>> {
        let full_path = self.resolve(path);
        if !full_path.is_dir() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(full_path)? {
            let entry = entry?;
            if let Some(name) = entry.file_name().to_str() {
                entries.push(name.to_owned());
            }
        }
        entries.sort();
        Ok(entries)
    }

    fn is_read_only(&self) -> bool {
        false
    }

    fn write(&self, path: &str, data: &[u8]) -> VfsResult<()> {
        let full_path = self.resolve(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut staging = full_path.clone().into_os_string();
        staging.push(".tmp");
        let staging = PathBuf::from(staging);

        std::fs::write(&staging, data)?;
        if let Err(e) = std::fs::rename(&staging, &full_path) {
            let _ = std::fs::remove_file(&staging);
            return Err(e.into());
        }
        log::debug!("Wrote {} bytes to {}", data.len(), full_path.display());
        Ok(())
    }

    fn delete(&self, path: &str) -> VfsResult<()> {
        std::fs::remove_file(self.resolve(path))?;
        Ok(())
    }
}
