use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::path;
use crate::provider::StorageProvider;
use crate::{VfsError, VfsResult};

/// Routes paths to mounted storage providers.
///
/// Paths look like `"mount/rest/of/path"`. The first segment selects the
/// provider; if it names no mount, the default mount (if set) receives the
/// full path. Clones share the same mount table.
#[derive(Clone, Default)]
pub struct Vfs {
    inner: Arc<RwLock<Mounts>>,
}

#[derive(Default)]
struct Mounts {
    providers: HashMap<String, Arc<dyn StorageProvider>>,
    default_mount: Option<String>,
}

impl Vfs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a provider, replacing any provider with the same name.
    pub fn mount(&self, name: impl Into<String>, provider: impl StorageProvider) {
        let name = name.into();
        log::debug!("Mounting storage '{name}'");
        self.inner
            .write()
            .providers
            .insert(name, Arc::new(provider));
    }

    /// Set the mount that receives paths whose first segment names no mount.
    pub fn set_default(&self, name: impl Into<String>) {
        self.inner.write().default_mount = Some(name.into());
    }

    /// Names of all mounts, sorted.
    pub fn mounts(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.read().providers.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn read(&self, raw_path: &str) -> VfsResult<Vec<u8>> {
        let (provider, rest) = self.resolve(&path::normalize(raw_path)?)?;
        provider.read(&rest)
    }

    pub fn exists(&self, raw_path: &str) -> VfsResult<bool> {
        let (provider, rest) = self.resolve(&path::normalize(raw_path)?)?;
        provider.exists(&rest)
    }

    /// List a directory. An empty path lists the root of the default mount.
    pub fn list_dir(&self, raw_path: &str) -> VfsResult<Vec<String>> {
        let (provider, rest) = self.resolve(&path::normalize_dir(raw_path)?)?;
        provider.list_dir(&rest)
    }

    /// Write a file. Fails with [`VfsError::ReadOnly`] on read-only storage.
    pub fn write(&self, raw_path: &str, data: &[u8]) -> VfsResult<()> {
        let (provider, rest) = self.resolve(&path::normalize(raw_path)?)?;
        if rest.is_empty() {
            return Err(VfsError::InvalidPath(format!(
                "'{raw_path}' names a mount, not a file"
            )));
        }
        provider.write(&rest, data)
    }

    pub fn delete(&self, raw_path: &str) -> VfsResult<()> {
        let (provider, rest) = self.resolve(&path::normalize(raw_path)?)?;
        provider.delete(&rest)
    }

    pub fn is_read_only(&self, raw_path: &str) -> VfsResult<bool> {
        let (provider, _) = self.resolve(&path::normalize_dir(raw_path)?)?;
        Ok(provider.is_read_only())
    }

    fn resolve(&self, normalized: &str) -> VfsResult<(Arc<dyn StorageProvider>, String)> {
        let (mount, rest) = path::split_mount(normalized);
        let mounts = self.inner.read();

        if let Some(provider) = mounts.providers.get(mount) {
            return Ok((Arc::clone(provider), rest.to_owned()));
        }

        if let Some(default_name) = &mounts.default_mount
            && let Some(provider) = mounts.providers.get(default_name)
        {
            return Ok((Arc::clone(provider), normalized.to_owned()));
        }

        Err(VfsError::NoSuchMount(mount.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStorage;

    fn vfs_with(name: &str, storage: MemoryStorage) -> Vfs {
        let vfs = Vfs::new();
        vfs.mount(name, storage);
        vfs
    }

    #[test]
    fn routes_by_first_segment() {
        let storage = MemoryStorage::new();
        storage.insert("slot0.sav", b"zero".to_vec());
        let vfs = vfs_with("saves", storage);

        assert_eq!(vfs.read("saves/slot0.sav").unwrap(), b"zero");
    }

    #[test]
    fn default_mount_receives_full_path() {
        let storage = MemoryStorage::new();
        let vfs = vfs_with("saves", storage.clone());
        vfs.set_default("saves");

        vfs.write("auto/slot1.sav", b"one").unwrap();
        assert_eq!(storage.read("auto/slot1.sav").unwrap(), b"one");
        assert_eq!(vfs.list_dir("").unwrap(), vec!["auto"]);
    }

    #[test]
    fn unknown_mount_without_default_fails() {
        let vfs = Vfs::new();
        assert!(matches!(
            vfs.read("nowhere/file.sav"),
            Err(VfsError::NoSuchMount(name)) if name == "nowhere"
        ));
    }

    #[test]
    fn escaping_paths_are_rejected_before_routing() {
        let vfs = vfs_with("saves", MemoryStorage::new());
        assert!(matches!(
            vfs.write("saves/../secret", b"x"),
            Err(VfsError::InvalidPath(_))
        ));
    }

    #[test]
    fn writing_to_bare_mount_name_fails() {
        let vfs = vfs_with("saves", MemoryStorage::new());
        assert!(matches!(
            vfs.write("saves", b"x"),
            Err(VfsError::InvalidPath(_))
        ));
    }

    #[test]
    fn clones_share_mounts() {
        let vfs = Vfs::new();
        let shared = vfs.clone();
        vfs.mount("m", MemoryStorage::new());
        assert_eq!(shared.mounts(), vec!["m"]);
        assert!(!shared.is_read_only("m").unwrap());
    }
}
