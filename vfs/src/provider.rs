use crate::{VfsError, VfsResult};

/// A backend that stores whole files as byte arrays.
///
/// Paths handed to a provider are already normalized by the [`Vfs`](crate::Vfs)
/// router and relative to the provider's root. Directory paths may be empty,
/// meaning the root itself.
///
/// Writes are optional: the defaults return [`VfsError::ReadOnly`].
pub trait StorageProvider: Send + Sync + 'static {
    /// Read the entire file.
    fn read(&self, path: &str) -> VfsResult<Vec<u8>>;

    /// Whether a file exists at the path.
    fn exists(&self, path: &str) -> VfsResult<bool>;

    /// Names of the immediate children of a directory, sorted.
    ///
    /// A missing directory lists as empty.
    fn list_dir(&self, path: &str) -> VfsResult<Vec<String>>;

    fn is_read_only(&self) -> bool {
        true
    }

    /// Create or replace the file.
    fn write(&self, _path: &str, _data: &[u8]) -> VfsResult<()> {
        Err(VfsError::ReadOnly)
    }

    fn delete(&self, _path: &str) -> VfsResult<()> {
        Err(VfsError::ReadOnly)
    }
}
