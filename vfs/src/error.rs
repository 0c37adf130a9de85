use thiserror::Error;

/// Errors produced by the virtual file system.
#[derive(Debug, Error)]
pub enum VfsError {
    /// Nothing is stored at the path.
    #[error("not found: {0}")]
    NotFound(String),
    /// The provider's backing store failed.
    #[error("IO error: {0}")]
    Io(#[source] std::io::Error),
    /// The path is empty or tries to leave its mount.
    #[error("invalid path: {0}")]
    InvalidPath(String),
    /// No provider is mounted under the name and no default is set.
    #[error("no such mount: {0}")]
    NoSuchMount(String),
    /// The provider refuses writes.
    #[error("storage is read-only")]
    ReadOnly,
}

pub type VfsResult<T> = Result<T, VfsError>;

impl From<std::io::Error> for VfsError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            VfsError::NotFound(err.to_string())
        } else {
            VfsError::Io(err)
        }
    }
}
