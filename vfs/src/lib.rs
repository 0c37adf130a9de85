//! Virtual file system for save files.
//!
//! A [`Vfs`] routes `mount/rest/of/path` strings to [`StorageProvider`]s.
//! All operations are blocking and return as soon as the provider is done;
//! there is no background I/O and no retry.
//!
//! # Providers
//!
//! - [`MemoryStorage`]: in-memory storage for tests and throwaway sessions
//! - [`DiskStorage`]: native filesystem, rooted at a directory
//!
//! # Example
//!
//! ```
//! use keepsake_vfs::{MemoryStorage, Vfs};
//!
//! let vfs = Vfs::new();
//! vfs.mount("saves", MemoryStorage::new());
//! vfs.write("saves/slot0.sav", b"payload").unwrap();
//! assert_eq!(vfs.read("saves/slot0.sav").unwrap(), b"payload");
//! ```

#[cfg(feature = "filesystem")]
mod disk;
mod error;
mod memory;
pub mod path;
mod provider;
mod vfs;

#[cfg(feature = "filesystem")]
pub use disk::DiskStorage;
pub use error::{VfsError, VfsResult};
pub use memory::MemoryStorage;
pub use provider::StorageProvider;
pub use vfs::Vfs;
