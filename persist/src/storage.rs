//! Reading and writing saved containers through a [`Vfs`].
//!
//! Paths are VFS paths: `mount/relative/path`, or a path whose first
//! segment names no mount, which goes to the default mount.

use keepsake_vfs::Vfs;

use crate::compression::{compress_with, decompress};
use crate::data::Container;
use crate::error::{PersistError, PersistResult};

/// Write raw bytes. An empty slice is refused and nothing is written.
pub fn save_bytes_to_disk(vfs: &Vfs, path: &str, bytes: &[u8]) -> PersistResult<()> {
    if bytes.is_empty() {
        return Err(PersistError::DiskWriteFailure {
            path: path.to_owned(),
            reason: "refusing to write an empty file".into(),
        });
    }
    vfs.write(path, bytes)
        .map_err(|e| PersistError::DiskWriteFailure {
            path: path.to_owned(),
            reason: e.to_string(),
        })
        .inspect_err(|e| log::error!("{e}"))?;
    log::debug!("Wrote {} bytes to '{path}'", bytes.len());
    Ok(())
}

/// Read raw bytes. A missing, unreadable or empty file fails.
pub fn load_bytes_from_disk(vfs: &Vfs, path: &str) -> PersistResult<Vec<u8>> {
    let bytes = vfs
        .read(path)
        .map_err(|e| PersistError::DiskReadFailure {
            path: path.to_owned(),
            reason: e.to_string(),
        })
        .inspect_err(|e| log::error!("{e}"))?;
    if bytes.is_empty() {
        let err = PersistError::DiskReadFailure {
            path: path.to_owned(),
            reason: "file is empty".into(),
        };
        log::error!("{err}");
        return Err(err);
    }
    log::debug!("Read {} bytes from '{path}'", bytes.len());
    Ok(bytes)
}

pub fn save_to_disk<C: Container>(vfs: &Vfs, path: &str, container: &C) -> PersistResult<()> {
    save_bytes_to_disk(vfs, path, &container.to_bytes()?)
}

pub fn load_from_disk<C: Container>(vfs: &Vfs, path: &str) -> PersistResult<C> {
    C::from_bytes(&load_bytes_from_disk(vfs, path)?)
}

/// Write a container as a zlib stream at `level`.
pub fn save_to_disk_compressed<C: Container>(
    vfs: &Vfs,
    path: &str,
    container: &C,
    level: u32,
) -> PersistResult<()> {
    let packed = compress_with(&container.to_bytes()?, level)?;
    save_bytes_to_disk(vfs, path, packed.as_slice())
}

/// Read a container written by [`save_to_disk_compressed`]. A file that is
/// not a zlib stream fails with `NotCompressed`.
pub fn load_from_disk_compressed<C: Container>(vfs: &Vfs, path: &str) -> PersistResult<C> {
    let packed = load_bytes_from_disk(vfs, path)?;
    C::from_bytes(decompress(&packed)?.as_slice())
}
