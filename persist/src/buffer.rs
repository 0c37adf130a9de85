//! Growable byte sequence with an independent read cursor.

use crate::error::{PersistError, PersistResult};

/// Bytes written by a capture, read back by a restore.
///
/// Writes always go to the end. Reads advance a cursor that starts at zero and
/// never moves past the end. Equality compares contents only, not the cursor.
#[derive(Debug, Clone, Default)]
pub struct ByteBuffer {
    bytes: Vec<u8>,
    cursor: usize,
}

impl ByteBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
            cursor: 0,
        }
    }

    /// Wraps existing bytes with the cursor at the start.
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self { bytes, cursor: 0 }
    }

    pub fn append(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Consume the next `n` bytes.
    ///
    /// Fails with [`Underrun`](PersistError::Underrun) without moving the
    /// cursor if fewer than `n` bytes remain.
    pub fn read_next(&mut self, n: usize) -> PersistResult<&[u8]> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(PersistError::Underrun {
                what: format!("{n} bytes"),
                needed: n,
                remaining,
            });
        }
        let start = self.cursor;
        self.cursor += n;
        Ok(&self.bytes[start..self.cursor])
    }

    /// Consume exactly `N` bytes into an array.
    pub fn read_array<const N: usize>(&mut self) -> PersistResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_next(N)?);
        Ok(out)
    }

    /// Move the read cursor. Positions past the end clamp to the end.
    pub fn reset(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.bytes.len());
    }

    pub fn rewind(&mut self) {
        self.reset(0);
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.cursor
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Bytes not yet consumed by reads.
    pub fn unread(&self) -> &[u8] {
        &self.bytes[self.cursor..]
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }

    pub(crate) fn write_u32(&mut self, value: u32) {
        self.append(&value.to_le_bytes());
    }

    pub(crate) fn read_u32(&mut self) -> PersistResult<u32> {
        self.read_array::<4>()
            .map(u32::from_le_bytes)
            .map_err(|e| e.in_field("length prefix"))
    }

    /// Write a `u32` length prefix.
    pub(crate) fn write_len(&mut self, len: usize, what: &str) -> PersistResult<()> {
        let len = u32::try_from(len).map_err(|_| PersistError::UnserializableField {
            field: what.to_owned(),
            reason: format!("length {len} does not fit the u32 prefix"),
        })?;
        self.write_u32(len);
        Ok(())
    }

    pub(crate) fn read_len(&mut self) -> PersistResult<usize> {
        self.read_u32().map(|len| len as usize)
    }

    /// Write a length-prefixed byte block.
    pub(crate) fn write_block(&mut self, bytes: &[u8], what: &str) -> PersistResult<()> {
        self.write_len(bytes.len(), what)?;
        self.append(bytes);
        Ok(())
    }

    pub(crate) fn read_block(&mut self, what: &str) -> PersistResult<Vec<u8>> {
        let len = self.read_len().map_err(|e| e.in_field(what))?;
        self.read_next(len)
            .map(<[u8]>::to_vec)
            .map_err(|e| e.in_field(what))
    }

    /// Write a length-prefixed UTF-8 string.
    pub(crate) fn write_string(&mut self, value: &str, what: &str) -> PersistResult<()> {
        self.write_block(value.as_bytes(), what)
    }

    pub(crate) fn read_string(&mut self, what: &str) -> PersistResult<String> {
        let bytes = self.read_block(what)?;
        String::from_utf8(bytes).map_err(|e| PersistError::Corrupt {
            what: what.to_owned(),
            reason: e.to_string(),
        })
    }
}

impl PartialEq for ByteBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for ByteBuffer {}

impl From<Vec<u8>> for ByteBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_vec(bytes)
    }
}

impl From<&[u8]> for ByteBuffer {
    fn from(bytes: &[u8]) -> Self {
        Self::from_vec(bytes.to_vec())
    }
}

impl AsRef<[u8]> for ByteBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}
