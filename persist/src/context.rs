//! Serialization and deserialization contexts.
//!
//! [`SerializeContext`] owns the buffer being written and turns object
//! references into tags. [`DeserializeContext`] borrows the buffer being read,
//! so several objects can be restored one after another from a single shared
//! cursor, and turns tags back into handles.

use crate::buffer::ByteBuffer;
use crate::codec::FieldCodec;
use crate::error::{PersistError, PersistResult};
use crate::object::{ObjectHandle, ObjectResolver};

// ---------------------------------------------------------------------------
// SerializeContext
// ---------------------------------------------------------------------------

/// Context for capturing fields into a buffer.
pub struct SerializeContext<'a> {
    buffer: ByteBuffer,
    resolver: &'a dyn ObjectResolver,
}

impl<'a> SerializeContext<'a> {
    pub fn new(resolver: &'a dyn ObjectResolver) -> Self {
        Self::with_buffer(ByteBuffer::new(), resolver)
    }

    /// Continue writing after the existing contents of `buffer`.
    pub fn with_buffer(buffer: ByteBuffer, resolver: &'a dyn ObjectResolver) -> Self {
        Self { buffer, resolver }
    }

    /// Encode one field. Failures are qualified with `name`.
    pub fn write_field<T: FieldCodec>(&mut self, name: &str, value: &T) -> PersistResult<()> {
        value.encode(self).map_err(|e| e.in_field(name))
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.append(bytes);
    }

    /// Write a `u32` length prefix for a collection or string.
    pub fn write_len(&mut self, len: usize) -> PersistResult<()> {
        self.buffer.write_len(len, "")
    }

    pub fn write_str(&mut self, value: &str) -> PersistResult<()> {
        self.buffer.write_string(value, "")
    }

    /// Write the tag of a referenced object.
    ///
    /// Fails with `UnserializableField` if the handle is not registered with
    /// the resolver, since there is nothing stable to write for it.
    pub fn write_reference(&mut self, handle: ObjectHandle) -> PersistResult<()> {
        let tag = self
            .resolver
            .tag_of(handle)
            .ok_or_else(|| PersistError::UnserializableField {
                field: String::new(),
                reason: format!("referenced object {handle} is not registered"),
            })?;
        self.buffer.write_string(&tag.type_path, "reference type")?;
        self.buffer.write_string(&tag.name, "reference name")
    }

    pub fn resolver(&self) -> &dyn ObjectResolver {
        self.resolver
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn into_buffer(self) -> ByteBuffer {
        self.buffer
    }
}

// ---------------------------------------------------------------------------
// DeserializeContext
// ---------------------------------------------------------------------------

/// Context for restoring fields from a buffer.
///
/// Reads start at the buffer's current cursor and leave it just past the
/// last byte consumed.
pub struct DeserializeContext<'a> {
    buffer: &'a mut ByteBuffer,
    resolver: &'a dyn ObjectResolver,
}

impl<'a> DeserializeContext<'a> {
    pub fn new(buffer: &'a mut ByteBuffer, resolver: &'a dyn ObjectResolver) -> Self {
        Self { buffer, resolver }
    }

    /// Decode one field. Failures are qualified with `name`.
    pub fn read_field<T: FieldCodec>(&mut self, name: &str) -> PersistResult<T> {
        T::decode(self).map_err(|e| e.in_field(name))
    }

    pub fn read_bytes(&mut self, n: usize) -> PersistResult<&[u8]> {
        self.buffer.read_next(n)
    }

    pub fn read_array<const N: usize>(&mut self) -> PersistResult<[u8; N]> {
        self.buffer.read_array::<N>()
    }

    pub fn read_len(&mut self) -> PersistResult<usize> {
        self.buffer.read_len()
    }

    pub fn read_string(&mut self) -> PersistResult<String> {
        self.buffer.read_string("string")
    }

    /// Read a tag and resolve it to a live handle.
    pub fn read_reference(&mut self) -> PersistResult<ObjectHandle> {
        let type_path = self.buffer.read_string("reference type")?;
        let name = self.buffer.read_string("reference name")?;
        self.resolver
            .resolve(&type_path, &name)
            .ok_or(PersistError::UnresolvedReference { type_path, name })
    }

    pub fn resolver(&self) -> &dyn ObjectResolver {
        self.resolver
    }

    pub fn remaining(&self) -> usize {
        self.buffer.remaining()
    }

    pub fn cursor(&self) -> usize {
        self.buffer.cursor()
    }
}
