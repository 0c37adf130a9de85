//! Capturing and restoring one object's fields.

use crate::buffer::ByteBuffer;
use crate::context::{DeserializeContext, SerializeContext};
use crate::error::PersistResult;
use crate::object::ObjectResolver;
use crate::persist::Persist;

/// Walk `object`'s persistent fields into a fresh buffer.
pub fn capture_fields<P: Persist + ?Sized>(
    object: &P,
    resolver: &dyn ObjectResolver,
) -> PersistResult<ByteBuffer> {
    let mut ctx = SerializeContext::new(resolver);
    capture_into(object, &mut ctx)?;
    Ok(ctx.into_buffer())
}

/// Restore `object`'s fields from the start of `buffer`.
///
/// Not transactional: on failure the fields decoded before the failing one
/// stay applied. The lifecycle hook is not dispatched here.
pub fn restore_fields<P: Persist + ?Sized>(
    object: &mut P,
    buffer: &mut ByteBuffer,
    resolver: &dyn ObjectResolver,
) -> PersistResult<()> {
    buffer.rewind();
    let mut ctx = DeserializeContext::new(buffer, resolver);
    restore_from(object, &mut ctx)?;

    let left = ctx.remaining();
    if left > 0 {
        log::debug!(
            "{} restored with {left} bytes left unread",
            object.type_path()
        );
    }
    Ok(())
}

/// Capture into a shared context, after whatever it already holds.
pub(crate) fn capture_into<P: Persist + ?Sized>(
    object: &P,
    ctx: &mut SerializeContext<'_>,
) -> PersistResult<()> {
    object.write_fields(ctx).inspect_err(|e| {
        log::error!("Failed to capture {}: {e}", object.type_path());
    })
}

/// Restore from a shared context, continuing at its cursor.
pub(crate) fn restore_from<P: Persist + ?Sized>(
    object: &mut P,
    ctx: &mut DeserializeContext<'_>,
) -> PersistResult<()> {
    object.read_fields(ctx).inspect_err(|e| {
        log::error!("Failed to restore {}: {e}", object.type_path());
    })
}

/// Raw field bytes of `object`, without any container.
pub fn serialize<P: Persist + ?Sized>(
    object: &P,
    resolver: &dyn ObjectResolver,
) -> PersistResult<Vec<u8>> {
    capture_fields(object, resolver).map(ByteBuffer::into_vec)
}

/// Apply raw field bytes produced by [`serialize`].
///
/// Same partial-failure rules as [`restore_fields`]. No lifecycle hook runs.
pub fn apply_serialization<P: Persist + ?Sized>(
    object: &mut P,
    bytes: &[u8],
    resolver: &dyn ObjectResolver,
) -> PersistResult<()> {
    let mut buffer = ByteBuffer::from(bytes);
    restore_fields(object, &mut buffer, resolver)
}
