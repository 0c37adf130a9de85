//! Several objects in one shared buffer.
//!
//! Objects are written back to back with no framing between them. Where one
//! ends is known only from its own field layout, so [`load_objects`] must be
//! given objects of the same types, in the same order, as [`save_objects`]
//! was. Anything else misaligns every following field, and in general that
//! is not detected.

use crate::buffer::ByteBuffer;
use crate::context::{DeserializeContext, SerializeContext};
use crate::data::ObjectData;
use crate::error::{PersistError, PersistResult};
use crate::fields::{capture_into, restore_from};
use crate::hooks::dispatch_post_load;
use crate::object::ObjectResolver;
use crate::persist::Persist;

/// Capture every present object, in order, into one [`ObjectData`].
///
/// `None` entries are skipped. Fails with `EmptyInput` for an empty list.
pub fn save_objects(
    objects: &[Option<&dyn Persist>],
    resolver: &dyn ObjectResolver,
) -> PersistResult<ObjectData> {
    if objects.is_empty() {
        log::error!("save_objects called with no objects");
        return Err(PersistError::EmptyInput);
    }

    let mut ctx = SerializeContext::new(resolver);
    let mut written = 0usize;
    for object in objects.iter().flatten() {
        if object.is_destroyed() {
            log::warn!("Skipping destroyed {} in object list", object.type_path());
            continue;
        }
        capture_into(*object, &mut ctx)?;
        written += 1;
    }

    log::debug!("Saved {written} objects ({} bytes)", ctx.len());
    Ok(ObjectData::new(ctx.into_buffer()))
}

/// Restore every present object, in order, from one shared buffer.
///
/// Each object's post-load hook runs right after its own fields are applied.
/// On failure, objects before the failing one are fully restored, the
/// failing one is partially restored, and later ones are untouched.
pub fn load_objects(
    objects: &mut [Option<&mut dyn Persist>],
    data: &ObjectData,
    resolver: &dyn ObjectResolver,
) -> PersistResult<()> {
    if objects.is_empty() {
        log::error!("load_objects called with no objects");
        return Err(PersistError::EmptyInput);
    }
    if data.is_empty() {
        log::error!("load_objects called with an empty buffer");
        return Err(PersistError::EmptyPayload {
            target: format!("{} objects", objects.len()),
        });
    }

    let mut buffer: ByteBuffer = data.data.clone();
    buffer.rewind();
    let mut ctx = DeserializeContext::new(&mut buffer, resolver);

    for object in objects.iter_mut().flatten() {
        if object.is_destroyed() {
            log::warn!("Skipping destroyed {} in object list", object.type_path());
            continue;
        }
        restore_from(&mut **object, &mut ctx)?;
        dispatch_post_load(&mut **object);
    }

    let left = ctx.remaining();
    if left > 0 {
        log::warn!("{left} bytes left after loading object list; was it saved in a different order?");
    }
    Ok(())
}
