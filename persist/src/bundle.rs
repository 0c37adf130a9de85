//! Single-object and actor-data codecs.
//!
//! These restore onto a target that already exists. To rebuild an actor from
//! nothing, see [`proxy`](crate::proxy).

use crate::actor::Actor;
use crate::buffer::ByteBuffer;
use crate::data::{ActorData, ObjectData};
use crate::error::{PersistError, PersistResult};
use crate::fields::{capture_fields, restore_fields};
use crate::hooks::dispatch_post_load;
use crate::object::ObjectResolver;
use crate::persist::Persist;

pub(crate) fn ensure_live<P: Persist + ?Sized>(object: &P) -> PersistResult<()> {
    if object.is_destroyed() {
        log::error!("Refusing to touch destroyed {}", object.type_path());
        return Err(PersistError::NullTarget {
            target: object.type_path().to_owned(),
        });
    }
    Ok(())
}

/// Capture `object` into an [`ObjectData`].
pub fn save_object<P: Persist + ?Sized>(
    object: &P,
    resolver: &dyn ObjectResolver,
) -> PersistResult<ObjectData> {
    ensure_live(object)?;
    let data = capture_fields(object, resolver)?;
    log::debug!("Saved {} ({} bytes)", object.type_path(), data.len());
    Ok(ObjectData::new(data))
}

/// Restore `object` from `data`, then run its post-load hook.
///
/// The hook only runs if every field was restored.
pub fn load_object<P: Persist + ?Sized>(
    object: &mut P,
    data: &ObjectData,
    resolver: &dyn ObjectResolver,
) -> PersistResult<()> {
    load_from_buffer(object, &data.data, resolver)
}

/// [`load_object`] over a bare field buffer.
pub(crate) fn load_from_buffer<P: Persist + ?Sized>(
    object: &mut P,
    data: &ByteBuffer,
    resolver: &dyn ObjectResolver,
) -> PersistResult<()> {
    ensure_live(object)?;
    if data.is_empty() {
        log::error!("No data to load into {}", object.type_path());
        return Err(PersistError::EmptyPayload {
            target: object.type_path().to_owned(),
        });
    }

    let mut buffer = data.clone();
    restore_fields(object, &mut buffer, resolver)?;
    dispatch_post_load(object);
    Ok(())
}

/// Capture an actor's fields and its current transform.
pub fn save_actor_data<A: Actor + ?Sized>(
    actor: &A,
    resolver: &dyn ObjectResolver,
) -> PersistResult<ActorData> {
    let ObjectData { data } = save_object(actor, resolver)?;
    Ok(ActorData {
        data,
        transform: actor.transform(),
    })
}

/// Restore an actor's fields, then move it to the saved transform.
///
/// If the field restore fails the actor keeps its current placement.
pub fn load_actor_data<A: Actor + ?Sized>(
    actor: &mut A,
    data: &ActorData,
    resolver: &dyn ObjectResolver,
) -> PersistResult<()> {
    ensure_live(actor)?;
    if data.data.is_empty() {
        log::error!("No data to load into actor '{}'", actor.name());
        return Err(PersistError::EmptyPayload {
            target: actor.name().to_owned(),
        });
    }

    let mut buffer = data.data.clone();
    restore_fields(actor, &mut buffer, resolver)?;
    actor.set_transform(data.transform);
    dispatch_post_load(actor);
    Ok(())
}
