//! Actor proxies: save an actor so it can be rebuilt from nothing.

use std::ops::{Deref, DerefMut};

use crate::actor::{Actor, ControllerId};
use crate::bundle::{ensure_live, load_from_buffer};
use crate::data::ActorProxy;
use crate::error::{PersistError, PersistResult};
use crate::fields::capture_fields;
use crate::object::{ObjectHandle, ObjectResolver};
use crate::world::World;

/// Holds an actor with its controller detached; reattaches it on drop.
struct ControlSuspension<'a, A: Actor + ?Sized> {
    actor: &'a mut A,
    controller: Option<ControllerId>,
}

impl<'a, A: Actor + ?Sized> ControlSuspension<'a, A> {
    fn new(actor: &'a mut A) -> Self {
        let controller = actor
            .as_controllable()
            .and_then(|controllable| controllable.release_control());
        if let Some(id) = controller {
            log::debug!("Suspended controller {id:?} of '{}'", actor.name());
        }
        Self { actor, controller }
    }
}

impl<A: Actor + ?Sized> Deref for ControlSuspension<'_, A> {
    type Target = A;

    fn deref(&self) -> &A {
        self.actor
    }
}

impl<A: Actor + ?Sized> DerefMut for ControlSuspension<'_, A> {
    fn deref_mut(&mut self) -> &mut A {
        self.actor
    }
}

impl<A: Actor + ?Sized> Drop for ControlSuspension<'_, A> {
    fn drop(&mut self) {
        let Some(id) = self.controller.take() else {
            return;
        };
        match self.actor.as_controllable() {
            Some(controllable) => controllable.restore_control(id),
            None => log::warn!(
                "'{}' stopped being controllable while saving",
                self.actor.name()
            ),
        }
    }
}

/// Capture an actor's class path, name, transform and fields.
///
/// A controlled actor has its controller released for the capture and given
/// back afterwards, whether or not the capture succeeds.
pub fn save_actor<A: Actor + ?Sized>(
    actor: &mut A,
    resolver: &dyn ObjectResolver,
) -> PersistResult<ActorProxy> {
    ensure_live(actor)?;
    let actor_class = actor.type_path();
    if actor_class.is_empty() {
        return Err(PersistError::InvalidProxy {
            reason: format!("actor '{}' reports no type path", actor.name()),
        });
    }

    let suspended = ControlSuspension::new(actor);
    let actor_name = suspended.name().to_owned();
    let actor_transform = suspended.transform();
    let actor_data = capture_fields(&*suspended, resolver)?;
    drop(suspended);

    log::debug!(
        "Saved actor '{actor_name}' of class {actor_class} ({} bytes)",
        actor_data.len()
    );
    Ok(ActorProxy {
        actor_class: actor_class.to_owned(),
        actor_name,
        actor_transform,
        actor_data,
    })
}

/// Outcome of [`load_actor`].
///
/// The actor exists once this is returned. Whether its fields were restored
/// is a separate result.
#[derive(Debug)]
#[must_use]
pub struct LoadedActor {
    pub handle: ObjectHandle,
    pub restored: PersistResult<()>,
}

impl LoadedActor {
    pub fn is_fully_restored(&self) -> bool {
        self.restored.is_ok()
    }
}

/// Spawn the actor described by `proxy` into `world` and restore it.
///
/// The proxy is validated before anything is spawned. The runtime may give
/// the actor a different name if the saved one is taken.
pub fn load_actor(world: &mut World, proxy: &ActorProxy) -> PersistResult<LoadedActor> {
    proxy.validate().inspect_err(|e| log::error!("{e}"))?;

    let class = world
        .classes_mut()
        .resolve(&proxy.actor_class)
        .ok_or_else(|| {
            log::error!("Actor class {} not found", proxy.actor_class);
            PersistError::ClassNotFound {
                class: proxy.actor_class.clone(),
            }
        })?;

    let handle = world
        .spawn(&class, proxy.actor_transform, &proxy.actor_name)
        .ok_or_else(|| {
            log::error!(
                "Failed to spawn '{}' of class {}",
                proxy.actor_name,
                proxy.actor_class
            );
            PersistError::SpawnFailed {
                class: proxy.actor_class.clone(),
                name: proxy.actor_name.clone(),
            }
        })?;

    let restored = match world.actor_with_objects(handle) {
        Some((actor, objects)) => load_from_buffer(actor, &proxy.actor_data, objects),
        None => Err(PersistError::NullTarget {
            target: proxy.actor_name.clone(),
        }),
    };
    if let Err(e) = &restored {
        log::warn!("Spawned '{}' but could not restore it: {e}", proxy.actor_name);
    }

    Ok(LoadedActor { handle, restored })
}
