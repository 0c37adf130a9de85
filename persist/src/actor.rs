//! Placeable objects.
//!
//! An [`Actor`] is a [`Persist`] object with an instance name and a spatial
//! [`Transform`]. Both live in an [`ActorCore`] that is never part of the
//! field stream: saved containers carry them separately.

use keepsake_core::Transform;

use crate::persist::Persist;

/// Name, placement and liveness shared by every actor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActorCore {
    name: String,
    transform: Transform,
    destroyed: bool,
}

impl ActorCore {
    pub fn new(name: impl Into<String>, transform: Transform) -> Self {
        Self {
            name: name.into(),
            transform,
            destroyed: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Flag the actor as destroyed. Save and load calls on it then fail
    /// with `NullTarget`.
    pub fn mark_destroyed(&mut self) {
        self.destroyed = true;
    }
}

/// A placeable [`Persist`] object.
///
/// Derived by `#[derive(Persist)]` when a field is marked `#[persist(core)]`.
pub trait Actor: Persist {
    fn core(&self) -> &ActorCore;

    fn core_mut(&mut self) -> &mut ActorCore;

    /// Capability query for external control.
    fn as_controllable(&mut self) -> Option<&mut dyn Controllable> {
        None
    }

    fn name(&self) -> &str {
        self.core().name()
    }

    fn transform(&self) -> Transform {
        self.core().transform()
    }

    fn set_transform(&mut self, transform: Transform) {
        self.core_mut().set_transform(transform);
    }
}

/// Identifies whatever is driving a controllable actor (a player, an AI).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControllerId(pub u32);

/// An actor that can be driven by an external controller.
///
/// Saving an actor releases its controller first and gives it back once the
/// fields are captured, so the link itself is never written as live state.
pub trait Controllable {
    fn controller(&self) -> Option<ControllerId>;

    /// Detach the current controller and return it.
    fn release_control(&mut self) -> Option<ControllerId>;

    fn restore_control(&mut self, controller: ControllerId);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Persist;

    #[derive(Default, Persist)]
    #[persist(path = "test::Statue")]
    struct Statue {
        #[persist(core)]
        core: ActorCore,
        height: f32,
    }

    #[test]
    fn derived_actor_exposes_core() {
        let mut statue = Statue {
            core: ActorCore::new("Statue_0", Transform::from_xyz(1.0, 0.0, 0.0)),
            height: 3.0,
        };
        assert_eq!(statue.name(), "Statue_0");
        assert_eq!(statue.transform().translation.x, 1.0);
        assert!(statue.as_controllable().is_none());

        statue.set_transform(Transform::from_xyz(5.0, 0.0, 0.0));
        assert_eq!(statue.core().transform().translation.x, 5.0);
        assert_eq!(statue.height, 3.0);
    }

    #[test]
    fn destruction_is_reported_through_persist() {
        let mut statue = Statue::default();
        assert!(!statue.is_destroyed());
        statue.core_mut().mark_destroyed();
        assert!(statue.is_destroyed());
        assert_eq!(statue.type_path(), "test::Statue");
    }
}
