//! The placement space actors are spawned into.

use keepsake_core::Transform;

use crate::actor::Actor;
use crate::class::{ActorClass, ClassRegistry};
use crate::listener::{SaveEvent, deliver};
use crate::object::{ObjectHandle, ObjectTable};

/// Owns live actors, the object table their references resolve against,
/// and the class registry used to spawn saved actors.
///
/// Plain objects that only need to be referenced (not owned) can be
/// registered with [`register_object`](Self::register_object).
#[derive(Default)]
pub struct World {
    objects: ObjectTable,
    actors: Vec<Option<Box<dyn Actor>>>,
    classes: ClassRegistry,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_classes(classes: ClassRegistry) -> Self {
        Self {
            classes,
            ..Self::default()
        }
    }

    pub fn classes(&self) -> &ClassRegistry {
        &self.classes
    }

    pub fn classes_mut(&mut self) -> &mut ClassRegistry {
        &mut self.classes
    }

    /// The table every reference in this world resolves against.
    pub fn objects(&self) -> &ObjectTable {
        &self.objects
    }

    /// Register a referencable object that the world does not own.
    ///
    /// The name is made unique the same way spawning does.
    pub fn register_object(&mut self, type_path: &str, name: &str) -> ObjectHandle {
        self.objects.insert_unique(type_path, name)
    }

    /// Instantiate `class` at `transform`, asking for `name`.
    ///
    /// A taken name is replaced by the first free `name_N`. Returns `None`
    /// if the class factory refuses.
    pub fn spawn(
        &mut self,
        class: &ActorClass,
        transform: Transform,
        name: &str,
    ) -> Option<ObjectHandle> {
        let Some(actor) = class.instantiate() else {
            log::warn!("Class {} refused to instantiate '{name}'", class.path());
            return None;
        };
        let handle = self.insert_actor(actor, name);
        if let Some(actor) = self.actor_mut(handle) {
            actor.set_transform(transform);
        }
        Some(handle)
    }

    /// Take ownership of an existing actor under its current name.
    pub fn add_actor(&mut self, actor: Box<dyn Actor>) -> ObjectHandle {
        let name = actor.name().to_owned();
        self.insert_actor(actor, &name)
    }

    fn insert_actor(&mut self, mut actor: Box<dyn Actor>, requested: &str) -> ObjectHandle {
        let handle = self.register_object(actor.type_path(), requested);
        let tag_name = self
            .objects
            .tag(handle)
            .map(|tag| tag.name.clone())
            .unwrap_or_default();
        if tag_name != requested {
            log::info!("Actor name '{requested}' taken, spawned as '{tag_name}'");
        }
        actor.core_mut().set_name(tag_name);

        let index = handle.index() as usize;
        if self.actors.len() <= index {
            self.actors.resize_with(index + 1, || None);
        }
        self.actors[index] = Some(actor);
        handle
    }

    /// Remove an actor from the world and flag it destroyed.
    pub fn destroy(&mut self, handle: ObjectHandle) -> Option<Box<dyn Actor>> {
        self.objects.remove(handle)?;
        let mut actor = self.actors.get_mut(handle.index() as usize)?.take()?;
        actor.core_mut().mark_destroyed();
        Some(actor)
    }

    pub fn actor(&self, handle: ObjectHandle) -> Option<&dyn Actor> {
        if !self.objects.contains(handle) {
            return None;
        }
        let actor = self.actors.get(handle.index() as usize)?.as_ref()?;
        Some(&**actor)
    }

    pub fn actor_mut(&mut self, handle: ObjectHandle) -> Option<&mut dyn Actor> {
        if !self.objects.contains(handle) {
            return None;
        }
        let actor = self.actors.get_mut(handle.index() as usize)?.as_mut()?;
        Some(&mut **actor)
    }

    /// Mutable actor together with the object table, for restoring it.
    pub fn actor_with_objects(
        &mut self,
        handle: ObjectHandle,
    ) -> Option<(&mut dyn Actor, &ObjectTable)> {
        if !self.objects.contains(handle) {
            return None;
        }
        let actor = self.actors.get_mut(handle.index() as usize)?.as_mut()?;
        Some((&mut **actor, &self.objects))
    }

    /// Typed access to an actor.
    pub fn get<T: Actor>(&self, handle: ObjectHandle) -> Option<&T> {
        self.actor(handle)?.as_any().downcast_ref::<T>()
    }

    pub fn get_mut<T: Actor>(&mut self, handle: ObjectHandle) -> Option<&mut T> {
        self.actor_mut(handle)?.as_any_mut().downcast_mut::<T>()
    }

    pub fn find(&self, name: &str) -> Option<ObjectHandle> {
        self.objects.find_by_name(name)
    }

    /// Handles of live actors, in slot order.
    pub fn actor_handles(&self) -> Vec<ObjectHandle> {
        self.objects
            .iter()
            .map(|(handle, _)| handle)
            .filter(|handle| {
                self.actors
                    .get(handle.index() as usize)
                    .is_some_and(Option::is_some)
            })
            .collect()
    }

    pub fn actor_count(&self) -> usize {
        self.actors.iter().filter(|slot| slot.is_some()).count()
    }

    /// Broadcast a save, load or new-game event to every listening actor.
    ///
    /// Returns how many actors received it.
    pub fn notify(&mut self, event: SaveEvent<'_>) -> usize {
        let delivered = self
            .actors
            .iter_mut()
            .flatten()
            .filter(|actor| !actor.is_destroyed())
            .map(|actor| deliver(actor.as_mut(), event))
            .filter(|&received| received)
            .count();
        log::debug!("{event:?} delivered to {delivered} actors");
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listener::SaveListener;
    use crate::{ActorCore, Persist};

    #[derive(Default, Persist)]
    #[persist(path = "test::Crate", save_listener)]
    struct Crate {
        #[persist(core)]
        core: ActorCore,
        loot: u32,
        #[persist(skip)]
        saves_seen: u32,
    }

    impl SaveListener for Crate {
        fn on_save(&mut self, _game_name: &str) {
            self.saves_seen += 1;
        }
    }

    #[test]
    fn spawn_places_and_names_actor() {
        let mut world = World::new();
        let handle = world
            .spawn(
                &ActorClass::of::<Crate>(),
                Transform::from_xyz(0.0, 1.0, 0.0),
                "Crate",
            )
            .unwrap();

        let actor = world.get::<Crate>(handle).unwrap();
        assert_eq!(actor.core.name(), "Crate");
        assert_eq!(actor.core.transform().translation.y, 1.0);
        assert_eq!(world.find("Crate"), Some(handle));
    }

    #[test]
    fn name_collision_renames() {
        let mut world = World::new();
        let class = ActorClass::of::<Crate>();
        let first = world.spawn(&class, Transform::identity(), "Crate").unwrap();
        let second = world.spawn(&class, Transform::identity(), "Crate").unwrap();

        assert_eq!(world.actor(first).unwrap().name(), "Crate");
        assert_eq!(world.actor(second).unwrap().name(), "Crate_1");
        assert_eq!(world.actor_count(), 2);
    }

    #[test]
    fn refusing_factory_spawns_nothing() {
        let mut world = World::new();
        let class = ActorClass::new("test::Never", || None);
        assert!(world.spawn(&class, Transform::identity(), "x").is_none());
        assert_eq!(world.actor_count(), 0);
        assert!(world.objects().is_empty());
    }

    #[test]
    fn destroyed_actor_is_flagged_and_unreachable() {
        let mut world = World::new();
        let handle = world
            .spawn(&ActorClass::of::<Crate>(), Transform::identity(), "Crate")
            .unwrap();

        let removed = world.destroy(handle).unwrap();
        assert!(removed.is_destroyed());
        assert!(world.actor(handle).is_none());
        assert!(world.find("Crate").is_none());
        assert!(world.actor_handles().is_empty());
    }

    #[test]
    fn registered_objects_are_not_actors() {
        let mut world = World::new();
        let quest = world.register_object("game::Quest", "MainQuest");
        assert!(world.actor(quest).is_none());
        assert_eq!(world.objects().tag(quest).unwrap().name, "MainQuest");
        assert!(world.actor_handles().is_empty());
    }

    #[test]
    fn notify_reaches_listeners() {
        let mut world = World::new();
        let handle = world
            .spawn(&ActorClass::of::<Crate>(), Transform::identity(), "Crate")
            .unwrap();

        assert_eq!(world.notify(SaveEvent::Save("slot0")), 1);
        assert_eq!(world.notify(SaveEvent::NewGame), 0);
        assert_eq!(world.get::<Crate>(handle).unwrap().saves_seen, 1);
        assert_eq!(world.get_mut::<Crate>(handle).unwrap().loot, 0);
    }
}
