//! Actor classes: from a type path to something that can be instantiated.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::actor::Actor;
use crate::persist::PersistClass;

type ActorFactory = Arc<dyn Fn() -> Option<Box<dyn Actor>> + Send + Sync>;

/// An instantiable actor type.
#[derive(Clone)]
pub struct ActorClass {
    path: String,
    factory: ActorFactory,
}

impl ActorClass {
    /// A class built by an arbitrary factory. The factory may refuse by
    /// returning `None`, which surfaces as a failed spawn.
    pub fn new(
        path: impl Into<String>,
        factory: impl Fn() -> Option<Box<dyn Actor>> + Send + Sync + 'static,
    ) -> Self {
        Self {
            path: path.into(),
            factory: Arc::new(factory),
        }
    }

    /// The class of a derived actor type, built with `Default`.
    pub fn of<T: Actor + PersistClass + Default>() -> Self {
        Self::new(T::TYPE_PATH, || Some(Box::new(T::default()) as Box<dyn Actor>))
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn instantiate(&self) -> Option<Box<dyn Actor>> {
        (self.factory)()
    }
}

impl fmt::Debug for ActorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorClass")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Fallback lookup for classes that were never registered, e.g. classes
/// defined by content loaded on demand.
pub trait ClassLoader: Send + Sync {
    fn load_class(&self, path: &str) -> Option<ActorClass>;
}

impl<F> ClassLoader for F
where
    F: Fn(&str) -> Option<ActorClass> + Send + Sync,
{
    fn load_class(&self, path: &str) -> Option<ActorClass> {
        self(path)
    }
}

/// Type path to [`ActorClass`] lookup with an optional [`ClassLoader`].
#[derive(Default)]
pub struct ClassRegistry {
    classes: HashMap<String, ActorClass>,
    loader: Option<Box<dyn ClassLoader>>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a derived actor type under its type path.
    pub fn register<T: Actor + PersistClass + Default>(&mut self) -> &mut Self {
        self.register_class(ActorClass::of::<T>())
    }

    pub fn register_class(&mut self, class: ActorClass) -> &mut Self {
        log::debug!("Registered actor class {}", class.path());
        self.classes.insert(class.path.clone(), class);
        self
    }

    pub fn set_loader(&mut self, loader: impl ClassLoader + 'static) -> &mut Self {
        self.loader = Some(Box::new(loader));
        self
    }

    /// Registered classes only.
    pub fn find(&self, path: &str) -> Option<&ActorClass> {
        self.classes.get(path)
    }

    /// Registered classes first, then the loader. A loaded class is cached.
    pub fn resolve(&mut self, path: &str) -> Option<ActorClass> {
        if let Some(class) = self.classes.get(path) {
            return Some(class.clone());
        }

        let loaded = self.loader.as_ref()?.load_class(path)?;
        log::info!("Loaded actor class {path} on demand");
        self.classes.insert(path.to_owned(), loaded.clone());
        Some(loaded)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.classes.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
