//! Object identity for reference tagging.
//!
//! A live reference is an [`ObjectHandle`]: a slot index plus a generation,
//! meaningless outside the current process. When a field walk meets one it
//! writes the object's [`ObjectTag`] instead, the `(type path, name)` pair,
//! and a restore looks the tag up again in whatever [`ObjectResolver`] it is
//! given. That is what makes a saved buffer portable across runs.

use std::collections::HashMap;
use std::fmt;

/// Generational handle to an object registered in an [`ObjectTable`].
///
/// A handle outlives its object: once the slot is freed and reused, the
/// generation differs and the old handle stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectHandle {
    index: u32,
    generation: u32,
}

impl ObjectHandle {
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Stable identity of an object: its type path and instance name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectTag {
    pub type_path: String,
    pub name: String,
}

impl ObjectTag {
    pub fn new(type_path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            type_path: type_path.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ObjectTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}'{}'", self.type_path, self.name)
    }
}

/// Translates between live handles and stable tags.
///
/// Capture asks for the tag of every referenced handle; restore asks for
/// the handle of every stored tag.
pub trait ObjectResolver {
    fn tag_of(&self, handle: ObjectHandle) -> Option<&ObjectTag>;

    fn resolve(&self, type_path: &str, name: &str) -> Option<ObjectHandle>;
}

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u32,
    tag: Option<ObjectTag>,
}

/// Arena of tagged objects.
///
/// Instance names are unique across the whole table, whatever their type.
#[derive(Debug, Clone, Default)]
pub struct ObjectTable {
    slots: Vec<Slot>,
    free: Vec<u32>,
    by_name: HashMap<String, ObjectHandle>,
}

impl ObjectTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an object under `name`.
    ///
    /// Returns `None` if the name is already taken.
    pub fn insert(&mut self, type_path: &str, name: &str) -> Option<ObjectHandle> {
        if self.by_name.contains_key(name) {
            return None;
        }
        Some(self.insert_tag(ObjectTag::new(type_path, name)))
    }

    /// Register an object under `requested`, or under the name
    /// [`unique_name`](Self::unique_name) picks if it is taken.
    pub fn insert_unique(&mut self, type_path: &str, requested: &str) -> ObjectHandle {
        let name = self.unique_name(requested);
        self.insert_tag(ObjectTag::new(type_path, name))
    }

    fn insert_tag(&mut self, tag: ObjectTag) -> ObjectHandle {
        let name = tag.name.clone();
        let handle = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.tag = Some(tag);
                ObjectHandle {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    tag: Some(tag),
                });
                ObjectHandle {
                    index,
                    generation: 0,
                }
            }
        };
        self.by_name.insert(name, handle);
        handle
    }

    /// Unregister an object. Its handle, and every copy of it, stops resolving.
    pub fn remove(&mut self, handle: ObjectHandle) -> Option<ObjectTag> {
        let slot = self.live_slot_mut(handle)?;
        let tag = slot.tag.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.by_name.remove(&tag.name);
        Some(tag)
    }

    pub fn contains(&self, handle: ObjectHandle) -> bool {
        self.tag(handle).is_some()
    }

    pub fn tag(&self, handle: ObjectHandle) -> Option<&ObjectTag> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.tag.as_ref())
    }

    pub fn find_by_name(&self, name: &str) -> Option<ObjectHandle> {
        self.by_name.get(name).copied()
    }

    pub fn is_name_taken(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// `requested` if it is free, otherwise the first free `requested_N`.
    ///
    /// An empty request is treated as `"object"`.
    pub fn unique_name(&self, requested: &str) -> String {
        let base = if requested.is_empty() {
            "object"
        } else {
            requested
        };
        if !self.is_name_taken(base) {
            return base.to_owned();
        }
        (1u32..)
            .map(|n| format!("{base}_{n}"))
            .find(|candidate| !self.is_name_taken(candidate))
            .unwrap_or_else(|| base.to_owned())
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Live handles with their tags, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectHandle, &ObjectTag)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.tag.as_ref().map(|tag| {
                (
                    ObjectHandle {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    tag,
                )
            })
        })
    }

    fn live_slot_mut(&mut self, handle: ObjectHandle) -> Option<&mut Slot> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation && slot.tag.is_some())
    }
}

impl ObjectResolver for ObjectTable {
    fn tag_of(&self, handle: ObjectHandle) -> Option<&ObjectTag> {
        self.tag(handle)
    }

    fn resolve(&self, type_path: &str, name: &str) -> Option<ObjectHandle> {
        let handle = self.find_by_name(name)?;
        self.tag(handle)
            .filter(|tag| tag.type_path == type_path)
            .map(|_| handle)
    }
}
