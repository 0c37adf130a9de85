//! Save/load engine for game objects.
//!
//! Objects opt in with `#[derive(Persist)]`. Fields are written in
//! declaration order with no names or tags, so a stream can only be read
//! back by the same type, with the same field list.
//!
//! # Containers
//!
//! - [`ObjectData`]: one object's fields, or several objects back to back
//!   (see [`save_objects`])
//! - [`ActorData`]: fields plus the actor's transform, for an actor that
//!   already exists
//! - [`ActorProxy`]: class path, name, transform and fields, for rebuilding
//!   an actor inside a [`World`]
//!
//! # Example
//!
//! ```
//! use keepsake_persist::{ObjectTable, Persist, load_object, save_object};
//!
//! #[derive(Persist, Default)]
//! struct Inventory {
//!     gold: u32,
//!     items: Vec<String>,
//!     #[persist(skip)]
//!     dirty: bool,
//! }
//!
//! let table = ObjectTable::new();
//! let saved = Inventory { gold: 30, items: vec!["rope".into()], dirty: true };
//! let data = save_object(&saved, &table).unwrap();
//!
//! let mut loaded = Inventory::default();
//! load_object(&mut loaded, &data, &table).unwrap();
//! assert_eq!(loaded.gold, 30);
//! assert!(!loaded.dirty);
//! ```

extern crate self as keepsake_persist;

pub mod actor;
pub mod buffer;
pub mod bundle;
pub mod class;
pub mod codec;
pub mod compression;
pub mod config;
pub mod context;
pub mod data;
pub mod error;
pub mod fields;
pub mod hooks;
pub mod listener;
pub mod object;
pub mod persist;
pub mod proxy;
pub mod sequence;
pub mod storage;
pub mod world;

pub use persist_macro::Persist;

pub use actor::{Actor, ActorCore, Controllable, ControllerId};
pub use buffer::ByteBuffer;
pub use bundle::{load_actor_data, load_object, save_actor_data, save_object};
pub use class::{ActorClass, ClassLoader, ClassRegistry};
pub use codec::FieldCodec;
pub use compression::{compress, compress_with, decompress};
pub use config::{MountConfig, SaveConfig, SaveSettings};
pub use context::{DeserializeContext, SerializeContext};
pub use data::{ActorData, ActorProxy, Container, ObjectData};
pub use error::{ErrorKind, PersistError, PersistResult};
pub use fields::{apply_serialization, capture_fields, restore_fields, serialize};
pub use hooks::{PostLoad, dispatch_post_load};
pub use listener::{NewGameListener, SaveEvent, SaveListener};
pub use object::{ObjectHandle, ObjectResolver, ObjectTable, ObjectTag};
pub use persist::{Persist, PersistClass};
pub use proxy::{LoadedActor, load_actor, save_actor};
pub use sequence::{load_objects, save_objects};
pub use storage::{
    load_bytes_from_disk, load_from_disk, load_from_disk_compressed, save_bytes_to_disk,
    save_to_disk, save_to_disk_compressed,
};
pub use world::World;

pub use keepsake_core::Transform;
