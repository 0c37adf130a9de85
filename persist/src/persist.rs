//! The field-walk capability.
//!
//! Any object that can be saved implements [`Persist`], usually through
//! `#[derive(Persist)]`. The derive writes fields in declaration order and
//! reads them back in the same order.

use std::any::Any;

use crate::context::{DeserializeContext, SerializeContext};
use crate::error::PersistResult;
use crate::hooks::PostLoad;
use crate::listener::{NewGameListener, SaveListener};

/// A stateful object whose fields can be captured and restored.
///
/// # Deriving
///
/// ```ignore
/// #[derive(Default, Persist)]
/// struct Inventory {
///     gold: u32,
///     items: Vec<String>,
/// }
/// ```
///
/// # Restore semantics
///
/// [`read_fields`](Self::read_fields) assigns each field as soon as it is
/// decoded. If a later field fails, earlier fields keep their new values and
/// the failing field and everything after it keep their old ones.
pub trait Persist: 'static {
    /// Fully qualified type path, e.g. `"game::actors::Door"`.
    fn type_path(&self) -> &'static str;

    fn write_fields(&self, ctx: &mut SerializeContext<'_>) -> PersistResult<()>;

    fn read_fields(&mut self, ctx: &mut DeserializeContext<'_>) -> PersistResult<()>;

    /// Whether the object has been destroyed and must not be saved or loaded.
    fn is_destroyed(&self) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Capability query for the post-restore hook.
    fn as_post_load(&mut self) -> Option<&mut dyn PostLoad> {
        None
    }

    fn as_save_listener(&mut self) -> Option<&mut dyn SaveListener> {
        None
    }

    fn as_new_game_listener(&mut self) -> Option<&mut dyn NewGameListener> {
        None
    }
}

/// Static type path of a [`Persist`] type, used to register actor classes.
pub trait PersistClass {
    const TYPE_PATH: &'static str;
}

