//! Save, load and new-game notifications.
//!
//! Objects opt in by implementing [`SaveListener`] or [`NewGameListener`] and
//! declaring it on the derive (`#[persist(save_listener)]`,
//! `#[persist(new_game_listener)]`). [`World::notify`](crate::World::notify)
//! delivers a [`SaveEvent`] to every live actor that opted in.

use crate::persist::Persist;

/// Callbacks around a save or load of a whole game.
///
/// All methods default to doing nothing.
pub trait SaveListener {
    /// The game is about to be saved under `game_name`.
    fn on_save(&mut self, _game_name: &str) {}

    /// The game is about to be loaded from `game_name`.
    fn on_load(&mut self, _game_name: &str) {}

    /// Every object has been saved.
    fn on_saved(&mut self) {}

    /// Every object has been loaded.
    fn on_loaded(&mut self) {}
}

/// Called when a fresh game starts instead of a saved one being loaded.
pub trait NewGameListener {
    fn on_new_game(&mut self);
}

/// A notification broadcast to listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveEvent<'a> {
    Save(&'a str),
    Saved,
    Load(&'a str),
    Loaded,
    NewGame,
}

/// Deliver `event` to `object` if it listens for it. Returns whether it did.
pub fn deliver<P: Persist + ?Sized>(object: &mut P, event: SaveEvent<'_>) -> bool {
    if let SaveEvent::NewGame = event {
        return match object.as_new_game_listener() {
            Some(listener) => {
                listener.on_new_game();
                true
            }
            None => false,
        };
    }

    let Some(listener) = object.as_save_listener() else {
        return false;
    };
    match event {
        SaveEvent::Save(game) => listener.on_save(game),
        SaveEvent::Saved => listener.on_saved(),
        SaveEvent::Load(game) => listener.on_load(game),
        SaveEvent::Loaded => listener.on_loaded(),
        SaveEvent::NewGame => {}
    }
    true
}
