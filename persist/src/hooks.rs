//! Post-restore lifecycle hook.

use crate::persist::Persist;

/// Called once after an object's fields have been restored.
///
/// Use it to rebuild state that is derived from saved fields and therefore
/// not saved itself.
pub trait PostLoad {
    fn post_load(&mut self);
}

/// Invoke the hook if `object` declares it. Returns whether it ran.
pub fn dispatch_post_load<P: Persist + ?Sized>(object: &mut P) -> bool {
    match object.as_post_load() {
        Some(hook) => {
            hook.post_load();
            true
        }
        None => false,
    }
}
