//! # Keepsake Core
//!
//! Math aliases and the [`Transform`](transform::Transform) placement type
//! shared by the save/load crates.

pub mod math;
pub mod transform;

pub use transform::Transform;

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Logs the crate version once the host has installed a logger.
pub fn init() {
    log::info!("Keepsake Core v{} initialized", VERSION);
}
