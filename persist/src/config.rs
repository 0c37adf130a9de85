//! Save settings loaded from a TOML file.
//!
//! ```toml
//! [saves]
//! compressed = true
//! compression_level = 6
//! default_slot = "quicksave.sav"
//!
//! [[mount]]
//! name = "saves"
//! type = "filesystem"
//! path = "./saves"
//! default = true
//! ```

use std::path::Path;

use keepsake_vfs::{DiskStorage, MemoryStorage, Vfs};
use serde::Deserialize;

use crate::compression::DEFAULT_LEVEL;
use crate::error::{PersistError, PersistResult};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaveConfig {
    #[serde(default)]
    pub saves: SaveSettings,
    #[serde(default)]
    pub mount: Vec<MountConfig>,
}

/// The `[saves]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SaveSettings {
    /// Write containers as zlib streams.
    pub compressed: bool,
    /// zlib level, `0..=9`.
    pub compression_level: u32,
    /// Path used when a command names no file.
    pub default_slot: String,
}

impl Default for SaveSettings {
    fn default() -> Self {
        Self {
            compressed: false,
            compression_level: DEFAULT_LEVEL,
            default_slot: "quicksave.sav".into(),
        }
    }
}

/// A single VFS mount point.
///
/// `type` is `"filesystem"` (default) or `"memory"`. Memory mounts ignore
/// `path`.
#[derive(Debug, Clone, Deserialize)]
pub struct MountConfig {
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub default: bool,
    #[serde(default = "default_mount_type")]
    pub r#type: String,
}

fn default_mount_type() -> String {
    "filesystem".into()
}

impl SaveConfig {
    /// Read and parse a config file.
    pub fn load(path: &Path) -> PersistResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PersistError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            PersistError::Config(msg) => PersistError::Config(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    /// Parse and validate config text.
    pub fn from_toml_str(content: &str) -> PersistResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| PersistError::Config(format!("failed to parse: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> PersistResult<()> {
        if self.saves.compression_level > 9 {
            return Err(PersistError::Config(format!(
                "compression_level {} is outside 0..=9",
                self.saves.compression_level
            )));
        }
        for mount in &self.mount {
            if mount.name.is_empty() || mount.name.contains('/') {
                return Err(PersistError::Config(format!(
                    "invalid mount name '{}'",
                    mount.name
                )));
            }
            match mount.r#type.as_str() {
                "filesystem" if mount.path.is_empty() => {
                    return Err(PersistError::Config(format!(
                        "filesystem mount '{}' has no path",
                        mount.name
                    )));
                }
                "filesystem" | "memory" => {}
                other => {
                    return Err(PersistError::Config(format!(
                        "unknown mount type '{other}' for '{}'",
                        mount.name
                    )));
                }
            }
        }
        if self.mount.iter().filter(|m| m.default).count() > 1 {
            return Err(PersistError::Config("more than one default mount".into()));
        }
        Ok(())
    }

    /// Build a [`Vfs`] with every configured mount.
    ///
    /// Without an explicit default, a single mount becomes the default.
    pub fn build_vfs(&self) -> Vfs {
        let vfs = Vfs::new();

        for mount in &self.mount {
            if mount.r#type == "memory" {
                log::info!("VFS mount: \"{}\" -> memory", mount.name);
                vfs.mount(&mount.name, MemoryStorage::new());
            } else {
                log::info!("VFS mount: \"{}\" -> filesystem {:?}", mount.name, mount.path);
                vfs.mount(&mount.name, DiskStorage::new(&mount.path));
            }
        }

        let default = self
            .mount
            .iter()
            .find(|m| m.default)
            .or_else(|| (self.mount.len() == 1).then(|| &self.mount[0]));
        if let Some(mount) = default {
            log::info!("VFS default mount: \"{}\"", mount.name);
            vfs.set_default(&mount.name);
        }

        vfs
    }
}
