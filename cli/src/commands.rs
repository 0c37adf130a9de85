//! Subcommand implementations.
//!
//! Each command returns its report as a string; `main` prints it.

use std::fmt::Write;

use keepsake_core::Transform;
use keepsake_core::math::{quat_to_array, vec3_to_array};
use keepsake_persist::{
    ActorData, ActorProxy, Container, ObjectData, PersistError, PersistResult, SaveConfig,
    compress_with, decompress, load_bytes_from_disk, save_bytes_to_disk,
};
use keepsake_vfs::{DiskStorage, Vfs};

use crate::args::{Command, ContainerKind};

/// Bytes shown in a hex preview.
const PREVIEW_LEN: usize = 64;

/// Build the VFS for a config. Without mounts, the current directory
/// becomes the default mount.
pub fn open_vfs(config: &SaveConfig) -> Vfs {
    if config.mount.is_empty() {
        let vfs = Vfs::new();
        vfs.mount("local", DiskStorage::new("."));
        vfs.set_default("local");
        return vfs;
    }
    config.build_vfs()
}

pub fn execute(command: &Command, config: &SaveConfig, vfs: &Vfs) -> PersistResult<String> {
    match command {
        Command::Inspect {
            file,
            kind,
            compressed,
            uncompressed,
        } => {
            let path = file.as_deref().unwrap_or(&config.saves.default_slot);
            let compressed = *compressed || (config.saves.compressed && !*uncompressed);
            inspect(vfs, path, *kind, compressed)
        }
        Command::Compress {
            input,
            output,
            level,
        } => {
            let level = level.unwrap_or(config.saves.compression_level);
            let raw = load_bytes_from_disk(vfs, input)?;
            let packed = compress_with(&raw, level)?;
            save_bytes_to_disk(vfs, output, packed.as_slice())?;
            Ok(format!(
                "{input} -> {output}: {} -> {} bytes (level {level})\n",
                raw.len(),
                packed.len()
            ))
        }
        Command::Decompress { input, output } => {
            let packed = load_bytes_from_disk(vfs, input)?;
            let raw = decompress(&packed)?;
            save_bytes_to_disk(vfs, output, raw.as_slice())?;
            Ok(format!(
                "{input} -> {output}: {} -> {} bytes\n",
                packed.len(),
                raw.len()
            ))
        }
        Command::List { dir } => list(vfs, dir),
    }
}

fn inspect(vfs: &Vfs, path: &str, kind: ContainerKind, compressed: bool) -> PersistResult<String> {
    let stored = load_bytes_from_disk(vfs, path)?;
    let bytes = if compressed {
        decompress(&stored)?.into_vec()
    } else {
        stored.clone()
    };

    let mut report = String::new();
    let _ = writeln!(report, "file:        {path}");
    if compressed {
        let _ = writeln!(
            report,
            "compressed:  {} -> {} bytes",
            stored.len(),
            bytes.len()
        );
    }

    match kind {
        ContainerKind::Object => {
            let data = ObjectData::from_bytes(&bytes)?;
            describe_object(&mut report, &data);
        }
        ContainerKind::Actor => {
            let data = ActorData::from_bytes(&bytes)?;
            describe_actor(&mut report, &data);
        }
        ContainerKind::Proxy => {
            let proxy = ActorProxy::from_bytes(&bytes)?;
            describe_proxy(&mut report, &proxy);
        }
    }
    Ok(report)
}

fn describe_object(report: &mut String, data: &ObjectData) {
    let _ = writeln!(report, "kind:        {}", ObjectData::KIND);
    write_fields(report, data.data.as_slice());
}

fn describe_actor(report: &mut String, data: &ActorData) {
    let _ = writeln!(report, "kind:        {}", ActorData::KIND);
    write_transform(report, &data.transform);
    write_fields(report, data.data.as_slice());
}

fn describe_proxy(report: &mut String, proxy: &ActorProxy) {
    let _ = writeln!(report, "kind:        {}", ActorProxy::KIND);
    let _ = writeln!(report, "class:       {}", proxy.actor_class);
    let _ = writeln!(report, "name:        {}", proxy.actor_name);
    write_transform(report, &proxy.actor_transform);
    write_fields(report, proxy.actor_data.as_slice());
    if let Err(e) = proxy.validate() {
        let _ = writeln!(report, "warning:     {e}");
    }
}

fn write_transform(report: &mut String, transform: &Transform) {
    let _ = writeln!(
        report,
        "translation: {:?}",
        vec3_to_array(transform.translation)
    );
    let _ = writeln!(report, "rotation:    {:?}", quat_to_array(transform.rotation));
    let _ = writeln!(report, "scale:       {:?}", vec3_to_array(transform.scale));
}

fn write_fields(report: &mut String, bytes: &[u8]) {
    let _ = writeln!(report, "field bytes: {}", bytes.len());
    for (row, chunk) in bytes.chunks(16).take(PREVIEW_LEN / 16).enumerate() {
        let hex: Vec<String> = chunk.iter().map(|b| format!("{b:02x}")).collect();
        let _ = writeln!(report, "  {:04x}  {}", row * 16, hex.join(" "));
    }
    if bytes.len() > PREVIEW_LEN {
        let _ = writeln!(report, "  ... {} more bytes", bytes.len() - PREVIEW_LEN);
    }
}

fn list(vfs: &Vfs, dir: &str) -> PersistResult<String> {
    let entries = vfs
        .list_dir(dir)
        .map_err(|e| PersistError::DiskReadFailure {
            path: dir.to_owned(),
            reason: e.to_string(),
        })?;
    let mut report = String::new();
    for entry in entries {
        let _ = writeln!(report, "{entry}");
    }
    Ok(report)
}
