//! Command line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Keepsake save file tool.
#[derive(Parser, Debug)]
#[command(
    name = "keepsake",
    version,
    about = "Inspect, compress and list Keepsake save files",
    long_about = "Inspect, compress and list Keepsake save files.\n\n\
        Paths are VFS paths. The first segment selects a mount from the\n\
        config file; any other path goes to the default mount. Without\n\
        --config the current directory is mounted as the default."
)]
pub struct Cli {
    /// TOML file with [saves] settings and [[mount]] entries.
    #[arg(long, short, global = true, value_name = "TOML")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Print what a save file contains.
    Inspect {
        /// File to inspect. Defaults to the configured default slot.
        file: Option<String>,

        /// Container the file holds.
        #[arg(long, short, value_enum, default_value_t = ContainerKind::Object)]
        kind: ContainerKind,

        /// The file is a zlib stream. Defaults to the config setting.
        #[arg(long)]
        compressed: bool,

        /// The file is plain, even if the config says otherwise.
        #[arg(long, conflicts_with = "compressed")]
        uncompressed: bool,
    },

    /// Compress a file.
    Compress {
        input: String,
        output: String,

        /// zlib level 0-9. Defaults to the config setting.
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..=9))]
        level: Option<u32>,
    },

    /// Decompress a file.
    Decompress { input: String, output: String },

    /// List a directory.
    List {
        /// Directory to list. Defaults to the root of the default mount.
        #[arg(default_value = "")]
        dir: String,
    },
}

/// Saved container kinds a file can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ContainerKind {
    /// One or more objects' field bytes.
    #[default]
    Object,
    /// Field bytes followed by a 40-byte pose.
    Actor,
    /// Class, name, pose and field bytes.
    Proxy,
}
