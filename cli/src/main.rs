//! `keepsake` command line tool.

mod args;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use keepsake_persist::{PersistResult, SaveConfig};

use crate::args::Cli;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    keepsake_core::init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(report) => {
            print!("{report}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> PersistResult<String> {
    let config = match &cli.config {
        Some(path) => SaveConfig::load(path)?,
        None => SaveConfig::default(),
    };
    let vfs = commands::open_vfs(&config);
    commands::execute(&cli.command, &config, &vfs)
}
