// SPDX-License-Identifier: GPL-3.0-only

//! Symboard Replay
//!
//! Loads symbol layouts and a script of host interactions, runs the script
//! against a symbol view and prints every event the view emits.

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use clap::Parser;
use symboard::app_settings;
use symboard::config::Settings;
use symboard::layout::LayoutsManager;
use symboard::replay::{Replay, Script};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "symboard-replay",
    version = env!("CARGO_PKG_VERSION"),
    about = "Replays host interactions against the symbol view and prints its events"
)]
struct Cli {
    /// Symbol layout documents to load. The first one is shown unless the
    /// script names another.
    #[arg(short = 'l', long = "layout", value_name = "FILE", required = true)]
    layouts: Vec<PathBuf>,

    /// Script of steps to replay.
    #[arg(short = 's', long = "script", value_name = "FILE")]
    script: PathBuf,

    /// Settings file; defaults are used when missing or invalid.
    #[arg(long = "settings", value_name = "FILE")]
    settings: Option<PathBuf>,
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(app_settings::DEFAULT_LOG_DIRECTIVE)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let settings = cli
        .settings
        .as_ref()
        .map(Settings::load_or_default)
        .unwrap_or_default();

    let layouts = Rc::new(LayoutsManager::new());
    let mut first = None;
    for path in &cli.layouts {
        let (name, warnings) = layouts.load_file(path)?;
        tracing::info!(layout = %name, warnings = warnings.len(), path = %path.display(), "loaded symbol layout");
        first.get_or_insert(name);
    }

    let script = Script::load(&cli.script)?;
    let layout = script
        .layout
        .clone()
        .or(first)
        .ok_or("no symbol layout to show")?;

    let mut replay = Replay::new(layouts, settings, &layout, script.screen);
    for record in replay.run(&script.steps) {
        println!("{record}");
    }
    Ok(())
}
