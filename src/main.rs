//! Wandcrafter main entry point.
//!
//! A tile-based adventure written in Rust using:
//! - **raylib** for the window, textures and keyboard
//! - **bevy_ecs** for the map world (characters, stores, per-tick systems)
//!
//! # Project Structure
//!
//! - [`wandcrafter::backend`] – platform and canvas traits, raylib and headless backends
//! - [`wandcrafter::cinematic`] – scenes and sequencers for scripted moments
//! - [`wandcrafter::game`] – the gameplay world and its schedule
//! - [`wandcrafter::states`] – main menu, character creation, gameplay and transient states
//!
//! # Main Loop
//!
//! 1. Load `config.ini` (or `--config`), open the raylib window
//! 2. Build the state manager; the gameplay world reads the asset directories
//! 3. Optionally load a save passed with `--load` and skip the menu
//! 4. Tick the current state until the window closes or Quit is chosen
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --config ./config.ini
//! ```

// Do not create console on Windows
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use std::path::PathBuf;

use clap::Parser;
use log::{error, info, warn};

use wandcrafter::backend::window::RaylibPlatform;
use wandcrafter::error::Result;
use wandcrafter::resources::gameconfig::GameConfig;
use wandcrafter::resources::savegame::SavedGame;
use wandcrafter::states::manager::StateManager;
use wandcrafter::states::{EngineContext, LoadData, StateCommand};

/// Wandcrafter
#[derive(Parser)]
#[command(version, about = "A tile-based wizarding adventure.")]
struct Cli {
    /// INI configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Load this saved game and skip the main menu.
    #[arg(long, value_name = "FILE")]
    load: Option<PathBuf>,

    /// Start with hitbox overlays on.
    #[arg(long)]
    debug: bool,
}

fn run(config: GameConfig, load: Option<PathBuf>) -> Result<()> {
    let mut platform = RaylibPlatform::open(&config);
    let mut manager = StateManager::with_defaults(&config)?;
    let mut ctx = EngineContext::new(&mut platform, config);

    if let Some(path) = load {
        match SavedGame::load(&path) {
            Some(saved) => {
                manager.apply(&mut ctx, StateCommand::LoadData(LoadData::Saved(saved)))?
            }
            None => warn!("Starting at the main menu instead"),
        }
    }
    manager.run(&mut ctx)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = GameConfig::with_path(&cli.config);
    match config.load_from_file() {
        Ok(()) => info!("Configuration loaded from {}", cli.config.display()),
        Err(e) => warn!("{e}; using defaults"),
    }
    if cli.debug {
        config.debug = true;
    }

    if let Err(e) = run(config, cli.load) {
        error!("{e}");
        std::process::exit(1);
    }
    info!("Bye!");
}
