//! Game configuration resource.
//!
//! Settings are read from an INI file. Anything missing keeps its default so
//! the game always starts, even without a config file.
//!
//! # Configuration File Format
//!
//! ```ini
//! [window]
//! width = 1024
//! height = 768
//! target_fps = 60
//! fullscreen = false
//!
//! [game]
//! title = Wandcrafter
//! tile_size = 32
//! walk_speed = 2
//! debug = false
//!
//! [paths]
//! assets = ./assets
//! saves = /home/me/.local/share/wandcrafter/saves
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use directories::ProjectDirs;
use log::info;
use std::path::{Path, PathBuf};

const DEFAULT_WINDOW_WIDTH: u32 = 1024;
const DEFAULT_WINDOW_HEIGHT: u32 = 768;
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_FULLSCREEN: bool = false;
const DEFAULT_TITLE: &str = "Wandcrafter";
const DEFAULT_TILE_SIZE: i32 = 32;
const DEFAULT_WALK_SPEED: i32 = 2;
const DEFAULT_ASSETS_DIR: &str = "./assets";
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub window_width: u32,
    pub window_height: u32,
    pub target_fps: u32,
    pub fullscreen: bool,
    pub title: String,
    /// Tile edge in pixels. Every movement step is one tile.
    pub tile_size: i32,
    /// Pixels per tick; must divide `tile_size`.
    pub walk_speed: i32,
    /// Draw hitbox overlays.
    pub debug: bool,
    /// Root of `maps/`, `sprites/` and `data/`.
    pub assets_dir: PathBuf,
    pub saves_dir: PathBuf,
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    pub fn new() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            target_fps: DEFAULT_TARGET_FPS,
            fullscreen: DEFAULT_FULLSCREEN,
            title: DEFAULT_TITLE.to_string(),
            tile_size: DEFAULT_TILE_SIZE,
            walk_speed: DEFAULT_WALK_SPEED,
            debug: false,
            assets_dir: PathBuf::from(DEFAULT_ASSETS_DIR),
            saves_dir: default_saves_dir(),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current values. Returns an error if the
    /// file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [window]
        if let Some(width) = config.getuint("window", "width").ok().flatten() {
            self.window_width = width as u32;
        }
        if let Some(height) = config.getuint("window", "height").ok().flatten() {
            self.window_height = height as u32;
        }
        if let Some(fps) = config.getuint("window", "target_fps").ok().flatten() {
            self.target_fps = (fps as u32).max(1);
        }
        if let Some(fullscreen) = config.getbool("window", "fullscreen").ok().flatten() {
            self.fullscreen = fullscreen;
        }

        // [game]
        if let Some(title) = config.get("game", "title") {
            self.title = title;
        }
        if let Some(tile) = config.getint("game", "tile_size").ok().flatten() {
            self.tile_size = tile as i32;
        }
        if let Some(speed) = config.getint("game", "walk_speed").ok().flatten() {
            self.walk_speed = speed as i32;
        }
        if let Some(debug) = config.getbool("game", "debug").ok().flatten() {
            self.debug = debug;
        }

        // [paths]
        if let Some(assets) = config.get("paths", "assets") {
            self.assets_dir = PathBuf::from(assets);
        }
        if let Some(saves) = config.get("paths", "saves") {
            self.saves_dir = PathBuf::from(saves);
        }

        self.sanitize();

        info!(
            "Loaded config: {}x{} window, fps={}, tile={}, speed={}, assets={:?}",
            self.window_width,
            self.window_height,
            self.target_fps,
            self.tile_size,
            self.walk_speed,
            self.assets_dir
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        config.set("window", "width", Some(self.window_width.to_string()));
        config.set("window", "height", Some(self.window_height.to_string()));
        config.set("window", "target_fps", Some(self.target_fps.to_string()));
        config.set("window", "fullscreen", Some(self.fullscreen.to_string()));

        config.set("game", "title", Some(self.title.clone()));
        config.set("game", "tile_size", Some(self.tile_size.to_string()));
        config.set("game", "walk_speed", Some(self.walk_speed.to_string()));
        config.set("game", "debug", Some(self.debug.to_string()));

        config.set(
            "paths",
            "assets",
            Some(self.assets_dir.to_string_lossy().into_owned()),
        );
        config.set(
            "paths",
            "saves",
            Some(self.saves_dir.to_string_lossy().into_owned()),
        );

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Walking speed must divide the tile size or characters overshoot.
    fn sanitize(&mut self) {
        if self.tile_size <= 0 {
            self.tile_size = DEFAULT_TILE_SIZE;
        }
        if self.walk_speed <= 0 || self.tile_size % self.walk_speed != 0 {
            log::warn!(
                "walk_speed {} does not divide tile_size {}, using {}",
                self.walk_speed,
                self.tile_size,
                DEFAULT_WALK_SPEED
            );
            self.walk_speed = DEFAULT_WALK_SPEED;
        }
    }

    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }

    /// Seconds per tick.
    pub fn frame_seconds(&self) -> f32 {
        1.0 / self.target_fps.max(1) as f32
    }

    pub fn maps_dir(&self) -> PathBuf {
        self.assets_dir.join("maps")
    }

    pub fn sprites_dir(&self) -> PathBuf {
        self.assets_dir.join("sprites")
    }

    pub fn data_dir(&self) -> PathBuf {
        self.assets_dir.join("data")
    }

    pub fn with_assets_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.assets_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn with_saves_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.saves_dir = dir.as_ref().to_path_buf();
        self
    }
}

fn default_saves_dir() -> PathBuf {
    ProjectDirs::from("", "", "Wandcrafter")
        .map(|dirs| dirs.data_dir().join("saves"))
        .unwrap_or_else(|| PathBuf::from("./saves"))
}
