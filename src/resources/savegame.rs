//! Saved games.
//!
//! A save is the bincode encoding of [`SavedGame`]: the player record, the
//! name of the open map and the path the save lives at. New games pick a
//! file name that never overwrites an existing save (`Ada.sav`,
//! `Ada_2.sav`, `Ada_3.sav`, ...).

use std::fs;
use std::path::{Path, PathBuf};

use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::components::character::Facing;
use crate::components::inventory::InventoryRecord;
use crate::components::mapposition::MapPosition;
use crate::error::SaveError;

pub const SAVE_EXTENSION: &str = "sav";

/// Everything needed to rebuild the player character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerData {
    pub name: String,
    pub species: String,
    /// Base sprite-sheet id, e.g. `human/base`.
    pub sprite: String,
    /// Top-left of the hitbox.
    pub position: MapPosition,
    pub facing: Facing,
    pub inventory: InventoryRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedGame {
    pub player_data: PlayerData,
    pub map: String,
    pub file_path: PathBuf,
}

impl SavedGame {
    pub fn encode(&self) -> Result<Vec<u8>, SaveError> {
        bincode::serialize(self).map_err(|e| SaveError::Encode(e.to_string()))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, SaveError> {
        bincode::deserialize(bytes).map_err(|e| SaveError::Decode(e.to_string()))
    }

    /// Write to `file_path`, creating its directory if needed.
    pub fn write(&self) -> Result<(), SaveError> {
        if let Some(dir) = self.file_path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.file_path, self.encode()?)?;
        Ok(())
    }

    pub fn read(path: &Path) -> Result<Self, SaveError> {
        let bytes = fs::read(path)?;
        Self::decode(&bytes)
    }

    /// Write and log the outcome.
    pub fn save(&self) -> bool {
        match self.write() {
            Ok(()) => {
                info!("Game saved to {}", self.file_path.display());
                true
            }
            Err(err) => {
                error!("Could not save to {}: {}", self.file_path.display(), err);
                false
            }
        }
    }

    /// Read and log the outcome.
    pub fn load(path: &Path) -> Option<Self> {
        match Self::read(path) {
            Ok(saved) => {
                info!("Game loaded from {}", path.display());
                Some(saved)
            }
            Err(err) => {
                error!("Could not load {}: {}", path.display(), err);
                None
            }
        }
    }
}

fn file_stem_for(name: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    if stem.is_empty() {
        "player".to_string()
    } else {
        stem
    }
}

/// First free save path for a player called `name` in `dir`.
pub fn unique_save_path(dir: &Path, name: &str) -> PathBuf {
    let stem = file_stem_for(name);
    let mut path = dir.join(format!("{stem}.{SAVE_EXTENSION}"));
    let mut n = 2;
    while path.exists() {
        path = dir.join(format!("{stem}_{n}.{SAVE_EXTENSION}"));
        n += 1;
    }
    path
}

/// Most recently modified save in `dir`.
pub fn latest_save(dir: &Path) -> Result<PathBuf, SaveError> {
    let mut newest: Option<(std::time::SystemTime, PathBuf)> = None;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some(SAVE_EXTENSION) {
            continue;
        }
        let modified = fs::metadata(&path)?.modified()?;
        if newest.as_ref().is_none_or(|(t, _)| modified >= *t) {
            newest = Some((modified, path));
        }
    }
    newest
        .map(|(_, path)| path)
        .ok_or_else(|| SaveError::NoSaves(dir.to_path_buf()))
}
