//! ECS resources of the gameplay world.
//!
//! Overview
//! - `camera2d` – follows the player and keeps the view inside the map
//! - `debugmode` – presence turns on hitbox overlays
//! - `fader` – full-screen fade in/out overlay
//! - `gameconfig` – INI-backed settings (window, tile size, paths)
//! - `input` – per-tick keyboard state of the bound actions
//! - `npcdata` – NPC records read from `npc_data.json`
//! - `savegame` – binary saved games and save-file naming
//! - `spritesheetstore` – sprite-sheet descriptors and cached clip sets
//! - `tilemap` – the open Tiled map: tiles, obstacles, portals and doors
//! - `tilemapstore` – Tiled JSON maps loaded by name
//! - `worldtime` – fixed-step simulation clock
pub mod camera2d;
pub mod debugmode;
pub mod fader;
pub mod gameconfig;
pub mod input;
pub mod npcdata;
pub mod savegame;
pub mod spritesheetstore;
pub mod tilemap;
pub mod tilemapstore;
pub mod worldtime;
