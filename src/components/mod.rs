//! ECS components for map characters.
//!
//! Submodules overview:
//! - [`animation`] – sprite clips and the per-entity playback cursor
//! - [`appearance`] – named animations composed from stacked sprite layers
//! - [`character`] – tile-stepping movement, facing and poses
//! - [`hitbox`] – collision rectangles and their offset from the sprite frame
//! - [`inventory`] – equipped items by slot plus an unordered bag
//! - [`item`] – wands, cloaks and sticks with their save records
//! - [`mapposition`] – world-space position (top-left of the sprite frame)
//! - [`npc`] – player and NPC markers

pub mod animation;
pub mod appearance;
pub mod character;
pub mod hitbox;
pub mod inventory;
pub mod item;
pub mod mapposition;
pub mod npc;
