//! Per-tick systems and helpers.
//!
//! Submodules overview
//! - [`animation`] – advance character appearances, map animations and fades
//! - [`camera`] – keep the camera on the player
//! - [`input`] – rebuild [`crate::resources::input::InputState`] from events
//! - [`movement`] – step characters toward their destination tile
//! - [`render`] – draw characters and debug overlays through a canvas
//! - [`time`] – copy the engine clock into the world

pub mod animation;
pub mod camera;
pub mod input;
pub mod movement;
pub mod render;
pub mod time;
