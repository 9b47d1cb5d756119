//! Wandcrafter library.
//!
//! Exposes the runtime's components, resources, systems, cinematics and
//! screen states for the binary and for integration tests.

pub mod backend;
pub mod cinematic;
pub mod components;
pub mod error;
pub mod events;
pub mod game;
pub mod resources;
pub mod states;
pub mod systems;
