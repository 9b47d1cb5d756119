//! Platform events.
//!
//! Submodules:
//! - [`input`] – key presses and releases, quit requests and window resizes
pub mod input;
