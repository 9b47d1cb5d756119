//! Debug overlay toggle.
//!
//! While this resource is present in the gameplay world, characters are
//! drawn with their hitbox, destination and interact tile outlined. F11
//! inserts or removes it.

use bevy_ecs::prelude::Resource;

#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugMode;
