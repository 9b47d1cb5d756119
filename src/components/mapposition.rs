use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

/// World-space origin of an entity's sprite frame, in pixels.
///
/// The hitbox is derived from this origin plus the hitbox offset, see
/// [`Hitbox`](crate::components::hitbox::Hitbox).
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapPosition {
    pub x: i32,
    pub y: i32,
}

impl MapPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.x += dx;
        self.y += dy;
    }
}
