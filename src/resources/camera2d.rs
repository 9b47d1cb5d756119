//! Shared 2D camera resource.
//!
//! Keeps the player centred on screen while never scrolling past the map
//! edges. World draws add [`Camera::offset`] to world coordinates.

use bevy_ecs::prelude::Resource;

use crate::components::hitbox::Rect;

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Camera {
    /// Screen position of the world origin.
    pub offset: (i32, i32),
    pub screen: (i32, i32),
    pub map: (i32, i32),
}

impl Camera {
    pub fn new(screen: (i32, i32)) -> Self {
        Self {
            offset: (0, 0),
            screen,
            map: (0, 0),
        }
    }

    /// Reset for a newly opened map of `width x height` pixels.
    pub fn open_map(&mut self, width: i32, height: i32) {
        self.map = (width, height);
        self.offset = (0, 0);
    }

    pub fn resize(&mut self, width: i32, height: i32) {
        self.screen = (width, height);
    }

    /// Centre on `target`, clamped to the map. A map smaller than the screen
    /// on an axis is centred on that axis.
    pub fn follow(&mut self, target: Rect) {
        let x = clamp_axis(self.screen.0 / 2 - target.x, self.map.0, self.screen.0);
        let y = clamp_axis(self.screen.1 / 2 - target.y, self.map.1, self.screen.1);
        self.offset = (x, y);
    }

    pub fn apply(&self, rect: Rect) -> Rect {
        rect.offset(self.offset.0, self.offset.1)
    }

    pub fn apply_point(&self, x: i32, y: i32) -> (i32, i32) {
        (x + self.offset.0, y + self.offset.1)
    }
}

fn clamp_axis(wanted: i32, map: i32, screen: i32) -> i32 {
    if map <= screen {
        (screen - map) / 2
    } else {
        wanted.min(0).max(screen - map)
    }
}
