//! Axis-aligned rectangles and entity hitboxes.
//!
//! Everything in the world collides through [`Rect`]: map obstacles, portals
//! and character hitboxes. Coordinates are integer pixels so tile alignment
//! and the "idle when hitbox equals destination" rule are exact.

use bevy_ecs::prelude::Component;
use raylib::prelude::Rectangle;
use serde::{Deserialize, Serialize};

use crate::components::mapposition::MapPosition;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Copy of this rectangle moved by `(dx, dy)`.
    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Strict AABB overlap; rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Whether the top-left corner sits on the tile grid.
    pub fn is_tile_aligned(&self, tile_size: i32) -> bool {
        tile_size > 0 && self.x.rem_euclid(tile_size) == 0 && self.y.rem_euclid(tile_size) == 0
    }

    pub fn to_rectangle(&self) -> Rectangle {
        Rectangle {
            x: self.x as f32,
            y: self.y as f32,
            width: self.w as f32,
            height: self.h as f32,
        }
    }
}

/// Collision rectangle of an entity plus its fixed offset from the entity origin.
///
/// Sprite frames are usually taller than the part of the body that should
/// collide, so the hitbox sits at the bottom-right of the frame:
/// `offset = (frame_w - hit_box_w, frame_h - hit_box_h)`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hitbox {
    pub rect: Rect,
    pub offset: (i32, i32),
}

impl Hitbox {
    pub fn new(origin: MapPosition, width: i32, height: i32, offset: (i32, i32)) -> Self {
        Self {
            rect: Rect::new(origin.x + offset.0, origin.y + offset.1, width, height),
            offset,
        }
    }

    /// Build a hitbox from sprite-sheet frame and hit-box sizes.
    pub fn from_frame(origin: MapPosition, frame: (i32, i32), hit_box: (i32, i32)) -> Self {
        Self::new(
            origin,
            hit_box.0,
            hit_box.1,
            (frame.0 - hit_box.0, frame.1 - hit_box.1),
        )
    }

    /// Entity origin that puts the hitbox's top-left at `(x, y)`.
    pub fn origin_for(&self, x: i32, y: i32) -> MapPosition {
        MapPosition::new(x - self.offset.0, y - self.offset.1)
    }
}
