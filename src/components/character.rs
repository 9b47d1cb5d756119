//! Tile-stepped character movement.
//!
//! A character owns a `destination` rectangle next to its [`Hitbox`]. When the
//! two are equal the character is idle; otherwise the movement system walks
//! the hitbox toward the destination a few pixels per tick until they match.
//! Because destinations are always whole tiles away and the speed divides the
//! tile size, arrival is exact and idle hitboxes stay on the tile grid.

use std::fmt;

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

use crate::components::hitbox::{Hitbox, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Facing {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Facing {
    pub fn as_str(self) -> &'static str {
        match self {
            Facing::Up => "up",
            Facing::Down => "down",
            Facing::Left => "left",
            Facing::Right => "right",
        }
    }

    /// Unit step of one tile in this direction.
    pub fn delta(self, tile_size: i32) -> (i32, i32) {
        match self {
            Facing::Up => (0, -tile_size),
            Facing::Down => (0, tile_size),
            Facing::Left => (-tile_size, 0),
            Facing::Right => (tile_size, 0),
        }
    }

    /// Direction of a movement offset; horizontal wins on diagonals.
    pub fn from_delta(dx: i32, dy: i32) -> Option<Facing> {
        match (dx.signum(), dy.signum()) {
            (1, _) => Some(Facing::Right),
            (-1, _) => Some(Facing::Left),
            (0, 1) => Some(Facing::Down),
            (0, -1) => Some(Facing::Up),
            _ => None,
        }
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Motion {
    Idle,
    Walk,
}

impl Motion {
    pub fn as_str(self) -> &'static str {
        match self {
            Motion::Idle => "idle",
            Motion::Walk => "walk",
        }
    }
}

/// Animation name for a motion and facing, e.g. `walk_right`.
pub fn pose_name(motion: Motion, facing: Facing) -> String {
    format!("{}_{}", motion.as_str(), facing.as_str())
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Character {
    /// Pixels per tick on each axis.
    pub speed: i32,
    pub facing: Facing,
    destination: Rect,
}

impl Character {
    pub fn new(speed: i32, hitbox: &Hitbox) -> Self {
        Self {
            speed,
            facing: Facing::default(),
            destination: hitbox.rect,
        }
    }

    pub fn with_facing(mut self, facing: Facing) -> Self {
        self.facing = facing;
        self
    }

    pub fn destination(&self) -> Rect {
        self.destination
    }

    pub fn is_idle(&self, hitbox: &Hitbox) -> bool {
        self.destination == hitbox.rect
    }

    /// Offset the destination by `(dx, dy)` if idle, then test it against
    /// `obstacles`. On overlap the destination snaps back to the hitbox and
    /// the key of the first colliding obstacle is returned.
    ///
    /// A character that is already moving keeps its current destination.
    pub fn change_destination<K>(
        &mut self,
        hitbox: &Hitbox,
        dx: i32,
        dy: i32,
        obstacles: impl IntoIterator<Item = (K, Rect)>,
    ) -> Option<K> {
        if !self.is_idle(hitbox) {
            return None;
        }
        if let Some(facing) = Facing::from_delta(dx, dy) {
            self.facing = facing;
        }
        self.destination = self.destination.offset(dx, dy);
        for (key, rect) in obstacles {
            if self.destination.overlaps(&rect) {
                self.destination = hitbox.rect;
                return Some(key);
            }
        }
        None
    }

    /// Set the destination without any collision test. Used by cinematics.
    pub fn force_destination(&mut self, rect: Rect) {
        let (dx, dy) = (rect.x - self.destination.x, rect.y - self.destination.y);
        if let Some(facing) = Facing::from_delta(dx, dy) {
            self.facing = facing;
        }
        self.destination = rect;
    }

    /// Forget any pending move.
    pub fn halt(&mut self, hitbox: &Hitbox) {
        self.destination = hitbox.rect;
    }

    /// Move `hitbox` one tick toward the destination, each axis clamped to
    /// `speed`. Returns true on the tick the character arrives.
    pub fn step(&self, hitbox: &mut Hitbox) -> bool {
        if self.is_idle(hitbox) {
            return false;
        }
        hitbox.rect.x += approach(hitbox.rect.x, self.destination.x, self.speed);
        hitbox.rect.y += approach(hitbox.rect.y, self.destination.y, self.speed);
        self.is_idle(hitbox)
    }

    /// Tile in front of the character, relative to where it is heading.
    pub fn interact_tile(&self, tile_size: i32) -> Rect {
        let (dx, dy) = self.facing.delta(tile_size);
        self.destination.offset(dx, dy)
    }
}

fn approach(from: i32, to: i32, speed: i32) -> i32 {
    (to - from).clamp(-speed, speed)
}
