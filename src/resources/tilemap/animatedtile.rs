//! Time-driven tile animations.

use serde::{Deserialize, Serialize};

use crate::components::hitbox::Rect;
use crate::resources::tilemap::MapObject;

/// One frame of a Tiled tile animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileFrame {
    pub gid: u32,
    pub duration_ms: u32,
}

impl TileFrame {
    pub fn seconds(&self) -> f32 {
        self.duration_ms as f32 / 1000.0
    }
}

/// Frame cursor advanced by elapsed seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct TileAnimation {
    frames: Vec<TileFrame>,
    current: usize,
    frame_time: f32,
}

impl TileAnimation {
    /// `None` when there are no frames to show.
    pub fn new(frames: Vec<TileFrame>) -> Option<Self> {
        if frames.is_empty() {
            return None;
        }
        Some(Self {
            frames,
            current: 0,
            frame_time: 0.0,
        })
    }

    pub fn update(&mut self, dt: f32) {
        self.frame_time += dt;
        if self.frame_time + 1e-6 >= self.frames[self.current].seconds() {
            self.frame_time = 0.0;
            self.current = (self.current + 1) % self.frames.len();
        }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_gid(&self) -> u32 {
        self.frames[self.current].gid
    }

    pub fn frames(&self) -> &[TileFrame] {
        &self.frames
    }
}

/// A map tile that animates in place instead of being drawn statically.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedTile {
    pub rect: Rect,
    pub animation: TileAnimation,
}

impl MapObject for AnimatedTile {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn update(&mut self, dt: f32) {
        self.animation.update(dt);
    }

    fn current_gid(&self) -> Option<u32> {
        Some(self.animation.current_gid())
    }
}
