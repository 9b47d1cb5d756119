//! Platform layer.
//!
//! The game never talks to the window directly. States draw through the
//! [`Canvas`] trait and read input through [`Platform`], which lets the same
//! code run against raylib ([`window::RaylibPlatform`]) or against the
//! scripted [`headless::HeadlessPlatform`] used by the tests.
//!
//! Draw calls are recorded first and replayed afterwards. The raylib backend
//! uses the recording to load missing textures before it opens a drawing
//! scope; the headless backend keeps it for assertions.

pub mod headless;
pub mod window;

use std::sync::Arc;

use raylib::prelude::{Color, KeyboardKey};

use crate::components::hitbox::Rect;
use crate::events::input::InputEvent;

pub trait Canvas {
    fn clear(&mut self, color: Color);
    /// Draw the `src` region of `texture` with its top-left at `(x, y)`.
    fn draw_sprite(&mut self, texture: &Arc<str>, src: Rect, x: i32, y: i32);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn stroke_rect(&mut self, rect: Rect, color: Color);
    fn draw_text(&mut self, text: &str, x: i32, y: i32, size: i32, color: Color);
    fn size(&self) -> (i32, i32);
}

pub trait Platform {
    /// Events since the previous poll.
    fn poll_events(&mut self) -> Vec<InputEvent>;
    fn is_key_down(&self, key: KeyboardKey) -> bool;
    /// Run `draw` against a canvas, show the result and wait for the next frame.
    fn present(&mut self, draw: &mut dyn FnMut(&mut dyn Canvas));
    fn screen_size(&self) -> (i32, i32);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear(Color),
    Sprite {
        texture: Arc<str>,
        src: Rect,
        x: i32,
        y: i32,
    },
    FillRect {
        rect: Rect,
        color: Color,
    },
    StrokeRect {
        rect: Rect,
        color: Color,
    },
    Text {
        text: String,
        x: i32,
        y: i32,
        size: i32,
        color: Color,
    },
}

/// Canvas that only records what was drawn.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub calls: Vec<DrawCall>,
    size: (i32, i32),
}

impl RecordingCanvas {
    pub fn new(size: (i32, i32)) -> Self {
        Self {
            calls: Vec::new(),
            size,
        }
    }

    pub fn into_calls(self) -> Vec<DrawCall> {
        self.calls
    }
}

impl Canvas for RecordingCanvas {
    fn clear(&mut self, color: Color) {
        self.calls.clear();
        self.calls.push(DrawCall::Clear(color));
    }

    fn draw_sprite(&mut self, texture: &Arc<str>, src: Rect, x: i32, y: i32) {
        self.calls.push(DrawCall::Sprite {
            texture: Arc::clone(texture),
            src,
            x,
            y,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.calls.push(DrawCall::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color) {
        self.calls.push(DrawCall::StrokeRect { rect, color });
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, size: i32, color: Color) {
        self.calls.push(DrawCall::Text {
            text: text.to_string(),
            x,
            y,
            size,
            color,
        });
    }

    fn size(&self) -> (i32, i32) {
        self.size
    }
}
