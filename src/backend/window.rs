//! Raylib window backend.

use std::sync::Arc;

use log::{info, warn};
use raylib::prelude::*;
use rustc_hash::FxHashMap;

use crate::backend::{Canvas, DrawCall, Platform, RecordingCanvas};
use crate::events::input::InputEvent;
use crate::resources::gameconfig::GameConfig;

pub struct RaylibPlatform {
    rl: RaylibHandle,
    thread: RaylibThread,
    /// Textures by asset path; `None` remembers a failed load.
    textures: FxHashMap<Arc<str>, Option<Texture2D>>,
    held: Vec<KeyboardKey>,
}

impl RaylibPlatform {
    pub fn open(config: &GameConfig) -> Self {
        let (mut rl, thread) = raylib::init()
            .size(config.window_width as i32, config.window_height as i32)
            .resizable()
            .title(&config.title)
            .build();
        rl.set_target_fps(config.target_fps);
        rl.set_exit_key(None);
        if config.fullscreen {
            rl.toggle_fullscreen();
        }
        info!(
            "Window opened: {}x{} @ {} fps",
            rl.get_screen_width(),
            rl.get_screen_height(),
            config.target_fps
        );
        Self {
            rl,
            thread,
            textures: FxHashMap::default(),
            held: Vec::new(),
        }
    }

    fn load_missing_textures(&mut self, calls: &[DrawCall]) {
        for call in calls {
            let DrawCall::Sprite { texture, .. } = call else {
                continue;
            };
            if self.textures.contains_key(texture) {
                continue;
            }
            let loaded = match self.rl.load_texture(&self.thread, texture) {
                Ok(tex) => Some(tex),
                Err(err) => {
                    warn!("Failed to load texture {}: {}", texture, err);
                    None
                }
            };
            self.textures.insert(Arc::clone(texture), loaded);
        }
    }
}

impl Platform for RaylibPlatform {
    fn poll_events(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();
        if self.rl.window_should_close() {
            events.push(InputEvent::Quit);
        }
        if self.rl.is_window_resized() {
            events.push(InputEvent::Resized {
                width: self.rl.get_screen_width(),
                height: self.rl.get_screen_height(),
            });
        }
        while let Some(key) = self.rl.get_key_pressed() {
            events.push(InputEvent::KeyDown(key));
            if !self.held.contains(&key) {
                self.held.push(key);
            }
        }
        let rl = &self.rl;
        self.held.retain(|key| {
            if rl.is_key_down(*key) {
                true
            } else {
                events.push(InputEvent::KeyUp(*key));
                false
            }
        });
        events
    }

    fn is_key_down(&self, key: KeyboardKey) -> bool {
        self.rl.is_key_down(key)
    }

    fn present(&mut self, draw: &mut dyn FnMut(&mut dyn Canvas)) {
        let mut recorder = RecordingCanvas::new(self.screen_size());
        draw(&mut recorder);
        let calls = recorder.into_calls();
        self.load_missing_textures(&calls);

        let textures = &self.textures;
        let mut d = self.rl.begin_drawing(&self.thread);
        for call in &calls {
            match call {
                DrawCall::Clear(color) => d.clear_background(*color),
                DrawCall::Sprite { texture, src, x, y } => {
                    if let Some(Some(tex)) = textures.get(texture) {
                        d.draw_texture_rec(
                            tex,
                            src.to_rectangle(),
                            Vector2::new(*x as f32, *y as f32),
                            Color::WHITE,
                        );
                    }
                }
                DrawCall::FillRect { rect, color } => {
                    d.draw_rectangle(rect.x, rect.y, rect.w, rect.h, *color)
                }
                DrawCall::StrokeRect { rect, color } => {
                    d.draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, *color)
                }
                DrawCall::Text {
                    text,
                    x,
                    y,
                    size,
                    color,
                } => d.draw_text(text, *x, *y, *size, *color),
            }
        }
    }

    fn screen_size(&self) -> (i32, i32) {
        (self.rl.get_screen_width(), self.rl.get_screen_height())
    }
}
