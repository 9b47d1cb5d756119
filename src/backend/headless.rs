//! Scripted, window-less platform for tests.

use std::collections::VecDeque;

use raylib::prelude::KeyboardKey;

use crate::backend::{Canvas, DrawCall, Platform, RecordingCanvas};
use crate::events::input::InputEvent;

/// Presents after which a quit event is injected, so a test waiting on
/// input that never comes stops instead of spinning forever.
const DEFAULT_FRAME_LIMIT: usize = 100_000;

/// Replays one scripted event list per poll and records what gets drawn.
#[derive(Debug)]
pub struct HeadlessPlatform {
    script: VecDeque<Vec<InputEvent>>,
    held: Vec<KeyboardKey>,
    size: (i32, i32),
    last_frame: Vec<DrawCall>,
    presents: usize,
    polls: usize,
    frame_limit: usize,
}

impl HeadlessPlatform {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            script: VecDeque::new(),
            held: Vec::new(),
            size: (width, height),
            last_frame: Vec::new(),
            presents: 0,
            polls: 0,
            frame_limit: DEFAULT_FRAME_LIMIT,
        }
    }

    pub fn with_frame_limit(mut self, limit: usize) -> Self {
        self.frame_limit = limit;
        self
    }

    /// Queue the events returned by one future poll.
    pub fn push_frame(&mut self, events: Vec<InputEvent>) {
        self.script.push_back(events);
    }

    /// Queue `count` polls without events.
    pub fn push_idle(&mut self, count: usize) {
        for _ in 0..count {
            self.script.push_back(Vec::new());
        }
    }

    /// Queue a press on one poll and the release on the next.
    pub fn push_tap(&mut self, key: KeyboardKey) {
        self.push_frame(vec![InputEvent::KeyDown(key)]);
        self.push_frame(vec![InputEvent::KeyUp(key)]);
    }

    pub fn pending_frames(&self) -> usize {
        self.script.len()
    }

    pub fn present_count(&self) -> usize {
        self.presents
    }

    pub fn poll_count(&self) -> usize {
        self.polls
    }

    pub fn last_frame(&self) -> &[DrawCall] {
        &self.last_frame
    }

    /// Whether the last presented frame drew `needle` somewhere.
    pub fn last_frame_has_text(&self, needle: &str) -> bool {
        self.last_frame
            .iter()
            .any(|c| matches!(c, DrawCall::Text { text, .. } if text.contains(needle)))
    }
}

impl Platform for HeadlessPlatform {
    fn poll_events(&mut self) -> Vec<InputEvent> {
        self.polls += 1;
        if self.presents >= self.frame_limit {
            return vec![InputEvent::Quit];
        }
        let events = self.script.pop_front().unwrap_or_default();
        for event in &events {
            match event {
                InputEvent::KeyDown(key) if !self.held.contains(key) => self.held.push(*key),
                InputEvent::KeyUp(key) => self.held.retain(|k| k != key),
                InputEvent::Resized { width, height } => self.size = (*width, *height),
                _ => {}
            }
        }
        events
    }

    fn is_key_down(&self, key: KeyboardKey) -> bool {
        self.held.contains(&key)
    }

    fn present(&mut self, draw: &mut dyn FnMut(&mut dyn Canvas)) {
        let mut canvas = RecordingCanvas::new(self.size);
        draw(&mut canvas);
        self.last_frame = canvas.into_calls();
        self.presents += 1;
    }

    fn screen_size(&self) -> (i32, i32) {
        self.size
    }
}
