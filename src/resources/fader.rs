//! Full-screen fade overlay.
//!
//! One fade at a time. A fade-out ramps the overlay from clear to black and
//! then holds black until cleared, so the map can change underneath it. A
//! fade-in ramps back to clear.

use bevy_ecs::prelude::Resource;
use raylib::prelude::Color;

use crate::backend::Canvas;
use crate::cinematic::DELAY_EPSILON;
use crate::cinematic::command::FadeKind;
use crate::components::hitbox::Rect;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fade {
    pub kind: FadeKind,
    pub seconds: f32,
    pub timer: f32,
    pub color: Color,
}

impl Fade {
    pub fn new(kind: FadeKind, seconds: f32) -> Self {
        Self {
            kind,
            seconds,
            timer: 0.0,
            color: Color::BLACK,
        }
    }

    fn progress(&self) -> f32 {
        if self.seconds <= 0.0 {
            return 1.0;
        }
        (self.timer / self.seconds).min(1.0)
    }

    /// Overlay opacity, 0 (clear) to 255 (opaque).
    pub fn alpha(&self) -> u8 {
        let covered = match self.kind {
            FadeKind::Out => self.progress(),
            FadeKind::In => 1.0 - self.progress(),
        };
        (255.0 * covered).round().clamp(0.0, 255.0) as u8
    }

    pub fn is_done(&self) -> bool {
        self.timer + DELAY_EPSILON >= self.seconds
    }
}

#[derive(Resource, Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenFade {
    fade: Option<Fade>,
}

impl ScreenFade {
    /// Start a fade, replacing any running one.
    pub fn start(&mut self, kind: FadeKind, seconds: f32) {
        self.fade = Some(Fade::new(kind, seconds));
    }

    pub fn clear(&mut self) {
        self.fade = None;
    }

    pub fn current(&self) -> Option<&Fade> {
        self.fade.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.fade.is_some()
    }

    /// True when no fade is running or the running one has finished.
    pub fn is_done(&self) -> bool {
        self.fade.as_ref().is_none_or(Fade::is_done)
    }

    pub fn update(&mut self, dt: f32) {
        if let Some(fade) = self.fade.as_mut() {
            fade.timer = (fade.timer + dt).min(fade.seconds.max(0.0));
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        let Some(fade) = self.fade.as_ref() else {
            return;
        };
        let alpha = fade.alpha();
        if alpha == 0 {
            return;
        }
        let (w, h) = canvas.size();
        let color = Color::new(fade.color.r, fade.color.g, fade.color.b, alpha);
        canvas.fill_rect(Rect::new(0, 0, w, h), color);
    }
}
