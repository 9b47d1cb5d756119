//! Message box dialog.
//!
//! Shows one message at a time at the bottom of the screen; each confirm
//! press (Space or Enter) moves to the next one. [`MessageBoxState`] is the
//! top-level form, drawn over the state that opened it. The gameplay state
//! uses the nested [`MessageBoxSubState`](crate::states::substate::MessageBoxSubState).

use log::debug;
use raylib::prelude::Color;

use crate::backend::Canvas;
use crate::components::hitbox::Rect;
use crate::error::Result;
use crate::events::input::InputEvent;
use crate::game::GameplayWorld;
use crate::resources::worldtime::WorldTime;
use crate::states::{EngineContext, State, StateCommand, StateId};

const BOX_MARGIN: i32 = 16;
const BOX_HEIGHT: i32 = 96;
const TEXT_SIZE: i32 = 24;
const HINT_SIZE: i32 = 16;
const BOX_FILL: Color = Color::new(20, 16, 36, 230);

/// Draw `message` in a box along the bottom edge.
pub fn draw_message_box(canvas: &mut dyn Canvas, message: &str, page: usize, pages: usize) {
    let (w, h) = canvas.size();
    let rect = Rect::new(
        BOX_MARGIN,
        h - BOX_HEIGHT - BOX_MARGIN,
        (w - 2 * BOX_MARGIN).max(0),
        BOX_HEIGHT,
    );
    canvas.fill_rect(rect, BOX_FILL);
    canvas.stroke_rect(rect, Color::WHITE);
    canvas.draw_text(
        message,
        rect.x + BOX_MARGIN,
        rect.y + BOX_MARGIN,
        TEXT_SIZE,
        Color::WHITE,
    );
    let hint = format!("{}/{}  [Enter]", page + 1, pages);
    canvas.draw_text(
        &hint,
        rect.right() - 8 * BOX_MARGIN,
        rect.bottom() - BOX_MARGIN - HINT_SIZE,
        HINT_SIZE,
        Color::LIGHTGRAY,
    );
}

/// Pages through messages.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MessagePages {
    messages: Vec<String>,
    index: usize,
}

impl MessagePages {
    pub fn new(messages: Vec<String>) -> Self {
        Self { messages, index: 0 }
    }

    pub fn current(&self) -> Option<&str> {
        self.messages.get(self.index).map(String::as_str)
    }

    pub fn advance(&mut self) {
        if self.index < self.messages.len() {
            self.index += 1;
        }
    }

    pub fn is_done(&self) -> bool {
        self.index >= self.messages.len()
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        if let Some(message) = self.current() {
            draw_message_box(canvas, message, self.index, self.messages.len());
        }
    }
}

pub struct MessageBoxState {
    pages: MessagePages,
    background: Option<Box<dyn State>>,
}

impl MessageBoxState {
    pub fn new(messages: Vec<String>, background: Box<dyn State>) -> Self {
        Self {
            pages: MessagePages::new(messages),
            background: Some(background),
        }
    }

    fn return_to(&self) -> StateId {
        self.background
            .as_ref()
            .map(|b| b.id())
            .unwrap_or(StateId::MainMenu)
    }
}

impl State for MessageBoxState {
    fn id(&self) -> StateId {
        StateId::MessageBox
    }

    fn handle_events(
        &mut self,
        ctx: &mut EngineContext<'_>,
        _events: &[InputEvent],
    ) -> Result<Option<StateCommand>> {
        if ctx.input.confirmed() {
            self.pages.advance();
            debug!("Message box advanced");
        }
        if self.pages.is_done() {
            return Ok(Some(StateCommand::change(self.return_to())));
        }
        Ok(None)
    }

    fn update(&mut self, time: &WorldTime) {
        if let Some(background) = self.background.as_mut() {
            background.update(time);
        }
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        if let Some(background) = self.background.as_ref() {
            background.draw(canvas);
        }
        self.pages.draw(canvas);
    }

    fn world(&self) -> Option<&GameplayWorld> {
        self.background.as_ref()?.world()
    }

    fn take_background(&mut self) -> Option<Box<dyn State>> {
        self.background.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{DrawCall, RecordingCanvas};

    #[test]
    fn pages_advance_one_message_at_a_time() {
        let mut pages = MessagePages::new(vec!["one".into(), "two".into()]);
        assert_eq!(pages.current(), Some("one"));
        pages.advance();
        assert_eq!(pages.current(), Some("two"));
        assert!(!pages.is_done());
        pages.advance();
        pages.advance();
        assert!(pages.is_done());
        assert!(MessagePages::new(Vec::new()).is_done());
    }

    #[test]
    fn box_shows_the_message_and_page() {
        let mut canvas = RecordingCanvas::new((640, 480));
        draw_message_box(&mut canvas, "It's just a wall...", 0, 2);
        let texts: Vec<&str> = canvas
            .calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["It's just a wall...", "1/2  [Enter]"]);
    }
}
