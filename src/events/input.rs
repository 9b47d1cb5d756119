//! Raw input events.
//!
//! The platform layer turns window and keyboard activity into a list of
//! [`InputEvent`]s once per tick. States consume the list directly for
//! discrete presses and read [`InputState`](crate::resources::input::InputState)
//! for keys that are held down.

use raylib::prelude::KeyboardKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(KeyboardKey),
    KeyUp(KeyboardKey),
    /// Window close request.
    Quit,
    Resized { width: i32, height: i32 },
}

impl InputEvent {
    pub fn is_quit(&self) -> bool {
        matches!(self, InputEvent::Quit)
    }

    pub fn is_key_down(&self, key: KeyboardKey) -> bool {
        matches!(self, InputEvent::KeyDown(k) if *k == key)
    }
}

/// Whether `key` was pressed during the tick that produced `events`.
pub fn pressed(events: &[InputEvent], key: KeyboardKey) -> bool {
    events.iter().any(|e| e.is_key_down(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pressed_matches_only_key_down() {
        let events = [
            InputEvent::KeyUp(KeyboardKey::KEY_SPACE),
            InputEvent::KeyDown(KeyboardKey::KEY_Y),
        ];
        assert!(pressed(&events, KeyboardKey::KEY_Y));
        assert!(!pressed(&events, KeyboardKey::KEY_SPACE));
        assert!(!events.iter().any(InputEvent::is_quit));
    }
}
