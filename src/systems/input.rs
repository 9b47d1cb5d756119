//! Input system.
//!
//! Rebuilds [`InputState`] from the events of the current tick and the
//! platform's held-key query.
use crate::backend::Platform;
use crate::events::input::InputEvent;
use crate::resources::input::InputState;

pub fn update_input_state(input: &mut InputState, events: &[InputEvent], platform: &dyn Platform) {
    input.update(events, &|key| platform.is_key_down(key));
}
