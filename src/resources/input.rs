//! Per-tick keyboard input resource.
//!
//! Captures the keys the game cares about. Movement uses WASD as the main
//! direction keys and the arrow keys as secondary directions; both walk the
//! player. The state is rebuilt every tick from the tick's events and the
//! platform's "is key down" query.
use bevy_ecs::prelude::*;
use raylib::prelude::*;

use crate::components::character::Facing;
use crate::events::input::InputEvent;

#[derive(Debug, Clone, Copy, PartialEq)]
/// Boolean key state with an associated keyboard binding.
pub struct BoolState {
    /// Whether the key is held this tick.
    pub active: bool,
    /// Whether the key went down this tick.
    pub just_pressed: bool,
    /// Whether the key went up this tick.
    pub just_released: bool,

    pub key_binding: KeyboardKey,
}

impl Default for BoolState {
    fn default() -> Self {
        Self::bound(KeyboardKey::KEY_NULL)
    }
}

impl BoolState {
    pub fn bound(key_binding: KeyboardKey) -> Self {
        Self {
            active: false,
            just_pressed: false,
            just_released: false,
            key_binding,
        }
    }

    fn refresh(&mut self, events: &[InputEvent], is_down: &dyn Fn(KeyboardKey) -> bool) {
        let key = self.key_binding;
        self.just_pressed = events.iter().any(|e| *e == InputEvent::KeyDown(key));
        self.just_released = events.iter().any(|e| *e == InputEvent::KeyUp(key));
        self.active = self.just_pressed || (is_down(key) && !self.just_released);
    }
}

#[derive(Resource, Debug, Clone)]
pub struct InputState {
    pub maindirection_up: BoolState,
    pub maindirection_left: BoolState,
    pub maindirection_down: BoolState,
    pub maindirection_right: BoolState,
    // Arrow keys
    pub secondarydirection_up: BoolState,
    pub secondarydirection_down: BoolState,
    pub secondarydirection_left: BoolState,
    pub secondarydirection_right: BoolState,
    // Actions
    pub action_interact: BoolState,
    pub action_accept: BoolState,
    pub action_back: BoolState,
    pub action_save: BoolState,
    pub action_equip: BoolState,
    pub action_unequip: BoolState,
    pub mode_debug: BoolState,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            maindirection_up: BoolState::bound(KeyboardKey::KEY_W),
            maindirection_left: BoolState::bound(KeyboardKey::KEY_A),
            maindirection_down: BoolState::bound(KeyboardKey::KEY_S),
            maindirection_right: BoolState::bound(KeyboardKey::KEY_D),
            secondarydirection_up: BoolState::bound(KeyboardKey::KEY_UP),
            secondarydirection_down: BoolState::bound(KeyboardKey::KEY_DOWN),
            secondarydirection_left: BoolState::bound(KeyboardKey::KEY_LEFT),
            secondarydirection_right: BoolState::bound(KeyboardKey::KEY_RIGHT),
            action_interact: BoolState::bound(KeyboardKey::KEY_SPACE),
            action_accept: BoolState::bound(KeyboardKey::KEY_ENTER),
            action_back: BoolState::bound(KeyboardKey::KEY_ESCAPE),
            action_save: BoolState::bound(KeyboardKey::KEY_Y),
            action_equip: BoolState::bound(KeyboardKey::KEY_I),
            action_unequip: BoolState::bound(KeyboardKey::KEY_U),
            mode_debug: BoolState::bound(KeyboardKey::KEY_F11),
        }
    }
}

impl InputState {
    fn states_mut(&mut self) -> [&mut BoolState; 15] {
        [
            &mut self.maindirection_up,
            &mut self.maindirection_left,
            &mut self.maindirection_down,
            &mut self.maindirection_right,
            &mut self.secondarydirection_up,
            &mut self.secondarydirection_down,
            &mut self.secondarydirection_left,
            &mut self.secondarydirection_right,
            &mut self.action_interact,
            &mut self.action_accept,
            &mut self.action_back,
            &mut self.action_save,
            &mut self.action_equip,
            &mut self.action_unequip,
            &mut self.mode_debug,
        ]
    }

    /// Rebuild every key from this tick's events and the held-key query.
    pub fn update(&mut self, events: &[InputEvent], is_down: &dyn Fn(KeyboardKey) -> bool) {
        for state in self.states_mut() {
            state.refresh(events, is_down);
        }
    }

    /// Held walking direction, checked in up, down, left, right order.
    pub fn walk_direction(&self) -> Option<Facing> {
        if self.maindirection_up.active || self.secondarydirection_up.active {
            Some(Facing::Up)
        } else if self.maindirection_down.active || self.secondarydirection_down.active {
            Some(Facing::Down)
        } else if self.maindirection_left.active || self.secondarydirection_left.active {
            Some(Facing::Left)
        } else if self.maindirection_right.active || self.secondarydirection_right.active {
            Some(Facing::Right)
        } else {
            None
        }
    }

    /// Menu navigation: `-1` for up, `1` for down.
    pub fn menu_step(&self) -> i32 {
        if self.maindirection_up.just_pressed || self.secondarydirection_up.just_pressed {
            -1
        } else if self.maindirection_down.just_pressed || self.secondarydirection_down.just_pressed
        {
            1
        } else {
            0
        }
    }

    /// Horizontal choice cycling: `-1` for left, `1` for right.
    pub fn choice_step(&self) -> i32 {
        if self.maindirection_left.just_pressed || self.secondarydirection_left.just_pressed {
            -1
        } else if self.maindirection_right.just_pressed
            || self.secondarydirection_right.just_pressed
        {
            1
        } else {
            0
        }
    }

    /// Confirm in menus and dialogs (Space or Enter).
    pub fn confirmed(&self) -> bool {
        self.action_interact.just_pressed || self.action_accept.just_pressed
    }
}
