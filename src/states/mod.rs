//! Screen states.
//!
//! The game is a small state machine driven by [`manager::StateManager`].
//! Every tick the current [`State`] reads the input, may answer with a
//! [`StateCommand`], is updated and is drawn.
//!
//! - [`main_menu`] – New Game / Load Game / Quit
//! - [`character_creation`] – name and wand choices
//! - [`gameplay`] – walking around the [`GameplayWorld`]
//! - [`message_box`] – transient dialog drawn over the state that opened it
//! - [`sequencer`] – transient cinematic played on the gameplay world
//!
//! Gameplay also runs [`substate`]s: nested loops that block the tick of the
//! state that started them while the world keeps animating underneath.

pub mod character_creation;
pub mod gameplay;
pub mod main_menu;
pub mod manager;
pub mod message_box;
pub mod sequencer;
pub mod substate;

use std::fmt;

use log::warn;

use crate::backend::{Canvas, Platform};
use crate::cinematic::command::WorldSequencer;
use crate::error::Result;
use crate::events::input::InputEvent;
use crate::game::GameplayWorld;
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::InputState;
use crate::resources::savegame::{PlayerData, SavedGame};
use crate::resources::worldtime::WorldTime;
use crate::systems::input::update_input_state;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateId {
    MainMenu,
    CharacterCreation,
    Gameplay,
    MessageBox,
    Sequencer,
}

impl StateId {
    pub fn as_str(self) -> &'static str {
        match self {
            StateId::MainMenu => "main_menu",
            StateId::CharacterCreation => "character_creation",
            StateId::Gameplay => "gameplay",
            StateId::MessageBox => "message_box",
            StateId::Sequencer => "sequencer",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "main_menu" => Some(StateId::MainMenu),
            "character_creation" => Some(StateId::CharacterCreation),
            "gameplay" => Some(StateId::Gameplay),
            "message_box" => Some(StateId::MessageBox),
            "sequencer" => Some(StateId::Sequencer),
            _ => None,
        }
    }

    /// Built on demand and dropped when left.
    pub fn is_transient(self) -> bool {
        matches!(self, StateId::MessageBox | StateId::Sequencer)
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extra data a transient state is built from.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum StatePayload {
    #[default]
    None,
    Messages(Vec<String>),
    Scenes(WorldSequencer),
}

/// What to feed the gameplay state.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadData {
    NewGame(PlayerData),
    Saved(SavedGame),
}

#[derive(Debug, Clone, PartialEq)]
pub enum StateCommand {
    /// Switch to the state called `name`.
    ChangeState { name: String, payload: StatePayload },
    /// Hand data to the gameplay state, then switch to it.
    LoadData(LoadData),
}

impl StateCommand {
    pub fn change(id: StateId) -> Self {
        StateCommand::ChangeState {
            name: id.as_str().to_string(),
            payload: StatePayload::None,
        }
    }

    pub fn change_with(id: StateId, payload: StatePayload) -> Self {
        StateCommand::ChangeState {
            name: id.as_str().to_string(),
            payload,
        }
    }
}

/// Everything a state needs from the outside for one tick.
pub struct EngineContext<'a> {
    pub platform: &'a mut dyn Platform,
    pub config: GameConfig,
    pub input: InputState,
    pub time: WorldTime,
    pub quit_requested: bool,
}

impl<'a> EngineContext<'a> {
    pub fn new(platform: &'a mut dyn Platform, config: GameConfig) -> Self {
        Self {
            time: WorldTime::fixed(config.target_fps),
            platform,
            config,
            input: InputState::default(),
            quit_requested: false,
        }
    }

    /// Poll this tick's events and refresh the input snapshot.
    pub fn begin_tick(&mut self) -> Vec<InputEvent> {
        let events = self.platform.poll_events();
        if events.iter().any(InputEvent::is_quit) {
            self.quit_requested = true;
        }
        update_input_state(&mut self.input, &events, &*self.platform);
        events
    }
}

/// New screen size, if the window was resized this tick.
pub fn resized(events: &[InputEvent]) -> Option<(i32, i32)> {
    events.iter().rev().find_map(|e| match e {
        InputEvent::Resized { width, height } => Some((*width, *height)),
        _ => None,
    })
}

pub trait State {
    fn id(&self) -> StateId;

    fn handle_events(
        &mut self,
        ctx: &mut EngineContext<'_>,
        events: &[InputEvent],
    ) -> Result<Option<StateCommand>>;

    fn update(&mut self, time: &WorldTime);

    fn draw(&self, canvas: &mut dyn Canvas);

    /// Take game data. May answer with a follow-up command.
    fn load(
        &mut self,
        _ctx: &mut EngineContext<'_>,
        _data: LoadData,
    ) -> Result<Option<StateCommand>> {
        warn!("State '{}' cannot load game data", self.id());
        Ok(None)
    }

    fn world(&self) -> Option<&GameplayWorld> {
        None
    }

    fn world_mut(&mut self) -> Option<&mut GameplayWorld> {
        None
    }

    /// The state a transient state was drawn over, handed back when it is left.
    fn take_background(&mut self) -> Option<Box<dyn State>> {
        None
    }
}
