//! The top-level state machine.
//!
//! Holds every live state by [`StateId`] and the id of the current one. Each
//! tick:
//!
//! 1. poll input; stop on a quit event
//! 2. let the current state handle it and apply the command it returns
//! 3. update, then draw and present the current state
//!
//! Transient states (message box, sequencer) are built when switched to.
//! They take the state they are shown over out of the table and give it
//! back when they are left.

use log::{info, warn};
use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::game::GameplayWorld;
use crate::resources::gameconfig::GameConfig;
use crate::states::character_creation::CharacterCreationState;
use crate::states::gameplay::GameplayState;
use crate::states::main_menu::MainMenuState;
use crate::states::message_box::MessageBoxState;
use crate::states::sequencer::SequencerState;
use crate::states::{EngineContext, State, StateCommand, StateId, StatePayload};

pub struct StateManager {
    states: FxHashMap<StateId, Box<dyn State>>,
    current: StateId,
}

impl StateManager {
    pub fn new(states: Vec<Box<dyn State>>, initial: StateId) -> Self {
        let states = states.into_iter().map(|s| (s.id(), s)).collect();
        Self {
            states,
            current: initial,
        }
    }

    /// Main menu, character creation and gameplay, starting at the menu.
    pub fn with_defaults(config: &GameConfig) -> Result<Self> {
        Ok(Self::new(
            vec![
                Box::new(MainMenuState::new(config.title.clone())),
                Box::new(CharacterCreationState::new()),
                Box::new(GameplayState::new(config)?),
            ],
            StateId::MainMenu,
        ))
    }

    pub fn current(&self) -> StateId {
        self.current
    }

    pub fn state(&self, id: StateId) -> Option<&dyn State> {
        self.states.get(&id).map(|s| s.as_ref())
    }

    /// The gameplay world, wherever it currently lives.
    pub fn world(&self) -> Option<&GameplayWorld> {
        self.state(StateId::Gameplay)
            .or_else(|| self.state(self.current))
            .and_then(|s| s.world())
    }

    pub fn tick(&mut self, ctx: &mut EngineContext<'_>) -> Result<()> {
        let events = ctx.begin_tick();
        if ctx.quit_requested {
            return Ok(());
        }
        let command = match self.states.get_mut(&self.current) {
            Some(state) => state.handle_events(ctx, &events)?,
            None => None,
        };
        if ctx.quit_requested {
            return Ok(());
        }
        if let Some(command) = command {
            self.apply(ctx, command)?;
        }

        let time = ctx.time;
        if let Some(state) = self.states.get_mut(&self.current) {
            state.update(&time);
        }
        if let Some(state) = self.states.get(&self.current) {
            ctx.platform.present(&mut |canvas| state.draw(canvas));
        }
        ctx.time.tick();
        Ok(())
    }

    /// Tick until a quit is requested.
    pub fn run(&mut self, ctx: &mut EngineContext<'_>) -> Result<()> {
        info!("Entering state '{}'", self.current);
        while !ctx.quit_requested {
            self.tick(ctx)?;
        }
        info!("Quit requested, leaving state '{}'", self.current);
        Ok(())
    }

    pub fn apply(&mut self, ctx: &mut EngineContext<'_>, command: StateCommand) -> Result<()> {
        match command {
            StateCommand::ChangeState { name, payload } => {
                self.change_state(&name, payload);
                Ok(())
            }
            StateCommand::LoadData(data) => {
                let follow_up = match self.states.get_mut(&StateId::Gameplay) {
                    Some(gameplay) => gameplay.load(ctx, data)?,
                    None => {
                        warn!("No gameplay state to load data into");
                        None
                    }
                };
                // A follow-up decides where to go: the intro plays on the
                // gameplay world, a failure message stays over the caller.
                match follow_up {
                    Some(next) => self.apply(ctx, next),
                    None => {
                        self.switch_to(StateId::Gameplay);
                        Ok(())
                    }
                }
            }
        }
    }

    fn change_state(&mut self, name: &str, payload: StatePayload) {
        let Some(id) = StateId::from_name(name) else {
            warn!("Unknown state '{}', staying in '{}'", name, self.current);
            return;
        };
        match id {
            StateId::MessageBox => {
                let messages = match payload {
                    StatePayload::Messages(messages) => messages,
                    _ => Vec::new(),
                };
                let Some(background) = self.states.remove(&self.current) else {
                    warn!("No state to show a message box over");
                    return;
                };
                self.states.insert(
                    StateId::MessageBox,
                    Box::new(MessageBoxState::new(messages, background)),
                );
            }
            StateId::Sequencer => {
                let StatePayload::Scenes(sequencer) = payload else {
                    warn!("Sequencer state needs scenes");
                    return;
                };
                let Some(gameplay) = self.states.remove(&StateId::Gameplay) else {
                    warn!("No gameplay state to play scenes on");
                    return;
                };
                self.states.insert(
                    StateId::Sequencer,
                    Box::new(SequencerState::new(sequencer, gameplay)),
                );
            }
            _ => {}
        }
        self.switch_to(id);
    }

    fn switch_to(&mut self, id: StateId) {
        if id == self.current {
            return;
        }
        let mut fallback = self.current;
        if self.current.is_transient()
            && let Some(mut leaving) = self.states.remove(&self.current)
            && let Some(background) = leaving.take_background()
        {
            fallback = background.id();
            self.states.insert(fallback, background);
        }
        let next = if self.states.contains_key(&id) {
            id
        } else {
            warn!("State '{}' is not available", id);
            fallback
        };
        info!("State '{}' -> '{}'", self.current, next);
        self.current = next;
    }
}
