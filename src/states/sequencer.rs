//! Top-level cinematic state.
//!
//! Plays a [`WorldSequencer`] on the gameplay world and returns to gameplay
//! when it finishes. Used for the fade-in that opens a new game.

use crate::backend::Canvas;
use crate::cinematic::command::WorldSequencer;
use crate::error::Result;
use crate::events::input::InputEvent;
use crate::game::GameplayWorld;
use crate::resources::worldtime::WorldTime;
use crate::states::{EngineContext, State, StateCommand, StateId};

pub struct SequencerState {
    sequencer: WorldSequencer,
    background: Option<Box<dyn State>>,
}

impl SequencerState {
    /// `gameplay` is the state whose world the scenes act on.
    pub fn new(sequencer: WorldSequencer, gameplay: Box<dyn State>) -> Self {
        Self {
            sequencer,
            background: Some(gameplay),
        }
    }
}

impl State for SequencerState {
    fn id(&self) -> StateId {
        StateId::Sequencer
    }

    fn handle_events(
        &mut self,
        _ctx: &mut EngineContext<'_>,
        _events: &[InputEvent],
    ) -> Result<Option<StateCommand>> {
        if self.sequencer.is_finished() {
            return Ok(Some(StateCommand::change(StateId::Gameplay)));
        }
        Ok(None)
    }

    fn update(&mut self, time: &WorldTime) {
        let Some(background) = self.background.as_mut() else {
            return;
        };
        if let Some(world) = background.world_mut() {
            self.sequencer.update(world, time.delta_seconds());
        }
        background.update(time);
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        if let Some(background) = self.background.as_ref() {
            background.draw(canvas);
        }
    }

    fn world(&self) -> Option<&GameplayWorld> {
        self.background.as_ref()?.world()
    }

    fn world_mut(&mut self) -> Option<&mut GameplayWorld> {
        self.background.as_mut()?.world_mut()
    }

    fn take_background(&mut self) -> Option<Box<dyn State>> {
        self.background.take()
    }
}
