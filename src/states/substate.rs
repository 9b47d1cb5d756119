//! Nested loops that run inside the gameplay tick.
//!
//! A sub-state takes over the loop until it is done: it polls input, handles
//! its own keys, updates the world, draws the world plus its own overlay and
//! presents. The state machine never sees it; the gameplay state simply
//! returns once [`SubState::run`] does.

use log::debug;

use crate::backend::Canvas;
use crate::cinematic::command::WorldSequencer;
use crate::game::GameplayWorld;
use crate::resources::input::InputState;
use crate::resources::worldtime::WorldTime;
use crate::states::message_box::MessagePages;
use crate::states::{EngineContext, resized};

pub trait SubState {
    fn handle_events(&mut self, input: &InputState);

    /// Advance the world. The default keeps it animating.
    fn update(&mut self, world: &mut GameplayWorld, time: &WorldTime) {
        world.update(time);
    }

    /// Overlay drawn on top of the world.
    fn draw(&self, _canvas: &mut dyn Canvas) {}

    fn is_done(&self) -> bool;

    /// Block until done or until a quit is requested.
    fn run(&mut self, world: &mut GameplayWorld, ctx: &mut EngineContext<'_>) {
        while !self.is_done() {
            let events = ctx.begin_tick();
            if ctx.quit_requested {
                return;
            }
            if let Some((width, height)) = resized(&events) {
                world.resize(width, height);
            }
            self.handle_events(&ctx.input);
            let time = ctx.time;
            self.update(world, &time);
            ctx.platform.present(&mut |canvas| {
                world.draw(canvas);
                self.draw(canvas);
            });
            ctx.time.tick();
        }
    }
}

/// Dialog over the running world.
pub struct MessageBoxSubState {
    pages: MessagePages,
}

impl MessageBoxSubState {
    pub fn new(messages: Vec<String>) -> Self {
        Self {
            pages: MessagePages::new(messages),
        }
    }
}

impl SubState for MessageBoxSubState {
    fn handle_events(&mut self, input: &InputState) {
        if input.confirmed() {
            self.pages.advance();
        }
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        self.pages.draw(canvas);
    }

    fn is_done(&self) -> bool {
        self.pages.is_done()
    }
}

/// Plays a cinematic on the world. Input is ignored.
pub struct SequencerSubState {
    sequencer: WorldSequencer,
}

impl SequencerSubState {
    pub fn new(sequencer: WorldSequencer) -> Self {
        Self { sequencer }
    }
}

impl SubState for SequencerSubState {
    fn handle_events(&mut self, _input: &InputState) {}

    fn update(&mut self, world: &mut GameplayWorld, time: &WorldTime) {
        self.sequencer.update(world, time.delta_seconds());
        world.update(time);
        if self.sequencer.is_finished() {
            debug!("Cinematic finished");
        }
    }

    fn is_done(&self) -> bool {
        self.sequencer.is_finished()
    }
}
