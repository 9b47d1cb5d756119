//! Gameplay state.
//!
//! Turns input into world actions: walking, interacting, equipping and
//! saving. Bumping into a portal plays the traversal cinematic in a
//! [`SequencerSubState`]; messages are shown in a [`MessageBoxSubState`].

use log::{error, info, warn};

use crate::backend::Canvas;
use crate::cinematic::command::{
    DEFAULT_FADE_SECONDS, WorldSequencer, change_map_scene, fade_in_scene, fade_out_scene,
};
use crate::cinematic::Sequencer;
use crate::components::item::Slot;
use crate::error::Result;
use crate::events::input::InputEvent;
use crate::game::GameplayWorld;
use crate::resources::gameconfig::GameConfig;
use crate::resources::tilemap::portal::Portal;
use crate::resources::worldtime::WorldTime;
use crate::states::substate::{MessageBoxSubState, SequencerSubState, SubState};
use crate::states::{EngineContext, LoadData, State, StateCommand, StateId, StatePayload, resized};

/// Enter `portal`, fade out, switch to its map, fade in, then step out of
/// `destination`.
pub fn traversal_sequence(portal: &Portal, destination: &Portal) -> WorldSequencer {
    let mut sequence = portal.enter_sequence();
    sequence.push_scene(fade_out_scene(DEFAULT_FADE_SECONDS));
    sequence.push_scene(change_map_scene(portal.destination.clone(), portal.to_pid));
    sequence.push_scene(fade_in_scene(DEFAULT_FADE_SECONDS));
    sequence.append(destination.exit_sequence());
    sequence
}

fn blocked_message(portal: &Portal) -> String {
    format!("The way to '{}' is blocked.", portal.destination)
}

pub struct GameplayState {
    world: GameplayWorld,
}

impl GameplayState {
    pub fn new(config: &GameConfig) -> Result<Self> {
        Ok(Self {
            world: GameplayWorld::new(config)?,
        })
    }

    pub fn from_world(world: GameplayWorld) -> Self {
        Self { world }
    }

    fn show_messages(&mut self, ctx: &mut EngineContext<'_>, messages: Vec<String>) {
        MessageBoxSubState::new(messages).run(&mut self.world, ctx);
    }

    /// Walk through `portal`. Locked doors and dangling links only produce
    /// a message; a map change that fails midway puts the player back.
    pub fn traverse(&mut self, ctx: &mut EngineContext<'_>, portal: Portal) {
        if portal.is_locked() {
            self.show_messages(ctx, vec!["The door is locked.".to_string()]);
            return;
        }
        let destination = match self.world.peek_portal(&portal.destination, portal.to_pid) {
            Ok(Some(destination)) => destination,
            Ok(None) => {
                warn!(
                    "Portal {} leads to missing pid {} on '{}'",
                    portal.pid, portal.to_pid, portal.destination
                );
                self.show_messages(ctx, vec![blocked_message(&portal)]);
                return;
            }
            Err(err) => {
                error!("Cannot open '{}': {}", portal.destination, err);
                self.show_messages(ctx, vec![blocked_message(&portal)]);
                return;
            }
        };
        let Some(player) = self.world.player() else {
            return;
        };
        let before = self.world.hitbox(player);
        info!("Entering '{}' through portal {}", portal.destination, portal.pid);
        SequencerSubState::new(traversal_sequence(&portal, &destination)).run(&mut self.world, ctx);
        if let Some(message) = self.world.recover_traversal(player, before) {
            self.show_messages(ctx, vec![message]);
        }
    }

    fn interact(&mut self, ctx: &mut EngineContext<'_>) {
        let Some(target) = self.world.interact_target() else {
            return;
        };
        let messages = self.world.interact(target);
        if !messages.is_empty() {
            self.show_messages(ctx, messages);
        }
    }
}

impl State for GameplayState {
    fn id(&self) -> StateId {
        StateId::Gameplay
    }

    fn handle_events(
        &mut self,
        ctx: &mut EngineContext<'_>,
        events: &[InputEvent],
    ) -> Result<Option<StateCommand>> {
        if let Some((width, height)) = resized(events) {
            self.world.resize(width, height);
        }
        let Some(player) = self.world.player() else {
            return Ok(None);
        };
        let input = ctx.input.clone();

        if input.mode_debug.just_pressed {
            self.world.toggle_debug();
        }
        if input.action_back.just_pressed {
            return Ok(Some(StateCommand::change(StateId::MainMenu)));
        }
        if input.action_save.just_pressed {
            let message = if self.world.save() {
                "Game saved."
            } else {
                "The game could not be saved."
            };
            self.show_messages(ctx, vec![message.to_string()]);
            return Ok(None);
        }
        if input.action_equip.just_pressed {
            self.world.equip_last_from_bag()?;
        }
        if input.action_unequip.just_pressed {
            self.world.unequip(Slot::Cloak)?;
        }
        if !self.world.is_idle(player) {
            return Ok(None);
        }
        if input.action_interact.just_pressed {
            self.interact(ctx);
        } else if let Some(facing) = input.walk_direction()
            && let Some(hit) = self.world.walk(player, facing)
            && let Some(portal) = self.world.portal(hit).cloned()
        {
            self.traverse(ctx, portal);
        } else if input.walk_direction().is_none() {
            self.world.rest(player);
        }
        Ok(None)
    }

    fn update(&mut self, time: &WorldTime) {
        self.world.update(time);
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        self.world.draw(canvas);
    }

    fn load(
        &mut self,
        ctx: &mut EngineContext<'_>,
        data: LoadData,
    ) -> Result<Option<StateCommand>> {
        match data {
            LoadData::Saved(saved) => match self.world.load_saved(&saved) {
                Ok(()) => Ok(None),
                Err(err) => {
                    error!("Could not load '{}': {}", saved.file_path.display(), err);
                    Ok(Some(StateCommand::change_with(
                        StateId::MessageBox,
                        StatePayload::Messages(vec![
                            "The saved game could not be loaded.".to_string(),
                        ]),
                    )))
                }
            },
            LoadData::NewGame(player) => {
                self.world.new_game(&player, &ctx.config.saves_dir)?;
                let intro = Sequencer::new(vec![fade_in_scene(DEFAULT_FADE_SECONDS)]);
                Ok(Some(StateCommand::change_with(
                    StateId::Sequencer,
                    StatePayload::Scenes(intro),
                )))
            }
        }
    }

    fn world(&self) -> Option<&GameplayWorld> {
        Some(&self.world)
    }

    fn world_mut(&mut self) -> Option<&mut GameplayWorld> {
        Some(&mut self.world)
    }
}
