//! Portals and doors.
//!
//! A portal moves the player to another map. Touching one makes the gameplay
//! state ask the portal for its enter sequence, switch maps, then play the
//! exit sequence of the matching portal on the other side. Doors are portals
//! that animate open and shut around the traversal.

use log::debug;

use crate::cinematic::command::{Actor, WorldCommand, WorldSequencer};
use crate::cinematic::{Scene, SceneAction, Sequencer};
use crate::components::hitbox::Rect;
use crate::resources::tilemap::MapObject;
use crate::resources::tilemap::animatedtile::TileFrame;

/// Seconds between "Open Door" and walking in.
pub const DOOR_ENTER_PAUSE: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorState {
    Closed,
    Opening,
    Open,
    Closing,
}

/// Door animation. `open_state` indexes `frames`; frame 0 is shut and the
/// last frame is fully open.
#[derive(Debug, Clone, PartialEq)]
pub struct Door {
    pub is_locked: bool,
    pub open_state: usize,
    state: DoorState,
    frames: Vec<TileFrame>,
    timer: f32,
}

impl Door {
    pub fn new(frames: Vec<TileFrame>, is_locked: bool) -> Self {
        Self {
            is_locked,
            open_state: 0,
            state: DoorState::Closed,
            frames,
            timer: 0.0,
        }
    }

    pub fn state(&self) -> DoorState {
        self.state
    }

    fn last_frame(&self) -> usize {
        self.frames.len().saturating_sub(1)
    }

    /// Start opening. Locked doors stay shut and return false.
    pub fn open(&mut self) -> bool {
        if self.is_locked {
            return false;
        }
        match self.state {
            DoorState::Open | DoorState::Opening => {}
            DoorState::Closed | DoorState::Closing => {
                self.state = DoorState::Opening;
                self.timer = 0.0;
                self.settle();
            }
        }
        true
    }

    pub fn close(&mut self) {
        match self.state {
            DoorState::Closed | DoorState::Closing => {}
            DoorState::Open | DoorState::Opening => {
                self.state = DoorState::Closing;
                self.timer = 0.0;
                self.settle();
            }
        }
    }

    /// Open a shut door or shut an open one.
    pub fn toggle(&mut self) -> bool {
        match self.state {
            DoorState::Closed | DoorState::Closing => self.open(),
            DoorState::Open | DoorState::Opening => {
                self.close();
                true
            }
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(self.state, DoorState::Open | DoorState::Closed)
    }

    pub fn is_open(&self) -> bool {
        self.state == DoorState::Open
    }

    pub fn current_gid(&self) -> Option<u32> {
        self.frames.get(self.open_state).map(|f| f.gid)
    }

    pub fn update(&mut self, dt: f32) {
        let moving_up = match self.state {
            DoorState::Opening => true,
            DoorState::Closing => false,
            DoorState::Open | DoorState::Closed => return,
        };
        self.timer += dt;
        let hold = self
            .frames
            .get(self.open_state)
            .map(TileFrame::seconds)
            .unwrap_or(0.0);
        if self.timer + 1e-6 < hold {
            return;
        }
        self.timer = 0.0;
        if moving_up {
            self.open_state = (self.open_state + 1).min(self.last_frame());
        } else {
            self.open_state = self.open_state.saturating_sub(1);
        }
        self.settle();
    }

    fn settle(&mut self) {
        match self.state {
            DoorState::Opening if self.open_state >= self.last_frame() => {
                self.open_state = self.last_frame();
                self.state = DoorState::Open;
            }
            DoorState::Closing if self.open_state == 0 => self.state = DoorState::Closed,
            _ => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PortalKind {
    Plain,
    Door(Door),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Portal {
    pub rect: Rect,
    /// Name of the map this portal leads to.
    pub destination: String,
    pub pid: i32,
    /// Portal to spawn at on the destination map.
    pub to_pid: i32,
    pub image: Option<u32>,
    pub kind: PortalKind,
}

impl Portal {
    pub fn door(&self) -> Option<&Door> {
        match &self.kind {
            PortalKind::Door(door) => Some(door),
            PortalKind::Plain => None,
        }
    }

    pub fn door_mut(&mut self) -> Option<&mut Door> {
        match &mut self.kind {
            PortalKind::Door(door) => Some(door),
            PortalKind::Plain => None,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.door().is_some_and(|d| d.is_locked)
    }

    /// Scenes that take the player from in front of the portal onto it.
    pub fn enter_sequence(&self) -> WorldSequencer {
        let mut seq = Sequencer::default();
        if self.door().is_some() {
            seq.push_scene(
                Scene::new(
                    "Open Door",
                    vec![SceneAction::new(WorldCommand::OpenDoor { pid: self.pid })],
                )
                .with_post_delay(DOOR_ENTER_PAUSE),
            );
        }
        seq.push_scene(Scene::new(
            "Enter Portal",
            vec![
                SceneAction::new(WorldCommand::WalkOnto {
                    actor: Actor::Player,
                    x: self.rect.x,
                    y: self.rect.y,
                })
                .until(WorldCommand::HasArrived {
                    actor: Actor::Player,
                }),
            ],
        ));
        seq
    }

    /// Scenes played after the player appears on this portal.
    pub fn exit_sequence(&self) -> WorldSequencer {
        if self.door().is_none() {
            return Sequencer::new(vec![Scene::new("Exit Portal", vec![])]);
        }
        Sequencer::new(vec![
            Scene::new(
                "Exit Door",
                vec![
                    SceneAction::new(WorldCommand::OpenDoor { pid: self.pid }),
                    SceneAction::new(WorldCommand::WalkForward {
                        actor: Actor::Player,
                    })
                    .until(WorldCommand::HasArrived {
                        actor: Actor::Player,
                    }),
                ],
            ),
            Scene::new(
                "Close Door",
                vec![
                    SceneAction::new(WorldCommand::CloseDoor { pid: self.pid })
                        .until(WorldCommand::DoorSettled { pid: self.pid }),
                ],
            ),
        ])
    }
}

impl MapObject for Portal {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn update(&mut self, dt: f32) {
        if let Some(door) = self.door_mut() {
            door.update(dt);
        }
    }

    fn current_gid(&self) -> Option<u32> {
        self.door().and_then(Door::current_gid).or(self.image)
    }

    fn interact(&mut self) -> Vec<String> {
        let destination = self.destination.clone();
        match &mut self.kind {
            PortalKind::Plain => vec![
                "It's a Portal...".to_string(),
                format!("It leads to '{destination}'."),
            ],
            PortalKind::Door(door) if door.is_locked => vec!["The door is locked.".to_string()],
            PortalKind::Door(door) => {
                door.toggle();
                debug!("Door {} toggled to {:?}", self.pid, door.state());
                Vec::new()
            }
        }
    }
}
