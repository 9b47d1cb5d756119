//! Commands understood by the gameplay world.

use serde::{Deserialize, Serialize};

use crate::cinematic::{Scene, SceneAction, Sequencer};

/// Who a movement command applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Actor {
    Player,
    Npc(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FadeKind {
    /// Black to clear.
    In,
    /// Clear to black.
    Out,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorldCommand {
    /// Walk until the hitbox's top-left reaches `(x, y)`. Ignores obstacles.
    WalkOnto { actor: Actor, x: i32, y: i32 },
    /// Walk one tile in the facing direction. Ignores obstacles.
    WalkForward { actor: Actor },
    /// Predicate: the actor is idle.
    HasArrived { actor: Actor },
    OpenDoor { pid: i32 },
    CloseDoor { pid: i32 },
    /// Predicate: the door is fully open or fully closed.
    DoorSettled { pid: i32 },
    /// Open `map` and put the player on the portal with `spawn_pid`.
    ChangeMap { map: String, spawn_pid: i32 },
    StartFade { kind: FadeKind, seconds: f32 },
    /// Predicate: the running fade has completed.
    FadeDone,
    /// Remove the fade overlay.
    ClearFade,
}

pub type WorldSequencer = Sequencer<WorldCommand>;

/// Seconds a map-change fade takes.
pub const DEFAULT_FADE_SECONDS: f32 = 0.5;

/// Scene that fades out and keeps the screen dark.
pub fn fade_out_scene(seconds: f32) -> Scene<WorldCommand> {
    Scene::new(
        "Fade Out",
        vec![
            SceneAction::new(WorldCommand::StartFade {
                kind: FadeKind::Out,
                seconds,
            })
            .until(WorldCommand::FadeDone),
        ],
    )
}

/// Scene that fades in and removes the overlay afterwards.
pub fn fade_in_scene(seconds: f32) -> Scene<WorldCommand> {
    Scene::new(
        "Fade In",
        vec![
            SceneAction::new(WorldCommand::StartFade {
                kind: FadeKind::In,
                seconds,
            })
            .until(WorldCommand::FadeDone)
            .finally(WorldCommand::ClearFade),
        ],
    )
}

/// Scene that switches maps.
pub fn change_map_scene(map: impl Into<String>, spawn_pid: i32) -> Scene<WorldCommand> {
    Scene::new(
        "Change Map",
        vec![SceneAction::new(WorldCommand::ChangeMap {
            map: map.into(),
            spawn_pid,
        })],
    )
}
