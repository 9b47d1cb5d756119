//! Cinematic engine.
//!
//! Cinematics are scripted, non-interactive stretches of gameplay such as
//! walking through a door or fading between maps. They are built from plain
//! data and advanced one tick at a time by whoever owns the world:
//!
//! - [`executable`] – a command plus a "has it been called" memo
//! - [`action`] – one command, an optional completion predicate and an
//!   optional finalizer
//! - [`scene`] – concurrent actions gated by a pre-delay and a post-delay
//! - [`sequencer`] – scenes played strictly one after another
//! - [`command`] – the commands the gameplay world understands
//!
//! Commands are executed by a [`Director`]. The engine never reaches into the
//! world itself, so a sequencer can be unit-tested against a recording
//! director and serialized for replay.

pub mod action;
pub mod command;
pub mod executable;
pub mod scene;
pub mod sequencer;

pub use action::SceneAction;
pub use executable::ExecutableMethod;
pub use scene::Scene;
pub use sequencer::Sequencer;

/// Delays at or below this many seconds count as elapsed.
pub const DELAY_EPSILON: f32 = 1e-6;

/// Executes cinematic commands against some world.
///
/// The return value is the command's truthiness: predicates report whether
/// their condition holds, plain actions usually return `true`.
pub trait Director {
    type Command;

    fn execute(&mut self, command: &Self::Command) -> bool;
}
