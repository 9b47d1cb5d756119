//! Character movement.
//!
//! Every non-idle character steps its hitbox toward its destination; the
//! entity origin follows the hitbox. On arrival the appearance switches to
//! the idle pose for the character's facing.

use bevy_ecs::prelude::*;

use crate::components::appearance::Appearance;
use crate::components::character::{Character, Motion};
use crate::components::hitbox::Hitbox;
use crate::components::mapposition::MapPosition;

pub fn character_movement(
    mut query: Query<(
        &mut MapPosition,
        &mut Hitbox,
        &Character,
        Option<&mut Appearance>,
    )>,
) {
    for (mut position, mut hitbox, character, appearance) in query.iter_mut() {
        if character.is_idle(&hitbox) {
            continue;
        }
        let arrived = character.step(&mut hitbox);
        *position = hitbox.origin_for(hitbox.rect.x, hitbox.rect.y);
        if arrived && let Some(mut appearance) = appearance {
            appearance.set_pose(Motion::Idle, character.facing);
        }
    }
}
