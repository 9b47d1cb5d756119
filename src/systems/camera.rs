use bevy_ecs::prelude::*;

use crate::components::hitbox::Hitbox;
use crate::components::npc::Player;
use crate::resources::camera2d::Camera;

/// Keep the camera on the player.
pub fn camera_follow(mut camera: ResMut<Camera>, query: Query<&Hitbox, With<Player>>) {
    if let Some(hitbox) = query.iter().next() {
        camera.follow(hitbox.rect);
    }
}
