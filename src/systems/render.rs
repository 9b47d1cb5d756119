//! Drawing helpers for the gameplay world.
//!
//! Rendering goes through [`Canvas`] so it works the same against raylib and
//! the headless recorder. World coordinates are shifted by the [`Camera`].

use raylib::prelude::Color;

use crate::backend::Canvas;
use crate::components::appearance::Appearance;
use crate::components::character::Character;
use crate::components::hitbox::Hitbox;
use crate::components::mapposition::MapPosition;
use crate::resources::camera2d::Camera;

pub const BACKGROUND: Color = Color::new(38, 54, 92, 255);
pub const DEBUG_HITBOX: Color = Color::RED;
pub const DEBUG_DESTINATION: Color = Color::YELLOW;
pub const DEBUG_INTERACT: Color = Color::GREEN;

/// Paint the current frame of `appearance`, bottom layer first.
pub fn draw_appearance(
    canvas: &mut dyn Canvas,
    camera: &Camera,
    position: &MapPosition,
    appearance: &Appearance,
) {
    let Some(frame) = appearance.frame() else {
        return;
    };
    let (x, y) = camera.apply_point(position.x, position.y);
    for layer in frame {
        canvas.draw_sprite(&layer.texture, layer.src, x, y);
    }
}

/// Outline hitbox, destination and interact tile.
pub fn draw_character_debug(
    canvas: &mut dyn Canvas,
    camera: &Camera,
    hitbox: &Hitbox,
    character: &Character,
    tile_size: i32,
) {
    canvas.stroke_rect(camera.apply(hitbox.rect), DEBUG_HITBOX);
    canvas.stroke_rect(camera.apply(character.destination()), DEBUG_DESTINATION);
    canvas.stroke_rect(camera.apply(character.interact_tile(tile_size)), DEBUG_INTERACT);
}
