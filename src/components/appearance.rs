//! Named animations of a drawable entity.

use std::sync::Arc;

use bevy_ecs::prelude::Component;
use log::warn;
use rustc_hash::FxHashMap;

use crate::components::animation::{Animation, ClipSet, CompositeFrame};
use crate::components::character::{Facing, Motion, pose_name};

/// Maps animation names to playback cursors plus the currently shown one.
///
/// `current` is always a key of `animations`.
#[derive(Component, Debug, Clone)]
pub struct Appearance {
    animations: FxHashMap<String, Animation>,
    current: String,
    /// Sprite-sheet ids the clips were composited from, bottom first.
    layers: Vec<String>,
}

impl Appearance {
    /// Build an appearance from a clip set, starting on `initial` (or any
    /// animation if `initial` is absent). Returns `None` for an empty set.
    pub fn new(layers: Vec<String>, clips: &ClipSet, initial: &str) -> Option<Self> {
        let animations: FxHashMap<String, Animation> = clips
            .iter()
            .map(|(name, clip)| (name.clone(), Animation::new(Arc::clone(clip))))
            .collect();
        let current = if animations.contains_key(initial) {
            initial.to_string()
        } else {
            let mut names: Vec<&String> = animations.keys().collect();
            names.sort();
            names.first().map(|n| n.to_string())?
        };
        Some(Self {
            animations,
            current,
            layers,
        })
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn layers(&self) -> &[String] {
        &self.layers
    }

    pub fn has_animation(&self, name: &str) -> bool {
        self.animations.contains_key(name)
    }

    /// Switch the shown animation. Unknown names are ignored.
    pub fn set_animation(&mut self, name: &str) -> bool {
        if self.current == name {
            return true;
        }
        if self.animations.contains_key(name) {
            self.current = name.to_string();
            true
        } else {
            warn!("Appearance has no animation '{}'", name);
            false
        }
    }

    pub fn set_pose(&mut self, motion: Motion, facing: Facing) -> bool {
        self.set_animation(&pose_name(motion, facing))
    }

    /// Replace every animation, keeping the current name when the new set
    /// provides it.
    pub fn swap(&mut self, layers: Vec<String>, clips: &ClipSet) {
        if let Some(next) = Appearance::new(layers, clips, &self.current) {
            *self = next;
        }
    }

    pub fn tick(&mut self) {
        if let Some(anim) = self.animations.get_mut(&self.current) {
            anim.tick();
        }
    }

    pub fn animation(&self) -> Option<&Animation> {
        self.animations.get(&self.current)
    }

    pub fn frame(&self) -> Option<&CompositeFrame> {
        self.animation().map(Animation::frame)
    }

    pub fn frame_size(&self) -> (i32, i32) {
        self.animation()
            .map(|a| (a.clip().frame_w, a.clip().frame_h))
            .unwrap_or((0, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::spritesheetstore::{
        AnimationData, SheetData, SheetDescriptor, SpriteSheetStore,
    };
    use std::collections::BTreeMap;

    fn store() -> SpriteSheetStore {
        let mut animations = BTreeMap::new();
        for (row, name) in ["idle_down", "walk_down", "idle_right", "walk_right"]
            .iter()
            .enumerate()
        {
            animations.insert(
                name.to_string(),
                AnimationData {
                    row: row as i32,
                    seq: vec![0, 1],
                    frame_duration: 4,
                },
            );
        }
        let descriptor = SheetDescriptor {
            sheet_data: SheetData {
                tile_w: 32,
                tile_h: 32,
                hit_box_w: 32,
                hit_box_h: 32,
            },
            animations,
        };
        let mut store = SpriteSheetStore::new("assets/animations");
        store.insert("human/base", descriptor.clone());
        store.insert("human/cloak/school_cloak", descriptor);
        store
    }

    #[test]
    fn unknown_animation_keeps_current() {
        let mut store = store();
        let layers = vec!["human/base".to_string()];
        let clips = store.clip_set(&layers).unwrap();
        let mut app = Appearance::new(layers, &clips, "idle_down").unwrap();
        assert!(!app.set_animation("fly_up"));
        assert_eq!(app.current(), "idle_down");
        assert!(app.set_pose(Motion::Walk, Facing::Right));
        assert_eq!(app.current(), "walk_right");
    }

    #[test]
    fn swap_keeps_pose_and_changes_layers() {
        let mut store = store();
        let base = vec!["human/base".to_string()];
        let clips = store.clip_set(&base).unwrap();
        let mut app = Appearance::new(base, &clips, "idle_right").unwrap();
        let dressed = vec![
            "human/base".to_string(),
            "human/cloak/school_cloak".to_string(),
        ];
        let clips = store.clip_set(&dressed).unwrap();
        app.swap(dressed.clone(), &clips);
        assert_eq!(app.current(), "idle_right");
        assert_eq!(app.layers(), dressed.as_slice());
        assert_eq!(app.frame().unwrap().len(), 2);
    }
}
