//! Layered sprite animations.
//!
//! An [`AnimationClip`] is the immutable, validated description of one named
//! animation across a stack of sprite-sheet layers (base body, cloak, ...).
//! Each frame keeps one source rectangle per layer and the renderer paints
//! them bottom to top, which composites the frame without allocating images.
//!
//! [`Animation`] is the playback cursor over a shared clip.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::components::hitbox::Rect;
use crate::error::AssetError;
use crate::resources::spritesheetstore::SpriteSheet;

/// One layer's contribution to a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerFrame {
    pub texture: Arc<str>,
    pub src: Rect,
}

/// Layers of a single frame, bottom first.
pub type CompositeFrame = SmallVec<[LayerFrame; 4]>;

/// All animations of an appearance, by name.
pub type ClipSet = FxHashMap<String, Arc<AnimationClip>>;

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    pub frames: Vec<CompositeFrame>,
    pub frame_w: i32,
    pub frame_h: i32,
    /// Hitbox size declared by the base layer.
    pub hit_box: (i32, i32),
    /// Ticks per frame.
    pub duration: u32,
}

impl AnimationClip {
    /// Build animation `name` from `layers`, validating that every layer has
    /// the same frame count, frame size and frame duration as layer 0.
    pub fn compose(name: &str, layers: &[Arc<SpriteSheet>]) -> Result<Self, AssetError> {
        let Some(base) = layers.first() else {
            return Err(AssetError::EmptyAnimation {
                animation: name.to_string(),
            });
        };
        let base_anim = base
            .animation(name)
            .ok_or_else(|| AssetError::MissingAnimation {
                sheet: base.id.clone(),
                animation: name.to_string(),
            })?;
        if base_anim.seq.is_empty() {
            return Err(AssetError::EmptyAnimation {
                animation: name.to_string(),
            });
        }
        let geometry = base.descriptor.sheet_data;
        let mut frames: Vec<CompositeFrame> = vec![CompositeFrame::new(); base_anim.seq.len()];

        for layer in layers {
            let data = layer.descriptor.sheet_data;
            let anim = layer
                .animation(name)
                .ok_or_else(|| AssetError::MissingAnimation {
                    sheet: layer.id.clone(),
                    animation: name.to_string(),
                })?;
            let mismatch = |detail: String| AssetError::LayerMismatch {
                animation: name.to_string(),
                detail,
            };
            if anim.seq.len() != base_anim.seq.len() {
                return Err(mismatch(format!(
                    "'{}' has {} frames, '{}' has {}",
                    layer.id,
                    anim.seq.len(),
                    base.id,
                    base_anim.seq.len()
                )));
            }
            if data.tile_w != geometry.tile_w || data.tile_h != geometry.tile_h {
                return Err(mismatch(format!(
                    "'{}' frames are {}x{}, '{}' frames are {}x{}",
                    layer.id, data.tile_w, data.tile_h, base.id, geometry.tile_w, geometry.tile_h
                )));
            }
            if anim.frame_duration != base_anim.frame_duration {
                return Err(mismatch(format!(
                    "'{}' frame duration {} differs from {}",
                    layer.id, anim.frame_duration, base_anim.frame_duration
                )));
            }
            for (frame, column) in frames.iter_mut().zip(&anim.seq) {
                frame.push(LayerFrame {
                    texture: Arc::clone(&layer.texture),
                    src: Rect::new(
                        column * data.tile_w,
                        anim.row * data.tile_h,
                        data.tile_w,
                        data.tile_h,
                    ),
                });
            }
        }

        Ok(AnimationClip {
            name: name.to_string(),
            frames,
            frame_w: geometry.tile_w,
            frame_h: geometry.tile_h,
            hit_box: (geometry.hit_box_w, geometry.hit_box_h),
            duration: base_anim.frame_duration,
        })
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Ticks for one full loop.
    pub fn cycle_ticks(&self) -> u32 {
        self.duration * self.frames.len() as u32
    }
}

/// Playback cursor over a clip.
#[derive(Debug, Clone)]
pub struct Animation {
    clip: Arc<AnimationClip>,
    pub current_frame: usize,
    pub frame_timer: u32,
}

impl Animation {
    pub fn new(clip: Arc<AnimationClip>) -> Self {
        Self {
            clip,
            current_frame: 0,
            frame_timer: 0,
        }
    }

    pub fn clip(&self) -> &AnimationClip {
        &self.clip
    }

    /// Advance one tick.
    pub fn tick(&mut self) {
        self.frame_timer += 1;
        if self.frame_timer >= self.clip.duration {
            self.frame_timer = 0;
            self.current_frame = (self.current_frame + 1) % self.clip.frames.len().max(1);
        }
    }

    pub fn reset(&mut self) {
        self.current_frame = 0;
        self.frame_timer = 0;
    }

    pub fn frame(&self) -> &CompositeFrame {
        &self.clip.frames[self.current_frame]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::spritesheetstore::{AnimationData, SheetData, SheetDescriptor};
    use std::collections::BTreeMap;

    fn sheet(id: &str, tile: (i32, i32), seq: Vec<i32>, duration: u32) -> Arc<SpriteSheet> {
        let mut animations = BTreeMap::new();
        animations.insert(
            "walk_down".to_string(),
            AnimationData {
                row: 2,
                seq,
                frame_duration: duration,
            },
        );
        Arc::new(SpriteSheet {
            id: id.to_string(),
            texture: Arc::from(format!("{id}.png")),
            descriptor: SheetDescriptor {
                sheet_data: SheetData {
                    tile_w: tile.0,
                    tile_h: tile.1,
                    hit_box_w: 32,
                    hit_box_h: 32,
                },
                animations,
            },
        })
    }

    #[test]
    fn compose_stacks_layers_per_frame() {
        let base = sheet("base", (32, 48), vec![0, 1, 2], 8);
        let cloak = sheet("cloak", (32, 48), vec![3, 4, 5], 8);
        let clip = AnimationClip::compose("walk_down", &[base, cloak]).unwrap();
        assert_eq!(clip.frame_count(), 3);
        assert_eq!(clip.frames[1].len(), 2);
        assert_eq!(clip.frames[1][0].src, Rect::new(32, 96, 32, 48));
        assert_eq!(clip.frames[1][1].src, Rect::new(128, 96, 32, 48));
        assert_eq!(&*clip.frames[1][1].texture, "cloak.png");
    }

    #[test]
    fn mismatched_frame_count_is_rejected() {
        let base = sheet("base", (32, 32), vec![0, 1, 2], 8);
        let cloak = sheet("cloak", (32, 32), vec![0, 1], 8);
        let err = AnimationClip::compose("walk_down", &[base, cloak]).unwrap_err();
        assert!(matches!(err, AssetError::LayerMismatch { .. }));
    }

    #[test]
    fn mismatched_size_or_duration_is_rejected() {
        let base = sheet("base", (32, 32), vec![0, 1], 8);
        let tall = sheet("tall", (32, 48), vec![0, 1], 8);
        let slow = sheet("slow", (32, 32), vec![0, 1], 12);
        assert!(AnimationClip::compose("walk_down", &[base.clone(), tall]).is_err());
        assert!(AnimationClip::compose("walk_down", &[base, slow]).is_err());
    }

    #[test]
    fn missing_animation_names_the_sheet() {
        let base = sheet("base", (32, 32), vec![0], 8);
        match AnimationClip::compose("idle_up", &[base]) {
            Err(AssetError::MissingAnimation { sheet, animation }) => {
                assert_eq!(sheet, "base");
                assert_eq!(animation, "idle_up");
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn cursor_returns_to_start_after_full_cycles() {
        let clip = Arc::new(
            AnimationClip::compose("walk_down", &[sheet("base", (32, 32), vec![0, 1, 2], 5)])
                .unwrap(),
        );
        let mut anim = Animation::new(Arc::clone(&clip));
        anim.tick();
        anim.tick();
        let start = (anim.current_frame, anim.frame_timer);
        for _ in 0..(3 * clip.cycle_ticks()) {
            anim.tick();
        }
        assert_eq!((anim.current_frame, anim.frame_timer), start);
    }

    #[test]
    fn frame_advances_when_timer_reaches_duration() {
        let clip = Arc::new(
            AnimationClip::compose("walk_down", &[sheet("base", (32, 32), vec![0, 1], 3)])
                .unwrap(),
        );
        let mut anim = Animation::new(clip);
        anim.tick();
        anim.tick();
        assert_eq!(anim.current_frame, 0);
        anim.tick();
        assert_eq!(anim.current_frame, 1);
        assert_eq!(anim.frame_timer, 0);
    }
}
