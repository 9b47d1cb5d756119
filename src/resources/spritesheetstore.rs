//! Sprite-sheet descriptor registry.
//!
//! Every character sprite sheet is a PNG with a JSON sidecar of the same
//! stem describing the frame grid and the animations it contains:
//!
//! ```json
//! {
//!   "sheet_data": { "tile_w": 32, "tile_h": 48, "hit_box_w": 32, "hit_box_h": 32 },
//!   "walk_down":  { "row": 0, "seq": [0, 1, 2, 3], "frame_duration": 8 },
//!   "idle_down":  { "row": 4, "seq": [0], "frame_duration": 15 }
//! }
//! ```
//!
//! Sheets are loaded lazily on first request and kept by id. Composited
//! clip sets are cached per layer stack so equipping and unequipping the
//! same items does not rebuild every animation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bevy_ecs::prelude::Resource;
use log::debug;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::components::animation::{AnimationClip, ClipSet};
use crate::error::AssetError;

/// Per-sheet frame geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetData {
    pub tile_w: i32,
    pub tile_h: i32,
    pub hit_box_w: i32,
    pub hit_box_h: i32,
}

/// One named animation inside a sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationData {
    /// Sheet row holding the frames.
    pub row: i32,
    /// Column indices, in playback order.
    pub seq: Vec<i32>,
    /// Ticks each frame stays on screen.
    pub frame_duration: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetDescriptor {
    pub sheet_data: SheetData,
    #[serde(flatten)]
    pub animations: BTreeMap<String, AnimationData>,
}

/// A descriptor bound to the texture it describes.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteSheet {
    /// Sheet id, e.g. `"human/base"`.
    pub id: String,
    /// Texture key (asset path of the PNG).
    pub texture: Arc<str>,
    pub descriptor: SheetDescriptor,
}

impl SpriteSheet {
    pub fn animation(&self, name: &str) -> Option<&AnimationData> {
        self.descriptor.animations.get(name)
    }

    pub fn animation_names(&self) -> impl Iterator<Item = &str> {
        self.descriptor.animations.keys().map(String::as_str)
    }
}

#[derive(Resource, Debug)]
pub struct SpriteSheetStore {
    root: PathBuf,
    sheets: FxHashMap<String, Arc<SpriteSheet>>,
    clip_sets: FxHashMap<Vec<String>, Arc<ClipSet>>,
}

impl SpriteSheetStore {
    /// Create an empty store reading sheets from `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        SpriteSheetStore {
            root: root.into(),
            sheets: FxHashMap::default(),
            clip_sets: FxHashMap::default(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Register a descriptor without touching the file system.
    ///
    /// Cached clip sets built from an older sheet with this id are dropped.
    pub fn insert(&mut self, id: impl Into<String>, descriptor: SheetDescriptor) {
        let id = id.into();
        self.clip_sets.retain(|layers, _| !layers.iter().any(|layer| *layer == id));
        let texture: Arc<str> = self.texture_path(&id).to_string_lossy().into();
        self.sheets.insert(
            id.clone(),
            Arc::new(SpriteSheet {
                id,
                texture,
                descriptor,
            }),
        );
    }

    pub fn get(&self, id: &str) -> Option<&Arc<SpriteSheet>> {
        self.sheets.get(id)
    }

    /// Fetch a sheet, reading its sidecar on first use.
    pub fn load(&mut self, id: &str) -> Result<Arc<SpriteSheet>, AssetError> {
        if let Some(sheet) = self.sheets.get(id) {
            return Ok(Arc::clone(sheet));
        }
        let path = self.root.join(format!("{id}.json"));
        debug!("Loading sprite sheet descriptor {}", path.display());
        let text = std::fs::read_to_string(&path).map_err(|source| AssetError::Io {
            path: path.clone(),
            source,
        })?;
        let descriptor: SheetDescriptor =
            serde_json::from_str(&text).map_err(|source| AssetError::Json { path, source })?;
        self.insert(id, descriptor);
        self.sheets
            .get(id)
            .cloned()
            .ok_or_else(|| AssetError::MissingAnimation {
                sheet: id.to_string(),
                animation: String::from("sheet_data"),
            })
    }

    /// Composite every animation of `layers[0]` across all layers.
    ///
    /// The result is cached by the exact layer stack.
    pub fn clip_set(&mut self, layers: &[String]) -> Result<Arc<ClipSet>, AssetError> {
        if let Some(set) = self.clip_sets.get(layers) {
            return Ok(Arc::clone(set));
        }
        let sheets = layers
            .iter()
            .map(|id| self.load(id))
            .collect::<Result<Vec<_>, _>>()?;
        let Some(base) = sheets.first() else {
            return Err(AssetError::EmptyAnimation {
                animation: String::from("<no layers>"),
            });
        };
        let mut set = ClipSet::default();
        for name in base.animation_names() {
            let clip = AnimationClip::compose(name, &sheets)?;
            set.insert(name.to_string(), Arc::new(clip));
        }
        let set = Arc::new(set);
        self.clip_sets.insert(layers.to_vec(), Arc::clone(&set));
        Ok(set)
    }

    fn texture_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.png"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn descriptor(tile: (i32, i32), duration: u32, frames: usize) -> SheetDescriptor {
        let mut animations = BTreeMap::new();
        for (row, name) in ["walk_down", "idle_down", "walk_right", "idle_right"]
            .iter()
            .enumerate()
        {
            animations.insert(
                name.to_string(),
                AnimationData {
                    row: row as i32,
                    seq: (0..frames as i32).collect(),
                    frame_duration: duration,
                },
            );
        }
        SheetDescriptor {
            sheet_data: SheetData {
                tile_w: tile.0,
                tile_h: tile.1,
                hit_box_w: 32,
                hit_box_h: 32,
            },
            animations,
        }
    }

    #[test]
    fn descriptor_parses_flattened_animations() {
        let json = r#"{
            "sheet_data": { "tile_w": 32, "tile_h": 48, "hit_box_w": 32, "hit_box_h": 32 },
            "walk_down": { "row": 0, "seq": [0, 1, 2, 3], "frame_duration": 8 },
            "idle_down": { "row": 4, "seq": [0], "frame_duration": 15 }
        }"#;
        let d: SheetDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(d.sheet_data.tile_h, 48);
        assert_eq!(d.animations.len(), 2);
        assert_eq!(d.animations["walk_down"].seq, vec![0, 1, 2, 3]);
    }

    #[test]
    fn clip_sets_are_cached_per_layer_stack() {
        let mut store = SpriteSheetStore::new("assets/animations");
        store.insert("human/base", descriptor((32, 32), 8, 4));
        store.insert("human/cloak/school_cloak", descriptor((32, 32), 8, 4));
        let layers = vec!["human/base".to_string(), "human/cloak/school_cloak".to_string()];
        let a = store.clip_set(&layers).unwrap();
        let b = store.clip_set(&layers).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.len(), 4);
        assert_eq!(a["walk_down"].frames[0].len(), 2);
    }

    #[test]
    fn reinserting_a_sheet_only_evicts_stacks_that_use_it() {
        let mut store = SpriteSheetStore::new("assets/animations");
        store.insert("human/base", descriptor((32, 32), 8, 4));
        store.insert("elf/base", descriptor((32, 32), 8, 4));
        let human = vec!["human/base".to_string()];
        let elf = vec!["elf/base".to_string()];
        let human_before = store.clip_set(&human).unwrap();
        let elf_before = store.clip_set(&elf).unwrap();

        store.insert("elf/base", descriptor((32, 48), 8, 4));
        assert!(Arc::ptr_eq(&human_before, &store.clip_set(&human).unwrap()));
        let elf_after = store.clip_set(&elf).unwrap();
        assert!(!Arc::ptr_eq(&elf_before, &elf_after));
        assert_eq!(elf_after["walk_down"].frame_h, 48);
    }

    #[test]
    fn missing_sheet_file_is_an_io_error() {
        let mut store = SpriteSheetStore::new("/definitely/not/here");
        let err = store.load("ghost").unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }

    #[test]
    fn texture_key_points_at_png_sibling() {
        let mut store = SpriteSheetStore::new("assets/animations");
        store.insert("human/base", descriptor((32, 32), 8, 4));
        let sheet = store.get("human/base").unwrap();
        assert!(sheet.texture.ends_with("human/base.png"));
    }
}
