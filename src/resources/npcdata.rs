//! NPC directory loaded from `data/npc_data.json`.
//!
//! ```json
//! { "npcs": { "maren": { "race": "human", "sprite": "human/base",
//!     "location": { "map": "test", "position": { "x": 96, "y": 64 } },
//!     "inventory": { "equipped": {}, "bag": [] } } } }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use bevy_ecs::prelude::Resource;
use log::info;
use serde::{Deserialize, Serialize};

use crate::components::inventory::InventoryRecord;
use crate::components::mapposition::MapPosition;
use crate::error::AssetError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcLocation {
    pub map: String,
    pub position: MapPosition,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcRecord {
    pub race: String,
    /// Base sprite-sheet id.
    pub sprite: String,
    pub location: NpcLocation,
    #[serde(default)]
    pub inventory: InventoryRecord,
}

/// Every NPC of the game by id, ordered so spawning is deterministic.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcDirectory {
    #[serde(default)]
    pub npcs: BTreeMap<String, NpcRecord>,
}

impl NpcDirectory {
    /// Read the directory. A missing file yields an empty directory.
    pub fn load_from_file(path: &Path) -> Result<Self, AssetError> {
        if !path.is_file() {
            info!("No NPC data at {}, no NPCs will spawn", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| AssetError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn insert(&mut self, id: impl Into<String>, record: NpcRecord) {
        self.npcs.insert(id.into(), record);
    }

    /// NPCs placed on `map`.
    pub fn on_map<'a>(
        &'a self,
        map: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a NpcRecord)> + 'a {
        self.npcs
            .iter()
            .filter(move |(_, npc)| npc.location.map == map)
            .map(|(id, npc)| (id.as_str(), npc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: &str = r#"{ "npcs": {
        "maren": { "race": "human", "sprite": "human/base",
                   "location": { "map": "test", "position": { "x": 96, "y": 64 } },
                   "inventory": {
                       "equipped": { "Cloak": { "type": "Cloak", "fields": {
                           "species": "human", "style": "school_cloak" } } },
                       "bag": [] } },
        "osric": { "race": "human", "sprite": "human/base",
                   "location": { "map": "house", "position": { "x": 0, "y": 0 } } }
    } }"#;

    #[test]
    fn filters_by_map() {
        let dir: NpcDirectory = serde_json::from_str(DATA).unwrap();
        let on_test: Vec<_> = dir.on_map("test").map(|(id, _)| id).collect();
        assert_eq!(on_test, vec!["maren"]);
        assert_eq!(dir.npcs["maren"].location.position, MapPosition::new(96, 64));
        assert_eq!(dir.npcs["maren"].inventory.equipped.len(), 1);
        assert!(dir.npcs["osric"].inventory.bag.is_empty());
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let npcs = NpcDirectory::load_from_file(&dir.path().join("npc_data.json")).unwrap();
        assert!(npcs.npcs.is_empty());
    }
}
