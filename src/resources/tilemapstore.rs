//! Tiled map storage.
//!
//! Maps live at `<maps_dir>/<name>/<name>.tmj`. External tilesets (`.tsj`)
//! are resolved relative to the map file when it is first read. The parsed
//! [`MapData`] is cached by name; every [`TilemapStore::open`] builds a
//! fresh [`TiledMap`] so door and animation state never leaks between
//! visits.

use std::fs;
use std::path::{Path, PathBuf};

use bevy_ecs::prelude::Resource;
use log::info;
use rustc_hash::FxHashMap;

use crate::error::AssetError;
use crate::resources::tilemap::TiledMap;
use crate::resources::tilemap::tiled::{ExternalTilesetData, MapData};

/// Registry of parsed maps by name.
#[derive(Resource, Debug)]
pub struct TilemapStore {
    root: PathBuf,
    pub map: FxHashMap<String, MapData>,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, AssetError> {
    let text = fs::read_to_string(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| AssetError::Json {
        path: path.to_path_buf(),
        source,
    })
}

impl TilemapStore {
    /// Create an empty store reading from `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        TilemapStore {
            root: root.into(),
            map: FxHashMap::default(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the map file and its images.
    pub fn map_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub fn map_path(&self, name: &str) -> PathBuf {
        self.map_dir(name).join(format!("{name}.tmj"))
    }

    /// Get parsed map data by name, if loaded.
    pub fn get(&self, key: impl AsRef<str>) -> Option<&MapData> {
        self.map.get(key.as_ref())
    }

    /// Insert already parsed data under `key`.
    pub fn insert(&mut self, key: impl Into<String>, data: MapData) {
        self.map.insert(key.into(), data);
    }

    /// Parse `json` and insert it under `key`. Tilesets must be embedded.
    pub fn insert_json(&mut self, key: impl Into<String>, json: &str) -> Result<(), AssetError> {
        let key = key.into();
        let data: MapData = serde_json::from_str(json).map_err(|source| AssetError::Json {
            path: PathBuf::from(&key),
            source,
        })?;
        self.insert(key, data);
        Ok(())
    }

    /// Read a map from disk into the cache (no-op when already cached).
    pub fn load(&mut self, name: &str) -> Result<&MapData, AssetError> {
        if !self.map.contains_key(name) {
            let path = self.map_path(name);
            if !path.is_file() {
                return Err(AssetError::MissingMap(name.to_string()));
            }
            let mut data: MapData = read_json(&path)?;
            let dir = self.map_dir(name);
            for tileset in &mut data.tilesets {
                if let Some(source) = tileset.source.clone() {
                    let external: ExternalTilesetData = read_json(&dir.join(source))?;
                    tileset.resolve(external);
                }
            }
            info!("Map '{}' loaded from {}", name, path.display());
            self.map.insert(name.to_string(), data);
        }
        self.map
            .get(name)
            .ok_or_else(|| AssetError::MissingMap(name.to_string()))
    }

    /// Build a fresh world for map `name`, loading it first if needed.
    pub fn open(&mut self, name: &str) -> Result<TiledMap, AssetError> {
        let dir = self.map_dir(name);
        let data = self.load(name)?;
        TiledMap::from_data(name, data, &dir)
    }

    /// Clear all loaded maps.
    pub fn clear(&mut self) {
        self.map.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: &str = r#"{
        "width": 2, "height": 2, "tilewidth": 32, "tileheight": 32,
        "layers": [{"type": "tilelayer", "name": "Ground", "width": 2, "height": 2,
                    "data": [1, 1, 1, 1]}],
        "tilesets": [{"firstgid": 1, "source": "tiles.tsj"}]
    }"#;

    const TILESET: &str = r#"{
        "image": "tiles.png", "columns": 2, "tilecount": 4, "tilewidth": 32, "tileheight": 32
    }"#;

    #[test]
    fn loads_map_and_resolves_external_tileset() {
        let dir = tempfile::tempdir().unwrap();
        let map_dir = dir.path().join("field");
        fs::create_dir_all(&map_dir).unwrap();
        fs::write(map_dir.join("field.tmj"), MAP).unwrap();
        fs::write(map_dir.join("tiles.tsj"), TILESET).unwrap();

        let mut store = TilemapStore::new(dir.path());
        let map = store.open("field").unwrap();
        assert_eq!(map.static_tiles.len(), 4);
        assert_eq!(map.tilesets[0].tilecount, 4);
        assert!(store.get("field").unwrap().tilesets[0].source.is_none());
    }

    #[test]
    fn missing_map_is_reported_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = TilemapStore::new(dir.path());
        let err = store.open("nowhere").unwrap_err();
        assert!(matches!(err, AssetError::MissingMap(name) if name == "nowhere"));
    }

    #[test]
    fn inserted_json_opens_without_disk() {
        let mut store = TilemapStore::new("/unused");
        let json = MAP.replace(
            r#"{"firstgid": 1, "source": "tiles.tsj"}"#,
            r#"{"firstgid": 1, "image": "t.png", "columns": 2, "tilecount": 4,
                "tilewidth": 32, "tileheight": 32}"#,
        );
        store.insert_json("inline", &json).unwrap();
        let map = store.open("inline").unwrap();
        assert_eq!((map.width, map.height), (64, 64));
    }
}
