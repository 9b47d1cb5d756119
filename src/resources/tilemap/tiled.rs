//! Serde model of Tiled's JSON map format (`.tmj` / `.tsj`).
//!
//! Only the parts the game reads are modelled. Tile layer data must be
//! stored uncompressed (the Tiled default "CSV" encoding in JSON maps).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Flip/rotation flags stored in the top bits of a gid.
pub const GID_FLAGS_MASK: u32 = 0xE000_0000;

pub fn strip_flags(gid: u32) -> u32 {
    gid & !GID_FLAGS_MASK
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapData {
    /// Width in tiles.
    pub width: u32,
    /// Height in tiles.
    pub height: u32,
    pub tilewidth: u32,
    pub tileheight: u32,
    #[serde(default)]
    pub layers: Vec<LayerData>,
    #[serde(default)]
    pub tilesets: Vec<TilesetData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LayerData {
    #[serde(rename = "tilelayer")]
    Tiles(TileLayerData),
    #[serde(rename = "objectgroup")]
    Objects(ObjectLayerData),
    #[serde(other)]
    Other,
}

fn visible_default() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayerData {
    #[serde(default)]
    pub name: String,
    #[serde(default = "visible_default")]
    pub visible: bool,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub data: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectLayerData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub objects: Vec<ObjectData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectData {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
    /// Object class (`type` before Tiled 1.9, `class` after).
    #[serde(default, rename = "type", alias = "class")]
    pub class: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    /// Set on tile objects, whose `y` is the bottom edge.
    #[serde(default)]
    pub gid: Option<u32>,
    #[serde(default)]
    pub properties: Vec<PropertyData>,
}

impl ObjectData {
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.value)
    }

    pub fn property_i32(&self, name: &str) -> Option<i32> {
        match self.property(name)? {
            Value::Number(n) => n.as_i64().map(|v| v as i32),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn property_bool(&self, name: &str) -> Option<bool> {
        match self.property(name)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn property_str(&self, name: &str) -> Option<&str> {
        self.property(name)?.as_str()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyData {
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilesetData {
    pub firstgid: u32,
    /// External tileset file, relative to the map.
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub columns: u32,
    #[serde(default)]
    pub tilecount: u32,
    #[serde(default)]
    pub tilewidth: u32,
    #[serde(default)]
    pub tileheight: u32,
    #[serde(default)]
    pub spacing: u32,
    #[serde(default)]
    pub margin: u32,
    #[serde(default)]
    pub tiles: Vec<TileData>,
}

/// Tileset contents of an external `.tsj` file (no `firstgid`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalTilesetData {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub columns: u32,
    #[serde(default)]
    pub tilecount: u32,
    #[serde(default)]
    pub tilewidth: u32,
    #[serde(default)]
    pub tileheight: u32,
    #[serde(default)]
    pub spacing: u32,
    #[serde(default)]
    pub margin: u32,
    #[serde(default)]
    pub tiles: Vec<TileData>,
}

impl TilesetData {
    /// Fill this reference with the contents of its external file.
    pub fn resolve(&mut self, external: ExternalTilesetData) {
        self.source = None;
        self.image = external.image;
        self.columns = external.columns;
        self.tilecount = external.tilecount;
        self.tilewidth = external.tilewidth;
        self.tileheight = external.tileheight;
        self.spacing = external.spacing;
        self.margin = external.margin;
        self.tiles = external.tiles;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileData {
    /// Tileset-local id.
    pub id: u32,
    #[serde(default)]
    pub animation: Vec<FrameData>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameData {
    pub tileid: u32,
    /// Milliseconds.
    pub duration: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_layers_by_type() {
        let json = r#"{
            "width": 2, "height": 1, "tilewidth": 32, "tileheight": 32,
            "layers": [
                {"type": "tilelayer", "name": "Ground", "width": 2, "height": 1,
                 "data": [1, 2147483650]},
                {"type": "objectgroup", "name": "Portals", "objects": [
                    {"id": 3, "name": "house", "type": "Door", "x": 32, "y": 0,
                     "width": 32, "height": 32,
                     "properties": [{"name": "pid", "type": "int", "value": 1},
                                    {"name": "is_locked", "type": "bool", "value": true}]}
                ]},
                {"type": "imagelayer", "name": "Sky"}
            ],
            "tilesets": [{"firstgid": 1, "image": "tiles.png", "columns": 4, "tilecount": 16,
                          "tilewidth": 32, "tileheight": 32,
                          "tiles": [{"id": 0, "animation": [{"tileid": 0, "duration": 500}]}]}]
        }"#;
        let map: MapData = serde_json::from_str(json).unwrap();
        assert_eq!(map.layers.len(), 3);
        let LayerData::Tiles(ground) = &map.layers[0] else {
            panic!("expected tile layer");
        };
        assert_eq!(strip_flags(ground.data[1]), 2);
        let LayerData::Objects(portals) = &map.layers[1] else {
            panic!("expected object layer");
        };
        let door = &portals.objects[0];
        assert_eq!(door.class, "Door");
        assert_eq!(door.property_i32("pid"), Some(1));
        assert_eq!(door.property_bool("is_locked"), Some(true));
        assert_eq!(map.layers[2], LayerData::Other);
        assert_eq!(map.tilesets[0].tiles[0].animation[0].duration, 500);
    }
}
