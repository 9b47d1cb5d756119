//! Items a character can carry or equip.
//!
//! Items are a closed set of variants. Equippable ones name the [`Slot`] they
//! occupy and, optionally, the sprite sheet layered over the body when worn.
//! For saving, an item is projected to a flat [`ItemRecord`] (kind tag plus
//! string fields), which both JSON and bincode can carry.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ItemError;

/// Equipment slot. Each slot holds at most one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Slot {
    Wand,
    Cloak,
}

impl Slot {
    pub fn as_str(self) -> &'static str {
        match self {
            Slot::Wand => "Wand",
            Slot::Cloak => "Cloak",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Slot {
    type Err = ItemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Wand" => Ok(Slot::Wand),
            "Cloak" => Ok(Slot::Cloak),
            other => Err(ItemError::UnknownKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Wand {
        wood: String,
        core: String,
        length: u32,
    },
    Cloak {
        species: String,
        style: String,
        color: Option<String>,
    },
    Stick,
    MagicStick {
        kind: String,
    },
}

impl Item {
    pub fn wand(wood: impl Into<String>, core: impl Into<String>, length: u32) -> Self {
        Item::Wand {
            wood: wood.into(),
            core: core.into(),
            length,
        }
    }

    pub fn cloak(species: impl Into<String>, style: impl Into<String>) -> Self {
        Item::Cloak {
            species: species.into(),
            style: style.into(),
            color: None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Item::Wand { .. } => "Wand",
            Item::Cloak { .. } => "Cloak",
            Item::Stick => "Stick",
            Item::MagicStick { .. } => "MagicStick",
        }
    }

    /// Slot the item is worn in, `None` if it cannot be equipped.
    pub fn slot(&self) -> Option<Slot> {
        match self {
            Item::Wand { .. } => Some(Slot::Wand),
            Item::Cloak { .. } => Some(Slot::Cloak),
            Item::Stick | Item::MagicStick { .. } => None,
        }
    }

    /// Sprite-sheet id drawn over the wearer, relative to the sprite root.
    pub fn sprite_layer(&self) -> Option<String> {
        match self {
            Item::Cloak { species, style, .. } => Some(format!("{species}/cloak/{style}")),
            _ => None,
        }
    }

    pub fn to_record(&self) -> ItemRecord {
        let mut fields = BTreeMap::new();
        match self {
            Item::Wand { wood, core, length } => {
                fields.insert("wood".to_string(), wood.clone());
                fields.insert("core".to_string(), core.clone());
                fields.insert("length".to_string(), length.to_string());
            }
            Item::Cloak {
                species,
                style,
                color,
            } => {
                fields.insert("species".to_string(), species.clone());
                fields.insert("style".to_string(), style.clone());
                if let Some(color) = color {
                    fields.insert("color".to_string(), color.clone());
                }
            }
            Item::Stick => {}
            Item::MagicStick { kind } => {
                fields.insert("kind".to_string(), kind.clone());
            }
        }
        ItemRecord {
            kind: self.kind().to_string(),
            fields,
        }
    }

    pub fn from_record(record: &ItemRecord) -> Result<Self, ItemError> {
        match record.kind.as_str() {
            "Wand" => {
                let raw = record.field("length")?;
                let length = raw.parse().map_err(|_| ItemError::InvalidField {
                    kind: record.kind.clone(),
                    field: "length".to_string(),
                })?;
                Ok(Item::Wand {
                    wood: record.field("wood")?.to_string(),
                    core: record.field("core")?.to_string(),
                    length,
                })
            }
            "Cloak" => Ok(Item::Cloak {
                species: record.field("species")?.to_string(),
                style: record.field("style")?.to_string(),
                color: record.fields.get("color").cloned(),
            }),
            "Stick" => Ok(Item::Stick),
            "MagicStick" => Ok(Item::MagicStick {
                kind: record.field("kind")?.to_string(),
            }),
            other => Err(ItemError::UnknownKind(other.to_string())),
        }
    }

    /// Short description used in message boxes.
    pub fn describe(&self) -> String {
        match self {
            Item::Wand { wood, core, length } => {
                format!("a {length}\" {wood} wand with a {core} core")
            }
            Item::Cloak { style, .. } => format!("a {}", style.replace('_', " ")),
            Item::Stick => "a stick".to_string(),
            Item::MagicStick { kind } => format!("a {kind} magic stick"),
        }
    }
}

/// Saved form of an [`Item`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    #[serde(alias = "type")]
    pub kind: String,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl ItemRecord {
    fn field(&self, name: &str) -> Result<&str, ItemError> {
        self.fields
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| ItemError::MissingField {
                kind: self.kind.clone(),
                field: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equippable_items_name_their_slot() {
        assert_eq!(Item::wand("Oak", "Unicorn Hair", 9).slot(), Some(Slot::Wand));
        assert_eq!(Item::cloak("human", "school_cloak").slot(), Some(Slot::Cloak));
        assert_eq!(Item::Stick.slot(), None);
    }

    #[test]
    fn cloak_layer_path() {
        assert_eq!(
            Item::cloak("human", "school_cloak").sprite_layer().as_deref(),
            Some("human/cloak/school_cloak")
        );
        assert!(Item::wand("Oak", "Unicorn Hair", 9).sprite_layer().is_none());
    }

    #[test]
    fn record_restores_variant() {
        let wand = Item::wand("Larch", "Dragon Heartstring", 13);
        assert_eq!(Item::from_record(&wand.to_record()).unwrap(), wand);
    }

    #[test]
    fn unknown_kind_is_reported() {
        let record = ItemRecord {
            kind: "Broom".to_string(),
            fields: BTreeMap::new(),
        };
        assert_eq!(
            Item::from_record(&record),
            Err(ItemError::UnknownKind("Broom".to_string()))
        );
    }

    #[test]
    fn bad_wand_length_is_invalid() {
        let mut record = Item::wand("Pine", "Phoenix Feather", 11).to_record();
        record.fields.insert("length".to_string(), "long".to_string());
        assert!(matches!(
            Item::from_record(&record),
            Err(ItemError::InvalidField { .. })
        ));
    }

    #[test]
    fn record_accepts_type_alias_in_json() {
        let json = r#"{"type":"Cloak","fields":{"species":"human","style":"school_cloak"}}"#;
        let record: ItemRecord = serde_json::from_str(json).unwrap();
        assert_eq!(
            Item::from_record(&record).unwrap(),
            Item::cloak("human", "school_cloak")
        );
    }
}
