use std::collections::BTreeMap;

use bevy_ecs::prelude::Component;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::components::item::{Item, ItemRecord, Slot};

/// Equipped items by slot plus an ordered bag.
///
/// `equipped` only has entries for occupied slots.
#[derive(Component, Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    equipped: BTreeMap<Slot, Item>,
    bag: Vec<Item>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn equipped(&self, slot: Slot) -> Option<&Item> {
        self.equipped.get(&slot)
    }

    pub fn equipped_items(&self) -> impl Iterator<Item = (Slot, &Item)> {
        self.equipped.iter().map(|(slot, item)| (*slot, item))
    }

    pub fn bag(&self) -> &[Item] {
        &self.bag
    }

    /// Wear `item`, moving whatever occupied its slot into the bag.
    /// Items without a slot are left untouched and handed back.
    pub fn equip(&mut self, item: Item) -> Result<(), Item> {
        let Some(slot) = item.slot() else {
            warn!("{} is not equippable", item.kind());
            return Err(item);
        };
        self.unequip(slot);
        self.equipped.insert(slot, item);
        Ok(())
    }

    /// Move the item in `slot` into the bag.
    pub fn unequip(&mut self, slot: Slot) -> bool {
        match self.equipped.remove(&slot) {
            Some(item) => {
                self.bag.push(item);
                true
            }
            None => false,
        }
    }

    pub fn add_item(&mut self, item: Item) {
        self.bag.push(item);
    }

    /// Take the last bag item if it can be equipped and wear it.
    pub fn equip_last_from_bag(&mut self) -> Option<Slot> {
        let index = self.bag.iter().rposition(|item| item.slot().is_some())?;
        let item = self.bag.remove(index);
        let slot = item.slot();
        self.equip(item).ok()?;
        slot
    }

    /// Sprite-sheet layers worn over the base body, in slot order.
    pub fn sprite_layers(&self) -> Vec<String> {
        self.equipped
            .values()
            .filter_map(Item::sprite_layer)
            .collect()
    }

    pub fn save(&self) -> InventoryRecord {
        InventoryRecord {
            equipped: self
                .equipped
                .iter()
                .map(|(slot, item)| (slot.as_str().to_string(), item.to_record()))
                .collect(),
            bag: self.bag.iter().map(Item::to_record).collect(),
        }
    }

    /// Rebuild an inventory. Unknown items are logged and dropped.
    ///
    /// An equipped entry whose key is not a slot name, or whose item belongs
    /// to another slot, goes to the bag instead.
    pub fn load(record: &InventoryRecord) -> Self {
        let mut inventory = Inventory::new();
        for (key, data) in &record.equipped {
            let item = match Item::from_record(data) {
                Ok(item) => item,
                Err(err) => {
                    warn!("Dropping equipped item '{}': {}", key, err);
                    continue;
                }
            };
            let slot = key.parse::<Slot>().ok();
            if slot.is_none() || item.slot() != slot {
                warn!("Equipped slot '{}' held {}, moved to bag", key, item.kind());
                inventory.add_item(item);
                continue;
            }
            if let Err(item) = inventory.equip(item) {
                inventory.add_item(item);
            }
        }
        for data in &record.bag {
            match Item::from_record(data) {
                Ok(item) => inventory.add_item(item),
                Err(err) => warn!("Dropping bag item: {}", err),
            }
        }
        inventory
    }
}

/// Saved form of an [`Inventory`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    #[serde(default)]
    pub equipped: BTreeMap<String, ItemRecord>,
    #[serde(default)]
    pub bag: Vec<ItemRecord>,
}
