//! The gameplay world.
//!
//! [`GameplayWorld`] owns a bevy [`World`] holding the open [`TiledMap`],
//! the player, the NPCs of the map and the shared resources (stores, clock,
//! camera, fade). A fixed [`Schedule`] advances it one tick at a time:
//!
//! 1. character movement
//! 2. appearance animation
//! 3. map animation (tiles, magic trees, doors)
//! 4. screen fade
//! 5. camera follow
//!
//! It is also the [`Director`] for [`WorldCommand`]s, so cinematics move
//! characters, open doors and switch maps through the same API the input
//! handlers use.

use std::path::{Path, PathBuf};

use bevy_ecs::prelude::*;
use log::{debug, error, info, warn};

use crate::backend::Canvas;
use crate::cinematic::Director;
use crate::cinematic::command::{Actor, WorldCommand};
use crate::components::appearance::Appearance;
use crate::components::character::{Character, Facing, Motion, pose_name};
use crate::components::hitbox::{Hitbox, Rect};
use crate::components::inventory::{Inventory, InventoryRecord};
use crate::components::item::Slot;
use crate::components::mapposition::MapPosition;
use crate::components::npc::{Npc, Player};
use crate::error::AssetError;
use crate::resources::camera2d::Camera;
use crate::resources::debugmode::DebugMode;
use crate::resources::fader::ScreenFade;
use crate::resources::gameconfig::GameConfig;
use crate::resources::npcdata::NpcDirectory;
use crate::resources::savegame::{PlayerData, SavedGame, unique_save_path};
use crate::resources::spritesheetstore::SpriteSheetStore;
use crate::resources::tilemap::portal::{Door, Portal};
use crate::resources::tilemap::{MapObjectRef, TiledMap};
use crate::resources::tilemapstore::TilemapStore;
use crate::resources::worldtime::WorldTime;
use crate::systems::animation::{appearance_animation, fade_update, map_animation};
use crate::systems::camera::camera_follow;
use crate::systems::movement::character_movement;
use crate::systems::render::{BACKGROUND, draw_appearance, draw_character_debug};
use crate::systems::time::sync_world_time;

pub const NPC_DATA_FILE: &str = "npc_data.json";
/// Map a new game starts on.
pub const START_MAP: &str = "test";

/// Something a character bumped into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collider {
    Map(MapObjectRef),
    Npc(Entity),
}

type CharacterBundle = (MapPosition, Hitbox, Character, Appearance);

pub struct GameplayWorld {
    pub world: World,
    schedule: Schedule,
    player: Option<Entity>,
    npcs: Vec<Entity>,
    file_path: Option<PathBuf>,
    traversal_error: Option<String>,
}

impl GameplayWorld {
    /// World backed by the asset directories of `config`.
    pub fn new(config: &GameConfig) -> Result<Self, AssetError> {
        let sprites = SpriteSheetStore::new(config.sprites_dir());
        let maps = TilemapStore::new(config.maps_dir());
        let npcs = NpcDirectory::load_from_file(&config.data_dir().join(NPC_DATA_FILE))?;
        Ok(Self::with_stores(config.clone(), sprites, maps, npcs))
    }

    pub fn with_stores(
        config: GameConfig,
        sprites: SpriteSheetStore,
        maps: TilemapStore,
        npcs: NpcDirectory,
    ) -> Self {
        let mut world = World::new();
        world.insert_resource(WorldTime::fixed(config.target_fps));
        world.insert_resource(Camera::new((
            config.window_width as i32,
            config.window_height as i32,
        )));
        world.insert_resource(ScreenFade::default());
        if config.debug {
            world.insert_resource(DebugMode);
        }
        world.insert_resource(config);
        world.insert_resource(sprites);
        world.insert_resource(maps);
        world.insert_resource(npcs);

        let mut schedule = Schedule::default();
        schedule.add_systems(
            (
                character_movement,
                appearance_animation,
                map_animation,
                fade_update,
                camera_follow,
            )
                .chain(),
        );

        Self {
            world,
            schedule,
            player: None,
            npcs: Vec::new(),
            file_path: None,
            traversal_error: None,
        }
    }

    pub fn tile_size(&self) -> i32 {
        self.world.resource::<GameConfig>().tile_size
    }

    fn walk_speed(&self) -> i32 {
        self.world.resource::<GameConfig>().walk_speed
    }

    pub fn player(&self) -> Option<Entity> {
        self.player
    }

    pub fn npcs(&self) -> &[Entity] {
        &self.npcs
    }

    pub fn map(&self) -> Option<&TiledMap> {
        self.world.get_resource::<TiledMap>()
    }

    pub fn map_mut(&mut self) -> Option<Mut<'_, TiledMap>> {
        self.world.get_resource_mut::<TiledMap>()
    }

    pub fn map_name(&self) -> Option<&str> {
        self.map().map(|m| m.name.as_str())
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn set_file_path(&mut self, path: PathBuf) {
        self.file_path = Some(path);
    }

    pub fn resize(&mut self, width: i32, height: i32) {
        self.world.resource_mut::<Camera>().resize(width, height);
    }

    pub fn is_debug(&self) -> bool {
        self.world.contains_resource::<DebugMode>()
    }

    pub fn toggle_debug(&mut self) {
        if self.world.remove_resource::<DebugMode>().is_none() {
            self.world.insert_resource(DebugMode);
        }
    }

    // --------------- Characters ---------------

    fn character_bundle(
        &mut self,
        layers: Vec<String>,
        at: MapPosition,
        facing: Facing,
    ) -> Result<CharacterBundle, AssetError> {
        let clips = self
            .world
            .resource_mut::<SpriteSheetStore>()
            .clip_set(&layers)?;
        let base = layers.first().cloned().unwrap_or_default();
        let appearance = Appearance::new(layers, &clips, &pose_name(Motion::Idle, facing))
            .ok_or(AssetError::EmptyAnimation { animation: base })?;
        let tile = self.tile_size();
        let (frame, hit) = appearance
            .animation()
            .map(|a| ((a.clip().frame_w, a.clip().frame_h), a.clip().hit_box))
            .unwrap_or(((tile, tile), (tile, tile)));
        let offset = (frame.0 - hit.0, frame.1 - hit.1);
        let origin = MapPosition::new(at.x - offset.0, at.y - offset.1);
        let hitbox = Hitbox::new(origin, hit.0, hit.1, offset);
        let character = Character::new(self.walk_speed(), &hitbox).with_facing(facing);
        Ok((origin, hitbox, character, appearance))
    }

    /// Spawn (or respawn) the player with its hitbox at `data.position`.
    ///
    /// The current player is kept if the sprite layers fail to load.
    pub fn spawn_player(&mut self, data: &PlayerData) -> Result<Entity, AssetError> {
        let inventory = Inventory::load(&data.inventory);
        let mut layers = vec![data.sprite.clone()];
        layers.extend(inventory.sprite_layers());
        let bundle = self.character_bundle(layers, data.position, data.facing)?;
        if let Some(old) = self.player.take() {
            self.world.despawn(old);
        }
        let player = Player {
            name: data.name.clone(),
            species: data.species.clone(),
            sprite: data.sprite.clone(),
        };
        let entity = self.world.spawn((player, inventory, bundle)).id();
        info!("Player '{}' spawned at {:?}", data.name, data.position);
        self.player = Some(entity);
        Ok(entity)
    }

    fn spawn_npcs(&mut self, map: &str) {
        let records: Vec<_> = self
            .world
            .resource::<NpcDirectory>()
            .on_map(map)
            .map(|(id, record)| (id.to_string(), record.clone()))
            .collect();
        for (id, record) in records {
            let inventory = Inventory::load(&record.inventory);
            let mut layers = vec![record.sprite.clone()];
            layers.extend(inventory.sprite_layers());
            match self.character_bundle(layers, record.location.position, Facing::Down) {
                Ok(bundle) => {
                    let npc = Npc {
                        id: id.clone(),
                        race: record.race.clone(),
                    };
                    let entity = self.world.spawn((npc, inventory, bundle)).id();
                    self.npcs.push(entity);
                    debug!("NPC '{}' spawned on '{}'", id, map);
                }
                Err(err) => warn!("Skipping NPC '{}': {}", id, err),
            }
        }
    }

    fn despawn_npcs(&mut self) {
        for npc in self.npcs.drain(..) {
            self.world.despawn(npc);
        }
    }

    /// Entity driven by `actor`.
    pub fn actor(&self, actor: &Actor) -> Option<Entity> {
        match actor {
            Actor::Player => self.player,
            Actor::Npc(id) => self
                .npcs
                .iter()
                .copied()
                .find(|e| self.world.get::<Npc>(*e).is_some_and(|npc| &npc.id == id)),
        }
    }

    pub fn hitbox(&self, entity: Entity) -> Option<Rect> {
        self.world.get::<Hitbox>(entity).map(|h| h.rect)
    }

    pub fn character(&self, entity: Entity) -> Option<Character> {
        self.world.get::<Character>(entity).copied()
    }

    pub fn appearance(&self, entity: Entity) -> Option<&Appearance> {
        self.world.get::<Appearance>(entity)
    }

    pub fn inventory(&self, entity: Entity) -> Option<&Inventory> {
        self.world.get::<Inventory>(entity)
    }

    pub fn is_idle(&self, entity: Entity) -> bool {
        match (self.world.get::<Character>(entity), self.world.get::<Hitbox>(entity)) {
            (Some(character), Some(hitbox)) => character.is_idle(hitbox),
            _ => true,
        }
    }

    pub fn player_idle(&self) -> bool {
        self.player.is_some_and(|p| self.is_idle(p))
    }

    /// Put the hitbox's top-left at `(x, y)` and cancel any move.
    pub fn place(&mut self, entity: Entity, x: i32, y: i32) {
        let Some(mut hitbox) = self.world.get::<Hitbox>(entity).copied() else {
            return;
        };
        hitbox.rect.x = x;
        hitbox.rect.y = y;
        let origin = hitbox.origin_for(x, y);
        if let Some(mut character) = self.world.get_mut::<Character>(entity) {
            character.halt(&hitbox);
        }
        if let Some(mut position) = self.world.get_mut::<MapPosition>(entity) {
            *position = origin;
        }
        if let Some(mut h) = self.world.get_mut::<Hitbox>(entity) {
            *h = hitbox;
        }
    }

    /// Everything `mover` can bump into: map obstacles, portals and the
    /// other characters.
    fn colliders_for(&self, mover: Entity) -> Vec<(Collider, Rect)> {
        let mut colliders: Vec<(Collider, Rect)> = self
            .map()
            .map(|m| m.colliders().map(|(k, r)| (Collider::Map(k), r)).collect())
            .unwrap_or_default();
        for &npc in &self.npcs {
            if npc == mover {
                continue;
            }
            if let Some(rect) = self.hitbox(npc) {
                colliders.push((Collider::Npc(npc), rect));
            }
        }
        colliders
    }

    /// Walk one tile toward `facing` if idle. Shows the walk pose even when
    /// blocked; returns what blocked the step.
    pub fn walk(&mut self, entity: Entity, facing: Facing) -> Option<Collider> {
        let hitbox = self.world.get::<Hitbox>(entity).copied()?;
        let mut character = self.character(entity)?;
        if !character.is_idle(&hitbox) {
            return None;
        }
        let (dx, dy) = facing.delta(self.tile_size());
        let colliders = self.colliders_for(entity);
        let hit = character.change_destination(&hitbox, dx, dy, colliders);
        if let Some(mut c) = self.world.get_mut::<Character>(entity) {
            *c = character;
        }
        if let Some(mut appearance) = self.world.get_mut::<Appearance>(entity) {
            appearance.set_pose(Motion::Walk, facing);
        }
        hit
    }

    /// Show the idle pose for the current facing.
    pub fn rest(&mut self, entity: Entity) {
        let Some(facing) = self.character(entity).map(|c| c.facing) else {
            return;
        };
        if let Some(mut appearance) = self.world.get_mut::<Appearance>(entity) {
            appearance.set_pose(Motion::Idle, facing);
        }
    }

    /// Scripted move onto `rect`, ignoring obstacles.
    fn walk_onto(&mut self, entity: Entity, x: i32, y: i32) {
        let Some(hitbox) = self.world.get::<Hitbox>(entity).copied() else {
            return;
        };
        let Some(mut character) = self.world.get_mut::<Character>(entity) else {
            return;
        };
        character.force_destination(Rect::new(x, y, hitbox.rect.w, hitbox.rect.h));
        let facing = character.facing;
        let moving = !character.is_idle(&hitbox);
        if moving && let Some(mut appearance) = self.world.get_mut::<Appearance>(entity) {
            appearance.set_pose(Motion::Walk, facing);
        }
    }

    fn walk_forward(&mut self, entity: Entity) {
        let Some(character) = self.character(entity) else {
            return;
        };
        let (dx, dy) = character.facing.delta(self.tile_size());
        let target = character.destination().offset(dx, dy);
        self.walk_onto(entity, target.x, target.y);
    }

    // --------------- Interaction ---------------

    /// What sits on the tile in front of the player.
    pub fn interact_target(&self) -> Option<Collider> {
        let player = self.player?;
        let tile = self.character(player)?.interact_tile(self.tile_size());
        if let Some(key) = self.map().and_then(|m| m.object_at(tile)) {
            return Some(Collider::Map(key));
        }
        self.npcs
            .iter()
            .copied()
            .find(|npc| self.hitbox(*npc).is_some_and(|r| r.overlaps(&tile)))
            .map(Collider::Npc)
    }

    pub fn interact(&mut self, target: Collider) -> Vec<String> {
        match target {
            Collider::Map(key) => self
                .world
                .get_resource_mut::<TiledMap>()
                .and_then(|mut map| map.object_mut(key).map(|object| object.interact()))
                .unwrap_or_default(),
            Collider::Npc(entity) => self
                .world
                .get::<Npc>(entity)
                .map(Npc::greeting)
                .unwrap_or_default(),
        }
    }

    pub fn portal(&self, target: Collider) -> Option<&Portal> {
        match target {
            Collider::Map(key) => self.map()?.portal(key),
            Collider::Npc(_) => None,
        }
    }

    // --------------- Equipment ---------------

    fn refresh_appearance(&mut self, entity: Entity) -> Result<(), AssetError> {
        let Some(base) = self.world.get::<Player>(entity).map(|p| p.sprite.clone()) else {
            return Ok(());
        };
        let mut layers = vec![base];
        if let Some(inventory) = self.inventory(entity) {
            layers.extend(inventory.sprite_layers());
        }
        let clips = self
            .world
            .resource_mut::<SpriteSheetStore>()
            .clip_set(&layers)?;
        if let Some(mut appearance) = self.world.get_mut::<Appearance>(entity) {
            appearance.swap(layers, &clips);
        }
        Ok(())
    }

    /// Wear the last equippable bag item. Only while idle.
    pub fn equip_last_from_bag(&mut self) -> Result<Option<Slot>, AssetError> {
        let Some(player) = self.player.filter(|p| self.is_idle(*p)) else {
            return Ok(None);
        };
        let slot = self
            .world
            .get_mut::<Inventory>(player)
            .and_then(|mut inventory| inventory.equip_last_from_bag());
        if slot.is_some() {
            self.refresh_appearance(player)?;
        }
        Ok(slot)
    }

    /// Move the item in `slot` to the bag. Only while idle.
    pub fn unequip(&mut self, slot: Slot) -> Result<bool, AssetError> {
        let Some(player) = self.player.filter(|p| self.is_idle(*p)) else {
            return Ok(false);
        };
        let removed = self
            .world
            .get_mut::<Inventory>(player)
            .is_some_and(|mut inventory| inventory.unequip(slot));
        if removed {
            self.refresh_appearance(player)?;
        }
        Ok(removed)
    }

    // --------------- Maps ---------------

    fn install_map(&mut self, map: TiledMap) {
        self.despawn_npcs();
        let name = map.name.clone();
        self.world
            .resource_mut::<Camera>()
            .open_map(map.width, map.height);
        self.world.insert_resource(map);
        self.spawn_npcs(&name);
        info!("Map '{}' opened", name);
    }

    /// Open `name` without moving the player.
    pub fn open_map(&mut self, name: &str) -> Result<(), AssetError> {
        let map = self.world.resource_mut::<TilemapStore>().open(name)?;
        self.install_map(map);
        Ok(())
    }

    /// Copy of portal `pid` on map `name`, loading the map data if needed.
    pub fn peek_portal(&mut self, name: &str, pid: i32) -> Result<Option<Portal>, AssetError> {
        let map = self.world.resource_mut::<TilemapStore>().open(name)?;
        Ok(map.portal_by_pid(pid).cloned())
    }

    /// Open `name` and put the player on portal `spawn_pid`. Returns false,
    /// leaving the current map open, when that portal does not exist.
    pub fn change_map(&mut self, name: &str, spawn_pid: i32) -> Result<bool, AssetError> {
        let map = self.world.resource_mut::<TilemapStore>().open(name)?;
        let Some(spawn) = map.portal_by_pid(spawn_pid).map(|p| p.rect) else {
            warn!("Map '{}' has no portal with pid {}", name, spawn_pid);
            return Ok(false);
        };
        self.install_map(map);
        if let Some(player) = self.player {
            self.place(player, spawn.x, spawn.y);
        }
        Ok(true)
    }

    fn clear_fade(&mut self) {
        self.world.resource_mut::<ScreenFade>().clear();
    }

    /// Error left by a failed map change during a cinematic.
    pub fn take_traversal_error(&mut self) -> Option<String> {
        self.traversal_error.take()
    }

    /// After a failed map change, put `entity` back at `before` and lift the
    /// fade. Returns the message to show, if the change did fail.
    pub fn recover_traversal(&mut self, entity: Entity, before: Option<Rect>) -> Option<String> {
        let message = self.take_traversal_error()?;
        if let Some(rect) = before {
            self.place(entity, rect.x, rect.y);
        }
        self.clear_fade();
        Some(message)
    }

    // --------------- Saving ---------------

    pub fn player_data(&self) -> Option<PlayerData> {
        let entity = self.player?;
        let player = self.world.get::<Player>(entity)?;
        let character = self.character(entity)?;
        let destination = character.destination();
        Some(PlayerData {
            name: player.name.clone(),
            species: player.species.clone(),
            sprite: player.sprite.clone(),
            position: MapPosition::new(destination.x, destination.y),
            facing: character.facing,
            inventory: self
                .inventory(entity)
                .map(Inventory::save)
                .unwrap_or_else(InventoryRecord::default),
        })
    }

    pub fn saved_game(&self) -> Option<SavedGame> {
        Some(SavedGame {
            player_data: self.player_data()?,
            map: self.map_name()?.to_string(),
            file_path: self.file_path.clone()?,
        })
    }

    /// Write the current game to its save file.
    pub fn save(&self) -> bool {
        match self.saved_game() {
            Some(saved) => saved.save(),
            None => {
                warn!("Nothing to save: no player, map or save path");
                false
            }
        }
    }

    /// Restore a save. On error the world is left as it was.
    pub fn load_saved(&mut self, saved: &SavedGame) -> Result<(), AssetError> {
        let map = self.world.resource_mut::<TilemapStore>().open(&saved.map)?;
        self.spawn_player(&saved.player_data)?;
        self.install_map(map);
        self.file_path = Some(saved.file_path.clone());
        Ok(())
    }

    /// Start a fresh game on [`START_MAP`] and write its first save.
    pub fn new_game(&mut self, data: &PlayerData, saves_dir: &Path) -> Result<(), AssetError> {
        self.spawn_player(data)?;
        self.open_map(START_MAP)?;
        self.file_path = Some(unique_save_path(saves_dir, &data.name));
        self.save();
        Ok(())
    }

    // --------------- Tick ---------------

    pub fn update(&mut self, time: &WorldTime) {
        sync_world_time(&mut self.world, time);
        self.schedule.run(&mut self.world);
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.clear(BACKGROUND);
        let camera = self
            .world
            .get_resource::<Camera>()
            .copied()
            .unwrap_or_default();
        if let Some(map) = self.map() {
            map.draw(canvas, &camera);
        }

        let mut characters: Vec<Entity> = self.npcs.iter().copied().chain(self.player).collect();
        characters.sort_by_key(|e| self.hitbox(*e).map(|r| r.y).unwrap_or(0));
        for &entity in &characters {
            if let (Some(position), Some(appearance)) = (
                self.world.get::<MapPosition>(entity),
                self.world.get::<Appearance>(entity),
            ) {
                draw_appearance(canvas, &camera, position, appearance);
            }
        }
        if self.is_debug() {
            let tile = self.tile_size();
            for &entity in &characters {
                if let (Some(hitbox), Some(character)) = (
                    self.world.get::<Hitbox>(entity),
                    self.world.get::<Character>(entity),
                ) {
                    draw_character_debug(canvas, &camera, hitbox, character, tile);
                }
            }
        }
        if let Some(fade) = self.world.get_resource::<ScreenFade>() {
            fade.draw(canvas);
        }
    }

    /// Run `f` on door `pid`; true when there is no such door.
    fn with_door(&mut self, pid: i32, f: impl FnOnce(&mut Door) -> bool) -> bool {
        self.map_mut()
            .and_then(|mut map| map.portal_by_pid_mut(pid).and_then(|p| p.door_mut()).map(f))
            .unwrap_or(true)
    }
}

impl Director for GameplayWorld {
    type Command = WorldCommand;

    fn execute(&mut self, command: &WorldCommand) -> bool {
        debug!("Executing {:?}", command);
        // After a failed map change only fades still run, so the screen
        // comes back without moving anything on the old map.
        let aborted = self.traversal_error.is_some();
        match command {
            WorldCommand::WalkOnto { actor, x, y } => {
                if let Some(e) = self.actor(actor).filter(|_| !aborted) {
                    self.walk_onto(e, *x, *y);
                }
                true
            }
            WorldCommand::WalkForward { actor } => {
                if let Some(e) = self.actor(actor).filter(|_| !aborted) {
                    self.walk_forward(e);
                }
                true
            }
            WorldCommand::HasArrived { actor } => {
                self.actor(actor).is_none_or(|e| self.is_idle(e))
            }
            WorldCommand::OpenDoor { pid } => aborted || self.with_door(*pid, |door| door.open()),
            WorldCommand::CloseDoor { pid } => {
                aborted || self.with_door(*pid, |door| {
                    door.close();
                    true
                })
            }
            WorldCommand::DoorSettled { pid } => {
                aborted || self.with_door(*pid, |door| door.is_settled())
            }
            WorldCommand::ChangeMap { map, spawn_pid } => {
                if aborted {
                    return true;
                }
                match self.change_map(map, *spawn_pid) {
                    Ok(true) => {}
                    Ok(false) => {
                        self.traversal_error =
                            Some(format!("The way to '{map}' seems to lead nowhere..."));
                    }
                    Err(err) => {
                        error!("Map change to '{}' failed: {}", map, err);
                        self.traversal_error = Some(format!("'{map}' could not be opened."));
                    }
                }
                true
            }
            WorldCommand::StartFade { kind, seconds } => {
                self.world.resource_mut::<ScreenFade>().start(*kind, *seconds);
                true
            }
            WorldCommand::FadeDone => self.world.resource::<ScreenFade>().is_done(),
            WorldCommand::ClearFade => {
                self.world.resource_mut::<ScreenFade>().clear();
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::item::Item;
    use crate::resources::spritesheetstore::{AnimationData, SheetData, SheetDescriptor};
    use std::collections::BTreeMap;

    const MAP: &str = r#"{
        "width": 5, "height": 5, "tilewidth": 32, "tileheight": 32,
        "layers": [
            {"type": "tilelayer", "name": "Ground", "width": 5, "height": 5,
             "data": [1,1,1,1,1, 1,1,1,1,1, 1,1,1,1,1, 1,1,1,1,1, 1,1,1,1,1]},
            {"type": "objectgroup", "name": "Obstacles", "objects": [
                {"id": 1, "name": "wall", "x": 64, "y": 0, "width": 32, "height": 32}
            ]},
            {"type": "objectgroup", "name": "Portals", "objects": []}
        ],
        "tilesets": [{"firstgid": 1, "image": "t.png", "columns": 1, "tilecount": 1,
                      "tilewidth": 32, "tileheight": 32}]
    }"#;

    fn sheet() -> SheetDescriptor {
        let mut animations = BTreeMap::new();
        for motion in ["idle", "walk"] {
            for facing in ["up", "down", "left", "right"] {
                animations.insert(
                    format!("{motion}_{facing}"),
                    AnimationData {
                        row: 0,
                        seq: vec![0, 1],
                        frame_duration: 4,
                    },
                );
            }
        }
        SheetDescriptor {
            sheet_data: SheetData {
                tile_w: 32,
                tile_h: 32,
                hit_box_w: 32,
                hit_box_h: 32,
            },
            animations,
        }
    }

    fn world() -> GameplayWorld {
        let mut sprites = SpriteSheetStore::new("sprites");
        sprites.insert("human/base", sheet());
        sprites.insert("human/cloak/school_cloak", sheet());
        let mut maps = TilemapStore::new("maps");
        maps.insert_json("test", MAP).unwrap();
        let mut npcs = NpcDirectory::default();
        npcs.insert(
            "maren",
            serde_json::from_str(
                r#"{"race": "human", "sprite": "human/base",
                    "location": {"map": "test", "position": {"x": 0, "y": 64}}}"#,
            )
            .unwrap(),
        );
        let mut gw = GameplayWorld::with_stores(GameConfig::new(), sprites, maps, npcs);
        let mut inventory = Inventory::new();
        inventory.add_item(Item::cloak("human", "school_cloak"));
        gw.spawn_player(&PlayerData {
            name: "Ada".to_string(),
            species: "human".to_string(),
            sprite: "human/base".to_string(),
            position: MapPosition::new(0, 0),
            facing: Facing::Right,
            inventory: inventory.save(),
        })
        .unwrap();
        gw.open_map("test").unwrap();
        gw
    }

    #[test]
    fn npcs_on_the_map_are_spawned_and_block() {
        let mut gw = world();
        assert_eq!(gw.npcs().len(), 1);
        let player = gw.player().unwrap();
        gw.place(player, 0, 32);
        let hit = gw.walk(player, Facing::Down);
        assert_eq!(hit, Some(Collider::Npc(gw.npcs()[0])));
        assert!(gw.player_idle());
    }

    #[test]
    fn interact_reads_the_wall_in_front() {
        let mut gw = world();
        let player = gw.player().unwrap();
        gw.place(player, 32, 0);
        let target = gw.interact_target().unwrap();
        assert!(matches!(target, Collider::Map(MapObjectRef::Obstacle(0))));
        assert_eq!(gw.interact(target), vec!["It's just a wall...".to_string()]);
    }

    #[test]
    fn equip_and_unequip_rebuild_layers_and_keep_pose() {
        let mut gw = world();
        let player = gw.player().unwrap();
        assert_eq!(gw.equip_last_from_bag().unwrap(), Some(Slot::Cloak));
        let appearance = gw.appearance(player).unwrap();
        assert_eq!(appearance.layers().len(), 2);
        assert_eq!(appearance.current(), "idle_right");
        assert!(gw.unequip(Slot::Cloak).unwrap());
        assert_eq!(gw.appearance(player).unwrap().layers().len(), 1);
        assert_eq!(gw.inventory(player).unwrap().bag().len(), 1);
    }

    #[test]
    fn change_map_to_unknown_pid_keeps_current_map() {
        let mut gw = world();
        assert!(!gw.change_map("test", 99).unwrap());
        assert!(gw.execute(&WorldCommand::HasArrived {
            actor: Actor::Npc("nobody".into())
        }));
        assert!(gw.execute(&WorldCommand::ChangeMap {
            map: "test".into(),
            spawn_pid: 99
        }));
        assert!(gw.take_traversal_error().is_some());
        assert_eq!(gw.map_name(), Some("test"));
    }

    #[test]
    fn saved_game_needs_a_path() {
        let mut gw = world();
        assert!(gw.saved_game().is_none());
        gw.set_file_path(PathBuf::from("Ada.sav"));
        let saved = gw.saved_game().unwrap();
        assert_eq!(saved.map, "test");
        assert_eq!(saved.player_data.facing, Facing::Right);
    }

    #[test]
    fn debug_toggle_draws_outlines() {
        use crate::backend::{DrawCall, RecordingCanvas};
        let mut gw = world();
        let mut canvas = RecordingCanvas::new((320, 240));
        gw.draw(&mut canvas);
        let count = |c: &RecordingCanvas| {
            c.calls
                .iter()
                .filter(|d| matches!(d, DrawCall::StrokeRect { .. }))
                .count()
        };
        assert_eq!(count(&canvas), 0);
        gw.toggle_debug();
        gw.draw(&mut canvas);
        assert_eq!(count(&canvas), 6);
    }
}
