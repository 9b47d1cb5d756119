//! Gameplay world integration tests.
//!
//! Builds small inline maps and sprite sheets, then drives the world's
//! schedule tick by tick: walking, collisions, door traversal and saving.

use std::collections::BTreeMap;

use wandcrafter::cinematic::Director;
use wandcrafter::cinematic::command::{Actor, WorldCommand};
use wandcrafter::components::character::Facing;
use wandcrafter::components::hitbox::Rect;
use wandcrafter::components::inventory::Inventory;
use wandcrafter::components::item::{Item, Slot};
use wandcrafter::components::mapposition::MapPosition;
use wandcrafter::game::{Collider, GameplayWorld};
use wandcrafter::resources::gameconfig::GameConfig;
use wandcrafter::resources::npcdata::NpcDirectory;
use wandcrafter::resources::savegame::{PlayerData, SavedGame};
use wandcrafter::resources::spritesheetstore::{
    AnimationData, SheetData, SheetDescriptor, SpriteSheetStore,
};
use wandcrafter::resources::tilemap::MapObjectRef;
use wandcrafter::resources::tilemap::portal::DoorState;
use wandcrafter::resources::tilemapstore::TilemapStore;
use wandcrafter::resources::worldtime::WorldTime;
use wandcrafter::states::gameplay::traversal_sequence;

const EPSILON: f32 = 1e-6;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn sheet() -> SheetDescriptor {
    let mut animations = BTreeMap::new();
    for motion in ["idle", "walk"] {
        for facing in ["up", "down", "left", "right"] {
            animations.insert(
                format!("{motion}_{facing}"),
                AnimationData {
                    row: 0,
                    seq: vec![0, 1, 2, 3],
                    frame_duration: 8,
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

fn sprites() -> SpriteSheetStore {
    let mut sprites = SpriteSheetStore::new("sprites");
    sprites.insert("human/base", sheet());
    sprites.insert("human/cloak/school_cloak", sheet());
    sprites
}

/// `w`x`h` tiles of gid 1; `obstacles` and `portals` are raw Tiled objects.
fn map_json(w: u32, h: u32, obstacles: &str, portals: &str) -> String {
    let data = vec!["1"; (w * h) as usize].join(",");
    format!(
        r#"{{
        "width": {w}, "height": {h}, "tilewidth": 32, "tileheight": 32,
        "layers": [
            {{"type": "tilelayer", "name": "Ground", "width": {w}, "height": {h},
              "data": [{data}]}},
            {{"type": "objectgroup", "name": "Obstacles", "objects": [{obstacles}]}},
            {{"type": "objectgroup", "name": "Portals", "objects": [{portals}]}}
        ],
        "tilesets": [{{"firstgid": 1, "image": "tiles.png", "columns": 4, "tilecount": 4,
                      "tilewidth": 32, "tileheight": 32}}]
    }}"#
    )
}

fn door(id: u32, to_map: &str, x: i32, y: i32, pid: i32, to_pid: i32) -> String {
    format!(
        r#"{{"id": {id}, "name": "{to_map}", "x": {x}, "y": {y}, "width": 32, "height": 32,
            "properties": [{{"name": "type", "type": "string", "value": "Door"}},
                           {{"name": "pid", "type": "int", "value": {pid}}},
                           {{"name": "to_pid", "type": "int", "value": {to_pid}}},
                           {{"name": "frames", "type": "string", "value": "2:100,3:100"}}]}}"#
    )
}

fn player_at(x: i32, y: i32, facing: Facing) -> PlayerData {
    PlayerData {
        name: "Ada".to_string(),
        species: "human".to_string(),
        sprite: "human/base".to_string(),
        position: MapPosition::new(x, y),
        facing,
        inventory: Inventory::new().save(),
    }
}

fn world_with(maps: &[(&str, String)], start: &str, player: &PlayerData) -> GameplayWorld {
    let mut store = TilemapStore::new("maps");
    for (name, json) in maps {
        store.insert_json(*name, json).unwrap();
    }
    let mut world = GameplayWorld::with_stores(
        GameConfig::new(),
        sprites(),
        store,
        NpcDirectory::default(),
    );
    world.spawn_player(player).unwrap();
    world.open_map(start).unwrap();
    world
}

fn tick(world: &mut GameplayWorld, time: &mut WorldTime, n: usize) {
    for _ in 0..n {
        world.update(time);
        time.tick();
    }
}

#[test]
fn walking_right_takes_sixteen_ticks() {
    let mut world = world_with(
        &[("test", map_json(5, 5, "", ""))],
        "test",
        &player_at(0, 0, Facing::Down),
    );
    let player = world.player().unwrap();
    let mut time = WorldTime::fixed(60);

    assert_eq!(world.walk(player, Facing::Right), None);
    tick(&mut world, &mut time, 15);
    assert!(!world.is_idle(player));
    assert_eq!(world.hitbox(player), Some(Rect::new(30, 0, 32, 32)));

    tick(&mut world, &mut time, 1);
    assert_eq!(world.hitbox(player), Some(Rect::new(32, 0, 32, 32)));
    assert!(world.is_idle(player));
    assert_eq!(world.appearance(player).unwrap().current(), "idle_right");
    assert_eq!(time.frame_count, 16);
    assert!(approx_eq(time.delta_seconds(), 1.0 / 60.0));
}

#[test]
fn walking_into_a_wall_stays_put() {
    let wall = r#"{"id": 1, "name": "wall", "x": 32, "y": 0, "width": 32, "height": 32}"#;
    let mut world = world_with(
        &[("test", map_json(5, 5, wall, ""))],
        "test",
        &player_at(0, 0, Facing::Down),
    );
    let player = world.player().unwrap();
    let mut time = WorldTime::fixed(60);

    let hit = world.walk(player, Facing::Right);
    assert_eq!(hit, Some(Collider::Map(MapObjectRef::Obstacle(0))));
    tick(&mut world, &mut time, 1);

    let rect = Rect::new(0, 0, 32, 32);
    assert_eq!(world.hitbox(player), Some(rect));
    assert_eq!(world.character(player).unwrap().destination(), rect);
    assert!(world.is_idle(player));
    assert_eq!(world.appearance(player).unwrap().current(), "walk_right");
    assert_eq!(
        world.interact(hit.unwrap()),
        vec!["It's just a wall...".to_string()]
    );
}

#[test]
fn door_traversal_changes_map_and_steps_out() {
    let town = map_json(10, 10, "", &door(1, "house", 32, 0, 1, 7));
    let house = map_json(8, 8, "", &door(2, "town", 128, 64, 7, 1));
    let mut world = world_with(
        &[("town", town), ("house", house)],
        "town",
        &player_at(0, 0, Facing::Right),
    );
    let player = world.player().unwrap();

    let hit = world.walk(player, Facing::Right).unwrap();
    let portal = world.portal(hit).cloned().unwrap();
    assert_eq!(portal.to_pid, 7);
    let destination = world.peek_portal("house", 7).unwrap().unwrap();
    let mut sequence = traversal_sequence(&portal, &destination);

    let mut time = WorldTime::fixed(60);
    let mut town_door_open = false;
    let mut house_door_open = false;
    for _ in 0..600 {
        if sequence.is_finished() {
            break;
        }
        sequence.update(&mut world, time.delta_seconds());
        world.update(&time);
        time.tick();

        let map = world.map().unwrap();
        let door_state = map.portals[0].door().map(|d| (d.state(), d.open_state));
        match (map.name.as_str(), door_state) {
            ("town", Some((DoorState::Open, 1))) => town_door_open = true,
            ("house", Some((DoorState::Open, 1))) => house_door_open = true,
            _ => {}
        }
    }

    assert!(sequence.is_finished());
    assert!(town_door_open);
    assert!(house_door_open);
    assert_eq!(world.map_name(), Some("house"));
    let house_door = world.map().unwrap().portal_by_pid(7).unwrap().door().unwrap();
    assert_eq!(house_door.state(), DoorState::Closed);
    assert_eq!(house_door.open_state, 0);
    assert_eq!(world.hitbox(player), Some(Rect::new(160, 64, 32, 32)));
    assert!(world.is_idle(player));
    assert!(world.take_traversal_error().is_none());
}

#[test]
fn missing_spawn_pid_leaves_the_map_alone() {
    let town = map_json(10, 10, "", &door(1, "house", 32, 0, 1, 9));
    let house = map_json(8, 8, "", &door(2, "town", 128, 64, 7, 1));
    let mut world = world_with(
        &[("town", town), ("house", house)],
        "town",
        &player_at(0, 0, Facing::Right),
    );
    assert!(world.peek_portal("house", 9).unwrap().is_none());
    assert!(world.execute(&WorldCommand::ChangeMap {
        map: "house".to_string(),
        spawn_pid: 9,
    }));
    assert!(world.take_traversal_error().is_some());
    assert_eq!(world.map_name(), Some("town"));
    assert!(world.peek_portal("cellar", 1).is_err());
}

#[test]
fn failed_traversal_puts_the_player_back() {
    let town = map_json(10, 10, "", &door(1, "house", 32, 0, 1, 9));
    let house = map_json(8, 8, "", &door(2, "town", 128, 64, 7, 1));
    let mut world = world_with(
        &[("town", town), ("house", house)],
        "town",
        &player_at(0, 0, Facing::Right),
    );
    let player = world.player().unwrap();
    let before = world.hitbox(player);

    let hit = world.walk(player, Facing::Right).unwrap();
    let portal = world.portal(hit).cloned().unwrap();
    // Steps out of a house door that the town door does not lead to.
    let destination = world.peek_portal("house", 7).unwrap().unwrap();
    let mut sequence = traversal_sequence(&portal, &destination);
    let mut time = WorldTime::fixed(60);
    for _ in 0..600 {
        if sequence.is_finished() {
            break;
        }
        sequence.update(&mut world, time.delta_seconds());
        world.update(&time);
        time.tick();
    }
    assert!(sequence.is_finished());
    assert_eq!(world.map_name(), Some("town"));
    assert_eq!(world.hitbox(player), Some(Rect::new(32, 0, 32, 32)));

    let message = world.recover_traversal(player, before);
    assert_eq!(message.as_deref(), Some("The way to 'house' seems to lead nowhere..."));
    assert_eq!(world.hitbox(player), Some(Rect::new(0, 0, 32, 32)));
    assert!(world.recover_traversal(player, before).is_none());
}

#[test]
fn scripted_walk_ignores_obstacles() {
    let wall = r#"{"id": 1, "name": "wall", "x": 32, "y": 0, "width": 32, "height": 32}"#;
    let mut world = world_with(
        &[("test", map_json(5, 5, wall, ""))],
        "test",
        &player_at(0, 0, Facing::Down),
    );
    let player = world.player().unwrap();
    let mut time = WorldTime::fixed(60);
    world.execute(&WorldCommand::WalkOnto {
        actor: Actor::Player,
        x: 32,
        y: 0,
    });
    assert!(!world.execute(&WorldCommand::HasArrived {
        actor: Actor::Player
    }));
    tick(&mut world, &mut time, 16);
    assert!(world.execute(&WorldCommand::HasArrived {
        actor: Actor::Player
    }));
    assert_eq!(world.hitbox(player), Some(Rect::new(32, 0, 32, 32)));
}

#[test]
fn inventory_survives_save_and_reload() {
    let mut inventory = Inventory::new();
    inventory
        .equip(Item::wand("Larch", "Dragon Heartstring", 13))
        .unwrap();
    inventory.equip(Item::cloak("human", "school_cloak")).unwrap();

    let record = inventory.save();
    let json = serde_json::to_string(&record).unwrap();
    let reloaded = Inventory::load(&serde_json::from_str(&json).unwrap());

    assert_eq!(
        reloaded.equipped(Slot::Wand),
        Some(&Item::wand("Larch", "Dragon Heartstring", 13))
    );
    assert_eq!(
        reloaded.equipped(Slot::Cloak),
        Some(&Item::cloak("human", "school_cloak"))
    );
    assert_eq!(reloaded.equipped_items().count(), 2);
    assert!(reloaded.bag().is_empty());
}

#[test]
fn new_game_writes_a_save_that_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let mut data = player_at(32, 32, Facing::Down);
    let mut inventory = Inventory::new();
    inventory.equip(Item::cloak("human", "school_cloak")).unwrap();
    inventory.add_item(Item::wand("Oak", "Unicorn Hair", 9));
    data.inventory = inventory.save();

    let mut world = world_with(&[("test", map_json(5, 5, "", ""))], "test", &data);
    world.new_game(&data, dir.path()).unwrap();
    let path = world.file_path().unwrap().to_path_buf();
    assert_eq!(path.file_name().unwrap(), "Ada.sav");
    let player = world.player().unwrap();
    assert_eq!(world.appearance(player).unwrap().layers().len(), 2);

    let saved = SavedGame::load(&path).unwrap();
    assert_eq!(saved.map, "test");
    assert_eq!(saved.player_data.position, MapPosition::new(32, 32));

    let mut other = world_with(
        &[("test", map_json(5, 5, "", ""))],
        "test",
        &player_at(0, 0, Facing::Up),
    );
    other.load_saved(&saved).unwrap();
    let player = other.player().unwrap();
    assert_eq!(other.hitbox(player), Some(Rect::new(32, 32, 32, 32)));
    let inventory = other.inventory(player).unwrap();
    assert_eq!(inventory.bag(), &[Item::wand("Oak", "Unicorn Hair", 9)]);
    assert_eq!(other.file_path(), Some(path.as_path()));
}
