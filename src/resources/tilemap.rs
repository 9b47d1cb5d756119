//! The world of one map.
//!
//! A [`TiledMap`] is built from Tiled JSON data and splits it into what the
//! game needs every tick:
//!
//! - a precomputed list of static tiles, drawn first
//! - animated tiles (tiles whose tileset entry has animation frames)
//! - obstacles from the `Obstacles` object layer
//! - portals and doors from the `Portals` object layer
//!
//! Obstacles and portals are what characters collide with. Animated pieces
//! advance on elapsed seconds in [`TiledMap::update`].

pub mod animatedtile;
pub mod obstacle;
pub mod portal;
pub mod tiled;

use std::path::Path;
use std::sync::Arc;

use bevy_ecs::prelude::Resource;
use log::{debug, warn};
use rustc_hash::FxHashMap;

use crate::backend::Canvas;
use crate::components::hitbox::Rect;
use crate::error::AssetError;
use crate::resources::camera2d::Camera;

use animatedtile::{AnimatedTile, TileAnimation, TileFrame};
use obstacle::{Obstacle, ObstacleKind};
use portal::{Door, Portal, PortalKind};
use tiled::{LayerData, MapData, ObjectData, TilesetData, strip_flags};

pub const OBSTACLES_LAYER: &str = "Obstacles";
pub const PORTALS_LAYER: &str = "Portals";

/// Frame time for door frames listed by gid only.
const DEFAULT_DOOR_FRAME_MS: u32 = 100;

/// Behaviour shared by everything placed on a map.
pub trait MapObject {
    fn rect(&self) -> Rect;

    fn update(&mut self, _dt: f32) {}

    /// Tile currently shown, if the object is drawn.
    fn current_gid(&self) -> Option<u32> {
        None
    }

    /// Lines to show the player when they interact with the object.
    fn interact(&mut self) -> Vec<String> {
        Vec::new()
    }
}

/// Index of a collidable map object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapObjectRef {
    Obstacle(usize),
    Portal(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tileset {
    pub firstgid: u32,
    pub texture: Arc<str>,
    pub columns: u32,
    pub tilecount: u32,
    pub tile_w: u32,
    pub tile_h: u32,
    pub spacing: u32,
    pub margin: u32,
    /// Animations by tileset-local id, frames already converted to gids.
    pub animations: FxHashMap<u32, Vec<TileFrame>>,
}

impl Tileset {
    fn from_data(data: &TilesetData, dir: &Path) -> Option<Self> {
        let image = data.image.as_ref()?;
        let texture: Arc<str> = dir.join(image).to_string_lossy().into();
        let animations = data
            .tiles
            .iter()
            .filter(|t| !t.animation.is_empty())
            .map(|t| {
                let frames = t
                    .animation
                    .iter()
                    .map(|f| TileFrame {
                        gid: data.firstgid + f.tileid,
                        duration_ms: f.duration,
                    })
                    .collect();
                (t.id, frames)
            })
            .collect();
        Some(Self {
            firstgid: data.firstgid,
            texture,
            columns: data.columns.max(1),
            tilecount: data.tilecount,
            tile_w: data.tilewidth,
            tile_h: data.tileheight,
            spacing: data.spacing,
            margin: data.margin,
            animations,
        })
    }

    fn contains(&self, gid: u32) -> bool {
        gid >= self.firstgid && gid - self.firstgid < self.tilecount
    }

    fn source_rect(&self, gid: u32) -> Rect {
        let local = gid - self.firstgid;
        let col = local % self.columns;
        let row = local / self.columns;
        Rect::new(
            (self.margin + col * (self.tile_w + self.spacing)) as i32,
            (self.margin + row * (self.tile_h + self.spacing)) as i32,
            self.tile_w as i32,
            self.tile_h as i32,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticTile {
    pub gid: u32,
    pub x: i32,
    pub y: i32,
}

/// The open map. Inserted into the gameplay world as a resource.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct TiledMap {
    pub name: String,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
    pub tile_w: i32,
    pub tile_h: i32,
    pub tilesets: Vec<Tileset>,
    pub static_tiles: Vec<StaticTile>,
    pub animated_tiles: Vec<AnimatedTile>,
    pub obstacles: Vec<Obstacle>,
    pub portals: Vec<Portal>,
}

impl TiledMap {
    /// Build a map. `dir` is the directory tileset images are relative to.
    pub fn from_data(name: &str, data: &MapData, dir: &Path) -> Result<Self, AssetError> {
        let tile_w = data.tilewidth as i32;
        let tile_h = data.tileheight as i32;
        let mut map = TiledMap {
            name: name.to_string(),
            width: data.width as i32 * tile_w,
            height: data.height as i32 * tile_h,
            tile_w,
            tile_h,
            tilesets: Vec::new(),
            static_tiles: Vec::new(),
            animated_tiles: Vec::new(),
            obstacles: Vec::new(),
            portals: Vec::new(),
        };
        for tileset in &data.tilesets {
            match Tileset::from_data(tileset, dir) {
                Some(ts) => map.tilesets.push(ts),
                None => warn!(
                    "Map '{}': tileset at gid {} has no image, skipped",
                    name, tileset.firstgid
                ),
            }
        }
        map.tilesets.sort_by_key(|t| t.firstgid);

        for layer in &data.layers {
            match layer {
                LayerData::Tiles(tiles) if tiles.visible => {
                    for (i, raw) in tiles.data.iter().enumerate() {
                        let gid = strip_flags(*raw);
                        if gid == 0 {
                            continue;
                        }
                        let x = (i as u32 % tiles.width.max(1)) as i32 * tile_w;
                        let y = (i as u32 / tiles.width.max(1)) as i32 * tile_h;
                        map.place_tile(gid, x, y)?;
                    }
                }
                LayerData::Objects(group) if group.name == OBSTACLES_LAYER => {
                    for object in &group.objects {
                        let obstacle = map.build_obstacle(object);
                        map.obstacles.push(obstacle);
                    }
                }
                LayerData::Objects(group) if group.name == PORTALS_LAYER => {
                    for object in &group.objects {
                        let portal = map.build_portal(object);
                        map.portals.push(portal);
                    }
                }
                _ => {}
            }
        }
        map.check_disjoint();
        debug!(
            "Map '{}' built: {} static tiles, {} animated, {} obstacles, {} portals",
            map.name,
            map.static_tiles.len(),
            map.animated_tiles.len(),
            map.obstacles.len(),
            map.portals.len()
        );
        Ok(map)
    }

    fn tileset_for(&self, gid: u32) -> Option<&Tileset> {
        self.tilesets.iter().rev().find(|t| t.firstgid <= gid)
    }

    fn animation_for(&self, gid: u32) -> Option<Vec<TileFrame>> {
        let ts = self.tileset_for(gid)?;
        ts.animations.get(&(gid - ts.firstgid)).cloned()
    }

    fn place_tile(&mut self, gid: u32, x: i32, y: i32) -> Result<(), AssetError> {
        if !self.tileset_for(gid).is_some_and(|t| t.contains(gid)) {
            return Err(AssetError::UnknownTileset { gid });
        }
        let frames = self.animation_for(gid).unwrap_or_default();
        match TileAnimation::new(frames) {
            Some(animation) => self.animated_tiles.push(AnimatedTile {
                rect: Rect::new(x, y, self.tile_w, self.tile_h),
                animation,
            }),
            None => self.static_tiles.push(StaticTile { gid, x, y }),
        }
        Ok(())
    }

    fn object_rect(object: &ObjectData) -> Rect {
        let mut rect = Rect::new(
            object.x.round() as i32,
            object.y.round() as i32,
            object.width.round() as i32,
            object.height.round() as i32,
        );
        if object.gid.is_some() {
            rect.y -= rect.h;
        }
        rect
    }

    /// Frames from a `frames` property (`"gid:ms,gid:ms"` or `"gid,gid"`),
    /// falling back to the animation of the object's own tile.
    fn object_frames(&self, object: &ObjectData, default_ms: u32) -> Vec<TileFrame> {
        if let Some(list) = object.property_str("frames") {
            let frames: Vec<TileFrame> = list
                .split(',')
                .filter_map(|entry| {
                    let mut parts = entry.trim().splitn(2, ':');
                    let gid = parts.next()?.trim().parse().ok()?;
                    let duration_ms = parts
                        .next()
                        .and_then(|ms| ms.trim().parse().ok())
                        .unwrap_or(default_ms);
                    Some(TileFrame { gid, duration_ms })
                })
                .collect();
            if !frames.is_empty() {
                return frames;
            }
        }
        object
            .gid
            .map(strip_flags)
            .and_then(|gid| self.animation_for(gid))
            .unwrap_or_default()
    }

    fn build_obstacle(&self, object: &ObjectData) -> Obstacle {
        let kind = ObstacleKind::from_name(&object.name);
        let mut obstacle = Obstacle::new(Self::object_rect(object), kind);
        obstacle.image = object.gid.map(strip_flags);
        obstacle.animation = TileAnimation::new(self.object_frames(object, DEFAULT_DOOR_FRAME_MS));
        obstacle
    }

    fn build_portal(&self, object: &ObjectData) -> Portal {
        let class = object
            .property_str("type")
            .map(str::to_string)
            .unwrap_or_else(|| object.class.clone());
        let image = object.gid.map(strip_flags);
        let kind = if class.eq_ignore_ascii_case("door") {
            let mut frames = self.object_frames(object, DEFAULT_DOOR_FRAME_MS);
            if frames.is_empty() {
                frames.extend(image.map(|gid| TileFrame {
                    gid,
                    duration_ms: DEFAULT_DOOR_FRAME_MS,
                }));
            }
            PortalKind::Door(Door::new(
                frames,
                object.property_bool("is_locked").unwrap_or(false),
            ))
        } else {
            PortalKind::Plain
        };
        Portal {
            rect: Self::object_rect(object),
            destination: object.name.clone(),
            pid: object.property_i32("pid").unwrap_or(object.id as i32),
            to_pid: object.property_i32("to_pid").unwrap_or(0),
            image,
            kind,
        }
    }

    fn check_disjoint(&self) {
        for portal in &self.portals {
            if let Some(ob) = self.obstacles.iter().find(|o| o.rect.overlaps(&portal.rect)) {
                warn!(
                    "Map '{}': portal {} overlaps obstacle at {:?}",
                    self.name, portal.pid, ob.rect
                );
            }
        }
    }

    /// Texture and source rectangle of a tile.
    pub fn graphic(&self, gid: u32) -> Option<(&Arc<str>, Rect)> {
        let ts = self.tileset_for(gid).filter(|t| t.contains(gid))?;
        Some((&ts.texture, ts.source_rect(gid)))
    }

    pub fn update(&mut self, dt: f32) {
        for tile in &mut self.animated_tiles {
            tile.update(dt);
        }
        for obstacle in &mut self.obstacles {
            obstacle.update(dt);
        }
        for portal in &mut self.portals {
            portal.update(dt);
        }
    }

    /// Draw static tiles, animated tiles, obstacles with graphics, then portals.
    pub fn draw(&self, canvas: &mut dyn Canvas, camera: &Camera) {
        let (sw, sh) = canvas.size();
        let view = Rect::new(-camera.offset.0, -camera.offset.1, sw, sh);
        let tile = |x: i32, y: i32| Rect::new(x, y, self.tile_w, self.tile_h);

        for st in &self.static_tiles {
            if view.overlaps(&tile(st.x, st.y)) {
                self.draw_gid(canvas, camera, st.gid, st.x, st.y);
            }
        }
        let objects = self
            .animated_tiles
            .iter()
            .map(|t| t as &dyn MapObject)
            .chain(self.obstacles.iter().map(|o| o as &dyn MapObject))
            .chain(self.portals.iter().map(|p| p as &dyn MapObject));
        for object in objects {
            let rect = object.rect();
            if let Some(gid) = object.current_gid()
                && view.overlaps(&rect)
            {
                self.draw_gid(canvas, camera, gid, rect.x, rect.y);
            }
        }
    }

    fn draw_gid(&self, canvas: &mut dyn Canvas, camera: &Camera, gid: u32, x: i32, y: i32) {
        if let Some((texture, src)) = self.graphic(gid) {
            let (sx, sy) = camera.apply_point(x, y);
            canvas.draw_sprite(texture, src, sx, sy);
        }
    }

    /// Every collidable rectangle, obstacles first.
    pub fn colliders(&self) -> impl Iterator<Item = (MapObjectRef, Rect)> + '_ {
        self.obstacles
            .iter()
            .enumerate()
            .map(|(i, o)| (MapObjectRef::Obstacle(i), o.rect))
            .chain(
                self.portals
                    .iter()
                    .enumerate()
                    .map(|(i, p)| (MapObjectRef::Portal(i), p.rect)),
            )
    }

    /// First collidable object overlapping `rect`.
    pub fn object_at(&self, rect: Rect) -> Option<MapObjectRef> {
        self.colliders()
            .find(|(_, r)| r.overlaps(&rect))
            .map(|(key, _)| key)
    }

    pub fn object_mut(&mut self, key: MapObjectRef) -> Option<&mut dyn MapObject> {
        match key {
            MapObjectRef::Obstacle(i) => self.obstacles.get_mut(i).map(|o| o as &mut dyn MapObject),
            MapObjectRef::Portal(i) => self.portals.get_mut(i).map(|p| p as &mut dyn MapObject),
        }
    }

    pub fn portal(&self, key: MapObjectRef) -> Option<&Portal> {
        match key {
            MapObjectRef::Portal(i) => self.portals.get(i),
            MapObjectRef::Obstacle(_) => None,
        }
    }

    pub fn portal_by_pid(&self, pid: i32) -> Option<&Portal> {
        self.portals.iter().find(|p| p.pid == pid)
    }

    pub fn portal_by_pid_mut(&mut self, pid: i32) -> Option<&mut Portal> {
        self.portals.iter_mut().find(|p| p.pid == pid)
    }
}
