use crate::components::hitbox::Rect;
use crate::resources::tilemap::MapObject;
use crate::resources::tilemap::animatedtile::TileAnimation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObstacleKind {
    Wall,
    Tree,
    MagicTree,
    /// Any other named (or unnamed) blocker.
    Generic(String),
}

impl ObstacleKind {
    /// Kind from a Tiled object name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "wall" | "Wall" => ObstacleKind::Wall,
            "tree" | "Tree" => ObstacleKind::Tree,
            "MagicTree" | "magic_tree" => ObstacleKind::MagicTree,
            other => ObstacleKind::Generic(other.to_string()),
        }
    }

    pub fn is_tree(&self) -> bool {
        matches!(self, ObstacleKind::Tree | ObstacleKind::MagicTree)
    }
}

/// Impassable map rectangle, optionally drawn and animated.
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub rect: Rect,
    pub kind: ObstacleKind,
    /// Static tile drawn over the rectangle.
    pub image: Option<u32>,
    pub animation: Option<TileAnimation>,
}

impl Obstacle {
    pub fn new(rect: Rect, kind: ObstacleKind) -> Self {
        Self {
            rect,
            kind,
            image: None,
            animation: None,
        }
    }

    pub fn is_animated(&self) -> bool {
        self.animation.is_some()
    }
}

impl MapObject for Obstacle {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn update(&mut self, dt: f32) {
        if let Some(animation) = self.animation.as_mut() {
            animation.update(dt);
        }
    }

    fn current_gid(&self) -> Option<u32> {
        self.animation
            .as_ref()
            .map(TileAnimation::current_gid)
            .or(self.image)
    }

    fn interact(&mut self) -> Vec<String> {
        let text = match &self.kind {
            ObstacleKind::Wall => "It's just a wall...".to_string(),
            ObstacleKind::Tree => "It's a tree. It looks sturdy.".to_string(),
            ObstacleKind::MagicTree => "The tree hums with a strange magic...".to_string(),
            ObstacleKind::Generic(name) if name.is_empty() => {
                "Something is in the way.".to_string()
            }
            ObstacleKind::Generic(name) => format!("It's just a {name}..."),
        };
        vec![text]
    }
}
