use log::debug;
use serde::{Deserialize, Serialize};

use crate::cinematic::{Director, Scene, SceneAction};

/// Scenes played strictly in order.
///
/// Each tick only the first unfinished scene advances; the sequencer is
/// finished once every scene is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sequencer<C> {
    scenes: Vec<Scene<C>>,
}

impl<C> Default for Sequencer<C> {
    fn default() -> Self {
        Self { scenes: Vec::new() }
    }
}

impl<C> Sequencer<C> {
    pub fn new(scenes: Vec<Scene<C>>) -> Self {
        Self { scenes }
    }

    pub fn push_scene(&mut self, scene: Scene<C>) {
        self.scenes.push(scene);
    }

    /// Insert a scene; indices past the end append.
    pub fn insert_scene(&mut self, index: usize, scene: Scene<C>) {
        let index = index.min(self.scenes.len());
        self.scenes.insert(index, scene);
    }

    /// First scene called `name`.
    pub fn scene(&self, name: &str) -> Option<&Scene<C>> {
        self.scenes.iter().find(|s| s.name == name)
    }

    pub fn scene_mut(&mut self, name: &str) -> Option<&mut Scene<C>> {
        self.scenes.iter_mut().find(|s| s.name == name)
    }

    /// Insert `action` into the first scene called `scene_name`.
    /// Returns false if there is no such scene.
    pub fn insert_action(
        &mut self,
        scene_name: &str,
        index: usize,
        action: SceneAction<C>,
    ) -> bool {
        match self.scene_mut(scene_name) {
            Some(scene) => {
                scene.insert_action(index, action);
                true
            }
            None => false,
        }
    }

    /// Append the scenes of `other` after ours.
    pub fn append(&mut self, other: Sequencer<C>) {
        self.scenes.extend(other.scenes);
    }

    pub fn scenes(&self) -> &[Scene<C>] {
        &self.scenes
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Index of the scene that will advance on the next tick.
    pub fn current_index(&self) -> Option<usize> {
        self.scenes.iter().position(|s| !s.is_finished())
    }

    pub fn update<D>(&mut self, director: &mut D, dt: f32)
    where
        D: Director<Command = C> + ?Sized,
    {
        if let Some(scene) = self.scenes.iter_mut().find(|s| !s.is_finished()) {
            scene.update(director, dt);
            if scene.is_finished() {
                debug!("Scene '{}' finished", scene.name);
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.scenes.iter().all(Scene::is_finished)
    }
}
