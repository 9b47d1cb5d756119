use log::debug;
use serde::{Deserialize, Serialize};

use crate::cinematic::{DELAY_EPSILON, Director, SceneAction};

/// A named group of concurrent actions.
///
/// Per tick a scene either burns pre-delay, advances every incomplete action,
/// or (once all actions are complete) burns post-delay. Finalizers of all
/// actions run together in the tick the last action completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene<C> {
    pub name: String,
    actions: Vec<SceneAction<C>>,
    pre_delay: f32,
    post_delay: f32,
    finalized: bool,
}

impl<C> Scene<C> {
    pub fn new(name: impl Into<String>, actions: Vec<SceneAction<C>>) -> Self {
        Self {
            name: name.into(),
            actions,
            pre_delay: 0.0,
            post_delay: 0.0,
            finalized: false,
        }
    }

    /// Seconds to wait before the first action fires.
    pub fn with_pre_delay(mut self, seconds: f32) -> Self {
        self.pre_delay = seconds;
        self
    }

    /// Seconds to wait after finalizing.
    pub fn with_post_delay(mut self, seconds: f32) -> Self {
        self.post_delay = seconds;
        self
    }

    /// Insert an action; indices past the end append.
    pub fn insert_action(&mut self, index: usize, action: SceneAction<C>) {
        let index = index.min(self.actions.len());
        self.actions.insert(index, action);
    }

    pub fn actions(&self) -> &[SceneAction<C>] {
        &self.actions
    }

    pub fn pre_delay(&self) -> f32 {
        self.pre_delay
    }

    pub fn post_delay(&self) -> f32 {
        self.post_delay
    }

    pub fn is_in_pre_delay(&self) -> bool {
        self.pre_delay > DELAY_EPSILON
    }

    pub fn all_actions_complete(&self) -> bool {
        self.actions.iter().all(SceneAction::is_completed)
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn is_finished(&self) -> bool {
        self.finalized && self.post_delay <= DELAY_EPSILON
    }

    /// Advance the scene by one tick of `dt` seconds.
    pub fn update<D>(&mut self, director: &mut D, dt: f32)
    where
        D: Director<Command = C> + ?Sized,
    {
        if self.is_in_pre_delay() {
            self.pre_delay -= dt;
            return;
        }
        if self.finalized {
            self.post_delay -= dt;
            return;
        }
        for action in self.actions.iter_mut().filter(|a| !a.is_completed()) {
            action.update(director);
        }
        if self.all_actions_complete() {
            for action in &mut self.actions {
                action.finalize(director);
            }
            self.finalized = true;
            debug!("Scene '{}' finalized", self.name);
        }
    }
}
