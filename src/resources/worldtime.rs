use bevy_ecs::prelude::Resource;

/// Simulation clock.
///
/// The game runs on fixed ticks: `delta` is `1 / fps` seconds and every
/// delay, fade and tile animation consumes it. Tests build clocks with
/// [`WorldTime::fixed`] to get deterministic timing.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct WorldTime {
    pub elapsed: f32,
    pub delta: f32,
    pub time_scale: f32,
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime::fixed(60)
    }
}

impl WorldTime {
    pub fn fixed(fps: u32) -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 1.0 / fps.max(1) as f32,
            time_scale: 1.0,
            frame_count: 0,
        }
    }

    /// Scaled seconds for the current tick.
    pub fn delta_seconds(&self) -> f32 {
        self.delta * self.time_scale
    }

    pub fn tick(&mut self) {
        self.elapsed += self.delta_seconds();
        self.frame_count += 1;
    }
}
