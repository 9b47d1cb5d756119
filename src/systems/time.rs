//! Time sync.
//!
//! The engine clock lives in the engine context. Before a world runs its
//! schedule the clock is copied into the world's
//! [`WorldTime`](crate::resources::worldtime::WorldTime) resource.
use bevy_ecs::prelude::*;

use crate::resources::worldtime::WorldTime;

pub fn sync_world_time(world: &mut World, time: &WorldTime) {
    match world.get_resource_mut::<WorldTime>() {
        Some(mut wt) => *wt = *time,
        None => world.insert_resource(*time),
    }
}
