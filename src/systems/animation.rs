//! Animation systems.
//!
//! Character appearances count ticks; map tiles, magic trees and doors
//! consume elapsed seconds from [`WorldTime`].

use bevy_ecs::prelude::*;

use crate::components::appearance::Appearance;
use crate::resources::fader::ScreenFade;
use crate::resources::tilemap::TiledMap;
use crate::resources::worldtime::WorldTime;

/// Advance the shown animation of every appearance by one tick.
pub fn appearance_animation(mut query: Query<&mut Appearance>) {
    for mut appearance in query.iter_mut() {
        appearance.tick();
    }
}

/// Advance animated tiles, animated obstacles and doors of the open map.
pub fn map_animation(map: Option<ResMut<TiledMap>>, time: Res<WorldTime>) {
    if let Some(mut map) = map {
        map.update(time.delta_seconds());
    }
}

pub fn fade_update(mut fade: ResMut<ScreenFade>, time: Res<WorldTime>) {
    fade.update(time.delta_seconds());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cinematic::command::FadeKind;

    #[test]
    fn fade_runs_on_world_time() {
        let mut world = World::new();
        world.insert_resource(WorldTime::fixed(10));
        let mut fade = ScreenFade::default();
        fade.start(FadeKind::Out, 0.3);
        world.insert_resource(fade);

        let mut schedule = Schedule::default();
        schedule.add_systems((map_animation, fade_update).chain());
        for _ in 0..3 {
            schedule.run(&mut world);
        }
        assert!(world.resource::<ScreenFade>().is_done());
    }
}
