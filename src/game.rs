//! World setup and the per-tick schedule.
//!
//! [`setup_world`] inserts the shared resources, [`spawn_scene`] turns a
//! [`SceneDescription`] into scripted entities and [`update_schedule`] builds
//! the ordered systems of one engine tick. The runner (and the integration
//! tests) drive a tick as:
//!
//! ```ignore
//! update_world_time(&mut world, dt);
//! schedule.run(&mut world);
//! ```

use bevy_ecs::prelude::*;
use log::info;

use crate::components::animation::AnimationPlayer;
use crate::components::mapposition::MapPosition;
use crate::components::patrol::Patrol;
use crate::components::playercontrol::PlayerControl;
use crate::components::timer::ScriptTimers;
use crate::components::tween::TweenSlot;
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::{InputDriver, InputState};
use crate::resources::scene::{BehaviorKind, EntityDescription, SceneDescription};
use crate::resources::viewport::Viewport;
use crate::resources::worldtime::WorldTime;
use crate::scripts::elk::{elk_script, elk_script_without_update};
use crate::scripts::player::player_script;
use crate::systems::animation::animation_player_system;
use crate::systems::input::drive_input_system;
use crate::systems::script::{script_start_system, script_update_system};
use crate::systems::viewport::viewport_follow_system;

/// Build a world holding every shared resource the scripts may use.
///
/// `driver` feeds [`InputState`] each tick; without one the input stays
/// released unless the caller writes it directly.
pub fn setup_world(config: &GameConfig, driver: Option<InputDriver>) -> World {
    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    world.insert_resource(InputState::default());
    world.insert_resource(Viewport::new(
        config.viewport_width as f32,
        config.viewport_height as f32,
    ));
    world.insert_resource(config.clone());
    if let Some(driver) = driver {
        world.insert_resource(driver);
    }
    world
}

/// Spawn an entity running the patrol behavior.
pub fn spawn_patrol(world: &mut World, desc: &EntityDescription) -> Entity {
    let script = if desc.has_update {
        elk_script()
    } else {
        elk_script_without_update()
    };
    world
        .spawn((
            MapPosition::new(desc.x, desc.y),
            TweenSlot::new(),
            ScriptTimers::new(),
            AnimationPlayer::new().with_clips(desc.clips.iter().cloned()),
            script.with_time_scale(desc.time_scale),
            Patrol::new(),
        ))
        .id()
}

/// Spawn an entity steered by the directional input.
pub fn spawn_player(world: &mut World, desc: &EntityDescription) -> Entity {
    let mut script = player_script().with_time_scale(desc.time_scale);
    if !desc.has_update {
        script.on_update = None;
    }
    world
        .spawn((
            MapPosition::new(desc.x, desc.y),
            TweenSlot::new(),
            ScriptTimers::new(),
            AnimationPlayer::new().with_clips(desc.clips.iter().cloned()),
            script,
            PlayerControl::default(),
        ))
        .id()
}

/// Spawn every entity of `scene`, in order.
pub fn spawn_scene(world: &mut World, scene: &SceneDescription) -> Vec<Entity> {
    scene
        .entities
        .iter()
        .map(|desc| {
            let entity = match desc.behavior {
                BehaviorKind::Patrol => spawn_patrol(world, desc),
                BehaviorKind::Player => spawn_player(world, desc),
            };
            info!(
                "spawned '{}' ({:?}) at ({}, {}) as {:?}",
                desc.name, desc.behavior, desc.x, desc.y, entity
            );
            entity
        })
        .collect()
}

/// Systems of one engine tick, in execution order.
///
/// [`update_world_time`](crate::systems::time::update_world_time) runs
/// outside the schedule, before it.
pub fn update_schedule() -> Schedule {
    let mut update = Schedule::default();
    update.add_systems(
        (
            drive_input_system,
            script_start_system,
            script_update_system,
            viewport_follow_system,
            animation_player_system,
        )
            .chain(),
    );
    update
}
