//! Patrol behavior ("elk").
//!
//! `start` raises the first "leg complete" event inline. Every event turns the
//! entity's [`Patrol`](crate::components::patrol::Patrol) state machine around, plays the matching walk clip and
//! starts a tween of [`leg_distance`](crate::components::patrol::Patrol::leg_distance) units along x, whose completion
//! raises the next event.
//!
//! The `update` hook does nothing; it exists so the scheduler advances the
//! entity's tweens. Bind the script with [`elk_script_without_update`] to get
//! an entity that stalls after its first leg under the default scheduling
//! policy.

use bevy_ecs::prelude::Entity;
use glam::Vec2;

use crate::components::animation::AnimationState;
use crate::components::patrol::PatrolState;
use crate::components::script::{Script, ScriptContext, ScriptError, ScriptHook};
use crate::systems::animation::apply_animation_state;

pub const ELK_SCRIPT: &str = "elk";

pub fn elk_script() -> Script {
    elk_script_without_update().on_update(elk_update)
}

pub fn elk_script_without_update() -> Script {
    Script::new(ELK_SCRIPT).on_start(elk_start)
}

pub fn elk_start(entity: Entity, ctx: &mut ScriptContext) -> Result<(), ScriptError> {
    elk_leg_complete(entity, ctx)
}

pub fn elk_update(_entity: Entity, _dt: f32, _ctx: &mut ScriptContext) -> Result<(), ScriptError> {
    Ok(())
}

/// Completion hook of every patrol leg.
pub fn elk_leg_complete(entity: Entity, ctx: &mut ScriptContext) -> Result<(), ScriptError> {
    let pos = ctx.position(entity)?;
    let (state, offset, millis) = {
        let mut patrol = ctx
            .patrols
            .get_mut(entity)
            .map_err(|_| ScriptError::MissingBehaviorState(entity, "Patrol"))?;
        let state = patrol.on_leg_complete();
        (state, patrol.leg_offset(), patrol.leg_millis())
    };

    let animation = match state {
        PatrolState::MovingLeft => AnimationState::WalkLeft,
        PatrolState::MovingRight => AnimationState::WalkRight,
        PatrolState::Idle => AnimationState::Idle,
    };
    apply_animation_state(ctx, entity, animation);

    let dest = Vec2::new(pos.x + offset, pos.y);
    ctx.move_to(
        entity,
        dest,
        millis,
        "lerp",
        Some(elk_leg_complete as ScriptHook),
    )
}
