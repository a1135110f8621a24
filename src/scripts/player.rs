//! Player behavior.
//!
//! `start` makes the viewport follow the entity. `update(dt)` turns the held
//! directions into a velocity, picks the walk animation and moves the entity
//! by that velocity (one Euler step, no collision).
//!
//! Each axis resolves through an ordered rule list: LEFT wins over RIGHT and
//! UP over DOWN when both are held. When both axes move, both are scaled by
//! [`DIAGONAL_FACTOR`](crate::components::playercontrol::DIAGONAL_FACTOR).

use bevy_ecs::prelude::Entity;
use glam::Vec2;

use crate::components::animation::WALK_RULES;
use crate::components::playercontrol::PlayerControl;
use crate::components::script::{Script, ScriptContext, ScriptError};
use crate::resources::input::Direction;
use crate::systems::animation::{apply_animation_state, select_animation_state};

pub const PLAYER_SCRIPT: &str = "player";

/// Horizontal intent, first held direction wins.
pub const HORIZONTAL_RULES: [(Direction, f32); 2] = [(Direction::Left, -1.0), (Direction::Right, 1.0)];
/// Vertical intent, first held direction wins.
pub const VERTICAL_RULES: [(Direction, f32); 2] = [(Direction::Up, -1.0), (Direction::Down, 1.0)];

pub fn player_script() -> Script {
    Script::new(PLAYER_SCRIPT)
        .on_start(player_start)
        .on_update(player_update)
}

pub fn player_start(entity: Entity, ctx: &mut ScriptContext) -> Result<(), ScriptError> {
    ctx.follow(entity);
    Ok(())
}

/// Sign of the first rule whose direction is held, or 0.
pub fn resolve_axis(rules: &[(Direction, f32)], pressed: impl Fn(Direction) -> bool) -> f32 {
    rules
        .iter()
        .find(|(direction, _)| pressed(*direction))
        .map(|(_, sign)| *sign)
        .unwrap_or(0.0)
}

/// Displacement for this tick from the held directions.
pub fn resolve_intent(
    control: &PlayerControl,
    dt: f32,
    pressed: impl Fn(Direction) -> bool,
) -> Vec2 {
    let mut velocity = Vec2::new(
        resolve_axis(&HORIZONTAL_RULES, &pressed) * control.velocity * dt,
        resolve_axis(&VERTICAL_RULES, &pressed) * control.velocity * dt,
    );
    if velocity.x != 0.0 && velocity.y != 0.0 {
        velocity *= control.diagonal_factor;
    }
    velocity
}

pub fn player_update(entity: Entity, dt: f32, ctx: &mut ScriptContext) -> Result<(), ScriptError> {
    let control = *ctx
        .players
        .get(entity)
        .map_err(|_| ScriptError::MissingBehaviorState(entity, "PlayerControl"))?;
    let velocity = resolve_intent(&control, dt, |d| ctx.is_direction_pressed(d));

    let state = select_animation_state(&WALK_RULES, velocity);
    apply_animation_state(ctx, entity, state);

    let pos = ctx.position(entity)?;
    ctx.set_position(entity, pos + velocity)
}
