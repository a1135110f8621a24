//! Animation systems.
//!
//! - [`select_animation_state`] maps a movement velocity to an
//!   [`AnimationState`] by walking an ordered rule table; the first match wins.
//! - [`apply_animation_state`] turns that state into a clip request on the
//!   entity's [`AnimationPlayer`]: a looping play, or stop-all when idle.
//! - [`animation_player_system`] advances the frame of whatever clip each
//!   player is looping.
//!
//! Requests are passed straight through every tick. The player ignores a
//! request for the clip it is already looping, so repeating one is
//! indistinguishable from asking once.

use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::components::animation::{AnimRule, AnimationPlayer, AnimationState};
use crate::components::script::ScriptContext;
use crate::resources::worldtime::WorldTime;

/// Pick the state of the first rule matching `velocity`, or idle.
pub fn select_animation_state(rules: &[AnimRule], velocity: Vec2) -> AnimationState {
    rules
        .iter()
        .find(|rule| rule.matches(velocity))
        .map(|rule| rule.state)
        .unwrap_or(AnimationState::Idle)
}

/// Request the clip for `state` on `entity`, stopping the other clips; idle
/// stops all clips.
pub fn apply_animation_state(ctx: &mut ScriptContext, entity: Entity, state: AnimationState) {
    match state.clip_name() {
        Some(clip) => ctx.play_animation(entity, clip),
        None => ctx.stop_all_animations(entity),
    }
}

/// Advance looping clips on every [`AnimationPlayer`].
///
/// Contract
/// - Reads [`WorldTime`] for the delta.
/// - Stopped clips, and clips without frames, are left alone.
pub fn animation_player_system(mut query: Query<&mut AnimationPlayer>, time: Res<WorldTime>) {
    let delta = time.delta.max(0.0);
    for mut player in query.iter_mut() {
        for state in player.clips.values_mut() {
            if !state.playing || state.def.frame_count == 0 || state.def.fps <= 0.0 {
                continue;
            }
            state.elapsed_time += delta;
            let frame_duration = 1.0 / state.def.fps;
            while state.elapsed_time >= frame_duration {
                state.elapsed_time -= frame_duration;
                state.frame_index = (state.frame_index + 1) % state.def.frame_count;
            }
        }
    }
}
