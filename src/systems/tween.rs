//! Tween engine.
//!
//! Advances the movement tween attached to an entity's
//! [`TweenSlot`](crate::components::tween::TweenSlot), writes the interpolated
//! value into its [`MapPosition`](crate::components::mapposition::MapPosition),
//! and fires the completion hook synchronously once the tween finishes.
//!
//! There is no stand-alone tween system: the entity update scheduler in
//! [`crate::systems::script`] calls [`advance_entity_tween`] for each entity
//! right before its `update` hook, so behavior code always observes the
//! post-movement position.
//!
//! # Completion order
//!
//! 1. The final value (exactly `to`) is written
//! 2. The tween is detached from the slot
//! 3. The completion hook runs, and may attach a new tween
//!
//! A hook that keeps attaching zero-duration tweens would recurse forever in
//! one tick, so completions per entity per tick are capped.

use bevy_ecs::prelude::Entity;
use log::{debug, warn};

use crate::components::script::{ScriptContext, ScriptError};
use crate::components::tween::{Easing, Tween, Tweenable};

/// Apply an easing function to a normalized time value.
///
/// The input `t` is clamped to [0.0, 1.0] and transformed according to the
/// easing curve.
pub fn ease(e: Easing, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    match e {
        Easing::Linear => t,
        Easing::QuadIn => t * t,
        Easing::QuadOut => t * (2.0 - t),
        Easing::QuadInOut => {
            if t < 0.5 {
                2.0 * t * t
            } else {
                -1.0 + (4.0 - 2.0 * t) * t
            }
        }
        Easing::CubicIn => t * t * t,
        Easing::CubicOut => {
            let p = t - 1.0;
            p * p * p + 1.0
        }
        Easing::CubicInOut => {
            if t < 0.5 {
                4.0 * t * t * t
            } else {
                let p = 2.0 * t - 2.0;
                0.5 * p * p * p + 1.0
            }
        }
    }
}

/// Relative slack when comparing accumulated time against a duration.
///
/// Frame deltas such as `1/60` are inexact in `f32`; summed over a duration
/// they fall a few ulps short of it.
pub const COMPLETION_TOLERANCE: f32 = 1e-4;

/// Whether `elapsed` has reached `duration`, allowing for float drift.
pub fn reached(elapsed: f32, duration: f32) -> bool {
    elapsed >= duration - duration.abs() * COMPLETION_TOLERANCE
}

/// Result of advancing a tween by one delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenStep<T> {
    /// Value to write this tick.
    pub value: T,
    /// The tween reached its duration on this advance.
    pub finished: bool,
}

/// Advance tween time by `dt` seconds and compute the interpolated value.
///
/// Negative deltas count as zero. A non-positive duration finishes
/// immediately with the target value.
pub fn advance_tween<T: Tweenable>(tween: &mut Tween<T>, dt: f32) -> TweenStep<T> {
    if tween.duration <= 0.0 {
        tween.elapsed = 0.0;
        return TweenStep {
            value: tween.to,
            finished: true,
        };
    }
    tween.elapsed = (tween.elapsed + dt.max(0.0)).min(tween.duration);
    if reached(tween.elapsed, tween.duration) {
        tween.elapsed = tween.duration;
        return TweenStep {
            value: tween.to,
            finished: true,
        };
    }
    let t = ease(tween.easing, tween.elapsed / tween.duration);
    TweenStep {
        value: tween.from.lerp_to(tween.to, t),
        finished: false,
    }
}

/// Advance the movement tween of `entity` and run completion hooks.
///
/// After a completion, a zero-duration tween attached by the hook completes in
/// the same tick, up to `max_completions` completions in total. Returns how
/// many tweens completed.
pub fn advance_entity_tween(
    entity: Entity,
    dt: f32,
    max_completions: u32,
    ctx: &mut ScriptContext,
) -> Result<u32, ScriptError> {
    let mut dt = dt;
    let mut completions = 0;
    loop {
        let finished = {
            let Ok(mut slot) = ctx.tweens.get_mut(entity) else {
                return Ok(completions);
            };
            let Some(tween) = slot.active.as_mut() else {
                return Ok(completions);
            };
            let step = advance_tween(tween, dt);
            let mut position = ctx
                .positions
                .get_mut(entity)
                .map_err(|_| ScriptError::MissingPosition(entity))?;
            position.pos = step.value;
            if step.finished {
                slot.completed += 1;
                slot.detach()
            } else {
                None
            }
        };

        let Some(done) = finished else {
            return Ok(completions);
        };
        completions += 1;
        debug!("tween on {:?} reached {:?}", entity, done.to);
        if let Some(hook) = done.on_complete {
            hook(entity, ctx)?;
        }

        let instant_next = ctx
            .tweens
            .get(entity)
            .ok()
            .and_then(|slot| slot.active.as_ref().map(|t| t.duration <= 0.0))
            .unwrap_or(false);
        if !instant_next {
            return Ok(completions);
        }
        if completions >= max_completions {
            warn!(
                "{:?} completed {} tweens this tick; deferring the rest to the next tick",
                entity, completions
            );
            return Ok(completions);
        }
        dt = 0.0;
    }
}
