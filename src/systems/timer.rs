//! Callback timer advance.
//!
//! [`advance_entity_timers`] is called by the entity update scheduler in
//! [`crate::systems::script`] right after an entity's `update` hook, under the
//! same gating as its tween.
//!
//! # Firing order
//!
//! 1. Every timer of the entity accumulates `dt`; the due ones reset
//! 2. Due callbacks run in scheduling order
//! 3. A callback cancelled by an earlier one in the same tick is skipped
//! 4. Once-timers, and intervals returning `Ok(false)`, are dropped
//!
//! Timers scheduled by a timer callback start counting on the next tick.

use bevy_ecs::prelude::Entity;
use log::debug;

use crate::components::script::{ScriptContext, ScriptError};
use crate::components::timer::TimerCallback;
use crate::systems::tween::reached;

/// Advance the callback timers of `entity` by `dt` seconds and run the due
/// callbacks. Returns how many callbacks ran.
pub fn advance_entity_timers(
    entity: Entity,
    dt: f32,
    ctx: &mut ScriptContext,
) -> Result<u32, ScriptError> {
    let due = {
        let Ok(mut timers) = ctx.timers.get_mut(entity) else {
            return Ok(0);
        };
        let mut due = Vec::new();
        for timer in timers.timers.iter_mut() {
            timer.elapsed += dt.max(0.0);
            if reached(timer.elapsed, timer.delay) {
                timer.reset();
                due.push(timer.id);
            }
        }
        due
    };

    let mut fired = 0;
    for id in due {
        let Some(callback) = ctx
            .timers
            .get(entity)
            .ok()
            .and_then(|timers| timers.get(id).map(|timer| timer.callback))
        else {
            continue;
        };
        fired += 1;
        if let Ok(mut timers) = ctx.timers.get_mut(entity) {
            timers.fired += 1;
        }
        debug!("timer {:?} fired on {:?}", id, entity);

        let keep = match callback {
            TimerCallback::Once(hook) => {
                hook(entity, ctx)?;
                false
            }
            TimerCallback::Repeat(hook) => hook(entity, ctx)?,
        };
        if !keep {
            ctx.cancel(entity, id);
        }
    }
    Ok(fired)
}
