//! Per-entity callback timers.
//!
//! Scripts schedule callbacks on their own entity through
//! [`ScriptContext::delay`](crate::components::script::ScriptContext::delay)
//! and [`ScriptContext::interval`](crate::components::script::ScriptContext::interval),
//! and drop them again with
//! [`ScriptContext::cancel`](crate::components::script::ScriptContext::cancel).
//!
//! # How It Works
//!
//! 1. A timer accumulates the entity's scaled delta each tick
//! 2. When `elapsed >= delay` its callback runs and the timer resets by
//!    subtracting the delay
//! 3. A `delay` callback runs once; an `interval` callback keeps running for
//!    as long as it returns `Ok(true)`
//!
//! Timers are advanced by the entity update scheduler under the same gating as
//! tweens, right after the entity's `update` hook. See
//! [`crate::systems::timer`].

use bevy_ecs::prelude::Component;
use std::fmt;

use crate::components::script::{IntervalHook, ScriptHook};

/// Handle returned when scheduling a timer, unique per entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u32);

#[derive(Clone, Copy)]
pub enum TimerCallback {
    /// Runs once, then the timer is dropped.
    Once(ScriptHook),
    /// Runs every period until it returns `Ok(false)`.
    Repeat(IntervalHook),
}

/// One scheduled callback.
#[derive(Clone, Copy)]
pub struct ScriptTimer {
    pub id: TimerId,
    /// Period in seconds.
    pub delay: f32,
    /// Time accumulated since the last firing, in seconds.
    pub elapsed: f32,
    pub callback: TimerCallback,
}

impl ScriptTimer {
    /// Reset the timer by subtracting the delay from elapsed time.
    pub fn reset(&mut self) {
        self.elapsed = (self.elapsed - self.delay).max(0.0);
    }

    pub fn is_once(&self) -> bool {
        matches!(self.callback, TimerCallback::Once(_))
    }
}

impl fmt::Debug for ScriptTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptTimer")
            .field("id", &self.id)
            .field("delay", &self.delay)
            .field("elapsed", &self.elapsed)
            .field("once", &self.is_once())
            .finish()
    }
}

/// Timers owned by one entity, in scheduling order.
#[derive(Component, Debug, Clone, Default)]
pub struct ScriptTimers {
    pub timers: Vec<ScriptTimer>,
    /// Callbacks run so far.
    pub fired: u32,
    next_id: u32,
}

impl ScriptTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a timer firing after `delay_ms` milliseconds.
    pub fn schedule(&mut self, delay_ms: f32, callback: TimerCallback) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(ScriptTimer {
            id,
            delay: delay_ms.max(0.0) / 1000.0,
            elapsed: 0.0,
            callback,
        });
        id
    }

    /// Drop the timer `id`. Returns whether it was still scheduled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|timer| timer.id != id);
        self.timers.len() != before
    }

    pub fn get(&self, id: TimerId) -> Option<&ScriptTimer> {
        self.timers.iter().find(|timer| timer.id == id)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}
