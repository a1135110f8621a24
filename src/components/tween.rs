//! Tween components for animated interpolation.
//!
//! This module provides the data side of the tween engine:
//! - [`Tween`] – a single interpolation from `from` to `to` over `duration` seconds
//! - [`TweenSlot`] – the per-entity slot holding zero or one active movement tween
//! - [`Easing`] – the curve applied to normalized tween time, selectable by name
//!
//! A tween carries an optional completion hook that fires exactly once, on the
//! tick where its elapsed time first reaches its duration.
//! See [`crate::systems::tween`] for the advance logic.

use bevy_ecs::prelude::Component;
use glam::Vec2;
use std::fmt;

use crate::components::script::ScriptHook;

/// Easing functions for smooth interpolation.
///
/// These functions transform a linear `t` value (0.0 to 1.0) to create
/// different acceleration/deceleration curves.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Easing {
    /// Constant speed (no easing). Named `"lerp"` in scripts.
    Linear,
    /// Starts slow, accelerates (quadratic). Named `"ease-in"` in scripts.
    QuadIn,
    /// Starts fast, decelerates (quadratic).
    QuadOut,
    /// Slow start and end (quadratic).
    QuadInOut,
    /// Starts slow, accelerates (cubic).
    CubicIn,
    /// Starts fast, decelerates (cubic).
    CubicOut,
    /// Slow start and end (cubic).
    CubicInOut,
}

/// Script-facing names, first match wins when resolving a name.
const EASING_NAMES: [(&str, Easing); 8] = [
    ("lerp", Easing::Linear),
    ("linear", Easing::Linear),
    ("ease-in", Easing::QuadIn),
    ("ease-out", Easing::QuadOut),
    ("ease-in-out", Easing::QuadInOut),
    ("cubic-in", Easing::CubicIn),
    ("cubic-out", Easing::CubicOut),
    ("cubic-in-out", Easing::CubicInOut),
];

impl Easing {
    /// Resolve an easing curve from the name used by behavior scripts.
    pub fn from_name(name: &str) -> Option<Easing> {
        EASING_NAMES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, easing)| *easing)
    }

    /// Canonical script name of this curve.
    pub fn name(self) -> &'static str {
        EASING_NAMES
            .iter()
            .find(|(_, easing)| *easing == self)
            .map(|(n, _)| *n)
            .unwrap_or("lerp")
    }
}

/// A value that a [`Tween`] can interpolate.
pub trait Tweenable: Copy + Send + Sync + 'static {
    /// Linear interpolation towards `to` by factor `t`.
    fn lerp_to(self, to: Self, t: f32) -> Self;
}

impl Tweenable for f32 {
    fn lerp_to(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

impl Tweenable for Vec2 {
    fn lerp_to(self, to: Self, t: f32) -> Self {
        Vec2 {
            x: self.x + (to.x - self.x) * t,
            y: self.y + (to.y - self.y) * t,
        }
    }
}

/// Interpolates `from` to `to` over `duration` seconds.
///
/// Invariant: `0 <= elapsed <= duration` for a positive duration. A tween with
/// a non-positive duration completes on its first advance.
#[derive(Clone, Copy)]
pub struct Tween<T: Tweenable> {
    /// Starting value, captured when the tween is created.
    pub from: T,
    /// Value written on completion.
    pub to: T,
    /// Duration in seconds.
    pub duration: f32,
    /// Time accumulated so far, in seconds.
    pub elapsed: f32,
    /// Easing function to use.
    pub easing: Easing,
    /// Hook invoked once, after the tween is detached from its entity.
    pub on_complete: Option<ScriptHook>,
}

impl<T: Tweenable> Tween<T> {
    pub fn new(from: T, to: T, duration: f32) -> Self {
        Tween {
            from,
            to,
            duration,
            elapsed: 0.0,
            easing: Easing::Linear,
            on_complete: None,
        }
    }

    /// Build a tween from a duration in milliseconds, as scripts express it.
    pub fn from_millis(from: T, to: T, duration_ms: f32) -> Self {
        Self::new(from, to, duration_ms / 1000.0)
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_on_complete(mut self, hook: ScriptHook) -> Self {
        self.on_complete = Some(hook);
        self
    }

    /// Normalized progress in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }
}

impl<T: Tweenable + fmt::Debug> fmt::Debug for Tween<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tween")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("duration", &self.duration)
            .field("elapsed", &self.elapsed)
            .field("easing", &self.easing)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

/// Per-entity slot owning zero or one active movement tween.
///
/// Attaching a tween replaces the previous one; a replaced tween never fires
/// its completion hook.
#[derive(Component, Default, Debug)]
pub struct TweenSlot {
    /// Active movement tween, if any.
    pub active: Option<Tween<Vec2>>,
    /// Number of tweens that ran to completion on this entity.
    pub completed: u32,
}

impl TweenSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Attach `tween`, returning the tween it replaced.
    pub fn attach(&mut self, tween: Tween<Vec2>) -> Option<Tween<Vec2>> {
        self.active.replace(tween)
    }

    /// Detach the active tween without firing its hook.
    pub fn detach(&mut self) -> Option<Tween<Vec2>> {
        self.active.take()
    }
}
