//! Behavior script binding for entities.
//!
//! A [`Script`] attaches a per-entity-type behavior to an entity: a one-shot
//! `start` hook and an optional per-frame `update` hook. Hooks are plain
//! function pointers that receive the owning entity explicitly together with a
//! [`ScriptContext`], which exposes the capabilities a behavior may use:
//!
//! - position read/write and [`ScriptContext::move_to`] (tweened movement)
//! - animation clip requests on the entity's [`AnimationPlayer`]
//! - one-shot and repeating callback timers ([`ScriptContext::delay`],
//!   [`ScriptContext::interval`], [`ScriptContext::cancel`])
//! - directional input queries
//! - camera follow through the [`Viewport`]
//! - [`ScriptContext::destroy`] to despawn the entity
//!
//! # Lifecycle
//!
//! 1. [`script_start_system`](crate::systems::script::script_start_system) calls
//!    `on_start` exactly once, before any update
//! 2. [`script_update_system`](crate::systems::script::script_update_system)
//!    advances the entity's tween, calls `on_update(dt)` and then runs any due
//!    timer callbacks, every frame
//! 3. A hook returning an error disables the script for good
//!
//! # Example
//!
//! ```ignore
//! fn hello_start(entity: Entity, ctx: &mut ScriptContext) -> Result<(), ScriptError> {
//!     ctx.play_animation(entity, "idle");
//!     Ok(())
//! }
//!
//! world.spawn((
//!     MapPosition::new(0.0, 0.0),
//!     TweenSlot::new(),
//!     Script::new("hello").on_start(hello_start),
//! ));
//! ```

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::{debug, error, warn};
use std::fmt;
use thiserror::Error;

use crate::components::animation::AnimationPlayer;
use crate::components::mapposition::MapPosition;
use crate::components::patrol::Patrol;
use crate::components::playercontrol::PlayerControl;
use crate::components::timer::{ScriptTimers, TimerCallback, TimerId};
use crate::components::tween::{Easing, Tween, TweenSlot};
use crate::resources::input::{Direction, InputState};
use crate::resources::viewport::Viewport;

/// Host-contract violations raised by behavior hooks.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("entity {0:?} has no position to move")]
    MissingPosition(Entity),
    #[error("entity {0:?} has no tween slot")]
    MissingTweenSlot(Entity),
    #[error("entity {0:?} has no timer list")]
    MissingTimers(Entity),
    #[error("entity {0:?} has no {1} state")]
    MissingBehaviorState(Entity, &'static str),
    #[error("update called on script '{script}' before start")]
    NotStarted { script: String },
}

/// Context passed to script hooks and tween completion hooks.
///
/// Bundles references to the queries and resources a behavior may touch so
/// hooks never need direct world access.
pub struct ScriptContext<'a, 'w, 's> {
    pub positions: &'a mut Query<'w, 's, &'static mut MapPosition>,
    pub tweens: &'a mut Query<'w, 's, &'static mut TweenSlot>,
    pub animations: &'a mut Query<'w, 's, &'static mut AnimationPlayer>,
    pub patrols: &'a mut Query<'w, 's, &'static mut Patrol>,
    pub players: &'a Query<'w, 's, &'static PlayerControl>,
    pub timers: &'a mut Query<'w, 's, &'static mut ScriptTimers>,
    /// Deferred structural changes, applied after the running system.
    pub commands: &'a mut Commands<'w, 's>,
    /// `None` when the host provides no input capability.
    pub input: Option<&'a InputState>,
    /// `None` when the host provides no viewport capability.
    pub viewport: Option<&'a mut Viewport>,
}

/// Function pointer type for `start` hooks and tween completion hooks.
pub type ScriptHook =
    for<'a, 'w, 's> fn(Entity, &mut ScriptContext<'a, 'w, 's>) -> Result<(), ScriptError>;

/// Function pointer type for repeating timer callbacks. Returning `Ok(false)`
/// cancels the timer.
pub type IntervalHook =
    for<'a, 'w, 's> fn(Entity, &mut ScriptContext<'a, 'w, 's>) -> Result<bool, ScriptError>;

/// Function pointer type for per-frame `update` hooks. The `f32` is the
/// entity's scaled frame delta in seconds.
pub type UpdateHook =
    for<'a, 'w, 's> fn(Entity, f32, &mut ScriptContext<'a, 'w, 's>) -> Result<(), ScriptError>;

impl ScriptContext<'_, '_, '_> {
    /// Current position of `entity`.
    pub fn position(&self, entity: Entity) -> Result<Vec2, ScriptError> {
        self.positions
            .get(entity)
            .map(|p| p.pos)
            .map_err(|_| ScriptError::MissingPosition(entity))
    }

    pub fn set_position(&mut self, entity: Entity, pos: Vec2) -> Result<(), ScriptError> {
        let mut position = self
            .positions
            .get_mut(entity)
            .map_err(|_| ScriptError::MissingPosition(entity))?;
        position.pos = pos;
        Ok(())
    }

    /// Start a movement tween from the entity's current position to `dest`.
    ///
    /// Any tween already attached to the entity is replaced and its hook is
    /// abandoned. Unknown easing names fall back to `lerp`. A non-positive
    /// duration completes on the next advance.
    pub fn move_to(
        &mut self,
        entity: Entity,
        dest: Vec2,
        duration_ms: f32,
        easing_name: &str,
        on_complete: Option<ScriptHook>,
    ) -> Result<(), ScriptError> {
        let from = self.position(entity)?;
        let easing = Easing::from_name(easing_name).unwrap_or_else(|| {
            error!("move_to: Unknown value for easing '{}'", easing_name);
            Easing::Linear
        });
        let mut tween = Tween::from_millis(from, dest, duration_ms).with_easing(easing);
        tween.on_complete = on_complete;

        let mut slot = self
            .tweens
            .get_mut(entity)
            .map_err(|_| ScriptError::MissingTweenSlot(entity))?;
        if slot.attach(tween).is_some() {
            debug!("move_to: abandoning in-flight tween on {:?}", entity);
        }
        debug!(
            "starting tween on {:?}: {:?} -> {:?} over {}ms ({})",
            entity,
            from,
            dest,
            duration_ms,
            easing.name()
        );
        Ok(())
    }

    /// Ask the entity's animation player to loop `clip`, stopping its other
    /// clips.
    pub fn play_animation(&mut self, entity: Entity, clip: &str) {
        self.play_animation_with(entity, clip, true);
    }

    /// Loop `clip`; the other clips keep running unless `stop_others` is set.
    pub fn play_animation_with(&mut self, entity: Entity, clip: &str, stop_others: bool) {
        match self.animations.get_mut(entity) {
            Ok(mut player) => player.play_with(clip, stop_others),
            Err(_) => warn!("play_animation: {:?} has no animation player", entity),
        }
    }

    /// Stop one clip on the entity's animation player.
    pub fn stop_animation(&mut self, entity: Entity, clip: &str) {
        match self.animations.get_mut(entity) {
            Ok(mut player) => player.stop(clip),
            Err(_) => warn!("stop_animation: {:?} has no animation player", entity),
        }
    }

    /// Stop every clip on the entity's animation player.
    pub fn stop_all_animations(&mut self, entity: Entity) {
        match self.animations.get_mut(entity) {
            Ok(mut player) => player.stop_all(),
            Err(_) => warn!("stop_all_animations: {:?} has no animation player", entity),
        }
    }

    fn schedule_timer(
        &mut self,
        entity: Entity,
        delay_ms: f32,
        callback: TimerCallback,
    ) -> Result<TimerId, ScriptError> {
        let mut timers = self
            .timers
            .get_mut(entity)
            .map_err(|_| ScriptError::MissingTimers(entity))?;
        let id = timers.schedule(delay_ms, callback);
        debug!("timer {:?} on {:?} due in {}ms", id, entity, delay_ms);
        Ok(id)
    }

    /// Run `hook` once, `delay_ms` milliseconds from now.
    pub fn delay(
        &mut self,
        entity: Entity,
        delay_ms: f32,
        hook: ScriptHook,
    ) -> Result<TimerId, ScriptError> {
        self.schedule_timer(entity, delay_ms, TimerCallback::Once(hook))
    }

    /// Run `hook` every `period_ms` milliseconds while it returns `Ok(true)`.
    pub fn interval(
        &mut self,
        entity: Entity,
        period_ms: f32,
        hook: IntervalHook,
    ) -> Result<TimerId, ScriptError> {
        self.schedule_timer(entity, period_ms, TimerCallback::Repeat(hook))
    }

    /// Drop a pending timer. Returns whether it was still scheduled.
    pub fn cancel(&mut self, entity: Entity, id: TimerId) -> bool {
        self.timers
            .get_mut(entity)
            .is_ok_and(|mut timers| timers.cancel(id))
    }

    /// Despawn `entity` once the running system finishes.
    pub fn destroy(&mut self, entity: Entity) {
        debug!("destroy requested for {:?}", entity);
        self.commands.entity(entity).despawn();
    }

    /// Whether `direction` is held this frame. Without an input capability
    /// nothing is pressed.
    pub fn is_direction_pressed(&self, direction: Direction) -> bool {
        self.input
            .is_some_and(|input| input.is_direction_pressed(direction))
    }

    /// Make the viewport track `entity`.
    pub fn follow(&mut self, entity: Entity) {
        match self.viewport.as_deref_mut() {
            Some(viewport) => viewport.follow(entity),
            None => warn!("follow: no viewport available for {:?}", entity),
        }
    }
}

/// Behavior binding for an entity.
///
/// # Fields
///
/// - `name` – script name used in logs (e.g. `"elk"`)
/// - `on_start` – one-shot initialization hook
/// - `on_update` – per-frame hook; entities without it never have their
///   tweens advanced unless the scheduler is configured otherwise
/// - `time_scale` – multiplier applied to the frame delta for this entity
#[derive(Component, Clone)]
pub struct Script {
    pub name: String,
    pub on_start: Option<ScriptHook>,
    pub on_update: Option<UpdateHook>,
    pub time_scale: f32,
    pub started: bool,
    /// Cleared when a hook fails; a disabled script is never called again.
    pub enabled: bool,
}

impl Script {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            on_start: None,
            on_update: None,
            time_scale: 1.0,
            started: false,
            enabled: true,
        }
    }

    pub fn on_start(mut self, hook: ScriptHook) -> Self {
        self.on_start = Some(hook);
        self
    }

    pub fn on_update(mut self, hook: UpdateHook) -> Self {
        self.on_update = Some(hook);
        self
    }

    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }

    pub fn has_update(&self) -> bool {
        self.on_update.is_some()
    }

    /// Mark the script started and hand out its start hook.
    ///
    /// Returns `None` on every call after the first.
    pub fn begin(&mut self) -> Option<Option<ScriptHook>> {
        if self.started {
            return None;
        }
        self.started = true;
        Some(self.on_start)
    }

    /// The update hook, refusing to hand it out before `start` ran.
    pub fn update_hook(&self) -> Result<Option<UpdateHook>, ScriptError> {
        if !self.started {
            return Err(ScriptError::NotStarted {
                script: self.name.clone(),
            });
        }
        Ok(self.on_update)
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Script")
            .field("name", &self.name)
            .field("on_start", &self.on_start.is_some())
            .field("on_update", &self.on_update.is_some())
            .field("time_scale", &self.time_scale)
            .field("started", &self.started)
            .field("enabled", &self.enabled)
            .finish()
    }
}
