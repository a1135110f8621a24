//! Entity update scheduler.
//!
//! This module drives the [`Script`] lifecycle:
//!
//! - [`script_start_system`] – runs each script's `start` hook exactly once
//! - [`script_update_system`] – per entity, advances its movement tween,
//!   runs its `update(dt)` hook and then its due timer callbacks
//!
//! # System Ordering
//!
//! These systems should run in order:
//! 1. `script_start_system` – start anything spawned since the last tick
//! 2. `script_update_system` – per-frame movement and behavior logic
//!
//! # Tween gating
//!
//! By default tweens and callback timers only advance for entities whose
//! script defines an `update` hook; a script relying purely on completion
//! hooks or timers stalls after its first tween and never sees a timer fire.
//! Setting [`GameConfig::advance_tweens_without_update`] advances every
//! entity's tween and timers instead. The policy applies to all entities
//! alike.
//!
//! # Failures
//!
//! A hook (or completion or timer callback) returning an error is logged and its script is
//! disabled; it is never called again. Other entities keep running.

use bevy_ecs::prelude::*;
use bevy_ecs::system::SystemParam;
use log::{debug, error};

use crate::components::animation::AnimationPlayer;
use crate::components::mapposition::MapPosition;
use crate::components::patrol::Patrol;
use crate::components::playercontrol::PlayerControl;
use crate::components::script::{Script, ScriptContext, ScriptHook, UpdateHook};
use crate::components::timer::ScriptTimers;
use crate::components::tween::TweenSlot;
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::InputState;
use crate::resources::viewport::Viewport;
use crate::resources::worldtime::WorldTime;
use crate::systems::timer::advance_entity_timers;
use crate::systems::tween::advance_entity_tween;

/// Bundled system parameters for script hook execution.
///
/// This [`SystemParam`] aggregates the queries and resources needed to
/// construct a [`ScriptContext`] for hook invocation.
#[derive(SystemParam)]
pub struct ScriptRunnerContext<'w, 's> {
    pub positions: Query<'w, 's, &'static mut MapPosition>,
    pub tweens: Query<'w, 's, &'static mut TweenSlot>,
    pub animations: Query<'w, 's, &'static mut AnimationPlayer>,
    pub patrols: Query<'w, 's, &'static mut Patrol>,
    pub players: Query<'w, 's, &'static PlayerControl>,
    pub timers: Query<'w, 's, &'static mut ScriptTimers>,
    pub commands: Commands<'w, 's>,
    pub input: Option<Res<'w, InputState>>,
    pub viewport: Option<ResMut<'w, Viewport>>,
}

impl<'w, 's> ScriptRunnerContext<'w, 's> {
    /// Borrow a [`ScriptContext`] for one hook call.
    pub fn context(&mut self) -> ScriptContext<'_, 'w, 's> {
        ScriptContext {
            positions: &mut self.positions,
            tweens: &mut self.tweens,
            animations: &mut self.animations,
            patrols: &mut self.patrols,
            players: &self.players,
            timers: &mut self.timers,
            commands: &mut self.commands,
            input: self.input.as_deref(),
            viewport: self.viewport.as_deref_mut(),
        }
    }
}

fn disable_scripts(scripts: &mut Query<(Entity, &mut Script)>, failed: Vec<Entity>) {
    for entity in failed {
        if let Ok((_, mut script)) = scripts.get_mut(entity) {
            script.enabled = false;
        }
    }
}

/// Run the `start` hook of every script that has not started yet.
///
/// A script counts as started even when it has no `start` hook, so its
/// `update` hook becomes callable.
pub fn script_start_system(
    mut scripts: Query<(Entity, &mut Script)>,
    mut context: ScriptRunnerContext,
) {
    // Vec to avoid borrowing issues. Here we collect all the pending starts
    let mut starts: Vec<(Entity, String, ScriptHook)> = Vec::new();
    for (entity, mut script) in scripts.iter_mut() {
        if !script.enabled {
            continue;
        }
        match script.begin() {
            Some(Some(hook)) => starts.push((entity, script.name.clone(), hook)),
            Some(None) if !script.has_update() => {
                debug!(target: "script", "'{}' on {:?} has no hooks", script.name, entity);
            }
            _ => {}
        }
    }

    let mut failed = Vec::new();
    for (entity, name, hook) in starts {
        debug!(target: "script", "start() for '{}' on {:?}", name, entity);
        if let Err(e) = hook(entity, &mut context.context()) {
            error!(target: "script", "start() call failed in '{}' - {}", name, e);
            failed.push(entity);
        }
    }
    disable_scripts(&mut scripts, failed);
}

/// Advance tweens, run `update(dt)` hooks and fire timers for every enabled
/// script.
///
/// For each entity, the tween advance happens before its `update` hook in the
/// same tick, and due timer callbacks run after it. All three receive the
/// world delta multiplied by the script's `time_scale`.
pub fn script_update_system(
    time: Res<WorldTime>,
    config: Option<Res<GameConfig>>,
    mut scripts: Query<(Entity, &mut Script)>,
    mut context: ScriptRunnerContext,
) {
    let defaults = GameConfig::new();
    let config = config.as_deref().unwrap_or(&defaults);
    let advance_all = config.advance_tweens_without_update;
    let max_completions = config.max_completions_per_tick.max(1);
    let dt = time.delta.max(0.0);

    let mut runs: Vec<(Entity, String, f32, Option<UpdateHook>)> = Vec::new();
    let mut failed = Vec::new();
    for (entity, script) in scripts.iter() {
        if !script.enabled {
            continue;
        }
        match script.update_hook() {
            Ok(hook) => runs.push((entity, script.name.clone(), script.time_scale, hook)),
            Err(e) => {
                error!(target: "script", "{}", e);
                failed.push(entity);
            }
        }
    }

    for (entity, name, time_scale, hook) in runs {
        let scaled_dt = dt * time_scale;
        let ticking = hook.is_some() || advance_all;
        let mut ctx = context.context();

        if ticking {
            if let Err(e) = advance_entity_tween(entity, scaled_dt, max_completions, &mut ctx) {
                error!(target: "script", "tween callback failed in '{}' - {}", name, e);
                failed.push(entity);
                continue;
            }
        }

        if let Some(hook) = hook {
            if let Err(e) = hook(entity, scaled_dt, &mut ctx) {
                error!(target: "script", "update() call failed in '{}' - {}", name, e);
                failed.push(entity);
                continue;
            }
        }

        if ticking {
            if let Err(e) = advance_entity_timers(entity, scaled_dt, &mut ctx) {
                error!(target: "script", "timer callback failed in '{}' - {}", name, e);
                failed.push(entity);
            }
        }
    }
    disable_scripts(&mut scripts, failed);
}
