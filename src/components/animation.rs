//! Animation components.
//!
//! - [`AnimationPlayer`] – per-entity clip player. It stands in for the
//!   host's sprite animation capability: scripts ask it to loop named clips
//!   and stop one or all of them.
//! - [`AnimationState`] – movement-derived animation intent for one tick.
//! - [`AnimRule`] / [`WALK_RULES`] – ordered decision table mapping a velocity
//!   to an [`AnimationState`]; the first matching rule wins.
//!
//! See [`crate::systems::animation`] for selection and playback systems.

use bevy_ecs::prelude::Component;
use glam::Vec2;
use log::{debug, warn};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

/// Frame timing of a registered clip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipDef {
    pub frame_count: usize,
    pub fps: f32,
}

impl Default for ClipDef {
    fn default() -> Self {
        Self {
            frame_count: 4,
            fps: 8.0,
        }
    }
}

/// Playback state of one registered clip.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClipState {
    pub def: ClipDef,
    pub playing: bool,
    pub frame_index: usize,
    pub elapsed_time: f32,
}

impl ClipState {
    fn start(&mut self) {
        self.playing = true;
        self.frame_index = 0;
        self.elapsed_time = 0.0;
    }

    fn stop(&mut self) {
        self.playing = false;
        self.frame_index = 0;
        self.elapsed_time = 0.0;
    }
}

/// Clip player owned by an entity.
///
/// Every registered clip loops independently. [`play`](Self::play) starts a
/// clip and stops the others; [`play_with`](Self::play_with) can leave them
/// running. Asking for a clip that is already playing lets it continue
/// untouched, so repeated requests are harmless.
#[derive(Component, Debug, Clone, Default)]
pub struct AnimationPlayer {
    pub clips: FxHashMap<String, ClipState>,
    /// Play/stop requests received, including redundant ones.
    pub requests: u32,
    /// Unknown clip names already reported.
    warned: FxHashSet<String>,
}

impl AnimationPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clip(mut self, name: impl Into<String>, clip: ClipDef) -> Self {
        self.clips.insert(
            name.into(),
            ClipState {
                def: clip,
                ..ClipState::default()
            },
        );
        self
    }

    /// Register every name in `names` with default frame timing.
    pub fn with_clips<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.clips.insert(name.into(), ClipState::default());
        }
        self
    }

    /// Loop `clip` and stop every other clip.
    pub fn play(&mut self, clip: &str) {
        self.play_with(clip, true);
    }

    /// Loop `clip`, stopping the other clips only when `stop_others` is set.
    ///
    /// An unknown name plays nothing; with `stop_others` it still stops the
    /// rest.
    pub fn play_with(&mut self, clip: &str, stop_others: bool) {
        self.requests += 1;
        if !self.clips.contains_key(clip) && self.warned.insert(clip.to_string()) {
            warn!("Animation clip '{}' not registered", clip);
        }
        for (name, state) in self.clips.iter_mut() {
            if name == clip {
                if !state.playing {
                    state.start();
                }
            } else if stop_others {
                state.stop();
            }
        }
    }

    /// Stop one clip, leaving the others running.
    pub fn stop(&mut self, clip: &str) {
        self.requests += 1;
        match self.clips.get_mut(clip) {
            Some(state) => state.stop(),
            None => debug!("stop: animation clip '{}' not registered", clip),
        }
    }

    pub fn stop_all(&mut self) {
        self.requests += 1;
        for state in self.clips.values_mut() {
            state.stop();
        }
    }

    pub fn is_playing(&self, clip: &str) -> bool {
        self.clips.get(clip).is_some_and(|state| state.playing)
    }

    pub fn is_stopped(&self) -> bool {
        self.clips.values().all(|state| !state.playing)
    }

    /// Names of the clips currently looping, sorted.
    pub fn playing_clips(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .clips
            .iter()
            .filter(|(_, state)| state.playing)
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Frame shown by `clip`, if it is registered.
    pub fn frame_index(&self, clip: &str) -> Option<usize> {
        self.clips.get(clip).map(|state| state.frame_index)
    }
}

/// Movement-derived animation intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    WalkUp,
    WalkDown,
    WalkLeft,
    WalkRight,
    Idle,
}

impl AnimationState {
    /// Clip requested for this state; `None` means stop all clips.
    pub fn clip_name(self) -> Option<&'static str> {
        match self {
            AnimationState::WalkUp => Some("walk_up"),
            AnimationState::WalkDown => Some("walk_down"),
            AnimationState::WalkLeft => Some("walk_left"),
            AnimationState::WalkRight => Some("walk_right"),
            AnimationState::Idle => None,
        }
    }
}

/// Every clip a walking sprite registers.
pub const WALK_CLIPS: [&str; 4] = ["walk_up", "walk_down", "walk_left", "walk_right"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Negative,
    Positive,
}

/// Selects `state` when the velocity component on `axis` has `sign`.
#[derive(Debug, Clone, Copy)]
pub struct AnimRule {
    pub axis: Axis,
    pub sign: Sign,
    pub state: AnimationState,
}

impl AnimRule {
    pub fn matches(&self, velocity: Vec2) -> bool {
        let v = match self.axis {
            Axis::Horizontal => velocity.x,
            Axis::Vertical => velocity.y,
        };
        match self.sign {
            Sign::Negative => v < 0.0,
            Sign::Positive => v > 0.0,
        }
    }
}

/// Walk animation priority: vertical before horizontal, up before down,
/// left before right. No match means idle.
pub const WALK_RULES: [AnimRule; 4] = [
    AnimRule {
        axis: Axis::Vertical,
        sign: Sign::Negative,
        state: AnimationState::WalkUp,
    },
    AnimRule {
        axis: Axis::Vertical,
        sign: Sign::Positive,
        state: AnimationState::WalkDown,
    },
    AnimRule {
        axis: Axis::Horizontal,
        sign: Sign::Negative,
        state: AnimationState::WalkLeft,
    },
    AnimRule {
        axis: Axis::Horizontal,
        sign: Sign::Positive,
        state: AnimationState::WalkRight,
    },
];
