//! Patrol behavior state.
//!
//! A patrolling entity walks back and forth along the x axis forever:
//!
//! ```text
//! Idle --start--> MovingLeft <--leg complete--> MovingRight
//! ```
//!
//! Each transition is driven by a "leg complete" event, raised when the
//! movement tween of the previous leg finishes (or once by `start`). The state
//! lives on the entity, so every patrolling entity turns independently.
//! The hooks driving it are in [`crate::scripts::elk`].

use bevy_ecs::prelude::Component;

/// Distance units per second.
pub const PATROL_VELOCITY: f32 = 60.0;
/// Duration of one leg in seconds.
pub const PATROL_MOVE_LENGTH: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PatrolState {
    /// Not started yet.
    #[default]
    Idle,
    MovingLeft,
    MovingRight,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct Patrol {
    pub state: PatrolState,
    /// Toggled before every leg; the first leg therefore goes left.
    pub flipped: bool,
    pub velocity: f32,
    pub move_length: f32,
    /// Legs finished so far.
    pub legs_completed: u32,
}

impl Default for Patrol {
    fn default() -> Self {
        Self::new()
    }
}

impl Patrol {
    pub fn new() -> Self {
        Self {
            state: PatrolState::Idle,
            flipped: false,
            velocity: PATROL_VELOCITY,
            move_length: PATROL_MOVE_LENGTH,
            legs_completed: 0,
        }
    }

    /// Distance covered by one leg.
    pub fn leg_distance(&self) -> f32 {
        self.velocity * self.move_length
    }

    /// Leg duration in milliseconds.
    pub fn leg_millis(&self) -> f32 {
        self.move_length * 1000.0
    }

    /// Handle a "leg complete" event and return the state of the next leg.
    pub fn on_leg_complete(&mut self) -> PatrolState {
        if self.state != PatrolState::Idle {
            self.legs_completed += 1;
        }
        self.flipped = !self.flipped;
        self.state = if self.flipped {
            PatrolState::MovingLeft
        } else {
            PatrolState::MovingRight
        };
        self.state
    }

    /// Signed x displacement for the current leg.
    pub fn leg_offset(&self) -> f32 {
        match self.state {
            PatrolState::MovingLeft => -self.leg_distance(),
            PatrolState::MovingRight => self.leg_distance(),
            PatrolState::Idle => 0.0,
        }
    }
}
