//! Input-driven movement component.
//!
//! [`PlayerControl`] marks an entity steered by the four directional inputs.
//! The per-frame logic lives in [`crate::scripts::player`].

use bevy_ecs::prelude::Component;

/// Distance units per second.
pub const PLAYER_VELOCITY: f32 = 120.0;
/// Applied to both axes when moving diagonally.
pub const DIAGONAL_FACTOR: f32 = 0.66;

#[derive(Component, Clone, Copy, Debug)]
pub struct PlayerControl {
    pub velocity: f32,
    pub diagonal_factor: f32,
}

impl Default for PlayerControl {
    fn default() -> Self {
        Self {
            velocity: PLAYER_VELOCITY,
            diagonal_factor: DIAGONAL_FACTOR,
        }
    }
}
