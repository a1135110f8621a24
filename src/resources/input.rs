//! Per-frame directional input resource.
//!
//! Captures which of the four cardinal directions are held this frame and
//! exposes it to scripts through [`InputState::is_direction_pressed`]. The
//! host feeds it (see [`crate::systems::input`]); scripts only ever read it.
use bevy_ecs::prelude::*;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            other => Err(format!("unknown direction '{}'", other)),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Boolean key state for one direction.
pub struct BoolState {
    /// Whether the direction is currently held this frame.
    pub active: bool,
    /// Whether the direction was just pressed this frame.
    pub just_pressed: bool,
    /// Whether the direction was just released this frame.
    pub just_released: bool,
}

impl BoolState {
    /// Record this frame's held state, deriving the edge flags.
    pub fn set(&mut self, pressed: bool) {
        self.just_pressed = pressed && !self.active;
        self.just_released = !pressed && self.active;
        self.active = pressed;
    }
}

/// Resource capturing the per-frame directional input.
#[derive(Resource, Debug, Clone, Default)]
pub struct InputState {
    pub direction_up: BoolState,
    pub direction_down: BoolState,
    pub direction_left: BoolState,
    pub direction_right: BoolState,
}

impl InputState {
    pub fn state(&self, direction: Direction) -> &BoolState {
        match direction {
            Direction::Up => &self.direction_up,
            Direction::Down => &self.direction_down,
            Direction::Left => &self.direction_left,
            Direction::Right => &self.direction_right,
        }
    }

    pub fn state_mut(&mut self, direction: Direction) -> &mut BoolState {
        match direction {
            Direction::Up => &mut self.direction_up,
            Direction::Down => &mut self.direction_down,
            Direction::Left => &mut self.direction_left,
            Direction::Right => &mut self.direction_right,
        }
    }

    pub fn is_direction_pressed(&self, direction: Direction) -> bool {
        self.state(direction).active
    }

    pub fn set_direction(&mut self, direction: Direction, pressed: bool) {
        self.state_mut(direction).set(pressed);
    }

    /// Replace this frame's held set with exactly `held`.
    pub fn set_held(&mut self, held: &[Direction]) {
        for direction in Direction::ALL {
            self.set_direction(direction, held.contains(&direction));
        }
    }
}

/// Host-side source of directional input for headless runs.
///
/// Either holds a fixed set of directions, or (when seeded) picks a new random
/// combination every `change_every` seconds.
#[derive(Resource)]
pub struct InputDriver {
    pub held: Vec<Direction>,
    pub change_every: f32,
    rng: Option<fastrand::Rng>,
    since_change: f32,
}

impl InputDriver {
    pub fn fixed(held: Vec<Direction>) -> Self {
        Self {
            held,
            change_every: 0.0,
            rng: None,
            since_change: 0.0,
        }
    }

    pub fn random(seed: u64, change_every: f32) -> Self {
        Self {
            held: Vec::new(),
            change_every,
            rng: Some(fastrand::Rng::with_seed(seed)),
            since_change: change_every,
        }
    }

    pub fn is_random(&self) -> bool {
        self.rng.is_some()
    }

    /// Advance by `dt` seconds and return the directions held this frame.
    pub fn tick(&mut self, dt: f32) -> &[Direction] {
        if let Some(rng) = self.rng.as_mut() {
            self.since_change += dt;
            if self.since_change >= self.change_every {
                self.since_change = 0.0;
                self.held.clear();
                // 0 = neither, 1 = negative, 2 = positive, per axis
                match rng.usize(0..3) {
                    1 => self.held.push(Direction::Left),
                    2 => self.held.push(Direction::Right),
                    _ => {}
                }
                match rng.usize(0..3) {
                    1 => self.held.push(Direction::Up),
                    2 => self.held.push(Direction::Down),
                    _ => {}
                }
            }
        }
        &self.held
    }
}
