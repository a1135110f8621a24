//! Engine systems.
//!
//! This module groups all ECS systems that advance the simulation.
//!
//! Submodules overview
//! - [`animation`] – animation state selection and clip playback
//! - [`input`] – copy host-side input into [`crate::resources::input::InputState`]
//! - [`script`] – entity update scheduler: start hooks, tween advance, update hooks
//! - [`time`] – update simulation time and delta
//! - [`timer`] – fire due script timer callbacks, used by the scheduler
//! - [`tween`] – tween engine used by the scheduler
//! - [`viewport`] – keep the viewport centred on its follow target

pub mod animation;
pub mod input;
pub mod script;
pub mod time;
pub mod timer;
pub mod tween;
pub mod viewport;
