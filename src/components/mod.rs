//! ECS components for entities.
//!
//! This module groups all component types that can be attached to scripted
//! entities.
//!
//! Submodules overview:
//! - [`animation`] – clip player and the rule table selecting walk animations
//! - [`mapposition`] – world-space position for an entity
//! - [`patrol`] – per-entity state of the patrol behavior
//! - [`playercontrol`] – constants of the input-driven player behavior
//! - [`script`] – behavior hooks, the context handed to them, and script errors
//! - [`timer`] – one-shot and repeating callback timers scheduled by scripts
//! - [`tween`] – tweened interpolation and the per-entity tween slot

pub mod animation;
pub mod mapposition;
pub mod patrol;
pub mod playercontrol;
pub mod script;
pub mod timer;
pub mod tween;
