//! ECS resources made available to systems.
//!
//! This module groups the long-lived data injected into the ECS world and
//! accessed by systems and scripts during execution. Each submodule documents
//! the semantics and intended usage of its resource(s).
//!
//! Overview
//! - `gameconfig` – simulation and scheduler settings loaded from INI
//! - `input` – per-frame state of the four directional inputs
//! - `scene` – JSON description of the entities to spawn
//! - `viewport` – camera window and the entity it follows
//! - `worldtime` – simulation time and delta
pub mod gameconfig;
pub mod input;
pub mod scene;
pub mod viewport;
pub mod worldtime;
