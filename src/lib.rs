//! Critterscript library.
//!
//! This module exposes the scripted-entity core (tween engine, update
//! scheduler, animation selection and the patrol/player behaviors) as ECS
//! components, resources and systems for use in integration tests and as a
//! reusable library.

pub mod components;
pub mod game;
pub mod resources;
pub mod scripts;
pub mod systems;
