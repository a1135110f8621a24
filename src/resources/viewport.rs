//! Shared viewport (camera) resource.
//!
//! The viewport is a window of `size` units whose top-left corner sits at
//! `position` in world space. Scripts call
//! [`ScriptContext::follow`](crate::components::script::ScriptContext::follow)
//! to pick the entity it tracks; the
//! [`viewport_follow_system`](crate::systems::viewport::viewport_follow_system)
//! re-centres it on that entity every frame until reassigned.

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::debug;

#[derive(Resource, Debug, Clone, Copy)]
pub struct Viewport {
    /// Top-left corner in world space.
    pub position: Vec2,
    pub size: Vec2,
    /// Entity being tracked, if any.
    pub target: Option<Entity>,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            size: Vec2::new(width, height),
            target: None,
        }
    }

    pub fn follow(&mut self, entity: Entity) {
        debug!("viewport now follows {:?}", entity);
        self.target = Some(entity);
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    pub fn center_on(&mut self, point: Vec2) {
        self.position = point - self.size * 0.5;
    }
}
