//! Viewport follow system.
//!
//! Re-centres the [`Viewport`] on its follow target every frame. A target that
//! no longer has a position (for example because it was despawned) is dropped.
use bevy_ecs::prelude::*;
use log::debug;

use crate::components::mapposition::MapPosition;
use crate::resources::viewport::Viewport;

/// Centre the viewport on the entity it follows.
pub fn viewport_follow_system(
    viewport: Option<ResMut<Viewport>>,
    positions: Query<&MapPosition>,
) {
    let Some(mut viewport) = viewport else {
        return;
    };
    let Some(target) = viewport.target else {
        return;
    };
    match positions.get(target) {
        Ok(position) => viewport.center_on(position.pos),
        Err(_) => {
            debug!("viewport target {:?} is gone, no longer following", target);
            viewport.target = None;
        }
    }
}
