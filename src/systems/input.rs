//! Input systems.
//!
//! - [`drive_input_system`] copies the directions held by the host-side
//!   [`InputDriver`] into [`InputState`] each frame, before scripts run, and
//!   logs press/release edges.
use bevy_ecs::prelude::*;
use log::debug;

use crate::resources::input::{Direction, InputDriver, InputState};
use crate::resources::worldtime::WorldTime;

/// Feed this frame's held directions into the `InputState` resource.
///
/// Does nothing when either resource is missing.
pub fn drive_input_system(
    time: Res<WorldTime>,
    driver: Option<ResMut<InputDriver>>,
    input: Option<ResMut<InputState>>,
) {
    let (Some(mut driver), Some(mut input)) = (driver, input) else {
        return;
    };
    let held = driver.tick(time.delta);
    input.set_held(held);
    for direction in Direction::ALL {
        let state = input.state(direction);
        if state.just_pressed {
            debug!("input: {} pressed", direction);
        } else if state.just_released {
            debug!("input: {} released", direction);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_feeds_input_state() {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        world.insert_resource(InputState::default());
        world.insert_resource(InputDriver::fixed(vec![Direction::Up]));

        let mut schedule = Schedule::default();
        schedule.add_systems(drive_input_system);
        schedule.run(&mut world);
        let input = world.resource::<InputState>();
        assert!(input.is_direction_pressed(Direction::Up));
        assert!(input.direction_up.just_pressed);

        schedule.run(&mut world);
        assert!(!world.resource::<InputState>().direction_up.just_pressed);
    }
}
