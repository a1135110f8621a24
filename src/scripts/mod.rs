//! Behavior scripts bound to entities through
//! [`Script`](crate::components::script::Script).
//!
//! - [`elk`] – autonomous patrol walking left and right forever
//! - [`player`] – movement driven by the four directional inputs
pub mod elk;
pub mod player;
