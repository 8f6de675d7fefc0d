//! Configuration types
//!
//! Board-agnostic machine description used to build the actuator,
//! geometry and kinematic models of a controller.

pub mod machine;

pub use machine::*;
