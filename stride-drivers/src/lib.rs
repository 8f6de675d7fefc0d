//! Model implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in stride-core for common machines:
//!
//! - Actuator models (speed-limited axis, speed-window axis)
//! - Geometries (Cartesian, CoreXY)
//! - Distance sources (relative steps, absolute target)
//! - Kinematics plug-ins (path length, junction speed, acceleration)
//! - A configured machine wiring all of it into a motion core

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod actuator;
pub mod distance;
pub mod geometry;
pub mod kinematics;
pub mod machine;
pub mod math;

pub use machine::{DistanceMode, Machine, MachineCore, MachineError};
