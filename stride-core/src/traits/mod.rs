//! Capability traits
//!
//! These traits define the seams between the motion pipeline and the
//! machine-specific models plugged into it. Implementations live in
//! `stride-drivers` or in the embedding firmware.

pub mod actuator;
pub mod geometry;
pub mod plugin;

pub use actuator::{ActuatorModel, Unconstrained};
pub use geometry::GeometricModel;
pub use plugin::{BuilderHook, DistanceSource, KinematicConstraint, StateHook};
