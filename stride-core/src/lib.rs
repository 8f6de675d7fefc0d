//! Board-agnostic motion computation core
//!
//! This crate turns logical movement requests into committed, per-axis
//! actuation targets with one consensus duration:
//!
//! - Duration window algebra
//! - Capability traits (actuator, geometry, pipeline plug-ins)
//! - Double-buffered machine state
//! - Motion controller registry
//! - The nine-stage movement pipeline
//! - Configuration type definitions
//!
//! Nothing here allocates or blocks; every buffer is sized at construction.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// Must come first so the logging macros are visible to every module
mod fmt;

pub mod config;
pub mod controller;
pub mod error;
pub mod interval;
pub mod motion;
pub mod request;
pub mod state;
pub mod traits;

pub use controller::{HookCounts, MotionController, MAX_HOOKS};
pub use error::{InitError, NotReady, Registrable, RegistrationError};
pub use interval::TimeInterval;
pub use motion::{Computation, MotionCore};
pub use request::MovementRequest;
pub use state::{MachineState, StatePair, StateStatus, MAX_AXES};
