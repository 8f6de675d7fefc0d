//! Toolhead kinematics plug-ins
//!
//! A small acceleration-aware planner built entirely from pipeline hooks:
//!
//! - [`PathLengthBuilder`] measures the move and its direction
//! - [`JunctionSpeedBuilder`] caps the entry speed at corners
//! - [`AccelerationLimit`] turns length and entry speed into a duration window
//! - [`ExitSpeedHook`] records the speed the move ends at for the next one
//!
//! Only the first `axes` logical axes make up the toolhead path; anything
//! after them (an extruder, say) is carried along by the per-axis models.

pub mod acceleration;
pub mod exit;
pub mod path;

pub use acceleration::AccelerationLimit;
pub use exit::ExitSpeedHook;
pub use path::{JunctionSpeedBuilder, PathLengthBuilder};

use stride_core::MAX_AXES;

/// Number of leading axes that form the toolhead path on a typical machine
pub const TOOLHEAD_AXES: usize = 3;

/// Persistent per-state kinematic fields
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionExt {
    /// Toolhead speed at the end of the committed move
    pub exit_speed: f32,
    /// Unit direction of the last move that travelled
    pub direction: [f32; MAX_AXES],
}

/// Per-movement kinematic scratch
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MoveScratch {
    /// Euclidean toolhead travel in logical units
    pub path_length: f32,
    /// Speed the move may start at
    pub entry_speed: f32,
    /// Unit direction of travel, zero for a stationary toolhead
    pub direction: [f32; MAX_AXES],
}
