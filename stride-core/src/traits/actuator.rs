//! Per-axis physical limits
//!
//! An actuator model knows how fast one axis can travel. It exposes two
//! optional capabilities; the defaults mean "no constraint" and "cannot be
//! corrected" respectively.

use crate::interval::TimeInterval;
use crate::state::MachineState;

/// Physical envelope of a single axis
pub trait ActuatorModel<X> {
    /// Duration window for moving this axis by `distance` native units
    ///
    /// Returning `None` marks the axis as physically unconstrained; the
    /// pipeline substitutes [`TimeInterval::largest`].
    fn duration_for(&self, distance: i32, current: &MachineState<X>) -> Option<TimeInterval> {
        let _ = (distance, current);
        None
    }

    /// Closest achievable distance when the movement must take `duration`
    ///
    /// Returning `None` means this axis never has its distance corrected;
    /// its window then stays invalid for the rest of the pipeline.
    fn min_distance_for(&self, duration: f32, distance: i32) -> Option<i32> {
        let _ = (duration, distance);
        None
    }
}

/// Axis with no physical limits at all
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Unconstrained;

impl<X> ActuatorModel<X> for Unconstrained {}
