//! Acceleration constraint
//!
//! Under constant acceleration `a` from entry speed `v0`, covering length
//! `L` takes at least the time of accelerating the whole way:
//!
//! ```text
//! t_min = (sqrt(v0^2 + 2aL) - v0) / a
//! ```
//!
//! When `v0` is high enough to stop within `L`, decelerating the whole way
//! also gives an upper bound; any slower and the toolhead would have to
//! brake harder than `a` allows:
//!
//! ```text
//! t_max = (v0 - sqrt(v0^2 - 2aL)) / a     if v0^2 >= 2aL
//! ```

use stride_core::traits::KinematicConstraint;
use stride_core::{MachineState, TimeInterval};

use super::{MotionExt, MoveScratch};
use crate::math::sqrt;

/// Duration window imposed by the toolhead's maximum acceleration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccelerationLimit {
    max_acceleration: f32,
}

impl AccelerationLimit {
    pub fn new(max_acceleration: f32) -> Self {
        Self { max_acceleration }
    }

    /// Window for travelling `length` starting at `entry_speed`
    pub fn window(&self, length: f32, entry_speed: f32) -> TimeInterval {
        let a = self.max_acceleration;
        if !(length > 0.0) || !(a > 0.0) {
            return TimeInterval::largest();
        }

        let v0 = if entry_speed > 0.0 { entry_speed } else { 0.0 };
        let reach = 2.0 * a * length;
        let fastest = (sqrt(v0 * v0 + reach) - v0) / a;

        let braking = v0 * v0 - reach;
        if braking >= 0.0 {
            TimeInterval::bounded(fastest, (v0 - sqrt(braking)) / a)
        } else {
            TimeInterval::at_least(fastest)
        }
    }
}

impl KinematicConstraint<MotionExt, MoveScratch> for AccelerationLimit {
    fn duration_window(&self, _current: &MachineState<MotionExt>, scratch: &MoveScratch) -> TimeInterval {
        self.window(scratch.path_length, scratch.entry_speed)
    }
}
