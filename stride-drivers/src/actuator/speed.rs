//! Top-speed limited axis
//!
//! The usual stepper axis: any duration is acceptable as long as the step
//! rate stays under the configured maximum.

use stride_core::config::AxisConfig;
use stride_core::traits::ActuatorModel;
use stride_core::{MachineState, TimeInterval};

use crate::math::{abs, floor_to_i32};

/// Axis bounded by a maximum step rate
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpeedLimitedAxis {
    /// Maximum native steps per second
    max_steps_per_s: f32,
    /// Whether distances may be clamped to fit an imposed duration
    correctable: bool,
}

impl SpeedLimitedAxis {
    /// Create a correctable axis
    pub fn new(max_steps_per_s: f32) -> Self {
        Self {
            max_steps_per_s,
            correctable: true,
        }
    }

    /// Create an axis whose distance must never be altered
    pub fn fixed(max_steps_per_s: f32) -> Self {
        Self {
            max_steps_per_s,
            correctable: false,
        }
    }

    /// Build from an axis configuration
    pub fn from_config(config: &AxisConfig) -> Self {
        Self {
            max_steps_per_s: config.max_steps_per_second(),
            correctable: config.correctable,
        }
    }

    /// Maximum native steps per second
    pub fn max_steps_per_s(&self) -> f32 {
        self.max_steps_per_s
    }
}

impl<X> ActuatorModel<X> for SpeedLimitedAxis {
    fn duration_for(&self, distance: i32, _current: &MachineState<X>) -> Option<TimeInterval> {
        if distance == 0 {
            return Some(TimeInterval::empty());
        }
        if !(self.max_steps_per_s > 0.0) {
            // A stalled axis cannot move at all
            let mut window = TimeInterval::largest();
            window.valid = false;
            return Some(window);
        }
        Some(TimeInterval::at_least(abs(distance as f32) / self.max_steps_per_s))
    }

    fn min_distance_for(&self, duration: f32, distance: i32) -> Option<i32> {
        if !self.correctable {
            return None;
        }
        let reach = floor_to_i32(self.max_steps_per_s * duration);
        Some(distance.clamp(-reach, reach))
    }
}
