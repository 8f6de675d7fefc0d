//! Axis with both a top and a bottom speed
//!
//! Extruders and similar feeders misbehave below a minimum rate, so a move
//! on such an axis may not be stretched arbitrarily: its duration window is
//! bounded on both sides.

use stride_core::config::AxisConfig;
use stride_core::traits::ActuatorModel;
use stride_core::{MachineState, TimeInterval};

use crate::math::{abs, ceil_to_i32, floor_to_i32};

/// Axis whose step rate must stay inside `[min, max]` while moving
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpeedWindowAxis {
    min_steps_per_s: f32,
    max_steps_per_s: f32,
    correctable: bool,
}

impl SpeedWindowAxis {
    /// Create a correctable axis with the given step-rate range
    pub fn new(min_steps_per_s: f32, max_steps_per_s: f32) -> Self {
        Self {
            min_steps_per_s,
            max_steps_per_s,
            correctable: true,
        }
    }

    /// Build from an axis configuration
    pub fn from_config(config: &AxisConfig) -> Self {
        Self {
            min_steps_per_s: config.min_steps_per_second(),
            max_steps_per_s: config.max_steps_per_second(),
            correctable: config.correctable,
        }
    }
}

impl<X> ActuatorModel<X> for SpeedWindowAxis {
    fn duration_for(&self, distance: i32, _current: &MachineState<X>) -> Option<TimeInterval> {
        if distance == 0 {
            return Some(TimeInterval::empty());
        }

        let steps = abs(distance as f32);
        let fastest = steps / self.max_steps_per_s;
        if self.min_steps_per_s > 0.0 {
            Some(TimeInterval::bounded(fastest, steps / self.min_steps_per_s))
        } else {
            Some(TimeInterval::at_least(fastest))
        }
    }

    fn min_distance_for(&self, duration: f32, distance: i32) -> Option<i32> {
        if !self.correctable {
            return None;
        }
        if distance == 0 {
            return Some(0);
        }

        let longest = floor_to_i32(self.max_steps_per_s * duration);
        let shortest = ceil_to_i32(self.min_steps_per_s * duration).min(longest);
        let steps = distance.unsigned_abs().min(i32::MAX as u32) as i32;
        let fitted = steps.clamp(shortest, longest);

        Some(if distance < 0 { -fitted } else { fitted })
    }
}
