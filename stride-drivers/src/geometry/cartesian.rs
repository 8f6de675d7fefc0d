//! Cartesian geometry: one motor per logical axis

use stride_core::config::MachineConfig;
use stride_core::traits::GeometricModel;
use stride_core::MAX_AXES;

use crate::math::round_to_i32;

/// Independent linear scaling per axis
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cartesian {
    steps_per_unit: [f32; MAX_AXES],
    dimension: usize,
}

impl Cartesian {
    /// Create from per-axis resolutions; extra entries are ignored
    pub fn new(steps_per_unit: &[f32]) -> Self {
        let dimension = steps_per_unit.len().min(MAX_AXES);
        let mut scale = [1.0; MAX_AXES];
        scale[..dimension].copy_from_slice(&steps_per_unit[..dimension]);
        Self {
            steps_per_unit: scale,
            dimension,
        }
    }

    /// Build from a machine configuration
    pub fn from_config(config: &MachineConfig) -> Self {
        let mut scale = [1.0; MAX_AXES];
        for (slot, axis) in scale.iter_mut().zip(config.axes.iter()) {
            *slot = axis.steps_per_unit;
        }
        Self {
            steps_per_unit: scale,
            dimension: config.dimension(),
        }
    }

    /// Number of axes
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Resolution of one axis
    pub fn steps_per_unit(&self, axis: usize) -> f32 {
        self.steps_per_unit[axis]
    }
}

impl GeometricModel for Cartesian {
    fn control_to_actuation(&self, control: &[f32], actuation: &mut [i32]) {
        for ((a, c), scale) in actuation.iter_mut().zip(control).zip(&self.steps_per_unit) {
            *a = round_to_i32(*c * *scale);
        }
    }

    fn actuation_to_control(&self, actuation: &[i32], control: &mut [f32]) {
        for ((c, a), scale) in control.iter_mut().zip(actuation).zip(&self.steps_per_unit) {
            *c = *a as f32 / *scale;
        }
    }
}
