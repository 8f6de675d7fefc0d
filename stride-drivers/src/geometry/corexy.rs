//! CoreXY geometry
//!
//! Motors A and B share a crossed belt: `A = X + Y`, `B = X - Y`. Every
//! axis after the first two is driven directly, as on a Cartesian machine.

use stride_core::config::MachineConfig;
use stride_core::traits::GeometricModel;

use crate::geometry::Cartesian;
use crate::math::round_to_i32;

/// Crossed-belt XY stage with direct-drive remaining axes
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CoreXy {
    direct: Cartesian,
}

impl CoreXy {
    /// Create from per-motor resolutions (A, B, then direct axes)
    pub fn new(steps_per_unit: &[f32]) -> Self {
        Self {
            direct: Cartesian::new(steps_per_unit),
        }
    }

    /// Build from a machine configuration
    pub fn from_config(config: &MachineConfig) -> Self {
        Self {
            direct: Cartesian::from_config(config),
        }
    }
}

impl GeometricModel for CoreXy {
    fn control_to_actuation(&self, control: &[f32], actuation: &mut [i32]) {
        self.direct.control_to_actuation(control, actuation);
        if control.len() < 2 || actuation.len() < 2 {
            return;
        }

        let (x, y) = (control[0], control[1]);
        actuation[0] = round_to_i32((x + y) * self.direct.steps_per_unit(0));
        actuation[1] = round_to_i32((x - y) * self.direct.steps_per_unit(1));
    }

    fn actuation_to_control(&self, actuation: &[i32], control: &mut [f32]) {
        self.direct.actuation_to_control(actuation, control);
        if control.len() < 2 || actuation.len() < 2 {
            return;
        }

        let a = actuation[0] as f32 / self.direct.steps_per_unit(0);
        let b = actuation[1] as f32 / self.direct.steps_per_unit(1);
        control[0] = (a + b) * 0.5;
        control[1] = (a - b) * 0.5;
    }
}
