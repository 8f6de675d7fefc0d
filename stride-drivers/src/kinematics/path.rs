//! Path geometry builders

use stride_core::traits::BuilderHook;
use stride_core::{MachineState, MAX_AXES};

use super::{MotionExt, MoveScratch};
use crate::math::sqrt;

/// Cosine above which two directions count as a straight continuation
const STRAIGHT_COS: f32 = 0.9999;

/// Measures toolhead travel and seeds the entry speed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PathLengthBuilder {
    axes: usize,
}

impl PathLengthBuilder {
    /// Measure over the first `axes` logical axes
    pub fn new(axes: usize) -> Self {
        Self {
            axes: axes.min(MAX_AXES),
        }
    }
}

impl BuilderHook<MotionExt, MoveScratch> for PathLengthBuilder {
    fn build(
        &self,
        current: &MachineState<MotionExt>,
        next: &MachineState<MotionExt>,
        scratch: &mut MoveScratch,
    ) {
        let axes = self.axes.min(current.dimension());
        let mut delta = [0.0f32; MAX_AXES];
        let mut squared = 0.0;
        for ((d, to), from) in delta[..axes]
            .iter_mut()
            .zip(next.control())
            .zip(current.control())
        {
            *d = to - from;
            squared += *d * *d;
        }

        let length = sqrt(squared);
        scratch.path_length = length;
        scratch.direction = [0.0; MAX_AXES];
        if length > 0.0 {
            for (unit, d) in scratch.direction.iter_mut().zip(&delta[..axes]) {
                *unit = d / length;
            }
        }
        scratch.entry_speed = current.ext.exit_speed;
    }
}

/// Limits the entry speed through a change of direction
///
/// A full reversal may be taken at `max_junction_speed`; shallower corners
/// allow proportionally more, and a straight continuation is not limited.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JunctionSpeedBuilder {
    max_junction_speed: f32,
}

impl JunctionSpeedBuilder {
    pub fn new(max_junction_speed: f32) -> Self {
        Self { max_junction_speed }
    }

    /// Speed cap for a corner whose direction cosine is `cos`
    pub fn cap(&self, cos: f32) -> Option<f32> {
        if cos >= STRAIGHT_COS {
            return None;
        }
        let half_angle_sin = sqrt((1.0 - cos) * 0.5);
        Some(self.max_junction_speed / half_angle_sin)
    }
}

impl BuilderHook<MotionExt, MoveScratch> for JunctionSpeedBuilder {
    fn build(
        &self,
        current: &MachineState<MotionExt>,
        _next: &MachineState<MotionExt>,
        scratch: &mut MoveScratch,
    ) {
        let previous = &current.ext.direction;
        if scratch.path_length <= 0.0 || previous.iter().all(|c| *c == 0.0) {
            return;
        }

        let cos: f32 = previous
            .iter()
            .zip(&scratch.direction)
            .map(|(a, b)| a * b)
            .sum();

        if let Some(cap) = self.cap(cos) {
            if scratch.entry_speed > cap {
                scratch.entry_speed = cap;
            }
        }
    }
}
