//! Exit speed bookkeeping

use stride_core::traits::StateHook;
use stride_core::{Computation, MachineState};

use super::{MotionExt, MoveScratch};

/// Records the speed and heading a move finishes with
///
/// Assumes constant acceleration over the committed duration `t`, so the
/// average speed `L / t` is the mean of entry and exit speeds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ExitSpeedHook;

impl ExitSpeedHook {
    /// Exit speed of a move of `length` entered at `entry_speed`
    pub fn exit_speed(length: f32, entry_speed: f32, duration: f32) -> f32 {
        if !(length > 0.0) || !(duration > 0.0) {
            return 0.0;
        }
        let exit = 2.0 * length / duration - entry_speed;
        if exit > 0.0 {
            exit
        } else {
            0.0
        }
    }
}

impl StateHook<MotionExt, MoveScratch> for ExitSpeedHook {
    fn finalize(
        &self,
        _current: &MachineState<MotionExt>,
        computation: &Computation<MoveScratch>,
        next: &mut MachineState<MotionExt>,
    ) {
        let scratch = &computation.controller;
        next.ext.exit_speed = Self::exit_speed(
            scratch.path_length,
            scratch.entry_speed,
            computation.final_interval.min,
        );

        // A stationary toolhead keeps the heading it had
        if scratch.path_length > 0.0 {
            next.ext.direction = scratch.direction;
        }
    }
}
