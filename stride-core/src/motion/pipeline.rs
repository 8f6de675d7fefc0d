//! Movement pipeline
//!
//! The motion core turns one movement request into a committed machine
//! state in nine fixed stages:
//!
//! 1. distance computation (controller's distance source)
//! 2. per-axis duration windows (actuator models)
//! 3. consensus merge, imposing a duration when none exists
//! 4. distance correction of axes that cannot meet the consensus
//! 5. next native position
//! 6. next logical position through inverse geometry
//! 7. builder hooks
//! 8. duration reduction by kinematic constraints
//! 9. state hooks
//!
//! `current` is never written; everything lands in `next`, and the state
//! pair flips only after the last stage. A refused call touches nothing.

use super::computation::Computation;
use crate::controller::MotionController;
use crate::error::{InitError, NotReady};
use crate::interval::{intersect, TimeInterval};
use crate::request::MovementRequest;
use crate::state::{MachineState, StatePair, StateStatus};
use crate::traits::{DistanceSource, GeometricModel};

/// Owner of the machine state and the per-movement pipeline
pub struct MotionCore<'a, X, S> {
    dimension: usize,
    controller: MotionController<'a, X, S>,
    states: StatePair<X>,
    computation: Computation<S>,
    last_duration: Option<f32>,
}

impl<'a, X: Clone, S> MotionCore<'a, X, S> {
    /// Assemble a motion core
    ///
    /// The controller may still be incomplete; readiness is checked on
    /// every movement. Slot `a` starts as the current state.
    pub fn new(
        controller: MotionController<'a, X, S>,
        a: MachineState<X>,
        b: MachineState<X>,
        scratch: S,
    ) -> Result<Self, InitError> {
        if a.dimension() != b.dimension() {
            error!(
                "motion core: state slots disagree ({} vs {} axes)",
                a.dimension(),
                b.dimension()
            );
            return Err(InitError::StateDimensionMismatch {
                a: a.dimension(),
                b: b.dimension(),
            });
        }

        if a.dimension() != controller.dimension() {
            error!(
                "motion core: states have {} axes, controller {}",
                a.dimension(),
                controller.dimension()
            );
            return Err(InitError::ControllerDimensionMismatch {
                states: a.dimension(),
                controller: controller.dimension(),
            });
        }

        let dimension = a.dimension();
        info!("motion core: initialized with {} axes", dimension);

        Ok(Self {
            dimension,
            controller,
            states: StatePair::new(a, b),
            computation: Computation::new(dimension, scratch),
            last_duration: None,
        })
    }

    /// Number of axes
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// The committed machine state
    pub fn current(&self) -> &MachineState<X> {
        self.states.current()
    }

    /// Both state slots
    pub fn states(&self) -> &StatePair<X> {
        &self.states
    }

    /// Scratch of the last computed movement
    pub fn computation(&self) -> &Computation<S> {
        &self.computation
    }

    /// The controller driving this core
    pub fn controller(&self) -> &MotionController<'a, X, S> {
        &self.controller
    }

    /// Mutable controller access, for registrations made after assembly
    pub fn controller_mut(&mut self) -> &mut MotionController<'a, X, S> {
        &mut self.controller
    }

    /// Duration committed by the last successful movement
    pub fn last_duration(&self) -> Option<f32> {
        self.last_duration
    }

    /// Declare the machine to be at `actuation` (e.g. after homing)
    ///
    /// Derives the logical position through the inverse geometry and marks
    /// both positions known. Nothing changes on error.
    pub fn set_position(&mut self, actuation: &[i32]) -> Result<(), NotReady> {
        if actuation.len() != self.dimension {
            warn!(
                "set_position: {} values for {} axes",
                actuation.len(),
                self.dimension
            );
            return Err(NotReady::DimensionMismatch {
                expected: self.dimension,
                got: actuation.len(),
            });
        }
        let Some(geometry) = self.controller.geometry() else {
            warn!("set_position: no geometry registered");
            return Err(NotReady::MissingGeometry);
        };

        let state = self.states.current_mut();
        let (native, logical) = state.positions_mut();
        native.copy_from_slice(actuation);
        geometry.actuation_to_control(native, logical);
        state.status = StateStatus::POSITION_KNOWN;
        Ok(())
    }

    /// Plan one movement; `false` means nothing was touched
    pub fn compute_movement(&mut self, request: &mut MovementRequest) -> bool {
        self.try_compute_movement(request).is_ok()
    }

    /// Plan one movement, returning the committed duration
    pub fn try_compute_movement(&mut self, request: &mut MovementRequest) -> Result<f32, NotReady> {
        let (distance_source, geometry) = self.check_preconditions(request)?;

        let Self {
            dimension,
            controller,
            states,
            computation,
            last_duration,
        } = self;
        let dimension = *dimension;

        let (current, next) = states.split();

        // 1. Distances
        next.status = StateStatus::empty();
        next.ext.clone_from(&current.ext);
        distance_source.compute(current, next, request);
        if !next.actuation_known() {
            next.status = StateStatus::empty();
        }

        // 2. Per-axis duration windows
        for (axis, interval) in computation.intervals_mut().iter_mut().enumerate() {
            let distance = request.distances()[axis];
            *interval = controller
                .actuator(axis)
                .and_then(|model| model.duration_for(distance, current))
                .unwrap_or_else(TimeInterval::largest);
        }

        // 3. Consensus
        let forced = computation.resolve_consensus(*last_duration);

        // 4. Distance correction
        if forced {
            let duration = computation.final_interval.min;
            let mut corrected = false;

            for axis in 0..dimension {
                if computation.intervals()[axis].valid {
                    continue;
                }
                let distance = request.distances()[axis];
                let fixed = controller
                    .actuator(axis)
                    .and_then(|model| model.min_distance_for(duration, distance));

                match fixed {
                    Some(new_distance) => {
                        if new_distance != distance {
                            trace!("axis {}: distance {} -> {}", axis, distance, new_distance);
                            request.distances_mut()[axis] = new_distance;
                            corrected = true;
                        }
                        computation.intervals_mut()[axis] = TimeInterval::singleton(duration);
                    }
                    None => {
                        debug!("axis {}: cannot meet {}s, left uncorrected", axis, duration);
                    }
                }
            }

            if corrected {
                next.status = StateStatus::empty();
            }
        }

        // 5. Native position
        if !next.actuation_known() {
            let distances = request.distances();
            for ((target, from), delta) in next
                .actuation_mut()
                .iter_mut()
                .zip(current.actuation())
                .zip(distances)
            {
                *target = from.saturating_add(*delta);
            }
        }

        // 6. Logical position
        if !next.control_known() {
            let (native, logical) = next.positions_mut();
            geometry.actuation_to_control(native, logical);
        }
        next.status = StateStatus::POSITION_KNOWN;

        // 7. Builders
        for builder in controller.builders() {
            builder.build(current, next, &mut computation.controller);
        }

        // 8. Duration reduction
        if !computation.final_interval.valid {
            error!(
                "consensus window invalid before reduction (min {})",
                computation.final_interval.min
            );
        }
        if !forced && !computation.final_interval.is_singleton() {
            for constraint in controller.constraints() {
                let window = constraint.duration_window(current, &computation.controller);
                if intersect(&mut computation.final_interval, &window) {
                    break;
                }
            }
        }

        // 9. State hooks
        for hook in controller.state_hooks() {
            hook.finalize(current, computation, next);
        }

        // Commit
        let duration = computation.final_interval.min;
        request.set_time_to_dest(duration);
        *last_duration = Some(duration);
        states.flip();

        trace!("movement committed: {}s", duration);
        Ok(duration)
    }

    /// Check readiness, returning the distance source and the geometry
    fn check_preconditions(
        &self,
        request: &MovementRequest,
    ) -> Result<(&'a dyn DistanceSource<X>, &'a dyn GeometricModel), NotReady> {
        if let Err(reason) = self.controller.check_ready() {
            warn!("compute_movement refused: {:?}", reason);
            return Err(reason);
        }

        if request.dimension() != self.dimension {
            warn!(
                "compute_movement refused: request has {} axes, machine {}",
                request.dimension(),
                self.dimension
            );
            return Err(NotReady::DimensionMismatch {
                expected: self.dimension,
                got: request.dimension(),
            });
        }

        let distance_source = self
            .controller
            .distance_source()
            .ok_or(NotReady::MissingDistanceSource)?;
        let geometry = self.controller.geometry().ok_or(NotReady::MissingGeometry)?;
        Ok((distance_source, geometry))
    }
}
