use core::cell::Cell;

use super::*;
use crate::controller::{HookCounts, MotionController};
use crate::error::{InitError, NotReady};
use crate::interval::TimeInterval;
use crate::request::MovementRequest;
use crate::state::{MachineState, Slot, StateStatus};
use crate::traits::{ActuatorModel, DistanceSource, GeometricModel, Unconstrained};

#[derive(Debug, Clone, Default, PartialEq)]
struct Ext {
    exit: f32,
}

type Core<'a> = MotionCore<'a, Ext, f32>;

/// Same window whatever the distance, optional fixed correction
struct FixedWindow {
    window: Cell<TimeInterval>,
    correction: Option<i32>,
}

impl FixedWindow {
    fn new(window: TimeInterval, correction: Option<i32>) -> Self {
        Self {
            window: Cell::new(window),
            correction,
        }
    }
}

impl ActuatorModel<Ext> for FixedWindow {
    fn duration_for(&self, _: i32, _: &MachineState<Ext>) -> Option<TimeInterval> {
        Some(self.window.get())
    }

    fn min_distance_for(&self, _: f32, _: i32) -> Option<i32> {
        self.correction
    }
}

/// Native steps per second limit
struct Speed(f32);

impl ActuatorModel<Ext> for Speed {
    fn duration_for(&self, distance: i32, _: &MachineState<Ext>) -> Option<TimeInterval> {
        if distance == 0 {
            return Some(TimeInterval::empty());
        }
        Some(TimeInterval::at_least(distance.unsigned_abs() as f32 / self.0))
    }

    fn min_distance_for(&self, duration: f32, distance: i32) -> Option<i32> {
        let reach = (self.0 * duration) as i32;
        Some(distance.clamp(-reach, reach))
    }
}

struct Scale {
    steps_per_unit: f32,
    inverse_calls: Cell<u32>,
}

impl Scale {
    fn new(steps_per_unit: f32) -> Self {
        Self {
            steps_per_unit,
            inverse_calls: Cell::new(0),
        }
    }
}

impl GeometricModel for Scale {
    fn control_to_actuation(&self, control: &[f32], actuation: &mut [i32]) {
        for (a, c) in actuation.iter_mut().zip(control) {
            *a = (*c * self.steps_per_unit) as i32;
        }
    }

    fn actuation_to_control(&self, actuation: &[i32], control: &mut [f32]) {
        self.inverse_calls.set(self.inverse_calls.get() + 1);
        for (c, a) in control.iter_mut().zip(actuation) {
            *c = *a as f32 / self.steps_per_unit;
        }
    }
}

/// Uses whatever distances the caller put in the request
struct KeepDistances;

impl DistanceSource<Ext> for KeepDistances {
    fn compute(&self, _: &MachineState<Ext>, _: &mut MachineState<Ext>, _: &mut MovementRequest) {}
}

/// Claims both positions, with a deliberately inconsistent logical value
struct PresetPositions;

impl DistanceSource<Ext> for PresetPositions {
    fn compute(
        &self,
        current: &MachineState<Ext>,
        next: &mut MachineState<Ext>,
        request: &mut MovementRequest,
    ) {
        for ((to, from), d) in next
            .actuation_mut()
            .iter_mut()
            .zip(current.actuation())
            .zip(request.distances())
        {
            *to = from + d;
        }
        for c in next.control_mut() {
            *c = 123.0;
        }
        next.status = StateStatus::POSITION_KNOWN;
    }
}

/// Sets the logical bit only, which the pipeline must not trust
struct ControlOnly;

impl DistanceSource<Ext> for ControlOnly {
    fn compute(&self, _: &MachineState<Ext>, next: &mut MachineState<Ext>, _: &mut MovementRequest) {
        for c in next.control_mut() {
            *c = 123.0;
        }
        next.status = StateStatus::CONTROL_KNOWN;
    }
}

fn assemble<'a>(
    axes: &[&'a dyn ActuatorModel<Ext>],
    geometry: &'a Scale,
    source: &'a dyn DistanceSource<Ext>,
    hooks: HookCounts,
) -> Core<'a> {
    let mut controller = MotionController::new(axes.len(), hooks).unwrap();
    controller.set_geometry(geometry).unwrap();
    controller.set_distance_source(source).unwrap();
    for (index, axis) in axes.iter().enumerate() {
        controller.set_actuator(index, *axis).unwrap();
    }
    MotionCore::new(
        controller,
        MachineState::new(axes.len()),
        MachineState::new(axes.len()),
        0.0,
    )
    .unwrap()
}

#[test]
fn test_feasible_move_commits_merged_min() {
    let x = Speed(1000.0);
    let y = Speed(500.0);
    let geometry = Scale::new(100.0);
    let mut core = assemble(&[&x, &y], &geometry, &KeepDistances, HookCounts::none());

    let mut request = MovementRequest::with_distances(&[1000, 250]);
    assert!(core.compute_movement(&mut request));

    // x needs 1.0s, y needs 0.5s
    assert_eq!(request.time_to_dest(), 1.0);
    assert_eq!(core.last_duration(), Some(1.0));
    assert_eq!(core.current().actuation(), &[1000, 250]);
    assert_eq!(core.current().control(), &[10.0, 2.5]);
    assert_eq!(core.current().status, StateStatus::POSITION_KNOWN);
}

#[test]
fn test_infeasible_scenario_commits_with_uncorrectable_axis() {
    let a = FixedWindow::new(TimeInterval::bounded(10.0, 20.0), None);
    let b = FixedWindow::new(TimeInterval::bounded(5.0, 8.0), None);
    let geometry = Scale::new(1.0);
    let mut core = assemble(&[&a, &b], &geometry, &KeepDistances, HookCounts::none());

    let mut request = MovementRequest::with_distances(&[100, 50]);
    assert!(core.compute_movement(&mut request));

    // Merge is [10, 8]; the midpoint is imposed. A worked example elsewhere
    // quotes 15 for these windows, which contradicts the (min + max) / 2 rule.
    assert_eq!(request.time_to_dest(), 9.0);
    assert_eq!(core.computation().final_interval, TimeInterval::singleton(9.0));

    // Neither axis could be corrected, so both stay flagged
    for interval in core.computation().intervals() {
        assert!(!interval.valid);
        assert_eq!(interval.min, 9.0);
    }
    assert_eq!(request.distances(), &[100, 50]);
    assert_eq!(core.current().actuation(), &[100, 50]);
}

#[test]
fn test_correctable_axis_gets_new_distance() {
    let a = FixedWindow::new(TimeInterval::bounded(10.0, 20.0), Some(90));
    let b = FixedWindow::new(TimeInterval::bounded(5.0, 8.0), None);
    let geometry = Scale::new(1.0);
    let mut core = assemble(&[&a, &b], &geometry, &KeepDistances, HookCounts::none());

    let mut request = MovementRequest::with_distances(&[100, 50]);
    assert!(core.compute_movement(&mut request));

    assert_eq!(request.distances(), &[90, 50]);
    assert_eq!(core.current().actuation(), &[90, 50]);
    assert_eq!(core.computation().intervals()[0], TimeInterval::singleton(9.0));
    assert!(!core.computation().intervals()[1].valid);
}

#[test]
fn test_unbounded_infeasible_move_reuses_previous_duration() {
    let a = FixedWindow::new(TimeInterval::at_least(3.0), None);
    let geometry = Scale::new(1.0);
    let mut core = assemble(&[&a], &geometry, &KeepDistances, HookCounts::none());

    let mut request = MovementRequest::with_distances(&[10]);
    assert!(core.compute_movement(&mut request));
    assert_eq!(request.time_to_dest(), 3.0);

    let mut broken = TimeInterval::at_least(4.0);
    broken.valid = false;
    a.window.set(broken);

    assert!(core.compute_movement(&mut request));
    assert_eq!(request.time_to_dest(), 3.0);
}

#[test]
fn test_refused_call_mutates_nothing() {
    let x = Speed(1000.0);
    let geometry = Scale::new(10.0);
    let mut controller = MotionController::<Ext, f32>::new(2, HookCounts::none()).unwrap();
    controller.set_geometry(&geometry).unwrap();
    controller.set_distance_source(&KeepDistances).unwrap();
    controller.set_actuator(0, &x).unwrap();
    let mut core = MotionCore::new(controller, MachineState::new(2), MachineState::new(2), 0.0).unwrap();

    let states = core.states().clone();
    let mut request = MovementRequest::with_distances(&[100, 100]);
    let before = request.clone();

    assert_eq!(
        core.try_compute_movement(&mut request),
        Err(NotReady::Incomplete {
            actuators: 1,
            builders: 0,
            constraints: 0,
            state_hooks: 0,
        })
    );
    assert!(!core.compute_movement(&mut request));

    assert_eq!(request, before);
    assert_eq!(core.states().current_slot(), states.current_slot());
    assert_eq!(core.states().slot(Slot::A), states.slot(Slot::A));
    assert_eq!(core.states().slot(Slot::B), states.slot(Slot::B));
    assert_eq!(core.last_duration(), None);
    assert_eq!(geometry.inverse_calls.get(), 0);
}

#[test]
fn test_missing_distance_source_is_refused_untouched() {
    let x = Speed(1000.0);
    let y = Speed(1000.0);
    let geometry = Scale::new(10.0);
    let mut controller = MotionController::<Ext, f32>::new(2, HookCounts::none()).unwrap();
    controller.set_geometry(&geometry).unwrap();
    controller.set_actuator(0, &x).unwrap();
    controller.set_actuator(1, &y).unwrap();
    let mut core = MotionCore::new(controller, MachineState::new(2), MachineState::new(2), 0.0).unwrap();

    let states = core.states().clone();
    let mut request = MovementRequest::with_distances(&[100, 100]);
    let before = request.clone();

    assert_eq!(
        core.try_compute_movement(&mut request),
        Err(NotReady::MissingDistanceSource)
    );
    assert!(!core.compute_movement(&mut request));

    assert_eq!(request, before);
    assert_eq!(core.states().current_slot(), states.current_slot());
    assert_eq!(core.states().slot(Slot::A), states.slot(Slot::A));
    assert_eq!(core.states().slot(Slot::B), states.slot(Slot::B));
    assert_eq!(core.last_duration(), None);
    assert_eq!(geometry.inverse_calls.get(), 0);
}

#[test]
fn test_missing_geometry_is_refused_untouched() {
    let x = Speed(1000.0);
    let y = Speed(1000.0);
    let mut controller = MotionController::<Ext, f32>::new(2, HookCounts::none()).unwrap();
    controller.set_distance_source(&KeepDistances).unwrap();
    controller.set_actuator(0, &x).unwrap();
    controller.set_actuator(1, &y).unwrap();
    let mut core = MotionCore::new(controller, MachineState::new(2), MachineState::new(2), 0.0).unwrap();

    let states = core.states().clone();
    let mut request = MovementRequest::with_distances(&[100, 100]);
    let before = request.clone();

    assert_eq!(core.try_compute_movement(&mut request), Err(NotReady::MissingGeometry));
    assert!(!core.compute_movement(&mut request));

    assert_eq!(request, before);
    assert_eq!(core.states().current_slot(), states.current_slot());
    assert_eq!(core.states().slot(Slot::A), states.slot(Slot::A));
    assert_eq!(core.states().slot(Slot::B), states.slot(Slot::B));
    assert_eq!(core.last_duration(), None);
}

#[test]
fn test_axis_without_duration_is_unconstrained() {
    let free = Unconstrained;
    let x = Speed(1000.0);
    let geometry = Scale::new(1.0);
    let mut core = assemble(&[&free, &x], &geometry, &KeepDistances, HookCounts::none());

    let mut request = MovementRequest::with_distances(&[500, 2000]);
    assert!(core.compute_movement(&mut request));

    assert_eq!(core.computation().intervals()[0], TimeInterval::largest());
    assert_eq!(core.computation().intervals()[1], TimeInterval::at_least(2.0));
    assert_eq!(request.time_to_dest(), 2.0);
    assert_eq!(core.current().actuation(), &[500, 2000]);
}

#[test]
fn test_request_dimension_mismatch_is_refused() {
    let x = Speed(1000.0);
    let geometry = Scale::new(10.0);
    let mut core = assemble(&[&x], &geometry, &KeepDistances, HookCounts::none());

    let mut request = MovementRequest::with_distances(&[100]);
    assert!(core.compute_movement(&mut request));
    let states = core.states().clone();

    let mut wrong = MovementRequest::with_distances(&[100, 100]);
    let before = wrong.clone();
    assert_eq!(
        core.try_compute_movement(&mut wrong),
        Err(NotReady::DimensionMismatch {
            expected: 1,
            got: 2,
        })
    );
    assert_eq!(wrong, before);
    assert_eq!(core.current(), states.current());
    assert_eq!(core.states().next(), states.next());
}

#[test]
fn test_states_alternate_and_promote_next() {
    let x = Speed(1000.0);
    let geometry = Scale::new(1.0);
    let written = Cell::new(0i32);
    let record = |_: &MachineState<Ext>, _: &Computation<f32>, next: &mut MachineState<Ext>| {
        written.set(next.actuation()[0]);
    };
    let hooks = HookCounts {
        state_hooks: 1,
        ..HookCounts::none()
    };
    let mut core = assemble(&[&x], &geometry, &KeepDistances, hooks);
    core.controller_mut().set_state_hook(0, &record).unwrap();

    let mut request = MovementRequest::with_distances(&[10]);
    let mut expected_slot = Slot::A;
    for k in 1..=5 {
        assert!(core.compute_movement(&mut request));
        expected_slot = expected_slot.other();
        assert_eq!(core.states().current_slot(), expected_slot);
        assert_eq!(core.current().actuation()[0], written.get());
        assert_eq!(written.get(), 10 * k);
    }
}

#[test]
fn test_inverse_geometry_skipped_when_source_supplies_positions() {
    let x = Speed(1000.0);
    let geometry = Scale::new(10.0);
    let mut core = assemble(&[&x], &geometry, &PresetPositions, HookCounts::none());

    let mut request = MovementRequest::with_distances(&[100]);
    assert!(core.compute_movement(&mut request));

    assert_eq!(geometry.inverse_calls.get(), 0);
    assert_eq!(core.current().actuation(), &[100]);
    assert_eq!(core.current().control(), &[123.0]);
}

#[test]
fn test_correction_overrides_supplied_positions() {
    let a = FixedWindow::new(TimeInterval::bounded(10.0, 20.0), Some(40));
    let b = FixedWindow::new(TimeInterval::bounded(5.0, 8.0), Some(20));
    let geometry = Scale::new(10.0);
    let mut core = assemble(&[&a, &b], &geometry, &PresetPositions, HookCounts::none());

    let mut request = MovementRequest::with_distances(&[100, 50]);
    assert!(core.compute_movement(&mut request));

    assert_eq!(geometry.inverse_calls.get(), 1);
    assert_eq!(core.current().actuation(), &[40, 20]);
    assert_eq!(core.current().control(), &[4.0, 2.0]);
}

#[test]
fn test_logical_bit_alone_is_not_trusted() {
    let x = Speed(1000.0);
    let geometry = Scale::new(10.0);
    let mut core = assemble(&[&x], &geometry, &ControlOnly, HookCounts::none());

    let mut request = MovementRequest::with_distances(&[50]);
    assert!(core.compute_movement(&mut request));

    assert_eq!(geometry.inverse_calls.get(), 1);
    assert_eq!(core.current().control(), &[5.0]);
}

#[test]
fn test_constraints_narrow_in_order() {
    let x = Speed(1000.0);
    let geometry = Scale::new(1.0);
    let first = |_: &MachineState<Ext>, _: &f32| TimeInterval::bounded(3.0, 10.0);
    let second = |_: &MachineState<Ext>, _: &f32| TimeInterval::at_least(4.0);
    let hooks = HookCounts {
        constraints: 2,
        ..HookCounts::none()
    };
    let mut core = assemble(&[&x], &geometry, &KeepDistances, hooks);
    core.controller_mut().set_constraint(0, &first).unwrap();
    core.controller_mut().set_constraint(1, &second).unwrap();

    // Axis alone needs 2.0s
    let mut request = MovementRequest::with_distances(&[2000]);
    assert!(core.compute_movement(&mut request));

    assert_eq!(request.time_to_dest(), 4.0);
    assert_eq!(core.computation().final_interval.max, Some(10.0));
}

#[test]
fn test_reduction_stops_at_singleton() {
    let x = Speed(1000.0);
    let geometry = Scale::new(1.0);
    let later_called = Cell::new(false);
    let pin = |_: &MachineState<Ext>, _: &f32| TimeInterval::bounded(0.0, 2.0);
    let later = |_: &MachineState<Ext>, _: &f32| {
        later_called.set(true);
        TimeInterval::at_least(50.0)
    };
    let hooks = HookCounts {
        constraints: 2,
        ..HookCounts::none()
    };
    let mut core = assemble(&[&x], &geometry, &KeepDistances, hooks);
    core.controller_mut().set_constraint(0, &pin).unwrap();
    core.controller_mut().set_constraint(1, &later).unwrap();

    let mut request = MovementRequest::with_distances(&[2000]);
    assert!(core.compute_movement(&mut request));

    assert_eq!(request.time_to_dest(), 2.0);
    assert!(!later_called.get());
}

#[test]
fn test_reduction_skipped_after_forced_duration() {
    let a = FixedWindow::new(TimeInterval::bounded(10.0, 20.0), None);
    let b = FixedWindow::new(TimeInterval::bounded(5.0, 8.0), None);
    let geometry = Scale::new(1.0);
    let called = Cell::new(false);
    let constraint = |_: &MachineState<Ext>, _: &f32| {
        called.set(true);
        TimeInterval::at_least(50.0)
    };
    let hooks = HookCounts {
        constraints: 1,
        ..HookCounts::none()
    };
    let mut core = assemble(&[&a, &b], &geometry, &KeepDistances, hooks);
    core.controller_mut().set_constraint(0, &constraint).unwrap();

    let mut request = MovementRequest::with_distances(&[100, 50]);
    assert!(core.compute_movement(&mut request));

    assert_eq!(request.time_to_dest(), 9.0);
    assert!(!called.get());
}

#[test]
fn test_hooks_share_scratch_and_persist_fields() {
    let x = Speed(1000.0);
    let geometry = Scale::new(10.0);
    let travel = |current: &MachineState<Ext>, next: &MachineState<Ext>, scratch: &mut f32| {
        *scratch = next.control()[0] - current.control()[0];
    };
    let slow = |_: &MachineState<Ext>, scratch: &f32| TimeInterval::at_least(*scratch * 0.5);
    let keep_exit = |_: &MachineState<Ext>, c: &Computation<f32>, next: &mut MachineState<Ext>| {
        next.ext.exit = c.final_interval.min;
    };
    let hooks = HookCounts {
        builders: 1,
        constraints: 1,
        state_hooks: 1,
    };
    let mut core = assemble(&[&x], &geometry, &KeepDistances, hooks);
    core.controller_mut().set_builder(0, &travel).unwrap();
    core.controller_mut().set_constraint(0, &slow).unwrap();
    core.controller_mut().set_state_hook(0, &keep_exit).unwrap();

    // 100 steps = 10 units; the constraint asks for 5s
    let mut request = MovementRequest::with_distances(&[100]);
    assert!(core.compute_movement(&mut request));

    assert_eq!(core.computation().controller, 10.0);
    assert_eq!(request.time_to_dest(), 5.0);
    assert_eq!(core.current().ext.exit, 5.0);
}

#[test]
fn test_ext_fields_carry_over_without_hooks() {
    let x = Speed(1000.0);
    let geometry = Scale::new(1.0);
    let mut a = MachineState::with_ext(1, Ext { exit: 7.0 });
    a.status = StateStatus::POSITION_KNOWN;

    let mut controller = MotionController::<Ext, f32>::new(1, HookCounts::none()).unwrap();
    controller.set_geometry(&geometry).unwrap();
    controller.set_distance_source(&KeepDistances).unwrap();
    controller.set_actuator(0, &x).unwrap();
    let mut core = MotionCore::new(controller, a, MachineState::new(1), 0.0).unwrap();

    let mut request = MovementRequest::with_distances(&[1]);
    assert!(core.compute_movement(&mut request));
    assert_eq!(core.current().ext.exit, 7.0);
}

#[test]
fn test_set_position_marks_state_known() {
    let x = Speed(1000.0);
    let geometry = Scale::new(80.0);
    let mut core = assemble(&[&x], &geometry, &KeepDistances, HookCounts::none());

    assert!(!core.current().actuation_known());
    core.set_position(&[800]).unwrap();
    assert_eq!(core.current().actuation(), &[800]);
    assert_eq!(core.current().control(), &[10.0]);
    assert_eq!(core.current().status, StateStatus::POSITION_KNOWN);

    assert_eq!(
        core.set_position(&[1, 2]),
        Err(NotReady::DimensionMismatch {
            expected: 1,
            got: 2,
        })
    );
    assert_eq!(core.current().actuation(), &[800]);
}

#[test]
fn test_init_rejects_mismatched_states() {
    let controller = MotionController::<Ext, f32>::new(2, HookCounts::none()).unwrap();
    let result = MotionCore::new(controller, MachineState::new(2), MachineState::new(3), 0.0);
    assert!(matches!(
        result,
        Err(InitError::StateDimensionMismatch { a: 2, b: 3 })
    ));

    let controller = MotionController::<Ext, f32>::new(2, HookCounts::none()).unwrap();
    let result = MotionCore::new(controller, MachineState::new(3), MachineState::new(3), 0.0);
    assert!(matches!(
        result,
        Err(InitError::ControllerDimensionMismatch {
            states: 3,
            controller: 2,
        })
    ));
}
