//! Pipeline plug-ins
//!
//! Ordered hooks the controller registers to extend the movement pipeline
//! without touching it. Each trait is also implemented for plain closures
//! with the matching signature.

use crate::interval::TimeInterval;
use crate::motion::Computation;
use crate::request::MovementRequest;
use crate::state::MachineState;

/// Entry point deriving per-axis native distances for a movement
pub trait DistanceSource<X> {
    /// Fill `request`'s distance buffer
    ///
    /// `next` arrives with an empty status. An implementation that derives
    /// the destination positions as a side effect may write them into
    /// `next` and set the matching status bits; the pipeline only trusts
    /// them when `ACTUATION_KNOWN` is set.
    fn compute(
        &self,
        current: &MachineState<X>,
        next: &mut MachineState<X>,
        request: &mut MovementRequest,
    );
}

/// Per-movement scratch builder, run after positions are settled
pub trait BuilderHook<X, S> {
    fn build(&self, current: &MachineState<X>, next: &MachineState<X>, scratch: &mut S);
}

/// Rule narrowing the consensus duration window
pub trait KinematicConstraint<X, S> {
    fn duration_window(&self, current: &MachineState<X>, scratch: &S) -> TimeInterval;
}

/// Writer of persistent controller fields into the next state
pub trait StateHook<X, S> {
    fn finalize(
        &self,
        current: &MachineState<X>,
        computation: &Computation<S>,
        next: &mut MachineState<X>,
    );
}

impl<X, F> DistanceSource<X> for F
where
    F: Fn(&MachineState<X>, &mut MachineState<X>, &mut MovementRequest),
{
    fn compute(
        &self,
        current: &MachineState<X>,
        next: &mut MachineState<X>,
        request: &mut MovementRequest,
    ) {
        self(current, next, request)
    }
}

impl<X, S, F> BuilderHook<X, S> for F
where
    F: Fn(&MachineState<X>, &MachineState<X>, &mut S),
{
    fn build(&self, current: &MachineState<X>, next: &MachineState<X>, scratch: &mut S) {
        self(current, next, scratch)
    }
}

impl<X, S, F> KinematicConstraint<X, S> for F
where
    F: Fn(&MachineState<X>, &S) -> TimeInterval,
{
    fn duration_window(&self, current: &MachineState<X>, scratch: &S) -> TimeInterval {
        self(current, scratch)
    }
}

impl<X, S, F> StateHook<X, S> for F
where
    F: Fn(&MachineState<X>, &Computation<S>, &mut MachineState<X>),
{
    fn finalize(
        &self,
        current: &MachineState<X>,
        computation: &Computation<S>,
        next: &mut MachineState<X>,
    ) {
        self(current, computation, next)
    }
}
