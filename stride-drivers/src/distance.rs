//! Distance sources
//!
//! Two ways a request can describe a movement: native step deltas filled in
//! by the caller, or an absolute logical target the source converts.

use stride_core::state::StateStatus;
use stride_core::traits::{DistanceSource, GeometricModel};
use stride_core::{MachineState, MovementRequest};

/// Requests already carry native distances; nothing to compute
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RelativeSteps;

impl<X> DistanceSource<X> for RelativeSteps {
    fn compute(
        &self,
        _current: &MachineState<X>,
        _next: &mut MachineState<X>,
        _request: &mut MovementRequest,
    ) {
    }
}

/// Requests carry an absolute logical target
///
/// The destination is converted through the forward geometry and written
/// straight into `next`, so the pipeline need not reconstruct it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AbsoluteTarget<G> {
    geometry: G,
}

impl<G: GeometricModel> AbsoluteTarget<G> {
    pub fn new(geometry: G) -> Self {
        Self { geometry }
    }
}

impl<X, G: GeometricModel> DistanceSource<X> for AbsoluteTarget<G> {
    fn compute(
        &self,
        current: &MachineState<X>,
        next: &mut MachineState<X>,
        request: &mut MovementRequest,
    ) {
        let (native, logical) = next.positions_mut();
        logical.copy_from_slice(request.target());
        self.geometry.control_to_actuation(logical, native);

        for ((delta, to), from) in request
            .distances_mut()
            .iter_mut()
            .zip(next.actuation())
            .zip(current.actuation())
        {
            *delta = to.saturating_sub(*from);
        }

        next.status = StateStatus::POSITION_KNOWN;
    }
}
