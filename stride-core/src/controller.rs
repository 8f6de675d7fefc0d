//! Motion controller
//!
//! Aggregates everything machine-specific the pipeline needs: one actuator
//! model per axis, a distance source, a geometric model, and three ordered
//! plug-in arrays. Every slot is registered exactly once at startup; the
//! controller is ready when nothing is left unregistered.

use heapless::Vec;

use crate::error::{InitError, NotReady, Registrable, RegistrationError};
use crate::state::MAX_AXES;
use crate::traits::{
    ActuatorModel, BuilderHook, DistanceSource, GeometricModel, KinematicConstraint, StateHook,
};

/// Maximum plug-ins per category
pub const MAX_HOOKS: usize = 8;

/// Number of slots to reserve in each plug-in category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HookCounts {
    /// Builder hooks (stage 7)
    pub builders: usize,
    /// Kinematic constraints (stage 8)
    pub constraints: usize,
    /// State hooks (stage 9)
    pub state_hooks: usize,
}

impl HookCounts {
    /// No plug-ins at all
    pub const fn none() -> Self {
        Self {
            builders: 0,
            constraints: 0,
            state_hooks: 0,
        }
    }
}

/// Slots still waiting for registration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Pending {
    actuators: u8,
    builders: u8,
    constraints: u8,
    state_hooks: u8,
}

impl Pending {
    fn is_clear(&self) -> bool {
        self.actuators == 0 && self.builders == 0 && self.constraints == 0 && self.state_hooks == 0
    }
}

/// Registry of the models and plug-ins driving one motion core
///
/// `X` is the controller's persistent state extension, `S` its per-movement
/// scratch. All registered items are borrowed for `'a`, typically
/// `'static` on firmware.
pub struct MotionController<'a, X, S> {
    dimension: usize,
    distance: Option<&'a dyn DistanceSource<X>>,
    geometry: Option<&'a dyn GeometricModel>,
    actuators: [Option<&'a dyn ActuatorModel<X>>; MAX_AXES],
    builders: Vec<Option<&'a dyn BuilderHook<X, S>>, MAX_HOOKS>,
    constraints: Vec<Option<&'a dyn KinematicConstraint<X, S>>, MAX_HOOKS>,
    state_hooks: Vec<Option<&'a dyn StateHook<X, S>>, MAX_HOOKS>,
    pending: Pending,
}

impl<'a, X, S> MotionController<'a, X, S> {
    /// Create an empty controller for `dimension` axes
    pub fn new(dimension: usize, hooks: HookCounts) -> Result<Self, InitError> {
        if dimension > MAX_AXES {
            error!("controller: {} axes requested, max {}", dimension, MAX_AXES);
            return Err(InitError::DimensionTooLarge {
                dimension,
                max: MAX_AXES,
            });
        }

        let counts = [
            (Registrable::Builder, hooks.builders),
            (Registrable::Constraint, hooks.constraints),
            (Registrable::StateHook, hooks.state_hooks),
        ];
        for (kind, count) in counts {
            if count > MAX_HOOKS {
                error!("controller: {} {:?} slots requested, max {}", count, kind, MAX_HOOKS);
                return Err(InitError::TooManyHooks {
                    kind,
                    count,
                    max: MAX_HOOKS,
                });
            }
        }

        Ok(Self {
            dimension,
            distance: None,
            geometry: None,
            actuators: [None; MAX_AXES],
            builders: empty_slots(hooks.builders),
            constraints: empty_slots(hooks.constraints),
            state_hooks: empty_slots(hooks.state_hooks),
            pending: Pending {
                actuators: dimension as u8,
                builders: hooks.builders as u8,
                constraints: hooks.constraints as u8,
                state_hooks: hooks.state_hooks as u8,
            },
        })
    }

    /// Number of axes
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Register the distance source
    pub fn set_distance_source(
        &mut self,
        source: &'a dyn DistanceSource<X>,
    ) -> Result<(), RegistrationError> {
        register_singleton(&mut self.distance, Registrable::DistanceSource, source)
    }

    /// Register the geometric model
    pub fn set_geometry(&mut self, geometry: &'a dyn GeometricModel) -> Result<(), RegistrationError> {
        register_singleton(&mut self.geometry, Registrable::Geometry, geometry)
    }

    /// Register the actuator model of axis `index`
    pub fn set_actuator(
        &mut self,
        index: usize,
        model: &'a dyn ActuatorModel<X>,
    ) -> Result<(), RegistrationError> {
        register_slot(
            &mut self.actuators[..self.dimension],
            Registrable::Actuator,
            index,
            model,
            &mut self.pending.actuators,
        )
    }

    /// Register builder hook `index`
    pub fn set_builder(
        &mut self,
        index: usize,
        hook: &'a dyn BuilderHook<X, S>,
    ) -> Result<(), RegistrationError> {
        register_slot(
            &mut self.builders,
            Registrable::Builder,
            index,
            hook,
            &mut self.pending.builders,
        )
    }

    /// Register kinematic constraint `index`
    pub fn set_constraint(
        &mut self,
        index: usize,
        constraint: &'a dyn KinematicConstraint<X, S>,
    ) -> Result<(), RegistrationError> {
        register_slot(
            &mut self.constraints,
            Registrable::Constraint,
            index,
            constraint,
            &mut self.pending.constraints,
        )
    }

    /// Register state hook `index`
    pub fn set_state_hook(
        &mut self,
        index: usize,
        hook: &'a dyn StateHook<X, S>,
    ) -> Result<(), RegistrationError> {
        register_slot(
            &mut self.state_hooks,
            Registrable::StateHook,
            index,
            hook,
            &mut self.pending.state_hooks,
        )
    }

    /// Check that every slot is registered
    pub fn check_ready(&self) -> Result<(), NotReady> {
        if self.distance.is_none() {
            return Err(NotReady::MissingDistanceSource);
        }
        if self.geometry.is_none() {
            return Err(NotReady::MissingGeometry);
        }
        if !self.pending.is_clear() {
            return Err(NotReady::Incomplete {
                actuators: self.pending.actuators,
                builders: self.pending.builders,
                constraints: self.pending.constraints,
                state_hooks: self.pending.state_hooks,
            });
        }
        Ok(())
    }

    /// Check if the controller can drive a motion core
    pub fn is_ready(&self) -> bool {
        self.check_ready().is_ok()
    }

    /// Registered distance source
    pub fn distance_source(&self) -> Option<&'a dyn DistanceSource<X>> {
        self.distance
    }

    /// Registered geometric model
    pub fn geometry(&self) -> Option<&'a dyn GeometricModel> {
        self.geometry
    }

    /// Actuator model of axis `index`
    pub fn actuator(&self, index: usize) -> Option<&'a dyn ActuatorModel<X>> {
        self.actuators[..self.dimension].get(index).copied().flatten()
    }

    /// Builder hooks in registration order
    pub fn builders(&self) -> impl Iterator<Item = &'a dyn BuilderHook<X, S>> + '_ {
        self.builders.iter().filter_map(|hook| *hook)
    }

    /// Kinematic constraints in registration order
    pub fn constraints(&self) -> impl Iterator<Item = &'a dyn KinematicConstraint<X, S>> + '_ {
        self.constraints.iter().filter_map(|constraint| *constraint)
    }

    /// State hooks in registration order
    pub fn state_hooks(&self) -> impl Iterator<Item = &'a dyn StateHook<X, S>> + '_ {
        self.state_hooks.iter().filter_map(|hook| *hook)
    }
}

fn empty_slots<T: Copy>(count: usize) -> Vec<Option<T>, MAX_HOOKS> {
    let mut slots = Vec::new();
    for _ in 0..count.min(MAX_HOOKS) {
        let _ = slots.push(None);
    }
    slots
}

fn register_singleton<'a, T: ?Sized>(
    slot: &mut Option<&'a T>,
    kind: Registrable,
    item: &'a T,
) -> Result<(), RegistrationError> {
    if slot.is_some() {
        warn!("controller: {:?} already registered, ignoring", kind);
        return Err(RegistrationError::AlreadyRegistered { kind, index: 0 });
    }
    *slot = Some(item);
    debug!("controller: {:?} registered", kind);
    Ok(())
}

fn register_slot<'a, T: ?Sized>(
    slots: &mut [Option<&'a T>],
    kind: Registrable,
    index: usize,
    item: &'a T,
    pending: &mut u8,
) -> Result<(), RegistrationError> {
    let len = slots.len();
    let Some(slot) = slots.get_mut(index) else {
        warn!("controller: {:?} index {} out of range ({} slots)", kind, index, len);
        return Err(RegistrationError::IndexOutOfRange { kind, index, len });
    };

    if slot.is_some() {
        warn!("controller: {:?} slot {} already registered, ignoring", kind, index);
        return Err(RegistrationError::AlreadyRegistered { kind, index });
    }

    *slot = Some(item);
    *pending = pending.saturating_sub(1);
    debug!("controller: {:?} slot {} registered, {} pending", kind, index, *pending);
    Ok(())
}
