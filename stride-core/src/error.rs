//! Error types
//!
//! Configuration problems are reported at registration or construction;
//! precondition failures at the start of a pipeline run. Kinematic
//! infeasibility is never an error.

use core::fmt;

/// Registrable categories of a motion controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Registrable {
    DistanceSource,
    Geometry,
    Actuator,
    Builder,
    Constraint,
    StateHook,
}

impl fmt::Display for Registrable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Registrable::DistanceSource => "distance source",
            Registrable::Geometry => "geometry",
            Registrable::Actuator => "actuator",
            Registrable::Builder => "builder hook",
            Registrable::Constraint => "kinematic constraint",
            Registrable::StateHook => "state hook",
        };
        f.write_str(name)
    }
}

/// A registration call was rejected; the controller is unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistrationError {
    /// Slot index beyond the declared slot count
    IndexOutOfRange {
        kind: Registrable,
        index: usize,
        len: usize,
    },
    /// Slot already holds a registration
    AlreadyRegistered { kind: Registrable, index: usize },
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationError::IndexOutOfRange { kind, index, len } => {
                write!(f, "{} index {} out of range ({} slots)", kind, index, len)
            }
            RegistrationError::AlreadyRegistered { kind, index } => {
                write!(f, "{} slot {} already registered", kind, index)
            }
        }
    }
}

/// A pipeline run was refused before touching any state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NotReady {
    /// No distance source registered
    MissingDistanceSource,
    /// No geometric model registered
    MissingGeometry,
    /// Some slots are still unregistered
    Incomplete {
        actuators: u8,
        builders: u8,
        constraints: u8,
        state_hooks: u8,
    },
    /// Buffer length does not match the machine dimension
    DimensionMismatch { expected: usize, got: usize },
}

impl fmt::Display for NotReady {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotReady::MissingDistanceSource => f.write_str("no distance source registered"),
            NotReady::MissingGeometry => f.write_str("no geometry registered"),
            NotReady::Incomplete {
                actuators,
                builders,
                constraints,
                state_hooks,
            } => write!(
                f,
                "unregistered slots: {} actuators, {} builders, {} constraints, {} state hooks",
                actuators, builders, constraints, state_hooks
            ),
            NotReady::DimensionMismatch { expected, got } => {
                write!(f, "expected {} axes, got {}", expected, got)
            }
        }
    }
}

/// Construction of a controller or motion core failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError {
    /// More axes than [`crate::state::MAX_AXES`]
    DimensionTooLarge { dimension: usize, max: usize },
    /// More plug-ins in one category than [`crate::controller::MAX_HOOKS`]
    TooManyHooks { kind: Registrable, count: usize, max: usize },
    /// The two state slots disagree on dimension
    StateDimensionMismatch { a: usize, b: usize },
    /// States and controller disagree on dimension
    ControllerDimensionMismatch { states: usize, controller: usize },
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::DimensionTooLarge { dimension, max } => {
                write!(f, "{} axes requested, at most {} supported", dimension, max)
            }
            InitError::TooManyHooks { kind, count, max } => {
                write!(f, "{} {} slots requested, at most {}", count, kind, max)
            }
            InitError::StateDimensionMismatch { a, b } => {
                write!(f, "state slots have {} and {} axes", a, b)
            }
            InitError::ControllerDimensionMismatch { states, controller } => {
                write!(f, "states have {} axes, controller has {}", states, controller)
            }
        }
    }
}
