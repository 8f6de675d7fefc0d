//! Configured machine
//!
//! Builds every model a controller needs from a [`MachineConfig`] and owns
//! them, so a controller or a whole motion core can borrow from one place:
//!
//! ```ignore
//! let machine = Machine::from_config(&config, DistanceMode::Absolute)?;
//! let mut core = machine.motion_core()?;
//! core.set_position(&[0, 0, 0])?;
//! ```

use core::fmt;

use heapless::Vec;
use stride_core::config::{AxisConfig, ConfigError, GeometryKind, MachineConfig};
use stride_core::traits::{ActuatorModel, DistanceSource, GeometricModel};
use stride_core::{
    HookCounts, InitError, MachineState, MotionController, MotionCore, MovementRequest,
    RegistrationError, TimeInterval, MAX_AXES,
};

use crate::actuator::{SpeedLimitedAxis, SpeedWindowAxis};
use crate::distance::{AbsoluteTarget, RelativeSteps};
use crate::geometry::{Cartesian, CoreXy};
use crate::kinematics::{
    AccelerationLimit, ExitSpeedHook, JunctionSpeedBuilder, MotionExt, MoveScratch,
    PathLengthBuilder, TOOLHEAD_AXES,
};

/// Motion core over the kinematics plug-ins
pub type MachineCore<'a> = MotionCore<'a, MotionExt, MoveScratch>;

/// Controller over the kinematics plug-ins
pub type MachineController<'a> = MotionController<'a, MotionExt, MoveScratch>;

/// Plug-in slots a [`Machine`] fills
pub const HOOKS: HookCounts = HookCounts {
    builders: 2,
    constraints: 1,
    state_hooks: 1,
};

/// How requests describe their movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DistanceMode {
    /// Native step deltas
    #[default]
    Relative,
    /// Absolute logical target
    Absolute,
}

/// Actuator model chosen per axis from its configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AxisModel {
    Limited(SpeedLimitedAxis),
    Window(SpeedWindowAxis),
}

impl AxisModel {
    /// Axes with a speed floor get a two-sided window
    pub fn from_config(config: &AxisConfig) -> Self {
        if config.has_speed_floor() {
            AxisModel::Window(SpeedWindowAxis::from_config(config))
        } else {
            AxisModel::Limited(SpeedLimitedAxis::from_config(config))
        }
    }
}

impl<X> ActuatorModel<X> for AxisModel {
    fn duration_for(&self, distance: i32, current: &MachineState<X>) -> Option<TimeInterval> {
        match self {
            AxisModel::Limited(axis) => axis.duration_for(distance, current),
            AxisModel::Window(axis) => axis.duration_for(distance, current),
        }
    }

    fn min_distance_for(&self, duration: f32, distance: i32) -> Option<i32> {
        match self {
            AxisModel::Limited(axis) => ActuatorModel::<X>::min_distance_for(axis, duration, distance),
            AxisModel::Window(axis) => ActuatorModel::<X>::min_distance_for(axis, duration, distance),
        }
    }
}

/// Geometry chosen by [`GeometryKind`]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Geometry {
    Cartesian(Cartesian),
    CoreXy(CoreXy),
}

impl Geometry {
    pub fn from_config(config: &MachineConfig) -> Self {
        match config.geometry {
            GeometryKind::Cartesian => Geometry::Cartesian(Cartesian::from_config(config)),
            GeometryKind::CoreXy => Geometry::CoreXy(CoreXy::from_config(config)),
        }
    }
}

impl GeometricModel for Geometry {
    fn control_to_actuation(&self, control: &[f32], actuation: &mut [i32]) {
        match self {
            Geometry::Cartesian(g) => g.control_to_actuation(control, actuation),
            Geometry::CoreXy(g) => g.control_to_actuation(control, actuation),
        }
    }

    fn actuation_to_control(&self, actuation: &[i32], control: &mut [f32]) {
        match self {
            Geometry::Cartesian(g) => g.actuation_to_control(actuation, control),
            Geometry::CoreXy(g) => g.actuation_to_control(actuation, control),
        }
    }
}

/// Distance source chosen by [`DistanceMode`]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Distances {
    Relative(RelativeSteps),
    Absolute(AbsoluteTarget<Geometry>),
}

impl<X> DistanceSource<X> for Distances {
    fn compute(
        &self,
        current: &MachineState<X>,
        next: &mut MachineState<X>,
        request: &mut MovementRequest,
    ) {
        match self {
            Distances::Relative(source) => source.compute(current, next, request),
            Distances::Absolute(source) => source.compute(current, next, request),
        }
    }
}

/// Failure assembling a controller from a configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MachineError {
    Config(ConfigError),
    Init(InitError),
    Registration(RegistrationError),
}

impl From<ConfigError> for MachineError {
    fn from(e: ConfigError) -> Self {
        MachineError::Config(e)
    }
}

impl From<InitError> for MachineError {
    fn from(e: InitError) -> Self {
        MachineError::Init(e)
    }
}

impl From<RegistrationError> for MachineError {
    fn from(e: RegistrationError) -> Self {
        MachineError::Registration(e)
    }
}

impl fmt::Display for MachineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MachineError::Config(e) => write!(f, "config: {}", e),
            MachineError::Init(e) => write!(f, "init: {}", e),
            MachineError::Registration(e) => write!(f, "registration: {}", e),
        }
    }
}

/// Every model of one machine, ready to be registered
#[derive(Debug, Clone)]
pub struct Machine {
    axes: Vec<AxisModel, MAX_AXES>,
    geometry: Geometry,
    distances: Distances,
    path: PathLengthBuilder,
    junction: JunctionSpeedBuilder,
    acceleration: AccelerationLimit,
    exit: ExitSpeedHook,
}

impl Machine {
    /// Validate `config` and build its models
    pub fn from_config(config: &MachineConfig, mode: DistanceMode) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut axes = Vec::new();
        for axis in config.axes.iter() {
            // Capacities match, validated config cannot overflow
            let _ = axes.push(AxisModel::from_config(axis));
        }

        let geometry = Geometry::from_config(config);
        let distances = match mode {
            DistanceMode::Relative => Distances::Relative(RelativeSteps),
            DistanceMode::Absolute => Distances::Absolute(AbsoluteTarget::new(geometry)),
        };

        Ok(Self {
            axes,
            geometry,
            distances,
            path: PathLengthBuilder::new(TOOLHEAD_AXES.min(config.dimension())),
            junction: JunctionSpeedBuilder::new(config.kinematics.max_junction_speed),
            acceleration: AccelerationLimit::new(config.kinematics.max_acceleration),
            exit: ExitSpeedHook,
        })
    }

    /// Number of axes
    pub fn dimension(&self) -> usize {
        self.axes.len()
    }

    /// The geometry in use
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// A controller with every slot registered
    pub fn controller(&self) -> Result<MachineController<'_>, MachineError> {
        let mut controller = MotionController::new(self.dimension(), HOOKS)?;

        controller.set_distance_source(&self.distances)?;
        controller.set_geometry(&self.geometry)?;
        for (index, axis) in self.axes.iter().enumerate() {
            controller.set_actuator(index, axis)?;
        }
        controller.set_builder(0, &self.path)?;
        controller.set_builder(1, &self.junction)?;
        controller.set_constraint(0, &self.acceleration)?;
        controller.set_state_hook(0, &self.exit)?;

        Ok(controller)
    }

    /// A motion core at rest with unknown position
    pub fn motion_core(&self) -> Result<MachineCore<'_>, MachineError> {
        let dimension = self.dimension();
        let core = MotionCore::new(
            self.controller()?,
            MachineState::new(dimension),
            MachineState::new(dimension),
            MoveScratch::default(),
        )?;
        Ok(core)
    }
}
