//! Machine configuration types
//!
//! Speeds are in logical units per second, accelerations in logical units
//! per second squared. Native units are whatever `steps_per_unit`
//! converts to (usually microsteps).

use core::fmt;

use heapless::Vec;

use crate::state::MAX_AXES;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Mapping between logical and native coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GeometryKind {
    /// One motor per logical axis
    #[default]
    Cartesian,
    /// First two motors drive X and Y through a crossed belt
    CoreXy,
}

/// Per-axis drive configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AxisConfig {
    /// Native steps per logical unit
    pub steps_per_unit: f32,
    /// Maximum travel speed
    pub max_speed: f32,
    /// Minimum travel speed while moving (0 = may crawl arbitrarily slowly)
    pub min_speed: f32,
    /// Whether the pipeline may shorten or lengthen this axis's moves
    pub correctable: bool,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            steps_per_unit: 80.0, // GT2 belt + 20T pulley + 1/16 microstep
            max_speed: 200.0,
            min_speed: 0.0,
            correctable: true,
        }
    }
}

impl AxisConfig {
    /// Create an axis with the given resolution and top speed
    pub fn new(steps_per_unit: f32, max_speed: f32) -> Self {
        Self {
            steps_per_unit,
            max_speed,
            ..Default::default()
        }
    }

    /// Top speed in native steps per second
    pub fn max_steps_per_second(&self) -> f32 {
        self.max_speed * self.steps_per_unit
    }

    /// Bottom speed in native steps per second
    pub fn min_steps_per_second(&self) -> f32 {
        self.min_speed * self.steps_per_unit
    }

    /// Check if the axis has a lower speed limit
    pub fn has_speed_floor(&self) -> bool {
        self.min_speed > 0.0
    }
}

/// Machine-wide kinematic limits
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KinematicsConfig {
    /// Maximum toolhead acceleration
    pub max_acceleration: f32,
    /// Speed allowed through a full reversal; straight continuation is
    /// unrestricted
    pub max_junction_speed: f32,
}

impl Default for KinematicsConfig {
    fn default() -> Self {
        Self {
            max_acceleration: 3000.0,
            max_junction_speed: 5.0,
        }
    }
}

/// Configuration validation failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// No axes configured
    NoAxes,
    /// Steps per unit must be positive and finite
    InvalidResolution { axis: usize },
    /// Speeds must satisfy `0 <= min_speed < max_speed`
    InvalidSpeed { axis: usize },
    /// Acceleration must be positive
    InvalidAcceleration,
    /// CoreXY needs at least the X and Y motors
    TooFewAxesForGeometry,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoAxes => write!(f, "no axes configured"),
            ConfigError::InvalidResolution { axis } => {
                write!(f, "axis {}: steps per unit must be positive", axis)
            }
            ConfigError::InvalidSpeed { axis } => {
                write!(f, "axis {}: speed range is empty or negative", axis)
            }
            ConfigError::InvalidAcceleration => write!(f, "max acceleration must be positive"),
            ConfigError::TooFewAxesForGeometry => write!(f, "CoreXY needs at least two axes"),
        }
    }
}

/// Complete machine description
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MachineConfig {
    /// Coordinate mapping
    pub geometry: GeometryKind,
    /// Drive configuration, one entry per axis
    pub axes: Vec<AxisConfig, MAX_AXES>,
    /// Machine-wide limits
    pub kinematics: KinematicsConfig,
}

impl MachineConfig {
    /// Build a configuration from a list of axes
    ///
    /// Axes beyond [`MAX_AXES`] are dropped.
    pub fn new(geometry: GeometryKind, axes: &[AxisConfig], kinematics: KinematicsConfig) -> Self {
        let mut list = Vec::new();
        for axis in axes.iter().take(MAX_AXES) {
            let _ = list.push(*axis);
        }
        Self {
            geometry,
            axes: list,
            kinematics,
        }
    }

    /// Number of configured axes
    pub fn dimension(&self) -> usize {
        self.axes.len()
    }

    /// Check the configuration for values the models cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.axes.is_empty() {
            return Err(ConfigError::NoAxes);
        }

        for (axis, cfg) in self.axes.iter().enumerate() {
            if !(cfg.steps_per_unit.is_finite() && cfg.steps_per_unit > 0.0) {
                return Err(ConfigError::InvalidResolution { axis });
            }
            if !(cfg.max_speed > 0.0 && cfg.min_speed >= 0.0 && cfg.min_speed < cfg.max_speed) {
                return Err(ConfigError::InvalidSpeed { axis });
            }
        }

        if !(self.kinematics.max_acceleration > 0.0) {
            return Err(ConfigError::InvalidAcceleration);
        }

        if self.geometry == GeometryKind::CoreXy && self.axes.len() < 2 {
            return Err(ConfigError::TooFewAxesForGeometry);
        }

        Ok(())
    }
}
