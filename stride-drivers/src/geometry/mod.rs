//! Geometric model implementations

pub mod cartesian;
pub mod corexy;

pub use cartesian::Cartesian;
pub use corexy::CoreXy;
