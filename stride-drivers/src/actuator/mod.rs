//! Actuator model implementations

pub mod speed;
pub mod window;

pub use speed::SpeedLimitedAxis;
pub use window::SpeedWindowAxis;
