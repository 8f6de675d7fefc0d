//! Motion computation
//!
//! The per-movement pipeline and the scratch area it works in.

pub mod computation;
pub mod pipeline;

#[cfg(test)]
mod tests;

pub use computation::Computation;
pub use pipeline::MotionCore;
