//! Movement request buffer
//!
//! Caller-owned and reused between planning ticks. The distance source
//! fills `distances` during the pipeline; the core writes `time_to_dest`
//! on commit.

use crate::state::MAX_AXES;

/// One movement to plan
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MovementRequest {
    dimension: usize,
    /// Logical destination, read by target-based distance sources
    pub target: [f32; MAX_AXES],
    distances: [i32; MAX_AXES],
    time_to_dest: f32,
}

impl MovementRequest {
    /// Create an empty request for a machine with `dimension` axes
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.min(MAX_AXES),
            target: [0.0; MAX_AXES],
            distances: [0; MAX_AXES],
            time_to_dest: 0.0,
        }
    }

    /// Create a request with pre-filled native distances
    ///
    /// Extra entries beyond [`MAX_AXES`] are ignored.
    pub fn with_distances(distances: &[i32]) -> Self {
        let mut request = Self::new(distances.len());
        let n = request.dimension;
        request.distances[..n].copy_from_slice(&distances[..n]);
        request
    }

    /// Create a request aimed at a logical destination
    pub fn with_target(target: &[f32]) -> Self {
        let mut request = Self::new(target.len());
        request.set_target(target);
        request
    }

    /// Number of axes
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Per-axis signed native distances
    pub fn distances(&self) -> &[i32] {
        &self.distances[..self.dimension]
    }

    /// Mutable per-axis distances
    pub fn distances_mut(&mut self) -> &mut [i32] {
        &mut self.distances[..self.dimension]
    }

    /// Logical destination for the active axes
    pub fn target(&self) -> &[f32] {
        &self.target[..self.dimension]
    }

    /// Set the logical destination
    pub fn set_target(&mut self, target: &[f32]) {
        let n = self.dimension.min(target.len());
        self.target[..n].copy_from_slice(&target[..n]);
    }

    /// Duration committed for this movement, in seconds
    pub fn time_to_dest(&self) -> f32 {
        self.time_to_dest
    }

    pub(crate) fn set_time_to_dest(&mut self, t: f32) {
        self.time_to_dest = t;
    }
}
