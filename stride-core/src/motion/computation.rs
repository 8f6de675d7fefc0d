//! Per-movement computation scratch
//!
//! Owned by the motion core and reused on every call. Holds the per-axis
//! duration windows, the consensus window, and the controller's own
//! scratch value which survives between calls.

use crate::interval::{merge, TimeInterval};
use crate::state::MAX_AXES;

/// Scratch area shared by the pipeline stages
#[derive(Debug, Clone)]
pub struct Computation<S> {
    dimension: usize,
    intervals: [TimeInterval; MAX_AXES],
    /// Consensus duration window
    pub final_interval: TimeInterval,
    /// Controller-owned scratch, carried across calls
    pub controller: S,
}

impl<S> Computation<S> {
    /// Create a scratch area for `dimension` axes
    pub fn new(dimension: usize, controller: S) -> Self {
        Self {
            dimension: dimension.min(MAX_AXES),
            intervals: [TimeInterval::largest(); MAX_AXES],
            final_interval: TimeInterval::largest(),
            controller,
        }
    }

    /// Per-axis duration windows of the last movement
    pub fn intervals(&self) -> &[TimeInterval] {
        &self.intervals[..self.dimension]
    }

    pub(crate) fn intervals_mut(&mut self) -> &mut [TimeInterval] {
        &mut self.intervals[..self.dimension]
    }

    /// Merge per-axis windows into the consensus window
    ///
    /// When no common duration exists, one is imposed: `previous` if the
    /// merge has no upper bound (falling back to the merged minimum before
    /// any movement was committed), otherwise the midpoint of the merged
    /// bounds. Every axis whose own window cannot honour the imposed
    /// duration is marked invalid with its `min` pinned to it, flagging the
    /// axis for distance correction.
    ///
    /// Returns `true` when a duration had to be imposed.
    pub(crate) fn resolve_consensus(&mut self, previous: Option<f32>) -> bool {
        let merged = merge(self.intervals());
        self.final_interval = merged;

        if merged.valid {
            return false;
        }

        let duration = match merged.max {
            None => previous.unwrap_or(merged.min),
            Some(max) => (merged.min + max) / 2.0,
        };
        debug!(
            "consensus: no common duration (min {} max {:?}), imposing {}",
            merged.min, merged.max, duration
        );

        self.final_interval.collapse_to(duration);

        for interval in self.intervals_mut() {
            if interval.empty {
                continue;
            }
            if !interval.valid || !interval.contains(duration) {
                interval.valid = false;
                interval.min = duration;
            }
        }

        true
    }
}
