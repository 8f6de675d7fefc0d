//! Duration window algebra
//!
//! Closed, possibly unbounded windows of admissible movement durations.
//! Every per-axis physical limit and every kinematic constraint is expressed
//! as one of these; the motion core folds them into a single consensus
//! window.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Admissible duration range for a movement, in seconds
///
/// `max: None` means the window is unbounded above. A valid, non-empty
/// window always satisfies `min <= max` when `max` exists.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeInterval {
    /// Lower bound (always defined)
    pub min: f32,
    /// Upper bound, if any
    pub max: Option<f32>,
    /// Window can be honoured
    pub valid: bool,
    /// Window carries no constraint at all (e.g. zero-length axis move)
    pub empty: bool,
}

impl Default for TimeInterval {
    fn default() -> Self {
        Self::largest()
    }
}

impl TimeInterval {
    /// The unconstrained window `[0, ∞)`
    pub const fn largest() -> Self {
        Self {
            min: 0.0,
            max: None,
            valid: true,
            empty: false,
        }
    }

    /// A valid window that imposes nothing on the merge
    pub const fn empty() -> Self {
        Self {
            min: 0.0,
            max: None,
            valid: true,
            empty: true,
        }
    }

    /// The window containing exactly `t`
    pub const fn singleton(t: f32) -> Self {
        Self {
            min: t,
            max: Some(t),
            valid: true,
            empty: false,
        }
    }

    /// `[t, ∞)`
    pub const fn at_least(t: f32) -> Self {
        Self {
            min: t,
            max: None,
            valid: true,
            empty: false,
        }
    }

    /// `[min, max]`, invalid if the bounds are crossed
    pub fn bounded(min: f32, max: f32) -> Self {
        Self {
            min,
            max: Some(max),
            valid: min <= max,
            empty: false,
        }
    }

    /// Check whether the window is collapsed to one duration
    pub fn is_singleton(&self) -> bool {
        self.valid && !self.empty && self.max == Some(self.min)
    }

    /// Check whether `t` lies inside the window bounds
    ///
    /// Validity is not considered; an empty window contains everything.
    pub fn contains(&self, t: f32) -> bool {
        if self.empty {
            return true;
        }
        t >= self.min && self.max.map_or(true, |max| t <= max)
    }

    /// Force the window to the valid singleton `{t}`
    pub fn collapse_to(&mut self, t: f32) {
        *self = Self::singleton(t);
    }
}

/// Fold several windows into the tightest window satisfying all of them
///
/// - `min` is the largest `min` among non-empty windows
/// - `max` is the smallest existing `max` (absent if none exist)
/// - `empty` only if every input is empty
/// - `valid` only if every input is valid and the result is not crossed
///
/// Durations are non-negative, so an all-empty fold yields `min = 0`.
pub fn merge(intervals: &[TimeInterval]) -> TimeInterval {
    let mut min = 0.0f32;
    let mut max: Option<f32> = None;
    let mut all_empty = true;
    let mut all_valid = true;

    for interval in intervals {
        all_valid &= interval.valid;

        if !interval.empty {
            all_empty = false;
            if interval.min > min {
                min = interval.min;
            }
        }

        if let Some(candidate) = interval.max {
            max = Some(match max {
                Some(current) if current <= candidate => current,
                _ => candidate,
            });
        }
    }

    let ordered = max.map_or(true, |max| min <= max);

    TimeInterval {
        min,
        max,
        valid: all_valid && ordered,
        empty: all_empty,
    }
}

/// Narrow `dst` by `bound`
///
/// An invalid or empty `bound` leaves `dst` untouched. Returns `true` when
/// `dst` ends up as a singleton, at which point further narrowing cannot
/// change the chosen duration.
///
/// When the two windows do not overlap, `dst` collapses to its own bound
/// closest to `bound` rather than becoming invalid.
pub fn intersect(dst: &mut TimeInterval, bound: &TimeInterval) -> bool {
    if !bound.valid || bound.empty {
        return dst.is_singleton();
    }

    if bound.min > dst.min {
        if let Some(dst_max) = dst.max {
            if bound.min >= dst_max {
                dst.collapse_to(dst_max);
                return true;
            }
        }
        dst.min = bound.min;
    }

    if let Some(bound_max) = bound.max {
        if bound_max <= dst.min {
            let at = dst.min;
            dst.collapse_to(at);
            return true;
        }

        match dst.max {
            Some(dst_max) if dst_max <= bound_max => {}
            _ => dst.max = Some(bound_max),
        }
    }

    dst.is_singleton()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_largest_is_unconstrained() {
        let l = TimeInterval::largest();
        assert_eq!(l.min, 0.0);
        assert_eq!(l.max, None);
        assert!(l.valid);
        assert!(!l.empty);
        assert!(l.contains(1.0e9));
    }

    #[test]
    fn test_merge_of_largest_is_largest() {
        let all = [TimeInterval::largest(); 5];
        assert_eq!(merge(&all), TimeInterval::largest());
    }

    #[test]
    fn test_merge_takes_tightest_bounds() {
        let windows = [
            TimeInterval::bounded(1.0, 10.0),
            TimeInterval::bounded(2.0, 6.0),
            TimeInterval::at_least(0.5),
        ];
        let merged = merge(&windows);
        assert_eq!(merged.min, 2.0);
        assert_eq!(merged.max, Some(6.0));
        assert!(merged.valid);
        assert!(!merged.empty);
    }

    #[test]
    fn test_merge_crossed_bounds_is_invalid() {
        let windows = [TimeInterval::bounded(10.0, 20.0), TimeInterval::bounded(5.0, 8.0)];
        let merged = merge(&windows);
        assert_eq!(merged.min, 10.0);
        assert_eq!(merged.max, Some(8.0));
        assert!(!merged.valid);
    }

    #[test]
    fn test_merge_ignores_min_of_empty() {
        let mut ghost = TimeInterval::empty();
        ghost.min = 99.0;
        let merged = merge(&[ghost, TimeInterval::at_least(3.0)]);
        assert_eq!(merged.min, 3.0);
        assert!(!merged.empty);
    }

    #[test]
    fn test_merge_all_empty() {
        let merged = merge(&[TimeInterval::empty(), TimeInterval::empty()]);
        assert!(merged.empty);
        assert!(merged.valid);
    }

    #[test]
    fn test_merge_propagates_invalid_input() {
        let mut broken = TimeInterval::at_least(1.0);
        broken.valid = false;
        let merged = merge(&[broken, TimeInterval::largest()]);
        assert!(!merged.valid);
    }

    #[test]
    fn test_merge_tie_is_valid_singleton() {
        let merged = merge(&[TimeInterval::bounded(4.0, 5.0), TimeInterval::bounded(1.0, 4.0)]);
        assert!(merged.valid);
        assert!(merged.is_singleton());
    }

    #[test]
    fn test_intersect_raises_min() {
        let mut dst = TimeInterval::bounded(1.0, 10.0);
        assert!(!intersect(&mut dst, &TimeInterval::at_least(3.0)));
        assert_eq!(dst, TimeInterval::bounded(3.0, 10.0));
    }

    #[test]
    fn test_intersect_tightens_max() {
        let mut dst = TimeInterval::at_least(1.0);
        assert!(!intersect(&mut dst, &TimeInterval::bounded(0.0, 4.0)));
        assert_eq!(dst.min, 1.0);
        assert_eq!(dst.max, Some(4.0));
    }

    #[test]
    fn test_intersect_min_beyond_max_collapses_to_max() {
        let mut dst = TimeInterval::bounded(1.0, 5.0);
        assert!(intersect(&mut dst, &TimeInterval::at_least(7.0)));
        assert_eq!(dst, TimeInterval::singleton(5.0));
    }

    #[test]
    fn test_intersect_max_below_min_collapses_to_min() {
        let mut dst = TimeInterval::bounded(3.0, 5.0);
        assert!(intersect(&mut dst, &TimeInterval::bounded(0.0, 2.0)));
        assert_eq!(dst, TimeInterval::singleton(3.0));
    }

    #[test]
    fn test_intersect_touching_bounds_is_singleton() {
        let mut dst = TimeInterval::bounded(3.0, 5.0);
        assert!(intersect(&mut dst, &TimeInterval::bounded(1.0, 3.0)));
        assert_eq!(dst, TimeInterval::singleton(3.0));
    }

    #[test]
    fn test_intersect_ignores_invalid_and_empty_bounds() {
        let mut dst = TimeInterval::bounded(1.0, 5.0);
        let mut invalid = TimeInterval::bounded(2.0, 3.0);
        invalid.valid = false;
        assert!(!intersect(&mut dst, &invalid));
        assert!(!intersect(&mut dst, &TimeInterval::empty()));
        assert_eq!(dst, TimeInterval::bounded(1.0, 5.0));
    }

    #[test]
    fn test_intersect_reports_existing_singleton() {
        let mut dst = TimeInterval::singleton(2.0);
        assert!(intersect(&mut dst, &TimeInterval::bounded(0.0, 10.0)));
        assert_eq!(dst, TimeInterval::singleton(2.0));
    }

    fn window() -> impl Strategy<Value = TimeInterval> {
        (0.0f32..100.0, proptest::option::of(0.0f32..100.0), any::<bool>(), any::<bool>()).prop_map(
            |(min, span, valid, empty)| TimeInterval {
                min,
                max: span.map(|s| min + s),
                valid,
                empty,
            },
        )
    }

    proptest! {
        #[test]
        fn merge_bounds_match_folds(windows in proptest::collection::vec(window(), 1..8)) {
            let merged = merge(&windows);

            let expected_min = windows
                .iter()
                .filter(|w| !w.empty)
                .fold(0.0f32, |acc, w| acc.max(w.min));
            prop_assert_eq!(merged.min, expected_min);

            let expected_max = windows
                .iter()
                .filter_map(|w| w.max)
                .fold(None, |acc: Option<f32>, m| Some(acc.map_or(m, |a| a.min(m))));
            prop_assert_eq!(merged.max, expected_max);

            prop_assert_eq!(merged.empty, windows.iter().all(|w| w.empty));

            let ordered = expected_max.map_or(true, |m| expected_min <= m);
            prop_assert_eq!(merged.valid, windows.iter().all(|w| w.valid) && ordered);
        }

        #[test]
        fn intersect_result_stays_in_both_windows(
            a_min in 0.0f32..50.0,
            a_span in 0.0f32..50.0,
            b_min in 0.0f32..50.0,
            b_span in 0.0f32..50.0,
        ) {
            let mut dst = TimeInterval::bounded(a_min, a_min + a_span);
            let bound = TimeInterval::bounded(b_min, b_min + b_span);
            let before = dst;

            let singleton = intersect(&mut dst, &bound);
            prop_assert_eq!(singleton, dst.is_singleton());
            prop_assert!(dst.valid);

            let overlap = before.min <= bound.max.unwrap() && bound.min <= before.max.unwrap();
            if overlap {
                prop_assert!(dst.min >= before.min && dst.min >= bound.min);
                let max = dst.max.unwrap();
                prop_assert!(max <= before.max.unwrap() && max <= bound.max.unwrap());
            }
        }
    }
}
