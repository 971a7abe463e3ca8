use std::fmt::Display;

use itertools::Itertools;

use super::Interval;
use crate::choice_points::ChoicePointDataSource;
use crate::choice_points::DataSourceRegistration;
use crate::choice_points::ReversibleChange;
use crate::choice_points::ReversibleLog;
use crate::choice_points::SourceDelta;
use crate::quince_asserts::quince_assert_eq_simple;
use crate::quince_asserts::quince_assert_moderate;
use crate::quince_asserts::quince_assert_simple;

/// One structural change to the interval list of an [`IntervalDomain`].
///
/// The location is the index of the interval in the sorted interval list at the moment the change
/// is applied; the same entry both re-applies and reverts the change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalChange {
    Insert { location: usize, interval: Interval },
    Delete { location: usize, interval: Interval },
    Resize {
        location: usize,
        old: Interval,
        new: Interval,
    },
}

impl ReversibleChange<Vec<Interval>> for IntervalChange {
    fn apply(&self, target: &mut Vec<Interval>) {
        match *self {
            IntervalChange::Insert { location, interval } => target.insert(location, interval),
            IntervalChange::Delete { location, interval } => {
                let removed = target.remove(location);
                quince_assert_eq_simple!(removed, interval);
            }
            IntervalChange::Resize { location, new, .. } => target[location] = new,
        }
    }

    fn revert(&self, target: &mut Vec<Interval>) {
        match *self {
            IntervalChange::Insert { location, interval } => {
                let removed = target.remove(location);
                quince_assert_eq_simple!(removed, interval);
            }
            IntervalChange::Delete { location, interval } => target.insert(location, interval),
            IntervalChange::Resize { location, old, .. } => target[location] = old,
        }
    }
}

/// An integer domain stored as a sorted list of disjoint, non-adjacent [`Interval`]s.
///
/// Once attached to a [`ChoicePointStack`](crate::choice_points::ChoicePointStack), every change
/// is logged as a sequence of [`IntervalChange`]s, which makes it reversible and replayable.
///
/// Removals return the intervals which were actually removed (in ascending order); the
/// propagation graph uses them to maintain the delta of a node.
#[derive(Debug, Clone)]
pub struct IntervalDomain {
    intervals: Vec<Interval>,
    log: ReversibleLog<IntervalChange>,
}

impl PartialEq for IntervalDomain {
    fn eq(&self, other: &Self) -> bool {
        self.intervals == other.intervals
    }
}

impl Eq for IntervalDomain {}

impl IntervalDomain {
    /// Creates the domain `[min..max]`.
    pub fn new(min: i32, max: i32) -> IntervalDomain {
        quince_assert_simple!(min <= max, "cannot create an empty domain [{min}..{max}]");
        IntervalDomain {
            intervals: vec![Interval::new(min, max)],
            log: ReversibleLog::default(),
        }
    }

    /// Creates the domain containing exactly the given values.
    pub fn from_values(values: impl IntoIterator<Item = i32>) -> IntervalDomain {
        let intervals = values
            .into_iter()
            .sorted_unstable()
            .dedup()
            .map(Interval::singleton)
            .coalesce(|previous, next| {
                if previous.max as i64 + 1 == next.min as i64 {
                    Ok(Interval::new(previous.min, next.max))
                } else {
                    Err((previous, next))
                }
            })
            .collect::<Vec<_>>();

        IntervalDomain {
            intervals,
            log: ReversibleLog::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn min(&self) -> i32 {
        quince_assert_simple!(!self.is_empty(), "the minimum of an empty domain is undefined");
        self.intervals[0].min
    }

    pub fn max(&self) -> i32 {
        quince_assert_simple!(!self.is_empty(), "the maximum of an empty domain is undefined");
        self.intervals[self.intervals.len() - 1].max
    }

    /// The number of values in the domain.
    pub fn size(&self) -> u64 {
        self.intervals.iter().map(Interval::size).sum()
    }

    /// Whether the domain has been reduced to a single value.
    pub fn is_bound(&self) -> bool {
        self.intervals.len() == 1 && self.intervals[0].min == self.intervals[0].max
    }

    /// The value of a bound domain.
    pub fn value(&self) -> Option<i32> {
        self.is_bound().then(|| self.intervals[0].min)
    }

    pub fn contains(&self, value: i32) -> bool {
        let position = self.intervals.partition_point(|interval| interval.max < value);
        self.intervals
            .get(position)
            .map(|interval| interval.contains(value))
            .unwrap_or(false)
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn values(&self) -> impl Iterator<Item = i32> + '_ {
        self.intervals.iter().flat_map(Interval::values)
    }

    /// The gaps between consecutive intervals.
    pub fn holes(&self) -> impl Iterator<Item = Interval> + '_ {
        self.intervals
            .iter()
            .tuple_windows()
            .map(|(lower, upper)| Interval::new(lower.max + 1, upper.min - 1))
    }

    /// Removes all values in `[lo..hi]`.
    pub fn remove_range(&mut self, lo: i32, hi: i32) -> Vec<Interval> {
        if lo > hi {
            return Vec::new();
        }

        let first = self.intervals.partition_point(|interval| interval.max < lo);
        let last = self.intervals.partition_point(|interval| interval.min <= hi);

        // Go from the highest location downwards so that the locations of the remaining changes
        // are unaffected.
        let mut removed = Vec::new();
        for location in (first..last).rev() {
            let interval = self.intervals[location];
            let keeps_lower = interval.min < lo;
            let keeps_upper = interval.max > hi;

            match (keeps_lower, keeps_upper) {
                (false, false) => {
                    self.apply(IntervalChange::Delete { location, interval });
                    removed.push(interval);
                }
                (true, true) => {
                    self.apply(IntervalChange::Resize {
                        location,
                        old: interval,
                        new: Interval::new(interval.min, lo - 1),
                    });
                    self.apply(IntervalChange::Insert {
                        location: location + 1,
                        interval: Interval::new(hi + 1, interval.max),
                    });
                    removed.push(Interval::new(lo, hi));
                }
                (true, false) => {
                    self.apply(IntervalChange::Resize {
                        location,
                        old: interval,
                        new: Interval::new(interval.min, lo - 1),
                    });
                    removed.push(Interval::new(lo, interval.max));
                }
                (false, true) => {
                    self.apply(IntervalChange::Resize {
                        location,
                        old: interval,
                        new: Interval::new(hi + 1, interval.max),
                    });
                    removed.push(Interval::new(interval.min, hi));
                }
            }
        }

        removed.reverse();
        removed
    }

    pub fn remove_value(&mut self, value: i32) -> Vec<Interval> {
        self.remove_range(value, value)
    }

    /// Removes every value below `min`.
    pub fn set_min(&mut self, min: i32) -> Vec<Interval> {
        if min == i32::MIN {
            return Vec::new();
        }
        self.remove_range(i32::MIN, min - 1)
    }

    /// Removes every value above `max`.
    pub fn set_max(&mut self, max: i32) -> Vec<Interval> {
        if max == i32::MAX {
            return Vec::new();
        }
        self.remove_range(max + 1, i32::MAX)
    }

    /// Removes every value other than `value`; the domain becomes empty if it did not contain it.
    pub fn bind(&mut self, value: i32) -> Vec<Interval> {
        let mut removed = self.set_min(value);
        removed.extend(self.set_max(value));
        removed
    }

    /// Adds all values in `[lo..hi]`, returning whether the domain changed.
    pub fn add_range(&mut self, lo: i32, hi: i32) -> bool {
        if lo > hi {
            return false;
        }

        // Intervals which overlap or touch `[lo..hi]` are merged with it.
        let first = self
            .intervals
            .partition_point(|interval| (interval.max as i64) < lo as i64 - 1);
        let last = self
            .intervals
            .partition_point(|interval| interval.min as i64 <= hi as i64 + 1);

        if first == last {
            self.apply(IntervalChange::Insert {
                location: first,
                interval: Interval::new(lo, hi),
            });
            return true;
        }

        let old = self.intervals[first];
        let merged = Interval::new(
            old.min.min(lo),
            old.max.max(hi).max(self.intervals[last - 1].max),
        );

        for location in (first + 1..last).rev() {
            let interval = self.intervals[location];
            self.apply(IntervalChange::Delete { location, interval });
        }
        if merged != old {
            self.apply(IntervalChange::Resize {
                location: first,
                old,
                new: merged,
            });
        }

        merged != old || last - first > 1
    }

    pub fn add_value(&mut self, value: i32) -> bool {
        self.add_range(value, value)
    }

    fn apply(&mut self, change: IntervalChange) {
        change.apply(&mut self.intervals);
        self.log.record(change);

        quince_assert_moderate!(self
            .intervals
            .iter()
            .tuple_windows()
            .all(|(lower, upper)| {
                lower.min <= lower.max && (lower.max as i64) + 1 < upper.min as i64
            }));
    }
}

impl Display for IntervalDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}", self.intervals.iter().join(", "))
    }
}

impl ChoicePointDataSource for IntervalDomain {
    fn registration(&self) -> Option<DataSourceRegistration> {
        self.log.registration()
    }

    fn attach_to_stack(&mut self, registration: DataSourceRegistration) {
        self.log.attach(registration)
    }

    fn after_push(&mut self, depth: usize) {
        self.log.enter_frame(depth)
    }

    fn before_pop(&mut self, depth: usize) {
        self.log.revert_frame(depth, &mut self.intervals)
    }

    fn after_pop(&mut self, depth: usize) {
        self.log.leave_frame(depth)
    }

    fn take_frame_delta(&mut self, depth: usize) -> Option<SourceDelta> {
        self.log.take_delta(depth, &mut self.intervals)
    }

    fn replay_frame_delta(&mut self, _depth: usize, delta: SourceDelta) {
        self.log.replay_delta(delta, &mut self.intervals)
    }

    fn reset(&mut self) {
        self.log.revert_all(&mut self.intervals)
    }
}
