use std::fmt::Debug;

use super::DataSourceRegistration;
use super::SourceDelta;
use crate::quince_asserts::quince_assert_eq_simple;
use crate::quince_asserts::quince_assert_moderate;
use crate::quince_asserts::quince_assert_simple;

/// A single entry of a [`ReversibleLog`], which knows how to re-apply and undo itself on the
/// structure it was recorded for.
pub trait ReversibleChange<Target: ?Sized>: Debug + 'static {
    fn apply(&self, target: &mut Target);

    fn revert(&self, target: &mut Target);
}

/// The dense change log of one data source, partitioned into frames.
///
/// A frame's segment is only allocated when the first change is recorded in it, so frames in
/// which a source does not change cost nothing. Changes made at the root (depth `0`) are
/// permanent and are never recorded, neither are changes made before the log is attached to a
/// stack.
#[derive(Debug, Clone)]
pub struct ReversibleLog<Change> {
    registration: Option<DataSourceRegistration>,
    /// The depth of the innermost open frame, mirroring the depth of the stack.
    depth: usize,
    /// For each frame with at least one change: its depth and the index in `changes` where its
    /// segment starts.
    segments: Vec<Segment>,
    changes: Vec<Change>,
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    depth: usize,
    start: usize,
}

// We explicitly implement the Default and not as a macro, because we want to avoid imposing Default
// on the generic type Change.
impl<Change> Default for ReversibleLog<Change> {
    fn default() -> Self {
        ReversibleLog {
            registration: None,
            depth: 0,
            segments: Vec::new(),
            changes: Vec::new(),
        }
    }
}

impl<Change> ReversibleLog<Change> {
    pub fn attach(&mut self, registration: DataSourceRegistration) {
        quince_assert_simple!(
            self.registration.is_none(),
            "a data source can only be attached to a choice point stack once"
        );
        self.registration = Some(registration);
        self.depth = registration.depth;
    }

    pub fn registration(&self) -> Option<DataSourceRegistration> {
        self.registration
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Whether [`ReversibleLog::record`] currently keeps the changes it is given.
    pub fn is_recording(&self) -> bool {
        self.registration.is_some() && self.depth > 0
    }

    /// The number of changes recorded over all open frames.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// The changes recorded in the frame at `depth`.
    pub fn changes_at(&self, depth: usize) -> &[Change] {
        match self.segments.iter().position(|segment| segment.depth == depth) {
            Some(position) => {
                let start = self.segments[position].start;
                let end = self
                    .segments
                    .get(position + 1)
                    .map(|segment| segment.start)
                    .unwrap_or(self.changes.len());
                &self.changes[start..end]
            }
            None => &[],
        }
    }

    /// Records a change which has already been applied to the source.
    pub fn record(&mut self, change: Change) {
        if !self.is_recording() {
            return;
        }

        if self.segments.last().map(|segment| segment.depth) != Some(self.depth) {
            self.segments.push(Segment {
                depth: self.depth,
                start: self.changes.len(),
            });
        }
        self.changes.push(change);
    }

    pub fn enter_frame(&mut self, depth: usize) {
        quince_assert_eq_simple!(
            self.depth + 1,
            depth,
            "the frames of a data source drifted from the frames of its stack"
        );
        self.depth = depth;
    }

    pub fn leave_frame(&mut self, depth: usize) {
        quince_assert_eq_simple!(
            self.depth,
            depth,
            "the frames of a data source drifted from the frames of its stack"
        );
        self.depth = depth - 1;
    }

    /// Detaches the segment of the frame at `depth`, returning where it starts.
    fn take_segment(&mut self, depth: usize) -> Option<usize> {
        quince_assert_moderate!(self
            .segments
            .last()
            .map(|segment| segment.depth <= depth)
            .unwrap_or(true));

        if self.segments.last()?.depth != depth {
            return None;
        }

        self.segments.pop().map(|segment| segment.start)
    }

    /// Undoes every change of the frame at `depth`, newest first.
    pub fn revert_frame<Target: ?Sized>(&mut self, depth: usize, target: &mut Target)
    where
        Change: ReversibleChange<Target>,
    {
        if let Some(start) = self.take_segment(depth) {
            self.changes
                .drain(start..)
                .rev()
                .for_each(|change| change.revert(target));
        }
    }

    /// Undoes every change of the frame at `depth` and returns them in the order in which they
    /// were originally made.
    pub fn extract_frame<Target: ?Sized>(
        &mut self,
        depth: usize,
        target: &mut Target,
    ) -> Vec<Change>
    where
        Change: ReversibleChange<Target>,
    {
        let Some(start) = self.take_segment(depth) else {
            return Vec::new();
        };

        let changes: Vec<Change> = self.changes.drain(start..).collect();
        changes.iter().rev().for_each(|change| change.revert(target));
        changes
    }

    /// Re-applies `changes` in order and records them in the innermost frame.
    pub fn replay<Target: ?Sized>(&mut self, changes: Vec<Change>, target: &mut Target)
    where
        Change: ReversibleChange<Target>,
    {
        for change in changes {
            change.apply(target);
            self.record(change);
        }
    }

    /// Undoes every recorded change and returns to the root.
    pub fn revert_all<Target: ?Sized>(&mut self, target: &mut Target)
    where
        Change: ReversibleChange<Target>,
    {
        self.changes
            .drain(..)
            .rev()
            .for_each(|change| change.revert(target));
        self.segments.clear();
        self.depth = 0;
    }
}

impl<Change: Debug + 'static> ReversibleLog<Change> {
    /// [`ReversibleLog::extract_frame`] wrapped into a [`SourceDelta`] of the attached source.
    pub fn take_delta<Target: ?Sized>(
        &mut self,
        depth: usize,
        target: &mut Target,
    ) -> Option<SourceDelta>
    where
        Change: ReversibleChange<Target>,
    {
        let registration = self.registration?;
        let changes = self.extract_frame(depth, target);

        (!changes.is_empty()).then(|| SourceDelta::new(registration.id, changes))
    }

    /// [`ReversibleLog::replay`] for a [`SourceDelta`] which must have been produced by this log.
    pub fn replay_delta<Target: ?Sized>(&mut self, delta: SourceDelta, target: &mut Target)
    where
        Change: ReversibleChange<Target>,
    {
        let Some(registration) = self.registration else {
            panic!("a delta can only be replayed on a data source attached to a stack");
        };
        let changes = delta.into_changes::<Change>(registration.id);
        self.replay(changes, target);
    }
}
