use super::SourceDelta;
use crate::containers::StorageKey;
#[cfg(doc)]
use crate::choice_points::ChoicePointStack;

/// Identifies a data source registered with a [`ChoicePointStack`].
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct DataSourceId(u32);

impl std::fmt::Display for DataSourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DataSource({})", self.0)
    }
}

impl StorageKey for DataSourceId {
    fn index(&self) -> usize {
        self.0 as usize
    }

    fn create_from_index(index: usize) -> Self {
        DataSourceId(index as u32)
    }
}

/// The result of registering a data source with a [`ChoicePointStack`].
///
/// `depth` is the number of frames which were open at the time of registration; the source takes
/// part in that frame and in every frame opened after it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DataSourceRegistration {
    pub id: DataSourceId,
    pub depth: usize,
}

/// A mutable structure whose changes are made reversible by a [`ChoicePointStack`].
///
/// The stack drives a source through four lifecycle callbacks (before/after push, before/after
/// pop). `depth` is always the depth of the frame being opened or closed, i.e. `1` for the first
/// frame above the root. Implementations normally keep their changes in a
/// [`ReversibleLog`](super::ReversibleLog) and forward every callback to it.
pub trait ChoicePointDataSource {
    /// The registration of this source, or [`None`] if it has not been attached to a stack.
    /// Unattached sources are skipped by every stack operation.
    fn registration(&self) -> Option<DataSourceRegistration>;

    /// Called once with the result of [`ChoicePointStack::register_data_source`].
    fn attach_to_stack(&mut self, registration: DataSourceRegistration);

    /// Called before the frame at `depth` is opened.
    fn before_push(&mut self, _depth: usize) {}

    /// Called after the frame at `depth` is opened; subsequent changes belong to this frame.
    fn after_push(&mut self, depth: usize);

    /// Called before the frame at `depth` is closed; all changes recorded in that frame have to be
    /// reverted.
    fn before_pop(&mut self, depth: usize);

    /// Called after the frame at `depth` is closed.
    fn after_pop(&mut self, _depth: usize) {}

    /// Replaces [`ChoicePointDataSource::before_pop`] when the frame is popped with
    /// [`ChoicePointStack::pop_delta`]: the changes of the frame are reverted and returned.
    ///
    /// Returns [`None`] if nothing was recorded in the frame.
    fn take_frame_delta(&mut self, depth: usize) -> Option<SourceDelta>;

    /// Re-applies a delta previously produced by [`ChoicePointDataSource::take_frame_delta`] on
    /// this very source, in the freshly opened frame at `depth`.
    ///
    /// Passing a delta of another source is a precondition violation and panics.
    fn replay_frame_delta(&mut self, depth: usize, delta: SourceDelta);

    /// Reverts every recorded change, returning the source to its state at registration.
    fn reset(&mut self);
}

/// A collection of data sources which is handed to the [`ChoicePointStack`] operations.
pub trait DataSources {
    fn for_each_source(&mut self, action: &mut dyn FnMut(&mut dyn ChoicePointDataSource));
}

impl<Source: ChoicePointDataSource> DataSources for [Source] {
    fn for_each_source(&mut self, action: &mut dyn FnMut(&mut dyn ChoicePointDataSource)) {
        self.iter_mut().for_each(|source| action(source))
    }
}

impl<Source: ChoicePointDataSource> DataSources for Vec<Source> {
    fn for_each_source(&mut self, action: &mut dyn FnMut(&mut dyn ChoicePointDataSource)) {
        self.as_mut_slice().for_each_source(action)
    }
}
