use std::fmt::Debug;

use downcast_rs::impl_downcast;
use downcast_rs::Downcast;

use super::DataSourceId;
#[cfg(doc)]
use super::ChoicePointStack;

/// The type-erased change log of a single data source.
///
/// Every `Vec<Change>` is a [`DeltaLog`]; the source which produced it downcasts it back when the
/// delta is replayed.
pub trait DeltaLog: Downcast + Debug {
    fn num_changes(&self) -> usize;
}

impl_downcast!(DeltaLog);

impl<Change: Debug + 'static> DeltaLog for Vec<Change> {
    fn num_changes(&self) -> usize {
        <[Change]>::len(self)
    }
}

/// The changes a single data source recorded in one frame.
#[derive(Debug)]
pub struct SourceDelta {
    source: DataSourceId,
    changes: Box<dyn DeltaLog>,
}

impl SourceDelta {
    pub fn new<Change: Debug + 'static>(source: DataSourceId, changes: Vec<Change>) -> Self {
        SourceDelta {
            source,
            changes: Box::new(changes),
        }
    }

    /// The data source which recorded the changes.
    pub fn source(&self) -> DataSourceId {
        self.source
    }

    pub fn num_changes(&self) -> usize {
        self.changes.num_changes()
    }

    /// Recovers the concrete changes.
    ///
    /// # Panics
    /// When the delta was produced by a source other than `expected_source`, or holds changes of
    /// another type. Both mean the delta is replayed on the wrong source.
    pub fn into_changes<Change: Debug + 'static>(
        self,
        expected_source: DataSourceId,
    ) -> Vec<Change> {
        assert_eq!(
            self.source, expected_source,
            "a delta recorded by {} cannot be replayed on {expected_source}",
            self.source
        );

        match self.changes.downcast::<Vec<Change>>() {
            Ok(changes) => *changes,
            Err(changes) => panic!(
                "the delta of {expected_source} holds changes of an unexpected type: {changes:?}"
            ),
        }
    }
}

/// The per-source deltas of one frame, produced by [`ChoicePointStack::pop_delta`] and consumed by
/// [`ChoicePointStack::push_delta`].
#[derive(Debug)]
pub struct ChoicePointDelta {
    pub(crate) depth: usize,
    pub(crate) sources: Vec<SourceDelta>,
}

impl ChoicePointDelta {
    /// The depth of the frame the delta was captured from; it can only be replayed as a frame at
    /// that same depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The total number of changes over all sources.
    pub fn num_changes(&self) -> usize {
        self.sources.iter().map(SourceDelta::num_changes).sum()
    }

    /// Whether no source changed in the frame.
    pub fn is_empty(&self) -> bool {
        self.num_changes() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::StorageKey;

    #[test]
    fn changes_are_recovered() {
        let source = DataSourceId::create_from_index(2);
        let delta = SourceDelta::new(source, vec![1_i64, 2, 3]);

        assert_eq!(3, delta.num_changes());
        assert_eq!(vec![1_i64, 2, 3], delta.into_changes::<i64>(source));
    }

    #[test]
    #[should_panic(expected = "cannot be replayed on")]
    fn replaying_on_another_source_panics() {
        let delta = SourceDelta::new(DataSourceId::create_from_index(0), vec![1_i64]);

        let _ = delta.into_changes::<i64>(DataSourceId::create_from_index(1));
    }

    #[test]
    #[should_panic(expected = "unexpected type")]
    fn replaying_changes_of_another_type_panics() {
        let source = DataSourceId::create_from_index(0);
        let delta = SourceDelta::new(source, vec![1_i64]);

        let _ = delta.into_changes::<u8>(source);
    }
}
