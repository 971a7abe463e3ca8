use log::trace;

use super::ChoicePointDelta;
use super::DataSourceId;
use super::DataSourceRegistration;
use super::DataSources;
use crate::containers::HashMap;
use crate::containers::KeyGenerator;
use crate::quince_asserts::quince_assert_simple;

/// Coordinates frame boundaries and delta capture/replay over all registered data sources.
///
/// See the [module documentation](super) for an overview.
#[derive(Debug, Default)]
#[allow(
    missing_copy_implementations,
    reason = "a copy would hand out the same data source ids twice"
)]
pub struct ChoicePointStack {
    /// The number of open frames.
    depth: usize,
    source_ids: KeyGenerator<DataSourceId>,
}

impl ChoicePointStack {
    /// Registers a new data source. The source should store the registration using
    /// [`ChoicePointDataSource::attach_to_stack`](super::ChoicePointDataSource::attach_to_stack).
    ///
    /// Sources can be registered at any depth; they take part in the current frame and in every
    /// frame opened afterwards.
    pub fn register_data_source(&mut self) -> DataSourceRegistration {
        DataSourceRegistration {
            id: self.source_ids.next_key(),
            depth: self.depth,
        }
    }

    pub fn num_registered_sources(&self) -> usize {
        self.source_ids.num_generated()
    }

    /// The number of open frames; `0` is the root.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Opens a new frame.
    pub fn push<Sources: DataSources + ?Sized>(&mut self, sources: &mut Sources) {
        let depth = self.depth + 1;
        trace!("opening choice point frame {depth}");

        sources.for_each_source(&mut |source| {
            if source.registration().is_some() {
                source.before_push(depth);
            }
        });
        self.depth = depth;
        sources.for_each_source(&mut |source| {
            if source.registration().is_some() {
                source.after_push(depth);
            }
        });
    }

    /// Closes the innermost frame and reverts every change made in it.
    ///
    /// Returns `false` (and does nothing) when no frame is open.
    pub fn pop<Sources: DataSources + ?Sized>(&mut self, sources: &mut Sources) -> bool {
        if self.depth == 0 {
            return false;
        }

        let depth = self.depth;
        trace!("closing choice point frame {depth}");

        sources.for_each_source(&mut |source| {
            if source.registration().is_some() {
                source.before_pop(depth);
            }
        });
        self.depth -= 1;
        sources.for_each_source(&mut |source| {
            if source.registration().is_some() {
                source.after_pop(depth);
            }
        });

        true
    }

    /// Closes the innermost frame like [`ChoicePointStack::pop`], but returns the changes which
    /// were made in it so that they can be replayed with [`ChoicePointStack::push_delta`].
    ///
    /// Returns [`None`] when no frame is open.
    pub fn pop_delta<Sources: DataSources + ?Sized>(
        &mut self,
        sources: &mut Sources,
    ) -> Option<ChoicePointDelta> {
        if self.depth == 0 {
            return None;
        }

        let depth = self.depth;
        let mut delta = ChoicePointDelta {
            depth,
            sources: Vec::new(),
        };

        sources.for_each_source(&mut |source| {
            if source.registration().is_some() {
                if let Some(source_delta) = source.take_frame_delta(depth) {
                    delta.sources.push(source_delta);
                }
            }
        });
        self.depth -= 1;
        sources.for_each_source(&mut |source| {
            if source.registration().is_some() {
                source.after_pop(depth);
            }
        });

        trace!(
            "closed choice point frame {depth}, capturing {} changes",
            delta.num_changes()
        );

        Some(delta)
    }

    /// Opens a new frame and re-applies a delta captured by [`ChoicePointStack::pop_delta`].
    ///
    /// # Panics
    /// The delta has to be replayed at the depth it was captured at, and only on the sources which
    /// recorded it. Violating either is a misuse of the stack and panics.
    pub fn push_delta<Sources: DataSources + ?Sized>(
        &mut self,
        sources: &mut Sources,
        delta: ChoicePointDelta,
    ) {
        let depth = self.depth + 1;
        quince_assert_simple!(
            delta.depth == depth,
            "a delta captured at depth {} cannot be replayed at depth {depth}",
            delta.depth
        );
        trace!(
            "replaying {} changes as choice point frame {depth}",
            delta.num_changes()
        );

        let mut pending: HashMap<DataSourceId, _> = delta
            .sources
            .into_iter()
            .map(|source_delta| (source_delta.source(), source_delta))
            .collect();

        sources.for_each_source(&mut |source| {
            if source.registration().is_some() {
                source.before_push(depth);
            }
        });
        self.depth = depth;
        sources.for_each_source(&mut |source| {
            if let Some(registration) = source.registration() {
                source.after_push(depth);
                if let Some(source_delta) = pending.remove(&registration.id) {
                    source.replay_frame_delta(depth, source_delta);
                }
            }
        });

        assert!(
            pending.is_empty(),
            "the delta contains changes of sources which were not provided: {:?}",
            pending.keys().collect::<Vec<_>>()
        );
    }

    /// Discards every frame and returns every source to its root state.
    pub fn reset<Sources: DataSources + ?Sized>(&mut self, sources: &mut Sources) {
        trace!("resetting {} choice point frames", self.depth);

        sources.for_each_source(&mut |source| {
            if source.registration().is_some() {
                source.reset();
            }
        });
        self.depth = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choice_points::ChoicePointDataSource;
    use crate::choice_points::ReversibleInteger;
    use crate::choice_points::ReversibleValues;

    fn registered_values(
        stack: &mut ChoicePointStack,
        num_sources: usize,
    ) -> (Vec<ReversibleValues>, Vec<ReversibleInteger>) {
        let mut sources = Vec::new();
        let mut cells = Vec::new();
        for _ in 0..num_sources {
            let mut values = ReversibleValues::default();
            values.attach_to_stack(stack.register_data_source());
            cells.push(values.grow(0));
            sources.push(values);
        }
        (sources, cells)
    }

    #[test]
    fn popping_the_root_is_a_no_op() {
        let mut stack = ChoicePointStack::default();
        let (mut sources, cells) = registered_values(&mut stack, 1);
        sources[0].assign(cells[0], 4);

        assert!(!stack.pop(&mut sources));
        assert!(stack.pop_delta(&mut sources).is_none());
        assert_eq!(0, stack.depth());
        assert_eq!(4, sources[0].read(cells[0]));
    }

    #[test]
    fn pop_delta_reverts_and_push_delta_restores() {
        let mut stack = ChoicePointStack::default();
        let (mut sources, cells) = registered_values(&mut stack, 2);

        stack.push(&mut sources);
        sources[0].assign(cells[0], 1);
        sources[1].assign(cells[1], 2);
        sources[1].assign(cells[1], 3);

        let delta = stack.pop_delta(&mut sources).expect("a frame is open");
        assert_eq!(0, stack.depth());
        assert_eq!(1, delta.depth());
        assert_eq!(3, delta.num_changes());
        assert_eq!(0, sources[0].read(cells[0]));
        assert_eq!(0, sources[1].read(cells[1]));

        stack.push_delta(&mut sources, delta);
        assert_eq!(1, stack.depth());
        assert_eq!(1, sources[0].read(cells[0]));
        assert_eq!(3, sources[1].read(cells[1]));

        let _ = stack.pop(&mut sources);
        assert_eq!(0, sources[0].read(cells[0]));
        assert_eq!(0, sources[1].read(cells[1]));
    }

    #[test]
    fn jumping_between_siblings() {
        let mut stack = ChoicePointStack::default();
        let (mut sources, cells) = registered_values(&mut stack, 1);

        stack.push(&mut sources);
        sources[0].assign(cells[0], 10);
        let left = stack.pop_delta(&mut sources).expect("a frame is open");

        stack.push(&mut sources);
        sources[0].assign(cells[0], 20);
        let right = stack.pop_delta(&mut sources).expect("a frame is open");

        stack.push_delta(&mut sources, left);
        assert_eq!(10, sources[0].read(cells[0]));
        let left = stack.pop_delta(&mut sources).expect("a frame is open");

        stack.push_delta(&mut sources, right);
        assert_eq!(20, sources[0].read(cells[0]));
        let _ = stack.pop(&mut sources);

        stack.push_delta(&mut sources, left);
        assert_eq!(10, sources[0].read(cells[0]));
    }

    #[test]
    fn reset_returns_to_the_root() {
        let mut stack = ChoicePointStack::default();
        let (mut sources, cells) = registered_values(&mut stack, 1);
        sources[0].assign(cells[0], 1);

        for value in 2..6 {
            stack.push(&mut sources);
            sources[0].assign(cells[0], value);
        }
        let delta = stack.pop_delta(&mut sources).expect("a frame is open");
        stack.push_delta(&mut sources, delta);
        assert_eq!(5, sources[0].read(cells[0]));

        stack.reset(&mut sources);

        assert_eq!(0, stack.depth());
        assert_eq!(1, sources[0].read(cells[0]));
    }

    #[test]
    fn late_registered_sources_take_part_in_later_frames() {
        let mut stack = ChoicePointStack::default();
        let (mut sources, cells) = registered_values(&mut stack, 1);

        stack.push(&mut sources);
        stack.push(&mut sources);

        let mut late = ReversibleValues::default();
        late.attach_to_stack(stack.register_data_source());
        let late_cell = late.grow(7);
        sources.push(late);

        stack.push(&mut sources);
        sources[1].assign(late_cell, 8);
        sources[0].assign(cells[0], 1);

        let _ = stack.pop(&mut sources);
        assert_eq!(7, sources[1].read(late_cell));
        assert_eq!(0, sources[0].read(cells[0]));

        let _ = stack.pop(&mut sources);
        let _ = stack.pop(&mut sources);
        assert_eq!(0, stack.depth());
        assert_eq!(7, sources[1].read(late_cell));
    }

    #[test]
    fn unattached_sources_are_ignored() {
        let mut stack = ChoicePointStack::default();
        let mut sources = vec![ReversibleValues::default()];
        let cell = sources[0].grow(0);

        stack.push(&mut sources);
        sources[0].assign(cell, 3);
        let _ = stack.pop(&mut sources);

        assert_eq!(3, sources[0].read(cell));
    }

    #[test]
    #[should_panic(expected = "cannot be replayed at depth")]
    fn replaying_at_another_depth_panics() {
        let mut stack = ChoicePointStack::default();
        let (mut sources, cells) = registered_values(&mut stack, 1);

        stack.push(&mut sources);
        sources[0].assign(cells[0], 1);
        let delta = stack.pop_delta(&mut sources).expect("a frame is open");

        stack.push(&mut sources);
        stack.push_delta(&mut sources, delta);
    }

    #[test]
    #[should_panic(expected = "sources which were not provided")]
    fn replaying_on_missing_sources_panics() {
        let mut stack = ChoicePointStack::default();
        let (mut sources, cells) = registered_values(&mut stack, 2);

        stack.push(&mut sources);
        sources[1].assign(cells[1], 1);
        let delta = stack.pop_delta(&mut sources).expect("a frame is open");

        let mut fewer_sources = vec![sources.remove(0)];
        stack.push_delta(&mut fewer_sources, delta);
    }
}
