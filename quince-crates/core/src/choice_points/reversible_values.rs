use super::ChoicePointDataSource;
use super::DataSourceRegistration;
use super::ReversibleChange;
use super::ReversibleLog;
use super::SourceDelta;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;

/// A handle to an integer cell in [`ReversibleValues`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReversibleInteger {
    id: u32,
}

impl StorageKey for ReversibleInteger {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        Self { id: index as u32 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueChange {
    reference: ReversibleInteger,
    old_value: i64,
    new_value: i64,
}

impl ReversibleChange<KeyedVec<ReversibleInteger, i64>> for ValueChange {
    fn apply(&self, target: &mut KeyedVec<ReversibleInteger, i64>) {
        target[self.reference] = self.new_value;
    }

    fn revert(&self, target: &mut KeyedVec<ReversibleInteger, i64>) {
        target[self.reference] = self.old_value;
    }
}

/// Integer cells whose assignments are undone on backtracking.
///
/// Arcs use these (through the propagation context) to keep incremental state, such as support
/// counters, consistent with the domains after a pop.
#[derive(Default, Debug, Clone)]
pub struct ReversibleValues {
    log: ReversibleLog<ValueChange>,
    values: KeyedVec<ReversibleInteger, i64>,
}

impl ReversibleValues {
    pub fn grow(&mut self, initial_value: i64) -> ReversibleInteger {
        self.values.push(initial_value)
    }

    pub fn read(&self, reversible_integer: ReversibleInteger) -> i64 {
        self.values[reversible_integer]
    }

    pub fn assign(&mut self, reversible_integer: ReversibleInteger, value: i64) {
        let old_value = self.values[reversible_integer];
        if old_value == value {
            return;
        }

        let change = ValueChange {
            reference: reversible_integer,
            old_value,
            new_value: value,
        };
        change.apply(&mut self.values);
        self.log.record(change);
    }

    pub fn add_assign(&mut self, reversible_integer: ReversibleInteger, addition: i64) {
        self.assign(
            reversible_integer,
            self.values[reversible_integer] + addition,
        );
    }
}

impl ChoicePointDataSource for ReversibleValues {
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
        self.log.revert_frame(depth, &mut self.values)
    }

    fn after_pop(&mut self, depth: usize) {
        self.log.leave_frame(depth)
    }

    fn take_frame_delta(&mut self, depth: usize) -> Option<SourceDelta> {
        self.log.take_delta(depth, &mut self.values)
    }

    fn replay_frame_delta(&mut self, _depth: usize, delta: SourceDelta) {
        self.log.replay_delta(delta, &mut self.values)
    }

    fn reset(&mut self) {
        self.log.revert_all(&mut self.values)
    }
}

#[cfg(test)]
mod tests {
    use crate::choice_points::ChoicePointStack;
    use crate::choice_points::ChoicePointDataSource;
    use crate::choice_points::ReversibleValues;

    #[test]
    fn test_write_resets() {
        let mut stack = ChoicePointStack::default();
        let mut values = vec![ReversibleValues::default()];
        values[0].attach_to_stack(stack.register_data_source());
        let reversible_integer = values[0].grow(0);

        assert_eq!(values[0].read(reversible_integer), 0);

        stack.push(&mut values);
        values[0].add_assign(reversible_integer, 5);

        assert_eq!(values[0].read(reversible_integer), 5);

        values[0].add_assign(reversible_integer, 5);
        assert_eq!(values[0].read(reversible_integer), 10);

        stack.push(&mut values);
        values[0].add_assign(reversible_integer, 1);

        assert_eq!(values[0].read(reversible_integer), 11);

        let _ = stack.pop(&mut values);
        assert_eq!(values[0].read(reversible_integer), 10);

        let _ = stack.pop(&mut values);
        assert_eq!(values[0].read(reversible_integer), 0);
    }

    #[test]
    fn unchanged_assignments_are_not_logged() {
        let mut stack = ChoicePointStack::default();
        let mut values = vec![ReversibleValues::default()];
        values[0].attach_to_stack(stack.register_data_source());
        let reversible_integer = values[0].grow(3);

        stack.push(&mut values);
        values[0].assign(reversible_integer, 3);

        let delta = stack.pop_delta(&mut values).expect("a frame was open");
        assert!(delta.is_empty());
    }
}
