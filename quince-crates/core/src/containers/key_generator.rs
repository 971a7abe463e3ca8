use std::marker::PhantomData;

use super::StorageKey;

/// Hands out consecutive [`StorageKey`]s.
///
/// Every structure which needs fresh identifiers owns its own generator; there is no process-wide
/// id registry.
#[derive(Clone, Copy, Debug)]
pub struct KeyGenerator<Key> {
    key: PhantomData<Key>,
    counter: usize,
}

impl<Key> Default for KeyGenerator<Key> {
    fn default() -> Self {
        Self {
            key: PhantomData,
            counter: 0,
        }
    }
}

impl<Key: StorageKey> KeyGenerator<Key> {
    /// Generate a new `Key`.
    pub fn next_key(&mut self) -> Key {
        let key = Key::create_from_index(self.counter);
        self.counter += 1;
        key
    }

    /// The number of keys which have been handed out so far.
    pub fn num_generated(&self) -> usize {
        self.counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_consecutive() {
        let mut generator = KeyGenerator::<usize>::default();

        assert_eq!(0, generator.next_key());
        assert_eq!(1, generator.next_key());
        assert_eq!(2, generator.num_generated());
    }
}
