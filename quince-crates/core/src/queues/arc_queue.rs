use std::collections::VecDeque;

use crate::arcs::ArcId;
use crate::containers::HashMap;
use crate::quince_asserts::quince_assert_moderate;

/// A deduplicated queue of arcs, popped in ascending complexity.
///
/// Arcs of equal complexity are popped in the order in which they were added. An arc whose
/// complexity is below [`ArcQueue::required_min_complexity`] is not accepted.
#[derive(Debug, Clone, Default)]
pub struct ArcQueue {
    /// One first-in first-out bucket per complexity.
    buckets: Vec<VecDeque<ArcId>>,
    /// The complexity of every enqueued arc.
    enqueued: HashMap<ArcId, u32>,
    required_min_complexity: u32,
}

impl ArcQueue {
    pub fn with_required_min_complexity(required_min_complexity: u32) -> ArcQueue {
        ArcQueue {
            required_min_complexity,
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.enqueued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enqueued.is_empty()
    }

    pub fn contains(&self, arc: ArcId) -> bool {
        self.enqueued.contains_key(&arc)
    }

    /// The complexity with which `arc` was enqueued.
    pub fn complexity_of(&self, arc: ArcId) -> Option<u32> {
        self.enqueued.get(&arc).copied()
    }

    pub fn required_min_complexity(&self) -> u32 {
        self.required_min_complexity
    }

    /// Arcs added from now on are rejected if their complexity is below `min_complexity`. Arcs
    /// which are already enqueued stay.
    pub fn set_required_min_complexity(&mut self, min_complexity: u32) {
        self.required_min_complexity = min_complexity;
    }

    /// Enqueues `arc` behind every enqueued arc of the same or lower complexity.
    ///
    /// Returns `false` if the arc was rejected, either because it is already enqueued or because
    /// its complexity is too low.
    pub fn add(&mut self, arc: ArcId, complexity: u32) -> bool {
        if complexity < self.required_min_complexity || self.contains(arc) {
            return false;
        }

        let bucket = complexity as usize;
        if bucket >= self.buckets.len() {
            self.buckets.resize_with(bucket + 1, VecDeque::new);
        }
        self.buckets[bucket].push_back(arc);
        let _ = self.enqueued.insert(arc, complexity);

        true
    }

    /// Adds every `(arc, complexity)` pair; returns how many were accepted.
    pub fn add_all(&mut self, arcs: impl IntoIterator<Item = (ArcId, u32)>) -> usize {
        arcs.into_iter()
            .filter(|&(arc, complexity)| self.add(arc, complexity))
            .count()
    }

    pub fn remove(&mut self, arc: ArcId) -> bool {
        let Some(complexity) = self.enqueued.remove(&arc) else {
            return false;
        };

        let bucket = &mut self.buckets[complexity as usize];
        let position = bucket.iter().position(|&other| other == arc);
        quince_assert_moderate!(position.is_some(), "{arc} is missing from its bucket");
        if let Some(position) = position {
            let _ = bucket.remove(position);
        }

        true
    }

    /// Removes and returns the arc with the lowest complexity.
    pub fn pop(&mut self) -> Option<ArcId> {
        let arc = self
            .buckets
            .iter_mut()
            .find(|bucket| !bucket.is_empty())
            .and_then(VecDeque::pop_front)?;
        let _ = self.enqueued.remove(&arc);
        Some(arc)
    }

    /// The complexity of the arc which [`ArcQueue::pop`] would return.
    pub fn min_complexity(&self) -> Option<u32> {
        self.buckets
            .iter()
            .position(|bucket| !bucket.is_empty())
            .map(|complexity| complexity as u32)
    }

    /// Moves every arc of `other` into this queue, keeping their relative order.
    pub fn append(&mut self, other: &mut ArcQueue) {
        while let Some(complexity) = other.min_complexity() {
            if let Some(arc) = other.pop() {
                let _ = self.add(arc, complexity);
            }
        }
    }

    /// The enqueued arcs in the order in which they would be popped.
    pub fn iter(&self) -> impl Iterator<Item = ArcId> + '_ {
        self.buckets.iter().flatten().copied()
    }

    pub fn clear(&mut self) {
        self.buckets.iter_mut().for_each(VecDeque::clear);
        self.enqueued.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::StorageKey;

    fn arc(index: usize) -> ArcId {
        ArcId::create_from_index(index)
    }

    fn drain(queue: &mut ArcQueue) -> Vec<ArcId> {
        std::iter::from_fn(|| queue.pop()).collect()
    }

    #[test]
    fn pops_by_ascending_complexity_with_stable_ties() {
        let mut queue = ArcQueue::default();
        for (index, complexity) in [3, 1, 2, 0, 1].into_iter().enumerate() {
            assert!(queue.add(arc(index), complexity));
        }

        let mut complexities = vec![];
        while let Some(complexity) = queue.min_complexity() {
            complexities.push(complexity);
            let _ = queue.pop();
        }
        assert_eq!(vec![0, 1, 1, 2, 3], complexities);

        let _ = queue.add_all([(arc(0), 3), (arc(1), 1), (arc(2), 2), (arc(3), 0), (arc(4), 1)]);
        assert_eq!(vec![arc(3), arc(1), arc(4), arc(2), arc(0)], drain(&mut queue));
        assert_eq!(None, queue.pop());
    }

    #[test]
    fn adding_twice_is_idempotent() {
        let mut queue = ArcQueue::default();

        assert!(queue.add(arc(0), 1));
        assert!(!queue.add(arc(0), 1));
        assert_eq!(1, queue.len());
    }

    #[test]
    fn arcs_below_the_required_complexity_are_rejected() {
        let mut queue = ArcQueue::with_required_min_complexity(1);

        assert!(!queue.add(arc(0), 0));
        assert!(queue.add(arc(1), 1));
        assert!(queue.add(arc(2), 3));

        queue.set_required_min_complexity(2);
        assert!(!queue.add(arc(3), 1));
        assert_eq!(vec![arc(1), arc(2)], queue.iter().collect::<Vec<_>>());
    }

    #[test]
    fn removed_arcs_are_not_popped() {
        let mut queue = ArcQueue::default();
        let _ = queue.add_all([(arc(0), 1), (arc(1), 1), (arc(2), 2)]);

        assert!(queue.remove(arc(1)));
        assert!(!queue.remove(arc(1)));
        assert!(!queue.contains(arc(1)));
        assert_eq!(vec![arc(0), arc(2)], drain(&mut queue));
    }

    #[test]
    fn min_complexity_of_empty_queue() {
        let mut queue = ArcQueue::default();
        assert_eq!(None, queue.min_complexity());

        let _ = queue.add(arc(0), 4);
        assert_eq!(Some(4), queue.min_complexity());

        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(None, queue.min_complexity());
    }

    #[test]
    fn append_keeps_the_order_and_skips_duplicates() {
        let mut queue = ArcQueue::default();
        let _ = queue.add_all([(arc(0), 3), (arc(1), 1)]);
        let mut other = ArcQueue::default();
        let _ = other.add_all([(arc(2), 3), (arc(1), 1), (arc(3), 2)]);

        queue.append(&mut other);

        assert!(other.is_empty());
        assert_eq!(
            vec![arc(1), arc(3), arc(0), arc(2)],
            queue.iter().collect::<Vec<_>>()
        );
        assert_eq!(Some(2), queue.complexity_of(arc(3)));
    }
}
