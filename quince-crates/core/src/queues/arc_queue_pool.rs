use super::ArcQueue;

/// The number of arc queues an [`ArcQueuePool`] keeps around unless configured otherwise.
pub const DEFAULT_ARC_QUEUE_POOL_CAPACITY: usize = 64;

/// A bounded free-list of [`ArcQueue`]s.
///
/// The node-queue algorithm builds a fresh arc queue for every node it processes; recycling them
/// keeps their buckets and membership maps allocated. Queues released while the pool is full are
/// dropped.
#[derive(Debug, Clone)]
pub struct ArcQueuePool {
    free: Vec<ArcQueue>,
    capacity: usize,
}

impl ArcQueuePool {
    pub fn new(capacity: usize) -> ArcQueuePool {
        ArcQueuePool {
            free: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The number of queues ready to be reused.
    pub fn num_free(&self) -> usize {
        self.free.len()
    }

    /// Hands out an empty queue which rejects arcs below `required_min_complexity`.
    pub fn acquire(&mut self, required_min_complexity: u32) -> ArcQueue {
        match self.free.pop() {
            Some(mut queue) => {
                queue.set_required_min_complexity(required_min_complexity);
                queue
            }
            None => ArcQueue::with_required_min_complexity(required_min_complexity),
        }
    }

    pub fn release(&mut self, mut queue: ArcQueue) {
        if self.free.len() < self.capacity {
            queue.clear();
            self.free.push(queue);
        }
    }
}
