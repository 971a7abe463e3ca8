use crate::algorithms::AlgorithmKind;
use crate::arcs::AlgorithmStrength;
use crate::queues::DEFAULT_ARC_QUEUE_POOL_CAPACITY;

/// Options for the [`PropagationEngine`](super::PropagationEngine).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// The consistency algorithm which drains the pending work.
    pub algorithm: AlgorithmKind,
    /// How strong the filtering of the arcs should be; arcs which only reason about bounds ignore
    /// it.
    pub strength: AlgorithmStrength,
    /// Whether the values removed from a node are handed to the arcs reacting to it. Only the
    /// node-queue algorithm uses deltas.
    pub use_domain_deltas: bool,
    /// The maximum number of per-node arc queues the node-queue algorithm keeps for reuse.
    pub arc_queue_pool_capacity: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            algorithm: AlgorithmKind::default(),
            strength: AlgorithmStrength::default(),
            use_domain_deltas: true,
            arc_queue_pool_capacity: DEFAULT_ARC_QUEUE_POOL_CAPACITY,
        }
    }
}
