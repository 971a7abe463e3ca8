//! Consistency algorithms which drain the pending work of a [`NodeArcGraph`] to a fixpoint.
//!
//! Both algorithms share the same contract: they learn about new arcs and domain changes through
//! the [`GraphListener`] callbacks, and [`ConsistencyAlgorithm::propagate`] propagates arcs,
//! cheapest first, until no queued work remains or a domain becomes empty. A failure aborts the
//! pass immediately; the domains are left as they are and restoring them is up to the caller
//! (see [`crate::choice_points`]).
//!
//! - [`ArcQueueAlgorithm`] queues arcs directly and always propagates them on the full domains.
//! - [`NodeQueueAlgorithm`] queues changed nodes and hands the values removed from a node (its
//!   delta) to the cheap arcs reacting to it.
mod arc_queue_algorithm;
mod node_queue_algorithm;

pub use arc_queue_algorithm::ArcQueueAlgorithm;
pub use node_queue_algorithm::NodeQueueAlgorithm;

use crate::arcs::AlgorithmStrength;
use crate::arcs::ArcId;
use crate::basic_types::PropagationStatus;
use crate::create_statistics_struct;
use crate::graph::GraphListener;
use crate::graph::NodeArcGraph;
use crate::graph::NodeEvent;
use crate::graph::NodeId;

create_statistics_struct!(
    /// Counters of the work done by a consistency algorithm.
    PropagationStatistics {
        /// The number of times an arc was propagated.
        num_arc_propagations: u64,
        /// The number of node changes which were processed.
        num_node_events: u64,
        /// The number of propagations which ended in an empty domain.
        num_failures: u64,
});

impl PropagationStatistics {
    pub(crate) fn accumulate(&mut self, other: PropagationStatistics) {
        self.num_arc_propagations += other.num_arc_propagations;
        self.num_node_events += other.num_node_events;
        self.num_failures += other.num_failures;
    }
}

/// Selects a [`ConsistencyAlgorithm`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum AlgorithmKind {
    /// See [`ArcQueueAlgorithm`].
    ArcQueue,
    /// See [`NodeQueueAlgorithm`].
    #[default]
    NodeQueue,
}

impl std::fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlgorithmKind::ArcQueue => write!(f, "arc-queue"),
            AlgorithmKind::NodeQueue => write!(f, "node-queue"),
        }
    }
}

/// The active consistency algorithm.
#[derive(Debug)]
pub enum ConsistencyAlgorithm {
    ArcQueue(ArcQueueAlgorithm),
    NodeQueue(NodeQueueAlgorithm),
}

impl ConsistencyAlgorithm {
    /// Creates the algorithm of the given kind.
    ///
    /// `use_domain_deltas` only affects the node-queue algorithm; the arc-queue algorithm never
    /// uses deltas. `arc_queue_pool_capacity` bounds the number of recycled per-node arc queues.
    pub fn new(
        kind: AlgorithmKind,
        use_domain_deltas: bool,
        arc_queue_pool_capacity: usize,
    ) -> Self {
        match kind {
            AlgorithmKind::ArcQueue => ConsistencyAlgorithm::ArcQueue(ArcQueueAlgorithm::default()),
            AlgorithmKind::NodeQueue => ConsistencyAlgorithm::NodeQueue(NodeQueueAlgorithm::new(
                use_domain_deltas,
                arc_queue_pool_capacity,
            )),
        }
    }

    pub fn kind(&self) -> AlgorithmKind {
        match self {
            ConsistencyAlgorithm::ArcQueue(_) => AlgorithmKind::ArcQueue,
            ConsistencyAlgorithm::NodeQueue(_) => AlgorithmKind::NodeQueue,
        }
    }

    pub fn uses_domain_deltas(&self) -> bool {
        match self {
            ConsistencyAlgorithm::ArcQueue(_) => false,
            ConsistencyAlgorithm::NodeQueue(algorithm) => algorithm.uses_domain_deltas(),
        }
    }

    /// Makes this algorithm the listener of `graph`: configures the arcs with `strength` and the
    /// use of deltas, and queues every arc of the graph.
    pub fn install(&mut self, graph: &mut NodeArcGraph, strength: AlgorithmStrength) {
        self.clear();
        graph.configure_arcs(strength, self.uses_domain_deltas());
        graph.set_record_deltas(self.uses_domain_deltas());
        graph.announce_arcs();
        graph.dispatch_events(self);
    }

    /// Propagates until no work is left; see the [module documentation](self).
    pub fn propagate(&mut self, graph: &mut NodeArcGraph) -> PropagationStatus {
        match self {
            ConsistencyAlgorithm::ArcQueue(algorithm) => algorithm.propagate(graph),
            ConsistencyAlgorithm::NodeQueue(algorithm) => algorithm.propagate(graph),
        }
    }

    /// Drops all pending work.
    pub fn clear(&mut self) {
        match self {
            ConsistencyAlgorithm::ArcQueue(algorithm) => algorithm.clear(),
            ConsistencyAlgorithm::NodeQueue(algorithm) => algorithm.clear(),
        }
    }

    /// Whether there is no pending work.
    pub fn is_idle(&self) -> bool {
        match self {
            ConsistencyAlgorithm::ArcQueue(algorithm) => algorithm.is_idle(),
            ConsistencyAlgorithm::NodeQueue(algorithm) => algorithm.is_idle(),
        }
    }

    pub fn statistics(&self) -> PropagationStatistics {
        match self {
            ConsistencyAlgorithm::ArcQueue(algorithm) => algorithm.statistics,
            ConsistencyAlgorithm::NodeQueue(algorithm) => algorithm.statistics,
        }
    }
}

impl GraphListener for ConsistencyAlgorithm {
    fn arc_added(&mut self, graph: &NodeArcGraph, arc: ArcId) {
        match self {
            ConsistencyAlgorithm::ArcQueue(algorithm) => algorithm.arc_added(graph, arc),
            ConsistencyAlgorithm::NodeQueue(algorithm) => algorithm.arc_added(graph, arc),
        }
    }

    fn arc_removed(&mut self, graph: &NodeArcGraph, arc: ArcId) {
        match self {
            ConsistencyAlgorithm::ArcQueue(algorithm) => algorithm.arc_removed(graph, arc),
            ConsistencyAlgorithm::NodeQueue(algorithm) => algorithm.arc_removed(graph, arc),
        }
    }

    fn node_changed(&mut self, graph: &NodeArcGraph, node: NodeId, event: NodeEvent) {
        match self {
            ConsistencyAlgorithm::ArcQueue(algorithm) => {
                algorithm.node_changed(graph, node, event)
            }
            ConsistencyAlgorithm::NodeQueue(algorithm) => {
                algorithm.node_changed(graph, node, event)
            }
        }
    }

    fn node_removed(&mut self, graph: &NodeArcGraph, node: NodeId) {
        match self {
            ConsistencyAlgorithm::ArcQueue(algorithm) => algorithm.node_removed(graph, node),
            ConsistencyAlgorithm::NodeQueue(algorithm) => algorithm.node_removed(graph, node),
        }
    }
}
