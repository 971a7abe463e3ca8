use log::debug;
use log::trace;

use super::PropagationStatistics;
use crate::arcs::ArcId;
use crate::arcs::ArcType;
use crate::arcs::Trigger;
use crate::basic_types::PropagationStatus;
use crate::graph::GraphListener;
use crate::graph::NodeArcGraph;
use crate::graph::NodeEvent;
use crate::graph::NodeId;
use crate::queues::ArcQueue;
use crate::queues::ArcQueuePool;
use crate::queues::DEFAULT_ARC_QUEUE_POOL_CAPACITY;
use crate::queues::NodeQueue;
use crate::queues::NodeQueueEvent;

/// Arcs up to this complexity are propagated as soon as the node triggering them is processed,
/// and receive its delta.
const MAX_DELTA_COMPLEXITY: u32 = ArcType::Hyper as u32;

/// An AC5-style algorithm which queues changed nodes rather than arcs.
///
/// The work is drained in this order, re-starting from the top after every propagation:
/// 1. [`ArcType::Node`] arcs.
/// 2. Changed nodes. The arcs reacting to the change are collected; those of complexity at most
///    [`ArcType::Hyper`] are propagated right away with the delta of the node, the others are
///    parked for the node in the complex queue.
/// 3. Parked arcs, propagated on the full domains. Generic arcs are deferred instead.
/// 4. Deferred generic arcs.
///
/// New arcs are propagated once on the full domains: they are parked for their first source
/// (generic arcs and arcs without sources are deferred directly).
#[derive(Debug)]
pub struct NodeQueueAlgorithm {
    node_arcs: ArcQueue,
    new_nodes: NodeQueue,
    complex_nodes: NodeQueue,
    generic_arcs: ArcQueue,
    pool: ArcQueuePool,
    use_domain_deltas: bool,
    pub(super) statistics: PropagationStatistics,
}

impl Default for NodeQueueAlgorithm {
    fn default() -> Self {
        NodeQueueAlgorithm::new(true, DEFAULT_ARC_QUEUE_POOL_CAPACITY)
    }
}

impl NodeQueueAlgorithm {
    pub fn new(use_domain_deltas: bool, arc_queue_pool_capacity: usize) -> Self {
        NodeQueueAlgorithm {
            node_arcs: ArcQueue::default(),
            new_nodes: NodeQueue::default(),
            complex_nodes: NodeQueue::default(),
            generic_arcs: ArcQueue::default(),
            pool: ArcQueuePool::new(arc_queue_pool_capacity),
            use_domain_deltas,
            statistics: PropagationStatistics::default(),
        }
    }

    pub fn uses_domain_deltas(&self) -> bool {
        self.use_domain_deltas
    }

    pub fn propagate(&mut self, graph: &mut NodeArcGraph) -> PropagationStatus {
        graph.dispatch_events(self);
        trace!(
            "node-queue propagation started with {} changed nodes",
            self.new_nodes.len()
        );

        loop {
            while let Some(arc) = self.node_arcs.pop() {
                self.propagate_arc(graph, arc, None)?;
            }

            if let Some(event) = self.new_nodes.pop_event() {
                self.process_node(graph, event)?;
                continue;
            }

            if let Some(parked) = self.complex_nodes.pop_event() {
                self.process_parked(graph, parked)?;
                continue;
            }

            match self.generic_arcs.pop() {
                Some(arc) => self.propagate_arc(graph, arc, None)?,
                None => break,
            }
        }

        trace!("node-queue propagation reached a fixpoint");
        Ok(())
    }

    /// Propagates the cheap arcs reacting to the change of a node, and parks the others.
    fn process_node(
        &mut self,
        graph: &mut NodeArcGraph,
        event: NodeQueueEvent,
    ) -> PropagationStatus {
        let NodeQueueEvent { node, event, .. } = event;
        self.statistics.num_node_events += 1;

        // Everything removed from the node up to now is handled by the arcs collected below.
        let delta = graph
            .store()
            .records_deltas()
            .then(|| graph.take_delta(node));

        let mut arcs = self.pool.acquire(ArcType::Binary.complexity());
        for arc in graph.source_arcs(node, event) {
            if let Some(arc_type) = graph.arc_type(arc) {
                let _ = arcs.add(arc, arc_type.complexity());
            }
        }

        while arcs
            .min_complexity()
            .is_some_and(|complexity| complexity <= MAX_DELTA_COMPLEXITY)
        {
            let Some(arc) = arcs.pop() else {
                break;
            };
            let trigger = Trigger {
                node,
                delta: delta.as_deref(),
            };
            if let Err(failure) = self.propagate_arc(graph, arc, Some(trigger)) {
                self.pool.release(arcs);
                return Err(failure);
            }
        }

        self.park(node, event, arcs);
        Ok(())
    }

    /// Propagates the arcs parked for a node until they are exhausted or cheaper work appears.
    fn process_parked(
        &mut self,
        graph: &mut NodeArcGraph,
        parked: NodeQueueEvent,
    ) -> PropagationStatus {
        let NodeQueueEvent { node, event, arcs } = parked;
        let Some(mut arcs) = arcs else {
            return Ok(());
        };

        while let Some(complexity) = arcs.min_complexity() {
            let Some(arc) = arcs.pop() else {
                break;
            };

            if graph.arc_type(arc) == Some(ArcType::Generic) {
                let _ = self.generic_arcs.add(arc, complexity);
                continue;
            }

            let mut result = self.propagate_arc(graph, arc, None);
            while result.is_ok() {
                match self.node_arcs.pop() {
                    Some(node_arc) => result = self.propagate_arc(graph, node_arc, None),
                    None => break,
                }
            }
            if let Err(failure) = result {
                self.pool.release(arcs);
                return Err(failure);
            }

            if !self.new_nodes.is_empty() {
                break;
            }
        }

        self.park(node, event, arcs);
        Ok(())
    }

    /// Adds `arcs` to the arcs parked for `node`, or releases them if there are none.
    fn park(&mut self, node: NodeId, event: NodeEvent, mut arcs: ArcQueue) {
        if arcs.is_empty() {
            self.pool.release(arcs);
            return;
        }

        if let Some(parked) = self.complex_nodes.arcs_mut(node) {
            let mut already_parked = std::mem::take(parked);
            arcs.append(&mut already_parked);
            self.pool.release(already_parked);
        }
        self.complex_nodes.add_with_arcs(node, event, Some(arcs));
    }

    fn propagate_arc(
        &mut self,
        graph: &mut NodeArcGraph,
        arc: ArcId,
        trigger: Option<Trigger<'_>>,
    ) -> PropagationStatus {
        self.statistics.num_arc_propagations += 1;
        let result = graph.propagate_arc(arc, trigger);
        graph.dispatch_events(self);

        if let Err(failure) = &result {
            debug!("{failure}");
            self.statistics.num_failures += 1;
            self.clear();
        }

        result
    }

    pub fn clear(&mut self) {
        self.node_arcs.clear();
        self.new_nodes.clear();
        while let Some(parked) = self.complex_nodes.pop_event() {
            if let Some(arcs) = parked.arcs {
                self.pool.release(arcs);
            }
        }
        self.generic_arcs.clear();
    }

    pub fn is_idle(&self) -> bool {
        self.node_arcs.is_empty()
            && self.new_nodes.is_empty()
            && self.complex_nodes.is_empty()
            && self.generic_arcs.is_empty()
    }
}

impl GraphListener for NodeQueueAlgorithm {
    fn arc_added(&mut self, graph: &NodeArcGraph, arc: ArcId) {
        let Some(arc_type) = graph.arc_type(arc) else {
            return;
        };
        let first_node = graph
            .arc(arc)
            .and_then(|added| added.sources().first().or(added.targets().first()).copied());

        match (arc_type, first_node) {
            (ArcType::Node, _) => {
                let _ = self.node_arcs.add(arc, arc_type.complexity());
            }
            (ArcType::Generic, _) | (_, None) => {
                let _ = self.generic_arcs.add(arc, arc_type.complexity());
            }
            (_, Some(node)) => {
                let mut arcs = self.pool.acquire(0);
                let _ = arcs.add(arc, arc_type.complexity());
                let event = self.complex_nodes.event(node).unwrap_or(NodeEvent::Domain);
                self.park(node, event, arcs);
            }
        }
    }

    fn arc_removed(&mut self, _graph: &NodeArcGraph, arc: ArcId) {
        let _ = self.node_arcs.remove(arc);
        let _ = self.generic_arcs.remove(arc);
        self.complex_nodes.forget_arc(arc);
    }

    fn node_changed(&mut self, _graph: &NodeArcGraph, node: NodeId, event: NodeEvent) {
        self.new_nodes.add_event(node, event);
    }

    fn node_removed(&mut self, _graph: &NodeArcGraph, node: NodeId) {
        let _ = self.new_nodes.remove(node);
        if let Some(arcs) = self.complex_nodes.arcs_mut(node).map(std::mem::take) {
            self.pool.release(arcs);
        }
        let _ = self.complex_nodes.remove(node);
    }
}
