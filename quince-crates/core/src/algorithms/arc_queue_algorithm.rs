use log::debug;
use log::trace;

use super::PropagationStatistics;
use crate::arcs::ArcId;
use crate::arcs::ArcType;
use crate::basic_types::PropagationStatus;
use crate::graph::GraphListener;
use crate::graph::NodeArcGraph;
use crate::graph::NodeEvent;
use crate::graph::NodeId;
use crate::queues::ArcQueue;

/// An AC3-style algorithm which queues the arcs reacting to a change directly.
///
/// [`ArcType::Node`] arcs live in a queue of their own which is drained before anything else.
/// Generic arcs are diverted from the main queue into a deferred queue, which is only drained
/// once the main queue is empty; after every generic arc the cheaper queues are drained again,
/// since a generic arc may post new arcs.
///
/// Arcs are always propagated on the full domains of their sources.
#[derive(Debug, Default)]
pub struct ArcQueueAlgorithm {
    node_arcs: ArcQueue,
    arcs: ArcQueue,
    generic_arcs: ArcQueue,
    pub(super) statistics: PropagationStatistics,
}

impl ArcQueueAlgorithm {
    pub fn propagate(&mut self, graph: &mut NodeArcGraph) -> PropagationStatus {
        graph.dispatch_events(self);
        trace!(
            "arc-queue propagation started with {} pending arcs",
            self.node_arcs.len() + self.arcs.len() + self.generic_arcs.len()
        );

        loop {
            while let Some(arc) = self.node_arcs.pop() {
                self.propagate_arc(graph, arc)?;
            }

            if let Some(arc) = self.arcs.pop() {
                if graph.arc_type(arc) == Some(ArcType::Generic) {
                    let _ = self.generic_arcs.add(arc, ArcType::Generic.complexity());
                } else {
                    self.propagate_arc(graph, arc)?;
                }
                continue;
            }

            match self.generic_arcs.pop() {
                Some(arc) => self.propagate_arc(graph, arc)?,
                None => break,
            }
        }

        trace!("arc-queue propagation reached a fixpoint");
        Ok(())
    }

    fn propagate_arc(&mut self, graph: &mut NodeArcGraph, arc: ArcId) -> PropagationStatus {
        self.statistics.num_arc_propagations += 1;
        let result = graph.propagate_arc(arc, None);
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
        self.arcs.clear();
        self.generic_arcs.clear();
    }

    pub fn is_idle(&self) -> bool {
        self.node_arcs.is_empty() && self.arcs.is_empty() && self.generic_arcs.is_empty()
    }

    fn enqueue(&mut self, graph: &NodeArcGraph, arc: ArcId) {
        match graph.arc_type(arc) {
            Some(ArcType::Node) => {
                let _ = self.node_arcs.add(arc, ArcType::Node.complexity());
            }
            Some(arc_type) => {
                let _ = self.arcs.add(arc, arc_type.complexity());
            }
            None => {}
        }
    }
}

impl GraphListener for ArcQueueAlgorithm {
    fn arc_added(&mut self, graph: &NodeArcGraph, arc: ArcId) {
        self.enqueue(graph, arc);
    }

    fn arc_removed(&mut self, _graph: &NodeArcGraph, arc: ArcId) {
        let _ = self.node_arcs.remove(arc);
        let _ = self.arcs.remove(arc);
        let _ = self.generic_arcs.remove(arc);
    }

    fn node_changed(&mut self, graph: &NodeArcGraph, node: NodeId, event: NodeEvent) {
        self.statistics.num_node_events += 1;
        for arc in graph.source_arcs(node, event) {
            self.enqueue(graph, arc);
        }
    }
}
