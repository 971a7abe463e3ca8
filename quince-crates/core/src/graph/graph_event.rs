use super::NodeArcGraph;
use super::NodeEvent;
use super::NodeId;
use crate::arcs::ArcId;

/// A change to the graph which the active consistency algorithm has to learn about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphEvent {
    ArcAdded(ArcId),
    ArcRemoved(ArcId),
    /// The domain of `node` changed; `event` is the most specific event the change triggered.
    NodeChanged { node: NodeId, event: NodeEvent },
    NodeRemoved(NodeId),
}

/// Receives the [`GraphEvent`]s of a [`NodeArcGraph`].
///
/// The listener gets read access to the graph (e.g. to look up the arcs which react to a node
/// change) but cannot modify it while events are dispatched.
pub trait GraphListener {
    fn arc_added(&mut self, graph: &NodeArcGraph, arc: ArcId);

    fn arc_removed(&mut self, graph: &NodeArcGraph, arc: ArcId);

    fn node_changed(&mut self, graph: &NodeArcGraph, node: NodeId, event: NodeEvent);

    /// Removing a node also removes its arcs (each reported through
    /// [`GraphListener::arc_removed`] first), so most listeners have nothing left to do here.
    fn node_removed(&mut self, _graph: &NodeArcGraph, _node: NodeId) {}
}
