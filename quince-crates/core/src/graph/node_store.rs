use super::GraphEvent;
use super::Node;
use super::NodeEvent;
use super::NodeId;
use crate::arcs::ArcId;
use crate::basic_types::ConstraintOperationError;
use crate::basic_types::PropagationFailure;
use crate::basic_types::PropagationStatus;
use crate::choice_points::ReversibleInteger;
use crate::choice_points::ReversibleValues;
use crate::containers::KeyedVec;
use crate::domains::Interval;
use crate::domains::IntervalDomain;
use crate::quince_asserts::quince_assert_simple;

/// The mutable state of the graph which arcs are allowed to touch while they propagate: the nodes,
/// the reversible values and the buffer of pending [`GraphEvent`]s.
#[derive(Debug, Default)]
pub struct NodeStore {
    nodes: KeyedVec<NodeId, Node>,
    pub(crate) values: ReversibleValues,
    pub(crate) events: Vec<GraphEvent>,
    /// Whether removed values are collected into the delta of each node. Only the node-queue
    /// algorithm consumes deltas; without it they would grow forever.
    record_deltas: bool,
}

impl NodeStore {
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter_with_keys()
            .filter(|(_, node)| node.attached)
            .map(|(node_id, _)| node_id)
    }

    pub fn is_attached(&self, node: NodeId) -> bool {
        self.nodes
            .get(node)
            .map(|node| node.attached)
            .unwrap_or(false)
    }

    pub fn domain(&self, node: NodeId) -> &IntervalDomain {
        &self.nodes[node].domain
    }

    /// The values removed from `node` since its delta was last taken.
    pub fn delta(&self, node: NodeId) -> &[Interval] {
        &self.nodes[node].delta
    }

    pub fn records_deltas(&self) -> bool {
        self.record_deltas
    }

    pub fn read_value(&self, value: ReversibleInteger) -> i64 {
        self.values.read(value)
    }

    pub(crate) fn assign_value(&mut self, value: ReversibleInteger, new_value: i64) {
        self.values.assign(value, new_value)
    }

    pub(crate) fn push_node(&mut self, domain: IntervalDomain) -> NodeId {
        self.nodes.push(Node::new(domain))
    }

    pub(crate) fn detach(&mut self, node: NodeId) {
        let node = &mut self.nodes[node];
        node.attached = false;
        node.delta.clear();
    }

    pub(crate) fn domains_mut(&mut self) -> impl Iterator<Item = &mut IntervalDomain> {
        self.nodes.iter_mut().map(|node| &mut node.domain)
    }

    pub(crate) fn set_record_deltas(&mut self, record_deltas: bool) {
        self.record_deltas = record_deltas;
        if !record_deltas {
            self.clear_deltas();
        }
    }

    /// Hands out the delta of `node`, leaving it empty.
    pub(crate) fn take_delta(&mut self, node: NodeId) -> Vec<Interval> {
        std::mem::take(&mut self.nodes[node].delta)
    }

    pub(crate) fn clear_deltas(&mut self) {
        self.nodes.iter_mut().for_each(|node| node.delta.clear());
    }

    pub(crate) fn validate_arc(
        &self,
        sources: &[NodeId],
        targets: &[NodeId],
    ) -> Result<(), ConstraintOperationError> {
        if sources.is_empty() && targets.is_empty() {
            return Err(ConstraintOperationError::EmptyArc);
        }

        for &node in sources.iter().chain(targets) {
            match self.nodes.get(node) {
                None => return Err(ConstraintOperationError::UnknownNode(node)),
                Some(entry) if !entry.attached => {
                    return Err(ConstraintOperationError::DetachedNode(node))
                }
                Some(_) => {}
            }
        }

        Ok(())
    }

    pub(crate) fn remove_value(
        &mut self,
        node: NodeId,
        value: i32,
        arc: Option<ArcId>,
    ) -> PropagationStatus {
        self.update(node, arc, |domain| domain.remove_value(value))
    }

    pub(crate) fn remove_range(
        &mut self,
        node: NodeId,
        lo: i32,
        hi: i32,
        arc: Option<ArcId>,
    ) -> PropagationStatus {
        self.update(node, arc, |domain| domain.remove_range(lo, hi))
    }

    pub(crate) fn set_min(
        &mut self,
        node: NodeId,
        min: i32,
        arc: Option<ArcId>,
    ) -> PropagationStatus {
        self.update(node, arc, |domain| domain.set_min(min))
    }

    pub(crate) fn set_max(
        &mut self,
        node: NodeId,
        max: i32,
        arc: Option<ArcId>,
    ) -> PropagationStatus {
        self.update(node, arc, |domain| domain.set_max(max))
    }

    pub(crate) fn bind(
        &mut self,
        node: NodeId,
        value: i32,
        arc: Option<ArcId>,
    ) -> PropagationStatus {
        self.update(node, arc, |domain| domain.bind(value))
    }

    /// Applies `mutation` to the domain of `node`, records the removed values in its delta and
    /// buffers the most specific [`NodeEvent`] the change triggered.
    fn update(
        &mut self,
        node: NodeId,
        arc: Option<ArcId>,
        mutation: impl FnOnce(&mut IntervalDomain) -> Vec<Interval>,
    ) -> PropagationStatus {
        let entry = &mut self.nodes[node];
        quince_assert_simple!(entry.attached, "cannot change the domain of detached {node}");

        if entry.domain.is_empty() {
            return Err(PropagationFailure::new(node, arc));
        }

        let old_bounds = (entry.domain.min(), entry.domain.max());
        let removed = mutation(&mut entry.domain);
        if removed.is_empty() {
            return Ok(());
        }

        if entry.domain.is_empty() {
            return Err(PropagationFailure::new(node, arc));
        }

        if self.record_deltas {
            entry.delta.extend(removed);
        }

        let event = if entry.domain.is_bound() {
            NodeEvent::Value
        } else if old_bounds != (entry.domain.min(), entry.domain.max()) {
            NodeEvent::Range
        } else {
            NodeEvent::Domain
        };
        self.events.push(GraphEvent::NodeChanged { node, event });

        Ok(())
    }
}
