use super::Arc;
use super::ArcId;
use crate::basic_types::ConstraintOperationError;
use crate::basic_types::PropagationStatus;
use crate::choice_points::ReversibleInteger;
use crate::domains::Interval;
use crate::domains::IntervalDomain;
use crate::graph::NodeId;
use crate::graph::NodeStore;

/// Something which accepts new arcs, e.g. the graph itself or a [`PropagationContext`] while an
/// arc posts new arcs during its own propagation.
pub trait ArcPoster {
    /// Validates `arc` and hands it over.
    ///
    /// Returns an error if the arc references no nodes, or a node which is unknown or detached.
    fn post_arc(&mut self, arc: Box<dyn Arc>) -> Result<(), ConstraintOperationError>;
}

/// The node whose change caused an arc to be propagated, together with the values removed from it
/// if the active algorithm tracks them.
#[derive(Clone, Copy, Debug)]
pub struct Trigger<'a> {
    pub node: NodeId,
    pub delta: Option<&'a [Interval]>,
}

/// [`PropagationContext`] is passed to arcs during propagation.
///
/// It may be queried for the current domains of nodes, and it is used to narrow them; every
/// narrowing reports a [`crate::PropagationFailure`] naming the propagating arc as soon as a domain
/// becomes empty. Arcs posted through the context are added to the graph once the propagating arc
/// returns.
///
/// Note that the context is the only point of communication between an arc and the graph.
#[derive(Debug)]
pub struct PropagationContext<'a> {
    store: &'a mut NodeStore,
    posted: &'a mut Vec<Box<dyn Arc>>,
    arc: ArcId,
    trigger: Option<Trigger<'a>>,
}

impl<'a> PropagationContext<'a> {
    pub(crate) fn new(
        store: &'a mut NodeStore,
        posted: &'a mut Vec<Box<dyn Arc>>,
        arc: ArcId,
        trigger: Option<Trigger<'a>>,
    ) -> Self {
        PropagationContext {
            store,
            posted,
            arc,
            trigger,
        }
    }

    /// The arc which is being propagated.
    pub fn arc(&self) -> ArcId {
        self.arc
    }

    pub fn domain(&self, node: NodeId) -> &IntervalDomain {
        self.store.domain(node)
    }

    pub fn min(&self, node: NodeId) -> i32 {
        self.domain(node).min()
    }

    pub fn max(&self, node: NodeId) -> i32 {
        self.domain(node).max()
    }

    pub fn size(&self, node: NodeId) -> u64 {
        self.domain(node).size()
    }

    pub fn contains(&self, node: NodeId, value: i32) -> bool {
        self.domain(node).contains(value)
    }

    pub fn is_bound(&self, node: NodeId) -> bool {
        self.domain(node).is_bound()
    }

    /// The node whose change triggered this propagation, if any.
    pub fn trigger_node(&self) -> Option<NodeId> {
        self.trigger.map(|trigger| trigger.node)
    }

    /// The values removed from the triggering node since the previous time it was processed.
    ///
    /// This is `None` if the propagation was not triggered by a node, or if the algorithm does
    /// not track deltas; the arc then has to inspect the full domain.
    pub fn source_delta(&self) -> Option<&'a [Interval]> {
        self.trigger.and_then(|trigger| trigger.delta)
    }

    pub fn read_value(&self, value: ReversibleInteger) -> i64 {
        self.store.read_value(value)
    }

    /// Updates an arc-internal reversible value; the assignment is undone on backtrack.
    pub fn assign_value(&mut self, value: ReversibleInteger, new_value: i64) {
        self.store.assign_value(value, new_value)
    }

    pub fn remove_value(&mut self, node: NodeId, value: i32) -> PropagationStatus {
        self.store.remove_value(node, value, Some(self.arc))
    }

    /// Removes the inclusive range `[lo..hi]` from the domain of `node`.
    pub fn remove_range(&mut self, node: NodeId, lo: i32, hi: i32) -> PropagationStatus {
        self.store.remove_range(node, lo, hi, Some(self.arc))
    }

    pub fn set_min(&mut self, node: NodeId, min: i32) -> PropagationStatus {
        self.store.set_min(node, min, Some(self.arc))
    }

    pub fn set_max(&mut self, node: NodeId, max: i32) -> PropagationStatus {
        self.store.set_max(node, max, Some(self.arc))
    }

    pub fn bind(&mut self, node: NodeId, value: i32) -> PropagationStatus {
        self.store.bind(node, value, Some(self.arc))
    }
}

impl ArcPoster for PropagationContext<'_> {
    fn post_arc(&mut self, arc: Box<dyn Arc>) -> Result<(), ConstraintOperationError> {
        self.store.validate_arc(arc.sources(), arc.targets())?;
        self.posted.push(arc);
        Ok(())
    }
}
