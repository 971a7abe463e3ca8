use std::collections::VecDeque;

use super::ArcQueue;
use crate::arcs::ArcId;
use crate::containers::KeyedVec;
use crate::graph::NodeEvent;
use crate::graph::NodeId;

#[derive(Debug, Clone)]
struct NodeQueueEntry {
    event: NodeEvent,
    arcs: Option<ArcQueue>,
}

/// A node popped from a [`NodeQueue`], with the most specific event recorded for it and the arcs
/// which were attached to it (if any).
#[derive(Debug, Clone)]
pub struct NodeQueueEvent {
    pub node: NodeId,
    pub event: NodeEvent,
    pub arcs: Option<ArcQueue>,
}

/// A first-in first-out queue of nodes in which every node occurs at most once.
///
/// Adding a node which is already enqueued keeps its position and upgrades its event to the most
/// specific of the two. The arc queue attached to a node is replaced on every addition, also when
/// the new addition carries none.
#[derive(Debug, Clone, Default)]
pub struct NodeQueue {
    order: VecDeque<NodeId>,
    entries: KeyedVec<NodeId, Option<NodeQueueEntry>>,
}

impl NodeQueue {
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.entry(node).is_some()
    }

    /// The event recorded for `node`, if it is enqueued.
    pub fn event(&self, node: NodeId) -> Option<NodeEvent> {
        self.entry(node).map(|entry| entry.event)
    }

    /// The arc queue attached to `node`, if it is enqueued with one.
    pub fn arcs_mut(&mut self, node: NodeId) -> Option<&mut ArcQueue> {
        self.entries
            .get_mut(node)
            .and_then(Option::as_mut)
            .and_then(|entry| entry.arcs.as_mut())
    }

    fn entry(&self, node: NodeId) -> Option<&NodeQueueEntry> {
        self.entries.get(node).and_then(Option::as_ref)
    }

    /// Enqueues `node` for an arbitrary change of its domain.
    pub fn add(&mut self, node: NodeId) {
        self.add_with_arcs(node, NodeEvent::Domain, None)
    }

    pub fn add_event(&mut self, node: NodeId, event: NodeEvent) {
        self.add_with_arcs(node, event, None)
    }

    /// Enqueues `node` with `event`, attaching `arcs` to it.
    ///
    /// If `node` is already enqueued, its event becomes the more specific of the two and its arc
    /// queue is replaced by `arcs`.
    pub fn add_with_arcs(&mut self, node: NodeId, event: NodeEvent, arcs: Option<ArcQueue>) {
        self.entries.accomodate(node, None);
        if let Some(entry) = self.entries[node].as_mut() {
            entry.event = entry.event.max(event);
            entry.arcs = arcs;
        } else {
            self.entries[node] = Some(NodeQueueEntry { event, arcs });
            self.order.push_back(node);
        }
    }

    pub fn remove(&mut self, node: NodeId) -> bool {
        let removed = self
            .entries
            .get_mut(node)
            .and_then(Option::take)
            .is_some();
        if removed {
            self.order.retain(|&other| other != node);
        }
        removed
    }

    /// Removes and returns the node which was enqueued first.
    pub fn pop(&mut self) -> Option<NodeId> {
        self.pop_event().map(|event| event.node)
    }

    /// Removes the node which was enqueued first, together with its event and arc queue.
    pub fn pop_event(&mut self) -> Option<NodeQueueEvent> {
        let node = self.order.pop_front()?;
        let entry = self.entries[node].take()?;
        Some(NodeQueueEvent {
            node,
            event: entry.event,
            arcs: entry.arcs,
        })
    }

    /// Removes `arc` from the arc queues attached to the enqueued nodes.
    pub fn forget_arc(&mut self, arc: ArcId) {
        for entry in self.entries.iter_mut().flatten() {
            if let Some(arcs) = entry.arcs.as_mut() {
                let _ = arcs.remove(arc);
            }
        }
    }

    pub fn clear(&mut self) {
        for node in self.order.drain(..) {
            self.entries[node] = None;
        }
    }
}
