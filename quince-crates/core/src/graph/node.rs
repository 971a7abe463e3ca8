use std::fmt::Display;

use enum_map::Enum;
use enumset::enum_set;
use enumset::EnumSet;
use enumset::EnumSetType;

use crate::containers::StorageKey;
use crate::domains::Interval;
use crate::domains::IntervalDomain;

/// A handle to a node of the [`NodeArcGraph`](super::NodeArcGraph).
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct NodeId(u32);

impl Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

impl StorageKey for NodeId {
    fn index(&self) -> usize {
        self.0 as usize
    }

    fn create_from_index(index: usize) -> Self {
        NodeId(index as u32)
    }
}

/// The kinds of domain changes, in increasing order of specificity.
///
/// A more specific change implies the less specific ones: a node which became bound
/// ([`NodeEvent::Value`]) also had its range narrowed and its domain changed.
#[derive(Debug, EnumSetType, Enum, Hash, PartialOrd, Ord)]
pub enum NodeEvent {
    /// Some value was removed.
    Domain,
    /// The minimum or the maximum changed.
    Range,
    /// The domain was reduced to a single value.
    Value,
}

impl NodeEvent {
    /// The events implied by this event, including itself.
    pub fn implied_events(self) -> EnumSet<NodeEvent> {
        match self {
            NodeEvent::Domain => enum_set!(NodeEvent::Domain),
            NodeEvent::Range => enum_set!(NodeEvent::Domain | NodeEvent::Range),
            NodeEvent::Value => EnumSet::all(),
        }
    }
}

impl Display for NodeEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeEvent::Domain => write!(f, "[Event:Domain]"),
            NodeEvent::Range => write!(f, "[Event:Range]"),
            NodeEvent::Value => write!(f, "[Event:Value]"),
        }
    }
}

/// The graph's proxy for one variable: its domain and the values removed from it since the delta
/// was last consumed.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) domain: IntervalDomain,
    pub(crate) delta: Vec<Interval>,
    pub(crate) attached: bool,
}

impl Node {
    pub(crate) fn new(domain: IntervalDomain) -> Node {
        Node {
            domain,
            delta: Vec::new(),
            attached: true,
        }
    }
}
