use std::fmt::Debug;
use std::fmt::Display;

use downcast_rs::impl_downcast;
use downcast_rs::Downcast;

use super::PropagationContext;
use crate::basic_types::PropagationStatus;
use crate::containers::StorageKey;
use crate::graph::NodeEvent;
use crate::graph::NodeId;
#[cfg(doc)]
use crate::graph::NodeArcGraph;

/// A handle to an arc of the [`NodeArcGraph`].
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ArcId(u32);

impl Display for ArcId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Arc({})", self.0)
    }
}

impl StorageKey for ArcId {
    fn index(&self) -> usize {
        self.0 as usize
    }

    fn create_from_index(index: usize) -> Self {
        ArcId(index as u32)
    }
}

/// The complexity class of an arc.
///
/// The discriminant is the complexity; the consistency algorithms process arcs in ascending
/// complexity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ArcType {
    /// Self-referential; consistent after a single propagation, so it is never re-triggered.
    Node = 0,
    /// One source, one target.
    Binary = 1,
    /// Many sources, one target.
    Hyper = 2,
    /// Many sources, many targets. Processed last because it may be expensive and may post new
    /// arcs while it propagates.
    Generic = 3,
    /// Scheduling-specific arcs.
    Schedule = 4,
}

impl ArcType {
    pub fn complexity(self) -> u32 {
        self as u32
    }
}

impl Display for ArcType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArcType::Node => write!(f, "node"),
            ArcType::Binary => write!(f, "binary"),
            ArcType::Hyper => write!(f, "hyper"),
            ArcType::Generic => write!(f, "generic"),
            ArcType::Schedule => write!(f, "schedule"),
        }
    }
}

/// How aggressively arcs filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum AlgorithmStrength {
    /// Only reason about (and narrow) the bounds of domains.
    Bounds,
    /// Remove every unsupported value.
    #[default]
    Domain,
}

// We need to use this to recover the concrete type of a `Box<dyn Arc>` stored in the graph.
impl_downcast!(Arc);

/// A filtering relation from source nodes to target nodes.
///
/// The required functions are [`Arc::name`], [`Arc::arc_type`], [`Arc::sources`],
/// [`Arc::targets`] and [`Arc::propagate`]; all other functions have default implementations.
///
/// Arcs never hold references to domains. They read and narrow domains through the
/// [`PropagationContext`] they are given, which also reports a [`crate::PropagationFailure`] the
/// moment a domain becomes empty.
pub trait Arc: Downcast + Debug {
    /// Return the name of the arc.
    ///
    /// This is a convenience method that is used for printing.
    fn name(&self) -> &str;

    fn arc_type(&self) -> ArcType;

    fn complexity(&self) -> u32 {
        self.arc_type().complexity()
    }

    /// The nodes whose changes should trigger this arc.
    fn sources(&self) -> &[NodeId];

    /// The nodes whose domains this arc narrows.
    fn targets(&self) -> &[NodeId];

    /// The least specific [`NodeEvent`] on `source` this arc reacts to. An arc registered for
    /// [`NodeEvent::Range`] is triggered by range and value events, but not by the removal of an
    /// inner value.
    ///
    /// By default an arc reacts to every change.
    fn trigger_event(&self, _source: NodeId) -> NodeEvent {
        NodeEvent::Domain
    }

    /// Filters the targets based on the full domains of the sources.
    ///
    /// Arcs are not required to reach a fixpoint on their own; they are propagated again as long
    /// as their sources change.
    fn propagate(&mut self, context: PropagationContext) -> PropagationStatus;

    /// Filters the targets after a change to `source`.
    ///
    /// If the algorithm provides the delta of `source` (see
    /// [`PropagationContext::source_delta`]) and [`Arc::set_use_domain_deltas`] enabled it, the
    /// arc may restrict itself to the values which were removed recently.
    ///
    /// By default, this function calls [`Arc::propagate`].
    fn propagate_from(
        &mut self,
        context: PropagationContext,
        _source: NodeId,
    ) -> PropagationStatus {
        self.propagate(context)
    }

    /// Sets the filtering strength requested by the algorithm.
    ///
    /// By default the strength is ignored.
    fn set_algorithm_strength(&mut self, _strength: AlgorithmStrength) {}

    /// Sets whether the arc may consult the delta of its triggering node instead of re-scanning
    /// the full domain.
    ///
    /// By default deltas are never used.
    fn set_use_domain_deltas(&mut self, _use_domain_deltas: bool) {}
}
