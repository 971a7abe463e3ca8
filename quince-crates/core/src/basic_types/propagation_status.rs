use thiserror::Error;

use crate::arcs::ArcId;
use crate::graph::NodeId;

/// The result of propagating an arc or running a consistency algorithm.
pub type PropagationStatus = Result<(), PropagationFailure>;

/// Raised when filtering leaves the domain of a node empty.
///
/// The domain is left empty; restoring a consistent state is the responsibility of the caller,
/// which should have opened a choice point before the failing operation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("propagation failed: the domain of {node} became empty{}", caused_by(.arc))]
pub struct PropagationFailure {
    /// The node whose domain became empty.
    pub node: NodeId,
    /// The arc which emptied the domain, or [`None`] if the domain was emptied by a mutation from
    /// outside the propagation loop.
    pub arc: Option<ArcId>,
}

impl PropagationFailure {
    pub(crate) fn new(node: NodeId, arc: Option<ArcId>) -> Self {
        PropagationFailure { node, arc }
    }
}

fn caused_by(arc: &Option<ArcId>) -> String {
    arc.map(|arc| format!(" while propagating {arc}"))
        .unwrap_or_default()
}
