use thiserror::Error;

use crate::arcs::ArcId;
use crate::graph::NodeId;
#[cfg(doc)]
use crate::graph::NodeArcGraph;

/// Errors related to posting arcs and constraints to the [`NodeArcGraph`].
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConstraintOperationError {
    /// The arc refers to a node which was never added to the graph.
    #[error("Posting the arc failed because {0} does not exist")]
    UnknownNode(NodeId),
    /// The arc refers to a node which has been removed from the graph.
    #[error("Posting the arc failed because {0} has been detached from the graph")]
    DetachedNode(NodeId),
    /// The arc has neither sources nor targets, which means it can never be scheduled.
    #[error("Posting the arc failed because it does not reference any node")]
    EmptyArc,
    /// The arc which was referred to is not (or no longer) part of the graph.
    #[error("{0} is not part of the graph")]
    UnknownArc(ArcId),
}
