use super::Arc;
use super::ArcType;
use super::PropagationContext;
use crate::basic_types::PropagationStatus;
use crate::graph::NodeId;

/// Restricts a node to `[lo..hi]`.
///
/// This is a [`ArcType::Node`] arc: once propagated it stays consistent, so it is never
/// re-triggered by later changes.
#[derive(Clone, Copy, Debug)]
pub struct RangeArc {
    node: [NodeId; 1],
    lo: i32,
    hi: i32,
}

impl RangeArc {
    pub fn new(node: NodeId, lo: i32, hi: i32) -> Self {
        RangeArc {
            node: [node],
            lo,
            hi,
        }
    }
}

impl Arc for RangeArc {
    fn name(&self) -> &str {
        "Range"
    }

    fn arc_type(&self) -> ArcType {
        ArcType::Node
    }

    fn sources(&self) -> &[NodeId] {
        &self.node
    }

    fn targets(&self) -> &[NodeId] {
        &self.node
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        context.set_min(self.node[0], self.lo)?;
        context.set_max(self.node[0], self.hi)
    }
}
