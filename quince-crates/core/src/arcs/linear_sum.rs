use super::saturate;
use super::Arc;
use super::ArcType;
use super::PropagationContext;
use crate::basic_types::PropagationStatus;
use crate::graph::NodeEvent;
use crate::graph::NodeId;

/// Bounds reasoning on `target + sum(sources) = total` for a single target.
///
/// A [`crate::constraints::LinearSum`] posts one such arc per participating node.
#[derive(Clone, Debug)]
pub struct LinearSumArc {
    sources: Box<[NodeId]>,
    target: [NodeId; 1],
    total: i64,
}

impl LinearSumArc {
    pub fn new(target: NodeId, sources: impl Into<Box<[NodeId]>>, total: i64) -> Self {
        LinearSumArc {
            sources: sources.into(),
            target: [target],
            total,
        }
    }
}

impl Arc for LinearSumArc {
    fn name(&self) -> &str {
        "LinearSum"
    }

    fn arc_type(&self) -> ArcType {
        ArcType::Hyper
    }

    fn sources(&self) -> &[NodeId] {
        &self.sources
    }

    fn targets(&self) -> &[NodeId] {
        &self.target
    }

    fn trigger_event(&self, _source: NodeId) -> NodeEvent {
        NodeEvent::Range
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        let (min_rest, max_rest) = self
            .sources
            .iter()
            .fold((0_i64, 0_i64), |(min, max), &node| {
                (min + context.min(node) as i64, max + context.max(node) as i64)
            });

        let target = self.target[0];
        context.set_min(target, saturate(self.total - max_rest))?;
        context.set_max(target, saturate(self.total - min_rest))
    }
}
