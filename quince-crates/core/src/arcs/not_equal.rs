use super::Arc;
use super::ArcType;
use super::PropagationContext;
use crate::basic_types::PropagationStatus;
use crate::graph::NodeEvent;
use crate::graph::NodeId;

/// Removes the value of `source` from `target` once `source` is bound.
#[derive(Clone, Copy, Debug)]
pub struct NotEqualArc {
    source: [NodeId; 1],
    target: [NodeId; 1],
}

impl NotEqualArc {
    pub fn new(source: NodeId, target: NodeId) -> Self {
        NotEqualArc {
            source: [source],
            target: [target],
        }
    }
}

impl Arc for NotEqualArc {
    fn name(&self) -> &str {
        "NotEqual"
    }

    fn arc_type(&self) -> ArcType {
        ArcType::Binary
    }

    fn sources(&self) -> &[NodeId] {
        &self.source
    }

    fn targets(&self) -> &[NodeId] {
        &self.target
    }

    fn trigger_event(&self, _source: NodeId) -> NodeEvent {
        NodeEvent::Value
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        match context.domain(self.source[0]).value() {
            Some(value) => context.remove_value(self.target[0], value),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::IntervalDomain;
    use crate::graph::NodeArcGraph;

    #[test]
    fn unbound_source_does_nothing() {
        let mut graph = NodeArcGraph::default();
        let x = graph.add_node(IntervalDomain::new(1, 2));
        let y = graph.add_node(IntervalDomain::new(1, 2));
        let arc = graph
            .add_arc(Box::new(NotEqualArc::new(x, y)))
            .expect("valid arc");

        graph.propagate_arc(arc, None).expect("non-empty domain");

        assert_eq!(&IntervalDomain::new(1, 2), graph.domain(y));
    }

    #[test]
    fn bound_source_removes_its_value() {
        let mut graph = NodeArcGraph::default();
        let x = graph.add_node(IntervalDomain::new(2, 2));
        let y = graph.add_node(IntervalDomain::new(1, 3));
        let arc = graph
            .add_arc(Box::new(NotEqualArc::new(x, y)))
            .expect("valid arc");

        graph.propagate_arc(arc, None).expect("non-empty domain");

        assert_eq!(&IntervalDomain::from_values([1, 3]), graph.domain(y));
    }

    #[test]
    fn only_value_events_trigger() {
        let mut graph = NodeArcGraph::default();
        let x = graph.add_node(IntervalDomain::new(1, 3));
        let y = graph.add_node(IntervalDomain::new(1, 3));
        let arc = graph
            .add_arc(Box::new(NotEqualArc::new(x, y)))
            .expect("valid arc");

        assert_eq!(&[arc], graph.value_source_arcs(x));
        assert!(graph.range_source_arcs(x).is_empty());
        assert!(graph.domain_source_arcs(x).is_empty());
    }
}
