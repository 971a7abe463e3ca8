use super::AlgorithmStrength;
use super::Arc;
use super::ArcType;
use super::PropagationContext;
use crate::basic_types::PropagationStatus;
use crate::domains::Interval;
use crate::graph::NodeId;

/// Keeps the domain of `target` a subset of the domain of `source`.
///
/// With [`AlgorithmStrength::Bounds`] only the bounds are copied. With
/// [`AlgorithmStrength::Domain`] the holes of `source` are removed from `target` as well; if
/// domain deltas are enabled and the delta of `source` is available, only the recently removed
/// values are considered.
#[derive(Clone, Copy, Debug)]
pub struct EqualArc {
    source: [NodeId; 1],
    target: [NodeId; 1],
    strength: AlgorithmStrength,
    use_domain_deltas: bool,
}

impl EqualArc {
    pub fn new(source: NodeId, target: NodeId) -> Self {
        EqualArc {
            source: [source],
            target: [target],
            strength: AlgorithmStrength::default(),
            use_domain_deltas: false,
        }
    }

    fn copy_bounds(&self, context: &mut PropagationContext) -> PropagationStatus {
        let (min, max) = (context.min(self.source[0]), context.max(self.source[0]));
        context.set_min(self.target[0], min)?;
        context.set_max(self.target[0], max)
    }

    fn remove_all(
        &self,
        context: &mut PropagationContext,
        removed: &[Interval],
    ) -> PropagationStatus {
        for interval in removed {
            context.remove_range(self.target[0], interval.min, interval.max)?;
        }
        Ok(())
    }
}

impl Arc for EqualArc {
    fn name(&self) -> &str {
        "Equal"
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

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        self.copy_bounds(&mut context)?;

        if self.strength == AlgorithmStrength::Domain {
            let holes: Vec<Interval> = context.domain(self.source[0]).holes().collect();
            self.remove_all(&mut context, &holes)?;
        }

        Ok(())
    }

    fn propagate_from(
        &mut self,
        mut context: PropagationContext,
        source: NodeId,
    ) -> PropagationStatus {
        match context.source_delta() {
            Some(delta)
                if self.use_domain_deltas
                    && self.strength == AlgorithmStrength::Domain
                    && source == self.source[0] =>
            {
                self.remove_all(&mut context, delta)
            }
            _ => self.propagate(context),
        }
    }

    fn set_algorithm_strength(&mut self, strength: AlgorithmStrength) {
        self.strength = strength;
    }

    fn set_use_domain_deltas(&mut self, use_domain_deltas: bool) {
        self.use_domain_deltas = use_domain_deltas;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arcs::Trigger;
    use crate::domains::IntervalDomain;
    use crate::graph::NodeArcGraph;

    fn equal_graph(
        strength: AlgorithmStrength,
        use_deltas: bool,
    ) -> (NodeArcGraph, NodeId, NodeId) {
        let mut graph = NodeArcGraph::default();
        graph.configure_arcs(strength, use_deltas);
        let x = graph.add_node(IntervalDomain::from_values([1, 2, 5, 6, 9]));
        let y = graph.add_node(IntervalDomain::new(0, 10));
        (graph, x, y)
    }

    #[test]
    fn bounds_strength_only_copies_bounds() {
        let (mut graph, x, y) = equal_graph(AlgorithmStrength::Bounds, false);
        let arc = graph
            .add_arc(Box::new(EqualArc::new(x, y)))
            .expect("valid arc");

        graph.propagate_arc(arc, None).expect("non-empty domain");

        assert_eq!(&IntervalDomain::new(1, 9), graph.domain(y));
    }

    #[test]
    fn domain_strength_removes_holes() {
        let (mut graph, x, y) = equal_graph(AlgorithmStrength::Domain, false);
        let arc = graph
            .add_arc(Box::new(EqualArc::new(x, y)))
            .expect("valid arc");

        graph.propagate_arc(arc, None).expect("non-empty domain");

        assert_eq!(graph.domain(x), graph.domain(y));
    }

    #[test]
    fn delta_propagation_only_removes_the_delta() {
        let (mut graph, x, y) = equal_graph(AlgorithmStrength::Domain, true);
        let arc = graph
            .add_arc(Box::new(EqualArc::new(x, y)))
            .expect("valid arc");

        let delta = [Interval::new(3, 4)];
        graph
            .propagate_arc(
                arc,
                Some(Trigger {
                    node: x,
                    delta: Some(&delta),
                }),
            )
            .expect("non-empty domain");

        assert_eq!(
            &IntervalDomain::from_values([0, 1, 2, 5, 6, 7, 8, 9, 10]),
            graph.domain(y)
        );
    }

    #[test]
    fn missing_delta_falls_back_to_full_propagation() {
        let (mut graph, x, y) = equal_graph(AlgorithmStrength::Domain, true);
        let arc = graph
            .add_arc(Box::new(EqualArc::new(x, y)))
            .expect("valid arc");

        graph
            .propagate_arc(arc, Some(Trigger { node: x, delta: None }))
            .expect("non-empty domain");

        assert_eq!(graph.domain(x), graph.domain(y));
    }
}
