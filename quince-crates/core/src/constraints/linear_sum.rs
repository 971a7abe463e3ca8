use super::GraphConstraint;
use crate::arcs::ArcPoster;
use crate::arcs::LinearSumArc;
use crate::basic_types::ConstraintOperationError;
use crate::graph::NodeId;

/// `sum(terms) = total`, enforced on the bounds by one hyper arc per term.
#[derive(Clone, Debug)]
pub struct LinearSum {
    terms: Box<[NodeId]>,
    total: i64,
}

impl LinearSum {
    pub fn new(terms: impl Into<Box<[NodeId]>>, total: i64) -> Self {
        LinearSum {
            terms: terms.into(),
            total,
        }
    }
}

impl GraphConstraint for LinearSum {
    fn name(&self) -> &str {
        "LinearSum"
    }

    fn post_to_graph(&self, poster: &mut dyn ArcPoster) -> Result<(), ConstraintOperationError> {
        for (index, &target) in self.terms.iter().enumerate() {
            let rest: Vec<NodeId> = self
                .terms
                .iter()
                .enumerate()
                .filter(|&(other, _)| other != index)
                .map(|(_, &node)| node)
                .collect();
            poster.post_arc(Box::new(LinearSumArc::new(target, rest, self.total)))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::IntervalDomain;
    use crate::graph::NodeArcGraph;

    #[test]
    fn one_arc_per_term() {
        let mut graph = NodeArcGraph::default();
        let terms: Vec<NodeId> = (0..3)
            .map(|_| graph.add_node(IntervalDomain::new(0, 10)))
            .collect();

        LinearSum::new(terms.clone(), 12)
            .post_to_graph(&mut graph)
            .expect("nodes are attached");

        assert_eq!(3, graph.num_arcs());
        for term in terms {
            assert_eq!(2, graph.range_source_arcs(term).len());
        }
    }

    #[test]
    fn detached_terms_are_rejected() {
        let mut graph = NodeArcGraph::default();
        let x = graph.add_node(IntervalDomain::new(0, 10));
        let y = graph.add_node(IntervalDomain::new(0, 10));
        graph.remove_node(y).expect("attached node");

        assert_eq!(
            Err(ConstraintOperationError::DetachedNode(y)),
            LinearSum::new([x, y], 5).post_to_graph(&mut graph)
        );
    }
}
