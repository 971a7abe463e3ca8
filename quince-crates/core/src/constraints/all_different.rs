use super::GraphConstraint;
use super::NotEqual;
use crate::arcs::ArcPoster;
use crate::basic_types::ConstraintOperationError;
use crate::graph::NodeId;

/// Pairwise `!=` over a set of nodes.
///
/// Fragment `i` is the [`NotEqual`] of the `i`-th pair, in the order `(0, 1), (0, 2), ...,
/// (1, 2), ...`.
#[derive(Clone, Debug)]
pub struct AllDifferent {
    nodes: Box<[NodeId]>,
}

impl AllDifferent {
    pub fn new(nodes: impl Into<Box<[NodeId]>>) -> Self {
        AllDifferent {
            nodes: nodes.into(),
        }
    }

    fn pairs(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.nodes.iter().enumerate().flat_map(move |(index, &x)| {
            self.nodes[index + 1..].iter().map(move |&y| (x, y))
        })
    }
}

impl GraphConstraint for AllDifferent {
    fn name(&self) -> &str {
        "AllDifferent"
    }

    fn post_to_graph(&self, poster: &mut dyn ArcPoster) -> Result<(), ConstraintOperationError> {
        for (x, y) in self.pairs() {
            NotEqual::new(x, y).post_to_graph(poster)?;
        }
        Ok(())
    }

    fn num_fragments(&self) -> usize {
        let n = self.nodes.len();
        n * n.saturating_sub(1) / 2
    }

    fn fragment(&self, index: usize) -> Option<Box<dyn GraphConstraint>> {
        let (x, y) = self.pairs().nth(index)?;
        let fragment: Box<dyn GraphConstraint> = Box::new(NotEqual::new(x, y));
        Some(fragment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::IntervalDomain;
    use crate::graph::NodeArcGraph;

    #[test]
    fn fragments_are_the_pairs() {
        let mut graph = NodeArcGraph::default();
        let nodes: Vec<NodeId> = (0..3)
            .map(|_| graph.add_node(IntervalDomain::new(0, 10)))
            .collect();
        let constraint = AllDifferent::new(nodes.clone());

        assert_eq!(3, constraint.num_fragments());
        assert!(constraint.fragment(3).is_none());

        constraint
            .fragment(2)
            .expect("there are three pairs")
            .post_to_graph(&mut graph)
            .expect("nodes are attached");

        assert!(graph.value_source_arcs(nodes[0]).is_empty());
        assert_eq!(1, graph.value_source_arcs(nodes[1]).len());
        assert_eq!(1, graph.value_source_arcs(nodes[2]).len());
    }

    #[test]
    fn posts_every_pair_in_both_directions() {
        let mut graph = NodeArcGraph::default();
        let nodes: Vec<NodeId> = (0..4)
            .map(|_| graph.add_node(IntervalDomain::new(0, 10)))
            .collect();

        AllDifferent::new(nodes)
            .post_to_graph(&mut graph)
            .expect("nodes are attached");

        assert_eq!(12, graph.num_arcs());
    }
}
