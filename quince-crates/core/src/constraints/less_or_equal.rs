use super::GraphConstraint;
use crate::arcs::ArcPoster;
use crate::arcs::LessOrEqualArc;
use crate::basic_types::ConstraintOperationError;
use crate::graph::NodeId;

/// `x + offset <= y`
#[derive(Clone, Copy, Debug)]
pub struct LessOrEqual {
    x: NodeId,
    y: NodeId,
    offset: i32,
}

impl LessOrEqual {
    pub fn new(x: NodeId, y: NodeId, offset: i32) -> Self {
        LessOrEqual { x, y, offset }
    }
}

impl GraphConstraint for LessOrEqual {
    fn name(&self) -> &str {
        "LessOrEqual"
    }

    fn post_to_graph(&self, poster: &mut dyn ArcPoster) -> Result<(), ConstraintOperationError> {
        poster.post_arc(Box::new(LessOrEqualArc::raise_min(self.x, self.y, self.offset)))?;
        poster.post_arc(Box::new(LessOrEqualArc::lower_max(self.x, self.y, self.offset)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::IntervalDomain;
    use crate::graph::NodeArcGraph;

    #[test]
    fn posts_both_directions() {
        let mut graph = NodeArcGraph::default();
        let x = graph.add_node(IntervalDomain::new(0, 10));
        let y = graph.add_node(IntervalDomain::new(0, 5));

        LessOrEqual::new(x, y, 2)
            .post_to_graph(&mut graph)
            .expect("nodes are attached");

        assert_eq!(2, graph.num_arcs());
        assert_eq!(1, graph.range_source_arcs(x).len());
        assert_eq!(1, graph.range_source_arcs(y).len());
    }
}
