use super::saturate;
use super::Arc;
use super::ArcType;
use super::PropagationContext;
use crate::basic_types::PropagationStatus;
use crate::graph::NodeEvent;
use crate::graph::NodeId;

/// Which bound of `x + offset <= y` an arc maintains.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    /// `y >= min(x) + offset`
    RaiseMinOfY,
    /// `x <= max(y) - offset`
    LowerMaxOfX,
}

/// One direction of the relation `x + offset <= y`; a [`crate::constraints::LessOrEqual`]
/// posts both.
#[derive(Clone, Copy, Debug)]
pub struct LessOrEqualArc {
    source: [NodeId; 1],
    target: [NodeId; 1],
    offset: i32,
    direction: Direction,
}

impl LessOrEqualArc {
    /// The arc which raises the minimum of `y` when the minimum of `x` increases.
    pub fn raise_min(x: NodeId, y: NodeId, offset: i32) -> Self {
        LessOrEqualArc {
            source: [x],
            target: [y],
            offset,
            direction: Direction::RaiseMinOfY,
        }
    }

    /// The arc which lowers the maximum of `x` when the maximum of `y` decreases.
    pub fn lower_max(x: NodeId, y: NodeId, offset: i32) -> Self {
        LessOrEqualArc {
            source: [y],
            target: [x],
            offset,
            direction: Direction::LowerMaxOfX,
        }
    }
}

impl Arc for LessOrEqualArc {
    fn name(&self) -> &str {
        "LessOrEqual"
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
        NodeEvent::Range
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        let (source, target) = (self.source[0], self.target[0]);
        match self.direction {
            Direction::RaiseMinOfY => {
                let bound = context.min(source) as i64 + self.offset as i64;
                context.set_min(target, saturate(bound))
            }
            Direction::LowerMaxOfX => {
                let bound = context.max(source) as i64 - self.offset as i64;
                context.set_max(target, saturate(bound))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::IntervalDomain;
    use crate::graph::NodeArcGraph;
    use crate::PropagationFailure;

    #[test]
    fn raises_the_minimum_of_y() {
        let mut graph = NodeArcGraph::default();
        let x = graph.add_node(IntervalDomain::new(3, 10));
        let y = graph.add_node(IntervalDomain::new(0, 10));
        let arc = graph
            .add_arc(Box::new(LessOrEqualArc::raise_min(x, y, 2)))
            .expect("valid arc");

        graph.propagate_arc(arc, None).expect("non-empty domain");

        assert_eq!(5, graph.domain(y).min());
        assert_eq!(10, graph.domain(x).max());
    }

    #[test]
    fn lowers_the_maximum_of_x() {
        let mut graph = NodeArcGraph::default();
        let x = graph.add_node(IntervalDomain::new(0, 10));
        let y = graph.add_node(IntervalDomain::new(0, 5));
        let arc = graph
            .add_arc(Box::new(LessOrEqualArc::lower_max(x, y, 2)))
            .expect("valid arc");

        graph.propagate_arc(arc, None).expect("non-empty domain");

        assert_eq!(3, graph.domain(x).max());
        assert_eq!(Some(&[x][..]), graph.arc(arc).map(|arc| arc.targets()));
    }

    #[test]
    fn unsatisfiable_offset_fails() {
        let mut graph = NodeArcGraph::default();
        let x = graph.add_node(IntervalDomain::new(5, 10));
        let y = graph.add_node(IntervalDomain::new(0, 5));
        let arc = graph
            .add_arc(Box::new(LessOrEqualArc::raise_min(x, y, 1)))
            .expect("valid arc");

        assert_eq!(
            Err(PropagationFailure::new(y, Some(arc))),
            graph.propagate_arc(arc, None)
        );
    }

    #[test]
    fn bounds_saturate() {
        assert_eq!(i32::MAX, saturate(i32::MAX as i64 + 5));
        assert_eq!(i32::MIN, saturate(i32::MIN as i64 - 5));
        assert_eq!(7, saturate(7));
    }
}
