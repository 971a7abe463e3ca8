use super::GraphConstraint;
use crate::arcs::ArcPoster;
use crate::arcs::NotEqualArc;
use crate::basic_types::ConstraintOperationError;
use crate::graph::NodeId;

/// `x != y`
#[derive(Clone, Copy, Debug)]
pub struct NotEqual {
    x: NodeId,
    y: NodeId,
}

impl NotEqual {
    pub fn new(x: NodeId, y: NodeId) -> Self {
        NotEqual { x, y }
    }
}

impl GraphConstraint for NotEqual {
    fn name(&self) -> &str {
        "NotEqual"
    }

    fn post_to_graph(&self, poster: &mut dyn ArcPoster) -> Result<(), ConstraintOperationError> {
        poster.post_arc(Box::new(NotEqualArc::new(self.x, self.y)))?;
        poster.post_arc(Box::new(NotEqualArc::new(self.y, self.x)))
    }
}
