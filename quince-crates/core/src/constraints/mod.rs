//! Constraints post [`Arc`](crate::arcs::Arc)s to anything implementing [`ArcPoster`]: the graph
//! itself, the [`PropagationEngine`](crate::engine::PropagationEngine), or an arc which posts new
//! constraints while it propagates.
mod all_different;
mod less_or_equal;
mod linear_sum;
mod not_equal;

pub use all_different::AllDifferent;
pub use less_or_equal::LessOrEqual;
pub use linear_sum::LinearSum;
pub use not_equal::NotEqual;

use crate::arcs::ArcPoster;
use crate::basic_types::ConstraintOperationError;

/// A relation between nodes which is enforced by one or more arcs.
pub trait GraphConstraint {
    fn name(&self) -> &str;

    /// Posts the arcs of this constraint.
    ///
    /// Arcs posted before an error occurred stay posted.
    fn post_to_graph(&self, poster: &mut dyn ArcPoster) -> Result<(), ConstraintOperationError>;

    /// The number of fragments this constraint can be split into, see
    /// [`GraphConstraint::fragment`].
    fn num_fragments(&self) -> usize {
        0
    }

    /// An indexed part of this constraint which can be posted on its own, e.g. a single pair of an
    /// [`AllDifferent`]. Generic arcs use fragments to post exactly the part of a constraint they
    /// need.
    ///
    /// By default a constraint has no fragments.
    fn fragment(&self, _index: usize) -> Option<Box<dyn GraphConstraint>> {
        None
    }
}
