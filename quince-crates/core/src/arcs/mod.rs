//! Filtering relations between the nodes of the graph.
//!
//! An [`Arc`] narrows the domains of its target nodes based on the domains of its source nodes.
//! Arcs are classified by [`ArcType`], whose complexity drives the order in which the consistency
//! algorithms process them: cheap arcs are always drained before expensive ones.
//!
//! This module also contains a small set of arcs which cover every complexity class the
//! algorithms distinguish; constraints combining them live in [`crate::constraints`].
mod arc;
mod context;
mod equal;
mod less_or_equal;
mod linear_sum;
mod not_equal;
mod range;

pub use arc::*;
pub use context::*;
pub use equal::EqualArc;
pub use less_or_equal::LessOrEqualArc;
pub use linear_sum::LinearSumArc;
pub use not_equal::NotEqualArc;
pub use range::RangeArc;

/// Narrows an intermediate bound computed in 64 bits back to the domain value range.
fn saturate(bound: i64) -> i32 {
    bound.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
