//! Work queues of the consistency algorithms.
//!
//! - [`ArcQueue`] holds pending arcs, ordered by ascending complexity and first-in first-out
//!   among arcs of equal complexity.
//! - [`NodeQueue`] holds nodes whose domains changed, coalescing repeated changes of one node into
//!   a single entry with the most specific [`NodeEvent`](crate::graph::NodeEvent).
//! - [`ArcQueuePool`] recycles the per-node arc queues of the node-queue algorithm.
mod arc_queue;
mod arc_queue_pool;
mod node_queue;

pub use arc_queue::*;
pub use arc_queue_pool::*;
pub use node_queue::*;
