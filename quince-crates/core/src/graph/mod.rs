//! The propagation graph: nodes (variable domains) connected by filtering arcs.
//!
//! The [`NodeArcGraph`] owns both the nodes and the arcs, and maintains an index from each node to
//! the arcs which need to react when its domain changes. Changes to the graph are buffered as
//! [`GraphEvent`]s and handed to a single [`GraphListener`] (the active consistency algorithm) with
//! [`NodeArcGraph::dispatch_events`].
mod graph_event;
mod node;
mod node_arc_graph;
mod node_store;

pub use graph_event::*;
pub use node::*;
pub use node_arc_graph::*;
pub use node_store::*;
