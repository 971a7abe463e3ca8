//! The [`PropagationEngine`] ties the parts of the core together: it owns the
//! [`NodeArcGraph`](crate::graph::NodeArcGraph), the active
//! [`ConsistencyAlgorithm`](crate::algorithms::ConsistencyAlgorithm) and the
//! [`ChoicePointStack`](crate::choice_points::ChoicePointStack) on which every domain is
//! registered.
mod options;
mod propagation_engine;

pub use options::EngineOptions;
pub use propagation_engine::EngineStatistics;
pub use propagation_engine::PropagationEngine;
