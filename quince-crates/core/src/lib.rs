//! # Quince core
//!
//! The propagation core of the Quince constraint solver. It consists of two largely independent
//! parts:
//! - A [`graph::NodeArcGraph`] of nodes (variable domains) connected by filtering
//!   [`arcs::Arc`]s, together with two queue-driven [`algorithms`] that narrow the domains to a
//!   fixpoint of local consistency.
//! - A [`choice_points::ChoicePointStack`] which makes every mutation of a registered data source
//!   (most importantly the domains) reversible and replayable, so that a search procedure can
//!   backtrack cheaply.
//!
//! Most users interact with both through the [`engine::PropagationEngine`].
//!
//! ```rust
//! # use quince_core::constraints::LessOrEqual;
//! # use quince_core::domains::IntervalDomain;
//! # use quince_core::engine::EngineOptions;
//! # use quince_core::engine::PropagationEngine;
//! let mut engine = PropagationEngine::new(EngineOptions::default());
//! let x = engine.add_node(IntervalDomain::new(0, 10));
//! let y = engine.add_node(IntervalDomain::new(0, 5));
//!
//! engine
//!     .post(LessOrEqual::new(x, y, 2))
//!     .expect("both nodes are attached");
//! engine.propagate().expect("x + 2 <= y is satisfiable");
//! assert_eq!(engine.domain(x).max(), 3);
//!
//! engine.push();
//! engine.set_min(y, 5).expect("5 is in the domain of y");
//! engine.propagate().expect("still satisfiable");
//! assert_eq!(engine.domain(x).max(), 3);
//! engine.pop();
//! assert_eq!(engine.domain(y).min(), 2);
//! ```
pub mod algorithms;
pub mod arcs;
pub(crate) mod basic_types;
pub mod choice_points;
pub mod constraints;
pub mod containers;
pub mod domains;
pub mod engine;
pub mod graph;
pub mod queues;
pub(crate) mod quince_asserts;
pub mod statistics;

pub use basic_types::ConstraintOperationError;
pub use basic_types::PropagationFailure;
pub use basic_types::PropagationStatus;
