//! Reversible state for backtracking search.
//!
//! A [`ChoicePointStack`] is an ordered sequence of frames, one per [`ChoicePointStack::push`].
//! Any mutable structure can take part by implementing [`ChoicePointDataSource`] and registering
//! itself with [`ChoicePointStack::register_data_source`]. From then on, each change it makes is
//! recorded in its [`ReversibleLog`] against the innermost open frame:
//! - [`ChoicePointStack::pop`] reverts the changes of the innermost frame;
//! - [`ChoicePointStack::pop_delta`] reverts them as well, but hands the recorded changes back as
//!   an opaque [`ChoicePointDelta`];
//! - [`ChoicePointStack::push_delta`] opens a new frame and re-applies such a delta verbatim,
//!   without redoing the filtering which produced it;
//! - [`ChoicePointStack::reset`] reverts everything back to the root state.
//!
//! The stack does not own the data sources; they are handed to every operation through the
//! [`DataSources`] trait, so that e.g. the domains can stay inside the propagation graph.
mod data_source;
mod delta;
mod reversible_log;
mod reversible_values;
mod stack;

pub use data_source::*;
pub use delta::*;
pub use reversible_log::*;
pub use reversible_values::*;
pub use stack::*;
