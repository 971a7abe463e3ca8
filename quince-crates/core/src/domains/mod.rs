//! The integer domain used by the nodes of the propagation graph.
mod interval;
mod interval_domain;

pub use interval::Interval;
pub use interval_domain::IntervalChange;
pub use interval_domain::IntervalDomain;
