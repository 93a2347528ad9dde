//! Numeric and visiting traits shared by every module of the crate.
mod control_flow;
mod fuzzy;
mod real;

pub use control_flow::ControlFlow;
pub use fuzzy::{FuzzyEq, FuzzyOrd};
pub use real::Real;
