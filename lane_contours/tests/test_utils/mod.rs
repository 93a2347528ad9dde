#![allow(dead_code)]

mod pline_properties;
mod random_shapes;

pub use pline_properties::*;
pub use random_shapes::*;
