//! Geometry for road lane edges.
//!
//! Reference curves ([curve::Straight], [curve::Arc], [curve::BezierCubic], [curve::Clothoid])
//! are approximated by open polylines with [curve::Flattener] criteria, offset laterally by
//! constant or piecewise linear [polyline::OffsetProfile] values, and the resulting areas are
//! indexed by bounding box in a [spatial::GridIndex] for exact polygon overlap queries.
//!
//! Degenerate but recoverable geometry (collapsed curves, flattening depth limits, clamped
//! offsets) is not an error, it is reported through [diagnostics::Diagnostics] when options carry
//! a sink and the result is still produced.
//!
//! # Examples
//!
//! ```
//! # use lane_contours::core::math::Pose;
//! # use lane_contours::curve::{Arc, CurveModel, Flattener, Side};
//! # use lane_contours::polyline::OffsetProfile;
//! let arc = Arc::new(Pose::new(0.0, 0.0, 0.0), 50.0, Side::Left, 0.5).unwrap();
//! let model = CurveModel::from(arc);
//! let center = model.flatten(Flattener::MaxDeviation(0.01)).unwrap();
//! let right_edge = model
//!     .offset_flatten(&OffsetProfile::constant(-1.75), Flattener::MaxDeviation(0.01))
//!     .unwrap();
//! assert!(right_edge.length() > center.length());
//! ```
extern crate static_aabb2d_index;

#[macro_use]
mod macros;

pub mod core;
pub mod curve;
pub mod diagnostics;
pub mod error;
pub mod polyline;
pub mod spatial;

pub use static_aabb2d_index::AABB;

pub use crate::error::{GeometryError, Result};
