//! Open polylines, lateral offset profiles, and the offset line algorithm.
mod internal;
mod offset_profile;
mod pline;
mod pline_types;

pub use offset_profile::OffsetProfile;
pub use pline::Polyline;
pub(crate) use pline::remove_repeat_points;
pub use pline_types::OffsetOptions;
