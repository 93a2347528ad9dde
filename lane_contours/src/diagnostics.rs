//! Reporting of locally recovered degenerate geometry.
//!
//! Algorithms never fail on degenerate input they can recover from (collinear runs, reversing
//! kinks, vanishing curvature). Each recovery is reported to a [Diagnostics] collaborator passed
//! in through the options of the operation, or to [LogDiagnostics] when none is given.

use std::cell::RefCell;
use std::fmt;

/// A fallback taken while processing degenerate geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum DegenerateGeometry {
    /// A curve with (near) zero curvature change was evaluated as a straight line or arc.
    CollapsedCurve { kind: &'static str },
    /// Interior points closer than the collinear tolerance to the line through their neighbors
    /// were dropped before offsetting.
    CollinearPointsRemoved { count: usize },
    /// A reversing or over-long miter corner was replaced by a bevel at the given vertex.
    KinkBeveled { vertex: usize },
    /// Offset segments running against their reference segment were cut out.
    InvertedSegmentsRemoved { count: usize },
    /// Loops where the offset crossed or ran back along itself were cut out.
    SelfIntersectionsClipped { count: usize },
    /// Offset resampling of one reference segment hit the subdivision cap.
    SubdivisionCapReached { segment: usize, cap: usize },
    /// Adaptive flattening hit the maximum bisection depth.
    DepthLimitReached { depth: usize },
    /// Consecutive coincident points were merged.
    DuplicatePointsRemoved { count: usize },
    /// The two-pose clothoid solve switched from the preferred shape to the other one.
    ClothoidShapeSwitched,
}

impl fmt::Display for DegenerateGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use DegenerateGeometry::*;
        match self {
            CollapsedCurve { kind } => write!(f, "curve collapsed to {kind}"),
            CollinearPointsRemoved { count } => write!(f, "{count} collinear points removed"),
            KinkBeveled { vertex } => write!(f, "kink at vertex {vertex} beveled"),
            InvertedSegmentsRemoved { count } => {
                write!(f, "{count} inverted offset segments removed")
            }
            SelfIntersectionsClipped { count } => {
                write!(f, "{count} offset self intersections clipped")
            }
            SubdivisionCapReached { segment, cap } => {
                write!(f, "segment {segment} reached the subdivision cap of {cap}")
            }
            DepthLimitReached { depth } => write!(f, "flattening depth limit {depth} reached"),
            DuplicatePointsRemoved { count } => write!(f, "{count} duplicate points removed"),
            ClothoidShapeSwitched => write!(f, "clothoid solve switched shape"),
        }
    }
}

/// Receiver of [DegenerateGeometry] events.
pub trait Diagnostics: fmt::Debug {
    fn report(&self, event: DegenerateGeometry);
}

/// Forwards events to the `log` facade at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn report(&self, event: DegenerateGeometry) {
        log::debug!("degenerate geometry: {}", event);
    }
}

/// Records events in memory, in reporting order.
///
/// # Examples
///
/// ```
/// # use lane_contours::diagnostics::*;
/// let diag = CollectDiagnostics::new();
/// diag.report(DegenerateGeometry::KinkBeveled { vertex: 3 });
/// assert_eq!(diag.events(), vec![DegenerateGeometry::KinkBeveled { vertex: 3 }]);
/// ```
#[derive(Debug, Default)]
pub struct CollectDiagnostics {
    events: RefCell<Vec<DegenerateGeometry>>,
}

impl CollectDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DegenerateGeometry> {
        self.events.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// `true` if any recorded event satisfies `pred`.
    pub fn any(&self, pred: impl Fn(&DegenerateGeometry) -> bool) -> bool {
        self.events.borrow().iter().any(pred)
    }
}

impl Diagnostics for CollectDiagnostics {
    fn report(&self, event: DegenerateGeometry) {
        log::trace!("collected: {}", event);
        self.events.borrow_mut().push(event);
    }
}

/// Report to `diagnostics` or fall back to [LogDiagnostics].
#[inline]
pub(crate) fn report(diagnostics: Option<&dyn Diagnostics>, event: DegenerateGeometry) {
    match diagnostics {
        Some(d) => d.report(event),
        None => LogDiagnostics.report(event),
    }
}
