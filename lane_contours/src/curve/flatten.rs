use log::trace;

use crate::{
    core::{
        math::{delta_angle, dist_to_line_seg, Vector2},
        traits::FuzzyEq,
    },
    diagnostics::{self, DegenerateGeometry, Diagnostics},
    error::{GeometryError, Result},
    polyline::{OffsetProfile, Polyline},
};

use super::Curve;

/// Criterion deciding how finely a curve is converted into a polyline.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Flattener {
    /// Exactly this many points (at least 2), spaced uniformly in curve parameter.
    NumPoints(usize),
    /// Maximum change of tangent direction (radians) over one segment.
    MaxAngle(f64),
    /// Maximum distance between a segment and the curve it replaces.
    MaxDeviation(f64),
    /// Both [Flattener::MaxAngle] and [Flattener::MaxDeviation] must hold.
    MaxAngleAndDeviation { max_angle: f64, max_deviation: f64 },
}

impl Flattener {
    fn validate(&self) -> Result<()> {
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(GeometryError::invalid(format!(
                    "{} must be positive and finite, got {}",
                    name, v
                )))
            }
        };

        match *self {
            Flattener::NumPoints(n) if n < 2 => Err(GeometryError::invalid(format!(
                "flattening needs at least 2 points, got {}",
                n
            ))),
            Flattener::NumPoints(_) => Ok(()),
            Flattener::MaxAngle(a) => positive("maximum angle", a),
            Flattener::MaxDeviation(d) => positive("maximum deviation", d),
            Flattener::MaxAngleAndDeviation {
                max_angle,
                max_deviation,
            } => {
                positive("maximum angle", max_angle)?;
                positive("maximum deviation", max_deviation)
            }
        }
    }

    fn tolerance(&self) -> Tolerance {
        match *self {
            Flattener::NumPoints(_) => Tolerance::default(),
            Flattener::MaxAngle(a) => Tolerance {
                max_angle: Some(a),
                max_deviation: None,
            },
            Flattener::MaxDeviation(d) => Tolerance {
                max_angle: None,
                max_deviation: Some(d),
            },
            Flattener::MaxAngleAndDeviation {
                max_angle,
                max_deviation,
            } => Tolerance {
                max_angle: Some(max_angle),
                max_deviation: Some(max_deviation),
            },
        }
    }
}

/// Limits of adaptive flattening.
#[derive(Debug, Clone)]
pub struct FlattenOptions<'a> {
    /// Maximum number of times an interval between two initial breakpoints is bisected.
    pub max_depth: usize,
    pub diagnostics: Option<&'a dyn Diagnostics>,
}

impl<'a> FlattenOptions<'a> {
    pub fn new() -> Self {
        FlattenOptions {
            max_depth: 24,
            diagnostics: None,
        }
    }

    pub fn with_diagnostics(diagnostics: &'a dyn Diagnostics) -> Self {
        FlattenOptions {
            diagnostics: Some(diagnostics),
            ..Self::new()
        }
    }
}

impl<'a> Default for FlattenOptions<'a> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Copy, Clone, Default)]
struct Tolerance {
    max_angle: Option<f64>,
    max_deviation: Option<f64>,
}

/// Curve evaluated at one parameter. `point` is the flattened position, `center` the position on
/// the curve itself (they differ when flattening an offset).
#[derive(Debug, Copy, Clone)]
struct Sample {
    t: f64,
    point: Vector2,
    center: Vector2,
    direction: f64,
}

impl Tolerance {
    fn accepts(&self, a: &Sample, mid: &Sample, b: &Sample) -> bool {
        if let Some(max_angle) = self.max_angle {
            if delta_angle(a.direction, b.direction).abs() > max_angle {
                return false;
            }
        }

        if let Some(max_deviation) = self.max_deviation {
            if dist_to_line_seg(a.point, b.point, mid.point) > max_deviation
                || dist_to_line_seg(a.center, b.center, mid.center) > max_deviation
            {
                return false;
            }
        }

        true
    }
}

fn validate_curve<C>(curve: &C) -> Result<()>
where
    C: Curve + ?Sized,
{
    let length = curve.length();
    if !(length.is_finite() && length > 0.0) {
        return Err(GeometryError::invalid(format!(
            "cannot flatten a curve of length {}",
            length
        )));
    }
    Ok(())
}

/// Flatten `curve` by `flattener`.
pub(crate) fn flatten<C>(curve: &C, flattener: Flattener, options: &FlattenOptions) -> Result<Polyline>
where
    C: Curve + ?Sized,
{
    flattener.validate()?;
    validate_curve(curve)?;

    let start = curve.start_pose().point;
    let end = curve.end_pose().point;
    let sample = |t: f64| {
        let point = curve.point_at(t);
        Sample {
            t,
            point,
            center: point,
            direction: curve.direction_at(t),
        }
    };

    let points = match flattener {
        Flattener::NumPoints(n) => fixed_count(&curve.sampling_pieces(), n, start, end, sample),
        _ if curve.is_straight() => vec![start, end],
        _ => adaptive(
            &curve.breakpoints(),
            flattener.tolerance(),
            options,
            start,
            end,
            sample,
        ),
    };

    finish(points, curve)
}

/// Flatten `curve` displaced sideways by `profile`.
pub(crate) fn offset_flatten<C>(
    curve: &C,
    profile: &OffsetProfile,
    flattener: Flattener,
    options: &FlattenOptions,
) -> Result<Polyline>
where
    C: Curve + ?Sized,
{
    flattener.validate()?;
    validate_curve(curve)?;

    let start = curve.start_pose().lateral(profile.apply(0.0));
    let end = curve.end_pose().lateral(profile.apply(1.0));
    let sample = |t: f64| {
        let center = curve.point_at(t);
        let direction = curve.direction_at(t);
        let offset = profile.apply(curve.fraction_at(t));
        Sample {
            t,
            point: center + Vector2::from_angle(direction).perp().scale(offset),
            center,
            direction,
        }
    };

    let points = match flattener {
        Flattener::NumPoints(n) => fixed_count(&curve.sampling_pieces(), n, start, end, sample),
        _ => {
            let mut breakpoints = curve.breakpoints();
            breakpoints.extend(
                profile
                    .fractions()
                    .iter()
                    .map(|f| curve.param_at_fraction(*f)),
            );
            breakpoints.retain(|t| *t >= 0.0 && *t <= 1.0);
            breakpoints.sort_by(|a, b| a.total_cmp(b));
            breakpoints.dedup_by(|a, b| (*a - *b).abs() < 1e-12);

            let mut tolerance = flattener.tolerance();
            if !profile.is_constant() {
                tolerance.max_deviation = tolerance.max_deviation.map(|d| 0.5 * d);
            }
            adaptive(&breakpoints, tolerance, options, start, end, sample)
        }
    };

    finish(points, curve)
}

fn finish<C>(points: Vec<Vector2>, curve: &C) -> Result<Polyline>
where
    C: Curve + ?Sized,
{
    let magnitude = points
        .iter()
        .fold(0.0f64, |acc, p| acc.max(p.max_abs_component()));
    let eps = f64::scaled_epsilon(magnitude.max(curve.length()), 1e-12);
    Polyline::new_remove_repeat(points, eps)
}

/// Exactly `n` points uniform in parameter within each piece, pieces sharing the `n - 1` segments
/// in proportion to their span with at least one segment each. With fewer segments than pieces
/// the whole parameter range is sampled uniformly instead.
fn fixed_count<F>(pieces: &[f64], n: usize, start: Vector2, end: Vector2, sample: F) -> Vec<Vector2>
where
    F: Fn(f64) -> Sample,
{
    let segments = n - 1;
    let whole;
    let pieces = if pieces.len() - 1 > segments {
        whole = [pieces[0], pieces[pieces.len() - 1]];
        &whole[..]
    } else {
        pieces
    };

    let spans: Vec<f64> = pieces.windows(2).map(|w| w[1] - w[0]).collect();
    let mut counts: Vec<usize> = spans
        .iter()
        .map(|s| ((s * segments as f64).floor() as usize).max(1))
        .collect();

    // segments handed to pieces that floored to zero come out of the largest pieces
    let mut assigned: usize = counts.iter().sum();
    while assigned > segments {
        let Some(i) = (0..counts.len())
            .filter(|&i| counts[i] > 1)
            .max_by_key(|&i| counts[i])
        else {
            break;
        };
        counts[i] -= 1;
        assigned -= 1;
    }

    // distribute what flooring left over by largest remainder
    if assigned < segments {
        let mut order: Vec<usize> = (0..spans.len()).collect();
        order.sort_by(|&i, &j| {
            let ri = spans[i] * segments as f64 - counts[i] as f64;
            let rj = spans[j] * segments as f64 - counts[j] as f64;
            rj.total_cmp(&ri)
        });
        for &i in order.iter().cycle().take(segments - assigned) {
            counts[i] += 1;
        }
        assigned = segments;
    }
    trace!("fixed count flattening: {} segments in {:?}", assigned, counts);

    let mut points = Vec::with_capacity(assigned + 1);
    points.push(start);
    for (w, &count) in pieces.windows(2).zip(counts.iter()) {
        for i in 1..=count {
            let t = w[0] + (w[1] - w[0]) * i as f64 / count as f64;
            points.push(sample(t).point);
        }
    }

    // last sample is at t = 1, pin it to the exact end position
    if let Some(last) = points.last_mut() {
        *last = end;
    }
    points
}

/// Bisect intervals between `breakpoints` until `tolerance` accepts them or `max_depth` is
/// reached.
fn adaptive<F>(
    breakpoints: &[f64],
    tolerance: Tolerance,
    options: &FlattenOptions,
    start: Vector2,
    end: Vector2,
    sample: F,
) -> Vec<Vector2>
where
    F: Fn(f64) -> Sample,
{
    let samples: Vec<Sample> = breakpoints.iter().map(|t| sample(*t)).collect();
    let mut points = Vec::with_capacity(samples.len() * 4);
    points.push(start);

    // stack of (start sample, end sample, depth), top is the next interval along the curve
    let mut stack: Vec<(Sample, Sample, usize)> = samples
        .windows(2)
        .rev()
        .map(|w| (w[0], w[1], 0))
        .collect();
    let mut depth_limited = false;

    while let Some((a, b, depth)) = stack.pop() {
        let mid = sample(0.5 * (a.t + b.t));
        if tolerance.accepts(&a, &mid, &b) {
            points.push(b.point);
            continue;
        }

        if depth >= options.max_depth {
            if !depth_limited {
                depth_limited = true;
                diagnostics::report(
                    options.diagnostics,
                    DegenerateGeometry::DepthLimitReached {
                        depth: options.max_depth,
                    },
                );
            }
            points.push(b.point);
            continue;
        }

        stack.push((mid, b, depth + 1));
        stack.push((a, mid, depth + 1));
    }

    if let Some(last) = points.last_mut() {
        *last = end;
    }
    trace!("adaptive flattening produced {} points", points.len());
    points
}
