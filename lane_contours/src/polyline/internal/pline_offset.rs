use log::trace;
use static_aabb2d_index::{StaticAABB2DIndex, StaticAABB2DIndexBuilder};

use crate::{
    core::{
        math::{
            dist_squared, line_line_intr, parametric_from_point, point_from_parametric,
            LineLineIntr, Vector2,
        },
        traits::Real,
    },
    diagnostics::{report, DegenerateGeometry},
    error::{GeometryError, Result},
    polyline::{remove_repeat_points, OffsetOptions, OffsetProfile, Polyline},
};

/// Raw offset polyline before cleanup.
///
/// `refs[i]` is the direction of the reference segment that segment `i` (from `points[i]` to
/// `points[i + 1]`) runs parallel to, `None` for bevel segments joining two offset segments.
/// `src[i]` is the index of the reference point `points[i]` was displaced from.
#[derive(Debug)]
struct RawOffset<T> {
    points: Vec<Vector2<T>>,
    refs: Vec<Option<Vector2<T>>>,
    src: Vec<usize>,
}

impl<T> RawOffset<T>
where
    T: Real,
{
    fn with_capacity(n: usize) -> Self {
        RawOffset {
            points: Vec::with_capacity(n),
            refs: Vec::with_capacity(n),
            src: Vec::with_capacity(n),
        }
    }

    fn start(&mut self, p: Vector2<T>) {
        debug_assert!(self.points.is_empty());
        self.points.push(p);
        self.src.push(0);
    }

    fn push(&mut self, p: Vector2<T>, reference: Option<Vector2<T>>, src: usize) {
        self.points.push(p);
        self.refs.push(reference);
        self.src.push(src);
    }
}

/// Absolute position epsilon for `points` offset by up to `max_offset`.
fn position_epsilon<T>(points: &[Vector2<T>], max_offset: T, relative: T) -> T
where
    T: Real,
{
    let magnitude = points
        .iter()
        .fold(T::zero(), |acc, p| num_traits::real::Real::max(acc, p.max_abs_component()));
    T::scaled_epsilon(magnitude + max_offset.abs(), relative)
}

/// Remove interior points lying within `eps` of the line through the previously kept point and
/// the next point, as long as the path keeps going forward through them.
fn collapse_collinear<T>(points: &[Vector2<T>], eps: T) -> (Vec<Vector2<T>>, usize)
where
    T: Real,
{
    let mut result = Vec::with_capacity(points.len());
    result.push(points[0]);
    let mut removed = 0;
    for i in 1..points.len() - 1 {
        let prev = result[result.len() - 1];
        let curr = points[i];
        let next = points[i + 1];
        let chord = next - prev;
        let chord_len = chord.length();
        let forward = (curr - prev).dot(next - curr) > T::zero();
        if forward && chord_len > eps && (chord.perp_dot(curr - prev) / chord_len).abs() <= eps {
            removed += 1;
            continue;
        }
        result.push(curr);
    }
    result.push(points[points.len() - 1]);
    (result, removed)
}

/// Build the raw offset of `points` where point `k` is displaced by `offsets[k]`.
fn raw_offset<T>(
    points: &[Vector2<T>],
    offsets: &[T],
    options: &OffsetOptions<T>,
) -> RawOffset<T>
where
    T: Real,
{
    debug_assert_eq!(points.len(), offsets.len());
    let n = points.len();
    let dirs: Vec<Vector2<T>> = points
        .windows(2)
        .map(|w| (w[1] - w[0]).normalize())
        .collect();

    let mut raw = RawOffset::with_capacity(n + 8);
    raw.start(points[0] + dirs[0].perp().scale(offsets[0]));

    for k in 1..n - 1 {
        let p = points[k];
        let o = offsets[k];
        let u1 = dirs[k - 1];
        let u2 = dirs[k];
        let n1 = u1.perp();
        let n2 = u2.perp();
        let cos_turn = u1.dot(u2);
        let one_plus_cos = T::one() + cos_turn;

        if o == T::zero() {
            raw.push(p, Some(u1), k);
            continue;
        }

        // offset on the outside of the turn when turning away from the offset side
        let outside = u1.perp_dot(u2) * o < T::zero();
        // miter length over offset is 1 / cos(turn / 2)
        let half_cos = num_traits::real::Real::max(one_plus_cos / T::two(), T::zero()).sqrt();
        let reversal = one_plus_cos <= options.reversal_eps;
        let over_miter = outside && half_cos * options.miter_limit < T::one();

        if reversal || over_miter {
            let bevel_dir = if reversal {
                u1.scale(o.signum())
            } else {
                (n1 + n2).normalize()
            };
            raw.push(p + n1.scale(o), Some(u1), k);
            raw.push(p + bevel_dir.scale(o), None, k);
            raw.push(p + n2.scale(o), None, k);
            report(
                options.diagnostics,
                DegenerateGeometry::KinkBeveled { vertex: k },
            );
        } else {
            raw.push(p + (n1 + n2).scale(o / one_plus_cos), Some(u1), k);
        }
    }

    raw.push(
        points[n - 1] + dirs[n - 2].perp().scale(offsets[n - 1]),
        Some(dirs[n - 2]),
        n - 1,
    );
    raw
}

/// Remove offset segments running against their reference direction.
///
/// Every step deletes at least one point, so at most `raw.points.len() - 2` steps run. The first
/// and last points are never moved.
fn remove_inverted<T>(raw: &mut RawOffset<T>, eps: T) -> usize
where
    T: Real,
{
    let max_steps = raw.points.len().saturating_sub(2);
    let mut removed = 0;
    let mut search_from = 0;

    while removed < max_steps {
        let inverted = (search_from..raw.refs.len()).find(|&i| match raw.refs[i] {
            Some(r) => (raw.points[i + 1] - raw.points[i]).dot(r) < T::zero(),
            None => false,
        });

        let Some(k) = inverted else {
            break;
        };

        let last_seg = raw.refs.len() - 1;
        if last_seg == 0 {
            // single segment left, nothing to cut out
            break;
        }

        if k == 0 {
            // keep the start point, drop the inverted segment's end
            raw.points.remove(1);
            raw.src.remove(1);
            raw.refs.remove(0);
        } else if k == last_seg {
            raw.points.remove(k);
            raw.src.remove(k);
            raw.refs.remove(k);
            search_from = k - 1;
        } else {
            let a0 = raw.points[k - 1];
            let a1 = raw.points[k];
            let b0 = raw.points[k + 1];
            let b1 = raw.points[k + 2];
            match line_line_intr(a0, a1, b0, b1, eps) {
                LineLineIntr::TrueIntersect { seg1_t, .. }
                | LineLineIntr::FalseIntersect { seg1_t, .. } => {
                    // join the neighbor segments at the intersect of their lines
                    raw.points[k] = point_from_parametric(a0, a1, seg1_t);
                    raw.points.remove(k + 1);
                    raw.src.remove(k + 1);
                    raw.refs.remove(k);
                }
                LineLineIntr::NoIntersect | LineLineIntr::Overlapping { .. } => {
                    // parallel neighbors never meet, cut out the whole span from a0 to b1 and
                    // keep checking the joining segment against the inverted reference
                    raw.points.drain(k..=k + 1);
                    raw.src.drain(k..=k + 1);
                    raw.refs.remove(k + 1);
                    raw.refs.remove(k - 1);
                }
            }
            search_from = k - 1;
        }

        removed += 1;
    }

    removed
}

/// Spatial index of the segments of `points`, item `i` is the segment starting at point `i`.
fn segment_index<T>(points: &[Vector2<T>]) -> Option<StaticAABB2DIndex<T>>
where
    T: Real,
{
    let mut builder = StaticAABB2DIndexBuilder::new(points.len() - 1);
    for w in points.windows(2) {
        builder.add(
            num_traits::real::Real::min(w[0].x, w[1].x),
            num_traits::real::Real::min(w[0].y, w[1].y),
            num_traits::real::Real::max(w[0].x, w[1].x),
            num_traits::real::Real::max(w[0].y, w[1].y),
        );
    }

    match builder.build() {
        Ok(index) => Some(index),
        Err(e) => {
            // falls back to testing every segment pair
            log::debug!("offset segment index not built: {}", e);
            None
        }
    }
}

/// Fill `meetings` with every segment `j > i + 1` that touches, crosses or overlaps segment `i`,
/// paired with the first parametric value along segment `i` where they meet.
fn segment_meetings<T>(
    points: &[Vector2<T>],
    i: usize,
    index: Option<&StaticAABB2DIndex<T>>,
    eps: T,
    query_stack: &mut Vec<usize>,
    meetings: &mut Vec<(T, usize)>,
) where
    T: Real,
{
    meetings.clear();
    let v1 = points[i];
    let v2 = points[i + 1];
    let candidates: Vec<usize> = match index {
        Some(index) => index.query_with_stack(
            num_traits::real::Real::min(v1.x, v2.x) - eps,
            num_traits::real::Real::min(v1.y, v2.y) - eps,
            num_traits::real::Real::max(v1.x, v2.x) + eps,
            num_traits::real::Real::max(v1.y, v2.y) + eps,
            query_stack,
        ),
        None => (0..points.len() - 1).collect(),
    };

    for j in candidates {
        if j < i + 2 {
            continue;
        }
        let u1 = points[j];
        let u2 = points[j + 1];
        let t = match line_line_intr(v1, v2, u1, u2, eps) {
            LineLineIntr::TrueIntersect { seg1_t, .. } => seg1_t,
            LineLineIntr::Overlapping { seg2_t0, seg2_t1 } => {
                let t0 = parametric_from_point(v1, v2, point_from_parametric(u1, u2, seg2_t0));
                let t1 = parametric_from_point(v1, v2, point_from_parametric(u1, u2, seg2_t1));
                num_traits::real::Real::min(t0, t1)
            }
            LineLineIntr::NoIntersect | LineLineIntr::FalseIntersect { .. } => continue,
        };
        meetings.push((num_traits::clamp(t, T::zero(), T::one()), j));
    }
}

/// Pairs of non-adjacent segments of `points` that meet, as `(i, j)` with `i < j`.
fn crossing_pairs<T>(points: &[Vector2<T>], eps: T) -> Vec<(usize, usize)>
where
    T: Real,
{
    let mut pairs = Vec::new();
    if points.len() < 4 {
        return pairs;
    }
    let index = segment_index(points);
    let mut query_stack = Vec::with_capacity(8);
    let mut meetings = Vec::new();
    for i in 0..points.len() - 1 {
        segment_meetings(points, i, index.as_ref(), eps, &mut query_stack, &mut meetings);
        pairs.extend(meetings.iter().map(|&(_, j)| (i, j)));
    }
    pairs
}

/// Cut out loops where the offset crosses, touches or runs back along itself, returns the number
/// of loops cut.
///
/// Walking from the start, the first point that a later segment returns to is joined directly to
/// the last such segment. Loops spanning a crossing of the reference line `source` itself are
/// kept. Every cut deletes at least one point, so at most `raw.points.len() - 3` cuts run and the
/// first and last points are never moved.
fn clip_self_intersections<T>(raw: &mut RawOffset<T>, source: &[Vector2<T>], eps: T) -> usize
where
    T: Real,
{
    let source_crossings = crossing_pairs(source, eps);
    let mut query_stack = Vec::with_capacity(8);
    let mut meetings = Vec::new();
    let mut clipped = 0;

    'cut: while raw.points.len() > 3 {
        let index = segment_index(&raw.points);
        for i in 0..raw.points.len() - 1 {
            segment_meetings(
                &raw.points,
                i,
                index.as_ref(),
                eps,
                &mut query_stack,
                &mut meetings,
            );

            let src = &raw.src;
            meetings.retain(|&(_, j)| {
                !source_crossings
                    .iter()
                    .any(|&(a, b)| a + 1 >= src[i] && b <= src[j + 1])
            });

            // earliest along segment i, the latest segment on ties
            let seg_length = (raw.points[i + 1] - raw.points[i]).length();
            let best = meetings.iter().copied().reduce(|best, m| {
                let tie = ((m.0 - best.0) * seg_length).abs() <= eps;
                if (tie && m.1 > best.1) || (!tie && m.0 < best.0) {
                    m
                } else {
                    best
                }
            });

            if let Some((t, j)) = best {
                trace!("clipping offset loop from segment {} to segment {}", i, j);
                let joint = point_from_parametric(raw.points[i], raw.points[i + 1], t);
                let joint_src = raw.src[i];
                raw.points.splice(i + 1..=j, std::iter::once(joint));
                raw.src.splice(i + 1..=j, std::iter::once(joint_src));
                raw.refs.drain(i + 1..j);
                clipped += 1;
                continue 'cut;
            }
        }
        break;
    }

    clipped
}

/// Clean up the raw offset of `source` into the final polyline.
fn finish<T>(
    mut raw: RawOffset<T>,
    source: &[Vector2<T>],
    eps: T,
    options: &OffsetOptions<T>,
) -> Result<Polyline<T>>
where
    T: Real,
{
    let removed = remove_inverted(&mut raw, eps);
    if removed > 0 {
        report(
            options.diagnostics,
            DegenerateGeometry::InvertedSegmentsRemoved { count: removed },
        );
    }

    let clipped = clip_self_intersections(&mut raw, source, eps);
    if clipped > 0 {
        report(
            options.diagnostics,
            DegenerateGeometry::SelfIntersectionsClipped { count: clipped },
        );
    }

    let raw_count = raw.points.len();
    let points = remove_repeat_points(raw.points, eps);
    if points.len() < raw_count {
        report(
            options.diagnostics,
            DegenerateGeometry::DuplicatePointsRemoved {
                count: raw_count - points.len(),
            },
        );
    }

    if points.len() < 2 {
        return Err(GeometryError::invalid(
            "offset collapses the polyline to a single point",
        ));
    }

    Polyline::new(points)
}

/// Clean `polyline` for offsetting, returns the points and the absolute position epsilon.
fn prepare<T>(
    polyline: &Polyline<T>,
    max_offset: T,
    options: &OffsetOptions<T>,
) -> (Vec<Vector2<T>>, T)
where
    T: Real,
{
    let eps = position_epsilon(polyline.points(), max_offset, options.pos_equal_eps);
    let mut points = remove_repeat_points(polyline.points().to_vec(), eps);
    if points.len() < 2 {
        // every point within eps of each other, fall back to the end points
        points = vec![polyline.first(), polyline.last()];
    }
    let collinear_eps = position_epsilon(polyline.points(), T::zero(), options.collinear_eps);
    let (points, removed) = collapse_collinear(&points, collinear_eps);
    if removed > 0 {
        report(
            options.diagnostics,
            DegenerateGeometry::CollinearPointsRemoved { count: removed },
        );
    }
    (points, eps)
}

/// Offset every point of `polyline` by the constant `offset`.
pub fn offset_constant<T>(
    polyline: &Polyline<T>,
    offset: T,
    options: &OffsetOptions<T>,
) -> Result<Polyline<T>>
where
    T: Real,
{
    if !offset.is_finite() {
        return Err(GeometryError::invalid(format!(
            "offset must be finite, got {}",
            offset
        )));
    }

    if offset == T::zero() {
        return Ok(polyline.clone());
    }

    let (points, eps) = prepare(polyline, offset, options);
    let offsets = vec![offset; points.len()];
    let raw = raw_offset(&points, &offsets, options);
    let result = finish(raw, &points, eps, options)?;

    trace!(
        "constant offset {}: {} input points, {} output points",
        offset,
        polyline.vertex_count(),
        result.vertex_count()
    );
    Ok(result)
}

/// Offset `polyline` by `profile`, evaluated at the arc length fraction of every point.
pub fn offset_variable<T>(
    polyline: &Polyline<T>,
    profile: &OffsetProfile<T>,
    options: &OffsetOptions<T>,
) -> Result<Polyline<T>>
where
    T: Real,
{
    if profile.is_constant() {
        return offset_constant(polyline, profile.offsets()[0], options);
    }

    let max_offset = profile.max_abs_offset();
    let (points, eps) = prepare(polyline, max_offset, options);
    let (samples, offsets) = resample(&points, profile, max_offset, eps, options);

    let raw = raw_offset(&samples, &offsets, options);
    let result = finish(raw, &samples, eps, options)?;

    trace!(
        "variable offset: {} input points, {} samples, {} output points",
        polyline.vertex_count(),
        samples.len(),
        result.vertex_count()
    );
    Ok(result)
}

/// Insert samples into `points` at the profile breakpoints and wherever the offset would change
/// by more than the allowed step, returns the samples and their offsets.
fn resample<T>(
    points: &[Vector2<T>],
    profile: &OffsetProfile<T>,
    max_offset: T,
    eps: T,
    options: &OffsetOptions<T>,
) -> (Vec<Vector2<T>>, Vec<T>)
where
    T: Real,
{
    let total: T = points
        .windows(2)
        .fold(T::zero(), |acc, w| acc + dist_squared(w[0], w[1]).sqrt());
    let mut fractions = Vec::with_capacity(points.len());
    let mut acc = T::zero();
    fractions.push(T::zero());
    for w in points.windows(2) {
        acc = acc + dist_squared(w[0], w[1]).sqrt();
        fractions.push(acc / total);
    }
    let last = fractions.len() - 1;
    fractions[last] = T::one();

    let step = max_offset * options.offset_change_ratio;
    let cap = options.max_segment_subdivisions.max(1);

    let mut samples = Vec::with_capacity(points.len() * 2);
    let mut offsets = Vec::with_capacity(points.len() * 2);
    samples.push(points[0]);
    offsets.push(profile.apply(T::zero()));

    for i in 0..points.len() - 1 {
        let (fa, fb) = (fractions[i], fractions[i + 1]);
        let (pa, pb) = (points[i], points[i + 1]);
        let seg_span = fb - fa;

        let mut cuts: Vec<T> = profile
            .fractions()
            .iter()
            .copied()
            .filter(|&f| f > fa && f < fb)
            .collect();
        cuts.push(fb);

        let mut inserted = 0usize;
        let mut capped = false;
        let mut prev = fa;
        for cut in cuts {
            let change = (profile.apply(cut) - profile.apply(prev)).abs();
            let mut steps = if step > T::zero() {
                (change / step).ceil().to_usize().unwrap_or(cap).max(1)
            } else {
                1
            };
            let remaining = cap.saturating_sub(inserted).max(1);
            if steps > remaining {
                steps = remaining;
                capped = true;
            }

            for s in 1..=steps {
                let f = prev + (cut - prev) * T::from_usize(s) / T::from_usize(steps);
                let is_vertex = s == steps && cut == fb;
                if is_vertex {
                    samples.push(pb);
                    offsets.push(profile.apply(fb));
                    continue;
                }
                // skip samples that would nearly coincide with the segment end points
                let along = (f - fa) * total;
                if along <= eps || (fb - f) * total <= eps {
                    continue;
                }
                samples.push(point_from_parametric(pa, pb, (f - fa) / seg_span));
                offsets.push(profile.apply(f));
                inserted += 1;
            }
            prev = cut;
        }

        if capped {
            report(
                options.diagnostics,
                DegenerateGeometry::SubdivisionCapReached { segment: i, cap },
            );
        }
    }

    (samples, offsets)
}
