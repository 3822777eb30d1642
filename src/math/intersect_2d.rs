use super::{Point2, Vector2, TOLERANCE};

/// Parametric 2D line-line intersection.
///
/// Given lines `p1 + t * d1` and `p2 + u * d2`, returns `(t, u)` if not parallel.
#[must_use]
pub fn line_line_intersect_2d(
    p1: &Point2,
    d1: &Vector2,
    p2: &Point2,
    d2: &Vector2,
) -> Option<(f64, f64)> {
    let cross = d1.perp(d2);
    if cross.abs() < TOLERANCE {
        return None;
    }
    let d = p2 - p1;
    let t = d.perp(d2) / cross;
    let u = d.perp(d1) / cross;
    Some((t, u))
}

/// Bounded segment-segment intersection in 2D.
///
/// Returns `(intersection_point, t, u)` where `t` and `u` are in `[0, 1]`.
/// Parallel and collinear segments never intersect.
#[must_use]
pub fn segment_segment_intersect_2d(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
) -> Option<(Point2, f64, f64)> {
    let da = a1 - a0;
    let db = b1 - b0;
    let (t, u) = line_line_intersect_2d(a0, &da, b0, &db)?;

    // Use a small epsilon to include endpoints.
    let eps = TOLERANCE;
    if t >= -eps && t <= 1.0 + eps && u >= -eps && u <= 1.0 + eps {
        let t = t.clamp(0.0, 1.0);
        Some((a0 + da * t, t, u.clamp(0.0, 1.0)))
    } else {
        None
    }
}

/// Intersection of two wall segments, ignoring contact at a shared vertex.
///
/// Returns `None` when the segments are parallel, when they do not overlap
/// within their bounds, or when the crossing point lies within
/// `shared_tolerance` of an endpoint of *both* segments (two walls that
/// already meet at a corner). A T-junction, where only one segment ends at
/// the crossing, is reported.
#[must_use]
pub fn segments_intersect(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
    shared_tolerance: f64,
) -> Option<Point2> {
    let (pt, _, _) = segment_segment_intersect_2d(a0, a1, b0, b1)?;
    let tol_sq = shared_tolerance * shared_tolerance;
    let near = |q: &Point2| (pt - q).norm_squared() < tol_sq;
    if (near(a0) || near(a1)) && (near(b0) || near(b1)) {
        return None;
    }
    Some(pt)
}
