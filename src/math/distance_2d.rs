use super::Point2;

/// Squared-length floor below which a segment is treated as a point.
const DEGENERATE_LEN_SQ: f64 = 1e-20;

/// Euclidean distance between two points.
#[must_use]
pub fn distance(a: &Point2, b: &Point2) -> f64 {
    nalgebra::distance(a, b)
}

/// Returns the minimum distance from `p` to the segment `a`–`b`.
///
/// A zero-length segment falls back to point distance.
#[must_use]
pub fn distance_to_segment(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let d = b - a;
    let len_sq = d.norm_squared();

    if len_sq < DEGENERATE_LEN_SQ {
        return distance(p, a);
    }

    // Project onto the infinite line, clamp to [0, 1].
    let t = ((p - a).dot(&d) / len_sq).clamp(0.0, 1.0);
    distance(p, &(a + d * t))
}

/// Parameter `t` of the unclamped projection of `p` onto the line through
/// `a` and `b` (`0` at `a`, `1` at `b`).
///
/// Returns `None` for a zero-length segment.
#[must_use]
pub fn projection_parameter(p: &Point2, a: &Point2, b: &Point2) -> Option<f64> {
    let d = b - a;
    let len_sq = d.norm_squared();
    if len_sq < DEGENERATE_LEN_SQ {
        return None;
    }
    Some((p - a).dot(&d) / len_sq)
}

/// Projects `p` onto the infinite line through `a` and `b`.
///
/// The result is not clamped to the segment; callers validate bounds
/// separately. A zero-length segment projects everything onto `a`.
#[must_use]
pub fn project_onto_line(p: &Point2, a: &Point2, b: &Point2) -> Point2 {
    match projection_parameter(p, a, b) {
        Some(t) => a + (b - a) * t,
        None => *a,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn segment_dist_perpendicular_projection() {
        let d = distance_to_segment(&p(1.0, 1.0), &p(0.0, 0.0), &p(2.0, 0.0));
        assert!((d - 1.0).abs() < TOL, "d={d}");
    }

    #[test]
    fn segment_dist_endpoint_closest() {
        let d = distance_to_segment(&p(-1.0, 0.0), &p(0.0, 0.0), &p(2.0, 0.0));
        assert!((d - 1.0).abs() < TOL, "d={d}");
    }

    #[test]
    fn segment_dist_degenerate() {
        let d = distance_to_segment(&p(3.0, 4.0), &p(0.0, 0.0), &p(0.0, 0.0));
        assert!((d - 5.0).abs() < TOL, "d={d}");
    }

    #[test]
    fn projection_is_unclamped() {
        // Beyond the far end the projection stays on the extended line.
        let q = project_onto_line(&p(15.0, 3.0), &p(0.0, 0.0), &p(10.0, 0.0));
        assert!((q.x - 15.0).abs() < TOL);
        assert!(q.y.abs() < TOL);
    }

    #[test]
    fn projection_degenerate_returns_start() {
        let q = project_onto_line(&p(5.0, 5.0), &p(1.0, 1.0), &p(1.0, 1.0));
        assert!((q.x - 1.0).abs() < TOL && (q.y - 1.0).abs() < TOL);
        assert!(projection_parameter(&p(5.0, 5.0), &p(1.0, 1.0), &p(1.0, 1.0)).is_none());
    }
}
