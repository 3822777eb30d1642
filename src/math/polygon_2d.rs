use super::intersect_2d::{line_line_intersect_2d, segment_segment_intersect_2d};
use super::{Point2, Vector2, TOLERANCE};
use crate::error::{GeometryError, Result};

/// Area below which a polygon is treated as degenerate.
const DEGENERATE_AREA: f64 = 1e-9;

/// Computes the signed area of a polygon (shoelace formula).
///
/// Positive for counter-clockwise in a y-up frame, which is clockwise on a
/// y-down canvas.
#[must_use]
pub fn signed_area(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Unsigned polygon area.
#[must_use]
pub fn polygon_area(points: &[Point2]) -> f64 {
    signed_area(points).abs()
}

/// Area-weighted centroid of a polygon.
///
/// Falls back to the vertex mean when the polygon has no area.
#[must_use]
pub fn polygon_centroid(points: &[Point2]) -> Option<Point2> {
    let n = points.len();
    if n == 0 {
        return None;
    }
    let area = signed_area(points);
    if area.abs() < DEGENERATE_AREA {
        let sum = points.iter().fold(Vector2::zeros(), |acc, p| acc + p.coords);
        #[allow(clippy::cast_precision_loss)]
        return Some(Point2::from(sum / n as f64));
    }

    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..n {
        let a = &points[i];
        let b = &points[(i + 1) % n];
        let cross = a.x * b.y - b.x * a.y;
        cx += (a.x + b.x) * cross;
        cy += (a.y + b.y) * cross;
    }
    let factor = 1.0 / (6.0 * area);
    Some(Point2::new(cx * factor, cy * factor))
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Point2,
    /// Maximum corner.
    pub max: Point2,
}

impl Aabb {
    /// Bounding box of a point set, `None` when empty.
    #[must_use]
    pub fn from_points(points: &[Point2]) -> Option<Self> {
        let first = points.first()?;
        let mut min = *first;
        let mut max = *first;
        for p in &points[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Some(Self { min, max })
    }

    /// Returns true if `p` lies inside or on the box.
    #[must_use]
    pub fn contains(&self, p: &Point2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Ray-casting point-in-polygon test.
///
/// Points exactly on the boundary may land on either side.
#[must_use]
pub fn point_in_polygon(p: &Point2, polygon: &[Point2]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let pi = &polygon[i];
        let pj = &polygon[j];
        if (pi.y > p.y) != (pj.y > p.y) {
            let x_cross = pj.x + (p.y - pj.y) * (pi.x - pj.x) / (pi.y - pj.y);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// [`point_in_polygon`] with a bounding-box rejection first.
#[must_use]
pub fn point_in_polygon_bounded(p: &Point2, polygon: &[Point2], bounds: &Aabb) -> bool {
    bounds.contains(p) && point_in_polygon(p, polygon)
}

/// Returns true if no two non-adjacent edges of the closed polygon touch.
#[must_use]
pub fn is_simple_polygon(points: &[Point2]) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }
    for i in 0..n {
        let a0 = &points[i];
        let a1 = &points[(i + 1) % n];
        for j in (i + 2)..n {
            // First and last edges share the closing vertex.
            if i == 0 && j == n - 1 {
                continue;
            }
            let b0 = &points[j];
            let b1 = &points[(j + 1) % n];
            if segment_segment_intersect_2d(a0, a1, b0, b1).is_some() {
                return false;
            }
        }
    }
    true
}

/// Offsets every edge of a closed polygon inward by `offset` and re-intersects
/// consecutive edges to find the new corners.
///
/// Returns `None` for fewer than 3 points or a polygon without area.
#[must_use]
pub fn inset_polygon(path: &[Point2], offset: f64) -> Option<Vec<Point2>> {
    inset_polygon_per_edge(path, &vec![offset; path.len()])
}

/// Like [`inset_polygon`] with one offset per edge; edge `i` runs from
/// `path[i]` to `path[i + 1]`.
#[must_use]
pub fn inset_polygon_per_edge(path: &[Point2], offsets: &[f64]) -> Option<Vec<Point2>> {
    let n = path.len();
    if n < 3 || offsets.len() != n {
        return None;
    }
    let area = signed_area(path);
    if area.abs() < DEGENERATE_AREA {
        return None;
    }
    // Left normal points inward for a positive winding.
    let inward_sign = if area > 0.0 { 1.0 } else { -1.0 };

    let mut shifted: Vec<(Point2, Vector2)> = Vec::with_capacity(n);
    for i in 0..n {
        let a = path[i];
        let b = path[(i + 1) % n];
        let dir = b - a;
        let len = dir.norm();
        if len < TOLERANCE {
            return None;
        }
        let normal = left_normal(&(dir / len)) * inward_sign;
        shifted.push((a + normal * offsets[i], dir));
    }

    let mut result = Vec::with_capacity(n);
    for i in 0..n {
        let prev = (i + n - 1) % n;
        let (p_prev, d_prev) = &shifted[prev];
        let (p_cur, d_cur) = &shifted[i];
        match line_line_intersect_2d(p_prev, d_prev, p_cur, d_cur) {
            Some((t, _)) => result.push(p_prev + d_prev * t),
            // Collinear neighbours: the corner slides along with the edge.
            None => result.push(*p_cur),
        }
    }
    Some(result)
}

/// Rotates a closed polygon so it starts at the leftmost vertex (smallest x),
/// breaking ties by smallest y. Ensures deterministic output for tests.
#[must_use]
pub fn rotate_to_canonical_start(points: &[Point2], tol: f64) -> Vec<Point2> {
    if points.len() < 2 {
        return points.to_vec();
    }
    let mut best = 0;
    for (i, pt) in points.iter().enumerate().skip(1) {
        let b = &points[best];
        if pt.x < b.x - tol || (pt.x - b.x).abs() < tol && pt.y < b.y {
            best = i;
        }
    }
    let mut rotated = Vec::with_capacity(points.len());
    rotated.extend_from_slice(&points[best..]);
    rotated.extend_from_slice(&points[..best]);
    rotated
}

/// Computes the normalized direction from point `a` to point `b`.
///
/// # Errors
///
/// Returns `GeometryError::Degenerate` if the segment has zero length.
pub fn segment_direction(a: &Point2, b: &Point2) -> Result<Vector2> {
    let d = b - a;
    let len = d.norm();
    if len < TOLERANCE {
        return Err(GeometryError::Degenerate(format!(
            "zero-length segment between ({}, {}) and ({}, {})",
            a.x, a.y, b.x, b.y
        ))
        .into());
    }
    Ok(d / len)
}

/// Returns the left-pointing normal of a direction vector.
#[must_use]
pub fn left_normal(dir: &Vector2) -> Vector2 {
    Vector2::new(-dir.y, dir.x)
}
