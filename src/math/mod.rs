pub mod distance_2d;
pub mod intersect_2d;
pub mod polygon_2d;
pub mod units;

use crate::error::{GeometryError, Result};

/// 2D point in world units (centimetres).
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global tolerance for floating-point comparisons of pure numbers.
pub const TOLERANCE: f64 = 1e-10;

/// Returns an error if either coordinate is NaN or infinite.
///
/// # Errors
///
/// Returns `GeometryError::NonFinite` for NaN or infinite coordinates.
pub fn ensure_finite(p: &Point2) -> Result<()> {
    if p.x.is_finite() && p.y.is_finite() {
        Ok(())
    } else {
        Err(GeometryError::NonFinite { x: p.x, y: p.y }.into())
    }
}

/// Returns true when two points coincide within `tol`.
#[must_use]
pub fn points_coincide(a: &Point2, b: &Point2, tol: f64) -> bool {
    (a - b).norm_squared() < tol * tol
}

/// Midpoint of a segment.
#[must_use]
pub fn midpoint(a: &Point2, b: &Point2) -> Point2 {
    nalgebra::center(a, b)
}
