use serde::{Deserialize, Serialize};

use crate::error::{Result, SerializationError};

/// Tunable thresholds shared by the wall graph, the room detector and the
/// placement solver. All lengths are world units (centimetres).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanParams {
    /// Walls must be strictly longer than this.
    pub min_wall_length: f64,
    /// Distance under which two endpoints are the same vertex.
    pub vertex_tolerance: f64,
    /// Crossings this close to an endpoint of both walls are corners.
    pub shared_endpoint_tolerance: f64,
    /// Sine of the largest angle still considered collinear.
    pub collinear_tolerance: f64,
    /// Longest cycle (in vertices) the room search follows.
    pub max_cycle_length: usize,
    /// Smallest centreline polygon area accepted as a room (world units²).
    pub min_room_area: f64,
    /// Deviation from 90° under which a neighbouring wall insets a wall end.
    pub perpendicular_tolerance_deg: f64,
    /// Screen-space magnet radius in pixels.
    pub magnet_threshold_px: f64,
    /// Thickness given to walls drawn with the wall tool.
    pub default_wall_thickness: f64,
}

impl Default for PlanParams {
    fn default() -> Self {
        Self {
            min_wall_length: 5.0,
            vertex_tolerance: 1.0,
            shared_endpoint_tolerance: 1.0,
            collinear_tolerance: 1e-3,
            max_cycle_length: 8,
            min_room_area: 10_000.0,
            perpendicular_tolerance_deg: 15.0,
            magnet_threshold_px: 20.0,
            default_wall_thickness: 10.0,
        }
    }
}

impl PlanParams {
    /// Parses parameters from JSON; missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `SerializationError::Json` on malformed input.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SerializationError::Json(e).into())
    }

    /// Magnet radius in world units at the given zoom factor.
    #[must_use]
    pub fn magnet_radius(&self, zoom: f64) -> f64 {
        if zoom > 0.0 {
            self.magnet_threshold_px / zoom
        } else {
            self.magnet_threshold_px
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let params = PlanParams::from_json(r#"{ "max_cycle_length": 6 }"#).unwrap();
        assert_eq!(params.max_cycle_length, 6);
        assert!((params.min_wall_length - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(PlanParams::from_json("{ nope").is_err());
    }

    #[test]
    fn magnet_radius_scales_with_zoom() {
        let params = PlanParams::default();
        assert!((params.magnet_radius(2.0) - 10.0).abs() < f64::EPSILON);
        assert!((params.magnet_radius(0.0) - 20.0).abs() < f64::EPSILON);
    }
}
