use std::f64::consts::FRAC_PI_2;

use tracing::trace;

use crate::error::Result;
use crate::math::polygon_2d::{left_normal, segment_direction};
use crate::math::{Point2, Vector2};
use crate::params::PlanParams;
use crate::topology::{VertexId, WallGraph, WallId};

use super::{Face, Mount, Placement, WallSide};

/// Places a fixture of a given size against one wall.
///
/// The usable span of the wall is its centreline shortened at each end by
/// half the thickness of the thickest roughly perpendicular wall meeting it
/// there. The pointer is projected onto that span and clamped so the whole
/// fixture fits.
pub struct PlaceOnWall {
    wall: WallId,
    point: Point2,
    size: f64,
    depth: Option<f64>,
    mount: Mount,
    side: Option<WallSide>,
    params: PlanParams,
}

impl PlaceOnWall {
    /// Creates a new `PlaceOnWall` for a surface fixture `size` long along the wall.
    #[must_use]
    pub fn new(wall: WallId, point: Point2, size: f64) -> Self {
        Self {
            wall,
            point,
            size,
            depth: None,
            mount: Mount::Surface,
            side: None,
            params: PlanParams::default(),
        }
    }

    /// Pins the fixture to one side instead of taking the side the pointer
    /// falls on. Openings keep their swing side this way when re-placed.
    #[must_use]
    pub fn with_side(mut self, side: WallSide) -> Self {
        self.side = Some(side);
        self
    }

    /// Sets how far the fixture sticks out of the wall face. Defaults to `size`.
    #[must_use]
    pub fn with_depth(mut self, depth: f64) -> Self {
        self.depth = Some(depth);
        self
    }

    /// Sets the mount type.
    #[must_use]
    pub fn with_mount(mut self, mount: Mount) -> Self {
        self.mount = mount;
        self
    }

    /// Sets the thresholds.
    #[must_use]
    pub fn with_params(mut self, params: PlanParams) -> Self {
        self.params = params;
        self
    }

    /// Computes the placement, or `None` when the wall cannot take the
    /// fixture (zero length, too short, or a ceiling mount).
    ///
    /// # Errors
    ///
    /// Returns an error if the wall or one of its vertices is missing.
    pub fn execute(&self, graph: &WallGraph) -> Result<Option<Placement>> {
        if self.mount == Mount::Ceiling {
            return Ok(None);
        }
        let data = graph.wall(self.wall)?;
        let wall = graph.resolved(self.wall)?;
        let Ok(dir) = segment_direction(&wall.start, &wall.end) else {
            return Ok(None);
        };

        let inset_start = self.end_inset(graph, data.start, &dir)?;
        let inset_end = self.end_inset(graph, data.end, &dir)?;
        let inner_start = wall.start + dir * inset_start;
        let internal_length = wall.length() - inset_start - inset_end;
        if internal_length < self.size || internal_length <= 0.0 {
            trace!(wall = ?self.wall, internal_length, size = self.size, "fixture does not fit");
            return Ok(None);
        }

        let rel = self.point - inner_start;
        let half = self.size * 0.5;
        let along = rel.dot(&dir).clamp(half, internal_length - half);
        let normal = left_normal(&dir);
        let side = self
            .side
            .unwrap_or_else(|| WallSide::from_normal_distance(rel.dot(&normal)));
        let outward = normal * side.sign();
        let centre = inner_start + dir * along;

        let angle = wall.angle();
        let (position, rotation) = match self.mount {
            Mount::Opening => (centre, angle),
            _ => {
                let depth = self.depth.unwrap_or(self.size);
                let offset = wall.thickness * 0.5 + depth * 0.5;
                (centre + outward * offset, angle + side.sign() * FRAC_PI_2)
            }
        };

        Ok(Some(Placement {
            position,
            rotation,
            wall: Some(self.wall),
            left_segment: along - half,
            right_segment: internal_length - along - half,
            side,
            face: Face::from_outward_normal(&outward, wall.is_more_horizontal()),
            is_magnetized: true,
        }))
    }

    /// Half the thickness of the thickest wall meeting `vertex` within the
    /// perpendicular tolerance, or zero.
    fn end_inset(&self, graph: &WallGraph, vertex: VertexId, dir: &Vector2) -> Result<f64> {
        let max_cos = self.params.perpendicular_tolerance_deg.to_radians().sin();
        let mut thickest = 0.0_f64;
        for other in graph.walls_at(vertex) {
            if other == self.wall {
                continue;
            }
            let (s, e) = graph.segment(other)?;
            let Ok(other_dir) = segment_direction(&s, &e) else {
                continue;
            };
            if dir.dot(&other_dir).abs() <= max_cos {
                thickest = thickest.max(graph.wall(other)?.thickness);
            }
        }
        Ok(thickest * 0.5)
    }
}
