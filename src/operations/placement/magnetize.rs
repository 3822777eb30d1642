use tracing::trace;

use crate::math::Point2;
use crate::operations::query::WallsNear;
use crate::params::PlanParams;
use crate::topology::WallGraph;

use super::{Mount, PlaceOnWall, Placement, WallSide};

/// Snaps a fixture preview onto the nearest wall that can take it.
///
/// Candidates are the walls within the magnet radius (a screen-space
/// threshold divided by the zoom), tried closest first. When none fits, the
/// preview floats free at the pointer.
pub struct Magnetize {
    point: Point2,
    size: f64,
    depth: Option<f64>,
    mount: Mount,
    side: Option<WallSide>,
    zoom: f64,
    params: PlanParams,
}

impl Magnetize {
    /// Creates a new `Magnetize` for a surface fixture at zoom 1.
    #[must_use]
    pub fn new(point: Point2, size: f64) -> Self {
        Self {
            point,
            size,
            depth: None,
            mount: Mount::Surface,
            side: None,
            zoom: 1.0,
            params: PlanParams::default(),
        }
    }

    /// Sets the fixture depth.
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

    /// Pins the side on whichever wall is picked.
    #[must_use]
    pub fn with_side(mut self, side: WallSide) -> Self {
        self.side = Some(side);
        self
    }

    /// Sets the view zoom the magnet radius is scaled by.
    #[must_use]
    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }

    /// Sets the thresholds.
    #[must_use]
    pub fn with_params(mut self, params: PlanParams) -> Self {
        self.params = params;
        self
    }

    /// Returns the best placement. Never fails: an unusable wall just drops
    /// out of the candidate list.
    #[must_use]
    pub fn execute(&self, graph: &WallGraph) -> Placement {
        if self.mount == Mount::Ceiling {
            return Placement::free(self.point);
        }
        let radius = self.params.magnet_radius(self.zoom);
        for (wall, distance) in WallsNear::new(self.point, radius).execute(graph) {
            let mut op = PlaceOnWall::new(wall, self.point, self.size)
                .with_mount(self.mount)
                .with_params(self.params);
            if let Some(depth) = self.depth {
                op = op.with_depth(depth);
            }
            if let Some(side) = self.side {
                op = op.with_side(side);
            }
            if let Ok(Some(placement)) = op.execute(graph) {
                trace!(?wall, distance, "magnetized");
                return placement;
            }
        }
        Placement::free(self.point)
    }
}
