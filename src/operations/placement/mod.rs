mod magnetize;
mod solver;

pub use magnetize::Magnetize;
pub use solver::PlaceOnWall;

use serde::{Deserialize, Serialize};

use crate::math::{Point2, Vector2};
use crate::topology::WallId;

/// How a fixture attaches to the building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mount {
    /// Flush against one face of a wall (sockets, switches, panels).
    Surface,
    /// Cut into the wall on its centreline (doors, windows).
    Opening,
    /// Hung from the ceiling inside a room; never snaps to walls.
    Ceiling,
}

/// Which side of a wall a fixture sits on, relative to the wall's
/// start-to-end direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WallSide {
    /// Along the left normal.
    #[default]
    Left,
    Right,
}

impl WallSide {
    /// `+1` for [`WallSide::Left`], `-1` for [`WallSide::Right`].
    #[must_use]
    pub fn sign(self) -> f64 {
        match self {
            Self::Left => 1.0,
            Self::Right => -1.0,
        }
    }

    /// Side of the wall a signed normal distance falls on. Zero counts as left.
    #[must_use]
    pub fn from_normal_distance(d: f64) -> Self {
        if d >= 0.0 {
            Self::Left
        } else {
            Self::Right
        }
    }
}

/// Screen-facing name of a wall face, used by dimension rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Face {
    #[default]
    Top,
    Bottom,
    Left,
    Right,
}

impl Face {
    /// Face an outward normal points to. Mostly-horizontal walls have top and
    /// bottom faces, the rest left and right. Screen space has y pointing down.
    #[must_use]
    pub fn from_outward_normal(normal: &Vector2, wall_is_horizontal: bool) -> Self {
        match (wall_is_horizontal, normal.y < 0.0, normal.x < 0.0) {
            (true, true, _) => Self::Top,
            (true, false, _) => Self::Bottom,
            (false, _, true) => Self::Left,
            (false, _, false) => Self::Right,
        }
    }
}

/// Result of placing a fixture against the wall graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub position: Point2,
    /// Radians.
    pub rotation: f64,
    pub wall: Option<WallId>,
    /// Free internal wall length between the wall's inner start and the fixture.
    pub left_segment: f64,
    /// Free internal wall length between the fixture and the wall's inner end.
    pub right_segment: f64,
    pub side: WallSide,
    pub face: Face,
    pub is_magnetized: bool,
}

impl Placement {
    /// A placement that follows the pointer without a wall.
    #[must_use]
    pub fn free(point: Point2) -> Self {
        Self {
            position: point,
            rotation: 0.0,
            wall: None,
            left_segment: 0.0,
            right_segment: 0.0,
            side: WallSide::Left,
            face: Face::Top,
            is_magnetized: false,
        }
    }
}
