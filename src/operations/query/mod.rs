mod connected;
mod intersections;
mod nearest;

pub use connected::{FindConnected, TransitivelyConnected};
pub use intersections::{WallCrossing, WallIntersections};
pub use nearest::{NearestVertex, NearestWall, WallsNear};
