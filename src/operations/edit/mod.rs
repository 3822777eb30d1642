mod add_wall;
mod merge;
mod move_endpoint;
mod move_wall;
mod remove;
mod split;
mod weld;

pub use add_wall::AddWall;
pub use merge::MergeCollinear;
pub use move_endpoint::MoveEndpoint;
pub use move_wall::MoveWall;
pub use remove::RemoveWall;
pub use split::{SplitCrossings, SplitOutcome, SplitWall};
pub use weld::{PruneDegenerate, WeldCoincident, WeldVertices};
