pub mod edit;
pub mod placement;
pub mod query;
pub mod rooms;
