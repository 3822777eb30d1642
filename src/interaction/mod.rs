//! Pointer-driven editing on top of [`crate::plan::FloorPlan`].

mod controller;
pub mod snap;

pub use controller::{Controller, DragState, Handle, Tool};
pub use snap::{snap_point, Snap, SnapTarget};
