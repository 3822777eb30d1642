pub mod error;
pub mod fixtures;
pub mod interaction;
pub mod math;
pub mod operations;
pub mod params;
pub mod plan;
pub mod serialization;
pub mod tessellation;
pub mod topology;

pub use error::{FloorplanError, Result};
pub use params::PlanParams;
pub use plan::FloorPlan;
