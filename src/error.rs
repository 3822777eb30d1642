use thiserror::Error;

use crate::topology::{VertexId, WallId};

/// Top-level error type for the floor-plan core.
#[derive(Debug, Error)]
pub enum FloorplanError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Serialization(#[from] SerializationError),

    #[error(transparent)]
    Tessellation(#[from] TessellationError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("non-finite coordinate ({x}, {y})")]
    NonFinite { x: f64, y: f64 },
}

/// Errors related to the wall graph arena.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("vertex not found: {0:?}")]
    VertexNotFound(VertexId),

    #[error("wall not found: {0:?}")]
    WallNotFound(WallId),

    #[error("invalid topology: {0}")]
    InvalidTopology(String),
}

/// Errors related to editing operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("wall too short: length {length} must exceed {min}")]
    WallTooShort { length: f64, min: f64 },
}

/// Errors related to plan records.
#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid record {id}: {reason}")]
    InvalidRecord { id: u64, reason: String },
}

/// Errors related to floor meshing.
#[derive(Debug, Error)]
pub enum TessellationError {
    #[error("tessellation failed: {0}")]
    Failed(String),
}

/// Convenience type alias for results using [`FloorplanError`].
pub type Result<T> = std::result::Result<T, FloorplanError>;
