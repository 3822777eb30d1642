use crate::math::Point2;

slotmap::new_key_type! {
    /// Key of a corner in the wall graph.
    pub struct VertexId;
}

/// A wall corner. Walls ending here hold its id, so moving the corner
/// drags every one of them along.
#[derive(Debug, Clone)]
pub struct VertexData {
    /// World position (centimetres).
    pub point: Point2,
}

impl VertexData {
    /// Corner at `point`.
    #[must_use]
    pub fn new(point: Point2) -> Self {
        Self { point }
    }
}
