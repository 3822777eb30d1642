use std::collections::{HashMap, HashSet, VecDeque};

use spade::handles::{FixedFaceHandle, InnerTag};
use spade::{
    ConstrainedDelaunayTriangulation, InsertionError, Point2 as SpadePoint2, Triangulation,
};
use tracing::trace;

use crate::error::{Result, TessellationError};
use crate::math::polygon_2d::{inset_polygon, signed_area};
use crate::math::{points_coincide, Point2, TOLERANCE};
use crate::operations::rooms::Room;

use super::FloorMesh;

type Cdt = ConstrainedDelaunayTriangulation<SpadePoint2<f64>>;

/// Triangulates a room outline into a floor mesh.
pub struct TessellateRoom {
    path: Vec<Point2>,
    inset: f64,
}

impl TessellateRoom {
    /// Creates a new `TessellateRoom` for the room's centreline outline.
    #[must_use]
    pub fn new(room: &Room) -> Self {
        Self::from_path(room.path.clone())
    }

    /// Creates a new `TessellateRoom` for an arbitrary closed outline.
    #[must_use]
    pub fn from_path(path: Vec<Point2>) -> Self {
        Self { path, inset: 0.0 }
    }

    /// Shrinks the outline by `inset` before meshing, e.g. half a wall
    /// thickness to fill only the clear floor.
    #[must_use]
    pub fn with_inset(mut self, inset: f64) -> Self {
        self.inset = inset;
        self
    }

    /// Executes the tessellation.
    ///
    /// # Errors
    ///
    /// Returns `TessellationError::Failed` for outlines with fewer than three
    /// points, no area, or coordinates the triangulation rejects.
    #[allow(clippy::cast_possible_truncation)]
    pub fn execute(&self) -> Result<FloorMesh> {
        let outline = if self.inset > 0.0 {
            inset_polygon(&self.path, self.inset)
                .ok_or_else(|| TessellationError::Failed("outline cannot be inset".into()))?
        } else {
            self.path.clone()
        };
        if signed_area(&outline).abs() < f64::EPSILON {
            return Err(TessellationError::Failed("outline has no area".into()).into());
        }

        let mut cdt = Cdt::new();
        insert_outline(&mut cdt, &outline, TOLERANCE)?;
        let interior = classify_interior_faces(&cdt);

        let mut mesh = FloorMesh::default();
        let mut vertex_map: HashMap<usize, u32> = HashMap::new();
        for face in cdt.inner_faces() {
            if !interior.contains(&face.fix().index()) {
                continue;
            }
            let mut tri = [0u32; 3];
            for (slot, vh) in face.vertices().iter().enumerate() {
                let idx = vh.fix().index();
                tri[slot] = *vertex_map.entry(idx).or_insert_with(|| {
                    let pos = vh.position();
                    mesh.vertices.push(Point2::new(pos.x, pos.y));
                    (mesh.vertices.len() - 1) as u32
                });
            }
            mesh.indices.push(tri);
        }
        trace!(
            vertices = mesh.vertices.len(),
            triangles = mesh.indices.len(),
            "room tessellated"
        );
        Ok(mesh)
    }
}

/// Inserts the outline corners and chains them with constraint edges.
/// Corners closer than `tol` to the last kept one are dropped, so a room
/// path that repeats a vertex still yields a clean loop.
fn insert_outline(cdt: &mut Cdt, outline: &[Point2], tol: f64) -> Result<()> {
    let mut corners: Vec<Point2> = Vec::with_capacity(outline.len());
    for p in outline {
        if corners.last().is_some_and(|last| points_coincide(last, p, tol)) {
            continue;
        }
        corners.push(*p);
    }
    while corners.len() > 1 && points_coincide(&corners[0], &corners[corners.len() - 1], tol) {
        corners.pop();
    }
    if corners.len() < 3 {
        return Err(TessellationError::Failed(format!(
            "outline has {} distinct corners",
            corners.len()
        ))
        .into());
    }

    let handles = corners
        .iter()
        .map(|p| {
            cdt.insert(SpadePoint2::new(p.x, p.y))
                .map_err(|e: InsertionError| TessellationError::Failed(format!("CDT insert: {e}")))
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;
    for (from, to) in handles.iter().zip(handles.iter().cycle().skip(1)) {
        if from != to {
            cdt.add_constraint(*from, *to);
        }
    }
    Ok(())
}

/// Flood-fills from the outer face; crossing a constraint edge toggles
/// inside/outside. Returns the indices of inner faces at odd depth.
fn classify_interior_faces(cdt: &Cdt) -> HashSet<usize> {
    let mut interior = HashSet::new();
    let mut depth_map: HashMap<usize, u32> = HashMap::new();
    let mut queue: VecDeque<(FixedFaceHandle<InnerTag>, u32)> = VecDeque::new();

    let mut visit = |idx: usize,
                     fix: FixedFaceHandle<InnerTag>,
                     depth: u32,
                     queue: &mut VecDeque<(FixedFaceHandle<InnerTag>, u32)>| {
        if depth_map.contains_key(&idx) {
            return;
        }
        depth_map.insert(idx, depth);
        if depth % 2 == 1 {
            interior.insert(idx);
        }
        queue.push_back((fix, depth));
    };

    let outer = cdt.outer_face().fix();
    for edge in cdt.directed_edges() {
        if edge.face().fix() != outer {
            continue;
        }
        if let Some(inner) = edge.rev().face().as_inner() {
            let depth = u32::from(cdt.is_constraint_edge(edge.as_undirected().fix()));
            visit(inner.fix().index(), inner.fix(), depth, &mut queue);
        }
    }

    while let Some((face_fix, depth)) = queue.pop_front() {
        for edge in cdt.face(face_fix).adjacent_edges() {
            if let Some(neighbour) = edge.rev().face().as_inner() {
                let step = u32::from(cdt.is_constraint_edge(edge.as_undirected().fix()));
                visit(neighbour.fix().index(), neighbour.fix(), depth + step, &mut queue);
            }
        }
    }

    interior
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn rectangle_gives_two_triangles() {
        let mesh = TessellateRoom::from_path(vec![
            p(0.0, 0.0),
            p(400.0, 0.0),
            p(400.0, 300.0),
            p(0.0, 300.0),
        ])
        .execute()
        .unwrap();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices.len(), 2);
        assert_relative_eq!(mesh.area(), 120_000.0, epsilon = 1e-6);
    }

    #[test]
    fn repeated_corners_are_skipped() {
        let mesh = TessellateRoom::from_path(vec![
            p(0.0, 0.0),
            p(400.0, 0.0),
            p(400.0, 0.0),
            p(400.0, 300.0),
            p(0.0, 300.0),
            p(0.0, 0.0),
        ])
        .execute()
        .unwrap();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices.len(), 2);
    }

    #[test]
    fn concave_room_excludes_notch() {
        // L shape: 300x300 minus the 150x150 top-right quarter.
        let mesh = TessellateRoom::from_path(vec![
            p(0.0, 0.0),
            p(300.0, 0.0),
            p(300.0, 150.0),
            p(150.0, 150.0),
            p(150.0, 300.0),
            p(0.0, 300.0),
        ])
        .execute()
        .unwrap();
        assert_eq!(mesh.indices.len(), 4);
        assert_relative_eq!(mesh.area(), 90_000.0 - 22_500.0, epsilon = 1e-6);
    }

    #[test]
    fn inset_meshes_clear_floor() {
        let mesh = TessellateRoom::from_path(vec![
            p(0.0, 0.0),
            p(310.0, 0.0),
            p(310.0, 410.0),
            p(0.0, 410.0),
        ])
        .with_inset(5.0)
        .execute()
        .unwrap();
        assert_relative_eq!(mesh.area(), 120_000.0, epsilon = 1e-6);
    }

    #[test]
    fn degenerate_outline_fails() {
        let line = TessellateRoom::from_path(vec![p(0.0, 0.0), p(10.0, 0.0), p(20.0, 0.0)]);
        assert!(line.execute().is_err());
        assert!(TessellateRoom::from_path(vec![p(0.0, 0.0), p(1.0, 1.0)])
            .execute()
            .is_err());
    }
}
