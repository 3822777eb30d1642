//! Flat plan records for the persistence layer.
//!
//! Records carry millimetres; the core works in centimetres. The ×10
//! boundary is crossed here and nowhere else. Walls in a record list only
//! share corners by equal coordinates, so decoding welds coincident
//! endpoints into shared vertices.

use serde::{Deserialize, Serialize};
use slotmap::Key;
use tracing::debug;

use crate::error::{Result, SerializationError};
use crate::math::polygon_2d::polygon_area;
use crate::math::units::{from_store, to_store};
use crate::math::Point2;
use crate::operations::edit::WeldCoincident;
use crate::operations::rooms::{Room, RoomId};
use crate::params::PlanParams;
use crate::topology::{Wall, WallData, WallGraph};

/// A point in store units (millimetres).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StoredPoint {
    pub x: f64,
    pub y: f64,
}

impl StoredPoint {
    /// Converts a world point to store units.
    #[must_use]
    pub fn from_world(p: &Point2) -> Self {
        Self {
            x: to_store(p.x),
            y: to_store(p.y),
        }
    }

    /// Converts back to a world point.
    #[must_use]
    pub fn to_world(self) -> Point2 {
        Point2::new(from_store(self.x), from_store(self.y))
    }
}

/// One persisted plan entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlanRecord {
    Wall {
        id: u64,
        start: StoredPoint,
        end: StoredPoint,
        thickness: f64,
    },
    #[serde(rename_all = "camelCase")]
    Room {
        id: u64,
        path: Vec<StoredPoint>,
        /// Square metres.
        area: f64,
        label_position: StoredPoint,
    },
}

impl PlanRecord {
    /// Record for a resolved wall.
    #[must_use]
    pub fn from_wall(wall: &Wall) -> Self {
        Self::Wall {
            id: wall.id.data().as_ffi(),
            start: StoredPoint::from_world(&wall.start),
            end: StoredPoint::from_world(&wall.end),
            thickness: to_store(wall.thickness),
        }
    }

    /// Record for a room.
    #[must_use]
    pub fn from_room(room: &Room) -> Self {
        Self::Room {
            id: room.id.0,
            path: room.path.iter().map(StoredPoint::from_world).collect(),
            area: room.area,
            label_position: StoredPoint::from_world(&room.label_position),
        }
    }
}

/// Flattens walls and rooms into records, walls first.
#[must_use]
pub fn encode(graph: &WallGraph, rooms: &[Room]) -> Vec<PlanRecord> {
    graph
        .resolved_walls()
        .iter()
        .map(PlanRecord::from_wall)
        .chain(rooms.iter().map(PlanRecord::from_room))
        .collect()
}

/// Rebuilds a wall graph and the stored rooms from records.
///
/// Stored rooms are returned as they were saved; callers pass them to the
/// room detector as the previous list so ids and labels carry over.
///
/// # Errors
///
/// Returns `SerializationError::InvalidRecord` for non-finite coordinates,
/// non-positive thickness, or a room path with fewer than three points.
pub fn decode(records: &[PlanRecord], params: &PlanParams) -> Result<(WallGraph, Vec<Room>)> {
    let mut graph = WallGraph::new();
    let mut rooms = Vec::new();

    for record in records {
        match record {
            PlanRecord::Wall {
                id,
                start,
                end,
                thickness,
            } => {
                let (s, e) = (start.to_world(), end.to_world());
                let finite = [s.x, s.y, e.x, e.y, *thickness].iter().all(|v| v.is_finite());
                if !finite || *thickness <= 0.0 {
                    return Err(invalid(*id, "wall needs finite coordinates and positive thickness"));
                }
                let a = graph.add_vertex(s);
                let b = graph.add_vertex(e);
                graph.insert_wall(WallData::new(a, b, from_store(*thickness)))?;
            }
            PlanRecord::Room {
                id,
                path,
                area,
                label_position,
            } => {
                if path.len() < 3 {
                    return Err(invalid(*id, "room path needs at least three points"));
                }
                let path: Vec<Point2> = path.iter().map(|p| p.to_world()).collect();
                rooms.push(Room {
                    id: RoomId(*id),
                    centerline_area: polygon_area(&path),
                    path,
                    area: *area,
                    label_position: label_position.to_world(),
                });
            }
        }
    }

    let welded = WeldCoincident::new(params.vertex_tolerance).execute(&mut graph)?;
    debug!(
        walls = graph.wall_count(),
        rooms = rooms.len(),
        welded,
        "decoded plan records"
    );
    Ok((graph, rooms))
}

/// Serializes records to a JSON array.
///
/// # Errors
///
/// Returns `SerializationError::Json` if encoding fails.
pub fn to_json(records: &[PlanRecord]) -> Result<String> {
    serde_json::to_string_pretty(records).map_err(|e| SerializationError::Json(e).into())
}

/// Parses records from a JSON array.
///
/// # Errors
///
/// Returns `SerializationError::Json` on malformed input.
pub fn from_json(json: &str) -> Result<Vec<PlanRecord>> {
    serde_json::from_str(json).map_err(|e| SerializationError::Json(e).into())
}

fn invalid(id: u64, reason: &str) -> crate::error::FloorplanError {
    SerializationError::InvalidRecord {
        id,
        reason: reason.into(),
    }
    .into()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sp(x: f64, y: f64) -> StoredPoint {
        StoredPoint { x, y }
    }

    #[test]
    fn thickness_round_trips_without_drift() {
        let records = vec![PlanRecord::Wall {
            id: 7,
            start: sp(0.0, 0.0),
            end: sp(3000.0, 0.0),
            thickness: 200.0,
        }];
        let mut current = records;
        for _ in 0..5 {
            let (graph, rooms) = decode(&current, &PlanParams::default()).unwrap();
            let wall = &graph.resolved_walls()[0];
            assert_relative_eq!(wall.thickness, 20.0);
            current = encode(&graph, &rooms);
        }
        let PlanRecord::Wall { thickness, end, .. } = &current[0] else {
            panic!("expected a wall record");
        };
        assert_relative_eq!(*thickness, 200.0);
        assert_relative_eq!(end.x, 3000.0);
    }

    #[test]
    fn coincident_endpoints_are_welded() {
        let records = vec![
            PlanRecord::Wall {
                id: 1,
                start: sp(0.0, 0.0),
                end: sp(2000.0, 0.0),
                thickness: 100.0,
            },
            PlanRecord::Wall {
                id: 2,
                start: sp(2000.0, 0.0),
                end: sp(2000.0, 2000.0),
                thickness: 100.0,
            },
        ];
        let (graph, _) = decode(&records, &PlanParams::default()).unwrap();
        assert_eq!(graph.wall_count(), 2);
        assert_eq!(graph.vertex_count(), 3);
    }

    #[test]
    fn json_uses_tagged_camel_case() {
        let records = vec![PlanRecord::Room {
            id: 3,
            path: vec![sp(0.0, 0.0), sp(10.0, 0.0), sp(10.0, 10.0)],
            area: 1.5,
            label_position: sp(5.0, 5.0),
        }];
        let json = to_json(&records).unwrap();
        assert!(json.contains(r#""type": "room""#));
        assert!(json.contains("labelPosition"));
        assert_eq!(from_json(&json).unwrap(), records);
    }

    #[test]
    fn bad_records_are_rejected() {
        let wall = vec![PlanRecord::Wall {
            id: 9,
            start: sp(f64::NAN, 0.0),
            end: sp(10.0, 0.0),
            thickness: 100.0,
        }];
        assert!(decode(&wall, &PlanParams::default()).is_err());

        let room = vec![PlanRecord::Room {
            id: 4,
            path: vec![sp(0.0, 0.0), sp(1.0, 0.0)],
            area: 0.0,
            label_position: sp(0.0, 0.0),
        }];
        assert!(decode(&room, &PlanParams::default()).is_err());
        assert!(from_json("[{\"type\":\"door\"}]").is_err());
    }
}
