//! Fixtures placed against the plan: wall-mounted electrics, openings and
//! ceiling lights.
//!
//! A fixture owns its placement; the wall graph never references fixtures
//! back. After a wall edit, [`FixtureSet::retain_on_walls`] drops fixtures
//! whose wall is gone.

use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};
use tracing::debug;

use crate::error::{OperationError, Result};
use crate::math::Point2;
use crate::operations::placement::{Magnetize, Mount, Placement};
use crate::operations::rooms::Room;
use crate::params::PlanParams;
use crate::topology::WallGraph;

new_key_type! {
    /// Unique identifier for a committed fixture.
    pub struct FixtureId;
}

/// Kind of fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FixtureKind {
    Socket,
    Switch,
    WallLight,
    CeilingLight,
    Door,
    Window,
    Panel,
}

impl FixtureKind {
    /// How this kind attaches to the building.
    #[must_use]
    pub fn mount(self) -> Mount {
        match self {
            Self::Socket | Self::Switch | Self::WallLight | Self::Panel => Mount::Surface,
            Self::Door | Self::Window => Mount::Opening,
            Self::CeilingLight => Mount::Ceiling,
        }
    }

    /// Catalogue dimensions in centimetres.
    #[must_use]
    pub fn default_dimensions(self) -> FixtureDimensions {
        let (length, width, height, floor_height) = match self {
            Self::Socket => (8.0, 4.0, 8.0, 30.0),
            Self::Switch => (8.0, 4.0, 8.0, 110.0),
            Self::WallLight => (20.0, 10.0, 15.0, 200.0),
            Self::CeilingLight => (30.0, 30.0, 10.0, 250.0),
            Self::Door => (90.0, 90.0, 210.0, 0.0),
            Self::Window => (120.0, 10.0, 120.0, 90.0),
            Self::Panel => (40.0, 12.0, 60.0, 150.0),
        };
        FixtureDimensions {
            length,
            width,
            height,
            floor_height,
        }
    }
}

/// Fixture size. `length` runs along the wall, `width` out of it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureDimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub floor_height: f64,
}

/// A committed fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    pub kind: FixtureKind,
    pub dimensions: FixtureDimensions,
    pub placement: Placement,
}

/// Computes the live preview of a fixture under the pointer.
#[must_use]
pub fn preview(
    graph: &WallGraph,
    kind: FixtureKind,
    dimensions: &FixtureDimensions,
    point: Point2,
    zoom: f64,
    params: &PlanParams,
) -> Placement {
    Magnetize::new(point, dimensions.length)
        .with_depth(dimensions.width)
        .with_mount(kind.mount())
        .with_zoom(zoom)
        .with_params(*params)
        .execute(graph)
}

/// Committed fixtures, keyed by [`FixtureId`].
#[derive(Debug, Default, Clone)]
pub struct FixtureSet {
    fixtures: SlotMap<FixtureId, Fixture>,
}

impl FixtureSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Commits a fixture.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` when a wall fixture is not
    /// magnetized to a wall, or a ceiling fixture lies outside every room.
    pub fn commit(&mut self, fixture: Fixture, rooms: &[Room]) -> Result<FixtureId> {
        match fixture.kind.mount() {
            Mount::Surface | Mount::Opening => {
                if !fixture.placement.is_magnetized || fixture.placement.wall.is_none() {
                    return Err(OperationError::InvalidInput(format!(
                        "{:?} must be placed against a wall",
                        fixture.kind
                    ))
                    .into());
                }
            }
            Mount::Ceiling => {
                if !rooms.iter().any(|r| r.contains(&fixture.placement.position)) {
                    return Err(OperationError::InvalidInput(format!(
                        "{:?} must be placed inside a room",
                        fixture.kind
                    ))
                    .into());
                }
            }
        }
        let id = self.fixtures.insert(fixture);
        debug!(?id, "fixture committed");
        Ok(id)
    }

    /// Removes a fixture.
    pub fn remove(&mut self, id: FixtureId) -> Option<Fixture> {
        self.fixtures.remove(id)
    }

    /// Looks up a fixture.
    #[must_use]
    pub fn get(&self, id: FixtureId) -> Option<&Fixture> {
        self.fixtures.get(id)
    }

    /// Iterates over committed fixtures.
    pub fn iter(&self) -> impl Iterator<Item = (FixtureId, &Fixture)> {
        self.fixtures.iter()
    }

    /// Number of committed fixtures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    /// Returns true when nothing is committed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }

    /// Re-snaps fixtures whose wall was split or removed onto whatever wall
    /// now lies under them, then drops the ones left without a wall.
    /// Openings keep their side. Returns the dropped ids.
    pub fn reanchor(&mut self, graph: &WallGraph, params: &PlanParams) -> Vec<FixtureId> {
        for fixture in self.fixtures.values_mut() {
            let orphaned = fixture
                .placement
                .wall
                .is_some_and(|w| !graph.contains_wall(w));
            if !orphaned {
                continue;
            }
            let mount = fixture.kind.mount();
            let mut op = Magnetize::new(fixture.placement.position, fixture.dimensions.length)
                .with_depth(fixture.dimensions.width)
                .with_mount(mount)
                .with_params(*params);
            if mount == Mount::Opening {
                op = op.with_side(fixture.placement.side);
            }
            let placement = op.execute(graph);
            if placement.is_magnetized {
                fixture.placement = placement;
            }
        }
        self.retain_on_walls(graph)
    }

    /// Drops fixtures anchored to walls that no longer exist. Returns the
    /// removed ids.
    pub fn retain_on_walls(&mut self, graph: &WallGraph) -> Vec<FixtureId> {
        let stale: Vec<FixtureId> = self
            .fixtures
            .iter()
            .filter(|(_, f)| f.placement.wall.is_some_and(|w| !graph.contains_wall(w)))
            .map(|(id, _)| id)
            .collect();
        for id in &stale {
            self.fixtures.remove(*id);
        }
        if !stale.is_empty() {
            debug!(removed = stale.len(), "dropped fixtures on removed walls");
        }
        stale
    }
}
