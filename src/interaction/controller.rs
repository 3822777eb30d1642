use tracing::{debug, trace};

use crate::error::{OperationError, Result};
use crate::fixtures::{self, Fixture, FixtureKind, FixtureSet};
use crate::math::distance_2d::distance;
use crate::math::{ensure_finite, Point2};
use crate::operations::placement::Placement;
use crate::operations::query::NearestVertex;
use crate::plan::FloorPlan;
use crate::topology::{VertexId, WallEnd, WallId};

use super::snap::{snap_point, Snap};

/// Active editing tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// Drag to draw a wall.
    Wall,
    /// Drag wall ends and middles.
    Select,
    /// Click to drop a fixture of this kind.
    Fixture(FixtureKind),
}

/// Grab point on a wall for the select tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    Start,
    End,
    Middle,
}

/// Pointer gesture in progress.
#[derive(Debug, Clone, PartialEq)]
pub enum DragState {
    Idle,
    DrawingWall { start: Snap, end: Snap },
    DraggingEndpoint { wall: WallId, vertex: Option<VertexId>, end: WallEnd },
    DraggingWall { wall: WallId, group: Vec<WallId> },
}

/// Turns pointer events into plan edits.
///
/// All points are world coordinates; converting from screen space is the
/// host's job. The controller owns the plan and the fixtures so it can keep
/// fixtures anchored across wall edits.
#[derive(Debug, Clone)]
pub struct Controller {
    plan: FloorPlan,
    fixtures: FixtureSet,
    tool: Tool,
    zoom: f64,
    state: DragState,
    preview: Option<Placement>,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(FloorPlan::default())
    }
}

impl Controller {
    /// Creates a controller editing `plan` with the wall tool at zoom 1.
    #[must_use]
    pub fn new(plan: FloorPlan) -> Self {
        Self {
            plan,
            fixtures: FixtureSet::new(),
            tool: Tool::Wall,
            zoom: 1.0,
            state: DragState::Idle,
            preview: None,
        }
    }

    #[must_use]
    pub fn plan(&self) -> &FloorPlan {
        &self.plan
    }

    #[must_use]
    pub fn fixtures(&self) -> &FixtureSet {
        &self.fixtures
    }

    #[must_use]
    pub fn tool(&self) -> Tool {
        self.tool
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    #[must_use]
    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Segment being drawn with the wall tool.
    #[must_use]
    pub fn wall_preview(&self) -> Option<(Point2, Point2)> {
        match &self.state {
            DragState::DrawingWall { start, end } => Some((start.point, end.point)),
            _ => None,
        }
    }

    /// Fixture preview under the pointer.
    #[must_use]
    pub fn fixture_preview(&self) -> Option<&Placement> {
        self.preview.as_ref()
    }

    /// Switches tools, abandoning any gesture in progress.
    ///
    /// # Errors
    ///
    /// Returns an error if finishing an interrupted drag fails.
    pub fn set_tool(&mut self, tool: Tool) -> Result<()> {
        self.cancel()?;
        self.tool = tool;
        Ok(())
    }

    /// Sets the view zoom used to scale the magnet radius.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` unless `zoom` is finite and positive.
    pub fn set_zoom(&mut self, zoom: f64) -> Result<()> {
        if !zoom.is_finite() || zoom <= 0.0 {
            return Err(OperationError::InvalidInput(format!("zoom must be positive, got {zoom}")).into());
        }
        self.zoom = zoom;
        Ok(())
    }

    /// Abandons the current gesture. A wall being drawn is discarded; a drag
    /// in progress keeps its last position and is settled.
    ///
    /// # Errors
    ///
    /// Returns an error if settling the drag fails.
    pub fn cancel(&mut self) -> Result<()> {
        self.preview = None;
        match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Idle | DragState::DrawingWall { .. } => Ok(()),
            drag => self.settle(drag),
        }
    }

    /// Handles a button press.
    ///
    /// # Errors
    ///
    /// Returns an error for a non-finite point.
    pub fn pointer_down(&mut self, point: Point2) -> Result<()> {
        ensure_finite(&point)?;
        match self.tool {
            Tool::Wall => {
                let start = self.snap(point, None);
                self.state = DragState::DrawingWall { start, end: start };
            }
            Tool::Select => {
                if let Some((wall, handle)) = self.handle_at(point) {
                    self.state = match handle {
                        Handle::Start | Handle::End => DragState::DraggingEndpoint {
                            wall,
                            vertex: None,
                            end: if handle == Handle::Start {
                                WallEnd::Start
                            } else {
                                WallEnd::End
                            },
                        },
                        Handle::Middle => DragState::DraggingWall {
                            wall,
                            group: Vec::new(),
                        },
                    };
                    trace!(?wall, ?handle, "grabbed");
                }
            }
            Tool::Fixture(kind) => self.drop_fixture(kind, point),
        }
        Ok(())
    }

    /// Handles pointer motion.
    ///
    /// # Errors
    ///
    /// Returns an error for a non-finite point or a failed edit.
    pub fn pointer_move(&mut self, point: Point2) -> Result<()> {
        ensure_finite(&point)?;
        match &mut self.state {
            DragState::Idle => {
                if let Tool::Fixture(kind) = self.tool {
                    let dimensions = kind.default_dimensions();
                    self.preview = Some(fixtures::preview(
                        self.plan.graph(),
                        kind,
                        &dimensions,
                        point,
                        self.zoom,
                        self.plan.params(),
                    ));
                }
            }
            DragState::DrawingWall { start, end } => {
                let params = self.plan.params();
                *end = snap_point(
                    self.plan.graph(),
                    point,
                    Some(start.point),
                    params.magnet_radius(self.zoom),
                    params,
                );
            }
            DragState::DraggingEndpoint { wall, vertex, end } => {
                let to = snap_endpoint(&self.plan, *wall, *end, point, self.zoom)?;
                *vertex = Some(self.plan.move_endpoint(*wall, *end, to)?);
            }
            DragState::DraggingWall { wall, group } => {
                let moved = self.plan.drag_wall(*wall, point)?;
                if group.is_empty() {
                    *group = moved;
                }
            }
        }
        Ok(())
    }

    /// Handles a button release, committing the gesture.
    ///
    /// # Errors
    ///
    /// Returns an error for a non-finite point or a failed edit.
    pub fn pointer_up(&mut self, point: Point2) -> Result<()> {
        ensure_finite(&point)?;
        match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Idle => Ok(()),
            DragState::DrawingWall { start, .. } => {
                let end = self.snap(point, Some(start.point));
                let length = distance(&start.point, &end.point);
                let params = *self.plan.params();
                if length <= params.min_wall_length {
                    trace!(length, "wall drag too short, ignored");
                    return Ok(());
                }
                self.plan
                    .add_wall(start.point, end.point, params.default_wall_thickness)?;
                self.fixtures.reanchor(self.plan.graph(), &params);
                Ok(())
            }
            DragState::DraggingEndpoint {
                wall,
                vertex: Some(_),
                end,
            } => {
                let to = snap_endpoint(&self.plan, wall, end, point, self.zoom)?;
                let vertex = self.plan.move_endpoint(wall, end, to)?;
                self.settle(DragState::DraggingEndpoint {
                    wall,
                    vertex: Some(vertex),
                    end,
                })
            }
            drag => self.settle(drag),
        }
    }

    /// Wall handle within the magnet radius of `point`, closest first.
    /// Ends win ties with the middle.
    #[must_use]
    pub fn handle_at(&self, point: Point2) -> Option<(WallId, Handle)> {
        let radius = self.plan.params().magnet_radius(self.zoom);
        self.plan
            .walls()
            .iter()
            .flat_map(|w| {
                [
                    (w.id, Handle::Start, distance(&point, &w.start)),
                    (w.id, Handle::End, distance(&point, &w.end)),
                    (w.id, Handle::Middle, distance(&point, &w.midpoint())),
                ]
            })
            .filter(|&(_, _, d)| d <= radius)
            .min_by(|a, b| a.2.total_cmp(&b.2))
            .map(|(id, handle, _)| (id, handle))
    }

    fn snap(&self, point: Point2, anchor: Option<Point2>) -> Snap {
        let params = self.plan.params();
        snap_point(
            self.plan.graph(),
            point,
            anchor,
            params.magnet_radius(self.zoom),
            params,
        )
    }

    fn drop_fixture(&mut self, kind: FixtureKind, point: Point2) {
        let dimensions = kind.default_dimensions();
        let placement = fixtures::preview(
            self.plan.graph(),
            kind,
            &dimensions,
            point,
            self.zoom,
            self.plan.params(),
        );
        let fixture = Fixture {
            kind,
            dimensions,
            placement,
        };
        if let Err(err) = self.fixtures.commit(fixture, self.plan.rooms()) {
            debug!(%err, "fixture not committed");
        }
    }

    fn settle(&mut self, drag: DragState) -> Result<()> {
        match drag {
            DragState::DraggingEndpoint {
                vertex: Some(vertex),
                ..
            } => {
                self.plan.settle_vertex(vertex)?;
            }
            DragState::DraggingWall { group, .. } if !group.is_empty() => {
                self.plan.settle_walls(&group)?;
            }
            _ => return Ok(()),
        }
        self.fixtures.reanchor(self.plan.graph(), self.plan.params());
        Ok(())
    }
}

/// Pointer position for a dragged wall end: the nearest other vertex within
/// the magnet radius, else the raw pointer.
fn snap_endpoint(
    plan: &FloorPlan,
    wall: WallId,
    end: WallEnd,
    point: Point2,
    zoom: f64,
) -> Result<Point2> {
    let dragged = plan.graph().wall(wall)?.vertex(end);
    let radius = plan.params().magnet_radius(zoom);
    let target = NearestVertex::new(point, radius)
        .excluding(dragged)
        .execute(plan.graph())
        .and_then(|(v, _)| plan.graph().point(v).ok());
    Ok(target.unwrap_or(point))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn drag(ctl: &mut Controller, from: Point2, to: Point2) {
        ctl.pointer_down(from).unwrap();
        ctl.pointer_move(to).unwrap();
        ctl.pointer_up(to).unwrap();
    }

    fn draw_box(ctl: &mut Controller) {
        drag(ctl, p(0.0, 0.0), p(400.0, 0.0));
        drag(ctl, p(400.0, 0.0), p(400.0, 300.0));
        drag(ctl, p(400.0, 300.0), p(0.0, 300.0));
        drag(ctl, p(0.0, 300.0), p(0.0, 0.0));
    }

    #[test]
    fn drawing_four_walls_makes_a_room() {
        let mut ctl = Controller::default();
        draw_box(&mut ctl);
        assert_eq!(ctl.plan().graph().wall_count(), 4);
        assert_eq!(ctl.plan().graph().vertex_count(), 4);
        assert_eq!(ctl.plan().rooms().len(), 1);
    }

    #[test]
    fn sloppy_pointer_snaps_to_corners() {
        let mut ctl = Controller::default();
        drag(&mut ctl, p(0.0, 0.0), p(400.0, 3.0));
        drag(&mut ctl, p(404.0, -2.0), p(398.0, 300.0));
        let walls = ctl.plan().walls();
        assert_eq!(ctl.plan().graph().vertex_count(), 3);
        assert!(walls
            .iter()
            .all(|w| (w.start.x - w.end.x).abs() < 1e-9 || (w.start.y - w.end.y).abs() < 1e-9));
    }

    #[test]
    fn short_drag_is_ignored() {
        let mut ctl = Controller::default();
        drag(&mut ctl, p(0.0, 0.0), p(3.0, 0.0));
        assert!(ctl.plan().graph().is_empty());
        assert_eq!(ctl.state(), &DragState::Idle);
    }

    #[test]
    fn middle_handle_drags_wall_and_settles() {
        let mut ctl = Controller::default();
        drag(&mut ctl, p(0.0, 0.0), p(0.0, 200.0));
        drag(&mut ctl, p(100.0, 50.0), p(300.0, 50.0));

        ctl.set_tool(Tool::Select).unwrap();
        ctl.pointer_down(p(2.0, 100.0)).unwrap();
        assert!(matches!(ctl.state(), DragState::DraggingWall { .. }));
        ctl.pointer_move(p(80.0, 100.0)).unwrap();
        ctl.pointer_move(p(150.0, 120.0)).unwrap();
        assert_eq!(ctl.plan().graph().wall_count(), 2);
        ctl.pointer_up(p(150.0, 120.0)).unwrap();
        assert_eq!(ctl.plan().graph().wall_count(), 4);
    }

    #[test]
    fn endpoint_drag_closes_room() {
        let mut ctl = Controller::default();
        drag(&mut ctl, p(0.0, 0.0), p(400.0, 0.0));
        drag(&mut ctl, p(400.0, 0.0), p(400.0, 300.0));
        drag(&mut ctl, p(400.0, 300.0), p(0.0, 300.0));
        drag(&mut ctl, p(0.0, 300.0), p(0.0, 100.0));
        assert!(ctl.plan().rooms().is_empty());

        ctl.set_tool(Tool::Select).unwrap();
        ctl.pointer_down(p(0.0, 101.0)).unwrap();
        ctl.pointer_move(p(0.0, 50.0)).unwrap();
        ctl.pointer_move(p(0.4, 0.3)).unwrap();
        ctl.pointer_up(p(0.4, 0.3)).unwrap();
        assert_eq!(ctl.plan().graph().vertex_count(), 4);
        assert_eq!(ctl.plan().rooms().len(), 1);
    }

    #[test]
    fn endpoint_dropped_near_corner_welds() {
        let mut ctl = Controller::default();
        drag(&mut ctl, p(0.0, 0.0), p(300.0, 0.0));
        drag(&mut ctl, p(300.0, 0.0), p(300.0, 300.0));
        drag(&mut ctl, p(300.0, 300.0), p(0.0, 300.0));
        drag(&mut ctl, p(0.0, 300.0), p(0.0, 100.0));
        assert_eq!(ctl.plan().graph().vertex_count(), 5);

        ctl.set_tool(Tool::Select).unwrap();
        drag(&mut ctl, p(0.0, 100.0), p(3.0, 4.0));
        assert_eq!(ctl.state(), &DragState::Idle);
        assert_eq!(ctl.plan().graph().vertex_count(), 4);
        assert_eq!(ctl.plan().rooms().len(), 1);
        assert!(ctl.plan().vertex_near(p(0.0, 0.0), 1e-9).is_some());
    }

    #[test]
    fn fixture_tool_previews_and_commits() {
        let mut ctl = Controller::default();
        draw_box(&mut ctl);
        ctl.set_tool(Tool::Fixture(FixtureKind::Socket)).unwrap();

        ctl.pointer_move(p(200.0, 8.0)).unwrap();
        assert!(ctl.fixture_preview().unwrap().is_magnetized);
        ctl.pointer_down(p(200.0, 8.0)).unwrap();
        ctl.pointer_down(p(200.0, 150.0)).unwrap();
        assert_eq!(ctl.fixtures().len(), 1);

        ctl.set_tool(Tool::Fixture(FixtureKind::CeilingLight)).unwrap();
        ctl.pointer_down(p(200.0, 150.0)).unwrap();
        assert_eq!(ctl.fixtures().len(), 2);
    }

    #[test]
    fn zoom_must_be_positive() {
        let mut ctl = Controller::default();
        assert!(ctl.set_zoom(0.0).is_err());
        assert!(ctl.set_zoom(f64::NAN).is_err());
        ctl.set_zoom(2.5).unwrap();
        assert!((ctl.zoom() - 2.5).abs() < f64::EPSILON);
    }
}
