//! Sketch session state machine
//!
//! Turns a stream of ground-plane points into finished sketches. The session
//! owns the sketch-mode flag, the current tool and the single draft; nothing
//! half-drawn ever leaves it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Sketch, SketchTool};
use crate::geometry::Point2D;

/// Default grid spacing used to snap incoming points
pub const DEFAULT_GRID_SPACING: f32 = 1.0;

/// Default distance to the first polygon vertex that closes the polygon
pub const DEFAULT_CLOSE_THRESHOLD: f32 = 1.5;

/// Tunables for the sketch session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchSettings {
    /// Grid spacing every incoming point is snapped to
    pub grid_spacing: f32,
    /// A polygon click closer than this to the first vertex closes the polygon
    pub close_threshold: f32,
}

impl Default for SketchSettings {
    fn default() -> Self {
        Self {
            grid_spacing: DEFAULT_GRID_SPACING,
            close_threshold: DEFAULT_CLOSE_THRESHOLD,
        }
    }
}

/// Role of a vertex marker in the polygon preview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerRole {
    First,
    Last,
    Interior,
}

/// A vertex marker in the polygon preview
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolygonMarker {
    pub point: Point2D,
    pub role: MarkerRole,
}

/// Preview data for the sketch being drawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SketchPreview {
    Rectangle {
        start: Point2D,
        current: Point2D,
    },
    Circle {
        center: Point2D,
        radius: f32,
    },
    Polygon {
        /// Accumulated vertices followed by the cursor position
        path: Vec<Point2D>,
        markers: Vec<PolygonMarker>,
    },
}

/// What the caller should do after feeding an event to the session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutput {
    /// Nothing changed
    Idle,
    /// The draft changed; redraw the preview
    Preview(SketchPreview),
    /// The draft was discarded; remove the preview
    ClearPreview,
    /// A sketch was completed and the draft cleared
    Finished(Sketch),
}

/// The single in-progress sketch
#[derive(Debug, Clone, PartialEq)]
enum Draft {
    /// Rectangle or circle awaiting its second point
    Drag {
        tool: SketchTool,
        start: Point2D,
        current: Point2D,
    },
    /// Polygon vertices in click order
    Polygon { points: Vec<Point2D> },
}

/// Interactive sketch state
#[derive(Debug, Clone, Default)]
pub struct SketchSession {
    active: bool,
    tool: SketchTool,
    draft: Option<Draft>,
    settings: SketchSettings,
}

impl SketchSession {
    /// Create a session with the given settings
    pub fn new(settings: SketchSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    /// Whether sketch mode is on
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether a draft is in progress
    pub fn is_drafting(&self) -> bool {
        self.draft.is_some()
    }

    /// Currently selected tool
    pub fn tool(&self) -> SketchTool {
        self.tool
    }

    /// Session settings
    pub fn settings(&self) -> &SketchSettings {
        &self.settings
    }

    /// Replace the settings (discards any draft)
    pub fn set_settings(&mut self, settings: SketchSettings) -> SessionOutput {
        self.settings = settings;
        self.cancel()
    }

    /// Vertices placed so far for a polygon draft
    pub fn polygon_points(&self) -> &[Point2D] {
        match &self.draft {
            Some(Draft::Polygon { points }) => points,
            _ => &[],
        }
    }

    /// Flip sketch mode on or off
    pub fn toggle_mode(&mut self) -> SessionOutput {
        let active = !self.active;
        self.set_active(active)
    }

    /// Enter or leave sketch mode; either way the draft is discarded
    pub fn set_active(&mut self, active: bool) -> SessionOutput {
        self.active = active;
        debug!("Sketch mode {}", if active { "on" } else { "off" });
        self.cancel()
    }

    /// Switch tool, discarding the draft
    pub fn set_tool(&mut self, tool: SketchTool) -> SessionOutput {
        self.tool = tool;
        self.cancel()
    }

    /// Discard the draft without producing a sketch
    pub fn cancel(&mut self) -> SessionOutput {
        match self.draft.take() {
            Some(_) => {
                debug!("Discarded {} draft", self.tool.name());
                SessionOutput::ClearPreview
            }
            None => SessionOutput::Idle,
        }
    }

    fn snap(&self, point: Point2D) -> Point2D {
        point.snap(self.settings.grid_spacing)
    }

    /// Handle a click on the ground plane
    pub fn click(&mut self, point: Point2D) -> SessionOutput {
        if !self.active {
            return SessionOutput::Idle;
        }
        let point = self.snap(point);

        match self.draft.take() {
            None => {
                let draft = match self.tool {
                    SketchTool::Polygon => Draft::Polygon {
                        points: vec![point],
                    },
                    tool => Draft::Drag {
                        tool,
                        start: point,
                        current: point,
                    },
                };
                debug!("Started {} at ({}, {})", self.tool.name(), point.x, point.z);
                self.draft = Some(draft);
                self.preview(point)
            }
            Some(Draft::Drag { tool, start, .. }) => SessionOutput::Finished(finish_drag(tool, start, point)),
            Some(Draft::Polygon { mut points }) => {
                let first = points[0];
                if points.len() >= 3 && point.distance(first) < self.settings.close_threshold {
                    debug!("Closing polygon with {} points", points.len());
                    match Sketch::polygon(points) {
                        Ok(sketch) => SessionOutput::Finished(sketch),
                        Err(_) => SessionOutput::ClearPreview,
                    }
                } else {
                    points.push(point);
                    self.draft = Some(Draft::Polygon { points });
                    self.preview(point)
                }
            }
        }
    }

    /// Handle pointer motion over the ground plane
    pub fn pointer_move(&mut self, point: Point2D) -> SessionOutput {
        if !self.active {
            return SessionOutput::Idle;
        }
        let point = self.snap(point);

        match &mut self.draft {
            Some(Draft::Drag { current, .. }) => {
                *current = point;
                self.preview(point)
            }
            Some(Draft::Polygon { .. }) => self.preview(point),
            None => SessionOutput::Idle,
        }
    }

    /// Handle a pointer release over the ground plane
    ///
    /// Ends a drag gesture. A release where the drag started is the tail of a
    /// plain click, so the draft stays open for a second click.
    pub fn release(&mut self, point: Point2D) -> SessionOutput {
        if !self.active {
            return SessionOutput::Idle;
        }
        let point = self.snap(point);

        match self.draft {
            Some(Draft::Drag { tool, start, .. }) if point != start => {
                self.draft = None;
                SessionOutput::Finished(finish_drag(tool, start, point))
            }
            _ => SessionOutput::Idle,
        }
    }

    /// Preview of the current draft with the cursor at `cursor`
    fn preview(&self, cursor: Point2D) -> SessionOutput {
        let preview = match &self.draft {
            Some(Draft::Drag {
                tool: SketchTool::Circle,
                start,
                current,
            }) => SketchPreview::Circle {
                center: *start,
                radius: start.distance(*current),
            },
            Some(Draft::Drag { start, current, .. }) => SketchPreview::Rectangle {
                start: *start,
                current: *current,
            },
            Some(Draft::Polygon { points }) => polygon_preview(points, cursor),
            None => return SessionOutput::Idle,
        };
        SessionOutput::Preview(preview)
    }
}

fn finish_drag(tool: SketchTool, start: Point2D, end: Point2D) -> Sketch {
    debug!("Finished {} at ({}, {})", tool.name(), end.x, end.z);
    match tool {
        SketchTool::Circle => Sketch::circle(start, start.distance(end)),
        _ => Sketch::rectangle(start, end),
    }
}

fn polygon_preview(points: &[Point2D], cursor: Point2D) -> SketchPreview {
    let last = points.len().saturating_sub(1);
    let markers = points
        .iter()
        .enumerate()
        .map(|(i, &point)| PolygonMarker {
            point,
            role: if i == 0 {
                MarkerRole::First
            } else if i == last {
                MarkerRole::Last
            } else {
                MarkerRole::Interior
            },
        })
        .collect();

    let mut path = points.to_vec();
    path.push(cursor);

    SketchPreview::Polygon { path, markers }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn session(tool: SketchTool) -> SketchSession {
        let mut session = SketchSession::default();
        session.set_active(true);
        session.set_tool(tool);
        session
    }

    fn expect_finished(output: SessionOutput) -> Sketch {
        match output {
            SessionOutput::Finished(sketch) => sketch,
            other => panic!("expected finished sketch, got {other:?}"),
        }
    }

    #[test]
    fn test_rectangle_drag() {
        let mut s = session(SketchTool::Rectangle);
        s.click(Point2D::new(0.0, 0.0));
        assert!(s.is_drafting());

        let preview = s.pointer_move(Point2D::new(3.2, 1.9));
        assert_eq!(
            preview,
            SessionOutput::Preview(SketchPreview::Rectangle {
                start: Point2D::new(0.0, 0.0),
                current: Point2D::new(3.0, 2.0),
            })
        );

        let sketch = expect_finished(s.release(Point2D::new(4.0, 2.0)));
        match sketch {
            Sketch::Rectangle {
                start_point,
                end_point,
                ..
            } => {
                assert_eq!(start_point, Point2D::new(0.0, 0.0));
                assert_eq!(end_point, Point2D::new(4.0, 2.0));
            }
            other => panic!("unexpected sketch {other:?}"),
        }
        assert!(!s.is_drafting());
    }

    #[test]
    fn test_rectangle_two_clicks() {
        let mut s = session(SketchTool::Rectangle);
        s.click(Point2D::new(1.0, 1.0));
        // Release at the press point is part of the first click
        assert_eq!(s.release(Point2D::new(1.0, 1.0)), SessionOutput::Idle);
        assert!(s.is_drafting());

        let sketch = expect_finished(s.click(Point2D::new(5.0, 3.0)));
        assert!(matches!(sketch, Sketch::Rectangle { end_point, .. } if end_point == Point2D::new(5.0, 3.0)));
    }

    #[test]
    fn test_circle_radius_from_release() {
        let mut s = session(SketchTool::Circle);
        s.click(Point2D::new(0.0, 0.0));
        let preview = s.pointer_move(Point2D::new(3.0, 4.0));
        assert_eq!(
            preview,
            SessionOutput::Preview(SketchPreview::Circle {
                center: Point2D::new(0.0, 0.0),
                radius: 5.0,
            })
        );

        let sketch = expect_finished(s.release(Point2D::new(0.0, 5.0)));
        match sketch {
            Sketch::Circle {
                start_point,
                radius,
                ..
            } => {
                assert_eq!(start_point, Point2D::ORIGIN);
                assert_relative_eq!(radius, 5.0);
            }
            other => panic!("unexpected sketch {other:?}"),
        }
    }

    #[test]
    fn test_degenerate_drag_still_finishes() {
        let mut s = session(SketchTool::Circle);
        s.click(Point2D::new(2.0, 2.0));
        let sketch = expect_finished(s.click(Point2D::new(2.0, 2.0)));
        assert!(matches!(sketch, Sketch::Circle { radius, .. } if radius == 0.0));
    }

    #[test]
    fn test_polygon_closes_without_extra_vertex() {
        let mut s = session(SketchTool::Polygon);
        for (x, z) in [(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)] {
            let out = s.click(Point2D::new(x, z));
            assert!(matches!(out, SessionOutput::Preview(_)));
        }
        assert_eq!(s.polygon_points().len(), 4);

        let sketch = expect_finished(s.click(Point2D::new(0.5, 0.5)));
        match sketch {
            Sketch::Polygon { points, .. } => {
                assert_eq!(points.len(), 4);
                assert_eq!(points[0], Point2D::new(0.0, 0.0));
                assert_eq!(points[3], Point2D::new(0.0, 4.0));
            }
            other => panic!("unexpected sketch {other:?}"),
        }
        assert!(!s.is_drafting());
        assert!(s.polygon_points().is_empty());
    }

    #[test]
    fn test_polygon_does_not_close_before_three_points() {
        let mut s = session(SketchTool::Polygon);
        s.click(Point2D::new(0.0, 0.0));
        s.click(Point2D::new(4.0, 0.0));
        let out = s.click(Point2D::new(0.0, 0.0));
        assert!(matches!(out, SessionOutput::Preview(_)));
        assert_eq!(s.polygon_points().len(), 3);
    }

    #[test]
    fn test_polygon_preview_markers() {
        let mut s = session(SketchTool::Polygon);
        s.click(Point2D::new(0.0, 0.0));
        s.click(Point2D::new(2.0, 0.0));
        s.click(Point2D::new(2.0, 2.0));

        let out = s.pointer_move(Point2D::new(0.0, 3.0));
        let SessionOutput::Preview(SketchPreview::Polygon { path, markers }) = out else {
            panic!("expected polygon preview");
        };
        assert_eq!(path.len(), 4);
        assert_eq!(path[3], Point2D::new(0.0, 3.0));
        let roles: Vec<MarkerRole> = markers.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![MarkerRole::First, MarkerRole::Interior, MarkerRole::Last]
        );
    }

    #[test]
    fn test_release_ignored_for_polygon() {
        let mut s = session(SketchTool::Polygon);
        s.click(Point2D::new(0.0, 0.0));
        assert_eq!(s.release(Point2D::new(3.0, 3.0)), SessionOutput::Idle);
        assert_eq!(s.polygon_points().len(), 1);
    }

    #[test]
    fn test_switching_tool_discards_draft() {
        let mut s = session(SketchTool::Polygon);
        s.click(Point2D::new(0.0, 0.0));
        s.click(Point2D::new(3.0, 0.0));
        assert_eq!(s.set_tool(SketchTool::Circle), SessionOutput::ClearPreview);
        assert!(!s.is_drafting());
        assert!(s.polygon_points().is_empty());
    }

    #[test]
    fn test_leaving_sketch_mode_discards_draft() {
        let mut s = session(SketchTool::Rectangle);
        s.click(Point2D::new(0.0, 0.0));
        assert_eq!(s.toggle_mode(), SessionOutput::ClearPreview);
        assert!(!s.is_active());
        assert!(!s.is_drafting());

        // Events are ignored outside sketch mode
        assert_eq!(s.click(Point2D::new(1.0, 1.0)), SessionOutput::Idle);
        assert!(!s.is_drafting());
    }

    #[test]
    fn test_points_are_snapped() {
        let mut s = session(SketchTool::Rectangle);
        s.click(Point2D::new(0.4, -0.3));
        let sketch = expect_finished(s.release(Point2D::new(3.6, 2.2)));
        assert!(matches!(
            sketch,
            Sketch::Rectangle { start_point, end_point, .. }
                if start_point == Point2D::new(0.0, 0.0) && end_point == Point2D::new(4.0, 2.0)
        ));
    }

    #[test]
    fn test_custom_close_threshold() {
        let mut s = SketchSession::new(SketchSettings {
            grid_spacing: 1.0,
            close_threshold: 1.0,
        });
        s.set_active(true);
        s.set_tool(SketchTool::Polygon);
        for (x, z) in [(0.0, 0.0), (4.0, 0.0), (4.0, 4.0)] {
            s.click(Point2D::new(x, z));
        }
        // (1, 1) is sqrt(2) away: not close enough with a unit threshold
        assert!(matches!(s.click(Point2D::new(1.0, 1.0)), SessionOutput::Preview(_)));
        assert_eq!(s.polygon_points().len(), 4);
    }
}
