//! 2D Sketch System
//!
//! Finished sketch records drawn on the ground plane, and the interactive
//! session that turns pointer events into them.

mod session;

pub use session::{
    DEFAULT_CLOSE_THRESHOLD, DEFAULT_GRID_SPACING, MarkerRole, PolygonMarker, SessionOutput,
    SketchPreview, SketchSession, SketchSettings,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::geometry::Point2D;
use crate::id::deserialize_id;

/// Sketch-related errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SketchError {
    #[error("Polygon needs at least 3 points, got {0}")]
    TooFewPoints(usize),

    #[error("Sketch {0} has a non-finite coordinate")]
    NonFinite(Uuid),

    #[error("Circle radius must be non-negative, got {0}")]
    NegativeRadius(f32),
}

/// Drawing tool used while in sketch mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SketchTool {
    /// Drag from one corner to the opposite corner
    #[default]
    Rectangle,
    /// Drag from the center outward
    Circle,
    /// Click a sequence of vertices, close near the first one
    Polygon,
}

impl SketchTool {
    /// Get the display name of the tool
    pub fn name(&self) -> &'static str {
        match self {
            SketchTool::Rectangle => "Rectangle",
            SketchTool::Circle => "Circle",
            SketchTool::Polygon => "Polygon",
        }
    }

    /// Drag tools finish on release or on a second click
    pub fn is_drag(&self) -> bool {
        matches!(self, SketchTool::Rectangle | SketchTool::Circle)
    }

    /// Get all tools
    pub fn all() -> [SketchTool; 3] {
        [SketchTool::Rectangle, SketchTool::Circle, SketchTool::Polygon]
    }
}

/// A finished 2D sketch on the ground plane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Sketch {
    /// Axis-aligned rectangle given by two opposite corners
    Rectangle {
        #[serde(deserialize_with = "deserialize_id")]
        id: Uuid,
        #[serde(rename = "startPoint")]
        start_point: Point2D,
        #[serde(rename = "endPoint")]
        end_point: Point2D,
    },

    /// Circle given by its center and radius
    Circle {
        #[serde(deserialize_with = "deserialize_id")]
        id: Uuid,
        /// Center of the circle
        #[serde(rename = "startPoint")]
        start_point: Point2D,
        radius: f32,
    },

    /// Closed polygon in click order
    Polygon {
        #[serde(deserialize_with = "deserialize_id")]
        id: Uuid,
        points: Vec<Point2D>,
    },
}

impl Sketch {
    /// Create a rectangle sketch with a fresh id
    pub fn rectangle(start_point: Point2D, end_point: Point2D) -> Self {
        Sketch::Rectangle {
            id: Uuid::now_v7(),
            start_point,
            end_point,
        }
    }

    /// Create a circle sketch with a fresh id
    pub fn circle(center: Point2D, radius: f32) -> Self {
        Sketch::Circle {
            id: Uuid::now_v7(),
            start_point: center,
            radius,
        }
    }

    /// Create a polygon sketch with a fresh id
    pub fn polygon(points: Vec<Point2D>) -> Result<Self, SketchError> {
        if points.len() < 3 {
            return Err(SketchError::TooFewPoints(points.len()));
        }
        Ok(Sketch::Polygon {
            id: Uuid::now_v7(),
            points,
        })
    }

    /// Get the unique ID of this sketch
    pub fn id(&self) -> Uuid {
        match self {
            Sketch::Rectangle { id, .. } => *id,
            Sketch::Circle { id, .. } => *id,
            Sketch::Polygon { id, .. } => *id,
        }
    }

    /// Get the type name of this sketch
    pub fn type_name(&self) -> &'static str {
        match self {
            Sketch::Rectangle { .. } => "rectangle",
            Sketch::Circle { .. } => "circle",
            Sketch::Polygon { .. } => "polygon",
        }
    }

    /// Tool that produces this kind of sketch
    pub fn tool(&self) -> SketchTool {
        match self {
            Sketch::Rectangle { .. } => SketchTool::Rectangle,
            Sketch::Circle { .. } => SketchTool::Circle,
            Sketch::Polygon { .. } => SketchTool::Polygon,
        }
    }

    /// Check that the record is fully specified for its type
    pub fn validate(&self) -> Result<(), SketchError> {
        match self {
            Sketch::Rectangle {
                id,
                start_point,
                end_point,
            } => {
                if !start_point.is_finite() || !end_point.is_finite() {
                    return Err(SketchError::NonFinite(*id));
                }
            }
            Sketch::Circle {
                id,
                start_point,
                radius,
            } => {
                if !start_point.is_finite() || !radius.is_finite() {
                    return Err(SketchError::NonFinite(*id));
                }
                if *radius < 0.0 {
                    return Err(SketchError::NegativeRadius(*radius));
                }
            }
            Sketch::Polygon { id, points } => {
                if points.len() < 3 {
                    return Err(SketchError::TooFewPoints(points.len()));
                }
                if points.iter().any(|p| !p.is_finite()) {
                    return Err(SketchError::NonFinite(*id));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sketch_ids_are_unique() {
        let a = Sketch::rectangle(Point2D::ORIGIN, Point2D::new(1.0, 1.0));
        let b = Sketch::rectangle(Point2D::ORIGIN, Point2D::new(1.0, 1.0));
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_polygon_requires_three_points() {
        let err = Sketch::polygon(vec![Point2D::ORIGIN, Point2D::new(1.0, 0.0)]).unwrap_err();
        assert_eq!(err, SketchError::TooFewPoints(2));
    }

    #[test]
    fn test_sketch_json_shape() {
        let sketch = Sketch::rectangle(Point2D::new(0.0, 0.0), Point2D::new(4.0, 2.0));
        let value = serde_json::to_value(&sketch).unwrap();
        assert_eq!(value["type"], "rectangle");
        assert_eq!(value["startPoint"]["x"], 0.0);
        assert_eq!(value["endPoint"]["x"], 4.0);
        assert_eq!(value["endPoint"]["z"], 2.0);

        let back: Sketch = serde_json::from_value(value).unwrap();
        assert_eq!(back, sketch);
    }

    #[test]
    fn test_validate_rejects_negative_radius() {
        let circle = Sketch::circle(Point2D::ORIGIN, -1.0);
        assert_eq!(circle.validate(), Err(SketchError::NegativeRadius(-1.0)));
        assert!(Sketch::circle(Point2D::ORIGIN, 0.0).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_short_polygon_from_json() {
        let json = r#"{"type":"polygon","id":"0190b5a1-0000-7000-8000-000000000001","points":[{"x":0,"z":0},{"x":1,"z":0}]}"#;
        let sketch: Sketch = serde_json::from_str(json).unwrap();
        assert_eq!(sketch.validate(), Err(SketchError::TooFewPoints(2)));
    }
}
