//! Feature Operations
//!
//! Turns a finished sketch into a solid: validate the shape, build the
//! origin-centered profile, place it on the ground plane and hand the sweep
//! to the CAD kernel.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{Point2D, centroid, collapse_close_points, signed_area};
use crate::kernel::{CadKernel, DEFAULT_CIRCLE_SEGMENTS, Profile, Solid};
use crate::sketch::{Sketch, SketchError};

/// Default extrusion height
pub const DEFAULT_EXTRUDE_HEIGHT: f32 = 2.0;

/// Largest accepted extrusion height
pub const DEFAULT_MAX_HEIGHT: f32 = 1000.0;

/// Polygon vertices closer than this are merged before extrusion
pub const DEFAULT_MIN_POINT_SEPARATION: f32 = 0.1;

/// Shapes smaller than this cannot be triangulated
const MIN_EXTENT: f32 = 1e-6;

/// Feature-related errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    #[error("Sketch error: {0}")]
    SketchError(#[from] SketchError),

    #[error("CAD kernel error: {0}")]
    CadError(#[from] crate::kernel::CadError),

    #[error("Degenerate shape: {0}")]
    DegenerateShape(String),

    #[error("Invalid extrusion height: {0}")]
    InvalidHeight(f32),
}

/// Result type for feature operations
pub type FeatureResult<T> = Result<T, FeatureError>;

/// Extrusion parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtrudeSettings {
    /// Height used when the caller does not give one
    pub default_height: f32,
    /// Heights above this are rejected
    pub max_height: f32,
    /// Minimum distance between consecutive polygon vertices
    pub min_point_separation: f32,
    /// Segments used to approximate circles
    pub circle_segments: u32,
}

impl Default for ExtrudeSettings {
    fn default() -> Self {
        Self {
            default_height: DEFAULT_EXTRUDE_HEIGHT,
            max_height: DEFAULT_MAX_HEIGHT,
            min_point_separation: DEFAULT_MIN_POINT_SEPARATION,
            circle_segments: DEFAULT_CIRCLE_SEGMENTS,
        }
    }
}

/// Result of a successful extrusion
#[derive(Debug, Clone, PartialEq)]
pub struct ExtrudedSolid {
    /// Origin-centered boundary that was swept
    pub profile: Profile,
    /// World placement: the shape's centroid lifted to `height / 2`
    pub position: Vec3,
    /// Extrusion height
    pub height: f32,
    /// Kernel handle for the built solid
    pub solid: Solid,
}

/// Check an extrusion height against the settings
pub fn validate_height(height: f32, settings: &ExtrudeSettings) -> FeatureResult<()> {
    if !height.is_finite() || height <= 0.0 || height > settings.max_height {
        return Err(FeatureError::InvalidHeight(height));
    }
    Ok(())
}

/// Compute the origin-centered profile of a sketch and its planar centroid
///
/// Runs the polygon validation pass and rejects zero-area shapes.
pub fn sketch_profile(
    sketch: &Sketch,
    settings: &ExtrudeSettings,
) -> FeatureResult<(Profile, Point2D)> {
    sketch.validate()?;

    match sketch {
        Sketch::Rectangle {
            start_point,
            end_point,
            ..
        } => {
            let width = (end_point.x - start_point.x).abs();
            let depth = (end_point.z - start_point.z).abs();
            if width < MIN_EXTENT || depth < MIN_EXTENT {
                return Err(FeatureError::DegenerateShape(format!(
                    "rectangle has zero extent ({width} x {depth})"
                )));
            }
            let center = Point2D::new(
                (start_point.x + end_point.x) / 2.0,
                (start_point.z + end_point.z) / 2.0,
            );
            Ok((Profile::Rectangle { width, depth }, center))
        }
        Sketch::Circle {
            start_point,
            radius,
            ..
        } => {
            if *radius < MIN_EXTENT {
                return Err(FeatureError::DegenerateShape(
                    "circle has zero radius".into(),
                ));
            }
            Ok((Profile::Circle { radius: *radius }, *start_point))
        }
        Sketch::Polygon { points, .. } => {
            let center = centroid(points);
            let kept = collapse_close_points(points, settings.min_point_separation);
            if kept.len() < 3 {
                return Err(FeatureError::DegenerateShape(format!(
                    "polygon has {} usable points after merging close vertices",
                    kept.len()
                )));
            }

            let local: Vec<Vec2> = kept
                .iter()
                .map(|p| p.to_vec2() - center.to_vec2())
                .collect();
            if signed_area(&local).abs() < MIN_EXTENT {
                return Err(FeatureError::DegenerateShape("polygon has no area".into()));
            }
            Ok((Profile::Polygon { points: local }, center))
        }
    }
}

/// Extrude a finished sketch straight up by `height`
///
/// Nothing outside the kernel is touched; on error the kernel holds no new
/// solid either.
pub fn extrude_sketch(
    sketch: &Sketch,
    height: f32,
    kernel: &dyn CadKernel,
    settings: &ExtrudeSettings,
) -> FeatureResult<ExtrudedSolid> {
    validate_height(height, settings)?;
    let (profile, center) = sketch_profile(sketch, settings)?;
    let solid = kernel.extrude(&profile, height)?;

    tracing::debug!(
        "Extruded {} sketch {} with height {} using {} kernel",
        sketch.type_name(),
        sketch.id(),
        height,
        kernel.name()
    );

    Ok(ExtrudedSolid {
        profile,
        position: Vec3::new(center.x, height / 2.0, center.z),
        height,
        solid,
    })
}
