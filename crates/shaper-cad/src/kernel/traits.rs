//! CAD Kernel trait definitions
//!
//! These traits define the interface that every solid-building backend must
//! implement. Primitive solids are not built here; only extrusions are.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::geometry::signed_area;

/// Default number of segments used to approximate a circle
pub const DEFAULT_CIRCLE_SEGMENTS: u32 = 32;

/// Error type for CAD kernel operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CadError {
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Triangulation failed: {0}")]
    TriangulationFailed(String),

    #[error("Kernel not available: {0}")]
    KernelNotAvailable(String),

    #[error("Solid not found: {0}")]
    SolidNotFound(Uuid),
}

/// Result type for CAD operations
pub type CadResult<T> = Result<T, CadError>;

/// A tessellated mesh output from the CAD kernel
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TessellatedMesh {
    /// Vertex positions (3 floats per vertex)
    pub vertices: Vec<[f32; 3]>,
    /// Vertex normals (3 floats per vertex)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (3 indices per triangle)
    pub indices: Vec<u32>,
}

impl TessellatedMesh {
    /// Create an empty tessellated mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned bounds as (min, max), `None` for an empty mesh
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        if self.vertices.is_empty() {
            return None;
        }
        let mut min = [f32::MAX; 3];
        let mut max = [f32::MIN; 3];
        for v in &self.vertices {
            for i in 0..3 {
                min[i] = min[i].min(v[i]);
                max[i] = max[i].max(v[i]);
            }
        }
        Some((min, max))
    }
}

/// A closed 2D boundary in local space, centered on the origin
///
/// Local `x` maps to world `x` and local `y` maps to world `z`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Profile {
    /// Axis-aligned rectangle
    Rectangle { width: f32, depth: f32 },
    /// Circle
    Circle { radius: f32 },
    /// Arbitrary simple polygon, in click order
    Polygon { points: Vec<Vec2> },
}

impl Profile {
    /// Enclosed area
    pub fn area(&self) -> f32 {
        match self {
            Profile::Rectangle { width, depth } => (width * depth).abs(),
            Profile::Circle { radius } => std::f32::consts::PI * radius * radius,
            Profile::Polygon { points } => signed_area(points).abs(),
        }
    }

    /// Boundary vertices, circles approximated with `segments` points
    pub fn outline(&self, segments: u32) -> Vec<Vec2> {
        match self {
            Profile::Rectangle { width, depth } => {
                let hw = width / 2.0;
                let hd = depth / 2.0;
                vec![
                    Vec2::new(-hw, -hd),
                    Vec2::new(hw, -hd),
                    Vec2::new(hw, hd),
                    Vec2::new(-hw, hd),
                ]
            }
            Profile::Circle { radius } => {
                let segments = segments.max(3);
                (0..segments)
                    .map(|i| {
                        let angle = (i as f32 / segments as f32) * std::f32::consts::TAU;
                        Vec2::new(angle.cos() * radius, angle.sin() * radius)
                    })
                    .collect()
            }
            Profile::Polygon { points } => points.clone(),
        }
    }
}

/// A handle to a solid owned by a kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Solid {
    /// Unique identifier
    pub id: Uuid,
}

impl Solid {
    /// Create a new solid handle with a fresh ID
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
        }
    }
}

impl Default for Solid {
    fn default() -> Self {
        Self::new()
    }
}

/// The main CAD kernel trait
///
/// Implementations build solids from 2D boundaries and hand back display
/// meshes for them.
pub trait CadKernel: Send + Sync {
    /// Get the name of this kernel
    fn name(&self) -> &str;

    /// Check if the kernel is available
    fn is_available(&self) -> bool;

    /// Sweep a closed profile straight up by `height`
    ///
    /// The resulting solid is centered on the origin: its bottom cap sits at
    /// `y = -height / 2` and its top cap at `y = height / 2`.
    fn extrude(&self, profile: &Profile, height: f32) -> CadResult<Solid>;

    /// Tessellate a solid into triangles
    fn tessellate(&self, solid: &Solid) -> CadResult<TessellatedMesh>;

    /// Drop any data held for a solid
    fn release(&self, _solid: &Solid) {}
}

/// A null kernel that always returns errors (used when no kernel is available)
#[derive(Debug, Default)]
pub struct NullKernel;

impl CadKernel for NullKernel {
    fn name(&self) -> &str {
        "null"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn extrude(&self, _profile: &Profile, _height: f32) -> CadResult<Solid> {
        Err(CadError::KernelNotAvailable(
            "No CAD kernel available".into(),
        ))
    }

    fn tessellate(&self, _solid: &Solid) -> CadResult<TessellatedMesh> {
        Err(CadError::KernelNotAvailable(
            "No CAD kernel available".into(),
        ))
    }
}

/// Get the default CAD kernel, approximating circles with `circle_segments`
/// segments
pub fn default_kernel(circle_segments: u32) -> Box<dyn CadKernel> {
    Box::new(super::MeshKernel::with_segments(circle_segments))
}
