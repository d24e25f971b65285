//! Mesh CAD Kernel Backend
//!
//! Pure Rust kernel that represents solids directly as triangle meshes.
//! Extrusions become closed prisms: earcut-triangulated caps joined by flat
//! side walls.

use std::collections::HashMap;

use glam::Vec2;
use parking_lot::Mutex;
use uuid::Uuid;

use super::{
    CadError, CadKernel, CadResult, DEFAULT_CIRCLE_SEGMENTS, Profile, Solid, TessellatedMesh,
};
use crate::geometry::signed_area;

/// Smallest cap area the kernel accepts
const MIN_PROFILE_AREA: f32 = 1e-6;

/// Mesh-based CAD kernel
pub struct MeshKernel {
    /// Segments used when approximating circles
    circle_segments: u32,
    /// Storage for solid meshes (keyed by UUID)
    solids: Mutex<HashMap<Uuid, TessellatedMesh>>,
}

impl MeshKernel {
    /// Create a new mesh kernel
    pub fn new() -> Self {
        Self::with_segments(DEFAULT_CIRCLE_SEGMENTS)
    }

    /// Create a mesh kernel with a custom circle segment count
    pub fn with_segments(circle_segments: u32) -> Self {
        Self {
            circle_segments: circle_segments.max(3),
            solids: Mutex::new(HashMap::new()),
        }
    }

    /// Number of solids currently held
    pub fn solid_count(&self) -> usize {
        self.solids.lock().len()
    }

    /// Store a mesh and return a Solid reference
    fn store_solid(&self, mesh: TessellatedMesh) -> Solid {
        let solid = Solid::new();
        self.solids.lock().insert(solid.id, mesh);
        solid
    }
}

impl Default for MeshKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl CadKernel for MeshKernel {
    fn name(&self) -> &str {
        "mesh"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn extrude(&self, profile: &Profile, height: f32) -> CadResult<Solid> {
        if !(height.is_finite() && height > 0.0) {
            return Err(CadError::InvalidProfile(format!(
                "Extrusion height must be positive, got {height}"
            )));
        }

        let mut outline = profile.outline(self.circle_segments);
        if outline.len() < 3 {
            return Err(CadError::InvalidProfile(
                "Profile must have at least 3 points".into(),
            ));
        }

        let area = signed_area(&outline);
        if area.abs() < MIN_PROFILE_AREA {
            return Err(CadError::InvalidProfile("Profile has no area".into()));
        }
        if area < 0.0 {
            outline.reverse();
        }

        let mesh = prism_mesh(&outline, height)?;
        tracing::debug!(
            "Extruded {} point profile: {} triangles",
            outline.len(),
            mesh.triangle_count()
        );

        Ok(self.store_solid(mesh))
    }

    fn tessellate(&self, solid: &Solid) -> CadResult<TessellatedMesh> {
        self.solids
            .lock()
            .get(&solid.id)
            .cloned()
            .ok_or(CadError::SolidNotFound(solid.id))
    }

    fn release(&self, solid: &Solid) {
        self.solids.lock().remove(&solid.id);
    }
}

/// Triangulate a counter-clockwise outline
///
/// Every returned triangle is counter-clockwise in the outline's plane.
fn triangulate(outline: &[Vec2]) -> CadResult<Vec<[usize; 3]>> {
    let flat: Vec<f64> = outline
        .iter()
        .flat_map(|p| [p.x as f64, p.y as f64])
        .collect();

    let indices = earcutr::earcut(&flat, &[], 2)
        .map_err(|e| CadError::TriangulationFailed(format!("{e:?}")))?;
    if indices.len() < 3 {
        return Err(CadError::TriangulationFailed(
            "Profile produced no triangles".into(),
        ));
    }

    Ok(indices
        .chunks_exact(3)
        .map(|t| {
            let (a, b, c) = (t[0], t[1], t[2]);
            let tri = [outline[a], outline[b], outline[c]];
            if signed_area(&tri) < 0.0 {
                [a, c, b]
            } else {
                [a, b, c]
            }
        })
        .collect())
}

/// Build a closed prism spanning `y` in `[-height / 2, height / 2]`
fn prism_mesh(outline: &[Vec2], height: f32) -> CadResult<TessellatedMesh> {
    let triangles = triangulate(outline)?;
    let n = outline.len();
    let half = height / 2.0;

    let mut mesh = TessellatedMesh::new();
    mesh.vertices.reserve(n * 6);
    mesh.normals.reserve(n * 6);

    // Top cap: counter-clockwise in (x, z) faces down, so flip the winding
    let top = mesh.vertices.len() as u32;
    for p in outline {
        mesh.vertices.push([p.x, half, p.y]);
        mesh.normals.push([0.0, 1.0, 0.0]);
    }
    for [a, b, c] in &triangles {
        mesh.indices
            .extend_from_slice(&[top + *a as u32, top + *c as u32, top + *b as u32]);
    }

    // Bottom cap
    let bottom = mesh.vertices.len() as u32;
    for p in outline {
        mesh.vertices.push([p.x, -half, p.y]);
        mesh.normals.push([0.0, -1.0, 0.0]);
    }
    for [a, b, c] in &triangles {
        mesh.indices
            .extend_from_slice(&[bottom + *a as u32, bottom + *b as u32, bottom + *c as u32]);
    }

    // Side walls, one flat-shaded quad per edge
    for i in 0..n {
        let p0 = outline[i];
        let p1 = outline[(i + 1) % n];
        let edge = p1 - p0;
        let normal = Vec2::new(edge.y, -edge.x).normalize_or_zero();
        let normal = [normal.x, 0.0, normal.y];

        let base = mesh.vertices.len() as u32;
        for corner in [
            [p0.x, -half, p0.y],
            [p1.x, -half, p1.y],
            [p1.x, half, p1.y],
            [p0.x, half, p0.y],
        ] {
            mesh.vertices.push(corner);
            mesh.normals.push(normal);
        }
        mesh.indices
            .extend_from_slice(&[base, base + 2, base + 1, base, base + 3, base + 2]);
    }

    Ok(mesh)
}
