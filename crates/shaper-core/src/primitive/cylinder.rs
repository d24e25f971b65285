//! Cylinder mesh generation (with end caps)

use std::f32::consts::PI;

use super::MeshData;

/// Generate a cylinder mesh along the Y axis
///
/// # Arguments
/// * `radius` - Cylinder radius
/// * `height` - Cylinder height (along Y)
///
/// # Returns
/// (vertices, normals, indices)
pub fn generate_cylinder_mesh(radius: f32, height: f32) -> MeshData {
    use crate::constants::CYLINDER_SEGMENTS;
    generate_cylinder_mesh_with_segments(radius, height, CYLINDER_SEGMENTS)
}

/// Generate a cylinder mesh with custom segment count
pub fn generate_cylinder_mesh_with_segments(radius: f32, height: f32, segments: u32) -> MeshData {
    let segments = segments.max(3);
    let half_height = height / 2.0;
    let mut vertices = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();

    let rim = |i: u32| {
        let theta = (i as f32 / segments as f32) * 2.0 * PI;
        (theta.cos(), theta.sin())
    };

    // Side vertices, bottom/top pairs
    for i in 0..=segments {
        let (c, s) = rim(i);
        vertices.push([radius * c, -half_height, radius * s]);
        normals.push([c, 0.0, s]);
        vertices.push([radius * c, half_height, radius * s]);
        normals.push([c, 0.0, s]);
    }

    for i in 0..segments {
        let base = i * 2;
        indices.extend_from_slice(&[base, base + 1, base + 2]);
        indices.extend_from_slice(&[base + 1, base + 3, base + 2]);
    }

    // Caps: (y, normal y, flip winding)
    for (y, ny, flip) in [(half_height, 1.0, true), (-half_height, -1.0, false)] {
        let center = vertices.len() as u32;
        vertices.push([0.0, y, 0.0]);
        normals.push([0.0, ny, 0.0]);

        let rim_start = vertices.len() as u32;
        for i in 0..=segments {
            let (c, s) = rim(i);
            vertices.push([radius * c, y, radius * s]);
            normals.push([0.0, ny, 0.0]);
        }

        for i in 0..segments {
            let (a, b) = (rim_start + i, rim_start + i + 1);
            if flip {
                indices.extend_from_slice(&[center, b, a]);
            } else {
                indices.extend_from_slice(&[center, a, b]);
            }
        }
    }

    (vertices, normals, indices)
}
