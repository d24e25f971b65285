//! Primitive mesh generation for scene primitives
//!
//! Generates vertices, normals, and indices for basic shapes, all Y-up and
//! centered on the origin:
//! - Box (rectangular prism)
//! - Cylinder (with end caps)
//! - Sphere (UV sphere)

mod box_mesh;
mod cylinder;
mod sphere;

pub use box_mesh::generate_box_mesh;
pub use cylinder::{generate_cylinder_mesh, generate_cylinder_mesh_with_segments};
pub use sphere::{generate_sphere_mesh, generate_sphere_mesh_with_segments};

/// Mesh data: vertices, normals, and triangle indices
pub type MeshData = (Vec<[f32; 3]>, Vec<[f32; 3]>, Vec<u32>);

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(vertices: &[[f32; 3]]) -> ([f32; 3], [f32; 3]) {
        let mut min = [f32::MAX; 3];
        let mut max = [f32::MIN; 3];
        for v in vertices {
            for i in 0..3 {
                min[i] = min[i].min(v[i]);
                max[i] = max[i].max(v[i]);
            }
        }
        (min, max)
    }

    /// Every triangle of a convex origin-centered mesh must face away from the origin
    fn assert_outward((vertices, _, indices): &MeshData) {
        for tri in indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| glam::Vec3::from(vertices[i as usize]));
            let normal = (b - a).cross(c - a);
            let center = (a + b + c) / 3.0;
            assert!(normal.dot(center) >= -1e-5, "inward triangle {tri:?}");
        }
    }

    #[test]
    fn test_box_mesh() {
        let mesh = generate_box_mesh([1.0, 1.0, 1.0]);
        let (vertices, normals, indices) = &mesh;
        assert_eq!(vertices.len(), 24); // 6 faces * 4 vertices
        assert_eq!(normals.len(), 24);
        assert_eq!(indices.len(), 36); // 6 faces * 2 triangles * 3 indices
        assert_outward(&mesh);
    }

    #[test]
    fn test_box_dimensions() {
        let (vertices, _, _) = generate_box_mesh([2.0, 4.0, 6.0]);
        let (min, max) = bounds(&vertices);
        assert!((max[0] - min[0] - 2.0).abs() < 0.001);
        assert!((max[1] - min[1] - 4.0).abs() < 0.001);
        assert!((max[2] - min[2] - 6.0).abs() < 0.001);
    }

    #[test]
    fn test_cylinder_mesh_is_y_up() {
        let mesh = generate_cylinder_mesh(1.0, 2.0);
        let (vertices, normals, indices) = &mesh;
        assert_eq!(vertices.len(), normals.len());
        assert!(indices.len() % 3 == 0); // Valid triangles

        let (min, max) = bounds(vertices);
        assert!((max[1] - min[1] - 2.0).abs() < 0.001);
        assert!((max[0] - min[0] - 2.0).abs() < 0.001);
        assert!((max[2] - min[2] - 2.0).abs() < 0.001);
        assert_outward(&mesh);
    }

    #[test]
    fn test_sphere_mesh() {
        let mesh = generate_sphere_mesh(1.0);
        let (vertices, normals, indices) = &mesh;
        assert!(!vertices.is_empty());
        assert_eq!(vertices.len(), normals.len());
        assert!(indices.len() % 3 == 0);

        let (_, max) = bounds(vertices);
        assert!((max[1] - 1.0).abs() < 0.001);
        assert_outward(&mesh);
    }
}
