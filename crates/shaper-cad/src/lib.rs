//! Ground-Plane Sketching and Extrusion
//!
//! This crate provides:
//! - Ground-plane point math (snapping, centroids, area)
//! - Finished sketch records and the interactive sketch session
//! - Abstract CAD kernel trait with a pure Rust mesh backend
//! - The extrusion feature that lifts a sketch into a solid

pub mod feature;
pub mod geometry;
pub mod id;
pub mod kernel;
pub mod sketch;

// Re-exports for convenience
pub use feature::{
    ExtrudeSettings, ExtrudedSolid, FeatureError, FeatureResult, extrude_sketch, sketch_profile,
};
pub use geometry::Point2D;
pub use id::{deserialize_id, numeric_id};
pub use kernel::{
    CadError, CadKernel, CadResult, MeshKernel, NullKernel, Profile, Solid, TessellatedMesh,
    default_kernel,
};
pub use sketch::{
    MarkerRole, PolygonMarker, SessionOutput, Sketch, SketchError, SketchPreview, SketchSession,
    SketchSettings, SketchTool,
};
