//! Scene model for Shaper
//!
//! Objects and their export records, the object/sketch store, canonical
//! primitive meshes, snapshot undo/redo and the JSON scene document.

pub mod constants;
pub mod document;
pub mod history;
pub mod object;
pub mod primitive;
pub mod store;

pub use document::{DocumentError, SceneDocument};
pub use history::{History, HistorySnapshot};
pub use object::{
    Dimensions, ExtrusionSource, ObjectKind, ObjectRecord, PrimitiveKind, RecordOptions,
    RestoreError, SceneObject, Transform,
};
pub use primitive::{MeshData, generate_box_mesh, generate_cylinder_mesh, generate_sphere_mesh};
pub use store::{RestoreReport, SceneStore, SkippedObject};
