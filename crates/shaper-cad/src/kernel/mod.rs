//! CAD kernel abstraction
//!
//! `CadKernel` is the only place 3D geometry is constructed from a 2D
//! boundary. `MeshKernel` is the built-in backend.

mod mesh;
mod traits;

pub use mesh::MeshKernel;
pub use traits::{
    CadError, CadKernel, CadResult, DEFAULT_CIRCLE_SEGMENTS, NullKernel, Profile, Solid,
    TessellatedMesh, default_kernel,
};
