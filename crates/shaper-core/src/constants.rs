//! Global constants for shaper-core

/// Edge length of the canonical box primitive
pub const BOX_SIZE: f32 = 2.0;

/// Radius of the canonical sphere primitive
pub const SPHERE_RADIUS: f32 = 1.0;

/// Radius of the canonical cylinder primitive
pub const CYLINDER_RADIUS: f32 = 1.0;

/// Height of the canonical cylinder primitive
pub const CYLINDER_HEIGHT: f32 = 2.0;

/// Default number of segments for cylinder mesh generation
pub const CYLINDER_SEGMENTS: u32 = 32;

/// Default number of latitude segments for sphere mesh generation
pub const SPHERE_LAT_SEGMENTS: u32 = 16;

/// Default number of longitude segments for sphere mesh generation
pub const SPHERE_LON_SEGMENTS: u32 = 32;

/// New primitives are scattered within +/- this distance of the origin
pub const DEFAULT_SPAWN_EXTENT: f32 = 5.0;

/// Maximum number of undo snapshots kept
pub const DEFAULT_HISTORY_LIMIT: usize = 100;
