//! Scene objects and their export records

use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Deserializer, Serialize};
use shaper_cad::{CadError, CadKernel, CadResult, ExtrudedSolid, Profile, Solid, TessellatedMesh};
use thiserror::Error;
use uuid::Uuid;

use crate::constants::{BOX_SIZE, CYLINDER_HEIGHT, CYLINDER_RADIUS, SPHERE_RADIUS};
use crate::primitive::{MeshData, generate_box_mesh, generate_cylinder_mesh, generate_sphere_mesh};

/// Kind of a scene object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Box,
    Sphere,
    Cylinder,
    Extruded,
}

impl ObjectKind {
    /// Get the display name of the kind
    pub fn name(&self) -> &'static str {
        match self {
            ObjectKind::Box => "box",
            ObjectKind::Sphere => "sphere",
            ObjectKind::Cylinder => "cylinder",
            ObjectKind::Extruded => "extruded",
        }
    }

    /// The primitive this kind is built from, if any
    pub fn primitive(&self) -> Option<PrimitiveKind> {
        match self {
            ObjectKind::Box => Some(PrimitiveKind::Box),
            ObjectKind::Sphere => Some(PrimitiveKind::Sphere),
            ObjectKind::Cylinder => Some(PrimitiveKind::Cylinder),
            ObjectKind::Extruded => None,
        }
    }
}

/// Kinds that can be rebuilt from the kind alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Box,
    Sphere,
    Cylinder,
}

impl PrimitiveKind {
    /// Get all primitive kinds
    pub fn all() -> [PrimitiveKind; 3] {
        [PrimitiveKind::Box, PrimitiveKind::Sphere, PrimitiveKind::Cylinder]
    }

    /// Canonical mesh for this primitive at unit scale
    pub fn mesh(&self) -> MeshData {
        match self {
            PrimitiveKind::Box => generate_box_mesh([BOX_SIZE; 3]),
            PrimitiveKind::Sphere => generate_sphere_mesh(SPHERE_RADIUS),
            PrimitiveKind::Cylinder => generate_cylinder_mesh(CYLINDER_RADIUS, CYLINDER_HEIGHT),
        }
    }
}

impl From<PrimitiveKind> for ObjectKind {
    fn from(kind: PrimitiveKind) -> Self {
        match kind {
            PrimitiveKind::Box => ObjectKind::Box,
            PrimitiveKind::Sphere => ObjectKind::Sphere,
            PrimitiveKind::Cylinder => ObjectKind::Cylinder,
        }
    }
}

/// Object placement: position, XYZ Euler rotation in radians, per-axis scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    #[serde(deserialize_with = "deserialize_euler")]
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Identity rotation and scale at the given position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// World matrix (scale, then XYZ rotation, then translation)
    pub fn matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.position)
    }

    /// All components are finite
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite() && self.scale.is_finite()
    }
}

/// Rotations are `[x, y, z]`; a trailing Euler order string is accepted and ignored
fn deserialize_euler<'de, D>(deserializer: D) -> Result<Vec3, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Euler {
        Plain([f32; 3]),
        Ordered(f32, f32, f32, String),
    }

    Ok(match Euler::deserialize(deserializer)? {
        Euler::Plain(v) => Vec3::from(v),
        Euler::Ordered(x, y, z, _) => Vec3::new(x, y, z),
    })
}

/// The boundary and height an extruded object was built from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtrusionSource {
    pub profile: Profile,
    pub height: f32,
}

/// Human-facing measurements of an object
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dimensions {
    Box { width: f32, height: f32, depth: f32 },
    Sphere { radius: f32 },
    Cylinder { radius: f32, height: f32 },
    Extruded { height: f32 },
}

/// An object placed in the scene
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub id: Uuid,
    pub kind: ObjectKind,
    pub transform: Transform,
    /// Whether picking may select this object
    pub selectable: bool,
    /// Source shape, present for extruded objects
    pub extrusion: Option<ExtrusionSource>,
    /// Kernel handle, present for extruded objects
    pub solid: Option<Solid>,
}

impl SceneObject {
    /// Create a primitive with a fresh id
    pub fn primitive(kind: PrimitiveKind, position: Vec3) -> Self {
        Self {
            id: Uuid::now_v7(),
            kind: kind.into(),
            transform: Transform::from_position(position),
            selectable: true,
            extrusion: None,
            solid: None,
        }
    }

    /// Wrap a freshly extruded solid with a fresh id
    pub fn extruded(extruded: ExtrudedSolid) -> Self {
        Self {
            id: Uuid::now_v7(),
            kind: ObjectKind::Extruded,
            transform: Transform::from_position(extruded.position),
            selectable: true,
            extrusion: Some(ExtrusionSource {
                profile: extruded.profile,
                height: extruded.height,
            }),
            solid: Some(extruded.solid),
        }
    }

    /// Measurements shown for the current scale
    pub fn dimensions(&self) -> Dimensions {
        let scale = self.transform.scale;
        match self.kind {
            ObjectKind::Box => Dimensions::Box {
                width: scale.x * BOX_SIZE,
                height: scale.y * BOX_SIZE,
                depth: scale.z * BOX_SIZE,
            },
            ObjectKind::Sphere => Dimensions::Sphere {
                radius: scale.x * SPHERE_RADIUS,
            },
            ObjectKind::Cylinder => Dimensions::Cylinder {
                radius: scale.x * CYLINDER_RADIUS,
                height: scale.y * CYLINDER_HEIGHT,
            },
            ObjectKind::Extruded => Dimensions::Extruded {
                height: scale.y
                    * self
                        .extrusion
                        .as_ref()
                        .map_or(shaper_cad::feature::DEFAULT_EXTRUDE_HEIGHT, |e| e.height),
            },
        }
    }

    /// Local-space display mesh
    pub fn mesh(&self, kernel: &dyn CadKernel) -> CadResult<TessellatedMesh> {
        if let Some(primitive) = self.kind.primitive() {
            let (vertices, normals, indices) = primitive.mesh();
            return Ok(TessellatedMesh {
                vertices,
                normals,
                indices,
            });
        }
        match &self.solid {
            Some(solid) => kernel.tessellate(solid),
            None => Err(CadError::InvalidProfile(format!(
                "Extruded object {} has no solid",
                self.id
            ))),
        }
    }

    /// Project to an export record
    pub fn to_record(&self, options: RecordOptions) -> ObjectRecord {
        ObjectRecord {
            id: self.id,
            kind: self.kind,
            position: self.transform.position,
            rotation: self.transform.rotation,
            scale: self.transform.scale,
            extrusion: if options.persist_extrusions {
                self.extrusion.clone()
            } else {
                None
            },
        }
    }
}

/// Controls what an export record carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordOptions {
    /// Write the source shape of extruded objects
    pub persist_extrusions: bool,
}

/// Errors rebuilding an object from its record
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RestoreError {
    #[error("Extruded object {0} has no stored extrusion source")]
    UnreconstructableObject(Uuid),

    #[error("Rebuilding object {id} failed: {source}")]
    Rebuild { id: Uuid, source: CadError },
}

/// Serializable projection of a scene object
///
/// The kind is written under the `"type"` key, matching documents from the
/// browser-based editor, rather than `"kind"`; both keys are read. Ids
/// may also be numeric on input (see [`shaper_cad::numeric_id`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    #[serde(rename = "type", alias = "kind")]
    pub kind: ObjectKind,
    pub position: Vec3,
    #[serde(deserialize_with = "deserialize_euler")]
    pub rotation: Vec3,
    pub scale: Vec3,
    #[serde(deserialize_with = "shaper_cad::deserialize_id")]
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extrusion: Option<ExtrusionSource>,
}

impl ObjectRecord {
    /// Transform carried by the record
    pub fn transform(&self) -> Transform {
        Transform {
            position: self.position,
            rotation: self.rotation,
            scale: self.scale,
        }
    }

    /// Rebuild the scene object
    ///
    /// Primitives are rebuilt from their kind. Extruded objects need a stored
    /// extrusion source and go back through the kernel.
    pub fn to_object(&self, kernel: &dyn CadKernel) -> Result<SceneObject, RestoreError> {
        let (extrusion, solid) = match (self.kind, &self.extrusion) {
            (ObjectKind::Extruded, None) => {
                return Err(RestoreError::UnreconstructableObject(self.id));
            }
            (ObjectKind::Extruded, Some(source)) => {
                let solid = kernel
                    .extrude(&source.profile, source.height)
                    .map_err(|source| RestoreError::Rebuild {
                        id: self.id,
                        source,
                    })?;
                (Some(source.clone()), Some(solid))
            }
            _ => (None, None),
        };

        Ok(SceneObject {
            id: self.id,
            kind: self.kind,
            transform: self.transform(),
            selectable: true,
            extrusion,
            solid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use shaper_cad::MeshKernel;

    fn extruded_object(kernel: &MeshKernel) -> SceneObject {
        let profile = Profile::Rectangle {
            width: 4.0,
            depth: 2.0,
        };
        let solid = kernel.extrude(&profile, 3.0).unwrap();
        SceneObject::extruded(ExtrudedSolid {
            profile,
            position: Vec3::new(2.0, 1.5, 1.0),
            height: 3.0,
            solid,
        })
    }

    #[test]
    fn test_record_json_shape() {
        let object = SceneObject::primitive(PrimitiveKind::Box, Vec3::new(1.0, 2.0, 3.0));
        let value = serde_json::to_value(object.to_record(RecordOptions::default())).unwrap();
        assert_eq!(value["type"], "box");
        assert_eq!(value["position"], serde_json::json!([1.0, 2.0, 3.0]));
        assert_eq!(value["scale"], serde_json::json!([1.0, 1.0, 1.0]));
        assert!(value.get("extrusion").is_none());
    }

    #[test]
    fn test_kind_key_is_accepted() {
        let json = r#"{
            "kind": "cylinder",
            "position": [0, 1, 0],
            "rotation": [0, 0, 0],
            "scale": [1, 1, 1],
            "id": "0190b5a1-0000-7000-8000-000000000004"
        }"#;
        let record: ObjectRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.kind, ObjectKind::Cylinder);
    }

    #[test]
    fn test_rotation_accepts_euler_order() {
        let json = r#"{
            "type": "sphere",
            "position": [0, 0, 0],
            "rotation": [0.5, 0, 0, "XYZ"],
            "scale": [1, 1, 1],
            "id": "0190b5a1-0000-7000-8000-000000000002"
        }"#;
        let record: ObjectRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.rotation, Vec3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn test_primitive_record_round_trip() {
        let kernel = MeshKernel::new();
        let mut object = SceneObject::primitive(PrimitiveKind::Cylinder, Vec3::new(1.0, 0.0, -1.0));
        object.transform.scale = Vec3::splat(2.0);

        let restored = object
            .to_record(RecordOptions::default())
            .to_object(&kernel)
            .unwrap();
        assert_eq!(restored, object);
    }

    #[test]
    fn test_extruded_record_without_source_is_unreconstructable() {
        let kernel = MeshKernel::new();
        let object = extruded_object(&kernel);
        let record = object.to_record(RecordOptions::default());
        assert_eq!(
            record.to_object(&kernel),
            Err(RestoreError::UnreconstructableObject(object.id))
        );
    }

    #[test]
    fn test_extruded_record_with_source_rebuilds() {
        let kernel = MeshKernel::new();
        let object = extruded_object(&kernel);
        let record = object.to_record(RecordOptions {
            persist_extrusions: true,
        });

        let restored = record.to_object(&kernel).unwrap();
        assert_eq!(restored.id, object.id);
        assert_eq!(restored.extrusion, object.extrusion);
        assert_ne!(restored.solid, object.solid);
        assert_eq!(kernel.solid_count(), 2);
    }

    #[test]
    fn test_dimensions() {
        let mut cylinder = SceneObject::primitive(PrimitiveKind::Cylinder, Vec3::ZERO);
        cylinder.transform.scale = Vec3::new(1.5, 2.0, 1.5);
        assert_eq!(
            cylinder.dimensions(),
            Dimensions::Cylinder {
                radius: 1.5,
                height: 4.0
            }
        );

        let kernel = MeshKernel::new();
        let mut extruded = extruded_object(&kernel);
        extruded.transform.scale.y = 2.0;
        assert_eq!(extruded.dimensions(), Dimensions::Extruded { height: 6.0 });
    }

    #[test]
    fn test_meshes() {
        let kernel = MeshKernel::new();
        let sphere = SceneObject::primitive(PrimitiveKind::Sphere, Vec3::ZERO);
        assert!(!sphere.mesh(&kernel).unwrap().is_empty());

        let extruded = extruded_object(&kernel);
        let (min, max) = extruded.mesh(&kernel).unwrap().bounds().unwrap();
        assert_relative_eq!(max[1] - min[1], 3.0);

        let mut orphan = extruded.clone();
        orphan.solid = None;
        assert!(orphan.mesh(&kernel).is_err());
    }

    #[test]
    fn test_transform_matrix() {
        let transform = Transform {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Vec3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0),
            scale: Vec3::splat(2.0),
        };
        let p = transform.matrix().transform_point3(Vec3::X);
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 2.0, epsilon = 1e-5);
        assert_relative_eq!(p.z, 1.0, epsilon = 1e-5);
    }
}
