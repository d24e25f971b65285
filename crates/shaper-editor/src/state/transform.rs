//! Single-value transform edits

use serde::{Deserialize, Serialize};
use shaper_core::Transform;

/// A transform component editable from the properties panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransformProperty {
    PositionX,
    PositionY,
    PositionZ,
    /// Degrees
    RotationX,
    /// Degrees
    RotationY,
    /// Degrees
    RotationZ,
    /// Uniform scale on all three axes
    Scale,
}

impl TransformProperty {
    /// Get the property name as used in documents and scripts
    pub fn name(&self) -> &'static str {
        match self {
            TransformProperty::PositionX => "positionX",
            TransformProperty::PositionY => "positionY",
            TransformProperty::PositionZ => "positionZ",
            TransformProperty::RotationX => "rotationX",
            TransformProperty::RotationY => "rotationY",
            TransformProperty::RotationZ => "rotationZ",
            TransformProperty::Scale => "scale",
        }
    }

    /// Look up a property by name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().into_iter().find(|p| p.name() == name)
    }

    /// Get all properties
    pub fn all() -> [TransformProperty; 7] {
        [
            TransformProperty::PositionX,
            TransformProperty::PositionY,
            TransformProperty::PositionZ,
            TransformProperty::RotationX,
            TransformProperty::RotationY,
            TransformProperty::RotationZ,
            TransformProperty::Scale,
        ]
    }

    /// Write `value` into the transform
    pub fn apply(&self, transform: &mut Transform, value: f32) {
        match self {
            TransformProperty::PositionX => transform.position.x = value,
            TransformProperty::PositionY => transform.position.y = value,
            TransformProperty::PositionZ => transform.position.z = value,
            TransformProperty::RotationX => transform.rotation.x = value.to_radians(),
            TransformProperty::RotationY => transform.rotation.y = value.to_radians(),
            TransformProperty::RotationZ => transform.rotation.z = value.to_radians(),
            TransformProperty::Scale => transform.scale = glam::Vec3::splat(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::Vec3;

    #[test]
    fn test_rotation_is_converted_to_radians() {
        let mut transform = Transform::default();
        TransformProperty::RotationY.apply(&mut transform, 90.0);
        assert_relative_eq!(transform.rotation.y, std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn test_scale_is_uniform() {
        let mut transform = Transform::default();
        TransformProperty::Scale.apply(&mut transform, 3.0);
        assert_eq!(transform.scale, Vec3::splat(3.0));
    }

    #[test]
    fn test_names_round_trip() {
        for property in TransformProperty::all() {
            assert_eq!(TransformProperty::from_name(property.name()), Some(property));
        }
        assert_eq!(TransformProperty::from_name("shear"), None);
    }
}
