use crate::math::transform::{rotation_matrix, scale_matrix, translation_matrix};
use crate::math::{Matrix4, Vector3};

use super::registry::{MaterialId, MeshId, ShaderId, TextureKey};

slotmap::new_key_type! {
    /// Key of an object in a scene.
    pub struct ObjectId;
}

/// Scale, axis-angle rotation and translation, applied in that order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectTransform {
    pub scale: Vector3,
    pub rotation_axis: Vector3,
    /// Rotation angle in radians.
    pub rotation_angle: f64,
    pub translation: Vector3,
}

impl Default for ObjectTransform {
    fn default() -> Self {
        Self {
            scale: Vector3::new(1.0, 1.0, 1.0),
            rotation_axis: Vector3::y(),
            rotation_angle: 0.0,
            translation: Vector3::zeros(),
        }
    }
}

impl ObjectTransform {
    /// Identity transform with the given scale.
    #[must_use]
    pub fn scaled(scale: Vector3) -> Self {
        Self {
            scale,
            ..Self::default()
        }
    }

    /// Model-to-world matrix `T * R * S`.
    #[must_use]
    pub fn model(&self) -> Matrix4 {
        translation_matrix(&self.translation)
            * rotation_matrix(&self.rotation_axis, self.rotation_angle)
            * scale_matrix(&self.scale)
    }

    /// World-to-model matrix `S⁻¹ * R(-angle) * T(-translation)`.
    ///
    /// A zero scale component yields non-finite entries.
    #[must_use]
    pub fn inverse(&self) -> Matrix4 {
        let inv_scale = self.scale.map(|s| 1.0 / s);
        scale_matrix(&inv_scale)
            * rotation_matrix(&self.rotation_axis, -self.rotation_angle)
            * translation_matrix(&-self.translation)
    }
}

/// One drawable instance: shared resources plus a local transform.
#[derive(Debug, Clone, Copy)]
pub struct Object {
    pub mesh: MeshId,
    pub material: MaterialId,
    pub texture: Option<TextureKey>,
    pub shader: ShaderId,
    pub transform: ObjectTransform,
}
