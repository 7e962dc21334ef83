use crate::math::{Matrix4, Point3};

use super::backend::TextureId;
use super::camera::Camera;
use super::material::{Light, Material};

/// Everything a shading model needs to draw one object.
///
/// Matrices use the column-vector convention: a model-space point `p` lands
/// in clip space as `mvp * p`, with `mvp = p * v * m`.
#[derive(Debug, Clone, Copy)]
pub struct RenderState<'a> {
    /// Model-view-projection matrix.
    pub mvp: Matrix4,
    /// Model-to-world matrix.
    pub m: Matrix4,
    /// Inverse of `m`.
    pub m_inv: Matrix4,
    /// World-to-camera matrix.
    pub v: Matrix4,
    /// Camera-to-clip matrix.
    pub p: Matrix4,
    /// Eye position in world space.
    pub eye: Point3,
    /// Scene lights, in order.
    pub lights: &'a [Light],
    /// Material of the object being drawn.
    pub material: &'a Material,
    /// Diffuse texture, if the object has one.
    pub texture: Option<TextureId>,
}

impl<'a> RenderState<'a> {
    /// Builds the state for an object with model matrix `m` and its inverse.
    #[must_use]
    pub fn new(
        camera: &Camera,
        m: Matrix4,
        m_inv: Matrix4,
        lights: &'a [Light],
        material: &'a Material,
        texture: Option<TextureId>,
    ) -> Self {
        let v = camera.view();
        let p = camera.projection();
        Self {
            mvp: p * v * m,
            m,
            m_inv,
            v,
            p,
            eye: camera.eye,
            lights,
            material,
            texture,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::math::transform::translation_matrix;
    use crate::math::{Vector3, Vector4};

    #[test]
    fn mvp_composes_model_view_projection() {
        let camera = Camera::new(
            Point3::new(0.0, 0.0, 10.0),
            Point3::origin(),
            Vector3::y(),
            1.0,
        );
        let m = translation_matrix(&Vector3::new(0.0, 0.0, -2.0));
        let m_inv = translation_matrix(&Vector3::new(0.0, 0.0, 2.0));
        let material = crate::render::Material::new(
            Vector3::zeros(),
            Vector3::zeros(),
            Vector3::zeros(),
            1.0,
        );
        let state = RenderState::new(&camera, m, m_inv, &[], &material, None);
        let p = Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(state.mvp * p, state.p * (state.v * (state.m * p)), epsilon = 1e-12);
        assert_relative_eq!(state.m * state.m_inv, Matrix4::identity(), epsilon = 1e-12);
        assert_eq!(state.eye, camera.eye);
    }
}
