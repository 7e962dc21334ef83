use crate::math::transform::{look_at, perspective};
use crate::math::{Matrix4, Point3, Vector3};

/// A perspective camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Eye position in world space.
    pub eye: Point3,
    /// Point the camera looks at.
    pub lookat: Point3,
    /// Approximate up direction.
    pub up: Vector3,
    /// Vertical field of view in radians.
    pub fov: f64,
    /// Viewport width over height.
    pub aspect: f64,
    /// Distance of the near clipping plane.
    pub near: f64,
    /// Distance of the far clipping plane.
    pub far: f64,
}

impl Camera {
    /// Creates a camera with a 75 degree field of view and clipping planes at 1 and 100.
    #[must_use]
    pub fn new(eye: Point3, lookat: Point3, up: Vector3, aspect: f64) -> Self {
        Self {
            eye,
            lookat,
            up,
            fov: 75f64.to_radians(),
            aspect,
            near: 1.0,
            far: 100.0,
        }
    }

    /// World-to-camera matrix.
    #[must_use]
    pub fn view(&self) -> Matrix4 {
        look_at(&self.eye, &self.lookat, &self.up)
    }

    /// Camera-to-clip matrix.
    #[must_use]
    pub fn projection(&self) -> Matrix4 {
        perspective(self.fov, self.aspect, self.near, self.far)
    }
}
