//! Homogeneous 4x4 matrix builders.
//!
//! All matrices use the column-vector convention: a point `p` is mapped as
//! `M * p`, so a chain "first A, then B" is written `B * A`.

use nalgebra::Unit;

use super::{Matrix4, Point3, Vector3, Vector4, TOLERANCE};

/// Builds a non-uniform scale matrix.
#[must_use]
pub fn scale_matrix(scale: &Vector3) -> Matrix4 {
    Matrix4::new_nonuniform_scaling(scale)
}

/// Builds a translation matrix.
#[must_use]
pub fn translation_matrix(offset: &Vector3) -> Matrix4 {
    Matrix4::new_translation(offset)
}

/// Builds a rotation matrix around an axis through the origin (Rodrigues).
///
/// The axis does not need to be normalized. A zero-length axis yields the
/// identity, since it defines no rotation.
#[must_use]
#[allow(clippy::many_single_char_names)]
pub fn rotation_matrix(axis: &Vector3, angle: f64) -> Matrix4 {
    let Some(axis) = Unit::try_new(*axis, TOLERANCE) else {
        return Matrix4::identity();
    };
    let c = angle.cos();
    let s = angle.sin();
    let t = 1.0 - c;
    let (x, y, z) = (axis.x, axis.y, axis.z);

    #[rustfmt::skip]
    let m = Matrix4::new(
        t * x * x + c,     t * x * y - s * z, t * x * z + s * y, 0.0,
        t * x * y + s * z, t * y * y + c,     t * y * z - s * x, 0.0,
        t * x * z - s * y, t * y * z + s * x, t * z * z + c,     0.0,
        0.0,               0.0,               0.0,               1.0,
    );
    m
}

/// Builds a view matrix from an eye position, a target and an up hint.
///
/// The camera looks down its local `-w` axis, where `w = normalize(eye - lookat)`.
#[must_use]
pub fn look_at(eye: &Point3, lookat: &Point3, up: &Vector3) -> Matrix4 {
    let w = (eye - lookat).normalize();
    let u = up.cross(&w).normalize();
    let v = w.cross(&u);

    #[rustfmt::skip]
    let basis = Matrix4::new(
        u.x, u.y, u.z, 0.0,
        v.x, v.y, v.z, 0.0,
        w.x, w.y, w.z, 0.0,
        0.0, 0.0, 0.0, 1.0,
    );
    basis * translation_matrix(&(-eye.coords))
}

/// Builds a symmetric perspective projection matrix.
///
/// * `fov` - Vertical field of view in radians
/// * `aspect` - Width over height
/// * `near`, `far` - Positive distances of the clipping planes
#[must_use]
pub fn perspective(fov: f64, aspect: f64, near: f64, far: f64) -> Matrix4 {
    let f = 1.0 / (fov / 2.0).tan();
    let depth = far - near;

    #[rustfmt::skip]
    let m = Matrix4::new(
        f / aspect, 0.0, 0.0,                   0.0,
        0.0,        f,   0.0,                   0.0,
        0.0,        0.0, -(near + far) / depth, -2.0 * near * far / depth,
        0.0,        0.0, -1.0,                  0.0,
    );
    m
}

/// Transforms a point by a 4x4 matrix (homogeneous coordinates).
#[must_use]
pub fn transform_point(matrix: &Matrix4, point: &Point3) -> Point3 {
    let v = matrix * Vector4::new(point.x, point.y, point.z, 1.0);
    Point3::new(v.x, v.y, v.z)
}

/// Transforms a direction vector by a 4x4 matrix (ignoring translation).
#[must_use]
pub fn transform_direction(matrix: &Matrix4, dir: &Vector3) -> Vector3 {
    let v = matrix * Vector4::new(dir.x, dir.y, dir.z, 0.0);
    Vector3::new(v.x, v.y, v.z)
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn rotate_90_around_z() {
        let m = rotation_matrix(&Vector3::z(), FRAC_PI_2);
        let p = transform_point(&m, &Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p, Point3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn rotation_axis_is_normalized() {
        let a = rotation_matrix(&Vector3::new(0.0, 3.0, 0.0), 0.7);
        let b = rotation_matrix(&Vector3::y(), 0.7);
        assert_relative_eq!(a, b, epsilon = 1e-12);
    }

    #[test]
    fn zero_axis_is_identity() {
        let m = rotation_matrix(&Vector3::zeros(), 1.0);
        assert_eq!(m, Matrix4::identity());
    }

    #[test]
    fn opposite_angles_cancel() {
        let axis = Vector3::new(0.3, 1.0, 0.3);
        let m = rotation_matrix(&axis, 1.2) * rotation_matrix(&axis, -1.2);
        assert_relative_eq!(m, Matrix4::identity(), epsilon = 1e-12);
    }

    #[test]
    fn directions_ignore_translation() {
        let m = translation_matrix(&Vector3::new(5.0, -2.0, 1.0));
        let d = transform_direction(&m, &Vector3::x());
        assert_relative_eq!(d, Vector3::x());
    }

    #[test]
    fn look_at_maps_eye_to_origin_and_target_to_negative_z() {
        let eye = Point3::new(0.0, 0.0, 10.0);
        let view = look_at(&eye, &Point3::origin(), &Vector3::y());
        assert_relative_eq!(transform_point(&view, &eye), Point3::origin(), epsilon = 1e-12);
        let target = transform_point(&view, &Point3::origin());
        assert_relative_eq!(target, Point3::new(0.0, 0.0, -10.0), epsilon = 1e-12);
    }

    #[test]
    fn perspective_maps_near_and_far_planes_to_ndc_bounds() {
        let p = perspective(75f64.to_radians(), 1.0, 1.0, 100.0);
        let near = p * Vector4::new(0.0, 0.0, -1.0, 1.0);
        let far = p * Vector4::new(0.0, 0.0, -100.0, 1.0);
        assert_relative_eq!(near.z / near.w, -1.0, epsilon = 1e-12);
        assert_relative_eq!(far.z / far.w, 1.0, epsilon = 1e-12);
    }
}
