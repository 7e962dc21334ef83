use crate::math::{Vector3, Vector4};

/// Maximum number of lights a shading program accepts.
pub const MAX_LIGHTS: usize = 8;

/// Phong-Blinn reflectance coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Diffuse reflectance.
    pub kd: Vector3,
    /// Specular reflectance.
    pub ks: Vector3,
    /// Ambient reflectance.
    pub ka: Vector3,
    /// Specular exponent.
    pub shininess: f64,
}

impl Material {
    /// Creates a material.
    #[must_use]
    pub fn new(kd: Vector3, ks: Vector3, ka: Vector3, shininess: f64) -> Self {
        Self {
            kd,
            ks,
            ka,
            shininess,
        }
    }
}

/// A point or directional light source.
///
/// `position` is homogeneous: `w = 0` places the light at an ideal point,
/// making it directional; any other `w` makes it positional.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    /// Ambient intensity.
    pub la: Vector3,
    /// Emitted intensity.
    pub le: Vector3,
    /// Homogeneous world-space position.
    pub position: Vector4,
}

impl Light {
    /// Creates a positional light at `position`.
    #[must_use]
    pub fn point(position: Vector3, la: Vector3, le: Vector3) -> Self {
        Self {
            la,
            le,
            position: position.push(1.0),
        }
    }

    /// Creates a directional light shining from `direction` towards the origin.
    #[must_use]
    pub fn directional(direction: Vector3, la: Vector3, le: Vector3) -> Self {
        Self {
            la,
            le,
            position: direction.push(0.0),
        }
    }

    /// Returns `true` for a light at an ideal point.
    #[must_use]
    pub fn is_directional(&self) -> bool {
        self.position.w == 0.0
    }

    /// Unnormalized vector from a homogeneous fragment position to the light.
    ///
    /// `L = light.xyz * frag.w - frag.xyz * light.w`, which is the same
    /// formula for positional and directional lights.
    #[must_use]
    pub fn vector_from(&self, frag: &Vector4) -> Vector3 {
        self.position.xyz() * frag.w - frag.xyz() * self.position.w
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn white() -> Vector3 {
        Vector3::new(1.0, 1.0, 1.0)
    }

    #[test]
    fn directional_light_vector_ignores_fragment_position() {
        let light = Light::directional(Vector3::new(1.0, 2.0, 3.0), white(), white());
        assert!(light.is_directional());
        for frag in [
            Vector4::new(0.0, 0.0, 0.0, 1.0),
            Vector4::new(5.0, -3.0, 2.0, 1.0),
            Vector4::new(-10.0, 7.5, 0.25, 1.0),
        ] {
            assert_relative_eq!(light.vector_from(&frag), Vector3::new(1.0, 2.0, 3.0));
        }
    }

    #[test]
    fn point_light_vector_is_difference() {
        let light = Light::point(Vector3::new(0.0, 0.0, 5.0), white(), white());
        assert!(!light.is_directional());
        let frag = Vector4::new(1.0, 2.0, 1.0, 1.0);
        assert_relative_eq!(light.vector_from(&frag), Vector3::new(-1.0, -2.0, 4.0));
    }
}
