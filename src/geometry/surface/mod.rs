mod boy;
mod cylinder;
mod cylinder_cap;
mod dini;
mod klein;
mod mobius;
mod paraboloid;
mod plane;
mod sphere;
mod torus;
mod tractricoid;

pub use boy::Boy;
pub use cylinder::Cylinder;
pub use cylinder_cap::CylinderCap;
pub use dini::Dini;
pub use klein::Klein;
pub use mobius::Mobius;
pub use paraboloid::Paraboloid;
pub use plane::Plane;
pub use sphere::Sphere;
pub use torus::Torus;
pub use tractricoid::Tractricoid;

use crate::math::{Dual2, Point3, Vector3};
use crate::tessellation::VertexData;

/// A parametric surface over the unit parameter square.
///
/// Implementors only provide [`eval`](ParamSurface::eval), written with
/// dual-number arithmetic; positions, tangents and normals then come out
/// analytically exact. Any rescaling of `(u, v)` (e.g. `u * 2π` for a full
/// revolution) happens inside `eval`.
pub trait ParamSurface {
    /// Maps the seeded parameters `(U, V)` to the coordinates `[X, Y, Z]`.
    fn eval(&self, u: Dual2, v: Dual2) -> [Dual2; 3];

    /// Evaluates the surface at `(u, v)` with both parameters seeded.
    fn evaluate(&self, u: f64, v: f64) -> [Dual2; 3] {
        self.eval(Dual2::u(u), Dual2::v(v))
    }

    /// Returns the surface point at `(u, v)`.
    fn position(&self, u: f64, v: f64) -> Point3 {
        let [x, y, z] = self.evaluate(u, v);
        Point3::new(x.f, y.f, z.f)
    }

    /// Returns the tangents `(dr/du, dr/dv)` at `(u, v)`.
    fn tangents(&self, u: f64, v: f64) -> (Vector3, Vector3) {
        let [x, y, z] = self.evaluate(u, v);
        (
            Vector3::new(x.d.x, y.d.x, z.d.x),
            Vector3::new(x.d.y, y.d.y, z.d.y),
        )
    }

    /// Returns the unnormalized normal `dr/du x dr/dv` at `(u, v)`.
    ///
    /// Zero where the tangents are parallel (e.g. at the poles of a sphere).
    fn normal(&self, u: f64, v: f64) -> Vector3 {
        let (du, dv) = self.tangents(u, v);
        du.cross(&dv)
    }

    /// Builds the vertex at `(u, v)`; the texture coordinate is `(u, v)`.
    #[allow(clippy::cast_possible_truncation)]
    fn vertex(&self, u: f64, v: f64) -> VertexData {
        let [x, y, z] = self.evaluate(u, v);
        let du = Vector3::new(x.d.x, y.d.x, z.d.x);
        let dv = Vector3::new(x.d.y, y.d.y, z.d.y);
        let n = du.cross(&dv);
        VertexData {
            position: [x.f as f32, y.f as f32, z.f as f32],
            normal: [n.x as f32, n.y as f32, n.z as f32],
            texcoord: [u as f32, v as f32],
        }
    }
}

/// Names every surface in the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    Sphere,
    Cylinder,
    Plane,
    Paraboloid,
    CylinderCap,
    Torus,
    Mobius,
    Klein,
    Boy,
    Dini,
    Tractricoid,
}

impl SurfaceKind {
    /// Every surface kind, in declaration order.
    pub const ALL: [SurfaceKind; 11] = [
        Self::Sphere,
        Self::Cylinder,
        Self::Plane,
        Self::Paraboloid,
        Self::CylinderCap,
        Self::Torus,
        Self::Mobius,
        Self::Klein,
        Self::Boy,
        Self::Dini,
        Self::Tractricoid,
    ];

    /// Creates the surface with its default parameters.
    #[must_use]
    pub fn surface(self) -> Box<dyn ParamSurface> {
        match self {
            Self::Sphere => Box::new(Sphere),
            Self::Cylinder => Box::new(Cylinder),
            Self::Plane => Box::new(Plane),
            Self::Paraboloid => Box::new(Paraboloid),
            Self::CylinderCap => Box::new(CylinderCap),
            Self::Torus => Box::new(Torus::default()),
            Self::Mobius => Box::new(Mobius::default()),
            Self::Klein => Box::new(Klein),
            Self::Boy => Box::new(Boy),
            Self::Dini => Box::new(Dini::default()),
            Self::Tractricoid => Box::new(Tractricoid::default()),
        }
    }

    /// Human-readable name, used in logs.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Sphere => "sphere",
            Self::Cylinder => "cylinder",
            Self::Plane => "plane",
            Self::Paraboloid => "paraboloid",
            Self::CylinderCap => "cylinder cap",
            Self::Torus => "torus",
            Self::Mobius => "mobius",
            Self::Klein => "klein",
            Self::Boy => "boy",
            Self::Dini => "dini",
            Self::Tractricoid => "tractricoid",
        }
    }
}
