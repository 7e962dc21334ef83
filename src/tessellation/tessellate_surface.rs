use tracing::{debug, warn};

use crate::error::{Result, TessellationError};
use crate::geometry::surface::ParamSurface;

use super::{StripMesh, TessellationParams};

/// Samples a parametric surface over the unit square into triangle strips.
///
/// Strip `i` walks `j = 0..=cols`, emitting the vertex at `(j/cols, i/rows)`
/// followed by the one at `(j/cols, (i+1)/rows)`, so each strip is a
/// gap-free row of quads when drawn as a triangle strip.
pub struct TessellateSurface<'a> {
    surface: &'a dyn ParamSurface,
    params: TessellationParams,
}

impl<'a> TessellateSurface<'a> {
    /// Creates a new `TessellateSurface` operation.
    #[must_use]
    pub fn new(surface: &'a dyn ParamSurface, params: TessellationParams) -> Self {
        Self { surface, params }
    }

    /// Executes the tessellation, returning `rows` strips of `2 * (cols + 1)` vertices.
    ///
    /// # Errors
    ///
    /// Returns an error if `rows` or `cols` is zero.
    #[allow(clippy::cast_precision_loss)]
    pub fn execute(&self) -> Result<StripMesh> {
        let TessellationParams { rows, cols } = self.params;
        if rows == 0 || cols == 0 {
            return Err(TessellationError::InvalidParameters(format!(
                "resolution must be at least 1x1, got {rows}x{cols}"
            ))
            .into());
        }

        let vertices_per_strip = (cols + 1) * 2;
        let mut mesh = StripMesh {
            vertices: Vec::with_capacity(rows * vertices_per_strip),
            strip_count: rows,
            vertices_per_strip,
        };

        for i in 0..rows {
            let v0 = i as f64 / rows as f64;
            let v1 = (i + 1) as f64 / rows as f64;
            for j in 0..=cols {
                let u = j as f64 / cols as f64;
                mesh.vertices.push(self.surface.vertex(u, v0));
                mesh.vertices.push(self.surface.vertex(u, v1));
            }
        }

        let non_finite = mesh
            .vertices
            .iter()
            .filter(|v| v.position.iter().any(|c| !c.is_finite()))
            .count();
        if non_finite > 0 {
            warn!(non_finite, "tessellated surface has non-finite positions");
        }
        debug!(
            rows,
            cols,
            vertices = mesh.vertex_count(),
            degenerate_normals = mesh.degenerate_normal_count(),
            "tessellated surface"
        );

        Ok(mesh)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::geometry::surface::{Plane, Sphere, SurfaceKind};

    #[test]
    fn vertex_and_strip_counts() {
        for (rows, cols) in [(1, 1), (1, 5), (3, 2), (20, 20), (7, 13)] {
            let mesh = TessellateSurface::new(&Sphere, TessellationParams::new(rows, cols))
                .execute()
                .unwrap();
            assert_eq!(mesh.vertex_count(), rows * (cols + 1) * 2);
            assert_eq!(mesh.strip_count, rows);
            assert_eq!(mesh.vertices_per_strip, (cols + 1) * 2);
            assert_eq!(mesh.strips().count(), rows);
            assert!(mesh.strips().all(|r| r.len() == (cols + 1) * 2));
        }
    }

    #[test]
    fn default_resolution_is_20_by_20() {
        let mesh = TessellateSurface::new(&Plane, TessellationParams::default())
            .execute()
            .unwrap();
        assert_eq!(mesh.vertex_count(), 20 * 21 * 2);
    }

    #[test]
    fn zero_resolution_is_rejected() {
        assert!(TessellateSurface::new(&Plane, TessellationParams::new(0, 4))
            .execute()
            .is_err());
        assert!(TessellateSurface::new(&Plane, TessellationParams::new(4, 0))
            .execute()
            .is_err());
    }

    #[test]
    fn strips_interleave_adjacent_rows() {
        let mesh = TessellateSurface::new(&Plane, TessellationParams::new(2, 2))
            .execute()
            .unwrap();
        let uv: Vec<[f32; 2]> = mesh.vertices.iter().map(|v| v.texcoord).collect();
        assert_eq!(
            uv,
            vec![
                [0.0, 0.0], [0.0, 0.5], [0.5, 0.0], [0.5, 0.5], [1.0, 0.0], [1.0, 0.5],
                [0.0, 0.5], [0.0, 1.0], [0.5, 0.5], [0.5, 1.0], [1.0, 0.5], [1.0, 1.0],
            ]
        );
    }

    #[test]
    fn adjacent_strips_duplicate_their_shared_edge() {
        let mesh = TessellateSurface::new(&Sphere, TessellationParams::new(4, 6))
            .execute()
            .unwrap();
        let first = mesh.strip(0).unwrap();
        let second = mesh.strip(1).unwrap();
        for j in 0..=6 {
            assert_eq!(first[2 * j + 1], second[2 * j]);
        }
    }

    #[test]
    fn sphere_mesh_stays_on_unit_sphere() {
        let mesh = TessellateSurface::new(&Sphere, TessellationParams::default())
            .execute()
            .unwrap();
        for v in &mesh.vertices {
            assert_abs_diff_eq!(v.position().coords.norm(), 1.0, epsilon = 1e-6);
        }
        // The north pole row (v = 0) has an exactly zero tangent along u.
        let first = mesh.strip(0).unwrap();
        assert!(first.iter().step_by(2).all(|v| v.normal == [0.0; 3]));
        assert!(mesh.degenerate_normal_count() >= 21);
    }

    #[test]
    fn every_library_surface_tessellates() {
        for kind in SurfaceKind::ALL {
            let surface = kind.surface();
            let mesh = TessellateSurface::new(surface.as_ref(), TessellationParams::new(8, 8))
                .execute()
                .unwrap();
            assert_eq!(mesh.vertex_count(), 8 * 9 * 2, "{}", kind.name());
        }
    }
}
