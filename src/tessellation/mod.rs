mod tessellate_surface;

pub use tessellate_surface::TessellateSurface;

use std::ops::Range;

use bytemuck::{Pod, Zeroable};

use crate::math::{Point3, Vector3};

/// Parameters controlling tessellation resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TessellationParams {
    /// Number of triangle strips (samples along `v`).
    pub rows: usize,
    /// Number of quads per strip (samples along `u`).
    pub cols: usize,
}

impl TessellationParams {
    /// Creates parameters with an explicit resolution.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }
}

impl Default for TessellationParams {
    fn default() -> Self {
        Self { rows: 20, cols: 20 }
    }
}

/// One vertex as laid out in the vertex buffer.
///
/// The normal is the raw cross product of the surface tangents and is left
/// unnormalized; shading normalizes it after transformation.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct VertexData {
    /// Position in modeling space.
    pub position: [f32; 3],
    /// Unnormalized normal in modeling space.
    pub normal: [f32; 3],
    /// Surface parameters `(u, v)`.
    pub texcoord: [f32; 2],
}

impl VertexData {
    /// Byte offset of `position` inside the vertex (attribute 0).
    pub const POSITION_OFFSET: usize = 0;
    /// Byte offset of `normal` inside the vertex (attribute 1).
    pub const NORMAL_OFFSET: usize = 12;
    /// Byte offset of `texcoord` inside the vertex (attribute 2).
    pub const TEXCOORD_OFFSET: usize = 24;
    /// Size of one vertex in bytes.
    pub const STRIDE: usize = std::mem::size_of::<Self>();

    /// Returns the position as a point.
    #[must_use]
    pub fn position(&self) -> Point3 {
        let [x, y, z] = self.position;
        Point3::new(f64::from(x), f64::from(y), f64::from(z))
    }

    /// Returns the unnormalized normal.
    #[must_use]
    pub fn normal(&self) -> Vector3 {
        let [x, y, z] = self.normal;
        Vector3::new(f64::from(x), f64::from(y), f64::from(z))
    }
}

/// A surface mesh stored as consecutive triangle strips of equal length.
///
/// Adjacent strips share their boundary only through duplicated vertices;
/// there is no index buffer.
#[derive(Debug, Clone, Default)]
pub struct StripMesh {
    /// Vertices of all strips, strip after strip.
    pub vertices: Vec<VertexData>,
    /// Number of strips.
    pub strip_count: usize,
    /// Number of vertices in each strip.
    pub vertices_per_strip: usize,
}

impl StripMesh {
    /// Total number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the vertex range of each strip, one draw call per range.
    pub fn strips(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        (0..self.strip_count).map(move |i| {
            let first = i * self.vertices_per_strip;
            first..first + self.vertices_per_strip
        })
    }

    /// Returns the vertices of strip `index`, or `None` if out of range.
    #[must_use]
    pub fn strip(&self, index: usize) -> Option<&[VertexData]> {
        if index >= self.strip_count {
            return None;
        }
        let first = index * self.vertices_per_strip;
        self.vertices.get(first..first + self.vertices_per_strip)
    }

    /// Counts vertices whose normal is zero (surface singularities).
    #[must_use]
    pub fn degenerate_normal_count(&self) -> usize {
        self.vertices
            .iter()
            .filter(|v| v.normal.iter().all(|c| *c == 0.0))
            .count()
    }
}
