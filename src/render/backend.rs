use crate::error::BackendError;
use crate::tessellation::VertexData;

use super::texture::TextureImage;

/// Handle to a vertex buffer owned by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub u32);

/// Handle to a linked shading program owned by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramId(pub u32);

/// Handle to a 2D texture owned by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Program text handed verbatim to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramSource {
    /// Vertex stage source.
    pub vertex: &'static str,
    /// Fragment stage source.
    pub fragment: &'static str,
    /// Name of the fragment output bound to the color attachment.
    pub output: &'static str,
}

/// A value for a named uniform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    /// Column-major 4x4 matrix.
    Mat4([f32; 16]),
    /// A texture bound to a sampler unit.
    Sampler { texture: TextureId, unit: u32 },
}

/// A rendering backend: owns GPU resources and executes draw commands.
///
/// Resource creation failures are fatal to scene construction and are
/// never retried. Deleting a handle releases the resource; every handle
/// must be deleted exactly once.
pub trait RenderBackend {
    /// Uploads vertices into a new static vertex buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer cannot be allocated.
    fn create_vertex_buffer(&mut self, vertices: &[VertexData]) -> Result<BufferId, BackendError>;

    /// Releases a vertex buffer.
    fn delete_vertex_buffer(&mut self, buffer: BufferId);

    /// Compiles and links a shading program.
    ///
    /// # Errors
    ///
    /// Returns an error if a stage fails to compile or the program fails to link.
    fn create_program(&mut self, source: &ProgramSource) -> Result<ProgramId, BackendError>;

    /// Releases a shading program.
    fn delete_program(&mut self, program: ProgramId);

    /// Uploads a 2D texture.
    ///
    /// # Errors
    ///
    /// Returns an error if the texture cannot be created.
    fn create_texture(&mut self, image: &TextureImage) -> Result<TextureId, BackendError>;

    /// Releases a texture.
    fn delete_texture(&mut self, texture: TextureId);

    /// Clears color and depth and enables depth testing for a new frame.
    fn begin_frame(&mut self, clear_color: [f32; 4]);

    /// Makes `program` current for subsequent uniforms and draws.
    fn use_program(&mut self, program: ProgramId);

    /// Sets a uniform of the current program. Unknown names are ignored.
    fn set_uniform(&mut self, name: &str, value: UniformValue);

    /// Draws `count` vertices starting at `first` as one triangle strip.
    fn draw_triangle_strip(&mut self, buffer: BufferId, first: usize, count: usize);
}
