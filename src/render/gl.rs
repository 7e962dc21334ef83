//! OpenGL backend on top of `glow`.

use std::collections::HashMap;

use glow::HasContext;
use tracing::{debug, warn};

use crate::error::BackendError;
use crate::tessellation::VertexData;

use super::backend::{BufferId, ProgramId, ProgramSource, RenderBackend, TextureId, UniformValue};
use super::texture::{TextureFilter, TextureImage};

struct GlBuffer {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
}

/// A [`RenderBackend`] drawing through an OpenGL 3.3 context.
pub struct GlBackend {
    gl: glow::Context,
    next_handle: u32,
    buffers: HashMap<BufferId, GlBuffer>,
    programs: HashMap<ProgramId, glow::Program>,
    textures: HashMap<TextureId, glow::Texture>,
    current: Option<glow::Program>,
}

impl GlBackend {
    /// Wraps a GL context.
    ///
    /// # Safety
    ///
    /// The context must stay current on the calling thread for as long as
    /// the backend is used.
    #[must_use]
    pub unsafe fn new(gl: glow::Context) -> Self {
        Self {
            gl,
            next_handle: 0,
            buffers: HashMap::new(),
            programs: HashMap::new(),
            textures: HashMap::new(),
            current: None,
        }
    }

    /// The wrapped context.
    #[must_use]
    pub fn context(&self) -> &glow::Context {
        &self.gl
    }

    fn next_handle(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }

    unsafe fn compile_stage(&self, stage: u32, source: &str) -> Result<glow::Shader, BackendError> {
        unsafe {
            let shader = self
                .gl
                .create_shader(stage)
                .map_err(BackendError::ProgramCompile)?;
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);
            if !self.gl.get_shader_compile_status(shader) {
                let log = self.gl.get_shader_info_log(shader);
                self.gl.delete_shader(shader);
                return Err(BackendError::ProgramCompile(log));
            }
            Ok(shader)
        }
    }
}

fn texture_extent(value: usize) -> Result<i32, BackendError> {
    i32::try_from(value).map_err(|_| BackendError::TextureCreation(format!("extent {value} out of range")))
}

impl RenderBackend for GlBackend {
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn create_vertex_buffer(&mut self, vertices: &[VertexData]) -> Result<BufferId, BackendError> {
        if vertices.is_empty() {
            return Err(BackendError::BufferAllocation("empty vertex buffer".into()));
        }
        // SAFETY: the context is current per the contract of `GlBackend::new`.
        let buffer = unsafe {
            let vao = self
                .gl
                .create_vertex_array()
                .map_err(BackendError::BufferAllocation)?;
            self.gl.bind_vertex_array(Some(vao));
            let vbo = match self.gl.create_buffer() {
                Ok(vbo) => vbo,
                Err(e) => {
                    self.gl.delete_vertex_array(vao);
                    return Err(BackendError::BufferAllocation(e));
                }
            };
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            self.gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(vertices),
                glow::STATIC_DRAW,
            );

            let stride = VertexData::STRIDE as i32;
            for (index, size, offset) in [
                (0, 3, VertexData::POSITION_OFFSET),
                (1, 3, VertexData::NORMAL_OFFSET),
                (2, 2, VertexData::TEXCOORD_OFFSET),
            ] {
                self.gl.enable_vertex_attrib_array(index);
                self.gl
                    .vertex_attrib_pointer_f32(index, size, glow::FLOAT, false, stride, offset as i32);
            }
            self.gl.bind_vertex_array(None);
            GlBuffer { vao, vbo }
        };

        let id = BufferId(self.next_handle());
        self.buffers.insert(id, buffer);
        debug!(buffer = ?id, vertices = vertices.len(), "created vertex buffer");
        Ok(id)
    }

    fn delete_vertex_buffer(&mut self, buffer: BufferId) {
        let Some(GlBuffer { vao, vbo }) = self.buffers.remove(&buffer) else {
            warn!(?buffer, "delete of unknown vertex buffer");
            return;
        };
        // SAFETY: the context is current per the contract of `GlBackend::new`.
        unsafe {
            self.gl.delete_buffer(vbo);
            self.gl.delete_vertex_array(vao);
        }
    }

    fn create_program(&mut self, source: &ProgramSource) -> Result<ProgramId, BackendError> {
        // SAFETY: the context is current per the contract of `GlBackend::new`.
        let program = unsafe {
            let vertex = self.compile_stage(glow::VERTEX_SHADER, source.vertex)?;
            let fragment = match self.compile_stage(glow::FRAGMENT_SHADER, source.fragment) {
                Ok(fragment) => fragment,
                Err(e) => {
                    self.gl.delete_shader(vertex);
                    return Err(e);
                }
            };
            let program = match self.gl.create_program() {
                Ok(program) => program,
                Err(e) => {
                    self.gl.delete_shader(vertex);
                    self.gl.delete_shader(fragment);
                    return Err(BackendError::ProgramLink(e));
                }
            };
            self.gl.attach_shader(program, vertex);
            self.gl.attach_shader(program, fragment);
            self.gl.bind_frag_data_location(program, 0, source.output);
            self.gl.link_program(program);
            let linked = self.gl.get_program_link_status(program);

            self.gl.detach_shader(program, vertex);
            self.gl.detach_shader(program, fragment);
            self.gl.delete_shader(vertex);
            self.gl.delete_shader(fragment);

            if !linked {
                let log = self.gl.get_program_info_log(program);
                self.gl.delete_program(program);
                return Err(BackendError::ProgramLink(log));
            }
            program
        };

        let id = ProgramId(self.next_handle());
        self.programs.insert(id, program);
        debug!(program = ?id, "linked program");
        Ok(id)
    }

    fn delete_program(&mut self, program: ProgramId) {
        let Some(native) = self.programs.remove(&program) else {
            warn!(?program, "delete of unknown program");
            return;
        };
        if self.current == Some(native) {
            self.current = None;
        }
        // SAFETY: the context is current per the contract of `GlBackend::new`.
        unsafe { self.gl.delete_program(native) };
    }

    fn create_texture(&mut self, image: &TextureImage) -> Result<TextureId, BackendError> {
        if image.pixels.len() != image.width * image.height {
            return Err(BackendError::TextureCreation(format!(
                "{} pixels for a {}x{} image",
                image.pixels.len(),
                image.width,
                image.height
            )));
        }
        let width = texture_extent(image.width)?;
        let height = texture_extent(image.height)?;
        #[allow(clippy::cast_possible_wrap)]
        let filter = match image.filter {
            TextureFilter::Nearest => glow::NEAREST as i32,
            TextureFilter::Linear => glow::LINEAR as i32,
        };

        // SAFETY: the context is current per the contract of `GlBackend::new`.
        #[allow(clippy::cast_possible_wrap)]
        let texture = unsafe {
            let texture = self
                .gl
                .create_texture()
                .map_err(BackendError::TextureCreation)?;
            self.gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA as i32,
                width,
                height,
                0,
                glow::RGBA,
                glow::FLOAT,
                glow::PixelUnpackData::Slice(Some(bytemuck::cast_slice(&image.pixels))),
            );
            self.gl
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, filter);
            self.gl
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, filter);
            texture
        };

        let id = TextureId(self.next_handle());
        self.textures.insert(id, texture);
        debug!(texture = ?id, image.width, image.height, "created texture");
        Ok(id)
    }

    fn delete_texture(&mut self, texture: TextureId) {
        let Some(native) = self.textures.remove(&texture) else {
            warn!(?texture, "delete of unknown texture");
            return;
        };
        // SAFETY: the context is current per the contract of `GlBackend::new`.
        unsafe { self.gl.delete_texture(native) };
    }

    fn begin_frame(&mut self, clear_color: [f32; 4]) {
        let [r, g, b, a] = clear_color;
        // SAFETY: the context is current per the contract of `GlBackend::new`.
        unsafe {
            self.gl.clear_color(r, g, b, a);
            self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
            self.gl.enable(glow::DEPTH_TEST);
            self.gl.disable(glow::CULL_FACE);
        }
    }

    fn use_program(&mut self, program: ProgramId) {
        let native = self.programs.get(&program).copied();
        if native.is_none() {
            warn!(?program, "use of unknown program");
        }
        self.current = native;
        // SAFETY: the context is current per the contract of `GlBackend::new`.
        unsafe { self.gl.use_program(native) };
    }

    #[allow(clippy::cast_possible_wrap)]
    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        let Some(program) = self.current else {
            return;
        };
        // SAFETY: the context is current per the contract of `GlBackend::new`.
        unsafe {
            let Some(location) = self.gl.get_uniform_location(program, name) else {
                return;
            };
            let location = Some(&location);
            match value {
                UniformValue::Int(i) => self.gl.uniform_1_i32(location, i),
                UniformValue::Float(f) => self.gl.uniform_1_f32(location, f),
                UniformValue::Vec3([x, y, z]) => self.gl.uniform_3_f32(location, x, y, z),
                UniformValue::Vec4([x, y, z, w]) => self.gl.uniform_4_f32(location, x, y, z, w),
                UniformValue::Mat4(m) => self.gl.uniform_matrix_4_f32_slice(location, false, &m),
                UniformValue::Sampler { texture, unit } => {
                    let native = self.textures.get(&texture).copied();
                    if native.is_none() {
                        warn!(?texture, "sampler bound to unknown texture");
                    }
                    self.gl.active_texture(glow::TEXTURE0 + unit);
                    self.gl.bind_texture(glow::TEXTURE_2D, native);
                    self.gl.uniform_1_i32(location, unit as i32);
                }
            }
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn draw_triangle_strip(&mut self, buffer: BufferId, first: usize, count: usize) {
        let Some(GlBuffer { vao, .. }) = self.buffers.get(&buffer) else {
            warn!(?buffer, "draw from unknown vertex buffer");
            return;
        };
        // SAFETY: the context is current per the contract of `GlBackend::new`.
        unsafe {
            self.gl.bind_vertex_array(Some(*vao));
            self.gl
                .draw_arrays(glow::TRIANGLE_STRIP, first as i32, count as i32);
        }
    }
}
