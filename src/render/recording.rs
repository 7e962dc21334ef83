//! Headless backend that records every command instead of drawing.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::error::BackendError;
use crate::tessellation::VertexData;

use super::backend::{BufferId, ProgramId, ProgramSource, RenderBackend, TextureId, UniformValue};
use super::texture::TextureImage;

/// One command received by a [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreateBuffer { buffer: BufferId, vertex_count: usize },
    DeleteBuffer(BufferId),
    CreateProgram(ProgramId),
    DeleteProgram(ProgramId),
    CreateTexture { texture: TextureId, width: usize, height: usize },
    DeleteTexture(TextureId),
    BeginFrame([f32; 4]),
    UseProgram(ProgramId),
    SetUniform { name: String, value: UniformValue },
    DrawStrip { buffer: BufferId, first: usize, count: usize },
}

/// A backend without a GPU, for tests and headless runs.
///
/// Keeps uploaded vertex data and the latest uniform values of each
/// program so callers can inspect what a real backend would have received.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    next_handle: u32,
    commands: Vec<Command>,
    buffers: HashMap<BufferId, Vec<VertexData>>,
    programs: HashMap<ProgramId, HashMap<String, UniformValue>>,
    textures: HashMap<TextureId, TextureImage>,
    current: Option<ProgramId>,
    invalid_releases: usize,
    fail_programs: bool,
}

impl RecordingBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend whose program creation always fails to compile.
    #[must_use]
    pub fn with_failing_programs() -> Self {
        Self {
            fail_programs: true,
            ..Self::default()
        }
    }

    /// All commands received so far, in order.
    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Forgets recorded commands; resources stay alive.
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Draw commands received so far.
    pub fn draws(&self) -> impl Iterator<Item = (BufferId, usize, usize)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            Command::DrawStrip {
                buffer,
                first,
                count,
            } => Some((*buffer, *first, *count)),
            _ => None,
        })
    }

    /// Vertex data of a live buffer.
    #[must_use]
    pub fn buffer(&self, buffer: BufferId) -> Option<&[VertexData]> {
        self.buffers.get(&buffer).map(Vec::as_slice)
    }

    /// Image of a live texture.
    #[must_use]
    pub fn texture(&self, texture: TextureId) -> Option<&TextureImage> {
        self.textures.get(&texture)
    }

    /// Latest value set for `name` on `program`.
    #[must_use]
    pub fn uniform(&self, program: ProgramId, name: &str) -> Option<UniformValue> {
        self.programs.get(&program)?.get(name).copied()
    }

    /// Number of buffers, programs and textures not yet released.
    #[must_use]
    pub fn live_resources(&self) -> usize {
        self.buffers.len() + self.programs.len() + self.textures.len()
    }

    /// Number of deletes of unknown or already released handles.
    #[must_use]
    pub fn invalid_releases(&self) -> usize {
        self.invalid_releases
    }

    fn next_handle(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl RenderBackend for RecordingBackend {
    fn create_vertex_buffer(&mut self, vertices: &[VertexData]) -> Result<BufferId, BackendError> {
        if vertices.is_empty() {
            return Err(BackendError::BufferAllocation("empty vertex buffer".into()));
        }
        let buffer = BufferId(self.next_handle());
        self.buffers.insert(buffer, vertices.to_vec());
        self.commands.push(Command::CreateBuffer {
            buffer,
            vertex_count: vertices.len(),
        });
        debug!(?buffer, vertices = vertices.len(), "created vertex buffer");
        Ok(buffer)
    }

    fn delete_vertex_buffer(&mut self, buffer: BufferId) {
        if self.buffers.remove(&buffer).is_none() {
            self.invalid_releases += 1;
        }
        self.commands.push(Command::DeleteBuffer(buffer));
    }

    fn create_program(&mut self, source: &ProgramSource) -> Result<ProgramId, BackendError> {
        if self.fail_programs {
            return Err(BackendError::ProgramCompile("compilation disabled".into()));
        }
        for (stage, text) in [("vertex", source.vertex), ("fragment", source.fragment)] {
            if !text.contains("void main") {
                return Err(BackendError::ProgramCompile(format!(
                    "{stage} stage has no entry point"
                )));
            }
        }
        if !source.fragment.contains(source.output) {
            return Err(BackendError::ProgramLink(format!(
                "fragment output `{}` is not declared",
                source.output
            )));
        }
        let program = ProgramId(self.next_handle());
        self.programs.insert(program, HashMap::new());
        self.commands.push(Command::CreateProgram(program));
        debug!(?program, "created program");
        Ok(program)
    }

    fn delete_program(&mut self, program: ProgramId) {
        if self.programs.remove(&program).is_none() {
            self.invalid_releases += 1;
        }
        if self.current == Some(program) {
            self.current = None;
        }
        self.commands.push(Command::DeleteProgram(program));
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
        let texture = TextureId(self.next_handle());
        self.textures.insert(texture, image.clone());
        self.commands.push(Command::CreateTexture {
            texture,
            width: image.width,
            height: image.height,
        });
        debug!(?texture, image.width, image.height, "created texture");
        Ok(texture)
    }

    fn delete_texture(&mut self, texture: TextureId) {
        if self.textures.remove(&texture).is_none() {
            self.invalid_releases += 1;
        }
        self.commands.push(Command::DeleteTexture(texture));
    }

    fn begin_frame(&mut self, clear_color: [f32; 4]) {
        self.commands.push(Command::BeginFrame(clear_color));
    }

    fn use_program(&mut self, program: ProgramId) {
        self.current = Some(program);
        self.commands.push(Command::UseProgram(program));
    }

    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        if let Some(uniforms) = self.current.and_then(|p| self.programs.get_mut(&p)) {
            uniforms.insert(name.to_owned(), value);
        } else {
            trace!(name, "uniform set without a current program");
        }
        self.commands.push(Command::SetUniform {
            name: name.to_owned(),
            value,
        });
    }

    fn draw_triangle_strip(&mut self, buffer: BufferId, first: usize, count: usize) {
        self.commands.push(Command::DrawStrip {
            buffer,
            first,
            count,
        });
    }
}
