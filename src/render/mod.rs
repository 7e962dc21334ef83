pub mod backend;
pub mod camera;
#[cfg(feature = "glow")]
pub mod gl;
pub mod material;
pub mod recording;
pub mod shading;
pub mod state;
pub mod texture;

pub use backend::{BufferId, ProgramId, ProgramSource, RenderBackend, TextureId, UniformValue};
pub use camera::Camera;
#[cfg(feature = "glow")]
pub use gl::GlBackend;
pub use material::{Light, Material, MAX_LIGHTS};
pub use recording::{Command, RecordingBackend};
pub use shading::{ShadeInput, ShadingModel};
pub use state::RenderState;
pub use texture::{CheckerBoardTexture, TextureFilter, TextureImage};
