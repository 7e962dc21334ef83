use thiserror::Error;

/// Top-level error type for the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Tessellation(#[from] TessellationError),
}

/// Errors reported by a rendering backend while acquiring GPU resources.
///
/// None of these are retried: the scene cannot render without the resource.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("shader program failed to compile: {0}")]
    ProgramCompile(String),

    #[error("shader program failed to link: {0}")]
    ProgramLink(String),

    #[error("vertex buffer allocation failed: {0}")]
    BufferAllocation(String),

    #[error("texture creation failed: {0}")]
    TextureCreation(String),
}

/// Errors related to the resource registry.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("resource not found: {0}")]
    NotFound(&'static str),
}

/// Errors related to scene assembly.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("scene supports at most {max} lights, got {count}")]
    TooManyLights { count: usize, max: usize },

    #[error("shading model requires at least one light")]
    NoLights,

    #[error("shading model samples a texture but none was bound")]
    MissingTexture,

    #[error("texture size must be non-zero, got {width}x{height}")]
    EmptyTexture { width: usize, height: usize },
}

/// Errors related to tessellation.
#[derive(Debug, Error)]
pub enum TessellationError {
    #[error("invalid tessellation parameters: {0}")]
    InvalidParameters(String),
}

/// Convenience type alias for results using [`EngineError`].
pub type Result<T> = std::result::Result<T, EngineError>;
