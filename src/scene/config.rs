use crate::tessellation::TessellationParams;

/// Parameters for building and running a scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneConfig {
    /// Viewport width in pixels.
    pub window_width: u32,
    /// Viewport height in pixels.
    pub window_height: u32,
    /// Resolution used for every mesh.
    pub tessellation: TessellationParams,
    /// Longest animation sub-step, in seconds.
    pub max_step: f64,
    /// Background color.
    pub clear_color: [f32; 4],
}

impl SceneConfig {
    /// Viewport width over height.
    #[must_use]
    pub fn aspect(&self) -> f64 {
        f64::from(self.window_width) / f64::from(self.window_height)
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            window_width: 600,
            window_height: 600,
            tessellation: TessellationParams::default(),
            max_step: 0.1,
            clear_color: [0.5, 0.5, 0.8, 1.0],
        }
    }
}
