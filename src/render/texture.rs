use crate::error::SceneError;

/// Sampling filter for a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFilter {
    Nearest,
    Linear,
}

/// An RGBA float image ready for upload to a rendering backend.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
    /// Row-major pixels, `pixels[y * width + x]`.
    pub pixels: Vec<[f32; 4]>,
    /// Minification and magnification filter.
    pub filter: TextureFilter,
}

impl TextureImage {
    /// Returns the pixel at `(x, y)`, or `None` outside the image.
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> Option<[f32; 4]> {
        if x >= self.width {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }
}

/// A procedural checkerboard of yellow and blue texels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckerBoardTexture {
    width: usize,
    height: usize,
}

impl CheckerBoardTexture {
    /// Texel color where `x + y` is odd.
    pub const YELLOW: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
    /// Texel color where `x + y` is even.
    pub const BLUE: [f32; 4] = [0.0, 0.0, 1.0, 1.0];

    /// Creates a checkerboard of `width x height` texels.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero.
    pub fn new(width: usize, height: usize) -> Result<Self, SceneError> {
        if width == 0 || height == 0 {
            return Err(SceneError::EmptyTexture { width, height });
        }
        Ok(Self { width, height })
    }

    /// Generates the image, sampled with nearest-neighbor filtering.
    #[must_use]
    pub fn image(&self) -> TextureImage {
        let mut pixels = Vec::with_capacity(self.width * self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                pixels.push(if (x ^ y) & 1 == 1 {
                    Self::YELLOW
                } else {
                    Self::BLUE
                });
            }
        }
        TextureImage {
            width: self.width,
            height: self.height,
            pixels,
            filter: TextureFilter::Nearest,
        }
    }
}
