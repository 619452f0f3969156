//! Fully resolved animation configuration.

use std::sync::Arc;

use crate::ImageBuffer;

/// Width and height of a drawable surface, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether either dimension is zero.
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Configuration handed to the animation engine.
///
/// Ranges are inclusive and assumed to be ordered (`min <= max`); the
/// settings layer validates them before building this struct.
#[derive(Debug, Clone, PartialEq)]
pub struct SnowfallConfig {
    /// Number of particles in a field.
    pub count: usize,
    /// Image pool. The first image is used unless `multiple_images` is set.
    pub images: Vec<Arc<ImageBuffer>>,
    /// Minimum particle alpha (0-255).
    pub alpha_min: u8,
    /// Maximum particle alpha (0-255).
    pub alpha_max: u8,
    /// Maximum drift angle in degrees, either side of vertical.
    pub angle_max: u32,
    /// Minimum particle size in pixels.
    pub size_min: u32,
    /// Maximum particle size in pixels.
    pub size_max: u32,
    /// Minimum fall speed in pixels per tick.
    pub speed_min: u32,
    /// Maximum fall speed in pixels per tick.
    pub speed_max: u32,
    /// Fade particles out as they travel down.
    pub fading_enabled: bool,
    /// Spawn the first particles mid-flight instead of above the top edge.
    pub already_falling: bool,
    /// Pick a random image per particle instead of sharing the first one.
    pub multiple_images: bool,
}

impl Default for SnowfallConfig {
    fn default() -> Self {
        Self {
            count: 200,
            images: Vec::new(),
            alpha_min: 150,
            alpha_max: 250,
            angle_max: 10,
            size_min: 2,
            size_max: 8,
            speed_min: 2,
            speed_max: 8,
            fading_enabled: false,
            already_falling: false,
            multiple_images: false,
        }
    }
}

impl SnowfallConfig {
    /// Replace the image pool with a single image.
    pub fn with_image(mut self, image: ImageBuffer) -> Self {
        self.images = vec![Arc::new(image)];
        self
    }

    /// Replace the image pool.
    pub fn with_images(mut self, images: impl IntoIterator<Item = ImageBuffer>) -> Self {
        self.images = images.into_iter().map(Arc::new).collect();
        self
    }
}
