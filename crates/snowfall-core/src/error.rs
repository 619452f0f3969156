//! Error types for the animation core.

use thiserror::Error;

/// Errors raised by the animation core.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnowfallError {
    /// The image pool is empty, so particles have nothing to draw.
    #[error("no snowflake image configured (multiple images: {multiple_images})")]
    MissingImage {
        /// Whether the configuration asked for a random image per particle.
        multiple_images: bool,
    },

    /// A pixel buffer that cannot be used as a snowflake image.
    #[error("unsupported image: {0}")]
    UnsupportedImage(String),
}
