//! Core types shared by the snowfall crates.
//!
//! Holds the pixel types handed to the animation engine, the built-in
//! snowflake sprites, and the fully resolved [`SnowfallConfig`].

mod config;
mod error;
mod image;
mod sprite;

pub use config::{SnowfallConfig, SurfaceSize};
pub use error::SnowfallError;
pub use image::{ImageBuffer, Rgba};
pub use sprite::Sprite;
