//! Spawn parameters derived from the resolved configuration.

use std::sync::Arc;

use snowfall_core::{ImageBuffer, SnowfallConfig, SnowfallError, SurfaceSize};

use crate::RandomSource;

/// Non-empty set of images particles are drawn with.
#[derive(Debug, Clone)]
pub struct ImagePool {
    first: Arc<ImageBuffer>,
    rest: Vec<Arc<ImageBuffer>>,
    multiple: bool,
}

impl ImagePool {
    /// Fails with [`SnowfallError::MissingImage`] when `images` is empty.
    pub fn new(images: Vec<Arc<ImageBuffer>>, multiple: bool) -> Result<Self, SnowfallError> {
        let mut images = images.into_iter();
        let Some(first) = images.next() else {
            return Err(SnowfallError::MissingImage {
                multiple_images: multiple,
            });
        };
        Ok(Self {
            first,
            rest: images.collect(),
            multiple,
        })
    }

    /// Image for a newly spawned particle: a random pick in multiple-image
    /// mode, otherwise always the first image.
    pub fn choose(&self, random: &mut RandomSource) -> Arc<ImageBuffer> {
        if !self.multiple || self.rest.is_empty() {
            return self.first.clone();
        }
        let index = random.uniform_int(0, self.rest.len().min(i32::MAX as usize) as i32, false);
        match index.checked_sub(1) {
            Some(i) => self.rest[i as usize].clone(),
            None => self.first.clone(),
        }
    }

    /// Number of images; never zero.
    pub fn len(&self) -> usize {
        1 + self.rest.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Everything a particle needs to (re)spawn and move.
#[derive(Debug, Clone)]
pub struct SpawnParams {
    pub(crate) surface: SurfaceSize,
    pub(crate) pool: ImagePool,
    pub(crate) alpha_min: u8,
    pub(crate) alpha_max: u8,
    pub(crate) angle_max: u32,
    pub(crate) size_min: u32,
    pub(crate) size_max: u32,
    pub(crate) speed_min: u32,
    pub(crate) speed_max: u32,
    pub(crate) fading_enabled: bool,
    pub(crate) already_falling: bool,
}

impl SpawnParams {
    pub fn new(config: &SnowfallConfig, surface: SurfaceSize) -> Result<Self, SnowfallError> {
        Ok(Self {
            surface,
            pool: ImagePool::new(config.images.clone(), config.multiple_images)?,
            alpha_min: config.alpha_min,
            alpha_max: config.alpha_max,
            angle_max: config.angle_max,
            size_min: config.size_min,
            size_max: config.size_max,
            speed_min: config.speed_min,
            speed_max: config.speed_max,
            fading_enabled: config.fading_enabled,
            already_falling: config.already_falling,
        })
    }

    pub fn surface(&self) -> SurfaceSize {
        self.surface
    }

    pub fn pool(&self) -> &ImagePool {
        &self.pool
    }

    /// Replace the images used by future spawns.
    pub fn set_images(&mut self, images: Vec<Arc<ImageBuffer>>) -> Result<(), SnowfallError> {
        self.pool = ImagePool::new(images, self.pool.multiple)?;
        Ok(())
    }

    /// Alpha for a fading particle of the given size at height `y`: linear
    /// from `alpha_max` at entry to `alpha_min` at the bottom edge.
    pub(crate) fn fade_alpha(&self, y: f32, size: u32) -> u8 {
        let size = size as f32;
        let travel = self.surface.height as f32 + size;
        let progress = if travel > 0.0 {
            ((y + size) / travel).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let max = f32::from(self.alpha_max);
        let min = f32::from(self.alpha_min);
        (max - (max - min) * progress).round().clamp(0.0, 255.0) as u8
    }
}
