//! Fixed-size collection of particles, recycled in place.

use std::sync::Arc;

use log::debug;
use snowfall_core::{ImageBuffer, SnowfallConfig, SnowfallError, SurfaceSize};

use crate::{Particle, RandomSource, SpawnParams, Surface};

/// All particles of one surface generation.
#[derive(Debug)]
pub struct ParticleField {
    particles: Vec<Particle>,
    params: SpawnParams,
    random: RandomSource,
}

impl ParticleField {
    /// Allocate `config.count` particles for a surface of the given size.
    ///
    /// Fails when the configuration has no image to draw particles with.
    pub fn create(
        config: &SnowfallConfig,
        surface: SurfaceSize,
        mut random: RandomSource,
    ) -> Result<Self, SnowfallError> {
        let params = SpawnParams::new(config, surface)?;
        let fresh_entry = !config.already_falling;
        let particles = (0..config.count)
            .map(|_| Particle::new(&params, &mut random, fresh_entry))
            .collect();

        debug!(
            "created field of {} particles for {}x{} surface",
            config.count, surface.width, surface.height
        );

        Ok(Self {
            particles,
            params,
            random,
        })
    }

    /// Advance every particle one tick. Returns whether any is visible afterwards.
    pub fn update_all(&mut self) -> bool {
        let mut any_visible = false;
        for particle in &mut self.particles {
            particle.update(&self.params, &mut self.random);
            any_visible |= particle.is_visible(&self.params);
        }
        any_visible
    }

    /// Draw every visible particle. Returns whether at least one was drawn.
    pub fn draw_all<S: Surface + ?Sized>(&self, surface: &mut S) -> bool {
        let mut drawn = false;
        for particle in &self.particles {
            drawn |= particle.draw(&self.params, surface);
        }
        drawn
    }

    /// Enable or disable falling on every particle.
    pub fn set_all_falling(&mut self, enabled: bool) {
        for particle in &mut self.particles {
            particle.set_falling_enabled(enabled);
        }
    }

    /// Give every particle fresh random state, honouring the already-falling
    /// spawn policy.
    pub fn reset_all(&mut self) {
        let fresh_entry = !self.params.already_falling;
        for particle in &mut self.particles {
            particle.spawn(&self.params, &mut self.random, fresh_entry);
        }
    }

    /// Replace the image pool used by future spawns. Particles already
    /// spawned keep their images.
    pub fn set_images(&mut self, images: Vec<Arc<ImageBuffer>>) -> Result<(), SnowfallError> {
        self.params.set_images(images)
    }

    /// Whether any particle is inside the visible band.
    pub fn any_visible(&self) -> bool {
        self.particles.iter().any(|p| p.is_visible(&self.params))
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn params(&self) -> &SpawnParams {
        &self.params
    }

    pub fn surface(&self) -> SurfaceSize {
        self.params.surface()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
