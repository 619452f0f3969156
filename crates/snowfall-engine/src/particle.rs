//! A single falling snowflake.

use std::sync::Arc;

use snowfall_core::ImageBuffer;

use crate::{RandomSource, SpawnParams, Surface};

/// State of one snowflake.
///
/// Size, speed, drift angle and image are chosen at spawn and stay fixed
/// until the next spawn; only position and alpha change per tick.
#[derive(Debug, Clone)]
pub struct Particle {
    x: f32,
    y: f32,
    /// Side of the square footprint, in pixels.
    size: u32,
    /// Vertical distance per tick, in pixels.
    speed: u32,
    /// Drift angle in degrees from vertical; negative drifts left.
    angle: i32,
    alpha: u8,
    image: Arc<ImageBuffer>,
    falling: bool,
}

impl Particle {
    /// Create a particle with freshly randomized state.
    pub fn new(params: &SpawnParams, random: &mut RandomSource, fresh_entry: bool) -> Self {
        Self::generate(params, random, fresh_entry, true)
    }

    /// Reassign size, speed, angle, alpha, image and position.
    ///
    /// A fresh entry starts just above the top edge; otherwise the particle is
    /// placed anywhere in the visible band, as if it had been falling already.
    /// The falling flag is kept.
    pub fn spawn(&mut self, params: &SpawnParams, random: &mut RandomSource, fresh_entry: bool) {
        *self = Self::generate(params, random, fresh_entry, self.falling);
    }

    fn generate(
        params: &SpawnParams,
        random: &mut RandomSource,
        fresh_entry: bool,
        falling: bool,
    ) -> Self {
        let surface = params.surface;
        let size = random_u32(random, params.size_min, params.size_max);
        let speed = random_u32(random, params.speed_min, params.speed_max);
        // Angles above i32::MAX degrees are clamped to i32::MAX.
        let angle_max = params.angle_max.min(i32::MAX as u32) as i32;
        let angle = random.sign() * random.uniform_int(0, angle_max, true);

        let x = random.uniform_float(-(size as f32), surface.width as f32);
        let y = if fresh_entry {
            -(size as f32)
        } else {
            random.uniform_float(-(size as f32), surface.height as f32)
        };

        let alpha = if params.fading_enabled {
            params.fade_alpha(y, size)
        } else {
            random.uniform_int(i32::from(params.alpha_min), i32::from(params.alpha_max), false) as u8
        };

        Self {
            x,
            y,
            size,
            speed,
            angle,
            alpha,
            image: params.pool.choose(random),
            falling,
        }
    }

    /// Advance one tick: fall, drift, fade, and recycle once past the bottom
    /// edge. Does nothing while falling is disabled.
    pub fn update(&mut self, params: &SpawnParams, random: &mut RandomSource) {
        if !self.falling {
            return;
        }

        let speed = self.speed as f32;
        self.y += speed;
        self.x += speed * (self.angle as f32).to_radians().tan();

        if self.y > params.surface.height as f32 {
            self.spawn(params, random, true);
            return;
        }

        if params.fading_enabled {
            self.alpha = params.fade_alpha(self.y, self.size);
        }
    }

    /// Whether the particle is inside the band `[-size, surface height]`.
    pub fn is_visible(&self, params: &SpawnParams) -> bool {
        self.y >= -(self.size as f32) && self.y <= params.surface.height as f32
    }

    /// Paint the particle if it is visible. Returns whether anything was drawn.
    pub fn draw<S: Surface + ?Sized>(&self, params: &SpawnParams, surface: &mut S) -> bool {
        if !self.is_visible(params) {
            return false;
        }
        surface.draw_image(&self.image, self.x, self.y, self.size, self.alpha);
        true
    }

    pub fn set_falling_enabled(&mut self, enabled: bool) {
        self.falling = enabled;
    }

    pub fn is_falling(&self) -> bool {
        self.falling
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    /// Drift angle in degrees.
    pub fn angle(&self) -> i32 {
        self.angle
    }

    pub fn alpha(&self) -> u8 {
        self.alpha
    }

    pub fn image(&self) -> &Arc<ImageBuffer> {
        &self.image
    }
}

/// Uniform integer in `[min, max]`. Bounds above `i32::MAX` are clamped to
/// `i32::MAX`, which is far outside any usable size or speed.
fn random_u32(random: &mut RandomSource, min: u32, max: u32) -> u32 {
    let clamp = |v: u32| v.min(i32::MAX as u32) as i32;
    random.uniform_int(clamp(min), clamp(max), false) as u32
}
