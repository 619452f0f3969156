//! Random number source shared by every particle of a field.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::{Rng, SeedableRng, rngs::StdRng};

/// Uniform, gaussian and sign draws for particle generation.
///
/// One instance is owned per field and handed by `&mut` into every spawn,
/// so there is no ambient generator.
#[derive(Debug, Clone)]
pub struct RandomSource<R = StdRng> {
    rng: R,
    /// Second value produced by the last polar-method draw.
    spare_normal: Option<f64>,
}

impl RandomSource<StdRng> {
    /// Source seeded from the current time.
    pub fn from_time() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        Self::seeded(seed)
    }

    /// Source with a fixed seed, for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSource<R> {
    /// Wrap an existing generator.
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            spare_normal: None,
        }
    }

    /// Integer in the inclusive range `[min, max]`.
    ///
    /// With `gaussian` set the draw is `|gaussian_unit()|` scaled onto the
    /// range, so values near `min` are far more likely than values near `max`.
    /// Bounds given in the wrong order are swapped.
    pub fn uniform_int(&mut self, min: i32, max: i32, gaussian: bool) -> i32 {
        let (min, max) = if min > max { (max, min) } else { (min, max) };
        if gaussian {
            let span = f64::from(max) - f64::from(min) + 1.0;
            let offset = (self.gaussian_unit().abs() * span).floor() as i64;
            (i64::from(min) + offset).min(i64::from(max)) as i32
        } else {
            self.rng.random_range(min..=max)
        }
    }

    /// Float in the half-open range `[min, max)`; returns `min` for an empty range.
    pub fn uniform_float(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        self.rng.random_range(min..max)
    }

    /// Standard normal sample divided by 3, redrawn until it lies strictly
    /// inside `(-1, 1)`.
    pub fn gaussian_unit(&mut self) -> f64 {
        loop {
            let value = self.standard_normal() / 3.0;
            if value > -1.0 && value < 1.0 {
                return value;
            }
        }
    }

    /// `1` or `-1` with equal probability.
    pub fn sign(&mut self) -> i32 {
        if self.rng.random_bool(0.5) { 1 } else { -1 }
    }

    /// Random element of `items`, or `None` if it is empty.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        items.get(self.rng.random_range(0..items.len()))
    }

    /// Marsaglia polar method; each accepted pair yields two samples.
    fn standard_normal(&mut self) -> f64 {
        if let Some(spare) = self.spare_normal.take() {
            return spare;
        }
        loop {
            let v1 = 2.0 * self.rng.random::<f64>() - 1.0;
            let v2 = 2.0 * self.rng.random::<f64>() - 1.0;
            let s = v1 * v1 + v2 * v2;
            if s < 1.0 && s != 0.0 {
                let multiplier = (-2.0 * s.ln() / s).sqrt();
                self.spare_normal = Some(v2 * multiplier);
                return v1 * multiplier;
            }
        }
    }
}
