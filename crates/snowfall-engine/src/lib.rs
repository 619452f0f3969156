//! Snowfall particle simulation and render scheduling.
//!
//! A [`ParticleField`] holds a fixed number of [`Particle`]s that fall, drift
//! and fade across a surface and are recycled in place once they leave it.
//! The [`AnimationScheduler`] runs field updates on a background worker and
//! draw passes on the host's render context, handing the field back and forth
//! so that the two never touch it at the same time.

mod error;
mod field;
mod params;
mod particle;
mod random;
mod scheduler;
mod surface;

pub use error::SchedulerError;
pub use field::ParticleField;
pub use params::{ImagePool, SpawnParams};
pub use particle::Particle;
pub use random::RandomSource;
pub use scheduler::{AnimationScheduler, DrawPass, SchedulerState};
pub use surface::{Canvas, Surface};
