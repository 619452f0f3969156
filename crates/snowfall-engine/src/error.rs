//! Scheduler errors.

use snowfall_core::SnowfallError;
use thiserror::Error;

/// Errors surfaced to the host by [`crate::AnimationScheduler`].
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The configuration cannot produce a particle field.
    #[error(transparent)]
    Config(#[from] SnowfallError),

    /// The background update thread could not be started.
    #[error("failed to start update worker: {0}")]
    WorkerSpawn(#[from] std::io::Error),
}
