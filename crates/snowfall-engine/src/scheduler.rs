//! Coordination of background update ticks and foreground draw passes.
//!
//! The scheduler runs a request chain rather than a timer: every draw pass
//! that finds a visible particle sends the field to the update worker, and
//! every completed tick that still has a visible particle requests the next
//! draw pass. The field itself travels with each request, so at most one
//! update is in flight and the render context only reads the field while it
//! owns it.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SendError, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use log::{debug, error, trace, warn};
use snowfall_core::{ImageBuffer, SnowfallConfig, SnowfallError, SurfaceSize};

use crate::{ParticleField, RandomSource, SchedulerError, Surface};

/// Name of the background update thread.
const WORKER_THREAD_NAME: &str = "snowfall-update";

/// Lifecycle of the animation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchedulerState {
    /// No surface attached, or no usable surface size yet.
    #[default]
    Idle,
    /// The update/draw chain is active.
    Running,
    /// Attached, but no particle is visible; the surface should stay hidden.
    Stopped,
}

/// Result of a call to [`AnimationScheduler::draw`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawPass {
    /// No redraw was pending; the surface was not touched.
    Skipped,
    /// The surface was cleared and at least one particle was drawn.
    Painted,
    /// The surface was cleared but nothing was visible; the scheduler stopped.
    Empty,
}

/// Field mutation requested by the host.
#[derive(Debug)]
enum FieldCommand {
    SetFalling(bool),
    Reset,
    SetImages(Vec<Arc<ImageBuffer>>),
}

impl FieldCommand {
    fn apply(self, field: &mut ParticleField) {
        match self {
            FieldCommand::SetFalling(enabled) => field.set_all_falling(enabled),
            FieldCommand::Reset => field.reset_all(),
            FieldCommand::SetImages(images) => {
                if let Err(e) = field.set_images(images) {
                    warn!("ignoring image pool update: {e}");
                }
            }
        }
    }
}

#[derive(Debug)]
struct UpdateJob {
    generation: u64,
    field: ParticleField,
}

#[derive(Debug)]
struct TickOutcome {
    generation: u64,
    field: ParticleField,
    any_visible: bool,
}

/// Handle to the background update thread.
///
/// Dropping it closes both channels; the thread finishes its current job,
/// fails to deliver the result, and exits.
#[derive(Debug)]
struct UpdateWorker {
    jobs: Sender<UpdateJob>,
    outcomes: Receiver<TickOutcome>,
}

impl UpdateWorker {
    fn spawn() -> std::io::Result<Self> {
        let (job_tx, job_rx) = mpsc::channel::<UpdateJob>();
        let (outcome_tx, outcome_rx) = mpsc::channel();

        thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || {
                for mut job in job_rx {
                    let any_visible = job.field.update_all();
                    trace!(
                        "tick for generation {} done, visible: {any_visible}",
                        job.generation
                    );
                    let outcome = TickOutcome {
                        generation: job.generation,
                        field: job.field,
                        any_visible,
                    };
                    if outcome_tx.send(outcome).is_err() {
                        break;
                    }
                }
                debug!("update worker exiting");
            })?;

        Ok(Self {
            jobs: job_tx,
            outcomes: outcome_rx,
        })
    }
}

/// Drives a [`ParticleField`] for a host surface.
///
/// All methods are meant to be called from the host's render context. None of
/// them block except [`AnimationScheduler::poll_timeout`].
#[derive(Debug)]
pub struct AnimationScheduler {
    config: SnowfallConfig,
    /// Base seed for reproducible fields; time-seeded when `None`.
    seed: Option<u64>,
    state: SchedulerState,
    worker: Option<UpdateWorker>,
    /// The field, when it is on the render context.
    field: Option<ParticleField>,
    surface: Option<SurfaceSize>,
    /// Bumped whenever the current field is discarded.
    generation: u64,
    in_flight: bool,
    redraw_requested: bool,
    /// Hidden by the host through `on_hidden`.
    hidden: bool,
    /// Falling state applied to new fields.
    falling: bool,
    /// Commands issued while the field was on the worker.
    pending: Vec<FieldCommand>,
}

impl AnimationScheduler {
    /// Create an idle scheduler.
    pub fn new(config: SnowfallConfig) -> Self {
        Self {
            config,
            seed: None,
            state: SchedulerState::Idle,
            worker: None,
            field: None,
            surface: None,
            generation: 0,
            in_flight: false,
            redraw_requested: false,
            hidden: false,
            falling: true,
            pending: Vec::new(),
        }
    }

    /// Create an idle scheduler whose fields are seeded deterministically.
    pub fn with_seed(config: SnowfallConfig, seed: u64) -> Self {
        let mut scheduler = Self::new(config);
        scheduler.seed = Some(seed);
        scheduler
    }

    /// The host surface was attached: start the update worker, and build the
    /// field if the surface size is already known.
    pub fn on_attach(&mut self) -> Result<(), SchedulerError> {
        if self.worker.is_some() {
            return Ok(());
        }
        self.worker = Some(UpdateWorker::spawn()?);
        debug!("scheduler attached");

        if self.surface.is_some() {
            self.rebuild_field()?;
        }
        Ok(())
    }

    /// The host surface was detached: stop the worker and drop the field.
    /// A tick still running on the worker completes but its result is lost.
    pub fn on_detach(&mut self) {
        if self.worker.is_none() && self.state == SchedulerState::Idle {
            return;
        }
        self.worker = None;
        self.field = None;
        self.generation += 1;
        self.in_flight = false;
        self.redraw_requested = false;
        self.pending.clear();
        self.set_state(SchedulerState::Idle);
        debug!("scheduler detached");
    }

    /// The surface changed size: replace the field wholesale.
    pub fn on_resize(&mut self, width: u32, height: u32) -> Result<(), SchedulerError> {
        let size = SurfaceSize::new(width, height);
        if self.surface == Some(size) && (self.field.is_some() || self.in_flight) {
            return Ok(());
        }
        self.surface = Some(size);

        if self.worker.is_some() {
            self.rebuild_field()?;
        }
        Ok(())
    }

    /// The surface was hidden: stop drawing and reset every particle so the
    /// animation starts over when shown again.
    pub fn on_hidden(&mut self) {
        self.hidden = true;
        self.redraw_requested = false;
        self.command(FieldCommand::Reset);
    }

    /// The surface became visible again: request a draw pass.
    pub fn on_shown(&mut self) {
        self.hidden = false;
        if self.state != SchedulerState::Idle {
            self.set_state(SchedulerState::Running);
            self.redraw_requested = true;
        }
    }

    /// Replace the image pool with a single image for future spawns.
    pub fn set_image(&mut self, image: ImageBuffer) -> Result<(), SnowfallError> {
        self.set_images(vec![image])
    }

    /// Replace the image pool for future spawns. Particles already on screen
    /// keep their images.
    pub fn set_images(&mut self, images: Vec<ImageBuffer>) -> Result<(), SnowfallError> {
        if images.is_empty() {
            return Err(SnowfallError::MissingImage {
                multiple_images: self.config.multiple_images,
            });
        }
        let images: Vec<Arc<ImageBuffer>> = images.into_iter().map(Arc::new).collect();
        self.config.images = images.clone();
        self.command(FieldCommand::SetImages(images));
        Ok(())
    }

    /// Freeze every particle in place without resetting it.
    pub fn stop_falling(&mut self) {
        self.falling = false;
        self.command(FieldCommand::SetFalling(false));
    }

    /// Let frozen particles continue from where they stopped.
    pub fn restart_falling(&mut self) {
        self.falling = true;
        self.command(FieldCommand::SetFalling(true));
    }

    /// Run a draw pass if one was requested.
    ///
    /// Clears `surface`, paints every visible particle and, if anything was
    /// painted, sends the field off for the next update tick.
    pub fn draw<S: Surface + ?Sized>(&mut self, surface: &mut S) -> DrawPass {
        if !self.redraw_requested || !self.is_surface_visible() {
            return DrawPass::Skipped;
        }
        let Some(field) = self.field.as_ref() else {
            return DrawPass::Skipped;
        };

        self.redraw_requested = false;
        surface.clear();
        if field.draw_all(surface) {
            self.schedule_update();
            DrawPass::Painted
        } else {
            self.enter_stopped();
            DrawPass::Empty
        }
    }

    /// Collect finished ticks without blocking. Returns whether a draw pass
    /// is now requested.
    pub fn poll(&mut self) -> bool {
        while let Some(outcome) = self.next_outcome(None) {
            self.handle_outcome(outcome);
        }
        self.redraw_requested
    }

    /// Like [`AnimationScheduler::poll`], but waits up to `timeout` for an
    /// in-flight tick to finish.
    pub fn poll_timeout(&mut self, timeout: Duration) -> bool {
        if self.in_flight
            && let Some(outcome) = self.next_outcome(Some(timeout))
        {
            self.handle_outcome(outcome);
        }
        self.poll()
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_redraw_requested(&self) -> bool {
        self.redraw_requested
    }

    /// Whether the host should show the surface: not hidden by the host and
    /// not stopped.
    pub fn is_surface_visible(&self) -> bool {
        !self.hidden && self.state != SchedulerState::Stopped
    }

    pub fn is_update_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn is_falling(&self) -> bool {
        self.falling
    }

    /// The field, when it is not on the worker.
    pub fn field(&self) -> Option<&ParticleField> {
        self.field.as_ref()
    }

    pub fn config(&self) -> &SnowfallConfig {
        &self.config
    }

    pub fn surface_size(&self) -> Option<SurfaceSize> {
        self.surface
    }

    fn rebuild_field(&mut self) -> Result<(), SchedulerError> {
        self.generation += 1;
        self.field = None;
        self.pending.clear();
        self.redraw_requested = false;

        let size = match self.surface {
            Some(size) if !size.is_empty() => size,
            _ => {
                self.set_state(SchedulerState::Idle);
                return Ok(());
            }
        };

        let random = match self.seed {
            Some(seed) => RandomSource::seeded(seed.wrapping_add(self.generation)),
            None => RandomSource::from_time(),
        };
        let mut field = match ParticleField::create(&self.config, size, random) {
            Ok(field) => field,
            Err(e) => {
                self.set_state(SchedulerState::Idle);
                return Err(e.into());
            }
        };
        if !self.falling {
            field.set_all_falling(false);
        }

        self.field = Some(field);
        self.set_state(SchedulerState::Running);
        self.redraw_requested = !self.hidden;
        Ok(())
    }

    fn command(&mut self, command: FieldCommand) {
        if let Some(field) = self.field.as_mut() {
            command.apply(field);
        } else if self.in_flight {
            self.pending.push(command);
        }
    }

    fn schedule_update(&mut self) {
        // A tick from a discarded field is still on the worker; its return
        // requests another draw pass, which schedules this field.
        if self.in_flight {
            return;
        }
        let Some(worker) = self.worker.as_ref() else {
            return;
        };
        let Some(field) = self.field.take() else {
            return;
        };

        let job = UpdateJob {
            generation: self.generation,
            field,
        };
        match worker.jobs.send(job) {
            Ok(()) => self.in_flight = true,
            Err(SendError(job)) => {
                warn!("update worker is gone, keeping field on the render context");
                self.field = Some(job.field);
            }
        }
    }

    fn next_outcome(&mut self, timeout: Option<Duration>) -> Option<TickOutcome> {
        let worker = self.worker.as_ref()?;
        let disconnected = match timeout {
            Some(timeout) => match worker.outcomes.recv_timeout(timeout) {
                Ok(outcome) => return Some(outcome),
                Err(RecvTimeoutError::Timeout) => false,
                Err(RecvTimeoutError::Disconnected) => true,
            },
            None => match worker.outcomes.try_recv() {
                Ok(outcome) => return Some(outcome),
                Err(TryRecvError::Empty) => false,
                Err(TryRecvError::Disconnected) => true,
            },
        };

        if disconnected {
            error!("update worker terminated unexpectedly");
            self.on_detach();
        }
        None
    }

    fn handle_outcome(&mut self, outcome: TickOutcome) {
        self.in_flight = false;

        if outcome.generation != self.generation {
            debug!(
                "discarding tick from generation {} (current {})",
                outcome.generation, self.generation
            );
            if self.field.is_some()
                && self.state == SchedulerState::Running
                && !self.hidden
            {
                self.redraw_requested = true;
            }
            return;
        }

        let mut field = outcome.field;
        let had_commands = !self.pending.is_empty();
        for command in self.pending.drain(..) {
            command.apply(&mut field);
        }
        let any_visible = if had_commands {
            field.any_visible()
        } else {
            outcome.any_visible
        };
        self.field = Some(field);

        if any_visible {
            self.redraw_requested = !self.hidden;
        } else {
            self.enter_stopped();
        }
    }

    fn enter_stopped(&mut self) {
        self.redraw_requested = false;
        self.set_state(SchedulerState::Stopped);
    }

    fn set_state(&mut self, state: SchedulerState) {
        if self.state != state {
            debug!("scheduler state {:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }
}

impl Drop for AnimationScheduler {
    fn drop(&mut self) {
        self.on_detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Canvas;
    use snowfall_core::Rgba;

    const WAIT: Duration = Duration::from_secs(5);

    fn config(count: usize) -> SnowfallConfig {
        SnowfallConfig {
            count,
            ..SnowfallConfig::default()
        }
        .with_image(ImageBuffer::from_mask(&["##", "##"], Rgba::WHITE).unwrap())
    }

    fn running(count: usize) -> (AnimationScheduler, Canvas) {
        let mut scheduler = AnimationScheduler::with_seed(config(count), 11);
        scheduler.on_attach().unwrap();
        scheduler.on_resize(64, 48).unwrap();
        (scheduler, Canvas::new(SurfaceSize::new(64, 48)))
    }

    /// One full draw -> update -> redraw-request round trip.
    fn cycle(scheduler: &mut AnimationScheduler, canvas: &mut Canvas) -> DrawPass {
        let pass = scheduler.draw(canvas);
        if pass == DrawPass::Painted {
            assert!(scheduler.poll_timeout(WAIT));
        }
        pass
    }

    fn positions(scheduler: &AnimationScheduler) -> Vec<(f32, f32)> {
        scheduler
            .field()
            .unwrap()
            .particles()
            .iter()
            .map(|p| (p.x(), p.y()))
            .collect()
    }

    #[test]
    fn test_idle_until_attached_with_size() {
        let mut scheduler = AnimationScheduler::new(config(5));
        assert_eq!(scheduler.state(), SchedulerState::Idle);

        scheduler.on_resize(10, 10).unwrap();
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert!(scheduler.field().is_none());

        scheduler.on_attach().unwrap();
        assert_eq!(scheduler.state(), SchedulerState::Running);
        assert!(scheduler.is_redraw_requested());
        assert_eq!(scheduler.field().unwrap().len(), 5);
    }

    #[test]
    fn test_zero_size_keeps_scheduler_idle() {
        let mut scheduler = AnimationScheduler::new(config(5));
        scheduler.on_attach().unwrap();
        scheduler.on_resize(0, 20).unwrap();
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert!(scheduler.field().is_none());

        scheduler.on_resize(20, 20).unwrap();
        assert_eq!(scheduler.state(), SchedulerState::Running);
    }

    #[test]
    fn test_missing_images_fail_at_field_creation() {
        let mut scheduler = AnimationScheduler::new(SnowfallConfig::default());
        scheduler.on_attach().unwrap();
        let err = scheduler.on_resize(10, 10).unwrap_err();
        assert!(matches!(
            err,
            SchedulerError::Config(SnowfallError::MissingImage { .. })
        ));
        assert_eq!(scheduler.state(), SchedulerState::Idle);
    }

    #[test]
    fn test_draw_and_update_chain() {
        let (mut scheduler, mut canvas) = running(30);

        assert_eq!(scheduler.draw(&mut canvas), DrawPass::Painted);
        assert!(scheduler.is_update_in_flight());
        assert!(scheduler.field().is_none());
        assert!(!scheduler.is_redraw_requested());

        // Without a pending redraw the surface is left alone
        assert_eq!(scheduler.draw(&mut canvas), DrawPass::Skipped);

        assert!(scheduler.poll_timeout(WAIT));
        assert!(!scheduler.is_update_in_flight());
        assert!(scheduler.field().is_some());

        for _ in 0..20 {
            assert_eq!(cycle(&mut scheduler, &mut canvas), DrawPass::Painted);
        }
        assert_eq!(scheduler.state(), SchedulerState::Running);
    }

    #[test]
    fn test_update_moves_particles() {
        let (mut scheduler, mut canvas) = running(10);
        let before = positions(&scheduler);
        cycle(&mut scheduler, &mut canvas);
        assert_ne!(positions(&scheduler), before);
    }

    #[test]
    fn test_empty_field_stops() {
        let (mut scheduler, mut canvas) = running(0);
        assert_eq!(scheduler.draw(&mut canvas), DrawPass::Empty);
        assert_eq!(scheduler.state(), SchedulerState::Stopped);
        assert!(!scheduler.is_surface_visible());
        assert!(!scheduler.is_update_in_flight());
        assert_eq!(scheduler.draw(&mut canvas), DrawPass::Skipped);
    }

    #[test]
    fn test_stopped_restarts_after_restart_and_shown() {
        let (mut scheduler, mut canvas) = running(0);
        scheduler.draw(&mut canvas);
        assert_eq!(scheduler.state(), SchedulerState::Stopped);

        scheduler.restart_falling();
        assert_eq!(scheduler.state(), SchedulerState::Stopped);
        scheduler.on_shown();
        assert_eq!(scheduler.state(), SchedulerState::Running);
        assert!(scheduler.is_redraw_requested());
    }

    #[test]
    fn test_resize_while_stopped_rearms_chain() {
        let (mut scheduler, mut canvas) = running(0);
        assert_eq!(scheduler.draw(&mut canvas), DrawPass::Empty);
        assert_eq!(scheduler.state(), SchedulerState::Stopped);

        scheduler.on_resize(30, 30).unwrap();
        assert_eq!(scheduler.state(), SchedulerState::Running);
        assert!(scheduler.is_surface_visible());
        assert!(scheduler.is_redraw_requested());

        // The rebuilt field is still empty, so the next pass stops again
        let mut small = Canvas::new(SurfaceSize::new(30, 30));
        assert_eq!(scheduler.draw(&mut small), DrawPass::Empty);
        assert_eq!(scheduler.state(), SchedulerState::Stopped);
        assert!(!scheduler.is_update_in_flight());
    }

    #[test]
    fn test_resize_while_hidden_waits_for_shown() {
        let (mut scheduler, mut canvas) = running(5);
        scheduler.on_hidden();
        scheduler.on_resize(30, 30).unwrap();
        assert_eq!(scheduler.state(), SchedulerState::Running);
        assert!(!scheduler.is_redraw_requested());
        assert_eq!(scheduler.draw(&mut canvas), DrawPass::Skipped);

        scheduler.on_shown();
        let mut small = Canvas::new(SurfaceSize::new(30, 30));
        assert_eq!(cycle(&mut scheduler, &mut small), DrawPass::Painted);
    }

    #[test]
    fn test_seeded_schedulers_build_identical_fields() {
        let mut a = AnimationScheduler::with_seed(config(8), 3);
        let mut b = AnimationScheduler::with_seed(config(8), 3);
        for scheduler in [&mut a, &mut b] {
            scheduler.on_attach().unwrap();
            scheduler.on_resize(40, 40).unwrap();
        }
        assert_eq!(positions(&a), positions(&b));
    }

    #[test]
    fn test_stop_falling_freezes_and_restart_resumes() {
        let (mut scheduler, mut canvas) = running(25);
        cycle(&mut scheduler, &mut canvas);

        // Issued while the field is on the worker
        assert_eq!(scheduler.draw(&mut canvas), DrawPass::Painted);
        scheduler.stop_falling();
        assert!(scheduler.poll_timeout(WAIT));

        let frozen = positions(&scheduler);
        for _ in 0..5 {
            assert_eq!(cycle(&mut scheduler, &mut canvas), DrawPass::Painted);
        }
        assert_eq!(positions(&scheduler), frozen);

        scheduler.restart_falling();
        cycle(&mut scheduler, &mut canvas);
        let field = scheduler.field().unwrap();
        for (particle, (_, y)) in field.particles().iter().zip(&frozen) {
            let expected = y + particle.speed() as f32;
            if expected <= 48.0 {
                assert_eq!(particle.y(), expected);
            }
        }
    }

    #[test]
    fn test_hidden_resets_and_shown_resumes() {
        let (mut scheduler, mut canvas) = running(15);
        for _ in 0..4 {
            cycle(&mut scheduler, &mut canvas);
        }

        scheduler.on_hidden();
        assert!(!scheduler.is_surface_visible());
        assert_eq!(scheduler.draw(&mut canvas), DrawPass::Skipped);
        for particle in scheduler.field().unwrap().particles() {
            assert_eq!(particle.y(), -(particle.size() as f32));
        }

        scheduler.on_shown();
        assert!(scheduler.is_redraw_requested());
        assert_eq!(cycle(&mut scheduler, &mut canvas), DrawPass::Painted);
    }

    #[test]
    fn test_hidden_while_in_flight_resets_on_return() {
        let (mut scheduler, mut canvas) = running(15);
        assert_eq!(scheduler.draw(&mut canvas), DrawPass::Painted);
        scheduler.on_hidden();

        assert!(!scheduler.poll_timeout(WAIT));
        for particle in scheduler.field().unwrap().particles() {
            assert_eq!(particle.y(), -(particle.size() as f32));
        }
    }

    #[test]
    fn test_resize_discards_stale_tick() {
        let (mut scheduler, mut canvas) = running(12);
        assert_eq!(scheduler.draw(&mut canvas), DrawPass::Painted);

        scheduler.on_resize(32, 20).unwrap();
        let mut small = Canvas::new(SurfaceSize::new(32, 20));
        assert_eq!(scheduler.field().unwrap().surface(), SurfaceSize::new(32, 20));

        // The stale tick is still out, so this pass cannot schedule an update
        assert_eq!(scheduler.draw(&mut small), DrawPass::Painted);
        assert!(scheduler.is_update_in_flight());
        assert!(scheduler.field().is_some());

        assert!(scheduler.poll_timeout(WAIT));
        assert_eq!(scheduler.field().unwrap().surface(), SurfaceSize::new(32, 20));

        assert_eq!(cycle(&mut scheduler, &mut small), DrawPass::Painted);
    }

    #[test]
    fn test_detach_discards_in_flight_tick() {
        let (mut scheduler, mut canvas) = running(8);
        assert_eq!(scheduler.draw(&mut canvas), DrawPass::Painted);

        scheduler.on_detach();
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert!(scheduler.field().is_none());
        assert!(!scheduler.poll_timeout(Duration::from_millis(50)));
        assert_eq!(scheduler.draw(&mut canvas), DrawPass::Skipped);

        scheduler.on_attach().unwrap();
        assert_eq!(scheduler.state(), SchedulerState::Running);
        assert_eq!(cycle(&mut scheduler, &mut canvas), DrawPass::Painted);
    }

    #[test]
    fn test_set_images() {
        let (mut scheduler, mut canvas) = running(6);
        assert!(scheduler.set_images(Vec::new()).is_err());

        let wide = ImageBuffer::from_mask(&["###"], Rgba::WHITE).unwrap();
        scheduler.set_image(wide).unwrap();
        assert_eq!(scheduler.config().images.len(), 1);
        assert_eq!(scheduler.config().images[0].width(), 3);

        // Existing particles keep their image until they respawn
        let field = scheduler.field().unwrap();
        assert!(field.particles().iter().all(|p| p.image().width() == 2));

        scheduler.on_hidden();
        scheduler.on_shown();
        let field = scheduler.field().unwrap();
        assert!(field.particles().iter().all(|p| p.image().width() == 3));
        assert_eq!(cycle(&mut scheduler, &mut canvas), DrawPass::Painted);
    }

    #[test]
    fn test_paused_state_carries_into_resized_field() {
        let (mut scheduler, _) = running(6);
        scheduler.stop_falling();
        scheduler.on_resize(30, 30).unwrap();
        assert!(scheduler.field().unwrap().particles().iter().all(|p| !p.is_falling()));
    }
}
