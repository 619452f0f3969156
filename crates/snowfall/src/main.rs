use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::info;
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::Stylize,
    text::Line,
};
use snowfall_config::Settings;
use snowfall_core::{Rgba, SnowfallConfig, Sprite, SurfaceSize};
use snowfall_engine::{AnimationScheduler, Canvas, DrawPass};

mod cli;
mod logging;
mod widget;

use crate::cli::Cli;
use crate::widget::CanvasWidget;

/// Longest wait for input while an update tick is out on the worker.
const IN_FLIGHT_POLL: Duration = Duration::from_millis(2);

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    if let Some(path) = logging::init(cli.verbose)? {
        info!("logging to {}", path.display());
    }

    let mut settings = Settings::load(cli.config.as_deref())?;
    cli.apply(&mut settings);
    let config = settings.resolve()?;

    let terminal = ratatui::init();
    let result = App::new(config, &settings).run(terminal);
    ratatui::restore();
    result
}

/// The terminal host: owns the render context and the canvas the scheduler
/// paints into.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    scheduler: AnimationScheduler,
    canvas: Canvas,
    /// Minimum time between draw passes.
    frame_interval: Duration,
    last_draw: Option<Instant>,
    /// Terminal contents are out of date.
    needs_render: bool,
    /// Hidden by the user with `h`.
    hidden: bool,
    /// Sprite used by `s`.
    sprite: Sprite,
    color: Rgba,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: SnowfallConfig, settings: &Settings) -> Self {
        Self {
            running: false,
            scheduler: AnimationScheduler::new(config),
            canvas: Canvas::new(SurfaceSize::default()),
            frame_interval: settings.frame_interval(),
            last_draw: None,
            needs_render: true,
            hidden: false,
            sprite: settings.sprites.first().copied().unwrap_or_default(),
            color: settings.rgba(),
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        self.scheduler.on_attach()?;
        let size = terminal.size()?;
        self.resize(size.width, size.height)?;

        while self.running {
            self.scheduler.poll();
            if self.frame_due() && self.scheduler.draw(&mut self.canvas) != DrawPass::Skipped {
                self.last_draw = Some(Instant::now());
                self.needs_render = true;
            }
            if self.needs_render {
                terminal.draw(|frame| self.render(frame))?;
                self.needs_render = false;
            }
            self.handle_crossterm_events()?;
        }

        self.scheduler.on_detach();
        Ok(())
    }

    /// Whether enough time passed since the last draw pass.
    fn frame_due(&self) -> bool {
        self.last_draw
            .is_none_or(|last| last.elapsed() >= self.frame_interval)
    }

    /// How long to wait for input before looking at the scheduler again.
    fn poll_timeout(&self) -> Duration {
        if self.scheduler.is_update_in_flight() {
            return IN_FLIGHT_POLL;
        }
        if !self.scheduler.is_redraw_requested() {
            return self.frame_interval;
        }
        let elapsed = self.last_draw.map_or(self.frame_interval, |last| last.elapsed());
        self.frame_interval
            .saturating_sub(elapsed)
            .max(Duration::from_millis(1))
    }

    /// The snow surface covers every row but the help line, two pixels per row.
    fn resize(&mut self, width: u16, height: u16) -> color_eyre::Result<()> {
        let size = SurfaceSize::new(u32::from(width), u32::from(height.saturating_sub(1)) * 2);
        self.canvas = Canvas::new(size);
        self.scheduler.on_resize(size.width, size.height)?;
        self.needs_render = true;
        Ok(())
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame) {
        let [snow_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());

        if !self.hidden && self.scheduler.is_surface_visible() {
            frame.render_widget(CanvasWidget::new(&self.canvas), snow_area);
        }

        let status = if self.scheduler.is_falling() {
            "falling"
        } else {
            "paused"
        };
        let help = Line::from(vec![
            "q".bold().cyan(),
            " quit  ".dark_gray(),
            "space".bold().cyan(),
            " pause  ".dark_gray(),
            "h".bold().cyan(),
            " hide  ".dark_gray(),
            "s".bold().cyan(),
            format!(" sprite ({})  ", self.sprite.name()).dark_gray(),
            "a".bold().cyan(),
            " all sprites  ".dark_gray(),
            status.into(),
        ])
        .centered();
        frame.render_widget(help, help_area);
    }

    /// Reads the crossterm events and updates the state of [`App`].
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()> {
        if event::poll(self.poll_timeout())? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key)?,
                Event::Resize(width, height) => self.resize(width, height)?,
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) -> color_eyre::Result<()> {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char(' ')) => self.toggle_falling(),
            (_, KeyCode::Char('h')) => self.toggle_hidden(),
            (_, KeyCode::Char('s')) => self.cycle_sprite()?,
            (_, KeyCode::Char('a')) => self.use_all_sprites()?,
            _ => {}
        }
        self.needs_render = true;
        Ok(())
    }

    /// Pause or resume the flakes without resetting them.
    fn toggle_falling(&mut self) {
        if self.scheduler.is_falling() {
            self.scheduler.stop_falling();
        } else {
            self.scheduler.restart_falling();
        }
    }

    /// Hide the snow (restarting it from the top) or show it again.
    fn toggle_hidden(&mut self) {
        self.hidden = !self.hidden;
        if self.hidden {
            self.scheduler.on_hidden();
        } else {
            self.scheduler.on_shown();
        }
    }

    /// Switch new flakes to the next sprite.
    fn cycle_sprite(&mut self) -> color_eyre::Result<()> {
        self.sprite = self.sprite.next();
        self.scheduler.set_image(self.sprite.image(self.color)?)?;
        Ok(())
    }

    /// Put every built-in sprite in the image pool.
    fn use_all_sprites(&mut self) -> color_eyre::Result<()> {
        let images = Sprite::ALL
            .iter()
            .map(|sprite| sprite.image(self.color))
            .collect::<Result<Vec<_>, _>>()?;
        self.scheduler.set_images(images)?;
        Ok(())
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}
