//! Settings for the snowfall animation.
//!
//! Settings are read from `config.toml` in the platform configuration
//! directory. Every key is optional; missing keys fall back to defaults.
//! [`Settings::resolve`] validates the values and produces the
//! [`SnowfallConfig`] consumed by the engine.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use log::debug;
use serde::{Deserialize, Serialize};
use snowfall_core::{Rgba, SnowfallConfig, Sprite};
use thiserror::Error;

/// File name of the settings file inside the configuration directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors raised while loading or resolving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid {name} range: min {min} is greater than max {max}")]
    InvalidRange {
        name: &'static str,
        min: u32,
        max: u32,
    },

    #[error("pixels_per_dp must be a positive number, got {0}")]
    InvalidDensity(f32),

    #[error("at least one sprite must be configured")]
    NoSprites,

    #[error(transparent)]
    Image(#[from] snowfall_core::SnowfallError),
}

/// User-facing settings, as stored in the settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Number of snowflakes.
    pub count: usize,
    pub alpha_min: u8,
    pub alpha_max: u8,
    /// Maximum drift angle in degrees.
    pub angle_max: u32,
    /// Minimum flake size in density-independent units.
    pub size_min: u32,
    /// Maximum flake size in density-independent units.
    pub size_max: u32,
    /// Minimum fall speed in pixels per tick.
    pub speed_min: u32,
    /// Maximum fall speed in pixels per tick.
    pub speed_max: u32,
    pub fading: bool,
    pub already_falling: bool,
    pub multiple_images: bool,
    /// Sprites making up the image pool.
    pub sprites: Vec<Sprite>,
    /// Flake colour as `[r, g, b]`.
    pub color: [u8; 3],
    /// Surface pixels per density-independent unit.
    pub pixels_per_dp: f32,
    /// Minimum time between two draw passes.
    pub frame_interval_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            count: 200,
            alpha_min: 150,
            alpha_max: 250,
            angle_max: 10,
            size_min: 2,
            size_max: 8,
            speed_min: 2,
            speed_max: 8,
            fading: false,
            already_falling: false,
            multiple_images: false,
            sprites: vec![Sprite::Flake],
            color: [255, 255, 255],
            pixels_per_dp: 0.5,
            frame_interval_ms: 50,
        }
    }
}

impl Settings {
    /// Default settings file location, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "snowfall").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Load settings from `path`, or from the default location when `None`.
    ///
    /// An explicit path must exist. A missing file at the default location
    /// yields the default settings.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_from(&path),
                _ => {
                    debug!("no settings file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::parse(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Parse settings from TOML text.
    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Flake colour.
    pub fn rgba(&self) -> Rgba {
        let [r, g, b] = self.color;
        Rgba::rgb(r, g, b)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    /// Validate the settings and build the engine configuration.
    pub fn resolve(&self) -> Result<SnowfallConfig, ConfigError> {
        check_range("alpha", u32::from(self.alpha_min), u32::from(self.alpha_max))?;
        check_range("size", self.size_min, self.size_max)?;
        check_range("speed", self.speed_min, self.speed_max)?;
        if !(self.pixels_per_dp.is_finite() && self.pixels_per_dp > 0.0) {
            return Err(ConfigError::InvalidDensity(self.pixels_per_dp));
        }
        if self.sprites.is_empty() {
            return Err(ConfigError::NoSprites);
        }

        let color = self.rgba();
        let images = self
            .sprites
            .iter()
            .map(|sprite| sprite.image(color))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SnowfallConfig {
            count: self.count,
            alpha_min: self.alpha_min,
            alpha_max: self.alpha_max,
            angle_max: self.angle_max,
            size_min: self.dp_to_px(self.size_min),
            size_max: self.dp_to_px(self.size_max),
            speed_min: self.speed_min,
            speed_max: self.speed_max,
            fading_enabled: self.fading,
            already_falling: self.already_falling,
            multiple_images: self.multiple_images,
            ..SnowfallConfig::default()
        }
        .with_images(images))
    }

    /// Convert density-independent units to whole pixels, never below one.
    pub fn dp_to_px(&self, dp: u32) -> u32 {
        ((dp as f32 * self.pixels_per_dp).round() as u32).max(1)
    }
}

fn check_range(name: &'static str, min: u32, max: u32) -> Result<(), ConfigError> {
    if min > max {
        return Err(ConfigError::InvalidRange { name, min, max });
    }
    Ok(())
}
