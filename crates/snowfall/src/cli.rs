//! Command line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use snowfall_config::Settings;

/// Falling snow in your terminal.
#[derive(Debug, Parser)]
#[command(name = "snowfall", version, about)]
pub struct Cli {
    /// Settings file to use instead of the default location
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of snowflakes
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Fade flakes out as they fall
    #[arg(long)]
    pub fading: bool,

    /// Start with flakes spread over the screen instead of above it
    #[arg(long)]
    pub already_falling: bool,

    /// Give every flake a random sprite from the pool
    #[arg(long)]
    pub multiple_images: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Override loaded settings with the flags given on the command line.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(count) = self.count {
            settings.count = count;
        }
        settings.fading |= self.fading;
        settings.already_falling |= self.already_falling;
        settings.multiple_images |= self.multiple_images;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_settings() {
        let cli = Cli::parse_from(["snowfall", "-n", "42", "--fading", "-vv"]);
        let mut settings = Settings::default();
        cli.apply(&mut settings);

        assert_eq!(settings.count, 42);
        assert!(settings.fading);
        assert!(!settings.already_falling);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_absent_flags_keep_settings() {
        let cli = Cli::parse_from(["snowfall"]);
        let mut settings = Settings {
            count: 7,
            multiple_images: true,
            ..Settings::default()
        };
        cli.apply(&mut settings);

        assert_eq!(settings.count, 7);
        assert!(settings.multiple_images);
    }
}
