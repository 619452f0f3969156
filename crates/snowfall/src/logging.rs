//! Log output for the terminal app.
//!
//! The terminal is owned by the UI, so log records go to a file in the
//! platform cache directory instead of stderr.

use std::fs::{self, File};
use std::path::PathBuf;

use directories::ProjectDirs;
use env_logger::{Env, Target};
use log::LevelFilter;

/// Name of the log file inside the cache directory.
const LOG_FILE_NAME: &str = "snowfall.log";

/// Initialize logging. Returns the log file path, or `None` when the platform
/// has no cache directory and logging stays disabled.
pub fn init(verbose: u8) -> color_eyre::Result<Option<PathBuf>> {
    let Some(dirs) = ProjectDirs::from("", "", "snowfall") else {
        return Ok(None);
    };
    let dir = dirs.cache_dir();
    fs::create_dir_all(dir)?;
    let path = dir.join(LOG_FILE_NAME);
    let file = File::create(&path)?;

    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));
    if verbose > 0 {
        builder.filter_level(level_for(verbose));
    }
    builder.target(Target::Pipe(Box::new(file))).try_init()?;

    Ok(Some(path))
}

fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
