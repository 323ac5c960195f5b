//! Log output for the command line: timestamped lines on stderr, optionally
//! mirrored to a file.

use crate::error::Result;
use chrono::Utc;
use log::LevelFilter;
use std::{fs, io, path::Path};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

pub fn timestamped(data: &str) -> String {
    format!("[{}] {}", Utc::now().format(TIMESTAMP_FORMAT), data)
}

/// Info by default, each `-v` one step chattier, `-q` warnings only.
pub fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Warn;
    }
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Installs the global logger. Call once, before any tool runs.
pub fn init(level: LevelFilter, log_file: Option<&Path>) -> Result<()> {
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}",
                timestamped(&format!("[{}] {}", record.level(), message))
            ))
        })
        .level(level)
        .chain(io::stderr());

    if let Some(path) = log_file {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        dispatch = dispatch.chain(fern::log_file(path)?);
    }

    dispatch.apply()?;
    Ok(())
}
