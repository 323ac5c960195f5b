//! The full resource build: extract, overlay edits, apply masks, force RGBA,
//! convert sounds.

use crate::{
    config::Config,
    error::Result,
    extract::{self, Report},
    file,
    sound::{self, ConvertReport},
    texture,
};
use log::{info, warn};

#[derive(Debug, Default)]
pub struct Summary {
    pub extraction: Report,
    pub overlaid: usize,
    pub masked: usize,
    pub sounds: ConvertReport,
}

/// Runs every step in order. Extraction misses are soft; a failing mask,
/// RGBA or sound walk aborts the build.
pub fn run(config: &Config) -> Result<Summary> {
    let mut summary = Summary::default();

    let layout = config.layout()?;
    info!("Extracting resources from {}", layout.root().display());
    summary.extraction = extract::extract_with(
        &layout,
        &config.targets,
        &config.output,
        config.extract.verify_hashes,
    )?;

    if let Some(overlay) = &config.overlay {
        if overlay.is_dir() {
            summary.overlaid = file::copy_tree(overlay, &config.output)?;
            info!(
                "Copied {} edited files from {}",
                summary.overlaid,
                overlay.display()
            );
        } else {
            warn!("Overlay directory {} does not exist, skipping", overlay.display());
        }
    }

    for job in &config.masks {
        texture::apply_mask(&job.original, &job.edited, &job.mask, &job.output)?;
        summary.masked += 1;
    }

    for path in &config.rgba {
        texture::force_rgba(path)?;
    }

    if let Some(sound_config) = &config.sound {
        if sound_config.dir.is_dir() {
            summary.sounds = sound::convert_tree(&sound_config.dir, &sound_config.options())?;
            info!(
                "Converted {} sounds ({} failed)",
                summary.sounds.converted.len(),
                summary.sounds.failed.len()
            );
        } else {
            warn!(
                "Sound directory {} does not exist, skipping",
                sound_config.dir.display()
            );
        }
    }

    Ok(summary)
}
