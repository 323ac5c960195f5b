//! Sound transcoding: anything symphonia can decode becomes 16-bit mono AIFF
//! at the engine's sample rate.

use crate::{
    aiff,
    error::{Error::Sound, Result},
};
use log::{info, warn};
use std::{
    fs::{self, File},
    io::{BufWriter, ErrorKind, Write},
    path::{Path, PathBuf},
};
use symphonia::{
    core::{
        audio::SampleBuffer,
        codecs::DecoderOptions,
        errors::Error as SymphoniaError,
        formats::FormatOptions,
        io::MediaSourceStream,
        meta::MetadataOptions,
        probe::Hint,
    },
    default::{get_codecs, get_probe},
};
use walkdir::WalkDir;

pub const DEFAULT_SAMPLE_RATE: u32 = 16000;

#[derive(Debug, Clone)]
pub struct Options {
    pub sample_rate: u32,
    /// Keep the source file after a successful conversion.
    pub keep_source: bool,
    /// Extensions (without the dot, any case) picked up by [`convert_tree`].
    pub extensions: Vec<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            keep_source: false,
            extensions: vec!["ogg".to_owned()],
        }
    }
}

/// Decoded, interleaved samples.
#[derive(Debug, Clone)]
pub struct Pcm {
    pub samples: Vec<f32>,
    pub channels: usize,
    pub sample_rate: u32,
}

pub fn decode(path: &Path) -> Result<Pcm> {
    let source = match File::open(path) {
        Ok(r) => r,
        Err(e) => return Err(Sound(format!("Couldn't open file, {e}"))),
    };
    let mss = MediaSourceStream::new(Box::new(source), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(extension);
    }

    let meta_opts: MetadataOptions = Default::default();
    let fmt_opts = FormatOptions {
        enable_gapless: true,
        ..Default::default()
    };

    let probed = match get_probe().format(&hint, mss, &fmt_opts, &meta_opts) {
        Ok(r) => r,
        Err(e) => return Err(Sound(format!("Probe error: {e}"))),
    };
    let mut format = probed.format;

    let track = match format.default_track() {
        Some(r) => r,
        None => return Err(Sound("Could not get default track".to_string())),
    };
    let track_id = track.id;

    let decoder_opts: DecoderOptions = Default::default();
    let mut decoder = match get_codecs().make(&track.codec_params, &decoder_opts) {
        Ok(r) => r,
        Err(e) => return Err(Sound(format!("Decoder creation error: {e}"))),
    };

    let mut pcm = Pcm {
        samples: Vec::new(),
        channels: 0,
        sample_rate: track.codec_params.sample_rate.unwrap_or(0),
    };

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == ErrorKind::UnexpectedEof => break,
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(e.into()),
        };
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            // corrupt packet, skip it
            Err(SymphoniaError::DecodeError(_)) => continue,
            Err(e) => return Err(e.into()),
        };

        let spec = *decoded.spec();
        pcm.channels = spec.channels.count();
        pcm.sample_rate = spec.rate;

        let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        buffer.copy_interleaved_ref(decoded);
        pcm.samples.extend_from_slice(buffer.samples());
    }

    if pcm.channels == 0 || pcm.sample_rate == 0 {
        return Err(Sound(format!("No audio decoded from {}", path.display())));
    }
    Ok(pcm)
}

/// Averages interleaved channels into one.
pub fn downmix(samples: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }
    samples
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}

/// Linear interpolation resampler.
pub fn resample(samples: &[f32], source_rate: u32, target_rate: u32) -> Vec<f32> {
    if samples.is_empty() {
        return Vec::new();
    }
    if source_rate == target_rate {
        return samples.to_vec();
    }

    let ratio = source_rate as f64 / target_rate as f64;
    let output_len = (samples.len() as f64 / ratio).ceil() as usize;
    let mut output = Vec::with_capacity(output_len);

    for i in 0..output_len {
        let src_pos = i as f64 * ratio;
        let src_idx = src_pos.floor() as usize;
        let frac = (src_pos - src_idx as f64) as f32;

        let sample = if src_idx + 1 < samples.len() {
            let s1 = samples[src_idx];
            let s2 = samples[src_idx + 1];
            s1 + (s2 - s1) * frac
        } else {
            samples[samples.len() - 1]
        };
        output.push(sample);
    }
    output
}

pub fn quantize(samples: &[f32]) -> Vec<i16> {
    samples
        .iter()
        .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16)
        .collect()
}

/// Decodes `path` and returns mono samples at `options.sample_rate`.
pub fn transcode(path: &Path, options: &Options) -> Result<Vec<i16>> {
    let pcm = decode(path)?;
    let mono = downmix(&pcm.samples, pcm.channels);
    let resampled = resample(&mono, pcm.sample_rate, options.sample_rate);
    Ok(quantize(&resampled))
}

/// Converts one file to `<stem>.aiff` next to it. The source is removed
/// afterwards unless `options.keep_source` is set.
pub fn convert_file(path: &Path, options: &Options) -> Result<PathBuf> {
    let samples = transcode(path, options)?;
    let output = path.with_extension("aiff");

    let mut writer = BufWriter::new(File::create(&output)?);
    aiff::write(&samples, options.sample_rate, &mut writer)?;
    writer.flush()?;
    info!("Converted: {} -> {}", path.display(), output.display());

    if !options.keep_source && output != path {
        fs::remove_file(path)?;
        info!("Deleted: {}", path.display());
    }
    Ok(output)
}

#[derive(Debug, Default)]
pub struct ConvertReport {
    pub converted: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

fn wanted(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)))
}

/// Converts every matching file under `dir`. One bad file does not stop the rest.
pub fn convert_tree(dir: &Path, options: &Options) -> Result<ConvertReport> {
    let mut report = ConvertReport::default();
    let mut sources = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry?;
        if entry.file_type().is_file() && wanted(entry.path(), &options.extensions) {
            sources.push(entry.into_path());
        }
    }

    for source in sources {
        match convert_file(&source, options) {
            Ok(output) => report.converted.push(output),
            Err(e) => {
                warn!("Failed to convert {}: {e}", source.display());
                report.failed.push((source, e.to_string()));
            }
        }
    }
    Ok(report)
}
