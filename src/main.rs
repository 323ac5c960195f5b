//! resgen - builds the game's resource pack from an installed client
//!
//! # Commands
//!
//! - `resgen extract` - copy listed assets out of an installation
//! - `resgen mask` - blend an edited texture into the original through a mask
//! - `resgen rgba` / `resgen alpha` / `resgen brightness` - emit C arrays
//! - `resgen font-widths` - measure a font sheet into a width table
//! - `resgen sounds` - convert sounds to AIFF in place
//! - `resgen build` - run the whole build from `resgen.toml`

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use resgen::{
    carray,
    config::Config,
    extract, font,
    index::{self, InstallLayout},
    logging, pipeline, sound, texture,
};
use std::{
    io::{self, Write},
    path::PathBuf,
    process,
};

#[derive(Parser)]
#[command(name = "resgen")]
#[command(about = "Resource pack build tools")]
#[command(version)]
struct Cli {
    /// More output; repeat for trace logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Also append log lines to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy listed assets out of an installed client
    Extract(ExtractArgs),

    /// Blend an edited image into the original wherever the mask is white
    Mask(MaskArgs),

    /// Emit <name>_rgba.c/.h with raw RGBA pixel data
    Rgba(ImagesArgs),

    /// Emit <name>_alpha.c/.h marking fully opaque 16x16 tiles
    Alpha(ImagesArgs),

    /// Emit brightness_values.c/.h
    Brightness(OutDirArgs),

    /// Measure glyph widths of a 128x128 font sheet
    FontWidths(FontArgs),

    /// Convert sounds under a directory to 16-bit mono AIFF
    Sounds(SoundArgs),

    /// Run the full resource build
    Build(BuildArgs),
}

#[derive(Args)]
struct ExtractArgs {
    /// Skip the confirmation prompt
    #[arg(short = 'y')]
    yes: bool,

    /// Installation directory (defaults to the platform location)
    #[arg(long)]
    minecraft_dir: Option<PathBuf>,

    /// Text file listing the assets to extract
    #[arg(long, default_value = "list.txt")]
    items_file: PathBuf,

    #[arg(long, default_value = "resources")]
    output_dir: PathBuf,

    /// Asset index name under assets/indexes
    #[arg(long, default_value = index::DEFAULT_INDEX)]
    index: String,

    /// Check object files against their hashes before using them
    #[arg(long)]
    verify_hashes: bool,
}

#[derive(Args)]
struct MaskArgs {
    original: PathBuf,
    edited: PathBuf,
    mask: PathBuf,

    /// Where to save the result (defaults to overwriting the original)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct ImagesArgs {
    #[arg(required = true)]
    images: Vec<PathBuf>,

    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Args)]
struct OutDirArgs {
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Args)]
struct FontArgs {
    image: PathBuf,

    #[arg(short, long, default_value = "font_tile_widths.hpp")]
    output: PathBuf,
}

#[derive(Args)]
struct SoundArgs {
    dir: PathBuf,

    /// Keep source files after converting them
    #[arg(long)]
    keep_source: bool,

    #[arg(long, default_value_t = sound::DEFAULT_SAMPLE_RATE)]
    sample_rate: u32,

    /// File extensions to convert
    #[arg(long = "extension", default_value = "ogg")]
    extensions: Vec<String>,
}

#[derive(Args)]
struct BuildArgs {
    /// Config file (defaults to ./resgen.toml, then built-in settings)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(
        logging::level_for(cli.verbose, cli.quiet),
        cli.log_file.as_deref(),
    )
    .context("Failed to set up logging")?;

    match cli.command {
        Commands::Extract(args) => run_extract(args),
        Commands::Mask(args) => {
            let output = args.output.as_ref().unwrap_or(&args.original);
            texture::apply_mask(&args.original, &args.edited, &args.mask, output)
                .with_context(|| format!("Failed to mask {}", args.original.display()))
        }
        Commands::Rgba(args) => {
            carray::convert_all(&args.images, &args.out_dir, carray::convert_rgba);
            Ok(())
        }
        Commands::Alpha(args) => {
            carray::convert_all(&args.images, &args.out_dir, carray::convert_alpha);
            Ok(())
        }
        Commands::Brightness(args) => {
            let (source, _) = carray::brightness_array()
                .write(&args.out_dir)
                .context("Failed to write brightness values")?;
            info!("Wrote {}", source.display());
            Ok(())
        }
        Commands::FontWidths(args) => {
            font::generate(&args.image, &args.output)
                .with_context(|| format!("Failed to measure {}", args.image.display()))?;
            info!("Wrote {}", args.output.display());
            Ok(())
        }
        Commands::Sounds(args) => {
            let options = sound::Options {
                sample_rate: args.sample_rate,
                keep_source: args.keep_source,
                extensions: args.extensions,
            };
            let report = sound::convert_tree(&args.dir, &options)
                .with_context(|| format!("Failed to walk {}", args.dir.display()))?;
            info!(
                "Converted {} sounds ({} failed)",
                report.converted.len(),
                report.failed.len()
            );
            Ok(())
        }
        Commands::Build(args) => {
            let config = Config::discover(args.config.as_deref()).context("Failed to load config")?;
            let summary = pipeline::run(&config).context("Build failed")?;
            info!(
                "Build finished: {} of {} resources extracted, {} masks applied",
                summary.extraction.found(),
                summary.extraction.resolutions.len(),
                summary.masked
            );
            Ok(())
        }
    }
}

fn run_extract(args: ExtractArgs) -> Result<()> {
    let install = match args.minecraft_dir {
        Some(dir) => dir,
        None => index::default_install_dir()?,
    };

    if !args.yes {
        println!("Using following settings:");
        println!("minecraft_dir = {}", install.display());
        println!("items_file = {}", args.items_file.display());
        println!("output_dir = {}", args.output_dir.display());
        if !confirm("Are these settings correct? Y/N: ")? {
            println!("Abort");
            process::exit(1);
        }
    }

    let layout = InstallLayout::new(install).with_index(args.index);
    extract::extract_with(
        &layout,
        &args.items_file,
        &args.output_dir,
        args.verify_hashes,
    )
    .with_context(|| format!("Failed to extract {}", args.items_file.display()))?;
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(answer
        .trim_start()
        .chars()
        .next()
        .is_some_and(|c| c.eq_ignore_ascii_case(&'y')))
}
