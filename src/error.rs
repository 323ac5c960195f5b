use std::{io, result};

use thiserror::Error;

pub type Result<T> = result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("Invalid or empty filename specified.")]
    InvalidFilename,
    #[error("Destination escapes the output directory: {0}")]
    UnsafeDestination(String),
    #[error("Could not determine the default installation directory.")]
    NoInstallDir,
    #[cfg(feature = "image")]
    #[error(
        "All inputs must be the same size (original {original:?}, edited {edited:?}, mask {mask:?})."
    )]
    DimensionMismatch {
        original: (u32, u32),
        edited: (u32, u32),
        mask: (u32, u32),
    },
    #[cfg(feature = "image")]
    #[error("Image must be {expected}x{expected} pixels, got {width}x{height}.")]
    InvalidDimensions {
        expected: u32,
        width: u32,
        height: u32,
    },
    #[cfg(feature = "image")]
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[cfg(feature = "serde_json")]
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[cfg(feature = "fern")]
    #[error(transparent)]
    Logger(#[from] log::SetLoggerError),
    #[cfg(feature = "symphonia")]
    #[error("{0}")]
    Sound(String),
    #[cfg(feature = "symphonia")]
    #[error(transparent)]
    Decode(#[from] symphonia::core::errors::Error),
    #[cfg(feature = "toml-dep")]
    #[error(transparent)]
    Toml(#[from] toml_dep::de::Error),
    #[cfg(feature = "walkdir")]
    #[error(transparent)]
    Walk(#[from] walkdir::Error),
    #[cfg(feature = "zip")]
    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
}
