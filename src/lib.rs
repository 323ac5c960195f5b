//! Offline asset pipeline for the game's resource pack.
//!
//! Every tool is a one-shot batch transform: extract assets from an installed
//! client, blend edited textures back in, transcode sounds, and emit the C
//! tables the engine embeds. The `resgen` binary wires them to a command line.

#[cfg(feature = "sound")]
pub mod aiff;
#[cfg(feature = "carray")]
pub mod carray;
#[cfg(feature = "pipeline")]
pub mod config;
pub mod error;
#[cfg(feature = "extract")]
pub mod extract;
#[cfg(feature = "file")]
pub mod file;
#[cfg(feature = "font")]
pub mod font;
#[cfg(feature = "hash")]
pub mod hash;
#[cfg(feature = "extract")]
pub mod index;
#[cfg(feature = "logging")]
pub mod logging;
#[cfg(feature = "pipeline")]
pub mod pipeline;
#[cfg(feature = "sound")]
pub mod sound;
#[cfg(feature = "extract")]
pub mod targets;
#[cfg(feature = "texture")]
pub mod texture;

pub use error::{Error, Result};
