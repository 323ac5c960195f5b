//! Target lists: which assets to pull out of an installation, and where to put them.

use crate::{error::Result, file};
use std::path::Path;

/// Separates the lookup key from an output path override.
pub const REMAP_SEPARATOR: char = '>';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Logical path looked up in the index and the fallback archive.
    pub key: String,
    /// Output path, relative to the output directory.
    pub dest: String,
}

impl Target {
    /// Parses one list entry: either `key` or `key>dest`. Blank entries yield `None`.
    pub fn parse(entry: &str) -> Option<Target> {
        let entry = entry.trim();
        if entry.is_empty() {
            return None;
        }

        let target = match entry.split_once(REMAP_SEPARATOR) {
            Some((key, dest)) => Target {
                key: key.to_owned(),
                dest: dest.to_owned(),
            },
            None => Target {
                key: entry.to_owned(),
                dest: entry.to_owned(),
            },
        };
        Some(target)
    }

    pub fn is_remapped(&self) -> bool {
        self.key != self.dest
    }
}

pub fn parse_list(text: &str) -> Vec<Target> {
    text.lines().filter_map(Target::parse).collect()
}

pub fn load(path: &Path) -> Result<Vec<Target>> {
    Ok(parse_list(&file::read(path)?))
}
