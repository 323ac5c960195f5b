//! `resgen.toml`: settings for a full resource build.
//!
//! Every field is optional; the defaults reproduce the stock build. Relative
//! paths are resolved against the directory holding the config file.

use crate::{
    error::Result,
    index::{self, InstallLayout, DEFAULT_INDEX, DEFAULT_VERSIONS},
    sound,
};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const DEFAULT_FILE_NAME: &str = "resgen.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Installed client to extract from. Defaults to the platform location.
    pub minecraft_dir: Option<PathBuf>,
    pub targets: PathBuf,
    pub output: PathBuf,
    /// Hand-edited files copied over the extracted tree.
    pub overlay: Option<PathBuf>,
    /// Images rewritten as RGBA after masking.
    pub rgba: Vec<PathBuf>,
    pub extract: ExtractConfig,
    pub masks: Vec<MaskJob>,
    pub sound: Option<SoundConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub index: String,
    pub versions: Vec<String>,
    pub verify_hashes: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MaskJob {
    pub original: PathBuf,
    pub edited: PathBuf,
    pub mask: PathBuf,
    pub output: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SoundConfig {
    pub dir: PathBuf,
    pub sample_rate: u32,
    pub keep_source: bool,
    pub extensions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            minecraft_dir: None,
            targets: PathBuf::from("resourcelist.txt"),
            output: PathBuf::from("resources"),
            overlay: Some(PathBuf::from("resgen/edited")),
            rgba: vec![PathBuf::from("resources/textures/particles.png")],
            extract: ExtractConfig::default(),
            masks: vec![
                MaskJob::in_place("resources/textures/terrain"),
                MaskJob::in_place("resources/textures/gui/icons"),
            ],
            sound: Some(SoundConfig::default()),
        }
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            index: DEFAULT_INDEX.to_owned(),
            versions: DEFAULT_VERSIONS.iter().map(|v| v.to_string()).collect(),
            verify_hashes: false,
        }
    }
}

impl Default for SoundConfig {
    fn default() -> Self {
        let options = sound::Options::default();
        Self {
            dir: PathBuf::from("resources/newsound"),
            sample_rate: options.sample_rate,
            keep_source: options.keep_source,
            extensions: options.extensions,
        }
    }
}

impl MaskJob {
    /// `<stem>.png` blended with `<stem>_masked.png` through `<stem>_mask.png`,
    /// written back to `<stem>.png`.
    fn in_place(stem: &str) -> MaskJob {
        MaskJob {
            original: PathBuf::from(format!("{stem}.png")),
            edited: PathBuf::from(format!("{stem}_masked.png")),
            mask: PathBuf::from(format!("{stem}_mask.png")),
            output: PathBuf::from(format!("{stem}.png")),
        }
    }
}

impl SoundConfig {
    pub fn options(&self) -> sound::Options {
        sound::Options {
            sample_rate: self.sample_rate,
            keep_source: self.keep_source,
            extensions: self.extensions.clone(),
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Config> {
        Ok(toml_dep::from_str(text)?)
    }

    /// Reads `path` and resolves its relative paths against the file's directory.
    pub fn load(path: &Path) -> Result<Config> {
        let config = Config::from_toml(&fs::read_to_string(path)?)?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.relative_to(base))
    }

    /// Loads `path` if given, otherwise `resgen.toml` in the working directory
    /// when it exists, otherwise the defaults.
    pub fn discover(path: Option<&Path>) -> Result<Config> {
        match path {
            Some(path) => Config::load(path),
            None => {
                let path = Path::new(DEFAULT_FILE_NAME);
                if path.is_file() {
                    Config::load(path)
                } else {
                    log::info!("No {DEFAULT_FILE_NAME} found, using built-in defaults");
                    Ok(Config::default())
                }
            }
        }
    }

    pub fn relative_to(mut self, base: &Path) -> Config {
        let join = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };

        if let Some(dir) = self.minecraft_dir.as_mut() {
            join(dir);
        }
        join(&mut self.targets);
        join(&mut self.output);
        if let Some(overlay) = self.overlay.as_mut() {
            join(overlay);
        }
        for path in self.rgba.iter_mut() {
            join(path);
        }
        for mask in self.masks.iter_mut() {
            join(&mut mask.original);
            join(&mut mask.edited);
            join(&mut mask.mask);
            join(&mut mask.output);
        }
        if let Some(sound) = self.sound.as_mut() {
            join(&mut sound.dir);
        }
        self
    }

    pub fn install_dir(&self) -> Result<PathBuf> {
        match &self.minecraft_dir {
            Some(dir) => Ok(dir.clone()),
            None => index::default_install_dir(),
        }
    }

    pub fn layout(&self) -> Result<InstallLayout> {
        Ok(InstallLayout::new(self.install_dir()?)
            .with_index(self.extract.index.clone())
            .with_versions(self.extract.versions.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_build() {
        let config = Config::default();
        assert_eq!(config.targets, Path::new("resourcelist.txt"));
        assert_eq!(config.output, Path::new("resources"));
        assert_eq!(config.overlay.as_deref(), Some(Path::new("resgen/edited")));
        assert_eq!(config.masks.len(), 2);
        assert_eq!(
            config.masks[1],
            MaskJob {
                original: "resources/textures/gui/icons.png".into(),
                edited: "resources/textures/gui/icons_masked.png".into(),
                mask: "resources/textures/gui/icons_mask.png".into(),
                output: "resources/textures/gui/icons.png".into(),
            }
        );
        let sound = config.sound.unwrap();
        assert_eq!(sound.dir, Path::new("resources/newsound"));
        assert_eq!(sound.sample_rate, 16000);
        assert_eq!(config.extract.versions, vec!["b1.3_01", "b1.3b"]);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            minecraft_dir = "/opt/mc"
            masks = []

            [extract]
            verify_hashes = true

            [sound]
            keep_source = true
            "#,
        )
        .unwrap();
        assert_eq!(config.minecraft_dir.as_deref(), Some(Path::new("/opt/mc")));
        assert!(config.masks.is_empty());
        assert_eq!(config.extract.index, "pre-1.6");
        assert!(config.extract.verify_hashes);
        let sound = config.sound.unwrap();
        assert!(sound.keep_source);
        assert_eq!(sound.extensions, vec!["ogg"]);
    }

    #[test]
    fn unknown_type_is_an_error() {
        assert!(Config::from_toml("targets = 5").is_err());
    }

    #[test]
    fn relative_paths_follow_config_dir() {
        let config = Config::from_toml("output = \"out\"\nminecraft_dir = \"/abs/mc\"")
            .unwrap()
            .relative_to(Path::new("/work"));
        assert_eq!(config.output, Path::new("/work/out"));
        assert_eq!(config.targets, Path::new("/work/resourcelist.txt"));
        assert_eq!(
            config.masks[0].mask,
            Path::new("/work/resources/textures/terrain_mask.png")
        );
        assert_eq!(config.minecraft_dir.as_deref(), Some(Path::new("/abs/mc")));
    }
}
