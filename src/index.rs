//! Asset index and the on-disk layout of an installed client.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

pub const DEFAULT_INDEX: &str = "pre-1.6";
/// Archive versions probed for the fallback jar, in priority order.
pub const DEFAULT_VERSIONS: [&str; 2] = ["b1.3_01", "b1.3b"];

#[derive(Debug, Clone, Deserialize)]
pub struct AssetObject {
    pub hash: String,
}

/// Logical path to content hash, as stored in `assets/indexes/<name>.json`.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct AssetIndex {
    #[serde(default)]
    objects: HashMap<String, AssetObject>,
}

impl AssetIndex {
    pub fn from_json(text: &str) -> Result<AssetIndex> {
        Ok(serde_json::from_str(text)?)
    }

    /// Loads the index at `path`. A missing file is `Ok(None)`; a file that
    /// exists but does not parse is an error.
    pub fn load(path: &Path) -> Result<Option<AssetIndex>> {
        if !path.is_file() {
            return Ok(None);
        }
        let text = fs::read_to_string(path)?;
        AssetIndex::from_json(&text).map(Some)
    }

    pub fn hash(&self, key: &str) -> Option<&str> {
        self.objects.get(key).map(|object| object.hash.as_str())
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct InstallLayout {
    root: PathBuf,
    index: String,
    versions: Vec<String>,
}

impl InstallLayout {
    pub fn new(root: impl Into<PathBuf>) -> InstallLayout {
        InstallLayout {
            root: root.into(),
            index: DEFAULT_INDEX.to_owned(),
            versions: DEFAULT_VERSIONS.iter().map(|v| v.to_string()).collect(),
        }
    }

    pub fn with_index(mut self, index: impl Into<String>) -> InstallLayout {
        self.index = index.into();
        self
    }

    pub fn with_versions(mut self, versions: Vec<String>) -> InstallLayout {
        self.versions = versions;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn index_path(&self) -> PathBuf {
        self.root
            .join("assets")
            .join("indexes")
            .join(format!("{}.json", self.index))
    }

    /// `<root>/assets/objects/<first two hash chars>/<hash>`
    pub fn object_path(&self, hash: &str) -> PathBuf {
        let shard = hash.get(..2).unwrap_or(hash);
        self.root
            .join("assets")
            .join("objects")
            .join(shard)
            .join(hash)
    }

    pub fn jar_candidates(&self) -> Vec<PathBuf> {
        self.versions
            .iter()
            .map(|version| {
                self.root
                    .join("versions")
                    .join(version)
                    .join(format!("{version}.jar"))
            })
            .collect()
    }

    /// First candidate jar that exists on disk.
    pub fn find_jar(&self) -> Option<PathBuf> {
        self.jar_candidates().into_iter().find(|path| path.is_file())
    }
}

/// Where the client keeps its data on this platform.
pub fn default_install_dir() -> Result<PathBuf> {
    let dirs = directories::BaseDirs::new().ok_or(Error::NoInstallDir)?;
    let dir = if cfg!(target_os = "windows") {
        // Roaming AppData, i.e. %APPDATA%
        dirs.config_dir().join(".minecraft")
    } else if cfg!(target_os = "macos") {
        dirs.data_dir().join("minecraft")
    } else {
        dirs.home_dir().join(".minecraft")
    };
    Ok(dir)
}
