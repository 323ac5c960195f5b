//! Resource extraction from an installed client.
//!
//! Each target is run through an ordered chain of [`Resolver`]s: the asset
//! index (backed by the hashed object store) first, then the version jar.
//! The first resolver that produces bytes wins and the bytes are written
//! under the output directory. Misses and per-target failures are logged and
//! recorded in the [`Report`]; they never abort the run.

use crate::{
    error::{Error, Result},
    file,
    index::{AssetIndex, InstallLayout},
    targets::{self, Target},
};
use log::{debug, info, warn};
use std::{
    fmt,
    fs::{self, File},
    io::{BufReader, Read, Seek},
    path::{Component, Path, PathBuf},
};
use zip::{result::ZipError, ZipArchive};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Index,
    Archive,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Index => f.write_str("index"),
            Source::Archive => f.write_str("jar"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Found(Source),
    NotFound,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct Resolution {
    pub target: Target,
    pub outcome: Outcome,
}

#[derive(Debug, Default)]
pub struct Report {
    pub resolutions: Vec<Resolution>,
}

impl Report {
    pub fn found(&self) -> usize {
        self.count(|outcome| matches!(outcome, Outcome::Found(_)))
    }

    pub fn found_via(&self, source: Source) -> usize {
        self.count(|outcome| *outcome == Outcome::Found(source))
    }

    pub fn not_found(&self) -> usize {
        self.count(|outcome| *outcome == Outcome::NotFound)
    }

    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, Outcome::Failed(_)))
    }

    pub fn is_complete(&self) -> bool {
        self.found() == self.resolutions.len()
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.resolutions
            .iter()
            .filter(|resolution| pred(&resolution.outcome))
            .count()
    }
}

/// One strategy for turning a logical path into file contents.
pub trait Resolver {
    fn source(&self) -> Source;

    /// `Ok(None)` means this resolver does not have `key`.
    fn resolve(&mut self, key: &str) -> Result<Option<Vec<u8>>>;
}

/// Looks keys up in the asset index and reads the matching object file.
pub struct IndexResolver {
    layout: InstallLayout,
    index: AssetIndex,
    #[cfg(feature = "hash")]
    verify: bool,
}

impl IndexResolver {
    pub fn new(layout: InstallLayout, index: AssetIndex) -> IndexResolver {
        IndexResolver {
            layout,
            index,
            #[cfg(feature = "hash")]
            verify: false,
        }
    }

    /// Check each object against the hash it is filed under before using it.
    #[cfg(feature = "hash")]
    pub fn verify_hashes(mut self, verify: bool) -> IndexResolver {
        self.verify = verify;
        self
    }
}

impl Resolver for IndexResolver {
    fn source(&self) -> Source {
        Source::Index
    }

    fn resolve(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        let hash = match self.index.hash(key) {
            Some(hash) => hash,
            None => return Ok(None),
        };

        let path = self.layout.object_path(hash);
        if !path.is_file() {
            warn!("Hash found but file missing for: {key}");
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        #[cfg(feature = "hash")]
        if self.verify && !crate::hash::matches(&bytes, hash) {
            warn!("Object {} does not match its hash, skipping", path.display());
            return Ok(None);
        }

        Ok(Some(bytes))
    }
}

/// Reads entries by exact name from a zip archive (the version jar).
pub struct ArchiveResolver<R> {
    archive: ZipArchive<R>,
}

impl ArchiveResolver<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self> {
        ArchiveResolver::new(BufReader::new(File::open(path)?))
    }
}

impl<R: Read + Seek> ArchiveResolver<R> {
    pub fn new(reader: R) -> Result<Self> {
        Ok(ArchiveResolver {
            archive: ZipArchive::new(reader)?,
        })
    }
}

impl<R: Read + Seek> Resolver for ArchiveResolver<R> {
    fn source(&self) -> Source {
        Source::Archive
    }

    fn resolve(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut entry = match self.archive.by_name(key) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes)?;
        Ok(Some(bytes))
    }
}

pub struct Extractor {
    resolvers: Vec<Box<dyn Resolver>>,
    output: PathBuf,
}

impl Extractor {
    /// An extractor with an empty chain. Add resolvers with [`Extractor::push`].
    pub fn new(output: impl Into<PathBuf>) -> Extractor {
        Extractor {
            resolvers: Vec::new(),
            output: output.into(),
        }
    }

    /// Builds the index-then-jar chain for an installation. Missing sources
    /// are logged and left out of the chain.
    pub fn for_install(
        layout: &InstallLayout,
        output: impl Into<PathBuf>,
        verify_hashes: bool,
    ) -> Result<Extractor> {
        let mut extractor = Extractor::new(output);

        let index_path = layout.index_path();
        match AssetIndex::load(&index_path)? {
            Some(index) => {
                debug!(
                    "Loaded {} index entries from {}",
                    index.len(),
                    index_path.display()
                );
                let resolver = IndexResolver::new(layout.clone(), index);
                #[cfg(feature = "hash")]
                let resolver = resolver.verify_hashes(verify_hashes);
                #[cfg(not(feature = "hash"))]
                if verify_hashes {
                    warn!("Hash verification requested but the hash feature is disabled");
                }
                extractor.push(resolver);
            }
            None => warn!("No asset index at {}", index_path.display()),
        }

        match layout.find_jar() {
            Some(jar) => match ArchiveResolver::open(&jar) {
                Ok(resolver) => {
                    info!("Using fallback JAR: {}", jar.display());
                    extractor.push(resolver);
                }
                Err(e) => warn!("Ignoring unreadable fallback JAR {}: {e}", jar.display()),
            },
            None => info!("No fallback JAR found. Only using asset index."),
        }

        if extractor.resolvers.is_empty() {
            warn!(
                "Neither an asset index nor a fallback JAR was found under {}; nothing will be extracted",
                layout.root().display()
            );
        }

        Ok(extractor)
    }

    pub fn push(&mut self, resolver: impl Resolver + 'static) -> &mut Extractor {
        self.resolvers.push(Box::new(resolver));
        self
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn run(&mut self, targets: &[Target]) -> Report {
        let resolutions = targets
            .iter()
            .map(|target| Resolution {
                target: target.clone(),
                outcome: self.extract(target),
            })
            .collect();
        Report { resolutions }
    }

    pub fn extract(&mut self, target: &Target) -> Outcome {
        let dest = match self.destination(&target.dest) {
            Ok(dest) => dest,
            Err(e) => {
                warn!("Skipping {}: {e}", target.key);
                return Outcome::Failed(e.to_string());
            }
        };

        for resolver in self.resolvers.iter_mut() {
            let source = resolver.source();
            match resolver.resolve(&target.key) {
                Ok(Some(bytes)) => {
                    return match file::write(&bytes, &dest) {
                        Ok(()) => {
                            info!("Extracted from {source}: {}", target.key);
                            Outcome::Found(source)
                        }
                        Err(e) => {
                            warn!("Failed to write {}: {e}", dest.display());
                            Outcome::Failed(e.to_string())
                        }
                    };
                }
                Ok(None) => debug!("{} not in {source}", target.key),
                Err(e) => warn!("Failed to read {} from {source}: {e}", target.key),
            }
        }

        warn!("File not found: {}", target.key);
        Outcome::NotFound
    }

    /// Joins `dest` onto the output directory, refusing anything that would
    /// land outside it.
    fn destination(&self, dest: &str) -> Result<PathBuf> {
        let relative = Path::new(dest);
        if dest.is_empty() {
            return Err(Error::InvalidFilename);
        }
        let contained = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));
        if !contained {
            return Err(Error::UnsafeDestination(dest.to_owned()));
        }
        Ok(self.output.join(relative))
    }
}

/// Extracts every target listed in `targets_file` from the installation at
/// `install` into `output`, using the default index and jar versions.
pub fn extract_resources(install: &Path, targets_file: &Path, output: &Path) -> Result<Report> {
    extract_with(&InstallLayout::new(install), targets_file, output, false)
}

pub fn extract_with(
    layout: &InstallLayout,
    targets_file: &Path,
    output: &Path,
    verify_hashes: bool,
) -> Result<Report> {
    let targets = targets::load(targets_file)?;
    let mut extractor = Extractor::for_install(layout, output, verify_hashes)?;
    let report = extractor.run(&targets);
    info!(
        "Extracted {} of {} targets ({} from index, {} from jar, {} missing, {} failed)",
        report.found(),
        report.resolutions.len(),
        report.found_via(Source::Index),
        report.found_via(Source::Archive),
        report.not_found(),
        report.failed()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    struct MapResolver {
        source: Source,
        entries: HashMap<&'static str, &'static [u8]>,
    }

    impl Resolver for MapResolver {
        fn source(&self) -> Source {
            self.source
        }

        fn resolve(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
            Ok(self.entries.get(key).map(|bytes| bytes.to_vec()))
        }
    }

    struct BrokenResolver;

    impl Resolver for BrokenResolver {
        fn source(&self) -> Source {
            Source::Index
        }

        fn resolve(&mut self, _key: &str) -> Result<Option<Vec<u8>>> {
            Err(Error::InvalidFilename)
        }
    }

    fn target(entry: &str) -> Target {
        Target::parse(entry).unwrap()
    }

    #[test]
    fn earlier_resolvers_take_priority() {
        let tmp = TempDir::new().unwrap();
        let mut extractor = Extractor::new(tmp.path());
        extractor
            .push(MapResolver {
                source: Source::Index,
                entries: HashMap::from([("a.png", &b"index"[..])]),
            })
            .push(MapResolver {
                source: Source::Archive,
                entries: HashMap::from([("a.png", &b"jar"[..]), ("b.png", &b"jar"[..])]),
            });

        let report = extractor.run(&[target("a.png"), target("b.png"), target("c.png")]);
        assert_eq!(report.resolutions[0].outcome, Outcome::Found(Source::Index));
        assert_eq!(report.resolutions[1].outcome, Outcome::Found(Source::Archive));
        assert_eq!(report.resolutions[2].outcome, Outcome::NotFound);
        assert_eq!(fs::read(tmp.path().join("a.png")).unwrap(), b"index");
        assert_eq!(fs::read(tmp.path().join("b.png")).unwrap(), b"jar");
        assert!(!tmp.path().join("c.png").exists());
        assert!(!report.is_complete());
    }

    #[test]
    fn resolver_errors_fall_through() {
        let tmp = TempDir::new().unwrap();
        let mut extractor = Extractor::new(tmp.path());
        extractor.push(BrokenResolver).push(MapResolver {
            source: Source::Archive,
            entries: HashMap::from([("a.png", &b"jar"[..])]),
        });

        assert_eq!(
            extractor.extract(&target("a.png")),
            Outcome::Found(Source::Archive)
        );
    }

    #[test]
    fn escaping_destinations_are_rejected() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        let mut extractor = Extractor::new(&out);
        extractor.push(MapResolver {
            source: Source::Index,
            entries: HashMap::from([("a.png", &b"x"[..])]),
        });

        let report = extractor.run(&[target("a.png>../escaped.png"), target("a.png>")]);
        assert_eq!(report.failed(), 2);
        assert!(!tmp.path().join("escaped.png").exists());
    }
}
