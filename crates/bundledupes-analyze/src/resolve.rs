//! Package resolution for reconciled store entries.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;

use bundledupes_core::{AnalyzeError, FileEntry, PackageManifest, ResolvedPackage, Result};

/// Manifest file read from each installation directory.
pub const MANIFEST_FILE: &str = "package.json";

fn installation_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // <store key>/node_modules/(@scope/name | name)
        Regex::new(concat!(
            r"\./node_modules/\.pnpm/[@.A-Za-z0-9+_()-]+/node_modules/",
            r"(?:@[.A-Za-z0-9+_-]+/[.A-Za-z0-9+_-]+|[.A-Za-z0-9+_-]+)",
        ))
        .unwrap()
    })
}

/// Installation directory owning a store path, e.g.
/// `./node_modules/.pnpm/lodash@4.0.0/node_modules/lodash`.
pub fn installation_identity(path: &str) -> Option<&str> {
    installation_pattern().find(path).map(|m| m.as_str())
}

/// Maps file entries to the installed packages that produced them.
#[derive(Debug, Clone)]
pub struct PackageResolver {
    root: PathBuf,
}

impl PackageResolver {
    /// Create a resolver reading manifests under a project root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Group entries by installation directory and read each manifest once.
    ///
    /// Installations come out in the order their first file appears.
    pub fn resolve(&self, entries: Vec<FileEntry>) -> Result<Vec<ResolvedPackage>> {
        let mut by_install: IndexMap<String, Vec<FileEntry>> = IndexMap::new();

        for entry in entries {
            let identity = installation_identity(&entry.path)
                .ok_or_else(|| AnalyzeError::UnresolvableEntry {
                    path: entry.path.clone(),
                })?
                .to_string();
            by_install.entry(identity).or_default().push(entry);
        }

        tracing::debug!(installs = by_install.len(), "grouped entries by installation");

        by_install
            .into_iter()
            .map(|(manifest_path, files)| {
                let manifest = self.read_manifest(&manifest_path)?;
                Ok(ResolvedPackage {
                    manifest_path,
                    name: manifest.name,
                    version: manifest.version,
                    files,
                })
            })
            .collect()
    }

    /// Read the manifest inside an installation directory.
    pub fn read_manifest(&self, install_dir: &str) -> Result<PackageManifest> {
        let path = self.manifest_file(install_dir);

        let contents = std::fs::read_to_string(&path).map_err(|source| {
            AnalyzeError::ManifestRead {
                path: path.clone(),
                source,
            }
        })?;

        serde_json::from_str(&contents).map_err(|source| AnalyzeError::ManifestParse { path, source })
    }

    fn manifest_file(&self, install_dir: &str) -> PathBuf {
        self.root.join(Path::new(install_dir)).join(MANIFEST_FILE)
    }
}
