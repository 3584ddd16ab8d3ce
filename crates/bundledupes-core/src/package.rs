//! Resolved package installations and name groups.

use serde::{Deserialize, Serialize};

use crate::node::FileEntry;

/// The fields of a `package.json` this tool reads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PackageManifest {
    /// Declared package name.
    pub name: String,
    /// Declared version.
    pub version: String,
}

/// One installed copy of a package and the bundled files it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPackage {
    /// Installation directory holding the manifest, relative to the root.
    pub manifest_path: String,
    /// Declared package name.
    pub name: String,
    /// Declared version.
    pub version: String,
    /// Files from this installation, never empty.
    pub files: Vec<FileEntry>,
}

impl ResolvedPackage {
    /// Total bytes contributed by this installation.
    pub fn size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }

    /// Sort files by size descending, keeping report order for ties.
    pub fn sort_files_by_size(&mut self) {
        self.files.sort_by(|a, b| b.size.cmp(&a.size));
    }
}

/// All installations that declare the same package name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageGroup {
    /// Shared package name.
    pub name: String,
    /// Installations, in first-seen order. Never empty.
    pub installs: Vec<ResolvedPackage>,
}

impl PackageGroup {
    /// Check if the package is bundled from more than one installation.
    pub fn is_duplicate(&self) -> bool {
        self.installs.len() > 1
    }

    /// Total bytes across all installations.
    pub fn size(&self) -> u64 {
        self.installs.iter().map(ResolvedPackage::size).sum()
    }

    /// Estimated bytes saved by collapsing to a single installation.
    ///
    /// Assumes every installation is the same size.
    pub fn savings(&self) -> u64 {
        match self.installs.len() as u64 {
            0 => 0,
            count => self.size() / count,
        }
    }

    /// Versions of every installation, in install order.
    pub fn versions(&self) -> Vec<&str> {
        self.installs.iter().map(|p| p.version.as_str()).collect()
    }
}
