//! Duplicate package detection.
//!
//! Installations are grouped by the name their manifest declares:
//! 1. A name with a single installation is unique
//! 2. A name with several installations is a duplicate, and all but one
//!    copy is estimated to be wasted bytes
//!
//! Grouping keeps first-seen order so the report is deterministic.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use bundledupes_core::{FileEntry, PackageGroup, ResolvedPackage};

/// A package bundled from more than one installation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// Declared package name.
    pub name: String,

    /// Every installation of the package.
    pub installs: Vec<ResolvedPackage>,

    /// Total bytes across all installations.
    pub size: u64,

    /// Estimated wasted bytes: size / installation count.
    pub savings: u64,
}

impl DuplicateGroup {
    /// Get the number of installations.
    pub fn count(&self) -> usize {
        self.installs.len()
    }

    /// Versions of every installation.
    pub fn versions(&self) -> Vec<&str> {
        self.installs.iter().map(|p| p.version.as_str()).collect()
    }
}

impl From<PackageGroup> for DuplicateGroup {
    fn from(group: PackageGroup) -> Self {
        let size = group.size();
        let savings = group.savings();
        Self {
            name: group.name,
            installs: group.installs,
            size,
            savings,
        }
    }
}

/// Results from duplicate package analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageReport {
    /// Duplicated packages, sorted by size descending.
    pub duplicates: Vec<DuplicateGroup>,

    /// Packages with a single installation, sorted by size descending.
    pub unique: Vec<ResolvedPackage>,

    /// Total size of every reconciled store file.
    pub total_size: u64,

    /// Number of reconciled store files.
    pub file_count: usize,

    /// Number of distinct package names.
    pub package_count: usize,

    /// Estimated wasted bytes of every duplicate, summed before truncating.
    pub total_savings: u64,
}

impl PackageReport {
    /// Check if any duplicates were found.
    pub fn has_duplicates(&self) -> bool {
        !self.duplicates.is_empty()
    }

    /// Number of duplicated package names.
    pub fn duplicate_count(&self) -> usize {
        self.duplicates.len()
    }
}

/// Group installations by declared name, in first-seen order.
pub fn group_by_name(packages: Vec<ResolvedPackage>) -> Vec<PackageGroup> {
    let mut by_name: IndexMap<String, Vec<ResolvedPackage>> = IndexMap::new();
    for package in packages {
        by_name.entry(package.name.clone()).or_default().push(package);
    }

    by_name
        .into_iter()
        .map(|(name, installs)| PackageGroup { name, installs })
        .collect()
}

/// Build the duplicate report.
///
/// `entries` are all reconciled store files; the total size is taken from
/// them independently of grouping.
pub fn aggregate(entries: &[FileEntry], packages: Vec<ResolvedPackage>) -> PackageReport {
    let total_size: u64 = entries.iter().map(|e| e.size).sum();

    let mut duplicates = Vec::new();
    let mut unique = Vec::new();
    let groups = group_by_name(packages);
    let package_count = groups.len();

    for mut group in groups {
        for install in &mut group.installs {
            install.sort_files_by_size();
        }

        if group.is_duplicate() {
            duplicates.push(DuplicateGroup::from(group));
        } else {
            unique.extend(group.installs);
        }
    }

    // Stable sorts: equal sizes keep first-seen order
    duplicates.sort_by(|a, b| b.size.cmp(&a.size));
    unique.sort_by_key(|p| std::cmp::Reverse(p.size()));

    // Per-group savings are truncated; the total is not
    let total_savings = duplicates
        .iter()
        .map(|g| g.size as f64 / g.count() as f64)
        .sum::<f64>() as u64;

    tracing::debug!(
        packages = package_count,
        duplicates = duplicates.len(),
        total_size,
        "aggregated packages"
    );

    PackageReport {
        duplicates,
        unique,
        total_size,
        file_count: entries.len(),
        package_count,
        total_savings,
    }
}
