//! End-to-end analysis of flattened report entries.

use bundledupes_core::{AnalyzeConfig, FileEntry, Result};

use crate::duplicates::{PackageReport, aggregate};
use crate::reconcile::PathReconciler;
use crate::resolve::PackageResolver;

/// Runs reconciliation, resolution and aggregation against one project root.
pub struct PackageAnalyzer {
    reconciler: PathReconciler,
    resolver: PackageResolver,
}

impl PackageAnalyzer {
    /// Create an analyzer for a project root.
    pub fn new(root: impl Into<std::path::PathBuf>) -> Self {
        let root = root.into();
        Self {
            reconciler: PathReconciler::new(root.clone()),
            resolver: PackageResolver::new(root),
        }
    }

    /// Create an analyzer from a config.
    pub fn with_config(config: &AnalyzeConfig) -> Self {
        Self::new(config.root.clone())
    }

    /// Analyze flattened report entries.
    pub fn analyze(&self, entries: Vec<FileEntry>) -> Result<PackageReport> {
        let entries = self.reconciler.reconcile(entries)?;
        let packages = self.resolver.resolve(entries.clone())?;
        Ok(aggregate(&entries, packages))
    }
}
