//! Duplicate package analysis for bundledupes.
//!
//! This crate turns the flat file list of a bundle report into a package
//! report:
//!
//! 1. **Reconciliation** recovers real `./node_modules/.pnpm/...` paths and
//!    checks they exist
//! 2. **Resolution** maps each file to its installation directory and reads
//!    the `package.json` found there
//! 3. **Aggregation** groups installations by package name and estimates the
//!    bytes wasted by duplicates
//!
//! ```rust,ignore
//! use bundledupes_analyze::PackageAnalyzer;
//! use bundledupes_report::{flatten, load_report};
//!
//! let nodes = load_report(".next/analyze/client.html".as_ref(), ReportFormat::Auto).unwrap();
//! let entries = flatten(&nodes, MissingSizePolicy::Zero);
//!
//! let report = PackageAnalyzer::new(".").analyze(entries).unwrap();
//!
//! println!("{} duplicate packages", report.duplicate_count());
//! println!("Wasted: {} bytes", report.total_savings);
//! ```

mod analyzer;
mod duplicates;
pub mod reconcile;
pub mod resolve;

pub use analyzer::PackageAnalyzer;
pub use duplicates::{DuplicateGroup, PackageReport, aggregate, group_by_name};
pub use reconcile::PathReconciler;
pub use resolve::{PackageResolver, installation_identity};

// Re-export core types
pub use bundledupes_core::{AnalyzeConfig, AnalyzeError, FileEntry, PackageGroup, ResolvedPackage};
