//! Core types and configuration for bundledupes.
//!
//! This crate provides the data structures shared by every stage of the
//! pipeline: the raw size tree read from a bundle report, the flattened file
//! entries, the resolved package installations and the error type.

mod config;
mod error;
mod node;
mod package;

pub use config::{AnalyzeConfig, AnalyzeConfigBuilder, MissingSizePolicy, ReportFormat};
pub use error::AnalyzeError;
pub use node::{FileEntry, SizeNode};
pub use package::{PackageGroup, PackageManifest, ResolvedPackage};

/// Convenience result alias used across the bundledupes crates.
pub type Result<T, E = AnalyzeError> = std::result::Result<T, E>;
