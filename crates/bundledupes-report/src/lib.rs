//! Bundle analyzer report loading for bundledupes.
//!
//! This crate turns a report written by webpack-bundle-analyzer into a flat
//! list of bundled files:
//!
//! - **Extraction** pulls the chart data out of the host document. Each
//!   supported report format has its own [`ReportExtractor`].
//! - **Flattening** walks the size tree depth-first and emits one
//!   [`FileEntry`] per leaf.
//!
//! # Example
//!
//! ```rust,no_run
//! use bundledupes_report::{flatten, load_report};
//! use bundledupes_core::{MissingSizePolicy, ReportFormat};
//!
//! let nodes = load_report(".next/analyze/client.html".as_ref(), ReportFormat::Auto).unwrap();
//! let entries = flatten(&nodes, MissingSizePolicy::Zero);
//!
//! println!("{} bundled files", entries.len());
//! ```

mod extractor;
mod flatten;

pub use extractor::{
    ChartDataExtractor, JsonReportExtractor, ReportExtractor, extractor_for, load_report,
};
pub use flatten::flatten;

// Re-export core types for convenience
pub use bundledupes_core::{AnalyzeError, FileEntry, MissingSizePolicy, ReportFormat, SizeNode};
