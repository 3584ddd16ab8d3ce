//! Analysis configuration types.

use std::path::{Path, PathBuf};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Report location used when none is given, relative to the project root.
pub const DEFAULT_REPORT_PATH: &str = ".next/analyze/client.html";

/// Sizes above this many bytes are highlighted in the text report.
pub const DEFAULT_LARGE_SIZE_THRESHOLD: u64 = 20_000;

/// Format of the bundle analyzer report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Pick from the file extension.
    #[default]
    Auto,
    /// Static HTML page with the chart data embedded in a script block.
    Html,
    /// Raw chart data written by the analyzer's JSON mode.
    Json,
}

impl ReportFormat {
    /// Resolve `Auto` against the report path. Explicit formats are kept.
    pub fn resolve(self, path: &Path) -> Self {
        match self {
            Self::Auto => {
                let is_json = path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
                if is_json { Self::Json } else { Self::Html }
            }
            other => other,
        }
    }
}

/// What to do with a leaf that carries neither `parsedSize` nor `statSize`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingSizePolicy {
    /// Keep the entry with a size of zero.
    #[default]
    Zero,
    /// Drop the entry.
    Exclude,
}

/// Configuration for an analysis run.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct AnalyzeConfig {
    /// Project root. Entry paths and manifests are resolved against it.
    #[builder(default = "PathBuf::from(\".\")")]
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Explicit report path (None = `<root>/.next/analyze/client.html`).
    #[builder(default)]
    #[serde(default)]
    pub report_path: Option<PathBuf>,

    /// Report format.
    #[builder(default)]
    #[serde(default)]
    pub report_format: ReportFormat,

    /// Handling of leaves without any size.
    #[builder(default)]
    #[serde(default)]
    pub missing_size: MissingSizePolicy,

    /// Byte count above which sizes are rendered as large.
    #[builder(default = "DEFAULT_LARGE_SIZE_THRESHOLD")]
    #[serde(default = "default_large_size_threshold")]
    pub large_size_threshold: u64,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_large_size_threshold() -> u64 {
    DEFAULT_LARGE_SIZE_THRESHOLD
}

impl AnalyzeConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref root) = self.root {
            if root.as_os_str().is_empty() {
                return Err("Root path cannot be empty".to_string());
            }
        }
        if let Some(Some(ref report)) = self.report_path {
            if report.as_os_str().is_empty() {
                return Err("Report path cannot be empty".to_string());
            }
        }
        Ok(())
    }
}

impl AnalyzeConfig {
    /// Create a new config builder.
    pub fn builder() -> AnalyzeConfigBuilder {
        AnalyzeConfigBuilder::default()
    }

    /// Create a default config for a project root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            report_path: None,
            report_format: ReportFormat::Auto,
            missing_size: MissingSizePolicy::Zero,
            large_size_threshold: DEFAULT_LARGE_SIZE_THRESHOLD,
        }
    }

    /// Path of the report to analyze.
    pub fn report_path(&self) -> PathBuf {
        match &self.report_path {
            Some(path) => path.clone(),
            None => self.root.join(DEFAULT_REPORT_PATH),
        }
    }

    /// Report format with `Auto` resolved.
    pub fn effective_report_format(&self) -> ReportFormat {
        self.report_format.resolve(&self.report_path())
    }
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        Self::new(".")
    }
}
