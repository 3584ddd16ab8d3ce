//! Chart data extraction from bundle analyzer reports.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use bundledupes_core::{AnalyzeError, ReportFormat, Result, SizeNode};

/// Pulls the size tree out of a report document.
pub trait ReportExtractor {
    /// Short name of the report format, used in log output.
    fn name(&self) -> &'static str;

    /// Extract the top-level size nodes from the document text.
    fn extract(&self, document: &str) -> Result<Vec<SizeNode>>;
}

/// The analyzer writes an array of chunks; a single root object is also accepted.
#[derive(Deserialize)]
#[serde(untagged)]
enum ChartPayload {
    Chunks(Vec<SizeNode>),
    Single(SizeNode),
}

impl From<ChartPayload> for Vec<SizeNode> {
    fn from(payload: ChartPayload) -> Self {
        match payload {
            ChartPayload::Chunks(nodes) => nodes,
            ChartPayload::Single(node) => vec![node],
        }
    }
}

fn parse_payload(raw: &str) -> Result<Vec<SizeNode>> {
    serde_json::from_str::<ChartPayload>(raw)
        .map(Vec::from)
        .map_err(|e| AnalyzeError::report_format(format!("chart data is not valid JSON: {e}")))
}

/// Extractor for the static HTML page (`analyzerMode: "static"`).
///
/// The page assigns the chart data to `window.chartData` inside a script
/// block, followed by the `window.entrypoints` or `window.defaultSizes`
/// assignment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChartDataExtractor;

impl ChartDataExtractor {
    fn pattern() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| {
            Regex::new(
                r"<script>\s*window\.chartData\s*=\s*(.*?);\s*window\.(?:entrypoints|defaultSizes)\s*=",
            )
            .unwrap()
        })
    }
}

impl ReportExtractor for ChartDataExtractor {
    fn name(&self) -> &'static str {
        "html"
    }

    fn extract(&self, document: &str) -> Result<Vec<SizeNode>> {
        // The assignment spans several lines in the generated page.
        let collapsed = document.replace(['\r', '\n'], "");

        let raw = Self::pattern()
            .captures(&collapsed)
            .and_then(|caps| caps.get(1))
            .ok_or_else(|| AnalyzeError::report_format("window.chartData assignment not found"))?;

        parse_payload(raw.as_str())
    }
}

/// Extractor for the analyzer's JSON output (`analyzerMode: "json"`).
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonReportExtractor;

impl ReportExtractor for JsonReportExtractor {
    fn name(&self) -> &'static str {
        "json"
    }

    fn extract(&self, document: &str) -> Result<Vec<SizeNode>> {
        parse_payload(document)
    }
}

/// Get the extractor for a report format. `Auto` falls back to HTML.
pub fn extractor_for(format: ReportFormat) -> Box<dyn ReportExtractor> {
    match format {
        ReportFormat::Json => Box::new(JsonReportExtractor),
        ReportFormat::Html | ReportFormat::Auto => Box::new(ChartDataExtractor),
    }
}

/// Read a report from disk and extract its size tree.
pub fn load_report(path: &Path, format: ReportFormat) -> Result<Vec<SizeNode>> {
    let document = std::fs::read_to_string(path).map_err(|source| AnalyzeError::ReportRead {
        path: path.to_path_buf(),
        source,
    })?;

    let extractor = extractor_for(format.resolve(path));
    let nodes = extractor.extract(&document)?;

    tracing::debug!(
        report = %path.display(),
        format = extractor.name(),
        roots = nodes.len(),
        "extracted chart data"
    );

    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
  <head><title>client</title></head>
  <body>
    <div id="app"></div>
    <script>
      window.chartData = [{"label":"main.js","groups":[{"path":"./node_modules/a/index.js","parsedSize":12}]}];
      window.entrypoints = ["main"];
      window.defaultSizes = "parsed";
    </script>
  </body>
</html>"#;

    #[test]
    fn test_extract_from_page() {
        let nodes = ChartDataExtractor.extract(PAGE).unwrap();

        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].leaf_count(), 1);
    }

    #[test]
    fn test_extract_without_entrypoints() {
        let page = "<script>\n  window.chartData = {\"groups\":[]};\n  window.defaultSizes = \"parsed\";\n</script>";
        let nodes = ChartDataExtractor.extract(page).unwrap();

        assert_eq!(nodes, vec![SizeNode::internal(Vec::new())]);
    }

    #[test]
    fn test_missing_marker() {
        let err = ChartDataExtractor
            .extract("<html><script>window.other = 1;</script></html>")
            .unwrap_err();
        assert!(matches!(err, AnalyzeError::ReportFormat { .. }));
    }

    #[test]
    fn test_malformed_payload() {
        let page = "<script>\n window.chartData = [{\"path\": ;\n window.defaultSizes = \"parsed\";</script>";
        let err = ChartDataExtractor.extract(page).unwrap_err();
        assert!(matches!(err, AnalyzeError::ReportFormat { .. }));
    }

    #[test]
    fn test_json_extractor() {
        let nodes = JsonReportExtractor
            .extract(r#"[{"path":"./a.js","parsedSize":1},{"path":"./b.js","statSize":2}]"#)
            .unwrap();
        assert_eq!(nodes.len(), 2);

        let err = JsonReportExtractor.extract("\"just a string\"").unwrap_err();
        assert!(matches!(err, AnalyzeError::ReportFormat { .. }));
    }

    #[test]
    fn test_extractor_for_format() {
        assert_eq!(extractor_for(ReportFormat::Json).name(), "json");
        assert_eq!(extractor_for(ReportFormat::Html).name(), "html");
        assert_eq!(extractor_for(ReportFormat::Auto).name(), "html");
    }
}
