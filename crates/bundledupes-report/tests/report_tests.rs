use bundledupes_report::{
    AnalyzeError, FileEntry, MissingSizePolicy, ReportFormat, flatten, load_report,
};
use std::fs;
use tempfile::TempDir;

const CLIENT_HTML: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="UTF-8"/>
    <title>client [23 Oct 2024 at 10:00]</title>
  </head>
  <body>
    <div id="app"></div>
    <script>
      window.chartData = [
        {
          "label": "static/chunks/pages/_app.js",
          "isAsset": true,
          "statSize": 4000,
          "parsedSize": 1500,
          "groups": [
            {
              "label": "node_modules/.pnpm",
              "path": "./node_modules/.pnpm",
              "statSize": 3000,
              "groups": [
                {
                  "id": 11,
                  "label": "index.js",
                  "path": "./node_modules/.pnpm/lodash@4.0.0/node_modules/lodash/index.js",
                  "statSize": 2000,
                  "parsedSize": 1000
                },
                {
                  "id": 12,
                  "label": "index.js + 3 modules (concatenated)",
                  "path": "./node_modules/.pnpm/react@18.2.0/node_modules/react/index.js + 3 modules (concatenated)",
                  "statSize": 900,
                  "groups": [
                    {
                      "label": "react.production.min.js",
                      "path": "./node_modules/.pnpm/react@18.2.0/node_modules/react/index.js + 3 modules (concatenated)/node_modules/.pnpm/react@18.2.0/node_modules/react/cjs/react.production.min.js",
                      "parsedSize": 450
                    }
                  ]
                }
              ]
            },
            { "label": "app.css", "path": "./src/app.css", "statSize": 80 }
          ]
        }
      ];
      window.entrypoints = ["main", "pages/_app"];
      window.defaultSizes = "parsed";
    </script>
  </body>
</html>
"#;

#[test]
fn test_load_and_flatten_html_report() {
    let temp = TempDir::new().unwrap();
    let report = temp.path().join("client.html");
    fs::write(&report, CLIENT_HTML).unwrap();

    let nodes = load_report(&report, ReportFormat::Auto).unwrap();
    let entries = flatten(&nodes, MissingSizePolicy::Zero);

    assert_eq!(
        entries,
        vec![
            FileEntry::new(
                "./node_modules/.pnpm/lodash@4.0.0/node_modules/lodash/index.js",
                1000
            ),
            FileEntry::new(
                "./node_modules/.pnpm/react@18.2.0/node_modules/react/index.js + 3 modules (concatenated)/node_modules/.pnpm/react@18.2.0/node_modules/react/cjs/react.production.min.js",
                450
            ),
            FileEntry::new("./src/app.css", 80),
        ]
    );
}

#[test]
fn test_load_json_report_by_extension() {
    let temp = TempDir::new().unwrap();
    let report = temp.path().join("report.json");
    fs::write(
        &report,
        r#"{"groups":[{"path":"./node_modules/.pnpm/lodash@4.0.0/node_modules/lodash/index.js","parsedSize":1000}]}"#,
    )
    .unwrap();

    let nodes = load_report(&report, ReportFormat::Auto).unwrap();
    let entries = flatten(&nodes, MissingSizePolicy::Zero);

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].size, 1000);
}

#[test]
fn test_explicit_format_overrides_extension() {
    let temp = TempDir::new().unwrap();
    let report = temp.path().join("report.txt");
    fs::write(&report, r#"[{"path":"./a.js","parsedSize":1}]"#).unwrap();

    assert!(load_report(&report, ReportFormat::Json).is_ok());

    let err = load_report(&report, ReportFormat::Auto).unwrap_err();
    assert!(matches!(err, AnalyzeError::ReportFormat { .. }));
}

#[test]
fn test_missing_report_file() {
    let temp = TempDir::new().unwrap();
    let err = load_report(&temp.path().join("missing.html"), ReportFormat::Auto).unwrap_err();

    assert!(matches!(err, AnalyzeError::ReportRead { .. }));
}

#[test]
fn test_malformed_chart_data() {
    let temp = TempDir::new().unwrap();
    let report = temp.path().join("client.html");
    fs::write(
        &report,
        "<script>\n  window.chartData = {not json};\n  window.defaultSizes = \"parsed\";\n</script>",
    )
    .unwrap();

    let err = load_report(&report, ReportFormat::Html).unwrap_err();
    assert!(matches!(err, AnalyzeError::ReportFormat { .. }));
}
