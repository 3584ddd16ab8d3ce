//! Path reconciliation for bundled pnpm files.
//!
//! Bundle analyzer paths are not always filesystem paths:
//! 1. Concatenated modules are recorded as `<entry> + N modules (concatenated)/<inner path>`
//! 2. Paths are relative to the analyzer's context, which may differ from the project root
//!
//! The reconciler recovers the real `./node_modules/.pnpm/...` path of every
//! entry that comes from the package store and checks it exists.

use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;

use bundledupes_core::{AnalyzeError, FileEntry, Result};

/// Prefix shared by every file inside the pnpm package store.
pub const STORE_PREFIX: &str = "./node_modules/.pnpm/";

fn concatenated_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r" \+ [0-9]+ modules \(concatenated\)").unwrap())
}

fn modules_root_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^.*?node_modules").unwrap())
}

/// Replace a concatenated module path with the path of the inner module.
///
/// Paths without a concatenation marker are returned unchanged.
pub fn split_concatenated(path: &str) -> String {
    let mut parts = concatenated_pattern().split(path);
    let head = parts.next().unwrap_or(path);

    let inner = parts
        .next()
        .map(|tail| tail.trim_start_matches([' ', '+']))
        .filter(|tail| !tail.is_empty());

    match inner {
        Some(tail) if tail.starts_with('/') => format!(".{tail}"),
        Some(tail) => tail.to_string(),
        None => head.to_string(),
    }
}

/// Check if a path points into the pnpm package store.
pub fn is_store_path(path: &str) -> bool {
    path.contains(STORE_PREFIX)
}

/// Rewrite everything up to the first `node_modules` as `./node_modules`.
pub fn normalize_store_prefix(path: &str) -> String {
    modules_root_pattern()
        .replace(path, "./node_modules")
        .into_owned()
}

/// Maps analyzer paths onto the project's package store.
#[derive(Debug, Clone)]
pub struct PathReconciler {
    root: PathBuf,
}

impl PathReconciler {
    /// Create a reconciler validating paths against a project root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Rewrite, filter and validate entries.
    ///
    /// Entries outside the package store are dropped. Any surviving entry that
    /// fails validation aborts the run.
    pub fn reconcile(&self, entries: Vec<FileEntry>) -> Result<Vec<FileEntry>> {
        let total = entries.len();

        let reconciled: Vec<FileEntry> = entries
            .into_iter()
            .map(|entry| FileEntry {
                path: split_concatenated(&entry.path),
                size: entry.size,
            })
            .filter(|entry| is_store_path(&entry.path))
            .map(|entry| FileEntry {
                path: normalize_store_prefix(&entry.path),
                size: entry.size,
            })
            .collect();

        for entry in &reconciled {
            self.validate(entry)?;
        }

        tracing::debug!(
            total,
            kept = reconciled.len(),
            "reconciled package store entries"
        );

        Ok(reconciled)
    }

    /// Check that an entry is a non-empty store path that exists under the root.
    pub fn validate(&self, entry: &FileEntry) -> Result<()> {
        if entry.path.is_empty() {
            return Err(AnalyzeError::invalid_entry(&entry.path, "path is empty"));
        }

        if !entry.path.starts_with(STORE_PREFIX) {
            return Err(AnalyzeError::invalid_entry(
                &entry.path,
                "not in the node_modules/.pnpm directory",
            ));
        }

        let on_disk = self.root.join(&entry.path);
        if !on_disk.exists() {
            return Err(AnalyzeError::invalid_entry(
                &entry.path,
                format!("{} does not exist", on_disk.display()),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_split_plain_path() {
        let path = "./node_modules/.pnpm/a@1.0.0/node_modules/a/index.js";
        assert_eq!(split_concatenated(path), path);
    }

    #[test]
    fn test_split_analyzer_concatenation() {
        let path = "./node_modules/.pnpm/a@1.0.0/node_modules/a/index.js + 4 modules (concatenated)/node_modules/.pnpm/a@1.0.0/node_modules/a/lib/util.js";
        assert_eq!(
            split_concatenated(path),
            "./node_modules/.pnpm/a@1.0.0/node_modules/a/lib/util.js"
        );
    }

    #[test]
    fn test_split_joined_with_plus() {
        let path = "./a + 3 modules (concatenated) + ./node_modules/.pnpm/pkg@1.0.0/node_modules/pkg/b.js";
        assert_eq!(
            split_concatenated(path),
            "./node_modules/.pnpm/pkg@1.0.0/node_modules/pkg/b.js"
        );
    }

    #[test]
    fn test_split_marker_without_inner_path() {
        let path = "./src/index.js + 12 modules (concatenated)";
        assert_eq!(split_concatenated(path), "./src/index.js");
    }

    #[test]
    fn test_split_is_idempotent() {
        let paths = [
            "./a + 3 modules (concatenated) + ./node_modules/.pnpm/pkg@1.0.0/node_modules/pkg/b.js",
            "./x.js + 2 modules (concatenated)/node_modules/.pnpm/y@2.0.0/node_modules/y/z.js",
            "./src/plain.js",
        ];
        for path in paths {
            let once = split_concatenated(path);
            assert_eq!(split_concatenated(&once), once);
        }
    }

    #[test]
    fn test_normalize_store_prefix() {
        assert_eq!(
            normalize_store_prefix("../../node_modules/.pnpm/a@1.0.0/node_modules/a/index.js"),
            "./node_modules/.pnpm/a@1.0.0/node_modules/a/index.js"
        );
        assert_eq!(
            normalize_store_prefix("./node_modules/.pnpm/a@1.0.0/node_modules/a/index.js"),
            "./node_modules/.pnpm/a@1.0.0/node_modules/a/index.js"
        );
    }

    #[test]
    fn test_is_store_path() {
        assert!(is_store_path("./node_modules/.pnpm/a@1.0.0/node_modules/a/index.js"));
        assert!(is_store_path("../../node_modules/.pnpm/a@1.0.0/node_modules/a/x.js"));
        // A store under another project folder does not carry the `./node_modules` literal
        assert!(!is_store_path("../app/node_modules/.pnpm/a@1.0.0/node_modules/a/x.js"));
        assert!(!is_store_path("./src/index.js"));
        assert!(!is_store_path("./node_modules/a/index.js"));
    }

    #[test]
    fn test_validate_rejects_missing_file() {
        let temp = TempDir::new().unwrap();
        let reconciler = PathReconciler::new(temp.path());

        let entry = FileEntry::new("./node_modules/.pnpm/a@1.0.0/node_modules/a/index.js", 1);
        let err = reconciler.validate(&entry).unwrap_err();
        assert!(matches!(err, AnalyzeError::InvalidEntry { .. }));
    }

    #[test]
    fn test_validate_rejects_path_outside_store() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("index.js"), "").unwrap();
        let reconciler = PathReconciler::new(temp.path());

        let err = reconciler
            .validate(&FileEntry::new("./index.js", 1))
            .unwrap_err();
        assert!(matches!(err, AnalyzeError::InvalidEntry { .. }));

        let err = reconciler.validate(&FileEntry::new("", 1)).unwrap_err();
        assert!(matches!(err, AnalyzeError::InvalidEntry { .. }));
    }
}
