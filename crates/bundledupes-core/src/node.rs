//! Size tree and file entry types.

use serde::{Deserialize, Serialize};

/// Node shape as written by the bundle analyzer.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSizeNode {
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    parsed_size: Option<u64>,
    #[serde(default)]
    stat_size: Option<u64>,
    #[serde(default)]
    groups: Option<Vec<SizeNode>>,
}

/// A node of the size breakdown tree.
///
/// The analyzer distinguishes leaves from folders only by which fields are
/// present; that decision is made once here, at deserialization time.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawSizeNode")]
pub enum SizeNode {
    /// A bundled file.
    Leaf {
        /// Module path as recorded by the bundler.
        path: String,
        /// `parsedSize` when present, else `statSize`.
        size: Option<u64>,
    },
    /// A folder or chunk. Carries no size of its own.
    Internal {
        /// Child nodes in report order.
        children: Vec<SizeNode>,
    },
}

impl From<RawSizeNode> for SizeNode {
    fn from(raw: RawSizeNode) -> Self {
        match (raw.groups, raw.path) {
            (Some(children), _) if !children.is_empty() => SizeNode::Internal { children },
            (_, Some(path)) => SizeNode::Leaf {
                path,
                size: raw.parsed_size.or(raw.stat_size),
            },
            // Neither children nor a path: nothing to report.
            _ => SizeNode::Internal {
                children: Vec::new(),
            },
        }
    }
}

impl SizeNode {
    /// Create a leaf node.
    pub fn leaf(path: impl Into<String>, size: Option<u64>) -> Self {
        SizeNode::Leaf {
            path: path.into(),
            size,
        }
    }

    /// Create an internal node.
    pub fn internal(children: Vec<SizeNode>) -> Self {
        SizeNode::Internal { children }
    }

    /// Check if this is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, SizeNode::Leaf { .. })
    }

    /// Number of leaves in this subtree.
    pub fn leaf_count(&self) -> usize {
        match self {
            SizeNode::Leaf { .. } => 1,
            SizeNode::Internal { children } => children.iter().map(SizeNode::leaf_count).sum(),
        }
    }
}

/// A bundled file and the bytes it contributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// File path, relative to the project root once reconciled.
    pub path: String,
    /// Size in bytes.
    pub size: u64,
}

impl FileEntry {
    /// Create a new file entry.
    pub fn new(path: impl Into<String>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }
}
