//! Size tree flattening.

use bundledupes_core::{FileEntry, MissingSizePolicy, SizeNode};

/// Collect every leaf of the size trees, depth-first and in report order.
pub fn flatten(nodes: &[SizeNode], policy: MissingSizePolicy) -> Vec<FileEntry> {
    let mut entries = Vec::new();
    for node in nodes {
        collect_leaves(node, policy, &mut entries);
    }
    entries
}

fn collect_leaves(node: &SizeNode, policy: MissingSizePolicy, entries: &mut Vec<FileEntry>) {
    match node {
        SizeNode::Internal { children } => {
            for child in children {
                collect_leaves(child, policy, entries);
            }
        }
        SizeNode::Leaf { path, size: Some(size) } => {
            entries.push(FileEntry::new(path.clone(), *size));
        }
        SizeNode::Leaf { path, size: None } => match policy {
            MissingSizePolicy::Zero => {
                tracing::debug!(path = %path, "leaf has no size, counting as zero");
                entries.push(FileEntry::new(path.clone(), 0));
            }
            MissingSizePolicy::Exclude => {
                tracing::debug!(path = %path, "leaf has no size, excluding");
            }
        },
    }
}
