use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use log;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::content::{read_file_content, FileRecord};
use crate::error::Result;
use crate::ignore_rules::IgnoreMatcher;
use crate::manifest::{read_project_info, read_readme, ProjectInfo};
use crate::walk::{walk_directory, NodeKind, TreeNode};

/// Aggregate counters over the collected file records. `file_types` maps
/// lowercased extensions (dot included, empty string for none) to counts,
/// keyed in first-seen order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocStats {
    pub total_files: usize,
    pub total_size: u64,
    pub file_types: IndexMap<String, usize>,
}

/// The assembled documentation for one repository: project metadata, the
/// filtered tree, every surviving file's content and summary statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub project_info: ProjectInfo,
    pub readme: String,
    pub file_tree: Vec<TreeNode>,
    pub files: Vec<FileRecord>,
    pub stats: DocStats,
    pub generated_at: DateTime<Utc>,
}

impl Document {
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Walks `root` and assembles the full document. Traversal failures are
/// fatal; manifest, README and per-file read failures degrade in place.
pub fn generate_documentation(root: &Path) -> Result<Document> {
    log::info!("Generating documentation for {}", root.display());

    let matcher = IgnoreMatcher::build(root)?;
    let file_tree = walk_directory(root, &matcher)?;
    log::debug!("File tree built: {} top-level entries.", file_tree.len());

    let project_info = read_project_info(root);
    let readme = read_readme(root);

    let files = collect_files(root, &file_tree);
    let stats = compute_stats(&files);
    log::debug!(
        "Collected {} files ({} bytes total).",
        stats.total_files,
        stats.total_size
    );

    Ok(Document {
        project_info,
        readme,
        file_tree,
        files,
        stats,
        generated_at: Utc::now(),
    })
}

/// Reads every file in the tree, depth-first in listing order. Uses an
/// explicit stack; children are pushed reversed so they pop in order.
fn collect_files(root: &Path, tree: &[TreeNode]) -> Vec<FileRecord> {
    let mut records = Vec::new();
    let mut stack: Vec<&TreeNode> = tree.iter().rev().collect();

    while let Some(node) = stack.pop() {
        match node.kind {
            NodeKind::File => {
                let full_path = root.join(&node.path);
                records.push(read_file_content(&full_path, &node.path, &node.name));
            }
            NodeKind::Directory => {
                if let Some(children) = &node.children {
                    stack.extend(children.iter().rev());
                }
            }
        }
    }

    records
}

fn compute_stats(files: &[FileRecord]) -> DocStats {
    let mut file_types: IndexMap<String, usize> = IndexMap::new();
    let mut total_size: u64 = 0;

    for record in files {
        total_size += record.size;
        *file_types.entry(extension_key(&record.name)).or_insert(0) += 1;
    }

    DocStats {
        total_files: files.len(),
        total_size,
        file_types,
    }
}

/// Extension key for the type histogram: the final dot onward, lowercased.
/// A leading dot is not an extension, so dotfiles map to the empty key.
fn extension_key(name: &str) -> String {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name[idx..].to_lowercase(),
        _ => String::new(),
    }
}
