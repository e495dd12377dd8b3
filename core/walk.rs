use crate::error::{AppError, Result};
use crate::ignore_rules::IgnoreMatcher;
use log;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Directory,
}

/// One filesystem entry in the filtered tree. `path` is relative to the
/// documentation root and always `/`-separated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
}

/// Walks `root` into a tree of nodes, skipping ignored entries and
/// pruning directories left without children. Entries keep the native
/// directory listing order. Stat or list failures abort the whole walk;
/// a partially known tree is unsafe to return.
pub fn walk_directory(root: &Path, matcher: &IgnoreMatcher) -> Result<Vec<TreeNode>> {
    let mut visited = HashSet::new();
    walk_level(root, "", matcher, &mut visited)
}

fn walk_level(
    dir: &Path,
    relative_base: &str,
    matcher: &IgnoreMatcher,
    visited: &mut HashSet<PathBuf>,
) -> Result<Vec<TreeNode>> {
    let canonical = dir.canonicalize().map_err(|e| AppError::Walk {
        path: dir.to_path_buf(),
        source: e,
    })?;
    // Cycle guard for symlinked directories; a repeat visit is skipped
    // silently and the revisiting link gets pruned as an empty directory.
    if !visited.insert(canonical) {
        log::debug!("Already visited directory, skipping: {}", dir.display());
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(dir).map_err(|e| AppError::Walk {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut nodes = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| AppError::Walk {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let relative_path = join_relative(relative_base, &name);
        let full_path = entry.path();
        let metadata = fs::metadata(&full_path).map_err(|e| AppError::Walk {
            path: full_path.clone(),
            source: e,
        })?;

        if matcher.ignores(&relative_path, metadata.is_dir()) {
            log::trace!("Skipping ignored path: {}", relative_path);
            continue;
        }

        if metadata.is_dir() {
            let children = walk_level(&full_path, &relative_path, matcher, visited)?;
            if children.is_empty() {
                log::trace!("Dropping empty directory: {}", relative_path);
                continue;
            }
            nodes.push(TreeNode {
                name,
                kind: NodeKind::Directory,
                path: relative_path,
                size: None,
                children: Some(children),
            });
        } else {
            nodes.push(TreeNode {
                name,
                kind: NodeKind::File,
                path: relative_path,
                size: Some(metadata.len()),
                children: None,
            });
        }
    }
    Ok(nodes)
}

fn join_relative(base: &str, name: &str) -> String {
    if base.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", base, name)
    }
}
