use crate::error::Result;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use log;
use once_cell::sync::Lazy;
use std::path::Path;

/// Patterns applied to every traversal, whether or not the root carries a
/// `.gitignore`. They cover version-control metadata, dependency and build
/// output directories, logs, OS artifacts, environment files and temp files.
pub const BUILTIN_IGNORE_PATTERNS: [&str; 9] = [
    "node_modules/**",
    ".git/**",
    "*.log",
    ".DS_Store",
    "dist/**",
    "build/**",
    ".env*",
    "*.tmp",
    "*.temp",
];

static BUILTIN_MATCHER: Lazy<Gitignore> = Lazy::new(|| {
    let mut builder = GitignoreBuilder::new("");
    for pattern in BUILTIN_IGNORE_PATTERNS {
        builder
            .add_line(None, pattern)
            .expect("Failed to compile built-in ignore pattern");
    }
    builder
        .build()
        .expect("Failed to build built-in ignore matcher")
});

/// Gitignore-semantics predicate over paths relative to a documentation
/// root. User rules come from `{root}/.gitignore`; the built-in set is
/// appended after them, so a plain user negation cannot rescue a path the
/// built-ins cover.
#[derive(Debug)]
pub struct IgnoreMatcher {
    user: Gitignore,
}

impl IgnoreMatcher {
    pub fn build(root: &Path) -> Result<Self> {
        let mut builder = GitignoreBuilder::new(root);
        let gitignore_path = root.join(".gitignore");
        if gitignore_path.is_file() {
            log::debug!("Reading ignore rules from: {}", gitignore_path.display());
            if let Some(err) = builder.add(&gitignore_path) {
                return Err(err.into());
            }
        } else {
            log::debug!("No .gitignore at {}, using built-ins only.", root.display());
        }
        let user = builder.build()?;
        log::trace!("Compiled {} user ignore rules.", user.num_ignores());
        Ok(Self { user })
    }

    /// True when `relative_path` is excluded from traversal output.
    /// `is_dir` lets directory-only patterns (trailing `/`) match.
    pub fn ignores(&self, relative_path: &str, is_dir: bool) -> bool {
        if BUILTIN_MATCHER.matched(relative_path, is_dir).is_ignore() {
            log::trace!("Path excluded by built-in rules: {}", relative_path);
            return true;
        }
        if self.user.matched(relative_path, is_dir).is_ignore() {
            log::trace!("Path excluded by user rules: {}", relative_path);
            return true;
        }
        false
    }
}
