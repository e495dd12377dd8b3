pub mod config;
pub mod content;
pub mod document;
pub mod error;
pub mod ignore_rules;
pub mod manifest;
pub mod markdown;
pub mod store;
pub mod walk;

pub use config::{Config, OutputConfig, SaveConfig};
pub use content::{Encoding, FileRecord, read_file_content};
pub use document::{DocStats, Document, generate_documentation};
pub use error::{AppError, Result};
pub use ignore_rules::{BUILTIN_IGNORE_PATTERNS, IgnoreMatcher};
pub use manifest::{ProjectInfo, read_project_info, read_readme};
pub use markdown::render_markdown;
pub use store::{
    ArtifactCatalog, ArtifactMetadata, ArtifactSource, MemoryCatalog, OutputFormat, OutputStore,
};
pub use walk::{NodeKind, TreeNode, walk_directory};
