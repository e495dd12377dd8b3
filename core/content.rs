use log;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const BINARY_PLACEHOLDER: &str = "[Binary file]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    Utf8,
    Binary,
    Error,
}

/// Flattened, content-classified representation of one file. For binary
/// and unreadable files `content` is a placeholder, never reinterpreted
/// raw bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: String,
    pub name: String,
    pub content: String,
    pub encoding: Encoding,
    pub size: u64,
}

/// Reads and classifies one file. A zero byte anywhere in the buffer
/// marks the file as binary; otherwise the content must decode as UTF-8.
/// Read and decode failures degrade to an error record instead of
/// aborting the surrounding generation.
pub fn read_file_content(full_path: &Path, relative_path: &str, name: &str) -> FileRecord {
    match fs::read(full_path) {
        Ok(bytes) => {
            let size = bytes.len() as u64;
            if bytes.contains(&0) {
                log::trace!("Classified as binary: {}", relative_path);
                return FileRecord {
                    path: relative_path.to_string(),
                    name: name.to_string(),
                    content: BINARY_PLACEHOLDER.to_string(),
                    encoding: Encoding::Binary,
                    size,
                };
            }
            match String::from_utf8(bytes) {
                Ok(content) => FileRecord {
                    path: relative_path.to_string(),
                    name: name.to_string(),
                    content,
                    encoding: Encoding::Utf8,
                    size,
                },
                Err(e) => {
                    log::warn!("Non-UTF-8 content in {}: {}", full_path.display(), e.utf8_error());
                    error_record(relative_path, name, &e.utf8_error().to_string())
                }
            }
        }
        Err(e) => {
            log::warn!("Failed to read {}: {}", full_path.display(), e);
            error_record(relative_path, name, &e.to_string())
        }
    }
}

fn error_record(relative_path: &str, name: &str, message: &str) -> FileRecord {
    FileRecord {
        path: relative_path.to_string(),
        name: name.to_string(),
        content: format!("[Error reading file: {}]", message),
        encoding: Encoding::Error,
        size: 0,
    }
}
