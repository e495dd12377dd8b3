use indexmap::IndexMap;
use log;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

pub const MANIFEST_FILENAME: &str = "package.json";
pub const README_FILENAME: &str = "README.md";
pub const DEFAULT_PROJECT_NAME: &str = "Unknown Project";

/// Best-effort project metadata taken from an optional manifest at the
/// root. Absent and unparsable manifests both yield the same defaulted
/// shape. Dependency maps keep the manifest's key order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    #[serde(default = "default_project_name")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub dependencies: IndexMap<String, String>,
    #[serde(default)]
    pub dev_dependencies: IndexMap<String, String>,
}

fn default_project_name() -> String {
    DEFAULT_PROJECT_NAME.to_string()
}

impl Default for ProjectInfo {
    fn default() -> Self {
        Self {
            name: default_project_name(),
            description: String::new(),
            version: String::new(),
            dependencies: IndexMap::new(),
            dev_dependencies: IndexMap::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawManifest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    dependencies: Option<IndexMap<String, String>>,
    #[serde(default, rename = "devDependencies")]
    dev_dependencies: Option<IndexMap<String, String>>,
}

/// Reads `package.json` from the root. Missing, unreadable and malformed
/// manifests all degrade to defaults; only the shape of a parsed manifest
/// influences the result.
pub fn read_project_info(root: &Path) -> ProjectInfo {
    let manifest_path = root.join(MANIFEST_FILENAME);
    let text = match fs::read_to_string(&manifest_path) {
        Ok(text) => text,
        Err(e) => {
            if e.kind() == io::ErrorKind::NotFound {
                log::debug!("No manifest at {}, using defaults.", manifest_path.display());
            } else {
                log::warn!("Failed to read {}: {}", manifest_path.display(), e);
            }
            return ProjectInfo::default();
        }
    };

    let raw: RawManifest = match serde_json::from_str(&text) {
        Ok(raw) => raw,
        Err(e) => {
            log::warn!("Failed to parse {}: {}", manifest_path.display(), e);
            return ProjectInfo::default();
        }
    };

    ProjectInfo {
        name: raw
            .name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(default_project_name),
        description: raw.description.unwrap_or_default(),
        version: raw.version.unwrap_or_default(),
        dependencies: raw.dependencies.unwrap_or_default(),
        dev_dependencies: raw.dev_dependencies.unwrap_or_default(),
    }
}

/// Returns the root README verbatim, or an empty string when it is
/// missing or unreadable.
pub fn read_readme(root: &Path) -> String {
    let readme_path = root.join(README_FILENAME);
    match fs::read_to_string(&readme_path) {
        Ok(text) => text,
        Err(e) => {
            if e.kind() == io::ErrorKind::NotFound {
                log::debug!("No README at {}.", readme_path.display());
            } else {
                log::warn!("Failed to read {}: {}", readme_path.display(), e);
            }
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn full_manifest_is_extracted_field_wise() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{
                "name": "demo-app",
                "description": "A demo",
                "version": "1.2.3",
                "dependencies": {"express": "^4.18.0", "cors": "^2.8.5"},
                "devDependencies": {"jest": "^29.0.0"},
                "scripts": {"start": "node server.js"}
            }"#,
        )
        .unwrap();

        let info = read_project_info(dir.path());
        assert_eq!(info.name, "demo-app");
        assert_eq!(info.description, "A demo");
        assert_eq!(info.version, "1.2.3");
        assert_eq!(info.dependencies.get("express"), Some(&"^4.18.0".to_string()));
        assert_eq!(info.dependencies.get("cors"), Some(&"^2.8.5".to_string()));
        assert_eq!(info.dev_dependencies.len(), 1);
    }

    #[test]
    fn dependency_order_follows_the_manifest() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{"name": "x", "dependencies": {"zeta": "1", "alpha": "2", "mid": "3"}}"#,
        )
        .unwrap();

        let info = read_project_info(dir.path());
        let keys: Vec<_> = info.dependencies.keys().cloned().collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn missing_manifest_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let info = read_project_info(dir.path());
        assert_eq!(info, ProjectInfo::default());
        assert_eq!(info.name, DEFAULT_PROJECT_NAME);
    }

    #[test]
    fn malformed_manifest_yields_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), "{ not json !!!").unwrap();

        let info = read_project_info(dir.path());
        assert_eq!(info, ProjectInfo::default());
    }

    #[test]
    fn empty_name_falls_back_to_default() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), r#"{"name": ""}"#).unwrap();

        let info = read_project_info(dir.path());
        assert_eq!(info.name, DEFAULT_PROJECT_NAME);
    }

    #[test]
    fn readme_is_read_verbatim() {
        let dir = TempDir::new().unwrap();
        let text = "# Title\n\nBody with trailing newline\n";
        fs::write(dir.path().join("README.md"), text).unwrap();
        assert_eq!(read_readme(dir.path()), text);
    }

    #[test]
    fn missing_readme_is_empty() {
        let dir = TempDir::new().unwrap();
        assert_eq!(read_readme(dir.path()), "");
    }

    #[test]
    fn serialized_field_names_are_camel_case() {
        let info = ProjectInfo::default();
        let json = serde_json::to_string(&info).unwrap();
        assert!(json.contains("\"devDependencies\""));
        assert!(json.contains("\"name\":\"Unknown Project\""));
    }
}
