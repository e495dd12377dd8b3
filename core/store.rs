use chrono::{DateTime, SecondsFormat, Utc};
use log;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use uuid::Uuid;

use crate::document::Document;
use crate::error::{AppError, Result};
use crate::markdown::render_markdown;

pub const FALLBACK_PROJECT_NAME: &str = "Unknown_Project";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Markdown,
}

impl OutputFormat {
    /// File extension for saved artifacts. The format name doubles as the
    /// extension, so Markdown artifacts end in `.markdown`.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "markdown",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(AppError::InvalidArgument(format!(
                "Unsupported output format: '{other}'. Use 'json' or 'markdown'."
            ))),
        }
    }
}

/// Where an artifact came from. Artifacts adopted from a pre-existing
/// output directory only carry the timestamp recovered from the filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ArtifactSource {
    LocalDirectory { path: String },
    RestoredFromDisk { timestamp: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactMetadata {
    pub id: String,
    pub filename: String,
    pub file_path: PathBuf,
    pub format: OutputFormat,
    pub project_name: String,
    pub source: ArtifactSource,
    pub created_at: DateTime<Utc>,
    pub size: u64,
}

/// Metadata index backing an [`OutputStore`]. Implementations own the
/// id-to-metadata mapping; artifact bodies stay on disk.
pub trait ArtifactCatalog: fmt::Debug {
    fn put(&mut self, metadata: ArtifactMetadata);
    fn get(&self, id: &str) -> Option<&ArtifactMetadata>;
    /// All entries, newest first.
    fn list(&self) -> Vec<ArtifactMetadata>;
    /// Returns whether an entry was removed.
    fn delete(&mut self, id: &str) -> bool;
}

#[derive(Debug, Default)]
pub struct MemoryCatalog {
    entries: HashMap<String, ArtifactMetadata>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ArtifactCatalog for MemoryCatalog {
    fn put(&mut self, metadata: ArtifactMetadata) {
        self.entries.insert(metadata.id.clone(), metadata);
    }

    fn get(&self, id: &str) -> Option<&ArtifactMetadata> {
        self.entries.get(id)
    }

    fn list(&self) -> Vec<ArtifactMetadata> {
        let mut all: Vec<ArtifactMetadata> = self.entries.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all
    }

    fn delete(&mut self, id: &str) -> bool {
        self.entries.remove(id).is_some()
    }
}

/// Directory-backed artifact store. Opening adopts every regular file
/// already present, deriving metadata from the filename; saving renders
/// the document and writes `{project}_{timestamp}.{format}`.
#[derive(Debug)]
pub struct OutputStore {
    dir: PathBuf,
    catalog: Box<dyn ArtifactCatalog>,
}

impl OutputStore {
    pub fn open(dir: &Path, catalog: Box<dyn ArtifactCatalog>) -> Result<Self> {
        fs::create_dir_all(dir).map_err(|source| AppError::DirCreation {
            path: dir.to_path_buf(),
            source,
        })?;
        let mut store = Self {
            dir: dir.to_path_buf(),
            catalog,
        };
        store.restore_from_disk();
        Ok(store)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Adopts files already sitting in the store directory. Best effort:
    /// unreadable entries are skipped with a warning, never fatal.
    fn restore_from_disk(&mut self) {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Could not scan {}: {}", self.dir.display(), e);
                return;
            }
        };

        let mut restored = 0usize;
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Skipping unreadable entry in {}: {}", self.dir.display(), e);
                    continue;
                }
            };
            let path = entry.path();
            let file_info = match fs::metadata(&path) {
                Ok(info) => info,
                Err(e) => {
                    log::warn!("Skipping {}: {}", path.display(), e);
                    continue;
                }
            };
            if !file_info.is_file() {
                continue;
            }

            let filename = entry.file_name().to_string_lossy().into_owned();
            self.catalog.put(restored_metadata(path, filename, &file_info));
            restored += 1;
        }

        log::info!("Restored {} artifacts from {}", restored, self.dir.display());
    }

    /// Renders the document in `format` and persists it. The filename
    /// carries the sanitized project name and the save instant; metadata
    /// keeps the project name untouched.
    pub fn save(
        &mut self,
        document: &Document,
        source_path: &str,
        format: OutputFormat,
        json_pretty: bool,
    ) -> Result<ArtifactMetadata> {
        let body = match format {
            OutputFormat::Json => document.to_json(json_pretty)?,
            OutputFormat::Markdown => render_markdown(document),
        };

        let now = Utc::now();
        let timestamp = now
            .to_rfc3339_opts(SecondsFormat::Millis, true)
            .replace([':', '.'], "-");
        let project: String = document
            .project_info
            .name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        let filename = format!("{}_{}.{}", project, timestamp, format.extension());
        let file_path = self.dir.join(&filename);

        fs::write(&file_path, &body).map_err(|source| AppError::FileWrite {
            path: file_path.clone(),
            source,
        })?;
        log::debug!("Wrote {} ({} bytes).", file_path.display(), body.len());

        let metadata = ArtifactMetadata {
            id: Uuid::new_v4().to_string(),
            filename,
            file_path,
            format,
            project_name: document.project_info.name.clone(),
            source: ArtifactSource::LocalDirectory {
                path: source_path.to_string(),
            },
            created_at: now,
            size: body.len() as u64,
        };
        self.catalog.put(metadata.clone());
        Ok(metadata)
    }

    /// Looks up an artifact. An entry whose file vanished from disk is
    /// dropped from the catalog and reported as not found.
    pub fn get(&mut self, id: &str) -> Result<ArtifactMetadata> {
        let metadata = self
            .catalog
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::ArtifactNotFound(id.to_string()))?;

        if !metadata.file_path.exists() {
            log::warn!(
                "Artifact file {} no longer exists, dropping entry '{}'.",
                metadata.file_path.display(),
                id
            );
            self.catalog.delete(id);
            return Err(AppError::ArtifactNotFound(id.to_string()));
        }

        Ok(metadata)
    }

    pub fn read_body(&mut self, id: &str) -> Result<String> {
        let metadata = self.get(id)?;
        fs::read_to_string(&metadata.file_path).map_err(|source| AppError::FileRead {
            path: metadata.file_path.clone(),
            source,
        })
    }

    /// Removes the artifact file (if still present) and its catalog entry.
    pub fn delete(&mut self, id: &str) -> Result<ArtifactMetadata> {
        let metadata = self
            .catalog
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::ArtifactNotFound(id.to_string()))?;

        if metadata.file_path.exists() {
            fs::remove_file(&metadata.file_path)?;
        }
        self.catalog.delete(id);
        log::debug!("Deleted artifact '{}' ({}).", id, metadata.filename);
        Ok(metadata)
    }

    pub fn list(&self) -> Vec<ArtifactMetadata> {
        self.catalog.list()
    }
}

/// Rebuilds metadata for a file found on disk. The filename stem yields
/// the id (disallowed characters replaced) and splits on underscores into
/// project name and timestamp.
fn restored_metadata(path: PathBuf, filename: String, file_info: &fs::Metadata) -> ArtifactMetadata {
    let format = if Path::new(&filename).extension().is_some_and(|e| e == "json") {
        OutputFormat::Json
    } else {
        OutputFormat::Markdown
    };

    let stem = Path::new(&filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.clone());

    let id: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let parts: Vec<&str> = stem.split('_').collect();
    let joined = parts[..parts.len() - 1].join("_");
    let project_name = if joined.is_empty() {
        FALLBACK_PROJECT_NAME.to_string()
    } else {
        joined
    };
    let timestamp = parts.last().copied().unwrap_or("").to_string();

    let created_at = file_info
        .created()
        .or_else(|_| file_info.modified())
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now());

    ArtifactMetadata {
        id,
        filename,
        format,
        project_name,
        source: ArtifactSource::RestoredFromDisk { timestamp },
        created_at,
        size: file_info.len(),
        file_path: path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocStats;
    use crate::manifest::ProjectInfo;
    use chrono::TimeZone;
    use indexmap::IndexMap;
    use tempfile::TempDir;

    fn sample_doc(name: &str) -> Document {
        Document {
            project_info: ProjectInfo {
                name: name.to_string(),
                ..ProjectInfo::default()
            },
            readme: String::new(),
            file_tree: Vec::new(),
            files: Vec::new(),
            stats: DocStats {
                total_files: 0,
                total_size: 0,
                file_types: IndexMap::new(),
            },
            generated_at: Utc::now(),
        }
    }

    fn open_store(dir: &Path) -> OutputStore {
        OutputStore::open(dir, Box::new(MemoryCatalog::new())).unwrap()
    }

    #[test]
    fn format_parsing_accepts_known_names_case_insensitively() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(
            "markdown".parse::<OutputFormat>().unwrap(),
            OutputFormat::Markdown
        );
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);

        match "yaml".parse::<OutputFormat>() {
            Err(AppError::InvalidArgument(msg)) => assert!(msg.contains("yaml")),
            other => panic!("expected InvalidArgument, got {other:?}"),
        }
    }

    #[test]
    fn save_writes_the_body_and_registers_metadata() {
        let dir = TempDir::new().unwrap();
        let outputs = dir.path().join("outputs");
        let mut store = open_store(&outputs);

        let doc = sample_doc("My App");
        let meta = store
            .save(&doc, "/work/my-app", OutputFormat::Json, true)
            .unwrap();

        assert!(meta.filename.starts_with("My_App_"));
        assert!(meta.filename.ends_with(".json"));
        let stem = Path::new(&meta.filename)
            .file_stem()
            .unwrap()
            .to_string_lossy();
        assert!(!stem.contains(':'));
        assert!(!stem.contains('.'));

        assert!(meta.file_path.exists());
        let body = fs::read_to_string(&meta.file_path).unwrap();
        Document::from_json(&body).unwrap();

        assert_eq!(meta.project_name, "My App");
        assert_eq!(
            meta.source,
            ArtifactSource::LocalDirectory {
                path: "/work/my-app".to_string()
            }
        );
        assert_eq!(meta.size, body.len() as u64);
        assert_eq!(store.get(&meta.id).unwrap().filename, meta.filename);
    }

    #[test]
    fn markdown_artifacts_use_the_full_format_name_as_extension() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(dir.path());

        let meta = store
            .save(&sample_doc("proj"), ".", OutputFormat::Markdown, true)
            .unwrap();

        assert!(meta.filename.ends_with(".markdown"));
        let body = fs::read_to_string(&meta.file_path).unwrap();
        assert!(body.starts_with("# proj\n"));
    }

    #[test]
    fn json_pretty_flag_controls_the_saved_body() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(dir.path());
        let doc = sample_doc("p");

        let compact = store.save(&doc, ".", OutputFormat::Json, false).unwrap();
        let body = fs::read_to_string(&compact.file_path).unwrap();
        assert_eq!(body, doc.to_json(false).unwrap());
        assert!(!body.contains('\n'));
    }

    #[test]
    fn get_drops_entries_whose_file_vanished() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(dir.path());

        let meta = store
            .save(&sample_doc("p"), ".", OutputFormat::Json, true)
            .unwrap();
        fs::remove_file(&meta.file_path).unwrap();

        assert!(matches!(
            store.get(&meta.id),
            Err(AppError::ArtifactNotFound(_))
        ));
        assert!(store.list().is_empty());
    }

    #[test]
    fn open_restores_existing_files_with_filename_derived_metadata() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("My_Project_2024-01-01T00-00-00-000Z.json"),
            "{}",
        )
        .unwrap();
        fs::write(dir.path().join("notes"), "plain").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let store = open_store(dir.path());
        let all = store.list();
        assert_eq!(all.len(), 2);

        let json = all
            .iter()
            .find(|m| m.format == OutputFormat::Json)
            .unwrap();
        assert_eq!(json.id, "My_Project_2024-01-01T00-00-00-000Z");
        assert_eq!(json.project_name, "My_Project");
        assert_eq!(
            json.source,
            ArtifactSource::RestoredFromDisk {
                timestamp: "2024-01-01T00-00-00-000Z".to_string()
            }
        );

        let bare = all
            .iter()
            .find(|m| m.format == OutputFormat::Markdown)
            .unwrap();
        assert_eq!(bare.filename, "notes");
        assert_eq!(bare.project_name, FALLBACK_PROJECT_NAME);
        assert_eq!(
            bare.source,
            ArtifactSource::RestoredFromDisk {
                timestamp: "notes".to_string()
            }
        );
    }

    #[test]
    fn restored_ids_replace_disallowed_characters() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("my app@v2_2024.json"), "{}").unwrap();

        let store = open_store(dir.path());
        let all = store.list();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, "my_app_v2_2024");
        assert_eq!(all[0].project_name, "my app@v2");
        assert_eq!(
            all[0].source,
            ArtifactSource::RestoredFromDisk {
                timestamp: "2024".to_string()
            }
        );
    }

    #[test]
    fn list_is_ordered_newest_first() {
        let mut catalog = MemoryCatalog::new();
        for (id, day) in [("old", 1), ("newest", 20), ("mid", 10)] {
            catalog.put(ArtifactMetadata {
                id: id.to_string(),
                filename: format!("{id}.json"),
                file_path: PathBuf::from(format!("/tmp/{id}.json")),
                format: OutputFormat::Json,
                project_name: "p".to_string(),
                source: ArtifactSource::LocalDirectory {
                    path: ".".to_string(),
                },
                created_at: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
                size: 0,
            });
        }

        let ids: Vec<String> = catalog.list().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, ["newest", "mid", "old"]);
    }

    #[test]
    fn delete_removes_the_file_and_the_entry() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(dir.path());

        let meta = store
            .save(&sample_doc("p"), ".", OutputFormat::Json, true)
            .unwrap();
        assert!(meta.file_path.exists());

        let deleted = store.delete(&meta.id).unwrap();
        assert_eq!(deleted.filename, meta.filename);
        assert!(!meta.file_path.exists());
        assert!(matches!(
            store.delete(&meta.id),
            Err(AppError::ArtifactNotFound(_))
        ));
    }

    #[test]
    fn delete_tolerates_an_already_missing_file() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(dir.path());

        let meta = store
            .save(&sample_doc("p"), ".", OutputFormat::Json, true)
            .unwrap();
        fs::remove_file(&meta.file_path).unwrap();

        store.delete(&meta.id).unwrap();
        assert!(store.list().is_empty());
    }

    #[test]
    fn memory_catalog_round_trips_entries() {
        let mut catalog = MemoryCatalog::new();
        assert!(catalog.get("x").is_none());
        assert!(!catalog.delete("x"));

        catalog.put(ArtifactMetadata {
            id: "x".to_string(),
            filename: "x.json".to_string(),
            file_path: PathBuf::from("/tmp/x.json"),
            format: OutputFormat::Json,
            project_name: "p".to_string(),
            source: ArtifactSource::LocalDirectory {
                path: ".".to_string(),
            },
            created_at: Utc::now(),
            size: 3,
        });

        assert_eq!(catalog.get("x").map(|m| m.size), Some(3));
        assert!(catalog.delete("x"));
        assert!(catalog.get("x").is_none());
    }
}
