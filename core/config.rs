use crate::error::{AppError, Result};
use log;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILENAME: &str = "repodoc.toml";
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub save: SaveConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_true")]
    pub json_pretty: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SaveConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_true() -> bool {
    true
}
fn default_format() -> String {
    "markdown".to_string()
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            json_pretty: default_true(),
        }
    }
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

impl Config {
    pub fn resolve_config_path(cli_config_file: Option<&String>) -> Result<Option<PathBuf>> {
        match cli_config_file {
            Some(p_str) => {
                let expanded = shellexpand::tilde(p_str);
                let path = PathBuf::from(expanded.as_ref());
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "Specified config file not found at path: {}",
                        path.display()
                    )));
                }
                log::debug!("Using specified config file path: {}", path.display());
                Ok(Some(path))
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILENAME);
                if default_path.exists() {
                    log::debug!("Using default config file path: {}", default_path.display());
                    Ok(Some(default_path))
                } else {
                    log::debug!(
                        "No config file specified and default not found at: {}",
                        default_path.display()
                    );
                    Ok(None)
                }
            }
        }
    }

    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        log::info!("Loading configuration from: {}", config_path.display());
        let toml_content = fs::read_to_string(config_path).map_err(|e| AppError::FileRead {
            path: config_path.to_path_buf(),
            source: e,
        })?;
        toml::from_str::<Config>(&toml_content).map_err(|e| {
            AppError::TomlParse(format!(
                "Error parsing config file '{}': {}. Check TOML syntax and structure.",
                config_path.display(),
                e
            ))
        })
    }

    /// Loads the configuration, falling back to defaults when no config
    /// file exists. A present-but-malformed file is an error.
    pub fn load(cli_config_file: Option<&String>) -> Result<Self> {
        match Self::resolve_config_path(cli_config_file)? {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn default_toml() -> Result<String> {
        Ok(toml::to_string_pretty(&Config::default())?)
    }

    pub fn resolved_output_dir(&self, cli_override: Option<&PathBuf>) -> PathBuf {
        let raw = cli_override.unwrap_or(&self.save.output_dir);
        let raw_str = raw.to_string_lossy();
        PathBuf::from(shellexpand::tilde(raw_str.as_ref()).as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn empty_toml_yields_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.output.format, "markdown");
        assert!(config.output.json_pretty);
        assert_eq!(config.save.output_dir, PathBuf::from("outputs"));
    }

    #[test]
    fn partial_toml_fills_remaining_fields() {
        let config: Config = toml::from_str("[output]\nformat = \"json\"\n").unwrap();
        assert_eq!(config.output.format, "json");
        assert!(config.output.json_pretty);
        assert_eq!(config.save.output_dir, PathBuf::from("outputs"));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let result = toml::from_str::<Config>("[output]\nformat = \"json\"\nbogus = 1\n");
        assert!(result.is_err());
    }

    #[test]
    fn load_from_path_reports_parse_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("repodoc.toml");
        fs::write(&path, "[output\nformat = ").unwrap();
        match Config::load_from_path(&path) {
            Err(AppError::TomlParse(msg)) => assert!(msg.contains("repodoc.toml")),
            other => panic!("expected TomlParse error, got {other:?}"),
        }
    }

    #[test]
    fn load_with_missing_explicit_path_is_a_config_error() {
        let result = Config::load(Some(&"/nonexistent/repodoc.toml".to_string()));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn default_toml_round_trips() {
        let text = Config::default_toml().unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn cli_override_wins_for_output_dir() {
        let config = Config::default();
        let cli_dir = PathBuf::from("/tmp/artifacts");
        assert_eq!(
            config.resolved_output_dir(Some(&cli_dir)),
            PathBuf::from("/tmp/artifacts")
        );
        assert_eq!(config.resolved_output_dir(None), PathBuf::from("outputs"));
    }
}
