//! Table configuration
//!
//! Read from JSON or YAML depending on the file extension. The default
//! location is `~/.table-view/config.yaml`.

use crate::model::{ColumnConfig, DEFAULT_REFRESH_TITLE};
use crate::services::DataSource;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

fn default_refresh_title() -> String {
    DEFAULT_REFRESH_TITLE.to_string()
}

fn default_tick_rate_ms() -> u64 {
    100
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default = "default_refresh_title")]
    pub refresh_title: String,
    /// Empty means "derive from the data"
    #[serde(default)]
    pub columns: Vec<ColumnConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<DataSource>,
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: None,
            refresh_title: default_refresh_title(),
            columns: Vec::new(),
            source: None,
            tick_rate_ms: default_tick_rate_ms(),
            log_file: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

fn format_of(path: &Path) -> anyhow::Result<Format> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("yaml") | Some("yml") => Ok(Format::Yaml),
        _ => bail!("Unsupported config format: {}", path.display()),
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".table-view"))
    }

    pub fn default_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.yaml"))
    }

    /// Load a config file
    pub fn load(path: &Path) -> anyhow::Result<Config> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Could not read config {}", path.display()))?;

        let config: Config = match format_of(path)? {
            Format::Json => serde_json::from_str(&contents)?,
            Format::Yaml => serde_yaml::from_str(&contents)?,
        };
        Ok(config)
    }

    /// Load the config at the default location, if there is one
    pub fn load_default() -> anyhow::Result<Option<Config>> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path).map(Some),
            _ => Ok(None),
        }
    }

    /// Save the config, creating parent directories as needed
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let contents = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Yaml => serde_yaml::to_string(self)?,
        };
        fs::write(path, contents)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Align;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("table-view-config-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_defaults() {
        let config: Config = serde_yaml::from_str("title: Sales\n").unwrap();
        assert_eq!(config.title.as_deref(), Some("Sales"));
        assert_eq!(config.refresh_title, "refreshing");
        assert_eq!(config.tick_rate_ms, 100);
        assert!(config.columns.is_empty());
        assert!(config.source.is_none());
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
title: Report
refresh_title: reloading
columns:
  - data_index: name
    title: Name
    width: 20
  - data_index: total
    align: right
source:
  type: file
  path: data.csv
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.columns.len(), 2);
        assert_eq!(config.columns[1].align, Align::Right);
        assert_eq!(
            config.source,
            Some(DataSource::File {
                path: PathBuf::from("data.csv")
            })
        );
    }

    #[test]
    fn test_save_and_load() {
        let config = Config {
            title: Some("Report".to_string()),
            source: Some(DataSource::Command {
                command: "cat rows.csv".to_string(),
            }),
            ..Config::default()
        };

        for name in ["config.json", "config.yaml"] {
            let path = temp_path(name);
            config.save(&path).unwrap();
            assert_eq!(Config::load(&path).unwrap(), config);
        }
    }

    #[test]
    fn test_unknown_format() {
        assert!(Config::default().save(&temp_path("config.toml")).is_err());
    }
}
