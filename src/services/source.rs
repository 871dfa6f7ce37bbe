//! Data sources for the table
//!
//! Loads rows from a CSV/JSON/YAML file or from the CSV output of a shell
//! command.

use crate::model::{dedupe_ids, DataRow};
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;
use thiserror::Error;

/// Regex to match ANSI escape codes
static ANSI_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*[a-zA-Z]").expect("valid ANSI regex"));

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported data file format: {0}")]
    UnsupportedFormat(PathBuf),
    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("expected a list of rows")]
    NotTabular,
    #[error("failed to run `{command}`: {message}")]
    Command { command: String, message: String },
}

/// Where the table's rows come from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DataSource {
    File { path: PathBuf },
    Command { command: String },
}

impl DataSource {
    /// Load all rows from the source
    pub fn load(&self) -> Result<Vec<DataRow>, SourceError> {
        let rows = match self {
            DataSource::File { path } => load_file(path)?,
            DataSource::Command { command } => load_command(command)?,
        };
        debug!("loaded {} rows from {}", rows.len(), self);
        Ok(rows)
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::File { path } => write!(f, "{}", path.display()),
            DataSource::Command { command } => write!(f, "`{}`", command),
        }
    }
}

fn load_file(path: &Path) -> Result<Vec<DataRow>, SourceError> {
    let contents = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("csv") => parse_delimited(contents.as_bytes(), b','),
        Some("tsv") => parse_delimited(contents.as_bytes(), b'\t'),
        Some("json") => rows_from_value(serde_json::from_str(&contents)?),
        Some("yaml") | Some("yml") => rows_from_value(serde_yaml::from_str(&contents)?),
        _ => Err(SourceError::UnsupportedFormat(path.to_path_buf())),
    }
}

fn load_command(command: &str) -> Result<Vec<DataRow>, SourceError> {
    #[cfg(target_os = "windows")]
    let output = Command::new("cmd").args(["/C", command]).output();

    #[cfg(not(target_os = "windows"))]
    let output = Command::new("sh").args(["-c", command]).output();

    let output = output.map_err(|e| SourceError::Command {
        command: command.to_string(),
        message: e.to_string(),
    })?;

    if !output.status.success() {
        let stderr = strip_ansi_codes(&String::from_utf8_lossy(&output.stderr));
        return Err(SourceError::Command {
            command: command.to_string(),
            message: format!("{} {}", output.status, stderr.trim()),
        });
    }

    let stdout = strip_ansi_codes(&String::from_utf8_lossy(&output.stdout));
    parse_delimited(stdout.as_bytes(), b',')
}

/// Strip ANSI escape codes from a string
fn strip_ansi_codes(s: &str) -> String {
    ANSI_REGEX.replace_all(s, "").to_string()
}

/// Parse delimited text with a header line into rows
pub fn parse_delimited<R: Read>(reader: R, delimiter: u8) -> Result<Vec<DataRow>, SourceError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (position, record) in csv_reader.records().enumerate() {
        let record = record?;
        let fields: Map<String, Value> = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.clone(), Value::String(v.to_string())))
            .collect();
        rows.push(DataRow::from_value(Value::Object(fields), position));
    }
    dedupe_ids(&mut rows);
    Ok(rows)
}

/// Convert a deserialized JSON/YAML document into rows
pub fn rows_from_value(value: Value) -> Result<Vec<DataRow>, SourceError> {
    match value {
        Value::Array(items) => {
            let mut rows: Vec<DataRow> = items
                .into_iter()
                .enumerate()
                .map(|(position, item)| DataRow::from_value(item, position))
                .collect();
            dedupe_ids(&mut rows);
            Ok(rows)
        }
        _ => Err(SourceError::NotTabular),
    }
}
