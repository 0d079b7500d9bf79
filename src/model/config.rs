use std::fs;
use std::path::Path;

use chrono::{DateTime, FixedOffset, Local};
use serde::{Deserialize, Serialize};

use crate::error::{L10nError, Result};

fn default_project_version() -> String {
    "1.0".to_string()
}

fn default_report_bugs_to() -> String {
    "you@example.com".to_string()
}

fn default_last_translator() -> String {
    "you <you@example.com>".to_string()
}

fn default_catalog_extension() -> String {
    "po".to_string()
}

/// Per-project settings, read from an optional JSON file.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    #[serde(default = "default_project_version")]
    pub project_version: String,

    #[serde(default = "default_report_bugs_to")]
    pub report_bugs_to: String,

    #[serde(default = "default_last_translator")]
    pub last_translator: String,

    #[serde(default)]
    pub language_team: String,

    #[serde(default = "default_catalog_extension")]
    pub catalog_extension: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        ProjectConfig {
            project_version: default_project_version(),
            report_bugs_to: default_report_bugs_to(),
            last_translator: default_last_translator(),
            language_team: String::new(),
            catalog_extension: default_catalog_extension(),
        }
    }
}

impl ProjectConfig {
    pub fn load(path: &Path) -> Result<ProjectConfig> {
        let data = fs::read_to_string(path).map_err(|e| L10nError::io(path, e))?;
        let config: ProjectConfig = serde_json::from_str(&data)
            .map_err(|e| L10nError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let ext = self.catalog_extension.trim();
        if ext.is_empty() || ext.contains(['/', '\\', '.']) {
            return Err(L10nError::Config(format!(
                "catalog_extension must be a bare extension, got {:?}",
                self.catalog_extension
            )));
        }
        Ok(())
    }
}

/// Metadata attached to every catalog written during one run.
///
/// The timestamp is fixed when the template is built, so every catalog of a
/// run carries the same creation date.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderTemplate {
    pub project_version: String,
    pub report_bugs_to: String,
    pub last_translator: String,
    pub language_team: String,
    pub timestamp: DateTime<FixedOffset>,
}

pub const CREATION_DATE_KEY: &str = "POT-Creation-Date";

/// Header keys in the order they are written.
pub const HEADER_KEYS: [&str; 9] = [
    "Project-Id-Version",
    "Report-Msgid-Bugs-To",
    CREATION_DATE_KEY,
    "PO-Revision-Date",
    "Last-Translator",
    "Language-Team",
    "MIME-Version",
    "Content-Type",
    "Content-Transfer-Encoding",
];

impl HeaderTemplate {
    pub fn new(config: &ProjectConfig, timestamp: DateTime<FixedOffset>) -> Self {
        HeaderTemplate {
            project_version: config.project_version.clone(),
            report_bugs_to: config.report_bugs_to.clone(),
            last_translator: config.last_translator.clone(),
            language_team: config.language_team.clone(),
            timestamp,
        }
    }

    pub fn now(config: &ProjectConfig) -> Self {
        HeaderTemplate::new(config, Local::now().fixed_offset())
    }

    /// Header fields in `HEADER_KEYS` order.
    pub fn metadata(&self) -> Vec<(String, String)> {
        let date = self.timestamp.format("%Y-%m-%d %H:%M%z").to_string();
        let values = [
            self.project_version.as_str(),
            self.report_bugs_to.as_str(),
            date.as_str(),
            date.as_str(),
            self.last_translator.as_str(),
            self.language_team.as_str(),
            "1.0",
            "text/plain; charset=UTF-8",
            "8bit",
        ];
        HEADER_KEYS
            .iter()
            .zip(values)
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}
