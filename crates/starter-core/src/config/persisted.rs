//! `.starter.json` persistence

use crate::model::{CompileOptions, Framework, PackageManager, RouterMode};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;

/// Config file written to the project root
pub const CONFIG_FILE: &str = ".starter.json";

/// Current config format version
pub const CONFIG_VERSION: u32 = 1;

/// Choices a project was created with, by integration id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedConfig {
    pub version: u32,
    pub project_name: String,
    #[serde(default)]
    pub framework: Framework,
    #[serde(default)]
    pub mode: RouterMode,
    #[serde(default = "default_true")]
    pub typescript: bool,
    #[serde(default)]
    pub tailwind: bool,
    #[serde(default)]
    pub package_manager: PackageManager,
    #[serde(default)]
    pub chosen_integrations: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub integration_options: BTreeMap<String, BTreeMap<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_template: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Default for PersistedConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            project_name: String::new(),
            framework: Framework::default(),
            mode: RouterMode::default(),
            typescript: true,
            tailwind: false,
            package_manager: PackageManager::default(),
            chosen_integrations: Vec::new(),
            integration_options: BTreeMap::new(),
            custom_template: None,
        }
    }
}

impl PersistedConfig {
    /// Record the choices behind `options`, referencing contributors by id
    pub fn from_options(options: &CompileOptions) -> Self {
        Self {
            version: CONFIG_VERSION,
            project_name: options.project_name.clone(),
            framework: options.framework,
            mode: options.mode,
            typescript: options.typescript,
            tailwind: options.tailwind,
            package_manager: options.package_manager,
            chosen_integrations: options
                .chosen_integrations
                .iter()
                .map(|i| i.id.clone())
                .collect(),
            integration_options: options.integration_options.clone(),
            custom_template: options.custom_template.as_ref().map(|t| t.id.clone()),
        }
    }
}

/// Read `.starter.json` from `dir`.
///
/// Returns `Ok(None)` when the file is missing or cannot be parsed.
pub async fn read_config(dir: &Path) -> Result<Option<PersistedConfig>> {
    let path = dir.join(CONFIG_FILE);
    let content = match fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", path.display()));
        }
    };

    match serde_json::from_str(&content) {
        Ok(config) => Ok(Some(config)),
        Err(e) => {
            tracing::warn!("Ignoring unparsable {}: {}", path.display(), e);
            Ok(None)
        }
    }
}

/// Write `.starter.json` into `dir`
pub async fn write_config(dir: &Path, config: &PersistedConfig) -> Result<()> {
    let path = dir.join(CONFIG_FILE);
    let mut content =
        serde_json::to_string_pretty(config).context("Failed to serialize project config")?;
    content.push('\n');
    fs::write(&path, content)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}
