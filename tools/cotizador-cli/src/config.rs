//! CLI configuration.

use std::path::Path;

use anyhow::{Context, Result};
use cotizador_commerce::quote::QUOTE_STORAGE_KEY;
use serde::{Deserialize, Serialize};

/// Config file names, in lookup order.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["cotizador.toml", ".cotizador.toml", "cotizador.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Where the quote cart is kept.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Catalog source.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Terminal output.
    #[serde(default)]
    pub output: OutputConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// Quote cart storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one JSON file per stored key.
    #[serde(default = "default_storage_dir")]
    pub dir: String,

    /// Key the cart is stored under.
    #[serde(default = "default_storage_key")]
    pub key: String,
}

fn default_storage_dir() -> String {
    ".cotizador".to_string()
}

fn default_storage_key() -> String {
    QUOTE_STORAGE_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
            key: default_storage_key(),
        }
    }
}

/// Catalog source. Without a path the built-in dataset is used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// JSON catalog file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Terminal output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Colorize output.
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

/// Generate a default cotizador.toml config file.
pub fn generate_default_config() -> String {
    format!(
        r#"# Cotizador configuration

[storage]
dir = "{dir}"
key = "{key}"

[catalog]
# path = "catalog.json"

[output]
color = true
"#,
        dir = default_storage_dir(),
        key = QUOTE_STORAGE_KEY,
    )
}
