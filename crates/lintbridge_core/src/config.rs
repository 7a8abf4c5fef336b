//! Host configuration.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use jsonc_parser::ParseOptions;
use jsonschema::Validator;
use serde::{Deserialize, Serialize};

use lintbridge_plugin::{DEFAULT_MEMORY_MAX_PAGES, DEFAULT_TIMEOUT_MS, PluginOptions};

use crate::HostError;

// Embed the schema
const SCHEMA_JSON: &str = include_str!("../../../schemas/v1/config.json");
static CONFIG_SCHEMA: OnceLock<Validator> = OnceLock::new();

/// Configuration file names, in discovery order.
pub const CONFIG_FILE_NAMES: &[&str] = &[".lintbridge.jsonc", ".lintbridge.json"];

/// Configuration for the analysis host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostConfig {
    /// Plugin modules loaded on every run, before any given on the command line.
    #[serde(default)]
    pub analyzers: Vec<String>,

    /// Extensions (without the dot) collected from directory targets.
    #[serde(default = "default_source_extensions")]
    pub source_extensions: Vec<String>,

    /// Glob patterns excluded from directory walks.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Whether entry points run in parallel.
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    /// Per-call plugin timeout in milliseconds; 0 disables it.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// WASM memory limit per module, in 64KB pages.
    #[serde(default = "default_memory_max_pages")]
    pub memory_max_pages: u32,

    /// Treat any run error as fatal.
    #[serde(default)]
    pub fail_on_run_error: bool,

    /// Base directory for resolving relative paths (analyzers).
    /// This is usually the directory containing the configuration file.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

fn default_source_extensions() -> Vec<String> {
    vec!["rs".to_string()]
}

fn default_parallel() -> bool {
    true
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_memory_max_pages() -> u32 {
    DEFAULT_MEMORY_MAX_PAGES
}

impl HostConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self {
            analyzers: Vec::new(),
            source_extensions: default_source_extensions(),
            exclude: Vec::new(),
            parallel: default_parallel(),
            timeout_ms: default_timeout_ms(),
            memory_max_pages: default_memory_max_pages(),
            fail_on_run_error: false,
            base_dir: None,
        }
    }

    /// Loads configuration from a file.
    ///
    /// Supports `.lintbridge.jsonc`, `.lintbridge.json`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, HostError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| HostError::config(format!("Failed to read config: {}", e)))?;

        let mut config = Self::from_json(&content)?;

        if let Some(parent) = path.parent() {
            config.base_dir = Some(parent.to_path_buf());
        }

        Ok(config)
    }

    /// Parses configuration from JSON (comments allowed) with schema validation.
    pub fn from_json(json: &str) -> Result<Self, HostError> {
        let value = jsonc_parser::parse_to_serde_value(json, &ParseOptions::default())
            .map_err(|e| HostError::config(format!("Invalid JSON: {}", e)))?
            .unwrap_or(serde_json::Value::Object(serde_json::Map::new()));

        let schema = CONFIG_SCHEMA.get_or_init(|| {
            let schema_json: serde_json::Value =
                serde_json::from_str(SCHEMA_JSON).expect("Invalid embedded config schema");
            Validator::new(&schema_json).expect("Invalid config schema compilation")
        });

        if let Err(e) = schema.validate(&value) {
            let error_msg = format!("{} at {}", e, e.instance_path());
            return Err(HostError::config(format!(
                "Config validation failed: {}",
                error_msg
            )));
        }

        serde_json::from_value(value)
            .map_err(|e| HostError::config(format!("Invalid config: {}", e)))
    }

    /// Looks for a configuration file in `dir`.
    pub fn discover(dir: impl AsRef<Path>) -> Option<PathBuf> {
        let dir = dir.as_ref();
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Configured analyzer paths, resolved against the config directory.
    pub fn analyzer_paths(&self) -> Vec<PathBuf> {
        self.analyzers
            .iter()
            .map(|analyzer| match &self.base_dir {
                Some(base) if Path::new(analyzer).is_relative() => base.join(analyzer),
                _ => PathBuf::from(analyzer),
            })
            .collect()
    }

    /// Limits handed to the plugin loader.
    pub fn plugin_options(&self) -> PluginOptions {
        PluginOptions {
            timeout_ms: (self.timeout_ms > 0).then_some(self.timeout_ms),
            memory_max_pages: Some(self.memory_max_pages),
        }
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self::new()
    }
}
