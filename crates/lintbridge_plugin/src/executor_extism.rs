//! Extism-based WASM backend.
//!
//! Plugin modules are instantiated with Extism (wasmtime underneath). One
//! module may expose several analyzers; they share the instance, so calls
//! into the same module are serialized by a mutex.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use extism::{Manifest, Plugin, Wasm};
// MemoryOptions lives in extism-manifest
use extism_manifest::MemoryOptions;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::executor::{AnalyzeRequest, AnalyzeResponse, Analyzer};
use crate::loader::PluginOptions;
use crate::{Diagnostic, PluginError, PluginManifest};

/// Export consulted to discover a module's analyzers.
pub(crate) const MANIFEST_EXPORT: &str = "get_manifest";

/// A loaded WASM plugin module.
pub struct WasmModule {
    path: PathBuf,
    plugin: Mutex<Plugin>,
}

impl WasmModule {
    /// Instantiates a module from bytes read from `path`.
    pub fn instantiate(
        path: &Path,
        wasm_bytes: Vec<u8>,
        options: &PluginOptions,
    ) -> Result<Self, PluginError> {
        info!(
            "Loading WASM module {} ({} bytes)",
            path.display(),
            wasm_bytes.len()
        );

        let manifest = Self::configure_manifest(Manifest::new([Wasm::data(wasm_bytes)]), options);

        // WASI is enabled so plugins built for wasm32-wasip1 work too
        let plugin = Plugin::new(&manifest, [], true)
            .map_err(|e| PluginError::load(path, error_summary(&e)))?;

        Ok(Self {
            path: path.to_path_buf(),
            plugin: Mutex::new(plugin),
        })
    }

    /// Applies execution limits to the manifest.
    fn configure_manifest(mut manifest: Manifest, options: &PluginOptions) -> Manifest {
        // Timeout applies to every call, so one stuck analyzer becomes one error
        manifest.timeout_ms = options.timeout_ms;

        manifest.memory = MemoryOptions {
            max_pages: options.memory_max_pages,
            max_http_response_bytes: None,
            max_var_bytes: None,
        };

        manifest
    }

    /// Path the module was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Checks whether the module exports `name`.
    pub fn has_export(&self, name: &str) -> bool {
        self.plugin.lock().function_exists(name)
    }

    /// Calls an export with a JSON payload and returns its JSON output.
    pub fn call(&self, export: &str, input: &str) -> Result<String, PluginError> {
        let mut plugin = self.plugin.lock();
        let output: String = plugin.call(export, input).map_err(|e| {
            PluginError::call(format!(
                "'{}' in {} failed: {}",
                export,
                self.path.display(),
                error_summary(&e)
            ))
        })?;
        Ok(output)
    }

    /// Reads the module's manifest.
    ///
    /// Returns `Ok(None)` when the module has no `get_manifest` export.
    pub fn read_manifest(&self) -> Result<Option<PluginManifest>, PluginError> {
        if !self.has_export(MANIFEST_EXPORT) {
            debug!("{} exports no manifest", self.path.display());
            return Ok(None);
        }

        let manifest_json = self
            .call(MANIFEST_EXPORT, "")
            .map_err(|e| PluginError::invalid_manifest(&self.path, e))?;

        let manifest: PluginManifest = serde_json::from_str(&manifest_json)
            .map_err(|e| PluginError::invalid_manifest(&self.path, e))?;

        debug!(
            "Loaded plugin: {} v{} ({} analyzers)",
            manifest.name,
            manifest.version,
            manifest.analyzers.len()
        );

        Ok(Some(manifest))
    }
}

/// Condenses an Extism error chain into a single line.
///
/// Wasmtime attaches a multi-line backtrace as the outermost context of a
/// trap; it is dropped so the trap itself is what gets reported.
fn error_summary(error: &extism::Error) -> String {
    let mut parts: Vec<String> = error
        .chain()
        .map(|cause| cause.to_string())
        .filter(|message| !message.contains("wasm backtrace"))
        .map(|message| message.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|message| !message.is_empty())
        .collect();
    parts.dedup();

    if parts.is_empty() {
        let root = error.root_cause().to_string();
        return root.split_whitespace().collect::<Vec<_>>().join(" ");
    }
    parts.join(": ")
}

/// One analyzer export of a [`WasmModule`].
pub struct WasmAnalyzer {
    module: Arc<WasmModule>,
    export: String,
}

impl WasmAnalyzer {
    /// Creates an analyzer calling `export` on `module`.
    pub fn new(module: Arc<WasmModule>, export: impl Into<String>) -> Self {
        Self {
            module,
            export: export.into(),
        }
    }
}

impl Analyzer for WasmAnalyzer {
    fn analyze(&self, request: &AnalyzeRequest<'_>) -> Result<Vec<Diagnostic>, PluginError> {
        let input = serde_json::to_string(request)?;

        let output = self.module.call(&self.export, &input)?;

        let response: AnalyzeResponse = serde_json::from_str(&output).map_err(|e| {
            PluginError::call(format!("Invalid response from '{}': {}", self.export, e))
        })?;

        Ok(response.diagnostics)
    }
}
