//! Plugin loading.
//!
//! A plugin path is validated in three steps: it must be an existing file,
//! it must instantiate as a WASM module, and its manifest (if any) is read to
//! discover analysis entry points. Zero entry points is still a valid load.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::entry_point::AnalysisEntryPoint;
use crate::executor_extism::{WasmAnalyzer, WasmModule};
use crate::{PluginError, PluginManifest};

/// Default memory limit for WASM instances (128 MB = 2048 pages).
/// Each WASM page is 64KB.
pub const DEFAULT_MEMORY_MAX_PAGES: u32 = 2048;

/// Default timeout for a single plugin call (5000 ms).
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Limits applied to every loaded module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginOptions {
    /// Execution timeout per call, in milliseconds. `None` disables it.
    pub timeout_ms: Option<u64>,
    /// Limit on memory pages (each page is 64KB).
    pub memory_max_pages: Option<u32>,
}

impl Default for PluginOptions {
    fn default() -> Self {
        Self {
            timeout_ms: Some(DEFAULT_TIMEOUT_MS),
            memory_max_pages: Some(DEFAULT_MEMORY_MAX_PAGES),
        }
    }
}

/// A successfully loaded plugin module and its entry points.
#[derive(Debug)]
pub struct LoadedPlugin {
    path: PathBuf,
    manifest: Option<PluginManifest>,
    entry_points: Vec<AnalysisEntryPoint>,
}

impl LoadedPlugin {
    /// Path the plugin was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The module's manifest, if it exports one.
    pub fn manifest(&self) -> Option<&PluginManifest> {
        self.manifest.as_ref()
    }

    /// Entry points exposed by this plugin, in manifest order.
    pub fn entry_points(&self) -> &[AnalysisEntryPoint] {
        &self.entry_points
    }
}

/// Result of loading a batch of plugins.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    /// Plugins that loaded, in input order.
    pub loaded: Vec<LoadedPlugin>,
    /// One message per plugin that failed to load, in input order.
    pub errors: Vec<String>,
}

impl LoadOutcome {
    /// All entry points of all loaded plugins, concatenated in load order.
    pub fn entry_points(&self) -> Vec<AnalysisEntryPoint> {
        self.loaded
            .iter()
            .flat_map(|plugin| plugin.entry_points.iter().cloned())
            .collect()
    }
}

/// Loads plugin modules from disk.
#[derive(Debug, Clone, Default)]
pub struct PluginLoader {
    options: PluginOptions,
}

impl PluginLoader {
    /// Creates a loader applying `options` to every module.
    pub fn new(options: PluginOptions) -> Self {
        Self { options }
    }

    /// Loads one plugin module.
    ///
    /// # Errors
    ///
    /// - [`PluginError::NotFound`] if `path` is not an existing file
    /// - [`PluginError::Load`] if the file is not a loadable WASM module
    /// - [`PluginError::InvalidManifest`] if `get_manifest` returns garbage
    pub fn load(&self, path: impl AsRef<Path>) -> Result<LoadedPlugin, PluginError> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(PluginError::not_found(path));
        }

        let wasm_bytes = fs::read(path).map_err(|e| PluginError::load(path, e))?;
        let module = Arc::new(WasmModule::instantiate(path, wasm_bytes, &self.options)?);
        let manifest = module.read_manifest()?;

        let entry_points = match &manifest {
            Some(manifest) => Self::entry_points_for(&module, manifest),
            None => Vec::new(),
        };

        debug!(
            "Loaded {} with {} entry point(s)",
            path.display(),
            entry_points.len()
        );

        Ok(LoadedPlugin {
            path: path.to_path_buf(),
            manifest,
            entry_points,
        })
    }

    /// Loads every path, collecting failures instead of stopping at the first.
    ///
    /// Modules are loaded in parallel; the outcome keeps input order.
    pub fn load_all<P>(&self, paths: &[P]) -> LoadOutcome
    where
        P: AsRef<Path> + Sync,
    {
        let results: Vec<Result<LoadedPlugin, PluginError>> =
            paths.par_iter().map(|path| self.load(path)).collect();

        let mut outcome = LoadOutcome::default();
        for result in results {
            match result {
                Ok(plugin) => outcome.loaded.push(plugin),
                Err(e) => {
                    warn!("{}", e);
                    outcome.errors.push(e.to_string());
                }
            }
        }

        info!(
            "Loaded {} plugin(s), {} failed",
            outcome.loaded.len(),
            outcome.errors.len()
        );
        outcome
    }

    fn entry_points_for(
        module: &Arc<WasmModule>,
        manifest: &PluginManifest,
    ) -> Vec<AnalysisEntryPoint> {
        manifest
            .analyzers
            .iter()
            .filter_map(|descriptor| {
                let export = descriptor.export_name();
                if !module.has_export(export) {
                    warn!(
                        "Analyzer '{}' in {} declares missing export '{}', skipping",
                        descriptor.name,
                        module.path().display(),
                        export
                    );
                    return None;
                }

                let analyzer = WasmAnalyzer::new(Arc::clone(module), export);
                Some(AnalysisEntryPoint::new(
                    descriptor.name.clone(),
                    Arc::new(analyzer),
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AnalyzeRequest;
    use crate::test_utils::{plugin_wat, wat_to_wasm};
    use std::fs;
    use tempfile::tempdir;

    fn write_plugin(dir: &Path, wat: &str) -> PathBuf {
        let path = dir.join("plugin.wasm");
        fs::write(&path, wat_to_wasm(wat)).unwrap();
        path
    }

    #[test]
    fn test_load_missing_file() {
        let loader = PluginLoader::default();

        let err = loader.load("nonexistent.dll").unwrap_err();

        assert!(matches!(err, PluginError::NotFound(_)));
        assert!(err.to_string().contains("nonexistent.dll"));
    }

    #[test]
    fn test_load_directory_is_not_found() {
        let dir = tempdir().unwrap();
        let loader = PluginLoader::default();

        let err = loader.load(dir.path()).unwrap_err();

        assert!(matches!(err, PluginError::NotFound(_)));
    }

    #[test]
    fn test_load_all_missing_path() {
        let loader = PluginLoader::default();

        let outcome = loader.load_all(&["nonexistent.dll"]);

        assert!(outcome.loaded.is_empty());
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].contains("not found"));
        assert!(outcome.errors[0].contains("nonexistent.dll"));
    }

    #[test]
    fn test_load_all_partitions_failures() {
        let dir = tempdir().unwrap();
        let garbage = dir.path().join("garbage.wasm");
        fs::write(&garbage, b"definitely not wasm").unwrap();
        let missing = dir.path().join("missing.wasm");

        let loader = PluginLoader::default();
        let outcome = loader.load_all(&[garbage.clone(), missing.clone()]);

        assert!(outcome.loaded.is_empty());
        assert_eq!(outcome.errors.len(), 2);
        assert!(outcome.errors[0].contains("Failed to load plugin"));
        assert!(outcome.errors[0].contains(&garbage.display().to_string()));
        assert!(outcome.errors[1].contains("not found"));
    }

    #[test]
    fn test_empty_batch() {
        let loader = PluginLoader::default();
        let outcome = loader.load_all::<PathBuf>(&[]);

        assert!(outcome.loaded.is_empty());
        assert!(outcome.errors.is_empty());
        assert!(outcome.entry_points().is_empty());
    }

    #[test]
    fn test_default_options() {
        let options = PluginOptions::default();
        assert_eq!(options.timeout_ms, Some(DEFAULT_TIMEOUT_MS));
        assert_eq!(options.memory_max_pages, Some(DEFAULT_MEMORY_MAX_PAGES));
    }

    #[test]
    fn test_declared_analyzer_without_export_is_skipped() {
        let dir = tempdir().unwrap();
        let path = write_plugin(
            dir.path(),
            &plugin_wat(
                &[("Present", "present"), ("Ghost", "ghost")],
                &[("present", r#"{"diagnostics":[]}"#)],
            ),
        );

        let plugin = PluginLoader::default().load(&path).unwrap();

        assert_eq!(plugin.manifest().unwrap().analyzers.len(), 2);
        let names: Vec<&str> = plugin.entry_points().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["Present"]);
    }

    #[test]
    fn test_loaded_entry_point_runs_the_export() {
        let dir = tempdir().unwrap();
        let path = write_plugin(
            dir.path(),
            &plugin_wat(
                &[("Todo", "find_todos")],
                &[(
                    "find_todos",
                    r#"{"diagnostics":[{"rule_code":"SM001","severity":"info","message":"TODO found"}]}"#,
                )],
            ),
        );

        let plugin = PluginLoader::default().load(&path).unwrap();
        let request = AnalyzeRequest {
            file_path: "src/lib.rs",
            source: "// TODO",
        };
        let diagnostics = plugin.entry_points()[0].analyze(&request).unwrap();

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule_code, "SM001");
        assert_eq!(diagnostics[0].origin, "Todo");
    }
}
