//! Host orchestrator.
//!
//! Wires the pipeline together: load plugins, resolve the target, execute,
//! and hand back one [`AnalysisResult`].

use std::path::{Path, PathBuf};

use tracing::info;

use lintbridge_plugin::{AnalysisEntryPoint, PluginLoader};

use crate::{AnalysisResult, ExecutionEngine, HostConfig, HostError, TargetResolver};

/// The analysis host.
#[derive(Debug, Clone)]
pub struct Host {
    config: HostConfig,
    resolver: TargetResolver,
    loader: PluginLoader,
    engine: ExecutionEngine,
}

impl Host {
    /// Creates a host from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Config`] if the configuration's exclude globs
    /// are invalid.
    pub fn new(config: HostConfig) -> Result<Self, HostError> {
        let resolver = TargetResolver::new(&config)?;
        let loader = PluginLoader::new(config.plugin_options());
        let engine = ExecutionEngine::new(config.parallel);

        Ok(Self {
            config,
            resolver,
            loader,
            engine,
        })
    }

    /// The configuration this host was built with.
    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Returns an error if `target` does not exist at all.
    pub fn check_target(target: &Path) -> Result<(), HostError> {
        if target.exists() {
            Ok(())
        } else {
            Err(HostError::TargetNotFound(target.display().to_string()))
        }
    }

    /// Runs every plugin in `analyzer_paths` (after the configured ones)
    /// against `target`.
    ///
    /// Plugin load failures are reported ahead of execution failures in the
    /// result's run errors.
    pub fn run<P>(&self, target: impl AsRef<Path>, analyzer_paths: &[P]) -> AnalysisResult
    where
        P: AsRef<Path>,
    {
        let paths: Vec<PathBuf> = self
            .config
            .analyzer_paths()
            .into_iter()
            .chain(analyzer_paths.iter().map(|p| p.as_ref().to_path_buf()))
            .collect();

        let outcome = self.loader.load_all(&paths);
        let entry_points = outcome.entry_points();

        info!(
            "{} plugin(s) loaded with {} entry point(s)",
            outcome.loaded.len(),
            entry_points.len()
        );

        self.analyze(target.as_ref(), &entry_points, outcome.errors)
    }

    /// Resolves `target` and runs `entry_points` on it, keeping
    /// `load_errors` ahead of the run's own errors.
    fn analyze(
        &self,
        target: &Path,
        entry_points: &[AnalysisEntryPoint],
        load_errors: Vec<String>,
    ) -> AnalysisResult {
        let units = self.resolver.resolve(target);
        info!("Resolved {} compilation unit(s)", units.len());
        self.engine
            .execute_with_errors(&units, entry_points, load_errors)
    }
}
