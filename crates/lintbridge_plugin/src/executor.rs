//! Analyzer capability abstraction.
//!
//! This module provides the `Analyzer` trait, the seam between the host and
//! whatever actually runs analysis code. The WASM backend implements it in
//! `executor_extism`; tests implement it in-process.

use serde::{Deserialize, Serialize};

use crate::{Diagnostic, PluginError};

/// Request sent to an analyzer for one compilation unit.
///
/// Carries only the unit itself, so the payload of a call does not grow with
/// the number of units in the run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeRequest<'a> {
    /// Path of the compilation unit being analyzed.
    pub file_path: &'a str,
    /// Source text of the compilation unit.
    pub source: &'a str,
}

/// Response returned by an analyzer.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    /// Diagnostics reported by the analyzer.
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

/// Something that turns one compilation unit into diagnostics.
///
/// Implementations must be shareable across threads: the execution engine
/// may call analyzers from the rayon pool. Implementations backed by
/// non-reentrant runtimes serialize internally.
pub trait Analyzer: Send + Sync {
    /// Analyzes one compilation unit.
    ///
    /// # Errors
    ///
    /// Returns an error when the analyzer trapped, timed out, or produced
    /// output the host cannot decode.
    fn analyze(&self, request: &AnalyzeRequest<'_>) -> Result<Vec<Diagnostic>, PluginError>;
}

impl<F> Analyzer for F
where
    F: Fn(&AnalyzeRequest<'_>) -> Result<Vec<Diagnostic>, PluginError> + Send + Sync,
{
    fn analyze(&self, request: &AnalyzeRequest<'_>) -> Result<Vec<Diagnostic>, PluginError> {
        self(request)
    }
}
