//! Analysis result type.

use serde::Serialize;

use lintbridge_plugin::Diagnostic;

/// Everything one run produced: findings plus host-level failures.
///
/// Built once by the execution engine and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisResult {
    diagnostics: Vec<Diagnostic>,
    errors: Vec<String>,
}

impl AnalysisResult {
    /// Creates a result.
    pub fn new(diagnostics: Vec<Diagnostic>, errors: Vec<String>) -> Self {
        Self {
            diagnostics,
            errors,
        }
    }

    /// Diagnostics in discovery order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Run errors in discovery order.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Returns true if there are any diagnostics.
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Returns true if any analysis failed to complete.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Process exit code for this result: 1 with diagnostics, otherwise 0.
    ///
    /// Run errors alone do not change the exit code.
    pub fn exit_code(&self) -> i32 {
        if self.has_diagnostics() { 1 } else { 0 }
    }
}
