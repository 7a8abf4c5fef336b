//! Execution engine.
//!
//! Runs every entry point against every compilation unit and folds the
//! outcome into one [`AnalysisResult`]. A failing invocation never stops the
//! run; it becomes a run error and execution moves on.

use std::fs;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use lintbridge_plugin::{AnalysisEntryPoint, AnalyzeRequest, Diagnostic};

use crate::{AnalysisResult, CompilationUnit};

/// A unit whose source was read successfully.
struct LoadedSource {
    path: String,
    text: String,
}

/// What one entry point produced across all units.
#[derive(Default)]
struct EntryOutcome {
    diagnostics: Vec<Diagnostic>,
    errors: Vec<String>,
}

/// Runs analysis entry points over compilation units.
#[derive(Debug, Clone, Copy)]
pub struct ExecutionEngine {
    parallel: bool,
}

impl ExecutionEngine {
    /// Creates an engine. With `parallel`, entry points run on the rayon pool.
    pub fn new(parallel: bool) -> Self {
        Self { parallel }
    }

    /// Runs every entry point on every unit.
    ///
    /// Diagnostics come out grouped by entry point, then by unit, in input
    /// order, whether or not the run was parallel.
    pub fn execute(
        &self,
        units: &[CompilationUnit],
        entry_points: &[AnalysisEntryPoint],
    ) -> AnalysisResult {
        self.execute_with_errors(units, entry_points, Vec::new())
    }

    /// Like [`execute`](Self::execute), with `errors` placed ahead of any
    /// errors this run produces.
    pub fn execute_with_errors(
        &self,
        units: &[CompilationUnit],
        entry_points: &[AnalysisEntryPoint],
        mut errors: Vec<String>,
    ) -> AnalysisResult {
        let sources = read_sources(units, &mut errors);

        debug!(
            "Running {} entry point(s) on {} unit(s) ({})",
            entry_points.len(),
            sources.len(),
            if self.parallel { "parallel" } else { "sequential" }
        );

        let run = |entry: &AnalysisEntryPoint| run_entry_point(entry, &sources);
        let outcomes: Vec<EntryOutcome> = if self.parallel {
            entry_points.par_iter().map(run).collect()
        } else {
            entry_points.iter().map(run).collect()
        };

        let mut diagnostics = Vec::new();
        for outcome in outcomes {
            diagnostics.extend(outcome.diagnostics);
            errors.extend(outcome.errors);
        }

        info!(
            "Analysis finished: {} diagnostic(s), {} error(s)",
            diagnostics.len(),
            errors.len()
        );

        AnalysisResult::new(diagnostics, errors)
    }
}

impl Default for ExecutionEngine {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Reads each unit once. Unreadable units are reported and left out.
///
/// All readable sources stay in memory for the whole run, so peak memory is
/// the total size of the units. In exchange every entry point sees the same
/// text and a read failure is reported once rather than once per entry point.
fn read_sources(units: &[CompilationUnit], errors: &mut Vec<String>) -> Vec<LoadedSource> {
    let mut sources = Vec::with_capacity(units.len());
    for unit in units {
        match fs::read(unit.path()) {
            Ok(bytes) => sources.push(LoadedSource {
                path: unit.to_string(),
                text: String::from_utf8_lossy(&bytes).into_owned(),
            }),
            Err(e) => {
                let message = format!("Failed to read '{}': {}", unit, e);
                warn!("{}", message);
                errors.push(message);
            }
        }
    }
    sources
}

fn run_entry_point(entry: &AnalysisEntryPoint, sources: &[LoadedSource]) -> EntryOutcome {
    let mut outcome = EntryOutcome::default();

    for source in sources {
        let request = AnalyzeRequest {
            file_path: &source.path,
            source: &source.text,
        };

        match entry.analyze(&request) {
            Ok(diagnostics) => {
                debug!(
                    "{} reported {} diagnostic(s) on {}",
                    entry.name(),
                    diagnostics.len(),
                    source.path
                );
                outcome.diagnostics.extend(diagnostics);
            }
            Err(e) => {
                let message = format!(
                    "Analyzer '{}' failed on '{}': {}",
                    entry.name(),
                    source.path,
                    single_line(&e.to_string())
                );
                warn!("{}", message);
                outcome.errors.push(message);
            }
        }
    }

    outcome
}

/// Joins a possibly multi-line cause so each run error renders as one line.
fn single_line(message: &str) -> String {
    message.split_whitespace().collect::<Vec<_>>().join(" ")
}
