//! Analysis entry points.

use std::fmt;
use std::sync::Arc;

use crate::executor::{AnalyzeRequest, Analyzer};
use crate::{Diagnostic, PluginError};

/// One runnable analysis function.
///
/// Entry points are cheap to clone; the analyzer behind them is shared.
/// Two entry points never influence each other beyond sharing a module.
#[derive(Clone)]
pub struct AnalysisEntryPoint {
    name: String,
    analyzer: Arc<dyn Analyzer>,
}

impl AnalysisEntryPoint {
    /// Creates an entry point named `name`.
    pub fn new(name: impl Into<String>, analyzer: Arc<dyn Analyzer>) -> Self {
        Self {
            name: name.into(),
            analyzer,
        }
    }

    /// Creates an entry point backed by an in-process function.
    pub fn from_fn<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&AnalyzeRequest<'_>) -> Result<Vec<Diagnostic>, PluginError> + Send + Sync + 'static,
    {
        Self::new(name, Arc::new(f))
    }

    /// The entry point's name, used as the origin of its diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the analyzer on one compilation unit.
    ///
    /// Every returned diagnostic carries this entry point as its origin, and
    /// locations without a file point at the analyzed unit.
    pub fn analyze(&self, request: &AnalyzeRequest<'_>) -> Result<Vec<Diagnostic>, PluginError> {
        let mut diagnostics = self.analyzer.analyze(request)?;

        for diagnostic in &mut diagnostics {
            diagnostic.origin.clone_from(&self.name);
            if let Some(location) = diagnostic.location.as_mut()
                && location.file.is_none()
            {
                location.file = Some(request.file_path.to_string());
            }
        }

        Ok(diagnostics)
    }
}

impl fmt::Debug for AnalysisEntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisEntryPoint")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Location, Position};

    fn request() -> AnalyzeRequest<'static> {
        AnalyzeRequest {
            file_path: "src/main.rs",
            source: "fn main() {}",
        }
    }

    #[test]
    fn test_origin_is_assigned_by_host() {
        let entry = AnalysisEntryPoint::from_fn("NamingAnalyzer", |_| {
            Ok(vec![Diagnostic::new("W001", "bad name").with_origin("spoofed")])
        });

        let diagnostics = entry.analyze(&request()).unwrap();

        assert_eq!(diagnostics[0].origin, "NamingAnalyzer");
    }

    #[test]
    fn test_location_file_defaults_to_unit() {
        let entry = AnalysisEntryPoint::from_fn("a", |_| {
            Ok(vec![
                Diagnostic::new("W001", "no file").with_location(Location::new(
                    Position::new(1, 1),
                    Position::new(1, 3),
                )),
                Diagnostic::new("W002", "own file").with_location(
                    Location::new(Position::new(2, 1), Position::new(2, 3)).with_file("other.rs"),
                ),
                Diagnostic::new("W003", "nowhere"),
            ])
        });

        let diagnostics = entry.analyze(&request()).unwrap();

        assert_eq!(diagnostics[0].file(), Some("src/main.rs"));
        assert_eq!(diagnostics[1].file(), Some("other.rs"));
        assert!(diagnostics[2].location.is_none());
    }

    #[test]
    fn test_failure_is_passed_through() {
        let entry = AnalysisEntryPoint::from_fn("broken", |_| Err(PluginError::call("trap")));

        assert!(entry.analyze(&request()).is_err());
    }
}
