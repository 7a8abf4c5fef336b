//! Text output formatter

use lintbridge_plugin::Diagnostic;

use crate::AnalysisResult;

/// Sentence printed in verbose mode when nothing was found.
pub const NO_VIOLATIONS: &str = "No violations found.";

/// Renders a result as plain text lines joined by `\n`.
///
/// Run errors always come first. Verbose mode adds a summary line and, per
/// diagnostic, the producing entry point and the location.
pub fn render_text(result: &AnalysisResult, verbose: bool) -> String {
    if !result.has_diagnostics() && !result.has_errors() {
        return if verbose {
            NO_VIOLATIONS.to_string()
        } else {
            String::new()
        };
    }

    let mut lines: Vec<String> = result
        .errors()
        .iter()
        .map(|error| format!("Error: {}", error))
        .collect();

    if verbose && result.has_diagnostics() {
        lines.push(format!(
            "Found {} violation(s):",
            result.diagnostics().len()
        ));
    }

    for diagnostic in result.diagnostics() {
        lines.push(diagnostic_line(diagnostic));
        if verbose {
            lines.push(format!("  Type: {}", diagnostic.origin));
            lines.push(format!("  File: {}", location_text(diagnostic)));
        }
    }

    lines.join("\n")
}

fn diagnostic_line(diagnostic: &Diagnostic) -> String {
    format!(
        "[{}] {}: {}",
        diagnostic.rule_code, diagnostic.severity, diagnostic.message
    )
}

fn location_text(diagnostic: &Diagnostic) -> String {
    diagnostic
        .location
        .as_ref()
        .map_or_else(|| "unknown".to_string(), ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lintbridge_plugin::{Location, Position, Severity};
    use pretty_assertions::assert_eq;

    fn warning() -> Diagnostic {
        Diagnostic::new("W001", "Test warning")
            .with_severity(Severity::Warning)
            .with_origin("NamingAnalyzer")
    }

    #[test]
    fn test_empty_result() {
        let result = AnalysisResult::default();
        assert_eq!(render_text(&result, false), "");
        assert_eq!(render_text(&result, true), "No violations found.");
    }

    #[test]
    fn test_single_warning() {
        let result = AnalysisResult::new(vec![warning()], Vec::new());
        assert_eq!(render_text(&result, false), "[W001] warning: Test warning");
    }

    #[test]
    fn test_every_severity_word() {
        let diagnostics = [
            Severity::Error,
            Severity::Warning,
            Severity::Info,
            Severity::Hint,
            Severity::Unknown,
        ]
        .into_iter()
        .map(|severity| Diagnostic::new("X", "m").with_severity(severity))
        .collect();

        let output = render_text(&AnalysisResult::new(diagnostics, Vec::new()), false);

        assert_eq!(
            output,
            "[X] error: m\n[X] warning: m\n[X] info: m\n[X] hint: m\n[X] unknown: m"
        );
    }

    #[test]
    fn test_errors_only_non_verbose() {
        let result = AnalysisResult::new(
            Vec::new(),
            vec!["Plugin not found: nonexistent.dll".to_string()],
        );

        assert_eq!(
            render_text(&result, false),
            "Error: Plugin not found: nonexistent.dll"
        );
        // No summary line without diagnostics, even when verbose
        assert_eq!(
            render_text(&result, true),
            "Error: Plugin not found: nonexistent.dll"
        );
    }

    #[test]
    fn test_line_count_is_diagnostics_plus_errors() {
        let result = AnalysisResult::new(
            vec![warning(), warning(), Diagnostic::new("E001", "e")],
            vec!["a".to_string(), "b".to_string()],
        );

        assert_eq!(render_text(&result, false).lines().count(), 5);
        assert!(!render_text(&result, false).ends_with('\n'));
    }

    #[test]
    fn test_verbose_layout() {
        let located = warning().with_location(
            Location::new(Position::new(3, 5), Position::new(3, 9)).with_file("src/lib.rs"),
        );
        let unlocated = Diagnostic::new("E001", "Broken")
            .with_severity(Severity::Error)
            .with_origin("BrokenAnalyzer");

        let result = AnalysisResult::new(
            vec![located, unlocated],
            vec!["Plugin not found: a.wasm".to_string()],
        );

        insta::assert_snapshot!(render_text(&result, true), @r"
        Error: Plugin not found: a.wasm
        Found 2 violation(s):
        [W001] warning: Test warning
          Type: NamingAnalyzer
          File: src/lib.rs:3:5
        [E001] error: Broken
          Type: BrokenAnalyzer
          File: unknown
        ");
    }
}
