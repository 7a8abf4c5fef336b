//! Sample lintbridge plugin exposing two analyzers.
//!
//! - `TaskMarkers` reports TODO/FIXME/XXX markers
//! - `LineLength` reports lines longer than 100 characters
//!
//! Build with `cargo build --release --target wasm32-unknown-unknown` and
//! pass the resulting `.wasm` to `lintbridge --analyzers`.

use extism_pdk::*;
use serde::{Deserialize, Serialize};

const PLUGIN_NAME: &str = "source-markers";
const VERSION: &str = "0.1.0";

const TASK_MARKERS: &[&str] = &["TODO", "FIXME", "XXX"];
const MAX_LINE_LENGTH: usize = 100;

#[derive(Debug, Serialize)]
pub struct PluginManifest {
    name: &'static str,
    version: &'static str,
    description: &'static str,
    analyzers: Vec<AnalyzerDescriptor>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzerDescriptor {
    name: &'static str,
    export: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub file_path: String,
    pub source: String,
}

#[derive(Debug, Default, Serialize)]
pub struct AnalyzeResponse {
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct Diagnostic {
    pub rule_code: &'static str,
    pub severity: &'static str,
    pub message: String,
    pub location: Location,
}

/// Location within the analyzed file. The host fills in the file.
#[derive(Debug, PartialEq, Serialize)]
pub struct Location {
    pub start: Position,
    pub end: Position,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

fn location(line: usize, start_col: usize, end_col: usize) -> Location {
    Location {
        start: Position {
            line: line as u32 + 1,
            column: start_col as u32 + 1,
        },
        end: Position {
            line: line as u32 + 1,
            column: end_col as u32 + 1,
        },
    }
}

/// Finds task markers, at most one per line.
pub fn find_task_markers(source: &str) -> Vec<Diagnostic> {
    source
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            TASK_MARKERS.iter().find_map(|marker| {
                line.find(marker).map(|byte| {
                    let column = line[..byte].chars().count();
                    Diagnostic {
                        rule_code: "SM001",
                        severity: "info",
                        message: format!("Unresolved {} marker", marker),
                        location: location(index, column, column + marker.len()),
                    }
                })
            })
        })
        .collect()
}

/// Finds lines longer than the limit.
pub fn find_long_lines(source: &str) -> Vec<Diagnostic> {
    source
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let length = line.chars().count();
            (length > MAX_LINE_LENGTH).then(|| Diagnostic {
                rule_code: "SM002",
                severity: "warning",
                message: format!("Line is {} characters long (limit {})", length, MAX_LINE_LENGTH),
                location: location(index, MAX_LINE_LENGTH, length),
            })
        })
        .collect()
}

/// Returns the plugin manifest.
#[plugin_fn]
pub fn get_manifest() -> FnResult<String> {
    let manifest = PluginManifest {
        name: PLUGIN_NAME,
        version: VERSION,
        description: "Task markers and overlong lines",
        analyzers: vec![
            AnalyzerDescriptor {
                name: "TaskMarkers",
                export: "task_markers",
            },
            AnalyzerDescriptor {
                name: "LineLength",
                export: "line_length",
            },
        ],
    };
    Ok(serde_json::to_string(&manifest)?)
}

#[plugin_fn]
pub fn task_markers(input: String) -> FnResult<String> {
    analyze_with(&input, find_task_markers)
}

#[plugin_fn]
pub fn line_length(input: String) -> FnResult<String> {
    analyze_with(&input, find_long_lines)
}

fn analyze_with(input: &str, analyzer: fn(&str) -> Vec<Diagnostic>) -> FnResult<String> {
    let request: AnalyzeRequest = serde_json::from_str(input)?;
    let response = AnalyzeResponse {
        diagnostics: analyzer(&request.source),
    };
    Ok(serde_json::to_string(&response)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("// TODO: later", 1)]
    #[case("// FIXME and TODO", 1)]
    #[case("let x = 1;", 0)]
    #[case("a\n// XXX\nb\n// TODO", 2)]
    fn task_marker_counts(#[case] source: &str, #[case] expected: usize) {
        assert_eq!(find_task_markers(source).len(), expected);
    }

    #[test]
    fn task_marker_position_is_one_based() {
        let diagnostics = find_task_markers("fn a() {}\n    // TODO: x");

        assert_eq!(diagnostics[0].location, location(1, 7, 11));
        assert_eq!(diagnostics[0].location.start.line, 2);
        assert_eq!(diagnostics[0].location.start.column, 8);
    }

    #[test]
    fn long_lines() {
        let source = format!("short\n{}", "x".repeat(120));
        let diagnostics = find_long_lines(&source);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule_code, "SM002");
        assert_eq!(
            diagnostics[0].message,
            "Line is 120 characters long (limit 100)"
        );
    }

    #[test]
    fn wire_format_matches_host() {
        let request: AnalyzeRequest = serde_json::from_str(
            r#"{ "file_path": "src/lib.rs", "source": "// TODO" }"#,
        )
        .unwrap();
        let response = AnalyzeResponse {
            diagnostics: find_task_markers(&request.source),
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["diagnostics"][0]["rule_code"], "SM001");
        assert_eq!(value["diagnostics"][0]["severity"], "info");
        assert_eq!(value["diagnostics"][0]["location"]["start"]["line"], 1);
    }
}
