//! SARIF (Static Analysis Results Interchange Format) output formatter.
//!
//! Implements SARIF 2.1.0 format for integration with GitHub Advanced Security
//! and other CI/CD tools.

use serde::Serialize;

use lintbridge_plugin::{Diagnostic, Severity};

use crate::AnalysisResult;

/// SARIF version constant
const SARIF_VERSION: &str = "2.1.0";

const SARIF_SCHEMA: &str =
    "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json";

/// Tool information for SARIF
const TOOL_NAME: &str = "lintbridge";
const TOOL_INFORMATION_URI: &str = "https://github.com/lintbridge/lintbridge";

/// Generates SARIF output from an analysis result
pub fn generate_sarif(result: &AnalysisResult) -> Result<String, serde_json::Error> {
    let sarif_log = SarifLog::from_result(result);
    serde_json::to_string_pretty(&sarif_log)
}

/// Root SARIF log structure
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifLog {
    #[serde(rename = "$schema")]
    schema: &'static str,
    version: &'static str,
    runs: Vec<Run>,
}

impl SarifLog {
    fn from_result(result: &AnalysisResult) -> Self {
        Self {
            schema: SARIF_SCHEMA,
            version: SARIF_VERSION,
            runs: vec![Run::from_result(result)],
        }
    }
}

/// A single run of the tool
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct Run {
    tool: Tool,
    results: Vec<SarifResult>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    invocations: Vec<Invocation>,
}

impl Run {
    fn from_result(result: &AnalysisResult) -> Self {
        let mut rules: Vec<ReportingDescriptor> = Vec::new();
        for diagnostic in result.diagnostics() {
            // First occurrence wins
            if !rules.iter().any(|rule| rule.id == diagnostic.rule_code) {
                rules.push(ReportingDescriptor::from_diagnostic(diagnostic));
            }
        }

        let invocations = if result.has_errors() {
            vec![Invocation::failed(result.errors())]
        } else {
            Vec::new()
        };

        Self {
            tool: Tool {
                driver: ToolComponent::new(rules),
            },
            results: result
                .diagnostics()
                .iter()
                .map(SarifResult::from_diagnostic)
                .collect(),
            invocations,
        }
    }
}

/// Tool information
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct Tool {
    driver: ToolComponent,
}

/// Tool component (driver)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolComponent {
    name: &'static str,
    version: &'static str,
    information_uri: &'static str,
    rules: Vec<ReportingDescriptor>,
}

impl ToolComponent {
    fn new(rules: Vec<ReportingDescriptor>) -> Self {
        Self {
            name: TOOL_NAME,
            version: env!("CARGO_PKG_VERSION"),
            information_uri: TOOL_INFORMATION_URI,
            rules,
        }
    }
}

/// Rule descriptor
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportingDescriptor {
    id: String,
    name: String,
    short_description: Message,
    full_description: Message,
    default_configuration: ReportingConfiguration,
}

impl ReportingDescriptor {
    /// Describes a rule by its first diagnostic
    fn from_diagnostic(diagnostic: &Diagnostic) -> Self {
        Self {
            id: diagnostic.rule_code.clone(),
            name: diagnostic.origin.clone(),
            short_description: Message::text(&diagnostic.message),
            full_description: Message::text(&diagnostic.message),
            default_configuration: ReportingConfiguration { level: "warning" },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct ReportingConfiguration {
    level: &'static str,
}

/// A message
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct Message {
    text: String,
}

impl Message {
    /// Creates a simple text message
    fn text(s: impl Into<String>) -> Self {
        Self { text: s.into() }
    }
}

/// A single result (diagnostic)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifResult {
    rule_id: String,
    level: &'static str,
    message: Message,
    locations: Vec<Location>,
}

impl SarifResult {
    fn from_diagnostic(diagnostic: &Diagnostic) -> Self {
        Self {
            rule_id: diagnostic.rule_code.clone(),
            level: level(diagnostic.severity),
            message: Message::text(&diagnostic.message),
            locations: vec![Location::from_diagnostic(diagnostic)],
        }
    }
}

/// SARIF level for a severity
fn level(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warning | Severity::Unknown => "warning",
        Severity::Info | Severity::Hint => "note",
    }
}

/// Location information
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct Location {
    physical_location: PhysicalLocation,
}

impl Location {
    fn from_diagnostic(diagnostic: &Diagnostic) -> Self {
        let region = diagnostic
            .location
            .as_ref()
            .map_or_else(Region::default, Region::from_location);

        Self {
            physical_location: PhysicalLocation {
                artifact_location: ArtifactLocation {
                    uri: diagnostic.file().unwrap_or("unknown").to_string(),
                },
                region,
            },
        }
    }
}

/// Physical location
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct PhysicalLocation {
    artifact_location: ArtifactLocation,
    region: Region,
}

/// Artifact location (file path)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ArtifactLocation {
    uri: String,
}

/// Region (line/column information)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct Region {
    start_line: u32,
    start_column: u32,
    end_line: u32,
    end_column: u32,
}

impl Region {
    // SARIF lines and columns start at 1; plugins may still report 0
    fn from_location(loc: &lintbridge_plugin::Location) -> Self {
        Self {
            start_line: loc.start.line.max(1),
            start_column: loc.start.column.max(1),
            end_line: loc.end.line.max(1),
            end_column: loc.end.column.max(1),
        }
    }
}

impl Default for Region {
    fn default() -> Self {
        Self {
            start_line: 1,
            start_column: 1,
            end_line: 1,
            end_column: 1,
        }
    }
}

/// Invocation record carrying run errors
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct Invocation {
    execution_successful: bool,
    tool_execution_notifications: Vec<Notification>,
}

impl Invocation {
    fn failed(errors: &[String]) -> Self {
        Self {
            execution_successful: false,
            tool_execution_notifications: errors
                .iter()
                .map(|error| Notification {
                    level: "error",
                    message: Message::text(error),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct Notification {
    level: &'static str,
    message: Message,
}
