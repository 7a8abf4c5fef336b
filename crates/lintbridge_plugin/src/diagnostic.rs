//! Diagnostic types reported by analyzer plugins.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Severity level for diagnostics.
///
/// Plugins report severities as strings. Anything the host does not
/// recognize, including a missing value, `null`, or a non-string value,
/// becomes [`Severity::Unknown`] instead of failing the whole response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Error - must be fixed.
    Error,
    /// Warning - should be reviewed.
    Warning,
    /// Info - informational message.
    Info,
    /// Hint - a suggestion, usually invisible in editors.
    Hint,
    /// Unspecified or unrecognized severity.
    #[default]
    Unknown,
}

impl Severity {
    /// Returns the lowercase word used in text reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Hint => "hint",
            Severity::Unknown => "unknown",
        }
    }
}

impl From<&str> for Severity {
    fn from(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "error" => Severity::Error,
            "warning" | "warn" => Severity::Warning,
            "info" | "information" => Severity::Info,
            "hint" => Severity::Hint,
            _ => Severity::Unknown,
        }
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(value.as_str().map_or(Severity::Unknown, Severity::from))
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A position in a source file (1-indexed line and column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed).
    pub column: u32,
}

impl Position {
    /// Creates a new position.
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

/// A file plus a line/column range.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// The file the range refers to. Plugins may leave this out, in which
    /// case the host fills in the analyzed compilation unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Start of the range.
    pub start: Position,
    /// End of the range.
    pub end: Position,
}

impl Location {
    /// Creates a location without a file.
    pub fn new(start: Position, end: Position) -> Self {
        Self {
            file: None,
            start,
            end,
        }
    }

    /// Sets the file.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.file.as_deref().unwrap_or("unknown"),
            self.start.line,
            self.start.column
        )
    }
}

/// A suggested edit. The host carries fixes through to consumers
/// without interpreting them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fix {
    /// Short description of the fix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Plugin-defined edit payloads.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edits: Vec<serde_json::Value>,
}

/// A finding reported by an analysis entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Short stable rule identifier (e.g. "W001").
    pub rule_code: String,

    /// Severity level.
    #[serde(default)]
    pub severity: Severity,

    /// The diagnostic message.
    pub message: String,

    /// Name of the entry point that produced this diagnostic.
    ///
    /// Always assigned by the host; whatever the plugin sends is replaced.
    #[serde(default)]
    pub origin: String,

    /// Where the finding is, if the plugin knows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,

    /// Suggested fixes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fixes: Vec<Fix>,
}

impl Diagnostic {
    /// Creates a new diagnostic with unknown severity and no location.
    pub fn new(rule_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            rule_code: rule_code.into(),
            severity: Severity::Unknown,
            message: message.into(),
            origin: String::new(),
            location: None,
            fixes: Vec::new(),
        }
    }

    /// Sets the severity level.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the origin.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// Sets the location.
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Adds a fix.
    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fixes.push(fix);
        self
    }

    /// The file this diagnostic points at, if any.
    pub fn file(&self) -> Option<&str> {
        self.location.as_ref().and_then(|loc| loc.file.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_diagnostic_new() {
        let diag = Diagnostic::new("W001", "Test warning");

        assert_eq!(diag.rule_code, "W001");
        assert_eq!(diag.message, "Test warning");
        assert_eq!(diag.severity, Severity::Unknown);
        assert!(diag.location.is_none());
        assert!(diag.fixes.is_empty());
    }

    #[test]
    fn test_diagnostic_builder_chain() {
        let loc = Location::new(Position::new(3, 5), Position::new(3, 9)).with_file("src/lib.rs");
        let diag = Diagnostic::new("E001", "Bad thing")
            .with_severity(Severity::Error)
            .with_origin("BadThingAnalyzer")
            .with_location(loc)
            .with_fix(Fix::default());

        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.origin, "BadThingAnalyzer");
        assert_eq!(diag.file(), Some("src/lib.rs"));
        assert_eq!(diag.fixes.len(), 1);
    }

    #[rstest]
    #[case("error", Severity::Error)]
    #[case("Warning", Severity::Warning)]
    #[case("INFO", Severity::Info)]
    #[case("hint", Severity::Hint)]
    #[case("critical", Severity::Unknown)]
    #[case("", Severity::Unknown)]
    fn test_severity_from_str(#[case] input: &str, #[case] expected: Severity) {
        assert_eq!(Severity::from(input), expected);
    }

    #[test]
    fn test_severity_words() {
        assert_eq!(Severity::Error.as_str(), "error");
        assert_eq!(Severity::Warning.as_str(), "warning");
        assert_eq!(Severity::Info.as_str(), "info");
        assert_eq!(Severity::Hint.as_str(), "hint");
        assert_eq!(Severity::Unknown.as_str(), "unknown");
    }

    #[test]
    fn test_severity_default_is_unknown() {
        assert_eq!(Severity::default(), Severity::Unknown);
    }

    #[test]
    fn test_diagnostic_deserialization_minimal() {
        let json = r#"{ "rule_code": "W001", "message": "Test warning" }"#;

        let diag: Diagnostic = serde_json::from_str(json).unwrap();

        assert_eq!(diag.rule_code, "W001");
        assert_eq!(diag.severity, Severity::Unknown);
        assert_eq!(diag.origin, "");
        assert!(diag.location.is_none());
    }

    #[rstest]
    #[case(r#""fatal""#, Severity::Unknown)]
    #[case("2", Severity::Unknown)]
    #[case("null", Severity::Unknown)]
    #[case("true", Severity::Unknown)]
    #[case(r#"{ "level": "error" }"#, Severity::Unknown)]
    #[case(r#"["error"]"#, Severity::Unknown)]
    #[case(r#""WARN""#, Severity::Warning)]
    fn test_diagnostic_deserialization_any_severity(
        #[case] severity: &str,
        #[case] expected: Severity,
    ) {
        let json = format!(r#"{{ "rule_code": "W001", "severity": {severity}, "message": "m" }}"#);

        let diag: Diagnostic = serde_json::from_str(&json).unwrap();

        assert_eq!(diag.rule_code, "W001");
        assert_eq!(diag.severity, expected);
    }

    #[test]
    fn test_diagnostic_deserialization_full() {
        let json = r#"{
            "rule_code": "E001",
            "severity": "error",
            "message": "Broken",
            "location": {
                "start": { "line": 2, "column": 1 },
                "end": { "line": 2, "column": 8 }
            },
            "fixes": [{ "description": "remove it", "edits": [{ "delete": [1, 8] }] }]
        }"#;

        let diag: Diagnostic = serde_json::from_str(json).unwrap();

        assert_eq!(diag.severity, Severity::Error);
        let loc = diag.location.as_ref().unwrap();
        assert_eq!(loc.file, None);
        assert_eq!(loc.start, Position::new(2, 1));
        assert_eq!(loc.end, Position::new(2, 8));
        assert_eq!(diag.fixes[0].description.as_deref(), Some("remove it"));
        assert_eq!(diag.fixes[0].edits.len(), 1);
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        let json = serde_json::to_string(&Severity::Hint).unwrap();
        assert_eq!(json, "\"hint\"");
    }

    #[test]
    fn test_location_display() {
        let loc = Location::new(Position::new(10, 4), Position::new(10, 9)).with_file("a.rs");
        assert_eq!(loc.to_string(), "a.rs:10:4");

        let no_file = Location::new(Position::new(1, 1), Position::new(1, 1));
        assert_eq!(no_file.to_string(), "unknown:1:1");
    }

    #[test]
    fn test_equal_diagnostics_stay_distinct_entries() {
        let diagnostics = vec![
            Diagnostic::new("W001", "same"),
            Diagnostic::new("W001", "same"),
        ];

        assert_eq!(diagnostics[0], diagnostics[1]);
        assert_eq!(diagnostics.len(), 2);
    }
}
