//! Plugin manifest definition.

use serde::{Deserialize, Serialize};

/// Manifest returned by a module's optional `get_manifest` export.
///
/// The manifest is how a module exposes its analysis entry points: every
/// entry in `analyzers` names one exported function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginManifest {
    /// Plugin name (e.g. "sample-analyzers").
    pub name: String,

    /// Plugin version.
    #[serde(default)]
    pub version: String,

    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Analyzers exposed by this module.
    #[serde(default)]
    pub analyzers: Vec<AnalyzerDescriptor>,
}

/// One analyzer exposed by a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerDescriptor {
    /// Analyzer name; becomes the origin of its diagnostics.
    pub name: String,

    /// Name of the exported function implementing the analyzer.
    /// Defaults to `name` when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export: Option<String>,

    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PluginManifest {
    /// Creates a manifest with no analyzers.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: None,
            analyzers: Vec::new(),
        }
    }

    /// Adds an analyzer.
    pub fn with_analyzer(mut self, analyzer: AnalyzerDescriptor) -> Self {
        self.analyzers.push(analyzer);
        self
    }
}

impl AnalyzerDescriptor {
    /// Creates a descriptor whose export has the same name as the analyzer.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            export: None,
            description: None,
        }
    }

    /// Sets the export name.
    pub fn with_export(mut self, export: impl Into<String>) -> Self {
        self.export = Some(export.into());
        self
    }

    /// The exported function to call.
    pub fn export_name(&self) -> &str {
        self.export.as_deref().unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_deserialization() {
        let json = r#"{
            "name": "sample",
            "version": "0.1.0",
            "analyzers": [
                { "name": "TodoAnalyzer", "export": "analyze_todo" },
                { "name": "line_length" }
            ]
        }"#;

        let manifest: PluginManifest = serde_json::from_str(json).unwrap();

        assert_eq!(manifest.name, "sample");
        assert_eq!(manifest.analyzers.len(), 2);
        assert_eq!(manifest.analyzers[0].export_name(), "analyze_todo");
        assert_eq!(manifest.analyzers[1].export_name(), "line_length");
    }

    #[test]
    fn test_manifest_without_analyzers() {
        let manifest: PluginManifest = serde_json::from_str(r#"{ "name": "empty" }"#).unwrap();

        assert!(manifest.analyzers.is_empty());
        assert_eq!(manifest.version, "");
    }

    #[test]
    fn test_manifest_builder() {
        let manifest = PluginManifest::new("p", "1.0.0")
            .with_analyzer(AnalyzerDescriptor::new("a").with_export("run_a"));

        assert_eq!(manifest.analyzers[0].export_name(), "run_a");
    }
}
