//! Solution and project descriptors.
//!
//! Both are JSONC documents. A solution lists project descriptors; a project
//! lists its source files (literal paths or globs), relative to itself.

use std::fs;
use std::path::Path;

use jsonc_parser::ParseOptions;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::HostError;

/// File extension of solution descriptors.
pub const SOLUTION_EXTENSION: &str = "lbsln";

/// File extension of project descriptors.
pub const PROJECT_EXTENSION: &str = "lbproj";

/// A solution: an ordered list of projects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SolutionDescriptor {
    /// Project descriptor paths, relative to the solution file.
    #[serde(default)]
    pub projects: Vec<String>,
}

/// A project: an ordered list of source entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProjectDescriptor {
    /// Source paths or glob patterns, relative to the project file.
    /// `None` means every source file under the project directory.
    #[serde(default)]
    pub sources: Option<Vec<String>>,
}

/// What kind of input a target path is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorKind {
    Solution,
    Project,
}

impl DescriptorKind {
    /// Classifies a file by its extension.
    pub fn of(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case(SOLUTION_EXTENSION) {
            Some(Self::Solution)
        } else if ext.eq_ignore_ascii_case(PROJECT_EXTENSION) {
            Some(Self::Project)
        } else {
            None
        }
    }
}

/// Reads and parses a descriptor file.
pub fn read_descriptor<T: DeserializeOwned>(path: &Path) -> Result<T, HostError> {
    let content = fs::read_to_string(path)?;
    parse_descriptor(&content)
        .map_err(|e| HostError::config(format!("Invalid descriptor {}: {}", path.display(), e)))
}

fn parse_descriptor<T: DeserializeOwned>(content: &str) -> Result<T, HostError> {
    let value = jsonc_parser::parse_to_serde_value(content, &ParseOptions::default())
        .map_err(|e| HostError::config(e.to_string()))?
        .unwrap_or(serde_json::Value::Object(serde_json::Map::new()));

    Ok(serde_json::from_value(value)?)
}
