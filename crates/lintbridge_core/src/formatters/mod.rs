//! Output formatters.

pub mod sarif;
pub mod text;

use std::fmt;
use std::str::FromStr;

use crate::{AnalysisResult, HostError};

/// Report format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// SARIF 2.1.0 JSON.
    Sarif,
}

impl FromStr for OutputFormat {
    type Err = HostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "sarif" => Ok(Self::Sarif),
            _ => Err(HostError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Sarif => f.write_str("sarif"),
        }
    }
}

/// Renders `result` in `format`. `verbose` only affects text output.
pub fn render(
    format: OutputFormat,
    result: &AnalysisResult,
    verbose: bool,
) -> Result<String, HostError> {
    match format {
        OutputFormat::Text => Ok(text::render_text(result, verbose)),
        OutputFormat::Sarif => Ok(sarif::generate_sarif(result)?),
    }
}
