//! # lintbridge_core
//!
//! Core host engine for lintbridge.
//!
//! This crate provides:
//! - The `Host` orchestrator
//! - Configuration loading
//! - Target resolution (solutions, projects, directories, files)
//! - Parallel execution of analysis entry points
//! - Text and SARIF output
//!
//! ## Example
//!
//! ```rust,ignore
//! use lintbridge_core::{Host, HostConfig, OutputFormat, render};
//!
//! let config = HostConfig::from_file(".lintbridge.jsonc")?;
//! let host = Host::new(config)?;
//!
//! let result = host.run("App.lbsln", &["analyzers/naming.wasm"]);
//! println!("{}", render(OutputFormat::Text, &result, false)?);
//! std::process::exit(result.exit_code());
//! ```

mod config;
pub mod descriptor;
mod engine;
mod error;
pub mod formatters;
mod host;
mod result;
pub mod target;

pub use config::{CONFIG_FILE_NAMES, HostConfig};
pub use engine::ExecutionEngine;
pub use error::HostError;
pub use formatters::{OutputFormat, render};
pub use host::Host;
pub use result::AnalysisResult;
pub use target::{CompilationUnit, TargetResolver};

// Re-export plugin types for convenience
pub use lintbridge_plugin::{
    AnalysisEntryPoint, AnalyzeRequest, Diagnostic, Fix, Location, PluginError, Position,
    Severity,
};
