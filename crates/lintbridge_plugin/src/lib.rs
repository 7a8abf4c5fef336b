//! # lintbridge_plugin
//!
//! WASM plugin system for lintbridge.
//!
//! This crate provides:
//! - The diagnostic data model shared by host and plugins
//! - Plugin loading and validation
//! - Analysis entry points and the `Analyzer` capability trait
//!
//! ## Architecture
//!
//! Plugins are WebAssembly modules run through Extism (wasmtime). A module
//! may export `get_manifest`, returning a JSON [`PluginManifest`] that lists
//! its analyzers; each listed analyzer is an exported function taking a JSON
//! [`AnalyzeRequest`] and returning a JSON [`AnalyzeResponse`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use lintbridge_plugin::PluginLoader;
//!
//! let outcome = PluginLoader::default().load_all(&["./plugins/naming.wasm"]);
//! for error in &outcome.errors {
//!     eprintln!("{error}");
//! }
//! let entry_points = outcome.entry_points();
//! ```

mod diagnostic;
mod entry_point;
mod error;
mod executor;
mod executor_extism;
mod loader;
mod manifest;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use diagnostic::{Diagnostic, Fix, Location, Position, Severity};
pub use entry_point::AnalysisEntryPoint;
pub use error::PluginError;
pub use executor::{AnalyzeRequest, AnalyzeResponse, Analyzer};
pub use executor_extism::{WasmAnalyzer, WasmModule};
pub use loader::{
    DEFAULT_MEMORY_MAX_PAGES, DEFAULT_TIMEOUT_MS, LoadOutcome, LoadedPlugin, PluginLoader,
    PluginOptions,
};
pub use manifest::{AnalyzerDescriptor, PluginManifest};
