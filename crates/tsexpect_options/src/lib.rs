//! tsexpect_options: Run configuration and compiler options.
//!
//! `RunOptions` describes one package check: which checker versions to try
//! and the compiler options every version is given. Both are read from JSON
//! with the same field names as `tsconfig.json`.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Compiler options handed to every checker version unchanged.
///
/// Options this crate does not know about are preserved in `extra`, so a
/// newer checker still receives them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
    // -- Basic Options --
    pub target: Option<ScriptTarget>,
    pub module: Option<ModuleKind>,
    pub lib: Option<Vec<String>>,
    pub declaration: Option<bool>,
    pub no_emit: Option<bool>,

    // -- Strict Type-Checking Options --
    pub strict: Option<bool>,
    pub no_implicit_any: Option<bool>,
    pub strict_null_checks: Option<bool>,
    pub strict_function_types: Option<bool>,
    pub no_implicit_this: Option<bool>,
    pub exact_optional_property_types: Option<bool>,

    // -- Module Resolution Options --
    pub module_resolution: Option<String>,
    pub base_url: Option<String>,
    pub paths: Option<std::collections::BTreeMap<String, Vec<String>>>,
    pub type_roots: Option<Vec<String>>,
    pub types: Option<Vec<String>>,
    pub es_module_interop: Option<bool>,

    // -- Advanced Options --
    pub skip_lib_check: Option<bool>,
    pub force_consistent_casing_in_file_names: Option<bool>,

    /// Every other option, forwarded as-is.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Script target version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScriptTarget {
    #[serde(alias = "es3")]
    ES3,
    #[serde(alias = "es5")]
    ES5,
    #[serde(alias = "es6", alias = "ES6", alias = "es2015")]
    ES2015,
    #[serde(alias = "es2016")]
    ES2016,
    #[serde(alias = "es2017")]
    ES2017,
    #[serde(alias = "es2018")]
    ES2018,
    #[serde(alias = "es2019")]
    ES2019,
    #[serde(alias = "es2020")]
    ES2020,
    #[serde(alias = "es2021")]
    ES2021,
    #[serde(alias = "es2022")]
    ES2022,
    #[serde(alias = "esnext")]
    ESNext,
}

/// Module kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModuleKind {
    #[serde(alias = "none")]
    None,
    #[serde(alias = "commonjs")]
    CommonJS,
    #[serde(alias = "amd")]
    AMD,
    #[serde(alias = "umd")]
    UMD,
    #[serde(alias = "es2015", alias = "es6")]
    ES2015,
    #[serde(alias = "esnext")]
    ESNext,
    #[serde(alias = "node16")]
    Node16,
    #[serde(alias = "nodenext")]
    NodeNext,
}

/// Options for checking one package across checker versions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunOptions {
    /// Supported checker versions, oldest first (e.g. `["4.0", "4.5", "5.0"]`).
    pub versions: Vec<String>,
    /// Also check the unreleased `next` version, as the newest.
    pub include_next: bool,
    /// Check only the unreleased `next` version.
    pub only_test_next: bool,
    /// The newest version the package supports; later versions are skipped.
    pub max_version: Option<String>,
    /// Compiler options for every version.
    pub compiler_options: CompilerOptions,
}

/// Errors reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse run options from a JSON string.
pub fn parse_run_options(content: &str) -> Result<RunOptions, ConfigError> {
    Ok(serde_json::from_str(content)?)
}

/// Parse run options from a JSON file.
pub fn parse_run_options_file(path: impl AsRef<Path>) -> Result<RunOptions, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_run_options(&content)
}
