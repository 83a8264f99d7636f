//! Oracle and installation errors.

use thiserror::Error;
use tsexpect_ast::NodeId;

/// Errors raised while querying a checker engine.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("file {file} is not part of the program")]
    UnknownFile { file: String },

    #[error("node {node} does not exist in {file}")]
    UnknownNode { file: String, node: NodeId },

    #[error("checker engine failed: {message}")]
    Engine { message: String },

    #[error("invalid snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("failed to read snapshot {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type OracleResult<T> = Result<T, OracleError>;

/// A checker version could not be installed or loaded.
#[derive(Debug, Clone, Error)]
#[error("failed to install TypeScript@{version}: {message}")]
pub struct InstallationError {
    pub version: String,
    pub message: String,
}

impl InstallationError {
    pub fn new(version: impl ToString, message: impl Into<String>) -> Self {
        Self {
            version: version.to_string(),
            message: message.into(),
        }
    }
}
