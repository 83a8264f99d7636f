//! Errors that abort a package check.

use thiserror::Error;
use tsexpect_matcher::MatchError;
use tsexpect_oracle::{InstallationError, OracleError, VersionError};

/// A package check that could not produce a trustworthy result.
///
/// Assertion violations are not errors; they are reported as failures.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Installation(#[from] InstallationError),

    #[error("TypeScript@{version}: {source}")]
    Oracle {
        version: String,
        #[source]
        source: OracleError,
    },

    #[error(transparent)]
    Match(#[from] MatchError),

    #[error(transparent)]
    InvalidVersionList(#[from] VersionError),

    #[error("internal error checking {package}: {detail}")]
    UnreachableState { package: String, detail: String },
}
