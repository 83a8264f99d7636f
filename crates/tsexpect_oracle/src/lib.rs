//! tsexpect_oracle: Type-checking oracles and checker version environments.
//!
//! A checker engine is bound to one checker version. The [`OracleAdapter`]
//! wraps an engine behind the [`TypeOracle`] capability interface that the
//! matcher uses, and the [`EnvironmentCache`] makes sure each version is
//! installed and loaded at most once per process.

pub mod adapter;
pub mod cache;
pub mod engine;
pub mod error;
pub mod program;
pub mod recorded;
pub mod version;

// Re-export commonly used types
pub use adapter::{OracleAdapter, TypeOracle};
pub use cache::{CheckerFactory, EnvironmentCache, Installer, VersionEnvironment};
pub use engine::{CheckerEngine, TypeFormatFlags};
pub use error::{InstallationError, OracleError, OracleResult};
pub use program::{Program, SourceFile};
pub use recorded::{RecordedEngine, RecordedFactory, RecordedSnapshot, SnapshotInstaller};
pub use version::{TsVersion, VersionError, VersionList};
