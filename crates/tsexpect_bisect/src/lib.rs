//! tsexpect_bisect: Checking a package across checker versions.
//!
//! The [`BisectionController`] checks the newest version first, then the
//! oldest, and only searches the versions in between when the oldest fails.
//! Versions are assumed to behave monotonically: when both ends pass, the
//! middle is not checked.

mod controller;
mod error;
mod package;

pub use controller::{
    BisectState, BisectionController, BoundaryResult, CacheCheck, Outcome, VersionCheck,
};
pub use error::CheckError;
pub use package::{check_package, check_packages, check_version, TestPackage};
