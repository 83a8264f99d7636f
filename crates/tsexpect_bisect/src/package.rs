//! Packages under test and per-version checking.

use crate::controller::{BisectionController, CacheCheck, Outcome};
use crate::error::CheckError;
use rayon::prelude::*;
use tracing::{debug, info_span};
use tsexpect_matcher::{check_file, Failure};
use tsexpect_oracle::{
    EnvironmentCache, OracleError, Program, SourceFile, VersionEnvironment, VersionList,
};
use tsexpect_options::RunOptions;

/// A set of declarations plus the files whose assertions test them.
#[derive(Debug, Clone)]
pub struct TestPackage {
    pub name: String,
    pub program: Program,
    /// Files to check; `None` checks every program file.
    test_files: Option<Vec<String>>,
}

impl TestPackage {
    pub fn new(name: impl Into<String>, program: Program) -> Self {
        Self {
            name: name.into(),
            program,
            test_files: None,
        }
    }

    /// Restrict checking to the named program files.
    pub fn with_test_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.test_files = Some(files.into_iter().map(Into::into).collect());
        self
    }

    /// The files to check, in order.
    ///
    /// Declaration files are checked too, as plain compile checks.
    pub fn test_files(&self) -> Result<Vec<&SourceFile>, OracleError> {
        match &self.test_files {
            None => Ok(self.program.files().iter().collect()),
            Some(names) => names
                .iter()
                .map(|name| {
                    self.program
                        .file(name)
                        .ok_or_else(|| OracleError::UnknownFile { file: name.clone() })
                })
                .collect(),
        }
    }
}

/// Check every test file of `package` under one version.
///
/// An empty result means the version passes.
pub fn check_version(
    package: &TestPackage,
    env: &VersionEnvironment,
) -> Result<Vec<Failure>, CheckError> {
    let version = env.version();
    let oracle_error = |source| CheckError::Oracle {
        version: version.to_string(),
        source,
    };
    let oracle = env.oracle(&package.program).map_err(oracle_error)?;
    let mut failures = Vec::new();
    for file in package.test_files().map_err(oracle_error)? {
        failures.extend(check_file(file, &oracle)?);
    }
    debug!(package = %package.name, %version, failures = failures.len(), "checked version");
    Ok(failures)
}

/// Check one package with the versions selected by `options`.
pub fn check_package(
    package: &TestPackage,
    options: &RunOptions,
    cache: &EnvironmentCache,
) -> Result<Outcome, CheckError> {
    let versions = VersionList::from_options(options)?;
    BisectionController::new(&CacheCheck::new(cache)).run(package, &versions)
}

/// Check independent packages in parallel, sharing one environment cache.
///
/// Each package's own version search stays sequential. Results are in
/// package order.
pub fn check_packages(
    packages: &[TestPackage],
    versions: &VersionList,
    cache: &EnvironmentCache,
) -> Vec<Result<Outcome, CheckError>> {
    let checker = CacheCheck::new(cache);
    packages
        .par_iter()
        .map(|package| {
            let _span = info_span!("package", name = %package.name).entered();
            BisectionController::new(&checker).run(package, versions)
        })
        .collect()
}
