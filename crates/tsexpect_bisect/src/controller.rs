//! The version bisection state machine.
//!
//! ```text
//! CheckHighest --fail--> Done (fails at newest)
//!      | pass
//! CheckLowest  --pass--> Done (success, middle assumed to pass)
//!      | fail
//! Bisecting    --------> Done (boundary found)
//! ```

use crate::error::CheckError;
use crate::package::{check_version, TestPackage};
use std::fmt;
use tracing::{debug, info, warn};
use tsexpect_diagnostics::messages;
use tsexpect_matcher::Failure;
use tsexpect_oracle::{EnvironmentCache, TsVersion, VersionList};

/// Runs a package's checks under one version.
pub trait VersionCheck {
    fn check(&self, package: &TestPackage, version: &TsVersion) -> Result<Vec<Failure>, CheckError>;
}

/// Checks versions through a shared [`EnvironmentCache`].
#[derive(Debug, Clone, Copy)]
pub struct CacheCheck<'c> {
    cache: &'c EnvironmentCache,
}

impl<'c> CacheCheck<'c> {
    pub fn new(cache: &'c EnvironmentCache) -> Self {
        Self { cache }
    }
}

impl VersionCheck for CacheCheck<'_> {
    fn check(
        &self,
        package: &TestPackage,
        version: &TsVersion,
    ) -> Result<Vec<Failure>, CheckError> {
        let env = self.cache.get(version)?;
        check_version(package, &env)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BisectState {
    CheckHighest,
    CheckLowest,
    Bisecting,
    Done,
}

impl fmt::Display for BisectState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BisectState::CheckHighest => "check-highest",
            BisectState::CheckLowest => "check-lowest",
            BisectState::Bisecting => "bisecting",
            BisectState::Done => "done",
        };
        f.write_str(name)
    }
}

/// Where a package's behavior changes across versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryResult {
    /// The failing version whose failures are reported.
    pub lowest_failing_version: Option<TsVersion>,
    /// The passing version directly above it, or the newest version when
    /// everything passed.
    pub highest_passing_version: Option<TsVersion>,
}

/// The terminal result of a bisection.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub state: BisectState,
    /// Annotated failures; empty when the package passes.
    pub failures: Vec<Failure>,
    pub boundary: Option<BoundaryResult>,
    /// Versions actually checked, in order.
    pub checked: Vec<TsVersion>,
}

impl Outcome {
    pub fn is_pass(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Finds the version at which a package stops passing.
pub struct BisectionController<'a, C: VersionCheck + ?Sized> {
    checker: &'a C,
    state: BisectState,
    checked: Vec<TsVersion>,
}

impl<'a, C: VersionCheck + ?Sized> BisectionController<'a, C> {
    pub fn new(checker: &'a C) -> Self {
        Self {
            checker,
            state: BisectState::CheckHighest,
            checked: Vec::new(),
        }
    }

    pub fn state(&self) -> BisectState {
        self.state
    }

    /// Run the search to completion.
    ///
    /// Any error aborts the whole search; no partial result is returned.
    pub fn run(
        &mut self,
        package: &TestPackage,
        versions: &VersionList,
    ) -> Result<Outcome, CheckError> {
        self.state = BisectState::CheckHighest;
        self.checked.clear();
        let highest = versions.highest();
        let lowest = versions.lowest();
        let mut lowest_failures = None;

        loop {
            debug!(package = %package.name, state = %self.state, "bisection step");
            match self.state {
                BisectState::CheckHighest => {
                    let mut failures = self.check(package, highest)?;
                    if !failures.is_empty() {
                        warn!(
                            package = %package.name,
                            version = %highest,
                            "fails at newest version"
                        );
                        let version = highest.to_string();
                        let note = messages::FAILS_AT_NEWEST_VERSION_0.format(&[version.as_str()]);
                        annotate(&mut failures, &note);
                        return Ok(self.finish(failures, Some(highest.clone()), None));
                    }
                    if versions.len() == 1 {
                        return Ok(self.finish(Vec::new(), None, Some(highest.clone())));
                    }
                    self.state = BisectState::CheckLowest;
                }
                BisectState::CheckLowest => {
                    let failures = self.check(package, lowest)?;
                    if failures.is_empty() {
                        info!(package = %package.name, %lowest, %highest, "passes at both ends");
                        return Ok(self.finish(Vec::new(), None, Some(highest.clone())));
                    }
                    lowest_failures = Some(failures);
                    self.state = BisectState::Bisecting;
                }
                BisectState::Bisecting => {
                    let lowest_failures =
                        lowest_failures.take().ok_or_else(|| CheckError::UnreachableState {
                            package: package.name.clone(),
                            detail: format!("bisecting without a failure at TypeScript@{}", lowest),
                        })?;
                    return self.bisect(package, versions, lowest_failures);
                }
                BisectState::Done => {
                    return Err(CheckError::UnreachableState {
                        package: package.name.clone(),
                        detail: "bisection resumed after it finished".to_string(),
                    });
                }
            }
        }
    }

    /// Scan down from the second-highest version for the first failure.
    ///
    /// The lowest version is known to fail; when nothing above it fails it is
    /// the boundary and its failures are reported.
    fn bisect(
        &mut self,
        package: &TestPackage,
        versions: &VersionList,
        lowest_failures: Vec<Failure>,
    ) -> Result<Outcome, CheckError> {
        let slice = versions.as_slice();
        for index in (1..slice.len() - 1).rev() {
            let failures = self.check(package, &slice[index])?;
            if !failures.is_empty() {
                return Ok(self.boundary(package, &slice[index], &slice[index + 1], failures));
            }
        }
        Ok(self.boundary(package, &slice[0], &slice[1], lowest_failures))
    }

    fn boundary(
        &mut self,
        package: &TestPackage,
        failing: &TsVersion,
        passing: &TsVersion,
        mut failures: Vec<Failure>,
    ) -> Outcome {
        warn!(package = %package.name, %failing, %passing, "found version boundary");
        let note = messages::COMPILES_IN_0_BUT_NOT_IN_1
            .format(&[passing.to_string().as_str(), failing.to_string().as_str()]);
        annotate(&mut failures, &note);
        self.finish(failures, Some(failing.clone()), Some(passing.clone()))
    }

    fn check(
        &mut self,
        package: &TestPackage,
        version: &TsVersion,
    ) -> Result<Vec<Failure>, CheckError> {
        info!(package = %package.name, %version, "checking");
        self.checked.push(version.clone());
        self.checker.check(package, version)
    }

    fn finish(
        &mut self,
        failures: Vec<Failure>,
        lowest_failing_version: Option<TsVersion>,
        highest_passing_version: Option<TsVersion>,
    ) -> Outcome {
        self.state = BisectState::Done;
        Outcome {
            state: BisectState::Done,
            failures,
            boundary: Some(BoundaryResult {
                lowest_failing_version,
                highest_passing_version,
            }),
            checked: std::mem::take(&mut self.checked),
        }
    }
}

fn annotate(failures: &mut [Failure], note: &str) {
    for failure in failures {
        failure.annotate(note);
    }
}
