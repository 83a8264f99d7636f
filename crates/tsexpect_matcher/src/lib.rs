//! tsexpect_matcher: Matching assertions against a checker's answers.
//!
//! Given one source file, its [`AssertionSet`](tsexpect_scanner::AssertionSet)
//! and a [`TypeOracle`](tsexpect_oracle::TypeOracle), the matcher produces a
//! [`MatchResult`], which renders to user-facing [`Failure`]s.

mod failure;
mod matcher;

pub use failure::{Failure, FailureKind};
pub use matcher::{check_file, match_assertions, MatchError, MatchResult, UnmetExpectation};
