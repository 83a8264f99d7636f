//! The assertion matcher.
//!
//! Error assertions are checked against the oracle's diagnostics; type
//! assertions are paired with the first node that starts on their line, in
//! a single pre-order walk of the syntax tree.

use crate::failure::{Failure, FailureKind};
use rustc_hash::FxHashSet;
use thiserror::Error;
use tracing::{debug, trace};
use tsexpect_ast::NodeId;
use tsexpect_core::{IndexError, LineIndex, TextPos, TextSpan};
use tsexpect_diagnostics::{messages, Diagnostic};
use tsexpect_oracle::{OracleError, SourceFile, TsVersion, TypeOracle};
use tsexpect_scanner::{extract_assertions, AssertionSet, DuplicateAssertion};

/// Errors that abort matching a file.
///
/// Assertion violations are never errors; they are collected in
/// [`MatchResult`].
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("TypeScript@{version}: {source}")]
    Oracle {
        version: String,
        #[source]
        source: OracleError,
    },

    #[error("TypeScript@{version}: {file}: {source}")]
    Index {
        version: String,
        file: String,
        #[source]
        source: IndexError,
    },
}

/// A type assertion whose node rendered differently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmetExpectation {
    /// The node that was queried, after unwrapping an expression statement.
    pub node: NodeId,
    pub span: TextSpan,
    pub expected: String,
    pub actual: String,
}

/// Outcome of matching one file against one checker version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    pub unmet_expectations: Vec<UnmetExpectation>,
    /// Lines of type assertions no node started on.
    pub unused_assertions: Vec<u32>,
    /// Lines expecting an error that got none.
    pub unseen_error_lines: Vec<u32>,
    pub unexpected_diagnostics: Vec<Diagnostic>,
    pub duplicates: Vec<DuplicateAssertion>,
}

impl MatchResult {
    pub fn is_pass(&self) -> bool {
        self.failure_count() == 0
    }

    pub fn failure_count(&self) -> usize {
        self.unmet_expectations.len()
            + self.unused_assertions.len()
            + self.unseen_error_lines.len()
            + self.unexpected_diagnostics.len()
            + self.duplicates.len()
    }

    /// Render every violation as a [`Failure`], ordered by position.
    pub fn into_failures(
        self,
        file: &str,
        index: &LineIndex,
        version: &TsVersion,
    ) -> Result<Vec<Failure>, IndexError> {
        let mut failures = Vec::with_capacity(self.failure_count());
        let at_line = |line: u32, kind: FailureKind, message: String| {
            let start = line_start_or_end(index, line);
            Failure {
                file: file.to_string(),
                span: TextSpan::new(start, 0),
                line,
                column: 0,
                kind,
                message,
            }
        };

        for duplicate in &self.duplicates {
            let kind = duplicate.kind.to_string();
            let message = messages::THIS_LINE_HAS_2_0_ASSERTIONS.format(&[kind.as_str()]);
            failures.push(at_line(duplicate.line, FailureKind::DuplicateAssertion, message));
        }
        for unmet in self.unmet_expectations {
            let position = index.line_and_column_of(unmet.span.start)?;
            failures.push(Failure {
                file: file.to_string(),
                span: unmet.span,
                line: position.line,
                column: position.character,
                kind: FailureKind::TypeMismatch,
                message: messages::EXPECTED_TYPE_TO_BE_0_GOT_1
                    .format(&[unmet.expected.as_str(), unmet.actual.as_str()]),
            });
        }
        for line in self.unused_assertions {
            let message = messages::CAN_NOT_MATCH_A_NODE_TO_THIS_ASSERTION.format(&[]);
            failures.push(at_line(line, FailureKind::UnmatchedAssertion, message));
        }
        for line in self.unseen_error_lines {
            let message = messages::EXPECTED_AN_ERROR_ON_THIS_LINE_BUT_FOUND_NONE.format(&[]);
            failures.push(at_line(line, FailureKind::MissingExpectedError, message));
        }
        let version = version.to_string();
        for diagnostic in self.unexpected_diagnostics {
            let span = diagnostic.span.unwrap_or_default();
            let position = index.line_and_column_of(span.start)?;
            failures.push(Failure {
                file: file.to_string(),
                span,
                line: position.line,
                column: position.character,
                kind: FailureKind::UnexpectedDiagnostic,
                message: messages::TYPESCRIPT_0_COMPILE_ERROR_1
                    .format(&[version.as_str(), diagnostic.message_text.as_str()]),
            });
        }

        failures.sort_by_key(|f| (f.line, f.column, f.kind));
        Ok(failures)
    }
}

/// An assertion line may lie one past the last line of the text.
fn line_start_or_end(index: &LineIndex, line: u32) -> TextPos {
    index.line_start(line).unwrap_or_else(|_| index.text_len())
}

/// Match the assertions of `file` against `oracle`.
///
/// With no assertions at all the file is a plain compile check: the tree is
/// not walked and every diagnostic is unexpected.
pub fn match_assertions<O: TypeOracle + ?Sized>(
    file: &str,
    index: &LineIndex,
    assertions: AssertionSet,
    oracle: &O,
) -> Result<MatchResult, MatchError> {
    let version = oracle.version();
    let oracle_error = |source| MatchError::Oracle {
        version: version.to_string(),
        source,
    };
    let line_of = |pos: TextPos| {
        index.line_of(pos).map_err(|source| MatchError::Index {
            version: version.to_string(),
            file: file.to_string(),
            source,
        })
    };

    let mut result = MatchResult::default();
    let diagnostics = oracle.diagnostics(file).map_err(oracle_error)?;

    if assertions.is_empty() {
        debug!(file, %version, diagnostics = diagnostics.len(), "plain compile check");
        result.unexpected_diagnostics = diagnostics;
        return Ok(result);
    }

    let AssertionSet {
        mut type_assertions,
        error_lines,
        duplicates,
    } = assertions;
    let duplicate_lines: FxHashSet<u32> = duplicates.iter().map(|d| d.line).collect();

    // Diagnostics against error assertions.
    let mut seen_error_lines = FxHashSet::default();
    for diagnostic in diagnostics {
        let Some(span) = diagnostic.span else {
            result.unexpected_diagnostics.push(diagnostic);
            continue;
        };
        let line = line_of(span.start)?;
        if duplicate_lines.contains(&line) {
            trace!(file, line, "diagnostic superseded by duplicate assertion");
        } else if error_lines.contains(&line) {
            seen_error_lines.insert(line);
        } else {
            result.unexpected_diagnostics.push(diagnostic);
        }
    }
    result.unseen_error_lines = error_lines
        .iter()
        .copied()
        .filter(|line| !seen_error_lines.contains(line))
        .collect();

    // Type assertions against the first node on each line.
    if !type_assertions.is_empty() {
        let tree = oracle.syntax_tree(file).map_err(oracle_error)?;
        for id in tree.preorder().skip(1) {
            if type_assertions.is_empty() {
                break;
            }
            let line = line_of(tree.node(id).span.start)?;
            let Some(expected) = type_assertions.shift_remove(&line) else {
                continue;
            };
            let target = tree.unwrap_expression_statement(id);
            let actual = oracle.type_of_node(file, target).map_err(oracle_error)?;
            trace!(
                file,
                line,
                %target,
                expected = %expected,
                actual = %actual,
                "matched type assertion"
            );
            if actual != expected {
                result.unmet_expectations.push(UnmetExpectation {
                    node: target,
                    span: tree.node(target).span,
                    expected,
                    actual,
                });
            }
        }
    }
    result.unused_assertions = type_assertions.into_keys().collect();
    result.duplicates = duplicates;

    debug!(
        file,
        %version,
        failures = result.failure_count(),
        "matched assertions"
    );
    Ok(result)
}

/// Check one source file and render its failures.
///
/// Declaration files carry no assertions and are always plain compile checks.
pub fn check_file<O: TypeOracle + ?Sized>(
    source: &SourceFile,
    oracle: &O,
) -> Result<Vec<Failure>, MatchError> {
    let assertions = if source.is_declaration_file() {
        AssertionSet::default()
    } else {
        extract_assertions(&source.text)
    };
    let index = LineIndex::new(&source.text);
    let result = match_assertions(&source.file_name, &index, assertions, oracle)?;
    result
        .into_failures(&source.file_name, &index, oracle.version())
        .map_err(|source_error| MatchError::Index {
            version: oracle.version().to_string(),
            file: source.file_name.clone(),
            source: source_error,
        })
}
