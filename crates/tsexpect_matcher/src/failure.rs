//! User-facing assertion failures.

use std::fmt;
use tsexpect_core::TextSpan;

/// The kind of assertion violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FailureKind {
    DuplicateAssertion,
    TypeMismatch,
    UnmatchedAssertion,
    MissingExpectedError,
    UnexpectedDiagnostic,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::DuplicateAssertion => "duplicate assertion",
            FailureKind::TypeMismatch => "type mismatch",
            FailureKind::UnmatchedAssertion => "unmatched assertion",
            FailureKind::MissingExpectedError => "missing expected error",
            FailureKind::UnexpectedDiagnostic => "unexpected diagnostic",
        };
        f.write_str(name)
    }
}

/// One assertion violation, positioned in its file.
///
/// `line` and `column` are 0-based; `Display` prints them 1-based as
/// `file:line:column - message`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub file: String,
    pub span: TextSpan,
    pub line: u32,
    pub column: u32,
    pub kind: FailureKind,
    pub message: String,
}

impl Failure {
    /// Prefix the message with a version annotation on its own line.
    pub fn annotate(&mut self, annotation: &str) {
        self.message = format!("{}\n{}", annotation, self.message);
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{} - {}",
            self.file,
            self.line + 1,
            self.column + 1,
            self.message
        )
    }
}
