//! tsexpect_diagnostics: Checker diagnostics and assertion failure messages.
//!
//! A [`Diagnostic`] is what a type-checking engine reports for a file. The
//! [`messages`] module holds the templates used when an assertion does not
//! hold, so that every failure is phrased the same way regardless of which
//! checker version produced it.

use serde::{Deserialize, Serialize};
use std::fmt;
use tsexpect_core::text::TextSpan;

/// Severity of a diagnostic as the checker classifies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Suggestion,
    Message,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Warning => write!(f, "warning"),
            DiagnosticCategory::Error => write!(f, "error"),
            DiagnosticCategory::Suggestion => write!(f, "suggestion"),
            DiagnosticCategory::Message => write!(f, "message"),
        }
    }
}

/// The checker phase that produced a diagnostic.
///
/// Only pre-emit phases describe type errors; `Emit` diagnostics are about
/// code generation and are dropped by the oracle adapter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSource {
    Syntactic,
    #[default]
    Semantic,
    Global,
    Emit,
}

impl DiagnosticSource {
    pub fn is_pre_emit(self) -> bool {
        !matches!(self, DiagnosticSource::Emit)
    }
}

/// A message template; `{0}`, `{1}`, ... are filled in by [`DiagnosticMessage::format`].
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

impl DiagnosticMessage {
    /// Render this template with the given arguments.
    pub fn format(&self, args: &[&str]) -> String {
        format_message(self.message, args)
    }
}

/// A diagnostic reported by a checker for one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// `None` for global diagnostics.
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub span: Option<TextSpan>,
    /// The resolved message text.
    pub message_text: String,
    /// The checker's diagnostic code (e.g. 2322).
    pub code: u32,
    /// The category.
    pub category: DiagnosticCategory,
    /// The phase that produced this diagnostic.
    #[serde(default)]
    pub source: DiagnosticSource,
}

impl Diagnostic {
    /// A global diagnostic from a template.
    pub fn new(message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            file: None,
            span: None,
            message_text: message.format(args),
            code: message.code,
            category: message.category,
            source: DiagnosticSource::Global,
        }
    }

    /// A semantic error at `span` of `file`.
    pub fn with_location(
        file: impl Into<String>,
        span: TextSpan,
        code: u32,
        message_text: impl Into<String>,
    ) -> Self {
        Self {
            file: Some(file.into()),
            span: Some(span),
            message_text: message_text.into(),
            code,
            category: DiagnosticCategory::Error,
            source: DiagnosticSource::Semantic,
        }
    }

    /// Set the phase that produced this diagnostic.
    pub fn with_source(mut self, source: DiagnosticSource) -> Self {
        self.source = source;
        self
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }

    /// Start offset, or 0 for diagnostics without a span.
    pub fn start(&self) -> u32 {
        self.span.map(|s| s.start).unwrap_or(0)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref file) = self.file {
            write!(f, "{}", file)?;
            if let Some(span) = self.span {
                write!(f, "({})", span.start)?;
            }
            write!(f, ": ")?;
        }
        write!(
            f,
            "{} TS{}: {}",
            self.category, self.code, self.message_text
        )
    }
}

/// Substitute `args` into the numbered placeholders of `template`.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// Order by file, then start offset. Global diagnostics sort first.
pub fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by(|a, b| {
        let file_cmp = a.file.cmp(&b.file);
        if file_cmp != std::cmp::Ordering::Equal {
            return file_cmp;
        }
        a.start().cmp(&b.start())
    });
}

// ============================================================================
// Assertion failure messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, Error, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Error, message: $msg }
        };
        ($code:expr, Message, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Message, message: $msg }
        };
    }

    // ========================================================================
    // Assertion violations (9000-9099)
    // ========================================================================
    pub const EXPECTED_TYPE_TO_BE_0_GOT_1: DiagnosticMessage = diag!(9001, Error, "Expected type to be:\n  {0}\ngot:\n  {1}");
    pub const CAN_NOT_MATCH_A_NODE_TO_THIS_ASSERTION: DiagnosticMessage = diag!(9002, Error, "Can not match a node to this assertion.");
    pub const THIS_LINE_HAS_2_0_ASSERTIONS: DiagnosticMessage = diag!(9003, Error, "This line has 2 {0} assertions.");
    pub const EXPECTED_AN_ERROR_ON_THIS_LINE_BUT_FOUND_NONE: DiagnosticMessage = diag!(9004, Error, "Expected an error on this line, but found none.");
    pub const TYPESCRIPT_0_COMPILE_ERROR_1: DiagnosticMessage = diag!(9005, Error, "TypeScript@{0} compile error: {1}");

    // ========================================================================
    // Version boundary annotations (9100-9199)
    // ========================================================================
    pub const FAILS_AT_NEWEST_VERSION_0: DiagnosticMessage = diag!(9101, Message, "Fails at newest version TypeScript@{0}.");
    pub const COMPILES_IN_0_BUT_NOT_IN_1: DiagnosticMessage = diag!(9102, Message, "Compiles in TypeScript@{0} but not in TypeScript@{1}. Consider raising the minimum declared version, or fix for {1}.");
}
