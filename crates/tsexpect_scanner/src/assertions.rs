//! Assertion extraction.
//!
//! Two comment forms are recognised:
//!
//! ```text
//! // $ExpectType <rendered type>
//! // $ExpectError
//! ```
//!
//! A comment that is the first thing on its line asserts about the *next*
//! line; a trailing comment asserts about its own line.

use crate::scanner::CommentScanner;
use crate::token::{CommentKind, CommentToken};
use indexmap::{IndexMap, IndexSet};
use lazy_static::lazy_static;
use regex::Regex;
use rustc_hash::FxHashSet;
use std::fmt;
use tsexpect_core::text::{LineIndex, TextPos};

lazy_static! {
    static ref EXPECT_TYPE: Regex =
        Regex::new(r"^\s*\$ExpectType\s+(\S.*?)\s*$").expect("valid $ExpectType pattern");
    static ref EXPECT_ERROR: Regex =
        Regex::new(r"^\s*\$ExpectError\s*$").expect("valid $ExpectError pattern");
}

/// The marker every assertion comment contains.
const MARKER: &[u8] = b"$Expect";

/// Which of the two assertion forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssertionKind {
    Type,
    Error,
}

impl fmt::Display for AssertionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssertionKind::Type => write!(f, "$ExpectType"),
            AssertionKind::Error => write!(f, "$ExpectError"),
        }
    }
}

/// A line carrying two assertions of the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateAssertion {
    /// 0-based line the assertions apply to.
    pub line: u32,
    pub kind: AssertionKind,
}

/// The assertions of one source file, keyed by 0-based line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssertionSet {
    /// Expected rendered type per line, in source order.
    pub type_assertions: IndexMap<u32, String>,
    /// Lines on which at least one diagnostic is expected, in source order.
    pub error_lines: IndexSet<u32>,
    /// Lines invalidated by a second assertion of the same kind, in first-seen order.
    pub duplicates: Vec<DuplicateAssertion>,
}

impl AssertionSet {
    /// Whether the file contains no assertions at all.
    pub fn is_empty(&self) -> bool {
        self.type_assertions.is_empty() && self.error_lines.is_empty() && self.duplicates.is_empty()
    }

    /// Whether `line` carries a duplicate of either kind.
    pub fn is_duplicate_line(&self, line: u32) -> bool {
        self.duplicates.iter().any(|d| d.line == line)
    }

    /// The duplicate lines, in first-seen order.
    pub fn duplicate_lines(&self) -> impl Iterator<Item = u32> + '_ {
        self.duplicates.iter().map(|d| d.line)
    }
}

/// Whether the text contains an assertion marker anywhere.
///
/// Cheap pre-check: text without the marker cannot carry assertions.
pub fn has_assertion_markers(text: &str) -> bool {
    memchr::memmem::find(text.as_bytes(), MARKER).is_some()
}

/// Tracks the line of monotonically increasing offsets.
struct LineCursor<'i> {
    line_starts: &'i [TextPos],
    line: usize,
}

impl<'i> LineCursor<'i> {
    fn new(index: &'i LineIndex) -> Self {
        Self {
            line_starts: index.line_starts(),
            line: 0,
        }
    }

    /// The line an assertion comment at `comment` applies to.
    fn owning_line(&mut self, comment: &CommentToken) -> u32 {
        let pos = comment.span.start;
        while self
            .line_starts
            .get(self.line + 1)
            .is_some_and(|&start| start <= pos)
        {
            self.line += 1;
        }
        if comment.first_on_line {
            self.line as u32 + 1
        } else {
            self.line as u32
        }
    }
}

/// Builds an [`AssertionSet`] while enforcing the duplicate policy.
#[derive(Default)]
struct Collector {
    set: AssertionSet,
    invalid_type_lines: FxHashSet<u32>,
    invalid_error_lines: FxHashSet<u32>,
}

impl Collector {
    fn add_type(&mut self, line: u32, expected: &str) {
        if self.invalid_type_lines.contains(&line) {
            return;
        }
        if self.set.type_assertions.shift_remove(&line).is_some() {
            self.invalid_type_lines.insert(line);
            self.set.duplicates.push(DuplicateAssertion {
                line,
                kind: AssertionKind::Type,
            });
        } else {
            self.set.type_assertions.insert(line, expected.to_string());
        }
    }

    fn add_error(&mut self, line: u32) {
        if self.invalid_error_lines.contains(&line) {
            return;
        }
        if self.set.error_lines.shift_remove(&line) {
            self.invalid_error_lines.insert(line);
            self.set.duplicates.push(DuplicateAssertion {
                line,
                kind: AssertionKind::Error,
            });
        } else {
            self.set.error_lines.insert(line);
        }
    }
}

/// Extract the assertions of a source file.
///
/// Comments that match neither form are ignored.
pub fn extract_assertions(text: &str) -> AssertionSet {
    if !has_assertion_markers(text) {
        return AssertionSet::default();
    }

    let index = LineIndex::new(text);
    let mut cursor = LineCursor::new(&index);
    let mut collector = Collector::default();

    for comment in CommentScanner::new(text) {
        if comment.kind != CommentKind::SingleLine {
            continue;
        }
        let body = comment.body(text);
        if let Some(captures) = EXPECT_TYPE.captures(body) {
            let line = cursor.owning_line(&comment);
            collector.add_type(line, &captures[1]);
        } else if EXPECT_ERROR.is_match(body) {
            let line = cursor.owning_line(&comment);
            collector.add_error(line);
        }
    }

    let set = collector.set;
    tracing::trace!(
        types = set.type_assertions.len(),
        errors = set.error_lines.len(),
        duplicates = set.duplicates.len(),
        "extracted assertions"
    );
    set
}
