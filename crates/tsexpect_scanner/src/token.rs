//! Comment tokens produced by the scanner.

use tsexpect_core::text::TextSpan;

/// The two comment forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    /// `// ...` up to (not including) the line break.
    SingleLine,
    /// `/* ... */`, possibly spanning lines.
    MultiLine,
}

/// A comment found in source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentToken {
    pub kind: CommentKind,
    /// Span of the whole comment including its delimiters.
    pub span: TextSpan,
    /// Whether only whitespace precedes the comment on its physical line.
    pub first_on_line: bool,
}

impl CommentToken {
    /// The comment text without its delimiters.
    pub fn body<'t>(&self, text: &'t str) -> &'t str {
        let range = self.span.to_range();
        match self.kind {
            CommentKind::SingleLine => &text[range.start + 2..range.end],
            CommentKind::MultiLine => {
                let inner = &text[range.start + 2..range.end];
                inner.strip_suffix("*/").unwrap_or(inner)
            }
        }
    }
}
