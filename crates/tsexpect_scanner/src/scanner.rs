//! The comment scanner.
//!
//! A reduced form of TypeScript's scanner: it never produces tokens for code,
//! it only skips over them precisely enough to find comments. String literals,
//! template literals (with nested `${}` substitutions) and regular expression
//! literals are consumed whole so that a `//` inside them is not taken for a
//! comment. Positions are byte offsets into the source text.

use crate::char_codes::*;
use crate::token::{CommentKind, CommentToken};
use tsexpect_core::text::TextSpan;

/// Iterates over the comments of a source text in source order.
pub struct CommentScanner<'a> {
    /// The source text being scanned.
    text: &'a str,
    /// Current byte position in the text.
    pos: usize,
    /// Whether anything other than whitespace has been seen on the current line.
    line_has_content: bool,
    /// Whether a `/` at the current position would start a regular expression.
    regex_allowed: bool,
    /// Current `{` nesting depth.
    brace_depth: u32,
    /// Brace depths at which an open template substitution resumes its template.
    template_depths: Vec<u32>,
}

impl<'a> CommentScanner<'a> {
    /// Create a new scanner for the given source text.
    pub fn new(text: &'a str) -> Self {
        let mut scanner = Self {
            text,
            pos: 0,
            line_has_content: false,
            regex_allowed: true,
            brace_depth: 0,
            template_depths: Vec::new(),
        };
        scanner.skip_shebang();
        scanner
    }

    // ========================================================================
    // Core scanning
    // ========================================================================

    #[inline]
    fn byte_at(&self, offset: usize) -> Option<u8> {
        self.text.as_bytes().get(self.pos + offset).copied()
    }

    #[inline]
    fn current_char(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    #[inline]
    fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// Skip a shebang line at the very beginning of the file.
    fn skip_shebang(&mut self) {
        if self.text.starts_with("#!") {
            self.pos = 2;
            self.skip_to_line_break();
            self.line_has_content = true;
        }
    }

    /// Advance to the next line break (or end of text) without consuming it.
    fn skip_to_line_break(&mut self) {
        while let Some(ch) = self.current_char() {
            if is_line_break(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
    }

    fn scan_single_line_comment(&mut self) -> CommentToken {
        let start = self.pos;
        self.pos += 2;
        self.skip_to_line_break();
        self.comment(CommentKind::SingleLine, start)
    }

    fn scan_multi_line_comment(&mut self) -> CommentToken {
        let start = self.pos;
        self.pos += 2;
        match self.text[self.pos..].find("*/") {
            Some(offset) => self.pos += offset + 2,
            None => self.pos = self.text.len(),
        }
        self.comment(CommentKind::MultiLine, start)
    }

    fn comment(&mut self, kind: CommentKind, start: usize) -> CommentToken {
        let token = CommentToken {
            kind,
            span: TextSpan::from_bounds(start as u32, self.pos as u32),
            first_on_line: !self.line_has_content,
        };
        self.line_has_content = true;
        token
    }

    /// Skip a quoted string literal. An unescaped line break ends it unterminated.
    fn skip_string_literal(&mut self, quote: u8) {
        self.pos += 1; // skip opening quote
        while let Some(ch) = self.current_char() {
            if ch as u32 == quote as u32 {
                self.pos += 1;
                return;
            }
            if ch == '\\' {
                self.pos += 1;
                if let Some(escaped) = self.current_char() {
                    self.pos += escaped.len_utf8();
                    // Line continuation: `\` CR LF
                    if escaped == '\r' && self.byte_at(0) == Some(b'\n') {
                        self.pos += 1;
                    }
                }
                continue;
            }
            if is_line_break(ch) {
                return;
            }
            self.pos += ch.len_utf8();
        }
    }

    /// Skip template text up to and including the closing backtick, or up to
    /// and including a `${` that opens a substitution.
    fn skip_template_chunk(&mut self) {
        while let Some(ch) = self.current_char() {
            match ch {
                '`' => {
                    self.pos += 1;
                    self.regex_allowed = false;
                    return;
                }
                '$' if self.byte_at(1) == Some(b'{') => {
                    self.pos += 2;
                    self.brace_depth += 1;
                    self.template_depths.push(self.brace_depth);
                    self.regex_allowed = true;
                    return;
                }
                '\\' => {
                    self.pos += 1;
                    if let Some(escaped) = self.current_char() {
                        self.pos += escaped.len_utf8();
                    }
                }
                _ => self.pos += ch.len_utf8(),
            }
        }
    }

    /// Skip a regular expression literal including its flags.
    fn skip_regex_literal(&mut self) {
        self.pos += 1; // skip opening slash
        let mut in_class = false;
        while let Some(ch) = self.current_char() {
            if is_line_break(ch) {
                return;
            }
            self.pos += ch.len_utf8();
            match ch {
                '\\' => {
                    if let Some(escaped) = self.current_char() {
                        if is_line_break(escaped) {
                            return;
                        }
                        self.pos += escaped.len_utf8();
                    }
                }
                '[' => in_class = true,
                ']' => in_class = false,
                '/' if !in_class => break,
                _ => {}
            }
        }
        self.skip_word();
    }

    /// Skip identifier or number characters, returning the skipped text.
    fn skip_word(&mut self) -> &'a str {
        let text = self.text;
        let start = self.pos;
        while let Some(ch) = self.current_char() {
            if !is_word_part(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
        &text[start..self.pos]
    }

    fn close_brace(&mut self) {
        self.pos += 1;
        if self.template_depths.last() == Some(&self.brace_depth) {
            self.template_depths.pop();
            self.brace_depth -= 1;
            self.skip_template_chunk();
        } else {
            self.brace_depth = self.brace_depth.saturating_sub(1);
            self.regex_allowed = false;
        }
    }
}

impl Iterator for CommentScanner<'_> {
    type Item = CommentToken;

    fn next(&mut self) -> Option<CommentToken> {
        loop {
            if self.is_eof() {
                return None;
            }
            let ch = self.current_char()?;
            if is_line_break(ch) {
                self.pos += ch.len_utf8();
                self.line_has_content = false;
                continue;
            }
            if is_white_space_single_line(ch) {
                self.pos += ch.len_utf8();
                continue;
            }

            match ch {
                '/' => match self.byte_at(1) {
                    Some(b'/') => return Some(self.scan_single_line_comment()),
                    Some(b'*') => return Some(self.scan_multi_line_comment()),
                    _ if self.regex_allowed => {
                        self.skip_regex_literal();
                        self.regex_allowed = false;
                    }
                    _ => {
                        self.pos += 1;
                        self.regex_allowed = true;
                    }
                },
                '\'' | '"' => {
                    self.skip_string_literal(ch as u8);
                    self.regex_allowed = false;
                }
                '`' => {
                    self.pos += 1;
                    self.skip_template_chunk();
                }
                '{' => {
                    self.pos += 1;
                    self.brace_depth += 1;
                    self.regex_allowed = true;
                }
                '}' => self.close_brace(),
                ')' | ']' => {
                    self.pos += 1;
                    self.regex_allowed = false;
                }
                // Postfix `!`, `++` and `--` keep the expression open.
                '!' if self.byte_at(1) != Some(b'=') => self.pos += 1,
                '+' | '-' if self.byte_at(1) == Some(ch as u8) => self.pos += 2,
                c if is_word_part(c) => {
                    let word = self.skip_word();
                    self.regex_allowed = is_keyword_before_expression(word);
                }
                _ => {
                    self.pos += ch.len_utf8();
                    self.regex_allowed = true;
                }
            }
            self.line_has_content = true;
        }
    }
}
