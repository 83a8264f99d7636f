//! tsexpect_scanner: Comment scanning and assertion extraction.
//!
//! The scanner walks TypeScript source text just far enough to tell real
//! comments apart from `//` sequences inside strings, templates and regular
//! expressions. The extractor turns `$ExpectType` / `$ExpectError` comments
//! into an [`AssertionSet`] keyed by the line each assertion is about.

mod assertions;
mod char_codes;
mod scanner;
mod token;

pub use assertions::{
    extract_assertions, has_assertion_markers, AssertionKind, AssertionSet, DuplicateAssertion,
};
pub use scanner::CommentScanner;
pub use token::{CommentKind, CommentToken};
