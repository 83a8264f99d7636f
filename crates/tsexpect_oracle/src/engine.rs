//! The raw checker engine interface.

use crate::error::OracleResult;
use tsexpect_ast::{NodeId, SyntaxTree};
use tsexpect_diagnostics::Diagnostic;

bitflags::bitflags! {
    /// Flags controlling how a type is rendered to text.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TypeFormatFlags: u32 {
        const NONE = 0;
        /// Render the full type instead of eliding long members with `...`.
        const NO_TRUNCATION = 1 << 0;
        const WRITE_ARRAY_AS_GENERIC_TYPE = 1 << 1;
        const USE_FULLY_QUALIFIED_TYPE = 1 << 2;
        const WRITE_TYPE_ARGUMENTS_OF_SIGNATURE = 1 << 3;
        const USE_ALIAS_DEFINED_OUTSIDE_CURRENT_SCOPE = 1 << 4;
    }
}

/// Checker types longer than this are elided unless `NO_TRUNCATION` is set.
pub const DEFAULT_MAXIMUM_TRUNCATION_LENGTH: usize = 160;

/// A type-checking engine bound to one checker version and one program.
///
/// Engines are created by a [`crate::CheckerFactory`] and only used through
/// an [`crate::OracleAdapter`].
pub trait CheckerEngine: Send + Sync {
    /// The syntax tree of a program file.
    fn syntax_tree(&self, file: &str) -> OracleResult<&SyntaxTree>;

    /// Every diagnostic reported for a file, of every phase, in any order.
    fn diagnostics(&self, file: &str) -> OracleResult<Vec<Diagnostic>>;

    /// The checker's rendering of the type of a node.
    fn type_to_string(
        &self,
        file: &str,
        node: NodeId,
        flags: TypeFormatFlags,
    ) -> OracleResult<String>;
}
