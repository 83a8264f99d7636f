//! The oracle capability interface and its engine adapter.

use crate::engine::{CheckerEngine, TypeFormatFlags};
use crate::error::OracleResult;
use crate::version::TsVersion;
use tsexpect_ast::{NodeId, SyntaxTree};
use tsexpect_diagnostics::{sort_diagnostics, Diagnostic};

/// What the matcher needs from a checker version.
pub trait TypeOracle {
    /// The version answering the queries.
    fn version(&self) -> &TsVersion;

    /// The syntax tree of a file.
    fn syntax_tree(&self, file: &str) -> OracleResult<&SyntaxTree>;

    /// Pre-emit diagnostics of a file, ordered by position.
    fn diagnostics(&self, file: &str) -> OracleResult<Vec<Diagnostic>>;

    /// The untruncated rendering of a node's type.
    fn type_of_node(&self, file: &str, node: NodeId) -> OracleResult<String>;
}

/// A [`TypeOracle`] backed by a [`CheckerEngine`].
pub struct OracleAdapter {
    version: TsVersion,
    engine: Box<dyn CheckerEngine>,
}

impl OracleAdapter {
    pub fn new(version: TsVersion, engine: Box<dyn CheckerEngine>) -> Self {
        Self { version, engine }
    }
}

impl TypeOracle for OracleAdapter {
    fn version(&self) -> &TsVersion {
        &self.version
    }

    fn syntax_tree(&self, file: &str) -> OracleResult<&SyntaxTree> {
        self.engine.syntax_tree(file)
    }

    fn diagnostics(&self, file: &str) -> OracleResult<Vec<Diagnostic>> {
        let mut diagnostics = self.engine.diagnostics(file)?;
        let total = diagnostics.len();
        diagnostics.retain(|d| d.source.is_pre_emit());
        sort_diagnostics(&mut diagnostics);
        tracing::debug!(
            version = %self.version,
            file,
            kept = diagnostics.len(),
            dropped = total - diagnostics.len(),
            "collected diagnostics"
        );
        Ok(diagnostics)
    }

    fn type_of_node(&self, file: &str, node: NodeId) -> OracleResult<String> {
        self.engine
            .type_to_string(file, node, TypeFormatFlags::NO_TRUNCATION)
    }
}

impl std::fmt::Debug for OracleAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleAdapter")
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}
