//! Engines that replay checker results captured as JSON.
//!
//! A snapshot records, per file, the node tree with the rendered type of
//! each node of interest, plus every diagnostic the checker reported:
//!
//! ```json
//! {
//!   "version": "5.0",
//!   "files": {
//!     "index.ts": {
//!       "tree": { "kind": "SourceFile", "start": 0, "end": 3, "children": [
//!         { "kind": "ExpressionStatement", "start": 0, "end": 2, "children": [
//!           { "kind": "Identifier", "start": 0, "end": 1, "type": "number" }
//!         ] }
//!       ] },
//!       "diagnostics": []
//!     }
//!   }
//! }
//! ```

use crate::cache::{CheckerFactory, Installer};
use crate::engine::{CheckerEngine, TypeFormatFlags, DEFAULT_MAXIMUM_TRUNCATION_LENGTH};
use crate::error::{InstallationError, OracleError, OracleResult};
use crate::program::Program;
use crate::version::TsVersion;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tsexpect_ast::{NodeId, SyntaxKind, SyntaxTree, TreeBuilder};
use tsexpect_core::TextSpan;
use tsexpect_diagnostics::Diagnostic;

#[derive(Deserialize)]
struct SnapshotDocument {
    #[serde(default)]
    version: Option<String>,
    files: BTreeMap<String, SnapshotFile>,
}

#[derive(Deserialize)]
struct SnapshotFile {
    tree: RecordedNode,
    #[serde(default)]
    diagnostics: Vec<Diagnostic>,
}

#[derive(Deserialize)]
struct RecordedNode {
    kind: SyntaxKind,
    start: u32,
    end: u32,
    #[serde(default, rename = "type")]
    type_text: Option<String>,
    #[serde(default)]
    children: Vec<RecordedNode>,
}

/// One file of a snapshot.
#[derive(Debug)]
struct RecordedFile {
    tree: SyntaxTree,
    types: FxHashMap<NodeId, String>,
    diagnostics: Vec<Diagnostic>,
}

/// Checker results for a set of files, as captured from one checker version.
#[derive(Debug, Default)]
pub struct RecordedSnapshot {
    version: Option<String>,
    files: FxHashMap<String, RecordedFile>,
}

impl RecordedSnapshot {
    pub fn from_json(json: &str) -> OracleResult<Self> {
        let document: SnapshotDocument = serde_json::from_str(json)?;
        let mut files = FxHashMap::default();
        for (file_name, file) in document.files {
            let recorded = build_file(&file_name, file)?;
            files.insert(file_name, recorded);
        }
        Ok(Self {
            version: document.version,
            files,
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> OracleResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| OracleError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// The version the snapshot says it was captured with, if recorded.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn contains_file(&self, file: &str) -> bool {
        self.files.contains_key(file)
    }

    fn file(&self, file: &str) -> OracleResult<&RecordedFile> {
        self.files.get(file).ok_or_else(|| OracleError::UnknownFile {
            file: file.to_string(),
        })
    }
}

fn build_file(file_name: &str, file: SnapshotFile) -> OracleResult<RecordedFile> {
    let root = file.tree;
    if root.kind != SyntaxKind::SourceFile {
        return Err(OracleError::Engine {
            message: format!("snapshot tree for {} must start at a SourceFile node", file_name),
        });
    }
    let mut builder = TreeBuilder::new(file_name, span_of(file_name, &root)?);
    let mut types = FxHashMap::default();
    if let Some(text) = root.type_text {
        types.insert(NodeId::ROOT, text);
    }
    for child in root.children {
        add_node(file_name, &mut builder, &mut types, child)?;
    }
    Ok(RecordedFile {
        tree: builder.finish(),
        types,
        diagnostics: file.diagnostics,
    })
}

fn add_node(
    file_name: &str,
    builder: &mut TreeBuilder,
    types: &mut FxHashMap<NodeId, String>,
    node: RecordedNode,
) -> OracleResult<()> {
    let span = span_of(file_name, &node)?;
    let id = if node.children.is_empty() {
        builder.leaf(node.kind, span)
    } else {
        let id = builder.start_node(node.kind, span);
        for child in node.children {
            add_node(file_name, builder, types, child)?;
        }
        builder.finish_node();
        id
    };
    if let Some(text) = node.type_text {
        types.insert(id, text);
    }
    Ok(())
}

fn span_of(file_name: &str, node: &RecordedNode) -> OracleResult<TextSpan> {
    if node.end < node.start {
        return Err(OracleError::Engine {
            message: format!(
                "{:?} node in {} ends at {} before it starts at {}",
                node.kind, file_name, node.end, node.start
            ),
        });
    }
    Ok(TextSpan::from_bounds(node.start, node.end))
}

/// Elide a rendered type the way a checker does without `NO_TRUNCATION`.
fn truncate_type(text: &str) -> String {
    if text.len() <= DEFAULT_MAXIMUM_TRUNCATION_LENGTH {
        return text.to_string();
    }
    let mut cut = DEFAULT_MAXIMUM_TRUNCATION_LENGTH - 3;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &text[..cut])
}

/// A [`CheckerEngine`] answering from a [`RecordedSnapshot`].
#[derive(Debug, Clone)]
pub struct RecordedEngine {
    snapshot: Arc<RecordedSnapshot>,
}

impl RecordedEngine {
    pub fn new(snapshot: Arc<RecordedSnapshot>) -> Self {
        Self { snapshot }
    }
}

impl CheckerEngine for RecordedEngine {
    fn syntax_tree(&self, file: &str) -> OracleResult<&SyntaxTree> {
        Ok(&self.snapshot.file(file)?.tree)
    }

    fn diagnostics(&self, file: &str) -> OracleResult<Vec<Diagnostic>> {
        Ok(self.snapshot.file(file)?.diagnostics.clone())
    }

    fn type_to_string(
        &self,
        file: &str,
        node: NodeId,
        flags: TypeFormatFlags,
    ) -> OracleResult<String> {
        let recorded = self.snapshot.file(file)?;
        if recorded.tree.get(node).is_none() {
            return Err(OracleError::UnknownNode {
                file: file.to_string(),
                node,
            });
        }
        let text = recorded.types.get(&node).ok_or_else(|| OracleError::Engine {
            message: format!("no type recorded for node {} in {}", node, file),
        })?;
        if flags.contains(TypeFormatFlags::NO_TRUNCATION) {
            Ok(text.clone())
        } else {
            Ok(truncate_type(text))
        }
    }
}

/// Builds [`RecordedEngine`]s over one shared snapshot.
#[derive(Debug, Clone)]
pub struct RecordedFactory {
    snapshot: Arc<RecordedSnapshot>,
}

impl RecordedFactory {
    pub fn new(snapshot: RecordedSnapshot) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
        }
    }
}

impl CheckerFactory for RecordedFactory {
    fn create(&self, program: &Program) -> OracleResult<Box<dyn CheckerEngine>> {
        if let Some(missing) = program
            .files()
            .iter()
            .find(|f| !self.snapshot.contains_file(&f.file_name))
        {
            return Err(OracleError::UnknownFile {
                file: missing.file_name.clone(),
            });
        }
        Ok(Box::new(RecordedEngine::new(Arc::clone(&self.snapshot))))
    }
}

/// An [`Installer`] that serves versions from `<dir>/<version>.json`.
///
/// Snapshots cannot be fetched, so a version without a snapshot file fails
/// to install.
#[derive(Debug, Clone)]
pub struct SnapshotInstaller {
    dir: PathBuf,
}

impl SnapshotInstaller {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn snapshot_path(&self, version: &TsVersion) -> PathBuf {
        self.dir.join(format!("{}.json", version))
    }
}

impl Installer for SnapshotInstaller {
    fn is_installed(&self, version: &TsVersion) -> bool {
        self.snapshot_path(version).is_file()
    }

    fn install(&self, version: &TsVersion) -> Result<(), InstallationError> {
        Err(InstallationError::new(
            version,
            format!("no recorded snapshot at {}", self.snapshot_path(version).display()),
        ))
    }

    fn load(&self, version: &TsVersion) -> Result<Arc<dyn CheckerFactory>, InstallationError> {
        let snapshot = RecordedSnapshot::from_file(self.snapshot_path(version))
            .map_err(|e| InstallationError::new(version, e.to_string()))?;
        Ok(Arc::new(RecordedFactory::new(snapshot)))
    }
}
