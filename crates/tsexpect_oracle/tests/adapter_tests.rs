//! Oracle adapter and recorded engine tests.

use std::sync::{Arc, Mutex};
use tsexpect_ast::{NodeId, SyntaxTree, TreeBuilder};
use tsexpect_core::TextSpan;
use tsexpect_diagnostics::{Diagnostic, DiagnosticSource};
use tsexpect_oracle::{
    CheckerEngine, EnvironmentCache, OracleAdapter, OracleError, OracleResult, Program,
    SnapshotInstaller, TsVersion, TypeFormatFlags, TypeOracle,
};

/// An engine that records the flags it was asked to render with.
struct FakeEngine {
    tree: SyntaxTree,
    diagnostics: Vec<Diagnostic>,
    seen_flags: Arc<Mutex<Vec<TypeFormatFlags>>>,
}

impl CheckerEngine for FakeEngine {
    fn syntax_tree(&self, _file: &str) -> OracleResult<&SyntaxTree> {
        Ok(&self.tree)
    }

    fn diagnostics(&self, _file: &str) -> OracleResult<Vec<Diagnostic>> {
        Ok(self.diagnostics.clone())
    }

    fn type_to_string(
        &self,
        _file: &str,
        _node: NodeId,
        flags: TypeFormatFlags,
    ) -> OracleResult<String> {
        self.seen_flags.lock().unwrap().push(flags);
        Ok("string".to_string())
    }
}

fn fake_adapter(diagnostics: Vec<Diagnostic>) -> (OracleAdapter, Arc<Mutex<Vec<TypeFormatFlags>>>) {
    let seen_flags = Arc::new(Mutex::new(Vec::new()));
    let engine = FakeEngine {
        tree: TreeBuilder::new("a.ts", TextSpan::new(0, 10)).finish(),
        diagnostics,
        seen_flags: seen_flags.clone(),
    };
    (OracleAdapter::new(TsVersion::release(5, 0), Box::new(engine)), seen_flags)
}

#[test]
fn test_adapter_drops_emit_diagnostics_and_sorts() {
    let (adapter, _) = fake_adapter(vec![
        Diagnostic::with_location("a.ts", TextSpan::new(8, 1), 2322, "late"),
        Diagnostic::with_location("a.ts", TextSpan::new(0, 1), 4025, "declaration emit")
            .with_source(DiagnosticSource::Emit),
        Diagnostic::with_location("a.ts", TextSpan::new(2, 1), 1005, "syntax")
            .with_source(DiagnosticSource::Syntactic),
    ]);
    let diagnostics = adapter.diagnostics("a.ts").unwrap();
    let texts: Vec<_> = diagnostics.iter().map(|d| d.message_text.as_str()).collect();
    assert_eq!(texts, vec!["syntax", "late"]);
}

#[test]
fn test_adapter_always_requests_untruncated_types() {
    let (adapter, seen_flags) = fake_adapter(vec![]);
    assert_eq!(adapter.type_of_node("a.ts", NodeId::ROOT).unwrap(), "string");
    assert_eq!(adapter.version(), &TsVersion::release(5, 0));
    assert_eq!(*seen_flags.lock().unwrap(), vec![TypeFormatFlags::NO_TRUNCATION]);
}

#[test]
fn test_recorded_types_are_not_truncated_through_adapter() {
    let members: Vec<_> = (0..40).map(|i| format!("p{}: number;", i)).collect();
    let long_type = format!("{{ {} }}", members.join(" "));
    let json = serde_json::json!({
        "files": {
            "a.ts": {
                "tree": { "kind": "SourceFile", "start": 0, "end": 2, "children": [
                    { "kind": "Identifier", "start": 0, "end": 1, "type": long_type.clone() }
                ] }
            }
        }
    });
    let dir = std::env::temp_dir().join(format!("tsexpect-adapter-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("4.9.json"), json.to_string()).unwrap();

    let cache = EnvironmentCache::new(SnapshotInstaller::new(&dir));
    let env = cache.get(&TsVersion::release(4, 9)).unwrap();
    let program = Program::default().with_source("a.ts", "x;");
    let oracle = env.oracle(&program).unwrap();
    let tree = oracle.syntax_tree("a.ts").unwrap();
    let ident = tree.children(tree.root())[0];
    assert_eq!(oracle.type_of_node("a.ts", ident).unwrap(), long_type);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_snapshot_installer_reports_missing_version() {
    let dir = std::env::temp_dir().join("tsexpect-no-snapshots-here");
    let cache = EnvironmentCache::new(SnapshotInstaller::new(&dir));
    let err = cache.get(&TsVersion::Next).unwrap_err();
    assert_eq!(err.version, "next");
    assert!(err.message.contains("no recorded snapshot"));
}

#[test]
fn test_program_file_missing_from_snapshot() {
    let dir = std::env::temp_dir().join(format!("tsexpect-missing-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("5.0.json"),
        r#"{ "files": { "a.ts": { "tree": { "kind": "SourceFile", "start": 0, "end": 0 } } } }"#,
    )
    .unwrap();
    let cache = EnvironmentCache::new(SnapshotInstaller::new(&dir));
    let env = cache.get(&TsVersion::release(5, 0)).unwrap();
    let program = Program::default().with_source("b.ts", "");
    match env.oracle(&program) {
        Err(OracleError::UnknownFile { file }) => assert_eq!(file, "b.ts"),
        other => panic!("expected unknown file, got {:?}", other.map(|_| ())),
    }
    std::fs::remove_dir_all(&dir).ok();
}
