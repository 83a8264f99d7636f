//! Run options parsing tests.

use tsexpect_options::{
    parse_run_options, parse_run_options_file, ConfigError, ModuleKind, RunOptions, ScriptTarget,
};

#[test]
fn test_empty_object_uses_defaults() {
    let options = parse_run_options("{}").unwrap();
    assert_eq!(options, RunOptions::default());
    assert!(options.versions.is_empty());
    assert!(!options.include_next);
    assert!(options.max_version.is_none());
}

#[test]
fn test_full_options() {
    let options = parse_run_options(
        r#"{
            "versions": ["4.0", "4.5", "5.0"],
            "includeNext": true,
            "maxVersion": "4.5",
            "compilerOptions": {
                "strict": true,
                "target": "es2015",
                "module": "commonjs",
                "lib": ["es6", "dom"],
                "noEmit": true,
                "types": []
            }
        }"#,
    )
    .unwrap();
    assert_eq!(options.versions, vec!["4.0", "4.5", "5.0"]);
    assert!(options.include_next);
    assert!(!options.only_test_next);
    assert_eq!(options.max_version.as_deref(), Some("4.5"));
    let co = &options.compiler_options;
    assert_eq!(co.strict, Some(true));
    assert_eq!(co.target, Some(ScriptTarget::ES2015));
    assert_eq!(co.module, Some(ModuleKind::CommonJS));
    assert_eq!(co.lib.as_deref(), Some(&["es6".to_string(), "dom".to_string()][..]));
    assert_eq!(co.types.as_deref(), Some(&[][..]));
}

#[test]
fn test_unknown_compiler_options_are_preserved() {
    let options = parse_run_options(
        r#"{ "compilerOptions": { "noUncheckedIndexedAccess": true, "strict": false } }"#,
    )
    .unwrap();
    let co = &options.compiler_options;
    assert_eq!(co.strict, Some(false));
    assert_eq!(
        co.extra.get("noUncheckedIndexedAccess"),
        Some(&serde_json::Value::Bool(true))
    );
}

#[test]
fn test_invalid_json_is_config_error() {
    let err = parse_run_options(r#"{ "versions": "4.0" }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Json(_)));
    assert!(err.to_string().starts_with("invalid configuration"));
}

#[test]
fn test_missing_file_is_io_error() {
    let err = parse_run_options_file("/definitely/not/here/tsexpect.json").unwrap_err();
    match err {
        ConfigError::Io { path, .. } => assert!(path.ends_with("tsexpect.json")),
        other => panic!("expected io error, got {:?}", other),
    }
}
