use assert_matches::assert_matches;
use box_compiler::config::RuntimeConfig;
use box_compiler::pipeline::{self, PipelineError};
use box_compiler::tokens::{decode_dump, DumpReader, TokenKind};
use box_compiler::{batch, SyntaxError};
use std::fs;
use std::io::BufReader;
use tempfile::tempdir;

fn config_with_dump() -> RuntimeConfig {
    let mut config = RuntimeConfig::default();
    config.lexical.write_token_dump = true;
    config
}

#[test]
fn accepted_tokens_are_reported_in_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("main.box");
    fs::write(&path, "package foo bar\n").unwrap();

    let mut lines = Vec::new();
    let result = pipeline::process_file_with_observer(&path, &RuntimeConfig::default(), &mut |t| {
        lines.push(t.classification_line())
    })
    .unwrap();

    assert_eq!(result.declarations, 1);
    assert_eq!(
        lines,
        vec![
            "Line: 1, Offset: 1, Type: Keyword, Value: package",
            "Line: 1, Offset: 9, Type: Identifier, Value: foo",
            "Line: 1, Offset: 13, Type: Identifier, Value: bar",
        ]
    );
}

#[test]
fn dump_records_match_scanned_tokens() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("shapes.box");
    fs::write(&path, "package geo shapes\npackage geo lines\n").unwrap();

    let result = pipeline::process_file_with_config(&path, &config_with_dump()).unwrap();
    assert_eq!(result.declarations, 2);

    let dump_path = result.dump_path.unwrap();
    assert_eq!(dump_path, dir.path().canonicalize().unwrap().join("shapes.bo"));

    let records = decode_dump(&fs::read_to_string(&dump_path).unwrap()).unwrap();
    let summary: Vec<_> = records
        .iter()
        .map(|r| (r.kind, r.index, r.value.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (TokenKind::Keyword, 0, "package"),
            (TokenKind::Identifier, 8, "geo"),
            (TokenKind::Identifier, 12, "shapes"),
            (TokenKind::Keyword, 19, "package"),
            (TokenKind::Identifier, 27, "geo"),
            (TokenKind::Identifier, 31, "lines"),
        ]
    );

    let streamed = DumpReader::new(BufReader::new(fs::File::open(&dump_path).unwrap()))
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(streamed, records);
}

#[test]
fn incomplete_declaration_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("short.box");
    fs::write(&path, "package foo").unwrap();

    let error = pipeline::process_file_with_config(&path, &RuntimeConfig::default()).unwrap_err();
    assert_matches!(
        error,
        PipelineError::SyntaxValidation(SyntaxError::IncompleteDeclaration { matched: 1, .. })
    );
}

#[test]
fn wrong_leading_word_fails_at_first_column() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("import.box");
    fs::write(&path, "import foo bar").unwrap();

    let error = pipeline::process_file_with_config(&path, &RuntimeConfig::default()).unwrap_err();
    assert_matches!(
        error,
        PipelineError::SyntaxValidation(SyntaxError::KindMismatch {
            expected_kind: TokenKind::Keyword,
            expected_value: Some("package"),
            found_kind: TokenKind::Identifier,
            ..
        })
    );
    let position = error.position().unwrap();
    assert_eq!((position.line, position.column), (1, 1));
}

#[test]
fn batch_processes_every_file() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("one.box"), "package a b").unwrap();
    fs::write(dir.path().join("two.box"), "package c d\npackage e f").unwrap();
    fs::write(dir.path().join("three.box"), "package ; g").unwrap();

    let config = batch::BatchConfig {
        max_threads: 2,
        ..batch::BatchConfig::default()
    };
    let results = batch::process_directory_with_config(dir.path(), &config).unwrap();

    assert_eq!(results.files_discovered, 3);
    assert_eq!(results.success_count(), 2);
    assert_eq!(results.failure_count(), 1);
    assert_eq!(results.total_declarations(), 3);
    assert!(results.failed_files[0].0.ends_with("three.box"));
}
