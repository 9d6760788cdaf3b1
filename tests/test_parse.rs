mod utils;

use mapline::{
    CodecError, DocumentError, EngineOptions, MappingEntry, Position, SourceMapEngine,
};
use serde_json::json;
use utils::*;

#[test]
fn test_parse_errors() {
    let err = SourceMapEngine::new(COMPILED_URL, MAP_URL, "").unwrap_err();
    assert_eq!(err.url, MAP_URL);
    assert!(matches!(err.error, DocumentError::InvalidJson(..)));

    let err = SourceMapEngine::new(COMPILED_URL, MAP_URL, "{\"version\":3,").unwrap_err();
    assert!(matches!(err.error, DocumentError::InvalidJson(..)));

    assert!(matches!(
        try_load(json!({"version": 3, "mappings": "AAAA"})).unwrap_err().error,
        DocumentError::MissingRequiredField("sources")
    ));
    assert!(matches!(
        try_load(json!({"version": 3, "sources": ["a.js"]})).unwrap_err().error,
        DocumentError::MissingRequiredField("mappings")
    ));
}

#[test]
fn test_error_mentions_url() {
    let err = try_load(json!({"version": 3, "sources": ["a.js"], "mappings": "AA"})).unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @r###"failed to load source map "https://example.com/dist/app.js.map": segment "AA" has 2 fields, expected 1, 4 or 5"###
    );
}

#[test]
fn test_single_entry() {
    let engine = load(json!({
        "version": 3,
        "sources": ["a.ts"],
        "names": ["foo"],
        "mappings": "AAAA"
    }));
    let mappings = engine.mappings();
    assert_eq!(mappings.len(), 1);
    let entry = &mappings[0];
    assert_eq!(entry.generated(), Position::new(0, 0));
    assert_eq!(entry.source_url(), Some(source_url("a.ts").as_str()));
    assert_eq!(entry.source_position(), Some(Position::new(0, 0)));
    assert_eq!(entry.name(), None);

    let engine = load(json!({
        "version": 3,
        "sources": ["a.ts"],
        "names": ["foo"],
        "mappings": "AAAAA"
    }));
    assert_eq!(engine.mappings()[0].name(), Some("foo"));
}

#[test]
fn test_two_lines() {
    let engine = load(json!({
        "version": 3,
        "sources": ["a.ts"],
        "mappings": "AAAA;AACA"
    }));
    let positions = engine
        .mappings()
        .iter()
        .map(|m| (m.generated(), m.source_position()))
        .collect::<Vec<_>>();
    assert_eq!(
        positions,
        vec![
            (Position::new(0, 0), Some(Position::new(0, 0))),
            (Position::new(1, 0), Some(Position::new(1, 0))),
        ]
    );

    // the source column total carries over the `;`
    let engine = load(json!({
        "version": 3,
        "sources": ["a.ts"],
        "mappings": "AAAC;AAAC"
    }));
    assert_eq!(
        engine.mappings()[1].source_position(),
        Some(Position::new(0, 2))
    );
}

#[test]
fn test_malformed_records() {
    for mappings in ["AA", "AAA", "AAAA,AACA,AAA", "AAAA;AA"] {
        let err = try_load(json!({"version": 3, "sources": ["a.ts"], "mappings": mappings}))
            .unwrap_err();
        assert!(
            matches!(
                err.error,
                DocumentError::Codec(CodecError::MalformedRecord { .. })
            ),
            "{mappings}: {err}"
        );
    }

    let err = try_load(json!({"version": 3, "sources": ["a.ts"], "mappings": "AAAg"})).unwrap_err();
    assert!(matches!(
        err.error,
        DocumentError::Codec(CodecError::Truncated { .. })
    ));

    let err = try_load(json!({"version": 3, "sources": ["a.ts"], "mappings": "AA.A"})).unwrap_err();
    assert!(matches!(
        err.error,
        DocumentError::Codec(CodecError::InvalidBase64 { byte: b'.', .. })
    ));

    let err = try_load(json!({"version": 3, "sources": ["a.ts"], "mappings": "ACAA"})).unwrap_err();
    assert!(matches!(err.error, DocumentError::UnknownSourceReference(1)));
}

#[test]
fn test_sorts_unordered_input() {
    // a negative column delta moves back within the line
    let engine = load(json!({
        "version": 3,
        "sources": ["a.ts"],
        "mappings": "KAAA,FAAC,DAAC"
    }));
    let columns = engine
        .mappings()
        .iter()
        .map(MappingEntry::generated_column)
        .collect::<Vec<_>>();
    assert_eq!(columns, vec![2, 3, 5]);
    // the first decoded record ends up last
    assert_eq!(engine.mappings()[2].source_column(), 0);
    assert_eq!(engine.mappings()[0].source_column(), 2);
}

#[test]
fn test_guard_prefix() {
    let text = format!(
        ")]}}'\n{}",
        json!({"version": 3, "sources": ["a.ts"], "mappings": "AAAA"})
    );
    let engine = SourceMapEngine::new(COMPILED_URL, MAP_URL, text).unwrap();
    assert_eq!(engine.mappings().len(), 1);
}

#[test]
fn test_version_not_gated() {
    let engine = load(json!({"version": 2, "sources": [], "mappings": ""}));
    assert!(engine.mappings().is_empty());
    let engine = load(json!({"sources": [], "mappings": ";;"}));
    assert!(engine.mappings().is_empty());
    assert!(!engine.maps_origin());
}

#[test]
fn test_sources() {
    let engine = load(json!({
        "version": 3,
        "file": "app.js",
        "sourceRoot": "src",
        "sources": ["a.ts", "/abs/b.ts", "webpack:///c.ts", "a.ts", null],
        "sourcesContent": ["let a = 1;", null],
        "mappings": ""
    }));
    assert_eq!(engine.file(), Some("app.js"));
    assert_eq!(engine.compiled_url(), COMPILED_URL);
    assert_eq!(engine.url(), MAP_URL);
    assert_eq!(
        engine.source_urls(),
        [
            "https://example.com/dist/src/a.ts",
            "https://example.com/dist/src/abs/b.ts",
            "webpack:///c.ts",
            "https://example.com/dist/src/",
        ]
    );
    assert_eq!(
        engine.embedded_content("https://example.com/dist/src/a.ts"),
        Some("let a = 1;")
    );
    assert_eq!(
        engine.embedded_content("https://example.com/dist/src/abs/b.ts"),
        None
    );
    assert_eq!(engine.embedded_content("https://example.com/nope.ts"), None);
}

#[test]
fn test_source_colliding_with_compiled_url() {
    let engine = load(json!({
        "version": 3,
        "sources": ["app.js", "other.js"],
        "sourcesContent": ["original", null],
        "mappings": "AAAA"
    }));
    let marked = format!("{COMPILED_URL}? [sm]");
    assert_eq!(engine.source_urls()[0], marked);
    assert_eq!(engine.embedded_content(&marked), Some("original"));
    assert_eq!(engine.mappings()[0].source_url(), Some(marked.as_str()));

    let engine = SourceMapEngine::with_options(
        COMPILED_URL,
        MAP_URL,
        json!({"version": 3, "sources": ["app.js"], "sourcesContent": ["x"], "mappings": ""})
            .to_string(),
        &EngineOptions::default().with_source_map_marker("#original"),
    )
    .unwrap();
    assert_eq!(engine.source_urls()[0], format!("{COMPILED_URL}#original"));
}

#[test]
fn test_data_url_resolves_against_compiled() {
    let engine = SourceMapEngine::new(
        COMPILED_URL,
        "data:application/json;base64,e30=",
        json!({"version": 3, "sources": ["../src/a.ts"], "mappings": "AAAA"}).to_string(),
    )
    .unwrap();
    assert_eq!(engine.source_urls(), ["https://example.com/src/a.ts"]);
}

#[test]
fn test_ignore_list() {
    let engine = load(json!({
        "version": 3,
        "sources": ["a.ts", "node_modules/b.js"],
        "ignoreList": [1, 7],
        "mappings": ""
    }));
    assert!(!engine.has_ignore_list_hint(&source_url("a.ts")));
    assert!(engine.has_ignore_list_hint(&source_url("node_modules/b.js")));
    assert!(!engine.has_ignore_list_hint("unknown"));

    let engine = load(json!({
        "version": 3,
        "sources": ["a.ts"],
        "x_google_ignoreList": [0],
        "mappings": ""
    }));
    assert!(engine.has_ignore_list_hint(&source_url("a.ts")));
    assert!(engine.source_info(&source_url("a.ts")).unwrap().is_ignored());
}

#[test]
fn test_mappings_limit() {
    let text = json!({"version": 3, "sources": ["a.ts"], "mappings": "AAAA,CAAC"}).to_string();

    let options = EngineOptions::default().with_mappings_limit(4);
    let err = SourceMapEngine::with_options(COMPILED_URL, MAP_URL, text.clone(), &options)
        .unwrap_err();
    assert!(matches!(
        err.error,
        DocumentError::MappingsTooLarge { len: 9, limit: 4 }
    ));

    let options = EngineOptions::default().with_mappings_limit(9);
    assert!(SourceMapEngine::with_options(COMPILED_URL, MAP_URL, text, &options).is_ok());
}

#[test]
fn test_engine_debug() {
    let engine = load(json!({
        "version": 3,
        "sources": ["a.ts"],
        "names": ["x"],
        "mappings": "AAAA,EAAEA;E"
    }));
    insta::assert_snapshot!(format!("{engine:?}"), @r###"
    SourceMapEngine https://example.com/dist/app.js.map
      sources:
        0: https://example.com/dist/a.ts
      mappings:
        0:0 -> https://example.com/dist/a.ts:0:0, 0:2 -> https://example.com/dist/a.ts:0:2 (x)
        1:2
    "###);
}

#[test]
fn test_engine_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SourceMapEngine>();
}
