#![allow(dead_code)]

use mapline::vlq::VlqEncoder;
use mapline::{LoadResult, SourceMapEngine};

pub const COMPILED_URL: &str = "https://example.com/dist/app.js";
pub const MAP_URL: &str = "https://example.com/dist/app.js.map";

pub fn load(doc: serde_json::Value) -> SourceMapEngine {
    try_load(doc).unwrap()
}

pub fn try_load(doc: serde_json::Value) -> LoadResult<SourceMapEngine> {
    SourceMapEngine::new(COMPILED_URL, MAP_URL, doc.to_string())
}

/// Resolves a source path the way the engine does for documents loaded with [load].
pub fn source_url(path: &str) -> String {
    format!("https://example.com/dist/{path}")
}

/// One absolute entry: generated line/column and optional (source, line, column).
pub type Entry = (u32, u32, Option<(u32, u32, u32)>);

/// Encodes absolute entries, sorted by generated position, as a `mappings` field.
pub fn encode_mappings(entries: &[Entry]) -> String {
    let mut buf = Vec::new();
    let mut prev_line = 0;
    let mut prev_col = 0;
    let mut prev_source = (0, 0, 0);

    for (idx, &(line, col, source)) in entries.iter().enumerate() {
        if line != prev_line {
            prev_col = 0;
            while line != prev_line {
                buf.push(b';');
                prev_line += 1;
            }
        } else if idx != 0 {
            buf.push(b',');
        }

        let mut encoder = VlqEncoder::new(&mut buf);
        encoder.encode_delta(prev_col, col).unwrap();
        prev_col = col;

        if let Some((id, src_line, src_col)) = source {
            encoder.encode_delta(prev_source.0, id).unwrap();
            encoder.encode_delta(prev_source.1, src_line).unwrap();
            encoder.encode_delta(prev_source.2, src_col).unwrap();
            prev_source = (id, src_line, src_col);
        }
    }

    String::from_utf8(buf).unwrap()
}
