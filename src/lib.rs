//! # mapline
//!
//! This crate decodes source maps and answers position queries against them, in both
//! directions: from a position in generated (compiled, bundled, minified) code to the
//! original source, and from a source position back to the generated code.
//!
//! ## Getting Started
//!
//! ```ignore
//! use mapline::SourceMapEngine;
//!
//! // Load a source map fetched for https://example.com/app.js
//! let engine = SourceMapEngine::new(compiled_url, map_url, buf)?;
//!
//! // Find the entry covering generated line 10, column 12
//! let found = engine.find_entry((10, 12)).unwrap();
//! println!("Found entry at (10, 12): {found:?}");
//! // Expected output: "Found entry at (10, 12): 10:8 -> https://example.com/src/app.ts:1:6"
//!
//! // And back again
//! let back = engine.source_line_mapping("https://example.com/src/app.ts", (1, 6));
//! ```
//!
//! ## Overview
//!
//! ### `SourceMapEngine`
//!
//! [SourceMapEngine] owns the decoded, sorted list of entries and the per-source table.
//! Construction either fully succeeds or fails with a [LoadError]. Index maps (`sections`)
//! are flattened into the same list.
//!
//! ### `MappingEntry`
//!
//! [MappingEntry] presents one decoded item of the `mappings` field, with its generated
//! [Position], and optionally its source URL, source [Position] and name.
//!
//! ### `vlq`
//!
//! The [vlq] module exposes the base64 VLQ codec the `mappings` field is encoded with.
//!
//! Fetching documents and non-inlined sources is left to the caller.

mod engine;
mod error;
mod finder;
mod mapping;
mod mappings;
mod options;
mod source;
mod splitter;
pub mod vlq;

pub use engine::*;
pub use error::*;
pub use finder::*;
pub use mapping::*;
pub use options::*;
pub use source::SourceInfo;
