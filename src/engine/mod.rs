mod raw;
mod reverse;
mod sections;

pub use reverse::EntryRanges;

use crate::engine::raw::RawDocument;
use crate::engine::sections::DocumentLoader;
use crate::finder::EntryFinder;
use crate::mapping::{MappingEntry, Position};
use crate::mappings::Mappings;
use crate::options::EngineOptions;
use crate::source::{base_url, SourceInfo, SourceTable};
use crate::{DocumentError, LoadError, LoadResult};
use std::fmt::{Debug, Formatter};

/// `SourceMapEngine` answers position queries against one decoded mapping document.
///
/// # Construction
///
/// Construction is all-or-nothing: the whole document is parsed and every `mappings` field
/// decoded, or a [LoadError] is returned. Index maps are flattened into one sorted list of
/// entries; the JSON document itself is dropped afterwards.
///
/// - [`SourceMapEngine::new`]
/// - [`SourceMapEngine::with_options`]
///
/// ## Querying
///
/// Forward (generated → source):
/// - [`find_entry`](SourceMapEngine::find_entry)
/// - [`finder`](SourceMapEngine::finder)
/// - [`find_entry_ranges`](SourceMapEngine::find_entry_ranges)
///
/// Reverse (source → generated):
/// - [`source_line_mapping`](SourceMapEngine::source_line_mapping)
/// - [`find_reverse_entries`](SourceMapEngine::find_reverse_entries)
/// - [`find_reverse_ranges`](SourceMapEngine::find_reverse_ranges)
/// - [`reverse_map_range`](SourceMapEngine::reverse_map_range)
///
/// Reverse indices are built per source on first use and cached. The engine is `Sync`, and
/// concurrent first queries for the same source build its index only once.
pub struct SourceMapEngine {
    compiled_url: String,
    url: String,
    file: Option<String>,
    mappings: Mappings,
    sources: SourceTable,
    diagnostics: Vec<DocumentError>,
}

impl Debug for SourceMapEngine {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SourceMapEngine {}", self.url)?;
        f.write_str("  sources:\n")?;
        for (idx, source) in self.sources.sources().iter().enumerate() {
            writeln!(f, "    {idx}: {source}")?;
        }
        f.write_str("  mappings:\n")?;
        if let Some(first) = self.mappings.first() {
            let mut last_line = first.generated_line();
            write!(f, "    {first:?}")?;
            for entry in self.mappings.iter().skip(1) {
                if entry.generated_line() != last_line {
                    f.write_str("\n    ")?;
                } else {
                    f.write_str(", ")?;
                }
                write!(f, "{entry:?}")?;
                last_line = entry.generated_line();
            }
        }
        Ok(())
    }
}

impl SourceMapEngine {
    /// Creates an engine from the raw text of a mapping document.
    ///
    /// `compiled_url` is the URL of the generated artifact, `url` the URL of the mapping
    /// document itself (or a `data:` URL when the map was inlined).
    ///
    /// # Example
    /// ```
    /// # use mapline::SourceMapEngine;
    /// let json = r#"{"version":3,"sources":["a.ts"],"names":[],"mappings":"AAAA;AACA"}"#;
    /// let engine = SourceMapEngine::new(
    ///     "https://example.com/a.js",
    ///     "https://example.com/a.js.map",
    ///     json,
    /// ).unwrap();
    /// let entry = engine.find_entry((1, 10)).unwrap();
    /// assert_eq!(entry.source_url(), Some("https://example.com/a.ts"));
    /// assert_eq!(entry.source_line(), 1);
    /// ```
    pub fn new(
        compiled_url: impl Into<String>,
        url: impl Into<String>,
        text: impl Into<Vec<u8>>,
    ) -> LoadResult<Self> {
        Self::with_options(compiled_url, url, text, &EngineOptions::default())
    }

    /// Same as [Self::new], with explicit [EngineOptions].
    pub fn with_options(
        compiled_url: impl Into<String>,
        url: impl Into<String>,
        text: impl Into<Vec<u8>>,
        options: &EngineOptions,
    ) -> LoadResult<Self> {
        let compiled_url: String = compiled_url.into();
        let url: String = url.into();
        let mut buf: Vec<u8> = text.into();

        let (loaded, version) = {
            let raw = RawDocument::parse(&mut buf).map_err(|e| LoadError::new(&url, e.into()))?;
            // informational only, documents are not gated on it
            let version = raw.version;
            let mut loader =
                DocumentLoader::new(&compiled_url, base_url(&url, &compiled_url), options);
            loader.load(raw).map_err(|e| LoadError::new(&url, e))?;
            (loader, version)
        };

        tracing::debug!(
            url = %url,
            version = ?version,
            entries = loaded.mappings.len(),
            sources = loaded.sources.len(),
            sections = loaded.sections,
            "loaded source map"
        );

        Ok(Self {
            file: loaded.file,
            mappings: loaded.mappings,
            sources: loaded.sources,
            diagnostics: loaded.diagnostics,
            compiled_url,
            url,
        })
    }
}

impl SourceMapEngine {
    /// URL of the generated artifact this document describes.
    #[inline]
    pub fn compiled_url(&self) -> &str {
        &self.compiled_url
    }

    /// URL of the mapping document itself.
    #[inline]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The top-level `file` field, if present.
    #[inline]
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    /// Resolved source URLs in declaration order, without duplicates.
    #[inline]
    pub fn source_urls(&self) -> &[String] {
        self.sources.sources()
    }

    /// Inline content of a source, if the document carried it.
    #[inline]
    pub fn embedded_content(&self, source_url: &str) -> Option<&str> {
        self.sources.content(source_url)
    }

    #[inline]
    pub fn source_info(&self, source_url: &str) -> Option<&SourceInfo> {
        self.sources.get(source_url)
    }

    /// Whether the document lists the source in its ignore list.
    pub fn has_ignore_list_hint(&self, source_url: &str) -> bool {
        self.sources
            .get(source_url)
            .is_some_and(SourceInfo::is_ignored)
    }

    /// All entries, sorted by generated position.
    #[inline]
    pub fn mappings(&self) -> &[MappingEntry] {
        &self.mappings
    }

    /// Non-fatal problems found while loading, such as skipped `url` sections.
    #[inline]
    pub fn diagnostics(&self) -> &[DocumentError] {
        &self.diagnostics
    }

    /// Whether the first entry sits on the first line or the first column of the generated
    /// text. `false` for a document without entries.
    pub fn maps_origin(&self) -> bool {
        self.mappings
            .first()
            .is_some_and(|entry| entry.generated_line() == 0 || entry.generated_column() == 0)
    }
}

impl SourceMapEngine {
    /// Finds the entry for a given generated position.
    ///
    /// If no entry starts exactly there, this returns the closest preceding entry.
    /// If there are no preceding entries, it returns `None`.
    pub fn find_entry<P>(&self, pos: P) -> Option<&MappingEntry>
    where
        P: Into<Position>,
    {
        self.mappings.find_entry(pos)
    }

    /// Creates an [EntryFinder] for sequential forward lookups.
    pub fn finder(&self) -> EntryFinder<'_> {
        EntryFinder::new(&self.mappings)
    }
}
