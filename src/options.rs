use std::borrow::Cow;

/// Suffix appended to a source URL that would otherwise equal the compiled URL.
pub const DEFAULT_SOURCE_MAP_MARKER: &str = "? [sm]";

/// Settings for constructing a [SourceMapEngine](crate::SourceMapEngine).
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub(crate) mappings_limit: Option<usize>,
    pub(crate) source_map_marker: Cow<'static, str>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            mappings_limit: None,
            source_map_marker: Cow::Borrowed(DEFAULT_SOURCE_MAP_MARKER),
        }
    }
}

impl EngineOptions {
    /// Rejects documents whose `mappings` fields add up to more than `limit` bytes.
    #[inline(always)]
    pub fn with_mappings_limit(mut self, limit: usize) -> Self {
        self.mappings_limit = Some(limit);
        self
    }

    #[inline(always)]
    pub fn with_source_map_marker(mut self, marker: impl Into<Cow<'static, str>>) -> Self {
        self.source_map_marker = marker.into();
        self
    }

    #[inline]
    pub fn mappings_limit(&self) -> Option<usize> {
        self.mappings_limit
    }

    #[inline]
    pub fn source_map_marker(&self) -> &str {
        &self.source_map_marker
    }
}
