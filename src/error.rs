pub type CodecResult<T> = Result<T, CodecError>;
pub type DocumentResult<T> = Result<T, DocumentError>;
pub type LoadResult<T> = Result<T, LoadError>;

/// Failures of the base64 VLQ codec over a single `mappings` segment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum CodecError {
    #[error("a VLQ value in segment \"{segment}\" asks for continuation past the end of input")]
    Truncated { segment: String },
    #[error("segment \"{segment}\" has {fields} fields, expected 1, 4 or 5")]
    MalformedRecord { segment: String, fields: usize },
    #[error("segment \"{segment}\" contains non-base64 byte 0x{byte:02x}")]
    InvalidBase64 { segment: String, byte: u8 },
    #[error("a VLQ value in segment \"{segment}\" overflows 64 bits")]
    Overflow { segment: String },
}

/// Structural failures of a mapping document.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DocumentError {
    #[error("source map is not valid JSON: {0}")]
    InvalidJson(#[source] simd_json::Error),
    #[error("source map is missing required field `{0}`")]
    MissingRequiredField(&'static str),
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// Never returned from construction. Loaders record it in
    /// [SourceMapEngine::diagnostics](crate::SourceMapEngine::diagnostics) and skip the section.
    #[error("section #{section} references external map \"{url}\", which is not supported")]
    UnsupportedSectionUrl { section: u32, url: String },
    #[error("a mapping references unknown source #{0}")]
    UnknownSourceReference(u32),
    #[error("a mapping references unknown name #{0}")]
    UnknownNameReference(u32),
    #[error("segment \"{segment}\" moves a position outside of the u32 range")]
    ValueOutOfRange { segment: String },
    #[error("mappings are {len} bytes long, exceeding the limit of {limit}")]
    MappingsTooLarge { len: usize, limit: usize },
    #[error("section #{section}: {error}")]
    Section {
        section: u32,
        #[source]
        error: Box<DocumentError>,
    },
}

impl DocumentError {
    #[inline]
    pub(crate) fn section_error(section: u32, error: DocumentError) -> Self {
        Self::Section {
            section,
            error: Box::new(error),
        }
    }

    /// Returns the innermost error, looking through [DocumentError::Section] wrappers.
    pub fn root_cause(&self) -> &DocumentError {
        match self {
            Self::Section { error, .. } => error.root_cause(),
            other => other,
        }
    }

    /// Returns `true` for errors that only indicate skipped content.
    pub fn is_diagnostic(&self) -> bool {
        matches!(self.root_cause(), Self::UnsupportedSectionUrl { .. })
    }
}

impl From<simd_json::Error> for DocumentError {
    fn from(value: simd_json::Error) -> Self {
        Self::InvalidJson(value)
    }
}

/// Error returned when a [SourceMapEngine](crate::SourceMapEngine) cannot be constructed.
///
/// Carries the URL of the mapping document that failed.
#[derive(Debug, thiserror::Error)]
#[error("failed to load source map \"{url}\": {error}")]
pub struct LoadError {
    pub url: String,
    #[source]
    pub error: DocumentError,
}

impl LoadError {
    pub(crate) fn new(url: &str, error: DocumentError) -> Self {
        Self {
            url: url.to_owned(),
            error,
        }
    }
}
