/// The transient shape of a mapping document, borrowing from the input buffer.
#[derive(Debug, simd_json_derive::Deserialize)]
#[simd_json(rename_all = "camelCase")]
pub(crate) struct RawDocument<'a> {
    pub version: Option<u32>,
    pub file: Option<&'a str>,
    pub sources: Option<Vec<Option<&'a str>>>,
    pub source_root: Option<&'a str>,
    pub sources_content: Option<Vec<Option<&'a str>>>,
    pub names: Option<Vec<&'a str>>,
    pub mappings: Option<&'a str>,
    pub ignore_list: Option<Vec<u32>>,
    #[simd_json(rename = "x_google_ignoreList")]
    pub x_google_ignore_list: Option<Vec<u32>>,
    pub sections: Option<Vec<RawSection<'a>>>,
}

#[derive(Debug, simd_json_derive::Deserialize)]
pub(crate) struct RawSection<'a> {
    pub offset: RawOffset,
    pub map: Option<RawDocument<'a>>,
    pub url: Option<&'a str>,
}

#[derive(Debug, Copy, Clone, simd_json_derive::Deserialize)]
pub(crate) struct RawOffset {
    pub line: u32,
    pub column: u32,
}

impl<'a> RawDocument<'a> {
    /// Parses the document in place, after dropping a leading `)]}` guard line.
    pub fn parse(json: &'a mut [u8]) -> simd_json::Result<Self> {
        use simd_json_derive::Deserialize;

        Self::from_slice(strip_guard_prefix(json))
    }

    /// `ignoreList`, falling back to the older `x_google_ignoreList` spelling.
    pub fn take_ignore_list(&mut self) -> Vec<u32> {
        self.ignore_list
            .take()
            .or_else(|| self.x_google_ignore_list.take())
            .unwrap_or_default()
    }
}

/// Some producers prepend `)]}` (optionally followed by more garbage) to stop the map from
/// being evaluated as script; everything through the first newline is discarded.
pub(crate) fn strip_guard_prefix(json: &mut [u8]) -> &mut [u8] {
    if !json.starts_with(b")]}") {
        return json;
    }
    let start = memchr::memchr(b'\n', json).map_or(json.len(), |newline| newline + 1);
    &mut json[start..]
}
