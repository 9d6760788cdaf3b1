use crate::mapping::MappingEntry;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use url::Url;

/// Per-source data: inline content, ignore-list hint and the lazily built reverse index.
#[derive(Debug)]
pub struct SourceInfo {
    url: Arc<str>,
    inline_content: Option<String>,
    ignored: bool,
    // indices into the master list, sorted by source position then generated position
    reverse_index: OnceLock<Vec<u32>>,
}

impl SourceInfo {
    fn new(url: Arc<str>, inline_content: Option<String>) -> Self {
        Self {
            url,
            inline_content,
            ignored: false,
            reverse_index: OnceLock::new(),
        }
    }

    #[inline]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[inline]
    pub fn inline_content(&self) -> Option<&str> {
        self.inline_content.as_deref()
    }

    #[inline]
    pub fn is_ignored(&self) -> bool {
        self.ignored
    }

    /// Returns the reverse index of this source, building it on first use.
    pub(crate) fn reverse_index(&self, id: u32, mappings: &[MappingEntry]) -> &[u32] {
        self.reverse_index.get_or_init(|| {
            let mut index = mappings
                .iter()
                .enumerate()
                .filter(|(_, entry)| entry.source_id() == Some(id))
                .map(|(idx, _)| idx as u32)
                .collect::<Vec<_>>();
            // the master list is sorted by generated position already, a stable sort keeps
            // that as the tie-break
            index.sort_by_key(|&idx| mappings[idx as usize].source_position());
            tracing::trace!(source = %self.url, entries = index.len(), "built reverse index");
            index
        })
    }
}

/// Distinct sources of a document, in declaration order.
#[derive(Debug, Default)]
pub(crate) struct SourceTable {
    urls: Vec<String>,
    infos: Vec<SourceInfo>,
    by_url: HashMap<Arc<str>, u32>,
}

impl SourceTable {
    /// Registers a resolved source URL and returns its id.
    ///
    /// A URL seen before keeps its id; inline content fills in only if it was missing.
    pub fn insert(&mut self, url: String, inline_content: Option<String>) -> u32 {
        if let Some(&id) = self.by_url.get(url.as_str()) {
            let info = &mut self.infos[id as usize];
            if info.inline_content.is_none() {
                info.inline_content = inline_content;
            }
            return id;
        }

        let id = self.infos.len() as u32;
        let shared: Arc<str> = Arc::from(url.as_str());
        self.by_url.insert(shared.clone(), id);
        self.infos.push(SourceInfo::new(shared, inline_content));
        self.urls.push(url);
        id
    }

    pub fn mark_ignored(&mut self, id: u32) {
        if let Some(info) = self.infos.get_mut(id as usize) {
            info.ignored = true;
        }
    }

    #[inline]
    pub fn sources(&self) -> &[String] {
        &self.urls
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.infos.len()
    }

    pub fn id_of(&self, url: &str) -> Option<u32> {
        self.by_url.get(url).copied()
    }

    #[inline]
    pub fn info(&self, id: u32) -> &SourceInfo {
        &self.infos[id as usize]
    }

    pub fn get(&self, url: &str) -> Option<&SourceInfo> {
        self.id_of(url).map(|id| self.info(id))
    }

    pub fn shared_url(&self, id: u32) -> Arc<str> {
        self.infos[id as usize].url.clone()
    }

    pub fn content(&self, url: &str) -> Option<&str> {
        self.get(url).and_then(SourceInfo::inline_content)
    }
}

/// Turns the raw `sources` entries of one (sub-)map into absolute URLs.
#[derive(Debug)]
pub(crate) struct SourceResolver<'a> {
    base: Option<Url>,
    source_root: Option<&'a str>,
    compiled_url: &'a str,
    marker: &'a str,
}

impl<'a> SourceResolver<'a> {
    /// `base_url` is the map's own URL, or the compiled URL for `data:` maps.
    pub fn new(
        base_url: &str,
        source_root: Option<&'a str>,
        compiled_url: &'a str,
        marker: &'a str,
    ) -> Self {
        Self {
            base: Url::parse(base_url).ok(),
            source_root: source_root.filter(|root| !root.is_empty()),
            compiled_url,
            marker,
        }
    }

    pub fn resolve(&self, raw: &str, has_inline_content: bool) -> String {
        let joined = match self.source_root {
            Some(root) if !is_absolute(raw) => {
                let path = match root.ends_with('/') {
                    true => raw.strip_prefix('/').unwrap_or(raw),
                    false => raw,
                };
                let separator = if root.ends_with('/') || path.starts_with('/') {
                    ""
                } else {
                    "/"
                };
                format!("{root}{separator}{path}")
            }
            _ => raw.to_owned(),
        };

        let mut url = self
            .base
            .as_ref()
            .and_then(|base| base.join(&joined).ok())
            .map(String::from)
            .unwrap_or(joined);

        if has_inline_content && url == self.compiled_url {
            url.push_str(self.marker);
        }
        url
    }
}

// root-relative paths like `/lib/a.ts` still take the source root
fn is_absolute(path: &str) -> bool {
    Url::parse(path).is_ok()
}

/// Picks the URL that relative sources are resolved against.
pub(crate) fn base_url<'a>(map_url: &'a str, compiled_url: &'a str) -> &'a str {
    if map_url.starts_with("data:") {
        compiled_url
    } else {
        map_url
    }
}
