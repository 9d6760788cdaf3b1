use crate::engine::raw::{RawDocument, RawSection};
use crate::mapping::Position;
use crate::mappings::{DecodeState, Mappings, SectionTables};
use crate::options::EngineOptions;
use crate::source::{SourceResolver, SourceTable};
use crate::{DocumentError, DocumentResult};
use std::sync::Arc;

/// Walks a document top-down, flattening index maps into one master list.
#[derive(Debug)]
pub(crate) struct DocumentLoader<'o> {
    compiled_url: &'o str,
    base_url: &'o str,
    options: &'o EngineOptions,
    mappings_len: usize,
    pub(crate) file: Option<String>,
    pub(crate) mappings: Mappings,
    pub(crate) sources: SourceTable,
    pub(crate) diagnostics: Vec<DocumentError>,
    pub(crate) sections: u32,
}

impl<'o> DocumentLoader<'o> {
    pub fn new(compiled_url: &'o str, base_url: &'o str, options: &'o EngineOptions) -> Self {
        Self {
            compiled_url,
            base_url,
            options,
            mappings_len: 0,
            file: None,
            mappings: Mappings::default(),
            sources: SourceTable::default(),
            diagnostics: Vec::new(),
            sections: 0,
        }
    }

    pub fn load(&mut self, raw: RawDocument<'_>) -> DocumentResult<()> {
        self.file = raw.file.map(str::to_owned);
        self.process_document(raw, Position::min())?;
        self.mappings.sort();
        Ok(())
    }

    fn process_document(&mut self, mut raw: RawDocument<'_>, base: Position) -> DocumentResult<()> {
        match raw.sections.take() {
            Some(sections) => self.process_index_map(sections, base),
            None => self.process_map(raw, base),
        }
    }

    fn process_map(&mut self, mut raw: RawDocument<'_>, base: Position) -> DocumentResult<()> {
        let raw_sources = raw
            .sources
            .take()
            .ok_or(DocumentError::MissingRequiredField("sources"))?;
        let mappings = raw
            .mappings
            .ok_or(DocumentError::MissingRequiredField("mappings"))?;

        self.mappings_len += mappings.len();
        if let Some(limit) = self.options.mappings_limit {
            if self.mappings_len > limit {
                return Err(DocumentError::MappingsTooLarge {
                    len: self.mappings_len,
                    limit,
                });
            }
        }

        let options = self.options;
        let resolver = SourceResolver::new(
            self.base_url,
            raw.source_root,
            self.compiled_url,
            &options.source_map_marker,
        );
        let sources_content = raw.sources_content.take().unwrap_or_default();

        let sources = raw_sources
            .into_iter()
            .enumerate()
            .map(|(idx, source)| {
                let content = sources_content.get(idx).copied().flatten();
                let url = resolver.resolve(source.unwrap_or_default(), content.is_some());
                let id = self.sources.insert(url, content.map(str::to_owned));
                (id, self.sources.shared_url(id))
            })
            .collect::<Vec<_>>();

        // out-of-range indices carry no meaning and are dropped
        for idx in raw.take_ignore_list() {
            if let Some(&(id, _)) = sources.get(idx as usize) {
                self.sources.mark_ignored(id);
            }
        }

        let names = raw
            .names
            .unwrap_or_default()
            .into_iter()
            .map(Arc::from)
            .collect::<Vec<Arc<str>>>();

        self.mappings.decode(
            mappings,
            SectionTables {
                sources: &sources,
                names: &names,
            },
            DecodeState::from(base),
        )
    }

    #[cold]
    fn process_index_map(
        &mut self,
        sections: Vec<RawSection<'_>>,
        base: Position,
    ) -> DocumentResult<()> {
        for (section_id, section) in sections.into_iter().enumerate() {
            let section_id = section_id as u32;
            self.sections += 1;
            let start = section_start(base, section.offset.line, section.offset.column)
                .ok_or_else(|| {
                    DocumentError::section_error(
                        section_id,
                        DocumentError::ValueOutOfRange {
                            segment: format!(
                                "offset {}:{}",
                                section.offset.line, section.offset.column
                            ),
                        },
                    )
                })?;

            match (section.map, section.url) {
                (Some(map), _) => {
                    self.process_document(map, start)
                        .map_err(|e| DocumentError::section_error(section_id, e))?;
                }
                (None, Some(url)) => {
                    tracing::warn!(
                        section = section_id,
                        url,
                        "source map sections with \"url\" are not supported"
                    );
                    self.diagnostics.push(DocumentError::UnsupportedSectionUrl {
                        section: section_id,
                        url: url.to_owned(),
                    });
                }
                (None, None) => {
                    return Err(DocumentError::section_error(
                        section_id,
                        DocumentError::MissingRequiredField("map"),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Where a section starts, given the start of the map containing it.
///
/// The parent's column only shifts sections that begin on the parent's first line.
fn section_start(base: Position, line: u32, column: u32) -> Option<Position> {
    let column = if line == 0 {
        base.column.checked_add(column)?
    } else {
        column
    };
    Some(Position::new(base.line.checked_add(line)?, column))
}
