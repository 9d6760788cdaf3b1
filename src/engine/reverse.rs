use super::SourceMapEngine;
use crate::mapping::{MappingEntry, Position, TextRange};

/// Result of [SourceMapEngine::find_entry_ranges].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryRanges<'a> {
    /// Generated text covered by the entry, up to the next entry.
    pub range: TextRange,
    /// Source text covered by the entry, up to the next source position of the same source.
    pub source_range: TextRange,
    pub source_url: &'a str,
    pub entry: &'a MappingEntry,
}

// reverse indices only hold entries that have a source
#[inline]
fn source_pos(entry: &MappingEntry) -> Position {
    Position::new(entry.source_line(), entry.source_column())
}

impl SourceMapEngine {
    /// The reverse index of a source: master-list indices sorted by source position.
    fn reverse_index(&self, source_url: &str) -> Option<&[u32]> {
        let id = self.sources.id_of(source_url)?;
        Some(self.sources.info(id).reverse_index(id, &self.mappings))
    }

    #[inline]
    fn entry_at(&self, idx: u32) -> &MappingEntry {
        &self.mappings[idx as usize]
    }

    #[inline]
    fn generated_at(&self, idx: usize) -> Position {
        self.mappings
            .get(idx)
            .map_or(Position::max(), MappingEntry::generated)
    }

    /// Entries of a source, sorted by source position and then generated position.
    ///
    /// Empty for an unknown source.
    pub fn reversed_mappings<'s>(
        &'s self,
        source_url: &str,
    ) -> impl ExactSizeIterator<Item = &'s MappingEntry> + 's {
        self.reverse_index(source_url)
            .unwrap_or_default()
            .iter()
            .map(move |&idx| self.entry_at(idx))
    }

    /// Finds an entry on the given source line.
    ///
    /// Returns the greatest entry on `pos.line` whose source column is `<= pos.column`. A
    /// column before every entry of the line yields the first entry of the line. Returns
    /// `None` when the source has no entry on that line.
    pub fn source_line_mapping<P>(&self, source_url: &str, pos: P) -> Option<&MappingEntry>
    where
        P: Into<Position>,
    {
        let pos = pos.into();
        let index = self.reverse_index(source_url)?;

        let first = index.partition_point(|&idx| self.entry_at(idx).source_line() < pos.line);
        let last = index.partition_point(|&idx| self.entry_at(idx).source_line() <= pos.line);
        let on_line = &index[first..last];

        let after =
            on_line.partition_point(|&idx| self.entry_at(idx).source_column() <= pos.column);
        let idx = match after {
            0 => *on_line.first()?,
            n => on_line[n - 1],
        };
        Some(self.entry_at(idx))
    }

    /// Master-list indices of all entries at the greatest source position `<= pos`.
    fn reverse_indices(&self, source_url: &str, pos: Position) -> &[u32] {
        let Some(index) = self.reverse_index(source_url) else {
            return &[];
        };
        let end = index.partition_point(|&idx| source_pos(self.entry_at(idx)) <= pos);
        let Some(&last) = index[..end].last() else {
            return &[];
        };
        let target = source_pos(self.entry_at(last));
        let start = index[..end].partition_point(|&idx| source_pos(self.entry_at(idx)) < target);
        &index[start..end]
    }

    /// All entries sharing the greatest source position at or before `pos`.
    pub fn find_reverse_entries<P>(&self, source_url: &str, pos: P) -> Vec<&MappingEntry>
    where
        P: Into<Position>,
    {
        self.reverse_indices(source_url, pos.into())
            .iter()
            .map(|&idx| self.entry_at(idx))
            .collect()
    }

    /// Generated ranges that map to the source position at or before `pos`.
    ///
    /// Each range runs from an entry to the next entry in the generated text; ranges of
    /// adjacent entries are merged.
    pub fn find_reverse_ranges<P>(&self, source_url: &str, pos: P) -> Vec<TextRange>
    where
        P: Into<Position>,
    {
        let indices = self.reverse_indices(source_url, pos.into());
        let mut ranges = Vec::new();

        let mut i = 0;
        while i < indices.len() {
            let start = indices[i] as usize;
            let mut end = start + 1;
            while indices.get(i + 1).is_some_and(|&next| next as usize == end) {
                end += 1;
                i += 1;
            }
            ranges.push(TextRange::new(
                self.generated_at(start),
                self.generated_at(end),
            ));
            i += 1;
        }
        ranges
    }

    /// Maps a source range onto the generated text.
    ///
    /// `range.start` is matched to the first entry at or after it (lower bound), `range.end`
    /// to the first entry after it (upper bound); both clamp to the last entry of the source.
    /// The generated positions of the two entries form the result, smaller one first.
    /// Returns `None` if the source has no entries at all.
    pub fn reverse_map_range<R>(&self, source_url: &str, range: R) -> Option<TextRange>
    where
        R: Into<TextRange>,
    {
        let range = range.into();
        let index = self.reverse_index(source_url)?;
        let last = index.len().checked_sub(1)?;

        let start = index.partition_point(|&idx| source_pos(self.entry_at(idx)) < range.start);
        let end = index.partition_point(|&idx| source_pos(self.entry_at(idx)) <= range.end);

        let start = self.entry_at(index[start.min(last)]).generated();
        let end = self.entry_at(index[end.min(last)]).generated();
        Some(TextRange::ordered(start, end))
    }

    /// Finds the entry for a generated position together with the spans it covers.
    ///
    /// Returns `None` if no entry precedes `pos`, or if that entry has no source.
    pub fn find_entry_ranges<P>(&self, pos: P) -> Option<EntryRanges<'_>>
    where
        P: Into<Position>,
    {
        let end_index = self.mappings.upper_bound(pos.into());
        let entry = self.mappings.get(end_index.checked_sub(1)?)?;
        let original = entry.original()?;

        let range = TextRange::new(entry.generated(), self.generated_at(end_index));

        let reverse = self.reverse_index(&original.url)?;
        let source_start = original.position;
        let end_source_index =
            reverse.partition_point(|&idx| source_pos(self.entry_at(idx)) <= source_start);
        let source_end = reverse
            .get(end_source_index)
            .map_or(Position::max(), |&idx| source_pos(self.entry_at(idx)));

        Some(EntryRanges {
            range,
            source_range: TextRange::new(source_start, source_end),
            source_url: &original.url,
            entry,
        })
    }
}
