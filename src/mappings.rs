use crate::mapping::{MappingEntry, Position};
use crate::splitter::{MappingSplitter, Terminator};
use crate::vlq::VlqDecoder;
use crate::{CodecError, DocumentError, DocumentResult};
use std::ops::Deref;
use std::sync::Arc;

/// `Mappings` is the master list of [MappingEntry] values, sorted by generated position.
#[derive(Debug, Clone, Default)]
pub struct Mappings(pub(crate) Vec<MappingEntry>);

impl Deref for Mappings {
    type Target = [MappingEntry];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Mappings {
    /// Sorts entries by their generated positions.
    ///
    /// The sort is stable: entries at the same position keep their decode order.
    pub(crate) fn sort(&mut self) {
        self.0.sort_by_key(MappingEntry::generated)
    }

    /// Index one past the last entry at or before `pos`.
    #[inline]
    pub(crate) fn upper_bound(&self, pos: Position) -> usize {
        self.0.partition_point(|entry| entry.generated() <= pos)
    }

    /// Finds the last entry starting at or before `pos`.
    pub fn find_entry<P>(&self, pos: P) -> Option<&MappingEntry>
    where
        P: Into<Position>,
    {
        match self.upper_bound(pos.into()) {
            0 => None,
            idx => self.0.get(idx - 1),
        }
    }
}

/// What the segments of one (sub-)map refer to.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SectionTables<'t> {
    // (source table id, resolved url) per local source index
    pub sources: &'t [(u32, Arc<str>)],
    pub names: &'t [Arc<str>],
}

/// Generated position the running totals start from.
///
/// The column only applies until the first `;`.
#[derive(Debug, Default, Copy, Clone)]
pub(crate) struct DecodeState {
    pub(crate) generated_line: u32,
    pub(crate) generated_col: u32,
}

impl From<Position> for DecodeState {
    fn from(pos: Position) -> Self {
        Self {
            generated_line: pos.line,
            generated_col: pos.column,
        }
    }
}

#[inline]
fn apply_delta(total: i64, delta: i64, segment: &str) -> DocumentResult<i64> {
    total
        .checked_add(delta)
        .filter(|v| (0..=u32::MAX as i64).contains(v))
        .ok_or_else(|| DocumentError::ValueOutOfRange {
            segment: segment.to_owned(),
        })
}

impl Mappings {
    /// Decodes one `mappings` field and appends its entries, unsorted.
    pub(crate) fn decode(
        &mut self,
        source: &str,
        tables: SectionTables<'_>,
        state: DecodeState,
    ) -> DocumentResult<()> {
        let mut generated_line = i64::from(state.generated_line);
        let mut generated_col = i64::from(state.generated_col);

        // source-side totals run across the whole field
        let mut source_id = 0i64;
        let mut source_line = 0i64;
        let mut source_col = 0i64;
        let mut name_id = 0i64;

        let mut decoder = VlqDecoder::new();
        let mut line_start = true;

        // the ratio of source.len to entries is generally between 5 and 7
        self.0.reserve(source.len() / 6);

        for segment in MappingSplitter::new(source) {
            let text = segment.text;

            if text.is_empty() {
                // only a line without any records may be empty
                if !line_start || segment.terminator == Terminator::Record {
                    return Err(CodecError::MalformedRecord {
                        segment: String::new(),
                        fields: 0,
                    }
                    .into());
                }
            } else {
                let nums = decoder.decode(text)?;

                generated_col = apply_delta(generated_col, nums[0], text)?;
                let mut entry = MappingEntry::new(generated_line as u32, generated_col as u32);

                if nums.len() >= 4 {
                    source_id = apply_delta(source_id, nums[1], text)?;
                    let (table_id, url) = tables
                        .sources
                        .get(source_id as usize)
                        .ok_or(DocumentError::UnknownSourceReference(source_id as u32))?;

                    source_line = apply_delta(source_line, nums[2], text)?;
                    source_col = apply_delta(source_col, nums[3], text)?;

                    entry = entry.with_original(
                        *table_id,
                        url.clone(),
                        Position::new(source_line as u32, source_col as u32),
                    );

                    if nums.len() == 5 {
                        name_id = apply_delta(name_id, nums[4], text)?;
                        let name = tables
                            .names
                            .get(name_id as usize)
                            .ok_or(DocumentError::UnknownNameReference(name_id as u32))?;
                        entry = entry.with_name(name.clone());
                    }
                }

                self.0.push(entry);
            }

            if segment.terminator == Terminator::Line {
                generated_line = apply_delta(generated_line, 1, text)?;
                generated_col = 0;
                line_start = true;
            } else {
                line_start = false;
            }
        }

        Ok(())
    }
}
