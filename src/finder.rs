use crate::mapping::{MappingEntry, Position};
use crate::mappings::Mappings;
use std::cell::Cell;

type FinderState = (
    // generated pos of the last finding
    Position,
    // result index in mappings of the last finding
    usize,
);

// within this many columns on the same line, scanning beats bisecting
const LINEAR_SEARCH_DISTANCE: u32 = 32;

/// `EntryFinder` is a helper for repeated forward lookups in a
/// [SourceMapEngine](crate::SourceMapEngine).
///
/// It remembers the last answer, which makes it efficient when traversing the generated
/// file in small increments (e.g., stepping through a minified line from start to finish).
/// Results are identical to [find_entry](crate::SourceMapEngine::find_entry).
#[derive(Debug)]
pub struct EntryFinder<'a> {
    state: Cell<Option<FinderState>>,
    mappings: &'a Mappings,
}

impl<'a> EntryFinder<'a> {
    pub(crate) fn new(mappings: &'a Mappings) -> Self {
        Self {
            state: Cell::new(None),
            mappings,
        }
    }

    /// Finds the last entry starting at or before the given generated position.
    ///
    /// If there are no preceding entries, it returns `None`.
    pub fn find_entry<P>(&self, pos: P) -> Option<&'a MappingEntry>
    where
        P: Into<Position>,
    {
        let pos = pos.into();
        let found = match self.state.get() {
            None => self.find_by_binary_search(pos, 0, self.mappings.len()),
            Some((last_pos, last_idx)) => {
                let near = pos.line == last_pos.line
                    && pos.column.abs_diff(last_pos.column) <= LINEAR_SEARCH_DISTANCE;

                if last_pos <= pos {
                    // everything up to last_idx is known to be <= pos
                    if near {
                        Some(self.find_by_linear_search_forward(pos, last_idx))
                    } else {
                        self.find_by_binary_search(pos, last_idx, self.mappings.len())
                    }
                } else if near {
                    self.find_by_linear_search_backward(pos, last_idx)
                } else {
                    self.find_by_binary_search(pos, 0, last_idx)
                }
            }
        };

        let idx = found?;
        let entry = &self.mappings[idx];
        self.state.set(Some((entry.generated(), idx)));
        Some(entry)
    }

    fn find_by_linear_search_forward(&self, pos: Position, from: usize) -> usize {
        let mut idx = from;
        while self
            .mappings
            .get(idx + 1)
            .is_some_and(|next| next.generated() <= pos)
        {
            idx += 1;
        }
        idx
    }

    fn find_by_linear_search_backward(&self, pos: Position, from: usize) -> Option<usize> {
        (0..from)
            .rev()
            .find(|&idx| self.mappings[idx].generated() <= pos)
    }

    /// Searches `[lo, hi)`; when `lo > 0` the entry at `lo` must already be `<= pos`.
    fn find_by_binary_search(&self, pos: Position, lo: usize, hi: usize) -> Option<usize> {
        match self.mappings[lo..hi].partition_point(|entry| entry.generated() <= pos) {
            0 if lo == 0 => None,
            0 => Some(lo),
            n => Some(lo + n - 1),
        }
    }
}
