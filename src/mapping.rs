use serde::Serialize;
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

/// `Position` represents a zero-based line and zero-based column in a file.
///
/// # Note
///
/// Consumers disagree about bases: devtools panels and `Error.prototype.stack` show
/// 1-based lines and columns, while tools like `esbuild` emit 0-based ones. In this crate
/// both the line and column are 0-based, for generated and source positions alike.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const fn max() -> Self {
        Self {
            line: u32::MAX,
            column: u32::MAX,
        }
    }

    pub const fn min() -> Self {
        Self { line: 0, column: 0 }
    }

    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl From<(u32, u32)> for Position {
    fn from((line, column): (u32, u32)) -> Self {
        Self::new(line, column)
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A span between two positions. `end` is exclusive.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
pub struct TextRange {
    pub start: Position,
    pub end: Position,
}

impl TextRange {
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Creates a range whose `start` is the smaller of the two positions.
    pub fn ordered(a: Position, b: Position) -> Self {
        if a <= b {
            Self::new(a, b)
        } else {
            Self::new(b, a)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.start <= pos && pos < self.end
    }
}

impl<S, E> From<(S, E)> for TextRange
where
    S: Into<Position>,
    E: Into<Position>,
{
    fn from((start, end): (S, E)) -> Self {
        Self::new(start.into(), end.into())
    }
}

impl Display for TextRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Where a mapping entry points to in an original source.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct OriginalLocation {
    // index into the engine's distinct source table
    #[serde(skip)]
    pub(crate) source_id: u32,
    pub url: Arc<str>,
    pub position: Position,
}

/// One correspondence point of the `mappings` field.
///
/// Entries without an original location are generated-only markers.
#[derive(Clone, Eq, PartialEq, Serialize)]
pub struct MappingEntry {
    generated: Position,
    original: Option<OriginalLocation>,
    name: Option<Arc<str>>,
}

impl Debug for MappingEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.generated)?;
        if let Some(original) = &self.original {
            write!(f, " -> {}:{}", original.url, original.position)?;
            if let Some(name) = &self.name {
                write!(f, " ({name})")?;
            }
        }
        Ok(())
    }
}

impl MappingEntry {
    #[inline(always)]
    pub const fn new(generated_line: u32, generated_column: u32) -> Self {
        Self {
            generated: Position::new(generated_line, generated_column),
            original: None,
            name: None,
        }
    }

    #[inline(always)]
    pub(crate) fn with_original(self, source_id: u32, url: Arc<str>, position: Position) -> Self {
        Self {
            original: Some(OriginalLocation {
                source_id,
                url,
                position,
            }),
            ..self
        }
    }

    #[inline(always)]
    pub(crate) fn with_name(self, name: Arc<str>) -> Self {
        Self {
            name: Some(name),
            ..self
        }
    }
}

impl MappingEntry {
    #[inline]
    pub fn generated(&self) -> Position {
        self.generated
    }

    #[inline]
    pub fn generated_line(&self) -> u32 {
        self.generated.line
    }

    #[inline]
    pub fn generated_column(&self) -> u32 {
        self.generated.column
    }

    #[inline]
    pub fn original(&self) -> Option<&OriginalLocation> {
        self.original.as_ref()
    }

    /// Returns the resolved URL of the source, if the entry has one.
    #[inline]
    pub fn source_url(&self) -> Option<&str> {
        self.original.as_ref().map(|o| o.url.as_ref())
    }

    #[inline]
    pub fn source_position(&self) -> Option<Position> {
        self.original.as_ref().map(|o| o.position)
    }

    /// Source line, `0` for generated-only entries.
    #[inline]
    pub fn source_line(&self) -> u32 {
        self.source_position().map_or(0, |p| p.line)
    }

    /// Source column, `0` for generated-only entries.
    #[inline]
    pub fn source_column(&self) -> u32 {
        self.source_position().map_or(0, |p| p.column)
    }

    #[inline]
    pub fn has_source(&self) -> bool {
        self.original.is_some()
    }

    /// Returns the original identifier name, if available.
    ///
    /// A name is only ever present together with a source.
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[inline]
    pub(crate) fn source_id(&self) -> Option<u32> {
        self.original.as_ref().map(|o| o.source_id)
    }
}

#[cfg(test)]
mod tests {
    use super::{MappingEntry, Position, TextRange};
    use std::sync::Arc;

    #[test]
    fn test_entry_debug() {
        let entry = MappingEntry::new(3, 4)
            .with_original(0, Arc::from("a.js"), Position::new(1, 2))
            .with_name(Arc::from("foo"));
        insta::assert_snapshot!(format!("{entry:?}"), @"3:4 -> a.js:1:2 (foo)");
        insta::assert_snapshot!(format!("{:?}", MappingEntry::new(0, 7)), @"0:7");
    }

    #[test]
    fn test_generated_only_entry() {
        let entry = MappingEntry::new(1, 1);
        assert!(!entry.has_source());
        assert_eq!(entry.source_url(), None);
        assert_eq!(entry.source_line(), 0);
        assert_eq!(entry.name(), None);
    }

    #[test]
    fn test_range_ordered() {
        let range = TextRange::ordered(Position::new(4, 0), Position::new(1, 9));
        assert_eq!(range.start, Position::new(1, 9));
        assert!(range.contains(Position::new(2, 0)));
        assert!(!range.contains(Position::new(4, 0)));
        assert_eq!(range.to_string(), "1:9-4:0");
    }
}
