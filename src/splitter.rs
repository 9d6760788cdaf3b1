use memchr::Memchr2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Terminator {
    /// `,`
    Record,
    /// `;`
    Line,
    End,
}

/// One piece of the `mappings` field, delimited by `,`, `;` or the end of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Segment<'a> {
    pub text: &'a str,
    pub terminator: Terminator,
}

#[derive(Debug)]
pub(crate) struct MappingSplitter<'a> {
    string: &'a str,
    cur_start: usize,
    memchr: Memchr2<'a>,
}

impl<'a> MappingSplitter<'a> {
    pub fn new(string: &'a str) -> Self {
        Self {
            string,
            memchr: memchr::memchr2_iter(b';', b',', string.as_bytes()),
            cur_start: 0,
        }
    }
}

impl<'a> Iterator for MappingSplitter<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (cur_end, terminator) = match self.memchr.next() {
            None => {
                if self.cur_start > self.string.len() {
                    return None;
                }
                (self.string.len(), Terminator::End)
            }
            Some(end) if self.string.as_bytes()[end] == b';' => (end, Terminator::Line),
            Some(end) => (end, Terminator::Record),
        };
        // both separators are ASCII, so every split point is a char boundary
        let text = &self.string[self.cur_start..cur_end];
        self.cur_start = cur_end + 1;
        Some(Segment { text, terminator })
    }
}

#[cfg(test)]
mod tests {
    use super::{MappingSplitter, Terminator};

    #[test]
    fn test_splitter() {
        let text = ";AAAA,CAAC;;EACE,G";

        let result = MappingSplitter::new(text)
            .map(|s| {
                let end = match s.terminator {
                    Terminator::Record => ",",
                    Terminator::Line => ";",
                    Terminator::End => "$",
                };
                format!("[{}{end}]", s.text)
            })
            .collect::<String>();
        insta::assert_snapshot!(result, @"[;][AAAA,][CAAC;][;][EACE,][G$]");
    }

    #[test]
    fn test_splitter_trailing_separator() {
        let segments = MappingSplitter::new("AAAA;").collect::<Vec<_>>();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].terminator, Terminator::Line);
        assert_eq!(segments[1].text, "");
        assert_eq!(segments[1].terminator, Terminator::End);
    }

    #[test]
    fn test_splitter_empty() {
        let segments = MappingSplitter::new("").collect::<Vec<_>>();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "");
        assert_eq!(segments[0].terminator, Terminator::End);
    }
}
