//! Word List - line-oriented source text

use std::fs;
use std::path::Path;

use crate::error::{FixtureError, Result};

/// Line separator stripped from the end of each line.
pub const SEPARATOR: u8 = b'\n';

/// Ordered lines of a source, held only for the duration of one encode.
///
/// Lines borrow from the loaded source buffer and exclude their separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordList<'a> {
    lines: Vec<&'a [u8]>,
}

impl<'a> WordList<'a> {
    /// Split `data` into lines, stripping exactly one trailing `\n` per line.
    ///
    /// A trailing separator terminates the last line rather than opening an
    /// empty one; a final line without a separator is still a line.
    pub fn parse(data: &'a [u8]) -> Self {
        let lines = data
            .split_inclusive(|b| *b == SEPARATOR)
            .map(|line| line.strip_suffix(&[SEPARATOR]).unwrap_or(line))
            .collect();
        Self { lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[&'a [u8]] {
        &self.lines
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a [u8]> + '_ {
        self.lines.iter().copied()
    }
}

/// Read the whole source file into memory.
pub fn load_source(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| FixtureError::SourceNotFound {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strips_single_separator() {
        let list = WordList::parse(b"alpha\nbeta\ngamma\n");
        assert_eq!(list.lines(), &[&b"alpha"[..], &b"beta"[..], &b"gamma"[..]]);
    }

    #[test]
    fn test_parse_keeps_unterminated_last_line() {
        let list = WordList::parse(b"alpha\nbeta");
        assert_eq!(list.lines(), &[&b"alpha"[..], &b"beta"[..]]);
    }

    #[test]
    fn test_parse_keeps_empty_lines_and_whitespace() {
        let list = WordList::parse(b"\n  pad \n\nx\r\n");
        assert_eq!(list.lines(), &[&b""[..], &b"  pad "[..], &b""[..], &b"x\r"[..]]);
    }

    #[test]
    fn test_parse_empty_source() {
        let list = WordList::parse(b"");
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
    }

    #[test]
    fn test_load_missing_source() {
        let err = load_source(Path::new("/nonexistent/words.txt")).unwrap_err();
        assert!(matches!(err, FixtureError::SourceNotFound { .. }));
    }
}
