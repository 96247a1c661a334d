//! Dialogue text files

use std::path::Path;

use super::{DialogueError, DialogueResult};

/// Lines of the active dialogue screen
///
/// Replaced wholesale on every transition, never edited in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogueBuffer {
    lines: Vec<String>,
}

impl DialogueBuffer {
    /// Split `text` into lines
    ///
    /// One entry per line; a trailing newline does not add an empty entry
    /// and `\r\n` endings are accepted.
    pub fn parse(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_owned).collect(),
        }
    }

    /// Read and split a dialogue file
    pub fn load(path: impl AsRef<Path>) -> DialogueResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| DialogueError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let buffer = Self::parse(&text);
        log::debug!("Read {} dialogue lines from {}", buffer.len(), path.display());
        Ok(buffer)
    }

    /// The lines, in file order
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True if there are no lines
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Characters across all lines
    pub fn character_count(&self) -> usize {
        crate::text::character_count(&self.lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_preserves_order() {
        let buffer = DialogueBuffer::parse("first\nsecond\nthird\n");
        assert_eq!(buffer.lines(), &["first", "second", "third"]);
    }

    #[test]
    fn test_missing_final_newline_adds_nothing() {
        assert_eq!(DialogueBuffer::parse("a\nb").len(), 2);
        assert_eq!(DialogueBuffer::parse("a\nb\n").len(), 2);
    }

    #[test]
    fn test_blank_lines_are_kept() {
        let buffer = DialogueBuffer::parse("a\n\nb\r\n");
        assert_eq!(buffer.lines(), &["a", "", "b"]);
        assert_eq!(buffer.character_count(), 2);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "One.\nTwo, with ünïcode.\nThree.").unwrap();

        let buffer = DialogueBuffer::load(file.path()).unwrap();
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.lines()[1], "Two, with ünïcode.");
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = DialogueBuffer::load(dir.path().join("nope"));
        assert!(matches!(result, Err(DialogueError::Io { .. })));
    }
}
