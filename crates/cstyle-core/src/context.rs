//! Context types for rule execution.

use std::path::{Path, PathBuf};

use crate::token::Token;
use crate::types::Location;

/// Extensions treated as headers.
const HEADER_EXTENSIONS: &[&str] = &["h", "hh", "hpp", "hxx", "inl"];

/// Context provided to rules for one file.
///
/// Holds the file text, its token stream, and the settings that affect
/// column arithmetic.
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Path to the file as discovered.
    pub path: &'a Path,
    /// Path relative to the project root.
    pub relative_path: PathBuf,
    /// File contents as a string.
    pub content: &'a str,
    /// All tokens of the file, trivia included.
    pub tokens: &'a [Token],
    /// Columns per tab.
    pub tab_width: usize,
    /// Whether the file is a header.
    pub is_header: bool,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    #[must_use]
    pub fn new(
        path: &'a Path,
        content: &'a str,
        tokens: &'a [Token],
        root: &Path,
        tab_width: usize,
    ) -> Self {
        let relative_path = path
            .strip_prefix(root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf);

        Self {
            path,
            relative_path,
            content,
            tokens,
            tab_width,
            is_header: Self::detect_header(path),
        }
    }

    /// Detects a header file from its extension.
    fn detect_header(path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| HEADER_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
    }

    /// Location covering the token at `index`.
    #[must_use]
    pub fn location(&self, index: usize) -> Location {
        self.tokens.get(index).map_or_else(
            || Location::new(self.relative_path.clone(), 1, 1),
            |token| Location::from_token(self.relative_path.clone(), token),
        )
    }

    /// Location of a 1-indexed line and column, with a span of `length` bytes.
    #[must_use]
    pub fn location_at(&self, line: usize, column: usize, length: usize) -> Location {
        Location::new(self.relative_path.clone(), line, column)
            .with_span(self.offset_for(line, column), length)
    }

    /// Calculates byte offset for a given line and column.
    ///
    /// Both are 1-indexed; the column counts bytes. Returns the end of the
    /// content when out of bounds.
    #[must_use]
    pub fn offset_for(&self, line: usize, column: usize) -> usize {
        if line == 0 {
            return 0;
        }

        let mut offset = 0;
        for (i, line_content) in self.content.split_inclusive('\n').enumerate() {
            if i + 1 == line {
                return offset + column.saturating_sub(1);
            }
            offset += line_content.len();
        }

        offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    #[test]
    fn test_detect_header() {
        assert!(FileContext::detect_header(Path::new("include/widget.h")));
        assert!(FileContext::detect_header(Path::new("src/widget.HPP")));
        assert!(!FileContext::detect_header(Path::new("src/widget.cpp")));
        assert!(!FileContext::detect_header(Path::new("Makefile")));
    }

    #[test]
    fn test_relative_path_and_location() {
        let content = "int x;\r\nint y;";
        let stream = tokenize(content);
        let ctx = FileContext::new(
            Path::new("/proj/src/a.c"),
            content,
            &stream,
            Path::new("/proj"),
            4,
        );
        assert_eq!(ctx.relative_path, PathBuf::from("src/a.c"));
        assert!(!ctx.is_header);

        let y = stream.iter().position(|t| t.text == "y").unwrap();
        let location = ctx.location(y);
        assert_eq!((location.line, location.column, location.offset), (2, 5, 12));
    }

    #[test]
    fn test_offset_calculation() {
        let content = "line1\nline2\r\nline3";
        let stream = tokenize(content);
        let ctx = FileContext::new(Path::new("t.c"), content, &stream, Path::new("."), 4);

        assert_eq!(ctx.offset_for(1, 1), 0);
        assert_eq!(ctx.offset_for(2, 3), 8);
        assert_eq!(ctx.offset_for(3, 1), 13);
    }
}
