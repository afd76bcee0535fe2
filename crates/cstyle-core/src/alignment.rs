//! Column alignment of delimited lists that span several lines.

use serde::Serialize;

use crate::cursor::Cursor;
use crate::error::InvariantError;
use crate::matcher::find_match;
use crate::token::{Token, TokenKind};
use crate::utils::columns::{line_indent, visual_column};

/// A continuation line whose first token is not under the list's first element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Misalignment {
    /// Index of the first token on the offending line.
    pub token_index: usize,
    /// Its line.
    pub line: usize,
    /// Its tab-expanded column.
    pub found_column: usize,
    /// Column of the list's first element.
    pub expected_column: usize,
    /// Index of the list's first element.
    pub anchor_index: usize,
}

/// Checks that every continuation line of the list opened at `open` starts
/// in the column of the list's first element.
///
/// A continuation indented exactly one tab stop past the first element's
/// line switches the list to block-indent style and ends the check. A
/// continuation preceded by a lone tab character is accepted as is.
/// Unmatched openers are ignored.
///
/// # Errors
///
/// Returns [`InvariantError::NotADelimiter`] if `open` is not a delimiter.
pub fn check_alignment(
    tokens: &[Token],
    open: usize,
    tab_width: usize,
    mut sink: impl FnMut(Misalignment),
) -> Result<(), InvariantError> {
    let Some(close) = find_match(tokens, open)? else {
        return Ok(());
    };
    let cursor = Cursor::at(tokens, open);
    let Some(anchor) = cursor.peek_next(1).filter(|t| t.index < close) else {
        return Ok(());
    };

    let expected_column = visual_column(tokens, anchor.index, tab_width);
    let anchor_indent = line_indent(tokens, anchor.index, tab_width);
    let mut line = anchor.line;
    let mut walk = Cursor::at(tokens, anchor.index);

    while let Some(token) = walk.advance_significant() {
        if token.index >= close {
            break;
        }
        if token.line == line {
            continue;
        }
        if line_indent(tokens, token.index, tab_width) == anchor_indent + tab_width {
            break;
        }
        line = token.line;

        let found_column = visual_column(tokens, token.index, tab_width);
        let tab_override = walk
            .peek_raw_back(1)
            .is_some_and(|t| t.kind == TokenKind::Whitespace && t.text == "\t");
        if found_column != expected_column && !tab_override {
            sink(Misalignment {
                token_index: token.index,
                line: token.line,
                found_column,
                expected_column,
                anchor_index: anchor.index,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn misalignments(source: &str) -> Vec<Misalignment> {
        let stream = tokenize(source);
        let open = stream
            .iter()
            .position(|t| t.kind == TokenKind::LParen)
            .unwrap();
        let mut found = Vec::new();
        check_alignment(&stream, open, 4, |m| found.push(m)).unwrap();
        found
    }

    #[test]
    fn test_aligned_continuation() {
        assert!(misalignments("void function(int k, int j,\n              int pp)\n{\n}\n").is_empty());
    }

    #[test]
    fn test_anchor_column_and_neighbours() {
        // `int k` starts in column 15.
        for (spaces, ok) in [(13, false), (14, true), (15, false)] {
            let source = format!("void function(int k, int j,\n{}int pp);\n", " ".repeat(spaces));
            let found = misalignments(&source);
            assert_eq!(found.is_empty(), ok, "indent {spaces}");
            if let Some(m) = found.first() {
                assert_eq!(m.expected_column, 15);
                assert_eq!(m.found_column, spaces + 1);
                assert_eq!(m.line, 2);
            }
        }
    }

    #[test]
    fn test_blank_line_inside_list() {
        assert_eq!(
            misalignments("void function(int k, int j,\n\n             int pp)\n{\n}\n").len(),
            1
        );
    }

    #[test]
    fn test_single_line_list() {
        assert!(misalignments("void function(int k, int j, int pp)\n{\n}\n").is_empty());
    }

    #[test]
    fn test_block_indent_style_stops_check() {
        let source = "void function(int k,\n    int j,\n    int m)\n{\n}\n";
        assert!(misalignments(source).is_empty());
    }

    #[test]
    fn test_space_after_paren_anchors_on_first_element() {
        let source = format!("void aaaaaaaaaaaaa( int a,\n{}int b);\n", " ".repeat(20));
        assert!(misalignments(&source).is_empty());
    }

    #[test]
    fn test_tabs_expand_before_comparison() {
        // `int a` is at column 12: four for the tab, then "void f(".
        assert!(misalignments("\tvoid f(int a,\n\t       int b);\n").is_empty());
        assert_eq!(misalignments("\tvoid f(int a,\n\t      int b);\n").len(), 1);
    }

    #[test]
    fn test_lone_tab_is_an_override() {
        assert!(misalignments("    void function(int k,\n\tint j);\n").is_empty());
    }

    #[test]
    fn test_each_line_reported_once() {
        let found = misalignments("void f(int a,\n   int b, int c,\n   int d);\n");
        assert_eq!(found.iter().map(|m| m.line).collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn test_unmatched_and_non_delimiter() {
        let stream = tokenize("void f(int a,\n  int b");
        let open = stream.iter().position(|t| t.kind == TokenKind::LParen).unwrap();
        assert!(check_alignment(&stream, open, 4, |_| panic!("no report")).is_ok());
        assert!(matches!(
            check_alignment(&stream, 0, 4, |_| {}),
            Err(InvariantError::NotADelimiter { .. })
        ));
    }
}
