//! Tab-expanded column arithmetic over raw tokens.
//!
//! Every tab counts as `tab_width` columns, the same convention the
//! line-length check uses, so alignment and length agree on what a column is.

use crate::token::Token;

/// Display width of `text` with tabs expanded to `tab_width` columns.
#[must_use]
pub fn expanded_width(text: &str, tab_width: usize) -> usize {
    text.chars()
        .map(|c| if c == '\t' { tab_width } else { 1 })
        .sum()
}

/// Token index and byte offset within it where the line holding `index` starts.
fn line_start(tokens: &[Token], index: usize) -> (usize, usize) {
    for i in (0..index.min(tokens.len())).rev() {
        if let Some(pos) = tokens[i].text.rfind('\n') {
            return (i, pos + 1);
        }
    }
    (0, 0)
}

/// Visual column (1-indexed, tabs expanded) of the token at `index`.
#[must_use]
pub fn visual_column(tokens: &[Token], index: usize, tab_width: usize) -> usize {
    let (first, skip) = line_start(tokens, index);
    let mut width = 0;
    for (i, token) in tokens.iter().enumerate().take(index).skip(first) {
        let text = if i == first { &token.text[skip..] } else { &token.text };
        width += expanded_width(text, tab_width);
    }
    width + 1
}

/// Width of the leading whitespace on the line holding the token at `index`.
#[must_use]
pub fn line_indent(tokens: &[Token], index: usize, tab_width: usize) -> usize {
    let (first, skip) = line_start(tokens, index);
    let mut width = 0;
    for (i, token) in tokens.iter().enumerate().skip(first) {
        let text = if i == first { &token.text[skip..] } else { &token.text };
        for c in text.chars() {
            match c {
                ' ' => width += 1,
                '\t' => width += tab_width,
                _ => return width,
            }
        }
    }
    width
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn find(tokens: &[Token], text: &str) -> usize {
        tokens.iter().position(|t| t.text == text).unwrap()
    }

    #[test]
    fn test_expanded_width() {
        assert_eq!(expanded_width("\tab", 4), 6);
        assert_eq!(expanded_width("", 4), 0);
    }

    #[test]
    fn test_visual_column_expands_tabs() {
        let stream = tokenize("x;\n\tfoo(a,\n\t    b);");
        assert_eq!(visual_column(&stream, find(&stream, "foo"), 4), 5);
        assert_eq!(visual_column(&stream, find(&stream, "a"), 4), 9);
        assert_eq!(visual_column(&stream, find(&stream, "b"), 4), 9);
        assert_eq!(visual_column(&stream, find(&stream, "x"), 4), 1);
    }

    #[test]
    fn test_line_indent() {
        let stream = tokenize("a\n  \tb c\nd");
        assert_eq!(line_indent(&stream, find(&stream, "c"), 4), 6);
        assert_eq!(line_indent(&stream, find(&stream, "d"), 4), 0);
    }

    #[test]
    fn test_line_after_block_comment() {
        let stream = tokenize("/* one\n   two */ x");
        assert_eq!(visual_column(&stream, find(&stream, "x"), 4), 11);
        assert_eq!(line_indent(&stream, find(&stream, "x"), 4), 3);
    }
}
