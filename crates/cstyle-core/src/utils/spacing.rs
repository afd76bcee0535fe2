//! Raw-token spacing predicates.
//!
//! "Padded" means a same-line whitespace token sits next to the token.
//! "Separated" also accepts a line break or continuation, so a token at the
//! start or end of a line counts as spaced. "Single-spaced" is separated by
//! exactly one space character, or by a line boundary.

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};

fn is_gap(token: &Token) -> bool {
    matches!(
        token.kind,
        TokenKind::Whitespace | TokenKind::Newline | TokenKind::LineContinuation
    )
}

/// Whitespace directly before the token at `index`.
#[must_use]
pub fn padded_before(tokens: &[Token], index: usize) -> bool {
    Cursor::at(tokens, index)
        .peek_raw_back(1)
        .is_some_and(|t| t.kind == TokenKind::Whitespace)
}

/// Whitespace directly after the token at `index`.
#[must_use]
pub fn padded_after(tokens: &[Token], index: usize) -> bool {
    Cursor::at(tokens, index)
        .peek_raw(1)
        .is_some_and(|t| t.kind == TokenKind::Whitespace)
}

/// Whitespace or a line boundary before the token at `index`.
///
/// The start of the stream counts as separated.
#[must_use]
pub fn separated_before(tokens: &[Token], index: usize) -> bool {
    Cursor::at(tokens, index).peek_raw_back(1).map_or(true, is_gap)
}

/// Whitespace or a line boundary after the token at `index`.
///
/// The end of the stream counts as separated.
#[must_use]
pub fn separated_after(tokens: &[Token], index: usize) -> bool {
    Cursor::at(tokens, index).peek_raw(1).map_or(true, is_gap)
}

fn is_line_boundary(token: &Token) -> bool {
    matches!(token.kind, TokenKind::Newline | TokenKind::LineContinuation)
}

/// Exactly one space, or a line boundary, before the token at `index`.
///
/// Indentation in front of a token that starts its line is not counted.
#[must_use]
pub fn single_spaced_before(tokens: &[Token], index: usize) -> bool {
    let cursor = Cursor::at(tokens, index);
    match cursor.peek_raw_back(1) {
        None => true,
        Some(t) if is_line_boundary(t) => true,
        Some(t) if t.kind == TokenKind::Whitespace => {
            t.text == " " || cursor.peek_raw_back(2).map_or(true, is_line_boundary)
        }
        Some(_) => false,
    }
}

/// Exactly one space, or a line boundary, after the token at `index`.
///
/// Whitespace running to the end of the line is not counted.
#[must_use]
pub fn single_spaced_after(tokens: &[Token], index: usize) -> bool {
    let cursor = Cursor::at(tokens, index);
    match cursor.peek_raw(1) {
        None => true,
        Some(t) if is_line_boundary(t) => true,
        Some(t) if t.kind == TokenKind::Whitespace => {
            t.text == " " || cursor.peek_raw(2).map_or(true, is_line_boundary)
        }
        Some(_) => false,
    }
}
