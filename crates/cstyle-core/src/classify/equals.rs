//! Equals-sign role: lambda capture, designated field, default brace, or plain.

use super::{is_designator_period, EqualsRole, CLASSIFIER_WINDOW};
use crate::cursor::Cursor;
use crate::matcher::DelimiterDepths;
use crate::token::{Token, TokenKind};

/// Classifies the `=` at `index`.
#[must_use]
pub fn classify_equals(tokens: &[Token], index: usize) -> EqualsRole {
    let cursor = Cursor::at(tokens, index);
    if cursor.current().map(|t| t.kind) != Some(TokenKind::Assign) {
        return EqualsRole::PlainAssignment;
    }
    let prev = cursor.peek_prev(1).map(|t| t.kind);
    let next = cursor.peek_next(1).map(|t| t.kind);

    if prev == Some(TokenKind::LBracket)
        && matches!(next, Some(TokenKind::RBracket | TokenKind::Comma))
    {
        return EqualsRole::LambdaCaptureDefault;
    }

    let designated = prev.is_some_and(TokenKind::is_name)
        && cursor
            .peek_prev(2)
            .is_some_and(|t| is_designator_period(tokens, t.index))
        && inside_braces(&cursor);
    if designated {
        return EqualsRole::DesignatedInitializerField;
    }

    if next == Some(TokenKind::LBrace) && in_parameter_position(&cursor) {
        return EqualsRole::DefaultParameterBraceInit;
    }

    EqualsRole::PlainAssignment
}

/// Finds an unmatched `{` before any `;`.
fn inside_braces(cursor: &Cursor<'_>) -> bool {
    let mut back = cursor.fork();
    let mut depths = DelimiterDepths::default();
    for _ in 0..CLASSIFIER_WINDOW {
        let Some(token) = back.retreat_significant() else {
            return false;
        };
        if depths.is_top_level() {
            match token.kind {
                TokenKind::LBrace => return true,
                TokenKind::Semicolon => return false,
                _ => {}
            }
        }
        depths.unapply(token.kind);
    }
    false
}

/// Finds a `(` or `,` at depth zero before any `;`, `{` or `}`.
fn in_parameter_position(cursor: &Cursor<'_>) -> bool {
    let mut back = cursor.fork();
    let mut depths = DelimiterDepths::default();
    for _ in 0..CLASSIFIER_WINDOW {
        let Some(token) = back.retreat_significant() else {
            return false;
        };
        if depths.is_top_level() {
            match token.kind {
                TokenKind::LParen | TokenKind::Comma => return true,
                TokenKind::Semicolon | TokenKind::LBrace | TokenKind::RBrace => return false,
                _ => {}
            }
        }
        depths.unapply(token.kind);
    }
    false
}
