//! Brace role: empty aggregate, designated initializer, aggregate, or scope.

use super::{is_designator_period, BraceRole, CLASSIFIER_WINDOW};
use crate::cursor::Cursor;
use crate::matcher::find_match;
use crate::token::{Token, TokenKind};

/// Classifies the brace at `index`.
///
/// A closing brace inherits the category of its opener; an unmatched closer
/// is a scope brace.
#[must_use]
pub fn classify_brace(tokens: &[Token], index: usize) -> BraceRole {
    match tokens.get(index).map(|t| t.kind) {
        Some(TokenKind::LBrace) => classify_open(tokens, index),
        Some(TokenKind::RBrace) => match find_match(tokens, index) {
            Ok(Some(open)) => classify_open(tokens, open),
            _ => BraceRole::ScopeBrace,
        },
        _ => BraceRole::ScopeBrace,
    }
}

fn classify_open(tokens: &[Token], index: usize) -> BraceRole {
    let cursor = Cursor::at(tokens, index);

    if cursor
        .peek_next(1)
        .is_some_and(|t| t.kind == TokenKind::RBrace)
    {
        return BraceRole::EmptyAggregate;
    }
    if has_designator(tokens, index) {
        return BraceRole::DesignatedInitializerBrace;
    }
    if follows_initializer_introducer(tokens, index) {
        return BraceRole::AggregateInitializerBrace;
    }
    BraceRole::ScopeBrace
}

/// Looks ahead for `. name =` before a `;` or the matching `}`.
fn has_designator(tokens: &[Token], open: usize) -> bool {
    let close = find_match(tokens, open).ok().flatten();
    let mut cursor = Cursor::at(tokens, open);

    for _ in 0..CLASSIFIER_WINDOW {
        let Some(token) = cursor.advance_significant() else {
            return false;
        };
        if token.kind == TokenKind::Semicolon || Some(token.index) == close {
            return false;
        }
        if token.kind == TokenKind::Period
            && is_designator_period(tokens, token.index)
            && cursor.peek_next(1).is_some_and(|t| t.kind.is_name())
            && cursor
                .peek_next(2)
                .is_some_and(|t| t.kind == TokenKind::Assign)
        {
            return true;
        }
    }
    false
}

/// Whether the `{` at `index` follows a token that introduces an initializer.
///
/// That is `=` (with a declarator name before it), `return`, `(`, `[`, `,`
/// or another `{`.
#[must_use]
pub fn follows_initializer_introducer(tokens: &[Token], index: usize) -> bool {
    let cursor = Cursor::at(tokens, index);
    let Some(prev) = cursor.peek_prev(1) else {
        return false;
    };

    match prev.kind {
        TokenKind::Return
        | TokenKind::LParen
        | TokenKind::LBracket
        | TokenKind::Comma
        | TokenKind::LBrace => true,
        TokenKind::Assign => {
            let mut back = Cursor::at(tokens, prev.index);
            for _ in 0..CLASSIFIER_WINDOW {
                match back.retreat_significant().map(|t| t.kind) {
                    Some(TokenKind::Identifier) => return true,
                    Some(TokenKind::Semicolon | TokenKind::LBrace | TokenKind::RBrace) | None => {
                        return false;
                    }
                    Some(_) => {}
                }
            }
            false
        }
        _ => false,
    }
}
