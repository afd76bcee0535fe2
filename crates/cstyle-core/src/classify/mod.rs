//! Classification of locally ambiguous constructs.
//!
//! Every classifier is a pure function of `(tokens, index)`: it builds its own
//! cursor, looks at most [`CLASSIFIER_WINDOW`] significant tokens in either
//! direction, and never fails. When the window runs out or the evidence is
//! inconclusive, the least specific category wins.

mod ampersand;
mod brace;
mod equals;

pub use ampersand::classify_double_ampersand;
pub use brace::{classify_brace, follows_initializer_introducer};
pub use equals::classify_equals;

use serde::Serialize;

use crate::cursor::Cursor;
use crate::matcher::DelimiterDepths;
use crate::token::{Token, TokenKind};

/// Maximum number of significant tokens a classifier inspects per direction.
pub const CLASSIFIER_WINDOW: usize = 15;

/// Role of a `&&` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AmpersandRole {
    /// `Name(Name&& other)` with both names equal.
    MoveConstructorParameter,
    /// `operator=(Name&& other)`.
    MoveAssignmentParameter,
    /// `Type&& name` in a parameter list.
    RvalueReference,
    /// Boolean conjunction.
    LogicalAnd,
}

impl AmpersandRole {
    /// Returns true for the move/rvalue family, which binds to its type.
    #[must_use]
    pub fn is_reference(self) -> bool {
        !matches!(self, Self::LogicalAnd)
    }
}

/// Role of an `=` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EqualsRole {
    /// `[=]` in a lambda introducer.
    LambdaCaptureDefault,
    /// `.field=value` inside braces.
    DesignatedInitializerField,
    /// `param = {}` in a parameter list.
    DefaultParameterBraceInit,
    /// Anything else.
    PlainAssignment,
}

/// Role of a `{` or `}` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BraceRole {
    /// `{}`.
    EmptyAggregate,
    /// Braces holding `.field=value` designators.
    DesignatedInitializerBrace,
    /// Braces after `=`, `return`, `(`, `[`, `,` or `{`.
    AggregateInitializerBrace,
    /// Block or body braces.
    ScopeBrace,
}

impl BraceRole {
    /// Returns true for every initializer category.
    #[must_use]
    pub fn is_initializer(self) -> bool {
        !matches!(self, Self::ScopeBrace)
    }
}

/// Role of a `,` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CommaRole {
    /// Separator between initializer-list elements.
    InitializerSeparator,
    /// Any other comma.
    Ordinary,
}

/// Classifies the comma at `index`.
#[must_use]
pub fn classify_comma(tokens: &[Token], index: usize) -> CommaRole {
    let is_comma = tokens.get(index).is_some_and(|t| t.kind == TokenKind::Comma);
    if is_comma && in_initializer_list(tokens, index) {
        CommaRole::InitializerSeparator
    } else {
        CommaRole::Ordinary
    }
}

/// Whether the token at `index` sits directly inside an initializer list.
///
/// Scans backward with depth tracking. A designator period or a non-scope
/// `{` at depth zero means yes; an enclosing `(` or `[`, a `;`, or running
/// out of window means no.
#[must_use]
pub fn in_initializer_list(tokens: &[Token], index: usize) -> bool {
    let mut cursor = Cursor::at(tokens, index);
    let mut depths = DelimiterDepths::default();

    for _ in 0..CLASSIFIER_WINDOW {
        let Some(token) = cursor.retreat_significant() else {
            return false;
        };
        if depths.is_top_level() {
            match token.kind {
                TokenKind::Semicolon | TokenKind::LParen | TokenKind::LBracket => return false,
                TokenKind::Period if is_designator_period(tokens, token.index) => return true,
                TokenKind::LBrace => return classify_brace(tokens, token.index).is_initializer(),
                _ => {}
            }
        }
        depths.unapply(token.kind);
    }
    false
}

/// A `.` not preceded by an identifier, `]` or `)`, i.e. not member access.
#[must_use]
pub fn is_designator_period(tokens: &[Token], index: usize) -> bool {
    let cursor = Cursor::at(tokens, index);
    let is_period = cursor.current().is_some_and(|t| t.kind == TokenKind::Period);
    is_period
        && cursor.peek_prev(1).is_some_and(|prev| {
            !prev.kind.is_name() && !matches!(prev.kind, TokenKind::RBracket | TokenKind::RParen)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn nth_of(tokens: &[Token], kind: TokenKind, n: usize) -> usize {
        tokens.iter().filter(|t| t.kind == kind).nth(n).unwrap().index
    }

    #[test]
    fn test_designated_initializer_roles() {
        let stream = tokenize("Point p = {.x=10, .y=20};");
        let open = nth_of(&stream, TokenKind::LBrace, 0);
        assert_eq!(classify_brace(&stream, open), BraceRole::DesignatedInitializerBrace);
        let close = nth_of(&stream, TokenKind::RBrace, 0);
        assert_eq!(classify_brace(&stream, close), BraceRole::DesignatedInitializerBrace);

        for n in 1..=2 {
            let eq = nth_of(&stream, TokenKind::Assign, n);
            assert_eq!(classify_equals(&stream, eq), EqualsRole::DesignatedInitializerField);
        }
        let comma = nth_of(&stream, TokenKind::Comma, 0);
        assert_eq!(classify_comma(&stream, comma), CommaRole::InitializerSeparator);
    }

    #[test]
    fn test_block_comments_inside_the_window() {
        let stream = tokenize("Point p = /* origin */ {/* x */ .x=10, /* y */ .y=20};");
        let open = nth_of(&stream, TokenKind::LBrace, 0);
        assert_eq!(classify_brace(&stream, open), BraceRole::DesignatedInitializerBrace);
        let eq = nth_of(&stream, TokenKind::Assign, 2);
        assert_eq!(classify_equals(&stream, eq), EqualsRole::DesignatedInitializerField);
        let comma = nth_of(&stream, TokenKind::Comma, 0);
        assert_eq!(classify_comma(&stream, comma), CommaRole::InitializerSeparator);

        let stream = tokenize("void f() {\n    x /* old */ = a && /* b */ c;\n}");
        let eq = nth_of(&stream, TokenKind::Assign, 0);
        assert_eq!(classify_equals(&stream, eq), EqualsRole::PlainAssignment);
        let and = nth_of(&stream, TokenKind::AndAnd, 0);
        assert_eq!(classify_double_ampersand(&stream, and), AmpersandRole::LogicalAnd);
    }

    #[test]
    fn test_aggregate_comma_is_separator() {
        let stream = tokenize("Type var = {a, b};");
        let comma = nth_of(&stream, TokenKind::Comma, 0);
        assert_eq!(classify_comma(&stream, comma), CommaRole::InitializerSeparator);
    }

    #[test]
    fn test_call_comma_is_ordinary() {
        let stream = tokenize("void f() { g(a, b); }");
        let comma = nth_of(&stream, TokenKind::Comma, 0);
        assert_eq!(classify_comma(&stream, comma), CommaRole::Ordinary);
    }

    #[test]
    fn test_comma_in_call_inside_initializer_is_ordinary() {
        let stream = tokenize("P p = {.x=f(a, b)};");
        let comma = nth_of(&stream, TokenKind::Comma, 0);
        assert_eq!(classify_comma(&stream, comma), CommaRole::Ordinary);
    }

    #[test]
    fn test_block_comma_is_ordinary() {
        let stream = tokenize("Rect r {\n    x, y\n};");
        let comma = nth_of(&stream, TokenKind::Comma, 0);
        assert_eq!(classify_comma(&stream, comma), CommaRole::Ordinary);
    }

    #[test]
    fn test_member_access_period_is_not_designator() {
        let stream = tokenize("obj.field = {.x=1}; a[0].y; f().z;");
        let periods: Vec<bool> = stream
            .iter()
            .filter(|t| t.kind == TokenKind::Period)
            .map(|t| is_designator_period(&stream, t.index))
            .collect();
        assert_eq!(periods, vec![false, true, false, false]);
    }

    #[test]
    fn test_classification_is_pure() {
        let stream = tokenize("Point p = {.x=10, .y=20}; if (a&&b) {}");
        for token in stream.iter() {
            let first = (
                classify_brace(&stream, token.index),
                classify_equals(&stream, token.index),
                classify_comma(&stream, token.index),
                classify_double_ampersand(&stream, token.index),
            );
            let second = (
                classify_brace(&stream, token.index),
                classify_equals(&stream, token.index),
                classify_comma(&stream, token.index),
                classify_double_ampersand(&stream, token.index),
            );
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_wrong_kind_gets_least_specific_role() {
        let stream = tokenize("x;");
        assert_eq!(classify_brace(&stream, 0), BraceRole::ScopeBrace);
        assert_eq!(classify_equals(&stream, 0), EqualsRole::PlainAssignment);
        assert_eq!(classify_comma(&stream, 0), CommaRole::Ordinary);
        assert_eq!(classify_double_ampersand(&stream, 0), AmpersandRole::LogicalAnd);
        assert_eq!(classify_brace(&stream, 99), BraceRole::ScopeBrace);
    }
}
