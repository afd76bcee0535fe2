//! Double-ampersand role: move parameter, rvalue reference, or logical AND.

use super::{AmpersandRole, CLASSIFIER_WINDOW};
use crate::cursor::Cursor;
use crate::matcher::DelimiterDepths;
use crate::token::{Token, TokenKind};

/// Classifies the `&&` at `index`.
#[must_use]
pub fn classify_double_ampersand(tokens: &[Token], index: usize) -> AmpersandRole {
    let cursor = Cursor::at(tokens, index);
    if cursor.current().map(|t| t.kind) != Some(TokenKind::AndAnd) {
        return AmpersandRole::LogicalAnd;
    }
    let prev = |n| cursor.peek_prev(n);

    if let (Some(param_type), Some(open), Some(owner)) = (prev(1), prev(2), prev(3)) {
        if param_type.kind.is_name()
            && open.kind == TokenKind::LParen
            && owner.kind.is_name()
            && param_type.text == owner.text
        {
            return AmpersandRole::MoveConstructorParameter;
        }
        if param_type.kind.is_name()
            && open.kind == TokenKind::LParen
            && owner.kind == TokenKind::Assign
            && prev(4).is_some_and(|t| t.text == "operator")
        {
            return AmpersandRole::MoveAssignmentParameter;
        }
    }

    let declarator_follows = cursor.peek_next(1).is_some_and(|t| {
        t.kind.is_name()
            || matches!(
                t.kind,
                TokenKind::RParen | TokenKind::Comma | TokenKind::Ellipsis
            )
    });
    if declarator_follows && in_declarator_list(&cursor) {
        return AmpersandRole::RvalueReference;
    }

    AmpersandRole::LogicalAnd
}

/// Whether the nearest enclosing `(` opens a parameter list.
///
/// Control-statement conditions never do. A function-name or lambda
/// introducer owner does, as does a `&&` directly after a template closer.
/// An `=` between the parenthesis and the `&&` means a default argument.
fn in_declarator_list(cursor: &Cursor<'_>) -> bool {
    let after_template = cursor
        .peek_prev(1)
        .is_some_and(|t| matches!(t.kind, TokenKind::Gt | TokenKind::Shr));
    let mut back = cursor.fork();
    let mut depths = DelimiterDepths::default();
    let mut in_own_parameter = true;

    for _ in 0..CLASSIFIER_WINDOW {
        let Some(token) = back.retreat_significant() else {
            return false;
        };
        if depths.is_top_level() {
            match token.kind {
                TokenKind::Semicolon | TokenKind::LBrace | TokenKind::LBracket => return false,
                TokenKind::Assign if in_own_parameter => return false,
                TokenKind::Comma => in_own_parameter = false,
                TokenKind::LParen => {
                    return match back.peek_prev(1).map(|t| t.kind) {
                        Some(kind) if kind.is_control() => false,
                        Some(TokenKind::FunctionName | TokenKind::RBracket) => true,
                        _ => after_template,
                    };
                }
                _ => {}
            }
        }
        depths.unapply(token.kind);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn roles(source: &str) -> Vec<AmpersandRole> {
        let stream = tokenize(source);
        stream
            .iter()
            .filter(|t| t.kind == TokenKind::AndAnd)
            .map(|t| classify_double_ampersand(&stream, t.index))
            .collect()
    }

    #[test]
    fn test_move_constructor_regardless_of_spacing() {
        for source in [
            "class Foo {\n  Foo(Foo&& other);\n};",
            "class Foo {\n  Foo(Foo && other);\n};",
            "class Foo {\n  Foo( Foo  &&other );\n};",
        ] {
            assert_eq!(roles(source), vec![AmpersandRole::MoveConstructorParameter]);
        }
    }

    #[test]
    fn test_move_assignment() {
        assert_eq!(
            roles("class Foo {\n  Foo& operator=(Foo&& other);\n};"),
            vec![AmpersandRole::MoveAssignmentParameter]
        );
    }

    #[test]
    fn test_rvalue_reference_parameter() {
        assert_eq!(
            roles("void consume(std::string&& value, int n);"),
            vec![AmpersandRole::RvalueReference]
        );
        assert_eq!(
            roles("void sink(Widget&&);"),
            vec![AmpersandRole::RvalueReference]
        );
        assert_eq!(
            roles("auto f = [](Widget&& w) { use(w); };"),
            vec![AmpersandRole::RvalueReference]
        );
    }

    #[test]
    fn test_forwarding_reference_after_template_closer() {
        assert_eq!(
            roles("void f() { call(std::vector<int>&& v); }"),
            vec![AmpersandRole::RvalueReference]
        );
    }

    #[test]
    fn test_conditions_are_logical_and() {
        assert_eq!(roles("void f() { if (a&&b) {} }"), vec![AmpersandRole::LogicalAnd]);
        assert_eq!(
            roles("void f() { while (x && y) {} }"),
            vec![AmpersandRole::LogicalAnd]
        );
        assert_eq!(
            roles("void f() { if (ready(a) && b) {} }"),
            vec![AmpersandRole::LogicalAnd]
        );
    }

    #[test]
    fn test_expressions_are_logical_and() {
        assert_eq!(roles("void f() { ok = a && b; }"), vec![AmpersandRole::LogicalAnd]);
        assert_eq!(roles("void f() { g(a && b); }"), vec![AmpersandRole::LogicalAnd]);
        assert_eq!(
            roles("void f(bool x = a && b);"),
            vec![AmpersandRole::LogicalAnd]
        );
    }
}
