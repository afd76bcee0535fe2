//! Rule to require spaces around binary operators and after separators.
//!
//! # Rationale
//!
//! `k=b` and `a&&b` hide the structure of an expression. Binary operators
//! get exactly one space (or a line boundary) on both sides, `,` and `;`
//! get whitespace after them.
//!
//! # Detected Patterns
//!
//! - `+ | << || && <= >= == =` and compound assignments without spaces,
//!   or with more than one space on a side
//! - `,` or `;` not followed by a space (`for (;;)` excepted)
//! - `++`/`--` glued to names on both sides (`k++c`)
//! - move and rvalue-reference `&&` with a space before it, or other than
//!   one space after
//! - spaces inside a lambda capture default (`[ = ]`)
//!
//! `/`, `%`, and unary `+` are not checked, nor are operator overload
//! names. Commas and `=` directly inside initializer lists are left to
//! `initializer-spacing`.

use cstyle_core::utils::{
    padded_after, padded_before, separated_after, separated_before, single_spaced_after,
    single_spaced_before,
};
use cstyle_core::{
    classify_double_ampersand, classify_equals, in_initializer_list, AmpersandRole, Cursor,
    EqualsRole, FileContext, InvariantError, Rule, RuleKind, Severity, Token, TokenKind,
    Violation,
};

/// Rule code for operator-spacing.
pub const CODE: &str = "CS002";

/// Rule name for operator-spacing.
pub const NAME: &str = "operator-spacing";

/// Binary operators that need whitespace on both sides.
const SPACED_OPERATORS: &[TokenKind] = &[
    TokenKind::Plus,
    TokenKind::Pipe,
    TokenKind::Shl,
    TokenKind::OrOr,
    TokenKind::AndAnd,
    TokenKind::LtEq,
    TokenKind::GtEq,
    TokenKind::Eq,
];

/// Requires spaces around binary operators.
#[derive(Debug, Clone)]
pub struct OperatorSpacing {
    severity: Severity,
}

impl Default for OperatorSpacing {
    fn default() -> Self {
        Self::new()
    }
}

impl OperatorSpacing {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    fn violation(&self, ctx: &FileContext<'_>, token: &Token, message: String) -> Violation {
        Violation::new(CODE, NAME, self.severity, ctx.location(token.index), message)
    }

    fn check_binary(&self, ctx: &FileContext<'_>, token: &Token) -> Option<Violation> {
        let tokens = ctx.tokens;
        let message = if !separated_before(tokens, token.index)
            || !separated_after(tokens, token.index)
        {
            format!("Provide spaces around operator '{}'", token.text)
        } else if !single_spaced_before(tokens, token.index)
            || !single_spaced_after(tokens, token.index)
        {
            format!("Use a single space around operator '{}'", token.text)
        } else {
            return None;
        };
        Some(self.violation(ctx, token, message))
    }

    fn check_and_and(
        &self,
        ctx: &FileContext<'_>,
        cursor: &Cursor<'_>,
        token: &Token,
    ) -> Vec<Violation> {
        let role = classify_double_ampersand(ctx.tokens, token.index);
        if !role.is_reference() {
            return self.check_binary(ctx, token).into_iter().collect();
        }

        let mut violations = Vec::new();
        if padded_before(ctx.tokens, token.index) {
            violations.push(self.violation(
                ctx,
                token,
                format!("No space allowed before {} '&&'", describe(role)),
            ));
        }
        let names_declarator = cursor.peek_next(1).is_some_and(|t| t.kind.is_name());
        if names_declarator && !separated_after(ctx.tokens, token.index) {
            violations.push(self.violation(
                ctx,
                token,
                format!("Provide a space after {} '&&'", describe(role)),
            ));
        } else if names_declarator && !single_spaced_after(ctx.tokens, token.index) {
            violations.push(self.violation(
                ctx,
                token,
                format!("Use a single space after {} '&&'", describe(role)),
            ));
        }
        violations
    }

    fn check_equals(&self, ctx: &FileContext<'_>, token: &Token) -> Option<Violation> {
        match classify_equals(ctx.tokens, token.index) {
            EqualsRole::LambdaCaptureDefault => (padded_before(ctx.tokens, token.index)
                || padded_after(ctx.tokens, token.index))
            .then(|| {
                self.violation(
                    ctx,
                    token,
                    "Do not use spaces in a lambda capture default".to_string(),
                )
            }),
            EqualsRole::DesignatedInitializerField | EqualsRole::DefaultParameterBraceInit => None,
            EqualsRole::PlainAssignment => self.check_binary(ctx, token),
        }
    }

    fn check_separator(
        &self,
        ctx: &FileContext<'_>,
        cursor: &Cursor<'_>,
        token: &Token,
    ) -> Option<Violation> {
        if separated_after(ctx.tokens, token.index) {
            return None;
        }
        let semicolon = |t: &Token| t.kind == TokenKind::Semicolon;
        if cursor.peek_raw(1).is_some_and(semicolon)
            || cursor.peek_raw_back(1).is_some_and(semicolon)
        {
            return None;
        }
        Some(self.violation(
            ctx,
            token,
            format!("Provide a space after '{}'", token.text),
        ))
    }

    fn check_step(
        &self,
        ctx: &FileContext<'_>,
        cursor: &Cursor<'_>,
        token: &Token,
    ) -> Option<Violation> {
        let before = cursor.peek_raw_back(1);
        let after = cursor.peek_raw(1);
        let name = |t: Option<&Token>| t.is_some_and(|t| t.kind.is_name());

        let glued_before = name(after)
            && before.is_some_and(|t| {
                !(t.kind.is_blank()
                    || t.kind.is_operator()
                    || matches!(
                        t.kind,
                        TokenKind::Comma | TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace
                    ))
            });
        if glued_before {
            return Some(self.violation(
                ctx,
                token,
                format!("Provide a space before operator '{}'", token.text),
            ));
        }

        let glued_after = name(before)
            && after.is_some_and(|t| {
                !(t.kind.is_blank()
                    || t.kind.is_operator()
                    || matches!(
                        t.kind,
                        TokenKind::Comma
                            | TokenKind::Semicolon
                            | TokenKind::RParen
                            | TokenKind::RBracket
                            | TokenKind::RBrace
                    ))
            });
        glued_after.then(|| {
            self.violation(
                ctx,
                token,
                format!("Provide a space after operator '{}'", token.text),
            )
        })
    }
}

fn describe(role: AmpersandRole) -> &'static str {
    match role {
        AmpersandRole::MoveConstructorParameter | AmpersandRole::MoveAssignmentParameter => {
            "move operator"
        }
        _ => "rvalue reference",
    }
}

/// Whether the token before an operator names an overload (`operator=`).
fn names_overload(cursor: &Cursor<'_>) -> bool {
    cursor.peek_prev(1).is_some_and(|t| {
        t.kind == TokenKind::Operator || (t.kind == TokenKind::FunctionName && t.text == "operator")
    })
}

/// Whether a `+` has no left operand.
fn is_unary(cursor: &Cursor<'_>) -> bool {
    cursor.peek_prev(1).map_or(true, |t| {
        t.kind.is_operator()
            || t.kind.is_opener()
            || matches!(
                t.kind,
                TokenKind::Comma | TokenKind::Semicolon | TokenKind::Colon | TokenKind::Return
            )
    })
}

impl Rule for OperatorSpacing {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires spaces around binary operators and after commas and semicolons"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn triggers(&self) -> &'static [RuleKind] {
        &[RuleKind::Token]
    }

    fn check_token(
        &self,
        ctx: &FileContext<'_>,
        cursor: &mut Cursor<'_>,
    ) -> Result<Vec<Violation>, InvariantError> {
        let Some(token) = cursor.current() else {
            return Ok(Vec::new());
        };
        let kind = token.kind;

        if matches!(kind, TokenKind::Assign | TokenKind::Comma)
            && in_initializer_list(ctx.tokens, token.index)
        {
            return Ok(Vec::new());
        }

        let violations = match kind {
            TokenKind::Comma | TokenKind::Semicolon => {
                self.check_separator(ctx, cursor, token).into_iter().collect()
            }
            TokenKind::Increment | TokenKind::Decrement => {
                self.check_step(ctx, cursor, token).into_iter().collect()
            }
            _ if !(kind.is_assignment() || SPACED_OPERATORS.contains(&kind)) => Vec::new(),
            _ if names_overload(cursor) => Vec::new(),
            TokenKind::Plus if is_unary(cursor) => Vec::new(),
            TokenKind::AndAnd => self.check_and_and(ctx, cursor, token),
            TokenKind::Assign => self.check_equals(ctx, token).into_iter().collect(),
            _ => self.check_binary(ctx, token).into_iter().collect(),
        };
        Ok(violations)
    }
}
