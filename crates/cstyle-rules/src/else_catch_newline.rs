//! Rule to start `else` and `catch` on a new line.
//!
//! # Detected Patterns
//!
//! - `} else {`
//! - `} catch (Exception& e) {`

use cstyle_core::{
    Cursor, FileContext, InvariantError, Rule, RuleKind, Severity, Suggestion, TokenKind,
    Violation,
};

/// Rule code for else-catch-newline.
pub const CODE: &str = "CS011";

/// Rule name for else-catch-newline.
pub const NAME: &str = "else-catch-newline";

/// Forbids `else` or `catch` on the line of the preceding `}`.
#[derive(Debug, Clone, Default)]
pub struct ElseCatchNewline;

impl ElseCatchNewline {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for ElseCatchNewline {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Places 'else' and 'catch' on a separate line from the closing brace"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn triggers(&self) -> &'static [RuleKind] {
        &[RuleKind::Token]
    }

    fn check_token(
        &self,
        ctx: &FileContext<'_>,
        cursor: &mut Cursor<'_>,
    ) -> Result<Vec<Violation>, InvariantError> {
        let Some(token) = cursor
            .current()
            .filter(|t| matches!(t.kind, TokenKind::Else | TokenKind::Catch))
        else {
            return Ok(Vec::new());
        };
        let follows_brace = cursor
            .peek_prev(1)
            .is_some_and(|prev| prev.kind == TokenKind::RBrace && prev.line == token.line);
        if !follows_brace {
            return Ok(Vec::new());
        }

        Ok(vec![Violation::new(
            CODE,
            NAME,
            self.default_severity(),
            ctx.location(token.index),
            format!("Place '{}' on its own line after the closing brace", token.text),
        )
        .with_suggestion(Suggestion::new(format!(
            "Break the line before '{}'",
            token.text
        )))])
    }
}
