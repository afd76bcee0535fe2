//! Rule to forbid a space between a called name and its argument list.
//!
//! # Detected Patterns
//!
//! - `myFunction (3, 4);`
//!
//! Names listed in `exempt` (default `foreach`, `FOREACH`, which Qt uses as
//! a keyword) and preprocessor lines are not checked.
//!
//! # Configuration
//!
//! - `exempt`: Names that may be followed by a space (default: `["foreach", "FOREACH"]`)

use cstyle_core::{
    Cursor, FileContext, InvariantError, Rule, RuleConfig, RuleKind, Severity, Suggestion,
    TokenKind, Violation,
};

/// Rule code for call-paren-spacing.
pub const CODE: &str = "CS003";

/// Rule name for call-paren-spacing.
pub const NAME: &str = "call-paren-spacing";

const DEFAULT_EXEMPT: &[&str] = &["foreach", "FOREACH"];

/// Forbids `name (args)`.
#[derive(Debug, Clone)]
pub struct CallParenSpacing {
    exempt: Vec<String>,
}

impl Default for CallParenSpacing {
    fn default() -> Self {
        Self::new()
    }
}

impl CallParenSpacing {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            exempt: DEFAULT_EXEMPT.iter().map(ToString::to_string).collect(),
        }
    }

    /// Adds a name that may be followed by a space.
    #[must_use]
    pub fn exempt(mut self, name: impl Into<String>) -> Self {
        self.exempt.push(name.into());
        self
    }
}

impl Rule for CallParenSpacing {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids a space between a function name and its opening parenthesis"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn triggers(&self) -> &'static [RuleKind] {
        &[RuleKind::Token]
    }

    fn configure(&mut self, config: &RuleConfig) {
        if let Some(exempt) = config.get_str_array("exempt") {
            self.exempt = exempt;
        }
    }

    fn check_token(
        &self,
        ctx: &FileContext<'_>,
        cursor: &mut Cursor<'_>,
    ) -> Result<Vec<Violation>, InvariantError> {
        let Some(token) = cursor.current() else {
            return Ok(Vec::new());
        };
        if token.kind != TokenKind::Identifier
            || token.preprocessor
            || self.exempt.iter().any(|name| *name == token.text)
        {
            return Ok(Vec::new());
        }

        let spaced = cursor
            .peek_raw(1)
            .is_some_and(|t| t.kind == TokenKind::Whitespace);
        let calls = cursor
            .peek_next(1)
            .is_some_and(|t| t.kind == TokenKind::LParen);
        if !(spaced && calls) {
            return Ok(Vec::new());
        }

        Ok(vec![Violation::new(
            CODE,
            NAME,
            self.default_severity(),
            ctx.location(token.index),
            format!("No space allowed between '{}' and '('", token.text),
        )
        .with_suggestion(Suggestion::new(format!("Write '{}(' instead", token.text)))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::check_file;

    #[test]
    fn test_detects_space_before_call_paren() {
        let violations = check_file(
            CallParenSpacing::new(),
            "a.c",
            "void f() {\n    myFunction (3, 4);\n}\n",
        );
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("myFunction"));
        assert_eq!(violations[0].location.line, 2);
    }

    #[test]
    fn test_allows_tight_calls_and_keywords() {
        let source = "void f() {\n    myFunction(3, 4);\n    if (x) {\n        return (y);\n    }\n}\n";
        assert!(check_file(CallParenSpacing::new(), "a.c", source).is_empty());
    }

    #[test]
    fn test_exemptions_and_preprocessor() {
        let source = "#define VALUE (1 + 2)\nvoid f() {\n    foreach (item, list) {\n    }\n}\n";
        assert!(check_file(CallParenSpacing::new(), "a.c", source).is_empty());

        let custom = CallParenSpacing::new().exempt("Q_FOREACH");
        let source = "void f() {\n    Q_FOREACH (item, list) {\n    }\n}\n";
        assert!(check_file(custom, "a.c", source).is_empty());
    }
}
