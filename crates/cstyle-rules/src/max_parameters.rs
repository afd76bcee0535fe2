//! Rule to limit the number of parameters a function declares.
//!
//! # Rationale
//!
//! Long parameter lists are hard to call correctly. Group related values
//! into a struct instead.
//!
//! Only commas at the top level of the parameter list separate parameters;
//! commas inside template arguments (`Scope<T, J>`), default values, or
//! nested parentheses do not. `(void)` declares no parameters.
//!
//! # Configuration
//!
//! - `max`: Highest allowed parameter count (default: 6)

use cstyle_core::{
    ContextNode, Cursor, DelimiterDepths, FileContext, InvariantError, Rule, RuleConfig, RuleKind,
    Severity, Suggestion, Token, TokenKind, Violation,
};

/// Rule code for max-parameters.
pub const CODE: &str = "CS007";

/// Rule name for max-parameters.
pub const NAME: &str = "max-parameters";

/// Default parameter limit.
pub const DEFAULT_MAX: usize = 6;

/// Limits function parameter counts.
#[derive(Debug, Clone)]
pub struct MaxParameters {
    max: usize,
}

impl Default for MaxParameters {
    fn default() -> Self {
        Self::new()
    }
}

impl MaxParameters {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self { max: DEFAULT_MAX }
    }

    /// Sets the parameter limit.
    #[must_use]
    pub fn max(mut self, max: usize) -> Self {
        self.max = max;
        self
    }
}

/// Counts the parameters between the parentheses at `open` and `close`.
///
/// The cursor is left where it was.
fn count_parameters(
    cursor: &mut Cursor<'_>,
    open: usize,
    close: usize,
) -> Result<usize, InvariantError> {
    cursor.speculate(|walk| -> Result<usize, InvariantError> {
        walk.seek(open)?;
        let mut depths = DelimiterDepths::with_angles();
        let mut first: Option<&Token> = None;
        let mut seen = 0;
        let mut commas = 0;
        while let Some(token) = walk.advance_significant() {
            if token.index >= close {
                break;
            }
            if token.preprocessor {
                continue;
            }
            if token.kind == TokenKind::Comma && depths.is_top_level() {
                commas += 1;
            }
            depths.apply(token.kind);
            first.get_or_insert(token);
            seen += 1;
        }

        Ok(match first {
            None => 0,
            Some(only) if seen == 1 && only.kind == TokenKind::Keyword && only.text == "void" => 0,
            Some(_) => commas + 1,
        })
    })?
}

impl Rule for MaxParameters {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Limits the number of parameters in a function declaration"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn triggers(&self) -> &'static [RuleKind] {
        &[RuleKind::FunctionDeclaration]
    }

    fn configure(&mut self, config: &RuleConfig) {
        self.max = config.get_usize("max", self.max);
    }

    fn check_function(
        &self,
        ctx: &FileContext<'_>,
        decl: &ContextNode,
        cursor: &mut Cursor<'_>,
    ) -> Result<Vec<Violation>, InvariantError> {
        let Some((open, close)) = decl.parameters else {
            return Ok(Vec::new());
        };
        let count = count_parameters(cursor, open, close)?;
        if count <= self.max {
            return Ok(Vec::new());
        }

        Ok(vec![Violation::new(
            CODE,
            NAME,
            self.default_severity(),
            ctx.location(decl.anchor),
            format!(
                "Function '{}' has {count} parameters, more than the limit of {}",
                decl.qualified_name, self.max
            ),
        )
        .with_suggestion(Suggestion::new(
            "Group related parameters into a struct",
        ))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::check_file;

    fn check_code(code: &str) -> Vec<Violation> {
        check_file(MaxParameters::new(), "a.cpp", code)
    }

    #[test]
    fn test_six_parameters_pass() {
        let source = "void f(int a, int b, int c, Scope<T, J> d, int e, int f);\n";
        assert!(check_code(source).is_empty());
    }

    #[test]
    fn test_detects_seven_parameters() {
        let source = "void f(int a, int b, int c, int d, int e, int f, int g) {\n}\n";
        let violations = check_code(source);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("7 parameters"));
        assert_eq!(violations[0].location.column, 6);
    }

    #[test]
    fn test_detects_seven_parameters_across_lines() {
        let source = "int\nmain(int a,\n     int b,\n     int c,\n     int d,\n     int e,\n     int f,\n     int g);\n";
        assert_eq!(check_code(source).len(), 1);
    }

    #[test]
    fn test_nested_commas_are_not_separators() {
        let source = "void f(const std::map<int, std::pair<int, int>>& m, Pair<A, B> p);\n";
        assert!(check_file(MaxParameters::new().max(2), "a.cpp", source).is_empty());
    }

    #[test]
    fn test_counting_leaves_cursor_in_place() {
        let stream = cstyle_core::tokenize("int g(int a, /* b */ int c);\n");
        let open = stream.iter().position(|t| t.kind == TokenKind::LParen).unwrap();
        let close = stream.iter().position(|t| t.kind == TokenKind::RParen).unwrap();
        let mut cursor = Cursor::at(&stream, 2);

        assert_eq!(count_parameters(&mut cursor, open, close).unwrap(), 2);
        assert_eq!(cursor.position(), 2);
        assert_eq!(cursor.depth(), 0);
    }

    #[test]
    fn test_custom_limit_and_void() {
        let rule = MaxParameters::new().max(0);
        assert!(check_file(rule.clone(), "a.c", "int g(void);\nint h();\n").is_empty());
        assert_eq!(check_file(rule, "a.c", "int g(int x);\n").len(), 1);
    }
}
