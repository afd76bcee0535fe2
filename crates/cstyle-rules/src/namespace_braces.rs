//! Rule to keep namespace braces on the declaration line.
//!
//! # Detected Patterns
//!
//! ```text
//! namespace MyNamespace
//! {                        <- belongs after the name
//! }
//! ```
//!
//! Applies to top-level and nested namespaces alike.

use cstyle_core::{
    ContextKind, ContextNode, Cursor, FileContext, InvariantError, Rule, RuleKind, Severity,
    Suggestion, Violation,
};

/// Rule code for namespace-braces.
pub const CODE: &str = "CS010";

/// Rule name for namespace-braces.
pub const NAME: &str = "namespace-braces";

/// Requires `namespace name {` on one line.
#[derive(Debug, Clone, Default)]
pub struct NamespaceBraces;

impl NamespaceBraces {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for NamespaceBraces {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Places namespace opening braces on the declaration line"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn triggers(&self) -> &'static [RuleKind] {
        &[RuleKind::TypeDeclaration]
    }

    fn check_type(
        &self,
        ctx: &FileContext<'_>,
        decl: &ContextNode,
        _cursor: &mut Cursor<'_>,
    ) -> Result<Vec<Violation>, InvariantError> {
        if decl.kind != ContextKind::Namespace {
            return Ok(Vec::new());
        }
        let (Some(open), Some(close)) = (decl.body_open, decl.body_close) else {
            return Ok(Vec::new());
        };
        let (Some(brace), Some(end)) = (ctx.tokens.get(open), ctx.tokens.get(close)) else {
            return Ok(Vec::new());
        };
        let detached = Cursor::at(ctx.tokens, open)
            .peek_prev(1)
            .is_some_and(|prev| prev.line != brace.line);
        if brace.line == end.line || !detached {
            return Ok(Vec::new());
        }

        Ok(vec![Violation::new(
            CODE,
            NAME,
            self.default_severity(),
            ctx.location(open),
            "Place the namespace brace on the declaration line",
        )
        .with_suggestion(Suggestion::new(format!(
            "Write 'namespace {} {{'",
            decl.name()
        )))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::check_file;

    fn check_code(code: &str) -> Vec<Violation> {
        check_file(NamespaceBraces, "thisfile.cpp", code)
    }

    #[test]
    fn test_same_line_braces_pass() {
        assert!(check_code("\nnamespace MyNamespace {\n    // content\n}\n").is_empty());
        assert!(check_code("\nnamespace Outer {\n    namespace Inner {\n    }\n}\n").is_empty());
        assert!(check_code("\nnamespace {\n    int hidden;\n}\n").is_empty());
    }

    #[test]
    fn test_detects_detached_braces() {
        let violations = check_code("\nnamespace MyNamespace\n{\n    // content\n}\n");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].location.line, 3);

        let nested = "\nnamespace Outer {\n    namespace Inner\n    {\n    }\n}\n";
        assert_eq!(check_code(nested).len(), 1);
    }

    #[test]
    fn test_classes_are_not_checked() {
        assert!(check_code("\nclass A\n{\n};\n").is_empty());
    }

    #[test]
    fn test_single_line_namespace_passes() {
        assert!(check_code("namespace detail\n{ int x; }\n").is_empty());
    }
}
