//! Rule to require a doxygen comment on classes defined in headers.
//!
//! # Detected Patterns
//!
//! ```text
//! class A {        <- no comment
//! };
//!
//! /*               <- not a doxygen comment
//!  */
//! class B {
//! };
//! ```
//!
//! The nearest comment before the class, looking back no further than the
//! previous `{`, `;` or preprocessor line, must be a `/** */`, `/*! */`,
//! `///` or `//!` comment. Forward declarations and source files are not
//! checked.

use cstyle_core::{
    ContextKind, ContextNode, Cursor, FileContext, InvariantError, Rule, RuleKind, Severity,
    Suggestion, TokenKind, Violation,
};

/// Rule code for class-doc-comment.
pub const CODE: &str = "CS004";

/// Rule name for class-doc-comment.
pub const NAME: &str = "class-doc-comment";

/// Requires documented class definitions in headers.
#[derive(Debug, Clone)]
pub struct ClassDocComment {
    severity: Severity,
}

impl Default for ClassDocComment {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassDocComment {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Warning,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

/// Whether the nearest comment before `anchor`, within the current
/// declaration, is a doxygen comment.
fn has_doc_comment(cursor: &Cursor<'_>) -> bool {
    let mut back = 1;
    while let Some(token) = cursor.peek_raw_back(back) {
        if token.preprocessor
            || matches!(token.kind, TokenKind::LBrace | TokenKind::Semicolon)
        {
            return false;
        }
        if token.kind == TokenKind::Comment {
            return token.is_doc_comment();
        }
        back += 1;
    }
    false
}

impl Rule for ClassDocComment {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires a doxygen comment before each class defined in a header"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn triggers(&self) -> &'static [RuleKind] {
        &[RuleKind::TypeDeclaration]
    }

    fn check_type(
        &self,
        ctx: &FileContext<'_>,
        decl: &ContextNode,
        cursor: &mut Cursor<'_>,
    ) -> Result<Vec<Violation>, InvariantError> {
        if !ctx.is_header
            || decl.kind != ContextKind::Class
            || !decl.is_definition()
            || has_doc_comment(cursor)
        {
            return Ok(Vec::new());
        }

        Ok(vec![Violation::new(
            CODE,
            NAME,
            self.severity,
            ctx.location(decl.anchor),
            format!(
                "Provide a doxygen comment before the definition of class '{}'",
                decl.qualified_name
            ),
        )
        .with_suggestion(Suggestion::new(
            "Add a /** ... */ comment describing the class",
        ))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::check_file;

    fn check_code(path: &str, code: &str) -> Vec<Violation> {
        check_file(ClassDocComment::new(), path, code)
    }

    #[test]
    fn test_detects_undocumented_classes() {
        let violations = check_code(
            "A.h",
            "class A {\n};\n\n/*\n *\n */\nclass B {\n};\n",
        );
        let names: Vec<&str> = violations.iter().map(|v| v.message.as_str()).collect();
        assert_eq!(names.len(), 2, "{names:?}");
        assert!(names[0].contains("'A'"));
        assert!(names[1].contains("'B'"));
    }

    #[test]
    fn test_documented_and_forward_declared_classes_pass() {
        let source = "/**\n * blar blar\n */\nclass A {\n};\n\nclass B;\n\n/// Tagged.\ntemplate <typename T>\nclass C final : public A {\n};\n";
        assert!(check_code("A.h", source).is_empty());
    }

    #[test]
    fn test_source_files_and_structs_are_ignored() {
        assert!(check_code("A.cpp", "class A {\n};\n").is_empty());
        assert!(check_code("A.h", "struct P {\n    int x;\n};\n").is_empty());
    }

    #[test]
    fn test_comment_before_a_boundary_does_not_count() {
        let source = "/** Doc for the include. */\n#include <vector>\nclass A {\n};\n";
        assert_eq!(check_code("A.hpp", source).len(), 1);

        let source = "namespace ui {\n/** Widget. */\nclass Widget {\n};\n}\n";
        assert!(check_code("A.hpp", source).is_empty());
    }
}
