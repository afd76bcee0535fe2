//! Rule to put the opening brace of top-level definitions on its own line.
//!
//! # Detected Patterns
//!
//! ```text
//! class A {            <- brace belongs on the next line
//! };
//!
//! void function() {    <- same
//! }
//! ```
//!
//! Namespaces may use either style. Definitions whose header line is
//! indented (members, nested types) and single-line bodies are not
//! checked.

use cstyle_core::utils::line_indent;
use cstyle_core::{
    ContextKind, ContextNode, Cursor, FileContext, InvariantError, Rule, RuleKind, Severity,
    Suggestion, Violation,
};

/// Rule code for top-level-braces.
pub const CODE: &str = "CS009";

/// Rule name for top-level-braces.
pub const NAME: &str = "top-level-braces";

/// Requires Allman braces on unindented class and function definitions.
#[derive(Debug, Clone, Default)]
pub struct TopLevelBraces;

impl TopLevelBraces {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn check(&self, ctx: &FileContext<'_>, decl: &ContextNode) -> Vec<Violation> {
        if decl.kind == ContextKind::Namespace {
            return Vec::new();
        }
        let (Some(open), Some(close)) = (decl.body_open, decl.body_close) else {
            return Vec::new();
        };
        let (Some(brace), Some(end)) = (ctx.tokens.get(open), ctx.tokens.get(close)) else {
            return Vec::new();
        };
        if brace.line == end.line {
            return Vec::new();
        }
        let Some(prev) = Cursor::at(ctx.tokens, open).peek_prev(1) else {
            return Vec::new();
        };
        if prev.line != brace.line || line_indent(ctx.tokens, prev.index, ctx.tab_width) != 0 {
            return Vec::new();
        }

        vec![Violation::new(
            CODE,
            NAME,
            self.default_severity(),
            ctx.location(open),
            "Place the opening brace of a top-level definition at the start of its own line",
        )
        .with_suggestion(Suggestion::new("Move '{' to the next line"))]
    }
}

impl Rule for TopLevelBraces {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Places the opening brace of top-level definitions on a separate line"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn triggers(&self) -> &'static [RuleKind] {
        &[RuleKind::TypeDeclaration, RuleKind::FunctionDeclaration]
    }

    fn check_type(
        &self,
        ctx: &FileContext<'_>,
        decl: &ContextNode,
        _cursor: &mut Cursor<'_>,
    ) -> Result<Vec<Violation>, InvariantError> {
        Ok(self.check(ctx, decl))
    }

    fn check_function(
        &self,
        ctx: &FileContext<'_>,
        decl: &ContextNode,
        _cursor: &mut Cursor<'_>,
    ) -> Result<Vec<Violation>, InvariantError> {
        Ok(self.check(ctx, decl))
    }
}
