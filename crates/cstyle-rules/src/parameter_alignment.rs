//! Rule to align wrapped parameter lists on the first parameter.
//!
//! # Detected Patterns
//!
//! ```text
//! void functionA(int a, int b,
//!           int c);            <- should start under `int a`
//! ```
//!
//! A continuation line indented exactly one tab stop deeper than the line
//! of the first parameter marks a block-indented list and ends the check.
//! A continuation preceded by a single tab character is left alone.

use cstyle_core::{
    check_alignment, ContextNode, Cursor, FileContext, InvariantError, Label, Rule, RuleKind,
    Severity, Suggestion, Violation,
};

/// Rule code for parameter-alignment.
pub const CODE: &str = "CS008";

/// Rule name for parameter-alignment.
pub const NAME: &str = "parameter-alignment";

/// Requires wrapped parameters to line up with the first one.
#[derive(Debug, Clone, Default)]
pub struct ParameterAlignment;

impl ParameterAlignment {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for ParameterAlignment {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Aligns wrapped function parameters with the first parameter"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn triggers(&self) -> &'static [RuleKind] {
        &[RuleKind::FunctionDeclaration]
    }

    fn check_function(
        &self,
        ctx: &FileContext<'_>,
        decl: &ContextNode,
        _cursor: &mut Cursor<'_>,
    ) -> Result<Vec<Violation>, InvariantError> {
        let Some((open, _)) = decl.parameters else {
            return Ok(Vec::new());
        };

        let mut found = Vec::new();
        check_alignment(ctx.tokens, open, ctx.tab_width, |m| found.push(m))?;

        Ok(found
            .into_iter()
            .map(|m| {
                let text = ctx
                    .tokens
                    .get(m.token_index)
                    .map_or("", |t| t.text.as_str());
                Violation::new(
                    CODE,
                    NAME,
                    self.default_severity(),
                    ctx.location(m.token_index),
                    format!(
                        "Align '{text}' with the first parameter in column {}",
                        m.expected_column
                    ),
                )
                .with_suggestion(Suggestion::new(format!(
                    "Move it from column {} to column {}",
                    m.found_column, m.expected_column
                )))
                .with_label(Label::new(
                    ctx.location(m.anchor_index),
                    "first parameter starts here",
                ))
            })
            .collect())
    }
}
