//! Rule to forbid spaces and tabs at the end of a line.

use cstyle_core::{
    FileContext, InvariantError, Rule, RuleKind, Severity, SourceLine, Suggestion, Violation,
};

/// Rule code for trailing-whitespace.
pub const CODE: &str = "CS005";

/// Rule name for trailing-whitespace.
pub const NAME: &str = "trailing-whitespace";

/// Forbids whitespace before a line break.
#[derive(Debug, Clone, Default)]
pub struct TrailingWhitespace;

impl TrailingWhitespace {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for TrailingWhitespace {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids spaces and tabs at the end of a line"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn triggers(&self) -> &'static [RuleKind] {
        &[RuleKind::Line]
    }

    fn check_line(
        &self,
        ctx: &FileContext<'_>,
        line: &SourceLine<'_>,
    ) -> Result<Vec<Violation>, InvariantError> {
        let kept = line.text.trim_end_matches(|c: char| c == ' ' || c == '\t');
        if kept.len() == line.text.len() {
            return Ok(Vec::new());
        }

        let trailing = line.text.len() - kept.len();
        Ok(vec![Violation::new(
            CODE,
            NAME,
            self.default_severity(),
            ctx.location_at(line.number, kept.len() + 1, trailing),
            "Remove whitespace at the end of the line",
        )
        .with_suggestion(Suggestion::new("Delete the trailing spaces and tabs"))])
    }
}
