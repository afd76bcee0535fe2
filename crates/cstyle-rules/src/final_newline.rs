//! Rule to require a line break at the end of every file.

use cstyle_core::{
    FileContext, InvariantError, Rule, RuleKind, Severity, SourceLine, Suggestion, Violation,
};

/// Rule code for final-newline.
pub const CODE: &str = "CS006";

/// Rule name for final-newline.
pub const NAME: &str = "final-newline";

/// Requires non-empty files to end with a line break.
#[derive(Debug, Clone, Default)]
pub struct FinalNewline;

impl FinalNewline {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for FinalNewline {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires a line break at the end of the file"
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
        // Only the unterminated last line reaches the end of the content.
        if line.offset + line.text.len() != ctx.content.len() || line.text.is_empty() {
            return Ok(Vec::new());
        }

        Ok(vec![Violation::new(
            CODE,
            NAME,
            self.default_severity(),
            ctx.location_at(line.number, line.text.len() + 1, 0),
            "Add a line break at the end of the file",
        )
        .with_suggestion(Suggestion::new("End the last line with a newline"))])
    }
}
