//! Rule to limit the width of source lines.
//!
//! # Rationale
//!
//! Long lines are hard to read side by side and in review tools. Tabs are
//! expanded to the configured tab width before measuring.
//!
//! # Configuration
//!
//! - `max_columns`: Maximum line width (default: 120)

use cstyle_core::utils::expanded_width;
use cstyle_core::{
    FileContext, InvariantError, Rule, RuleConfig, RuleKind, Severity, SourceLine, Suggestion,
    Violation,
};

/// Rule code for line-length.
pub const CODE: &str = "CS001";

/// Rule name for line-length.
pub const NAME: &str = "line-length";

/// Default maximum line width.
pub const DEFAULT_MAX_COLUMNS: usize = 120;

/// Limits the width of source lines.
#[derive(Debug, Clone)]
pub struct LineLength {
    max_columns: usize,
    severity: Severity,
}

impl Default for LineLength {
    fn default() -> Self {
        Self::new()
    }
}

impl LineLength {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_columns: DEFAULT_MAX_COLUMNS,
            severity: Severity::Error,
        }
    }

    /// Sets the maximum line width.
    #[must_use]
    pub fn max_columns(mut self, max: usize) -> Self {
        self.max_columns = max;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for LineLength {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Limits line width, counting tabs as the configured tab width"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn triggers(&self) -> &'static [RuleKind] {
        &[RuleKind::Line]
    }

    fn configure(&mut self, config: &RuleConfig) {
        self.max_columns = config.get_usize("max_columns", self.max_columns);
    }

    fn check_line(
        &self,
        ctx: &FileContext<'_>,
        line: &SourceLine<'_>,
    ) -> Result<Vec<Violation>, InvariantError> {
        if line.text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let width = expanded_width(line.text, ctx.tab_width);
        if width <= self.max_columns {
            return Ok(Vec::new());
        }

        Ok(vec![Violation::new(
            CODE,
            NAME,
            self.severity,
            ctx.location_at(line.number, 1, line.text.len()),
            format!(
                "Line is {width} columns wide, more than the limit of {}",
                self.max_columns
            ),
        )
        .with_suggestion(Suggestion::new(
            "Break the expression or the argument list over several lines",
        ))])
    }
}
