//! Rule to enforce spacing inside brace initializer lists.
//!
//! # Detected Patterns
//!
//! ```text
//! MyStruct s = { field1, field2};    <- space after {
//! int arr[] = {1, 2, 3 };            <- space before }
//! Point p = { };                     <- space in empty braces
//! Point p = {.x=10,.y=20};           <- no space after ,
//! int arr[] = {1,  2};               <- more than one space after ,
//! Point p = {.x = 10, .y = 20};      <- spaces around designator =
//! ```
//!
//! Empty braces are checked wherever they appear, `void f() { }` and
//! `struct S { };` included. Otherwise only braces classified as
//! initializers are checked; block and body braces, `Rect r { ... }`
//! included, are left to other rules. Braces that end or start a line are
//! not considered padded.
//!
//! # Configuration
//!
//! - `brace_padding`: `"none"` (default) for `{1, 2}` or `"single"` for `{ 1, 2 }`

use cstyle_core::utils::{
    padded_after, padded_before, separated_after, separated_before, single_spaced_after,
};
use cstyle_core::{
    classify_brace, classify_comma, classify_equals, BraceRole, CommaRole, Cursor, EqualsRole,
    FileContext, InvariantError, Rule, RuleConfig, RuleKind, Severity, Suggestion, Token,
    TokenKind, Violation,
};

/// Rule code for initializer-spacing.
pub const CODE: &str = "CS012";

/// Rule name for initializer-spacing.
pub const NAME: &str = "initializer-spacing";

/// Spacing expected just inside non-empty initializer braces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BracePadding {
    /// `{1, 2}`
    #[default]
    None,
    /// `{ 1, 2 }`
    Single,
}

impl BracePadding {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "none" => Some(Self::None),
            "single" => Some(Self::Single),
            _ => None,
        }
    }
}

/// Enforces spacing inside `{ ... }` initializers.
#[derive(Debug, Clone, Default)]
pub struct InitializerSpacing {
    padding: BracePadding,
}

impl InitializerSpacing {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the padding policy for non-empty braces.
    #[must_use]
    pub fn brace_padding(mut self, padding: BracePadding) -> Self {
        self.padding = padding;
        self
    }

    fn violation(
        &self,
        ctx: &FileContext<'_>,
        token: &Token,
        message: &str,
        fix: &str,
    ) -> Violation {
        Violation::new(
            CODE,
            NAME,
            self.default_severity(),
            ctx.location(token.index),
            message,
        )
        .with_suggestion(Suggestion::new(fix))
    }

    fn check_open(&self, ctx: &FileContext<'_>, token: &Token) -> Option<Violation> {
        let tokens = ctx.tokens;
        match classify_brace(tokens, token.index) {
            BraceRole::EmptyAggregate => padded_after(tokens, token.index).then(|| {
                self.violation(ctx, token, "No space allowed in empty braces", "Write '{}'")
            }),
            BraceRole::DesignatedInitializerBrace | BraceRole::AggregateInitializerBrace => {
                match self.padding {
                    BracePadding::None => {
                        let line_ends = Cursor::at(tokens, token.index)
                            .peek_raw(2)
                            .map_or(true, |t| t.kind == TokenKind::Newline);
                        (padded_after(tokens, token.index) && !line_ends).then(|| {
                            self.violation(
                                ctx,
                                token,
                                "No space allowed after opening brace in initializer list",
                                "Remove the space after '{'",
                            )
                        })
                    }
                    BracePadding::Single => (!separated_after(tokens, token.index)).then(|| {
                        self.violation(
                            ctx,
                            token,
                            "Provide a space after opening brace in initializer list",
                            "Insert a space after '{'",
                        )
                    }),
                }
            }
            BraceRole::ScopeBrace => None,
        }
    }

    fn check_close(&self, ctx: &FileContext<'_>, token: &Token) -> Option<Violation> {
        let tokens = ctx.tokens;
        match classify_brace(tokens, token.index) {
            BraceRole::DesignatedInitializerBrace | BraceRole::AggregateInitializerBrace => {}
            BraceRole::EmptyAggregate | BraceRole::ScopeBrace => return None,
        }
        match self.padding {
            BracePadding::None => {
                let line_starts = Cursor::at(tokens, token.index)
                    .peek_raw_back(2)
                    .map_or(true, |t| t.kind == TokenKind::Newline);
                (padded_before(tokens, token.index) && !line_starts).then(|| {
                    self.violation(
                        ctx,
                        token,
                        "No space allowed before closing brace in initializer list",
                        "Remove the space before '}'",
                    )
                })
            }
            BracePadding::Single => (!separated_before(tokens, token.index)).then(|| {
                self.violation(
                    ctx,
                    token,
                    "Provide a space before closing brace in initializer list",
                    "Insert a space before '}'",
                )
            }),
        }
    }

    fn check_comma(&self, ctx: &FileContext<'_>, token: &Token) -> Option<Violation> {
        let tokens = ctx.tokens;
        if classify_comma(tokens, token.index) != CommaRole::InitializerSeparator {
            return None;
        }
        if !separated_after(tokens, token.index) {
            Some(self.violation(
                ctx,
                token,
                "Space required after comma in initializer list",
                "Insert a space after ','",
            ))
        } else if !single_spaced_after(tokens, token.index) {
            Some(self.violation(
                ctx,
                token,
                "Use a single space after comma in initializer list",
                "Keep one space after ','",
            ))
        } else {
            None
        }
    }

    fn check_equals(&self, ctx: &FileContext<'_>, token: &Token) -> Vec<Violation> {
        let tokens = ctx.tokens;
        if classify_equals(tokens, token.index) != EqualsRole::DesignatedInitializerField {
            return Vec::new();
        }
        let mut violations = Vec::new();
        if padded_before(tokens, token.index) {
            violations.push(self.violation(
                ctx,
                token,
                "No space allowed before '=' in a designated initializer",
                "Write '.field=value'",
            ));
        }
        if padded_after(tokens, token.index) {
            violations.push(self.violation(
                ctx,
                token,
                "No space allowed after '=' in a designated initializer",
                "Write '.field=value'",
            ));
        }
        violations
    }
}

impl Rule for InitializerSpacing {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Enforces spacing around braces, commas and '=' in initializer lists"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn triggers(&self) -> &'static [RuleKind] {
        &[RuleKind::Token]
    }

    fn configure(&mut self, config: &RuleConfig) {
        if let Some(value) = config.get_option::<String>("brace_padding") {
            match BracePadding::parse(&value) {
                Some(padding) => self.padding = padding,
                None => tracing::warn!(
                    value = %value,
                    "Unknown brace_padding for {NAME}, keeping {:?}",
                    self.padding
                ),
            }
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

        let violations = match token.kind {
            TokenKind::LBrace => self.check_open(ctx, token).into_iter().collect(),
            TokenKind::RBrace => self.check_close(ctx, token).into_iter().collect(),
            TokenKind::Comma => self.check_comma(ctx, token).into_iter().collect(),
            TokenKind::Assign => self.check_equals(ctx, token),
            _ => Vec::new(),
        };
        Ok(violations)
    }
}
