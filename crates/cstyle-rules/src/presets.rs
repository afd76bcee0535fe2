//! Rule presets for common configurations.

use crate::{
    CallParenSpacing, ClassDocComment, ElseCatchNewline, FinalNewline, InitializerSpacing,
    LineLength, MaxParameters, NamespaceBraces, OperatorSpacing, ParameterAlignment,
    TopLevelBraces, TrailingWhitespace,
};
use cstyle_core::RuleBox;

/// Preset configurations for cstyle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Recommended rules with sensible defaults.
    Recommended,
    /// Every rule, including the header documentation requirement.
    Strict,
    /// Whitespace hygiene only, for gradual adoption.
    Minimal,
}

impl Preset {
    /// Returns the rules for this preset.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        match self {
            Self::Recommended => recommended_rules(),
            Self::Strict => strict_rules(),
            Self::Minimal => minimal_rules(),
        }
    }

    /// Parses a preset name as written in configuration files.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "recommended" => Some(Self::Recommended),
            "strict" | "all" => Some(Self::Strict),
            "minimal" => Some(Self::Minimal),
            _ => None,
        }
    }
}

/// Returns the recommended set of rules.
///
/// Everything except `class-doc-comment` (CS004) and `namespace-braces`
/// (CS010), which encode house conventions rather than hygiene.
#[must_use]
pub fn recommended_rules() -> Vec<RuleBox> {
    vec![
        Box::new(LineLength::new()),
        Box::new(OperatorSpacing::new()),
        Box::new(CallParenSpacing::new()),
        Box::new(TrailingWhitespace::new()),
        Box::new(FinalNewline::new()),
        Box::new(MaxParameters::new()),
        Box::new(ParameterAlignment::new()),
        Box::new(TopLevelBraces::new()),
        Box::new(ElseCatchNewline::new()),
        Box::new(InitializerSpacing::new()),
    ]
}

/// Returns the strict set of rules.
#[must_use]
pub fn strict_rules() -> Vec<RuleBox> {
    all_rules()
}

/// Returns the minimal set of rules.
///
/// - `line-length` (CS001)
/// - `trailing-whitespace` (CS005)
/// - `final-newline` (CS006)
#[must_use]
pub fn minimal_rules() -> Vec<RuleBox> {
    vec![
        Box::new(LineLength::new()),
        Box::new(TrailingWhitespace::new()),
        Box::new(FinalNewline::new()),
    ]
}

/// Returns all available rules, ordered by code.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![
        Box::new(LineLength::new()),
        Box::new(OperatorSpacing::new()),
        Box::new(CallParenSpacing::new()),
        Box::new(ClassDocComment::new()),
        Box::new(TrailingWhitespace::new()),
        Box::new(FinalNewline::new()),
        Box::new(MaxParameters::new()),
        Box::new(ParameterAlignment::new()),
        Box::new(TopLevelBraces::new()),
        Box::new(NamespaceBraces::new()),
        Box::new(ElseCatchNewline::new()),
        Box::new(InitializerSpacing::new()),
    ]
}
