//! Rule traits for defining lint rules.

use serde::Serialize;

use crate::config::RuleConfig;
use crate::context::FileContext;
use crate::cursor::Cursor;
use crate::declaration::ContextNode;
use crate::error::InvariantError;
use crate::types::{Severity, Violation};

/// The events a rule can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleKind {
    /// Every token that is not whitespace or a line break.
    Token,
    /// Every source line.
    Line,
    /// Namespace, class, struct, and union declarations.
    TypeDeclaration,
    /// Function declarations and definitions.
    FunctionDeclaration,
}

impl RuleKind {
    /// All kinds, in dispatch order.
    pub const ALL: [Self; 4] = [
        Self::Line,
        Self::Token,
        Self::TypeDeclaration,
        Self::FunctionDeclaration,
    ];

    fn slot(self) -> usize {
        match self {
            Self::Line => 0,
            Self::Token => 1,
            Self::TypeDeclaration => 2,
            Self::FunctionDeclaration => 3,
        }
    }
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Token => write!(f, "token"),
            Self::Line => write!(f, "line"),
            Self::TypeDeclaration => write!(f, "type"),
            Self::FunctionDeclaration => write!(f, "function"),
        }
    }
}

/// One line of source text without its terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'a> {
    /// Line number (1-indexed).
    pub number: usize,
    /// Line text, `\n` and `\r\n` stripped.
    pub text: &'a str,
    /// Byte offset of the first character.
    pub offset: usize,
}

/// A style rule driven by the token walk.
///
/// Rules declare the events they want through [`Rule::triggers`] and
/// override the matching hooks. Every hook receives a cursor forked for
/// that call; its checkpoint stack must be empty when the hook returns.
///
/// # Example
///
/// ```ignore
/// use cstyle_core::{Cursor, FileContext, InvariantError, Rule, RuleKind, Violation};
///
/// pub struct NoGoto;
///
/// impl Rule for NoGoto {
///     fn name(&self) -> &'static str { "no-goto" }
///     fn code(&self) -> &'static str { "CS900" }
///     fn triggers(&self) -> &'static [RuleKind] { &[RuleKind::Token] }
///
///     fn check_token(
///         &self,
///         ctx: &FileContext<'_>,
///         cursor: &mut Cursor<'_>,
///     ) -> Result<Vec<Violation>, InvariantError> {
///         // inspect cursor.current() ...
///         Ok(Vec::new())
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "operator-spacing").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "CS002").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Whether this rule requires a reason when using allow directives.
    ///
    /// By default, rules with `Severity::Error` require a reason.
    fn requires_allow_reason(&self) -> bool {
        self.default_severity() == Severity::Error
    }

    /// The events this rule is dispatched on.
    fn triggers(&self) -> &'static [RuleKind];

    /// Applies rule-specific options from the configuration.
    fn configure(&mut self, _config: &RuleConfig) {}

    /// Called with the cursor on each non-blank token.
    ///
    /// # Errors
    ///
    /// Returns an [`InvariantError`] when the rule breaks an engine contract.
    fn check_token(
        &self,
        _ctx: &FileContext<'_>,
        _cursor: &mut Cursor<'_>,
    ) -> Result<Vec<Violation>, InvariantError> {
        Ok(Vec::new())
    }

    /// Called once per source line.
    ///
    /// # Errors
    ///
    /// Returns an [`InvariantError`] when the rule breaks an engine contract.
    fn check_line(
        &self,
        _ctx: &FileContext<'_>,
        _line: &SourceLine<'_>,
    ) -> Result<Vec<Violation>, InvariantError> {
        Ok(Vec::new())
    }

    /// Called for each namespace or record declaration, cursor on its keyword.
    ///
    /// # Errors
    ///
    /// Returns an [`InvariantError`] when the rule breaks an engine contract.
    fn check_type(
        &self,
        _ctx: &FileContext<'_>,
        _decl: &ContextNode,
        _cursor: &mut Cursor<'_>,
    ) -> Result<Vec<Violation>, InvariantError> {
        Ok(Vec::new())
    }

    /// Called for each function declaration, cursor on its name.
    ///
    /// # Errors
    ///
    /// Returns an [`InvariantError`] when the rule breaks an engine contract.
    fn check_function(
        &self,
        _ctx: &FileContext<'_>,
        _decl: &ContextNode,
        _cursor: &mut Cursor<'_>,
    ) -> Result<Vec<Violation>, InvariantError> {
        Ok(Vec::new())
    }
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

/// Rules in registration order, indexed by the events they subscribe to.
#[derive(Default)]
pub struct RuleRegistry {
    rules: Vec<RuleBox>,
    by_kind: [Vec<usize>; 4],
}

impl RuleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule; it is dispatched after every rule registered before it.
    pub fn register(&mut self, rule: RuleBox) {
        let position = self.rules.len();
        for kind in rule.triggers() {
            let slot = &mut self.by_kind[kind.slot()];
            if !slot.contains(&position) {
                slot.push(position);
            }
        }
        self.rules.push(rule);
    }

    /// All rules in registration order.
    pub fn rules(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|rule| rule.as_ref())
    }

    /// Rules subscribed to `kind`, in registration order.
    pub fn for_kind(&self, kind: RuleKind) -> impl Iterator<Item = &dyn Rule> {
        self.by_kind[kind.slot()]
            .iter()
            .map(|&i| self.rules[i].as_ref())
    }

    /// Whether any rule subscribes to `kind`.
    #[must_use]
    pub fn has_kind(&self, kind: RuleKind) -> bool {
        !self.by_kind[kind.slot()].is_empty()
    }

    /// Finds a rule by name or code.
    #[must_use]
    pub fn get(&self, name_or_code: &str) -> Option<&dyn Rule> {
        self.rules()
            .find(|r| r.name() == name_or_code || r.code() == name_or_code)
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no rules are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|r| r.code()))
            .finish()
    }
}
