//! # cstyle-core
//!
//! Core engine for style checking C and C++ sources at the token level.
//!
//! This crate provides the pieces rules are built from:
//!
//! - [`tokenize`] and [`Token`] for the annotated token stream
//! - [`Cursor`] for navigation with checkpoint and restore
//! - [`find_match`] for balanced delimiter matching
//! - [`DeclarationTracker`] for namespace, record, and function contexts
//! - the [`classify`] functions for ambiguous `&&`, `=`, `{`, and `,`
//! - [`check_alignment`] for multi-line parameter lists
//! - [`Rule`] and [`Analyzer`] for dispatching rules over a source tree
//!
//! ## Example
//!
//! ```ignore
//! use cstyle_core::Analyzer;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./src")
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! for violation in &result.violations {
//!     println!("{}", violation.format());
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod alignment;
mod analyzer;
pub mod classify;
mod config;
mod context;
mod cursor;
mod declaration;
mod error;
mod lexer;
mod matcher;
mod rule;
mod token;
mod types;

/// Utility modules for rule implementations.
pub mod utils;

pub use alignment::{check_alignment, Misalignment};
pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use classify::{
    classify_brace, classify_comma, classify_double_ampersand, classify_equals,
    follows_initializer_introducer, in_initializer_list, is_designator_period, AmpersandRole,
    BraceRole, CommaRole, EqualsRole,
};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use context::FileContext;
pub use cursor::Cursor;
pub use declaration::{
    ContextKind, ContextNode, ContextStack, DeclarationState, DeclarationTracker,
};
pub use error::InvariantError;
pub use lexer::tokenize;
pub use matcher::{find_enclosing, find_match, DelimiterDepths};
pub use rule::{Rule, RuleBox, RuleKind, RuleRegistry, SourceLine};
pub use token::{CommentKind, Token, TokenKind, TokenStream};
pub use types::{
    Label, LintResult, Location, Severity, Suggestion, Violation,
    ViolationDiagnostic,
};
pub use utils::allowance::{AllowCheck, AllowState};
