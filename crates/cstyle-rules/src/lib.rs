//! # cstyle-rules
//!
//! Built-in style rules for cstyle.
//!
//! Every rule is a [`Rule`] implementation dispatched by the
//! `cstyle_core` analyzer on tokens, lines, or recognized declarations.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | CS001 | `line-length` | Limits the tab-expanded width of a line |
//! | CS002 | `operator-spacing` | Requires spaces around binary operators |
//! | CS003 | `call-paren-spacing` | Forbids a space between a called name and `(` |
//! | CS004 | `class-doc-comment` | Requires doxygen comments on classes in headers |
//! | CS005 | `trailing-whitespace` | Forbids whitespace at the end of a line |
//! | CS006 | `final-newline` | Requires a line break at the end of a file |
//! | CS007 | `max-parameters` | Limits the number of function parameters |
//! | CS008 | `parameter-alignment` | Aligns wrapped parameters on the first one |
//! | CS009 | `top-level-braces` | Puts top-level definition braces on their own line |
//! | CS010 | `namespace-braces` | Keeps namespace braces on the declaration line |
//! | CS011 | `else-catch-newline` | Starts `else` / `catch` on a new line |
//! | CS012 | `initializer-spacing` | Enforces spacing inside initializer lists |
//!
//! ## Usage
//!
//! ```ignore
//! use cstyle_core::Analyzer;
//! use cstyle_rules::{LineLength, OperatorSpacing};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./src")
//!     .rule(LineLength::new().max_columns(100))
//!     .rule(OperatorSpacing::new())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod call_paren_spacing;
mod class_doc_comment;
mod else_catch_newline;
mod final_newline;
mod initializer_spacing;
mod line_length;
mod max_parameters;
mod namespace_braces;
mod operator_spacing;
mod parameter_alignment;
mod presets;
mod top_level_braces;
mod trailing_whitespace;

pub use call_paren_spacing::CallParenSpacing;
pub use class_doc_comment::ClassDocComment;
pub use else_catch_newline::ElseCatchNewline;
pub use final_newline::FinalNewline;
pub use initializer_spacing::{BracePadding, InitializerSpacing};
pub use line_length::LineLength;
pub use max_parameters::MaxParameters;
pub use namespace_braces::NamespaceBraces;
pub use operator_spacing::OperatorSpacing;
pub use parameter_alignment::ParameterAlignment;
pub use presets::{all_rules, minimal_rules, recommended_rules, strict_rules, Preset};
pub use top_level_braces::TopLevelBraces;
pub use trailing_whitespace::TrailingWhitespace;

/// Re-export core types for convenience.
pub use cstyle_core::{Rule, Severity, Violation};
