//! Utility functions for rule implementations.

pub mod allowance;
pub mod columns;
pub mod spacing;

// Re-export commonly used utilities for rule implementations
#[doc(inline)]
pub use allowance::{check_allow_comment, AllowState};
#[doc(inline)]
pub use columns::{expanded_width, line_indent, visual_column};
#[doc(inline)]
pub use spacing::{
    padded_after, padded_before, separated_after, separated_before, single_spaced_after,
    single_spaced_before,
};
