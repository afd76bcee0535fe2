//! Balanced-delimiter matching and depth tracking.
//!
//! Braces, parentheses, and brackets are matched by kind only: a `)` never
//! closes a `{`. Tokens on directive lines are ignored unless the starting
//! delimiter is itself on one, so `#define BEGIN {` does not unbalance code.

use crate::error::InvariantError;
use crate::token::{Token, TokenKind};

/// Returns the index of the partner of the delimiter at `index`.
///
/// Openers scan forward, closers scan backward. `Ok(None)` means the stream
/// ended before the depth returned to zero.
///
/// # Errors
///
/// Returns [`InvariantError::NotADelimiter`] if the token is not a brace,
/// parenthesis, or bracket, and [`InvariantError::OutOfRange`] for a bad index.
pub fn find_match(tokens: &[Token], index: usize) -> Result<Option<usize>, InvariantError> {
    let origin = tokens.get(index).ok_or(InvariantError::OutOfRange {
        index,
        len: tokens.len(),
    })?;
    let partner = origin.kind.partner().ok_or(InvariantError::NotADelimiter {
        index,
        kind: origin.kind,
    })?;

    let found = if origin.kind.is_opener() {
        scan(tokens[index + 1..].iter(), origin, partner)
    } else {
        scan(tokens[..index].iter().rev(), origin, partner)
    };
    Ok(found)
}

fn scan<'t>(
    candidates: impl Iterator<Item = &'t Token>,
    origin: &Token,
    partner: TokenKind,
) -> Option<usize> {
    let mut depth = 0usize;
    for token in candidates {
        if token.preprocessor && !origin.preprocessor {
            continue;
        }
        if token.kind == origin.kind {
            depth += 1;
        } else if token.kind == partner {
            if depth == 0 {
                return Some(token.index);
            }
            depth -= 1;
        }
    }
    None
}

/// Finds the nearest unmatched opener before `index`.
///
/// Looks at no more than `limit` significant tokens; returns `None` when the
/// window is exhausted or the start of the stream is reached.
#[must_use]
pub fn find_enclosing(tokens: &[Token], index: usize, limit: usize) -> Option<usize> {
    let origin_pp = tokens.get(index).is_some_and(|t| t.preprocessor);
    let mut depths = DelimiterDepths::default();
    let mut seen = 0;

    for token in tokens.get(..index)?.iter().rev() {
        if !token.is_significant() || (token.preprocessor && !origin_pp) {
            continue;
        }
        if seen == limit {
            return None;
        }
        seen += 1;
        if token.kind.is_opener() && depths.depth_of(token.kind) == 0 {
            return Some(token.index);
        }
        depths.unapply(token.kind);
    }
    None
}

/// Tracks nested delimiter depth while scanning tokens.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimiterDepths {
    paren: usize,
    brace: usize,
    bracket: usize,
    angle: usize,
    angles: bool,
}

impl DelimiterDepths {
    /// Creates a tracker that also counts `<` / `>` as template brackets.
    #[must_use]
    pub fn with_angles() -> Self {
        Self {
            angles: true,
            ..Self::default()
        }
    }

    /// Updates depths for a token seen while scanning forward.
    pub fn apply(&mut self, kind: TokenKind) {
        match kind {
            TokenKind::LParen => self.paren += 1,
            TokenKind::RParen => self.paren = self.paren.saturating_sub(1),
            TokenKind::LBrace => self.brace += 1,
            TokenKind::RBrace => self.brace = self.brace.saturating_sub(1),
            TokenKind::LBracket => self.bracket += 1,
            TokenKind::RBracket => self.bracket = self.bracket.saturating_sub(1),
            TokenKind::Lt if self.angles => self.angle += 1,
            TokenKind::Gt if self.angles => self.angle = self.angle.saturating_sub(1),
            TokenKind::Shr if self.angles => self.angle = self.angle.saturating_sub(2),
            _ => {}
        }
    }

    /// Updates depths for a token seen while scanning backward.
    pub fn unapply(&mut self, kind: TokenKind) {
        match kind {
            TokenKind::RParen => self.paren += 1,
            TokenKind::LParen => self.paren = self.paren.saturating_sub(1),
            TokenKind::RBrace => self.brace += 1,
            TokenKind::LBrace => self.brace = self.brace.saturating_sub(1),
            TokenKind::RBracket => self.bracket += 1,
            TokenKind::LBracket => self.bracket = self.bracket.saturating_sub(1),
            TokenKind::Gt if self.angles => self.angle += 1,
            TokenKind::Shr if self.angles => self.angle += 2,
            TokenKind::Lt if self.angles => self.angle = self.angle.saturating_sub(1),
            _ => {}
        }
    }

    /// Depth for the delimiter family of `kind`.
    #[must_use]
    pub fn depth_of(&self, kind: TokenKind) -> usize {
        match kind {
            TokenKind::LParen | TokenKind::RParen => self.paren,
            TokenKind::LBrace | TokenKind::RBrace => self.brace,
            TokenKind::LBracket | TokenKind::RBracket => self.bracket,
            TokenKind::Lt | TokenKind::Gt | TokenKind::Shr => self.angle,
            _ => 0,
        }
    }

    /// Returns true when no delimiter is open.
    #[must_use]
    pub fn is_top_level(&self) -> bool {
        self.paren == 0 && self.brace == 0 && self.bracket == 0 && self.angle == 0
    }
}
