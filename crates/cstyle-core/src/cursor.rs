//! Bidirectional cursor over an immutable token sequence.
//!
//! Peeks are pure (`&self`); only `advance*`, `retreat*`, `seek`, and
//! `restore` move the position. Speculative scans push a checkpoint, move
//! freely, and restore; the checkpoint stack must be empty again by the time
//! a classification call or rule callback returns.
//!
//! "Significant" tokens are everything except whitespace, line breaks,
//! continuations, comments, and preprocessor markers. Tokens on directive
//! lines are skipped too, unless the cursor itself sits on one.

use crate::error::InvariantError;
use crate::token::{Token, TokenKind};

/// A position in a token sequence plus a LIFO stack of saved positions.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
    checkpoints: Vec<usize>,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor at the first token.
    #[must_use]
    pub fn new(tokens: &'a [Token]) -> Self {
        Self::at(tokens, 0)
    }

    /// Creates a cursor at `pos`.
    #[must_use]
    pub fn at(tokens: &'a [Token], pos: usize) -> Self {
        Self {
            tokens,
            pos,
            checkpoints: Vec::new(),
        }
    }

    /// Returns an independent cursor at the same position with no checkpoints.
    #[must_use]
    pub fn fork(&self) -> Self {
        Self::at(self.tokens, self.pos)
    }

    /// The underlying token sequence.
    #[must_use]
    pub fn tokens(&self) -> &'a [Token] {
        self.tokens
    }

    /// Current position.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Token at the current position.
    #[must_use]
    pub fn current(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    /// Number of outstanding checkpoints.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.checkpoints.len()
    }

    fn in_directive(&self) -> bool {
        self.current().is_some_and(|t| t.preprocessor)
    }

    fn counts(&self, token: &Token) -> bool {
        token.is_significant() && (!token.preprocessor || self.in_directive())
    }

    // --- raw adjacency ---

    /// The `n`-th token after the current one, trivia included.
    #[must_use]
    pub fn peek_raw(&self, n: usize) -> Option<&'a Token> {
        self.tokens.get(self.pos.checked_add(n)?)
    }

    /// The `n`-th token before the current one, trivia included.
    #[must_use]
    pub fn peek_raw_back(&self, n: usize) -> Option<&'a Token> {
        self.tokens.get(self.pos.checked_sub(n)?)
    }

    // --- significant adjacency ---

    /// The `n`-th significant token after the current one.
    #[must_use]
    pub fn peek_next(&self, n: usize) -> Option<&'a Token> {
        self.tokens
            .get(self.pos + 1..)?
            .iter()
            .filter(|t| self.counts(t))
            .nth(n.checked_sub(1)?)
    }

    /// The `n`-th significant token before the current one.
    #[must_use]
    pub fn peek_prev(&self, n: usize) -> Option<&'a Token> {
        self.tokens
            .get(..self.pos.min(self.tokens.len()))?
            .iter()
            .rev()
            .filter(|t| self.counts(t))
            .nth(n.checked_sub(1)?)
    }

    // --- type-directed search ---

    /// The next significant token whose kind is in `kinds`.
    #[must_use]
    pub fn peek_next_of(&self, kinds: &[TokenKind]) -> Option<&'a Token> {
        self.tokens
            .get(self.pos + 1..)?
            .iter()
            .find(|t| self.counts(t) && kinds.contains(&t.kind))
    }

    /// The previous significant token whose kind is in `kinds`.
    #[must_use]
    pub fn peek_prev_of(&self, kinds: &[TokenKind]) -> Option<&'a Token> {
        self.tokens
            .get(..self.pos.min(self.tokens.len()))?
            .iter()
            .rev()
            .find(|t| self.counts(t) && kinds.contains(&t.kind))
    }

    // --- movement ---

    /// Moves one raw token forward.
    pub fn advance(&mut self) -> Option<&'a Token> {
        let next = self.peek_raw(1)?;
        self.pos = next.index;
        Some(next)
    }

    /// Moves to the next significant token.
    pub fn advance_significant(&mut self) -> Option<&'a Token> {
        let next = self.peek_next(1)?;
        self.pos = next.index;
        Some(next)
    }

    /// Moves to the previous significant token.
    pub fn retreat_significant(&mut self) -> Option<&'a Token> {
        let prev = self.peek_prev(1)?;
        self.pos = prev.index;
        Some(prev)
    }

    /// Moves to the next significant token of one of `kinds`.
    ///
    /// Leaves the position unchanged when the sequence ends first.
    pub fn advance_to(&mut self, kinds: &[TokenKind]) -> Option<&'a Token> {
        let found = self.peek_next_of(kinds)?;
        self.pos = found.index;
        Some(found)
    }

    /// Moves to the previous significant token of one of `kinds`.
    pub fn retreat_to(&mut self, kinds: &[TokenKind]) -> Option<&'a Token> {
        let found = self.peek_prev_of(kinds)?;
        self.pos = found.index;
        Some(found)
    }

    /// Jumps to an absolute position.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantError::OutOfRange`] if `pos` is not a token index.
    pub fn seek(&mut self, pos: usize) -> Result<(), InvariantError> {
        if pos >= self.tokens.len() {
            return Err(InvariantError::OutOfRange {
                index: pos,
                len: self.tokens.len(),
            });
        }
        self.pos = pos;
        Ok(())
    }

    // --- checkpointing ---

    /// Saves the current position.
    pub fn checkpoint(&mut self) {
        self.checkpoints.push(self.pos);
    }

    /// Returns to the most recently saved position.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantError::RestoreWithoutCheckpoint`] if nothing was saved.
    pub fn restore(&mut self) -> Result<(), InvariantError> {
        self.pos = self
            .checkpoints
            .pop()
            .ok_or(InvariantError::RestoreWithoutCheckpoint)?;
        Ok(())
    }

    /// Runs `scan` between a checkpoint and a restore.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantError::UnbalancedCheckpoint`] if `scan` leaves extra
    /// checkpoints behind, or the restore error if it consumed ours.
    pub fn speculate<T>(&mut self, scan: impl FnOnce(&mut Self) -> T) -> Result<T, InvariantError> {
        let depth = self.depth();
        self.checkpoint();
        let out = scan(self);
        if self.depth() > depth + 1 {
            return Err(InvariantError::UnbalancedCheckpoint {
                depth: self.depth() - depth - 1,
            });
        }
        if self.depth() <= depth {
            return Err(InvariantError::RestoreWithoutCheckpoint);
        }
        self.restore()?;
        Ok(out)
    }

    /// Fails if any checkpoint is still outstanding.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantError::UnbalancedCheckpoint`] with the leftover depth.
    pub fn ensure_balanced(&self) -> Result<(), InvariantError> {
        match self.depth() {
            0 => Ok(()),
            depth => Err(InvariantError::UnbalancedCheckpoint { depth }),
        }
    }
}
