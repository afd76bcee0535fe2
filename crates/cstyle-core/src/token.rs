//! Token model shared by the tokenizer, the cursor, and every classifier.
//!
//! A [`TokenStream`] is produced once per file and never mutated afterwards.
//! All queries (cursor peeks, delimiter matching, classification) work on the
//! `&[Token]` slice it owns.

use serde::Serialize;

/// Closed set of token kinds produced by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[allow(missing_docs)]
pub enum TokenKind {
    // Trivia
    Whitespace,
    Newline,
    LineContinuation,
    Comment,
    /// `#` merged with its directive name (`#include`, `#define`, ...).
    Directive,
    /// `<stdio.h>` or `"local.h"` after `#include` / `#import`.
    HeaderName,

    // Words
    Identifier,
    /// Identifier (or `operator`) heading a function declaration.
    FunctionName,
    /// Any keyword without a dedicated kind (`int`, `const`, `static`, ...).
    Keyword,
    If,
    Else,
    While,
    For,
    Do,
    Switch,
    Return,
    Namespace,
    Class,
    Struct,
    Union,
    Enum,
    Operator,
    Try,
    Catch,
    Extern,
    Template,

    // Literals
    Number,
    String,
    Char,

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Semicolon,
    Colon,
    DoubleColon,
    Period,
    Ellipsis,
    Arrow,
    Question,
    Tilde,
    Not,
    Hash,
    HashHash,

    // Operators
    Assign,
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Increment,
    Decrement,
    Amp,
    Pipe,
    Caret,
    AndAnd,
    OrOr,
    Shl,
    Shr,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    PercentAssign,
    AmpAssign,
    PipeAssign,
    CaretAssign,
    ShlAssign,
    ShrAssign,

    Unknown,
}

impl TokenKind {
    /// Returns true for whitespace, line breaks, continuations, comments,
    /// and preprocessor markers.
    #[must_use]
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::Whitespace
                | Self::Newline
                | Self::LineContinuation
                | Self::Comment
                | Self::Directive
                | Self::HeaderName
        )
    }

    /// Returns true for horizontal whitespace and line breaks only.
    #[must_use]
    pub fn is_blank(self) -> bool {
        matches!(self, Self::Whitespace | Self::Newline | Self::LineContinuation)
    }

    /// Returns true for identifiers and function-name tokens.
    #[must_use]
    pub fn is_name(self) -> bool {
        matches!(self, Self::Identifier | Self::FunctionName)
    }

    /// Returns true for the three opening delimiters.
    #[must_use]
    pub fn is_opener(self) -> bool {
        matches!(self, Self::LParen | Self::LBrace | Self::LBracket)
    }

    /// Returns true for the three closing delimiters.
    #[must_use]
    pub fn is_closer(self) -> bool {
        matches!(self, Self::RParen | Self::RBrace | Self::RBracket)
    }

    /// Returns the partner kind of a delimiter.
    #[must_use]
    pub fn partner(self) -> Option<Self> {
        match self {
            Self::LParen => Some(Self::RParen),
            Self::RParen => Some(Self::LParen),
            Self::LBrace => Some(Self::RBrace),
            Self::RBrace => Some(Self::LBrace),
            Self::LBracket => Some(Self::RBracket),
            Self::RBracket => Some(Self::LBracket),
            _ => None,
        }
    }

    /// Returns true for literal kinds.
    #[must_use]
    pub fn is_literal(self) -> bool {
        matches!(self, Self::Number | Self::String | Self::Char)
    }

    /// Returns true for assignment and compound-assignment operators.
    #[must_use]
    pub fn is_assignment(self) -> bool {
        matches!(
            self,
            Self::Assign
                | Self::PlusAssign
                | Self::MinusAssign
                | Self::StarAssign
                | Self::SlashAssign
                | Self::PercentAssign
                | Self::AmpAssign
                | Self::PipeAssign
                | Self::CaretAssign
                | Self::ShlAssign
                | Self::ShrAssign
        )
    }

    /// Returns true for every operator kind, assignments included.
    #[must_use]
    pub fn is_operator(self) -> bool {
        self.is_assignment()
            || matches!(
                self,
                Self::Eq
                    | Self::NotEq
                    | Self::Lt
                    | Self::Gt
                    | Self::LtEq
                    | Self::GtEq
                    | Self::Plus
                    | Self::Minus
                    | Self::Star
                    | Self::Slash
                    | Self::Percent
                    | Self::Increment
                    | Self::Decrement
                    | Self::Amp
                    | Self::Pipe
                    | Self::Caret
                    | Self::AndAnd
                    | Self::OrOr
                    | Self::Shl
                    | Self::Shr
                    | Self::Not
                    | Self::Tilde
                    | Self::Question
            )
    }

    /// Returns true for keywords that open a control-flow condition.
    #[must_use]
    pub fn is_control(self) -> bool {
        matches!(self, Self::If | Self::While | Self::For | Self::Switch)
    }
}

/// Subkind of a comment token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CommentKind {
    /// `/** */`, `/*! */`, `///`, `//!`.
    Doxygen,
    /// Any other comment.
    Plain,
}

/// A single lexical token with its position in the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// Kind of this token.
    pub kind: TokenKind,
    /// Exact source text.
    pub text: String,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column in characters (1-indexed).
    pub column: usize,
    /// Byte offset from the start of the file.
    pub offset: usize,
    /// Position of this token in its stream.
    pub index: usize,
    /// Whether this token was produced inside a preprocessor directive.
    pub preprocessor: bool,
    /// Comment subkind, set only for [`TokenKind::Comment`].
    pub comment: Option<CommentKind>,
}

impl Token {
    /// Returns true if this token is not trivia.
    #[must_use]
    pub fn is_significant(&self) -> bool {
        !self.kind.is_trivia()
    }

    /// Returns true for a doxygen-style comment.
    #[must_use]
    pub fn is_doc_comment(&self) -> bool {
        self.comment == Some(CommentKind::Doxygen)
    }

    /// Byte length of the token text.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns true if the token text is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Immutable token sequence for one file.
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    pub(crate) fn from_tokens(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// Returns the tokens as a slice.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if there are no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Iterates over significant tokens only.
    pub fn significant(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(|t| t.is_significant())
    }
}

impl std::ops::Deref for TokenStream {
    type Target = [Token];

    fn deref(&self) -> &Self::Target {
        &self.tokens
    }
}
