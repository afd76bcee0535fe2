//! Tokenizer for C-family source text.
//!
//! Raw lexing is done by `logos`; a small assembly pass on top of it:
//! - keeps every byte of trivia (whitespace, line breaks, continuations, comments)
//! - merges `#` at the start of a line with its directive name
//! - turns `#include` targets into a single header-name token
//! - flags every token on a directive line as preprocessor
//! - marks identifiers that head a function declaration as [`TokenKind::FunctionName`]
//!
//! Lexing never fails: bytes no pattern accepts become [`TokenKind::Unknown`].

use logos::Logos;

use crate::token::{CommentKind, Token, TokenKind, TokenStream};

/// Raw token from logos (before keyword classification and directive merging).
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum RawToken {
    #[regex(r"[ \t\x0B\x0C]+")]
    Whitespace,

    #[regex(r"\r?\n")]
    Newline,

    #[regex(r"\\[ \t]*\r?\n")]
    LineContinuation,

    #[regex(r"//[^\r\n]*")]
    LineComment,

    #[token("/*")]
    BlockCommentStart,

    #[regex(r#"(u8|u|U|L)?"([^"\\\r\n]|\\[^\r\n]|\\\r?\n)*""#)]
    String,

    #[regex(r"(u8|u|U|L)?'([^'\\\r\n]|\\[^\r\n])*'")]
    Char,

    #[regex(r"[0-9]([0-9A-Za-z_.']|[eEpP][+-])*")]
    #[regex(r"\.[0-9]([0-9A-Za-z_.']|[eEpP][+-])*")]
    Number,

    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*")]
    Word,

    // === Punctuation ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token("::")]
    DoubleColon,
    #[token(".")]
    Period,
    #[token("...")]
    Ellipsis,
    #[token("->")]
    Arrow,
    #[token("?")]
    Question,
    #[token("~")]
    Tilde,
    #[token("!")]
    Not,
    #[token("#")]
    Hash,
    #[token("##")]
    HashHash,

    // === Operators ===
    #[token("=")]
    Assign,
    #[token("==")]
    Eq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("++")]
    Increment,
    #[token("--")]
    Decrement,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("+=")]
    PlusAssign,
    #[token("-=")]
    MinusAssign,
    #[token("*=")]
    StarAssign,
    #[token("/=")]
    SlashAssign,
    #[token("%=")]
    PercentAssign,
    #[token("&=")]
    AmpAssign,
    #[token("|=")]
    PipeAssign,
    #[token("^=")]
    CaretAssign,
    #[token("<<=")]
    ShlAssign,
    #[token(">>=")]
    ShrAssign,
}

/// Keywords folded into [`TokenKind::Keyword`].
const GENERIC_KEYWORDS: &[&str] = &[
    "alignas",
    "alignof",
    "auto",
    "bool",
    "break",
    "case",
    "char",
    "char8_t",
    "char16_t",
    "char32_t",
    "co_await",
    "co_return",
    "co_yield",
    "concept",
    "const",
    "const_cast",
    "consteval",
    "constexpr",
    "constinit",
    "continue",
    "decltype",
    "default",
    "delete",
    "double",
    "dynamic_cast",
    "explicit",
    "export",
    "false",
    "float",
    "friend",
    "goto",
    "inline",
    "int",
    "long",
    "mutable",
    "new",
    "noexcept",
    "nullptr",
    "private",
    "protected",
    "public",
    "register",
    "reinterpret_cast",
    "requires",
    "restrict",
    "short",
    "signed",
    "sizeof",
    "static",
    "static_assert",
    "static_cast",
    "thread_local",
    "this",
    "throw",
    "true",
    "typedef",
    "typeid",
    "typename",
    "unsigned",
    "using",
    "virtual",
    "void",
    "volatile",
    "wchar_t",
];

/// Length of the rest of a block comment after its `/*`, through `*/`.
///
/// An unterminated comment runs to the end of the source.
fn block_comment_len(rest: &str) -> usize {
    rest.find("*/").map_or(rest.len(), |end| end + 2)
}

/// Directives whose argument is a header name.
const INCLUDE_DIRECTIVES: &[&str] = &["include", "include_next", "import"];

/// Tokenizes C-family source text.
///
/// The concatenated `text` of the returned tokens reproduces `source` exactly.
#[must_use]
pub fn tokenize(source: &str) -> TokenStream {
    let mut builder = StreamBuilder::new(source);
    let mut lex = RawToken::lexer(source);

    while let Some(result) = lex.next() {
        let start = lex.span().start;
        let kind = match result {
            Ok(RawToken::Hash) if builder.at_line_start => {
                let extra = directive_name_len(lex.remainder());
                lex.bump(extra);
                builder.start_directive(source[start + 1..lex.span().end].trim());
                TokenKind::Directive
            }
            Ok(RawToken::Lt) if builder.header_pending => {
                match angle_header_len(lex.remainder()) {
                    Some(len) => {
                        lex.bump(len);
                        TokenKind::HeaderName
                    }
                    None => TokenKind::Lt,
                }
            }
            Ok(RawToken::BlockCommentStart) => {
                lex.bump(block_comment_len(lex.remainder()));
                TokenKind::Comment
            }
            Ok(RawToken::String) if builder.header_pending => TokenKind::HeaderName,
            Ok(raw) => convert(raw, lex.slice()),
            Err(()) => TokenKind::Unknown,
        };
        builder.push(kind, start, lex.span().end);
    }

    let mut tokens = builder.tokens;
    mark_function_names(&mut tokens);
    TokenStream::from_tokens(tokens)
}

fn convert(raw: RawToken, slice: &str) -> TokenKind {
    match raw {
        RawToken::Whitespace => TokenKind::Whitespace,
        RawToken::Newline => TokenKind::Newline,
        RawToken::LineContinuation => TokenKind::LineContinuation,
        RawToken::LineComment | RawToken::BlockCommentStart => TokenKind::Comment,
        RawToken::String => TokenKind::String,
        RawToken::Char => TokenKind::Char,
        RawToken::Number => TokenKind::Number,
        RawToken::Word => classify_word(slice),
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Colon => TokenKind::Colon,
        RawToken::DoubleColon => TokenKind::DoubleColon,
        RawToken::Period => TokenKind::Period,
        RawToken::Ellipsis => TokenKind::Ellipsis,
        RawToken::Arrow => TokenKind::Arrow,
        RawToken::Question => TokenKind::Question,
        RawToken::Tilde => TokenKind::Tilde,
        RawToken::Not => TokenKind::Not,
        RawToken::Hash => TokenKind::Hash,
        RawToken::HashHash => TokenKind::HashHash,
        RawToken::Assign => TokenKind::Assign,
        RawToken::Eq => TokenKind::Eq,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::Lt => TokenKind::Lt,
        RawToken::Gt => TokenKind::Gt,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::Increment => TokenKind::Increment,
        RawToken::Decrement => TokenKind::Decrement,
        RawToken::Amp => TokenKind::Amp,
        RawToken::Pipe => TokenKind::Pipe,
        RawToken::Caret => TokenKind::Caret,
        RawToken::AndAnd => TokenKind::AndAnd,
        RawToken::OrOr => TokenKind::OrOr,
        RawToken::Shl => TokenKind::Shl,
        RawToken::Shr => TokenKind::Shr,
        RawToken::PlusAssign => TokenKind::PlusAssign,
        RawToken::MinusAssign => TokenKind::MinusAssign,
        RawToken::StarAssign => TokenKind::StarAssign,
        RawToken::SlashAssign => TokenKind::SlashAssign,
        RawToken::PercentAssign => TokenKind::PercentAssign,
        RawToken::AmpAssign => TokenKind::AmpAssign,
        RawToken::PipeAssign => TokenKind::PipeAssign,
        RawToken::CaretAssign => TokenKind::CaretAssign,
        RawToken::ShlAssign => TokenKind::ShlAssign,
        RawToken::ShrAssign => TokenKind::ShrAssign,
    }
}

fn classify_word(word: &str) -> TokenKind {
    match word {
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "while" => TokenKind::While,
        "for" => TokenKind::For,
        "do" => TokenKind::Do,
        "switch" => TokenKind::Switch,
        "return" => TokenKind::Return,
        "namespace" => TokenKind::Namespace,
        "class" => TokenKind::Class,
        "struct" => TokenKind::Struct,
        "union" => TokenKind::Union,
        "enum" => TokenKind::Enum,
        "operator" => TokenKind::Operator,
        "try" => TokenKind::Try,
        "catch" => TokenKind::Catch,
        "extern" => TokenKind::Extern,
        "template" => TokenKind::Template,
        w if GENERIC_KEYWORDS.contains(&w) => TokenKind::Keyword,
        _ => TokenKind::Identifier,
    }
}

fn comment_kind(text: &str) -> CommentKind {
    let doxygen = (text.starts_with("/**") && text != "/**/" && !text.starts_with("/***"))
        || text.starts_with("/*!")
        || (text.starts_with("///") && !text.starts_with("////"))
        || text.starts_with("//!");
    if doxygen {
        CommentKind::Doxygen
    } else {
        CommentKind::Plain
    }
}

/// Length of `[ \t]*name` at the start of `rest`, or 0 when no name follows.
fn directive_name_len(rest: &str) -> usize {
    let spaces = rest.len() - rest.trim_start_matches([' ', '\t']).len();
    let name = rest[spaces..]
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
        .count();
    if name == 0 {
        0
    } else {
        spaces + name
    }
}

/// Length of the rest of `<...>` (after the `<`) when it closes on this line.
fn angle_header_len(rest: &str) -> Option<usize> {
    let line_end = rest.find(['\n', '\r']).unwrap_or(rest.len());
    rest[..line_end].find('>').map(|i| i + 1)
}

/// Accumulates tokens while tracking position and directive state.
struct StreamBuilder<'s> {
    source: &'s str,
    tokens: Vec<Token>,
    line: usize,
    column: usize,
    at_line_start: bool,
    in_directive: bool,
    header_pending: bool,
}

impl<'s> StreamBuilder<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            tokens: Vec::new(),
            line: 1,
            column: 1,
            at_line_start: true,
            in_directive: false,
            header_pending: false,
        }
    }

    fn start_directive(&mut self, name: &str) {
        self.in_directive = true;
        self.header_pending = INCLUDE_DIRECTIVES.contains(&name);
    }

    fn push(&mut self, kind: TokenKind, start: usize, end: usize) {
        let text = &self.source[start..end];
        let preprocessor = self.in_directive && kind != TokenKind::Newline;

        match kind {
            TokenKind::Newline => {
                self.in_directive = false;
                self.header_pending = false;
                self.at_line_start = true;
            }
            TokenKind::Whitespace => {}
            TokenKind::Comment | TokenKind::LineContinuation => self.at_line_start = false,
            _ => {
                self.at_line_start = false;
                if kind != TokenKind::Directive {
                    self.header_pending = false;
                }
            }
        }

        self.tokens.push(Token {
            kind,
            text: text.to_string(),
            line: self.line,
            column: self.column,
            offset: start,
            index: self.tokens.len(),
            preprocessor,
            comment: (kind == TokenKind::Comment).then(|| comment_kind(text)),
        });

        for c in text.chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }
}

// --- function-name marking ---

/// Keywords that can never precede a declarator name.
const NON_DECLARATOR_KEYWORDS: &[&str] = &[
    "case",
    "co_await",
    "co_return",
    "co_yield",
    "decltype",
    "delete",
    "goto",
    "new",
    "sizeof",
    "throw",
    "typeid",
    "using",
];

/// Qualifiers allowed between a parameter list and the body or terminator.
pub(crate) const TAIL_QUALIFIERS: &[&str] = &[
    "const", "volatile", "noexcept", "throw", "override", "final", "mutable", "requires",
];

/// Significant, non-preprocessor tokens with their delimiter partners.
struct CodeView<'a> {
    tokens: &'a [Token],
    code: Vec<usize>,
    partners: Vec<Option<usize>>,
}

impl<'a> CodeView<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        let code: Vec<usize> = tokens
            .iter()
            .filter(|t| t.is_significant() && !t.preprocessor)
            .map(|t| t.index)
            .collect();

        let mut partners = vec![None; code.len()];
        let mut stacks: [Vec<usize>; 3] = [Vec::new(), Vec::new(), Vec::new()];
        for (pos, &idx) in code.iter().enumerate() {
            let slot = match tokens[idx].kind {
                TokenKind::LParen | TokenKind::RParen => 0,
                TokenKind::LBrace | TokenKind::RBrace => 1,
                TokenKind::LBracket | TokenKind::RBracket => 2,
                _ => continue,
            };
            if tokens[idx].kind.is_opener() {
                stacks[slot].push(pos);
            } else if let Some(open) = stacks[slot].pop() {
                partners[open] = Some(pos);
                partners[pos] = Some(open);
            }
        }

        Self {
            tokens,
            code,
            partners,
        }
    }

    fn kind(&self, pos: usize) -> Option<TokenKind> {
        self.code.get(pos).map(|&i| self.tokens[i].kind)
    }

    fn text(&self, pos: usize) -> &str {
        self.code.get(pos).map_or("", |&i| self.tokens[i].text.as_str())
    }

    fn partner(&self, pos: usize) -> Option<usize> {
        self.partners.get(pos).copied().flatten()
    }
}

fn mark_function_names(tokens: &mut [Token]) {
    let marks = {
        let view = CodeView::new(tokens);
        let mut marks = Vec::new();
        let mut scopes: Vec<bool> = Vec::new();

        for pos in 0..view.code.len() {
            match view.kind(pos) {
                Some(TokenKind::LBrace) => scopes.push(opens_declaration_scope(&view, pos)),
                Some(TokenKind::RBrace) => {
                    scopes.pop();
                }
                Some(TokenKind::Identifier | TokenKind::Operator)
                    if scopes.last().copied().unwrap_or(true) && heads_function(&view, pos) =>
                {
                    marks.push(view.code[pos]);
                }
                _ => {}
            }
        }
        marks
    };

    for idx in marks {
        tokens[idx].kind = TokenKind::FunctionName;
    }
}

/// Whether the `{` at `pos` opens a namespace, record, or `extern "C"` body.
fn opens_declaration_scope(view: &CodeView<'_>, pos: usize) -> bool {
    let mut saw_record = false;
    let mut p = pos;
    while p > 0 {
        p -= 1;
        match view.kind(p) {
            Some(TokenKind::Semicolon | TokenKind::LBrace | TokenKind::RBrace) | None => break,
            Some(TokenKind::RParen) => {
                let Some(open) = view.partner(p) else {
                    return false;
                };
                if open == 0 || !is_attribute_name(view.text(open - 1)) {
                    return false;
                }
                p = open;
            }
            Some(TokenKind::Assign | TokenKind::Enum) => return false,
            Some(TokenKind::Namespace | TokenKind::Class | TokenKind::Struct | TokenKind::Union) => {
                saw_record = true;
            }
            Some(TokenKind::String) if p > 0 && view.kind(p - 1) == Some(TokenKind::Extern) => {
                return true;
            }
            Some(_) => {}
        }
    }
    saw_record
}

pub(crate) fn is_attribute_name(text: &str) -> bool {
    text.starts_with("__") || text == "alignas"
}

/// Whether the name at `pos` heads a function declaration or definition.
fn heads_function(view: &CodeView<'_>, pos: usize) -> bool {
    let open = if view.kind(pos) == Some(TokenKind::Operator) {
        match operator_params_open(view, pos) {
            Some(open) => open,
            None => return false,
        }
    } else if view.kind(pos + 1) == Some(TokenKind::LParen) {
        pos + 1
    } else {
        return false;
    };

    if !prev_allows_declarator(view, pos) || statement_assigns(view, pos) {
        return false;
    }
    let Some(close) = view.partner(open) else {
        return false;
    };
    if view.kind(pos) != Some(TokenKind::Operator)
        && close > open + 1
        && view.kind(open + 1).is_some_and(TokenKind::is_literal)
    {
        return false;
    }

    let Some(after) = skip_declarator_tail(view, close + 1) else {
        return false;
    };
    matches!(
        view.kind(after),
        Some(
            TokenKind::LBrace
                | TokenKind::Semicolon
                | TokenKind::Colon
                | TokenKind::Assign
                | TokenKind::Try
        )
    )
}

/// Position of the parameter list `(` of an `operator` overload.
fn operator_params_open(view: &CodeView<'_>, pos: usize) -> Option<usize> {
    let first = pos + 1;
    if view.kind(first) == Some(TokenKind::LParen) {
        let close = view.partner(first)?;
        return (view.kind(close + 1) == Some(TokenKind::LParen)).then_some(close + 1);
    }
    (first..first + 4).find(|&p| view.kind(p) == Some(TokenKind::LParen))
}

fn prev_allows_declarator(view: &CodeView<'_>, pos: usize) -> bool {
    let Some(p) = pos.checked_sub(1) else {
        return true;
    };
    match view.kind(p) {
        Some(
            TokenKind::Semicolon
            | TokenKind::LBrace
            | TokenKind::RBrace
            | TokenKind::DoubleColon
            | TokenKind::Tilde
            | TokenKind::Identifier
            | TokenKind::Star
            | TokenKind::Amp
            | TokenKind::AndAnd
            | TokenKind::Gt
            | TokenKind::Shr
            | TokenKind::RBracket,
        ) => true,
        // `public:` style labels only, never a constructor initializer colon.
        Some(TokenKind::Colon) => {
            p > 0
                && matches!(
                    view.text(p - 1),
                    "public" | "private" | "protected" | "signals" | "slots"
                )
        }
        Some(TokenKind::Keyword) => !NON_DECLARATOR_KEYWORDS.contains(&view.text(p)),
        _ => false,
    }
}

/// Whether the statement containing `pos` has an `=` or `return` before it.
fn statement_assigns(view: &CodeView<'_>, pos: usize) -> bool {
    let mut p = pos;
    while p > 0 {
        p -= 1;
        match view.kind(p) {
            Some(TokenKind::Semicolon | TokenKind::LBrace | TokenKind::RBrace) | None => break,
            Some(TokenKind::Assign | TokenKind::Return) => return true,
            Some(TokenKind::RParen) => match view.partner(p) {
                Some(open) => p = open,
                None => break,
            },
            Some(_) => {}
        }
    }
    false
}

/// Skips qualifiers, attributes, and a trailing return type after `)`.
fn skip_declarator_tail(view: &CodeView<'_>, start: usize) -> Option<usize> {
    let mut p = start;
    loop {
        let kind = view.kind(p)?;
        match kind {
            TokenKind::Keyword | TokenKind::Identifier
                if TAIL_QUALIFIERS.contains(&view.text(p)) || is_attribute_name(view.text(p)) =>
            {
                p += 1;
                if view.kind(p) == Some(TokenKind::LParen) {
                    p = view.partner(p)? + 1;
                }
            }
            TokenKind::Amp | TokenKind::AndAnd => p += 1,
            TokenKind::LBracket if view.kind(p + 1) == Some(TokenKind::LBracket) => {
                p = view.partner(p)? + 1;
            }
            TokenKind::Arrow => {
                p += 1;
                while let Some(k) = view.kind(p) {
                    match k {
                        TokenKind::LBrace | TokenKind::Semicolon | TokenKind::Assign => break,
                        TokenKind::LParen | TokenKind::LBracket => p = view.partner(p)? + 1,
                        _ => p += 1,
                    }
                }
            }
            _ => return Some(p),
        }
    }
}
