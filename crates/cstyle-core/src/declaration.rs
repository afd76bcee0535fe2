//! Declaration context tracking.
//!
//! The tracker is fed every significant token in order. When a token heads a
//! namespace, record, or function declaration it builds a [`ContextNode`],
//! moves it from `SignatureSeen` to `Open` (a body brace was found) or
//! `ForwardDeclared` (a terminator was found), and pushes open nodes onto the
//! [`ContextStack`]. Reaching a node's body closer pops it.

use serde::Serialize;
use tracing::debug;

use crate::cursor::Cursor;
use crate::error::InvariantError;
use crate::lexer::{is_attribute_name, TAIL_QUALIFIERS};
use crate::matcher::{find_enclosing, find_match, DelimiterDepths};
use crate::token::{Token, TokenKind};
use crate::utils::columns::line_indent;

/// Upper bound on tokens inspected when looking for an enclosing parenthesis.
const ENCLOSING_LIMIT: usize = 256;

/// Upper bound on tokens walked through a constructor initializer list.
const INITIALIZER_LIMIT: usize = 512;

/// What kind of scope a declaration opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ContextKind {
    /// `namespace`.
    Namespace,
    /// `class`.
    Class,
    /// `struct`.
    Struct,
    /// `union`.
    Union,
    /// A function declaration or definition.
    Function,
}

impl ContextKind {
    /// Returns true for class, struct and union.
    #[must_use]
    pub fn is_record(self) -> bool {
        matches!(self, Self::Class | Self::Struct | Self::Union)
    }
}

/// Lifecycle of a declaration as the traversal passes over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DeclarationState {
    /// Head recognized, body or terminator not yet resolved.
    SignatureSeen,
    /// Body brace found; the node is on the stack.
    Open,
    /// Terminated by `;` without a body; never pushed.
    ForwardDeclared,
    /// The traversal reached the body closer.
    Closed,
}

/// One recognized declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextNode {
    /// Scope kind.
    pub kind: ContextKind,
    /// Name qualified by the enclosing named scopes, `""` when anonymous.
    pub qualified_name: String,
    /// Token the declaration was recognized at (keyword or function name).
    pub anchor: usize,
    /// First significant token of the declaration statement.
    pub declaration_start: usize,
    /// Opening brace of the body.
    pub body_open: Option<usize>,
    /// Closing brace of the body, `None` when unmatched.
    pub body_close: Option<usize>,
    /// Parameter list parentheses of a function.
    pub parameters: Option<(usize, usize)>,
    /// Whether the declaration has no body.
    pub is_forward_declaration: bool,
    /// Tab-expanded indentation of the declaration's first line.
    pub indent_column: usize,
    /// Current state.
    pub state: DeclarationState,
}

impl ContextNode {
    fn signature(kind: ContextKind, qualified_name: String, anchor: usize) -> Self {
        Self {
            kind,
            qualified_name,
            anchor,
            declaration_start: anchor,
            body_open: None,
            body_close: None,
            parameters: None,
            is_forward_declaration: false,
            indent_column: 0,
            state: DeclarationState::SignatureSeen,
        }
    }

    fn open(mut self, body_open: usize, body_close: Option<usize>) -> Self {
        self.body_open = Some(body_open);
        self.body_close = body_close;
        self.state = DeclarationState::Open;
        self
    }

    fn forward(mut self) -> Self {
        self.is_forward_declaration = true;
        self.state = DeclarationState::ForwardDeclared;
        self
    }

    /// Returns true if the declaration has a body.
    #[must_use]
    pub fn is_definition(&self) -> bool {
        self.body_open.is_some()
    }

    /// The unqualified name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.qualified_name
            .rsplit("::")
            .next()
            .unwrap_or(&self.qualified_name)
    }
}

/// Stack of open declaration contexts, outermost first.
#[derive(Debug, Clone, Default)]
pub struct ContextStack {
    nodes: Vec<ContextNode>,
}

impl ContextStack {
    /// Pushes an open context.
    pub fn push(&mut self, node: ContextNode) {
        self.nodes.push(node);
    }

    /// Pops the innermost context and marks it closed.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantError::ContextUnderflow`] when the stack is empty.
    pub fn pop(&mut self) -> Result<ContextNode, InvariantError> {
        let mut node = self.nodes.pop().ok_or(InvariantError::ContextUnderflow)?;
        node.state = DeclarationState::Closed;
        Ok(node)
    }

    /// The innermost open context.
    #[must_use]
    pub fn innermost(&self) -> Option<&ContextNode> {
        self.nodes.last()
    }

    /// Iterates from the outermost context inward.
    pub fn iter(&self) -> impl Iterator<Item = &ContextNode> {
        self.nodes.iter()
    }

    /// Number of open contexts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true at file scope.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Recognizes declarations and maintains the context stack for one file.
#[derive(Debug, Clone)]
pub struct DeclarationTracker<'a> {
    tokens: &'a [Token],
    stack: ContextStack,
    tab_width: usize,
}

impl<'a> DeclarationTracker<'a> {
    /// Creates a tracker over `tokens`.
    #[must_use]
    pub fn new(tokens: &'a [Token], tab_width: usize) -> Self {
        Self {
            tokens,
            stack: ContextStack::default(),
            tab_width,
        }
    }

    /// The open contexts.
    #[must_use]
    pub fn stack(&self) -> &ContextStack {
        &self.stack
    }

    /// The innermost open context.
    #[must_use]
    pub fn innermost(&self) -> Option<&ContextNode> {
        self.stack.innermost()
    }

    /// Indentation of the outermost open context, 0 at file scope.
    #[must_use]
    pub fn top_level_indent(&self) -> usize {
        self.stack.iter().next().map_or(0, |node| node.indent_column)
    }

    /// Advances the tracker to the token at `index`.
    ///
    /// Closes every context whose body ends here, then returns the
    /// declaration headed by this token, if any.
    ///
    /// # Errors
    ///
    /// Returns an [`InvariantError`] if the stack underflows or the index is
    /// out of range.
    pub fn observe(&mut self, index: usize) -> Result<Option<ContextNode>, InvariantError> {
        let tokens = self.tokens;
        let token = tokens.get(index).ok_or(InvariantError::OutOfRange {
            index,
            len: tokens.len(),
        })?;

        while self
            .stack
            .innermost()
            .is_some_and(|node| node.body_close == Some(index))
        {
            let closed = self.stack.pop()?;
            debug!(kind = ?closed.kind, name = %closed.qualified_name, "closed declaration");
        }

        if token.preprocessor {
            return Ok(None);
        }
        let recognized = match token.kind {
            TokenKind::Namespace => self.recognize_namespace(index)?,
            TokenKind::Class | TokenKind::Struct | TokenKind::Union => {
                self.recognize_record(index)?
            }
            TokenKind::FunctionName => self.recognize_function(index)?,
            _ => None,
        };

        let Some(mut node) = recognized else {
            return Ok(None);
        };
        node.declaration_start = self.declaration_start(index);
        node.indent_column = line_indent(tokens, node.declaration_start, self.tab_width);
        debug!(
            kind = ?node.kind,
            name = %node.qualified_name,
            state = ?node.state,
            line = token.line,
            "recognized declaration"
        );
        if node.state == DeclarationState::Open {
            self.stack.push(node.clone());
        }
        Ok(Some(node))
    }

    /// Whether `position` lies inside a function parameter list.
    #[must_use]
    pub fn in_parameter_list(&self, position: usize) -> bool {
        let mut index = position;
        loop {
            let Some(open) = find_enclosing(self.tokens, index, ENCLOSING_LIMIT) else {
                return false;
            };
            match self.tokens[open].kind {
                TokenKind::LParen if self.heads_parameter_list(open) => return true,
                TokenKind::LBrace => return false,
                _ => index = open,
            }
        }
    }

    fn heads_parameter_list(&self, open: usize) -> bool {
        let cursor = Cursor::at(self.tokens, open);
        if cursor
            .peek_prev(1)
            .is_some_and(|t| t.kind == TokenKind::FunctionName)
        {
            return true;
        }
        (2..=3).any(|n| {
            cursor
                .peek_prev(n)
                .is_some_and(|t| t.kind == TokenKind::FunctionName && t.text == "operator")
        })
    }

    // --- recognizers ---

    fn recognize_namespace(&self, index: usize) -> Result<Option<ContextNode>, InvariantError> {
        let mut cursor = Cursor::at(self.tokens, index);
        if cursor.peek_prev(1).is_some_and(|t| t.text == "using") {
            return Ok(None);
        }

        let mut parts: Vec<&str> = Vec::new();
        loop {
            let Some(token) = cursor.advance_significant() else {
                return Ok(None);
            };
            match token.kind {
                TokenKind::Identifier => parts.push(&token.text),
                TokenKind::DoubleColon => {}
                TokenKind::Keyword if token.text == "inline" => {}
                TokenKind::LBracket => match find_match(self.tokens, token.index)? {
                    Some(close) => cursor.seek(close)?,
                    None => return Ok(None),
                },
                TokenKind::LBrace => {
                    let name = self.qualify(&parts.join("::"));
                    let close = find_match(self.tokens, token.index)?;
                    let node = ContextNode::signature(ContextKind::Namespace, name, index);
                    return Ok(Some(node.open(token.index, close)));
                }
                _ => return Ok(None),
            }
        }
    }

    fn recognize_record(&self, index: usize) -> Result<Option<ContextNode>, InvariantError> {
        let kind = match self.tokens[index].kind {
            TokenKind::Class => ContextKind::Class,
            TokenKind::Struct => ContextKind::Struct,
            TokenKind::Union => ContextKind::Union,
            _ => return Ok(None),
        };
        let mut cursor = Cursor::at(self.tokens, index);
        if cursor.peek_prev(1).is_some_and(|t| t.kind == TokenKind::Enum) {
            return Ok(None);
        }

        let mut chain: Vec<&str> = Vec::new();
        let mut prefixed = false;
        let mut after_scope = false;
        loop {
            let Some(token) = cursor.advance_significant() else {
                return Ok(None);
            };
            match token.kind {
                TokenKind::Identifier | TokenKind::Keyword
                    if is_attribute_name(&token.text)
                        && cursor.peek_next(1).is_some_and(|t| t.kind == TokenKind::LParen) =>
                {
                    let Some(open) = cursor.advance_significant() else {
                        return Ok(None);
                    };
                    match find_match(self.tokens, open.index)? {
                        Some(close) => cursor.seek(close)?,
                        None => return Ok(None),
                    }
                }
                TokenKind::Identifier if token.text == "final" && !chain.is_empty() => {}
                TokenKind::Identifier => {
                    if !after_scope && !chain.is_empty() {
                        // `class EXPORT_MACRO Name`; anything else is a variable.
                        if prefixed || chain.len() > 1 || !is_macro_like(chain[0]) {
                            return Ok(None);
                        }
                        prefixed = true;
                        chain.clear();
                    }
                    chain.push(&token.text);
                    after_scope = false;
                }
                TokenKind::DoubleColon => after_scope = true,
                TokenKind::LBracket => match find_match(self.tokens, token.index)? {
                    Some(close) => cursor.seek(close)?,
                    None => return Ok(None),
                },
                TokenKind::Lt if !chain.is_empty() => {
                    if !skip_template_arguments(&mut cursor) {
                        return Ok(None);
                    }
                }
                TokenKind::Colon => {
                    let Some(body) = cursor.advance_to(&[TokenKind::LBrace, TokenKind::Semicolon])
                    else {
                        return Ok(None);
                    };
                    if body.kind == TokenKind::Semicolon {
                        return Ok(None);
                    }
                    return self.record_body(kind, &chain, index, body.index).map(Some);
                }
                TokenKind::LBrace => {
                    return self.record_body(kind, &chain, index, token.index).map(Some);
                }
                TokenKind::Semicolon if !prefixed && !chain.is_empty() => {
                    let name = self.qualify(&chain.join("::"));
                    return Ok(Some(ContextNode::signature(kind, name, index).forward()));
                }
                _ => return Ok(None),
            }
        }
    }

    fn record_body(
        &self,
        kind: ContextKind,
        chain: &[&str],
        anchor: usize,
        open: usize,
    ) -> Result<ContextNode, InvariantError> {
        let name = self.qualify(&chain.join("::"));
        let close = find_match(self.tokens, open)?;
        Ok(ContextNode::signature(kind, name, anchor).open(open, close))
    }

    fn recognize_function(&self, index: usize) -> Result<Option<ContextNode>, InvariantError> {
        let Some(open) = self.parameter_open(index) else {
            return Ok(None);
        };
        let Some(close) = find_match(self.tokens, open)? else {
            return Ok(None);
        };

        let name = self.qualify(&self.function_name(index, open));
        let mut node = ContextNode::signature(ContextKind::Function, name, index);
        node.parameters = Some((open, close));

        let Some(after) = self.skip_declarator_tail(close)? else {
            return Ok(None);
        };
        let body = match after.kind {
            TokenKind::Semicolon => return Ok(Some(node.forward())),
            TokenKind::Assign => {
                let cursor = Cursor::at(self.tokens, after.index);
                let terminated = cursor
                    .peek_next(2)
                    .is_some_and(|t| t.kind == TokenKind::Semicolon);
                return Ok(terminated.then(|| node.forward()));
            }
            TokenKind::LBrace => Some(after.index),
            TokenKind::Try => Cursor::at(self.tokens, after.index)
                .peek_next(1)
                .filter(|t| t.kind == TokenKind::LBrace)
                .map(|t| t.index),
            TokenKind::Colon => self.initializer_list_body(after.index)?,
            _ => None,
        };

        match body {
            Some(body_open) => {
                let body_close = find_match(self.tokens, body_open)?;
                Ok(Some(node.open(body_open, body_close)))
            }
            None => Ok(None),
        }
    }

    /// The `(` opening the parameter list of the function named at `index`.
    fn parameter_open(&self, index: usize) -> Option<usize> {
        let cursor = Cursor::at(self.tokens, index);
        let first = cursor.peek_next(1)?;
        if self.tokens[index].text != "operator" {
            return (first.kind == TokenKind::LParen).then_some(first.index);
        }
        // `operator()(...)` has two groups; other overloads have one.
        if first.kind == TokenKind::LParen {
            let call = Cursor::at(self.tokens, find_match(self.tokens, first.index).ok()??);
            return call
                .peek_next(1)
                .filter(|t| t.kind == TokenKind::LParen)
                .map(|t| t.index);
        }
        (1..=4)
            .filter_map(|n| cursor.peek_next(n))
            .find(|t| t.kind == TokenKind::LParen)
            .map(|t| t.index)
    }

    fn function_name(&self, index: usize, open: usize) -> String {
        let mut head: String = self.tokens[index..open]
            .iter()
            .filter(|t| t.is_significant())
            .map(|t| t.text.as_str())
            .collect();

        let mut back = Cursor::at(self.tokens, index);
        if back.peek_prev(1).is_some_and(|t| t.kind == TokenKind::Tilde) {
            head.insert(0, '~');
            back.retreat_significant();
        }
        let mut parts = vec![head];
        while back
            .peek_prev(1)
            .is_some_and(|t| t.kind == TokenKind::DoubleColon)
        {
            match back.peek_prev(2) {
                Some(scope) if scope.kind.is_name() => parts.push(scope.text.clone()),
                _ => break,
            }
            back.retreat_significant();
            back.retreat_significant();
        }
        parts.reverse();
        parts.join("::")
    }

    /// First token after qualifiers, attributes, and a trailing return type.
    fn skip_declarator_tail(&self, close: usize) -> Result<Option<&'a Token>, InvariantError> {
        let mut cursor = Cursor::at(self.tokens, close);
        loop {
            let Some(token) = cursor.peek_next(1) else {
                return Ok(None);
            };
            match token.kind {
                TokenKind::Keyword | TokenKind::Identifier
                    if TAIL_QUALIFIERS.contains(&token.text.as_str())
                        || is_attribute_name(&token.text) =>
                {
                    cursor.seek(token.index)?;
                    if let Some(group) = cursor.peek_next(1).filter(|t| t.kind == TokenKind::LParen)
                    {
                        match find_match(self.tokens, group.index)? {
                            Some(end) => cursor.seek(end)?,
                            None => return Ok(None),
                        }
                    }
                }
                TokenKind::Amp | TokenKind::AndAnd => cursor.seek(token.index)?,
                TokenKind::LBracket => match find_match(self.tokens, token.index)? {
                    Some(end) => cursor.seek(end)?,
                    None => return Ok(None),
                },
                TokenKind::Arrow => {
                    cursor.seek(token.index)?;
                    while let Some(next) = cursor.peek_next(1) {
                        match next.kind {
                            TokenKind::LBrace | TokenKind::Semicolon | TokenKind::Assign => break,
                            TokenKind::LParen | TokenKind::LBracket => {
                                match find_match(self.tokens, next.index)? {
                                    Some(end) => cursor.seek(end)?,
                                    None => return Ok(None),
                                }
                            }
                            _ => cursor.seek(next.index)?,
                        }
                    }
                }
                _ => return Ok(Some(token)),
            }
        }
    }

    /// Walks `: member(init), other{init}` to the body brace.
    fn initializer_list_body(&self, colon: usize) -> Result<Option<usize>, InvariantError> {
        let mut cursor = Cursor::at(self.tokens, colon);
        let mut previous = TokenKind::Colon;
        for _ in 0..INITIALIZER_LIMIT {
            let Some(token) = cursor.peek_next(1) else {
                return Ok(None);
            };
            let initializes_member =
                previous.is_name() || matches!(previous, TokenKind::Gt | TokenKind::Shr);
            match token.kind {
                TokenKind::LParen | TokenKind::LBrace if initializes_member => {
                    match find_match(self.tokens, token.index)? {
                        Some(end) => cursor.seek(end)?,
                        None => return Ok(None),
                    }
                    previous = TokenKind::RParen;
                }
                TokenKind::LBrace => return Ok(Some(token.index)),
                TokenKind::Semicolon => return Ok(None),
                kind => {
                    cursor.seek(token.index)?;
                    previous = kind;
                }
            }
        }
        Ok(None)
    }

    /// First significant token after the previous `;`, `{`, `}` or label colon.
    fn declaration_start(&self, index: usize) -> usize {
        let mut back = Cursor::at(self.tokens, index);
        let mut start = index;
        while let Some(prev) = back.retreat_significant() {
            if matches!(
                prev.kind,
                TokenKind::Semicolon | TokenKind::LBrace | TokenKind::RBrace | TokenKind::Colon
            ) {
                break;
            }
            start = prev.index;
        }
        start
    }

    fn qualify(&self, name: &str) -> String {
        let mut parts: Vec<&str> = self
            .stack
            .iter()
            .filter(|node| node.kind != ContextKind::Function && !node.qualified_name.is_empty())
            .map(|node| node.name())
            .collect();
        if !name.is_empty() {
            parts.push(name);
        }
        parts.join("::")
    }
}

/// All-uppercase identifiers are treated as export/visibility macros.
fn is_macro_like(name: &str) -> bool {
    name.chars().any(|c| c.is_ascii_uppercase())
        && name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

/// Moves `cursor` from a `<` to its matching `>`.
fn skip_template_arguments(cursor: &mut Cursor<'_>) -> bool {
    let mut depths = DelimiterDepths::with_angles();
    depths.apply(TokenKind::Lt);
    while let Some(token) = cursor.advance_significant() {
        if matches!(token.kind, TokenKind::Semicolon | TokenKind::LBrace) {
            return false;
        }
        depths.apply(token.kind);
        if depths.is_top_level() {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn declarations(source: &str) -> Vec<(ContextKind, String, DeclarationState)> {
        let stream = tokenize(source);
        let mut tracker = DeclarationTracker::new(&stream, 4);
        let mut found = Vec::new();
        for token in stream.significant() {
            if let Some(node) = tracker.observe(token.index).unwrap() {
                found.push((node.kind, node.qualified_name, node.state));
            }
        }
        assert!(tracker.stack().is_empty());
        found
    }

    fn depth_at(source: &str, text: &str) -> usize {
        let stream = tokenize(source);
        let mut tracker = DeclarationTracker::new(&stream, 4);
        for token in stream.significant() {
            tracker.observe(token.index).unwrap();
            if token.text == text {
                return tracker.stack().len();
            }
        }
        panic!("token {text} not found");
    }

    // --- recognition ---

    #[test]
    fn test_nested_declarations() {
        let source = "namespace outer {\nclass Widget {\npublic:\n    void draw() const;\n    int size() { return n; }\n};\n}\n";
        assert_eq!(
            declarations(source),
            vec![
                (ContextKind::Namespace, "outer".into(), DeclarationState::Open),
                (ContextKind::Class, "outer::Widget".into(), DeclarationState::Open),
                (
                    ContextKind::Function,
                    "outer::Widget::draw".into(),
                    DeclarationState::ForwardDeclared
                ),
                (ContextKind::Function, "outer::Widget::size".into(), DeclarationState::Open),
            ]
        );
        assert_eq!(depth_at(source, "return"), 3);
        assert_eq!(depth_at(source, "draw"), 2);
    }

    #[test]
    fn test_ignored_constructs() {
        let source = "using namespace std;\nnamespace fs = std::filesystem;\nstruct S s;\nenum class Color { Red };\ntemplate <class T> struct Holder;\nvoid take(struct S* s);\n";
        let kinds: Vec<String> = declarations(source).into_iter().map(|d| d.1).collect();
        assert_eq!(kinds, vec!["Holder".to_string(), "take".to_string()]);
    }

    #[test]
    fn test_forward_declarations_are_not_pushed() {
        let source = "class A;\nstruct B {\n    virtual void g() = 0;\n    B() = default;\n};\n";
        let found = declarations(source);
        assert_eq!(found[0], (ContextKind::Class, "A".into(), DeclarationState::ForwardDeclared));
        assert_eq!(found[2].2, DeclarationState::ForwardDeclared);
        assert_eq!(found[3], (ContextKind::Function, "B::B".into(), DeclarationState::ForwardDeclared));
        assert_eq!(depth_at(source, "g"), 1);
    }

    #[test]
    fn test_constructor_initializer_list() {
        let source = "Foo::Foo(int a) : a_(a), b_{a} {\n    run();\n}\n";
        let stream = tokenize(source);
        let mut tracker = DeclarationTracker::new(&stream, 4);
        let name = stream.iter().rposition(|t| t.text == "Foo").unwrap();
        let node = tracker.observe(name).unwrap().unwrap();
        assert_eq!(node.qualified_name, "Foo::Foo");
        assert_eq!(node.state, DeclarationState::Open);
        assert_eq!(stream[node.body_open.unwrap()].line, 1);
        assert_eq!(stream[node.body_close.unwrap()].line, 3);
        assert_eq!(node.declaration_start, 0);
    }

    #[test]
    fn test_function_try_block() {
        let found = declarations("void f() try {\n} catch (...) {\n}\n");
        assert_eq!(found, vec![(ContextKind::Function, "f".into(), DeclarationState::Open)]);
    }

    #[test]
    fn test_operator_and_destructor_names() {
        let found = declarations("struct A {\n    bool operator==(const A& o) const;\n    ~A();\n};\n");
        assert_eq!(found[1].1, "A::operator==");
        assert_eq!(found[2].1, "A::~A");
    }

    #[test]
    fn test_record_with_macro_and_bases() {
        let found = declarations("class EXPORT Widget final : public Base<int> {\n};\n");
        assert_eq!(found, vec![(ContextKind::Class, "Widget".into(), DeclarationState::Open)]);
    }

    #[test]
    fn test_template_declaration_start() {
        let stream = tokenize("int x;\ntemplate <typename T>\nclass Box {\n};\n");
        let mut tracker = DeclarationTracker::new(&stream, 4);
        let class = stream.iter().position(|t| t.kind == TokenKind::Class).unwrap();
        let node = tracker.observe(class).unwrap().unwrap();
        assert_eq!(stream[node.declaration_start].text, "template");
    }

    #[test]
    fn test_anonymous_namespace() {
        let found = declarations("namespace {\nint helper() { return 1; }\n}\n");
        assert_eq!(found[0], (ContextKind::Namespace, String::new(), DeclarationState::Open));
        assert_eq!(found[1].1, "helper");
    }

    // --- stack queries ---

    #[test]
    fn test_pop_on_empty_stack_is_an_invariant_error() {
        let mut stack = ContextStack::default();
        assert_eq!(stack.pop(), Err(InvariantError::ContextUnderflow));
    }

    #[test]
    fn test_in_parameter_list() {
        let stream = tokenize("void f(int a, int b = g(1));\nint x = h(2);\n");
        let tracker = DeclarationTracker::new(&stream, 4);
        let at = |text: &str| stream.iter().position(|t| t.text == text).unwrap();
        assert!(tracker.in_parameter_list(at("a")));
        assert!(tracker.in_parameter_list(at("1")));
        assert!(!tracker.in_parameter_list(at("2")));
        assert!(!tracker.in_parameter_list(at("x")));
    }

    #[test]
    fn test_top_level_indent() {
        let source = "  namespace a {\n    void f() {\n        go();\n    }\n  }\n";
        let stream = tokenize(source);
        let mut tracker = DeclarationTracker::new(&stream, 4);
        assert_eq!(tracker.top_level_indent(), 0);
        for token in stream.significant() {
            tracker.observe(token.index).unwrap();
            if token.text == "go" {
                assert_eq!(tracker.top_level_indent(), 2);
                assert_eq!(tracker.innermost().unwrap().indent_column, 4);
            }
        }
    }
}
