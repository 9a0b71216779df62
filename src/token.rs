//! Token model and the token manager.
//!
//! The tokenizer produces the full token sequence for a document exactly
//! once; [`TokenManager`] owns that sequence and exposes a forward cursor
//! with peek. The parser never re-tokenizes.
//!
//! Number tokens keep their raw lexeme: narrowing to the target integer or
//! float type happens at read time, so the full `i64`/`u64` ranges survive
//! tokenization unharmed.
//!
//! Separator tokens (`,`) exist in the stored sequence but the cursor skips
//! them transparently, which also makes trailing commas acceptable on read.

use crate::error::{Error, Result};

/// Lexical kind of a [`Token`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    ObjectStart,
    ObjectEnd,
    ArrayStart,
    ArrayEnd,
    Key,
    String,
    Integer,
    Float,
    Bool,
    Null,
    Separator,
    End,
}

impl TokenKind {
    /// Short human-readable name used in structural error messages.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::ObjectStart => "'{'",
            TokenKind::ObjectEnd => "'}'",
            TokenKind::ArrayStart => "'['",
            TokenKind::ArrayEnd => "']'",
            TokenKind::Key => "key",
            TokenKind::String => "string",
            TokenKind::Integer => "integer",
            TokenKind::Float => "float",
            TokenKind::Bool => "bool",
            TokenKind::Null => "null",
            TokenKind::Separator => "','",
            TokenKind::End => "end of input",
        }
    }
}

/// Payload of a token.
///
/// `Integer` and `Float` carry the raw lexeme; `Key` and `Str` carry decoded
/// text (escapes already resolved by the tokenizer).
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    ObjectStart,
    ObjectEnd,
    ArrayStart,
    ArrayEnd,
    Key(String),
    Str(String),
    Integer(String),
    Float(String),
    Bool(bool),
    Null,
    Separator,
    End,
}

impl TokenValue {
    pub fn kind(&self) -> TokenKind {
        match self {
            TokenValue::ObjectStart => TokenKind::ObjectStart,
            TokenValue::ObjectEnd => TokenKind::ObjectEnd,
            TokenValue::ArrayStart => TokenKind::ArrayStart,
            TokenValue::ArrayEnd => TokenKind::ArrayEnd,
            TokenValue::Key(_) => TokenKind::Key,
            TokenValue::Str(_) => TokenKind::String,
            TokenValue::Integer(_) => TokenKind::Integer,
            TokenValue::Float(_) => TokenKind::Float,
            TokenValue::Bool(_) => TokenKind::Bool,
            TokenValue::Null => TokenKind::Null,
            TokenValue::Separator => TokenKind::Separator,
            TokenValue::End => TokenKind::End,
        }
    }
}

/// One lexical unit with its source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub value: TokenValue,
    pub line: usize,
    pub col: usize,
}

impl Token {
    pub fn new(value: TokenValue, line: usize, col: usize) -> Self {
        Token { value, line, col }
    }

    pub fn kind(&self) -> TokenKind {
        self.value.kind()
    }
}

/// Cursor position inside a [`TokenManager`], used to rewind after
/// discriminator look-ahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark(usize);

/// Owns the token sequence of one document and a forward cursor over it.
///
/// # Examples
///
/// ```rust
/// use json_bind::token::{Token, TokenKind, TokenManager, TokenValue};
///
/// let mut tokens = TokenManager::new();
/// tokens.push(Token::new(TokenValue::ObjectStart, 1, 1));
/// tokens.push(Token::new(TokenValue::ObjectEnd, 1, 2));
/// tokens.push(Token::new(TokenValue::End, 1, 3));
///
/// assert_eq!(tokens.peek_kind(), TokenKind::ObjectStart);
/// tokens.advance().unwrap();
/// assert!(tokens.next_is_end_object());
/// ```
#[derive(Debug, Default)]
pub struct TokenManager {
    tokens: Vec<Token>,
    cursor: usize,
}

impl TokenManager {
    pub fn new() -> Self {
        TokenManager::default()
    }

    /// Appends a token. Called by the tokenizer only.
    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Skips separators from `index` forward and returns the next
    /// significant index.
    fn significant(&self, mut index: usize) -> usize {
        while index < self.tokens.len()
            && self.tokens[index].kind() == TokenKind::Separator
        {
            index += 1;
        }
        index
    }

    /// Returns the next significant token without consuming it.
    ///
    /// Sequences built by the tokenizer always carry a trailing
    /// [`TokenValue::End`]; a hand-built sequence with nothing left to
    /// peek reports end of input as well.
    pub fn peek(&self) -> &Token {
        static END: Token = Token {
            value: TokenValue::End,
            line: 0,
            col: 0,
        };
        let index = self.significant(self.cursor);
        self.tokens.get(index).unwrap_or(&END)
    }

    pub fn peek_kind(&self) -> TokenKind {
        self.peek().kind()
    }

    /// Consumes and returns the next significant token. Fails once the
    /// cursor has passed the end-of-input token.
    pub fn advance(&mut self) -> Result<&Token> {
        let index = self.significant(self.cursor);
        match self.tokens.get(index) {
            Some(token) if token.kind() != TokenKind::End => {
                self.cursor = index + 1;
                Ok(&self.tokens[index])
            }
            Some(token) => Err(Error::structural(
                token.line,
                token.col,
                "read past end of input",
            )),
            None => Err(Error::structural(0, 0, "read past end of input")),
        }
    }

    /// Consumes a [`TokenKind::Key`] token and returns its text.
    pub fn next_key(&mut self) -> Result<String> {
        let token = self.advance()?;
        match &token.value {
            TokenValue::Key(text) => Ok(text.clone()),
            other => Err(Error::structural(
                token.line,
                token.col,
                format!("expected key, found {}", other.kind().describe()),
            )),
        }
    }

    /// Peeks whether the next significant token closes the current object.
    pub fn next_is_end_object(&self) -> bool {
        self.peek_kind() == TokenKind::ObjectEnd
    }

    /// Peeks whether the next significant token closes the current array.
    pub fn next_is_end_array(&self) -> bool {
        self.peek_kind() == TokenKind::ArrayEnd
    }

    /// Captures the cursor position for a later [`TokenManager::rewind`].
    pub fn mark(&self) -> Mark {
        Mark(self.cursor)
    }

    /// Restores a previously captured cursor position.
    pub fn rewind(&mut self, mark: Mark) {
        self.cursor = mark.0;
    }
}
