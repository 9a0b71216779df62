//! Hand-written JSON5 tokenizer.
//!
//! Converts an [`InputSource`] into the token sequence stored by a
//! [`TokenManager`] in a single pass. Accepted beyond strict JSON:
//! unquoted identifier-style object keys (`{x:1}`) and trailing separators.
//!
//! Keys are recognized here, not in the parser: an identifier or quoted
//! string followed by a colon becomes a [`TokenKind::Key`] token and the
//! colon is consumed with it. String escapes, including `\uXXXX` surrogate
//! pairs, are decoded during tokenization, so string tokens carry final
//! text.
//!
//! Malformed input fails the whole tokenize operation; callers observe a
//! [`Error::Lex`], never a partial token stream.
//!
//! ## Examples
//!
//! ```rust
//! use json_bind::input::LookaheadBuffer;
//! use json_bind::token::TokenKind;
//! use json_bind::tokenizer::Tokenizer;
//!
//! let source = LookaheadBuffer::new(b"{x:42}".to_vec());
//! let tokens = Tokenizer::new(source).tokenize().unwrap();
//! assert_eq!(tokens.peek_kind(), TokenKind::ObjectStart);
//! ```

use tracing::warn;

use crate::error::{Error, Result};
use crate::input::InputSource;
use crate::token::{Token, TokenManager, TokenValue};

#[cfg(doc)]
use crate::token::TokenKind;

/// Single-pass tokenizer over a byte source.
pub struct Tokenizer<S: InputSource> {
    source: S,
    line: usize,
    col: usize,
}

impl<S: InputSource> Tokenizer<S> {
    pub fn new(source: S) -> Self {
        Tokenizer {
            source,
            line: 1,
            col: 1,
        }
    }

    /// Tokenizes the entire input, ending with a [`TokenValue::End`] token.
    pub fn tokenize(mut self) -> Result<TokenManager> {
        let mut tokens = TokenManager::new();
        match self.run(&mut tokens) {
            Ok(()) => Ok(tokens),
            Err(err) => {
                warn!(%err, "tokenize failed");
                Err(err)
            }
        }
    }

    fn run(&mut self, tokens: &mut TokenManager) -> Result<()> {
        loop {
            self.skip_whitespace();
            if self.source.at_end() {
                tokens.push(self.token(TokenValue::End));
                return Ok(());
            }

            let line = self.line;
            let col = self.col;
            let byte = self.source.peek();
            match byte {
                b'{' => {
                    self.bump();
                    tokens.push(Token::new(TokenValue::ObjectStart, line, col));
                }
                b'}' => {
                    self.bump();
                    tokens.push(Token::new(TokenValue::ObjectEnd, line, col));
                }
                b'[' => {
                    self.bump();
                    tokens.push(Token::new(TokenValue::ArrayStart, line, col));
                }
                b']' => {
                    self.bump();
                    tokens.push(Token::new(TokenValue::ArrayEnd, line, col));
                }
                b',' => {
                    self.bump();
                    tokens.push(Token::new(TokenValue::Separator, line, col));
                }
                b'"' => {
                    let text = self.lex_string()?;
                    let value = if self.upcoming_colon() {
                        TokenValue::Key(text)
                    } else {
                        TokenValue::Str(text)
                    };
                    tokens.push(Token::new(value, line, col));
                }
                b'-' | b'0'..=b'9' => {
                    let value = self.lex_number()?;
                    tokens.push(Token::new(value, line, col));
                }
                b'_' | b'a'..=b'z' | b'A'..=b'Z' => {
                    let ident = self.lex_identifier();
                    let value = if self.upcoming_colon() {
                        TokenValue::Key(ident)
                    } else {
                        match ident.as_str() {
                            "true" => TokenValue::Bool(true),
                            "false" => TokenValue::Bool(false),
                            "null" => TokenValue::Null,
                            _ => {
                                return Err(Error::lex(
                                    line,
                                    col,
                                    format!("unexpected identifier \"{ident}\""),
                                ))
                            }
                        }
                    };
                    tokens.push(Token::new(value, line, col));
                }
                other => {
                    return Err(Error::lex(
                        line,
                        col,
                        format!("unexpected byte 0x{other:02x}"),
                    ));
                }
            }
        }
    }

    fn token(&self, value: TokenValue) -> Token {
        Token::new(value, self.line, self.col)
    }

    fn bump(&mut self) {
        if self.source.peek() == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        self.source.advance();
    }

    fn skip_whitespace(&mut self) {
        while !self.source.at_end() {
            match self.source.peek() {
                b' ' | b'\t' | b'\r' | b'\n' => self.bump(),
                _ => break,
            }
        }
    }

    /// Consumes a colon following the lexeme just read, if present.
    /// Determines key-versus-value classification.
    fn upcoming_colon(&mut self) -> bool {
        self.skip_whitespace();
        if !self.source.at_end() && self.source.peek() == b':' {
            self.bump();
            true
        } else {
            false
        }
    }

    fn lex_identifier(&mut self) -> String {
        let mut ident = String::new();
        while !self.source.at_end() {
            let byte = self.source.peek();
            if byte == b'_' || byte.is_ascii_alphanumeric() {
                ident.push(byte as char);
                self.bump();
            } else {
                break;
            }
        }
        ident
    }

    fn lex_number(&mut self) -> Result<TokenValue> {
        let line = self.line;
        let col = self.col;
        let mut lexeme = String::new();
        let mut is_float = false;

        if self.source.peek() == b'-' {
            lexeme.push('-');
            self.bump();
        }
        if self.digits_into(&mut lexeme) == 0 {
            return Err(Error::lex(line, col, "expected digit in number"));
        }
        if !self.source.at_end() && self.source.peek() == b'.' {
            is_float = true;
            lexeme.push('.');
            self.bump();
            if self.digits_into(&mut lexeme) == 0 {
                return Err(Error::lex(line, col, "expected digit after decimal point"));
            }
        }
        if !self.source.at_end() && matches!(self.source.peek(), b'e' | b'E') {
            is_float = true;
            lexeme.push('e');
            self.bump();
            if !self.source.at_end() && matches!(self.source.peek(), b'+' | b'-') {
                lexeme.push(self.source.peek() as char);
                self.bump();
            }
            if self.digits_into(&mut lexeme) == 0 {
                return Err(Error::lex(line, col, "expected digit in exponent"));
            }
        }

        Ok(if is_float {
            TokenValue::Float(lexeme)
        } else {
            TokenValue::Integer(lexeme)
        })
    }

    fn digits_into(&mut self, lexeme: &mut String) -> usize {
        let mut count = 0;
        while !self.source.at_end() && self.source.peek().is_ascii_digit() {
            lexeme.push(self.source.peek() as char);
            self.bump();
            count += 1;
        }
        count
    }

    fn lex_string(&mut self) -> Result<String> {
        let open_line = self.line;
        let open_col = self.col;
        self.bump(); // opening quote

        let mut raw = Vec::new();
        loop {
            if self.source.at_end() {
                return Err(Error::lex(open_line, open_col, "unterminated string"));
            }
            let byte = self.source.peek();
            match byte {
                b'"' => {
                    self.bump();
                    return String::from_utf8(raw)
                        .map_err(|_| Error::lex(open_line, open_col, "invalid UTF-8 in string"));
                }
                b'\\' => {
                    self.bump();
                    self.lex_escape(&mut raw)?;
                }
                _ => {
                    raw.push(byte);
                    self.bump();
                }
            }
        }
    }

    fn lex_escape(&mut self, raw: &mut Vec<u8>) -> Result<()> {
        let line = self.line;
        let col = self.col;
        if self.source.at_end() {
            return Err(Error::lex(line, col, "unterminated escape sequence"));
        }
        let byte = self.source.peek();
        self.bump();
        let decoded = match byte {
            b'"' => '"',
            b'\\' => '\\',
            b'/' => '/',
            b'b' => '\u{0008}',
            b'f' => '\u{000C}',
            b'n' => '\n',
            b'r' => '\r',
            b't' => '\t',
            b'0' => '\0',
            b'u' => self.lex_unicode_escape(line, col)?,
            other => {
                return Err(Error::lex(
                    line,
                    col,
                    format!("invalid escape character '\\{}'", other as char),
                ));
            }
        };
        let mut buf = [0u8; 4];
        raw.extend_from_slice(decoded.encode_utf8(&mut buf).as_bytes());
        Ok(())
    }

    /// Decodes `\uXXXX`, combining a high/low surrogate pair into a single
    /// supplementary-plane code point.
    fn lex_unicode_escape(&mut self, line: usize, col: usize) -> Result<char> {
        let first = self.hex4(line, col)?;
        let code_point = match first {
            0xD800..=0xDBFF => {
                if !(self.source.peek() == b'\\' && self.source.peek_ahead(1) == b'u') {
                    return Err(Error::lex(line, col, "unpaired high surrogate in string"));
                }
                self.bump();
                self.bump();
                let second = self.hex4(line, col)?;
                if !(0xDC00..=0xDFFF).contains(&second) {
                    return Err(Error::lex(line, col, "invalid low surrogate in string"));
                }
                0x10000 + ((first - 0xD800) << 10) + (second - 0xDC00)
            }
            0xDC00..=0xDFFF => {
                return Err(Error::lex(line, col, "unpaired low surrogate in string"));
            }
            value => value,
        };
        char::from_u32(code_point)
            .ok_or_else(|| Error::lex(line, col, "invalid unicode code point"))
    }

    fn hex4(&mut self, line: usize, col: usize) -> Result<u32> {
        let mut value = 0u32;
        for _ in 0..4 {
            if self.source.at_end() {
                return Err(Error::lex(line, col, "truncated \\u escape"));
            }
            let byte = self.source.peek();
            let digit = match byte {
                b'0'..=b'9' => (byte - b'0') as u32,
                b'a'..=b'f' => (byte - b'a') as u32 + 10,
                b'A'..=b'F' => (byte - b'A') as u32 + 10,
                _ => {
                    return Err(Error::lex(
                        line,
                        col,
                        "expected 4 hex digits in \\u escape",
                    ))
                }
            };
            value = value * 16 + digit;
            self.bump();
        }
        Ok(value)
    }
}

/// Tokenizes an in-memory string.
pub fn tokenize_str(input: &str) -> Result<TokenManager> {
    Tokenizer::new(crate::input::LookaheadBuffer::new(input.as_bytes().to_vec())).tokenize()
}
