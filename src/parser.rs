//! Token-driven recursive decoder.
//!
//! [`Parser`] walks the token sequence owned by a [`TokenManager`] and
//! reconstructs typed values. It exposes the structural surface used by
//! field sets and converters (`start_object`, `next_key`,
//! `next_is_end_object`, `skip_value`, ...) together with typed scalar
//! reads. Numeric reads narrow the raw token lexeme into the target type;
//! out-of-range values are [`Error::TypeNarrowing`] failures.
//!
//! ## Examples
//!
//! A hand-written decode loop, the escape hatch bypassing field sets:
//!
//! ```rust
//! use json_bind::{Parser, Result};
//!
//! fn read_pair(parser: &mut Parser) -> Result<(i64, String)> {
//!     let mut value = 0;
//!     let mut name = String::new();
//!     parser.start_object()?;
//!     while !parser.next_is_end_object() {
//!         match parser.next_key()?.as_str() {
//!             "value" => value = parser.read_integer()?,
//!             "name" => name = parser.read_string()?,
//!             _ => parser.skip_value()?,
//!         }
//!     }
//!     parser.end_object()?;
//!     Ok((value, name))
//! }
//!
//! let mut parser = Parser::from_str("{value:42,name:\"test\",extra:[1,2]}")?;
//! assert_eq!(read_pair(&mut parser)?, (42, "test".to_string()));
//! # Ok::<(), json_bind::Error>(())
//! ```

use std::fmt::Display;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::token::{Mark, Token, TokenKind, TokenManager, TokenValue};

/// Decodes typed values from a stored token sequence.
pub struct Parser {
    tokens: TokenManager,
}

impl Parser {
    pub fn new(tokens: TokenManager) -> Self {
        Parser { tokens }
    }

    /// Tokenizes `input` and wraps the result.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &str) -> Result<Self> {
        Ok(Parser::new(crate::tokenizer::tokenize_str(input)?))
    }

    pub fn peek_kind(&self) -> TokenKind {
        self.tokens.peek_kind()
    }

    /// Captures the cursor for discriminator look-ahead.
    pub fn mark(&self) -> Mark {
        self.tokens.mark()
    }

    pub fn rewind(&mut self, mark: Mark) {
        self.tokens.rewind(mark);
    }

    fn expect(&mut self, kind: TokenKind) -> Result<&Token> {
        let token = self.tokens.peek();
        if token.kind() != kind {
            return Err(Error::structural(
                token.line,
                token.col,
                format!(
                    "expected {}, found {}",
                    kind.describe(),
                    token.kind().describe()
                ),
            ));
        }
        self.tokens.advance()
    }

    pub fn start_object(&mut self) -> Result<()> {
        self.expect(TokenKind::ObjectStart).map(|_| ())
    }

    pub fn end_object(&mut self) -> Result<()> {
        self.expect(TokenKind::ObjectEnd).map(|_| ())
    }

    pub fn start_array(&mut self) -> Result<()> {
        self.expect(TokenKind::ArrayStart).map(|_| ())
    }

    pub fn end_array(&mut self) -> Result<()> {
        self.expect(TokenKind::ArrayEnd).map(|_| ())
    }

    /// Consumes a key token and returns its text.
    pub fn next_key(&mut self) -> Result<String> {
        self.tokens.next_key()
    }

    pub fn next_is_end_object(&self) -> bool {
        self.tokens.next_is_end_object()
    }

    pub fn next_is_end_array(&self) -> bool {
        self.tokens.next_is_end_array()
    }

    /// True once every token of the document has been consumed.
    pub fn at_end(&self) -> bool {
        self.tokens.peek_kind() == TokenKind::End
    }

    /// Fails with a structural error if tokens remain unconsumed.
    pub fn expect_end(&self) -> Result<()> {
        let token = self.tokens.peek();
        if token.kind() == TokenKind::End {
            Ok(())
        } else {
            Err(Error::structural(
                token.line,
                token.col,
                "trailing content after document",
            ))
        }
    }

    /// Recursively discards a value of any shape without decoding it.
    /// Used for unknown object keys and discriminator look-ahead.
    pub fn skip_value(&mut self) -> Result<()> {
        match self.peek_kind() {
            TokenKind::ObjectStart => {
                self.start_object()?;
                while !self.next_is_end_object() {
                    self.next_key()?;
                    self.skip_value()?;
                }
                self.end_object()
            }
            TokenKind::ArrayStart => {
                self.start_array()?;
                while !self.next_is_end_array() {
                    self.skip_value()?;
                }
                self.end_array()
            }
            TokenKind::String
            | TokenKind::Integer
            | TokenKind::Float
            | TokenKind::Bool
            | TokenKind::Null => self.tokens.advance().map(|_| ()),
            _ => {
                let token = self.tokens.peek();
                Err(Error::structural(
                    token.line,
                    token.col,
                    format!("expected value, found {}", token.kind().describe()),
                ))
            }
        }
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        let token = self.expect(TokenKind::Bool)?;
        match token.value {
            TokenValue::Bool(b) => Ok(b),
            _ => unreachable!("expect() checked the kind"),
        }
    }

    pub fn read_string(&mut self) -> Result<String> {
        let token = self.expect(TokenKind::String)?;
        match &token.value {
            TokenValue::Str(s) => Ok(s.clone()),
            _ => unreachable!("expect() checked the kind"),
        }
    }

    /// Reads an integer token and narrows it to `I`. A lexeme outside the
    /// target range is a [`Error::TypeNarrowing`] failure.
    pub fn read_integer<I>(&mut self) -> Result<I>
    where
        I: FromStr,
        I::Err: Display,
    {
        let token = self.expect(TokenKind::Integer)?;
        let lexeme = match &token.value {
            TokenValue::Integer(raw) => raw,
            _ => unreachable!("expect() checked the kind"),
        };
        lexeme
            .parse::<I>()
            .map_err(|_| Error::narrowing(std::any::type_name::<I>(), lexeme))
    }

    /// Reads a float token. Integer tokens are accepted as well, since the
    /// writer emits integral floats without a fraction.
    pub fn read_float<F>(&mut self) -> Result<F>
    where
        F: FromStr,
        F::Err: Display,
    {
        let token = self.tokens.peek();
        let lexeme = match &token.value {
            TokenValue::Float(raw) | TokenValue::Integer(raw) => raw.clone(),
            other => {
                return Err(Error::structural(
                    token.line,
                    token.col,
                    format!("expected float, found {}", other.kind().describe()),
                ));
            }
        };
        self.tokens.advance()?;
        lexeme
            .parse::<F>()
            .map_err(|_| Error::narrowing(std::any::type_name::<F>(), lexeme))
    }

    /// Consumes a `null` token if present and returns whether it did.
    pub fn take_null(&mut self) -> Result<bool> {
        if self.peek_kind() == TokenKind::Null {
            self.tokens.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Builds a structural error located at the next token.
    pub fn structural_error(&self, msg: impl Into<String>) -> Error {
        let token = self.tokens.peek();
        Error::structural(token.line, token.col, msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_reads() {
        let mut parser = Parser::from_str("[1,-2,2.5,true,\"hi\"]").unwrap();
        parser.start_array().unwrap();
        assert_eq!(parser.read_integer::<u8>().unwrap(), 1);
        assert_eq!(parser.read_integer::<i16>().unwrap(), -2);
        assert_eq!(parser.read_float::<f64>().unwrap(), 2.5);
        assert!(parser.read_bool().unwrap());
        assert_eq!(parser.read_string().unwrap(), "hi");
        parser.end_array().unwrap();
        parser.expect_end().unwrap();
    }

    #[test]
    fn integer_narrowing_fails_out_of_range() {
        let mut parser = Parser::from_str("300").unwrap();
        let err = parser.read_integer::<u8>().unwrap_err();
        assert!(matches!(err, Error::TypeNarrowing { .. }));

        let mut parser = Parser::from_str("-5").unwrap();
        assert!(matches!(
            parser.read_integer::<u64>(),
            Err(Error::TypeNarrowing { .. })
        ));
    }

    #[test]
    fn float_read_accepts_integer_tokens() {
        let mut parser = Parser::from_str("7").unwrap();
        assert_eq!(parser.read_float::<f32>().unwrap(), 7.0);
    }

    #[test]
    fn skip_value_discards_arbitrary_shapes() {
        let mut parser =
            Parser::from_str("{a:{nested:[1,{x:2},\"s\"]},b:7}").unwrap();
        parser.start_object().unwrap();
        assert_eq!(parser.next_key().unwrap(), "a");
        parser.skip_value().unwrap();
        assert_eq!(parser.next_key().unwrap(), "b");
        assert_eq!(parser.read_integer::<i32>().unwrap(), 7);
        parser.end_object().unwrap();
    }

    #[test]
    fn wrong_token_kind_is_structural() {
        let mut parser = Parser::from_str("\"text\"").unwrap();
        let err = parser.read_integer::<i32>().unwrap_err();
        assert!(matches!(err, Error::Structural { .. }));
    }

    #[test]
    fn missing_close_is_structural() {
        let mut parser = Parser::from_str("{a:1").unwrap();
        parser.start_object().unwrap();
        parser.next_key().unwrap();
        parser.read_integer::<i32>().unwrap();
        assert!(!parser.next_is_end_object());
        assert!(parser.end_object().is_err());
    }

    #[test]
    fn trailing_content_is_detected() {
        let mut parser = Parser::from_str("1 2").unwrap();
        parser.read_integer::<i32>().unwrap();
        assert!(parser.expect_end().is_err());
    }

    #[test]
    fn trailing_commas_are_tolerated() {
        let mut parser = Parser::from_str("{a:[1,2,],}").unwrap();
        parser.start_object().unwrap();
        parser.next_key().unwrap();
        parser.start_array().unwrap();
        parser.read_integer::<i32>().unwrap();
        parser.read_integer::<i32>().unwrap();
        parser.end_array().unwrap();
        parser.end_object().unwrap();
        parser.expect_end().unwrap();
    }
}
