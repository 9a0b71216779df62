//! Error types for JSON5 encoding and decoding.
//!
//! Every failure in this crate falls into one of five kinds:
//!
//! - **Lex**: malformed token in the input text (bad escape, unterminated
//!   string, invalid number, unexpected byte)
//! - **Structural**: the token sequence violates the expected object/array
//!   grammar (missing close, wrong token kind where a key or value was
//!   expected, missing required field)
//! - **TypeNarrowing**: a decoded value cannot be represented in the target
//!   field's type (integer out of range, supplementary-plane code point in
//!   a 16-bit character field)
//! - **UnknownDiscriminant**: an enum label or polymorphic discriminator
//!   string that is not registered
//! - **Io**: the underlying byte source or sink failed
//!
//! All five are unrecoverable for the current decode/encode operation and
//! propagate immediately to the caller. Unknown object keys during decode
//! and missing keys for non-required fields are *not* errors.
//!
//! ## Examples
//!
//! ```rust
//! use json_bind::{from_str, Error};
//!
//! let result: Result<bool, Error> = from_str("tru");
//! assert!(matches!(result, Err(Error::Lex { .. })));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur while reading or writing
/// JSON5 text.
///
/// Lexical and structural errors carry the line and column of the offending
/// token.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Malformed token in the raw input text
    #[error("lex error at line {line}, column {col}: {msg}")]
    Lex { line: usize, col: usize, msg: String },

    /// Token sequence violates the expected object/array grammar
    #[error("structural error at line {line}, column {col}: {msg}")]
    Structural { line: usize, col: usize, msg: String },

    /// Decoded value does not fit the target field's type
    #[error("cannot represent {value} as {target}")]
    TypeNarrowing { target: &'static str, value: String },

    /// Enum label or polymorphic discriminator not found in its registry
    #[error("unknown {context} \"{label}\"")]
    UnknownDiscriminant { context: &'static str, label: String },

    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),
}

impl Error {
    /// Creates a lexical error with line and column information.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json_bind::Error;
    ///
    /// let err = Error::lex(3, 14, "unterminated string");
    /// assert!(err.to_string().contains("line 3"));
    /// ```
    pub fn lex(line: usize, col: usize, msg: impl Into<String>) -> Self {
        Error::Lex {
            line,
            col,
            msg: msg.into(),
        }
    }

    /// Creates a structural error with line and column information.
    pub fn structural(line: usize, col: usize, msg: impl Into<String>) -> Self {
        Error::Structural {
            line,
            col,
            msg: msg.into(),
        }
    }

    /// Creates a narrowing error for a value that does not fit `target`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json_bind::Error;
    ///
    /// let err = Error::narrowing("u16", "-1");
    /// assert!(err.to_string().contains("u16"));
    /// ```
    pub fn narrowing(target: &'static str, value: impl fmt::Display) -> Self {
        Error::TypeNarrowing {
            target,
            value: value.to_string(),
        }
    }

    /// Creates an unknown-discriminant error. `context` names the lookup
    /// table kind, e.g. `"enum label"` or `"discriminator"`.
    pub fn unknown(context: &'static str, label: impl Into<String>) -> Self {
        Error::UnknownDiscriminant {
            context,
            label: label.into(),
        }
    }

    /// Creates an I/O error for byte source/sink failures.
    pub fn io(err: impl fmt::Display) -> Self {
        Error::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
