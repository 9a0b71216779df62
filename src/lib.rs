//! A JSON5-flavored codec driven by declarative per-type field bindings.
//!
//! Types describe their JSON shape once, as an ordered set of field
//! descriptors, and the codec handles both directions from that single
//! declaration. The wire format is JSON with two relaxations: object keys
//! are written bare and accepted bare or quoted, and trailing commas are
//! tolerated on input. Everything else is strict JSON, including string
//! escapes and `\uXXXX` surrogate pairs.
//!
//! # Binding a type
//!
//! ```rust
//! use json_bind::{json_bind, json_field, FieldSet, JsonFields};
//! use once_cell::sync::Lazy;
//!
//! #[derive(Default, Debug, PartialEq)]
//! struct Server {
//!     host: String,
//!     port: u16,
//! }
//!
//! impl JsonFields for Server {
//!     fn json_fields() -> &'static FieldSet<Self> {
//!         static FIELDS: Lazy<FieldSet<Server>> = Lazy::new(|| {
//!             FieldSet::new(vec![
//!                 json_field!(Server, host),
//!                 json_field!(Server, port),
//!             ])
//!         });
//!         &FIELDS
//!     }
//! }
//! json_bind!(Server);
//!
//! let server: Server = json_bind::from_str("{port:8080,host:\"example\"}")?;
//! assert_eq!(server, Server { host: "example".into(), port: 8080 });
//! assert_eq!(json_bind::to_string(&server)?, "{host:\"example\",port:8080}");
//! # Ok::<(), json_bind::Error>(())
//! ```
//!
//! Fields match arriving keys in any order, unknown keys are skipped, and
//! absent keys leave the default-constructed value in place (or apply a
//! per-field default, or fail when the field is marked required). Output
//! always follows declaration order.
//!
//! # Beyond plain members
//!
//! - [`Field::with`] attaches an explicit [`Convert`] implementation:
//!   enum labels ([`EnumConverter`](convert::EnumConverter)), containers
//!   with converter elements
//!   ([`ContainerConverter`](convert::ContainerConverter)), fixed-width
//!   characters, token-directed unions
//!   ([`TokenDispatchConverter`](convert::TokenDispatchConverter)).
//! - Trait-object members decode through a [`PolyRegistry`]: the object's
//!   discriminator property (`kind` by default) selects the concrete type
//!   at read time.
//! - A type can bypass bindings entirely by implementing [`JsonValue`] by
//!   hand against [`Parser`] and [`Writer`].
//!
//! # Files
//!
//! [`from_file`] reads large inputs with parallel chunked reads and small
//! ones sequentially; [`from_file_sequential`] and [`from_file_parallel`]
//! pin the strategy.

pub mod convert;
pub mod error;
pub mod field;
pub mod input;
mod macros;
pub mod parser;
pub mod poly;
pub mod token;
pub mod tokenizer;
pub mod value;
pub mod writer;

pub use crate::convert::Convert;
pub use crate::error::{Error, Result};
pub use crate::field::{Field, FieldSet, JsonFields};
pub use crate::input::{read_file_auto, FileSource, InputSource, LookaheadBuffer, ParallelFileSource};
pub use crate::parser::Parser;
pub use crate::poly::{PolyConverter, PolyObject, PolyRegistry};
pub use crate::token::{Token, TokenKind, TokenManager, TokenValue};
pub use crate::tokenizer::{tokenize_str, Tokenizer};
pub use crate::value::JsonValue;
pub use crate::writer::Writer;

use std::fs;
use std::path::Path;

/// Decodes a value from a string.
///
/// The entire input must be consumed; trailing content after the document
/// is a [`Error::Structural`].
///
/// # Errors
///
/// Returns [`Error::Lex`] or [`Error::Structural`] for malformed input,
/// and [`Error::TypeNarrowing`] when a number or character does not fit
/// the target member.
pub fn from_str<V: JsonValue>(input: &str) -> Result<V> {
    let mut parser = Parser::from_str(input)?;
    let value = V::read_json(&mut parser)?;
    parser.expect_end()?;
    Ok(value)
}

/// Decodes a value from raw bytes. The bytes must be UTF-8 wherever the
/// grammar allows non-ASCII, i.e. inside strings.
pub fn from_slice<V: JsonValue>(input: &[u8]) -> Result<V> {
    let source = LookaheadBuffer::new(input.to_vec());
    decode_source(source)
}

/// Decodes a value from a file, choosing the read strategy by file size.
pub fn from_file<V: JsonValue>(path: impl AsRef<Path>) -> Result<V> {
    decode_source(read_file_auto(path)?)
}

/// Decodes a value from a file using one buffered sequential read.
pub fn from_file_sequential<V: JsonValue>(path: impl AsRef<Path>) -> Result<V> {
    decode_source(LookaheadBuffer::from_file(path)?)
}

/// Decodes a value from a file read in parallel chunks.
pub fn from_file_parallel<V: JsonValue>(path: impl AsRef<Path>) -> Result<V> {
    decode_source(ParallelFileSource::open(path)?)
}

/// Encodes a value to its canonical text: bare keys, no whitespace,
/// declaration-ordered fields.
///
/// # Errors
///
/// Fails only when a converter rejects the in-memory value, e.g. an enum
/// value with no registered label.
pub fn to_string<V: JsonValue>(value: &V) -> Result<String> {
    let mut writer = Writer::new();
    value.write_json(&mut writer)?;
    Ok(writer.into_inner())
}

/// Encodes a value into an existing [`Writer`].
pub fn to_writer<V: JsonValue>(writer: &mut Writer, value: &V) -> Result<()> {
    value.write_json(writer)
}

/// Encodes a value and writes the text to a file.
pub fn to_file<V: JsonValue>(path: impl AsRef<Path>, value: &V) -> Result<()> {
    let text = to_string(value)?;
    fs::write(path, text).map_err(Error::io)
}

fn decode_source<S: InputSource, V: JsonValue>(source: S) -> Result<V> {
    let mut parser = Parser::new(Tokenizer::new(source).tokenize()?);
    let value = V::read_json(&mut parser)?;
    parser.expect_end()?;
    Ok(value)
}
