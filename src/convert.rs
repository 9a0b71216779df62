//! Converters: the common read/write contract behind every field.
//!
//! [`Convert`] is the capability a [`Field`](crate::Field) dispatches
//! through. Most fields use [`DefaultConverter`], which forwards to the
//! member type's [`JsonValue`] impl; the remaining converters cover the
//! cases a type alone cannot express:
//!
//! - [`FieldsConverter`]: object path for explicit composition
//! - [`ContainerConverter`]: container parameterized by an element
//!   converter value; nesting is expressed by wrapping converters
//! - [`OwnedConverter`]: nullable exclusive ownership with an explicit
//!   element converter
//! - [`EnumConverter`]: enum values mapped to canonical string labels
//!   through an [`EnumMap`]
//! - [`TokenDispatchConverter`]: author-supplied read handler per token
//!   kind, with a tag-directed write; this is how tagged-union (variant)
//!   fields dispatch on the shape of the next token
//! - [`Utf16CharConverter`] / [`Utf32CharConverter`]: single-character
//!   string fields of a fixed code-unit width
//!
//! ## Examples
//!
//! Explicit converter composition for a nested container:
//!
//! ```rust
//! use json_bind::convert::{ContainerConverter, DefaultConverter};
//! use json_bind::{Parser, Convert};
//!
//! let inner: ContainerConverter<Vec<i32>, _> =
//!     ContainerConverter::new(DefaultConverter::new());
//! let outer: ContainerConverter<Vec<Vec<i32>>, _> = ContainerConverter::new(inner);
//!
//! let mut parser = Parser::from_str("[[1,2],[3]]").unwrap();
//! let value = outer.read(&mut parser).unwrap();
//! assert_eq!(value, vec![vec![1, 2], vec![3]]);
//! ```

use std::collections::BTreeSet;
use std::marker::PhantomData;

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::field::JsonFields;
use crate::parser::Parser;
use crate::token::TokenKind;
use crate::value::JsonValue;
use crate::writer::Writer;

/// Common read/write contract all converters satisfy.
pub trait Convert<V> {
    fn read(&self, parser: &mut Parser) -> Result<V>;
    fn write(&self, writer: &mut Writer, value: &V) -> Result<()>;
}

/// Forwards to the member type's own [`JsonValue`] impl.
pub struct DefaultConverter<V> {
    _marker: PhantomData<fn() -> V>,
}

impl<V> DefaultConverter<V> {
    pub fn new() -> Self {
        DefaultConverter {
            _marker: PhantomData,
        }
    }
}

impl<V> Default for DefaultConverter<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: JsonValue> Convert<V> for DefaultConverter<V> {
    fn read(&self, parser: &mut Parser) -> Result<V> {
        V::read_json(parser)
    }

    fn write(&self, writer: &mut Writer, value: &V) -> Result<()> {
        value.write_json(writer)
    }
}

/// Reads and writes a field-bound struct through its [`FieldSet`]
/// (crate::FieldSet). Exists for explicit converter composition; types
/// wired with [`json_bind!`](crate::json_bind) also work through
/// [`DefaultConverter`].
pub struct FieldsConverter<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> FieldsConverter<T> {
    pub fn new() -> Self {
        FieldsConverter {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for FieldsConverter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: JsonFields> Convert<T> for FieldsConverter<T> {
    fn read(&self, parser: &mut Parser) -> Result<T> {
        T::json_fields().read(parser)
    }

    fn write(&self, writer: &mut Writer, value: &T) -> Result<()> {
        T::json_fields().write(writer, value)
    }
}

/// A container type usable with [`ContainerConverter`].
///
/// `Vec` preserves insertion order on both read and write; `BTreeSet`
/// iterates (and therefore writes) in sorted order regardless of insertion
/// order.
pub trait JsonContainer: Default {
    type Item;

    /// Adds one decoded element.
    fn add(&mut self, item: Self::Item);

    /// Visits elements in the container's defined order.
    fn for_each(
        &self,
        visit: &mut dyn FnMut(&Self::Item) -> Result<()>,
    ) -> Result<()>;
}

impl<V> JsonContainer for Vec<V> {
    type Item = V;

    fn add(&mut self, item: V) {
        self.push(item);
    }

    fn for_each(&self, visit: &mut dyn FnMut(&V) -> Result<()>) -> Result<()> {
        for item in self {
            visit(item)?;
        }
        Ok(())
    }
}

impl<V: Ord> JsonContainer for BTreeSet<V> {
    type Item = V;

    fn add(&mut self, item: V) {
        self.insert(item);
    }

    fn for_each(&self, visit: &mut dyn FnMut(&V) -> Result<()>) -> Result<()> {
        for item in self {
            visit(item)?;
        }
        Ok(())
    }
}

/// Decodes/encodes a container through an explicit element converter.
pub struct ContainerConverter<C, EC> {
    element: EC,
    _marker: PhantomData<fn() -> C>,
}

impl<C, EC> ContainerConverter<C, EC> {
    pub fn new(element: EC) -> Self {
        ContainerConverter {
            element,
            _marker: PhantomData,
        }
    }
}

impl<C, EC> Default for ContainerConverter<C, EC>
where
    EC: Default,
{
    fn default() -> Self {
        Self::new(EC::default())
    }
}

impl<C, EC> Convert<C> for ContainerConverter<C, EC>
where
    C: JsonContainer,
    EC: Convert<C::Item>,
{
    fn read(&self, parser: &mut Parser) -> Result<C> {
        parser.start_array()?;
        let mut out = C::default();
        while !parser.next_is_end_array() {
            out.add(self.element.read(parser)?);
        }
        parser.end_array()?;
        Ok(out)
    }

    fn write(&self, writer: &mut Writer, value: &C) -> Result<()> {
        writer.start_array();
        value.for_each(&mut |item| self.element.write(writer, item))?;
        writer.end_array();
        Ok(())
    }
}

/// Nullable exclusive ownership with an explicit element converter.
/// Absent or `null` decodes to `None`; `None` writes `null`.
pub struct OwnedConverter<EC> {
    element: EC,
}

impl<EC> OwnedConverter<EC> {
    pub fn new(element: EC) -> Self {
        OwnedConverter { element }
    }
}

impl<EC> Default for OwnedConverter<EC>
where
    EC: Default,
{
    fn default() -> Self {
        Self::new(EC::default())
    }
}

impl<V, EC> Convert<Option<Box<V>>> for OwnedConverter<EC>
where
    EC: Convert<V>,
{
    fn read(&self, parser: &mut Parser) -> Result<Option<Box<V>>> {
        if parser.take_null()? {
            Ok(None)
        } else {
            Ok(Some(Box::new(self.element.read(parser)?)))
        }
    }

    fn write(&self, writer: &mut Writer, value: &Option<Box<V>>) -> Result<()> {
        match value {
            Some(inner) => self.element.write(writer, inner),
            None => {
                writer.null();
                Ok(())
            }
        }
    }
}

/// Bidirectional mapping between enum values and canonical string labels,
/// built once per enum type from a fixed entry list.
pub struct EnumMap<E: 'static> {
    entries: Vec<(E, &'static str)>,
    by_label: IndexMap<&'static str, usize>,
}

impl<E: Copy + PartialEq> EnumMap<E> {
    pub fn new(entries: &[(E, &'static str)]) -> Self {
        let entries: Vec<_> = entries.to_vec();
        let by_label = entries
            .iter()
            .enumerate()
            .map(|(index, (_, label))| (*label, index))
            .collect();
        EnumMap { entries, by_label }
    }

    pub fn label(&self, value: E) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(candidate, _)| *candidate == value)
            .map(|(_, label)| *label)
    }

    pub fn value(&self, label: &str) -> Option<E> {
        self.by_label
            .get(label)
            .map(|&index| self.entries[index].0)
    }
}

/// Encodes an enum as its registered label and decodes labels back.
/// An unregistered label on read, or an unmapped value on write, fails
/// with [`Error::UnknownDiscriminant`].
///
/// # Examples
///
/// ```rust
/// use json_bind::convert::EnumConverter;
/// use json_bind::{Convert, Parser};
///
/// #[derive(Clone, Copy, PartialEq, Debug)]
/// enum Color { Red, Green, Blue }
///
/// let converter = EnumConverter::new(&[
///     (Color::Red, "red"),
///     (Color::Green, "green"),
///     (Color::Blue, "blue"),
/// ]);
///
/// let mut parser = Parser::from_str("\"green\"").unwrap();
/// assert_eq!(converter.read(&mut parser).unwrap(), Color::Green);
/// ```
pub struct EnumConverter<E: 'static> {
    map: EnumMap<E>,
}

impl<E: Copy + PartialEq> EnumConverter<E> {
    pub fn new(entries: &[(E, &'static str)]) -> Self {
        EnumConverter {
            map: EnumMap::new(entries),
        }
    }

    pub fn with_map(map: EnumMap<E>) -> Self {
        EnumConverter { map }
    }
}

impl<E: Copy + PartialEq + std::fmt::Debug> Convert<E> for EnumConverter<E> {
    fn read(&self, parser: &mut Parser) -> Result<E> {
        let label = parser.read_string()?;
        self.map
            .value(&label)
            .ok_or_else(|| Error::unknown("enum label", label))
    }

    fn write(&self, writer: &mut Writer, value: &E) -> Result<()> {
        let label = self
            .map
            .label(*value)
            .ok_or_else(|| Error::unknown("enum value", format!("{value:?}")))?;
        writer.string(label);
        Ok(())
    }
}

/// Author-supplied decode path per token kind plus a tag-directed write.
///
/// Every `read_*` handler defaults to a structural error; a field author
/// overrides exactly the token kinds their value accepts. Tagged-union
/// (variant) fields implement this by matching on the active tag in
/// [`TokenDispatch::write`].
pub trait TokenDispatch {
    type Value;

    fn read_string(&self, parser: &mut Parser) -> Result<Self::Value> {
        Err(parser.structural_error("unexpected string value"))
    }

    fn read_integer(&self, parser: &mut Parser) -> Result<Self::Value> {
        Err(parser.structural_error("unexpected integer value"))
    }

    fn read_float(&self, parser: &mut Parser) -> Result<Self::Value> {
        Err(parser.structural_error("unexpected float value"))
    }

    fn read_bool(&self, parser: &mut Parser) -> Result<Self::Value> {
        Err(parser.structural_error("unexpected bool value"))
    }

    fn read_null(&self, parser: &mut Parser) -> Result<Self::Value> {
        Err(parser.structural_error("unexpected null value"))
    }

    fn read_object(&self, parser: &mut Parser) -> Result<Self::Value> {
        Err(parser.structural_error("unexpected object value"))
    }

    fn read_array(&self, parser: &mut Parser) -> Result<Self::Value> {
        Err(parser.structural_error("unexpected array value"))
    }

    fn write(&self, writer: &mut Writer, value: &Self::Value) -> Result<()>;
}

/// Adapts a [`TokenDispatch`] implementation to the [`Convert`] contract by
/// peeking the next token's kind.
pub struct TokenDispatchConverter<D> {
    dispatch: D,
}

impl<D> TokenDispatchConverter<D> {
    pub fn new(dispatch: D) -> Self {
        TokenDispatchConverter { dispatch }
    }
}

impl<D: TokenDispatch> Convert<D::Value> for TokenDispatchConverter<D> {
    fn read(&self, parser: &mut Parser) -> Result<D::Value> {
        match parser.peek_kind() {
            TokenKind::String => self.dispatch.read_string(parser),
            TokenKind::Integer => self.dispatch.read_integer(parser),
            TokenKind::Float => self.dispatch.read_float(parser),
            TokenKind::Bool => self.dispatch.read_bool(parser),
            TokenKind::Null => self.dispatch.read_null(parser),
            TokenKind::ObjectStart => self.dispatch.read_object(parser),
            TokenKind::ArrayStart => self.dispatch.read_array(parser),
            _ => Err(parser.structural_error("expected value")),
        }
    }

    fn write(&self, writer: &mut Writer, value: &D::Value) -> Result<()> {
        self.dispatch.write(writer, value)
    }
}

/// Single-character string field stored in a 16-bit code unit.
/// Supplementary-plane code points do not fit and fail with
/// [`Error::TypeNarrowing`].
#[derive(Default)]
pub struct Utf16CharConverter;

impl Convert<u16> for Utf16CharConverter {
    fn read(&self, parser: &mut Parser) -> Result<u16> {
        let code = read_single_code_point(parser)?;
        u16::try_from(code).map_err(|_| Error::narrowing("u16 character", format!("U+{code:04X}")))
    }

    fn write(&self, writer: &mut Writer, value: &u16) -> Result<()> {
        let ch = char::from_u32(u32::from(*value))
            .ok_or_else(|| Error::narrowing("char", format!("U+{value:04X}")))?;
        let mut buf = [0u8; 4];
        writer.string(ch.encode_utf8(&mut buf));
        Ok(())
    }
}

/// Single-character string field stored in a 32-bit code unit; every
/// Unicode scalar value fits.
#[derive(Default)]
pub struct Utf32CharConverter;

impl Convert<u32> for Utf32CharConverter {
    fn read(&self, parser: &mut Parser) -> Result<u32> {
        read_single_code_point(parser)
    }

    fn write(&self, writer: &mut Writer, value: &u32) -> Result<()> {
        let ch = char::from_u32(*value)
            .ok_or_else(|| Error::narrowing("char", format!("U+{value:04X}")))?;
        let mut buf = [0u8; 4];
        writer.string(ch.encode_utf8(&mut buf));
        Ok(())
    }
}

fn read_single_code_point(parser: &mut Parser) -> Result<u32> {
    let text = parser.read_string()?;
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch as u32),
        _ => Err(Error::narrowing("character", format!("\"{text}\""))),
    }
}
