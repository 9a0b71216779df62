//! Declarative field bindings.
//!
//! A participating struct declares an ordered [`FieldSet`]: one
//! [`Field`] per JSON key, each pairing accessor projections with a
//! converter, an optional read-time default, an optional write-time
//! skip-if-equal sentinel, and a required flag. The set is built exactly
//! once per type (held in a `once_cell::sync::Lazy` static behind
//! [`JsonFields::json_fields`]) and is safe for concurrent read-only use
//! thereafter.
//!
//! Field-set membership is the author's explicit choice: a type embedding
//! another re-lists the embedded fields it wants by projecting through the
//! embedded value, in any order.
//!
//! ## Examples
//!
//! ```rust
//! use json_bind::{json_bind, json_field, Field, FieldSet, JsonFields};
//! use once_cell::sync::Lazy;
//!
//! #[derive(Default, Debug, PartialEq)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! impl JsonFields for Point {
//!     fn json_fields() -> &'static FieldSet<Self> {
//!         static FIELDS: Lazy<FieldSet<Point>> = Lazy::new(|| {
//!             FieldSet::new(vec![
//!                 json_field!(Point, x),
//!                 json_field!(Point, y),
//!             ])
//!         });
//!         &FIELDS
//!     }
//! }
//! json_bind!(Point);
//!
//! let point: Point = json_bind::from_str("{y:2,x:1}").unwrap();
//! assert_eq!(point, Point { x: 1, y: 2 });
//! assert_eq!(json_bind::to_string(&point).unwrap(), "{x:1,y:2}");
//! ```

use crate::convert::{Convert, DefaultConverter};
use crate::error::Result;
use crate::parser::Parser;
use crate::value::JsonValue;
use crate::writer::Writer;

type ReadFn<T> = Box<dyn Fn(&mut Parser, &mut T) -> Result<()> + Send + Sync>;
type WriteFn<T> = Box<dyn Fn(&mut Writer, &T) -> Result<()> + Send + Sync>;
type SkipFn<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;
type DefaultFn<T> = Box<dyn Fn(&mut T) + Send + Sync>;

/// Binding between one struct member and one JSON key.
///
/// Immutable after construction and shared across all instances of the
/// owning type.
pub struct Field<T> {
    key: &'static str,
    read: ReadFn<T>,
    write: WriteFn<T>,
    skip: Option<SkipFn<T>>,
    default: Option<DefaultFn<T>>,
    required: bool,
}

impl<T: 'static> Field<T> {
    /// Binds a member through its type's default conversion.
    pub fn new<V>(
        key: &'static str,
        get: fn(&T) -> &V,
        get_mut: fn(&mut T) -> &mut V,
    ) -> Self
    where
        V: JsonValue + 'static,
    {
        Self::with(key, get, get_mut, DefaultConverter::new())
    }

    /// Binds a member through an explicit converter value.
    pub fn with<V, C>(
        key: &'static str,
        get: fn(&T) -> &V,
        get_mut: fn(&mut T) -> &mut V,
        converter: C,
    ) -> Self
    where
        V: 'static,
        C: Convert<V> + Send + Sync + 'static,
    {
        let converter = std::sync::Arc::new(converter);
        let reader = converter.clone();
        Field {
            key,
            read: Box::new(move |parser, out| {
                *get_mut(out) = reader.read(parser)?;
                Ok(())
            }),
            write: Box::new(move |writer, value| converter.write(writer, get(value))),
            skip: None,
            default: None,
            required: false,
        }
    }

    /// Binds a member and applies `default` when the key is absent from the
    /// input.
    pub fn with_default<V>(
        key: &'static str,
        get: fn(&T) -> &V,
        get_mut: fn(&mut T) -> &mut V,
        default: V,
    ) -> Self
    where
        V: JsonValue + Clone + Send + Sync + 'static,
    {
        let mut field = Self::new(key, get, get_mut);
        field.default = Some(Box::new(move |out| *get_mut(out) = default.clone()));
        field
    }

    /// Binds a member and omits it from output whenever its value equals
    /// `sentinel`.
    pub fn skip_if<V>(
        key: &'static str,
        get: fn(&T) -> &V,
        get_mut: fn(&mut T) -> &mut V,
        sentinel: V,
    ) -> Self
    where
        V: JsonValue + PartialEq + Send + Sync + 'static,
    {
        let mut field = Self::new(key, get, get_mut);
        field.skip = Some(Box::new(move |value| *get(value) == sentinel));
        field
    }

    /// Binds a member whose key must appear in the input.
    pub fn required<V>(
        key: &'static str,
        get: fn(&T) -> &V,
        get_mut: fn(&mut T) -> &mut V,
    ) -> Self
    where
        V: JsonValue + 'static,
    {
        let mut field = Self::new(key, get, get_mut);
        field.required = true;
        field
    }

    /// Binds a required member through an explicit converter.
    pub fn required_with<V, C>(
        key: &'static str,
        get: fn(&T) -> &V,
        get_mut: fn(&mut T) -> &mut V,
        converter: C,
    ) -> Self
    where
        V: 'static,
        C: Convert<V> + Send + Sync + 'static,
    {
        let mut field = Self::with(key, get, get_mut, converter);
        field.required = true;
        field
    }

    pub fn key(&self) -> &'static str {
        self.key
    }
}

/// Ordered sequence of field descriptors for one type.
pub struct FieldSet<T> {
    fields: Vec<Field<T>>,
}

impl<T> FieldSet<T> {
    pub fn new(fields: Vec<Field<T>>) -> Self {
        FieldSet { fields }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Decodes a full object (`{` body `}`) into a fresh value.
    pub fn read(&self, parser: &mut Parser) -> Result<T>
    where
        T: Default,
    {
        let mut out = T::default();
        parser.start_object()?;
        self.read_body(parser, &mut out)?;
        parser.end_object()?;
        Ok(out)
    }

    /// Decodes the body of an already-opened object. Arriving keys match
    /// declared fields in any order; unknown keys are skipped wholesale.
    /// After the body, absent fields get their default, or fail if
    /// required, or stay at their current value.
    pub fn read_body(&self, parser: &mut Parser, out: &mut T) -> Result<()> {
        let mut seen = vec![false; self.fields.len()];
        while !parser.next_is_end_object() {
            let key = parser.next_key()?;
            match self.fields.iter().position(|f| f.key == key) {
                Some(index) => {
                    (self.fields[index].read)(parser, out)?;
                    seen[index] = true;
                }
                None => parser.skip_value()?,
            }
        }
        for (field, seen) in self.fields.iter().zip(seen) {
            if seen {
                continue;
            }
            if let Some(default) = &field.default {
                default(out);
            } else if field.required {
                return Err(parser.structural_error(format!(
                    "missing required field \"{}\"",
                    field.key
                )));
            }
        }
        Ok(())
    }

    /// Encodes a full object, honoring each field's skip rule.
    pub fn write(&self, writer: &mut Writer, value: &T) -> Result<()> {
        writer.start_object();
        self.write_body(writer, value)?;
        writer.end_object();
        Ok(())
    }

    /// Encodes the fields of an already-opened object in declaration order.
    pub fn write_body(&self, writer: &mut Writer, value: &T) -> Result<()> {
        for field in &self.fields {
            if let Some(skip) = &field.skip {
                if skip(value) {
                    continue;
                }
            }
            writer.key(field.key);
            (field.write)(writer, value)?;
        }
        Ok(())
    }
}

/// A type that declares its JSON binding as a cached field set.
pub trait JsonFields: Default + Sized + 'static {
    /// Returns the type's field set, built exactly once.
    fn json_fields() -> &'static FieldSet<Self>;
}
