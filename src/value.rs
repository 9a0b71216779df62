//! The `JsonValue` read/write contract.
//!
//! [`JsonValue`] is the symmetric decode/encode hook every participating
//! type satisfies: scalars and strings implement it directly, containers
//! compose element impls, and field-bound structs get an impl through
//! [`json_bind!`](crate::json_bind). Implementing it by hand is the escape
//! hatch that bypasses the field-set mechanism entirely.
//!
//! ## Examples
//!
//! ```rust
//! use json_bind::{from_str, to_string};
//!
//! let numbers: Vec<i32> = from_str("[1,2,3]").unwrap();
//! assert_eq!(numbers, vec![1, 2, 3]);
//! assert_eq!(to_string(&numbers).unwrap(), "[1,2,3]");
//! ```

use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::parser::Parser;
use crate::writer::Writer;

/// Symmetric decode/encode capability.
pub trait JsonValue: Sized {
    /// Reconstructs a value from the parser's token stream.
    fn read_json(parser: &mut Parser) -> Result<Self>;

    /// Serializes the value through the writer.
    fn write_json(&self, writer: &mut Writer) -> Result<()>;
}

macro_rules! impl_signed {
    ($($ty:ty),*) => {$(
        impl JsonValue for $ty {
            fn read_json(parser: &mut Parser) -> Result<Self> {
                parser.read_integer()
            }

            fn write_json(&self, writer: &mut Writer) -> Result<()> {
                writer.integer(i64::from(*self));
                Ok(())
            }
        }
    )*};
}

macro_rules! impl_unsigned {
    ($($ty:ty),*) => {$(
        impl JsonValue for $ty {
            fn read_json(parser: &mut Parser) -> Result<Self> {
                parser.read_integer()
            }

            fn write_json(&self, writer: &mut Writer) -> Result<()> {
                writer.unsigned(u64::from(*self));
                Ok(())
            }
        }
    )*};
}

impl_signed!(i8, i16, i32, i64);
impl_unsigned!(u8, u16, u32, u64);

impl JsonValue for f32 {
    fn read_json(parser: &mut Parser) -> Result<Self> {
        parser.read_float()
    }

    fn write_json(&self, writer: &mut Writer) -> Result<()> {
        writer.float32(*self);
        Ok(())
    }
}

impl JsonValue for f64 {
    fn read_json(parser: &mut Parser) -> Result<Self> {
        parser.read_float()
    }

    fn write_json(&self, writer: &mut Writer) -> Result<()> {
        writer.float64(*self);
        Ok(())
    }
}

impl JsonValue for bool {
    fn read_json(parser: &mut Parser) -> Result<Self> {
        parser.read_bool()
    }

    fn write_json(&self, writer: &mut Writer) -> Result<()> {
        writer.boolean(*self);
        Ok(())
    }
}

impl JsonValue for String {
    fn read_json(parser: &mut Parser) -> Result<Self> {
        parser.read_string()
    }

    fn write_json(&self, writer: &mut Writer) -> Result<()> {
        writer.string(self);
        Ok(())
    }
}

/// A `char` field reads a one-character string value. Any code point fits;
/// narrower character widths go through the explicit converters in
/// [`convert`](crate::convert).
impl JsonValue for char {
    fn read_json(parser: &mut Parser) -> Result<Self> {
        let text = parser.read_string()?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Ok(ch),
            _ => Err(Error::narrowing("char", format!("\"{text}\""))),
        }
    }

    fn write_json(&self, writer: &mut Writer) -> Result<()> {
        let mut buf = [0u8; 4];
        writer.string(self.encode_utf8(&mut buf));
        Ok(())
    }
}

/// Sequential container: element order is preserved on both read and write.
impl<V: JsonValue> JsonValue for Vec<V> {
    fn read_json(parser: &mut Parser) -> Result<Self> {
        parser.start_array()?;
        let mut out = Vec::new();
        while !parser.next_is_end_array() {
            out.push(V::read_json(parser)?);
        }
        parser.end_array()?;
        Ok(out)
    }

    fn write_json(&self, writer: &mut Writer) -> Result<()> {
        writer.start_array();
        for item in self {
            item.write_json(writer)?;
        }
        writer.end_array();
        Ok(())
    }
}

/// Ordered set: elements are always written in their sorted order,
/// regardless of insertion order.
impl<V: JsonValue + Ord> JsonValue for BTreeSet<V> {
    fn read_json(parser: &mut Parser) -> Result<Self> {
        parser.start_array()?;
        let mut out = BTreeSet::new();
        while !parser.next_is_end_array() {
            out.insert(V::read_json(parser)?);
        }
        parser.end_array()?;
        Ok(out)
    }

    fn write_json(&self, writer: &mut Writer) -> Result<()> {
        writer.start_array();
        for item in self {
            item.write_json(writer)?;
        }
        writer.end_array();
        Ok(())
    }
}

impl<V: JsonValue> JsonValue for Box<V> {
    fn read_json(parser: &mut Parser) -> Result<Self> {
        Ok(Box::new(V::read_json(parser)?))
    }

    fn write_json(&self, writer: &mut Writer) -> Result<()> {
        (**self).write_json(writer)
    }
}

/// Owning-nothing decodes from (and encodes to) `null`.
impl<V: JsonValue> JsonValue for Option<V> {
    fn read_json(parser: &mut Parser) -> Result<Self> {
        if parser.take_null()? {
            Ok(None)
        } else {
            Ok(Some(V::read_json(parser)?))
        }
    }

    fn write_json(&self, writer: &mut Writer) -> Result<()> {
        match self {
            Some(value) => value.write_json(writer),
            None => {
                writer.null();
                Ok(())
            }
        }
    }
}
