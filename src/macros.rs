//! Declaration macros that remove the projection boilerplate from field
//! bindings.
//!
//! [`json_field!`] expands to a [`Field`](crate::Field) whose accessor
//! pair projects one named member. [`json_bind!`] makes a field-bound
//! struct usable anywhere a [`JsonValue`](crate::JsonValue) is expected.
//! [`json_poly!`] wires a concrete type into discriminated decoding; the
//! trait object it is stored behind needs nothing extra, since a trait
//! object implements its supertraits automatically.

/// Binds a struct member to a JSON key through the member type's default
/// conversion. The key defaults to the member name.
///
/// ```rust,ignore
/// json_field!(Point, x)            // key "x"
/// json_field!(Point, x, "posX")    // explicit key
/// ```
#[macro_export]
macro_rules! json_field {
    ($ty:ty, $member:ident) => {
        $crate::json_field!($ty, $member, stringify!($member))
    };
    ($ty:ty, $member:ident, $key:expr) => {
        $crate::Field::new(
            $key,
            |value: &$ty| &value.$member,
            |value: &mut $ty| &mut value.$member,
        )
    };
}

/// Implements [`JsonValue`](crate::JsonValue) for a type with a
/// [`JsonFields`](crate::JsonFields) impl, so it nests inside other
/// bindings and works with the crate-level entry points.
#[macro_export]
macro_rules! json_bind {
    ($ty:ty) => {
        impl $crate::JsonValue for $ty {
            fn read_json(parser: &mut $crate::Parser) -> $crate::Result<Self> {
                <$ty as $crate::JsonFields>::json_fields().read(parser)
            }

            fn write_json(&self, writer: &mut $crate::Writer) -> $crate::Result<()> {
                <$ty as $crate::JsonFields>::json_fields().write(writer, self)
            }
        }
    };
}

/// Implements [`PolyObject`](crate::PolyObject) for a concrete type,
/// using its field set as the object body and the given label as its
/// discriminant.
#[macro_export]
macro_rules! json_poly {
    ($ty:ty, $label:expr) => {
        impl $crate::PolyObject for $ty {
            fn discriminant(&self) -> &'static str {
                $label
            }

            fn read_body(&mut self, parser: &mut $crate::Parser) -> $crate::Result<()> {
                <$ty as $crate::JsonFields>::json_fields().read_body(parser, self)
            }

            fn write_body(&self, writer: &mut $crate::Writer) -> $crate::Result<()> {
                <$ty as $crate::JsonFields>::json_fields().write_body(writer, self)
            }
        }
    };
}
