//! Polymorphic object fields keyed by a discriminator property.
//!
//! A field whose static type is a trait object decodes through a
//! [`PolyRegistry`]: the object body is scanned ahead for the
//! discriminator key (`"kind"` by default), the matching factory
//! constructs a default instance of the concrete type, the cursor rewinds
//! to the start of the body, and the instance reads its own fields. On
//! write the discriminator is emitted first, then the body.
//!
//! Concrete types implement [`PolyObject`] (usually via
//! [`json_poly!`](crate::json_poly)) and register a factory once:
//!
//! ```rust,ignore
//! static REGISTRY: Lazy<PolyRegistry<dyn Shape>> = Lazy::new(|| {
//!     PolyRegistry::new()
//!         .register("Circle", || Box::new(Circle::default()) as Box<dyn Shape>)
//!         .register("Rect", || Box::new(Rect::default()) as Box<dyn Shape>)
//! });
//! ```

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::parser::Parser;
use crate::writer::Writer;

/// Object-safe contract for types that participate in discriminated
/// decoding. The discriminant is the label written under the
/// discriminator key; `read_body`/`write_body` handle every other
/// property of the object.
pub trait PolyObject {
    fn discriminant(&self) -> &'static str;
    fn read_body(&mut self, parser: &mut Parser) -> Result<()>;
    fn write_body(&self, writer: &mut Writer) -> Result<()>;
}

type Factory<B> = Box<dyn Fn() -> Box<B> + Send + Sync>;

/// Maps discriminant labels to factories producing default instances of
/// the matching concrete type. Registration order is preserved, which
/// keeps diagnostics stable.
pub struct PolyRegistry<B: ?Sized> {
    factories: IndexMap<&'static str, Factory<B>>,
}

impl<B: ?Sized> PolyRegistry<B> {
    pub fn new() -> Self {
        PolyRegistry {
            factories: IndexMap::new(),
        }
    }

    /// Registers a factory for `label`, replacing any previous entry.
    #[must_use]
    pub fn register<F>(mut self, label: &'static str, factory: F) -> Self
    where
        F: Fn() -> Box<B> + Send + Sync + 'static,
    {
        self.factories.insert(label, Box::new(factory));
        self
    }

    /// Constructs a default instance for `label`.
    pub fn create(&self, label: &str) -> Result<Box<B>> {
        match self.factories.get(label) {
            Some(factory) => Ok(factory()),
            None => Err(Error::unknown("discriminator", label)),
        }
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl<B: ?Sized> Default for PolyRegistry<B> {
    fn default() -> Self {
        Self::new()
    }
}

/// Converter for `Option<Box<dyn Trait>>` fields backed by a registry.
///
/// `null` decodes to `None` and `None` writes `null`. The registry
/// reference is `'static` because registries live in once-initialized
/// statics alongside field sets.
pub struct PolyConverter<B: ?Sized + 'static> {
    registry: &'static PolyRegistry<B>,
    key: &'static str,
}

impl<B: ?Sized + PolyObject> PolyConverter<B> {
    pub fn new(registry: &'static PolyRegistry<B>) -> Self {
        PolyConverter {
            registry,
            key: "kind",
        }
    }

    /// Overrides the discriminator key for this field.
    #[must_use]
    pub fn with_key(mut self, key: &'static str) -> Self {
        self.key = key;
        self
    }

    /// Scans the object body for the discriminator without consuming it,
    /// then rewinds so the instance re-reads the body from the top.
    fn read_discriminant(&self, parser: &mut Parser) -> Result<String> {
        let mark = parser.mark();
        let label = loop {
            if parser.next_is_end_object() {
                return Err(parser.structural_error(format!(
                    "missing discriminator \"{}\"",
                    self.key
                )));
            }
            let key = parser.next_key()?;
            if key == self.key {
                break parser.read_string()?;
            }
            parser.skip_value()?;
        };
        parser.rewind(mark);
        Ok(label)
    }
}

impl<B: ?Sized + PolyObject> crate::convert::Convert<Option<Box<B>>> for PolyConverter<B> {
    fn read(&self, parser: &mut Parser) -> Result<Option<Box<B>>> {
        if parser.take_null()? {
            return Ok(None);
        }
        parser.start_object()?;
        let label = self.read_discriminant(parser)?;
        let mut instance = self.registry.create(&label)?;
        instance.read_body(parser)?;
        parser.end_object()?;
        Ok(Some(instance))
    }

    fn write(&self, writer: &mut Writer, value: &Option<Box<B>>) -> Result<()> {
        match value {
            None => {
                writer.null();
                Ok(())
            }
            Some(object) => {
                writer.start_object();
                writer.key(self.key);
                writer.string(object.discriminant());
                object.write_body(writer)?;
                writer.end_object();
                Ok(())
            }
        }
    }
}
