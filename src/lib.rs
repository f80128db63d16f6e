//! Type-directed YAML serialization.
//!
//! A [`FormatterRegistry`] maps each type to a [`Formatter`] that reads it from a
//! [`YamlParser`] and writes it to an [`Emitter`]. Fields typed as a polymorphic
//! base (`Box<dyn Trait>`) are resolved through the node's tag, so the concrete
//! type survives a round trip.
//!
//! ```rust
//! use std::any::Any;
//!
//! trait Shape: Any + Send + Sync {}
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Circle {
//!     radius: f64,
//! }
//! impl Shape for Circle {}
//!
//! nex_yaml::polymorphic_base!(dyn Shape, Interface);
//! nex_yaml::yaml_variant!(Circle => Box<dyn Shape>);
//! nex_yaml::yaml_object! {
//!     struct CircleFormatter for Circle { radius }
//! }
//!
//! let mut registry = nex_yaml::FormatterRegistry::new();
//! registry
//!     .register_variant::<Circle, Box<dyn Shape>>(CircleFormatter)
//!     .unwrap();
//!
//! let shapes: Vec<Box<dyn Shape>> = vec![Box::new(Circle { radius: 1.5 })];
//! let yaml = nex_yaml::to_string_with_registry(&shapes, &registry).unwrap();
//! assert_eq!(yaml, "- !Circle\n  radius: 1.5\n");
//!
//! let back: Vec<Box<dyn Shape>> = nex_yaml::from_str_with_registry(&yaml, &registry).unwrap();
//! let any: &dyn Any = &*back[0];
//! assert_eq!(any.downcast_ref::<Circle>(), Some(&Circle { radius: 1.5 }));
//! ```

use tracing::debug_span;

mod budget;
mod context;
mod emitter;
mod error;
mod event;
mod formatter;
mod formatters;
mod location;
mod macros;
mod options;
pub mod parse_scalars;
mod parser;
mod registry;
mod resolver;
mod scalar;
mod ser_quoting;
mod serializer_options;
mod tags;
mod type_identity;
mod zmij_format;

pub use budget::{Budget, BudgetBreach, BudgetReport, check_yaml_budget};
pub use context::{DeserializationContext, SerializationContext};
pub use emitter::Emitter;
pub use error::{Error, Result};
pub use event::{Anchor, ParseEventType};
pub use formatter::{BaseKind, Formatter, TypeNature, Variant, YamlType};
pub use formatters::{Binary, Decimal};
pub use location::Location;
pub use options::{AliasLimits, Options};
pub use parser::YamlParser;
#[doc(hidden)]
pub use registry::Registration;
pub use registry::FormatterRegistry;
pub use scalar::{ScalarKind, ScalarValue};
pub use serializer_options::SerializerOptions;
pub use tags::Tag;
pub use type_identity::TypeIdentity;

#[doc(hidden)]
pub mod __private {
    #[cfg(feature = "auto_register")]
    pub use inventory;

    use crate::{Result, YamlParser};

    /// Skip a mapping entry whose key no field claims.
    pub fn skip_unknown_entry<T>(parser: &mut YamlParser<'_>) -> Result<()> {
        tracing::trace!(
            ty = std::any::type_name::<T>(),
            key = parser.try_get_scalar_as_string().unwrap_or("<complex key>"),
            "skipping unknown key"
        );
        parser.skip_current_node()?;
        parser.skip_current_node()
    }
}

/// Deserialize one document from `input` with the global registry and default options.
pub fn from_str<T: YamlType>(input: &str) -> Result<T> {
    from_str_with_options(input, Options::default())
}

pub fn from_str_with_options<T: YamlType>(input: &str, options: Options) -> Result<T> {
    deserialize_single(input, &options, FormatterRegistry::global())
}

/// Deserialize with an explicitly built registry.
pub fn from_str_with_registry<T: YamlType>(input: &str, registry: &FormatterRegistry) -> Result<T> {
    deserialize_single(input, &Options::default(), registry)
}

pub fn from_slice<T: YamlType>(bytes: &[u8]) -> Result<T> {
    from_slice_with_options(bytes, Options::default())
}

pub fn from_slice_with_options<T: YamlType>(bytes: &[u8], options: Options) -> Result<T> {
    let input = std::str::from_utf8(bytes)?;
    from_str_with_options(input, options)
}

/// Deserialize every document of a multi-document stream.
pub fn from_str_multiple<T: YamlType>(
    input: &str,
    options: Options,
    registry: &FormatterRegistry,
) -> Result<Vec<T>> {
    let _span = debug_span!("from_str_multiple", ty = std::any::type_name::<T>()).entered();
    let mut parser = YamlParser::with_options(input, &options);
    let mut ctx = DeserializationContext::new(registry);
    let mut values = Vec::new();
    while parser.skip_after(ParseEventType::DocumentStart)? {
        if parser.current_event_type() == ParseEventType::DocumentEnd {
            continue;
        }
        values.push(ctx.deserialize_with_alias::<T>(&mut parser)?);
        parser.read_with_verify(ParseEventType::DocumentEnd)?;
    }
    Ok(values)
}

fn deserialize_single<T: YamlType>(
    input: &str,
    options: &Options,
    registry: &FormatterRegistry,
) -> Result<T> {
    let _span = debug_span!("from_str", ty = std::any::type_name::<T>()).entered();
    let mut parser = YamlParser::with_options(input, options);
    if !parser.skip_after(ParseEventType::DocumentStart)? {
        return Err(Error::NoDocument);
    }
    let mut ctx = DeserializationContext::new(registry);
    let value = ctx.deserialize_with_alias::<T>(&mut parser)?;
    parser.read_with_verify(ParseEventType::DocumentEnd)?;
    if parser.current_event_type() == ParseEventType::DocumentStart {
        return Err(Error::MoreThanOneDocument {
            location: parser.current_mark(),
        });
    }
    // Drain so budget accounting and the report callback see the whole stream.
    parser.skip_after(ParseEventType::StreamEnd)?;
    Ok(value)
}

/// Serialize `value` with the global registry and default options.
pub fn to_string<T: YamlType>(value: &T) -> Result<String> {
    to_string_with_options(value, SerializerOptions::default())
}

pub fn to_string_with_options<T: YamlType>(value: &T, options: SerializerOptions) -> Result<String> {
    serialize_with(value, options, FormatterRegistry::global())
}

pub fn to_string_with_registry<T: YamlType>(value: &T, registry: &FormatterRegistry) -> Result<String> {
    serialize_with(value, SerializerOptions::default(), registry)
}

fn serialize_with<T: YamlType>(
    value: &T,
    options: SerializerOptions,
    registry: &FormatterRegistry,
) -> Result<String> {
    let _span = debug_span!("to_string", ty = std::any::type_name::<T>()).entered();
    options.consistent()?;
    let mut emitter = Emitter::new(options);
    let mut ctx = SerializationContext::new(registry, options);
    ctx.serialize_with_alias(&mut emitter, value)?;
    emitter.finish()
}
