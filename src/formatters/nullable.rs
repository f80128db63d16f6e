use std::marker::PhantomData;
use std::sync::Arc;

use crate::context::{DeserializationContext, SerializationContext};
use crate::emitter::Emitter;
use crate::error::Result;
use crate::formatter::{Formatter, TypeNature, YamlType};
use crate::parser::YamlParser;

/// `None` is a null scalar; anything else is handed to `T`'s formatter.
pub(crate) struct NullableFormatter<T> {
    _inner: PhantomData<fn() -> T>,
}

impl<T> NullableFormatter<T> {
    pub(crate) fn new() -> Self {
        Self {
            _inner: PhantomData,
        }
    }
}

impl<T: YamlType> Formatter<Option<T>> for NullableFormatter<T> {
    fn serialize(
        &self,
        emitter: &mut Emitter,
        value: &Option<T>,
        ctx: &mut SerializationContext<'_>,
    ) -> Result<()> {
        match value {
            Some(inner) => ctx.serialize_with_alias(emitter, inner),
            None => emitter.write_null(),
        }
    }

    fn deserialize(
        &self,
        parser: &mut YamlParser<'_>,
        ctx: &mut DeserializationContext<'_>,
    ) -> Result<Option<T>> {
        if parser.is_null_scalar() {
            parser.read()?;
            return Ok(None);
        }
        ctx.deserialize_with_alias::<T>(parser).map(Some)
    }
}

impl<T: YamlType> YamlType for Option<T> {
    const NATURE: TypeNature = TypeNature::Generic;

    fn generic_formatter() -> Option<Arc<dyn Formatter<Self>>> {
        Some(Arc::new(NullableFormatter::<T>::new()))
    }
}
