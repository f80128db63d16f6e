//! Fixed-size arrays and boxed slices, written as plain sequences.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::context::{DeserializationContext, SerializationContext};
use crate::emitter::Emitter;
use crate::error::{Error, Result};
use crate::event::ParseEventType;
use crate::formatter::{Formatter, TypeNature, YamlType};
use crate::parser::YamlParser;

fn write_items<T: YamlType>(
    emitter: &mut Emitter,
    items: &[T],
    ctx: &mut SerializationContext<'_>,
) -> Result<()> {
    emitter.begin_sequence()?;
    for item in items {
        ctx.serialize_with_alias(emitter, item)?;
    }
    emitter.end_sequence()
}

/// Reads a whole sequence. With `exact`, the sequence must hold that many items.
fn read_items<T: YamlType>(
    parser: &mut YamlParser<'_>,
    ctx: &mut DeserializationContext<'_>,
    exact: Option<usize>,
) -> Result<Vec<T>> {
    parser.read_with_verify(ParseEventType::SequenceStart)?;
    let mut items = Vec::with_capacity(exact.unwrap_or_default());
    while parser.current_event_type() != ParseEventType::SequenceEnd {
        if exact == Some(items.len()) {
            return Err(parser.structure_error(ParseEventType::SequenceEnd.to_string()));
        }
        items.push(ctx.deserialize_with_alias::<T>(parser)?);
    }
    if let Some(len) = exact.filter(|&len| len != items.len()) {
        return Err(parser.structure_error(format!("{len} sequence items")));
    }
    parser.read_with_verify(ParseEventType::SequenceEnd)?;
    Ok(items)
}

pub(crate) struct ArrayFormatter<T, const N: usize> {
    _item: PhantomData<fn() -> T>,
}

impl<T, const N: usize> ArrayFormatter<T, N> {
    pub(crate) fn new() -> Self {
        Self { _item: PhantomData }
    }
}

impl<T: YamlType, const N: usize> Formatter<[T; N]> for ArrayFormatter<T, N> {
    fn serialize(
        &self,
        emitter: &mut Emitter,
        value: &[T; N],
        ctx: &mut SerializationContext<'_>,
    ) -> Result<()> {
        write_items(emitter, value, ctx)
    }

    fn deserialize(
        &self,
        parser: &mut YamlParser<'_>,
        ctx: &mut DeserializationContext<'_>,
    ) -> Result<[T; N]> {
        let items = read_items::<T>(parser, ctx, Some(N))?;
        <[T; N]>::try_from(items)
            .map_err(|items| Error::msg(format!("expected {N} items, read {}", items.len())))
    }
}

pub(crate) struct BoxedSliceFormatter<T> {
    _item: PhantomData<fn() -> T>,
}

impl<T> BoxedSliceFormatter<T> {
    pub(crate) fn new() -> Self {
        Self { _item: PhantomData }
    }
}

impl<T: YamlType> Formatter<Box<[T]>> for BoxedSliceFormatter<T> {
    fn serialize(
        &self,
        emitter: &mut Emitter,
        value: &Box<[T]>,
        ctx: &mut SerializationContext<'_>,
    ) -> Result<()> {
        write_items(emitter, value, ctx)
    }

    fn deserialize(
        &self,
        parser: &mut YamlParser<'_>,
        ctx: &mut DeserializationContext<'_>,
    ) -> Result<Box<[T]>> {
        read_items::<T>(parser, ctx, None).map(Vec::into_boxed_slice)
    }
}

impl<T: YamlType, const N: usize> YamlType for [T; N] {
    const NATURE: TypeNature = TypeNature::Generic;

    fn generic_formatter() -> Option<Arc<dyn Formatter<Self>>> {
        Some(Arc::new(ArrayFormatter::<T, N>::new()))
    }
}

impl<T: YamlType> YamlType for Box<[T]> {
    const NATURE: TypeNature = TypeNature::Generic;

    fn generic_formatter() -> Option<Arc<dyn Formatter<Self>>> {
        Some(Arc::new(BoxedSliceFormatter::<T>::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::FormatterRegistry;

    fn read<T: YamlType>(input: &str) -> Result<T> {
        let registry = FormatterRegistry::new();
        let mut ctx = DeserializationContext::new(&registry);
        let mut parser = YamlParser::new(input);
        parser.skip_after(ParseEventType::DocumentStart)?;
        ctx.deserialize_with_alias::<T>(&mut parser)
    }

    #[test]
    fn array_length_must_match() {
        assert_eq!(read::<[u8; 3]>("[1, 2, 3]").unwrap(), [1, 2, 3]);
        assert!(read::<[u8; 0]>("[]").unwrap().is_empty());

        match read::<[u8; 3]>("[1, 2]").unwrap_err() {
            Error::Structure { expected, found, .. } => {
                assert_eq!(expected, "3 sequence items");
                assert_eq!(found, ParseEventType::SequenceEnd);
            }
            other => panic!("unexpected error: {other}"),
        }
        match read::<[u8; 2]>("[1, 2, 3]").unwrap_err() {
            Error::Structure { found, .. } => assert_eq!(found, ParseEventType::Scalar),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn boxed_slice_takes_any_length() {
        let boxed: Box<[String]> = read("[a, b]").unwrap();
        assert_eq!(boxed.to_vec(), vec!["a".to_string(), "b".to_string()]);
        assert!(read::<Box<[i32]>>("[]").unwrap().is_empty());
    }
}
