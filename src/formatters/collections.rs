//! Sequence and mapping formatters for the standard containers.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::context::{DeserializationContext, SerializationContext};
use crate::emitter::Emitter;
use crate::error::Result;
use crate::event::ParseEventType;
use crate::formatter::{Formatter, TypeNature, YamlType};
use crate::parser::YamlParser;

/// Any container of `T` that iterates by reference and collects from items.
pub(crate) struct SequenceFormatter<C, T> {
    _types: PhantomData<fn() -> (C, T)>,
}

impl<C, T> SequenceFormatter<C, T> {
    pub(crate) fn new() -> Self {
        Self {
            _types: PhantomData,
        }
    }
}

impl<C, T> Formatter<C> for SequenceFormatter<C, T>
where
    C: FromIterator<T> + 'static,
    for<'a> &'a C: IntoIterator<Item = &'a T>,
    T: YamlType,
{
    fn serialize(
        &self,
        emitter: &mut Emitter,
        value: &C,
        ctx: &mut SerializationContext<'_>,
    ) -> Result<()> {
        emitter.begin_sequence()?;
        for item in value {
            ctx.serialize_with_alias(emitter, item)?;
        }
        emitter.end_sequence()
    }

    fn deserialize(
        &self,
        parser: &mut YamlParser<'_>,
        ctx: &mut DeserializationContext<'_>,
    ) -> Result<C> {
        parser.read_with_verify(ParseEventType::SequenceStart)?;
        let mut items = Vec::new();
        while parser.current_event_type() != ParseEventType::SequenceEnd {
            items.push(ctx.deserialize_with_alias::<T>(parser)?);
        }
        parser.read_with_verify(ParseEventType::SequenceEnd)?;
        Ok(items.into_iter().collect())
    }
}

/// Any map from `K` to `V`. Keys go through their own formatter, so they must
/// serialize as scalars.
pub(crate) struct MappingFormatter<M, K, V> {
    _types: PhantomData<fn() -> (M, K, V)>,
}

impl<M, K, V> MappingFormatter<M, K, V> {
    pub(crate) fn new() -> Self {
        Self {
            _types: PhantomData,
        }
    }
}

impl<M, K, V> Formatter<M> for MappingFormatter<M, K, V>
where
    M: FromIterator<(K, V)> + 'static,
    for<'a> &'a M: IntoIterator<Item = (&'a K, &'a V)>,
    K: YamlType,
    V: YamlType,
{
    fn serialize(
        &self,
        emitter: &mut Emitter,
        value: &M,
        ctx: &mut SerializationContext<'_>,
    ) -> Result<()> {
        emitter.begin_mapping()?;
        for (key, item) in value {
            ctx.serialize_with_alias(emitter, key)?;
            ctx.serialize_with_alias(emitter, item)?;
        }
        emitter.end_mapping()
    }

    fn deserialize(
        &self,
        parser: &mut YamlParser<'_>,
        ctx: &mut DeserializationContext<'_>,
    ) -> Result<M> {
        parser.read_with_verify(ParseEventType::MappingStart)?;
        let mut entries = Vec::new();
        while parser.current_event_type() != ParseEventType::MappingEnd {
            let key = ctx.deserialize_with_alias::<K>(parser)?;
            let item = ctx.deserialize_with_alias::<V>(parser)?;
            entries.push((key, item));
        }
        parser.read_with_verify(ParseEventType::MappingEnd)?;
        Ok(entries.into_iter().collect())
    }
}

impl<T: YamlType> YamlType for Vec<T> {
    const NATURE: TypeNature = TypeNature::Generic;

    fn generic_formatter() -> Option<Arc<dyn Formatter<Self>>> {
        Some(Arc::new(SequenceFormatter::<Self, T>::new()))
    }
}

impl<T: YamlType> YamlType for VecDeque<T> {
    const NATURE: TypeNature = TypeNature::Generic;

    fn generic_formatter() -> Option<Arc<dyn Formatter<Self>>> {
        Some(Arc::new(SequenceFormatter::<Self, T>::new()))
    }
}

impl<T: YamlType + Eq + Hash> YamlType for HashSet<T> {
    const NATURE: TypeNature = TypeNature::Generic;

    fn generic_formatter() -> Option<Arc<dyn Formatter<Self>>> {
        Some(Arc::new(SequenceFormatter::<Self, T>::new()))
    }
}

impl<T: YamlType + Ord> YamlType for BTreeSet<T> {
    const NATURE: TypeNature = TypeNature::Generic;

    fn generic_formatter() -> Option<Arc<dyn Formatter<Self>>> {
        Some(Arc::new(SequenceFormatter::<Self, T>::new()))
    }
}

impl<K: YamlType + Eq + Hash, V: YamlType> YamlType for HashMap<K, V> {
    const NATURE: TypeNature = TypeNature::Generic;

    fn generic_formatter() -> Option<Arc<dyn Formatter<Self>>> {
        Some(Arc::new(MappingFormatter::<Self, K, V>::new()))
    }
}

impl<K: YamlType + Ord, V: YamlType> YamlType for BTreeMap<K, V> {
    const NATURE: TypeNature = TypeNature::Generic;

    fn generic_formatter() -> Option<Arc<dyn Formatter<Self>>> {
        Some(Arc::new(MappingFormatter::<Self, K, V>::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::FormatterRegistry;
    use crate::serializer_options::SerializerOptions;

    fn write<T: YamlType>(value: &T) -> Result<String> {
        let registry = FormatterRegistry::new();
        let mut ctx = SerializationContext::new(&registry, SerializerOptions::default());
        let mut emitter = Emitter::new(SerializerOptions::default());
        ctx.serialize_with_alias(&mut emitter, value)?;
        emitter.finish()
    }

    fn read<T: YamlType>(input: &str) -> Result<T> {
        let registry = FormatterRegistry::new();
        let mut ctx = DeserializationContext::new(&registry);
        let mut parser = YamlParser::new(input);
        parser.skip_after(ParseEventType::DocumentStart)?;
        ctx.deserialize_with_alias::<T>(&mut parser)
    }

    #[test]
    fn btree_map_of_lists() {
        let mut map = BTreeMap::new();
        map.insert("a".to_string(), vec![1u32, 2]);
        map.insert("b".to_string(), Vec::new());
        assert_eq!(write(&map).unwrap(), "a:\n  - 1\n  - 2\nb: []\n");
        assert_eq!(read::<BTreeMap<String, Vec<u32>>>("a: [1, 2]\nb: []\n").unwrap(), map);
    }

    #[test]
    fn integer_keys() {
        let map: BTreeMap<i32, String> = read("1: one\n-2: two\n").unwrap();
        assert_eq!(map.get(&-2).map(String::as_str), Some("two"));
        assert_eq!(write(&map).unwrap(), "-2: two\n1: one\n");
    }

    #[test]
    fn sets_and_deques() {
        let set: BTreeSet<String> = read("[b, a, b]").unwrap();
        assert_eq!(set.len(), 2);
        let deque: VecDeque<i64> = read("- 3\n- 4\n").unwrap();
        assert_eq!(deque.front(), Some(&3));
        let hashed: HashSet<u8> = read("[1, 1, 2]").unwrap();
        assert!(hashed.contains(&2));
    }

    #[test]
    fn mapping_where_sequence_expected() {
        let err = read::<Vec<i32>>("a: 1").unwrap_err();
        assert!(err.to_string().contains("sequence start"), "{err}");
    }
}
