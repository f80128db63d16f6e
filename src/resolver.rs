//! Tag-based dispatch for polymorphic bases.
//!
//! A [`RedirectFormatter`] stands in for the formatter of a base `B`. On write it
//! looks up the value's concrete type, tags the node with that variant's alias,
//! and delegates. On read it requires a tag, maps the alias back to a variant,
//! and delegates. Lookups only ever consult the table matching `B`'s
//! [`BaseKind`].

use std::any::TypeId;
use std::marker::PhantomData;

use tracing::trace;

use crate::context::{DeserializationContext, SerializationContext};
use crate::emitter::Emitter;
use crate::error::{Error, Result};
use crate::formatter::{BaseKind, Formatter, YamlType};
use crate::parser::YamlParser;
use crate::registry::{FormatterRegistry, VariantTable};
use crate::tags::Tag;

pub(crate) struct RedirectFormatter<B> {
    kind: BaseKind,
    _base: PhantomData<fn() -> B>,
}

impl<B: YamlType> RedirectFormatter<B> {
    pub(crate) fn new(kind: BaseKind) -> Self {
        Self {
            kind,
            _base: PhantomData,
        }
    }

    fn table<'r>(&self, registry: &'r FormatterRegistry) -> Result<&'r VariantTable> {
        registry
            .variant_table(TypeId::of::<B>(), self.kind)
            .filter(|table| !table.is_empty())
            .ok_or_else(|| Error::NoVariantsRegistered {
                base: B::type_identity().to_string(),
            })
    }
}

impl<B: YamlType> Formatter<B> for RedirectFormatter<B> {
    fn serialize(
        &self,
        emitter: &mut Emitter,
        value: &B,
        ctx: &mut SerializationContext<'_>,
    ) -> Result<()> {
        let table = self.table(ctx.registry())?;
        let entry = table
            .by_type(value.runtime_type_id())
            .ok_or_else(|| Error::UnregisteredVariant {
                base: table.base.to_string(),
            })?;
        let formatter = entry.formatter::<B>().ok_or_else(|| Error::UnregisteredVariant {
            base: table.base.to_string(),
        })?;
        trace!(base = %table.base, variant = %entry.identity, alias = %entry.alias, "redirect serialize");
        emitter.tag(&Tag::local(entry.alias.as_str()));
        formatter.serialize(emitter, value, ctx)
    }

    fn deserialize(
        &self,
        parser: &mut YamlParser<'_>,
        ctx: &mut DeserializationContext<'_>,
    ) -> Result<B> {
        let table = self.table(ctx.registry())?;
        let alias = match parser.current_tag() {
            Some(tag) => tag.alias(),
            None => {
                return Err(Error::MissingTag {
                    base: table.base.to_string(),
                    location: parser.current_mark(),
                });
            }
        };
        let unknown = || Error::UnknownAlias {
            base: table.base.to_string(),
            alias: alias.clone(),
            location: parser.current_mark(),
        };
        let entry = table.by_alias(&alias).ok_or_else(unknown)?;
        let formatter = entry.formatter::<B>().ok_or_else(unknown)?;
        trace!(base = %table.base, variant = %entry.identity, %alias, "redirect deserialize");
        formatter.deserialize(parser, ctx)
    }
}
