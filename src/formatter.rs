//! The formatter contract and the per-type capabilities the registry relies on.

use std::any::TypeId;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::context::{DeserializationContext, SerializationContext};
use crate::emitter::Emitter;
use crate::error::{Error, Result};
use crate::parser::YamlParser;
use crate::type_identity::TypeIdentity;

/// Serialize/deserialize pair for one type.
///
/// Both operations start with the cursor on the node's first event and leave it
/// just past the node's last event.
pub trait Formatter<T>: Send + Sync {
    fn serialize(
        &self,
        emitter: &mut Emitter,
        value: &T,
        ctx: &mut SerializationContext<'_>,
    ) -> Result<()>;

    fn deserialize(
        &self,
        parser: &mut YamlParser<'_>,
        ctx: &mut DeserializationContext<'_>,
    ) -> Result<T>;
}

/// Root kind of a polymorphic family. Each kind has its own variant table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BaseKind {
    /// A pure capability trait.
    Interface,
    /// A trait with shared default behavior, standing in for an abstract class.
    Abstract,
}

/// How [`FormatterRegistry::get_with_verify`](crate::FormatterRegistry::get_with_verify)
/// resolves a type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeNature {
    /// Exact lookup only.
    Concrete,
    /// Built by [`YamlType::generic_formatter`] and memoized per instantiation.
    Generic,
    /// Dispatched by tag through the base's variant table.
    Polymorphic(BaseKind),
}

/// Per-type metadata used for formatter resolution.
pub trait YamlType: Sized + 'static {
    const NATURE: TypeNature = TypeNature::Concrete;

    fn type_identity() -> TypeIdentity {
        TypeIdentity::of::<Self>()
    }

    /// Factory for generic instantiations.
    fn generic_formatter() -> Option<Arc<dyn Formatter<Self>>> {
        None
    }

    /// `TypeId` of the value's concrete type. Polymorphic bases report the variant.
    fn runtime_type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }
}

/// A concrete type that can stand in for the polymorphic base `B`.
pub trait Variant<B>: Sized + 'static {
    fn upcast(self) -> B;
    fn downcast(base: &B) -> Option<&Self>;
}

/// Presents a concrete formatter as a formatter of its base.
pub(crate) struct VariantFormatter<C, B> {
    inner: Arc<dyn Formatter<C>>,
    _base: PhantomData<fn() -> B>,
}

impl<C, B> VariantFormatter<C, B> {
    pub(crate) fn new(inner: Arc<dyn Formatter<C>>) -> Self {
        Self {
            inner,
            _base: PhantomData,
        }
    }
}

impl<C, B> Formatter<B> for VariantFormatter<C, B>
where
    C: Variant<B>,
    B: YamlType,
{
    fn serialize(
        &self,
        emitter: &mut Emitter,
        value: &B,
        ctx: &mut SerializationContext<'_>,
    ) -> Result<()> {
        let concrete = C::downcast(value).ok_or_else(|| Error::UnregisteredVariant {
            base: B::type_identity().to_string(),
        })?;
        self.inner.serialize(emitter, concrete, ctx)
    }

    fn deserialize(
        &self,
        parser: &mut YamlParser<'_>,
        ctx: &mut DeserializationContext<'_>,
    ) -> Result<B> {
        self.inner.deserialize(parser, ctx).map(C::upcast)
    }
}
