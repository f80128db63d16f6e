//! Type-to-formatter table.
//!
//! The registry maps a type to the [`Formatter`] that (de)serializes it. It holds
//! three kinds of entries:
//!
//! - explicitly registered formatters, keyed by the exact `TypeId`;
//! - memoized generic instantiations, built on first use from
//!   [`YamlType::generic_formatter`];
//! - variant tables for polymorphic bases, one table set per [`BaseKind`].
//!
//! Registration takes `&mut self` and happens before the registry is shared.
//! Lookups take `&self`; only the generic cache is written to after that, behind
//! a lock.
//!
//! ## auto_register
//!
//! With the `auto_register` feature, functions submitted through
//! [`submit_registration!`](crate::submit_registration) are collected with the
//! [`inventory`] crate and run by [`FormatterRegistry::auto_register`].

use std::any::{Any, TypeId};
use std::sync::{Arc, OnceLock};

use ahash::AHashMap;
use parking_lot::RwLock;
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::formatter::{BaseKind, Formatter, TypeNature, Variant, VariantFormatter, YamlType};
use crate::resolver::RedirectFormatter;
use crate::tags::is_tag_char;
use crate::type_identity::TypeIdentity;

/// `Arc<dyn Formatter<T>>` with `T` erased.
type ErasedFormatter = Arc<dyn Any + Send + Sync>;

fn erase<T: 'static>(formatter: Arc<dyn Formatter<T>>) -> ErasedFormatter {
    Arc::new(formatter)
}

fn unerase<T: 'static>(erased: &ErasedFormatter) -> Option<Arc<dyn Formatter<T>>> {
    erased.downcast_ref::<Arc<dyn Formatter<T>>>().cloned()
}

/// One concrete type registered under a polymorphic base.
#[derive(Clone)]
pub(crate) struct VariantEntry {
    pub(crate) alias: String,
    pub(crate) identity: TypeIdentity,
    /// `Arc<dyn Formatter<B>>` for the base `B`.
    formatter: ErasedFormatter,
}

impl VariantEntry {
    pub(crate) fn formatter<B: 'static>(&self) -> Option<Arc<dyn Formatter<B>>> {
        unerase::<B>(&self.formatter)
    }
}

/// Variants of one polymorphic base.
pub(crate) struct VariantTable {
    pub(crate) base: TypeIdentity,
    by_type: AHashMap<TypeId, VariantEntry>,
    by_alias: AHashMap<String, TypeId>,
}

impl VariantTable {
    fn new(base: TypeIdentity) -> Self {
        Self {
            base,
            by_type: AHashMap::new(),
            by_alias: AHashMap::new(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.by_type.len()
    }

    pub(crate) fn by_type(&self, concrete: TypeId) -> Option<&VariantEntry> {
        self.by_type.get(&concrete)
    }

    pub(crate) fn by_alias(&self, alias: &str) -> Option<&VariantEntry> {
        self.by_alias.get(alias).and_then(|id| self.by_type.get(id))
    }

    /// Last writer wins for both the concrete type and the alias.
    fn insert(&mut self, concrete: TypeId, entry: VariantEntry) {
        if let Some(old) = self.by_type.remove(&concrete) {
            self.by_alias.remove(&old.alias);
        }
        if let Some(stale) = self.by_alias.insert(entry.alias.clone(), concrete) {
            if stale != concrete {
                if let Some(dropped) = self.by_type.remove(&stale) {
                    debug!(
                        base = %self.base,
                        alias = %entry.alias,
                        dropped = %dropped.identity,
                        "alias collision, earlier variant replaced"
                    );
                }
            }
        }
        self.by_type.insert(concrete, entry);
    }
}

/// A registration hook collected by [`FormatterRegistry::auto_register`].
#[doc(hidden)]
pub struct Registration {
    register: fn(&mut FormatterRegistry) -> Result<()>,
}

impl Registration {
    pub const fn new(register: fn(&mut FormatterRegistry) -> Result<()>) -> Self {
        Self { register }
    }
}

#[cfg(feature = "auto_register")]
inventory::collect!(Registration);

/// Maps types to their formatters.
pub struct FormatterRegistry {
    defined: AHashMap<TypeId, ErasedFormatter>,
    generic_cache: RwLock<AHashMap<TypeId, ErasedFormatter>>,
    interfaces: AHashMap<TypeId, VariantTable>,
    abstract_classes: AHashMap<TypeId, VariantTable>,
}

impl Default for FormatterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatterRegistry {
    /// A registry with no formatters at all.
    pub fn empty() -> Self {
        Self {
            defined: AHashMap::new(),
            generic_cache: RwLock::new(AHashMap::new()),
            interfaces: AHashMap::new(),
            abstract_classes: AHashMap::new(),
        }
    }

    /// A registry with the built-in primitive formatters.
    ///
    /// Generic containers (`Option`, `Vec`, maps, sets) need no registration.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        crate::formatters::register_builtins(&mut registry);
        registry
    }

    /// The process-wide default: built-ins plus every auto registration.
    pub fn global() -> &'static FormatterRegistry {
        static GLOBAL: OnceLock<FormatterRegistry> = OnceLock::new();
        GLOBAL.get_or_init(|| {
            let mut registry = Self::new();
            if let Err(err) = registry.auto_register() {
                warn!(%err, "auto registration failed");
            }
            registry
        })
    }

    /// Insert or overwrite the formatter for `T`.
    pub fn register<T: 'static>(&mut self, formatter: impl Formatter<T> + 'static) {
        self.register_arc::<T>(Arc::new(formatter));
    }

    pub fn register_arc<T: 'static>(&mut self, formatter: Arc<dyn Formatter<T>>) {
        let replaced = self.defined.insert(TypeId::of::<T>(), erase(formatter));
        if replaced.is_some() {
            debug!(ty = std::any::type_name::<T>(), "formatter replaced");
        } else {
            trace!(ty = std::any::type_name::<T>(), "formatter registered");
        }
    }

    /// Exact lookup of an explicitly registered formatter.
    pub fn get<T: 'static>(&self) -> Option<Arc<dyn Formatter<T>>> {
        self.defined.get(&TypeId::of::<T>()).and_then(unerase::<T>)
    }

    /// True if `T` has an explicitly registered formatter.
    pub fn contains<T: 'static>(&self) -> bool {
        self.defined.contains_key(&TypeId::of::<T>())
    }

    /// Resolve the formatter for `T` by its [`TypeNature`].
    pub fn get_with_verify<T: YamlType>(&self) -> Result<Arc<dyn Formatter<T>>> {
        let found = match T::NATURE {
            TypeNature::Polymorphic(kind) => {
                Some(Arc::new(RedirectFormatter::<T>::new(kind)) as Arc<dyn Formatter<T>>)
            }
            TypeNature::Generic => self.get::<T>().or_else(|| self.generic::<T>()),
            TypeNature::Concrete => self.get::<T>(),
        };
        found.ok_or_else(|| Error::FormatterNotFound {
            type_name: T::type_identity().to_string(),
            resolver: "FormatterRegistry",
        })
    }

    fn generic<T: YamlType>(&self) -> Option<Arc<dyn Formatter<T>>> {
        let key = TypeId::of::<T>();
        if let Some(hit) = self.generic_cache.read().get(&key).and_then(unerase::<T>) {
            return Some(hit);
        }
        let built = T::generic_formatter()?;
        let mut cache = self.generic_cache.write();
        let entry = cache.entry(key).or_insert_with(|| {
            trace!(definition = %T::type_identity().definition(), ty = std::any::type_name::<T>(), "generic formatter memoized");
            erase(built)
        });
        unerase::<T>(entry)
    }

    /// Number of memoized generic instantiations.
    pub fn generic_instantiations(&self) -> usize {
        self.generic_cache.read().len()
    }

    /// Register `C` as a variant of the polymorphic base `B` under `C`'s default
    /// alias. `C`'s own formatter is registered as well.
    pub fn register_variant<C, B>(&mut self, formatter: impl Formatter<C> + 'static) -> Result<()>
    where
        C: Variant<B> + YamlType,
        B: YamlType,
    {
        let alias = C::type_identity().alias();
        self.register_variant_with_alias::<C, B>(alias, formatter)
    }

    /// Register `C` as a variant of `B` under an explicit alias. The alias is
    /// written as a local tag, so it must be non-empty and made of tag characters.
    pub fn register_variant_with_alias<C, B>(
        &mut self,
        alias: impl Into<String>,
        formatter: impl Formatter<C> + 'static,
    ) -> Result<()>
    where
        C: Variant<B> + YamlType,
        B: YamlType,
    {
        let TypeNature::Polymorphic(kind) = B::NATURE else {
            return Err(Error::NotPolymorphic {
                type_name: B::type_identity().to_string(),
            });
        };
        let alias = alias.into();
        if alias.is_empty() || !alias.chars().all(is_tag_char) {
            return Err(Error::InvalidAlias {
                base: B::type_identity().to_string(),
                alias,
            });
        }
        let concrete: Arc<dyn Formatter<C>> = Arc::new(formatter);
        self.register_arc::<C>(concrete.clone());

        let identity = C::type_identity();
        debug!(base = std::any::type_name::<B>(), variant = %identity, %alias, ?kind, "variant registered");
        let as_base: Arc<dyn Formatter<B>> = Arc::new(VariantFormatter::<C, B>::new(concrete));
        let table = self
            .tables_mut(kind)
            .entry(TypeId::of::<B>())
            .or_insert_with(|| VariantTable::new(B::type_identity()));
        table.insert(
            TypeId::of::<C>(),
            VariantEntry {
                alias,
                identity,
                formatter: erase(as_base),
            },
        );
        Ok(())
    }

    /// Number of variants registered for `B`, looked up in `B`'s own table.
    pub fn variant_count<B: YamlType>(&self) -> usize {
        match B::NATURE {
            TypeNature::Polymorphic(kind) => self
                .variant_table(TypeId::of::<B>(), kind)
                .map_or(0, VariantTable::len),
            _ => 0,
        }
    }

    pub(crate) fn variant_table(&self, base: TypeId, kind: BaseKind) -> Option<&VariantTable> {
        match kind {
            BaseKind::Interface => self.interfaces.get(&base),
            BaseKind::Abstract => self.abstract_classes.get(&base),
        }
    }

    fn tables_mut(&mut self, kind: BaseKind) -> &mut AHashMap<TypeId, VariantTable> {
        match kind {
            BaseKind::Interface => &mut self.interfaces,
            BaseKind::Abstract => &mut self.abstract_classes,
        }
    }

    /// Run every registration submitted with [`submit_registration!`](crate::submit_registration).
    ///
    /// Without the `auto_register` feature this does nothing.
    pub fn auto_register(&mut self) -> Result<()> {
        #[cfg(feature = "auto_register")]
        for registration in inventory::iter::<Registration> {
            (registration.register)(self)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_registered() {
        let registry = FormatterRegistry::new();
        assert!(registry.get::<i32>().is_some());
        assert!(registry.get::<String>().is_some());
        assert!(registry.get::<Vec<i32>>().is_none());
        assert!(FormatterRegistry::empty().get::<i32>().is_none());
    }

    #[test]
    fn generic_instantiations_are_memoized() {
        let registry = FormatterRegistry::new();
        let first = registry.get_with_verify::<Vec<i32>>().unwrap();
        let second = registry.get_with_verify::<Vec<i32>>().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        registry.get_with_verify::<Vec<String>>().unwrap();
        assert_eq!(registry.generic_instantiations(), 2);
    }

    #[test]
    fn missing_formatter_names_type_and_resolver() {
        let registry = FormatterRegistry::empty();
        let err = registry.get_with_verify::<i32>().err().unwrap();
        assert_eq!(err.to_string(), "i32 is not registered in resolver: FormatterRegistry");
    }
}
