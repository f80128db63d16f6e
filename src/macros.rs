//! Public macros for building option structs and for declaring formatters,
//! polymorphic bases and their variants without hand-writing the trait impls.

/// Construct [`crate::Options`] from `Default` and a list of field assignments.
///
/// ```rust
/// let options = nex_yaml::options! {
///     replay_aliases: true,
///     strict_booleans: true,
/// };
/// assert!(options.replay_aliases);
/// ```
#[macro_export]
macro_rules! options {
    ( $( $field:ident : $value:expr ),* $(,)? ) => {{
        let mut opt = $crate::Options::default();
        $(
            opt.$field = $value;
        )*
        opt
    }};
}

/// Construct [`crate::SerializerOptions`] from `Default` and a list of field assignments.
///
/// ```rust
/// let opts = nex_yaml::serializer_options! {
///     indent_step: 4,
///     quote_all: true,
/// };
/// assert_eq!(opts.indent_step, 4);
/// ```
#[macro_export]
macro_rules! serializer_options {
    ( $( $field:ident : $value:expr ),* $(,)? ) => {{
        let mut opt = $crate::SerializerOptions::default();
        $(
            opt.$field = $value;
        )*
        opt
    }};
}

/// Construct `Some(`[`crate::Budget`]`)` from `Default` and a list of field
/// assignments, ready for the `budget` field of [`crate::Options`].
///
/// ```rust
/// let budget = nex_yaml::budget! { max_depth: 16 };
/// assert_eq!(budget.map(|b| b.max_depth), Some(16));
/// ```
#[macro_export]
macro_rules! budget {
    ( $( $field:ident : $value:expr ),* $(,)? ) => {{
        let mut budget = $crate::Budget::default();
        $(
            budget.$field = $value;
        )*
        ::std::option::Option::Some(budget)
    }};
}

/// Declare `Box<dyn Trait>` as a polymorphic base resolved through tags.
///
/// The trait must have [`Any`](std::any::Any) as a supertrait so the concrete
/// type can be recovered at runtime. The second argument picks the variant
/// table: `Interface` or `Abstract`.
///
/// ```rust
/// use std::any::Any;
///
/// trait Shape: Any + Send + Sync {
///     fn area(&self) -> f64;
/// }
///
/// nex_yaml::polymorphic_base!(dyn Shape, Interface);
///
/// assert!(matches!(
///     <Box<dyn Shape> as nex_yaml::YamlType>::NATURE,
///     nex_yaml::TypeNature::Polymorphic(nex_yaml::BaseKind::Interface)
/// ));
/// ```
#[macro_export]
macro_rules! polymorphic_base {
    (dyn $base:path, $kind:ident) => {
        impl $crate::YamlType for ::std::boxed::Box<dyn $base> {
            const NATURE: $crate::TypeNature =
                $crate::TypeNature::Polymorphic($crate::BaseKind::$kind);

            fn type_identity() -> $crate::TypeIdentity {
                $crate::TypeIdentity::parse(::std::any::type_name::<dyn $base>())
            }

            fn runtime_type_id(&self) -> ::std::any::TypeId {
                let any: &dyn ::std::any::Any = &**self;
                any.type_id()
            }
        }
    };
}

/// Implement [`Variant`](crate::Variant) so a concrete type can stand in for a
/// base declared with [`polymorphic_base!`](crate::polymorphic_base).
#[macro_export]
macro_rules! yaml_variant {
    ($concrete:ty => $base:ty) => {
        impl $crate::Variant<$base> for $concrete {
            fn upcast(self) -> $base {
                ::std::boxed::Box::new(self)
            }

            fn downcast(base: &$base) -> ::std::option::Option<&Self> {
                let any: &dyn ::std::any::Any = &**base;
                any.downcast_ref::<Self>()
            }
        }
    };
}

/// Declare a mapping formatter for a struct with named fields.
///
/// Each listed field is written under its own name, in the order given.
/// Reading starts from `Default::default()`: absent keys keep their default,
/// unknown keys are skipped, and a null scalar yields the default value.
/// The struct also gets a concrete [`YamlType`](crate::YamlType) impl.
///
/// ```rust
/// #[derive(Debug, Default, PartialEq)]
/// struct Dog {
///     name: String,
///     age: u32,
/// }
///
/// nex_yaml::yaml_object! {
///     struct DogFormatter for Dog { name, age }
/// }
///
/// let mut registry = nex_yaml::FormatterRegistry::new();
/// registry.register::<Dog>(DogFormatter);
///
/// let dog: Dog = nex_yaml::from_str_with_registry("name: Rex\nage: 3\nowner: Sam\n", &registry).unwrap();
/// assert_eq!(dog, Dog { name: "Rex".into(), age: 3 });
/// ```
#[macro_export]
macro_rules! yaml_object {
    ($vis:vis struct $formatter:ident for $ty:ty { $( $field:ident ),* $(,)? }) => {
        $vis struct $formatter;

        impl $crate::YamlType for $ty {}

        impl $crate::Formatter<$ty> for $formatter {
            fn serialize(
                &self,
                emitter: &mut $crate::Emitter,
                value: &$ty,
                ctx: &mut $crate::SerializationContext<'_>,
            ) -> $crate::Result<()> {
                emitter.begin_mapping()?;
                $(
                    emitter.write_string(stringify!($field))?;
                    ctx.serialize_with_alias(emitter, &value.$field)?;
                )*
                emitter.end_mapping()
            }

            fn deserialize(
                &self,
                parser: &mut $crate::YamlParser<'_>,
                ctx: &mut $crate::DeserializationContext<'_>,
            ) -> $crate::Result<$ty> {
                let mut value = <$ty as ::std::default::Default>::default();
                if parser.is_null_scalar() {
                    parser.read()?;
                    return Ok(value);
                }
                parser.read_with_verify($crate::ParseEventType::MappingStart)?;
                while parser.current_event_type() != $crate::ParseEventType::MappingEnd {
                    $(
                        if parser
                            .current_scalar()
                            .is_some_and(|key| key.equals(stringify!($field).as_bytes()))
                        {
                            parser.read()?;
                            value.$field = ctx.deserialize_with_alias(parser)?;
                            continue;
                        }
                    )*
                    $crate::__private::skip_unknown_entry::<$ty>(parser)?;
                }
                parser.read_with_verify($crate::ParseEventType::MappingEnd)?;
                Ok(value)
            }
        }
    };
}

/// Submit a registration function to be run by
/// [`FormatterRegistry::auto_register`](crate::FormatterRegistry::auto_register).
///
/// ```rust
/// fn register_nothing(_: &mut nex_yaml::FormatterRegistry) -> nex_yaml::Result<()> {
///     Ok(())
/// }
///
/// nex_yaml::submit_registration!(register_nothing);
/// ```
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! submit_registration {
    ($register:expr) => {
        $crate::__private::inventory::submit! {
            $crate::Registration::new($register)
        }
    };
}

/// Without `auto_register` submissions are accepted and never run.
#[cfg(not(feature = "auto_register"))]
#[macro_export]
macro_rules! submit_registration {
    ($register:expr) => {
        const _: fn(&mut $crate::FormatterRegistry) -> $crate::Result<()> = $register;
    };
}
