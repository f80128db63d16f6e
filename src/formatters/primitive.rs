use crate::context::{DeserializationContext, SerializationContext};
use crate::emitter::Emitter;
use crate::error::Result;
use crate::formatter::{Formatter, YamlType};
use crate::parser::YamlParser;
use crate::registry::FormatterRegistry;

macro_rules! integer_formatters {
    ($( $name:ident: $ty:ty => $write:ident as $wide:ty, $read:ident; )*) => {
        $(
            pub(crate) struct $name;

            impl Formatter<$ty> for $name {
                fn serialize(
                    &self,
                    emitter: &mut Emitter,
                    value: &$ty,
                    _ctx: &mut SerializationContext<'_>,
                ) -> Result<()> {
                    emitter.$write(*value as $wide)
                }

                fn deserialize(
                    &self,
                    parser: &mut YamlParser<'_>,
                    _ctx: &mut DeserializationContext<'_>,
                ) -> Result<$ty> {
                    parser.$read::<$ty>(stringify!($ty))
                }
            }

            impl YamlType for $ty {}
        )*

        fn register_integers(registry: &mut FormatterRegistry) {
            $( registry.register::<$ty>($name); )*
        }
    };
}

integer_formatters! {
    I8Formatter: i8 => write_i64 as i64, read_scalar_as_signed;
    I16Formatter: i16 => write_i64 as i64, read_scalar_as_signed;
    I32Formatter: i32 => write_i64 as i64, read_scalar_as_signed;
    I64Formatter: i64 => write_i64 as i64, read_scalar_as_signed;
    IsizeFormatter: isize => write_i64 as i64, read_scalar_as_signed;
    U8Formatter: u8 => write_u64 as u64, read_scalar_as_unsigned;
    U16Formatter: u16 => write_u64 as u64, read_scalar_as_unsigned;
    U32Formatter: u32 => write_u64 as u64, read_scalar_as_unsigned;
    U64Formatter: u64 => write_u64 as u64, read_scalar_as_unsigned;
    UsizeFormatter: usize => write_u64 as u64, read_scalar_as_unsigned;
}

pub(crate) struct BoolFormatter;

impl Formatter<bool> for BoolFormatter {
    fn serialize(&self, emitter: &mut Emitter, value: &bool, _ctx: &mut SerializationContext<'_>) -> Result<()> {
        emitter.write_bool(*value)
    }

    fn deserialize(&self, parser: &mut YamlParser<'_>, _ctx: &mut DeserializationContext<'_>) -> Result<bool> {
        parser.read_scalar_as_bool()
    }
}

pub(crate) struct F32Formatter;

impl Formatter<f32> for F32Formatter {
    fn serialize(&self, emitter: &mut Emitter, value: &f32, _ctx: &mut SerializationContext<'_>) -> Result<()> {
        emitter.write_f32(*value)
    }

    fn deserialize(&self, parser: &mut YamlParser<'_>, _ctx: &mut DeserializationContext<'_>) -> Result<f32> {
        parser.read_scalar_as_f32()
    }
}

pub(crate) struct F64Formatter;

impl Formatter<f64> for F64Formatter {
    fn serialize(&self, emitter: &mut Emitter, value: &f64, _ctx: &mut SerializationContext<'_>) -> Result<()> {
        emitter.write_f64(*value)
    }

    fn deserialize(&self, parser: &mut YamlParser<'_>, _ctx: &mut DeserializationContext<'_>) -> Result<f64> {
        parser.read_scalar_as_f64()
    }
}

pub(crate) struct StringFormatter;

impl Formatter<String> for StringFormatter {
    fn serialize(&self, emitter: &mut Emitter, value: &String, _ctx: &mut SerializationContext<'_>) -> Result<()> {
        emitter.write_string(value)
    }

    fn deserialize(&self, parser: &mut YamlParser<'_>, _ctx: &mut DeserializationContext<'_>) -> Result<String> {
        parser.read_scalar_as_string()
    }
}

/// A string scalar holding exactly one character.
pub(crate) struct CharFormatter;

impl Formatter<char> for CharFormatter {
    fn serialize(&self, emitter: &mut Emitter, value: &char, _ctx: &mut SerializationContext<'_>) -> Result<()> {
        let mut buf = [0u8; 4];
        emitter.write_string(value.encode_utf8(&mut buf))
    }

    fn deserialize(&self, parser: &mut YamlParser<'_>, _ctx: &mut DeserializationContext<'_>) -> Result<char> {
        let single = {
            let mut chars = parser.get_scalar_as_string()?.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(c),
                _ => None,
            }
        };
        match (single, parser.current_scalar()) {
            (Some(c), _) => {
                parser.read()?;
                Ok(c)
            }
            (None, Some(scalar)) => Err(parser.coercion_error("char", scalar)),
            (None, None) => Err(parser.unexpected("scalar")),
        }
    }
}

/// `()` is written as, and read from, a null scalar.
pub(crate) struct UnitFormatter;

impl Formatter<()> for UnitFormatter {
    fn serialize(&self, emitter: &mut Emitter, _value: &(), _ctx: &mut SerializationContext<'_>) -> Result<()> {
        emitter.write_null()
    }

    fn deserialize(&self, parser: &mut YamlParser<'_>, _ctx: &mut DeserializationContext<'_>) -> Result<()> {
        if parser.is_null_scalar() {
            parser.read()?;
            return Ok(());
        }
        Err(match parser.current_scalar() {
            Some(scalar) => parser.coercion_error("null", scalar),
            None => parser.unexpected("null"),
        })
    }
}

impl YamlType for bool {}
impl YamlType for f32 {}
impl YamlType for f64 {}
impl YamlType for String {}
impl YamlType for char {}
impl YamlType for () {}

pub(super) fn register(registry: &mut FormatterRegistry) {
    register_integers(registry);
    registry.register::<bool>(BoolFormatter);
    registry.register::<f32>(F32Formatter);
    registry.register::<f64>(F64Formatter);
    registry.register::<String>(StringFormatter);
    registry.register::<char>(CharFormatter);
    registry.register::<()>(UnitFormatter);
}
