use uuid::Uuid;

use crate::context::{DeserializationContext, SerializationContext};
use crate::emitter::Emitter;
use crate::error::Result;
use crate::formatter::{Formatter, YamlType};
use crate::parser::YamlParser;

/// Hyphenated lowercase on output. Any form `uuid` parses is accepted on input.
pub(crate) struct UuidFormatter;

impl Formatter<Uuid> for UuidFormatter {
    fn serialize(&self, emitter: &mut Emitter, value: &Uuid, _ctx: &mut SerializationContext<'_>) -> Result<()> {
        emitter.write_string(&value.hyphenated().to_string())
    }

    fn deserialize(&self, parser: &mut YamlParser<'_>, _ctx: &mut DeserializationContext<'_>) -> Result<Uuid> {
        parser.read_scalar_with("uuid", |text| Uuid::parse_str(text.trim()).ok())
    }
}

impl YamlType for Uuid {}
