use url::Url;

use crate::context::{DeserializationContext, SerializationContext};
use crate::emitter::Emitter;
use crate::error::Result;
use crate::formatter::{Formatter, YamlType};
use crate::parser::YamlParser;

/// Absolute URLs only. The serialized form is the one `url` normalizes to.
pub(crate) struct UrlFormatter;

impl Formatter<Url> for UrlFormatter {
    fn serialize(&self, emitter: &mut Emitter, value: &Url, _ctx: &mut SerializationContext<'_>) -> Result<()> {
        emitter.write_string(value.as_str())
    }

    fn deserialize(&self, parser: &mut YamlParser<'_>, _ctx: &mut DeserializationContext<'_>) -> Result<Url> {
        parser.read_scalar_with("url", |text| Url::parse(text.trim()).ok())
    }
}

impl YamlType for Url {}
