use base64::{Engine as _, engine::general_purpose::STANDARD as B64};

use crate::context::{DeserializationContext, SerializationContext};
use crate::emitter::Emitter;
use crate::error::Result;
use crate::formatter::{Formatter, YamlType};
use crate::parser::YamlParser;
use crate::tags::{self, TAG_BINARY, Tag};

/// Raw bytes, written as a base64 `!!binary` scalar.
///
/// Reading also accepts an untagged or `!!str` base64 string.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Binary(pub Vec<u8>);

impl From<Vec<u8>> for Binary {
    fn from(bytes: Vec<u8>) -> Self {
        Binary(bytes)
    }
}

impl AsRef<[u8]> for Binary {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl YamlType for Binary {}

pub(crate) struct BinaryFormatter;

impl Formatter<Binary> for BinaryFormatter {
    fn serialize(
        &self,
        emitter: &mut Emitter,
        value: &Binary,
        _ctx: &mut SerializationContext<'_>,
    ) -> Result<()> {
        emitter.tag(&Tag::new("!!", TAG_BINARY));
        emitter.write_string(&B64.encode(&value.0))
    }

    fn deserialize(
        &self,
        parser: &mut YamlParser<'_>,
        _ctx: &mut DeserializationContext<'_>,
    ) -> Result<Binary> {
        let expected = if tags::is_binary_tag(parser.current_tag()) {
            "!!binary"
        } else {
            "base64 binary"
        };
        parser
            .read_scalar_with(expected, |text| {
                // YAML allows line breaks and spaces inside the base64 text.
                let cleaned: Vec<u8> = text.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
                B64.decode(cleaned).ok()
            })
            .map(Binary)
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;
    use crate::event::ParseEventType;
    use crate::registry::FormatterRegistry;
    use crate::serializer_options::SerializerOptions;

    fn read(input: &str) -> Result<Binary> {
        let registry = FormatterRegistry::new();
        let mut ctx = DeserializationContext::new(&registry);
        let mut parser = YamlParser::new(input);
        parser.skip_after(ParseEventType::DocumentStart)?;
        ctx.deserialize_with_alias::<Binary>(&mut parser)
    }

    #[test]
    fn folded_base64_is_decoded() {
        let yaml = indoc! {"
            !!binary |
              aGVs
              bG8=
        "};
        assert_eq!(read(yaml).unwrap().0, b"hello");
    }

    #[test]
    fn invalid_base64_is_a_coercion_error() {
        let err = read("!!binary '@@@'").unwrap_err();
        assert!(err.to_string().contains("!!binary"), "{err}");
    }

    #[test]
    fn written_with_binary_tag() {
        let registry = FormatterRegistry::new();
        let mut ctx = SerializationContext::new(&registry, SerializerOptions::default());
        let mut emitter = Emitter::new(SerializerOptions::default());
        ctx.serialize_with_alias(&mut emitter, &Binary(b"hi".to_vec())).unwrap();
        assert_eq!(emitter.finish().unwrap(), "!!binary aGk=\n");
    }
}
