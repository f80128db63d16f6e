//! Per-call state threaded through nested formatter invocations.

use tracing::trace;

use crate::emitter::Emitter;
use crate::error::Result;
use crate::formatter::YamlType;
use crate::parser::YamlParser;
use crate::registry::FormatterRegistry;
use crate::serializer_options::SerializerOptions;

/// Carries the registry through a deserialize call graph.
pub struct DeserializationContext<'r> {
    registry: &'r FormatterRegistry,
    depth: usize,
}

impl<'r> DeserializationContext<'r> {
    pub fn new(registry: &'r FormatterRegistry) -> Self {
        Self { registry, depth: 0 }
    }

    pub fn registry(&self) -> &'r FormatterRegistry {
        self.registry
    }

    /// Formatter nesting depth of the value being deserialized.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Deserialize the node at the cursor as `U`, resolving `U`'s formatter
    /// (concrete, generic or polymorphic) through the registry.
    pub fn deserialize_with_alias<U: YamlType>(&mut self, parser: &mut YamlParser<'_>) -> Result<U> {
        let formatter = self.registry.get_with_verify::<U>()?;
        trace!(ty = std::any::type_name::<U>(), depth = self.depth, "deserialize");
        self.depth += 1;
        let result = formatter.deserialize(parser, self);
        self.depth -= 1;
        result.map_err(|e| e.with_location(parser.current_mark()))
    }
}

/// Carries the registry and serializer options through a serialize call graph.
pub struct SerializationContext<'r> {
    registry: &'r FormatterRegistry,
    options: SerializerOptions,
    depth: usize,
}

impl<'r> SerializationContext<'r> {
    pub fn new(registry: &'r FormatterRegistry, options: SerializerOptions) -> Self {
        Self {
            registry,
            options,
            depth: 0,
        }
    }

    pub fn registry(&self) -> &'r FormatterRegistry {
        self.registry
    }

    pub fn options(&self) -> &SerializerOptions {
        &self.options
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Serialize `value` with the formatter the registry resolves for `U`.
    pub fn serialize_with_alias<U: YamlType>(&mut self, emitter: &mut Emitter, value: &U) -> Result<()> {
        let formatter = self.registry.get_with_verify::<U>()?;
        trace!(ty = std::any::type_name::<U>(), depth = self.depth, "serialize");
        self.depth += 1;
        let result = formatter.serialize(emitter, value, self);
        self.depth -= 1;
        result
    }
}
