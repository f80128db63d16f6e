//! The event vocabulary shared by the parser and the emitter.

use std::fmt;

/// Kind of the event the parser cursor is positioned at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParseEventType {
    /// Before the first `read()` or after the stream was exhausted.
    Nothing,
    StreamStart,
    StreamEnd,
    DocumentStart,
    DocumentEnd,
    /// A `*alias` reference; see [`YamlParser::current_anchor`](crate::YamlParser::current_anchor).
    Alias,
    Scalar,
    SequenceStart,
    SequenceEnd,
    MappingStart,
    MappingEnd,
}

impl ParseEventType {
    /// True for the events that open a node: scalar, alias, and collection starts.
    pub fn is_node_start(self) -> bool {
        matches!(
            self,
            ParseEventType::Scalar
                | ParseEventType::Alias
                | ParseEventType::SequenceStart
                | ParseEventType::MappingStart
        )
    }

    fn describe(self) -> &'static str {
        match self {
            ParseEventType::Nothing => "nothing",
            ParseEventType::StreamStart => "stream start",
            ParseEventType::StreamEnd => "stream end",
            ParseEventType::DocumentStart => "document start",
            ParseEventType::DocumentEnd => "document end",
            ParseEventType::Alias => "alias",
            ParseEventType::Scalar => "scalar",
            ParseEventType::SequenceStart => "sequence start",
            ParseEventType::SequenceEnd => "sequence end",
            ParseEventType::MappingStart => "mapping start",
            ParseEventType::MappingEnd => "mapping end",
        }
    }
}

impl fmt::Display for ParseEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Identity of an anchored node (`&name`), as numbered by the tokenizer.
///
/// Ids are assigned in document order starting at 1; the textual anchor name is not
/// preserved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Anchor(pub(crate) usize);

impl Anchor {
    pub fn id(&self) -> usize {
        self.0
    }

    /// saphyr reports "no anchor" as id 0.
    pub(crate) fn from_raw(id: usize) -> Option<Self> {
        (id != 0).then_some(Anchor(id))
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
