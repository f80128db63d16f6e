//! The scalar under the parser cursor and its typed views.

use std::borrow::Cow;

use saphyr_parser::ScalarStyle;

use crate::parse_scalars::{
    parse_int_signed, parse_int_unsigned, parse_yaml11_bool, parse_yaml12_bool, parse_yaml12_f32,
    parse_yaml12_f64,
};
use crate::tags::{self, Tag};

/// Presentation style of a scalar in the source text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Plain,
    SingleQuoted,
    DoubleQuoted,
    Literal,
    Folded,
}

impl From<ScalarStyle> for ScalarKind {
    fn from(style: ScalarStyle) -> Self {
        match style {
            ScalarStyle::Plain => ScalarKind::Plain,
            ScalarStyle::SingleQuoted => ScalarKind::SingleQuoted,
            ScalarStyle::DoubleQuoted => ScalarKind::DoubleQuoted,
            ScalarStyle::Literal => ScalarKind::Literal,
            ScalarStyle::Folded => ScalarKind::Folded,
        }
    }
}

/// Coercion switches taken from [`Options`](crate::Options).
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct ScalarRules {
    pub legacy_octal: bool,
    pub strict_booleans: bool,
}

/// A scalar value as delivered by the tokenizer.
///
/// Plain scalars without escapes borrow directly from the input; quoted or folded
/// scalars that needed unescaping own their text. Either way the view stays valid
/// until the parser moves past the scalar.
#[derive(Clone, Debug)]
pub struct ScalarValue<'a> {
    text: Cow<'a, str>,
    kind: ScalarKind,
    is_null: bool,
}

fn is_null_literal(s: &str) -> bool {
    matches!(s, "" | "~" | "null" | "Null" | "NULL")
}

impl<'a> ScalarValue<'a> {
    /// Classification of null happens once, at construction.
    ///
    /// Only plain scalars spell null; `!!null` forces it and `!!str` suppresses it.
    pub(crate) fn new(text: Cow<'a, str>, kind: ScalarKind, tag: Option<&Tag>) -> Self {
        let is_null = if tags::is_null_tag(tag) {
            true
        } else if tag.is_some_and(|t| t.is_core_named(tags::TAG_STR)) {
            false
        } else {
            kind == ScalarKind::Plain && is_null_literal(&text)
        };
        Self {
            text,
            kind,
            is_null,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    /// The text, borrowed from the input when the tokenizer did not need to rewrite it.
    pub fn as_cow(&self) -> &Cow<'a, str> {
        &self.text
    }

    pub fn into_cow(self) -> Cow<'a, str> {
        self.text
    }

    /// Detach from the input buffer.
    pub fn into_owned(self) -> ScalarValue<'static> {
        ScalarValue {
            text: Cow::Owned(self.text.into_owned()),
            kind: self.kind,
            is_null: self.is_null,
        }
    }

    pub fn kind(&self) -> ScalarKind {
        self.kind
    }

    pub fn is_quoted(&self) -> bool {
        matches!(self.kind, ScalarKind::SingleQuoted | ScalarKind::DoubleQuoted)
    }

    pub fn is_null(&self) -> bool {
        self.is_null
    }

    /// Byte-wise comparison, used for mapping key matching.
    pub fn equals(&self, key: &[u8]) -> bool {
        self.text.as_bytes() == key
    }

    pub fn try_get_string(&self) -> Option<&str> {
        (!self.is_null).then(|| self.as_str())
    }

    /// Boolean view under the default rules (YAML 1.1 forms accepted).
    pub fn try_get_bool(&self) -> Option<bool> {
        self.bool_with(ScalarRules::default())
    }

    pub fn try_get_i32(&self) -> Option<i32> {
        self.signed_with(ScalarRules::default())
    }

    pub fn try_get_i64(&self) -> Option<i64> {
        self.signed_with(ScalarRules::default())
    }

    pub fn try_get_u32(&self) -> Option<u32> {
        self.unsigned_with(ScalarRules::default())
    }

    pub fn try_get_u64(&self) -> Option<u64> {
        self.unsigned_with(ScalarRules::default())
    }

    pub fn try_get_f32(&self) -> Option<f32> {
        parse_yaml12_f32(&self.text)
    }

    pub fn try_get_f64(&self) -> Option<f64> {
        parse_yaml12_f64(&self.text)
    }

    pub(crate) fn bool_with(&self, rules: ScalarRules) -> Option<bool> {
        if rules.strict_booleans {
            parse_yaml12_bool(&self.text)
        } else {
            parse_yaml11_bool(&self.text)
        }
    }

    pub(crate) fn signed_with<T: TryFrom<i128>>(&self, rules: ScalarRules) -> Option<T> {
        parse_int_signed(&self.text, rules.legacy_octal)
    }

    pub(crate) fn unsigned_with<T: TryFrom<u128>>(&self, rules: ScalarRules) -> Option<T> {
        parse_int_unsigned(&self.text, rules.legacy_octal)
    }
}
