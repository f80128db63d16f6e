//! Node tags and the YAML core-schema tags the engine understands.

use std::fmt;

pub(crate) const CORE_PREFIX: &str = "tag:yaml.org,2002:";
const SECONDARY_HANDLE: &str = "!!";
const PRIMARY_HANDLE: &str = "!";

pub(crate) const TAG_NULL: &str = "null";
pub(crate) const TAG_BOOL: &str = "bool";
pub(crate) const TAG_INT: &str = "int";
pub(crate) const TAG_FLOAT: &str = "float";
pub(crate) const TAG_STR: &str = "str";
pub(crate) const TAG_BINARY: &str = "binary";

const NON_STRING_SUFFIXES: &[&str] = &[
    TAG_INT,
    TAG_FLOAT,
    TAG_BOOL,
    TAG_NULL,
    "seq",
    "map",
    "timestamp",
];

/// A node tag split into handle and suffix.
///
/// The secondary handle `!!` is normalized to the canonical core-schema prefix so
/// `!!int` and `!<tag:yaml.org,2002:int>` compare equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tag {
    handle: String,
    suffix: String,
}

impl Tag {
    pub fn new(handle: impl Into<String>, suffix: impl Into<String>) -> Self {
        let handle = handle.into();
        let suffix = suffix.into();
        if handle == SECONDARY_HANDLE {
            return Self {
                handle: CORE_PREFIX.to_owned(),
                suffix,
            };
        }
        // Verbatim core tags may arrive unsplit.
        if handle.is_empty() {
            if let Some(rest) = suffix.strip_prefix(CORE_PREFIX) {
                return Self {
                    handle: CORE_PREFIX.to_owned(),
                    suffix: rest.to_owned(),
                };
            }
        }
        Self { handle, suffix }
    }

    /// A local tag `!suffix`, as written for polymorphic variants.
    pub fn local(suffix: impl Into<String>) -> Self {
        Self {
            handle: PRIMARY_HANDLE.to_owned(),
            suffix: suffix.into(),
        }
    }

    pub fn handle(&self) -> &str {
        &self.handle
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn is_local(&self) -> bool {
        self.handle == PRIMARY_HANDLE
    }

    /// True for `!!x` / `tag:yaml.org,2002:x`.
    pub fn is_core(&self) -> bool {
        self.handle == CORE_PREFIX
    }

    pub(crate) fn is_core_named(&self, name: &str) -> bool {
        self.is_core() && self.suffix == name
    }

    /// The key used by the polymorphic resolver: the suffix of a local tag, or the
    /// full tag text for anything else.
    pub fn alias(&self) -> String {
        if self.is_local() {
            self.suffix.clone()
        } else {
            format!("{}{}", self.handle, self.suffix)
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_local() {
            write!(f, "!{}", self.suffix)
        } else if self.is_core() {
            write!(f, "!!{}", self.suffix)
        } else {
            write!(f, "!<{}{}>", self.handle, self.suffix)
        }
    }
}

pub(crate) fn can_parse_into_string(tag: Option<&Tag>) -> bool {
    match tag {
        Some(t) if t.is_core() => !NON_STRING_SUFFIXES.contains(&t.suffix()),
        _ => true,
    }
}

pub(crate) fn is_null_tag(tag: Option<&Tag>) -> bool {
    tag.is_some_and(|t| t.is_core_named(TAG_NULL))
}

pub(crate) fn is_binary_tag(tag: Option<&Tag>) -> bool {
    tag.is_some_and(|t| t.is_core_named(TAG_BINARY))
}

/// Characters allowed in a `!suffix` shorthand without escaping.
pub(crate) fn is_tag_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~' | ':' | '/')
}
