//! Serializer options for YAML emission.
//!
//! ```rust
//! let opts = nex_yaml::serializer_options! {
//!     indent_step: 4,
//!     quote_all: true,
//! };
//! let yaml = nex_yaml::to_string_with_options(&vec![1, 2], opts).unwrap();
//! assert_eq!(yaml, "- 1\n- 2\n");
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Serializer options for YAML emission.
///
/// Construct `SerializerOptions` using the [`serializer_options!`](crate::serializer_options!)
/// macro to stay compatible with fields added later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializerOptions {
    /// Number of spaces to indent per nesting level (2 by default). Zero is rejected.
    pub indent_step: usize,
    /// Quote all string scalars. Single quotes unless the string needs escapes.
    /// Off by default.
    pub quote_all: bool,
    /// Begin the document with an explicit `---` marker. Off by default.
    pub explicit_document_start: bool,
}

impl SerializerOptions {
    pub(crate) fn consistent(&self) -> Result<()> {
        if self.indent_step == 0 {
            return Err(Error::msg("Invalid indent step must be positive"));
        }
        Ok(())
    }
}

impl Default for SerializerOptions {
    fn default() -> Self {
        Self {
            indent_step: 2,
            quote_all: false,
            explicit_document_start: false,
        }
    }
}
