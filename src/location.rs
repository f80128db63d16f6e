//! Source location utilities.

use std::fmt;

use saphyr_parser::{ScanError, Span};

/// Row/column location within the source YAML document.
///
/// `line` and `column` are 1-indexed; `index` is the 0-indexed character offset
/// reported by the tokenizer. A zeroed location means "unknown".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Location {
    pub(crate) line: u32,
    pub(crate) column: u32,
    pub(crate) index: u32,
}

impl Location {
    /// Sentinel value meaning "location unknown".
    pub const UNKNOWN: Self = Self {
        line: 0,
        column: 0,
        index: 0,
    };

    pub(crate) const fn new(line: usize, column: usize, index: usize) -> Self {
        // Error reporting only; documents beyond 4 GiB saturate.
        Self {
            line: saturate(line),
            column: saturate(column),
            index: saturate(index),
        }
    }

    /// 1-indexed line.
    pub fn line(&self) -> u64 {
        self.line as u64
    }

    /// 1-indexed column.
    pub fn column(&self) -> u64 {
        self.column as u64
    }

    /// 0-indexed character offset.
    pub fn index(&self) -> u64 {
        self.index as u64
    }

    pub fn is_known(&self) -> bool {
        self.line != 0 && self.column != 0
    }
}

const fn saturate(v: usize) -> u32 {
    if v > u32::MAX as usize {
        u32::MAX
    } else {
        v as u32
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_known() {
            write!(f, "line {}, column {}", self.line, self.column)
        } else {
            f.write_str("unknown position")
        }
    }
}

/// Convert a `saphyr_parser::Span` to a 1-indexed [`Location`] at its start.
pub(crate) fn location_from_span(span: &Span) -> Location {
    let start = &span.start;
    Location::new(start.line(), start.col() + 1, start.index())
}

pub(crate) fn location_from_scan_error(err: &ScanError) -> Location {
    let mark = err.marker();
    Location::new(mark.line(), mark.col() + 1, mark.index())
}

/// Appends ` at line L, column C` when the location is known.
pub(crate) fn fmt_at(location: &Location) -> String {
    if location.is_known() {
        format!(" at {location}")
    } else {
        String::new()
    }
}
