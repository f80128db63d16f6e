//! Defines the error type and its location.

use std::str::Utf8Error;

use saphyr_parser::ScanError;

use crate::budget::BudgetBreach;
use crate::event::ParseEventType;
use crate::location::{Location, fmt_at, location_from_scan_error};

/// Alias for a `Result` with the error type [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong while parsing, resolving formatters, or emitting.
///
/// Variants originating from the input carry a [`Location`]; resolution failures
/// name the type (and alias or tag) involved instead.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Free-form error with optional source location.
    #[error("{msg}{}", fmt_at(.location))]
    Message { msg: String, location: Location },

    /// A scalar could not be interpreted as the requested type.
    #[error("cannot convert scalar `{value}` to {expected}{}", fmt_at(.location))]
    ScalarCoercion {
        expected: &'static str,
        value: String,
        location: Location,
    },

    /// An expected event kind was not found at the cursor, or nesting was malformed.
    #[error("expected {expected}, found {found}{}", fmt_at(.location))]
    Structure {
        expected: String,
        found: ParseEventType,
        location: Location,
    },

    /// The tokenizer rejected the input.
    #[error("{message}{}", fmt_at(.location))]
    Scan { message: String, location: Location },

    /// No formatter could be produced for the requested type by any resolution path.
    #[error("{type_name} is not registered in resolver: {resolver}")]
    FormatterNotFound {
        type_name: String,
        resolver: &'static str,
    },

    /// A polymorphic base was (de)serialized before any variant was registered for it.
    #[error("no variants are registered for polymorphic base {base}")]
    NoVariantsRegistered { base: String },

    /// The incoming tag does not name any variant registered for the base.
    #[error("tag `!{alias}` does not name a registered variant of {base}{}", fmt_at(.location))]
    UnknownAlias {
        base: String,
        alias: String,
        location: Location,
    },

    /// A polymorphic node arrived without a tag, so its concrete type is ambiguous.
    #[error("missing tag for polymorphic base {base}{}", fmt_at(.location))]
    MissingTag { base: String, location: Location },

    /// The runtime value's concrete type was never registered as a variant of the base.
    #[error("the concrete type of this {base} value is not a registered variant")]
    UnregisteredVariant { base: String },

    /// Variant registration was attempted against a base that is not polymorphic.
    #[error("{type_name} is not a polymorphic base type")]
    NotPolymorphic { type_name: String },

    /// A variant alias that cannot be written as a local `!tag`.
    #[error("`{alias}` is not a valid tag alias for a variant of {base}")]
    InvalidAlias { base: String, alias: String },

    /// An alias event was reached while alias replay is disabled.
    #[error("alias *{anchor} cannot be resolved (alias replay is disabled){}", fmt_at(.location))]
    UnresolvedAlias { anchor: usize, location: Location },

    /// An alias references an anchor that was never defined.
    #[error("alias references unknown anchor id {anchor}{}", fmt_at(.location))]
    UnknownAnchor { anchor: usize, location: Location },

    /// Alias replay hardening tripped.
    #[error("{message}{}", fmt_at(.location))]
    AliasLimit { message: String, location: Location },

    /// A YAML budget limit was exceeded.
    #[error("YAML budget breached: {breach}{}", fmt_at(.location))]
    Budget {
        breach: BudgetBreach,
        location: Location,
    },

    /// The stream contains no document to deserialize.
    #[error("the YAML stream contains no document")]
    NoDocument,

    /// More than one document where exactly one was expected.
    #[error("deserializing from YAML containing more than one document is not supported{}", fmt_at(.location))]
    MoreThanOneDocument { location: Location },

    /// Input bytes are not valid UTF-8.
    #[error("input is not valid UTF-8: {0}")]
    Utf8(#[from] Utf8Error),
}

impl Error {
    /// A plain message without a location.
    pub fn msg<S: Into<String>>(s: S) -> Self {
        Error::Message {
            msg: s.into(),
            location: Location::UNKNOWN,
        }
    }

    pub(crate) fn from_scan_error(err: ScanError) -> Self {
        let location = location_from_scan_error(&err);
        Error::Scan {
            message: err.info().to_owned(),
            location,
        }
    }

    /// Attach a location to errors that don't have one yet.
    pub(crate) fn with_location(mut self, set_location: Location) -> Self {
        match &mut self {
            Error::Message { location, .. }
            | Error::ScalarCoercion { location, .. }
            | Error::Structure { location, .. }
            | Error::UnknownAlias { location, .. }
            | Error::MissingTag { location, .. }
            | Error::UnresolvedAlias { location, .. }
            | Error::UnknownAnchor { location, .. }
            | Error::AliasLimit { location, .. }
            | Error::Budget { location, .. } => {
                if !location.is_known() {
                    *location = set_location;
                }
            }
            _ => {}
        }
        self
    }

    /// The source location of the error, if it has one.
    pub fn location(&self) -> Option<Location> {
        match self {
            Error::Message { location, .. }
            | Error::ScalarCoercion { location, .. }
            | Error::Structure { location, .. }
            | Error::Scan { location, .. }
            | Error::UnknownAlias { location, .. }
            | Error::MissingTag { location, .. }
            | Error::UnresolvedAlias { location, .. }
            | Error::UnknownAnchor { location, .. }
            | Error::AliasLimit { location, .. }
            | Error::Budget { location, .. }
            | Error::MoreThanOneDocument { location } => {
                location.is_known().then_some(*location)
            }
            _ => None,
        }
    }
}
