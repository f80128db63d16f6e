//! Pull parser over the saphyr tokenizer.
//!
//! [`YamlParser`] keeps a single *current* event. Formatters inspect it with the
//! `current_*` and `get_*`/`try_get_*` accessors and move forward with
//! [`YamlParser::read`], [`YamlParser::read_with_verify`] or
//! [`YamlParser::skip_current_node`]. Scalars borrow from the input whenever the
//! tokenizer did not have to rewrite them.
//!
//! Anchors and aliases
//! - By default `*alias` events are surfaced as [`ParseEventType::Alias`].
//! - With [`Options::replay_aliases`], anchored nodes are recorded while they
//!   stream past and every alias is replaced by the recorded events. Replay is
//!   bounded by [`AliasLimits`].
//!
//! Every raw event passes through the optional [`BudgetEnforcer`] before it
//! becomes current; replayed events are charged too.

use std::borrow::Cow;
use std::collections::HashMap;

use saphyr_parser::{Event, Parser, ScalarStyle, StrInput};
use tracing::{debug, trace};

use crate::budget::{BudgetBreach, BudgetEnforcer, BudgetReport};
use crate::error::{Error, Result};
use crate::event::{Anchor, ParseEventType};
use crate::location::{Location, location_from_span};
use crate::options::{AliasLimits, Options};
use crate::scalar::{ScalarRules, ScalarValue};
use crate::tags::{self, Tag};

/// One event with its tag/anchor payload.
#[derive(Clone, Debug)]
enum Ev<'a> {
    Nothing,
    StreamStart,
    StreamEnd,
    DocumentStart,
    DocumentEnd,
    Alias(Anchor),
    Scalar {
        value: ScalarValue<'a>,
        tag: Option<Tag>,
        anchor: Option<Anchor>,
    },
    SequenceStart {
        tag: Option<Tag>,
        anchor: Option<Anchor>,
    },
    SequenceEnd,
    MappingStart {
        tag: Option<Tag>,
        anchor: Option<Anchor>,
    },
    MappingEnd,
}

impl<'a> Ev<'a> {
    fn from_raw(raw: Event<'a>) -> Self {
        match raw {
            Event::Nothing => Ev::Nothing,
            Event::StreamStart => Ev::StreamStart,
            Event::StreamEnd => Ev::StreamEnd,
            Event::DocumentStart(_) => Ev::DocumentStart,
            Event::DocumentEnd => Ev::DocumentEnd,
            Event::Alias(id) => Ev::Alias(Anchor(id)),
            Event::Scalar(text, style, anchor_id, tag) => {
                let tag = tag.map(|t| Tag::new(t.handle.clone(), t.suffix.clone()));
                Ev::Scalar {
                    value: ScalarValue::new(text, style.into(), tag.as_ref()),
                    tag,
                    anchor: Anchor::from_raw(anchor_id),
                }
            }
            Event::SequenceStart(anchor_id, tag) => Ev::SequenceStart {
                tag: tag.map(|t| Tag::new(t.handle.clone(), t.suffix.clone())),
                anchor: Anchor::from_raw(anchor_id),
            },
            Event::SequenceEnd => Ev::SequenceEnd,
            Event::MappingStart(anchor_id, tag) => Ev::MappingStart {
                tag: tag.map(|t| Tag::new(t.handle.clone(), t.suffix.clone())),
                anchor: Anchor::from_raw(anchor_id),
            },
            Event::MappingEnd => Ev::MappingEnd,
        }
    }

    fn kind(&self) -> ParseEventType {
        match self {
            Ev::Nothing => ParseEventType::Nothing,
            Ev::StreamStart => ParseEventType::StreamStart,
            Ev::StreamEnd => ParseEventType::StreamEnd,
            Ev::DocumentStart => ParseEventType::DocumentStart,
            Ev::DocumentEnd => ParseEventType::DocumentEnd,
            Ev::Alias(_) => ParseEventType::Alias,
            Ev::Scalar { .. } => ParseEventType::Scalar,
            Ev::SequenceStart { .. } => ParseEventType::SequenceStart,
            Ev::SequenceEnd => ParseEventType::SequenceEnd,
            Ev::MappingStart { .. } => ParseEventType::MappingStart,
            Ev::MappingEnd => ParseEventType::MappingEnd,
        }
    }

    fn anchor(&self) -> Option<Anchor> {
        match self {
            Ev::Alias(a) => Some(*a),
            Ev::Scalar { anchor, .. }
            | Ev::SequenceStart { anchor, .. }
            | Ev::MappingStart { anchor, .. } => *anchor,
            _ => None,
        }
    }
}

/// A frame that records events for an anchored container until its end.
#[derive(Debug)]
struct RecFrame<'a> {
    id: usize,
    depth: usize,
    buf: Vec<(Ev<'a>, Location)>,
}

/// Alias replay state. Present only when replay is enabled.
#[derive(Debug)]
struct Replay<'a> {
    limits: AliasLimits,
    /// Stack of injected buffers; always served from the top.
    inject: Vec<(Vec<(Ev<'a>, Location)>, usize)>,
    anchors: HashMap<usize, Vec<(Ev<'a>, Location)>>,
    rec_stack: Vec<RecFrame<'a>>,
    total_replayed_events: usize,
    per_anchor_expansions: HashMap<usize, usize>,
}

impl<'a> Replay<'a> {
    fn new(limits: AliasLimits) -> Self {
        Self {
            limits,
            inject: Vec::new(),
            anchors: HashMap::new(),
            rec_stack: Vec::new(),
            total_replayed_events: 0,
            per_anchor_expansions: HashMap::new(),
        }
    }

    fn reset(&mut self) {
        self.inject.clear();
        self.anchors.clear();
        self.rec_stack.clear();
        self.per_anchor_expansions.clear();
        self.total_replayed_events = 0;
    }

    fn next_injected(&mut self) -> Result<Option<(Ev<'a>, Location)>> {
        while let Some((buf, idx)) = self.inject.last_mut() {
            if *idx >= buf.len() {
                self.inject.pop();
                continue;
            }
            let (ev, location) = buf[*idx].clone();
            *idx += 1;
            self.total_replayed_events += 1;
            if self.total_replayed_events > self.limits.max_total_replayed_events {
                return Err(Error::AliasLimit {
                    message: format!(
                        "alias replay limit exceeded: total_replayed_events={} > {}",
                        self.total_replayed_events, self.limits.max_total_replayed_events
                    ),
                    location,
                });
            }
            return Ok(Some((ev, location)));
        }
        Ok(None)
    }

    fn expand(&mut self, anchor: Anchor, location: Location) -> Result<()> {
        let id = anchor.id();
        let buf = self
            .anchors
            .get(&id)
            .ok_or(Error::UnknownAnchor {
                anchor: id,
                location,
            })?
            .clone();

        let count = self.per_anchor_expansions.entry(id).or_insert(0);
        *count += 1;
        if *count > self.limits.max_alias_expansions_per_anchor {
            return Err(Error::AliasLimit {
                message: format!(
                    "alias expansion limit exceeded for anchor id {id}: {count} > {}",
                    self.limits.max_alias_expansions_per_anchor
                ),
                location,
            });
        }

        let next_depth = self.inject.len() + 1;
        if next_depth > self.limits.max_replay_stack_depth {
            return Err(Error::AliasLimit {
                message: format!(
                    "alias replay stack depth exceeded: depth={next_depth} > {}",
                    self.limits.max_replay_stack_depth
                ),
                location,
            });
        }
        trace!(anchor = id, events = buf.len(), "replaying alias");
        self.inject.push((buf, 0));
        Ok(())
    }

    /// Record a served event into the open frames, opening or closing frames as needed.
    fn record(&mut self, ev: &Ev<'a>, location: Location) {
        match ev {
            Ev::SequenceStart { anchor, .. } | Ev::MappingStart { anchor, .. } => {
                for fr in &mut self.rec_stack {
                    fr.depth += 1;
                    fr.buf.push((ev.clone(), location));
                }
                if let Some(anchor) = anchor {
                    self.rec_stack.push(RecFrame {
                        id: anchor.id(),
                        depth: 1,
                        buf: vec![(ev.clone(), location)],
                    });
                }
            }
            Ev::SequenceEnd | Ev::MappingEnd => {
                for fr in &mut self.rec_stack {
                    fr.buf.push((ev.clone(), location));
                    fr.depth = fr.depth.saturating_sub(1);
                }
                while self.rec_stack.last().is_some_and(|top| top.depth == 0) {
                    if let Some(done) = self.rec_stack.pop() {
                        self.anchors.insert(done.id, done.buf);
                    }
                }
            }
            Ev::Scalar { anchor, .. } => {
                for fr in &mut self.rec_stack {
                    fr.buf.push((ev.clone(), location));
                }
                if let Some(anchor) = anchor {
                    self.anchors.insert(anchor.id(), vec![(ev.clone(), location)]);
                }
            }
            _ => {}
        }
    }
}

/// Streaming YAML reader with a single current event.
pub struct YamlParser<'a> {
    parser: Parser<'a, StrInput<'a>>,
    current: Ev<'a>,
    location: Location,
    /// Open collections, innermost last.
    open: Vec<ParseEventType>,
    exhausted: bool,
    rules: ScalarRules,
    budget: Option<BudgetEnforcer>,
    budget_report: Option<fn(&BudgetReport)>,
    replay: Option<Replay<'a>>,
}

macro_rules! scalar_accessors {
    ($( $ty:ty, $expected:literal, $get:ident, $read:ident, $try_get:ident, |$s:ident, $rules:ident| $conv:expr; )*) => {
        $(
            #[doc = concat!("The current scalar as `", stringify!($ty), "`, without advancing.")]
            pub fn $get(&self) -> Result<$ty> {
                let $s = self.scalar()?;
                #[allow(unused_variables)]
                let $rules = self.rules;
                $conv.ok_or_else(|| self.coercion_error($expected, $s))
            }

            #[doc = concat!("The current scalar as `", stringify!($ty), "`, then advance past it.")]
            pub fn $read(&mut self) -> Result<$ty> {
                let value = self.$get()?;
                self.read()?;
                Ok(value)
            }

            #[doc = concat!("The current scalar as `", stringify!($ty), "` if it converts. Never advances.")]
            pub fn $try_get(&self) -> Option<$ty> {
                let $s = self.current_scalar()?;
                #[allow(unused_variables)]
                let $rules = self.rules;
                $conv
            }
        )*
    };
}

impl<'a> YamlParser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::with_options(input, &Options::default())
    }

    pub fn with_options(input: &'a str, options: &Options) -> Self {
        Self {
            parser: Parser::new_from_str(input),
            current: Ev::Nothing,
            location: Location::UNKNOWN,
            open: Vec::new(),
            exhausted: false,
            rules: ScalarRules {
                legacy_octal: options.legacy_octal_numbers,
                strict_booleans: options.strict_booleans,
            },
            budget: options.budget.clone().map(BudgetEnforcer::new),
            budget_report: options.budget_report,
            replay: options
                .replay_aliases
                .then(|| Replay::new(options.alias_limits)),
        }
    }

    pub fn current_event_type(&self) -> ParseEventType {
        self.current.kind()
    }

    /// Tag of the current scalar or collection start.
    pub fn current_tag(&self) -> Option<&Tag> {
        match &self.current {
            Ev::Scalar { tag, .. } | Ev::SequenceStart { tag, .. } | Ev::MappingStart { tag, .. } => {
                tag.as_ref()
            }
            _ => None,
        }
    }

    /// Anchor defined on the current node, or referenced by the current alias.
    pub fn current_anchor(&self) -> Option<Anchor> {
        self.current.anchor()
    }

    /// Position of the current event.
    pub fn current_mark(&self) -> Location {
        self.location
    }

    pub fn current_scalar(&self) -> Option<&ScalarValue<'a>> {
        match &self.current {
            Ev::Scalar { value, .. } => Some(value),
            _ => None,
        }
    }

    /// True at the stream end, or once the stream has been read past its end.
    pub fn end(&self) -> bool {
        self.exhausted || matches!(self.current, Ev::StreamEnd)
    }

    pub fn is_null_scalar(&self) -> bool {
        self.current_scalar().is_some_and(ScalarValue::is_null)
    }

    /// Nesting depth of the current position (open sequences and mappings).
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Advance one event. Returns `false` once the stream is exhausted.
    pub fn read(&mut self) -> Result<bool> {
        match self.next_event()? {
            Some((ev, location)) => {
                self.track_nesting(&ev, location)?;
                self.current = ev;
                self.location = location;
                Ok(true)
            }
            None => {
                self.current = Ev::Nothing;
                self.exhausted = true;
                Ok(false)
            }
        }
    }

    /// Advance past the current event if it is `expected`, fail otherwise.
    pub fn read_with_verify(&mut self, expected: ParseEventType) -> Result<()> {
        if self.current_event_type() != expected {
            return Err(self.unexpected(expected.to_string()));
        }
        self.read()?;
        Ok(())
    }

    /// Advance past the whole node at the cursor: a scalar, an alias, or a
    /// collection with everything nested inside it.
    pub fn skip_current_node(&mut self) -> Result<()> {
        let event = self.current_event_type();
        if !event.is_node_start() {
            return Err(self.structure_error("a node"));
        }
        match event {
            ParseEventType::Scalar | ParseEventType::Alias => {
                self.read()?;
                Ok(())
            }
            _ => {
                let mut depth = 0usize;
                loop {
                    match self.current_event_type() {
                        ParseEventType::SequenceStart | ParseEventType::MappingStart => depth += 1,
                        ParseEventType::SequenceEnd | ParseEventType::MappingEnd => depth -= 1,
                        ParseEventType::Scalar | ParseEventType::Alias => {}
                        _ => return Err(self.structure_error("end of collection")),
                    }
                    self.read()?;
                    if depth == 0 {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Read until just past the next event of type `event_type`.
    ///
    /// Returns `false` if the stream ended first.
    pub fn skip_after(&mut self, event_type: ParseEventType) -> Result<bool> {
        while self.current_event_type() != event_type {
            if self.end() && event_type != ParseEventType::StreamEnd {
                return Ok(false);
            }
            if !self.read()? {
                return Ok(false);
            }
        }
        self.read()?;
        Ok(true)
    }

    /// The current scalar text. Fails on null or on a core tag that is not a string.
    pub fn get_scalar_as_string(&self) -> Result<&str> {
        let scalar = self.scalar()?;
        if scalar.is_null() || !tags::can_parse_into_string(self.current_tag()) {
            return Err(self.coercion_error("string", scalar));
        }
        Ok(scalar.as_str())
    }

    pub fn read_scalar_as_string(&mut self) -> Result<String> {
        let value = self.get_scalar_as_string()?.to_owned();
        self.read()?;
        Ok(value)
    }

    /// Like [`read_scalar_as_string`](Self::read_scalar_as_string) but keeps borrowed text borrowed.
    pub fn read_scalar_as_cow(&mut self) -> Result<Cow<'a, str>> {
        self.get_scalar_as_string()?;
        let value = self.scalar()?.as_cow().clone();
        self.read()?;
        Ok(value)
    }

    /// Convert the current scalar's text with `convert`, then advance past it.
    ///
    /// Null scalars and texts `convert` rejects fail with a coercion error naming
    /// `expected`. Tags are left to the caller. The cursor stays on the scalar on failure.
    pub fn read_scalar_with<T>(
        &mut self,
        expected: &'static str,
        convert: impl FnOnce(&str) -> Option<T>,
    ) -> Result<T> {
        let scalar = self.scalar()?;
        let converted = if scalar.is_null() {
            None
        } else {
            convert(scalar.as_str())
        };
        let value = converted.ok_or_else(|| self.coercion_error(expected, scalar))?;
        self.read()?;
        Ok(value)
    }

    pub fn try_get_scalar_as_string(&self) -> Option<&str> {
        self.current_scalar()?.try_get_string()
    }

    /// Raw bytes of the current scalar, null or not.
    pub fn try_get_scalar_as_span(&self) -> Option<&[u8]> {
        self.current_scalar().map(ScalarValue::as_bytes)
    }

    scalar_accessors! {
        bool, "bool", get_scalar_as_bool, read_scalar_as_bool, try_get_scalar_as_bool,
            |s, rules| s.bool_with(rules);
        i32, "i32", get_scalar_as_i32, read_scalar_as_i32, try_get_scalar_as_i32,
            |s, rules| s.signed_with::<i32>(rules);
        i64, "i64", get_scalar_as_i64, read_scalar_as_i64, try_get_scalar_as_i64,
            |s, rules| s.signed_with::<i64>(rules);
        u32, "u32", get_scalar_as_u32, read_scalar_as_u32, try_get_scalar_as_u32,
            |s, rules| s.unsigned_with::<u32>(rules);
        u64, "u64", get_scalar_as_u64, read_scalar_as_u64, try_get_scalar_as_u64,
            |s, rules| s.unsigned_with::<u64>(rules);
        f32, "f32", get_scalar_as_f32, read_scalar_as_f32, try_get_scalar_as_f32,
            |s, rules| s.try_get_f32();
        f64, "f64", get_scalar_as_f64, read_scalar_as_f64, try_get_scalar_as_f64,
            |s, rules| s.try_get_f64();
    }

    /// Narrow and wide integers for the built-in formatters.
    pub(crate) fn read_scalar_as_signed<T: TryFrom<i128>>(&mut self, expected: &'static str) -> Result<T> {
        let scalar = self.scalar()?;
        let value = scalar
            .signed_with::<T>(self.rules)
            .ok_or_else(|| self.coercion_error(expected, scalar))?;
        self.read()?;
        Ok(value)
    }

    pub(crate) fn read_scalar_as_unsigned<T: TryFrom<u128>>(
        &mut self,
        expected: &'static str,
    ) -> Result<T> {
        let scalar = self.scalar()?;
        let value = scalar
            .unsigned_with::<T>(self.rules)
            .ok_or_else(|| self.coercion_error(expected, scalar))?;
        self.read()?;
        Ok(value)
    }

    fn scalar(&self) -> Result<&ScalarValue<'a>> {
        match &self.current {
            Ev::Scalar { value, .. } => Ok(value),
            _ => Err(self.unexpected("scalar")),
        }
    }

    pub(crate) fn coercion_error(&self, expected: &'static str, scalar: &ScalarValue<'_>) -> Error {
        Error::ScalarCoercion {
            expected,
            value: scalar.as_str().to_owned(),
            location: self.location,
        }
    }

    pub(crate) fn structure_error(&self, expected: impl Into<String>) -> Error {
        Error::Structure {
            expected: expected.into(),
            found: self.current_event_type(),
            location: self.location,
        }
    }

    /// Mismatch error; an alias in place of a node gets its own error.
    pub(crate) fn unexpected(&self, expected: impl Into<String>) -> Error {
        match &self.current {
            Ev::Alias(anchor) => Error::UnresolvedAlias {
                anchor: anchor.id(),
                location: self.location,
            },
            _ => self.structure_error(expected),
        }
    }

    fn track_nesting(&mut self, ev: &Ev<'a>, location: Location) -> Result<()> {
        let kind = ev.kind();
        let opener = match kind {
            ParseEventType::SequenceStart | ParseEventType::MappingStart => {
                self.open.push(kind);
                return Ok(());
            }
            ParseEventType::SequenceEnd => ParseEventType::SequenceStart,
            ParseEventType::MappingEnd => ParseEventType::MappingStart,
            _ => return Ok(()),
        };
        match self.open.pop() {
            Some(top) if top == opener => Ok(()),
            _ => Err(Error::Structure {
                expected: "balanced collection end".to_owned(),
                found: kind,
                location,
            }),
        }
    }

    fn next_event(&mut self) -> Result<Option<(Ev<'a>, Location)>> {
        loop {
            let injected = match self.replay.as_mut() {
                Some(replay) => replay.next_injected()?,
                None => None,
            };
            if let Some((ev, location)) = injected {
                self.observe_replayed(&ev, location)?;
                if let Some(replay) = self.replay.as_mut() {
                    replay.record(&ev, location);
                }
                return Ok(Some((ev, location)));
            }

            let Some(item) = self.parser.next() else {
                return Ok(None);
            };
            let (raw, span) = item.map_err(Error::from_scan_error)?;
            let location = location_from_span(&span);
            self.observe(&raw, location)?;
            let ev = Ev::from_raw(raw);

            match &ev {
                Ev::Nothing => continue,
                Ev::StreamEnd => self.finish_budget(location)?,
                _ => {}
            }

            if let Some(replay) = self.replay.as_mut() {
                match &ev {
                    Ev::DocumentStart | Ev::DocumentEnd => replay.reset(),
                    Ev::Alias(anchor) => {
                        replay.expand(*anchor, location)?;
                        continue;
                    }
                    _ => replay.record(&ev, location),
                }
            }
            return Ok(Some((ev, location)));
        }
    }

    fn observe(&mut self, raw: &Event<'_>, location: Location) -> Result<()> {
        let Some(budget) = self.budget.as_mut() else {
            return Ok(());
        };
        match budget.observe(raw) {
            Ok(()) => Ok(()),
            Err(breach) => Err(self.breach(breach, location)),
        }
    }

    /// Charge a replayed event against the budget as if it were read from the input.
    fn observe_replayed(&mut self, ev: &Ev<'_>, location: Location) -> Result<()> {
        let raw = match ev {
            Ev::Scalar { value, .. } => {
                Event::Scalar(Cow::Borrowed(value.as_str()), ScalarStyle::Plain, 0, None)
            }
            Ev::SequenceStart { .. } => Event::SequenceStart(0, None),
            Ev::SequenceEnd => Event::SequenceEnd,
            Ev::MappingStart { .. } => Event::MappingStart(0, None),
            Ev::MappingEnd => Event::MappingEnd,
            _ => return Ok(()),
        };
        self.observe(&raw, location)
    }

    fn breach(&mut self, breach: BudgetBreach, location: Location) -> Error {
        debug!(%breach, %location, "YAML budget breached");
        if let Some(enforcer) = self.budget.take() {
            let mut report = enforcer.finalize();
            report.breached = Some(breach.clone());
            if let Some(cb) = self.budget_report {
                cb(&report);
            }
        }
        Error::Budget { breach, location }
    }

    fn finish_budget(&mut self, location: Location) -> Result<()> {
        let Some(enforcer) = self.budget.take() else {
            return Ok(());
        };
        let report = enforcer.finalize();
        if let Some(cb) = self.budget_report {
            cb(&report);
        }
        match report.breached {
            Some(breach) => Err(Error::Budget { breach, location }),
            None => Ok(()),
        }
    }
}
