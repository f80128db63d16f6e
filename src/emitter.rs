//! Block-style YAML writer driven by formatter calls.
//!
//! Collections are rendered lazily: nothing is written for `begin_*` until the
//! first entry arrives, so an empty collection can still come out as `{}` or `[]`.
//! Every completed entry ends its own line.

use num_traits::float::FloatCore;

use crate::error::{Error, Result};
use crate::ser_quoting::{
    is_plain_key_safe, is_plain_value_safe, needs_double_quotes, write_double_quoted,
    write_single_quoted,
};
use crate::serializer_options::SerializerOptions;
use crate::tags::Tag;
use crate::zmij_format::push_float_string;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Kind {
    Sequence,
    Mapping,
}

/// Where a node sits relative to its parent at the moment it begins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Site {
    Root,
    /// Mapping key position.
    Key,
    /// Right after `key:`.
    Value,
    /// Right after `- `.
    Item,
}

#[derive(Debug)]
struct Frame {
    kind: Kind,
    site: Site,
    tag: Option<String>,
    /// Column of the entries.
    indent: usize,
    opened: bool,
    expecting_key: bool,
}

/// Renders the event vocabulary (scalars, sequence and mapping boundaries,
/// tags) as block-style YAML text.
#[derive(Debug)]
pub struct Emitter {
    out: String,
    options: SerializerOptions,
    frames: Vec<Frame>,
    pending_tag: Option<String>,
    at_line_start: bool,
    doc_started: bool,
    root_done: bool,
}

impl Emitter {
    pub fn new(options: SerializerOptions) -> Self {
        Self {
            out: String::new(),
            options,
            frames: Vec::new(),
            pending_tag: None,
            at_line_start: true,
            doc_started: false,
            root_done: false,
        }
    }

    pub fn options(&self) -> &SerializerOptions {
        &self.options
    }

    /// Attach `tag` to the next scalar or collection.
    pub fn tag(&mut self, tag: &Tag) {
        self.pending_tag = Some(tag.to_string());
    }

    pub fn begin_mapping(&mut self) -> Result<()> {
        self.begin_collection(Kind::Mapping)
    }

    pub fn end_mapping(&mut self) -> Result<()> {
        self.end_collection(Kind::Mapping)
    }

    pub fn begin_sequence(&mut self) -> Result<()> {
        self.begin_collection(Kind::Sequence)
    }

    pub fn end_sequence(&mut self) -> Result<()> {
        self.end_collection(Kind::Sequence)
    }

    /// A string scalar, quoted when the plain form would read back differently.
    pub fn write_string(&mut self, s: &str) -> Result<()> {
        let site = self.enter_node()?;
        let mut text = String::with_capacity(s.len() + 2);
        let plain_ok = match site {
            Site::Key => is_plain_key_safe(s),
            _ => is_plain_value_safe(s),
        };
        if self.options.quote_all {
            if needs_double_quotes(s) {
                write_double_quoted(&mut text, s);
            } else {
                write_single_quoted(&mut text, s);
            }
        } else if plain_ok {
            text.push_str(s);
        } else {
            write_double_quoted(&mut text, s);
        }
        self.finish_scalar(site, &text)
    }

    /// A scalar written verbatim. The caller guarantees it is a valid plain scalar.
    pub fn write_plain(&mut self, s: &str) -> Result<()> {
        let site = self.enter_node()?;
        self.finish_scalar(site, s)
    }

    pub fn write_null(&mut self) -> Result<()> {
        self.write_plain("null")
    }

    pub fn write_bool(&mut self, v: bool) -> Result<()> {
        self.write_plain(if v { "true" } else { "false" })
    }

    pub fn write_i64(&mut self, v: i64) -> Result<()> {
        self.write_plain(&v.to_string())
    }

    pub fn write_u64(&mut self, v: u64) -> Result<()> {
        self.write_plain(&v.to_string())
    }

    pub fn write_f64(&mut self, v: f64) -> Result<()> {
        self.write_float(v)
    }

    pub fn write_f32(&mut self, v: f32) -> Result<()> {
        self.write_float(v)
    }

    fn write_float<F: zmij::Float + FloatCore>(&mut self, v: F) -> Result<()> {
        let mut text = String::new();
        push_float_string(&mut text, v);
        self.write_plain(&text)
    }

    /// The text written so far.
    pub fn as_str(&self) -> &str {
        &self.out
    }

    /// Finish the document and return the text.
    pub fn finish(self) -> Result<String> {
        if let Some(frame) = self.frames.last() {
            return Err(Error::msg(format!(
                "unclosed {:?} at end of document",
                frame.kind
            )));
        }
        if !self.root_done {
            return Err(Error::msg("nothing was emitted"));
        }
        Ok(self.out)
    }

    fn begin_collection(&mut self, kind: Kind) -> Result<()> {
        let site = self.enter_node()?;
        if site == Site::Key {
            return Err(Error::msg("mapping keys must be scalars"));
        }
        let indent = match (site, self.frames.last()) {
            (Site::Value, Some(parent)) => parent.indent + self.options.indent_step,
            (Site::Item, Some(parent)) => parent.indent + 2,
            _ => 0,
        };
        self.frames.push(Frame {
            kind,
            site,
            tag: self.pending_tag.take(),
            indent,
            opened: false,
            expecting_key: true,
        });
        Ok(())
    }

    fn end_collection(&mut self, kind: Kind) -> Result<()> {
        let frame = match self.frames.pop() {
            Some(f) if f.kind == kind => f,
            Some(f) => {
                return Err(Error::msg(format!(
                    "cannot end {kind:?} while a {:?} is open",
                    f.kind
                )));
            }
            None => return Err(Error::msg(format!("no open {kind:?} to end"))),
        };
        if frame.kind == Kind::Mapping && !frame.expecting_key {
            return Err(Error::msg("mapping ended after a key without a value"));
        }
        if !frame.opened {
            let mut text = String::new();
            if let Some(tag) = &frame.tag {
                text.push_str(tag);
                text.push(' ');
            }
            text.push_str(match kind {
                Kind::Mapping => "{}",
                Kind::Sequence => "[]",
            });
            self.write_node_text(frame.site, &text);
            self.newline();
        }
        self.complete_value(frame.site);
        Ok(())
    }

    /// Position the output for a new node and report where it sits.
    fn enter_node(&mut self) -> Result<Site> {
        if self.frames.is_empty() {
            if self.root_done {
                return Err(Error::msg("the document already has a root node"));
            }
            return Ok(Site::Root);
        }
        self.open_top()?;
        let placement = {
            let Some(parent) = self.frames.last() else {
                return Ok(Site::Root);
            };
            match parent.kind {
                Kind::Mapping if parent.expecting_key => (Site::Key, parent.indent),
                Kind::Mapping => (Site::Value, parent.indent),
                Kind::Sequence => (Site::Item, parent.indent),
            }
        };
        match placement {
            (Site::Key, indent) => self.write_indent(indent),
            (Site::Item, indent) => {
                self.write_indent(indent);
                self.out.push_str("- ");
            }
            _ => {}
        }
        Ok(placement.0)
    }

    /// Write the header of the innermost collection once its first entry arrives.
    fn open_top(&mut self) -> Result<()> {
        let Some(frame) = self.frames.last_mut() else {
            return Ok(());
        };
        if frame.opened {
            return Ok(());
        }
        frame.opened = true;
        let site = frame.site;
        let tag = frame.tag.take();
        match (site, tag) {
            (Site::Root, Some(tag)) => {
                self.doc_started = true;
                self.out.push_str("--- ");
                self.out.push_str(&tag);
                self.newline();
            }
            (Site::Root, None) => self.start_document(),
            (Site::Value, Some(tag)) => {
                self.out.push(' ');
                self.out.push_str(&tag);
                self.newline();
            }
            (Site::Value, None) => self.newline(),
            (Site::Item, Some(tag)) => {
                self.out.push_str(&tag);
                self.newline();
            }
            // Compact form: the first entry shares the `- ` line.
            (Site::Item, None) => {}
            (Site::Key, _) => return Err(Error::msg("mapping keys must be scalars")),
        }
        Ok(())
    }

    fn finish_scalar(&mut self, site: Site, text: &str) -> Result<()> {
        let mut node = String::with_capacity(text.len() + 8);
        if let Some(tag) = self.pending_tag.take() {
            node.push_str(&tag);
            node.push(' ');
        }
        node.push_str(text);
        self.write_node_text(site, &node);
        if site == Site::Key {
            self.out.push(':');
            self.at_line_start = false;
            if let Some(parent) = self.frames.last_mut() {
                parent.expecting_key = false;
            }
            return Ok(());
        }
        self.newline();
        self.complete_value(site);
        Ok(())
    }

    fn write_node_text(&mut self, site: Site, text: &str) {
        match site {
            Site::Root => self.start_document(),
            Site::Value => self.out.push(' '),
            Site::Key | Site::Item => {}
        }
        self.out.push_str(text);
        self.at_line_start = false;
    }

    fn complete_value(&mut self, site: Site) {
        match site {
            Site::Root => self.root_done = true,
            Site::Value => {
                if let Some(parent) = self.frames.last_mut() {
                    parent.expecting_key = true;
                }
            }
            Site::Key | Site::Item => {}
        }
    }

    fn start_document(&mut self) {
        if !self.doc_started {
            self.doc_started = true;
            if self.options.explicit_document_start {
                self.out.push_str("---");
                self.newline();
            }
        }
    }

    fn write_indent(&mut self, n: usize) {
        if self.at_line_start {
            self.out.extend(std::iter::repeat_n(' ', n));
            self.at_line_start = false;
        }
    }

    fn newline(&mut self) {
        self.out.push('\n');
        self.at_line_start = true;
    }
}
