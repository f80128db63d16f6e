//! Registry keys derived from Rust type names.

use std::fmt;

use crate::tags::is_tag_char;

/// Namespace, name and generic arguments of a type.
///
/// Parsed from [`std::any::type_name`], so it is suitable for diagnostics and alias
/// derivation. Lookups themselves are keyed by `TypeId`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeIdentity {
    full: String,
    namespace: String,
    name: String,
    generic_args: Vec<TypeIdentity>,
}

impl TypeIdentity {
    pub fn of<T: ?Sized>() -> Self {
        Self::parse(std::any::type_name::<T>())
    }

    pub fn parse(type_name: &str) -> Self {
        let full = type_name.trim();
        let (head, args) = match (full.find('<'), full.ends_with('>')) {
            (Some(lt), true) if !starts_compound(full) => {
                (&full[..lt], split_top_level(&full[lt + 1..full.len() - 1]))
            }
            _ => (full, Vec::new()),
        };

        let path = head.strip_prefix("dyn ").unwrap_or(head);
        let (namespace, name) = if starts_compound(path) {
            ("", path)
        } else {
            match path.rfind("::") {
                Some(pos) => (&path[..pos], &path[pos + 2..]),
                None => ("", path),
            }
        };

        Self {
            full: full.to_owned(),
            namespace: namespace.to_owned(),
            name: name.to_owned(),
            generic_args: args.into_iter().map(Self::parse).collect(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Unqualified name without generic arguments.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn generic_args(&self) -> &[TypeIdentity] {
        &self.generic_args
    }

    pub fn is_generic(&self) -> bool {
        !self.generic_args.is_empty()
    }

    /// The unbound generic definition, e.g. `alloc::vec::Vec<_>`.
    pub fn definition(&self) -> String {
        let mut out = String::new();
        if !self.namespace.is_empty() {
            out.push_str(&self.namespace);
            out.push_str("::");
        }
        out.push_str(&self.name);
        if self.is_generic() {
            out.push('<');
            out.push_str(&vec!["_"; self.generic_args.len()].join(", "));
            out.push('>');
        }
        out
    }

    /// Default polymorphic alias: the short name, then each generic argument's
    /// alias after a `-`. Characters not allowed in a tag become `_`.
    pub fn alias(&self) -> String {
        let mut out: String = self
            .name
            .chars()
            .map(|c| if is_tag_char(c) { c } else { '_' })
            .collect();
        for arg in &self.generic_args {
            out.push('-');
            out.push_str(&arg.alias());
        }
        out
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}

/// Tuples, arrays, slices, references and pointers have no path of their own.
fn starts_compound(s: &str) -> bool {
    s.starts_with(['(', '[', '&', '*'])
}

/// Split generic arguments on commas that are not nested in brackets.
fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '<' | '(' | '[' => depth += 1,
            '>' | ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    let last = s[start..].trim();
    if !last.is_empty() {
        parts.push(last);
    }
    parts
}
