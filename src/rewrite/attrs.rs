//! Ordered attribute map and the attribute-list parser.
//!
//! Parsing is forgiving in the way CMS content needs:
//!
//! - double-quoted, single-quoted and unquoted values
//! - bare attributes (`async`) map to an empty value
//! - repeated names keep the first position and the last value
//! - tokens that are not valid attribute names are kept as positional entries
//! - a lone `=` is dropped
//! - an unterminated quote degrades the whole list to one positional token
//!
//! # Example
//!
//! ```ignore
//! let attrs = parse_attributes(r#" src="a.jpg" width=100 async"#);
//! assert_eq!(attrs.get("src"), Some("a.jpg"));
//! assert_eq!(attrs.get("async"), Some(""));
//! ```

use crate::utils::html::escape_attr;
use std::fmt::Write;

// =============================================================================
// AttributeMap
// =============================================================================

/// Key of an attribute entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttrKey {
    /// Regular `name="value"` attribute, name lowercased.
    Named(String),
    /// Bare token that is not a valid attribute name, numbered in order of appearance.
    Positional(usize),
}

/// Ordered mapping from attribute name to value.
///
/// Setting an existing name replaces its value in place; new names append.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeMap {
    entries: Vec<(AttrKey, String)>,
    next_positional: usize,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(name, value)` pairs, last duplicate wins.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut map = Self::new();
        for (name, value) in pairs {
            map.set(name.as_ref(), value);
        }
        map
    }

    /// Value of a named attribute.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|i| self.entries[i].1.as_str())
    }

    /// Value of a named attribute if present and non-empty.
    pub fn get_non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|v| !v.is_empty())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Set a named attribute, keeping its position if it already exists.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.position(name) {
            Some(i) => self.entries[i].1 = value,
            None => self
                .entries
                .push((AttrKey::Named(name.to_ascii_lowercase()), value)),
        }
    }

    /// Remove a named attribute, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let i = self.position(name)?;
        Some(self.entries.remove(i).1)
    }

    /// Append a positional token.
    pub fn push_positional(&mut self, token: impl Into<String>) {
        self.entries
            .push((AttrKey::Positional(self.next_positional), token.into()));
        self.next_positional += 1;
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AttrKey, &str)> {
        self.entries.iter().map(|(k, v)| (k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize as an attribute list, each entry preceded by a space.
    ///
    /// Named entries become `name="value"`, positional tokens are written bare.
    /// Both are attribute-escaped.
    pub fn to_attr_string(&self) -> String {
        let mut out = String::with_capacity(self.entries.len() * 16);
        for (key, value) in &self.entries {
            match key {
                AttrKey::Named(name) => {
                    let _ = write!(out, " {}=\"{}\"", escape_attr(name), escape_attr(value));
                }
                AttrKey::Positional(_) => {
                    let _ = write!(out, " {}", escape_attr(value));
                }
            }
        }
        out
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(key, _)| match key {
            AttrKey::Named(n) => n.eq_ignore_ascii_case(name),
            AttrKey::Positional(_) => false,
        })
    }
}

// =============================================================================
// Attribute Parsing
// =============================================================================

/// Parse a raw attribute list (everything between the tag name and `>`).
///
/// Never fails: unparseable input ends up as positional tokens.
pub fn parse_attributes(raw: &str) -> AttributeMap {
    match try_parse(raw) {
        Some(map) => map,
        None => {
            let mut map = AttributeMap::new();
            let trimmed = raw.trim_ascii();
            if !trimmed.is_empty() {
                map.push_positional(trimmed);
            }
            map
        }
    }
}

/// Returns `None` on an unterminated quote.
fn try_parse(raw: &str) -> Option<AttributeMap> {
    let bytes = raw.as_bytes();
    let mut map = AttributeMap::new();
    let mut i = 0;

    while i < bytes.len() {
        // Whitespace and stray slashes separate attributes
        if bytes[i].is_ascii_whitespace() || bytes[i] == b'/' {
            i += 1;
            continue;
        }

        // Quoted token in name position
        if bytes[i] == b'"' || bytes[i] == b'\'' {
            let end = find_quote_end(bytes, i)?;
            map.push_positional(&raw[i..end]);
            i = end;
            continue;
        }

        // Attribute name
        let name_start = i;
        while i < bytes.len() && !is_name_terminator(bytes[i]) {
            i += 1;
        }
        let name = &raw[name_start..i];

        // Optional `= value`
        let mut j = skip_whitespace(bytes, i);
        let value = if j < bytes.len() && bytes[j] == b'=' && !name.is_empty() {
            j = skip_whitespace(bytes, j + 1);
            if j < bytes.len() && (bytes[j] == b'"' || bytes[j] == b'\'') {
                let end = find_quote_end(bytes, j)?;
                let value = &raw[j + 1..end - 1];
                i = end;
                Some(value)
            } else if j < bytes.len() {
                let value_start = j;
                while j < bytes.len() && !bytes[j].is_ascii_whitespace() {
                    j += 1;
                }
                i = j;
                Some(&raw[value_start..j])
            } else {
                // `name =` closing the list; the `=` is dropped like a lone one
                None
            }
        } else {
            None
        };

        if name.is_empty() {
            // A lone `=` binds to nothing
            i += 1;
        } else if is_valid_name(name) {
            map.set(name, value.unwrap_or(""));
        } else {
            map.push_positional(raw[name_start..i].trim_ascii_end());
        }
    }

    Some(map)
}

/// Index just past the closing quote matching the one at `start`.
fn find_quote_end(bytes: &[u8], start: usize) -> Option<usize> {
    let quote = bytes[start];
    bytes[start + 1..]
        .iter()
        .position(|&b| b == quote)
        .map(|offset| start + 1 + offset + 1)
}

fn skip_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

#[inline]
fn is_name_terminator(b: u8) -> bool {
    b.is_ascii_whitespace() || b == b'=' || b == b'/' || b == b'"' || b == b'\''
}

/// Attribute names the host sanitizer accepts: `[_A-Za-z][-_A-Za-z0-9:.]*`.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
}

// =============================================================================
// Tests
// =============================================================================
