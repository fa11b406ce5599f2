//! Class attribute handling: tokenizing, identity hints and sanitizing.

use regex::Regex;
use rustc_hash::FxHashSet;
use std::sync::LazyLock;

use super::ImageSize;

/// Class prefix carrying the attachment id (`wp-image-42`).
const ID_CLASS_PREFIX: &str = "wp-image-";
/// Class prefix carrying the attachment size name (`size-large`).
const SIZE_CLASS_PREFIX: &str = "size-";

/// Tokenized `class` attribute, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList {
    names: Vec<String>,
}

impl ClassList {
    pub fn parse(value: &str) -> Self {
        Self {
            names: value.split_ascii_whitespace().map(str::to_string).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Whether any class is in `set`.
    pub fn intersects(&self, set: &FxHashSet<&str>) -> bool {
        !set.is_empty() && self.names.iter().any(|n| set.contains(n.as_str()))
    }

    /// First `wp-image-<id>` token with a numeric, non-zero id.
    pub fn attachment_id(&self) -> Option<u64> {
        self.names.iter().find_map(|n| {
            n.strip_prefix(ID_CLASS_PREFIX)
                .and_then(|id| id.parse::<u64>().ok())
                .filter(|&id| id != 0)
        })
    }

    /// First `size-<name>` token with a non-empty name.
    pub fn size(&self) -> Option<ImageSize> {
        self.names.iter().find_map(|n| {
            n.strip_prefix(SIZE_CLASS_PREFIX)
                .filter(|name| !name.is_empty())
                .map(|name| ImageSize::Named(name.to_string()))
        })
    }

    /// Append a class unless it is already present.
    pub fn push(&mut self, name: &str) {
        if !name.is_empty() && !self.contains(name) {
            self.names.push(name.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Sanitized names joined with single spaces; names that sanitize to nothing are dropped.
    pub fn to_attr_value(&self) -> String {
        let mut out = String::new();
        for name in &self.names {
            let clean = sanitize_class(name);
            if clean.is_empty() {
                continue;
            }
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&clean);
        }
        out
    }
}

/// Strip characters unsafe in a class name.
///
/// Percent-encoded octets are removed first, then anything outside `[A-Za-z0-9_-]`.
pub fn sanitize_class(name: &str) -> String {
    static RE_OCTET: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"%[a-fA-F0-9][a-fA-F0-9]").unwrap());
    static RE_UNSAFE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_-]").unwrap());

    let without_octets = RE_OCTET.replace_all(name, "");
    RE_UNSAFE.replace_all(&without_octets, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_collapses_whitespace() {
        let classes = ClassList::parse("  a \t b\n\nc ");
        assert_eq!(classes.to_attr_value(), "a b c");
        assert!(ClassList::parse("   ").is_empty());
    }

    #[test]
    fn test_intersects() {
        let classes = ClassList::parse("wp-image-5 noLazy");
        let set: FxHashSet<&str> = ["noLazy", "other"].into_iter().collect();
        assert!(classes.intersects(&set));
        assert!(!classes.intersects(&FxHashSet::default()));
        let case: FxHashSet<&str> = ["nolazy"].into_iter().collect();
        assert!(!classes.intersects(&case));
    }

    #[test]
    fn test_attachment_id_first_valid_wins() {
        assert_eq!(ClassList::parse("wp-image-5 wp-image-9").attachment_id(), Some(5));
        assert_eq!(ClassList::parse("wp-image-x wp-image-7").attachment_id(), Some(7));
        assert_eq!(ClassList::parse("wp-image-0").attachment_id(), None);
        assert_eq!(ClassList::parse("aligncenter").attachment_id(), None);
    }

    #[test]
    fn test_size_first_wins() {
        assert_eq!(
            ClassList::parse("size-large size-full").size(),
            Some(ImageSize::Named("large".to_string()))
        );
        assert_eq!(ClassList::parse("size-").size(), None);
    }

    #[test]
    fn test_push_dedupes() {
        let mut classes = ClassList::parse("a lazyload");
        classes.push("lazyload");
        classes.push("b");
        classes.push("");
        assert_eq!(classes.to_attr_value(), "a lazyload b");
    }

    #[test]
    fn test_sanitize_class() {
        assert_eq!(sanitize_class("lazyload"), "lazyload");
        assert_eq!(sanitize_class("a%20b"), "ab");
        assert_eq!(sanitize_class("x\"><script>"), "xscript");
        assert_eq!(sanitize_class("ünï"), "n");
        assert_eq!(sanitize_class("!!!"), "");
    }
}
