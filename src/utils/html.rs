//! HTML utility functions.
//!
//! - `escape_attr()` - attribute value escaping that keeps existing entities intact
//! - `is_entity_at()` - character/named reference detection

use std::borrow::Cow;

// =============================================================================
// Attribute Escaping
// =============================================================================

/// Characters that require escaping inside a double-quoted attribute value.
const ESCAPE_CHARS: [char; 5] = ['<', '>', '&', '"', '\''];

/// Get the HTML entity for a special character.
#[inline]
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#039;"),
        _ => None,
    }
}

/// Escape an attribute value without double-encoding.
///
/// Values pulled out of existing markup are still entity-encoded (`a.jpg?x=1&amp;y=2`),
/// so an `&` that already starts a valid reference is written through as-is.
///
/// # Example
/// ```ignore
/// assert_eq!(escape_attr("a\"b"), "a&quot;b");
/// assert_eq!(escape_attr("x&amp;y"), "x&amp;y"); // No allocation
/// ```
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    if !s.contains(ESCAPE_CHARS) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 8);
    let mut changed = false;
    for (i, c) in s.char_indices() {
        if c == '&' && is_entity_at(s, i) {
            result.push('&');
            continue;
        }
        match escape_char(c) {
            Some(entity) => {
                changed = true;
                result.push_str(entity);
            }
            None => result.push(c),
        }
    }

    if changed {
        Cow::Owned(result)
    } else {
        Cow::Borrowed(s)
    }
}

/// Check whether `s[at..]` starts with a complete character or named reference.
///
/// Accepts `&name;`, `&#123;` and `&#x1F;` forms.
pub fn is_entity_at(s: &str, at: usize) -> bool {
    let Some(rest) = s.get(at..).and_then(|r| r.strip_prefix('&')) else {
        return false;
    };
    let Some(end) = rest.find(';') else {
        return false;
    };
    let body = &rest[..end];
    if body.is_empty() || body.len() > 32 {
        return false;
    }

    if let Some(num) = body.strip_prefix('#') {
        if let Some(hex) = num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            return !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit());
        }
        return !num.is_empty() && num.chars().all(|c| c.is_ascii_digit());
    }

    let mut chars = body.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_attr_plain() {
        assert!(matches!(escape_attr("a.jpg"), Cow::Borrowed(_)));
        assert_eq!(escape_attr(""), "");
    }

    #[test]
    fn test_escape_attr_special_chars() {
        assert_eq!(escape_attr("<b>"), "&lt;b&gt;");
        assert_eq!(escape_attr("say \"hi\""), "say &quot;hi&quot;");
        assert_eq!(escape_attr("it's"), "it&#039;s");
        assert_eq!(escape_attr("a & b"), "a &amp; b");
    }

    #[test]
    fn test_escape_attr_keeps_entities() {
        assert_eq!(escape_attr("a.jpg?x=1&amp;y=2"), "a.jpg?x=1&amp;y=2");
        assert_eq!(escape_attr("&#039;&#x27;"), "&#039;&#x27;");
        assert!(matches!(escape_attr("x&amp;y"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_attr_bare_ampersand() {
        assert_eq!(escape_attr("a.jpg?x=1&y=2"), "a.jpg?x=1&amp;y=2");
        assert_eq!(escape_attr("&;"), "&amp;;");
        assert_eq!(escape_attr("&#;"), "&amp;#;");
    }

    #[test]
    fn test_is_entity_at() {
        assert!(is_entity_at("&lt;", 0));
        assert!(is_entity_at("x&#65;", 1));
        assert!(is_entity_at("&#x1f;", 0));
        assert!(!is_entity_at("&#xZZ;", 0));
        assert!(!is_entity_at("& amp;", 0));
        assert!(!is_entity_at("&amp", 0));
        assert!(!is_entity_at("abc", 0));
    }
}
