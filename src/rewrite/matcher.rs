//! Tag matcher.
//!
//! Finds opening tags (`<img ...>`, `<iframe ... />`) for a set of tag names
//! without building a tree. The attribute span is matched with an unrolled
//! loop:
//!
//! ```text
//! <WS*(names)            opening bracket and tag name
//! (                      2: attribute span
//!   (?:WS[^>/]*)?         normal*   (must start with whitespace: `<imgx>` is not `<img>`)
//!   (?:/+[^>/]+)*        (special normal+)*   slashes not directly before `>`
//! )
//! (/*)>                  3: self-closing slash and closing bracket
//! ```
//!
//! `WS` is ASCII whitespace as HTML defines it (`[\t\n\x0C\r ]`), the same
//! set the attribute parser splits on.
//!
//! Every iteration consumes at least one byte and the alternatives never
//! overlap, and the regex engine is automaton based, so matching stays
//! linear in the input even on adversarial markup.

use regex::Regex;
use std::ops::Range;

/// HTML whitespace; `\s` would also take Unicode spaces the attribute parser keeps in values.
const WS: &str = r"[\t\n\x0C\r ]";

/// A located opening tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMatch<'h> {
    /// Full tag text, `<` to `>`.
    pub full: &'h str,
    /// Tag name as written in the source.
    pub name: &'h str,
    /// Raw attribute list between the tag name and the closing `>`/`/>`.
    pub attrs: &'h str,
    /// Byte range of `full` in the haystack.
    pub range: Range<usize>,
    /// Byte range of `attrs` in the haystack.
    pub attrs_range: Range<usize>,
}

impl TagMatch<'_> {
    pub fn start(&self) -> usize {
        self.range.start
    }

    pub fn end(&self) -> usize {
        self.range.end
    }
}

/// Compiled matcher for a fixed set of tag names.
#[derive(Debug, Clone)]
pub struct TagMatcher {
    regex: Regex,
    names: Vec<String>,
}

impl TagMatcher {
    /// Build a matcher. Returns `None` when no usable tag name is given.
    ///
    /// Names are lowercased and deduplicated; names outside `[A-Za-z][A-Za-z0-9-]*` are dropped.
    pub fn new<S: AsRef<str>>(tag_names: &[S]) -> Option<Self> {
        let mut names: Vec<String> = Vec::with_capacity(tag_names.len());
        for name in tag_names {
            let name = name.as_ref().trim().to_ascii_lowercase();
            if is_tag_name(&name) && !names.contains(&name) {
                names.push(name);
            }
        }
        if names.is_empty() {
            return None;
        }

        let regex = Regex::new(&tag_pattern(&names)).ok()?;
        Some(Self { regex, names })
    }

    /// Tag names this matcher looks for.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Iterate over matched tags left to right, non-overlapping.
    pub fn find_iter<'m, 'h>(&'m self, html: &'h str) -> impl Iterator<Item = TagMatch<'h>> + 'm
    where
        'h: 'm,
    {
        self.regex.captures_iter(html).filter_map(|caps| {
            let full = caps.get(0)?;
            let name = caps.get(1)?;
            let attrs = caps.get(2)?;
            Some(TagMatch {
                full: full.as_str(),
                name: name.as_str(),
                attrs: attrs.as_str(),
                range: full.range(),
                attrs_range: attrs.range(),
            })
        })
    }

    /// Whether `html` contains at least one matching tag.
    pub fn is_match(&self, html: &str) -> bool {
        self.regex.is_match(html)
    }
}

/// Regex source for the given (already validated) tag names.
pub fn tag_pattern<S: AsRef<str>>(names: &[S]) -> String {
    let alternation = names
        .iter()
        .map(|n| regex::escape(n.as_ref()))
        .collect::<Vec<_>>()
        .join("|");

    let mut pattern = String::with_capacity(64 + alternation.len());
    pattern.push_str("(?i)<"); // Opening bracket
    pattern.push_str(WS);
    pattern.push('*');
    pattern.push('(');
    pattern.push_str(&alternation); // 1: tag name
    pattern.push(')');
    pattern.push('('); // 2: attribute span
    pattern.push_str("(?:");
    pattern.push_str(WS);
    pattern.push_str("[^>/]*)?"); // not a closing bracket or slash
    pattern.push_str(r"(?:/+[^>/]+)*"); // slashes not followed by a closing bracket
    pattern.push(')');
    pattern.push_str(r"(/*)>"); // self-closing tag
    pattern
}

fn is_tag_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn spans(matcher: &TagMatcher, html: &str) -> Vec<(String, String)> {
        matcher
            .find_iter(html)
            .map(|m| (m.name.to_string(), m.attrs.to_string()))
            .collect()
    }

    #[test]
    fn test_new_rejects_unusable_names() {
        assert!(TagMatcher::new::<&str>(&[]).is_none());
        assert!(TagMatcher::new(&["", "im g", "<x>"]).is_none());
        let matcher = TagMatcher::new(&["IMG", "img", "iframe"]).unwrap();
        assert_eq!(matcher.names(), &["img".to_string(), "iframe".to_string()]);
    }

    #[test]
    fn test_basic_and_self_closing() {
        let matcher = TagMatcher::new(&["img"]).unwrap();
        let html = r#"<p><img src="a.jpg"><img src="b.jpg" /><img/></p>"#;
        assert_eq!(
            spans(&matcher, html),
            vec![
                ("img".to_string(), r#" src="a.jpg""#.to_string()),
                ("img".to_string(), r#" src="b.jpg" "#.to_string()),
                ("img".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_offsets() {
        let matcher = TagMatcher::new(&["img"]).unwrap();
        let html = r#"ab<img src="x">cd"#;
        let m = matcher.find_iter(html).next().unwrap();
        assert_eq!(m.start(), 2);
        assert_eq!(m.end(), html.len() - 2);
        assert_eq!(&html[m.range.clone()], m.full);
        assert_eq!(&html[m.attrs_range.clone()], r#" src="x""#);
    }

    #[test]
    fn test_slashes_inside_values() {
        let matcher = TagMatcher::new(&["img"]).unwrap();
        let html = r#"<img src="https://x.test/a/b.jpg"/>"#;
        assert_eq!(
            spans(&matcher, html),
            vec![("img".to_string(), r#" src="https://x.test/a/b.jpg""#.to_string())]
        );

        let unquoted = "<img src=a/b.jpg>";
        assert_eq!(spans(&matcher, unquoted)[0].1, " src=a/b.jpg");
    }

    #[test]
    fn test_alternation_and_case() {
        let matcher = TagMatcher::new(&["img", "iframe"]).unwrap();
        let html = r#"<IMG SRC="a"><iframe src="b"></iframe>< img src="c">"#;
        let names: Vec<_> = matcher.find_iter(html).map(|m| m.name).collect();
        assert_eq!(names, vec!["IMG", "iframe", "img"]);
    }

    #[test]
    fn test_requires_tag_name_boundary() {
        let matcher = TagMatcher::new(&["img"]).unwrap();
        assert!(!matcher.is_match("<imgx src=a>"));
        assert!(!matcher.is_match("<img-box src=a>"));
        assert!(!matcher.is_match("</img>"));
        assert!(matcher.is_match("<img\nsrc=a>"));
    }

    #[test]
    fn test_only_html_whitespace_separates_attributes() {
        let matcher = TagMatcher::new(&["img"]).unwrap();
        assert!(!matcher.is_match("<img\u{a0}src=a>"));
        assert!(matcher.is_match("<img\x0Csrc=a>"));
        let html = "<img src=a.jpg\u{a0}>";
        assert_eq!(spans(&matcher, html)[0].1, " src=a.jpg\u{a0}");
    }

    #[test]
    fn test_unclosed_tag_is_skipped() {
        let matcher = TagMatcher::new(&["img"]).unwrap();
        assert!(matcher.find_iter(r#"<img src="a.jpg""#).next().is_none());
    }

    fn adversarial(units: usize) -> String {
        let mut html = String::from("<img ");
        html.push_str(&"a/ /b//".repeat(units * 2));
        html.push_str(&"<img /".repeat(units));
        html
    }

    /// Fastest of three full scans.
    fn best_scan_time(matcher: &TagMatcher, html: &str) -> Duration {
        (0..3)
            .map(|_| {
                let start = Instant::now();
                assert_eq!(matcher.find_iter(html).count(), 0);
                start.elapsed()
            })
            .min()
            .unwrap()
    }

    #[test]
    fn test_adversarial_input_is_linear() {
        let matcher = TagMatcher::new(&["img", "iframe"]).unwrap();
        let small = best_scan_time(&matcher, &adversarial(5_000));
        let large = best_scan_time(&matcher, &adversarial(20_000));
        // 4x the input: linear stays near 4x, quadratic would be 16x
        assert!(
            large < small * 10 + Duration::from_millis(50),
            "{small:?} -> {large:?}"
        );
    }
}
