//! Content rewriter.
//!
//! Runs matcher → parser → transformer over a fragment and splices the new
//! attribute list into each changed tag. Everything outside a changed tag's
//! attribute span is copied through byte for byte, including the tag name,
//! the self-closing slash and whitespace before it. Unchanged tags keep their
//! original text, attribute order and quoting.

use std::borrow::Cow;

use super::hooks::LazyLoadHooks;
use super::matcher::TagMatcher;
use super::{ImageSize, Transformer, parse_attributes};
use crate::config::LazyLoadOptions;
use crate::debug;

/// Rewrites HTML fragments with a fixed option set and hooks.
pub struct Rewriter<'a> {
    transformer: Transformer<'a>,
}

impl<'a> Rewriter<'a> {
    pub fn new(options: &'a LazyLoadOptions) -> Self {
        Self {
            transformer: Transformer::new(options),
        }
    }

    pub fn with_hooks(options: &'a LazyLoadOptions, hooks: &'a dyn LazyLoadHooks) -> Self {
        Self {
            transformer: Transformer::with_hooks(options, hooks),
        }
    }

    pub fn transformer(&self) -> &Transformer<'a> {
        &self.transformer
    }

    /// Rewrite every tag `matcher` finds in `html`.
    ///
    /// Returns the input borrowed when no tag changed.
    pub fn rewrite<'h>(
        &self,
        html: &'h str,
        matcher: &TagMatcher,
        attachment_id: Option<u64>,
        size: Option<&ImageSize>,
    ) -> Cow<'h, str> {
        let mut out: Option<String> = None;
        let mut last = 0;
        let mut seen = 0usize;
        let mut changed = 0usize;

        for tag in matcher.find_iter(html) {
            seen += 1;
            let attrs = parse_attributes(tag.attrs);
            let new_attrs = self
                .transformer
                .transform(&attrs, tag.name, attachment_id, size);
            if new_attrs == attrs {
                continue;
            }

            changed += 1;
            let buf = out.get_or_insert_with(|| String::with_capacity(html.len() + 256));
            let span = tag.attrs_range.clone();
            buf.push_str(&html[last..span.start]);
            buf.push_str(&new_attrs.to_attr_string());
            // Keep the whitespace that separated the list from `/>` or `>`
            let trailing = tag.attrs.len() - tag.attrs.trim_ascii_end().len();
            buf.push_str(&html[span.end - trailing..span.end]);
            last = span.end;
        }

        debug!("rewrite"; "{} of {} tags deferred", changed, seen);

        match out {
            Some(mut buf) => {
                buf.push_str(&html[last..]);
                Cow::Owned(buf)
            }
            None => Cow::Borrowed(html),
        }
    }

    /// Rewrite with a matcher built from `tag_names`; unusable names leave `html` unchanged.
    pub fn rewrite_tags<'h, S: AsRef<str>>(
        &self,
        html: &'h str,
        tag_names: &[S],
        attachment_id: Option<u64>,
        size: Option<&ImageSize>,
    ) -> Cow<'h, str> {
        match TagMatcher::new(tag_names) {
            Some(matcher) => self.rewrite(html, &matcher, attachment_id, size),
            None => Cow::Borrowed(html),
        }
    }
}

/// Rewrite `html` for `tag_names` with `options` and no hooks.
pub fn rewrite<'h, S: AsRef<str>>(
    html: &'h str,
    tag_names: &[S],
    attachment_id: Option<u64>,
    size: Option<&ImageSize>,
    options: &LazyLoadOptions,
) -> Cow<'h, str> {
    Rewriter::new(options).rewrite_tags(html, tag_names, attachment_id, size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewrite::placeholder::TRANSPARENT_PIXEL;

    #[test]
    fn test_unchanged_input_is_borrowed() {
        let options = LazyLoadOptions::default();
        let html = r#"<p>text <img class="x" alt='a'> <a href="/">link</a></p>"#;
        assert!(matches!(rewrite(html, &["img"], None, None, &options), Cow::Borrowed(_)));
    }

    #[test]
    fn test_splices_only_the_attribute_span() {
        let options = LazyLoadOptions::default();
        let html = r#"<p>before<IMG src='a.jpg'  />after</p>"#;
        let out = rewrite(html, &["img"], None, None, &options);
        assert_eq!(
            out,
            format!(
                r#"<p>before<IMG src="{TRANSPARENT_PIXEL}" data-src="a.jpg" class="lazyload"  />after</p>"#
            )
        );
    }

    #[test]
    fn test_multiple_tags_mixed() {
        let options = LazyLoadOptions::default();
        let html = r#"<img src="a.jpg"><br><img alt="no source"><iframe src="v"></iframe>"#;
        let out = rewrite(html, &["img", "iframe"], None, None, &options);
        assert_eq!(
            out,
            format!(
                concat!(
                    r#"<img src="{px}" data-src="a.jpg" class="lazyload"><br><img alt="no source">"#,
                    r#"<iframe src="about:blank" data-src="v" class="lazyload"></iframe>"#
                ),
                px = TRANSPARENT_PIXEL
            )
        );
    }

    #[test]
    fn test_unusable_tag_names_leave_input() {
        let options = LazyLoadOptions::default();
        let html = r#"<img src="a.jpg">"#;
        let names: [&str; 0] = [];
        assert_eq!(rewrite(html, &names, None, None, &options), html);
        assert_eq!(rewrite(html, &["<bad>"], None, None, &options), html);
    }

    #[test]
    fn test_unicode_space_stays_in_the_value() {
        let options = LazyLoadOptions::default();
        let html = "<img src=a.jpg\u{a0}>";
        assert_eq!(
            rewrite(html, &["img"], None, None, &options),
            format!("<img src=\"{TRANSPARENT_PIXEL}\" data-src=\"a.jpg\u{a0}\" class=\"lazyload\">")
        );

        let spaced = "<img src=a.jpg \t/>";
        assert!(rewrite(spaced, &["img"], None, None, &options).ends_with("class=\"lazyload\" \t/>"));
    }

    #[test]
    fn test_explicit_identity_is_passed() {
        let options = LazyLoadOptions {
            aspectratio: true,
            ..Default::default()
        };
        let size = ImageSize::square(48);
        let html = r#"<img src="a.jpg" width="48" height="48">"#;
        let out = rewrite(html, &["img"], Some(3), Some(&size), &options);
        assert!(out.contains(r#"data-aspectratio="48/48""#));
    }
}
