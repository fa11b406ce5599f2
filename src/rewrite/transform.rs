//! Attribute transformer.
//!
//! Decides whether a tag gets lazy loaded and computes its new attributes:
//!
//! 1. pass-through for tags that are already deferred (aspect ratio backfill only)
//!    or carry a foreign placeholder marker
//! 2. skip tags with an excluded class
//! 3. infer attachment id/size from classes when the caller did not pass them
//! 4. ask the veto hook
//! 5. move `srcset` (preferred) or `src` into its `data-` twin and put a placeholder in
//! 6. aspect ratio, native loading and the trigger class for deferred tags
//! 7. write the sanitized class list back (an empty list adds no `class`)
//! 8. hand the result to the attribute filter hook

use rustc_hash::FxHashSet;

use super::class::{ClassList, sanitize_class};
use super::hooks::{LazyLoadHooks, NoHooks, TagContext};
use super::{AttributeMap, ImageSize, TagCategory};
use crate::config::LazyLoadOptions;

const DATA_SRC: &str = "data-src";
const DATA_SRCSET: &str = "data-srcset";
const DATA_SIZES: &str = "data-sizes";
const DATA_ASPECTRATIO: &str = "data-aspectratio";
/// Blurred-preview plugin marker; such tags are handled by that plugin.
const GAUSSHOLDER: &str = "data-gaussholder";

/// Computes lazy-load attributes for single tags.
///
/// Holds read-only options and hooks; one instance serves any number of tags.
pub struct Transformer<'a> {
    options: &'a LazyLoadOptions,
    hooks: &'a dyn LazyLoadHooks,
    skip_classes: FxHashSet<&'a str>,
}

impl<'a> Transformer<'a> {
    pub fn new(options: &'a LazyLoadOptions) -> Self {
        Self::with_hooks(options, &NoHooks)
    }

    pub fn with_hooks(options: &'a LazyLoadOptions, hooks: &'a dyn LazyLoadHooks) -> Self {
        Self {
            options,
            hooks,
            skip_classes: options.skip_classes(),
        }
    }

    pub fn options(&self) -> &LazyLoadOptions {
        self.options
    }

    /// Compute the attributes for one tag.
    ///
    /// An explicit `attachment_id`/`size` takes precedence over class hints.
    /// The returned map equals `attrs` whenever the tag is left alone.
    pub fn transform(
        &self,
        attrs: &AttributeMap,
        tag_name: &str,
        attachment_id: Option<u64>,
        size: Option<&ImageSize>,
    ) -> AttributeMap {
        if attrs.contains(GAUSSHOLDER) {
            return attrs.clone();
        }
        if attrs.contains(DATA_SRCSET) || attrs.contains(DATA_SRC) {
            let mut out = attrs.clone();
            self.set_aspect_ratio(&mut out);
            return out;
        }

        let mut classes = ClassList::parse(attrs.get("class").unwrap_or_default());
        if classes.intersects(&self.skip_classes) {
            return attrs.clone();
        }

        let tag_name = tag_name.to_ascii_lowercase();
        let ctx = TagContext {
            tag_name: &tag_name,
            category: TagCategory::of(&tag_name),
            attachment_id: attachment_id.filter(|&id| id != 0).or_else(|| classes.attachment_id()),
            size: size.cloned().or_else(|| classes.size()),
        };

        if !self.hooks.should_lazy_load(attrs, &ctx) {
            return attrs.clone();
        }

        let mut out = attrs.clone();
        if !self.defer_source(&mut out, &ctx) {
            return attrs.clone();
        }

        self.set_aspect_ratio(&mut out);
        self.set_native_loading(&mut out);

        let trigger = sanitize_class(&self.hooks.trigger_class(&self.options.lazy_class, &ctx));
        classes.push(&trigger);
        let class = classes.to_attr_value();
        if !class.is_empty() || out.contains("class") {
            out.set("class", class);
        }

        self.hooks.filter_attributes(out, &ctx)
    }

    /// Move `srcset` or `src` to its deferred twin. Returns whether anything moved.
    fn defer_source(&self, attrs: &mut AttributeMap, ctx: &TagContext<'_>) -> bool {
        let placeholder = self.placeholder(ctx);

        if let Some(srcset) = attrs.get_non_empty("srcset").map(str::to_string) {
            attrs.set(DATA_SRCSET, srcset);
            attrs.set("srcset", placeholder);
            if self.options.data_sizes {
                attrs.set(DATA_SIZES, "auto");
                attrs.remove("sizes");
            }
            return true;
        }

        if let Some(src) = attrs.get_non_empty("src").map(str::to_string) {
            attrs.set(DATA_SRC, src);
            attrs.set("src", placeholder);
            // `sizes` without `srcset` is dead weight
            attrs.remove("sizes");
            return true;
        }

        false
    }

    fn placeholder(&self, ctx: &TagContext<'_>) -> String {
        let default = ctx.category.placeholder();
        let placeholder = self.hooks.placeholder(default, ctx);
        if placeholder.trim().is_empty() {
            default.to_string()
        } else {
            placeholder
        }
    }

    /// Add `data-aspectratio="w/h"` when enabled, absent, and both dimensions are non-zero.
    fn set_aspect_ratio(&self, attrs: &mut AttributeMap) {
        if !self.options.aspectratio || attrs.contains(DATA_ASPECTRATIO) {
            return;
        }
        let width = attrs.get("width").map_or(0, parse_dimension);
        let height = attrs.get("height").map_or(0, parse_dimension);
        if width != 0 && height != 0 {
            attrs.set(DATA_ASPECTRATIO, format!("{width}/{height}"));
        }
    }

    fn set_native_loading(&self, attrs: &mut AttributeMap) {
        if self.options.native_loading {
            attrs.set("loading", "lazy");
        } else {
            attrs.remove("loading");
        }
    }
}

/// Parse a width/height value as a non-negative integer.
///
/// Leading digits count (`"100px"` is 100), the sign is dropped, anything else is 0.
pub fn parse_dimension(value: &str) -> u64 {
    let value = value.trim();
    let value = value
        .strip_prefix('-')
        .or_else(|| value.strip_prefix('+'))
        .unwrap_or(value);
    let digits = value
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(value, |(i, _)| &value[..i]);
    digits.parse().unwrap_or(0)
}
