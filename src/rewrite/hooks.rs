//! Extension points consulted by the transformer.
//!
//! Implement [`LazyLoadHooks`] to veto single tags, swap placeholders or the
//! trigger class, or post-process the final attributes. Every method has a
//! pass-through default, so implementors override only what they need.
//! [`FnHooks`] wires closures in without a dedicated type.

use super::{AttributeMap, ImageSize, TagCategory};

/// What the transformer knows about the tag being processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagContext<'a> {
    /// Lowercased tag name.
    pub tag_name: &'a str,
    pub category: TagCategory,
    /// Attachment id, explicit or inferred from `wp-image-<id>`.
    pub attachment_id: Option<u64>,
    /// Attachment size, explicit or inferred from `size-<name>`.
    pub size: Option<ImageSize>,
}

/// Strategy interface for customizing lazy loading.
///
/// Hooks receive shared references; a returned value replaces the default.
pub trait LazyLoadHooks {
    /// Return `false` to leave this tag untouched.
    fn should_lazy_load(&self, _attrs: &AttributeMap, _ctx: &TagContext<'_>) -> bool {
        true
    }

    /// Placeholder for `src`/`srcset`. An empty return keeps `default`.
    fn placeholder(&self, default: &str, _ctx: &TagContext<'_>) -> String {
        default.to_string()
    }

    /// Trigger class appended to deferred tags. An empty return (after sanitizing) adds nothing.
    fn trigger_class(&self, default: &str, _ctx: &TagContext<'_>) -> String {
        default.to_string()
    }

    /// Final say over the attributes of a deferred tag.
    fn filter_attributes(&self, attrs: AttributeMap, _ctx: &TagContext<'_>) -> AttributeMap {
        attrs
    }
}

/// Hooks that change nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl LazyLoadHooks for NoHooks {}

type VetoFn = dyn Fn(&AttributeMap, &TagContext<'_>) -> bool;
type StringFn = dyn Fn(&str, &TagContext<'_>) -> String;
type FilterFn = dyn Fn(AttributeMap, &TagContext<'_>) -> AttributeMap;

/// Closure-backed hooks.
///
/// ```ignore
/// let hooks = FnHooks::new()
///     .on_veto(|attrs, _| !attrs.contains("data-no-lazy"))
///     .on_placeholder(|_, ctx| format!("/thumbs/{}.jpg", ctx.attachment_id.unwrap_or(0)));
/// ```
#[derive(Default)]
pub struct FnHooks {
    veto: Option<Box<VetoFn>>,
    placeholder: Option<Box<StringFn>>,
    trigger_class: Option<Box<StringFn>>,
    filter: Option<Box<FilterFn>>,
}

impl FnHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_veto(mut self, f: impl Fn(&AttributeMap, &TagContext<'_>) -> bool + 'static) -> Self {
        self.veto = Some(Box::new(f));
        self
    }

    pub fn on_placeholder(mut self, f: impl Fn(&str, &TagContext<'_>) -> String + 'static) -> Self {
        self.placeholder = Some(Box::new(f));
        self
    }

    pub fn on_trigger_class(mut self, f: impl Fn(&str, &TagContext<'_>) -> String + 'static) -> Self {
        self.trigger_class = Some(Box::new(f));
        self
    }

    pub fn on_filter(
        mut self,
        f: impl Fn(AttributeMap, &TagContext<'_>) -> AttributeMap + 'static,
    ) -> Self {
        self.filter = Some(Box::new(f));
        self
    }
}

impl LazyLoadHooks for FnHooks {
    fn should_lazy_load(&self, attrs: &AttributeMap, ctx: &TagContext<'_>) -> bool {
        self.veto.as_ref().is_none_or(|f| f(attrs, ctx))
    }

    fn placeholder(&self, default: &str, ctx: &TagContext<'_>) -> String {
        match &self.placeholder {
            Some(f) => f(default, ctx),
            None => default.to_string(),
        }
    }

    fn trigger_class(&self, default: &str, ctx: &TagContext<'_>) -> String {
        match &self.trigger_class {
            Some(f) => f(default, ctx),
            None => default.to_string(),
        }
    }

    fn filter_attributes(&self, attrs: AttributeMap, ctx: &TagContext<'_>) -> AttributeMap {
        match &self.filter {
            Some(f) => f(attrs, ctx),
            None => attrs,
        }
    }
}

impl std::fmt::Debug for FnHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnHooks")
            .field("veto", &self.veto.is_some())
            .field("placeholder", &self.placeholder.is_some())
            .field("trigger_class", &self.trigger_class.is_some())
            .field("filter", &self.filter.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> TagContext<'static> {
        TagContext {
            tag_name: "img",
            category: TagCategory::Image,
            attachment_id: Some(3),
            size: None,
        }
    }

    #[test]
    fn test_no_hooks_pass_through() {
        let attrs = AttributeMap::from_pairs([("src", "a.jpg")]);
        assert!(NoHooks.should_lazy_load(&attrs, &ctx()));
        assert_eq!(NoHooks.placeholder("p", &ctx()), "p");
        assert_eq!(NoHooks.trigger_class("lazyload", &ctx()), "lazyload");
        assert_eq!(NoHooks.filter_attributes(attrs.clone(), &ctx()), attrs);
    }

    #[test]
    fn test_fn_hooks_override() {
        let hooks = FnHooks::new()
            .on_veto(|attrs, _| !attrs.contains("data-no-lazy"))
            .on_placeholder(|_, ctx| format!("thumb-{}", ctx.attachment_id.unwrap_or(0)))
            .on_trigger_class(|default, _| format!("{default}-x"));

        let plain = AttributeMap::from_pairs([("src", "a.jpg")]);
        let opted_out = AttributeMap::from_pairs([("src", "a.jpg"), ("data-no-lazy", "")]);
        assert!(hooks.should_lazy_load(&plain, &ctx()));
        assert!(!hooks.should_lazy_load(&opted_out, &ctx()));
        assert_eq!(hooks.placeholder("p", &ctx()), "thumb-3");
        assert_eq!(hooks.trigger_class("lazyload", &ctx()), "lazyload-x");
        assert_eq!(hooks.filter_attributes(plain.clone(), &ctx()), plain);
    }
}
