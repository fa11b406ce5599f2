//! Content filters: where rendered markup enters the rewriter.
//!
//! Each filter corresponds to one kind of markup the platform renders
//! (post content, widgets, avatars, attachment images, image blocks) and
//! decides, from the options, whether and for which tags to run the
//! rewriter. All of them return the input untouched when the
//! [`RequestContext`] says this request must not be processed.
//!
//! # Example
//!
//! ```ignore
//! let options = LazyLoadOptions::default();
//! let lazy = LazyLoad::new(&options, RequestContext::default());
//! let html = lazy.filter_post_content(r#"<p><img src="a.jpg"></p>"#);
//! ```

mod request;

pub use request::RequestContext;

use serde::Deserialize;
use std::borrow::Cow;

use crate::config::LazyLoadOptions;
use crate::debug;
use crate::rewrite::{AttributeMap, ImageSize, LazyLoadHooks, NoHooks, Rewriter, TagMatcher};

/// Attributes the host's HTML sanitizer must keep on `img`/`iframe` for lazy loading to work.
pub const LAZYLOAD_ATTRIBUTES: &[&str] = &[
    "class",
    "data-aspectratio",
    "data-src",
    "data-srcset",
    "data-sizes",
    "loading",
];

/// Block name whose markup is an attachment image.
const IMAGE_BLOCK: &str = "core/image";

/// A rendered content block, as the block renderer describes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Block {
    #[serde(rename = "blockName")]
    pub name: Option<String>,
    #[serde(default)]
    pub attrs: BlockAttrs,
}

/// The block attributes relevant to lazy loading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BlockAttrs {
    pub id: Option<u64>,
    #[serde(rename = "sizeSlug")]
    pub size_slug: Option<String>,
}

/// Entry points for every kind of rendered markup.
///
/// Matchers are compiled once, from the options, when the filter set is created.
pub struct LazyLoad<'a> {
    options: &'a LazyLoadOptions,
    request: RequestContext,
    rewriter: Rewriter<'a>,
    image: Option<TagMatcher>,
    content: Option<TagMatcher>,
    widget: Option<TagMatcher>,
}

impl<'a> LazyLoad<'a> {
    pub fn new(options: &'a LazyLoadOptions, request: RequestContext) -> Self {
        Self::with_hooks(options, request, &NoHooks)
    }

    pub fn with_hooks(
        options: &'a LazyLoadOptions,
        request: RequestContext,
        hooks: &'a dyn LazyLoadHooks,
    ) -> Self {
        Self {
            options,
            request,
            rewriter: Rewriter::with_hooks(options, hooks),
            image: TagMatcher::new(&["img"]),
            content: TagMatcher::new(&options.content_tag_names()),
            widget: TagMatcher::new(&options.widget_tag_names()),
        }
    }

    /// Whether this request is skipped entirely.
    pub fn is_exit(&self) -> bool {
        self.request.should_skip()
    }

    /// Post content: `img` when `content_imgs`, embeds when `embed`.
    pub fn filter_post_content<'h>(&self, html: &'h str) -> Cow<'h, str> {
        self.run("content", html, self.content.as_ref(), None, None)
    }

    /// Widget content: only when `widgets`; `img`, plus embeds when `embed`.
    pub fn filter_widget<'h>(&self, html: &'h str) -> Cow<'h, str> {
        self.run("widget", html, self.widget.as_ref(), None, None)
    }

    /// Avatar markup, `size` being the square side in pixels.
    pub fn filter_avatar_html<'h>(&self, html: &'h str, size: Option<u32>) -> Cow<'h, str> {
        if !self.options.avatars {
            return Cow::Borrowed(html);
        }
        let size = size.map(ImageSize::square);
        self.run("avatar", html, self.image.as_ref(), None, size.as_ref())
    }

    /// Markup of an attachment image inserted into content.
    pub fn filter_get_image_tag<'h>(
        &self,
        html: &'h str,
        id: Option<u64>,
        size: Option<&ImageSize>,
    ) -> Cow<'h, str> {
        if !self.options.attachments {
            return Cow::Borrowed(html);
        }
        self.run("image", html, self.image.as_ref(), id, size)
    }

    /// Markup of a post thumbnail.
    pub fn filter_post_thumbnail_html<'h>(
        &self,
        html: &'h str,
        attachment_id: Option<u64>,
        size: Option<&ImageSize>,
    ) -> Cow<'h, str> {
        if !self.options.attachments {
            return Cow::Borrowed(html);
        }
        self.run("thumbnail", html, self.image.as_ref(), attachment_id, size)
    }

    /// Rendered block; only image blocks are processed, with the block's id and size slug.
    pub fn filter_block<'h>(&self, html: &'h str, block: &Block) -> Cow<'h, str> {
        if !self.options.attachments || block.name.as_deref() != Some(IMAGE_BLOCK) {
            return Cow::Borrowed(html);
        }
        let size = block.attrs.size_slug.clone().map(ImageSize::Named);
        self.run("block", html, self.image.as_ref(), block.attrs.id, size.as_ref())
    }

    /// Attribute list of an attachment image, before it is turned into markup.
    pub fn filter_attachment_attrs(
        &self,
        attrs: &AttributeMap,
        attachment_id: Option<u64>,
        size: Option<&ImageSize>,
    ) -> AttributeMap {
        if !self.options.attachments || self.is_exit() {
            return attrs.clone();
        }
        self.rewriter
            .transformer()
            .transform(attrs, "img", attachment_id, size)
    }

    fn run<'h>(
        &self,
        source: &str,
        html: &'h str,
        matcher: Option<&TagMatcher>,
        id: Option<u64>,
        size: Option<&ImageSize>,
    ) -> Cow<'h, str> {
        if self.is_exit() {
            return Cow::Borrowed(html);
        }
        let Some(matcher) = matcher else {
            debug!("filter"; "{}: no tags enabled", source);
            return Cow::Borrowed(html);
        };
        self.rewriter.rewrite(html, matcher, id, size)
    }
}
