//! Lazy loading rewriter for images and embeds in HTML fragments.
//!
//! Tags are located with a linear-time pattern, their attribute lists are
//! parsed into an ordered map and, when eligible, the real source moves to
//! `data-src`/`data-srcset` while a placeholder takes its place. Markup
//! outside rewritten tags is passed through untouched.

pub mod logger;

pub mod cli;
pub mod config;
pub mod filters;
pub mod rewrite;
pub mod utils;

pub use config::{ConfigError, LazyLoadOptions};
pub use filters::{LazyLoad, RequestContext};
pub use rewrite::{ImageSize, LazyLoadHooks, Rewriter, TagMatcher, rewrite};
