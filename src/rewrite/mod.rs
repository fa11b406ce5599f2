//! Lazy-load rewriting engine.
//!
//! Data flows one way:
//!
//! ```text
//! html ──► matcher ──► attrs ──► transform ──► content (splice) ──► html'
//!          TagMatch    AttributeMap  AttributeMap
//! ```
//!
//! # Modules
//!
//! - `matcher`: locates opening tags for a set of tag names
//! - `attrs`: ordered attribute map and the attribute-list parser
//! - `transform`: decides whether to defer a tag and computes its new attributes
//! - `content`: drives the above over a fragment and splices changed tags back
//! - `hooks`: extension points (veto, placeholder, trigger class, final filter)
//! - `class`: class-list tokenizing, identity hints and sanitizing
//! - `placeholder`: tag categories and their placeholders

pub mod attrs;
pub mod class;
mod content;
pub mod hooks;
pub mod matcher;
pub mod placeholder;
mod transform;


pub use attrs::{AttrKey, AttributeMap, parse_attributes};
pub use class::ClassList;
pub use content::{Rewriter, rewrite};
pub use hooks::{FnHooks, LazyLoadHooks, NoHooks, TagContext};
pub use matcher::{TagMatch, TagMatcher};
pub use placeholder::TagCategory;
pub use transform::Transformer;

use std::fmt;
use std::str::FromStr;

/// Requested size of an attachment image.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImageSize {
    /// Registered size name (`thumbnail`, `large`, ...).
    Named(String),
    /// Explicit width and height in pixels.
    Dimensions { width: u32, height: u32 },
}

impl ImageSize {
    /// Square size, as used for avatars.
    pub const fn square(side: u32) -> Self {
        Self::Dimensions {
            width: side,
            height: side,
        }
    }
}

impl FromStr for ImageSize {
    type Err = String;

    /// `WxH` parses as dimensions, anything else as a size name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("image size must not be empty".to_string());
        }
        if let Some((w, h)) = s.split_once(['x', 'X'])
            && let (Ok(width), Ok(height)) = (w.parse(), h.parse())
        {
            return Ok(Self::Dimensions { width, height });
        }
        Ok(Self::Named(s.to_string()))
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::Dimensions { width, height } => write!(f, "{width}x{height}"),
        }
    }
}
