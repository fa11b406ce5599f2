//! Tag categories and their placeholders.

/// 1x1 transparent GIF.
pub const TRANSPARENT_PIXEL: &str =
    "data:image/gif;base64,R0lGODlhAQABAAAAACH5BAEKAAEALAAAAAABAAEAAAICTAEAOw==";

/// Inert document for frames; keeps the `src` valid.
pub const BLANK_FRAME: &str = "about:blank";

/// What kind of resource a tag loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagCategory {
    /// `img` and anything else rendering an image.
    Image,
    /// `iframe` and `frame`.
    Frame,
}

impl TagCategory {
    /// Categorize a tag name (case-insensitive).
    pub fn of(tag_name: &str) -> Self {
        if tag_name.eq_ignore_ascii_case("iframe") || tag_name.eq_ignore_ascii_case("frame") {
            Self::Frame
        } else {
            Self::Image
        }
    }

    /// Default placeholder substituted into `src`/`srcset`.
    pub const fn placeholder(self) -> &'static str {
        match self {
            Self::Image => TRANSPARENT_PIXEL,
            Self::Frame => BLANK_FRAME,
        }
    }
}
