//! Lazy-load option set.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── error      # ConfigError
//! ├── value      # Loose boolean decoding for stored options
//! └── mod.rs     # LazyLoadOptions (this file)
//! ```
//!
//! Options are read once per request and never mutated by the engine.
//! Two sources are supported: a `lazyload.toml` file and the JSON blob the
//! host platform stores its settings in.
//!
//! # Example
//!
//! ```toml
//! content_imgs = true
//! embed = true
//! skip_class_names = "no-lazy skip-me"
//! data-sizes = true
//! aspectratio = false
//! native-loading = false
//! placeholder-type = "spinner"
//! ```

mod error;
mod value;

pub use error::ConfigError;
pub use value::parse_flag;

use crate::log;
use crate::rewrite::class::sanitize_class;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use value::deserialize_flag;

/// Default options file name.
pub const DEFAULT_OPTIONS_FILE: &str = "lazyload.toml";

/// Default trigger class watched by the client-side loader.
pub const DEFAULT_LAZY_CLASS: &str = "lazyload";

/// Tag names treated as embeds.
pub const EMBED_TAG_NAMES: &[&str] = &["iframe"];

/// Loader extensions that can be switched on by an option of the same name.
const LOADER_PLUGINS: &[&str] = &["aspectratio", "native-loading", "object-fit", "parent-fit"];

const SPINNER_STYLE: &str = ".lazyloading{background-image:url(data:image/svg+xml;base64,PHN2ZyB4bWxucz0iaHR0cDovL3d3dy53My5vcmcvMjAwMC9zdmciIHZpZXdCb3g9IjAgMCA0MCA0MCI+PHBhdGggb3BhY2l0eT0iLjIiIGQ9Ik0yMC4yMDEgNS4xNjljLTguMjU0IDAtMTQuOTQ2IDYuNjkyLTE0Ljk0NiAxNC45NDYgMCA4LjI1NSA2LjY5MiAxNC45NDYgMTQuOTQ2IDE0Ljk0NnMxNC45NDYtNi42OTEgMTQuOTQ2LTE0Ljk0NmMtLjAwMS04LjI1NC02LjY5Mi0xNC45NDYtMTQuOTQ2LTE0Ljk0NnptMCAyNi41OGMtNi40MjUgMC0xMS42MzQtNS4yMDgtMTEuNjM0LTExLjYzNCAwLTYuNDI1IDUuMjA5LTExLjYzNCAxMS42MzQtMTEuNjM0IDYuNDI1IDAgMTEuNjMzIDUuMjA5IDExLjYzMyAxMS42MzQgMCA2LjQyNi01LjIwOCAxMS42MzQtMTEuNjMzIDExLjYzNHoiLz48cGF0aCBkPSJNMjYuMDEzIDEwLjA0N2wxLjY1NC0yLjg2NmExNC44NTUgMTQuODU1IDAgMDAtNy40NjYtMi4wMTJ2My4zMTJjMi4xMTkgMCA0LjEuNTc2IDUuODEyIDEuNTY2eiI+PGFuaW1hdGVUcmFuc2Zvcm0gYXR0cmlidXRlVHlwZT0ieG1sIiBhdHRyaWJ1dGVOYW1lPSJ0cmFuc2Zvcm0iIHR5cGU9InJvdGF0ZSIgZnJvbT0iMCAyMCAyMCIgdG89IjM2MCAyMCAyMCIgZHVyPSIxcyIgcmVwZWF0Q291bnQ9ImluZGVmaW5pdGUiLz48L3BhdGg+PC9zdmc+);background-position:center center;background-size:48px 48px;background-color:#fafafa;background-repeat:no-repeat}";

// ============================================================================
// LazyLoadOptions
// ============================================================================

/// The active option set, keyed by the platform's option ids.
///
/// Missing keys fall back to [`Default`], unknown keys are reported and ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LazyLoadOptions {
    /// Process attachment-rendered images (thumbnails, image tags, image blocks).
    #[serde(deserialize_with = "deserialize_flag")]
    pub attachments: bool,

    /// Scan `img` tags in post content.
    #[serde(deserialize_with = "deserialize_flag")]
    pub content_imgs: bool,

    /// Scan `img` tags in widget content.
    #[serde(deserialize_with = "deserialize_flag")]
    pub widgets: bool,

    /// Process avatar markup.
    #[serde(deserialize_with = "deserialize_flag")]
    pub avatars: bool,

    /// Scan embed tags (`iframe`) in post and widget content.
    #[serde(deserialize_with = "deserialize_flag")]
    pub embed: bool,

    /// Space separated CSS classes that exempt a tag from lazy loading.
    pub skip_class_names: String,

    /// Load the responsive-image polyfill (consumed by the asset layer).
    #[serde(deserialize_with = "deserialize_flag")]
    pub picturefill: bool,

    /// Replace `sizes` with `data-sizes="auto"` on `srcset` tags.
    #[serde(rename = "data-sizes", deserialize_with = "deserialize_flag")]
    pub data_sizes: bool,

    /// Placeholder look while loading (cosmetic, consumed by the style layer).
    #[serde(rename = "placeholder-type")]
    pub placeholder_type: PlaceholderType,

    /// Inject `data-aspectratio="w/h"` when both dimensions are known.
    #[serde(deserialize_with = "deserialize_flag")]
    pub aspectratio: bool,

    /// Set `loading="lazy"` on deferred tags (removed when off).
    #[serde(rename = "native-loading", deserialize_with = "deserialize_flag")]
    pub native_loading: bool,

    /// Loader `object-fit` extension.
    #[serde(rename = "object-fit", deserialize_with = "deserialize_flag")]
    pub object_fit: bool,

    /// Loader `parent-fit` extension.
    #[serde(rename = "parent-fit", deserialize_with = "deserialize_flag")]
    pub parent_fit: bool,

    /// Trigger class appended to deferred tags.
    pub lazy_class: String,
}

impl Default for LazyLoadOptions {
    fn default() -> Self {
        Self {
            attachments: true,
            content_imgs: true,
            widgets: true,
            avatars: true,
            embed: true,
            skip_class_names: String::new(),
            picturefill: true,
            data_sizes: true,
            placeholder_type: PlaceholderType::Transparent,
            aspectratio: false,
            native_loading: false,
            object_fit: false,
            parent_fit: false,
            lazy_class: DEFAULT_LAZY_CLASS.to_string(),
        }
    }
}

/// Placeholder look while an element is loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum PlaceholderType {
    /// Transparent pixel, no visual cue.
    #[default]
    Transparent,
    /// Animated spinner background on `.lazyloading`.
    Spinner,
}

impl From<String> for PlaceholderType {
    fn from(value: String) -> Self {
        if value.trim().eq_ignore_ascii_case("spinner") {
            Self::Spinner
        } else {
            Self::Transparent
        }
    }
}

impl LazyLoadOptions {
    /// Load options, falling back to defaults when `path` does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            crate::debug!("config"; "{} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::from_path(path)
    }

    /// Load options from a file. `.json` files are read as the platform's
    /// option blob, everything else as TOML.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let options = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_toml_str(&content)?
        };

        options.validate()?;
        Ok(options)
    }

    /// Parse options from TOML, reporting unknown keys.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let (options, ignored) = Self::parse_toml_with_ignored(content)?;
        Self::warn_unknown_fields(&ignored);
        Ok(options)
    }

    /// Parse options from a JSON object, reporting unknown keys.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let (options, ignored) = Self::parse_json_with_ignored(content)?;
        Self::warn_unknown_fields(&ignored);
        Ok(options)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_toml_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let options = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((options, ignored))
    }

    /// Parse JSON content, collecting any unknown fields.
    fn parse_json_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let mut deserializer = serde_json::Deserializer::from_str(content);
        let options = serde_ignored::deserialize(&mut deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        deserializer.end()?;
        Ok((options, ignored))
    }

    fn warn_unknown_fields(fields: &[String]) {
        if fields.is_empty() {
            return;
        }
        log!("warning"; "ignoring unknown options: {}", fields.join(", "));
    }

    /// Check values the engine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if sanitize_class(&self.lazy_class).is_empty() {
            return Err(ConfigError::Validation(format!(
                "lazy_class `{}` is empty after removing characters not allowed in a class name",
                self.lazy_class
            )));
        }
        Ok(())
    }

    /// Classes that exempt a tag, split on whitespace.
    pub fn skip_classes(&self) -> FxHashSet<&str> {
        self.skip_class_names.split_ascii_whitespace().collect()
    }

    /// Tag names scanned in post content.
    pub fn content_tag_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.content_imgs {
            names.push("img");
        }
        if self.embed {
            names.extend_from_slice(EMBED_TAG_NAMES);
        }
        names
    }

    /// Tag names scanned in widget content.
    pub fn widget_tag_names(&self) -> Vec<&'static str> {
        if !self.widgets {
            return Vec::new();
        }
        let mut names = vec!["img"];
        if self.embed {
            names.extend_from_slice(EMBED_TAG_NAMES);
        }
        names
    }

    /// Loader extensions to ship alongside the main script, in load order.
    pub fn loader_plugins(&self) -> Vec<&'static str> {
        LOADER_PLUGINS
            .iter()
            .copied()
            .filter(|name| match *name {
                "aspectratio" => self.aspectratio,
                "native-loading" => self.native_loading,
                "object-fit" => self.object_fit,
                "parent-fit" => self.parent_fit,
                _ => false,
            })
            .collect()
    }

    /// Stylesheet for the configured placeholder type.
    pub fn placeholder_style(&self) -> &'static str {
        match self.placeholder_type {
            PlaceholderType::Spinner => SPINNER_STYLE,
            PlaceholderType::Transparent => "",
        }
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Resolve the options path: explicit path, else `lazyload.toml` in cwd.
pub fn resolve_options_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OPTIONS_FILE))
}
