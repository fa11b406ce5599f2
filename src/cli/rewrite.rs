//! `rewrite` and `filter` commands.
//!
//! Both read one fragment (file or stdin), run it through the engine and
//! write the result (file or stdout). Nothing is written on error.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};

use super::args::{FilterContext, IdentityArgs, IoArgs};
use crate::config::LazyLoadOptions;
use crate::filters::{LazyLoad, RequestContext};
use crate::log;
use crate::rewrite::{ImageSize, Rewriter, TagMatcher};

/// Execute rewrite command
pub fn run_rewrite(
    io: &IoArgs,
    tags: &[String],
    identity: &IdentityArgs,
    options: &LazyLoadOptions,
) -> Result<()> {
    let html = read_input(io.input.as_deref())?;
    let out = rewrite_fragment(&html, tags, identity, options);
    write_output(io.output.as_deref(), &out)
}

/// Execute filter command
pub fn run_filter(
    io: &IoArgs,
    context: FilterContext,
    identity: &IdentityArgs,
    options: &LazyLoadOptions,
) -> Result<()> {
    let html = read_input(io.input.as_deref())?;
    let out = filter_fragment(&html, context, identity, options);
    write_output(io.output.as_deref(), &out)
}

fn rewrite_fragment(
    html: &str,
    tags: &[String],
    identity: &IdentityArgs,
    options: &LazyLoadOptions,
) -> String {
    let Some(matcher) = TagMatcher::new(tags) else {
        log!("rewrite"; "no usable tag names in {:?}, output unchanged", tags);
        return html.to_string();
    };
    Rewriter::new(options)
        .rewrite(html, &matcher, identity.id, identity.size.as_ref())
        .into_owned()
}

fn filter_fragment(
    html: &str,
    context: FilterContext,
    identity: &IdentityArgs,
    options: &LazyLoadOptions,
) -> String {
    let lazy = LazyLoad::new(options, RequestContext::default());
    let (id, size) = (identity.id, identity.size.as_ref());
    let out = match context {
        FilterContext::Post => lazy.filter_post_content(html),
        FilterContext::Widget => lazy.filter_widget(html),
        FilterContext::Avatar => lazy.filter_avatar_html(html, size.and_then(avatar_side)),
        FilterContext::Image => lazy.filter_get_image_tag(html, id, size),
        FilterContext::Thumbnail => lazy.filter_post_thumbnail_html(html, id, size),
    };
    out.into_owned()
}

/// Square side of an avatar: the width of `WxH`, or a bare number.
fn avatar_side(size: &ImageSize) -> Option<u32> {
    match size {
        ImageSize::Dimensions { width, .. } => Some(*width),
        ImageSize::Named(name) => name.parse().ok(),
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

pub(super) fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log!("rewrite"; "wrote output to {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
