//! `options` command: print the effective options and derived loader settings.

use anyhow::Result;

use super::rewrite::write_output;
use crate::config::LazyLoadOptions;

/// Execute options command
pub fn print_options(options: &LazyLoadOptions, json: bool) -> Result<()> {
    write_output(None, &render_options(options, json)?)
}

fn render_options(options: &LazyLoadOptions, json: bool) -> Result<String> {
    if json {
        let mut value = serde_json::to_value(options)?;
        if let Some(map) = value.as_object_mut() {
            map.insert("plugins".into(), options.loader_plugins().into());
            map.insert("style".into(), options.placeholder_style().into());
        }
        let mut out = serde_json::to_string_pretty(&value)?;
        out.push('\n');
        return Ok(out);
    }

    let mut out = options.to_toml_string()?;
    out.push_str(&format!("\n# plugins: {}\n", options.loader_plugins().join(", ")));
    Ok(out)
}
