//! lazyload - defer loading of images and embeds in HTML fragments.

use anyhow::Result;
use clap::{ColorChoice, Parser};

use lazyload::cli::{self, Cli, Commands};
use lazyload::config::{LazyLoadOptions, resolve_options_path};
use lazyload::{debug, logger};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let options = load_options(&cli)?;

    match &cli.command {
        Commands::Rewrite { io, tags, identity } => {
            cli::rewrite::run_rewrite(io, tags, identity, &options)
        }
        Commands::Filter {
            io,
            context,
            identity,
        } => cli::rewrite::run_filter(io, *context, identity, &options),
        Commands::Options { json } => cli::options::print_options(&options, *json),
    }
}

/// An explicit `--config` must exist; the default file is optional.
fn load_options(cli: &Cli) -> Result<LazyLoadOptions> {
    let path = resolve_options_path(cli.config.as_deref());
    let options = match cli.config {
        Some(_) => LazyLoadOptions::from_path(&path)?,
        None => LazyLoadOptions::load(&path)?,
    };
    debug!("config"; "plugins: {:?}", options.loader_plugins());
    Ok(options)
}
