//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::rewrite::ImageSize;

/// Lazy loading rewriter for images and embeds in HTML fragments
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Options file path, TOML or JSON (default: lazyload.toml)
    #[arg(short = 'C', long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Rewrite the given tags of an HTML fragment
    #[command(visible_alias = "r")]
    Rewrite {
        #[command(flatten)]
        io: IoArgs,

        /// Tag names to rewrite (comma-separated)
        #[arg(short, long, value_delimiter = ',', default_value = "img,iframe")]
        tags: Vec<String>,

        #[command(flatten)]
        identity: IdentityArgs,
    },

    /// Run a fragment through one of the content filters
    #[command(visible_alias = "f")]
    Filter {
        #[command(flatten)]
        io: IoArgs,

        /// Kind of markup being filtered
        #[arg(short = 'x', long, value_enum, default_value_t = FilterContext::Post)]
        context: FilterContext,

        #[command(flatten)]
        identity: IdentityArgs,
    },

    /// Print the effective options
    #[command(visible_alias = "o")]
    Options {
        /// Print as JSON instead of TOML
        #[arg(short, long)]
        json: bool,
    },
}

/// Input and output of a fragment.
#[derive(clap::Args, Debug, Clone)]
pub struct IoArgs {
    /// Input file. Reads stdin when omitted or `-`.
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub input: Option<PathBuf>,

    /// Write output to file instead of stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

/// Attachment identity passed to the rewriter.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct IdentityArgs {
    /// Attachment id of the image
    #[arg(long)]
    pub id: Option<u64>,

    /// Image size: a size name or `WIDTHxHEIGHT`
    #[arg(short, long)]
    pub size: Option<ImageSize>,
}

/// Markup kinds accepted by `filter`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterContext {
    /// Post content
    Post,
    Widget,
    /// Avatar markup; `--size` gives the square side
    Avatar,
    /// Attachment image inserted into content
    Image,
    Thumbnail,
}

#[allow(unused)]
impl Cli {
    pub const fn is_rewrite(&self) -> bool {
        matches!(self.command, Commands::Rewrite { .. })
    }
    pub const fn is_filter(&self) -> bool {
        matches!(self.command, Commands::Filter { .. })
    }
    pub const fn is_options(&self) -> bool {
        matches!(self.command, Commands::Options { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("lazyload").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_rewrite_defaults() {
        let cli = parse(&["rewrite"]);
        assert!(cli.is_rewrite());
        assert!(cli.config.is_none());
        let Commands::Rewrite { io, tags, identity } = cli.command else {
            panic!("expected rewrite");
        };
        assert_eq!(tags, ["img", "iframe"]);
        assert!(io.input.is_none() && io.output.is_none());
        assert!(identity.id.is_none() && identity.size.is_none());
    }

    #[test]
    fn test_rewrite_with_identity() {
        let cli = parse(&[
            "-C", "site.json", "rewrite", "in.html", "--tags", "img", "--id", "7", "-s", "300x200",
        ]);
        assert_eq!(cli.config.as_deref(), Some(Path::new("site.json")));
        let Commands::Rewrite { io, tags, identity } = cli.command else {
            panic!("expected rewrite");
        };
        assert_eq!(io.input.as_deref(), Some(Path::new("in.html")));
        assert_eq!(tags, ["img"]);
        assert_eq!(identity.id, Some(7));
        assert_eq!(
            identity.size,
            Some(ImageSize::Dimensions {
                width: 300,
                height: 200
            })
        );
    }

    #[test]
    fn test_filter_context() {
        let cli = parse(&["filter", "--context", "avatar", "-s", "96x96"]);
        assert!(cli.is_filter());
        let Commands::Filter { context, .. } = cli.command else {
            panic!("expected filter");
        };
        assert_eq!(context, FilterContext::Avatar);

        assert!(Cli::try_parse_from(["lazyload", "filter", "--context", "bogus"]).is_err());
    }

    #[test]
    fn test_options_json_flag() {
        let cli = parse(&["options", "--json", "--verbose"]);
        assert!(cli.verbose);
        assert!(cli.is_options());
        assert!(matches!(cli.command, Commands::Options { json: true }));
    }
}
