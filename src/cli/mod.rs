//! Command-line interface module.

mod args;
pub mod options;
pub mod rewrite;

pub use args::{Cli, Commands, FilterContext, IdentityArgs, IoArgs};
