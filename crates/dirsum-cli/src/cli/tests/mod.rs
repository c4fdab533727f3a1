//! CLI tests: argument parsing and handler runs against temp trees.

use super::Cli;
use clap::Parser;

pub(super) fn parse_cli(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}
