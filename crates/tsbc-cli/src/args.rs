use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use tsbc::AssignDirection;

/// CLI arguments for the tsbc binary.
#[derive(Parser, Debug)]
#[command(
    name = "tsbc",
    version,
    about = "Detect breaking changes between two TypeScript API surfaces"
)]
pub struct CliArgs {
    /// Declaration file of the released API.
    #[arg(long, value_name = "PATH")]
    pub baseline: PathBuf,

    /// Declaration file of the API being checked.
    #[arg(long, value_name = "PATH")]
    pub current: PathBuf,

    /// Which surface is checked against which.
    #[arg(long, value_enum, default_value_t = Direction::CurrentToBaseline)]
    pub direction: Direction,

    /// JSON file with detector options.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Report format written to stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Only diff these declarations. Repeatable.
    #[arg(long = "name", value_name = "DECLARATION")]
    pub names: Vec<String>,

    /// Exit with status 1 when anything other than an addition is found.
    #[arg(long = "fail-on-breaking")]
    pub fail_on_breaking: bool,

    /// Disable colored output.
    #[arg(long = "no-color")]
    pub no_color: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Direction {
    CurrentToBaseline,
    BaselineToCurrent,
}

impl From<Direction> for AssignDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::CurrentToBaseline => AssignDirection::CurrentToBaseline,
            Direction::BaselineToCurrent => AssignDirection::BaselineToCurrent,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
