//! CLI command definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// qa-probador: run the QA Playground and Automation Demo Site scenarios
#[derive(Parser, Debug)]
#[command(name = "qa-probador")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run scenarios against a real browser
    Test(TestArgs),

    /// List scenarios without running them
    List(ListArgs),

    /// Print the fixture names page objects are registered under
    Fixtures,
}

/// Which scenario file(s) to use
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SuiteArg {
    /// Both suites
    #[default]
    All,
    /// QA Playground (TC01..TC34)
    Playground,
    /// Automation Demo Site (TC01..TC09)
    DemoSite,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatArg {
    /// Human-readable text
    #[default]
    Text,
    /// JSON summary on stdout
    Json,
}

/// Arguments for the test command
#[derive(Args, Debug)]
pub struct TestArgs {
    /// Only run scenarios whose name contains this
    pub filter: Option<String>,

    /// Suite to run
    #[arg(short, long, value_enum, default_value = "all")]
    pub suite: SuiteArg,

    /// Extra attempts for a failing scenario (default: 2 when CI is set, else 0)
    #[arg(short, long)]
    pub retries: Option<u32>,

    /// Stop at the first scenario that fails all its attempts
    #[arg(long)]
    pub fail_fast: bool,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// QA Playground URL (overrides BASE_URL)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Automation Demo Site URL (overrides SECONDARY_BASE_URL)
    #[arg(long)]
    pub secondary_base_url: Option<String>,

    /// Directory for downloads and failure screenshots
    #[arg(short, long)]
    pub artifacts: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: FormatArg,
}

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only list scenarios whose name contains this
    pub filter: Option<String>,

    /// Suite to list
    #[arg(short, long, value_enum, default_value = "all")]
    pub suite: SuiteArg,
}

/// Color output argument
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
