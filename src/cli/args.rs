//! Clap argument types.

use clap::{Parser, ValueEnum};

use roster::listing::PageView;

/// Manage the users of a REST collection from the terminal.
#[derive(Parser, Debug)]
#[command(name = "roster", version = roster::constants::VERSION)]
pub struct Cli {
    /// URL of the user collection endpoint (overrides config and ROSTER_API_URL).
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Users shown per page.
    #[arg(long, global = true, value_parser = clap::value_parser!(u16).range(1..))]
    pub page_size: Option<u16>,

    /// Enable debug logging on stderr.
    #[arg(long, short = 'v', global = true, default_value_t = false)]
    pub verbose: bool,

    /// Defaults to the interactive shell.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(clap::Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Browse and edit users interactively.
    Shell,

    /// Fetch the collection and print one page of it.
    List(ListArgs),

    /// Print version and build information.
    Version,
}

/// Arguments for the `list` subcommand.
#[derive(Parser, Debug, PartialEq, Eq)]
pub struct ListArgs {
    /// Only show users whose name contains this text (case-insensitive).
    #[arg(long, short = 's', default_value = "")]
    pub search: String,

    /// Page to show (1-based).
    #[arg(long, short = 'p', default_value_t = 1)]
    pub page: usize,

    /// Output format.
    #[arg(long, default_value = "terminal")]
    pub format: OutputFormat,
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Terminal,
    Json,
}

impl OutputFormat {
    /// Render a page using the renderer for this format.
    pub fn render(&self, view: &PageView) -> String {
        use roster::output::OutputRenderer;
        match self {
            OutputFormat::Terminal => roster::output::terminal::TerminalRenderer.render(view),
            OutputFormat::Json => roster::output::json::JsonRenderer.render(view),
        }
    }
}
