use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "script-review",
    about = "Swipe-style review queue for AI-generated radio scripts"
)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub filters: FilterArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args, Debug)]
pub struct ConnectionArgs {
    /// Review server base URL (e.g. "http://localhost:8000").
    /// Uses the local script library when omitted.
    #[arg(long)]
    pub server: Option<String>,

    /// Bearer token for the review server.
    /// Falls back to $SCRIPT_REVIEW_TOKEN.
    #[arg(long)]
    pub token: Option<String>,

    /// Path to the local script library database.
    #[arg(long, default_value = "review.db")]
    pub db: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    /// Only scripts by this DJ.
    #[arg(long)]
    pub dj: Option<String>,

    /// Only scripts in this category (weather, story, news, gossip, music).
    #[arg(long)]
    pub category: Option<String>,

    /// Review status to queue: pending, approved, rejected, or all.
    #[arg(long, default_value = "pending")]
    pub status: String,

    /// Only scripts dated on or after this day (YYYY-MM-DD).
    #[arg(long)]
    pub from: Option<String>,

    /// Only scripts dated on or before this day (YYYY-MM-DD).
    #[arg(long)]
    pub to: Option<String>,

    /// Scripts per page.
    #[arg(long, default_value = "20")]
    pub page_size: u32,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the interactive review TUI (default).
    Review,
    /// Print the review tally without launching the TUI.
    Stats,
    /// Print the rejection reason catalogue.
    Reasons,
    /// Import a directory of script files into the local library.
    Import(ImportArgs),
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Directory laid out as <dj>/<script>.txt.
    pub dir: PathBuf,
}

/// Parse CLI arguments.
pub fn parse_args() -> Cli {
    Cli::parse()
}
