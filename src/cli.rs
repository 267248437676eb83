use clap::{Parser, Subcommand};

/// prdash — AI code-review report ingestion and dashboard metrics
#[derive(Parser, Debug, Clone)]
#[command(name = "prdash", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,

    /// Directory containing review JSON documents
    #[arg(long, global = true)]
    pub reviews_dir: Option<String>,

    /// Path to config file
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CliCommand {
    /// List normalized review reports, most recent first
    Reports,

    /// Aggregate dashboard metrics over the review corpus
    Metrics,
}
