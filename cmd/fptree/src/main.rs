//! fptree - index image fingerprint databases and look up near matches.

use clap::{Parser, Subcommand};

mod commands;

use commands::{CompareCommand, IndexCommand, ReportCommand, RunCommand, SearchCommand};

/// fptree - fuzzy nearest-match lookup over image fingerprints.
///
/// Fingerprint databases are YAML or JSON files holding parallel
/// `filenames` and `fingerprints` arrays. Entry order matters: the first
/// entry becomes the root pivot of the tree.
#[derive(Parser)]
#[command(name = "fptree")]
#[command(about = "Fingerprint similarity-tree CLI tool")]
#[command(version)]
pub struct Cli {
    /// Index config file (YAML or JSON); flags override its values
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Output file (default: stdout)
    #[arg(short = 'o', long, global = true)]
    pub output: Option<String>,

    /// Output as JSON (for piping)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a tree and print its summary
    Index(IndexCommand),
    /// Search for one fingerprint
    Search(SearchCommand),
    /// Search the last entries of the collection against its own tree
    Run(RunCommand),
    /// Compare two text fingerprints, mirror-aware
    Compare(CompareCommand),
    /// Report pairwise and extreme similarities
    Report(ReportCommand),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_target(false)
            .init();
    }

    match &cli.command {
        Commands::Index(cmd) => cmd.run(&cli),
        Commands::Search(cmd) => cmd.run(&cli),
        Commands::Run(cmd) => cmd.run(&cli),
        Commands::Compare(cmd) => cmd.run(&cli),
        Commands::Report(cmd) => cmd.run(&cli),
    }
}
