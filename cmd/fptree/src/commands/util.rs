//! Utility functions for CLI commands.

use std::path::Path;

use clap::Args;
use imgsig_fingerprint::BitFingerprint;
use imgsig_fptree::{
    BuildConfig, Collection, FingerprintDb, FingerprintIndex, IndexConfig, IndexSummary,
    SearchConfig, DEFAULT_FUZZY_EPSILON,
};

/// Fuzzy trees holding more than this many slots per unique entry are
/// reported as overgrown.
pub const SLOT_BUDGET_PER_ENTRY: usize = 4;

use crate::Cli;

/// Fingerprint database sources shared by the tree commands.
#[derive(Args)]
pub struct DbArgs {
    /// Fingerprint database (YAML or JSON); repeat to merge several
    #[arg(long = "db", required = true)]
    pub db: Vec<String>,
}

impl DbArgs {
    /// Loads and concatenates every database in command-line order.
    pub fn load(&self) -> anyhow::Result<Collection<BitFingerprint>> {
        let db = FingerprintDb::load_all(&self.db)?;
        Ok(db.into_collection()?)
    }
}

/// Tree construction flags.
#[derive(Args)]
pub struct BuildArgs {
    /// Build a fuzzy tree whose splits overlap near each midpoint.
    /// Entries inside the overlap are copied to both sides, so when many
    /// scores cluster near the midpoints the tree grows exponentially:
    /// 16 random fingerprints at the default band already take 65535 slots
    #[arg(long)]
    pub fuzzy: bool,

    /// Overlap band for --fuzzy (default: 0.07)
    #[arg(long, requires = "fuzzy")]
    pub epsilon: Option<f64>,
}

/// Loads the index config from --config, or the defaults.
pub fn load_config(cli: &Cli) -> anyhow::Result<IndexConfig> {
    match cli.config.as_deref() {
        Some(path) => load_request(path),
        None => Ok(IndexConfig::default()),
    }
}

/// Resolves the effective config (file, then flags) for a set of sources.
pub fn resolve_config(
    cli: &Cli,
    db: &DbArgs,
    build: &BuildArgs,
    cutoff: Option<f64>,
) -> anyhow::Result<IndexConfig> {
    let mut cfg = load_config(cli)?;
    if build.fuzzy {
        let fallback = if cfg.build.is_fuzzy() {
            cfg.build.epsilon
        } else {
            DEFAULT_FUZZY_EPSILON
        };
        cfg.build = BuildConfig::with_epsilon(build.epsilon.unwrap_or(fallback));
    }
    if let Some(cutoff) = cutoff {
        cfg.search = SearchConfig::with_cutoff(cutoff);
    }
    // Several sources may reuse filenames.
    if db.db.len() > 1 {
        cfg.dedup_identifiers = true;
    }
    Ok(cfg)
}

/// Loads the sources and builds the index.
pub fn build_index(
    cli: &Cli,
    db: &DbArgs,
    build: &BuildArgs,
    cutoff: Option<f64>,
) -> anyhow::Result<FingerprintIndex<BitFingerprint>> {
    let cfg = resolve_config(cli, db, build, cutoff)?;
    let collection = db.load()?;
    print_verbose(
        cli,
        &format!("loaded {} entries from {} file(s)", collection.len(), db.db.len()),
    );
    let index = FingerprintIndex::build(collection, &cfg)?;
    if let Some(msg) = slot_growth_warning(index.summary()) {
        print_warning(&msg);
    }
    Ok(index)
}

/// Describes a fuzzy tree that outgrew [`SLOT_BUDGET_PER_ENTRY`].
pub fn slot_growth_warning(summary: &IndexSummary) -> Option<String> {
    let budget = summary.unique.saturating_mul(SLOT_BUDGET_PER_ENTRY);
    (summary.fuzzy && summary.slots > budget).then(|| {
        format!(
            "fuzzy tree holds {} slots for {} entries; narrow --epsilon or drop --fuzzy",
            summary.slots, summary.unique
        )
    })
}

/// Loads a request from a YAML or JSON file.
pub fn load_request<T: serde::de::DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)?;
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("yaml");

    let result = match ext.to_lowercase().as_str() {
        "json" => serde_json::from_str(&content)?,
        _ => serde_yaml::from_str(&content)?,
    };

    Ok(result)
}

/// Outputs result as JSON or YAML.
pub fn output_result<T: serde::Serialize>(
    result: &T,
    output_path: Option<&str>,
    as_json: bool,
) -> anyhow::Result<()> {
    let output = if as_json {
        serde_json::to_string_pretty(result)?
    } else {
        serde_yaml::to_string(result)?
    };

    match output_path {
        Some(path) => std::fs::write(path, output)?,
        None => print!("{}", output),
    }

    Ok(())
}

/// Prints verbose output if enabled.
pub fn print_verbose(cli: &Cli, msg: &str) {
    if cli.verbose {
        eprintln!("[verbose] {}", msg);
    }
}

/// Prints success message.
pub fn print_success(msg: &str) {
    eprintln!("\x1b[32m✓\x1b[0m {}", msg);
}

/// Prints warning message.
pub fn print_warning(msg: &str) {
    eprintln!("\x1b[33m⚠\x1b[0m {}", msg);
}
