//! Similarity reports over a database.

use clap::Args;
use imgsig_fptree::{pairwise_scores, similarity_extremes, Extremes, PairScore};
use serde::Serialize;

use super::{output_result, print_warning, DbArgs};
use crate::Cli;

/// Pairwise listings get unreadable quickly.
const PAIRWISE_LIMIT: usize = 8;

/// Report pairwise and per-entry extreme similarities.
#[derive(Args)]
pub struct ReportCommand {
    #[command(flatten)]
    pub db: DbArgs,

    /// List every pair even for large collections
    #[arg(long)]
    pub all: bool,
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub entries: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pairs: Option<Vec<PairScore>>,
    pub extremes: Vec<Extremes>,
}

impl ReportCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let report = self.execute()?;
        output_result(&report, cli.output.as_deref(), cli.json)
    }

    fn execute(&self) -> anyhow::Result<Report> {
        let collection = self.db.load()?;
        let pairs = if self.all || collection.len() <= PAIRWISE_LIMIT {
            Some(pairwise_scores(&collection)?)
        } else {
            print_warning(&format!(
                "{} entries; skipping pairwise scores (use --all)",
                collection.len()
            ));
            None
        };
        Ok(Report {
            entries: collection.len(),
            pairs,
            extremes: similarity_extremes(&collection)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::{parse, write_db};
    use crate::Commands;

    fn report(args: &[&str]) -> super::Report {
        let cli = parse(args);
        let Commands::Report(cmd) = &cli.command else {
            panic!("expected report command");
        };
        cmd.execute().unwrap()
    }

    #[test]
    fn small_collection_lists_pairs() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_db(dir.path(), "db.yaml", &[("a", 0), ("b", 256), ("c", 512)]);
        let out = report(&["report", "--db", path.to_str().unwrap()]);
        assert_eq!(out.entries, 3);
        let pairs = out.pairs.unwrap();
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0].score, 0.75);
        assert_eq!(out.extremes[1].max, 0.75);
        assert_eq!(out.extremes[1].min, 0.75);
    }

    #[test]
    fn large_collection_skips_pairs_unless_all() {
        let dir = tempfile::tempdir().unwrap();
        let names: Vec<String> = (0..9).map(|i| format!("f{i}")).collect();
        let entries: Vec<(&str, usize)> =
            names.iter().enumerate().map(|(i, n)| (n.as_str(), i * 100)).collect();
        let path = write_db(dir.path(), "db.yaml", &entries);
        let path = path.to_str().unwrap();

        let out = report(&["report", "--db", path]);
        assert!(out.pairs.is_none());
        assert_eq!(out.extremes.len(), 9);

        let out = report(&["report", "--db", path, "--all"]);
        assert_eq!(out.pairs.unwrap().len(), 36);
    }
}
