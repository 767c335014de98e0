//! Single fingerprint lookup.

use clap::Args;
use imgsig_fingerprint::BitFingerprint;
use imgsig_fptree::SearchResult;
use serde::Serialize;

use super::{build_index, output_result, BuildArgs, DbArgs};
use crate::Cli;

/// Search the tree for one fingerprint.
#[derive(Args)]
pub struct SearchCommand {
    #[command(flatten)]
    pub db: DbArgs,

    #[command(flatten)]
    pub build: BuildArgs,

    /// Query fingerprint as whitespace-separated 16-bit integers
    #[arg(long, conflicts_with = "id", required_unless_present = "id")]
    pub query: Option<String>,

    /// Use the fingerprint of an indexed entry as the query
    #[arg(long)]
    pub id: Option<String>,

    /// Match cutoff (overrides config file)
    #[arg(long)]
    pub cutoff: Option<f64>,

    /// Also search for the mirror image of the query
    #[arg(long)]
    pub mirror: bool,
}

#[derive(Debug, Serialize)]
pub struct SearchOutput {
    pub result: SearchResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mirror: Option<SearchResult>,
}

impl SearchCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let out = self.execute(cli)?;
        output_result(&out, cli.output.as_deref(), cli.json)
    }

    fn execute(&self, cli: &Cli) -> anyhow::Result<SearchOutput> {
        let index = build_index(cli, &self.db, &self.build, self.cutoff)?;

        let query: BitFingerprint = match (&self.query, &self.id) {
            (Some(text), _) => text.parse()?,
            (None, Some(id)) => index
                .fingerprint(id)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("no indexed entry named {id:?}"))?,
            (None, None) => anyhow::bail!("either --query or --id is required"),
        };

        let result = index.search(&query)?;
        let mirror = if self.mirror {
            Some(index.search(&query.mirrored())?)
        } else {
            None
        };
        Ok(SearchOutput { result, mirror })
    }
}

#[cfg(test)]
mod tests {
    use imgsig_fptree::Finding;

    use super::super::testutil::{parse, prefix, write_db};
    use crate::{Cli, Commands};

    fn db(dir: &std::path::Path) -> String {
        let path = write_db(
            dir,
            "db.yaml",
            &[("a.jpg", 0), ("b.jpg", 300), ("c.jpg", 600), ("d.jpg", 900)],
        );
        path.to_str().unwrap().to_string()
    }

    fn search(cli: &Cli) -> super::SearchOutput {
        let Commands::Search(cmd) = &cli.command else {
            panic!("expected search command");
        };
        cmd.execute(cli).unwrap()
    }

    #[test]
    fn search_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let db = db(dir.path());
        let cli = parse(&["search", "--db", &db, "--id", "c.jpg"]);
        let out = search(&cli);
        assert_eq!(out.result.matched_id.as_deref(), Some("c.jpg"));
        assert!(out.mirror.is_none());
    }

    #[test]
    fn search_by_text_with_mirror() {
        let dir = tempfile::tempdir().unwrap();
        let db = db(dir.path());
        let text = prefix(300).to_string();
        let cli = parse(&["search", "--db", &db, "--query", &text, "--mirror"]);
        let out = search(&cli);
        assert_eq!(out.result.finding, Finding::Match);
        assert_eq!(out.result.matched_id.as_deref(), Some("b.jpg"));
        assert!(out.mirror.is_some());
    }

    #[test]
    fn unknown_id_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let db = db(dir.path());
        let cli = parse(&["search", "--db", &db, "--id", "zzz.jpg"]);
        let Commands::Search(cmd) = &cli.command else {
            panic!("expected search command");
        };
        assert!(cmd.execute(&cli).is_err());
    }

    #[test]
    fn query_or_id_required() {
        let args = ["fptree", "search", "--db", "x.yaml"];
        assert!(<Cli as clap::Parser>::try_parse_from(args).is_err());
    }
}
