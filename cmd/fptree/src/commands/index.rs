//! Tree building commands.

use clap::Args;
use imgsig_fptree::{Finding, IndexSummary, Tree};
use serde::Serialize;

use super::{build_index, output_result, print_success, BuildArgs, DbArgs};
use crate::Cli;

/// Collections up to this size get their tree printed without --tree.
const TREE_DUMP_LIMIT: usize = 8;

/// Build a tree over one or more databases and print its summary.
#[derive(Args)]
pub struct IndexCommand {
    #[command(flatten)]
    pub db: DbArgs,

    #[command(flatten)]
    pub build: BuildArgs,

    /// Print every tree slot (implied for 8 entries or fewer)
    #[arg(long)]
    pub tree: bool,
}

#[derive(Debug, Serialize)]
pub struct IndexOutput {
    #[serde(flatten)]
    pub summary: IndexSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree: Option<Tree>,
}

impl IndexCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let out = self.execute(cli)?;
        output_result(&out, cli.output.as_deref(), cli.json)?;
        if let Some(path) = cli.output.as_deref() {
            print_success(&format!("summary written to {path}"));
        }
        Ok(())
    }

    fn execute(&self, cli: &Cli) -> anyhow::Result<IndexOutput> {
        let index = build_index(cli, &self.db, &self.build, None)?;
        let summary = index.summary().clone();
        let show_tree = self.tree || summary.unique <= TREE_DUMP_LIMIT;
        let tree = show_tree.then(|| index.tree().clone());
        Ok(IndexOutput { summary, tree })
    }
}

/// Search the last entries of the collection against its own tree.
#[derive(Args)]
pub struct RunCommand {
    #[command(flatten)]
    pub db: DbArgs,

    #[command(flatten)]
    pub build: BuildArgs,

    /// Number of trailing entries to search
    #[arg(long, default_value_t = 100)]
    pub limit: usize,

    /// Match cutoff (overrides config file)
    #[arg(long)]
    pub cutoff: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct RunRow {
    pub id: String,
    pub finding: Finding,
    pub depth: usize,
    pub matched_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub index: IndexSummary,
    pub searched: usize,
    pub matched: usize,
    pub self_matched: usize,
    pub max_depth: usize,
    pub results: Vec<RunRow>,
}

impl RunCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let report = self.execute(cli)?;
        output_result(&report, cli.output.as_deref(), cli.json)?;
        if let Some(path) = cli.output.as_deref() {
            print_success(&format!("{} searches written to {path}", report.searched));
        }
        Ok(())
    }

    fn execute(&self, cli: &Cli) -> anyhow::Result<RunReport> {
        let index = build_index(cli, &self.db, &self.build, self.cutoff)?;
        let skip = index.len().saturating_sub(self.limit);

        let mut results = Vec::with_capacity(index.len() - skip);
        for id in index.ids().skip(skip) {
            let query = index
                .fingerprint(id)
                .ok_or_else(|| anyhow::anyhow!("{id} missing from index store"))?;
            let result = index.search(query)?;
            tracing::debug!(id, finding = %result.finding, depth = result.depth, "searched");
            results.push(RunRow {
                id: id.to_string(),
                finding: result.finding,
                depth: result.depth,
                matched_id: result.matched_id,
            });
        }

        Ok(RunReport {
            index: index.summary().clone(),
            searched: results.len(),
            matched: results.iter().filter(|r| r.finding == Finding::Match).count(),
            self_matched: results
                .iter()
                .filter(|r| r.matched_id.as_deref() == Some(r.id.as_str()))
                .count(),
            max_depth: results.iter().map(|r| r.depth).max().unwrap_or(0),
            results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::{parse, write_db};
    use crate::Commands;

    #[test]
    fn small_index_prints_its_tree() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_db(dir.path(), "db.yaml", &[("a.jpg", 0), ("b.jpg", 400), ("c.jpg", 900)]);
        let cli = parse(&["index", "--db", path.to_str().unwrap()]);
        let Commands::Index(cmd) = &cli.command else {
            panic!("expected index command");
        };
        let out = cmd.execute(&cli).unwrap();
        let tree = out.tree.as_ref().unwrap();
        assert_eq!(tree.root_id(), "a.jpg");

        // a.jpg scores 624/1024 against b.jpg and 124/1024 against c.jpg.
        let value = serde_json::to_value(&out).unwrap();
        assert_eq!(value["unique"], 3);
        assert_eq!(value["tree"]["root"], 0);
        let nodes = value["tree"]["nodes"].as_array().unwrap();
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0]["id"], "a.jpg");
        assert_eq!(nodes[0]["midpoint"], 0.609375);
        assert_eq!(nodes[0]["greater"], 1);
        assert_eq!(nodes[0]["lesser"], 2);
        assert_eq!(nodes[1]["id"], "b.jpg");
        assert_eq!(nodes[2]["id"], "c.jpg");
        assert_eq!(nodes[2]["kind"], "leaf");
    }

    #[test]
    fn large_index_prints_tree_on_request() {
        let dir = tempfile::tempdir().unwrap();
        let entries: Vec<(String, usize)> = (0..9).map(|k| (format!("img{k}.jpg"), k * 100)).collect();
        let refs: Vec<(&str, usize)> = entries.iter().map(|(n, b)| (n.as_str(), *b)).collect();
        let path = write_db(dir.path(), "db.json", &refs);
        let path = path.to_str().unwrap();

        let cli = parse(&["index", "--db", path]);
        let Commands::Index(cmd) = &cli.command else {
            panic!("expected index command");
        };
        let out = cmd.execute(&cli).unwrap();
        assert_eq!(out.summary.unique, 9);
        assert!(out.tree.is_none());
        assert!(serde_json::to_value(&out).unwrap().get("tree").is_none());

        let cli = parse(&["index", "--db", path, "--tree"]);
        let Commands::Index(cmd) = &cli.command else {
            panic!("expected index command");
        };
        let tree = cmd.execute(&cli).unwrap().tree.unwrap();
        assert_eq!(tree.len(), 9);
        assert_eq!(tree.root_id(), "img0.jpg");
    }

    #[test]
    fn run_searches_trailing_entries() {
        let dir = tempfile::tempdir().unwrap();
        let entries: Vec<(String, usize)> =
            (0..10).map(|k| (format!("img{k}.jpg"), ((k * 7) % 10) * 90)).collect();
        let refs: Vec<(&str, usize)> = entries.iter().map(|(n, b)| (n.as_str(), *b)).collect();
        let path = write_db(dir.path(), "db.yaml", &refs);

        let cli = parse(&["run", "--db", path.to_str().unwrap(), "--limit", "4"]);
        let Commands::Run(cmd) = &cli.command else {
            panic!("expected run command");
        };
        let report = cmd.execute(&cli).unwrap();
        assert_eq!(report.searched, 4);
        assert_eq!(report.matched, 4);
        assert_eq!(report.self_matched, 4);
        let ids: Vec<&str> = report.results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["img6.jpg", "img7.jpg", "img8.jpg", "img9.jpg"]);
        assert_eq!(report.index.unique, 10);
    }

    #[test]
    fn limit_larger_than_collection() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_db(dir.path(), "db.json", &[("a", 0), ("b", 500)]);
        let cli = parse(&["run", "--db", path.to_str().unwrap()]);
        let Commands::Run(cmd) = &cli.command else {
            panic!("expected run command");
        };
        assert_eq!(cmd.limit, 100);
        assert_eq!(cmd.execute(&cli).unwrap().searched, 2);
    }
}
