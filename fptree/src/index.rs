use std::collections::HashSet;

use imgsig_fingerprint::Fingerprint;
use serde::Serialize;
use tracing::info;

use crate::config::{IndexConfig, SearchConfig};
use crate::dedup::{dedup_fingerprints, dedup_identifiers};
use crate::search::SearchResult;
use crate::store::{FingerprintStore, MemoryStore};
use crate::tree::Tree;
use crate::{Collection, TreeError};

/// Figures describing a freshly built index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexSummary {
    /// Entries handed to [`FingerprintIndex::build`].
    pub input: usize,
    /// Entries left after deduplication.
    pub unique: usize,
    /// Arena slots; above `unique` only for fuzzy trees.
    pub slots: usize,
    pub branches: usize,
    pub depth: usize,
    pub root: String,
    pub fuzzy: bool,
}

/// A deduplicated collection, its tree and the store the tree searches.
///
/// Immutable once built; share it behind an `Arc` for concurrent searches.
#[derive(Debug, Clone)]
pub struct FingerprintIndex<F> {
    config: IndexConfig,
    tree: Tree,
    store: MemoryStore<F>,
    ids: Vec<String>,
    summary: IndexSummary,
}

impl<F: Fingerprint> FingerprintIndex<F> {
    /// Deduplicates `collection` and builds its tree.
    ///
    /// Identifiers must be unique after deduplication, since the store is
    /// keyed by them. Set `dedup_identifiers` when merging sources that
    /// may reuse names.
    pub fn build(collection: Collection<F>, config: &IndexConfig) -> Result<Self, TreeError> {
        config.search.validate()?;
        let input = collection.len();

        let mut collection = dedup_fingerprints(collection)?;
        if config.dedup_identifiers {
            collection = dedup_identifiers(collection);
        }

        let mut seen = HashSet::with_capacity(collection.len());
        for id in collection.ids() {
            if !seen.insert(id) {
                return Err(TreeError::InvalidInput(format!(
                    "identifier {id:?} names more than one fingerprint"
                )));
            }
        }

        let tree = Tree::build_with(&collection, &config.build)?;
        let summary = IndexSummary {
            input,
            unique: collection.len(),
            slots: tree.len(),
            branches: tree.branch_count(),
            depth: tree.depth(),
            root: tree.root_id().to_string(),
            fuzzy: config.build.is_fuzzy(),
        };
        info!(
            input = summary.input,
            unique = summary.unique,
            slots = summary.slots,
            branches = summary.branches,
            depth = summary.depth,
            root = %summary.root,
            fuzzy = summary.fuzzy,
            "fingerprint index built"
        );

        let ids = collection.ids().map(str::to_string).collect();
        Ok(Self {
            config: *config,
            tree,
            store: collection.into_store(),
            ids,
            summary,
        })
    }

    /// Searches with the configured cutoff.
    pub fn search(&self, query: &F) -> Result<SearchResult, TreeError> {
        self.search_with(query, &self.config.search)
    }

    pub fn search_with(&self, query: &F, config: &SearchConfig) -> Result<SearchResult, TreeError> {
        self.tree.search(query, &self.store, config)
    }
}

impl<F> FingerprintIndex<F> {
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn store(&self) -> &MemoryStore<F> {
        &self.store
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn summary(&self) -> &IndexSummary {
        &self.summary
    }

    /// Identifiers of the indexed entries in collection order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn fingerprint(&self, id: &str) -> Option<&F>
    where
        F: Send + Sync,
    {
        self.store.get(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
