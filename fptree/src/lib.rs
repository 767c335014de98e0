//! Similarity-partition tree for finding the closest previously seen
//! image fingerprint without scanning the whole collection.
//!
//! Indexing runs in three steps: near-identical fingerprints are removed,
//! the remaining collection is split recursively around the median
//! similarity to a pivot, and queries descend the resulting tree with a
//! single compensating probe near each midpoint.
//!
//! # Usage
//!
//! ```
//! use imgsig_fingerprint::BitFingerprint;
//! use imgsig_fptree::{Collection, FingerprintIndex, IndexConfig};
//!
//! let mut c = Collection::new();
//! c.push("a.jpg", BitFingerprint::from_samples(&[0xffff; 8]));
//! c.push("b.jpg", BitFingerprint::from_samples(&[0x00ff; 64]));
//! c.push("c.jpg", BitFingerprint::from_samples(&[0xffff; 64]));
//!
//! let index = FingerprintIndex::build(c, &IndexConfig::default()).unwrap();
//! let hit = index.search(&BitFingerprint::from_samples(&[0x00ff; 64])).unwrap();
//! assert_eq!(hit.matched_id.as_deref(), Some("b.jpg"));
//! ```
//!
//! # Design
//!
//! Pivots are always the first entry of a sub-collection, so the input
//! order fully determines the tree and no depth bound is guaranteed. The
//! tree lives in an arena ([`Tree`]) and is built and searched with
//! explicit stacks, so degenerate inputs cannot exhaust the call stack.

mod bifurcate;
mod collection;
mod config;
mod db;
mod dedup;
mod error;
mod index;
mod report;
mod search;
mod store;
mod tree;

#[cfg(test)]
mod testutil;

pub use bifurcate::{bifurcate, Bifurcation};
pub use collection::{Collection, Entry};
pub use config::{
    BuildConfig, IndexConfig, SearchConfig, DEFAULT_CUTOFF, DEFAULT_FUZZY_EPSILON,
    DUPLICATE_THRESHOLD,
};
pub use db::{DbFormat, FingerprintDb};
pub use dedup::{dedup_fingerprints, dedup_identifiers};
pub use error::TreeError;
pub use index::{FingerprintIndex, IndexSummary};
pub use report::{pairwise_scores, similarity_extremes, Extremes, PairScore};
pub use search::{Finding, SearchResult};
pub use store::{FingerprintStore, MemoryStore};
pub use tree::{Node, NodeId, Tree};
