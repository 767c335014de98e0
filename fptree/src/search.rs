use std::fmt;

use imgsig_fingerprint::Fingerprint;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::SearchConfig;
use crate::store::{fetch, FingerprintStore};
use crate::tree::{Node, NodeId, Side, Tree};
use crate::TreeError;

/// Outcome of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Finding {
    Match,
    NoMatch,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::Match => f.write_str("match"),
            Finding::NoMatch => f.write_str("no_match"),
        }
    }
}

/// Where a search stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub finding: Finding,

    /// Depth of the deciding node; the root is 0.
    pub depth: usize,

    /// Set only for [`Finding::Match`].
    pub matched_id: Option<String>,
}

impl SearchResult {
    fn found(id: &str, depth: usize) -> Self {
        Self {
            finding: Finding::Match,
            depth,
            matched_id: Some(id.to_string()),
        }
    }

    fn missed(depth: usize) -> Self {
        Self {
            finding: Finding::NoMatch,
            depth,
            matched_id: None,
        }
    }

    pub fn is_match(&self) -> bool {
        self.finding == Finding::Match
    }
}

/// A branch decision made on the original descent.
struct Frame {
    slot: NodeId,
    depth: usize,
    score: f64,
    midpoint: f64,
    taken: Side,
}

impl Tree {
    /// Finds the first node along the descent whose fingerprint scores
    /// strictly above `config.cutoff` against `query`.
    ///
    /// At each branch the query goes lesser when its score is below the
    /// midpoint and greater otherwise. When that path ends without a match
    /// and the score was within `config.epsilon()` of the midpoint, the
    /// other child is probed once. Probes never probe further themselves;
    /// only nodes on the original descent can trigger one, deepest first.
    ///
    /// `store` must resolve every identifier in the tree; a missing one is
    /// [`TreeError::LookupFailure`].
    pub fn search<F, S>(
        &self,
        query: &F,
        store: &S,
        config: &SearchConfig,
    ) -> Result<SearchResult, TreeError>
    where
        F: Fingerprint,
        S: FingerprintStore<F> + ?Sized,
    {
        config.validate()?;
        let epsilon = config.epsilon();

        let mut frames = Vec::new();
        let mut result = self.descend(
            Some(self.root()),
            0,
            query,
            store,
            config.cutoff,
            Some(&mut frames),
        )?;

        // The recovery band is a heuristic; no tuning of epsilon has been
        // measured against real collections.
        while let Some(frame) = frames.pop() {
            if result.is_match() {
                break;
            }
            let node = &self.nodes()[frame.slot];
            let alternate = match frame.taken {
                Side::Lesser if frame.score + epsilon >= frame.midpoint => node.greater(),
                Side::Greater if frame.score - epsilon <= frame.midpoint => node.lesser(),
                _ => continue,
            };
            debug!(
                id = node.id(),
                depth = frame.depth,
                score = frame.score,
                midpoint = frame.midpoint,
                "retrying other branch near midpoint"
            );
            result = self.descend(alternate, frame.depth + 1, query, store, config.cutoff, None)?;
        }

        Ok(result)
    }

    /// Walks down from `start` without any recovery, recording branch
    /// decisions into `frames` when given.
    fn descend<F, S>(
        &self,
        start: Option<NodeId>,
        mut depth: usize,
        query: &F,
        store: &S,
        cutoff: f64,
        mut frames: Option<&mut Vec<Frame>>,
    ) -> Result<SearchResult, TreeError>
    where
        F: Fingerprint,
        S: FingerprintStore<F> + ?Sized,
    {
        let mut slot = start;
        loop {
            // An absent child reports its parent's depth.
            let Some(at) = slot else {
                return Ok(SearchResult::missed(depth.saturating_sub(1)));
            };
            let node = &self.nodes()[at];
            let score = query.compare(fetch(store, node.id())?)?;
            trace!(id = node.id(), depth, score, "visit");

            if score > cutoff {
                return Ok(SearchResult::found(node.id(), depth));
            }
            let Node::Branch {
                midpoint,
                greater,
                lesser,
                ..
            } = node
            else {
                return Ok(SearchResult::missed(depth));
            };

            let taken = if score < *midpoint {
                Side::Lesser
            } else {
                Side::Greater
            };
            if let Some(frames) = frames.as_deref_mut() {
                frames.push(Frame {
                    slot: at,
                    depth,
                    score,
                    midpoint: *midpoint,
                    taken,
                });
            }
            slot = match taken {
                Side::Lesser => *lesser,
                Side::Greater => *greater,
            };
            depth += 1;
        }
    }
}
