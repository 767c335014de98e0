use std::collections::HashMap;

use imgsig_fingerprint::Fingerprint;
use serde::Serialize;
use tracing::trace;

use crate::bifurcate::bifurcate;
use crate::config::BuildConfig;
use crate::{Collection, Entry, TreeError};

/// Position of a node in the tree arena.
pub type NodeId = usize;

/// One position in a [`Tree`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    /// A singleton sub-collection. Has no midpoint of its own.
    Leaf { id: String },

    /// A pivot whose siblings were split at `midpoint`.
    Branch {
        id: String,
        midpoint: f64,
        greater: Option<NodeId>,
        lesser: Option<NodeId>,
    },
}

impl Node {
    /// Identifier of the fingerprint this node stands for.
    pub fn id(&self) -> &str {
        match self {
            Node::Leaf { id } | Node::Branch { id, .. } => id,
        }
    }

    pub fn midpoint(&self) -> Option<f64> {
        match self {
            Node::Leaf { .. } => None,
            Node::Branch { midpoint, .. } => Some(*midpoint),
        }
    }

    pub fn greater(&self) -> Option<NodeId> {
        match self {
            Node::Leaf { .. } => None,
            Node::Branch { greater, .. } => *greater,
        }
    }

    pub fn lesser(&self) -> Option<NodeId> {
        match self {
            Node::Leaf { .. } => None,
            Node::Branch { lesser, .. } => *lesser,
        }
    }

    /// True when neither child is present.
    pub fn is_leaf(&self) -> bool {
        self.greater().is_none() && self.lesser().is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Greater,
    Lesser,
}

/// Similarity-partition tree over a collection.
///
/// Nodes live in an arena and refer to their children by [`NodeId`]. The
/// tree is immutable once built and safe to share across threads for
/// concurrent searches.
///
/// In a fuzzy tree the same identifier may occupy several slots. The
/// identifier accessors (`midpoint`, `next_greater`, ...) resolve to the
/// first slot allocated, which is the one reached first by a greater-first
/// pre-order walk.
///
/// Serializes as the root slot followed by every slot in arena order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tree {
    root: NodeId,
    nodes: Vec<Node>,
    #[serde(skip)]
    index: HashMap<String, NodeId>,
}

impl Tree {
    /// Builds an exact tree: every entry occupies exactly one slot.
    pub fn build<F: Fingerprint>(collection: &Collection<F>) -> Result<Self, TreeError> {
        Self::build_with(collection, &BuildConfig::exact())
    }

    /// Builds a fuzzy tree whose bifurcations overlap by `epsilon`.
    pub fn build_fuzzy<F: Fingerprint>(
        collection: &Collection<F>,
        epsilon: f64,
    ) -> Result<Self, TreeError> {
        Self::build_with(collection, &BuildConfig::with_epsilon(epsilon))
    }

    /// Builds a tree from an already deduplicated collection.
    ///
    /// The first entry of every (sub-)collection is its pivot, so the same
    /// ordered input always yields the same tree. Depth is not balanced:
    /// input sorted by similarity degrades to a list.
    ///
    /// A fuzzy band wider than the spread of the pivot scores copies most
    /// candidates to both sides, and the tree grows exponentially.
    pub fn build_with<F: Fingerprint>(
        collection: &Collection<F>,
        config: &BuildConfig,
    ) -> Result<Self, TreeError> {
        config.validate()?;
        if collection.is_empty() {
            return Err(TreeError::InvalidInput(
                "cannot build a tree from an empty collection".into(),
            ));
        }

        let mut builder = Builder {
            entries: collection.entries(),
            epsilon: config.epsilon,
            nodes: Vec::with_capacity(collection.len()),
            index: HashMap::with_capacity(collection.len()),
        };

        let mut pending = Vec::new();
        let root = builder.split(&(0..collection.len()).collect::<Vec<_>>(), &mut pending)?;
        while let Some(task) = pending.pop() {
            let child = builder.split(&task.candidates, &mut pending)?;
            builder.attach(task.parent, task.side, child);
        }

        Ok(Self {
            nodes: builder.nodes,
            root,
            index: builder.index,
        })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Identifier of the root pivot.
    pub fn root_id(&self) -> &str {
        self.nodes[self.root].id()
    }

    pub fn node(&self, slot: NodeId) -> Option<&Node> {
        self.nodes.get(slot)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Number of arena slots. Equals the collection length for an exact
    /// tree and may exceed it for a fuzzy one.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Returns the first node recorded for `id`.
    pub fn get(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&slot| &self.nodes[slot])
    }

    pub fn midpoint(&self, id: &str) -> Option<f64> {
        self.get(id).and_then(Node::midpoint)
    }

    pub fn next_greater(&self, id: &str) -> Option<&str> {
        let child = self.get(id)?.greater()?;
        Some(self.nodes[child].id())
    }

    pub fn next_lesser(&self, id: &str) -> Option<&str> {
        let child = self.get(id)?.lesser()?;
        Some(self.nodes[child].id())
    }

    /// True when `id` is in the tree and has no children.
    pub fn is_leaf(&self, id: &str) -> bool {
        self.get(id).is_some_and(Node::is_leaf)
    }

    /// Number of nodes carrying a midpoint.
    pub fn branch_count(&self) -> usize {
        self.nodes.iter().filter(|n| !n.is_leaf()).count()
    }

    /// Length of the longest root-to-leaf path; a lone root has depth 0.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self.root, 0usize)];
        while let Some((slot, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            let node = &self.nodes[slot];
            stack.extend(node.greater().map(|c| (c, depth + 1)));
            stack.extend(node.lesser().map(|c| (c, depth + 1)));
        }
        deepest
    }
}

struct Task {
    candidates: Vec<usize>,
    parent: NodeId,
    side: Side,
}

struct Builder<'a, F> {
    entries: &'a [Entry<F>],
    epsilon: f64,
    nodes: Vec<Node>,
    index: HashMap<String, NodeId>,
}

impl<F: Fingerprint> Builder<'_, F> {
    /// Turns a non-empty candidate list (positions into `entries`) into a
    /// node, queueing its non-empty sides. The greater side is pushed last
    /// so it is built first.
    fn split(&mut self, candidates: &[usize], pending: &mut Vec<Task>) -> Result<NodeId, TreeError> {
        let (&pivot, rest) = candidates
            .split_first()
            .ok_or_else(|| TreeError::InvalidInput("empty sub-collection".into()))?;
        let id = self.entries[pivot].id.clone();

        if rest.is_empty() {
            return Ok(self.push(Node::Leaf { id }));
        }

        let fingerprints: Vec<&F> = rest.iter().map(|&i| &self.entries[i].fingerprint).collect();
        let split = bifurcate(&fingerprints, &self.entries[pivot].fingerprint, self.epsilon)?;

        trace!(
            pivot = %id,
            midpoint = split.midpoint,
            lesser = split.lesser.len(),
            greater = split.greater_or_equal.len(),
            "bifurcated"
        );

        let slot = self.push(Node::Branch {
            id,
            midpoint: split.midpoint,
            greater: None,
            lesser: None,
        });

        for (positions, side) in [
            (split.lesser, Side::Lesser),
            (split.greater_or_equal, Side::Greater),
        ] {
            if positions.is_empty() {
                continue;
            }
            pending.push(Task {
                candidates: positions.into_iter().map(|k| rest[k]).collect(),
                parent: slot,
                side,
            });
        }
        Ok(slot)
    }

    fn push(&mut self, node: Node) -> NodeId {
        let slot = self.nodes.len();
        self.index.entry(node.id().to_string()).or_insert(slot);
        self.nodes.push(node);
        slot
    }

    fn attach(&mut self, parent: NodeId, side: Side, child: NodeId) {
        if let Node::Branch { greater, lesser, .. } = &mut self.nodes[parent] {
            match side {
                Side::Greater => *greater = Some(child),
                Side::Lesser => *lesser = Some(child),
            }
        }
    }
}
