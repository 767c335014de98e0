use std::collections::HashMap;

use crate::{Entry, TreeError};

/// Backing fingerprint lookup used while searching a tree.
///
/// The store must hold every identifier the tree names. It is read-only
/// during search, so implementations need no interior locking.
pub trait FingerprintStore<F>: Send + Sync {
    /// Returns the fingerprint registered under `id`.
    fn get(&self, id: &str) -> Option<&F>;

    /// Returns the number of stored fingerprints.
    fn len(&self) -> usize;

    /// Returns true if the store holds no fingerprints.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory [`FingerprintStore`] keyed by identifier.
#[derive(Debug, Clone)]
pub struct MemoryStore<F> {
    fingerprints: HashMap<String, F>,
}

impl<F> MemoryStore<F> {
    pub fn new() -> Self {
        Self {
            fingerprints: HashMap::new(),
        }
    }

    /// Registers a fingerprint, returning the one it replaced.
    pub fn insert(&mut self, id: impl Into<String>, fingerprint: F) -> Option<F> {
        self.fingerprints.insert(id.into(), fingerprint)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.fingerprints.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.fingerprints.keys().map(String::as_str)
    }
}

impl<F> Default for MemoryStore<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> FromIterator<Entry<F>> for MemoryStore<F> {
    fn from_iter<I: IntoIterator<Item = Entry<F>>>(iter: I) -> Self {
        Self {
            fingerprints: iter
                .into_iter()
                .map(|e| (e.id, e.fingerprint))
                .collect(),
        }
    }
}

impl<F: Send + Sync> FingerprintStore<F> for MemoryStore<F> {
    fn get(&self, id: &str) -> Option<&F> {
        self.fingerprints.get(id)
    }

    fn len(&self) -> usize {
        self.fingerprints.len()
    }
}

impl<F: Send + Sync> FingerprintStore<F> for HashMap<String, F> {
    fn get(&self, id: &str) -> Option<&F> {
        HashMap::get(self, id)
    }

    fn len(&self) -> usize {
        HashMap::len(self)
    }
}

/// Looks up `id`, turning absence into [`TreeError::LookupFailure`].
pub(crate) fn fetch<'a, F, S>(store: &'a S, id: &str) -> Result<&'a F, TreeError>
where
    S: FingerprintStore<F> + ?Sized,
{
    store.get(id).ok_or_else(|| TreeError::LookupFailure { id: id.to_string() })
}
