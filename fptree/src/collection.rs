use std::slice;
use std::vec;

use crate::store::MemoryStore;

/// An identifier paired with its fingerprint.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<F> {
    /// Unique name of the fingerprint (e.g. a filename).
    pub id: String,
    pub fingerprint: F,
}

impl<F> Entry<F> {
    pub fn new(id: impl Into<String>, fingerprint: F) -> Self {
        Self {
            id: id.into(),
            fingerprint,
        }
    }
}

/// Ordered sequence of entries.
///
/// Order is significant: the first entry of a collection handed to the
/// tree builder becomes the root pivot, and so on recursively for every
/// sub-collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<F> {
    entries: Vec<Entry<F>>,
}

impl<F> Collection<F> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends an entry at the end.
    pub fn push(&mut self, id: impl Into<String>, fingerprint: F) {
        self.entries.push(Entry::new(id, fingerprint));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Entry<F>> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[Entry<F>] {
        &self.entries
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.id.as_str())
    }

    /// Appends every entry of `other`, keeping its order.
    pub fn append(&mut self, other: Collection<F>) {
        self.entries.extend(other.entries);
    }

    pub fn into_entries(self) -> Vec<Entry<F>> {
        self.entries
    }

    /// Moves the fingerprints into an id-keyed store. Later entries replace
    /// earlier ones sharing an identifier.
    pub fn into_store(self) -> MemoryStore<F> {
        self.entries.into_iter().collect()
    }
}

impl<F> Default for Collection<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> From<Vec<Entry<F>>> for Collection<F> {
    fn from(entries: Vec<Entry<F>>) -> Self {
        Self { entries }
    }
}

impl<F> FromIterator<Entry<F>> for Collection<F> {
    fn from_iter<I: IntoIterator<Item = Entry<F>>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<F> IntoIterator for Collection<F> {
    type Item = Entry<F>;
    type IntoIter = vec::IntoIter<Entry<F>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, F> IntoIterator for &'a Collection<F> {
    type Item = &'a Entry<F>;
    type IntoIter = slice::Iter<'a, Entry<F>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FingerprintStore;

    #[test]
    fn push_keeps_order() {
        let mut c = Collection::new();
        c.push("b", 2u8);
        c.push("a", 1u8);
        c.push("c", 3u8);
        assert_eq!(c.len(), 3);
        assert_eq!(c.ids().collect::<Vec<_>>(), vec!["b", "a", "c"]);
    }

    #[test]
    fn append_collections() {
        let mut c: Collection<u8> = vec![Entry::new("x", 1)].into();
        c.append(vec![Entry::new("y", 2), Entry::new("x", 3)].into());
        assert_eq!(c.ids().collect::<Vec<_>>(), vec!["x", "y", "x"]);
    }

    #[test]
    fn into_store_keys_by_id() {
        let c: Collection<u8> = vec![Entry::new("x", 1), Entry::new("y", 2)].into_iter().collect();
        let store = c.into_store();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("y"), Some(&2));
        assert_eq!(store.get("z"), None);
    }
}
