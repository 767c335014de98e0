use std::collections::HashSet;

use imgsig_fingerprint::Fingerprint;
use tracing::debug;

use crate::config::DUPLICATE_THRESHOLD;
use crate::{Collection, TreeError};

/// Removes near-identical fingerprints, keeping the earliest occurrence.
///
/// Every ordered pair `(i, j)` with `i < j` is compared, including pairs
/// whose earlier member was already marked, and `j` is dropped when the
/// score exceeds [`DUPLICATE_THRESHOLD`]. This is O(n²) comparisons. The
/// output never holds two fingerprints scoring above the threshold, so
/// running it again is a no-op.
pub fn dedup_fingerprints<F: Fingerprint>(
    collection: Collection<F>,
) -> Result<Collection<F>, TreeError> {
    let entries = collection.into_entries();
    let mut dupes = vec![false; entries.len()];

    for (i, earlier) in entries.iter().enumerate() {
        for (offset, later) in entries[i + 1..].iter().enumerate() {
            let score = earlier.fingerprint.compare(&later.fingerprint)?;
            if score > DUPLICATE_THRESHOLD {
                let j = i + 1 + offset;
                if !dupes[j] {
                    debug!(kept = %earlier.id, skipped = %later.id, score, "skipping duplicate fingerprint");
                }
                dupes[j] = true;
            }
        }
    }

    Ok(entries
        .into_iter()
        .zip(dupes)
        .filter(|(_, dupe)| !dupe)
        .map(|(entry, _)| entry)
        .collect())
}

/// Removes entries whose identifier already appeared earlier.
///
/// Only needed when merging collections from several sources; a single
/// source is expected to name its fingerprints uniquely.
pub fn dedup_identifiers<F>(collection: Collection<F>) -> Collection<F> {
    let mut seen = HashSet::new();
    collection
        .into_iter()
        .filter(|entry| {
            let first = seen.insert(entry.id.clone());
            if !first {
                debug!(id = %entry.id, "skipping non-uniquely named entry");
            }
            first
        })
        .collect()
}
