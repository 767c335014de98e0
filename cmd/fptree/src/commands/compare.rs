//! Mirror-aware comparison of two text fingerprints.

use clap::Args;
use imgsig_fingerprint::{BitFingerprint, Fingerprint};
use serde::Serialize;

use super::output_result;
use crate::Cli;

/// Compare two fingerprints given as whitespace-separated integers.
///
/// Prints the similarity, negated when the second fingerprint matches the
/// first better as a mirror image.
#[derive(Args)]
pub struct CompareCommand {
    /// First fingerprint
    pub first: String,

    /// Second fingerprint
    pub second: String,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct CompareOutput {
    /// `direct`, or `-mirror` when the mirror scores at least as high.
    pub similarity: f64,
    pub direct: f64,
    pub mirror: f64,
    /// Bits differing between the two compressed hashes.
    pub hash_distance: u32,
}

pub fn compare(a: &BitFingerprint, b: &BitFingerprint) -> anyhow::Result<CompareOutput> {
    let direct = a.compare(b)?;
    let mirror = a.compare(&b.mirrored())?;
    Ok(CompareOutput {
        similarity: if direct > mirror { direct } else { -mirror },
        direct,
        mirror,
        hash_distance: a.compare_compressed_hash(b.compressed_hash()),
    })
}

impl CompareCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let a: BitFingerprint = self.first.parse()?;
        let b: BitFingerprint = self.second.parse()?;
        let out = compare(&a, &b)?;
        if cli.json || cli.output.is_some() {
            output_result(&out, cli.output.as_deref(), cli.json)
        } else {
            println!("{:1.5}", out.similarity);
            Ok(())
        }
    }
}
