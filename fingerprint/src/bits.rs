use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Fingerprint, FingerprintError};

/// Number of 16-bit words in a default fingerprint (128 bytes).
pub const DEFAULT_WORDS: usize = 64;

/// Fixed-capacity bitwise fingerprint compared by normalized Hamming distance.
///
/// The default layout is an 8x8 grid of 4x4 blocks, one 16-bit word per
/// block, each bit recording whether a cell of the block sits above the
/// block mean. The value is immutable apart from [`BitFingerprint::transform_to_mirror`].
///
/// # Serialized Form
///
/// Serializes as its integer array (`[969, 22401, ...]`), which is also
/// what [`BitFingerprint::samples`] returns.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u16>", into = "Vec<u16>")]
pub struct BitFingerprint {
    words: Box<[u16]>,
}

impl BitFingerprint {
    /// Creates a default-capacity fingerprint from raw samples.
    ///
    /// Values beyond [`DEFAULT_WORDS`] are dropped; missing values are
    /// zero-filled.
    pub fn from_samples(values: &[u16]) -> Self {
        Self::sized(DEFAULT_WORDS, values)
    }

    /// Creates a fingerprint holding `words` 16-bit words.
    pub fn with_words(words: usize, values: &[u16]) -> Result<Self, FingerprintError> {
        if words == 0 {
            return Err(FingerprintError::EmptyCapacity);
        }
        Ok(Self::sized(words, values))
    }

    fn sized(words: usize, values: &[u16]) -> Self {
        let mut buf = vec![0u16; words];
        let n = values.len().min(words);
        buf[..n].copy_from_slice(&values[..n]);
        Self {
            words: buf.into_boxed_slice(),
        }
    }

    /// Returns the integer-array form of the fingerprint.
    pub fn samples(&self) -> &[u16] {
        &self.words
    }

    /// Returns the number of 16-bit words.
    pub fn words(&self) -> usize {
        self.words.len()
    }

    pub fn size_in_bytes(&self) -> usize {
        self.words.len() * 2
    }

    /// Counts differing bits between two fingerprints of equal capacity.
    pub fn hamming(&self, other: &Self) -> Result<u32, FingerprintError> {
        if self.words.len() != other.words.len() {
            return Err(FingerprintError::SizeMismatch {
                expected: self.words.len(),
                got: other.words.len(),
            });
        }
        Ok(self
            .words
            .iter()
            .zip(other.words.iter())
            .map(|(a, b)| (a ^ b).count_ones())
            .sum())
    }

    /// Folds the fingerprint into 64 bits for cheap pre-filtering.
    ///
    /// Word `i` sets bit `words - 1 - i` when it is strictly above the
    /// (truncated) mean of all words. Words that would land past bit 63
    /// do not contribute.
    pub fn compressed_hash(&self) -> u64 {
        let n = self.words.len();
        let sum: u64 = self.words.iter().map(|&w| u64::from(w)).sum();
        let average = sum / n as u64;

        let mut hash = 0u64;
        for (i, &w) in self.words.iter().enumerate() {
            let shift = n - 1 - i;
            if shift < 64 && u64::from(w) > average {
                hash |= 1u64 << shift;
            }
        }
        hash
    }

    /// Returns the number of bits differing between this fingerprint's
    /// compressed hash and `other_hash`.
    pub fn compare_compressed_hash(&self, other_hash: u64) -> u32 {
        (self.compressed_hash() ^ other_hash).count_ones()
    }

    /// Rewrites the fingerprint in place to describe the horizontally
    /// flipped image. Applying it twice restores the original.
    pub fn transform_to_mirror(&mut self) {
        let blocks = grid_side(self.words.len());
        for column in 0..blocks / 2 {
            for row in 0..blocks {
                self.words
                    .swap(blocks * column + row, blocks * (blocks - column - 1) + row);
            }
        }
        for w in self.words.iter_mut() {
            *w = reverse_nibble_bits(*w);
        }
    }

    /// Returns the mirrored copy, leaving `self` untouched.
    pub fn mirrored(&self) -> Self {
        let mut m = self.clone();
        m.transform_to_mirror();
        m
    }
}

impl Fingerprint for BitFingerprint {
    fn compare(&self, other: &Self) -> Result<f64, FingerprintError> {
        let distance = self.hamming(other)?;
        let bits = (self.words.len() * 16) as f64;
        Ok(1.0 - f64::from(distance) / bits)
    }
}

impl Default for BitFingerprint {
    fn default() -> Self {
        Self::sized(DEFAULT_WORDS, &[])
    }
}

impl fmt::Debug for BitFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitFingerprint")
            .field("words", &self.words.len())
            .field("compressed_hash", &format_args!("{:016X}", self.compressed_hash()))
            .finish()
    }
}

/// Space-separated decimal words, the text form accepted by [`FromStr`].
impl fmt::Display for BitFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, w) in self.words.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{w}")?;
        }
        Ok(())
    }
}

impl FromStr for BitFingerprint {
    type Err = FingerprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split_whitespace()
            .map(|tok| {
                tok.parse::<u16>()
                    .map_err(|e| FingerprintError::Parse(format!("{tok:?}: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if values.is_empty() {
            return Err(FingerprintError::Parse("empty fingerprint text".into()));
        }
        Ok(Self::from_samples(&values))
    }
}

impl TryFrom<Vec<u16>> for BitFingerprint {
    type Error = FingerprintError;

    fn try_from(values: Vec<u16>) -> Result<Self, Self::Error> {
        Self::with_words(values.len(), &values)
    }
}

impl From<BitFingerprint> for Vec<u16> {
    fn from(fp: BitFingerprint) -> Self {
        fp.words.into_vec()
    }
}

/// Side length of the square block grid covered by `words` blocks.
fn grid_side(words: usize) -> usize {
    let mut side = 0;
    while (side + 1) * (side + 1) <= words {
        side += 1;
    }
    side
}

/// Reverses the bit order inside each nibble of `w`.
fn reverse_nibble_bits(w: u16) -> u16 {
    let w = ((w >> 1) & 0x5555) | ((w & 0x5555) << 1);
    ((w >> 2) & 0x3333) | ((w & 0x3333) << 2)
}
