//! Bitwise perceptual image fingerprints.
//!
//! # Contract
//!
//! Similarity indexes only rely on the [`Fingerprint`] trait: a score where
//! larger means "more similar" and `1.0` means identical. [`BitFingerprint`]
//! is the concrete engine used throughout the workspace.
//!
//! # Bitwise Fingerprints
//!
//! A [`BitFingerprint`] is a fixed number of 16-bit words (64 by default,
//! 128 bytes). Two fingerprints are compared by normalized Hamming
//! distance:
//!
//! ```text
//! similarity = 1 - popcount(a XOR b) / (16 * words)
//! ```
//!
//! Besides full comparison the engine offers:
//!
//! - [`BitFingerprint::compressed_hash`]: a 64-bit digest for fast rejects
//!   before a full search, compared with [`BitFingerprint::compare_compressed_hash`]
//! - [`BitFingerprint::transform_to_mirror`]: rewrites the fingerprint to
//!   describe the horizontally flipped image
//!
//! ```
//! use imgsig_fingerprint::{BitFingerprint, Fingerprint};
//!
//! let a = BitFingerprint::from_samples(&[969, 22401, 56583]);
//! let b = BitFingerprint::from_samples(&[969, 22401, 56583]);
//! assert_eq!(a.compare(&b).unwrap(), 1.0);
//! assert_eq!(a.compare_compressed_hash(b.compressed_hash()), 0);
//! ```
//!
//! Extracting fingerprints from decoded images is outside this crate.

mod bits;
mod error;
mod fingerprint;

pub use bits::{BitFingerprint, DEFAULT_WORDS};
pub use error::FingerprintError;
pub use fingerprint::Fingerprint;
