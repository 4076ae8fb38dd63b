//! Fingerprint types and comparison.

use serde::{Deserialize, Serialize};

/// Default Hamming distance (out of 64 bits) under which two photos are similar
pub const DEFAULT_SIMILARITY_THRESHOLD: u32 = 5;

/// Width of a [`PerceptualFingerprint`], and so the largest possible distance
pub const FINGERPRINT_BITS: u32 = 64;

/// A computed perceptual hash that can be compared
pub trait PerceptualHash: Clone + Send + Sync {
    /// Compute the Hamming distance to another hash
    ///
    /// Returns the number of bits that differ between the two hashes.
    /// Lower distance = more similar images.
    fn distance(&self, other: &Self) -> u32;

    /// Whether the two hashes are within `threshold` differing bits
    fn is_similar(&self, other: &Self, threshold: u32) -> bool {
        self.distance(other) <= threshold
    }
}

/// 64-bit perceptual fingerprint, most significant bit first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PerceptualFingerprint {
    bytes: [u8; 8],
}

impl PerceptualFingerprint {
    /// Build a fingerprint from its 64 bits
    pub fn from_bits(bits: u64) -> Self {
        Self {
            bytes: bits.to_be_bytes(),
        }
    }

    /// The fingerprint as a single integer
    pub fn bits(&self) -> u64 {
        u64::from_be_bytes(self.bytes)
    }
}

impl PerceptualHash for PerceptualFingerprint {
    fn distance(&self, other: &Self) -> u32 {
        (self.bits() ^ other.bits()).count_ones()
    }
}

impl std::fmt::Display for PerceptualFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.bits())
    }
}
