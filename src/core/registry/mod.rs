//! # Registry Module
//!
//! What a run has already seen.
//!
//! The registry holds every content digest (mapped to the first file that
//! produced it) and every perceptual fingerprint, in processing order. It is
//! created for one organizing run, owned by that run, and dropped with it.
//! Nothing is ever removed while the run is in progress.
//!
//! ## Scaling
//! Similarity lookup is a linear scan, so a whole run costs O(n²)
//! comparisons. That is fine for libraries of a few thousand photos. Larger
//! libraries would want fingerprint-prefix buckets, which must keep the
//! "earliest match in processing order wins" rule.

use crate::core::hasher::{ContentDigest, PerceptualFingerprint, PerceptualHash};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A fingerprint match against an earlier photo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimilarMatch {
    pub original: PathBuf,
    pub distance: u32,
}

/// Run-scoped record of digests and fingerprints
#[derive(Debug)]
pub struct HashRegistry {
    threshold: u32,
    digests: HashMap<ContentDigest, PathBuf>,
    fingerprints: Vec<(PathBuf, PerceptualFingerprint)>,
}

impl HashRegistry {
    /// Create an empty registry; `threshold` is the largest Hamming distance
    /// still counted as similar
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold,
            digests: HashMap::new(),
            fingerprints: Vec::new(),
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Record `path` as the owner of `digest` unless an earlier file owns it.
    ///
    /// Returns the earlier owner when there is one; the registry is then left
    /// unchanged.
    pub fn claim_digest(&mut self, digest: ContentDigest, path: &Path) -> Option<PathBuf> {
        match self.digests.entry(digest) {
            Entry::Occupied(existing) => Some(existing.get().clone()),
            Entry::Vacant(slot) => {
                slot.insert(path.to_path_buf());
                None
            }
        }
    }

    /// Earliest registered fingerprint within the threshold
    pub fn find_similar(&self, fingerprint: &PerceptualFingerprint) -> Option<SimilarMatch> {
        self.fingerprints.iter().find_map(|(path, known)| {
            known
                .is_similar(fingerprint, self.threshold)
                .then(|| SimilarMatch {
                    original: path.clone(),
                    distance: known.distance(fingerprint),
                })
        })
    }

    /// Append a fingerprint to the search set
    pub fn insert_fingerprint(&mut self, path: &Path, fingerprint: PerceptualFingerprint) {
        self.fingerprints.push((path.to_path_buf(), fingerprint));
    }

    /// Return the earliest similar photo, or register this one when none matches
    pub fn match_or_insert_fingerprint(
        &mut self,
        path: &Path,
        fingerprint: PerceptualFingerprint,
    ) -> Option<SimilarMatch> {
        let found = self.find_similar(&fingerprint);
        if found.is_none() {
            self.insert_fingerprint(path, fingerprint);
        }
        found
    }

    pub fn digest_count(&self) -> usize {
        self.digests.len()
    }

    pub fn fingerprint_count(&self) -> usize {
        self.fingerprints.len()
    }
}

impl Default for HashRegistry {
    fn default() -> Self {
        Self::new(crate::core::hasher::DEFAULT_SIMILARITY_THRESHOLD)
    }
}
