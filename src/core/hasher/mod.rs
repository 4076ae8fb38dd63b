//! # Hasher Module
//!
//! The two identity signals used for deduplication.
//!
//! - **Content digest** - BLAKE3 over the file bytes, streamed in fixed-size
//!   chunks. Equal digests mean byte-identical files.
//! - **Perceptual fingerprint** - 64-bit average hash (aHash) over an 8x8
//!   luminance grid. Survives recompression and resizing; compared by
//!   Hamming distance.
//!
//! ## Decoding
//! Each photo is decoded once. The resulting [`DecodeOutcome`] carries both
//! the fingerprint and the pixel dimensions, so near-duplicate detection and
//! quality evaluation can never disagree about whether a photo was readable.
//!
//! ## Example
//! ```rust,ignore
//! use photo_organizer::core::hasher::{AverageHasher, ContentHasher, DecodeOutcome};
//!
//! let digest = ContentHasher::new().hash(&path)?;
//! let outcome = DecodeOutcome::from_path(&path, &AverageHasher::new());
//! ```

mod average;
mod content;
pub mod decode;
mod traits;

pub use average::{AverageHasher, GRID_SIZE};
pub use content::{ContentDigest, ContentHasher};
pub use decode::{DecodeOutcome, FastDecoder};
pub use traits::{
    PerceptualFingerprint, PerceptualHash, DEFAULT_SIMILARITY_THRESHOLD, FINGERPRINT_BITS,
};
