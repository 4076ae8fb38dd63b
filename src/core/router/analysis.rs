//! Per-photo signals gathered before routing.

use crate::core::hasher::{AverageHasher, ContentDigest, ContentHasher, DecodeOutcome};
use crate::core::metadata::{CaptureDate, DateExtractor};
use crate::core::scanner::PhotoFile;
use crate::error::HashError;

/// Everything the router needs to know about one photo
#[derive(Debug, Clone)]
pub struct PhotoAnalysis {
    pub photo: PhotoFile,
    pub digest: ContentDigest,
    pub decoded: DecodeOutcome,
    pub date: CaptureDate,
}

/// Reads a photo once and derives its digest, decode outcome and date.
///
/// Pure reads only, so analyses can be computed on several threads as long
/// as they are routed in file order afterwards.
#[derive(Debug, Clone, Default)]
pub struct PhotoAnalyzer {
    content: ContentHasher,
    perceptual: AverageHasher,
    dates: DateExtractor,
}

impl PhotoAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails only when the file bytes cannot be read at all
    pub fn analyze(&self, photo: &PhotoFile) -> Result<PhotoAnalysis, HashError> {
        let digest = self.content.hash(&photo.path)?;
        let decoded = DecodeOutcome::from_path(&photo.path, &self.perceptual);
        let date = self.dates.extract(&photo.path);

        Ok(PhotoAnalysis {
            photo: photo.clone(),
            digest,
            decoded,
            date,
        })
    }
}
