//! # Router Module
//!
//! Decides where each photo goes.
//!
//! ## Checks
//! Evaluated in this order, stopping at the first that fires:
//! 1. **Exact duplicate** - digest already registered: `Delete`
//! 2. **Near duplicate** - fingerprint within threshold of an earlier one:
//!    `Review(duplicate-to-confirm)`
//! 3. **Date** - capture date unknown: `Review(no-date)`
//! 4. **Quality** - verdict not acceptable: `Review(low-quality)`
//! 5. Otherwise `Keep(year, month)`
//!
//! The router does no I/O. It reads a [`PhotoAnalysis`] and updates the
//! run's [`HashRegistry`].

mod analysis;
mod types;

pub use analysis::{PhotoAnalysis, PhotoAnalyzer};
pub use types::{ReviewCategory, RoutingDecision};

use crate::core::quality::QualityEvaluator;
use crate::core::registry::HashRegistry;

/// Applies the routing checks
#[derive(Debug, Clone, Default)]
pub struct Router {
    quality: QualityEvaluator,
}

impl Router {
    pub fn new(quality: QualityEvaluator) -> Self {
        Self { quality }
    }

    /// Route one photo, registering its digest and fingerprint as needed
    pub fn route(&self, analysis: &PhotoAnalysis, registry: &mut HashRegistry) -> RoutingDecision {
        let path = analysis.photo.path.as_path();

        if let Some(original) = registry.claim_digest(analysis.digest, path) {
            return RoutingDecision::exact_duplicate(&original);
        }

        // An unreadable image has no fingerprint and skips this check
        if let Some(fingerprint) = analysis.decoded.fingerprint() {
            if let Some(similar) = registry.match_or_insert_fingerprint(path, fingerprint) {
                tracing::debug!(
                    path = %path.display(),
                    original = %similar.original.display(),
                    distance = similar.distance,
                    "near duplicate"
                );
                return RoutingDecision::review(
                    ReviewCategory::DuplicateToConfirm,
                    similar.original.display().to_string(),
                );
            }
        }

        let Some((year, month)) = analysis.date.year_month() else {
            return RoutingDecision::review(ReviewCategory::NoDate, "missing date metadata");
        };

        let verdict = self.quality.evaluate(&analysis.decoded, analysis.photo.size);
        if !verdict.is_acceptable() {
            return RoutingDecision::review(ReviewCategory::LowQuality, verdict.to_string());
        }

        RoutingDecision::Keep { year, month }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hasher::{ContentHasher, DecodeOutcome, PerceptualFingerprint};
    use crate::core::metadata::CaptureDate;
    use crate::core::scanner::{ImageFormat, PhotoFile};
    use chrono::NaiveDate;
    use std::path::{Path, PathBuf};

    fn analysis(name: &str, content: &[u8], fingerprint: Option<u64>, date: CaptureDate) -> PhotoAnalysis {
        let decoded = match fingerprint {
            Some(bits) => DecodeOutcome::Decoded {
                width: 1200,
                height: 900,
                fingerprint: PerceptualFingerprint::from_bits(bits),
            },
            None => DecodeOutcome::Unreadable {
                reason: "truncated".to_string(),
            },
        };

        PhotoAnalysis {
            photo: PhotoFile {
                path: PathBuf::from(name),
                size: 200 * 1024,
                modified: None,
                format: ImageFormat::Jpeg,
            },
            digest: ContentHasher::new().hash_reader(content).unwrap(),
            decoded,
            date,
        }
    }

    fn dated(year: i32, month: u32, day: u32) -> CaptureDate {
        CaptureDate::from_metadata(
            NaiveDate::from_ymd_opt(year, month, day)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
        )
    }

    #[test]
    fn distinct_dated_photo_is_kept() {
        let router = Router::default();
        let mut registry = HashRegistry::default();

        let decision = router.route(&analysis("a.jpg", b"a", Some(0), dated(2022, 3, 10)), &mut registry);
        assert_eq!(decision, RoutingDecision::Keep { year: 2022, month: 3 });
    }

    #[test]
    fn byte_identical_photo_cites_first_seen() {
        let router = Router::default();
        let mut registry = HashRegistry::default();

        router.route(&analysis("a.jpg", b"same", Some(0), dated(2022, 3, 10)), &mut registry);
        let decision = router.route(&analysis("a_copy.jpg", b"same", Some(0), dated(2022, 3, 10)), &mut registry);

        assert_eq!(decision, RoutingDecision::exact_duplicate(Path::new("a.jpg")));
        assert_eq!(decision.describe(), "exact duplicate of a.jpg");
    }

    #[test]
    fn exact_duplicate_beats_missing_date() {
        let router = Router::default();
        let mut registry = HashRegistry::default();

        router.route(&analysis("a.jpg", b"same", None, CaptureDate::unknown()), &mut registry);
        let decision = router.route(&analysis("b.jpg", b"same", None, CaptureDate::unknown()), &mut registry);

        assert!(matches!(decision, RoutingDecision::Delete { .. }));
    }

    #[test]
    fn similar_fingerprint_goes_to_review() {
        let router = Router::default();
        let mut registry = HashRegistry::default();

        router.route(&analysis("a.jpg", b"a", Some(0), dated(2022, 3, 10)), &mut registry);
        let decision = router.route(&analysis("b.jpg", b"b", Some(0b11111), dated(2022, 3, 10)), &mut registry);

        assert_eq!(
            decision,
            RoutingDecision::review(ReviewCategory::DuplicateToConfirm, "a.jpg")
        );
    }

    #[test]
    fn six_bits_apart_is_not_a_near_duplicate() {
        let router = Router::default();
        let mut registry = HashRegistry::default();

        router.route(&analysis("a.jpg", b"a", Some(0), dated(2022, 3, 10)), &mut registry);
        let decision = router.route(&analysis("b.jpg", b"b", Some(0b111111), dated(2022, 3, 10)), &mut registry);

        assert_eq!(decision, RoutingDecision::Keep { year: 2022, month: 3 });
        assert_eq!(registry.fingerprint_count(), 2);
    }

    #[test]
    fn unknown_date_goes_to_review() {
        let router = Router::default();
        let mut registry = HashRegistry::default();

        let decision = router.route(&analysis("a.jpg", b"a", Some(0), CaptureDate::unknown()), &mut registry);
        assert_eq!(
            decision,
            RoutingDecision::review(ReviewCategory::NoDate, "missing date metadata")
        );
    }

    #[test]
    fn unreadable_image_skips_fingerprinting_and_lands_in_low_quality() {
        let router = Router::default();
        let mut registry = HashRegistry::default();

        let decision = router.route(&analysis("cut.jpg", b"cut", None, dated(2021, 1, 1)), &mut registry);

        assert_eq!(
            decision,
            RoutingDecision::review(ReviewCategory::LowQuality, "unreadable")
        );
        assert_eq!(registry.fingerprint_count(), 0);
        assert_eq!(registry.digest_count(), 1);
    }

    #[test]
    fn unreadable_image_never_matches_a_near_duplicate() {
        let router = Router::default();
        let mut registry = HashRegistry::default();

        router.route(&analysis("a.jpg", b"a", Some(0), dated(2022, 3, 10)), &mut registry);
        let decision = router.route(&analysis("b.jpg", b"b", None, dated(2022, 3, 10)), &mut registry);

        assert!(matches!(
            decision,
            RoutingDecision::Review { category: ReviewCategory::LowQuality, .. }
        ));
    }
}
