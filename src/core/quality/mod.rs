//! # Quality Module
//!
//! Flags photos that should be looked at before they are filed.
//!
//! Rules, first match wins:
//! 1. The image could not be decoded - `Unreadable`
//! 2. Narrower than 800 px or shorter than 600 px - `LowResolution`
//! 3. Smaller than 50 KiB on disk - `OverCompressed`
//! 4. Otherwise `Acceptable`

use crate::core::hasher::DecodeOutcome;
use serde::{Deserialize, Serialize};

/// Outcome of the quality heuristics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityVerdict {
    Acceptable,
    LowResolution,
    OverCompressed,
    Unreadable,
}

impl QualityVerdict {
    pub fn is_acceptable(&self) -> bool {
        matches!(self, QualityVerdict::Acceptable)
    }
}

impl std::fmt::Display for QualityVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QualityVerdict::Acceptable => write!(f, "acceptable"),
            QualityVerdict::LowResolution => write!(f, "low resolution"),
            QualityVerdict::OverCompressed => write!(f, "over-compressed"),
            QualityVerdict::Unreadable => write!(f, "unreadable"),
        }
    }
}

/// Limits used by the evaluator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityThresholds {
    pub min_width: u32,
    pub min_height: u32,
    pub min_file_bytes: u64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            min_width: 800,
            min_height: 600,
            min_file_bytes: 50 * 1024,
        }
    }
}

/// Applies resolution and size heuristics
#[derive(Debug, Clone, Default)]
pub struct QualityEvaluator {
    thresholds: QualityThresholds,
}

impl QualityEvaluator {
    pub fn new(thresholds: QualityThresholds) -> Self {
        Self { thresholds }
    }

    /// Judge a photo from its decode outcome and on-disk size
    pub fn evaluate(&self, decoded: &DecodeOutcome, size_bytes: u64) -> QualityVerdict {
        let Some((width, height)) = decoded.dimensions() else {
            return QualityVerdict::Unreadable;
        };

        if width < self.thresholds.min_width || height < self.thresholds.min_height {
            return QualityVerdict::LowResolution;
        }

        if size_bytes < self.thresholds.min_file_bytes {
            return QualityVerdict::OverCompressed;
        }

        QualityVerdict::Acceptable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hasher::PerceptualFingerprint;

    fn decoded(width: u32, height: u32) -> DecodeOutcome {
        DecodeOutcome::Decoded {
            width,
            height,
            fingerprint: PerceptualFingerprint::from_bits(0),
        }
    }

    const PLENTY: u64 = 200 * 1024;

    #[test]
    fn exact_minimum_resolution_is_acceptable() {
        let evaluator = QualityEvaluator::default();
        assert_eq!(evaluator.evaluate(&decoded(800, 600), PLENTY), QualityVerdict::Acceptable);
    }

    #[test]
    fn one_pixel_short_is_low_resolution() {
        let evaluator = QualityEvaluator::default();
        assert_eq!(evaluator.evaluate(&decoded(799, 600), PLENTY), QualityVerdict::LowResolution);
        assert_eq!(evaluator.evaluate(&decoded(800, 599), PLENTY), QualityVerdict::LowResolution);
    }

    #[test]
    fn small_file_is_over_compressed() {
        let evaluator = QualityEvaluator::default();
        assert_eq!(
            evaluator.evaluate(&decoded(4000, 3000), 50 * 1024 - 1),
            QualityVerdict::OverCompressed
        );
        assert_eq!(
            evaluator.evaluate(&decoded(4000, 3000), 50 * 1024),
            QualityVerdict::Acceptable
        );
    }

    #[test]
    fn resolution_is_checked_before_size() {
        let evaluator = QualityEvaluator::default();
        assert_eq!(evaluator.evaluate(&decoded(640, 480), 10), QualityVerdict::LowResolution);
    }

    #[test]
    fn undecodable_image_is_unreadable() {
        let evaluator = QualityEvaluator::default();
        let outcome = DecodeOutcome::Unreadable {
            reason: "truncated".to_string(),
        };
        assert_eq!(evaluator.evaluate(&outcome, PLENTY), QualityVerdict::Unreadable);
    }

    #[test]
    fn custom_thresholds_apply() {
        let evaluator = QualityEvaluator::new(QualityThresholds {
            min_width: 100,
            min_height: 100,
            min_file_bytes: 0,
        });
        assert_eq!(evaluator.evaluate(&decoded(100, 100), 0), QualityVerdict::Acceptable);
    }

    #[test]
    fn verdicts_display_for_reports() {
        assert_eq!(QualityVerdict::LowResolution.to_string(), "low resolution");
        assert_eq!(QualityVerdict::OverCompressed.to_string(), "over-compressed");
    }
}
