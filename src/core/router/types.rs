//! Routing decision types.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Review buckets for photos that need a human decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReviewCategory {
    /// Looks like an earlier photo but is not byte-identical
    DuplicateToConfirm,
    /// No usable capture date
    NoDate,
    /// Failed the quality heuristics
    LowQuality,
}

impl ReviewCategory {
    pub const ALL: [ReviewCategory; 3] = [
        ReviewCategory::DuplicateToConfirm,
        ReviewCategory::NoDate,
        ReviewCategory::LowQuality,
    ];

    /// Stable identifier used in reports
    pub fn slug(&self) -> &'static str {
        match self {
            ReviewCategory::DuplicateToConfirm => "duplicate-to-confirm",
            ReviewCategory::NoDate => "no-date",
            ReviewCategory::LowQuality => "low-quality",
        }
    }
}

impl std::fmt::Display for ReviewCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

/// Where a photo goes. Issued once per photo and never revised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RoutingDecision {
    /// Byte-identical to an earlier photo; not propagated to the destination
    Delete {
        reason: String,
        original_match: PathBuf,
    },
    /// Parked in a review bucket
    Review {
        category: ReviewCategory,
        reason: String,
    },
    /// Filed under its capture year and month
    Keep { year: i32, month: u32 },
}

impl RoutingDecision {
    pub fn exact_duplicate(original: &Path) -> Self {
        RoutingDecision::Delete {
            reason: "exact duplicate".to_string(),
            original_match: original.to_path_buf(),
        }
    }

    pub fn review(category: ReviewCategory, reason: impl Into<String>) -> Self {
        RoutingDecision::Review {
            category,
            reason: reason.into(),
        }
    }

    /// Whether the photo gets copied anywhere
    pub fn produces_copy(&self) -> bool {
        !matches!(self, RoutingDecision::Delete { .. })
    }

    /// One-line explanation for reports
    pub fn describe(&self) -> String {
        match self {
            RoutingDecision::Delete {
                reason,
                original_match,
            } => {
                let original = original_match
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| original_match.display().to_string());
                format!("{} of {}", reason, original)
            }
            RoutingDecision::Review {
                category: ReviewCategory::DuplicateToConfirm,
                reason,
            } => format!("possible duplicate of {}", reason),
            RoutingDecision::Review { reason, .. } => reason.clone(),
            RoutingDecision::Keep { year, month } => format!("filed under {}-{:02}", year, month),
        }
    }
}
