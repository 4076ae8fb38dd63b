//! Run configuration.

use crate::core::hasher::{DEFAULT_SIMILARITY_THRESHOLD, FINGERPRINT_BITS};
use crate::core::organize::{MonthLocale, YearRange};
use crate::core::quality::QualityThresholds;
use crate::error::{OrganizerError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Everything that shapes an organizing run.
///
/// Loadable from JSON; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizerConfig {
    /// Folder with the unsorted photos
    pub source: PathBuf,
    /// Library root the photos are copied into
    pub destination: PathBuf,
    /// Largest Hamming distance (0-64) still treated as a near duplicate
    pub similarity_threshold: u32,
    pub quality: QualityThresholds,
    pub locale: MonthLocale,
    /// Years whose month folders are pre-created
    pub years: YearRange,
    /// Pre-create review, problem-metadata and month folders
    pub create_skeleton: bool,
    /// Write the JSON and text reports into the destination root
    pub write_reports: bool,
    /// Route and report without copying anything
    pub dry_run: bool,
    /// Analyze each batch on the rayon thread pool
    pub parallel: bool,
    /// Photos analyzed per batch
    pub batch_size: usize,
    pub include_hidden: bool,
}

impl Default for OrganizerConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("."),
            destination: PathBuf::from("FOTOS_ORGANIZADAS"),
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            quality: QualityThresholds::default(),
            locale: MonthLocale::default(),
            years: YearRange::default(),
            create_skeleton: true,
            write_reports: true,
            dry_run: false,
            parallel: true,
            batch_size: 64,
            include_hidden: false,
        }
    }
}

impl OrganizerConfig {
    /// Load from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            OrganizerError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&raw)
            .map_err(|e| OrganizerError::Config(format!("invalid config {}: {}", path.display(), e)))
    }

    /// Reject settings that would make the run meaningless
    pub fn validate(&self) -> Result<()> {
        if self.similarity_threshold > FINGERPRINT_BITS {
            return Err(OrganizerError::Config(format!(
                "similarity threshold {} is above {}",
                self.similarity_threshold, FINGERPRINT_BITS
            )));
        }

        if self.batch_size == 0 {
            return Err(OrganizerError::Config("batch size must be at least 1".to_string()));
        }

        self.years.validate()?;

        if self.source == self.destination {
            return Err(OrganizerError::Config(format!(
                "source and destination are the same folder: {}",
                self.source.display()
            )));
        }

        Ok(())
    }
}
