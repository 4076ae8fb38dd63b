//! # Scanner Module
//!
//! Discovers candidate photo files under a source root.
//!
//! ## Recognized Extensions
//! Matched case-insensitively:
//! `.jpg`, `.jpeg`, `.png`, `.gif`, `.bmp`, `.tiff`, `.raw`, `.heic`
//!
//! Candidates are returned sorted by path. Processing order decides which
//! copy of a duplicate counts as the original, so it has to be stable
//! between runs over the same tree.
//!
//! ## Example
//! ```rust,ignore
//! use photo_organizer::core::scanner::{PhotoScanner, ScanConfig, WalkDirScanner};
//!
//! let scanner = WalkDirScanner::new(ScanConfig::default());
//! let result = scanner.scan(&"/Users/me/Pictures".into())?;
//! ```

mod filter;
mod walker;

pub use filter::ImageFilter;
pub use walker::{ScanConfig, WalkDirScanner};

use crate::error::ScanError;
use crate::events::EventSender;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::SystemTime;

/// A discovered candidate photo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoFile {
    /// Path to the photo file (its identity for the run)
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Last modified time, if the filesystem reports one
    pub modified: Option<SystemTime>,
    /// Format guessed from the extension
    pub format: ImageFormat,
}

impl PhotoFile {
    /// File name without its directory
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Recognized image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Bmp,
    Tiff,
    Raw,
    Heic,
    Unknown,
}

impl ImageFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => ImageFormat::Jpeg,
            "png" => ImageFormat::Png,
            "gif" => ImageFormat::Gif,
            "bmp" => ImageFormat::Bmp,
            "tiff" => ImageFormat::Tiff,
            "raw" => ImageFormat::Raw,
            "heic" => ImageFormat::Heic,
            _ => ImageFormat::Unknown,
        }
    }

    /// Check if this format is recognized
    pub fn is_supported(&self) -> bool {
        !matches!(self, ImageFormat::Unknown)
    }
}

/// Result of a scan operation
#[derive(Debug)]
pub struct ScanResult {
    /// Discovered photos, sorted by path
    pub photos: Vec<PhotoFile>,
    /// Errors that occurred during scanning (non-fatal)
    pub errors: Vec<ScanError>,
    /// Dot-file photos left out because hidden files were not included
    pub hidden_skipped: usize,
}

/// Trait for photo scanners
///
/// Implement this trait to feed the pipeline from another source (e.g., for testing).
pub trait PhotoScanner: Send + Sync {
    /// Scan a source root and return candidate photos.
    ///
    /// A missing root is a setup failure and is returned as an error.
    fn scan(&self, root: &PathBuf) -> Result<ScanResult, ScanError>;

    /// Scan with progress reporting via events
    fn scan_with_events(
        &self,
        root: &PathBuf,
        events: &EventSender,
    ) -> Result<ScanResult, ScanError>;
}
