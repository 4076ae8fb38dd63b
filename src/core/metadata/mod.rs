//! # Metadata Module
//!
//! Works out when a photo was taken.
//!
//! ## Policy
//! 1. EXIF `DateTimeOriginal`, then `DateTimeDigitized`, then `DateTime`,
//!    each in the `YYYY:MM:DD HH:MM:SS` form. The first field that parses wins;
//!    malformed fields are skipped.
//! 2. The file's last-modified time, in local time.
//! 3. Otherwise the date is unknown.
//!
//! Extraction never fails; every problem degrades to the next step.

use chrono::{DateTime, Datelike, Local, NaiveDateTime};
use exif::{In, Reader, Tag, Value};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use std::time::SystemTime;

/// EXIF date-time layout
pub const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Capture-time fields, most trustworthy first
const DATE_TAGS: [Tag; 3] = [Tag::DateTimeOriginal, Tag::DateTimeDigitized, Tag::DateTime];

/// Where a capture date came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateSource {
    FromMetadata,
    FromFileSystem,
    Unknown,
}

/// The timestamp a photo is filed under, with its provenance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureDate {
    pub timestamp: Option<NaiveDateTime>,
    pub source: DateSource,
}

impl CaptureDate {
    pub fn from_metadata(timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp: Some(timestamp),
            source: DateSource::FromMetadata,
        }
    }

    pub fn from_file_system(timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp: Some(timestamp),
            source: DateSource::FromFileSystem,
        }
    }

    pub fn unknown() -> Self {
        Self {
            timestamp: None,
            source: DateSource::Unknown,
        }
    }

    pub fn is_known(&self) -> bool {
        self.timestamp.is_some()
    }

    /// Calendar year and month (1-12), if known
    pub fn year_month(&self) -> Option<(i32, u32)> {
        self.timestamp.map(|t| (t.year(), t.month()))
    }

    /// `YYYY-MM-DD`, if known
    pub fn date_display(&self) -> Option<String> {
        self.timestamp.map(|t| t.format("%Y-%m-%d").to_string())
    }
}

/// Parse an EXIF date string such as `2022:03:10 14:05:00`
pub fn parse_exif_datetime(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim_matches(|c: char| c == '\0' || c == '"' || c.is_whitespace());
    NaiveDateTime::parse_from_str(trimmed, EXIF_DATETIME_FORMAT).ok()
}

/// Extracts capture dates from photos
#[derive(Debug, Clone, Copy, Default)]
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Capture date for a file; never fails
    pub fn extract(&self, path: &Path) -> CaptureDate {
        if let Some(timestamp) = Self::read_exif_date(path) {
            return CaptureDate::from_metadata(timestamp);
        }

        match fs::metadata(path).and_then(|m| m.modified()) {
            Ok(modified) => CaptureDate::from_file_system(Self::local_time(modified)),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "no modification time");
                CaptureDate::unknown()
            }
        }
    }

    fn read_exif_date(path: &Path) -> Option<NaiveDateTime> {
        let file = File::open(path).ok()?;
        let mut reader = BufReader::new(file);
        let exif = match Reader::new().read_from_container(&mut reader) {
            Ok(exif) => exif,
            Err(e) => {
                tracing::trace!(path = %path.display(), error = %e, "no readable EXIF");
                return None;
            }
        };

        DATE_TAGS.iter().find_map(|tag| {
            let field = exif.get_field(*tag, In::PRIMARY)?;
            let parsed = ascii_value(&field.value).and_then(|s| parse_exif_datetime(&s));
            if parsed.is_none() {
                tracing::debug!(path = %path.display(), tag = %tag, "skipping malformed date field");
            }
            parsed
        })
    }

    fn local_time(time: SystemTime) -> NaiveDateTime {
        DateTime::<Local>::from(time).naive_local()
    }
}

/// First string of an EXIF ASCII value
fn ascii_value(value: &Value) -> Option<String> {
    if let Value::Ascii(ref vec) = value {
        let bytes = vec.first()?;
        return std::str::from_utf8(bytes).ok().map(|s| s.to_string());
    }
    None
}
