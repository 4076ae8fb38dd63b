//! # Core Module
//!
//! The photo organizing engine, independent of any user interface.
//!
//! ## Modules
//! - `scanner` - Discovers candidate photos under a source folder
//! - `hasher` - Content digests and perceptual fingerprints
//! - `metadata` - Capture dates from EXIF or the file system
//! - `quality` - Resolution and size heuristics
//! - `registry` - What a run has already seen
//! - `router` - Turns the signals into one decision per photo
//! - `organize` - Library layout and atomic copies
//! - `pipeline` - Orchestrates the full run
//! - `reporter` - Run log and summary files
//! - `stats` - Distribution of an organized library

pub mod hasher;
pub mod metadata;
pub mod organize;
pub mod pipeline;
pub mod quality;
pub mod registry;
pub mod reporter;
pub mod router;
pub mod scanner;
pub mod stats;

// Re-export commonly used types
pub use hasher::{ContentDigest, PerceptualFingerprint, PerceptualHash};
pub use metadata::{CaptureDate, DateSource};
pub use pipeline::{OrganizerConfig, Pipeline};
pub use reporter::{ReportAction, ReportEntry, RunReport, RunStats};
pub use router::{ReviewCategory, RoutingDecision};
pub use scanner::PhotoFile;
