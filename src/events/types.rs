//! Event type definitions for progress reporting.

use crate::core::reporter::RunStats;
use crate::core::router::RoutingDecision;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by an organizing run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Scanning phase events
    Scan(ScanEvent),
    /// Analysis phase events (hashing, decoding, dates)
    Analyze(AnalyzeEvent),
    /// Per-photo routing events
    Route(RouteEvent),
    /// Pipeline-level events
    Pipeline(PipelineEvent),
}

/// Events during the scanning phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Scanning has started
    Started { root: PathBuf },
    /// Progress update during scanning
    Progress(ScanProgress),
    /// An error occurred but scanning continues
    Error { path: PathBuf, message: String },
    /// Scanning completed
    Completed { total_photos: usize },
}

/// Progress information during scanning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanProgress {
    /// Number of directories scanned so far
    pub directories_scanned: usize,
    /// Number of photos found so far
    pub photos_found: usize,
    /// Current directory being scanned
    pub current_path: PathBuf,
}

/// Events during the analysis phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AnalyzeEvent {
    Started { total_photos: usize },
    /// Sent after each batch
    Progress { completed: usize, total: usize },
    /// The file could not be read; it will be reported as an error
    Error { path: PathBuf, message: String },
    Completed { total_analyzed: usize },
}

/// Events while photos are routed and copied
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RouteEvent {
    /// A decision was made (and the copy done, unless it failed)
    PhotoRouted {
        /// 1-based position in processing order
        index: usize,
        total: usize,
        path: PathBuf,
        decision: RoutingDecision,
        destination: Option<PathBuf>,
    },
    /// The decision stands but the copy failed
    CopyFailed { path: PathBuf, message: String },
}

/// Pipeline-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// Pipeline has started
    Started,
    /// Moving to a new phase
    PhaseChanged { phase: PipelinePhase },
    /// Pipeline completed successfully
    Completed { summary: PipelineSummary },
    /// Pipeline encountered a fatal error
    Error { message: String },
}

/// Phases of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelinePhase {
    /// Validating settings and creating the destination skeleton
    Preparing,
    Scanning,
    /// Analyzing, routing and copying, batch by batch
    Organizing,
    Reporting,
}

/// Summary of a finished run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    pub stats: RunStats,
    /// No files were copied
    pub dry_run: bool,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelinePhase::Preparing => write!(f, "Preparing"),
            PipelinePhase::Scanning => write!(f, "Scanning"),
            PipelinePhase::Organizing => write!(f, "Organizing"),
            PipelinePhase::Reporting => write!(f, "Reporting"),
        }
    }
}
