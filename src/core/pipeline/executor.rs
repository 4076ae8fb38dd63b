//! Pipeline execution implementation.

use super::config::OrganizerConfig;
use crate::core::organize::{LibraryLayout, MonthLocale, PhotoCopier, YearRange};
use crate::core::quality::{QualityEvaluator, QualityThresholds};
use crate::core::registry::HashRegistry;
use crate::core::reporter::{write_reports, ReportEntry, ReportPaths, RunReport, RunStats};
use crate::core::router::{PhotoAnalysis, PhotoAnalyzer, Router};
use crate::core::scanner::{PhotoFile, PhotoScanner, ScanConfig, WalkDirScanner};
use crate::error::{HashError, OrganizeError, OrganizerError, ScanError};
use crate::events::{
    null_sender, AnalyzeEvent, Event, EventSender, PipelineEvent, PipelinePhase, PipelineSummary,
    RouteEvent,
};
use chrono::Local;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use uuid::Uuid;

/// Result of pipeline execution
#[derive(Debug)]
pub struct PipelineResult {
    /// Decisions, entries and counters for the run
    pub report: RunReport,
    /// Where the reports were written, if they were
    pub report_files: Option<ReportPaths>,
    /// Folders created while copying (skeleton folders not included)
    pub folders_created: usize,
    /// Photos that were routed but could not be copied, with the error
    pub copy_failures: Vec<(PathBuf, String)>,
    /// Directories that could not be read while scanning (non-fatal)
    pub scan_errors: Vec<String>,
    /// Dot-file photos the scan left out; see `include_hidden`
    pub hidden_skipped: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

/// Builder for pipeline configuration
#[derive(Debug, Default)]
pub struct PipelineBuilder {
    config: OrganizerConfig,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a loaded configuration
    pub fn config(mut self, config: OrganizerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn source(mut self, source: impl Into<PathBuf>) -> Self {
        self.config.source = source.into();
        self
    }

    pub fn destination(mut self, destination: impl Into<PathBuf>) -> Self {
        self.config.destination = destination.into();
        self
    }

    /// Set the near-duplicate threshold (Hamming distance, inclusive)
    pub fn similarity_threshold(mut self, threshold: u32) -> Self {
        self.config.similarity_threshold = threshold;
        self
    }

    pub fn quality(mut self, thresholds: QualityThresholds) -> Self {
        self.config.quality = thresholds;
        self
    }

    pub fn locale(mut self, locale: MonthLocale) -> Self {
        self.config.locale = locale;
        self
    }

    pub fn years(mut self, years: YearRange) -> Self {
        self.config.years = years;
        self
    }

    pub fn create_skeleton(mut self, create: bool) -> Self {
        self.config.create_skeleton = create;
        self
    }

    pub fn write_reports(mut self, write: bool) -> Self {
        self.config.write_reports = write;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.config.dry_run = dry_run;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    pub fn batch_size(mut self, size: usize) -> Self {
        self.config.batch_size = size;
        self
    }

    pub fn include_hidden(mut self, include: bool) -> Self {
        self.config.include_hidden = include;
        self
    }

    pub fn build(self) -> Pipeline {
        Pipeline {
            config: self.config,
        }
    }
}

/// One organizing run from source folder to library
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: OrganizerConfig,
}

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn new(config: OrganizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OrganizerConfig {
        &self.config
    }

    /// Run the pipeline without events
    pub fn run(&self) -> Result<PipelineResult, OrganizerError> {
        self.run_with_events(&null_sender())
    }

    /// Run the pipeline with event reporting.
    ///
    /// Fails only on setup problems: invalid settings, a missing source or
    /// an unusable destination. Per-photo failures end up in the report.
    pub fn run_with_events(&self, events: &EventSender) -> Result<PipelineResult, OrganizerError> {
        let result = self.execute(events);
        if let Err(e) = &result {
            tracing::error!(error = %e, "organizing run aborted");
            events.send(Event::Pipeline(PipelineEvent::Error {
                message: e.to_string(),
            }));
        }
        result
    }

    fn execute(&self, events: &EventSender) -> Result<PipelineResult, OrganizerError> {
        let start_time = Instant::now();
        let started_at = Local::now();
        let config = &self.config;

        config.validate()?;
        events.send(Event::Pipeline(PipelineEvent::Started));
        tracing::info!(
            source = %config.source.display(),
            destination = %config.destination.display(),
            dry_run = config.dry_run,
            "organizing run started"
        );

        // Phase 1: Preparing
        events.phase(PipelinePhase::Preparing);
        let source = absolute(&config.source);
        if !source.is_dir() {
            return Err(ScanError::DirectoryNotFound { path: source }.into());
        }
        if absolute(&config.destination) == source {
            return Err(OrganizerError::Config(format!(
                "destination {} is the source folder",
                config.destination.display()
            )));
        }
        if !config.dry_run {
            fs::create_dir_all(&config.destination).map_err(|e| OrganizeError::CreateFolder {
                path: config.destination.clone(),
                source: e,
            })?;
        }
        // Resolved after creation so the scan exclusion sees the real path
        let destination = absolute(&config.destination);
        let layout = LibraryLayout::new(&destination, config.locale);

        if !config.dry_run && config.create_skeleton {
            layout.create_skeleton(&config.years)?;
        }

        // Phase 2: Scanning
        events.phase(PipelinePhase::Scanning);
        let scanner = WalkDirScanner::new(ScanConfig {
            include_hidden: config.include_hidden,
            exclude: vec![destination.clone()],
            ..ScanConfig::default()
        });
        let scan_result = scanner.scan_with_events(&source, events)?;
        let scan_errors: Vec<String> = scan_result.errors.iter().map(|e| e.to_string()).collect();
        let hidden_skipped = scan_result.hidden_skipped;
        if hidden_skipped > 0 {
            tracing::warn!(hidden_skipped, "hidden photos left out of the run");
        }
        let photos = scan_result.photos;
        let total = photos.len();

        // Phase 3: Organizing
        events.phase(PipelinePhase::Organizing);
        events.send(Event::Analyze(AnalyzeEvent::Started {
            total_photos: total,
        }));

        let analyzer = PhotoAnalyzer::new();
        let router = Router::new(QualityEvaluator::new(config.quality));
        let mut registry = HashRegistry::new(config.similarity_threshold);
        let mut copier = if config.dry_run {
            PhotoCopier::dry_run()
        } else {
            PhotoCopier::new()
        };

        let mut stats = RunStats::default();
        let mut entries = Vec::with_capacity(total);
        let mut copy_failures = Vec::new();
        let mut analyzed = 0;

        for batch in photos.chunks(config.batch_size) {
            let analyses = self.analyze_batch(&analyzer, batch);
            analyzed += batch.len();
            events.send(Event::Analyze(AnalyzeEvent::Progress {
                completed: analyzed,
                total,
            }));

            for (photo, analysis) in batch.iter().zip(analyses) {
                let index = entries.len() + 1;
                let entry = match analysis {
                    Ok(analysis) => self.route_one(
                        &analysis,
                        &router,
                        &mut registry,
                        &layout,
                        &mut copier,
                        &mut stats,
                        &mut copy_failures,
                        events,
                        (index, total),
                    ),
                    Err(e) => {
                        tracing::warn!(path = %photo.path.display(), error = %e, "unreadable photo");
                        events.send(Event::Analyze(AnalyzeEvent::Error {
                            path: photo.path.clone(),
                            message: e.to_string(),
                        }));
                        stats.record_unreadable();
                        ReportEntry::failed(photo.path.clone(), e.to_string())
                    }
                };
                entries.push(entry);
            }
        }

        events.send(Event::Analyze(AnalyzeEvent::Completed {
            total_analyzed: analyzed,
        }));

        // Phase 4: Reporting
        events.phase(PipelinePhase::Reporting);
        let report = RunReport {
            run_id: Uuid::new_v4().to_string(),
            source,
            destination,
            dry_run: config.dry_run,
            started_at,
            processed_at: Local::now(),
            stats,
            entries,
        };

        let report_files = if config.write_reports && !config.dry_run {
            match write_reports(&report, &report.destination) {
                Ok(paths) => Some(paths),
                Err(e) => {
                    tracing::warn!(error = %e, "could not write reports");
                    events.send(Event::Pipeline(PipelineEvent::Error {
                        message: e.to_string(),
                    }));
                    None
                }
            }
        } else {
            None
        };

        let duration_ms = start_time.elapsed().as_millis() as u64;
        tracing::info!(
            processed = stats.total_processed,
            kept = stats.moved_final,
            exact_duplicates = stats.exact_duplicates,
            pending_review = stats.pending_review(),
            errors = stats.errors,
            duration_ms,
            "organizing run finished"
        );
        events.send(Event::Pipeline(PipelineEvent::Completed {
            summary: PipelineSummary {
                stats,
                dry_run: config.dry_run,
                duration_ms,
            },
        }));

        Ok(PipelineResult {
            report,
            report_files,
            folders_created: copier.folders_created(),
            copy_failures,
            scan_errors,
            hidden_skipped,
            duration_ms,
        })
    }

    /// Analyses for a batch, in input order
    fn analyze_batch(
        &self,
        analyzer: &PhotoAnalyzer,
        batch: &[PhotoFile],
    ) -> Vec<Result<PhotoAnalysis, HashError>> {
        if self.config.parallel {
            batch.par_iter().map(|photo| analyzer.analyze(photo)).collect()
        } else {
            batch.iter().map(|photo| analyzer.analyze(photo)).collect()
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn route_one(
        &self,
        analysis: &PhotoAnalysis,
        router: &Router,
        registry: &mut HashRegistry,
        layout: &LibraryLayout,
        copier: &mut PhotoCopier,
        stats: &mut RunStats,
        copy_failures: &mut Vec<(PathBuf, String)>,
        events: &EventSender,
        (index, total): (usize, usize),
    ) -> ReportEntry {
        let path = &analysis.photo.path;
        let decision = router.route(analysis, registry);
        stats.record(&decision);
        tracing::debug!(path = %path.display(), decision = %decision.describe(), "routed");

        let mut copy_error = None;
        let destination = match layout.destination_dir(&decision) {
            Some(dir) => match copier.place(path, &dir) {
                Ok(placed) => Some(placed),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "copy failed");
                    stats.record_copy_failure();
                    copy_failures.push((path.clone(), e.to_string()));
                    events.send(Event::Route(RouteEvent::CopyFailed {
                        path: path.clone(),
                        message: e.to_string(),
                    }));
                    copy_error = Some(e);
                    None
                }
            },
            None => None,
        };

        events.send(Event::Route(RouteEvent::PhotoRouted {
            index,
            total,
            path: path.clone(),
            decision: decision.clone(),
            destination: destination.clone(),
        }));

        let mut entry = ReportEntry::routed(path.clone(), &decision, destination, &analysis.date);
        if let Some(e) = copy_error {
            entry.reason = Some(match entry.reason.take() {
                Some(reason) => format!("{}; copy failed: {}", reason, e),
                None => format!("copy failed: {}", e),
            });
        }
        entry
    }
}

/// Absolute, symlink-free form of `path` when it exists
fn absolute(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reporter::ReportAction;
    use crate::events::EventChannel;
    use tempfile::TempDir;

    #[test]
    fn pipeline_builder_creates_pipeline() {
        let pipeline = Pipeline::builder()
            .source("/photos/unsorted")
            .destination("/photos/library")
            .similarity_threshold(8)
            .locale(MonthLocale::English)
            .build();

        assert_eq!(pipeline.config().similarity_threshold, 8);
        assert_eq!(pipeline.config().locale, MonthLocale::English);
        assert!(pipeline.config().parallel);
    }

    #[test]
    fn pipeline_handles_empty_directory() {
        let source = TempDir::new().unwrap();
        let library = TempDir::new().unwrap();

        let result = Pipeline::builder()
            .source(source.path())
            .destination(library.path())
            .build()
            .run()
            .unwrap();

        assert_eq!(result.report.stats, RunStats::default());
        assert!(result.report.entries.is_empty());
        assert!(library.path().join("00_PENDIENTE_REVISION/FOTOS_SIN_FECHA").is_dir());
        assert!(library.path().join("2020/01_Enero").is_dir());
        assert!(result.report_files.unwrap().json.is_file());
    }

    #[test]
    fn missing_source_aborts_before_touching_destination() {
        let parent = TempDir::new().unwrap();
        let library = parent.path().join("library");
        let (sender, receiver) = EventChannel::new();

        let result = Pipeline::builder()
            .source("/nonexistent/photos")
            .destination(&library)
            .build()
            .run_with_events(&sender);

        assert!(matches!(
            result,
            Err(OrganizerError::Scan(ScanError::DirectoryNotFound { .. }))
        ));
        assert!(!library.exists());
        drop(sender);
        assert!(receiver
            .iter()
            .any(|e| matches!(e, Event::Pipeline(PipelineEvent::Error { .. }))));
    }

    #[test]
    fn invalid_threshold_aborts_before_touching_destination() {
        let source = TempDir::new().unwrap();
        let parent = TempDir::new().unwrap();
        let library = parent.path().join("library");

        let result = Pipeline::builder()
            .source(source.path())
            .destination(&library)
            .similarity_threshold(65)
            .build()
            .run();

        assert!(matches!(result, Err(OrganizerError::Config(_))));
        assert!(!library.exists());
    }

    #[test]
    fn aliased_source_as_destination_is_rejected() {
        let parent = TempDir::new().unwrap();
        let photos = parent.path().join("photos");
        fs::create_dir(&photos).unwrap();
        fs::write(photos.join("a.jpg"), b"jpeg").unwrap();

        let result = Pipeline::builder()
            .source(&photos)
            .destination(photos.join("..").join("photos"))
            .build()
            .run();

        assert!(matches!(result, Err(OrganizerError::Config(_))));
        assert!(!photos.join("00_PENDIENTE_REVISION").exists());
        assert_eq!(fs::read_dir(&photos).unwrap().count(), 1);
    }

    #[test]
    fn batch_analysis_keeps_input_order() {
        let source = TempDir::new().unwrap();
        let photo = |name: &str| PhotoFile {
            path: source.path().join(name),
            size: 0,
            modified: None,
            format: crate::core::scanner::ImageFormat::Jpeg,
        };
        fs::write(source.path().join("a.jpg"), b"a").unwrap();
        fs::write(source.path().join("c.jpg"), b"c").unwrap();
        let batch = vec![photo("a.jpg"), photo("gone.jpg"), photo("c.jpg")];

        let pipeline = Pipeline::builder().parallel(true).build();
        let analyses = pipeline.analyze_batch(&PhotoAnalyzer::new(), &batch);

        assert_eq!(analyses.len(), 3);
        assert_eq!(analyses[0].as_ref().unwrap().photo.path, batch[0].path);
        assert!(matches!(analyses[1], Err(HashError::IoError { .. })));
        assert_eq!(analyses[2].as_ref().unwrap().photo.path, batch[2].path);
    }

    #[test]
    fn hidden_photos_are_counted_but_not_processed() {
        let source = TempDir::new().unwrap();
        fs::write(source.path().join(".IMG_1.jpg"), b"jpeg").unwrap();
        fs::write(source.path().join("IMG_2.jpg"), b"jpeg").unwrap();

        let run = |include_hidden: bool| {
            Pipeline::builder()
                .source(source.path())
                .destination(source.path().join("library"))
                .include_hidden(include_hidden)
                .dry_run(true)
                .build()
                .run()
                .unwrap()
        };

        let skipped = run(false);
        assert_eq!(skipped.hidden_skipped, 1);
        assert_eq!(skipped.report.stats.total_processed, 1);

        let included = run(true);
        assert_eq!(included.hidden_skipped, 0);
        assert_eq!(included.report.stats.total_processed, 2);
    }

    #[test]
    fn dry_run_writes_nothing() {
        let source = TempDir::new().unwrap();
        let parent = TempDir::new().unwrap();
        let library = parent.path().join("library");
        fs::write(source.path().join("a.jpg"), b"not really a jpeg").unwrap();

        let result = Pipeline::builder()
            .source(source.path())
            .destination(&library)
            .dry_run(true)
            .build()
            .run()
            .unwrap();

        assert!(!library.exists());
        assert!(result.report_files.is_none());
        assert_eq!(result.report.stats.total_processed, 1);
        assert_eq!(result.report.entries[0].action, ReportAction::Review);
        assert!(result.report.entries[0].destination_path.is_some());
    }
}
