//! # CLI Module
//!
//! Command-line interface for the photo organizer.
//!
//! ## Usage
//! ```bash
//! # Organize a folder into a library
//! photo-organize organize ~/unsorted ~/Library
//!
//! # See what would happen, without copying
//! photo-organize organize ~/unsorted ~/Library --dry-run
//!
//! # English month folders, stricter near-duplicate matching
//! photo-organize organize ~/unsorted ~/Library --locale en --threshold 3
//!
//! # Settings from a file, JSON output
//! photo-organize organize ~/unsorted ~/Library --config organizer.json --output json
//!
//! # How the library is distributed
//! photo-organize stats ~/Library
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use photo_organizer::core::organize::{MonthLocale, YearRange, REVIEW_ROOT};
use photo_organizer::core::pipeline::{OrganizerConfig, Pipeline, PipelineResult};
use photo_organizer::core::reporter::ReportAction;
use photo_organizer::core::stats::{LibraryAnalyzer, LibraryStats};
use photo_organizer::error::{OrganizerError, ReportError, Result};
use photo_organizer::events::{Event, EventChannel, PipelineEvent, RouteEvent, ScanEvent};
use std::path::{Path, PathBuf};
use std::thread;

/// Photo Organizer - sort photos into year/month folders, set duplicates aside
#[derive(Parser, Debug)]
#[command(name = "photo-organize")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Copy photos from SOURCE into a year/month library at DEST
    Organize {
        /// Folder with the unsorted photos
        source: PathBuf,

        /// Library folder (created if missing)
        destination: PathBuf,

        /// JSON settings file; command-line flags override it
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Near-duplicate threshold (Hamming distance, 0-64)
        #[arg(short, long)]
        threshold: Option<u32>,

        /// Month folder names: es (01_Enero) or en (01_January)
        #[arg(short, long)]
        locale: Option<MonthLocale>,

        /// Years whose month folders are pre-created, e.g. 2018-2025
        #[arg(long)]
        years: Option<YearRange>,

        /// Minimum width in pixels before a photo is flagged
        #[arg(long)]
        min_width: Option<u32>,

        /// Minimum height in pixels before a photo is flagged
        #[arg(long)]
        min_height: Option<u32>,

        /// Minimum file size in KiB before a photo is flagged
        #[arg(long)]
        min_size_kb: Option<u64>,

        /// Do not pre-create the empty folder skeleton
        #[arg(long)]
        no_skeleton: bool,

        /// Decide and report, but copy nothing
        #[arg(long)]
        dry_run: bool,

        /// Analyze photos on a single thread
        #[arg(long)]
        sequential: bool,

        /// Include hidden files and folders
        #[arg(long)]
        include_hidden: bool,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show how photos are spread across an organized library
    Stats {
        /// Library folder
        library: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
}

/// Settings gathered from the `organize` flags
struct OrganizeArgs {
    source: PathBuf,
    destination: PathBuf,
    config: Option<PathBuf>,
    threshold: Option<u32>,
    locale: Option<MonthLocale>,
    years: Option<YearRange>,
    min_width: Option<u32>,
    min_height: Option<u32>,
    min_size_kb: Option<u64>,
    no_skeleton: bool,
    dry_run: bool,
    sequential: bool,
    include_hidden: bool,
}

impl OrganizeArgs {
    /// File settings first, then flags on top
    fn into_config(self) -> Result<OrganizerConfig> {
        let mut config = match &self.config {
            Some(path) => OrganizerConfig::from_json_file(path)?,
            None => OrganizerConfig::default(),
        };

        config.source = self.source;
        config.destination = self.destination;
        if let Some(threshold) = self.threshold {
            config.similarity_threshold = threshold;
        }
        if let Some(locale) = self.locale {
            config.locale = locale;
        }
        if let Some(years) = self.years {
            config.years = years;
        }
        if let Some(width) = self.min_width {
            config.quality.min_width = width;
        }
        if let Some(height) = self.min_height {
            config.quality.min_height = height;
        }
        if let Some(kb) = self.min_size_kb {
            config.quality.min_file_bytes = kb * 1024;
        }
        if self.no_skeleton {
            config.create_skeleton = false;
        }
        if self.dry_run {
            config.dry_run = true;
        }
        if self.sequential {
            config.parallel = false;
        }
        if self.include_hidden {
            config.include_hidden = true;
        }

        Ok(config)
    }
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Organize {
            source,
            destination,
            config,
            threshold,
            locale,
            years,
            min_width,
            min_height,
            min_size_kb,
            no_skeleton,
            dry_run,
            sequential,
            include_hidden,
            output,
            verbose,
        } => {
            photo_organizer::init_tracing(verbose);
            let args = OrganizeArgs {
                source,
                destination,
                config,
                threshold,
                locale,
                years,
                min_width,
                min_height,
                min_size_kb,
                no_skeleton,
                dry_run,
                sequential,
                include_hidden,
            };
            run_organize(args.into_config()?, output, verbose)
        }
        Commands::Stats {
            library,
            output,
            verbose,
        } => {
            photo_organizer::init_tracing(verbose);
            run_stats(&library, output)
        }
    }
}

fn run_organize(config: OrganizerConfig, output: OutputFormat, verbose: bool) -> Result<()> {
    let term = Term::stderr();

    if matches!(output, OutputFormat::Pretty) {
        term.write_line(&format!(
            "{} {}",
            style("Photo Organizer").bold().cyan(),
            style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
        term.write_line("").ok();
    }

    let pipeline = Pipeline::builder().config(config).build();

    // Set up event handling
    let (sender, receiver) = EventChannel::new();

    let progress = if matches!(output, OutputFormat::Pretty) {
        let pb = ProgressBar::new(0);
        if let Ok(bar_style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(bar_style.progress_chars("█▓░"));
        }
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();

    // Handle events in a separate thread
    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            let Some(ref pb) = progress_clone else {
                continue;
            };
            match event {
                Event::Pipeline(PipelineEvent::PhaseChanged { phase }) => {
                    pb.set_message(format!("{}", phase));
                }
                Event::Scan(ScanEvent::Completed { total_photos }) => {
                    pb.set_length(total_photos as u64);
                }
                Event::Route(RouteEvent::PhotoRouted { index, path, .. }) => {
                    pb.set_position(index as u64);
                    if verbose {
                        pb.set_message(
                            path.file_name()
                                .unwrap_or_default()
                                .to_string_lossy()
                                .into_owned(),
                        );
                    }
                }
                Event::Route(RouteEvent::CopyFailed { path, message }) => {
                    pb.println(format!(
                        "{} {}: {}",
                        style("!").red().bold(),
                        display_path(&path),
                        message
                    ));
                }
                Event::Pipeline(PipelineEvent::Completed { .. })
                | Event::Pipeline(PipelineEvent::Error { .. }) => {
                    pb.finish_and_clear();
                }
                _ => {}
            }
        }
    });

    let result = pipeline.run_with_events(&sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let result = result?;

    match output {
        OutputFormat::Pretty => print_pretty_run(&term, &result, verbose),
        OutputFormat::Json => print_json(&result.report)?,
    }

    Ok(())
}

fn print_pretty_run(term: &Term, result: &PipelineResult, verbose: bool) {
    let report = &result.report;
    let stats = &report.stats;

    term.write_line(&format!(
        "{} Organization complete{}",
        style("✓").green().bold(),
        if report.dry_run {
            style(" (dry run, nothing copied)").yellow().to_string()
        } else {
            String::new()
        }
    ))
    .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} photos processed in {:.1}s",
        style(stats.total_processed).cyan(),
        result.duration_ms as f64 / 1000.0
    ))
    .ok();

    let lines = [
        ("filed into the library", stats.moved_final, style("✓").green()),
        ("exact duplicates not copied", stats.exact_duplicates, style("×").dim()),
        ("possible duplicates to confirm", stats.near_duplicates, style("?").yellow()),
        ("photos without a date", stats.missing_date, style("?").yellow()),
        ("photos of doubtful quality", stats.low_quality, style("?").yellow()),
        ("errors", stats.errors, style("!").red()),
    ];
    for (label, count, marker) in lines {
        term.write_line(&format!("  {} {} {}", marker, style(count).cyan(), label))
            .ok();
    }
    term.write_line("").ok();

    let failures: Vec<(&Path, &str)> = report
        .entries_with(ReportAction::Error)
        .map(|e| (e.source_path.as_path(), e.reason.as_deref().unwrap_or("unreadable")))
        .chain(
            result
                .copy_failures
                .iter()
                .map(|(path, message)| (path.as_path(), message.as_str())),
        )
        .collect();
    if !failures.is_empty() {
        term.write_line(&format!("{}", style("Problems:").bold().underlined()))
            .ok();
        let shown = if verbose { failures.len() } else { failures.len().min(10) };
        for (path, message) in &failures[..shown] {
            term.write_line(&format!(
                "  {} {}: {}",
                style("!").red(),
                display_path(path),
                message
            ))
            .ok();
        }
        if shown < failures.len() {
            term.write_line(&format!(
                "  {}",
                style(format!("... and {} more (see the report)", failures.len() - shown)).dim()
            ))
            .ok();
        }
        term.write_line("").ok();
    }

    if result.hidden_skipped > 0 {
        term.write_line(&format!(
            "  {} {} hidden photos were left out (use --include-hidden)",
            style("!").yellow(),
            style(result.hidden_skipped).yellow()
        ))
        .ok();
        term.write_line("").ok();
    }

    if verbose && !result.scan_errors.is_empty() {
        term.write_line(&format!("{}", style("Unreadable folders:").bold()))
            .ok();
        for error in &result.scan_errors {
            term.write_line(&format!("  {} {}", style("!").red(), error)).ok();
        }
        term.write_line("").ok();
    }

    if let Some(files) = &result.report_files {
        term.write_line(&format!(
            "  Report:  {}",
            style(display_path(&files.json)).dim()
        ))
        .ok();
        term.write_line(&format!(
            "  Summary: {}",
            style(display_path(&files.summary)).dim()
        ))
        .ok();
        term.write_line("").ok();
    }

    if stats.pending_review() > 0 {
        term.write_line(&format!(
            "{} photos are waiting in {}",
            style(stats.pending_review()).yellow().bold(),
            display_path(&report.destination.join(REVIEW_ROOT))
        ))
        .ok();
    }

    // Footer
    term.write_line(&format!(
        "{}",
        style("Source photos were not modified or removed.").dim()
    ))
    .ok();
}

fn run_stats(library: &Path, output: OutputFormat) -> Result<()> {
    let stats = LibraryAnalyzer::new().analyze(library)?;

    match output {
        OutputFormat::Pretty => print_pretty_stats(&Term::stdout(), &stats),
        OutputFormat::Json => print_json(&stats)?,
    }

    Ok(())
}

fn print_pretty_stats(term: &Term, stats: &LibraryStats) {
    term.write_line(&format!(
        "{} {}",
        style("Library:").bold(),
        display_path(&stats.root)
    ))
    .ok();
    term.write_line("").ok();

    if stats.total_photos == 0 {
        term.write_line(&format!(
            "  {} No photos organized by year/month yet",
            style("!").yellow()
        ))
        .ok();
    } else {
        term.write_line(&format!(
            "  {} photos organized",
            style(stats.total_photos).cyan().bold()
        ))
        .ok();
        term.write_line("").ok();

        for year in &stats.years {
            let share = stats.share(year.total);
            term.write_line(&format!(
                "  {}  {} photos ({:.1}%)",
                style(&year.year).bold(),
                year.total,
                share
            ))
            .ok();
            term.write_line(&format!(
                "        {}",
                style("█".repeat((share / 2.0) as usize)).cyan()
            ))
            .ok();
            for month in year.top_months(3) {
                term.write_line(&format!(
                    "        {} {} ({:.1}%)",
                    style(&month.folder).dim(),
                    month.count,
                    month.count as f64 * 100.0 / year.total as f64
                ))
                .ok();
            }
        }
        term.write_line("").ok();

        term.write_line(&format!("{}", style("Busiest years:").bold().underlined()))
            .ok();
        for (rank, year) in stats.top_years(3).iter().enumerate() {
            term.write_line(&format!(
                "  {}. {}: {} photos ({:.1}%)",
                rank + 1,
                year.year,
                year.total,
                stats.share(year.total)
            ))
            .ok();
        }
        term.write_line("").ok();

        term.write_line(&format!("  Years with photos: {}", stats.years.len()))
            .ok();
        if let Some(average) = stats.average_per_year() {
            term.write_line(&format!("  Average per year: {} photos", average))
                .ok();
        }
        if stats.empty_month_folders > 0 {
            term.write_line(&format!(
                "  Empty month folders: {}",
                style(stats.empty_month_folders).dim()
            ))
            .ok();
        }
    }

    term.write_line("").ok();
    if stats.pending_review.is_empty() {
        term.write_line(&format!(
            "  {} Nothing waiting for review",
            style("✓").green()
        ))
        .ok();
    } else {
        term.write_line(&format!("{}", style("Waiting for review:").bold().underlined()))
            .ok();
        for folder in &stats.pending_review {
            term.write_line(&format!("  {}: {} photos", folder.folder, folder.count))
                .ok();
        }
        term.write_line(&format!(
            "  Total: {} photos",
            style(stats.total_pending()).yellow().bold()
        ))
        .ok();
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| OrganizerError::Report(ReportError::SerializationFailed(e.to_string())))?;
    println!("{}", json);
    Ok(())
}

/// Path with the home directory shortened to `~`
fn display_path(path: &Path) -> String {
    match dirs::home_dir() {
        Some(home) => match path.strip_prefix(&home) {
            Ok(rest) => format!("~/{}", rest.display()),
            Err(_) => path.display().to_string(),
        },
        None => path.display().to_string(),
    }
}
