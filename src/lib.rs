//! # Photo Organizer
//!
//! Turns a folder of unsorted photos into a year/month library.
//!
//! ## Core Philosophy
//! - **Never touch the source** - photos are copied, duplicates are simply
//!   not copied
//! - **When unsure, ask** - near duplicates, undated and doubtful photos go
//!   to review folders instead of the library
//! - **Explain every decision** - each photo gets a report entry
//!
//! ## Architecture
//! - `core` - The organizing engine
//! - `events` - Progress events for any front end
//! - `error` - Error types
//! - `cli` - Command-line interface (binary only)

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{OrganizerError, Result};

/// Initialize tracing for the application.
///
/// `RUST_LOG` wins when set; otherwise `verbose` selects `debug` over `warn`.
/// Logs go to stderr so JSON output on stdout stays parseable.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("tracing subscriber was already installed");
    }
}
