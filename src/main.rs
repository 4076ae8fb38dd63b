//! # photo-organize CLI
//!
//! Command-line interface for the photo organizer.
//!
//! ## Usage
//! ```bash
//! photo-organize organize ~/Desktop/unsorted ~/Pictures/Library
//! photo-organize organize ~/Desktop/unsorted ~/Pictures/Library --dry-run --output json
//! photo-organize stats ~/Pictures/Library
//! ```

mod cli;

use photo_organizer::Result;

fn main() -> Result<()> {
    cli::run()
}
