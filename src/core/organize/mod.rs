//! Photo organization module.
//!
//! Maps routing decisions to the year/month library layout and copies
//! photos into it.

mod executor;
mod layout;
mod types;

pub use executor::PhotoCopier;
pub use layout::{review_folder_name, LibraryLayout, METADATA_PROBLEM_DIR, REVIEW_ROOT};
pub use types::{MonthLocale, YearRange};
