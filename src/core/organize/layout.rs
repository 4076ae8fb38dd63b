//! Destination folder layout.
//!
//! ```text
//! <root>/
//!   00_PENDIENTE_REVISION/
//!     DUPLICADOS_POR_CONFIRMAR/
//!     FOTOS_SIN_FECHA/
//!     CALIDAD_DUDOSA/
//!   00_METADATOS_PROBLEMA/
//!   2022/
//!     01_Enero/ ... 12_Diciembre/
//! ```

use super::types::{MonthLocale, YearRange};
use crate::core::router::{ReviewCategory, RoutingDecision};
use crate::error::OrganizeError;
use std::fs;
use std::path::PathBuf;

pub const REVIEW_ROOT: &str = "00_PENDIENTE_REVISION";
pub const METADATA_PROBLEM_DIR: &str = "00_METADATOS_PROBLEMA";

/// Folder under [`REVIEW_ROOT`] for a review category
pub fn review_folder_name(category: ReviewCategory) -> &'static str {
    match category {
        ReviewCategory::DuplicateToConfirm => "DUPLICADOS_POR_CONFIRMAR",
        ReviewCategory::NoDate => "FOTOS_SIN_FECHA",
        ReviewCategory::LowQuality => "CALIDAD_DUDOSA",
    }
}

/// Maps routing decisions to folders under a library root
#[derive(Debug, Clone)]
pub struct LibraryLayout {
    root: PathBuf,
    locale: MonthLocale,
}

impl LibraryLayout {
    pub fn new(root: impl Into<PathBuf>, locale: MonthLocale) -> Self {
        Self {
            root: root.into(),
            locale,
        }
    }

    /// `<root>/<year>/<MM>_<Month>`, or `None` for an invalid month
    pub fn month_dir(&self, year: i32, month: u32) -> Option<PathBuf> {
        let folder = self.locale.month_folder(month)?;
        Some(self.root.join(year.to_string()).join(folder))
    }

    pub fn review_dir(&self, category: ReviewCategory) -> PathBuf {
        self.root
            .join(REVIEW_ROOT)
            .join(review_folder_name(category))
    }

    pub fn metadata_problem_dir(&self) -> PathBuf {
        self.root.join(METADATA_PROBLEM_DIR)
    }

    /// Target folder for a decision; `Delete` has none
    pub fn destination_dir(&self, decision: &RoutingDecision) -> Option<PathBuf> {
        match decision {
            RoutingDecision::Delete { .. } => None,
            RoutingDecision::Review { category, .. } => Some(self.review_dir(*category)),
            RoutingDecision::Keep { year, month } => self.month_dir(*year, *month),
        }
    }

    /// Create the review folders, the problem-metadata folder and every month
    /// folder for `years`. Existing folders are left alone.
    ///
    /// Returns the number of folders that did not exist before.
    pub fn create_skeleton(&self, years: &YearRange) -> Result<usize, OrganizeError> {
        years.validate()?;

        let mut folders: Vec<PathBuf> = ReviewCategory::ALL
            .iter()
            .map(|category| self.review_dir(*category))
            .collect();
        folders.push(self.metadata_problem_dir());

        for year in years.years() {
            folders.extend((1..=12).filter_map(|month| self.month_dir(year, month)));
        }

        let mut created = 0;
        for folder in folders {
            if folder.is_dir() {
                continue;
            }
            fs::create_dir_all(&folder).map_err(|e| OrganizeError::CreateFolder {
                path: folder.clone(),
                source: e,
            })?;
            created += 1;
        }

        tracing::debug!(root = %self.root.display(), created, "destination skeleton ready");
        Ok(created)
    }
}
