//! # Stats Module
//!
//! Looks at an organized library after the fact: how many photos each year
//! and month holds, which month folders are still empty, and how much is
//! waiting in the review folders.
//!
//! Only four-digit folders directly under the root count as years. Every
//! folder inside a year counts as a month. Photos are counted with the same
//! extension filter the scanner uses, without recursing further.

use crate::core::organize::REVIEW_ROOT;
use crate::core::scanner::ImageFilter;
use crate::error::ReportError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Photos in one month folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthCount {
    pub folder: String,
    pub count: usize,
}

/// Photos in one year folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearStats {
    pub year: String,
    pub total: usize,
    /// Non-empty months, ordered by folder name
    pub months: Vec<MonthCount>,
}

impl YearStats {
    /// Busiest months first; ties keep folder order
    pub fn top_months(&self, n: usize) -> Vec<&MonthCount> {
        let mut months: Vec<&MonthCount> = self.months.iter().collect();
        months.sort_by(|a, b| b.count.cmp(&a.count));
        months.truncate(n);
        months
    }
}

/// Photos waiting in one review folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewCount {
    pub folder: String,
    pub count: usize,
}

/// Distribution of photos across an organized library
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryStats {
    pub root: PathBuf,
    pub total_photos: usize,
    /// Years holding at least one photo, in ascending order
    pub years: Vec<YearStats>,
    /// Month folders with no entries at all
    pub empty_month_folders: usize,
    /// Non-empty review folders, ordered by name
    pub pending_review: Vec<ReviewCount>,
}

impl LibraryStats {
    /// Busiest years first; ties keep year order
    pub fn top_years(&self, n: usize) -> Vec<&YearStats> {
        let mut years: Vec<&YearStats> = self.years.iter().collect();
        years.sort_by(|a, b| b.total.cmp(&a.total));
        years.truncate(n);
        years
    }

    /// Whole photos per year with photos, `None` for an empty library
    pub fn average_per_year(&self) -> Option<usize> {
        (!self.years.is_empty()).then(|| self.total_photos / self.years.len())
    }

    pub fn total_pending(&self) -> usize {
        self.pending_review.iter().map(|r| r.count).sum()
    }

    /// Share of all organized photos, in percent
    pub fn share(&self, count: usize) -> f64 {
        if self.total_photos == 0 {
            0.0
        } else {
            count as f64 * 100.0 / self.total_photos as f64
        }
    }
}

/// Walks an organized library and counts what it finds
pub struct LibraryAnalyzer {
    filter: ImageFilter,
    year_pattern: Regex,
}

impl LibraryAnalyzer {
    pub fn new() -> Self {
        Self {
            filter: ImageFilter::new(),
            year_pattern: Regex::new(r"^\d{4}$").expect("year folder pattern is valid"),
        }
    }

    pub fn analyze(&self, root: &Path) -> Result<LibraryStats, ReportError> {
        if !root.is_dir() {
            return Err(ReportError::LibraryNotFound {
                path: root.to_path_buf(),
            });
        }

        let mut years = Vec::new();
        let mut empty_month_folders = 0;

        for (name, year_dir) in subdirectories(root)? {
            if !self.year_pattern.is_match(&name) {
                continue;
            }

            let mut months = Vec::new();
            for (month_name, month_dir) in subdirectories(&year_dir)? {
                let (entries, photos) = self.count_photos(&month_dir)?;
                if entries == 0 {
                    empty_month_folders += 1;
                }
                if photos > 0 {
                    months.push(MonthCount {
                        folder: month_name,
                        count: photos,
                    });
                }
            }

            let total: usize = months.iter().map(|m| m.count).sum();
            if total > 0 {
                years.push(YearStats {
                    year: name,
                    total,
                    months,
                });
            }
        }

        let mut pending_review = Vec::new();
        let review_root = root.join(REVIEW_ROOT);
        if review_root.is_dir() {
            for (folder, dir) in subdirectories(&review_root)? {
                let (_, count) = self.count_photos(&dir)?;
                if count > 0 {
                    pending_review.push(ReviewCount { folder, count });
                }
            }
        }

        let stats = LibraryStats {
            root: root.to_path_buf(),
            total_photos: years.iter().map(|y| y.total).sum(),
            years,
            empty_month_folders,
            pending_review,
        };

        tracing::debug!(
            root = %root.display(),
            photos = stats.total_photos,
            pending = stats.total_pending(),
            "library analyzed"
        );
        Ok(stats)
    }

    /// (all entries, photos) directly inside `dir`
    fn count_photos(&self, dir: &Path) -> Result<(usize, usize), ReportError> {
        let mut entries = 0;
        let mut photos = 0;
        for entry in read_dir(dir)? {
            let entry = entry.map_err(|e| read_error(dir, e))?;
            entries += 1;
            let path = entry.path();
            if path.is_file() && self.filter.should_include(&path) {
                photos += 1;
            }
        }
        Ok((entries, photos))
    }
}

impl Default for LibraryAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Subdirectories of `dir` as (name, path), sorted by name
fn subdirectories(dir: &Path) -> Result<Vec<(String, PathBuf)>, ReportError> {
    let mut dirs = Vec::new();
    for entry in read_dir(dir)? {
        let entry = entry.map_err(|e| read_error(dir, e))?;
        let path = entry.path();
        if path.is_dir() {
            dirs.push((entry.file_name().to_string_lossy().into_owned(), path));
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn read_dir(dir: &Path) -> Result<fs::ReadDir, ReportError> {
    fs::read_dir(dir).map_err(|e| read_error(dir, e))
}

fn read_error(path: &Path, source: std::io::Error) -> ReportError {
    ReportError::ReadFailed {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, names: &[&str]) {
        fs::create_dir_all(dir).unwrap();
        for name in names {
            fs::write(dir.join(name), b"x").unwrap();
        }
    }

    fn library() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(&root.join("2021/01_Enero"), &["a.jpg", "b.JPG", "notes.txt"]);
        touch(&root.join("2021/02_Febrero"), &[]);
        touch(&root.join("2022/03_Marzo"), &["c.png"]);
        touch(&root.join("2022/04_Abril"), &["d.jpg", "e.jpeg", "f.heic", "g.gif"]);
        touch(&root.join("2023/05_Mayo"), &[]);
        touch(&root.join("00_PENDIENTE_REVISION/FOTOS_SIN_FECHA"), &["h.jpg", "i.jpg"]);
        touch(&root.join("00_PENDIENTE_REVISION/CALIDAD_DUDOSA"), &[]);
        touch(&root.join("00_METADATOS_PROBLEMA"), &["j.jpg"]);
        touch(&root.join("vacaciones/01_Enero"), &["k.jpg"]);
        temp
    }

    #[test]
    fn counts_photos_per_year_and_month() {
        let temp = library();
        let stats = LibraryAnalyzer::new().analyze(temp.path()).unwrap();

        assert_eq!(stats.total_photos, 7);
        let years: Vec<&str> = stats.years.iter().map(|y| y.year.as_str()).collect();
        assert_eq!(years, vec!["2021", "2022"]);
        assert_eq!(stats.years[0].total, 2);
        assert_eq!(
            stats.years[1].months,
            vec![
                MonthCount { folder: "03_Marzo".to_string(), count: 1 },
                MonthCount { folder: "04_Abril".to_string(), count: 4 },
            ]
        );
    }

    #[test]
    fn empty_month_folders_are_counted() {
        let temp = library();
        let stats = LibraryAnalyzer::new().analyze(temp.path()).unwrap();
        assert_eq!(stats.empty_month_folders, 2);
    }

    #[test]
    fn pending_review_lists_non_empty_folders() {
        let temp = library();
        let stats = LibraryAnalyzer::new().analyze(temp.path()).unwrap();

        assert_eq!(
            stats.pending_review,
            vec![ReviewCount { folder: "FOTOS_SIN_FECHA".to_string(), count: 2 }]
        );
        assert_eq!(stats.total_pending(), 2);
    }

    #[test]
    fn rankings_and_average() {
        let temp = library();
        let stats = LibraryAnalyzer::new().analyze(temp.path()).unwrap();

        let top: Vec<&str> = stats.top_years(3).iter().map(|y| y.year.as_str()).collect();
        assert_eq!(top, vec!["2022", "2021"]);
        assert_eq!(stats.years[1].top_months(1)[0].folder, "04_Abril");
        assert_eq!(stats.average_per_year(), Some(3));
        assert!((stats.share(stats.years[1].total) - 5.0 * 100.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn empty_library_has_no_average() {
        let temp = TempDir::new().unwrap();
        let stats = LibraryAnalyzer::new().analyze(temp.path()).unwrap();
        assert_eq!(stats.total_photos, 0);
        assert_eq!(stats.average_per_year(), None);
        assert_eq!(stats.share(0), 0.0);
    }

    #[test]
    fn missing_library_is_an_error() {
        let result = LibraryAnalyzer::new().analyze(Path::new("/nonexistent/library"));
        assert!(matches!(result, Err(ReportError::LibraryNotFound { .. })));
    }
}
