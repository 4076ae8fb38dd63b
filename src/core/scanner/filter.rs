//! Which directory entries count as candidate photos.

use super::ImageFormat;
use std::collections::HashSet;
use std::path::Path;

/// Extensions the organizer picks up by default
pub const DEFAULT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "tiff", "raw", "heic"];

/// Extension and hidden-file rules shared by the scanner and library stats
#[derive(Debug, Clone)]
pub struct ImageFilter {
    /// Lowercase, without the leading dot
    extensions: HashSet<String>,
    include_hidden: bool,
}

impl ImageFilter {
    /// Create a new filter with the default extensions
    pub fn new() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            include_hidden: false,
        }
    }

    /// Accept dot-files too
    pub fn with_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Replace the accepted extensions; `.WEBP` and `webp` are equivalent
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.trim_start_matches('.').to_lowercase())
            .collect();
        self
    }

    /// Whether `path` names a candidate photo
    pub fn should_include(&self, path: &Path) -> bool {
        if !self.include_hidden && is_dot_file(path) {
            return false;
        }

        self.has_photo_extension(path)
    }

    /// Extension check alone, hidden or not
    pub fn has_photo_extension(&self, path: &Path) -> bool {
        extension_of(path).is_some_and(|ext| self.extensions.contains(&ext.to_lowercase()))
    }

    /// Format guessed from the extension
    pub fn format_of(&self, path: &Path) -> ImageFormat {
        extension_of(path).map_or(ImageFormat::Unknown, ImageFormat::from_extension)
    }
}

fn extension_of(path: &Path) -> Option<&str> {
    path.extension().and_then(|e| e.to_str())
}

fn is_dot_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

impl Default for ImageFilter {
    fn default() -> Self {
        Self::new()
    }
}
