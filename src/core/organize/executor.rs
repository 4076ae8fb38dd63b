//! Copies photos into the library.

use crate::error::OrganizeError;
use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Places photos into destination folders.
///
/// Each copy is written to a temporary file in the target folder and then
/// persisted under its final name, so a destination file is either complete
/// or absent. Names already taken on disk, or earlier in the run, get a
/// `_1`, `_2`, ... suffix. Sources are only ever read.
#[derive(Debug, Default)]
pub struct PhotoCopier {
    dry_run: bool,
    reserved: HashSet<PathBuf>,
    // Next suffix to try per (folder, stem, extension)
    counters: HashMap<PathBuf, usize>,
    created_dirs: HashSet<PathBuf>,
}

impl PhotoCopier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve destinations without writing anything
    pub fn dry_run() -> Self {
        Self {
            dry_run: true,
            ..Self::default()
        }
    }

    /// Folders this copier had to create
    pub fn folders_created(&self) -> usize {
        self.created_dirs.len()
    }

    /// Copy `source` into `dir`, returning the final path.
    ///
    /// In dry-run mode the path is reserved and returned but nothing is written.
    pub fn place(&mut self, source: &Path, dir: &Path) -> Result<PathBuf, OrganizeError> {
        let file_name = source
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "photo".into());
        let destination = self.reserve(&dir.join(file_name));

        if self.dry_run {
            return Ok(destination);
        }

        self.ensure_dir(dir)?;

        if let Err(e) = copy_atomic(source, &destination) {
            self.reserved.remove(&destination);
            return Err(OrganizeError::CopyFailed {
                from: source.to_path_buf(),
                to: destination,
                source: e,
            });
        }

        Ok(destination)
    }

    fn ensure_dir(&mut self, dir: &Path) -> Result<(), OrganizeError> {
        if self.created_dirs.contains(dir) || dir.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(dir).map_err(|e| OrganizeError::CreateFolder {
            path: dir.to_path_buf(),
            source: e,
        })?;
        self.created_dirs.insert(dir.to_path_buf());
        Ok(())
    }

    /// First free variant of `wanted`, marked as taken
    fn reserve(&mut self, wanted: &Path) -> PathBuf {
        if self.is_free(wanted) {
            self.reserved.insert(wanted.to_path_buf());
            return wanted.to_path_buf();
        }

        let stem = wanted
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo".to_string());
        let ext = wanted
            .extension()
            .map(|e| e.to_string_lossy().into_owned());
        let parent = wanted.parent().unwrap_or(Path::new(""));

        let counter = self.counters.entry(wanted.to_path_buf()).or_insert(1);
        loop {
            let name = match &ext {
                Some(ext) => format!("{}_{}.{}", stem, counter, ext),
                None => format!("{}_{}", stem, counter),
            };
            *counter += 1;

            let candidate = parent.join(name);
            if !self.reserved.contains(&candidate) && !candidate.exists() {
                self.reserved.insert(candidate.clone());
                return candidate;
            }
        }
    }

    fn is_free(&self, path: &Path) -> bool {
        !self.reserved.contains(path) && !path.exists()
    }
}

/// Copy through a temp file in the destination folder, keeping the source's
/// modification time. The temp file is removed if anything fails.
fn copy_atomic(source: &Path, destination: &Path) -> io::Result<()> {
    let dir = destination.parent().unwrap_or(Path::new("."));
    let mut input = File::open(source)?;
    let mut temp = NamedTempFile::new_in(dir)?;

    io::copy(&mut input, &mut temp)?;
    temp.flush()?;

    if let Ok(modified) = input.metadata().and_then(|m| m.modified()) {
        if let Err(e) = temp.as_file().set_modified(modified) {
            tracing::debug!(path = %destination.display(), error = %e, "could not keep modification time");
        }
    }

    temp.persist_noclobber(destination).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(path: &Path, content: &[u8]) {
        fs::write(path, content).unwrap();
    }

    #[test]
    fn copies_and_keeps_source() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let source = src.path().join("test.jpg");
        write(&source, b"test content");

        let mut copier = PhotoCopier::new();
        let target_dir = dest.path().join("2024/01_Enero");
        let placed = copier.place(&source, &target_dir).unwrap();

        assert_eq!(placed, target_dir.join("test.jpg"));
        assert_eq!(fs::read(&placed).unwrap(), b"test content");
        assert!(source.exists());
        assert_eq!(copier.folders_created(), 1);
    }

    #[test]
    fn leaves_no_temp_files_behind() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let source = src.path().join("test.jpg");
        write(&source, b"abc");

        PhotoCopier::new().place(&source, dest.path()).unwrap();

        let names: Vec<_> = fs::read_dir(dest.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("test.jpg")]);
    }

    #[test]
    fn name_collisions_get_suffixes() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        fs::create_dir(src.path().join("a")).unwrap();
        fs::create_dir(src.path().join("b")).unwrap();
        let first = src.path().join("a/photo.jpg");
        let second = src.path().join("b/photo.jpg");
        write(&first, b"one");
        write(&second, b"two");
        write(&dest.path().join("photo.jpg"), b"already there");

        let mut copier = PhotoCopier::new();
        let placed_first = copier.place(&first, dest.path()).unwrap();
        let placed_second = copier.place(&second, dest.path()).unwrap();

        assert_eq!(placed_first, dest.path().join("photo_1.jpg"));
        assert_eq!(placed_second, dest.path().join("photo_2.jpg"));
        assert_eq!(fs::read(dest.path().join("photo.jpg")).unwrap(), b"already there");
        assert_eq!(fs::read(&placed_second).unwrap(), b"two");
    }

    #[test]
    fn dry_run_reserves_names_without_writing() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let source = src.path().join("photo.jpg");
        write(&source, b"x");

        let mut copier = PhotoCopier::dry_run();
        let target = dest.path().join("2022/03_Marzo");
        let first = copier.place(&source, &target).unwrap();
        let second = copier.place(&source, &target).unwrap();

        assert_eq!(first, target.join("photo.jpg"));
        assert_eq!(second, target.join("photo_1.jpg"));
        assert!(!target.exists());
    }

    #[test]
    fn missing_source_is_a_copy_error() {
        let dest = TempDir::new().unwrap();
        let mut copier = PhotoCopier::new();

        let result = copier.place(Path::new("/nonexistent/file.jpg"), dest.path());
        assert!(matches!(result, Err(OrganizeError::CopyFailed { .. })));
        assert!(!dest.path().join("file.jpg").exists());
    }

    #[test]
    fn keeps_modification_time() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let source = src.path().join("old.jpg");
        write(&source, b"old");
        let when = std::time::SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_600_000_000);
        File::options()
            .write(true)
            .open(&source)
            .unwrap()
            .set_modified(when)
            .unwrap();

        let placed = PhotoCopier::new().place(&source, dest.path()).unwrap();
        assert_eq!(fs::metadata(placed).unwrap().modified().unwrap(), when);
    }
}
