use camino::{Utf8Path, Utf8PathBuf};
use kata_core::LocalExerciseDir;
use std::collections::HashSet;
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, thiserror::Error)]
pub enum ScannerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Non UTF-8 path: {0}")]
    NonUtf8(String),
}

/// File name excluded from solution listings.
pub const README: &str = "README.md";

pub struct Scanner;

impl Scanner {
    /// Direct children of `dir`, sorted by name. A missing or non-directory
    /// `dir` has no children.
    fn children(dir: &Utf8Path) -> Result<Vec<DirEntry>, ScannerError> {
        if !dir.is_dir() {
            debug!("{} is not a directory, nothing to list", dir);
            return Ok(Vec::new());
        }
        WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .map(|e| e.map_err(ScannerError::from))
            .collect()
    }

    fn utf8(entry: &DirEntry) -> Result<Utf8PathBuf, ScannerError> {
        Utf8PathBuf::from_path_buf(entry.path().to_path_buf())
            .map_err(|p| ScannerError::NonUtf8(p.display().to_string()))
    }

    /// Exercise directories under `track_root` whose name is one of `valid_slugs`.
    pub fn exercise_dirs(
        track_root: &Utf8Path,
        valid_slugs: &HashSet<String>,
    ) -> Result<Vec<Utf8PathBuf>, ScannerError> {
        let mut dirs = Vec::new();
        for entry in Self::children(track_root)? {
            let is_known = entry
                .file_name()
                .to_str()
                .is_some_and(|name| valid_slugs.contains(name));
            if entry.file_type().is_dir() && is_known {
                dirs.push(Self::utf8(&entry)?);
            }
        }
        Ok(dirs)
    }

    /// Whether a file name looks like something the user wrote.
    ///
    /// Any name containing `test` in any case is treated as a test file, so
    /// `greatest.js` is skipped along with `bob_test.rb`.
    pub fn is_solution_file(name: &str) -> bool {
        name != README && !name.to_lowercase().contains("test")
    }

    /// Regular files in `dir` that are neither the README nor tests.
    pub fn solution_files(dir: &Utf8Path) -> Result<Vec<String>, ScannerError> {
        let mut files = Vec::new();
        for entry in Self::children(dir)? {
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if Self::is_solution_file(name) {
                    files.push(name.to_string());
                }
            }
        }
        Ok(files)
    }

    /// Every known exercise checked out under `<root>/<track>`.
    pub fn local_exercises(
        root: &Utf8Path,
        track: &str,
        valid_slugs: &HashSet<String>,
    ) -> Result<Vec<LocalExerciseDir>, ScannerError> {
        let track_root = root.join(track);
        info!("Scanning {} for {} known exercises", track_root, valid_slugs.len());

        Self::exercise_dirs(&track_root, valid_slugs)?
            .into_iter()
            .map(|dir| {
                let files = Self::solution_files(&dir)?;
                let name = dir.file_name().unwrap_or_default().to_string();
                Ok(LocalExerciseDir { name, dir, files })
            })
            .collect()
    }
}
