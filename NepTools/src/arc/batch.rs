//! Batch ARC extraction
//!
//! Finds archives under a folder and extracts them in parallel, each into a
//! subfolder named after the archive.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use walkdir::WalkDir;

use super::EXTENSION;
use super::extractor::extract_arc;
use super::types::{ArcPhase, ArcProgress};

/// Result of a batch ARC operation
#[derive(Debug, Clone)]
pub struct BatchArcResult {
    /// Number of successful operations
    pub success_count: usize,
    /// Number of failed operations
    pub fail_count: usize,
    /// Messages for each archive, in input order
    pub results: Vec<String>,
}

/// Find all .arc files in a directory recursively
///
/// # Returns
/// A sorted list of paths to .arc files found in the directory tree.
pub fn find_arc_files<P: AsRef<Path>>(dir: P) -> Vec<PathBuf> {
    let mut arc_files: Vec<_> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| {
            e.path().is_file()
                && e.path()
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(EXTENSION))
        })
        .map(|e| e.path().to_path_buf())
        .collect();

    arc_files.sort();
    arc_files
}

/// Batch extract ARC files in parallel
///
/// Each archive is extracted to `dest_base/<relative parent>/<stem>`, where
/// the relative parent is the archive's folder below `source_base`. A failing
/// archive is reported and never stops the others.
///
/// # Arguments
/// * `arc_files` - Archives to extract
/// * `source_base` - Base directory of the source (for calculating relative paths)
/// * `dest_base` - Destination directory for extracted files
/// * `progress` - Called once per archive as it starts
pub fn batch_extract<F>(
    arc_files: &[PathBuf],
    source_base: &Path,
    dest_base: &Path,
    progress: F,
) -> BatchArcResult
where
    F: Fn(&ArcProgress) + Send + Sync,
{
    let success_counter = AtomicUsize::new(0);
    let fail_counter = AtomicUsize::new(0);
    let processed = AtomicUsize::new(0);
    let total = arc_files.len();

    let results: Vec<String> = arc_files
        .par_iter()
        .map(|arc_path| {
            let relative_path = arc_path
                .strip_prefix(source_base)
                .unwrap_or(arc_path.as_path());
            let display_path = relative_path.to_string_lossy();

            let current = processed.fetch_add(1, Ordering::SeqCst) + 1;
            progress(&ArcProgress::with_file(
                ArcPhase::WritingFiles,
                current,
                total,
                display_path.to_string(),
            ));

            let relative_parent = relative_path.parent().unwrap_or(Path::new(""));
            let arc_stem = arc_path
                .file_stem()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();
            let arc_dest = dest_base.join(relative_parent).join(&arc_stem);

            match extract_arc(arc_path, &arc_dest, |_| {}) {
                Ok(count) => {
                    success_counter.fetch_add(1, Ordering::SeqCst);
                    format!("Extracted: {display_path} ({count} files)")
                }
                Err(e) => {
                    fail_counter.fetch_add(1, Ordering::SeqCst);
                    format!("Failed {display_path}: {e}")
                }
            }
        })
        .collect();

    BatchArcResult {
        success_count: success_counter.load(Ordering::SeqCst),
        fail_count: fail_counter.load(Ordering::SeqCst),
        results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arc::test_support::ArcBuilder;
    use tempfile::tempdir;

    #[test]
    fn test_find_arc_files() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("dlc")).unwrap();
        std::fs::write(dir.path().join("dlc").join("contents.ARC"), b"").unwrap();
        std::fs::write(dir.path().join("base.arc"), b"").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"").unwrap();

        let found = find_arc_files(dir.path());
        assert_eq!(
            found,
            vec![
                dir.path().join("base.arc"),
                dir.path().join("dlc").join("contents.ARC")
            ]
        );
    }

    #[test]
    fn test_batch_extract_isolates_failures() {
        let source = tempdir().unwrap();
        let dest = tempdir().unwrap();
        let good = source.path().join("0001").join("contents.arc");
        let bad = source.path().join("0002").join("contents.arc");
        std::fs::create_dir_all(good.parent().unwrap()).unwrap();
        std::fs::create_dir_all(bad.parent().unwrap()).unwrap();
        std::fs::write(&good, ArcBuilder::new().root(1, 1).file("a.txt", b"hello").build()).unwrap();
        std::fs::write(&bad, b"not an archive").unwrap();

        let files = find_arc_files(source.path());
        let result = batch_extract(&files, source.path(), dest.path(), |_| {});
        assert_eq!(result.success_count, 1);
        assert_eq!(result.fail_count, 1);
        assert!(result.results[0].starts_with("Extracted:"));
        assert!(result.results[1].starts_with("Failed"));
        assert_eq!(
            std::fs::read(dest.path().join("0001").join("contents").join("a.txt")).unwrap(),
            b"hello"
        );
    }
}
