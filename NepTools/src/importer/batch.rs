//! Parallel decoding of many ISM2 files
//!
//! Files are decoded on the rayon pool. Results come back in input order so
//! the caller can hand them to a [`super::SceneConsumer`] one at a time.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::formats::ism2::{DecodeOptions, EXTENSION, read_ism2};
use crate::model::SceneModel;

/// Progress update for batch decoding
#[derive(Debug, Clone)]
pub struct DecodeProgress {
    /// Current item number (1-indexed)
    pub current: usize,
    pub total: usize,
    pub current_file: String,
}

/// Outcome for one file.
#[derive(Debug)]
pub struct DecodedFile {
    pub path: PathBuf,
    /// The model, or the error message of a fatal decode failure
    pub model: Result<SceneModel, String>,
}

/// Result of a batch decode
#[derive(Debug)]
pub struct BatchDecodeResult {
    pub success_count: usize,
    pub fail_count: usize,
    /// One entry per input file, in input order
    pub files: Vec<DecodedFile>,
}

impl BatchDecodeResult {
    /// Successfully decoded models, in input order.
    pub fn models(&self) -> impl Iterator<Item = (&Path, &SceneModel)> {
        self.files
            .iter()
            .filter_map(|f| f.model.as_ref().ok().map(|m| (f.path.as_path(), m)))
    }

    /// `(path, error)` for every file that failed.
    pub fn errors(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.files
            .iter()
            .filter_map(|f| f.model.as_ref().err().map(|e| (f.path.as_path(), e.as_str())))
    }
}

/// Find all .ism2 files in a directory recursively
///
/// # Returns
/// A sorted list of paths to .ism2 files found in the directory tree.
pub fn find_ism2_files<P: AsRef<Path>>(dir: P) -> Vec<PathBuf> {
    let mut files: Vec<_> = WalkDir::new(dir)
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

    files.sort();
    files
}

/// Decode `files` in parallel.
///
/// A file that fails to decode is recorded with its error and never affects
/// the others.
pub fn batch_decode<F>(files: &[PathBuf], options: &DecodeOptions, progress: F) -> BatchDecodeResult
where
    F: Fn(&DecodeProgress) + Send + Sync,
{
    let success_counter = AtomicUsize::new(0);
    let fail_counter = AtomicUsize::new(0);
    let processed = AtomicUsize::new(0);
    let total = files.len();

    let files: Vec<DecodedFile> = files
        .par_iter()
        .map(|path| {
            let current = processed.fetch_add(1, Ordering::SeqCst) + 1;
            progress(&DecodeProgress {
                current,
                total,
                current_file: path.to_string_lossy().to_string(),
            });

            let model = match read_ism2(path, options) {
                Ok(model) => {
                    success_counter.fetch_add(1, Ordering::SeqCst);
                    Ok(model)
                }
                Err(e) => {
                    fail_counter.fetch_add(1, Ordering::SeqCst);
                    tracing::warn!("Failed {}: {e}", path.display());
                    Err(e.to_string())
                }
            };
            DecodedFile {
                path: path.clone(),
                model,
            }
        })
        .collect();

    BatchDecodeResult {
        success_count: success_counter.load(Ordering::SeqCst),
        fail_count: fail_counter.load(Ordering::SeqCst),
        files,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn empty_ism2() -> Vec<u8> {
        let mut data = b"ISM2".to_vec();
        data.extend_from_slice(&[2, 0, 0, 0]);
        data.extend_from_slice(&[0; 8]);
        data.extend_from_slice(&0x28_u32.to_le_bytes());
        // one unknown section, enough for the byte-order probe
        data.extend_from_slice(&1_u32.to_le_bytes());
        data.extend_from_slice(&[0; 8]);
        data.extend_from_slice(&0x99_u32.to_le_bytes());
        data.extend_from_slice(&0x28_u32.to_le_bytes());
        data
    }

    #[test]
    fn test_batch_decode_keeps_order_and_isolates() {
        let dir = tempdir().unwrap();
        let names = ["a.ism2", "b.ism2", "c.ISM2"];
        for name in names {
            std::fs::write(dir.path().join(name), empty_ism2()).unwrap();
        }
        std::fs::write(dir.path().join("b.ism2"), b"ISM3").unwrap();
        std::fs::write(dir.path().join("readme.txt"), b"").unwrap();

        let files = find_ism2_files(dir.path());
        assert_eq!(files.len(), 3);

        let result = batch_decode(&files, &DecodeOptions::new(), |_| {});
        assert_eq!(result.success_count, 2);
        assert_eq!(result.fail_count, 1);
        let decoded: Vec<&str> = result.models().map(|(_, m)| m.name.as_str()).collect();
        assert_eq!(decoded, ["a", "c"]);
        let (failed, _) = result.errors().next().unwrap();
        assert_eq!(failed, dir.path().join("b.ism2"));
    }
}
