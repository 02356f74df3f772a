//! ARC extraction to a directory tree

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use tempfile::NamedTempFile;

use super::reader::ArcReader;
use super::types::{ArcPhase, ArcProgress, PathType};
use crate::error::{Error, Result};

/// Extract the archive at `path` into `out_dir`.
///
/// Returns the number of files written. See [`extract_arc_data`].
///
/// # Errors
/// Returns [`Error::Io`] when the archive cannot be read, otherwise as
/// [`extract_arc_data`].
pub fn extract_arc<P, Q, F>(path: P, out_dir: Q, progress: F) -> Result<usize>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    F: Fn(&ArcProgress) + Send + Sync,
{
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    tracing::info!("Extracting {} ({} bytes)", path.display(), data.len());
    extract_arc_data(&data, out_dir.as_ref(), progress)
}

/// Extract an in-memory archive into `out_dir`.
///
/// Every path is resolved before anything touches the disk, so a corrupt
/// table writes nothing. Files are then written in parallel, each through a
/// temporary file in its destination folder that is renamed into place.
/// Running twice over the same directory leaves identical files.
///
/// # Errors
/// Table errors as [`ArcReader::parse`] and [`ArcReader::relative_path`].
/// Per-file write failures do not stop the others and are reported together
/// as [`Error::ArcExtractionPartialFailure`].
pub fn extract_arc_data<F>(data: &[u8], out_dir: &Path, progress: F) -> Result<usize>
where
    F: Fn(&ArcProgress) + Send + Sync,
{
    progress(&ArcProgress::new(ArcPhase::ReadingTable, 0, 1));
    let reader = ArcReader::parse(data)?;
    let descriptor_count = reader.descriptors().len();

    progress(&ArcProgress::new(ArcPhase::BuildingTree, 0, descriptor_count));
    let mut folders = vec![out_dir.to_path_buf()];
    let mut files: Vec<(usize, PathBuf)> = Vec::new();
    for descriptor in reader.descriptors() {
        let relative = reader.relative_path(descriptor.index)?;
        if descriptor.path_type.is_folder() {
            folders.push(out_dir.join(relative));
        } else if descriptor.path_type == PathType::File {
            files.push((descriptor.index, relative));
        } else {
            tracing::warn!(
                "Skipping {} ({}): not a file or folder",
                relative.display(),
                descriptor.path_type.as_str()
            );
        }
    }

    for folder in &folders {
        std::fs::create_dir_all(folder)?;
    }

    let total = files.len();
    let processed = AtomicUsize::new(0);
    let errors: Vec<String> = files
        .par_iter()
        .filter_map(|(index, relative)| {
            let display_path = relative.to_string_lossy();
            let current = processed.fetch_add(1, Ordering::SeqCst) + 1;
            progress(&ArcProgress::with_file(
                ArcPhase::WritingFiles,
                current,
                total,
                display_path.to_string(),
            ));

            let result = reader
                .payload(*index)
                .and_then(|payload| write_file(&out_dir.join(relative), payload));
            result.err().map(|e| format!("{display_path}: {e}"))
        })
        .collect();

    progress(&ArcProgress::new(ArcPhase::Complete, total, total));

    if let Some(first_error) = errors.first() {
        return Err(Error::ArcExtractionPartialFailure {
            total,
            failed: errors.len(),
            first_error: first_error.clone(),
        });
    }
    tracing::info!("Extracted {total} files to {}", out_dir.display());
    Ok(total)
}

fn write_file(dest: &Path, payload: &[u8]) -> Result<()> {
    let dir = dest.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(payload)?;
    temp.persist(dest).map_err(|e| Error::PersistFailed {
        path: dest.to_path_buf(),
        message: e.error.to_string(),
    })?;
    Ok(())
}
