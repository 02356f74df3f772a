//! Installed DLC catalogue
//!
//! Each installed DLC is a folder holding its `contents.arc` next to a text
//! descriptor whose name starts with `main`:
//!
//! ```text
//! <title:
//! Costume Set
//! ...
//! <comment:
//! First line of the description
//! Second line
//! >
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};

/// Prefix of the descriptor file name.
const DESCRIPTOR_PREFIX: &str = "main";

/// Title and comment of one installed DLC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DlcDescription {
    pub folder: PathBuf,
    pub title: String,
    /// Comment lines joined with `\n`, empty when the block is missing
    pub comment: String,
}

impl DlcDescription {
    /// Final component of [`DlcDescription::folder`].
    #[must_use]
    pub fn folder_name(&self) -> String {
        self.folder
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

impl fmt::Display for DlcDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.folder_name())?;
        write!(f, "{}", self.title)?;
        for line in self.comment.lines() {
            write!(f, "\n    {line}")?;
        }
        Ok(())
    }
}

/// Describe the DLC installed in `dir`.
///
/// # Errors
/// Returns [`Error::Io`] when the folder or descriptor cannot be read, or
/// when no descriptor exists, and [`Error::CorruptHeader`] when the
/// descriptor does not open with a title block.
pub fn describe_dlc<P: AsRef<Path>>(dir: P) -> Result<DlcDescription> {
    let dir = dir.as_ref();
    let mut descriptors: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(std::result::Result::ok)
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.file_name()
                    .is_some_and(|n| n.to_string_lossy().starts_with(DESCRIPTOR_PREFIX))
        })
        .collect();
    descriptors.sort();

    let Some(descriptor) = descriptors.first() else {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("no {DESCRIPTOR_PREFIX}* descriptor in {}", dir.display()),
        )));
    };

    let text = std::fs::read_to_string(descriptor)?;
    let (title, comment) = parse_descriptor(&text).ok_or_else(|| {
        Error::CorruptHeader(format!("{} has no title block", descriptor.display()))
    })?;
    Ok(DlcDescription {
        folder: dir.to_path_buf(),
        title,
        comment,
    })
}

/// Describe every DLC folder directly under `root`, sorted by folder.
///
/// Folders that cannot be described are logged and skipped.
///
/// # Errors
/// Returns [`Error::Io`] when `root` cannot be listed.
pub fn list_dlc_descriptions<P: AsRef<Path>>(root: P) -> Result<Vec<DlcDescription>> {
    let mut folders: Vec<PathBuf> = std::fs::read_dir(root.as_ref())?
        .filter_map(std::result::Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    folders.sort();

    Ok(folders
        .iter()
        .filter_map(|folder| match describe_dlc(folder) {
            Ok(description) => Some(description),
            Err(e) => {
                tracing::warn!("Skipping {}: {e}", folder.display());
                None
            }
        })
        .collect())
}

fn parse_descriptor(text: &str) -> Option<(String, String)> {
    let mut lines = text.lines().map(|l| l.trim_end_matches('\r'));
    if !lines.next()?.starts_with("<title:") {
        return None;
    }
    let title = lines.next().unwrap_or_default().to_string();

    let mut comment = Vec::new();
    if lines.any(|l| l.starts_with("<comment:")) {
        comment.extend(lines.take_while(|l| *l != ">"));
    }
    Some((title, comment.join("\n")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const DESCRIPTOR: &str =
        "<title:\nSwimsuit Set\n>\n<price:\n0\n>\n<comment:\nFour swimsuits.\nFor the whole party.\n>\n";

    #[test]
    fn test_parse_descriptor() {
        let (title, comment) = parse_descriptor(DESCRIPTOR).unwrap();
        assert_eq!(title, "Swimsuit Set");
        assert_eq!(comment, "Four swimsuits.\nFor the whole party.");

        let (_, comment) = parse_descriptor("<title:\nBare\n").unwrap();
        assert!(comment.is_empty());

        assert!(parse_descriptor("title\nBare\n").is_none());
    }

    #[test]
    fn test_list_dlc_descriptions() {
        let root = tempdir().unwrap();
        let swim = root.path().join("0002");
        let broken = root.path().join("0001");
        let empty = root.path().join("0003");
        for dir in [&swim, &broken, &empty] {
            std::fs::create_dir(dir).unwrap();
        }
        std::fs::write(swim.join("main_en.txt"), DESCRIPTOR).unwrap();
        std::fs::write(swim.join("contents.arc"), b"ARC\x02").unwrap();
        std::fs::write(broken.join("main.txt"), "garbage\n").unwrap();

        assert!(matches!(describe_dlc(&broken), Err(Error::CorruptHeader(_))));
        assert!(matches!(describe_dlc(&empty), Err(Error::Io(_))));

        let listed = list_dlc_descriptions(root.path()).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].folder_name(), "0002");
        assert_eq!(
            listed[0].to_string(),
            "0002\nSwimsuit Set\n    Four swimsuits.\n    For the whole party."
        );
    }
}
